//! Shared record of URLs admitted for fetching

use std::collections::HashSet;
use std::sync::Mutex;

/// Set of URLs the crawl has claimed
///
/// All branches of the crawl share one instance. [`VisitedSet::insert`] is the
/// only way to claim a URL, and it checks and records in a single critical
/// section, so at most one branch ever fetches a given URL.
#[derive(Debug, Default)]
pub struct VisitedSet {
    urls: Mutex<HashSet<String>>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if `url` has already been claimed
    pub fn contains(&self, url: &str) -> bool {
        self.lock().contains(url)
    }

    /// Claims `url`, returning false if another branch got there first
    pub fn insert(&self, url: &str) -> bool {
        self.lock().insert(url.to_string())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Sorted copy of every claimed URL
    pub fn snapshot(&self) -> Vec<String> {
        let mut urls: Vec<String> = self.lock().iter().cloned().collect();
        urls.sort();
        urls
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashSet<String>> {
        self.urls.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_insert_claims_once() {
        let visited = VisitedSet::new();
        assert!(visited.is_empty());
        assert!(visited.insert("https://ex.com/"));
        assert!(!visited.insert("https://ex.com/"));
        assert!(visited.contains("https://ex.com/"));
        assert!(!visited.contains("https://ex.com/other"));
        assert_eq!(visited.len(), 1);
    }

    #[test]
    fn test_snapshot_is_sorted() {
        let visited = VisitedSet::new();
        visited.insert("https://ex.com/b");
        visited.insert("https://ex.com/a");
        assert_eq!(
            visited.snapshot(),
            vec!["https://ex.com/a".to_string(), "https://ex.com/b".to_string()]
        );
    }

    #[test]
    fn test_concurrent_insert_has_single_winner() {
        let visited = Arc::new(VisitedSet::new());
        let winners = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let visited = Arc::clone(&visited);
                let winners = Arc::clone(&winners);
                thread::spawn(move || {
                    if visited.insert("https://ex.com/contested") {
                        winners.fetch_add(1, Ordering::SeqCst);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(winners.load(Ordering::SeqCst), 1);
        assert_eq!(visited.len(), 1);
    }
}
