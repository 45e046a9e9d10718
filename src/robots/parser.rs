//! Robots.txt parser implementation
//!
//! Allow/Disallow matching is delegated to the robotstxt crate (Google's matcher);
//! Crawl-delay, which that matcher ignores, is read here directly.

use robotstxt::DefaultMatcher;
use std::time::Duration;

/// Longest crawl delay honoured; larger declared values are clamped to this
pub const MAX_CRAWL_DELAY: Duration = Duration::from_secs(60);

/// Parsed robots.txt data
///
/// Wraps the raw file so the matcher can be run on demand for any agent.
#[derive(Debug, Clone)]
pub struct ParsedRobots {
    /// Raw robots.txt content (blank content allows everything)
    content: String,
}

impl ParsedRobots {
    /// Creates a new ParsedRobots from raw robots.txt content
    pub fn from_content(content: &str) -> Self {
        Self {
            content: content.to_string(),
        }
    }

    /// Checks if a URL is allowed for the given user agent
    ///
    /// `url` may be absolute (`https://example.com/page`) or a bare path (`/page`).
    pub fn is_allowed(&self, url: &str, user_agent: &str) -> bool {
        if self.content.trim().is_empty() {
            return true;
        }

        let mut matcher = DefaultMatcher::default();
        matcher.one_agent_allowed_by_robots(&self.content, user_agent, url)
    }

    /// Gets the crawl delay for a specific user agent
    ///
    /// A group naming the agent wins over the `*` group. Within a group the first
    /// well-formed `Crawl-delay` line counts; negative or non-numeric values are ignored.
    /// Values above [`MAX_CRAWL_DELAY`] are clamped to it.
    pub fn crawl_delay(&self, user_agent: &str) -> Option<Duration> {
        if self.content.trim().is_empty() {
            return None;
        }

        let normalized_agent = user_agent.trim().to_lowercase();

        let mut current_user_agents: Vec<String> = Vec::new();
        let mut collecting_agents = false;
        let mut crawl_delay_for_wildcard: Option<f64> = None;
        let mut crawl_delay_for_agent: Option<f64> = None;

        for line in self.content.lines() {
            let trimmed = line.split('#').next().unwrap_or("").trim();
            if trimmed.is_empty() {
                continue;
            }

            let Some((key, value)) = trimmed.split_once(':') else {
                continue;
            };
            let key = key.trim().to_lowercase();
            let value = value.trim();

            if key == "user-agent" {
                // Consecutive User-agent lines share one group
                if !collecting_agents {
                    current_user_agents.clear();
                    collecting_agents = true;
                }
                current_user_agents.push(value.to_lowercase());
                continue;
            }

            collecting_agents = false;

            if key != "crawl-delay" {
                continue;
            }

            let delay = match value.parse::<f64>() {
                Ok(delay) if delay.is_finite() && delay >= 0.0 => delay,
                _ => continue,
            };

            let names_agent = normalized_agent != "*"
                && current_user_agents
                    .iter()
                    .any(|ua| ua != "*" && normalized_agent.contains(ua.as_str()));

            if names_agent {
                crawl_delay_for_agent.get_or_insert(delay);
            } else if current_user_agents.iter().any(|ua| ua == "*") {
                crawl_delay_for_wildcard.get_or_insert(delay);
            }
        }

        crawl_delay_for_agent
            .or(crawl_delay_for_wildcard)
            .map(|secs| secs.min(MAX_CRAWL_DELAY.as_secs_f64()))
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_content_allows_all() {
        let robots = ParsedRobots::from_content("  \n");
        assert!(robots.is_allowed("/any/path", "TestBot"));
        assert!(robots.is_allowed("https://example.com/admin", "*"));
    }

    #[test]
    fn test_parse_disallow_all() {
        let robots = ParsedRobots::from_content("User-agent: *\nDisallow: /");
        assert!(!robots.is_allowed("https://example.com/", "TestBot"));
        assert!(!robots.is_allowed("https://example.com/page", "*"));
    }

    #[test]
    fn test_parse_disallow_private_directory() {
        let robots = ParsedRobots::from_content("User-agent: *\nDisallow: /private/");
        assert!(robots.is_allowed("https://ex.com/", "*"));
        assert!(robots.is_allowed("https://ex.com/public/page", "*"));
        assert!(!robots.is_allowed("https://ex.com/private/page", "*"));
    }

    #[test]
    fn test_parse_allow_and_disallow() {
        let content = "User-agent: *\nDisallow: /private\nAllow: /private/public";
        let robots = ParsedRobots::from_content(content);
        assert!(robots.is_allowed("https://example.com/", "TestBot"));
        assert!(!robots.is_allowed("https://example.com/private", "TestBot"));
        assert!(robots.is_allowed("https://example.com/private/public", "TestBot"));
    }

    #[test]
    fn test_parse_specific_user_agent() {
        let content = "User-agent: BadBot\nDisallow: /\n\nUser-agent: *\nAllow: /";
        let robots = ParsedRobots::from_content(content);
        assert!(robots.is_allowed("https://example.com/page", "GoodBot"));
        assert!(!robots.is_allowed("https://example.com/page", "BadBot"));
    }

    #[test]
    fn test_invalid_robots_txt() {
        let robots = ParsedRobots::from_content("This is not valid robots.txt {{{");
        assert!(robots.is_allowed("https://example.com/any/path", "TestBot"));
    }

    #[test]
    fn test_empty_robots_txt() {
        let robots = ParsedRobots::from_content("");
        assert!(robots.is_allowed("https://example.com/any/path", "TestBot"));
    }

    #[test]
    fn test_crawl_delay_wildcard() {
        let content = "User-agent: *\nCrawl-delay: 10\nDisallow: /admin";
        let robots = ParsedRobots::from_content(content);
        assert_eq!(robots.crawl_delay("TestBot"), Some(Duration::from_secs(10)));
        assert_eq!(robots.crawl_delay("*"), Some(Duration::from_secs(10)));
    }

    #[test]
    fn test_crawl_delay_specific_agent() {
        let content = "User-agent: TestBot\nCrawl-delay: 5\n\nUser-agent: *\nCrawl-delay: 10";
        let robots = ParsedRobots::from_content(content);
        assert_eq!(robots.crawl_delay("TestBot"), Some(Duration::from_secs(5)));
        assert_eq!(robots.crawl_delay("OtherBot"), Some(Duration::from_secs(10)));
        assert_eq!(robots.crawl_delay("*"), Some(Duration::from_secs(10)));
    }

    #[test]
    fn test_crawl_delay_no_delay() {
        let robots = ParsedRobots::from_content("User-agent: *\nDisallow: /admin");
        assert_eq!(robots.crawl_delay("TestBot"), None);
    }

    #[test]
    fn test_crawl_delay_decimal() {
        let robots = ParsedRobots::from_content("User-agent: *\nCrawl-delay: 2.5");
        assert_eq!(
            robots.crawl_delay("TestBot"),
            Some(Duration::from_millis(2500))
        );
    }

    #[test]
    fn test_crawl_delay_ignores_garbage() {
        let robots = ParsedRobots::from_content("User-agent: *\nCrawl-delay: soon\nCrawl-delay: -3");
        assert_eq!(robots.crawl_delay("TestBot"), None);
    }

    #[test]
    fn test_crawl_delay_huge_value_clamped() {
        let robots = ParsedRobots::from_content("User-agent: *\nCrawl-delay: 1e20");
        assert_eq!(robots.crawl_delay("TestBot"), Some(MAX_CRAWL_DELAY));

        let robots = ParsedRobots::from_content("User-agent: *\nCrawl-delay: 1e19");
        assert_eq!(robots.crawl_delay("TestBot"), Some(MAX_CRAWL_DELAY));

        let robots = ParsedRobots::from_content("User-agent: *\nCrawl-delay: inf");
        assert_eq!(robots.crawl_delay("TestBot"), None);
    }

    #[test]
    fn test_crawl_delay_case_insensitive() {
        let robots = ParsedRobots::from_content("User-agent: TestBot\ncrawl-delay: 7");
        assert_eq!(robots.crawl_delay("testbot"), Some(Duration::from_secs(7)));
        assert_eq!(robots.crawl_delay("TESTBOT"), Some(Duration::from_secs(7)));
    }

    #[test]
    fn test_crawl_delay_multiple_user_agents() {
        let content = "User-agent: BotA\nUser-agent: BotB\nCrawl-delay: 3";
        let robots = ParsedRobots::from_content(content);
        assert_eq!(robots.crawl_delay("BotA"), Some(Duration::from_secs(3)));
        assert_eq!(robots.crawl_delay("BotB"), Some(Duration::from_secs(3)));
        assert_eq!(robots.crawl_delay("BotC"), None);
    }

    #[test]
    fn test_crawl_delay_with_trailing_comment() {
        let robots = ParsedRobots::from_content("User-agent: * # everyone\nCrawl-delay: 4 # seconds");
        assert_eq!(robots.crawl_delay("TestBot"), Some(Duration::from_secs(4)));
    }
}
