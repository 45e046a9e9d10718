//! JSON report writer

use crate::crawler::CrawlResult;
use crate::CrawlError;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes the result tree to `path` as pretty-printed JSON
///
/// # Arguments
///
/// * `result` - The finished crawl
/// * `path` - Where to write the report; an existing file is replaced
///
/// # Returns
///
/// * `Ok(())` - Report written
/// * `Err(CrawlError)` - The file could not be created or written
pub fn write_report(result: &CrawlResult, path: &Path) -> Result<(), CrawlError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, result)?;
    writeln!(writer)?;
    writer.flush()?;

    tracing::info!("Report written to {}", path.display());
    Ok(())
}

/// Renders the result tree as pretty-printed JSON
pub fn render_report(result: &CrawlResult) -> Result<String, CrawlError> {
    Ok(serde_json::to_string_pretty(result)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::{CrawlNode, PageRecord};
    use std::time::Duration;
    use tempfile::TempDir;

    fn failed_root() -> CrawlResult {
        CrawlResult {
            root: Some(CrawlNode::leaf(PageRecord::Failed {
                url: "https://ex.com/".to_string(),
                depth: 0,
                error: "Request timeout for https://ex.com/".to_string(),
            })),
            visited: vec!["https://ex.com/".to_string()],
            robots_denied: Vec::new(),
            elapsed: Duration::from_millis(5),
        }
    }

    #[test]
    fn test_write_report() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.json");

        write_report(&failed_root(), &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(value["url"], "https://ex.com/");
        assert_eq!(value["depth"], 0);
        assert!(value.get("children").is_none());
        assert!(written.ends_with('\n'));
    }

    #[test]
    fn test_render_report_is_pretty() {
        let rendered = render_report(&failed_root()).unwrap();
        assert!(rendered.starts_with("{\n  \"url\""));
    }

    #[test]
    fn test_write_report_to_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("report.json");
        assert!(matches!(
            write_report(&failed_root(), &path),
            Err(CrawlError::Io(_))
        ));
    }
}
