use serde::Deserialize;

/// Default report file written when no output path is given
pub const DEFAULT_REPORT_PATH: &str = "seo_report.json";

/// Browser-like user agents rotated across page requests
const DEFAULT_USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:125.0) Gecko/20100101 Firefox/125.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:125.0) Gecko/20100101 Firefox/125.0",
];

/// Main configuration structure for the crawler
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Maximum link-hops from the base URL (base URL is depth 0)
    pub max_depth: u32,

    /// Concurrency budget: in-flight fetches and child analyses per page
    pub max_concurrent: usize,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Skip robots.txt checks entirely
    pub ignore_robots: bool,

    /// Space requests to an origin by its robots.txt crawl delay
    pub respect_crawl_delay: bool,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: 3,
            max_concurrent: 5,
            timeout_secs: 30,
            ignore_robots: false,
            respect_crawl_delay: true,
        }
    }
}

/// User agent configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct UserAgentConfig {
    /// Agent name matched against robots.txt groups
    pub robots_agent: String,

    /// User agent sent when fetching robots.txt
    pub identity: String,

    /// Pool of user agents picked at random for page requests
    pub pool: Vec<String>,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            robots_agent: "*".to_string(),
            identity: format!("seo-crawler/{}", env!("CARGO_PKG_VERSION")),
            pool: DEFAULT_USER_AGENTS.iter().map(|ua| ua.to_string()).collect(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Path of the JSON report
    pub report_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            report_path: DEFAULT_REPORT_PATH.to_string(),
        }
    }
}
