//! On-page SEO checks
//!
//! Meta-tag checklist, heading census, image alt coverage, link census and
//! title length.

use crate::analysis::select_all;
use crate::url::extract_domain;
use scraper::Html;
use serde::Serialize;
use std::collections::BTreeMap;
use url::Url;

/// Meta tags every page is expected to carry (`name` or `property`)
pub const IMPORTANT_META_TAGS: &[&str] = &[
    "description",
    "keywords",
    "robots",
    "viewport",
    "og:title",
    "og:description",
];

/// Title length considered optimal, in characters
const OPTIMAL_TITLE_LENGTH: std::ops::RangeInclusive<usize> = 50..=60;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeoMetrics {
    pub meta_tags: MetaTagReport,
    pub headings: HeadingReport,
    pub images: ImageReport,
    pub links: LinkCensus,
    pub title: TitleReport,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetaTagReport {
    /// Checklist tags found on the page, keyed by lowercased name
    pub meta_tags_present: BTreeMap<String, String>,
    /// Checklist tags absent from the page, in checklist order
    pub missing_important_tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeadingReport {
    /// Occurrences of `h1` through `h6`
    pub heading_count: BTreeMap<String, usize>,
    pub has_h1: bool,
    pub multiple_h1: bool,
    pub heading_structure_issues: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageReport {
    pub total_images: usize,
    pub images_without_alt: usize,
    /// Share of images with non-empty alt text (1.0 when there are no images)
    pub image_alt_ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkCensus {
    pub total_links: usize,
    pub internal_links: usize,
    pub external_links: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TitleReport {
    pub title: Option<String>,
    pub has_title: bool,
    pub title_length: usize,
    pub title_optimal_length: bool,
}

/// Runs every SEO check over a parsed page
pub fn analyze(document: &Html, url: &Url) -> SeoMetrics {
    SeoMetrics {
        meta_tags: analyze_meta_tags(document),
        headings: analyze_headings(document),
        images: analyze_images(document),
        links: analyze_links(document, url),
        title: analyze_title(document),
    }
}

/// Checks the page's meta tags against [`IMPORTANT_META_TAGS`]
pub fn analyze_meta_tags(document: &Html) -> MetaTagReport {
    let mut present = BTreeMap::new();

    for tag in select_all(document, "meta") {
        let element = tag.value();
        let name = element
            .attr("name")
            .or_else(|| element.attr("property"))
            .unwrap_or("")
            .to_lowercase();

        if !name.is_empty() && IMPORTANT_META_TAGS.contains(&name.as_str()) {
            let content = element.attr("content").unwrap_or("").to_string();
            present.insert(name, content);
        }
    }

    let missing = IMPORTANT_META_TAGS
        .iter()
        .filter(|tag| !present.contains_key(**tag))
        .map(|tag| tag.to_string())
        .collect();

    MetaTagReport {
        meta_tags_present: present,
        missing_important_tags: missing,
    }
}

/// Counts headings per level and flags structural problems
pub fn analyze_headings(document: &Html) -> HeadingReport {
    let mut counts = [0usize; 7];
    for level in 1..=6 {
        counts[level] = select_all(document, &format!("h{}", level)).len();
    }

    let heading_count = (1..=6)
        .map(|level| (format!("h{}", level), counts[level]))
        .collect();

    HeadingReport {
        heading_count,
        has_h1: counts[1] > 0,
        multiple_h1: counts[1] > 1,
        heading_structure_issues: heading_structure_issues(&counts),
    }
}

/// Structural issues for heading counts indexed by level (index 0 unused)
///
/// A level is reported as skipped when it is used while the last populated level
/// above it is absent (only possible for a missing `h1`) or more than one level up.
fn heading_structure_issues(counts: &[usize; 7]) -> Vec<String> {
    let mut issues = Vec::new();

    if counts[1] == 0 {
        issues.push("Missing H1 tag".to_string());
    } else if counts[1] > 1 {
        issues.push("Multiple H1 tags".to_string());
    }

    let mut last_level = 1;
    for level in 2..=6 {
        if counts[level] == 0 {
            continue;
        }
        if counts[last_level] == 0 || level > last_level + 1 {
            issues.push(format!(
                "Skipped heading level: h{} to h{}",
                last_level, level
            ));
        }
        last_level = level;
    }

    issues
}

/// Measures alt-text coverage of `<img>` tags
pub fn analyze_images(document: &Html) -> ImageReport {
    let images = select_all(document, "img");
    let without_alt = images
        .iter()
        .filter(|img| img.value().attr("alt").map_or(true, |alt| alt.is_empty()))
        .count();

    let image_alt_ratio = if images.is_empty() {
        1.0
    } else {
        (images.len() - without_alt) as f64 / images.len() as f64
    };

    ImageReport {
        total_images: images.len(),
        images_without_alt: without_alt,
        image_alt_ratio,
    }
}

/// Splits anchors into internal and external links
///
/// An absolute `http(s)` href is external when it does not mention the current
/// host; relative hrefs are internal. Empty and fragment-only hrefs are counted in
/// the total but in neither bucket.
pub fn analyze_links(document: &Html, current_url: &Url) -> LinkCensus {
    let anchors = select_all(document, "a[href]");
    let host = extract_domain(current_url);

    let mut internal = 0;
    let mut external = 0;

    for anchor in &anchors {
        let href = anchor.value().attr("href").unwrap_or("").trim();
        if href.is_empty() || href.starts_with('#') {
            continue;
        }

        let mentions_host = host
            .as_deref()
            .map_or(false, |host| href.to_lowercase().contains(host));

        if href.starts_with("http") && !mentions_host {
            external += 1;
        } else {
            internal += 1;
        }
    }

    LinkCensus {
        total_links: anchors.len(),
        internal_links: internal,
        external_links: external,
    }
}

/// Reports the page title and whether its length is in the optimal band
pub fn analyze_title(document: &Html) -> TitleReport {
    let title = select_all(document, "title")
        .first()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty());

    let title_length = title.as_ref().map_or(0, |t| t.chars().count());

    TitleReport {
        has_title: title.is_some(),
        title_length,
        title_optimal_length: title.is_some() && OPTIMAL_TITLE_LENGTH.contains(&title_length),
        title,
    }
}
