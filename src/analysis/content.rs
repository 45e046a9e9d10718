//! Content quality metrics
//!
//! Visible text is everything outside `script`, `style`, `nav`, `header` and
//! `footer`. Readability uses the Flesch Reading Ease formula with a vowel-group
//! syllable heuristic.

use crate::analysis::{round2, select_all};
use scraper::{ElementRef, Html};
use serde::Serialize;
use indexmap::IndexMap;
use std::collections::HashMap;

/// Word count below which a page is considered thin
pub const MIN_WORD_COUNT: usize = 300;

/// Keyword density above which a keyword is flagged
pub const MAX_KEYWORD_DENSITY: f64 = 0.03;

const TOP_KEYWORDS: usize = 10;

/// Elements whose text is not page content
const BOILERPLATE_TAGS: &[&str] = &["script", "style", "nav", "header", "footer"];

const STOP_WORDS: &[&str] = &[
    "the", "be", "to", "of", "and", "a", "in", "that", "have", "i", "it", "for", "not", "on",
    "with", "he", "as", "you", "do", "at", "this", "but", "his", "by", "from", "they", "we",
    "say", "her", "she", "or", "an", "will", "my", "one", "all", "would", "there", "their",
    "what", "so", "up", "out", "if", "about", "who", "get", "which", "go", "me",
];

const VOWELS: &[char] = &['a', 'e', 'i', 'o', 'u', 'y'];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentMetrics {
    pub readability: ReadabilityReport,
    pub keyword_analysis: KeywordReport,
    pub content_structure: StructureReport,
    pub word_count: usize,
    pub sufficient_content: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReadabilityReport {
    pub flesch_reading_ease: f64,
    pub avg_sentence_length: f64,
    pub avg_syllables_per_word: f64,
    pub readability_level: ReadabilityLevel,
}

/// Qualitative band of a Flesch Reading Ease score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ReadabilityLevel {
    #[serde(rename = "Very Easy")]
    VeryEasy,
    #[serde(rename = "Easy")]
    Easy,
    #[serde(rename = "Fairly Easy")]
    FairlyEasy,
    #[serde(rename = "Standard")]
    Standard,
    #[serde(rename = "Fairly Difficult")]
    FairlyDifficult,
    #[serde(rename = "Difficult")]
    Difficult,
    #[serde(rename = "Very Difficult")]
    VeryDifficult,
}

impl ReadabilityLevel {
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= 90.0 => Self::VeryEasy,
            s if s >= 80.0 => Self::Easy,
            s if s >= 70.0 => Self::FairlyEasy,
            s if s >= 60.0 => Self::Standard,
            s if s >= 50.0 => Self::FairlyDifficult,
            s if s >= 30.0 => Self::Difficult,
            _ => Self::VeryDifficult,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeywordReport {
    /// Up to ten most frequent non-stop-words with their counts
    pub top_keywords: Vec<(String, usize)>,
    /// Density of each top keyword among non-stop-words, most frequent first
    pub keyword_densities: IndexMap<String, f64>,
    /// Top keywords denser than [`MAX_KEYWORD_DENSITY`], most frequent first
    pub keyword_density_issues: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructureReport {
    pub paragraph_count: usize,
    pub list_count: usize,
    pub avg_paragraph_length: f64,
    pub has_lists: bool,
    pub structure_score: f64,
}

/// Runs every content check over a parsed page
pub fn analyze(document: &Html) -> ContentMetrics {
    let text = extract_text_content(document);
    let word_count = split_into_words(&text).len();

    ContentMetrics {
        readability: analyze_readability(&text),
        keyword_analysis: analyze_keyword_density(&text),
        content_structure: analyze_content_structure(document),
        word_count,
        sufficient_content: word_count >= MIN_WORD_COUNT,
    }
}

/// Extracts the page's visible text as a single space-separated string
pub fn extract_text_content(document: &Html) -> String {
    let mut raw = String::new();
    collect_visible_text(document.root_element(), &mut raw);

    raw.lines()
        .flat_map(|line| line.trim().split("  "))
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn collect_visible_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(child_element) = ElementRef::wrap(child) {
            if !is_boilerplate(child_element) {
                collect_visible_text(child_element, out);
            }
        } else if let Some(text) = child.value().as_text() {
            out.push_str(text);
        }
    }
}

fn is_boilerplate(element: ElementRef<'_>) -> bool {
    BOILERPLATE_TAGS.contains(&element.value().name())
}

fn inside_boilerplate(element: ElementRef<'_>) -> bool {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(is_boilerplate)
}

/// Computes Flesch Reading Ease and its inputs
pub fn analyze_readability(text: &str) -> ReadabilityReport {
    let sentences = count_sentences(text);
    let words = split_into_words(text);
    let syllables: usize = words.iter().map(|word| count_syllables(word)).sum();

    let avg_sentence_length = if sentences > 0 {
        words.len() as f64 / sentences as f64
    } else {
        0.0
    };
    let avg_syllables_per_word = if words.is_empty() {
        0.0
    } else {
        syllables as f64 / words.len() as f64
    };

    let score = flesch_reading_ease(avg_sentence_length, avg_syllables_per_word);

    ReadabilityReport {
        flesch_reading_ease: round2(score),
        avg_sentence_length: round2(avg_sentence_length),
        avg_syllables_per_word: round2(avg_syllables_per_word),
        readability_level: ReadabilityLevel::from_score(score),
    }
}

/// Flesch Reading Ease: `206.835 - 1.015 * ASL - 84.6 * ASW`
pub fn flesch_reading_ease(avg_sentence_length: f64, avg_syllables_per_word: f64) -> f64 {
    206.835 - 1.015 * avg_sentence_length - 84.6 * avg_syllables_per_word
}

/// Ranks non-stop-words by frequency and flags over-used ones
pub fn analyze_keyword_density(text: &str) -> KeywordReport {
    let lowered = text.to_lowercase();
    let words: Vec<&str> = split_into_words(&lowered)
        .into_iter()
        .filter(|word| !STOP_WORDS.contains(word))
        .collect();

    // Counts in first-seen order so equal counts keep document order
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for &word in &words {
        let count = counts.entry(word).or_insert(0);
        if *count == 0 {
            order.push(word);
        }
        *count += 1;
    }

    let mut ranked: Vec<(String, usize)> = order
        .into_iter()
        .map(|word| (word.to_string(), counts[word]))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(TOP_KEYWORDS);

    let total = words.len() as f64;
    let densities: Vec<(String, f64)> = ranked
        .iter()
        .map(|(word, count)| (word.clone(), *count as f64 / total))
        .collect();

    let issues = densities
        .iter()
        .filter(|(_, density)| *density > MAX_KEYWORD_DENSITY)
        .map(|(word, _)| word.clone())
        .collect();

    KeywordReport {
        top_keywords: ranked,
        keyword_densities: densities.into_iter().collect(),
        keyword_density_issues: issues,
    }
}

/// Scores paragraph and list usage outside boilerplate regions
pub fn analyze_content_structure(document: &Html) -> StructureReport {
    let paragraphs: Vec<ElementRef<'_>> = select_all(document, "p")
        .into_iter()
        .filter(|p| !inside_boilerplate(*p))
        .collect();
    let list_count = select_all(document, "ul, ol")
        .into_iter()
        .filter(|list| !inside_boilerplate(*list))
        .count();

    let total_words: usize = paragraphs
        .iter()
        .map(|p| p.text().collect::<String>().split_whitespace().count())
        .sum();
    let avg_paragraph_length = if paragraphs.is_empty() {
        0.0
    } else {
        total_words as f64 / paragraphs.len() as f64
    };

    StructureReport {
        paragraph_count: paragraphs.len(),
        list_count,
        avg_paragraph_length: round2(avg_paragraph_length),
        has_lists: list_count > 0,
        structure_score: structure_score(paragraphs.len(), list_count, avg_paragraph_length),
    }
}

/// Weighted 0.0-1.0 score: paragraph count 0.4, lists 0.3, paragraph length 0.3
fn structure_score(paragraph_count: usize, list_count: usize, avg_paragraph_length: f64) -> f64 {
    let mut score = 0.0;

    if (5..=15).contains(&paragraph_count) {
        score += 0.4;
    } else if paragraph_count > 0 {
        score += 0.2;
    }

    if list_count > 0 {
        score += 0.3;
    }

    if (50.0..=200.0).contains(&avg_paragraph_length) {
        score += 0.3;
    } else if avg_paragraph_length > 0.0 {
        score += 0.1;
    }

    round2(score)
}

/// Splits text into runs of word characters
pub fn split_into_words(text: &str) -> Vec<&str> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|word| !word.is_empty())
        .collect()
}

/// Number of `.`/`!`/`?`-terminated segments that contain at least one word
pub fn count_sentences(text: &str) -> usize {
    text.split(|c: char| matches!(c, '.' | '!' | '?'))
        .filter(|segment| !split_into_words(segment).is_empty())
        .count()
}

/// Heuristic syllable count: vowel groups, minus a trailing silent `e`, at least one
pub fn count_syllables(word: &str) -> usize {
    let lowered = word.to_lowercase();
    let mut count: isize = 0;
    let mut previous_was_vowel = false;

    for c in lowered.chars() {
        let is_vowel = VOWELS.contains(&c);
        if is_vowel && !previous_was_vowel {
            count += 1;
        }
        previous_was_vowel = is_vowel;
    }

    if lowered.ends_with('e') {
        count -= 1;
    }

    count.max(1) as usize
}
