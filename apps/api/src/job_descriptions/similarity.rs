//! Hashing, normalization and similarity scores used to recognise a job description
//! that has been seen before.

use std::collections::HashSet;

use sha2::{Digest, Sha256};

/// Minimum text similarity for a near-duplicate.
pub const TEXT_SIMILARITY_THRESHOLD: f64 = 0.85;
/// Minimum keyword-set overlap for a near-duplicate.
pub const KEYWORD_SIMILARITY_THRESHOLD: f64 = 0.85;
/// Length tolerance, as a fraction of the query length.
pub const LENGTH_TOLERANCE: f64 = 0.05;

pub const MIN_STORED_KEYWORDS: usize = 3;
pub const MIN_KEYWORD_CHARS: usize = 3;
pub const MAX_STORED_KEYWORDS: usize = 25;

/// SHA-256 of the raw text, lower-case hex.
pub fn content_hash(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Lower-cased, punctuation removed, whitespace collapsed to single spaces.
pub fn normalize_text(text: &str) -> String {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() || c.is_whitespace() { c } else { ' ' })
        .collect();
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Character length used for the length window.
pub fn char_length(text: &str) -> usize {
    text.chars().count()
}

/// Inclusive `(min, max)` character lengths within ±5% of `length`.
pub fn length_window(length: usize) -> (usize, usize) {
    let margin = (length as f64 * LENGTH_TOLERANCE).floor() as usize;
    (length.saturating_sub(margin), length + margin)
}

/// Sørensen–Dice coefficient over character bigrams of two normalized texts.
pub fn text_similarity(a: &str, b: &str) -> f64 {
    strsim::sorensen_dice(a, b)
}

/// Jaccard index of the two keyword sets, compared case-insensitively.
/// Zero when either set is empty.
pub fn keyword_similarity(a: &[String], b: &[String]) -> f64 {
    let left: HashSet<String> = a.iter().map(|k| k.trim().to_lowercase()).collect();
    let right: HashSet<String> = b.iter().map(|k| k.trim().to_lowercase()).collect();
    if left.is_empty() || right.is_empty() {
        return 0.0;
    }

    let shared = left.intersection(&right).count();
    let union = left.union(&right).count();
    shared as f64 / union as f64
}

/// Keywords as they are persisted: first occurrences only, entries shorter than
/// `MIN_KEYWORD_CHARS` dropped, at most `MAX_STORED_KEYWORDS`. `None` when fewer than
/// `MIN_STORED_KEYWORDS` were supplied.
pub fn clean_keywords(keywords: &[String]) -> Option<Vec<String>> {
    if keywords.len() < MIN_STORED_KEYWORDS {
        return None;
    }

    let mut seen = HashSet::new();
    Some(
        keywords
            .iter()
            .filter(|k| seen.insert(k.as_str()))
            .filter(|k| k.chars().count() >= MIN_KEYWORD_CHARS)
            .take(MAX_STORED_KEYWORDS)
            .cloned()
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_content_hash_is_stable_hex() {
        let hash = content_hash("Senior Rust Engineer");
        assert_eq!(hash.len(), 64);
        assert_eq!(hash, content_hash("Senior Rust Engineer"));
        assert_ne!(hash, content_hash("Senior Rust Engineer "));
        assert_eq!(
            content_hash(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_normalize_text() {
        assert_eq!(
            normalize_text("  We're hiring:\n a Senior   ENGINEER (Rust/Go)! "),
            "we re hiring a senior engineer rust go"
        );
    }

    #[test]
    fn test_length_window_floors_margin() {
        assert_eq!(length_window(1000), (950, 1050));
        assert_eq!(length_window(39), (38, 40));
        assert_eq!(length_window(10), (10, 10));
    }

    #[test]
    fn test_text_similarity_bounds() {
        assert_eq!(text_similarity("rust engineer", "rust engineer"), 1.0);
        assert!(text_similarity("rust engineer", "go developer") < 0.5);
    }

    #[test]
    fn test_keyword_similarity_is_case_insensitive_jaccard() {
        let a = strings(&["Rust", "Kafka", "AWS", "Postgres"]);
        let b = strings(&["rust", "kafka", "aws", "Redis"]);
        // 3 shared of 5 distinct
        assert!((keyword_similarity(&a, &b) - 0.6).abs() < 1e-9);
        assert_eq!(keyword_similarity(&a, &a), 1.0);
        assert_eq!(keyword_similarity(&a, &[]), 0.0);
    }

    #[test]
    fn test_clean_keywords() {
        assert_eq!(clean_keywords(&strings(&["Rust", "Go"])), None);

        let cleaned = clean_keywords(&strings(&["Rust", "Go", "Rust", "Kafka", "AWS"])).unwrap();
        assert_eq!(cleaned, strings(&["Rust", "Kafka", "AWS"]));

        let many: Vec<String> = (0..40).map(|i| format!("keyword{i}")).collect();
        assert_eq!(clean_keywords(&many).unwrap().len(), MAX_STORED_KEYWORDS);
    }
}
