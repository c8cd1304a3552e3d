//! Bullet Generator — wraps the text-completion service and turns free text into bullets.
//!
//! Never fails: transport errors, empty envelopes and unformatted output all count as
//! "zero bullets this attempt". After `MAX_ATTEMPTS` the caller gets whatever was
//! collected, possibly nothing.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use regex::Regex;
use tracing::{debug, info, warn};

use crate::llm_client::prompts::{BULLET_SYSTEM, SENTINEL};
use crate::llm_client::{LlmError, TextGenerator};
use crate::tailoring::prompts::{
    BASE_PROMPT_TEMPLATE, FRESH_SUFFIX_TEMPLATE, RETRY_SUFFIX_TEMPLATE, TAILOR_SUFFIX_TEMPLATE,
};

/// Attempts per `generate` call, first try included.
pub const MAX_ATTEMPTS: u32 = 3;
/// Bullets that must be collected before attempts stop early.
pub const MIN_USABLE_BULLETS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationMode {
    /// Write 4-5 new bullets for a context.
    Fresh,
    /// Reword the given bullets around the keywords.
    Tailor,
}

#[derive(Clone)]
pub struct BulletGenerator {
    llm: Arc<dyn TextGenerator>,
    retry_delay: Duration,
}

impl BulletGenerator {
    pub fn new(llm: Arc<dyn TextGenerator>, retry_delay: Duration) -> Self {
        Self { llm, retry_delay }
    }

    /// Generates candidate bullets, accumulating across up to `MAX_ATTEMPTS` calls until
    /// at least `MIN_USABLE_BULLETS` distinct bullets are collected.
    pub async fn generate(
        &self,
        mode: GenerationMode,
        existing: Option<&[String]>,
        keywords: &str,
        context: &str,
        word_limit: usize,
    ) -> Vec<String> {
        let prompt = build_prompt(mode, existing, keywords, context, word_limit);
        let mut bullets: Vec<String> = Vec::new();

        for attempt in 1..=MAX_ATTEMPTS {
            let attempt_prompt = if attempt > 1 {
                format!(
                    "{prompt}{}",
                    RETRY_SUFFIX_TEMPLATE.replace("{attempt}", &attempt.to_string())
                )
            } else {
                prompt.clone()
            };

            debug!(context, attempt, "Requesting bullets");

            match self.llm.complete(&attempt_prompt, BULLET_SYSTEM).await {
                Ok(text) => {
                    for bullet in extract_bullets(&text) {
                        if !bullets.contains(&bullet) {
                            bullets.push(bullet);
                        }
                    }
                }
                Err(LlmError::EmptyContent) | Err(LlmError::Parse(_)) => {
                    warn!(context, attempt, "Completion envelope had no usable text");
                }
                Err(e) => {
                    warn!(context, attempt, error = %e, "Bullet generation attempt failed");
                    if attempt < MAX_ATTEMPTS {
                        tokio::time::sleep(self.retry_delay).await;
                    }
                }
            }

            if bullets.len() >= MIN_USABLE_BULLETS {
                break;
            }
        }

        info!(context, count = bullets.len(), "Bullet generation finished");
        bullets
    }
}

pub(crate) fn build_prompt(
    mode: GenerationMode,
    existing: Option<&[String]>,
    keywords: &str,
    context: &str,
    word_limit: usize,
) -> String {
    let base = BASE_PROMPT_TEMPLATE
        .replace("{keywords}", keywords)
        .replace("{word_limit}", &word_limit.to_string());

    let suffix = match mode {
        GenerationMode::Tailor => TAILOR_SUFFIX_TEMPLATE
            .replace("{existing_bullets}", &existing.unwrap_or_default().join("\n")),
        GenerationMode::Fresh => FRESH_SUFFIX_TEMPLATE.replace("{context}", context),
    };

    format!("{base}{suffix}")
}

// ────────────────────────────────────────────────────────────────────────────
// Output parsing
// ────────────────────────────────────────────────────────────────────────────

fn sentinel_line() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^>>(.+)$").expect("sentinel pattern is valid"))
}

fn trailing_parenthetical() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s*\([^)]*\)$").expect("parenthetical pattern is valid"))
}

fn leading_marker() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?:[-•*]\s*|\d+\.\s*)").expect("marker pattern is valid")
    })
}

fn leading_label() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Z][a-z]+:\s+").expect("label pattern is valid"))
}

fn past_tense_word() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Z][a-z]+d$").expect("verb pattern is valid"))
}

/// Extracts bullets from completion text: sentinel lines when present, otherwise the
/// lenient paragraph heuristic.
pub fn extract_bullets(text: &str) -> Vec<String> {
    let sentinel = extract_sentinel_lines(text);
    if !sentinel.is_empty() {
        return sentinel;
    }

    let fallback = extract_fallback(text);
    warn!(
        found = fallback.len(),
        "No sentinel-prefixed lines, used lenient extraction"
    );
    fallback
}

fn extract_sentinel_lines(text: &str) -> Vec<String> {
    sentinel_line()
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| clean_sentinel_bullet(m.as_str()))
        .filter(|b| !b.is_empty())
        .collect()
}

fn clean_sentinel_bullet(raw: &str) -> String {
    let without_emphasis = raw.trim().trim_start_matches(SENTINEL).trim().replace("**", "");
    trailing_parenthetical()
        .replace(&without_emphasis, "")
        .trim()
        .to_string()
}

fn extract_fallback(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|p| p.chars().count() > 10)
        .filter_map(|paragraph| {
            let unmarked = leading_marker().replace(paragraph, "");
            let cleaned = leading_label().replace(&unmarked, "").replace("**", "");
            let cleaned = cleaned.trim();

            let mut words = cleaned.split_whitespace();
            let first = words.next()?;
            let enough_words = cleaned.split_whitespace().count() > 3;
            (enough_words && past_tense_word().is_match(first)).then(|| cleaned.to_string())
        })
        .collect()
}
