//! Word budgets derived from the bullets already present in the resume.

use std::collections::BTreeMap;

use crate::document::resume::{read_bullets, PositionSlot};
use crate::document::{DocumentError, DocumentTree};
use crate::tailoring::section::SectionType;

/// Word limit used when a section has no bullets to learn from.
pub const DEFAULT_WORD_LIMIT: usize = 15;

/// Counts words the way a reader would: punctuation and smart quotes ignored,
/// hyphenated compounds counted once.
pub fn count_words(bullet: &str) -> usize {
    bullet
        .chars()
        .filter(|c| !matches!(c, '\u{201C}' | '\u{201D}' | '.' | ',' | '!' | '?' | '(' | ')'))
        .collect::<String>()
        .split_whitespace()
        .count()
}

/// Rounded mean words-per-bullet for each section type, `DEFAULT_WORD_LIMIT` when empty.
pub fn section_word_limits<D: DocumentTree>(
    doc: &D,
    positions: &BTreeMap<SectionType, Vec<PositionSlot<D::Node>>>,
) -> Result<BTreeMap<SectionType, usize>, DocumentError> {
    let mut limits = BTreeMap::new();

    for section in SectionType::ALL {
        let mut total_words = 0usize;
        let mut bullet_count = 0usize;

        for slot in positions.get(&section).map(Vec::as_slice).unwrap_or_default() {
            for bullet in read_bullets(doc, slot.node)? {
                total_words += count_words(&bullet);
                bullet_count += 1;
            }
        }

        let limit = if bullet_count == 0 {
            DEFAULT_WORD_LIMIT
        } else {
            (total_words as f64 / bullet_count as f64).round() as usize
        };
        limits.insert(section, limit);
    }

    Ok(limits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{discover_positions, HtmlDocument};

    #[test]
    fn test_count_words_ignores_punctuation() {
        assert_eq!(count_words("Built (and shipped) a tool, fast!"), 6);
    }

    #[test]
    fn test_count_words_hyphenated_is_one_word() {
        assert_eq!(count_words("Led cross-functional team"), 3);
    }

    #[test]
    fn test_count_words_collapses_whitespace() {
        assert_eq!(count_words("  Cut   costs \n 40% "), 3);
        assert_eq!(count_words(""), 0);
    }

    #[test]
    fn test_section_word_limits_average_and_default() {
        let doc = HtmlDocument::parse(
            r#"<div class="job-details"><ul>
                 <li>Built a data pipeline</li>
                 <li>Led six engineers across three teams</li>
               </ul></div>"#,
        );
        let positions = discover_positions(&doc).unwrap();
        let limits = section_word_limits(&doc, &positions).unwrap();

        // (4 + 6) / 2
        assert_eq!(limits[&SectionType::Job], 5);
        assert_eq!(limits[&SectionType::Project], DEFAULT_WORD_LIMIT);
        assert_eq!(limits[&SectionType::Education], DEFAULT_WORD_LIMIT);
    }
}
