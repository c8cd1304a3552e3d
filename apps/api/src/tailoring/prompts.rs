//! Prompt templates for bullet generation.
//!
//! Placeholders: `{keywords}`, `{word_limit}`, `{existing_bullets}`, `{context}`, `{attempt}`.

pub const BASE_PROMPT_TEMPLATE: &str = r#"Expert resume writer: Transform bullets into compelling achievements with quantifiable results while naturally incorporating ALL keywords.

CRITICAL REQUIREMENTS:
1) YOU MUST PREFIX EVERY BULLET POINT WITH ">>" - THIS IS ABSOLUTELY REQUIRED
2) Preserve EXACT numbers, metrics, and achievements (e.g., "increased efficiency by 45%" must stay exactly as "45%")
3) ENHANCE bullets with specific metrics/numbers where missing - add quantified impact (%, $, time saved, etc.)
4) Integrate ALL keywords ({keywords}) naturally into the flow
5) Each bullet starts with ">>" followed by a powerful action verb (avoid weak verbs like "helped", "worked on")
6) Keep within {word_limit} words unless preserving details requires more
7) NO buzzwords, cliches, or generic corporate speak (avoid: "synergy", "thinking outside the box", etc.)
8) Ensure each bullet in a section uses a DIFFERENT strong action verb

STRUCTURE (implicit, not explicit):
- Begin each bullet with a powerful, specific action verb (e.g., "Engineered" not "Created")
- Weave in context with clear, concise language
- Integrate keywords seamlessly without awkward placement
- End with concrete, quantifiable results showing impact

EXAMPLES:
Original: "Managed database optimization project"
Keywords: "Python, AWS"
CORRECT: ">>Engineered database optimization system using Python scripts and AWS infrastructure, reducing query latency by 60%"
WRONG: "Engineered database optimization system using Python and AWS" (missing ">>" prefix)
WRONG: ">>Managed database project (Python, AWS)" (artificial keyword placement, no metrics)

VALIDATION:
1. VERIFY EVERY BULLET STARTS WITH ">>"
2. Confirm ALL keywords appear naturally within context
3. Ensure each bullet starts with a unique, powerful action verb"#;

pub const TAILOR_SUFFIX_TEMPLATE: &str = r#"

INPUT BULLETS TO ENHANCE (integrate ALL keywords naturally):
{existing_bullets}

IMPORTANT: EVERY GENERATED BULLET MUST START WITH THE ">>" PREFIX! No exceptions."#;

pub const FRESH_SUFFIX_TEMPLATE: &str = r#"

Generate 4-5 achievement-focused bullets {context} with concrete metrics and varied action verbs.

IMPORTANT: EVERY GENERATED BULLET MUST START WITH THE ">>" PREFIX! No exceptions."#;

pub const RETRY_SUFFIX_TEMPLATE: &str = r#"

This is retry #{attempt}. Previous attempts didn't produce enough properly formatted bullets. REMEMBER: EVERY BULLET MUST START WITH ">>" - this is critical for processing."#;
