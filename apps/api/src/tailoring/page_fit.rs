//! Page-Fit Controller — seed, populate, then render and shrink until the resume fits.
//!
//! # States
//! `Seed → Populate → Render → (fits: Done) | (overflows: Shrink → Render)`
//!
//! - At most `MAX_SHRINK_ITERATIONS` shrinks; the global target never drops below
//!   `MIN_BULLETS`. Overflow after the budget is reported, not failed.
//! - Per-position and per-section failures are logged and collected; only a renderer
//!   failure aborts the run.
//! - A final safety pass fills positions left empty, re-rendering when it changed
//!   anything so the returned PDF always matches the returned markup.

use std::collections::BTreeSet;

use bytes::Bytes;
use tracing::{info, warn};

use crate::document::word_count::{section_word_limits, DEFAULT_WORD_LIMIT};
use crate::document::{discover_positions, DocumentTree};
use crate::errors::AppError;
use crate::render::{PageRenderer, RenderedPage};
use crate::tailoring::bullet_generator::GenerationMode;
use crate::tailoring::populator::{
    adjust_section, fill_empty_positions, populate_section, PopulateOptions, RunState,
    MIN_BULLETS,
};
use crate::tailoring::section::SectionType;

/// Bullets per position on the first populate pass.
pub const INITIAL_BULLET_COUNT: usize = 6;
pub const MAX_SHRINK_ITERATIONS: u32 = 3;
/// Keywords used for seeding and tailoring unless full tailoring is requested.
pub const PARTIAL_KEYWORD_COUNT: usize = 5;
const SEED_CONTEXT: &str = "resume section";

#[derive(Debug, Clone)]
pub struct FitOutcome {
    pub pdf: Bytes,
    pub exceeds_one_page: bool,
    pub shrink_iterations: u32,
    pub renders: u32,
    pub failed_sections: Vec<SectionType>,
}

/// `max(MIN_BULLETS, floor(global_target × weight))`.
pub fn adjusted_target(section: SectionType, global_target: usize) -> usize {
    let weighted = (global_target as f64 * section.shrink_weight()).floor() as usize;
    weighted.max(MIN_BULLETS)
}

/// All keywords for full tailoring, otherwise the first `PARTIAL_KEYWORD_COUNT`.
pub fn keyword_string(keywords: &[String], full_tailoring: bool) -> String {
    let take = if full_tailoring {
        keywords.len()
    } else {
        keywords.len().min(PARTIAL_KEYWORD_COUNT)
    };
    keywords[..take].join(", ")
}

pub struct PageFitController<'r> {
    renderer: &'r dyn PageRenderer,
    run: RunState,
    keywords: String,
    full_tailoring: bool,
}

impl<'r> PageFitController<'r> {
    pub fn new(
        renderer: &'r dyn PageRenderer,
        run: RunState,
        keywords: &[String],
        full_tailoring: bool,
    ) -> Self {
        Self {
            renderer,
            run,
            keywords: keyword_string(keywords, full_tailoring),
            full_tailoring,
        }
    }

    pub async fn run<D: DocumentTree>(&mut self, doc: &mut D) -> Result<FitOutcome, AppError> {
        let positions = discover_positions(doc)?;
        let word_limits = section_word_limits(doc, &positions)?;
        let mut failed: BTreeSet<SectionType> = BTreeSet::new();

        // ── Seed ────────────────────────────────────────────────────────────
        self.seed(|section| positions.get(&section).is_some_and(|slots| !slots.is_empty()))
            .await;

        // ── Populate ────────────────────────────────────────────────────────
        for section in SectionType::ALL {
            let Some(slots) = positions.get(&section) else {
                continue;
            };
            let options = PopulateOptions {
                keywords: &self.keywords,
                full_tailoring: self.full_tailoring,
                word_limit: word_limits
                    .get(&section)
                    .copied()
                    .unwrap_or(DEFAULT_WORD_LIMIT),
                target: INITIAL_BULLET_COUNT,
            };
            if let Err(e) = populate_section(doc, &mut self.run, section, slots, options).await {
                warn!(error = %e, "Section population incomplete");
                failed.insert(section);
            }
        }

        // ── Render / shrink ─────────────────────────────────────────────────
        let mut global_target = INITIAL_BULLET_COUNT;
        let mut shrink_iterations = 0u32;
        let mut renders = 0u32;

        let mut page = loop {
            let page = self.render(doc).await?;
            renders += 1;

            if !page.exceeds_one_page() {
                info!(renders, shrink_iterations, "Resume fits on one page");
                break page;
            }
            if shrink_iterations >= MAX_SHRINK_ITERATIONS || global_target <= MIN_BULLETS {
                warn!(
                    renders,
                    shrink_iterations,
                    measured_height = page.measured_height,
                    "Resume still exceeds one page, returning it anyway"
                );
                break page;
            }

            global_target -= 1;
            shrink_iterations += 1;
            info!(global_target, iteration = shrink_iterations, "Shrinking bullet targets");

            for section in SectionType::ALL {
                let target = adjusted_target(section, global_target);
                self.run.cache.set_target_count(section, target);

                let Some(slots) = positions.get(&section) else {
                    continue;
                };
                if let Err(e) = adjust_section(doc, &mut self.run, section, slots, target) {
                    warn!(error = %e, "Section adjustment incomplete");
                    failed.insert(section);
                }
            }
        };

        // ── Safety net ──────────────────────────────────────────────────────
        let mut filled = 0;
        for section in SectionType::ALL {
            if let Some(slots) = positions.get(&section) {
                filled += fill_empty_positions(doc, &mut self.run, section, slots);
            }
        }
        if filled > 0 {
            page = self.render(doc).await?;
            renders += 1;
        }

        Ok(FitOutcome {
            exceeds_one_page: page.exceeds_one_page(),
            pdf: page.pdf,
            shrink_iterations,
            renders,
            failed_sections: failed.into_iter().collect(),
        })
    }

    /// Seeds every section pool concurrently, then tops up (sequentially) the sections
    /// that have positions but came back with fewer than `MIN_BULLETS`.
    async fn seed(&mut self, has_positions: impl Fn(SectionType) -> bool) {
        let seeded = self
            .run
            .cache
            .generate_all_bullets(&self.keywords, SEED_CONTEXT, DEFAULT_WORD_LIMIT)
            .await;

        for section in SectionType::ALL {
            let count = seeded.get(&section).map_or(0, Vec::len);
            if count >= MIN_BULLETS || !has_positions(section) {
                continue;
            }

            warn!(section = %section, count, "Not enough seed bullets, generating more");
            let extra = self
                .run
                .cache
                .generator()
                .generate(
                    GenerationMode::Fresh,
                    None,
                    &self.keywords,
                    &section.seed_context(),
                    DEFAULT_WORD_LIMIT,
                )
                .await;
            for bullet in &extra {
                self.run.cache.add_bullet_to_section(bullet, section);
            }
        }
    }

    async fn render<D: DocumentTree>(&self, doc: &D) -> Result<RenderedPage, AppError> {
        let markup = doc.to_markup();
        Ok(self.renderer.render(&markup).await?)
    }
}
