//! Section Populator — chooses and writes the bullet set of every position.
//!
//! Also hosts the two follow-up passes that touch already-populated positions:
//! `adjust_section` (trim or grow toward a new target while shrinking) and
//! `fill_empty_positions` (the final safety net).

use rand::rngs::StdRng;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::document::resume::{append_bullets, bullet_list, ensure_bullet_list, read_bullets};
use crate::document::{DocumentError, DocumentTree, PositionSlot};
use crate::tailoring::bullet_generator::GenerationMode;
use crate::tailoring::bullet_pool::BulletPoolCache;
use crate::tailoring::section::{PositionId, SectionType};
use crate::tailoring::tracker::{shuffle_bullets_with_verb_check, BulletTracker, VerbTracker};

/// Floor on bullets per position, for the page-fit loop and the top-up rule alike.
pub const MIN_BULLETS: usize = 3;

/// Everything a single tailoring run mutates, besides the document itself.
pub struct RunState {
    pub cache: BulletPoolCache,
    pub bullets: BulletTracker,
    pub verbs: VerbTracker,
    pub rng: StdRng,
}

impl RunState {
    pub fn new(cache: BulletPoolCache, rng: StdRng) -> Self {
        Self {
            cache,
            bullets: BulletTracker::new(),
            verbs: VerbTracker::new(),
            rng,
        }
    }
}

/// Positions of one section type that could not be processed. The rest of the section
/// was still populated.
#[derive(Debug, Error)]
#[error("{section} section: {} position(s) failed", failed.len())]
pub struct SectionFailure {
    pub section: SectionType,
    pub failed: Vec<PositionId>,
}

#[derive(Debug, Clone, Copy)]
pub struct PopulateOptions<'a> {
    pub keywords: &'a str,
    pub full_tailoring: bool,
    pub word_limit: usize,
    pub target: usize,
}

// ────────────────────────────────────────────────────────────────────────────
// Populate
// ────────────────────────────────────────────────────────────────────────────

/// Populates every position of `section` in source order. A failing position is logged
/// and skipped; the failures are reported together once the section is done.
pub async fn populate_section<D: DocumentTree>(
    doc: &mut D,
    run: &mut RunState,
    section: SectionType,
    slots: &[PositionSlot<D::Node>],
    options: PopulateOptions<'_>,
) -> Result<(), SectionFailure> {
    info!(
        section = %section,
        positions = slots.len(),
        target = options.target,
        "Populating section"
    );

    let mut failed = Vec::new();
    for slot in slots {
        if let Err(e) = populate_position(doc, run, slot, options).await {
            warn!(position = %slot.id, error = %e, "Failed to populate position");
            failed.push(slot.id.clone());
        }
    }

    if failed.is_empty() {
        Ok(())
    } else {
        Err(SectionFailure { section, failed })
    }
}

async fn populate_position<D: DocumentTree>(
    doc: &mut D,
    run: &mut RunState,
    slot: &PositionSlot<D::Node>,
    options: PopulateOptions<'_>,
) -> Result<(), DocumentError> {
    let id = &slot.id;
    let section = id.section();

    let list = ensure_bullet_list(doc, slot.node)?;
    let existing = read_bullets(doc, slot.node)?;

    let mut candidates = run.cache.get_bullets_for_position(id, options.target);
    let mut tailored = false;

    if options.full_tailoring && !existing.is_empty() {
        let generated = run
            .cache
            .generator()
            .generate(
                GenerationMode::Tailor,
                Some(existing.as_slice()),
                options.keywords,
                section.position_context(),
                options.word_limit,
            )
            .await;

        if generated.is_empty() {
            warn!(position = %id, "Tailoring produced no bullets, keeping pool candidates");
        } else {
            for bullet in &generated {
                run.cache.add_bullet_to_position(bullet, id);
            }
            candidates = generated;
            tailored = true;
        }
    }

    let mut chosen = usable_candidates(run, id, candidates, options.target, !tailored);

    if chosen.len() < MIN_BULLETS && !tailored {
        let context = if slot.label.is_empty() {
            section.position_context().to_string()
        } else {
            format!("{} at {}", section.position_context(), slot.label)
        };
        debug!(position = %id, usable = chosen.len(), "Topping up position pool");

        let extra = run
            .cache
            .generator()
            .generate(
                GenerationMode::Fresh,
                None,
                options.keywords,
                &context,
                options.word_limit,
            )
            .await;
        for bullet in &extra {
            run.cache.add_bullet_to_position(bullet, id);
        }
        chosen = usable_candidates(run, id, chosen, options.target, true);
    }

    let ordered = shuffle_bullets_with_verb_check(chosen, section, &mut run.verbs, &mut run.rng);

    doc.set_children(list, &ordered)?;
    for bullet in &ordered {
        run.bullets.add_bullet(bullet, id);
    }

    debug!(position = %id, bullets = ordered.len(), tailored, "Position populated");
    Ok(())
}

/// Keeps candidates this position may use, without repeats, up to `target`. With
/// `scan_pool`, candidates beyond the initial window are drawn from the position pool.
fn usable_candidates(
    run: &mut RunState,
    id: &PositionId,
    candidates: Vec<String>,
    target: usize,
    scan_pool: bool,
) -> Vec<String> {
    let mut chosen: Vec<String> = Vec::with_capacity(target);
    let pool = if scan_pool {
        run.cache.get_bullets_for_position(id, usize::MAX)
    } else {
        Vec::new()
    };

    for bullet in candidates.into_iter().chain(pool) {
        if chosen.len() >= target {
            break;
        }
        if run.bullets.can_use_bullet_in_section(&bullet, id) && !chosen.contains(&bullet) {
            chosen.push(bullet);
        }
    }
    chosen
}

// ────────────────────────────────────────────────────────────────────────────
// Adjust
// ────────────────────────────────────────────────────────────────────────────

/// Moves every position of `section` toward `target`: excess bullets are removed from
/// the end, missing ones are drawn from bullets of the position pool not used anywhere.
pub fn adjust_section<D: DocumentTree>(
    doc: &mut D,
    run: &mut RunState,
    section: SectionType,
    slots: &[PositionSlot<D::Node>],
    target: usize,
) -> Result<(), SectionFailure> {
    let mut failed = Vec::new();
    for slot in slots {
        if let Err(e) = adjust_position(doc, run, slot, target) {
            warn!(position = %slot.id, error = %e, "Failed to adjust position");
            failed.push(slot.id.clone());
        }
    }

    if failed.is_empty() {
        Ok(())
    } else {
        Err(SectionFailure { section, failed })
    }
}

fn adjust_position<D: DocumentTree>(
    doc: &mut D,
    run: &mut RunState,
    slot: &PositionSlot<D::Node>,
    target: usize,
) -> Result<(), DocumentError> {
    let current = read_bullets(doc, slot.node)?;

    if current.len() > target {
        if let Some(list) = bullet_list(doc, slot.node)? {
            doc.set_children(list, &current[..target])?;
        }
    } else if current.len() < target {
        let needed = target - current.len();
        let additions: Vec<String> = run
            .cache
            .get_bullets_for_position(&slot.id, usize::MAX)
            .into_iter()
            .filter(|bullet| !run.bullets.is_used(bullet))
            .take(needed)
            .collect();

        if !additions.is_empty() {
            append_bullets(doc, slot.node, &additions)?;
            for bullet in &additions {
                run.bullets.add_bullet(bullet, &slot.id);
            }
        }
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Safety net
// ────────────────────────────────────────────────────────────────────────────

/// Gives every empty position up to `MIN_BULLETS` section-pool bullets it may use.
/// Returns how many positions were changed. Never fails: problems are logged.
pub fn fill_empty_positions<D: DocumentTree>(
    doc: &mut D,
    run: &mut RunState,
    section: SectionType,
    slots: &[PositionSlot<D::Node>],
) -> usize {
    let mut filled = 0;

    for slot in slots {
        let current = match read_bullets(doc, slot.node) {
            Ok(bullets) => bullets,
            Err(e) => {
                warn!(position = %slot.id, error = %e, "Cannot inspect position bullets");
                continue;
            }
        };
        if !current.is_empty() {
            continue;
        }

        warn!(
            position = %slot.id,
            label = %slot.label,
            "Position has no bullets, applying emergency fill"
        );

        let emergency: Vec<String> = run
            .cache
            .get_bullets_for_section(section, usize::MAX)
            .into_iter()
            .filter(|bullet| run.bullets.can_use_bullet_in_section(bullet, &slot.id))
            .take(MIN_BULLETS)
            .collect();

        if emergency.is_empty() {
            warn!(position = %slot.id, "No emergency bullets available");
            continue;
        }

        match append_bullets(doc, slot.node, &emergency) {
            Ok(()) => {
                for bullet in &emergency {
                    run.bullets.add_bullet(bullet, &slot.id);
                }
                info!(position = %slot.id, added = emergency.len(), "Emergency bullets added");
                filled += 1;
            }
            Err(e) => warn!(position = %slot.id, error = %e, "Emergency fill failed"),
        }
    }

    filled
}
