//! Per-run bookkeeping of which bullets and opening verbs have been used, and where.

use std::collections::{HashMap, HashSet};

use rand::seq::SliceRandom;
use rand::Rng;

use crate::tailoring::section::{PositionId, SectionType};

/// Random permutations tried before settling for the last one.
pub const MAX_SHUFFLE_ATTEMPTS: usize = 10;

// ────────────────────────────────────────────────────────────────────────────
// Bullet ownership
// ────────────────────────────────────────────────────────────────────────────

/// Records the position each bullet was first written into.
///
/// A bullet owned by position P may be written into P again but never into any other position.
#[derive(Debug, Default)]
pub struct BulletTracker {
    owners: HashMap<String, PositionId>,
    used: HashSet<String>,
}

impl BulletTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records first-use ownership. Later calls for an already-owned bullet change nothing.
    pub fn add_bullet(&mut self, text: &str, position: &PositionId) {
        self.owners
            .entry(text.to_string())
            .or_insert_with(|| position.clone());
        self.used.insert(text.to_string());
    }

    pub fn can_use_bullet_in_section(&self, text: &str, position: &PositionId) -> bool {
        match self.owners.get(text) {
            None => true,
            Some(owner) => owner == position,
        }
    }

    pub fn is_used(&self, text: &str) -> bool {
        self.used.contains(text)
    }

    pub fn owner(&self, text: &str) -> Option<&PositionId> {
        self.owners.get(text)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Opening verbs
// ────────────────────────────────────────────────────────────────────────────

/// Opening verbs chosen so far, per section type and globally. Verbs are stored lower-cased.
#[derive(Debug, Default)]
pub struct VerbTracker {
    by_section: HashMap<SectionType, HashSet<String>>,
    global: HashSet<String>,
}

impl VerbTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_verb(&mut self, verb: &str, section: SectionType) {
        let verb = verb.to_lowercase();
        self.by_section
            .entry(section)
            .or_default()
            .insert(verb.clone());
        self.global.insert(verb);
    }

    pub fn is_verb_used_in_section(&self, verb: &str, section: SectionType) -> bool {
        self.by_section
            .get(&section)
            .is_some_and(|verbs| verbs.contains(&verb.to_lowercase()))
    }

    pub fn is_verb_used_globally(&self, verb: &str) -> bool {
        self.global.contains(&verb.to_lowercase())
    }
}

/// First whitespace-delimited token of a bullet, lower-cased.
pub fn leading_verb(bullet: &str) -> String {
    bullet
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_lowercase()
}

/// Whether an ordering satisfies both verb rules: no two adjacent bullets open with the
/// same verb, and the opening verb has not already opened another position.
pub fn is_verb_arrangement_valid(bullets: &[String], verbs: &VerbTracker) -> bool {
    let Some(first) = bullets.first() else {
        return true;
    };
    if verbs.is_verb_used_globally(&leading_verb(first)) {
        return false;
    }
    bullets
        .windows(2)
        .all(|pair| leading_verb(&pair[0]) != leading_verb(&pair[1]))
}

/// Randomly permutes `bullets` looking for an arrangement that passes
/// `is_verb_arrangement_valid`, trying at most `MAX_SHUFFLE_ATTEMPTS` permutations.
///
/// Best effort: when no attempt qualifies the last permutation is returned as-is.
/// Either way the opening verb of the returned order is recorded in `verbs`.
pub fn shuffle_bullets_with_verb_check<R: Rng + ?Sized>(
    mut bullets: Vec<String>,
    section: SectionType,
    verbs: &mut VerbTracker,
    rng: &mut R,
) -> Vec<String> {
    if bullets.is_empty() {
        return bullets;
    }

    for _ in 0..MAX_SHUFFLE_ATTEMPTS {
        bullets.shuffle(rng);
        if is_verb_arrangement_valid(&bullets, verbs) {
            break;
        }
    }

    verbs.add_verb(&leading_verb(&bullets[0]), section);
    bullets
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn pid(section: SectionType, index: usize, label: &str) -> PositionId {
        PositionId::new(section, index, label)
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    // ── BulletTracker ───────────────────────────────────────────────────────

    #[test]
    fn test_unseen_bullet_is_usable_anywhere() {
        let tracker = BulletTracker::new();
        assert!(tracker.can_use_bullet_in_section("Built X", &pid(SectionType::Job, 0, "Acme")));
        assert!(!tracker.is_used("Built X"));
    }

    #[test]
    fn test_bullet_reusable_only_in_owner() {
        let acme = pid(SectionType::Job, 0, "Acme");
        let globex = pid(SectionType::Job, 1, "Globex");
        let mut tracker = BulletTracker::new();

        tracker.add_bullet("Built X", &acme);

        assert!(tracker.can_use_bullet_in_section("Built X", &acme));
        assert!(!tracker.can_use_bullet_in_section("Built X", &globex));
        assert!(tracker.is_used("Built X"));
    }

    #[test]
    fn test_first_owner_wins() {
        let acme = pid(SectionType::Job, 0, "Acme");
        let globex = pid(SectionType::Job, 1, "Globex");
        let mut tracker = BulletTracker::new();

        tracker.add_bullet("Built X", &acme);
        tracker.add_bullet("Built X", &globex);

        assert_eq!(tracker.owner("Built X"), Some(&acme));
        assert!(!tracker.can_use_bullet_in_section("Built X", &globex));
    }

    #[test]
    fn test_bullet_identity_is_case_sensitive() {
        let acme = pid(SectionType::Job, 0, "Acme");
        let globex = pid(SectionType::Job, 1, "Globex");
        let mut tracker = BulletTracker::new();

        tracker.add_bullet("Built X", &acme);
        assert!(tracker.can_use_bullet_in_section("built x", &globex));
    }

    // ── VerbTracker ─────────────────────────────────────────────────────────

    #[test]
    fn test_add_verb_records_lowercase_in_both_sets() {
        let mut verbs = VerbTracker::new();
        verbs.add_verb("Engineered", SectionType::Job);

        assert!(verbs.is_verb_used_in_section("engineered", SectionType::Job));
        assert!(verbs.is_verb_used_globally("ENGINEERED"));
        assert!(!verbs.is_verb_used_in_section("engineered", SectionType::Project));
    }

    #[test]
    fn test_leading_verb() {
        assert_eq!(leading_verb("  Spearheaded the rewrite"), "spearheaded");
        assert_eq!(leading_verb(""), "");
    }

    // ── arrangement rules ───────────────────────────────────────────────────

    #[test]
    fn test_adjacent_repeat_is_invalid() {
        let verbs = VerbTracker::new();
        assert!(!is_verb_arrangement_valid(
            &strings(&["Led A", "led B", "Built C"]),
            &verbs
        ));
        assert!(is_verb_arrangement_valid(
            &strings(&["Led A", "Built C", "Led B"]),
            &verbs
        ));
    }

    #[test]
    fn test_globally_used_opening_verb_is_invalid() {
        let mut verbs = VerbTracker::new();
        verbs.add_verb("led", SectionType::Job);
        assert!(!is_verb_arrangement_valid(&strings(&["Led A", "Built B"]), &verbs));
        assert!(is_verb_arrangement_valid(&strings(&["Built B", "Led A"]), &verbs));
    }

    // ── shuffle_bullets_with_verb_check ─────────────────────────────────────

    #[test]
    fn test_shuffle_empty_records_nothing() {
        let mut verbs = VerbTracker::new();
        let mut rng = StdRng::seed_from_u64(7);
        let out =
            shuffle_bullets_with_verb_check(Vec::new(), SectionType::Job, &mut verbs, &mut rng);
        assert!(out.is_empty());
        assert!(!verbs.is_verb_used_in_section("", SectionType::Job));
    }

    #[test]
    fn test_shuffle_is_a_permutation() {
        let input = strings(&["Led A", "Built B", "Cut C", "Drove D"]);
        let mut verbs = VerbTracker::new();
        let mut rng = StdRng::seed_from_u64(42);

        let mut out =
            shuffle_bullets_with_verb_check(input.clone(), SectionType::Job, &mut verbs, &mut rng);
        let opener = leading_verb(&out[0]);
        assert!(verbs.is_verb_used_globally(&opener));

        out.sort();
        let mut expected = input;
        expected.sort();
        assert_eq!(out, expected);
    }

    #[test]
    fn test_shuffle_records_opener_even_when_unsatisfiable() {
        // Every bullet opens with the same verb, so no attempt can qualify.
        let input = strings(&["Led A", "Led B", "Led C"]);
        let mut verbs = VerbTracker::new();
        let mut rng = StdRng::seed_from_u64(1);

        let out =
            shuffle_bullets_with_verb_check(input, SectionType::Project, &mut verbs, &mut rng);
        assert_eq!(out.len(), 3);
        assert!(verbs.is_verb_used_in_section("led", SectionType::Project));
    }

    #[test]
    fn test_shuffle_avoids_adjacent_verbs_with_high_probability() {
        // Only the alternating patterns ABAB / BABA are valid: 8 of 24 permutations.
        let input = strings(&["Led alpha", "Led beta", "Built gamma", "Built delta"]);
        let trials = 300u64;
        let mut successes = 0u64;

        for seed in 0..trials {
            let mut verbs = VerbTracker::new();
            let mut rng = StdRng::seed_from_u64(seed);
            let out = shuffle_bullets_with_verb_check(
                input.clone(),
                SectionType::Job,
                &mut verbs,
                &mut rng,
            );
            if out
                .windows(2)
                .all(|pair| leading_verb(&pair[0]) != leading_verb(&pair[1]))
            {
                successes += 1;
            }
        }

        let rate = successes as f64 / trials as f64;
        assert!(rate > 0.9, "success rate {rate} should exceed 90%");
    }

    #[test]
    fn test_shuffle_prefers_unused_opening_verb() {
        let input = strings(&["Led alpha", "Built beta"]);
        let mut hits = 0;
        for seed in 0..100u64 {
            let mut verbs = VerbTracker::new();
            verbs.add_verb("led", SectionType::Project);
            let mut rng = StdRng::seed_from_u64(seed);
            let out = shuffle_bullets_with_verb_check(
                input.clone(),
                SectionType::Job,
                &mut verbs,
                &mut rng,
            );
            if leading_verb(&out[0]) == "built" {
                hits += 1;
            }
        }
        // Each attempt succeeds with p = 1/2, so 10 attempts miss with p < 0.1%.
        assert!(hits >= 95, "opened with an unused verb in {hits}/100 runs");
    }
}
