//! Bullet Pool Cache — per-run candidate pools per section type and per position.
//!
//! Pools are insertion-ordered sets. They only grow during a run; `clear` is the sole way
//! to shrink them.

use std::collections::{BTreeMap, HashMap, HashSet};

use futures::future::join_all;
use tracing::{debug, info};

use crate::tailoring::bullet_generator::{BulletGenerator, GenerationMode};
use crate::tailoring::section::{PositionId, SectionType};

/// Insertion-ordered set of bullet texts.
#[derive(Debug, Clone, Default)]
pub struct BulletPool {
    order: Vec<String>,
    members: HashSet<String>,
}

impl BulletPool {
    /// Returns false when the bullet was already present.
    pub fn insert(&mut self, bullet: &str) -> bool {
        if !self.members.insert(bullet.to_string()) {
            return false;
        }
        self.order.push(bullet.to_string());
        true
    }

    pub fn contains(&self, bullet: &str) -> bool {
        self.members.contains(bullet)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn take(&self, count: usize) -> Vec<String> {
        self.order.iter().take(count).cloned().collect()
    }
}

type SeedKey = (String, String);

pub struct BulletPoolCache {
    generator: BulletGenerator,
    seeded: HashMap<SeedKey, BTreeMap<SectionType, Vec<String>>>,
    section_pools: HashMap<SectionType, BulletPool>,
    position_pools: HashMap<PositionId, BulletPool>,
    target_counts: HashMap<SectionType, usize>,
}

impl BulletPoolCache {
    pub fn new(generator: BulletGenerator) -> Self {
        Self {
            generator,
            seeded: HashMap::new(),
            section_pools: HashMap::new(),
            position_pools: HashMap::new(),
            target_counts: SectionType::ALL
                .iter()
                .map(|&section| (section, section.seed_target()))
                .collect(),
        }
    }

    pub fn generator(&self) -> &BulletGenerator {
        &self.generator
    }

    /// One concurrent fresh-generation call per section type, memoized by
    /// `(keywords, context)`. Each result is truncated to the section's target count for
    /// the return value, while every generated bullet joins the section pool.
    pub async fn generate_all_bullets(
        &mut self,
        keywords: &str,
        context: &str,
        word_limit: usize,
    ) -> BTreeMap<SectionType, Vec<String>> {
        let key = (keywords.to_string(), context.to_string());
        if let Some(cached) = self.seeded.get(&key) {
            debug!(context, "Seed bullets served from memo");
            return cached.clone();
        }

        let requests = SectionType::ALL.map(|section| {
            let generator = self.generator.clone();
            async move {
                let context = section.seed_context();
                let bullets = generator
                    .generate(GenerationMode::Fresh, None, keywords, &context, word_limit)
                    .await;
                (section, bullets)
            }
        });

        let mut seeded = BTreeMap::new();
        for (section, bullets) in join_all(requests).await {
            for bullet in &bullets {
                self.add_bullet_to_section(bullet, section);
            }
            let target = self.target_count(section);
            info!(section = %section, generated = bullets.len(), "Seeded section pool");
            seeded.insert(section, bullets.into_iter().take(target).collect::<Vec<_>>());
        }

        self.seeded.insert(key, seeded.clone());
        seeded
    }

    /// Up to `count` bullets of the section pool, in insertion order.
    pub fn get_bullets_for_section(&self, section: SectionType, count: usize) -> Vec<String> {
        self.section_pools
            .get(&section)
            .map(|pool| pool.take(count))
            .unwrap_or_default()
    }

    /// Up to `count` bullets of the position pool. The first access seeds the pool with a
    /// snapshot of the owning section pool; later section additions do not flow back in.
    pub fn get_bullets_for_position(&mut self, position: &PositionId, count: usize) -> Vec<String> {
        if !self.position_pools.contains_key(position) {
            let snapshot = self
                .section_pools
                .get(&position.section())
                .cloned()
                .unwrap_or_default();
            self.position_pools.insert(position.clone(), snapshot);
        }

        self.position_pools
            .get(position)
            .map(|pool| pool.take(count))
            .unwrap_or_default()
    }

    /// Adds to the position pool and mirrors into the owning section pool.
    pub fn add_bullet_to_position(&mut self, bullet: &str, position: &PositionId) {
        self.position_pools
            .entry(position.clone())
            .or_default()
            .insert(bullet);
        self.add_bullet_to_section(bullet, position.section());
    }

    pub fn add_bullet_to_section(&mut self, bullet: &str, section: SectionType) {
        self.section_pools.entry(section).or_default().insert(bullet);
    }

    pub fn section_pool_len(&self, section: SectionType) -> usize {
        self.section_pools.get(&section).map_or(0, BulletPool::len)
    }

    pub fn target_count(&self, section: SectionType) -> usize {
        self.target_counts
            .get(&section)
            .copied()
            .unwrap_or_else(|| section.seed_target())
    }

    pub fn set_target_count(&mut self, section: SectionType, count: usize) {
        self.target_counts.insert(section, count);
    }

    pub fn clear(&mut self) {
        self.seeded.clear();
        self.section_pools.clear();
        self.position_pools.clear();
        self.target_counts = SectionType::ALL
            .iter()
            .map(|&section| (section, section.seed_target()))
            .collect();
    }
}
