//! Section types and position identity.

use std::fmt;

/// The closed set of resume section kinds that carry bullet lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SectionType {
    Job,
    Project,
    Education,
}

impl SectionType {
    /// Processing order: jobs first, they carry the most weight on the page.
    pub const ALL: [SectionType; 3] =
        [SectionType::Job, SectionType::Project, SectionType::Education];

    pub fn as_str(self) -> &'static str {
        match self {
            SectionType::Job => "job",
            SectionType::Project => "project",
            SectionType::Education => "education",
        }
    }

    /// Class of the element wrapping one position of this type.
    pub fn container_class(self) -> &'static str {
        match self {
            SectionType::Job => "job-details",
            SectionType::Project => "project-details",
            SectionType::Education => "education-details",
        }
    }

    /// Class of the element naming the position (company, project, school).
    pub fn label_class(self) -> &'static str {
        match self {
            SectionType::Job => "company-name",
            SectionType::Project => "project-title",
            SectionType::Education => "school-name",
        }
    }

    /// Context phrase for fresh generation when seeding the section pool.
    pub fn seed_context(self) -> String {
        format!("for {} experience", self.as_str())
    }

    /// Context phrase used when working on one concrete position of this type.
    pub fn position_context(self) -> &'static str {
        match self {
            SectionType::Job => "for a job experience",
            SectionType::Project => "for a project",
            SectionType::Education => "for education",
        }
    }

    /// Share of the global bullet target this section keeps while shrinking.
    pub fn shrink_weight(self) -> f64 {
        match self {
            SectionType::Job => 1.0,
            SectionType::Project | SectionType::Education => 0.8,
        }
    }

    /// Per-entry truncation applied to the seeded pool.
    pub fn seed_target(self) -> usize {
        match self {
            SectionType::Job => 7,
            SectionType::Project => 6,
            SectionType::Education => 5,
        }
    }
}

impl fmt::Display for SectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of one concrete resume entry for the duration of a run.
///
/// Rendered as `{section}-{index}-{slug}` where the slug is the entry label with
/// whitespace runs replaced by `-` and lower-cased.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PositionId {
    section: SectionType,
    key: String,
}

impl PositionId {
    pub fn new(section: SectionType, index: usize, label: &str) -> Self {
        let slug = label.split_whitespace().collect::<Vec<_>>().join("-").to_lowercase();
        Self {
            section,
            key: format!("{}-{}-{}", section.as_str(), index, slug),
        }
    }

    pub fn section(&self) -> SectionType {
        self.section
    }

    pub fn as_str(&self) -> &str {
        &self.key
    }
}

impl fmt::Display for PositionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}
