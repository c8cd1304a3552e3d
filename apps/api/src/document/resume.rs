//! Resume-shaped queries over a `DocumentTree`: positions, their labels and bullet lists.

use std::collections::BTreeMap;

use crate::document::{DocumentError, DocumentTree};
use crate::tailoring::section::{PositionId, SectionType};

/// One concrete resume entry located in the document.
#[derive(Debug, Clone)]
pub struct PositionSlot<N> {
    pub id: PositionId,
    pub node: N,
    pub label: String,
}

/// Finds every position of every section type, in source order within each type.
pub fn discover_positions<D: DocumentTree>(
    doc: &D,
) -> Result<BTreeMap<SectionType, Vec<PositionSlot<D::Node>>>, DocumentError> {
    let mut positions = BTreeMap::new();

    for section in SectionType::ALL {
        let nodes = doc.select_by_class(section.container_class())?;
        let mut slots = Vec::with_capacity(nodes.len());

        for (index, node) in nodes.into_iter().enumerate() {
            let label = match doc
                .select_within(node, &format!(".{}", section.label_class()))?
                .first()
            {
                Some(&label_node) => doc.text(label_node)?.trim().to_string(),
                None => String::new(),
            };
            slots.push(PositionSlot {
                id: PositionId::new(section, index, &label),
                node,
                label,
            });
        }
        positions.insert(section, slots);
    }

    Ok(positions)
}

/// First `<ul>` inside the position, if any.
pub fn bullet_list<D: DocumentTree>(
    doc: &D,
    position: D::Node,
) -> Result<Option<D::Node>, DocumentError> {
    Ok(doc.select_within(position, "ul")?.first().copied())
}

/// Returns the position's bullet list, appending an empty `<ul>` when it has none.
pub fn ensure_bullet_list<D: DocumentTree>(
    doc: &mut D,
    position: D::Node,
) -> Result<D::Node, DocumentError> {
    match bullet_list(doc, position)? {
        Some(list) => Ok(list),
        None => doc.append(position, "ul", None),
    }
}

/// Trimmed, non-empty bullet texts of the position.
pub fn read_bullets<D: DocumentTree>(
    doc: &D,
    position: D::Node,
) -> Result<Vec<String>, DocumentError> {
    let Some(list) = bullet_list(doc, position)? else {
        return Ok(Vec::new());
    };

    let mut bullets = Vec::new();
    for item in doc.select_within(list, "li")? {
        let text = doc.text(item)?.trim().to_string();
        if !text.is_empty() {
            bullets.push(text);
        }
    }
    Ok(bullets)
}

/// Appends bullets after the existing ones, creating the list if needed.
pub fn append_bullets<D: DocumentTree>(
    doc: &mut D,
    position: D::Node,
    bullets: &[String],
) -> Result<(), DocumentError> {
    let list = ensure_bullet_list(doc, position)?;
    for bullet in bullets {
        doc.append(list, "li", Some(bullet))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::HtmlDocument;

    const RESUME: &str = r#"<html><body>
        <div class="job-details"><span class="company-name">Acme Corp</span>
          <ul><li> Built pipelines </li><li></li><li>Led migrations</li></ul></div>
        <div class="job-details"><span class="company-name">Globex</span></div>
        <div class="project-details"><span class="project-title">Tiny Compiler</span>
          <ul><li>Wrote a parser</li></ul></div>
        <div class="education-details"><span class="school-name">State University</span></div>
        </body></html>"#;

    #[test]
    fn test_discover_positions_by_section() {
        let doc = HtmlDocument::parse(RESUME);
        let positions = discover_positions(&doc).unwrap();

        let jobs = &positions[&SectionType::Job];
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].id.as_str(), "job-0-acme-corp");
        assert_eq!(jobs[1].id.as_str(), "job-1-globex");
        assert_eq!(positions[&SectionType::Project][0].label, "Tiny Compiler");
        assert_eq!(
            positions[&SectionType::Education][0].id.as_str(),
            "education-0-state-university"
        );
    }

    #[test]
    fn test_read_bullets_trims_and_skips_empty() {
        let doc = HtmlDocument::parse(RESUME);
        let positions = discover_positions(&doc).unwrap();
        let acme = positions[&SectionType::Job][0].node;

        assert_eq!(
            read_bullets(&doc, acme).unwrap(),
            vec!["Built pipelines", "Led migrations"]
        );
    }

    #[test]
    fn test_read_bullets_without_list_is_empty() {
        let doc = HtmlDocument::parse(RESUME);
        let positions = discover_positions(&doc).unwrap();
        let globex = positions[&SectionType::Job][1].node;
        assert!(read_bullets(&doc, globex).unwrap().is_empty());
    }

    #[test]
    fn test_append_bullets_creates_missing_list_once() {
        let mut doc = HtmlDocument::parse(RESUME);
        let positions = discover_positions(&doc).unwrap();
        let globex = positions[&SectionType::Job][1].node;

        append_bullets(&mut doc, globex, &["Shipped billing".to_string()]).unwrap();
        append_bullets(&mut doc, globex, &["Cut churn 12%".to_string()]).unwrap();

        assert_eq!(
            read_bullets(&doc, globex).unwrap(),
            vec!["Shipped billing", "Cut churn 12%"]
        );
        assert_eq!(doc.select_within(globex, "ul").unwrap().len(), 1);
    }
}
