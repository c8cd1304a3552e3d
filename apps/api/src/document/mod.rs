//! Document adapter — the markup tree capability consumed by the populator and page-fit loop.
//!
//! The core only needs four things from a tree: find nodes, read their text, replace a
//! node's children with list items, and append a child. `HtmlDocument` provides them over
//! `scraper`; tests wrap it to inject failures.

pub mod html;
pub mod resume;
pub mod word_count;

use thiserror::Error;

pub use html::HtmlDocument;
pub use resume::{discover_positions, PositionSlot};

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("node is no longer part of the document")]
    MissingNode,

    #[error("invalid selector '{0}'")]
    Selector(String),

    #[error("cannot create <{0}> element")]
    Element(String),
}

/// Tree-query capability over a markup document.
pub trait DocumentTree {
    /// Opaque, copyable handle to one node of this document.
    type Node: Copy + Eq + std::fmt::Debug;

    /// All elements carrying `class`, in document order.
    fn select_by_class(&self, class: &str) -> Result<Vec<Self::Node>, DocumentError>;

    /// Descendants of `node` matching a CSS `selector`, in document order.
    fn select_within(
        &self,
        node: Self::Node,
        selector: &str,
    ) -> Result<Vec<Self::Node>, DocumentError>;

    /// Concatenated text content of `node`.
    fn text(&self, node: Self::Node) -> Result<String, DocumentError>;

    /// Replaces every child of `list` with one `<li>` per item.
    fn set_children(&mut self, list: Self::Node, items: &[String]) -> Result<(), DocumentError>;

    /// Appends a `<tag>` element to `parent`, with `text` as its only child when given.
    fn append(
        &mut self,
        parent: Self::Node,
        tag: &str,
        text: Option<&str>,
    ) -> Result<Self::Node, DocumentError>;

    /// Serializes the full document back to markup.
    fn to_markup(&self) -> String;
}
