//! `DocumentTree` over an html5ever tree parsed by `scraper`.
//!
//! `scraper::Html` is `!Send` (its strings are non-atomic tendrils), so an `HtmlDocument`
//! must stay on the thread that parsed it. The pipeline drives it from a blocking thread.

use ego_tree::NodeId;
use scraper::node::Text;
use scraper::{ElementRef, Html, Node, Selector};

use crate::document::{DocumentError, DocumentTree};

pub struct HtmlDocument {
    html: Html,
}

impl HtmlDocument {
    pub fn parse(markup: &str) -> Self {
        Self {
            html: Html::parse_document(markup),
        }
    }

    fn element(&self, id: NodeId) -> Result<ElementRef<'_>, DocumentError> {
        self.html
            .tree
            .get(id)
            .and_then(ElementRef::wrap)
            .ok_or(DocumentError::MissingNode)
    }
}

impl DocumentTree for HtmlDocument {
    type Node = NodeId;

    fn select_by_class(&self, class: &str) -> Result<Vec<NodeId>, DocumentError> {
        let selector = parse_selector(&format!(".{class}"))?;
        let nodes: Vec<NodeId> = self.html.select(&selector).map(|el| el.id()).collect();
        Ok(nodes)
    }

    fn select_within(&self, node: NodeId, selector: &str) -> Result<Vec<NodeId>, DocumentError> {
        let selector = parse_selector(selector)?;
        let element = self.element(node)?;
        let nodes: Vec<NodeId> = element.select(&selector).map(|el| el.id()).collect();
        Ok(nodes)
    }

    fn text(&self, node: NodeId) -> Result<String, DocumentError> {
        let element = self.element(node)?;
        let text: String = element.text().collect();
        Ok(text)
    }

    fn set_children(&mut self, list: NodeId, items: &[String]) -> Result<(), DocumentError> {
        let li = element_node("li")?;
        let mut list_node = self
            .html
            .tree
            .get_mut(list)
            .ok_or(DocumentError::MissingNode)?;

        while let Some(mut child) = list_node.first_child() {
            child.detach();
        }

        for item in items {
            let mut item_node = list_node.append(li.clone());
            item_node.append(text_node(item));
        }
        Ok(())
    }

    fn append(
        &mut self,
        parent: NodeId,
        tag: &str,
        text: Option<&str>,
    ) -> Result<NodeId, DocumentError> {
        let element = element_node(tag)?;
        let mut parent_node = self
            .html
            .tree
            .get_mut(parent)
            .ok_or(DocumentError::MissingNode)?;

        let mut child = parent_node.append(element);
        if let Some(text) = text {
            child.append(text_node(text));
        }
        Ok(child.id())
    }

    fn to_markup(&self) -> String {
        self.html.html()
    }
}

fn parse_selector(selector: &str) -> Result<Selector, DocumentError> {
    Selector::parse(selector).map_err(|_| DocumentError::Selector(selector.to_string()))
}

/// Builds a detached element node by parsing a one-element fragment.
fn element_node(tag: &str) -> Result<Node, DocumentError> {
    let fragment = Html::parse_fragment(&format!("<{tag}></{tag}>"));
    let selector = parse_selector(tag)?;
    let element = fragment
        .select(&selector)
        .next()
        .map(|el| Node::Element(el.value().clone()));
    element.ok_or_else(|| DocumentError::Element(tag.to_string()))
}

fn text_node(text: &str) -> Node {
    Node::Text(Text { text: text.into() })
}
