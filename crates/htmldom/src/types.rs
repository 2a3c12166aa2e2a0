//! Core node types
//!
//! Key design principles:
//! 1. Use u32 for indices (4 bytes vs 8 bytes pointer)
//! 2. Keep attributes in source order, duplicates included
//! 3. Use SmallVec for small arrays (avoid heap allocation)

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Node identifier (index into arena)
/// u32 allows 4 billion nodes, enough for any webpage
pub type NodeId = u32;

/// Node type matching DOM specification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum NodeType {
    Element = 1,
    Attribute = 2,
    Text = 3,
    CdataSection = 4,
    EntityReference = 5,
    Entity = 6,
    ProcessingInstruction = 7,
    Comment = 8,
    Document = 9,
    DocumentType = 10,
    DocumentFragment = 11,
    Notation = 12,
}

impl NodeType {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(NodeType::Element),
            2 => Some(NodeType::Attribute),
            3 => Some(NodeType::Text),
            4 => Some(NodeType::CdataSection),
            5 => Some(NodeType::EntityReference),
            6 => Some(NodeType::Entity),
            7 => Some(NodeType::ProcessingInstruction),
            8 => Some(NodeType::Comment),
            9 => Some(NodeType::Document),
            10 => Some(NodeType::DocumentType),
            11 => Some(NodeType::DocumentFragment),
            12 => Some(NodeType::Notation),
            _ => None,
        }
    }
}

/// One `name="value"` pair on an element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// The main DOM tree node structure
///
/// Small fixed-size fields first, navigation by index instead of pointer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomNode {
    pub node_type: NodeType,

    // Navigation indices
    pub parent_id: Option<NodeId>,
    pub children_ids: SmallVec<[NodeId; 4]>, // Most nodes have <4 children

    /// Tag name for elements, `#text` / `#comment` / `#document` otherwise
    pub node_name: String,
    /// Character data for text and comment nodes
    pub node_value: String,
    pub attributes: SmallVec<[Attribute; 4]>,

    /// Stable id assigned by the browser (CDP input only)
    pub backend_node_id: Option<u32>,
}

impl DomNode {
    /// Create a detached node with no attributes or children
    pub fn new(node_type: NodeType, node_name: impl Into<String>) -> Self {
        Self {
            node_type,
            parent_id: None,
            children_ids: SmallVec::new(),
            node_name: node_name.into(),
            node_value: String::new(),
            attributes: SmallVec::new(),
            backend_node_id: None,
        }
    }

    pub fn element(tag: impl Into<String>) -> Self {
        Self::new(NodeType::Element, tag)
    }

    pub fn text(content: impl Into<String>) -> Self {
        let mut node = Self::new(NodeType::Text, "#text");
        node.node_value = content.into();
        node
    }

    pub fn comment(content: impl Into<String>) -> Self {
        let mut node = Self::new(NodeType::Comment, "#comment");
        node.node_value = content.into();
        node
    }

    pub fn document() -> Self {
        Self::new(NodeType::Document, "#document")
    }

    /// Builder-style attribute append, keeps earlier pairs with the same name
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push(Attribute::new(name, value));
        self
    }

    /// Get tag name for element nodes
    pub fn tag_name(&self) -> Option<&str> {
        if self.node_type == NodeType::Element {
            Some(&self.node_name)
        } else {
            None
        }
    }

    /// Check if node is an element
    pub fn is_element(&self) -> bool {
        self.node_type == NodeType::Element
    }

    /// Check if node is text
    pub fn is_text(&self) -> bool {
        self.node_type == NodeType::Text
    }

    /// Value of the first attribute named `name` (exact, case-sensitive)
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_type_roundtrip() {
        assert_eq!(NodeType::from_u8(1), Some(NodeType::Element));
        assert_eq!(NodeType::from_u8(9), Some(NodeType::Document));
        assert_eq!(NodeType::from_u8(0), None);
        assert_eq!(NodeType::from_u8(13), None);
    }

    #[test]
    fn test_attr_first_wins() {
        let node = DomNode::element("a")
            .with_attr("href", "/one")
            .with_attr("HREF", "/upper")
            .with_attr("href", "/two");

        assert_eq!(node.attr("href"), Some("/one"));
        assert_eq!(node.attr("HREF"), Some("/upper"));
        assert_eq!(node.attr("title"), None);
    }

    #[test]
    fn test_tag_name_only_for_elements() {
        assert_eq!(DomNode::element("div").tag_name(), Some("div"));
        assert_eq!(DomNode::text("div").tag_name(), None);
        assert!(DomNode::text("x").is_text());
        assert!(!DomNode::comment("x").is_element());
    }
}
