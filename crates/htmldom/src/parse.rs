//! HTML input adapter
//!
//! Parsing is html5ever's job. This module copies the resulting `RcDom`
//! into a [`DomArena`] so the query layer works over plain indices:
//!
//! ```text
//! &str / Read → html5ever → RcDom (Rc<Node>) → DomArena (Vec<DomNode>)
//! ```

use crate::arena::DomArena;
use crate::config::LoaderConfig;
use crate::error::Result;
use crate::types::{Attribute, DomNode, NodeId, NodeType};
use html5ever::tendril::TendrilSink;
use html5ever::{local_name, namespace_url, ns, ParseOpts, QualName};
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use std::io::Read;
use tracing::debug;

/// Builds arenas from HTML text
#[derive(Debug, Clone, Default)]
pub struct HtmlLoader {
    config: LoaderConfig,
}

impl HtmlLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: LoaderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Parse a complete document; the arena root is the `#document` node
    pub fn parse_document(&self, html: &str) -> Result<DomArena> {
        let dom = html5ever::parse_document(RcDom::default(), ParseOpts::default()).one(html);
        self.build(&dom.document)
    }

    /// Parse a complete document from a byte stream (UTF-8)
    pub fn parse_reader<R: Read>(&self, reader: &mut R) -> Result<DomArena> {
        let dom = html5ever::parse_document(RcDom::default(), ParseOpts::default())
            .from_utf8()
            .read_from(reader)?;
        self.build(&dom.document)
    }

    /// Parse markup as the content of a `<body>`
    ///
    /// The arena root is a synthetic `#document` node whose children are the
    /// fragment's top-level nodes.
    pub fn parse_fragment(&self, html: &str) -> Result<DomArena> {
        let context = QualName::new(None, ns!(html), local_name!("body"));
        let dom = html5ever::parse_fragment(RcDom::default(), ParseOpts::default(), context, vec![])
            .one(html);

        // html5ever wraps the fragment in an <html> element under the document
        let wrapper = dom
            .document
            .children
            .borrow()
            .iter()
            .find(|child| matches!(child.data, NodeData::Element { .. }))
            .cloned();

        match wrapper {
            Some(html) => self.build(&html),
            None => self.build(&dom.document),
        }
    }

    /// Copy the children of `top` under a fresh `#document` root
    fn build(&self, top: &Handle) -> Result<DomArena> {
        let mut arena = DomArena::with_capacity(self.config.initial_capacity);
        let root_id = arena.add_node(DomNode::document());
        arena.set_root(root_id)?;

        let mut stack: Vec<(Handle, NodeId, usize)> = child_handles(top)
            .into_iter()
            .rev()
            .map(|child| (child, root_id, 1))
            .collect();

        while let Some((handle, parent_id, depth)) = stack.pop() {
            self.config.check_depth(depth)?;

            let Some(node) = self.convert(&handle) else {
                continue;
            };
            let node_id = arena.append_child(parent_id, node)?;

            for child in child_handles(&handle).into_iter().rev() {
                stack.push((child, node_id, depth + 1));
            }
        }

        debug!(nodes = arena.len(), "built DOM arena from HTML");
        Ok(arena)
    }

    /// Map one html5ever node, `None` when the config filters it out
    fn convert(&self, handle: &Handle) -> Option<DomNode> {
        match &handle.data {
            NodeData::Document => Some(DomNode::document()),
            NodeData::Doctype { name, .. } => {
                Some(DomNode::new(NodeType::DocumentType, name.to_string()))
            }
            NodeData::Text { contents } => {
                let contents = contents.borrow();
                let text: &str = &contents;
                self.config
                    .keeps_text(text)
                    .then(|| DomNode::text(text))
            }
            NodeData::Comment { contents } => self
                .config
                .include_comments
                .then(|| DomNode::comment(contents.to_string())),
            NodeData::Element { name, attrs, .. } => {
                let mut node = DomNode::element(name.local.to_string());
                node.attributes = attrs
                    .borrow()
                    .iter()
                    .map(|a| Attribute::new(a.name.local.to_string(), a.value.to_string()))
                    .collect();
                Some(node)
            }
            NodeData::ProcessingInstruction { target, contents } => {
                let mut node = DomNode::new(NodeType::ProcessingInstruction, target.to_string());
                node.node_value = contents.to_string();
                Some(node)
            }
        }
    }
}

/// Children of a node, with `<template>` content spliced in as children
fn child_handles(handle: &Handle) -> Vec<Handle> {
    let mut children: Vec<Handle> = handle.children.borrow().clone();
    if let NodeData::Element {
        template_contents, ..
    } = &handle.data
    {
        if let Some(contents) = template_contents.borrow().as_ref() {
            children.extend(contents.children.borrow().iter().cloned());
        }
    }
    children
}

/// Parse a document with the default configuration
pub fn parse_document(html: &str) -> Result<DomArena> {
    HtmlLoader::new().parse_document(html)
}

/// Parse a body fragment with the default configuration
pub fn parse_fragment(html: &str) -> Result<DomArena> {
    HtmlLoader::new().parse_fragment(html)
}

/// Parse a document from a UTF-8 byte stream with the default configuration
pub fn parse_document_from_reader<R: Read>(reader: &mut R) -> Result<DomArena> {
    HtmlLoader::new().parse_reader(reader)
}
