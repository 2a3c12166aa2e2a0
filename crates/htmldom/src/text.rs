//! Text extraction from a subtree

use crate::arena::DomArena;
use crate::types::{NodeId, NodeType};

/// Rendered text of the descendants of `node_id`
///
/// Walks the children of `node_id` in document order:
/// - text nodes contribute their content verbatim
/// - a `br` element contributes `"\n"` and is not descended into
/// - a `script` element contributes nothing, descendants included
/// - any other element contributes its own inner text
///
/// The tag of `node_id` itself is not inspected. An unknown id yields `""`.
pub fn inner_text(arena: &DomArena, node_id: NodeId) -> String {
    let mut text = String::new();
    let Ok(root) = arena.get(node_id) else {
        return text;
    };

    let mut stack: Vec<NodeId> = root.children_ids.iter().rev().copied().collect();

    while let Some(id) = stack.pop() {
        let Ok(node) = arena.get(id) else {
            continue;
        };

        match node.node_type {
            NodeType::Text => text.push_str(&node.node_value),
            NodeType::Element => match node.node_name.as_str() {
                "br" => text.push('\n'),
                "script" => {}
                _ => stack.extend(node.children_ids.iter().rev().copied()),
            },
            _ => {}
        }
    }

    text
}

/// Every text node under `node_id` concatenated in document order
///
/// Unlike [`inner_text`] nothing is filtered: script bodies are included and
/// `br` adds nothing. Mirrors the DOM `textContent` property.
pub fn text_content(arena: &DomArena, node_id: NodeId) -> String {
    let mut text = String::new();

    for (_, node) in arena.descendants(node_id) {
        if node.node_type == NodeType::Text {
            text.push_str(&node.node_value);
        }
    }

    text
}
