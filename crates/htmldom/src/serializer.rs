//! DOM Serializer - render a subtree back to HTML markup
//!
//! Used to inspect query results: `outer_html` for a node including its own
//! tags, `inner_html` for its children only.

use crate::arena::DomArena;
use crate::types::{DomNode, NodeId, NodeType};

/// Elements that never have an end tag
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

/// Elements whose text children are written without escaping
const RAW_TEXT_ELEMENTS: &[&str] = &[
    "script", "style", "xmp", "iframe", "noembed", "noframes", "plaintext",
];

/// Serializer configuration
#[derive(Debug, Clone)]
pub struct SerializerConfig {
    pub include_comments: bool,
    /// Truncate each text node to this many characters, appending `...`
    pub max_text_length: Option<usize>,
}

impl Default for SerializerConfig {
    fn default() -> Self {
        Self {
            include_comments: true,
            max_text_length: None,
        }
    }
}

pub struct DomSerializer {
    config: SerializerConfig,
}

enum Step {
    Open(NodeId),
    Close(NodeId),
}

impl DomSerializer {
    pub fn new() -> Self {
        Self::with_config(SerializerConfig::default())
    }

    pub fn with_config(config: SerializerConfig) -> Self {
        Self { config }
    }

    /// Markup of `node_id` and its subtree; `""` for an unknown id
    pub fn outer_html(&self, arena: &DomArena, node_id: NodeId) -> String {
        let mut output = String::new();
        self.write(arena, vec![Step::Open(node_id)], &mut output);
        output
    }

    /// Markup of the children of `node_id`
    pub fn inner_html(&self, arena: &DomArena, node_id: NodeId) -> String {
        let mut output = String::new();
        if let Ok(node) = arena.get(node_id) {
            let steps = node.children_ids.iter().rev().map(|&id| Step::Open(id)).collect();
            self.write(arena, steps, &mut output);
        }
        output
    }

    fn write(&self, arena: &DomArena, mut stack: Vec<Step>, output: &mut String) {
        while let Some(step) = stack.pop() {
            let (node_id, closing) = match step {
                Step::Open(id) => (id, false),
                Step::Close(id) => (id, true),
            };
            let Ok(node) = arena.get(node_id) else {
                continue;
            };

            if closing {
                output.push_str("</");
                output.push_str(&node.node_name);
                output.push('>');
                continue;
            }

            match node.node_type {
                NodeType::Element => {
                    output.push('<');
                    output.push_str(&node.node_name);
                    for attr in &node.attributes {
                        output.push(' ');
                        output.push_str(&attr.name);
                        output.push_str("=\"");
                        escape_into(&attr.value, true, output);
                        output.push('"');
                    }
                    output.push('>');

                    if !is_void(&node.node_name) {
                        stack.push(Step::Close(node_id));
                        stack.extend(node.children_ids.iter().rev().map(|&id| Step::Open(id)));
                    }
                }
                NodeType::Text => {
                    let text = self.cap(&node.node_value);
                    if is_raw_text_parent(arena, node) {
                        output.push_str(&text);
                    } else {
                        escape_into(&text, false, output);
                    }
                }
                NodeType::Comment if self.config.include_comments => {
                    output.push_str("<!--");
                    output.push_str(&node.node_value);
                    output.push_str("-->");
                }
                NodeType::DocumentType => {
                    output.push_str("<!DOCTYPE ");
                    output.push_str(&node.node_name);
                    output.push('>');
                }
                NodeType::ProcessingInstruction => {
                    output.push_str("<?");
                    output.push_str(&node.node_name);
                    output.push(' ');
                    output.push_str(&node.node_value);
                    output.push('>');
                }
                NodeType::Document | NodeType::DocumentFragment => {
                    stack.extend(node.children_ids.iter().rev().map(|&id| Step::Open(id)));
                }
                _ => {}
            }
        }
    }

    fn cap(&self, text: &str) -> String {
        match self.config.max_text_length {
            Some(max_len) if text.chars().count() > max_len => {
                let cut: String = text.chars().take(max_len).collect();
                format!("{}...", cut)
            }
            _ => text.to_string(),
        }
    }
}

impl Default for DomSerializer {
    fn default() -> Self {
        Self::new()
    }
}

fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.iter().any(|v| v.eq_ignore_ascii_case(tag))
}

fn is_raw_text_parent(arena: &DomArena, node: &DomNode) -> bool {
    node.parent_id
        .and_then(|id| arena.get(id).ok())
        .and_then(|parent| parent.tag_name())
        .is_some_and(|tag| RAW_TEXT_ELEMENTS.iter().any(|r| r.eq_ignore_ascii_case(tag)))
}

fn escape_into(text: &str, in_attribute: bool, output: &mut String) {
    for c in text.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '\u{a0}' => output.push_str("&nbsp;"),
            '"' if in_attribute => output.push_str("&quot;"),
            '<' if !in_attribute => output.push_str("&lt;"),
            '>' if !in_attribute => output.push_str("&gt;"),
            _ => output.push(c),
        }
    }
}

/// Markup of `node_id` and its subtree with the default configuration
pub fn outer_html(arena: &DomArena, node_id: NodeId) -> String {
    DomSerializer::new().outer_html(arena, node_id)
}

/// Markup of the children of `node_id` with the default configuration
pub fn inner_html(arena: &DomArena, node_id: NodeId) -> String {
    DomSerializer::new().inner_html(arena, node_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_fragment;

    #[test]
    fn test_outer_html_roundtrip_shape() {
        let html = r#"<div id="a" class="x y">one<br>two<img src="i.png"><!--c--></div>"#;
        let arena = parse_fragment(html).unwrap();
        let div = arena.element_by_id(0, "a").unwrap();
        assert_eq!(outer_html(&arena, div), html);
    }

    #[test]
    fn test_inner_html() {
        let arena = parse_fragment("<p><b>bold</b> and <i>it</i></p>").unwrap();
        let p = arena.element_by_tag(0, "p").unwrap();
        assert_eq!(inner_html(&arena, p), "<b>bold</b> and <i>it</i>");
        assert_eq!(inner_html(&arena, 0), "<p><b>bold</b> and <i>it</i></p>");
    }

    #[test]
    fn test_escaping() {
        let mut arena = DomArena::new();
        let p = arena.add_node(DomNode::element("p").with_attr("title", "a \"b\" & <c>"));
        arena.append_child(p, DomNode::text("1 < 2 & 3 > 2")).unwrap();
        assert_eq!(
            outer_html(&arena, p),
            r#"<p title="a &quot;b&quot; &amp; <c>">1 &lt; 2 &amp; 3 &gt; 2</p>"#
        );
    }

    #[test]
    fn test_nbsp_survives() {
        let html = r#"<p title="a&nbsp;b">one&nbsp;two</p>"#;
        let arena = parse_fragment(html).unwrap();
        let p = arena.element_by_tag(0, "p").unwrap();
        assert_eq!(arena.get(p).unwrap().attr("title"), Some("a\u{a0}b"));
        assert_eq!(outer_html(&arena, p), html);
    }

    #[test]
    fn test_script_text_is_raw() {
        let arena = parse_fragment("<script>if (a < b && c) {}</script>").unwrap();
        let script = arena.element_by_tag(0, "script").unwrap();
        assert_eq!(
            outer_html(&arena, script),
            "<script>if (a < b && c) {}</script>"
        );
    }

    #[test]
    fn test_config_options() {
        let arena = parse_fragment("<p>abcdefgh<!--gone--></p>").unwrap();
        let p = arena.element_by_tag(0, "p").unwrap();
        let serializer = DomSerializer::with_config(SerializerConfig {
            include_comments: false,
            max_text_length: Some(3),
        });
        assert_eq!(serializer.outer_html(&arena, p), "<p>abc...</p>");
    }

    #[test]
    fn test_unknown_node() {
        let arena = DomArena::new();
        assert_eq!(outer_html(&arena, 3), "");
        assert_eq!(inner_html(&arena, 3), "");
    }
}
