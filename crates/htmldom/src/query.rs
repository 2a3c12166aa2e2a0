//! Predicate search over a subtree
//!
//! Every search walks the subtree in document order (node before its
//! children, children left to right) and never mutates the arena. Absence is
//! a value: `None` for single lookups, an empty `Vec` for collections, `""`
//! for attributes. A root id that is not in the arena behaves like an empty
//! subtree.

use crate::arena::DomArena;
use crate::types::{DomNode, NodeId, NodeType};

/// Value of the first attribute named `key`, or `""` when there is none
pub fn get_attribute<'a>(node: &'a DomNode, key: &str) -> &'a str {
    node.attr(key).unwrap_or("")
}

/// Element whose `id` attribute equals `id`
pub fn is_element_with_id(node: &DomNode, id: &str) -> bool {
    node.node_type == NodeType::Element && get_attribute(node, "id") == id
}

/// Element whose `class` attribute, split on single spaces, contains `class`
///
/// A missing or empty `class` attribute splits into one empty token, so
/// `has_class(node, "")` is true for every element without classes.
pub fn has_class(node: &DomNode, class: &str) -> bool {
    node.node_type == NodeType::Element
        && get_attribute(node, "class")
            .split(' ')
            .any(|token| token == class)
}

/// Element whose tag name is exactly `tag`
pub fn is_tag(node: &DomNode, tag: &str) -> bool {
    node.node_type == NodeType::Element && node.node_name == tag
}

impl DomArena {
    /// First node in the subtree at `root` (itself included) matching `predicate`
    pub fn find_first<F>(&self, root: NodeId, mut predicate: F) -> Option<NodeId>
    where
        F: FnMut(&DomNode) -> bool,
    {
        self.descendants(root)
            .find(|&(_, node)| predicate(node))
            .map(|(id, _)| id)
    }

    /// Every node in the subtree at `root` matching `predicate`, in document order
    pub fn find_all<F>(&self, root: NodeId, mut predicate: F) -> Vec<NodeId>
    where
        F: FnMut(&DomNode) -> bool,
    {
        self.descendants(root)
            .filter(|&(_, node)| predicate(node))
            .map(|(id, _)| id)
            .collect()
    }

    /// First element in the subtree with `id`, `None` if there is none
    pub fn element_by_id(&self, root: NodeId, id: &str) -> Option<NodeId> {
        self.find_first(root, |node| is_element_with_id(node, id))
    }

    /// Every element in the subtree carrying the class token `class`
    pub fn elements_by_class(&self, root: NodeId, class: &str) -> Vec<NodeId> {
        self.find_all(root, |node| has_class(node, class))
    }

    /// First element in the subtree carrying the class token `class`
    pub fn element_by_class(&self, root: NodeId, class: &str) -> Option<NodeId> {
        self.find_first(root, |node| has_class(node, class))
    }

    /// Every element in the subtree tagged `tag`
    pub fn elements_by_tag(&self, root: NodeId, tag: &str) -> Vec<NodeId> {
        self.find_all(root, |node| is_tag(node, tag))
    }

    /// First element in the subtree tagged `tag`
    pub fn element_by_tag(&self, root: NodeId, tag: &str) -> Option<NodeId> {
        self.find_first(root, |node| is_tag(node, tag))
    }
}

/// Free-function form of [`DomArena::find_first`]
pub fn find_first<F>(arena: &DomArena, root: NodeId, predicate: F) -> Option<NodeId>
where
    F: FnMut(&DomNode) -> bool,
{
    arena.find_first(root, predicate)
}

/// Free-function form of [`DomArena::find_all`]
pub fn find_all<F>(arena: &DomArena, root: NodeId, predicate: F) -> Vec<NodeId>
where
    F: FnMut(&DomNode) -> bool,
{
    arena.find_all(root, predicate)
}

/// Free-function form of [`DomArena::element_by_id`]
pub fn get_element_by_id(arena: &DomArena, root: NodeId, id: &str) -> Option<NodeId> {
    arena.element_by_id(root, id)
}

/// Free-function form of [`DomArena::elements_by_class`]
pub fn get_elements_by_class(arena: &DomArena, root: NodeId, class: &str) -> Vec<NodeId> {
    arena.elements_by_class(root, class)
}

/// Free-function form of [`DomArena::element_by_class`]
pub fn get_element_by_class(arena: &DomArena, root: NodeId, class: &str) -> Option<NodeId> {
    arena.element_by_class(root, class)
}

/// Free-function form of [`DomArena::elements_by_tag`]
pub fn get_elements_by_tag(arena: &DomArena, root: NodeId, tag: &str) -> Vec<NodeId> {
    arena.elements_by_tag(root, tag)
}

/// Free-function form of [`DomArena::element_by_tag`]
pub fn get_element_by_tag(arena: &DomArena, root: NodeId, tag: &str) -> Option<NodeId> {
    arena.element_by_tag(root, tag)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A -> [B, C -> [D]]
    fn abcd() -> DomArena {
        let mut arena = DomArena::new();
        let a = arena.add_node(DomNode::element("A"));
        arena.set_root(a).unwrap();
        arena.append_child(a, DomNode::element("B")).unwrap();
        let c = arena.append_child(a, DomNode::element("C")).unwrap();
        arena.append_child(c, DomNode::element("D")).unwrap();
        arena
    }

    /// body -> [div#main.card.wide -> [p.card, #text], span.card-title, div -> [p#main]]
    fn page() -> DomArena {
        let mut arena = DomArena::new();
        let body = arena.add_node(DomNode::element("body"));
        arena.set_root(body).unwrap();
        let main = arena
            .append_child(
                body,
                DomNode::element("div")
                    .with_attr("id", "main")
                    .with_attr("class", "card wide"),
            )
            .unwrap();
        arena
            .append_child(main, DomNode::element("p").with_attr("class", "card"))
            .unwrap();
        arena.append_child(main, DomNode::text("main")).unwrap();
        arena
            .append_child(body, DomNode::element("span").with_attr("class", "card-title"))
            .unwrap();
        let inner = arena.append_child(body, DomNode::element("div")).unwrap();
        arena
            .append_child(inner, DomNode::element("p").with_attr("id", "main"))
            .unwrap();
        arena
    }

    fn names(arena: &DomArena, ids: &[NodeId]) -> Vec<String> {
        ids.iter()
            .map(|&id| arena.get(id).unwrap().node_name.clone())
            .collect()
    }

    #[test]
    fn test_get_attribute() {
        let node = DomNode::element("a")
            .with_attr("href", "/first")
            .with_attr("href", "/second")
            .with_attr("Title", "t");

        assert_eq!(get_attribute(&node, "href"), "/first");
        assert_eq!(get_attribute(&node, "title"), "");
        assert_eq!(get_attribute(&node, "Title"), "t");
        assert_eq!(get_attribute(&DomNode::element("a"), "href"), "");
    }

    #[test]
    fn test_find_all_document_order() {
        let arena = abcd();
        let all = arena.find_all(0, |_| true);
        assert_eq!(names(&arena, &all), vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn test_find_first_is_head_of_find_all() {
        let arena = page();
        let predicates: Vec<Box<dyn Fn(&DomNode) -> bool>> = vec![
            Box::new(|n: &DomNode| is_tag(n, "p")),
            Box::new(|n: &DomNode| n.is_text()),
            Box::new(|n: &DomNode| has_class(n, "card")),
            Box::new(|n: &DomNode| is_tag(n, "table")),
        ];

        for predicate in predicates {
            let all = arena.find_all(0, &predicate);
            let first = arena.find_first(0, &predicate);
            assert_eq!(first, all.first().copied());
            assert_eq!(first.is_none(), all.is_empty());
        }
    }

    #[test]
    fn test_find_first_includes_root() {
        let arena = abcd();
        assert_eq!(arena.find_first(0, |n| n.is_element()), Some(0));
        assert_eq!(arena.find_first(2, |n| n.node_name == "D"), Some(3));
        // B's subtree does not reach D
        assert_eq!(arena.find_first(1, |n| n.node_name == "D"), None);
    }

    #[test]
    fn test_find_first_short_circuits() {
        let arena = abcd();
        let mut calls = 0;
        let found = arena.find_first(0, |n| {
            calls += 1;
            n.node_name == "B"
        });
        assert_eq!(found, Some(1));
        assert_eq!(calls, 2);
    }

    #[test]
    fn test_has_class_exact_tokens() {
        let node = DomNode::element("div").with_attr("class", "foo bar");
        assert!(has_class(&node, "foo"));
        assert!(has_class(&node, "bar"));
        assert!(!has_class(&node, "foo-bar"));
        assert!(!has_class(&node, "fo"));
        assert!(!has_class(&node, "foo bar"));
    }

    #[test]
    fn test_has_class_splits_on_space_only() {
        let node = DomNode::element("div").with_attr("class", "foo\tbar");
        assert!(!has_class(&node, "foo"));
        assert!(has_class(&node, "foo\tbar"));
    }

    #[test]
    fn test_has_class_empty_name_quirk() {
        assert!(has_class(&DomNode::element("div"), ""));
        assert!(has_class(&DomNode::element("div").with_attr("class", ""), ""));
        assert!(has_class(&DomNode::element("div").with_attr("class", "a  b"), ""));
        assert!(!has_class(&DomNode::element("div").with_attr("class", "a"), ""));
        assert!(!has_class(&DomNode::text(""), ""));
    }

    #[test]
    fn test_predicates_require_element() {
        let mut text = DomNode::text("x");
        text.attributes.push(crate::types::Attribute::new("id", "x"));
        text.attributes.push(crate::types::Attribute::new("class", "x"));
        assert!(!is_element_with_id(&text, "x"));
        assert!(!has_class(&text, "x"));
        assert!(!is_tag(&text, "#text"));
    }

    #[test]
    fn test_is_tag_case_sensitive() {
        let node = DomNode::element("DIV");
        assert!(is_tag(&node, "DIV"));
        assert!(!is_tag(&node, "div"));
    }

    #[test]
    fn test_element_by_id() {
        let arena = page();
        assert_eq!(arena.element_by_id(0, "main"), Some(1));
        // Second `main` is only reachable from the inner div
        assert_eq!(arena.element_by_id(5, "main"), Some(6));
        assert_eq!(get_element_by_id(&arena, 0, "missing"), None);
    }

    #[test]
    fn test_element_by_id_single_node_tree() {
        let mut arena = DomArena::new();
        let root = arena.add_node(DomNode::document());
        assert_eq!(arena.element_by_id(root, "x"), None);
        assert_eq!(arena.element_by_id(root, ""), None);
    }

    #[test]
    fn test_unknown_root_is_empty() {
        let arena = page();
        assert_eq!(arena.find_first(42, |_| true), None);
        assert!(arena.find_all(42, |_| true).is_empty());
        assert_eq!(get_element_by_id(&DomArena::new(), 0, "main"), None);
    }

    #[test]
    fn test_class_queries() {
        let arena = page();
        assert_eq!(get_elements_by_class(&arena, 0, "card"), vec![1, 2]);
        assert_eq!(get_element_by_class(&arena, 0, "wide"), Some(1));
        assert_eq!(get_element_by_class(&arena, 0, "card-title"), Some(4));
        assert!(get_elements_by_class(&arena, 0, "title").is_empty());
    }

    #[test]
    fn test_tag_queries() {
        let arena = page();
        assert_eq!(get_elements_by_tag(&arena, 0, "p"), vec![2, 6]);
        assert_eq!(get_elements_by_tag(&arena, 0, "div"), vec![1, 5]);
        assert_eq!(get_element_by_tag(&arena, 0, "span"), Some(4));
        assert_eq!(get_element_by_tag(&arena, 0, "table"), None);
        assert_eq!(find_all(&arena, 1, |n| is_tag(n, "p")), vec![2]);
        assert_eq!(find_first(&arena, 0, |n| n.is_text()), Some(3));
    }
}
