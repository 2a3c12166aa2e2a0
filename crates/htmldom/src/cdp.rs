//! CDP input adapter
//!
//! Builds a [`DomArena`] from a Chrome DevTools `DOM.getDocument` response,
//! for trees that were parsed by a live browser instead of html5ever.
//!
//! Input format:
//! ```json
//! {
//!   "root": {
//!     "nodeId": 1,
//!     "backendNodeId": 1,
//!     "nodeType": 9,
//!     "nodeName": "#document",
//!     "children": [...]
//!   }
//! }
//! ```

use crate::arena::DomArena;
use crate::config::LoaderConfig;
use crate::error::{DomError, Result};
use crate::types::{Attribute, DomNode, NodeId, NodeType};
use serde_json::Value;
use tracing::{debug, warn};

/// Builds arenas from CDP DOM JSON
#[derive(Debug, Clone, Default)]
pub struct CdpLoader {
    config: LoaderConfig,
}

impl CdpLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: LoaderConfig) -> Self {
        Self { config }
    }

    /// Parse a `DOM.getDocument` response; the arena root is the CDP root node
    pub fn load(&self, cdp_response: &Value) -> Result<DomArena> {
        let root = cdp_response
            .get("root")
            .ok_or_else(|| DomError::CdpError("Missing 'root' in CDP response".to_string()))?;

        let mut arena = DomArena::with_capacity(self.config.initial_capacity);
        let mut stack: Vec<(&Value, Option<NodeId>, usize)> = vec![(root, None, 0)];

        while let Some((cdp_node, parent_id, depth)) = stack.pop() {
            self.config.check_depth(depth)?;

            let Some(node) = self.parse_node(cdp_node)? else {
                continue;
            };
            let node_id = match parent_id {
                Some(parent_id) => arena.append_child(parent_id, node)?,
                None => {
                    let id = arena.add_node(node);
                    arena.set_root(id)?;
                    id
                }
            };

            // An iframe's document follows the frame element's own children
            if self.config.follow_content_documents {
                if let Some(content_doc) = cdp_node.get("contentDocument") {
                    stack.push((content_doc, Some(node_id), depth + 1));
                }
            }
            if let Some(children) = cdp_node["children"].as_array() {
                for child in children.iter().rev() {
                    stack.push((child, Some(node_id), depth + 1));
                }
            }
        }

        debug!(nodes = arena.len(), "built DOM arena from CDP");
        Ok(arena)
    }

    /// Convert one CDP node (children excluded), `None` when filtered out
    fn parse_node(&self, cdp_node: &Value) -> Result<Option<DomNode>> {
        let backend_val = cdp_node["backendNodeId"]
            .as_u64()
            .ok_or_else(|| DomError::CdpError("Missing backendNodeId".to_string()))?;

        let backend_node_id = u32::try_from(backend_val).map_err(|_| {
            DomError::CdpError(format!("backendNodeId out of range: {}", backend_val))
        })?;

        let node_type_val = cdp_node["nodeType"]
            .as_u64()
            .ok_or_else(|| DomError::CdpError("Missing nodeType".to_string()))?;

        let node_type = u8::try_from(node_type_val)
            .ok()
            .and_then(NodeType::from_u8)
            .ok_or_else(|| DomError::InvalidNodeType {
                expected: "valid NodeType".to_string(),
                actual: node_type_val.to_string(),
            })?;

        let node_value = cdp_node["nodeValue"].as_str().unwrap_or("");
        match node_type {
            NodeType::Text if !self.config.keeps_text(node_value) => return Ok(None),
            NodeType::Comment if !self.config.include_comments => return Ok(None),
            _ => {}
        }

        let node_name = cdp_node["nodeName"].as_str().unwrap_or("");
        let mut node = DomNode::new(node_type, node_name);
        node.node_value = node_value.to_string();
        node.backend_node_id = Some(backend_node_id);

        // Attributes arrive flattened: [name0, value0, name1, value1, ...]
        if let Some(attrs) = cdp_node["attributes"].as_array() {
            if attrs.len() % 2 != 0 {
                warn!(
                    backend_node_id,
                    len = attrs.len(),
                    "odd-length attribute array, dropping trailing name"
                );
            }
            for pair in attrs.chunks_exact(2) {
                if let (Some(key), Some(value)) = (pair[0].as_str(), pair[1].as_str()) {
                    node.attributes.push(Attribute::new(key, value));
                }
            }
        }

        Ok(Some(node))
    }
}

/// Parse a `DOM.getDocument` response with the default configuration
pub fn load_cdp_document(cdp_response: &Value) -> Result<DomArena> {
    CdpLoader::new().load(cdp_response)
}
