//! HTML DOM query helpers
//!
//! Search and text extraction over an already-parsed HTML tree.
//!
//! ## Core Design
//!
//! ```text
//! HTML text ──html5ever──┐
//!                        ├→ DomArena (Vec<DomNode>) → find_first / find_all → NodeId
//! CDP JSON ──────────────┘          ↓                  inner_text / outer_html → String
//!                             NodeId (u32)
//! ```
//!
//! Parsing belongs to html5ever (or the browser, for CDP input). Everything in
//! this crate only reads the tree once it is built. Lookups never fail:
//! "not found" is `None`, an empty `Vec`, or `""`.
//!
//! ```
//! use htmldom::{inner_text, parse_fragment};
//!
//! let arena = parse_fragment(r#"<div id="msg">a<br>b<script>x()</script>c</div>"#).unwrap();
//! let root = arena.root_id().unwrap();
//! let msg = arena.element_by_id(root, "msg").unwrap();
//! assert_eq!(inner_text(&arena, msg), "a\nbc");
//! ```

pub mod arena;
pub mod cdp;
pub mod config;
pub mod error;
pub mod parse;
pub mod query;
pub mod serializer;
pub mod text;
pub mod types;

pub use arena::{Descendants, DomArena};
pub use cdp::{load_cdp_document, CdpLoader};
pub use config::LoaderConfig;
pub use error::{DomError, Result};
pub use parse::{parse_document, parse_document_from_reader, parse_fragment, HtmlLoader};
pub use query::{
    find_all, find_first, get_attribute, get_element_by_class, get_element_by_id,
    get_element_by_tag, get_elements_by_class, get_elements_by_tag, has_class,
    is_element_with_id, is_tag,
};
pub use serializer::{inner_html, outer_html, DomSerializer, SerializerConfig};
pub use text::{inner_text, text_content};
pub use types::*;
