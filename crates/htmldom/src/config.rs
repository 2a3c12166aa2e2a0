//! Loader configuration shared by the HTML and CDP adapters

/// Controls how an external tree is copied into a [`DomArena`](crate::DomArena)
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Keep comment nodes
    pub include_comments: bool,
    /// Skip text nodes made only of whitespace
    pub drop_whitespace_text: bool,
    /// Nesting deeper than this fails with `MaxDepthExceeded` (unlimited by default)
    pub max_depth: usize,
    /// Descend into `contentDocument` of frames (CDP input only)
    pub follow_content_documents: bool,
    /// Arena pre-allocation
    pub initial_capacity: usize,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            include_comments: true,
            drop_whitespace_text: false,
            max_depth: usize::MAX,
            follow_content_documents: true,
            initial_capacity: 1024,
        }
    }
}

impl LoaderConfig {
    /// Whether a text node with this content should be kept
    pub(crate) fn keeps_text(&self, text: &str) -> bool {
        !(self.drop_whitespace_text && text.chars().all(char::is_whitespace))
    }

    pub(crate) fn check_depth(&self, depth: usize) -> crate::Result<()> {
        if depth > self.max_depth {
            return Err(crate::DomError::MaxDepthExceeded {
                current: depth,
                max: self.max_depth,
            });
        }
        Ok(())
    }
}
