//! Layout tree management
//!
//! Hosts [`SizedText`] leaves in a taffy tree and runs the
//! measure-then-constrain loop: lay out, commit each text's allocated
//! geometry, and lay out again until no box changes.

use slotmap::{new_key_type, SlotMap};
use spanfit_core::MeasuredSize;
use taffy::prelude::*;

use crate::error::LayoutError;
use crate::sized_text::SizedText;

/// Upper bound on layout passes per [`LayoutTree::compute_layout`]
pub const MAX_LAYOUT_PASSES: usize = 4;

new_key_type! {
    pub struct LayoutNodeId;
}

/// Maps between Spanfit node IDs and Taffy node IDs
pub struct LayoutTree {
    taffy: TaffyTree<SizedText>,
    node_map: SlotMap<LayoutNodeId, NodeId>,
}

impl LayoutTree {
    pub fn new() -> Self {
        Self {
            taffy: TaffyTree::new(),
            node_map: SlotMap::with_key(),
        }
    }

    /// Create a container node with the given style
    pub fn create_node(&mut self, style: Style) -> Result<LayoutNodeId, LayoutError> {
        let taffy_node = self.taffy.new_leaf(style)?;
        Ok(self.node_map.insert(taffy_node))
    }

    /// Create a leaf that sizes itself from its text
    pub fn create_text(&mut self, style: Style, text: SizedText) -> Result<LayoutNodeId, LayoutError> {
        let taffy_node = self.taffy.new_leaf_with_context(style, text)?;
        Ok(self.node_map.insert(taffy_node))
    }

    fn taffy_node(&self, id: LayoutNodeId) -> Result<NodeId, LayoutError> {
        self.node_map.get(id).copied().ok_or(LayoutError::UnknownNode)
    }

    /// Set the style for a node
    pub fn set_style(&mut self, id: LayoutNodeId, style: Style) -> Result<(), LayoutError> {
        let node = self.taffy_node(id)?;
        self.taffy.set_style(node, style)?;
        Ok(())
    }

    /// Add a child to a parent node
    pub fn add_child(&mut self, parent: LayoutNodeId, child: LayoutNodeId) -> Result<(), LayoutError> {
        let (parent, child) = (self.taffy_node(parent)?, self.taffy_node(child)?);
        self.taffy.add_child(parent, child)?;
        Ok(())
    }

    pub fn text(&self, id: LayoutNodeId) -> Option<&SizedText> {
        let node = *self.node_map.get(id)?;
        self.taffy.get_node_context(node)
    }

    /// Mutable access to a text leaf; the node is marked dirty
    pub fn text_mut(&mut self, id: LayoutNodeId) -> Option<&mut SizedText> {
        let node = *self.node_map.get(id)?;
        self.taffy.mark_dirty(node).ok()?;
        self.taffy.get_node_context_mut(node)
    }

    /// Compute layout for the tree rooted at `root`, returning the number of
    /// passes it took to settle
    pub fn compute_layout(
        &mut self,
        root: LayoutNodeId,
        available_space: Size<AvailableSpace>,
    ) -> Result<usize, LayoutError> {
        let root = self.taffy_node(root)?;

        for pass in 1..=MAX_LAYOUT_PASSES {
            self.taffy
                .compute_layout_with_measure(root, available_space, measure_text)?;

            let mut changed = false;
            for &node in self.node_map.values() {
                let size = self.taffy.layout(node)?.size;
                let Some(text) = self.taffy.get_node_context_mut(node) else {
                    continue;
                };
                if text.commit_geometry(MeasuredSize::new(size.width, size.height)) {
                    self.taffy.mark_dirty(node)?;
                    changed = true;
                }
            }

            if !changed {
                tracing::trace!(passes = pass, "layout settled");
                return Ok(pass);
            }
        }

        tracing::warn!(
            passes = MAX_LAYOUT_PASSES,
            "layout did not settle, keeping last boxes"
        );
        Ok(MAX_LAYOUT_PASSES)
    }

    /// Get the computed layout for a node
    pub fn get_layout(&self, id: LayoutNodeId) -> Option<&Layout> {
        self.node_map
            .get(id)
            .and_then(|&taffy_node| self.taffy.layout(taffy_node).ok())
    }

    /// Remove a node
    pub fn remove_node(&mut self, id: LayoutNodeId) -> Result<(), LayoutError> {
        let taffy_node = self.node_map.remove(id).ok_or(LayoutError::UnknownNode)?;
        self.taffy.remove(taffy_node)?;
        Ok(())
    }
}

impl Default for LayoutTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Taffy measure function for text leaves
///
/// Constrained text reports exactly its box. Unconstrained text reports its
/// natural size, narrowed to the available width, or its widest word when
/// asked for a min-content size.
fn measure_text(
    known: Size<Option<f32>>,
    available: Size<AvailableSpace>,
    _node: NodeId,
    text: Option<&mut SizedText>,
    _style: &Style,
) -> Size<f32> {
    let Some(text) = text else {
        return Size::ZERO;
    };

    let size = text.layout_size();
    let width = match (text.render_box(), available.width) {
        (Some(_), _) | (None, AvailableSpace::MaxContent) => size.width,
        (None, AvailableSpace::Definite(limit)) => size.width.min(limit),
        (None, AvailableSpace::MinContent) => text.min_content_width(),
    };
    Size {
        width: known.width.unwrap_or(width),
        height: known.height.unwrap_or(size.height),
    }
}
