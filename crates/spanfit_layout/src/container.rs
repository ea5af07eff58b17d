//! Size-constrained container
//!
//! A two-state machine: content starts at its natural size and is pinned to
//! an explicit [`RenderBox`] once the first valid observation arrives. There
//! is no way back to the unconstrained state while mounted.

use spanfit_core::{RenderBox, StyledContent};

use crate::observation::SizeObservation;

/// Where the container is in its lifecycle
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ContainerState {
    /// Content renders at its intrinsic size
    Unconstrained,
    /// Content renders pinned to exactly this box
    Constrained(RenderBox),
}

impl ContainerState {
    pub fn render_box(&self) -> Option<RenderBox> {
        match self {
            Self::Unconstrained => None,
            Self::Constrained(render_box) => Some(*render_box),
        }
    }
}

/// A state change, kept for diagnostics
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transition {
    pub from: ContainerState,
    pub to: ContainerState,
}

/// Transitions kept in [`SizeConstrainedContainer::history`]
pub const HISTORY_LIMIT: usize = 32;

/// Holds the box for one piece of styled content
#[derive(Debug)]
pub struct SizeConstrainedContainer {
    content: StyledContent,
    max_lines: usize,
    state: ContainerState,
    /// Most recent state transitions (for debugging)
    history: Vec<Transition>,
    transitions: usize,
}

impl SizeConstrainedContainer {
    pub fn new(content: StyledContent, max_lines: usize) -> Self {
        Self {
            content,
            max_lines,
            state: ContainerState::Unconstrained,
            history: Vec::new(),
            transitions: 0,
        }
    }

    pub fn content(&self) -> &StyledContent {
        &self.content
    }

    pub fn max_lines(&self) -> usize {
        self.max_lines
    }

    pub fn state(&self) -> ContainerState {
        self.state
    }

    pub fn render_box(&self) -> Option<RenderBox> {
        self.state.render_box()
    }

    pub fn is_constrained(&self) -> bool {
        matches!(self.state, ContainerState::Constrained(_))
    }

    /// Box updates since the container was created, including ones no
    /// longer in [`history`](Self::history)
    pub fn transition_count(&self) -> usize {
        self.transitions
    }

    /// The last [`HISTORY_LIMIT`] transitions, oldest first
    pub fn history(&self) -> &[Transition] {
        &self.history
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Replace the content
    ///
    /// The current box is kept until an observation for the new content
    /// supersedes it.
    pub fn set_content(&mut self, content: StyledContent) {
        self.content = content;
    }

    pub fn set_max_lines(&mut self, max_lines: usize) {
        self.max_lines = max_lines;
    }

    /// Apply an observation, returning whether the box changed
    ///
    /// Observations without a positive width and height are ignored, as are
    /// ones matching the current box.
    pub fn observe(&mut self, observation: &SizeObservation) -> bool {
        if !observation.is_valid() {
            tracing::trace!(?observation.size, "ignoring observation without geometry");
            return false;
        }

        let next = RenderBox::from(observation.size);
        if self.state.render_box() == Some(next) {
            return false;
        }

        let transition = Transition {
            from: self.state,
            to: ContainerState::Constrained(next),
        };
        tracing::debug!(
            width = next.width,
            height = next.height,
            first = !self.is_constrained(),
            "container box updated"
        );
        self.state = transition.to;
        if self.history.len() == HISTORY_LIMIT {
            self.history.remove(0);
        }
        self.history.push(transition);
        self.transitions += 1;
        true
    }
}
