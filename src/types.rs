//! Common types and data structures

use crate::render::RenderResult;
use std::sync::Arc;

/// Outcome of the most recent render request
#[derive(Clone, Default)]
pub enum RenderStatus {
    /// Nothing to render (blank text) or nothing requested yet
    #[default]
    Idle,
    Rendering,
    Complete(Arc<RenderResult>),
    Failed {
        message: &'static str,
        kind: &'static str,
        detail: String,
    },
}

/// State shared between the UI thread and render tasks
#[derive(Default)]
pub struct RenderState {
    /// Bumped on every scheduled render; stale results are dropped
    pub generation: u64,
    pub status: RenderStatus,
}
