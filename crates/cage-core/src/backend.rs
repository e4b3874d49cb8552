//! Rendering backend abstraction
//!
//! The overlay never touches a concrete element tree. It creates and updates
//! its chrome, and reads and writes its edit target, through
//! [`RenderBackend`]. All positions crossing this trait are in the shared
//! stage coordinate space; a backend that stores parent-relative offsets
//! converts internally.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::geometry::BoundingRect;

/// Handle to an element owned by a backend.
///
/// Holding a `NodeId` does not keep the element alive; once removed from
/// its backend every query on the id fails with
/// [`BackendError::NodeNotFound`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(Uuid);

impl NodeId {
    /// Id that never refers to a live element
    pub const NIL: NodeId = NodeId(Uuid::nil());

    /// Create a fresh random id
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which family of element tree a backend drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BackendKind {
    /// Retained tree of boxes positioned with CSS-style offsets
    Dom,
    /// Vector scene with absolute shape coordinates
    Vector,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Dom => write!(f, "DOM"),
            BackendKind::Vector => write!(f, "vector"),
        }
    }
}

/// Role of an overlay element, used by backends to pick its styling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChromeKind {
    /// Dashed bounding box outline
    Frame,
    /// Resize handle
    Handle,
    /// Line from the box to the rotate handle
    RotateBar,
    /// Rotate handle
    RotateHandle,
    /// Confirm check mark
    ConfirmIcon,
    /// Anything that is not overlay chrome (edit targets, host content)
    Content,
}

/// Backend operation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("Node {node} does not support {operation}")]
    Unsupported {
        node: NodeId,
        operation: &'static str,
    },

    #[error("Node {0} cannot hold children")]
    InvalidParent(NodeId),
}

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Capabilities the overlay needs from an element tree.
pub trait RenderBackend {
    /// Backend family
    fn kind(&self) -> BackendKind;

    /// Stage root that overlays and content mount under
    fn root(&self) -> NodeId;

    /// Returns true if `node` is a live element of this backend
    fn contains(&self, node: NodeId) -> bool;

    /// Create an empty container under `parent`
    fn create_group(&mut self, parent: NodeId) -> BackendResult<NodeId>;

    /// Create a rectangle under `parent`
    fn create_rect(
        &mut self,
        parent: NodeId,
        rect: BoundingRect,
        kind: ChromeKind,
    ) -> BackendResult<NodeId>;

    /// Create a circle of `diameter` centered on `center` under `parent`
    fn create_circle(
        &mut self,
        parent: NodeId,
        center: Vec2,
        diameter: f32,
        kind: ChromeKind,
    ) -> BackendResult<NodeId>;

    /// Create a straight line under `parent`
    fn create_line(
        &mut self,
        parent: NodeId,
        from: Vec2,
        to: Vec2,
        kind: ChromeKind,
    ) -> BackendResult<NodeId>;

    /// Remove `node` and its descendants
    fn remove(&mut self, node: NodeId) -> BackendResult<()>;

    /// Move the top-left of `node`'s untransformed box to `top_left`
    fn set_position(&mut self, node: NodeId, top_left: Vec2) -> BackendResult<()>;

    /// Resize `node`'s untransformed box, keeping its top-left
    fn set_size(&mut self, node: NodeId, size: Vec2) -> BackendResult<()>;

    /// Move the endpoints of a line
    fn set_line(&mut self, node: NodeId, from: Vec2, to: Vec2) -> BackendResult<()>;

    /// Set the absolute clockwise rotation of `node` around `pivot`
    fn set_rotation(&mut self, node: NodeId, degrees: f32, pivot: Vec2) -> BackendResult<()>;

    /// Absolute clockwise rotation of `node` in degrees
    fn rotation(&self, node: NodeId) -> BackendResult<f32>;

    /// Returns true if `node` accepts [`RenderBackend::set_rotation`]
    fn supports_rotation(&self, node: NodeId) -> bool;

    /// Show or hide `node` and its descendants
    fn set_visible(&mut self, node: NodeId, visible: bool) -> BackendResult<()>;

    /// Visibility flag of `node` itself
    fn is_visible(&self, node: NodeId) -> BackendResult<bool>;

    /// Untransformed box of `node` in stage coordinates
    fn geometry(&self, node: NodeId) -> BackendResult<BoundingRect>;

    /// Axis-aligned box of `node` after its rotation, in stage coordinates
    fn bounding_rect(&self, node: NodeId) -> BackendResult<BoundingRect>;

    /// Pointer cursor shown over `node`
    fn set_cursor(&mut self, node: NodeId, cursor: &str) -> BackendResult<()>;
}
