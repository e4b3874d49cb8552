//! Transform Cage Renderer
//!
//! Rendering backends for the transform cage overlay.
//!
//! # Architecture
//!
//! Both backends implement [`cage_core::RenderBackend`] over an in-memory
//! element tree and can serialise that tree to markup:
//!
//! - [`DomBackend`] - retained tree of boxes positioned with CSS-style
//!   offsets relative to their parent, rendered as HTML
//! - [`VectorBackend`] - vector scene with absolute shape coordinates and
//!   rotate transforms, rendered as SVG
//!
//! # Module Structure
//!
//! ```text
//! cage-renderer/
//! ├── dom.rs        # DomBackend (HTML element tree)
//! ├── vector.rs     # VectorBackend (SVG scene)
//! ├── markup.rs     # Attribute escaping for both writers
//! └── transform.rs  # Rotation helpers shared by both
//! ```

pub mod dom;
pub mod markup;
pub mod transform;
pub mod vector;

// Re-exports for convenience
pub use dom::{Display, DomBackend, DomElement};
pub use transform::rotation_about;
pub use vector::{Shape, VectorBackend, VectorNode};
