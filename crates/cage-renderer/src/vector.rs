//! Vector scene backend
//!
//! Shapes carry absolute stage coordinates. Groups and nested viewports
//! have no box of their own: moving one translates its descendants and its
//! extent is the union of theirs. Rotation is a `rotate(deg cx cy)`
//! transform that also applies to descendants.

use std::collections::HashMap;
use std::fmt::Write as _;

use cage_core::{
    BackendError, BackendKind, BackendResult, BoundingRect, ChromeKind, NodeId, RenderBackend,
};
use glam::{Affine2, Vec2};

use crate::markup::escape_attr;
use crate::transform::rotation_about;

/// Shape of a scene node
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    /// Container `<g>`
    Group,
    /// Nested `<svg>` viewport
    Viewport,
    /// `<rect>`
    Rect,
    /// `<circle>`
    Circle,
    /// `<line>` between two stage points
    Line {
        /// Start point
        from: Vec2,
        /// End point
        to: Vec2,
    },
}

impl Shape {
    fn is_container(&self) -> bool {
        matches!(self, Shape::Group | Shape::Viewport)
    }
}

/// A node of the vector scene
#[derive(Debug, Clone)]
pub struct VectorNode {
    shape: Shape,
    kind: ChromeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    /// Untransformed top-left; unused by containers
    position: Vec2,
    size: Vec2,
    rotation: f32,
    pivot: Vec2,
    visible: bool,
    cursor: Option<String>,
    fill: Option<[u8; 4]>,
}

impl VectorNode {
    fn new(shape: Shape, kind: ChromeKind, parent: Option<NodeId>) -> Self {
        Self {
            shape,
            kind,
            parent,
            children: Vec::new(),
            position: Vec2::ZERO,
            size: Vec2::ZERO,
            rotation: 0.0,
            pivot: Vec2::ZERO,
            visible: true,
            cursor: None,
            fill: None,
        }
    }

    /// Shape of the node
    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// Overlay role of the node
    pub fn kind(&self) -> ChromeKind {
        self.kind
    }

    /// Parent node, `None` for the stage root
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in paint order
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Clockwise rotation in degrees
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    /// Own visibility flag
    pub fn visible(&self) -> bool {
        self.visible
    }

    /// Cursor shown over the node
    pub fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }

    /// Fill colour as RGBA
    pub fn fill(&self) -> Option<[u8; 4]> {
        self.fill
    }

    fn class(&self) -> &'static str {
        match self.kind {
            ChromeKind::Frame => "resize-frame",
            ChromeKind::Handle => "resize-handle",
            ChromeKind::RotateBar => "resize-rotate-bar",
            ChromeKind::RotateHandle => "resize-rotate-handle",
            ChromeKind::ConfirmIcon => "resize-confirm",
            ChromeKind::Content => "",
        }
    }
}

/// In-memory SVG-like scene.
#[derive(Debug, Clone)]
pub struct VectorBackend {
    root: NodeId,
    size: Vec2,
    nodes: HashMap<NodeId, VectorNode>,
}

impl Default for VectorBackend {
    fn default() -> Self {
        Self::new(Vec2::new(800.0, 600.0))
    }
}

impl VectorBackend {
    /// Create a scene whose root viewport has the given size.
    pub fn new(size: Vec2) -> Self {
        let root = NodeId::new();
        let mut viewport = VectorNode::new(Shape::Viewport, ChromeKind::Content, None);
        viewport.size = size;

        let mut nodes = HashMap::new();
        nodes.insert(root, viewport);
        Self { root, size, nodes }
    }

    /// Stage size
    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// Look up a node
    pub fn node(&self, id: NodeId) -> Option<&VectorNode> {
        self.nodes.get(&id)
    }

    /// Number of live nodes, the root included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if only the root exists
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Create a nested viewport. Viewports hold children but cannot rotate.
    pub fn create_viewport(&mut self, parent: NodeId) -> BackendResult<NodeId> {
        self.insert(parent, VectorNode::new(Shape::Viewport, ChromeKind::Content, Some(parent)))
    }

    /// Set the fill colour of `node`
    pub fn set_fill(&mut self, node: NodeId, rgba: [u8; 4]) -> BackendResult<()> {
        self.get_mut(node)?.fill = Some(rgba);
        Ok(())
    }

    /// Returns true if `node` and all of its ancestors are visible
    pub fn is_rendered(&self, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            match self.nodes.get(&id) {
                Some(n) if n.visible => current = n.parent,
                _ => return false,
            }
        }
        true
    }

    /// Combined rotate transforms of `node` and its ancestors
    pub fn world_transform(&self, node: NodeId) -> BackendResult<Affine2> {
        let n = self.get(node)?;
        let parent = match n.parent {
            Some(parent) => self.world_transform(parent)?,
            None => Affine2::IDENTITY,
        };
        Ok(parent * rotation_about(n.pivot, n.rotation))
    }

    /// Serialise the scene to SVG
    pub fn to_svg(&self) -> String {
        let mut svg = String::new();
        self.write_svg(self.root, 0, &mut svg);
        svg
    }

    fn write_svg(&self, id: NodeId, depth: usize, out: &mut String) {
        let Some(node) = self.nodes.get(&id) else {
            return;
        };
        let indent = "  ".repeat(depth);
        let mut attrs = format!(" data-id=\"{}\"", id);
        let class = node.class();
        if !class.is_empty() {
            let _ = write!(attrs, " class=\"{}\"", class);
        }
        if node.rotation != 0.0 {
            let _ = write!(
                attrs,
                " transform=\"rotate({} {} {})\"",
                node.rotation, node.pivot.x, node.pivot.y
            );
        }
        if !node.visible {
            attrs.push_str(" display=\"none\"");
        }
        if let Some(cursor) = &node.cursor {
            let _ = write!(attrs, " style=\"cursor: {}\"", escape_attr(cursor));
        }
        if let Some([r, g, b, a]) = node.fill {
            let _ = write!(
                attrs,
                " fill=\"rgb({},{},{})\" fill-opacity=\"{}\"",
                r,
                g,
                b,
                f32::from(a) / 255.0
            );
        }

        let tag = match node.shape {
            Shape::Group => "g",
            Shape::Viewport if node.parent.is_none() => {
                let _ = writeln!(
                    out,
                    "{}<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{}\" height=\"{}\"{}>",
                    indent, self.size.x, self.size.y, attrs
                );
                self.write_children(node, depth, out);
                let _ = writeln!(out, "{}</svg>", indent);
                return;
            }
            Shape::Viewport => "svg",
            Shape::Rect => {
                let _ = writeln!(
                    out,
                    "{}<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\"{}/>",
                    indent, node.position.x, node.position.y, node.size.x, node.size.y, attrs
                );
                return;
            }
            Shape::Circle => {
                let center = node.position + node.size / 2.0;
                let _ = writeln!(
                    out,
                    "{}<circle cx=\"{}\" cy=\"{}\" r=\"{}\"{}/>",
                    indent,
                    center.x,
                    center.y,
                    node.size.min_element() / 2.0,
                    attrs
                );
                return;
            }
            Shape::Line { from, to } => {
                let _ = writeln!(
                    out,
                    "{}<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\"{}/>",
                    indent, from.x, from.y, to.x, to.y, attrs
                );
                return;
            }
        };

        let _ = writeln!(out, "{}<{}{}>", indent, tag, attrs);
        self.write_children(node, depth, out);
        let _ = writeln!(out, "{}</{}>", indent, tag);
    }

    fn write_children(&self, node: &VectorNode, depth: usize, out: &mut String) {
        for child in &node.children {
            self.write_svg(*child, depth + 1, out);
        }
    }

    fn get(&self, id: NodeId) -> BackendResult<&VectorNode> {
        self.nodes.get(&id).ok_or(BackendError::NodeNotFound(id))
    }

    fn get_mut(&mut self, id: NodeId) -> BackendResult<&mut VectorNode> {
        self.nodes
            .get_mut(&id)
            .ok_or(BackendError::NodeNotFound(id))
    }

    fn insert(&mut self, parent: NodeId, node: VectorNode) -> BackendResult<NodeId> {
        let parent_node = self.get_mut(parent)?;
        if !parent_node.shape.is_container() {
            return Err(BackendError::InvalidParent(parent));
        }
        let id = NodeId::new();
        parent_node.children.push(id);
        self.nodes.insert(id, node);
        Ok(id)
    }

    fn create_shape(
        &mut self,
        parent: NodeId,
        shape: Shape,
        rect: BoundingRect,
        kind: ChromeKind,
    ) -> BackendResult<NodeId> {
        let mut node = VectorNode::new(shape, kind, Some(parent));
        node.position = rect.origin();
        node.size = rect.size();
        self.insert(parent, node)
    }

    /// Shift `id` and everything below it by `offset`
    fn translate(&mut self, id: NodeId, offset: Vec2) -> BackendResult<()> {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let node = self.get_mut(current)?;
            node.position += offset;
            if let Shape::Line { from, to } = &mut node.shape {
                *from += offset;
                *to += offset;
            }
            stack.extend(node.children.iter().copied());
        }
        Ok(())
    }

    /// Leaf shapes in the subtree of `id`
    fn leaves(&self, id: NodeId) -> BackendResult<Vec<NodeId>> {
        let mut leaves = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let node = self.get(current)?;
            if node.shape.is_container() {
                stack.extend(node.children.iter().copied());
            } else {
                leaves.push(current);
            }
        }
        Ok(leaves)
    }

    fn union(rects: impl IntoIterator<Item = BoundingRect>) -> BoundingRect {
        BoundingRect::from_points(rects.into_iter().flat_map(|r| [r.origin(), r.origin() + r.size()]))
    }
}

impl RenderBackend for VectorBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Vector
    }

    fn root(&self) -> NodeId {
        self.root
    }

    fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains_key(&node)
    }

    fn create_group(&mut self, parent: NodeId) -> BackendResult<NodeId> {
        self.insert(parent, VectorNode::new(Shape::Group, ChromeKind::Content, Some(parent)))
    }

    fn create_rect(
        &mut self,
        parent: NodeId,
        rect: BoundingRect,
        kind: ChromeKind,
    ) -> BackendResult<NodeId> {
        self.create_shape(parent, Shape::Rect, rect, kind)
    }

    fn create_circle(
        &mut self,
        parent: NodeId,
        center: Vec2,
        diameter: f32,
        kind: ChromeKind,
    ) -> BackendResult<NodeId> {
        let rect = BoundingRect::from_origin_size(
            center - Vec2::splat(diameter / 2.0),
            Vec2::splat(diameter),
        );
        self.create_shape(parent, Shape::Circle, rect, kind)
    }

    fn create_line(
        &mut self,
        parent: NodeId,
        from: Vec2,
        to: Vec2,
        kind: ChromeKind,
    ) -> BackendResult<NodeId> {
        let rect = BoundingRect::from_points([from, to]);
        self.create_shape(parent, Shape::Line { from, to }, rect, kind)
    }

    fn remove(&mut self, node: NodeId) -> BackendResult<()> {
        if node == self.root {
            return Err(BackendError::Unsupported {
                node,
                operation: "removal",
            });
        }
        let parent = self.get(node)?.parent;
        if let Some(parent) = parent.and_then(|p| self.nodes.get_mut(&p)) {
            parent.children.retain(|child| *child != node);
        }

        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            if let Some(removed) = self.nodes.remove(&id) {
                stack.extend(removed.children);
            }
        }
        tracing::trace!("Removed vector node {}", node);
        Ok(())
    }

    fn set_position(&mut self, node: NodeId, top_left: Vec2) -> BackendResult<()> {
        let current = self.geometry(node)?.origin();
        self.translate(node, top_left - current)
    }

    fn set_size(&mut self, node: NodeId, size: Vec2) -> BackendResult<()> {
        let n = self.get_mut(node)?;
        match n.shape {
            Shape::Rect | Shape::Circle => {
                n.size = size;
                Ok(())
            }
            Shape::Group | Shape::Viewport | Shape::Line { .. } => Err(BackendError::Unsupported {
                node,
                operation: "resize",
            }),
        }
    }

    fn set_line(&mut self, node: NodeId, from: Vec2, to: Vec2) -> BackendResult<()> {
        let n = self.get_mut(node)?;
        let Shape::Line { .. } = n.shape else {
            return Err(BackendError::Unsupported {
                node,
                operation: "line endpoints",
            });
        };
        let rect = BoundingRect::from_points([from, to]);
        n.shape = Shape::Line { from, to };
        n.position = rect.origin();
        n.size = rect.size();
        Ok(())
    }

    fn set_rotation(&mut self, node: NodeId, degrees: f32, pivot: Vec2) -> BackendResult<()> {
        let n = self.get_mut(node)?;
        if n.shape == Shape::Viewport {
            return Err(BackendError::Unsupported {
                node,
                operation: "rotation",
            });
        }
        n.rotation = degrees;
        n.pivot = pivot;
        Ok(())
    }

    fn rotation(&self, node: NodeId) -> BackendResult<f32> {
        Ok(self.get(node)?.rotation)
    }

    fn supports_rotation(&self, node: NodeId) -> bool {
        self.nodes
            .get(&node)
            .is_some_and(|n| n.shape != Shape::Viewport)
    }

    fn set_visible(&mut self, node: NodeId, visible: bool) -> BackendResult<()> {
        self.get_mut(node)?.visible = visible;
        Ok(())
    }

    fn is_visible(&self, node: NodeId) -> BackendResult<bool> {
        Ok(self.get(node)?.visible)
    }

    fn geometry(&self, node: NodeId) -> BackendResult<BoundingRect> {
        let n = self.get(node)?;
        if !n.shape.is_container() {
            return Ok(BoundingRect::from_origin_size(n.position, n.size));
        }
        if node == self.root {
            return Ok(BoundingRect::from_origin_size(Vec2::ZERO, self.size));
        }
        let mut rects = Vec::new();
        for leaf in self.leaves(node)? {
            let leaf = self.get(leaf)?;
            rects.push(BoundingRect::from_origin_size(leaf.position, leaf.size));
        }
        Ok(Self::union(rects))
    }

    fn bounding_rect(&self, node: NodeId) -> BackendResult<BoundingRect> {
        let mut rects = Vec::new();
        for leaf in self.leaves(node)? {
            let transform = self.world_transform(leaf)?;
            let corners = self.geometry(leaf)?.corners();
            rects.push(BoundingRect::from_points(
                corners.into_iter().map(|c| transform.transform_point2(c)),
            ));
        }
        Ok(Self::union(rects))
    }

    fn set_cursor(&mut self, node: NodeId, cursor: &str) -> BackendResult<()> {
        self.get_mut(node)?.cursor = Some(cursor.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_group_moves_descendants() {
        let mut scene = VectorBackend::default();
        let root = scene.root();
        let group = scene.create_group(root).unwrap();
        let rect = scene
            .create_rect(group, BoundingRect::new(10.0, 10.0, 20.0, 20.0), ChromeKind::Frame)
            .unwrap();
        let line = scene
            .create_line(group, Vec2::new(20.0, 10.0), Vec2::new(20.0, -10.0), ChromeKind::RotateBar)
            .unwrap();

        assert_eq!(scene.geometry(group).unwrap(), BoundingRect::new(10.0, -10.0, 20.0, 40.0));

        scene.set_position(group, Vec2::new(110.0, 90.0)).unwrap();
        assert_eq!(scene.geometry(rect).unwrap().origin(), Vec2::new(110.0, 110.0));
        assert_eq!(
            scene.node(line).unwrap().shape(),
            Shape::Line {
                from: Vec2::new(120.0, 110.0),
                to: Vec2::new(120.0, 90.0)
            }
        );
    }

    #[test]
    fn test_group_rotation_applies_to_children() {
        let mut scene = VectorBackend::default();
        let root = scene.root();
        let group = scene.create_group(root).unwrap();
        let rect = scene
            .create_rect(group, BoundingRect::new(0.0, 40.0, 100.0, 20.0), ChromeKind::Content)
            .unwrap();
        scene.set_rotation(group, 90.0, Vec2::new(50.0, 50.0)).unwrap();

        // Untransformed geometry is unchanged
        assert_eq!(scene.geometry(rect).unwrap().width, 100.0);
        let bounds = scene.bounding_rect(rect).unwrap();
        assert_relative_eq!(bounds.left, 40.0, epsilon = 1e-3);
        assert_relative_eq!(bounds.width, 20.0, epsilon = 1e-3);
        assert_relative_eq!(bounds.height, 100.0, epsilon = 1e-3);
    }

    #[test]
    fn test_viewports_cannot_rotate() {
        let mut scene = VectorBackend::default();
        let root = scene.root();
        let viewport = scene.create_viewport(root).unwrap();
        let inner = scene
            .create_rect(viewport, BoundingRect::new(5.0, 5.0, 10.0, 10.0), ChromeKind::Content)
            .unwrap();

        assert!(!scene.supports_rotation(viewport));
        assert!(scene.supports_rotation(inner));
        assert!(matches!(
            scene.set_rotation(viewport, 10.0, Vec2::ZERO),
            Err(BackendError::Unsupported { .. })
        ));
        assert_eq!(scene.geometry(viewport).unwrap(), BoundingRect::new(5.0, 5.0, 10.0, 10.0));
    }

    #[test]
    fn test_leaf_shapes_cannot_hold_children() {
        let mut scene = VectorBackend::default();
        let root = scene.root();
        let rect = scene
            .create_rect(root, BoundingRect::new(0.0, 0.0, 10.0, 10.0), ChromeKind::Content)
            .unwrap();
        assert_eq!(
            scene.create_group(rect),
            Err(BackendError::InvalidParent(rect))
        );
        assert_eq!(
            scene.set_size(root, Vec2::ONE),
            Err(BackendError::Unsupported {
                node: root,
                operation: "resize"
            })
        );
    }

    #[test]
    fn test_visibility_is_inherited_for_rendering() {
        let mut scene = VectorBackend::default();
        let root = scene.root();
        let group = scene.create_group(root).unwrap();
        let circle = scene
            .create_circle(group, Vec2::new(50.0, 50.0), 8.0, ChromeKind::Handle)
            .unwrap();
        assert_eq!(scene.geometry(circle).unwrap(), BoundingRect::new(46.0, 46.0, 8.0, 8.0));

        scene.set_visible(group, false).unwrap();
        assert!(scene.is_visible(circle).unwrap());
        assert!(!scene.is_rendered(circle));
    }

    #[test]
    fn test_remove_and_svg_output() {
        let mut scene = VectorBackend::new(Vec2::new(200.0, 100.0));
        let root = scene.root();
        let group = scene.create_group(root).unwrap();
        let handle = scene
            .create_circle(group, Vec2::new(10.0, 10.0), 8.0, ChromeKind::Handle)
            .unwrap();
        scene.set_cursor(handle, "nw-resize").unwrap();
        scene.set_rotation(group, 15.0, Vec2::new(10.0, 10.0)).unwrap();

        let svg = scene.to_svg();
        assert!(svg.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"200\" height=\"100\""));
        assert!(svg.contains("<g data-id="));
        assert!(svg.contains("transform=\"rotate(15 10 10)\""));
        assert!(svg.contains("<circle cx=\"10\" cy=\"10\" r=\"4\""));
        assert!(svg.contains("cursor: nw-resize"));

        scene.remove(group).unwrap();
        assert!(!scene.contains(handle));
        assert!(scene.is_empty());
    }

    #[test]
    fn test_svg_escapes_cursor() {
        let mut scene = VectorBackend::default();
        let root = scene.root();
        let rect = scene
            .create_rect(root, BoundingRect::new(0.0, 0.0, 10.0, 10.0), ChromeKind::Content)
            .unwrap();
        scene.set_cursor(rect, "url(\"a.svg\") 4 4, <auto>").unwrap();

        let svg = scene.to_svg();
        assert!(svg.contains("style=\"cursor: url(&quot;a.svg&quot;) 4 4, &lt;auto&gt;\""));
        assert_eq!(scene.node(rect).unwrap().cursor(), Some("url(\"a.svg\") 4 4, <auto>"));
    }
}
