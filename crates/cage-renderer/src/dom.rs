//! DOM-style backend
//!
//! Elements are absolutely positioned boxes whose `left`/`top` are offsets
//! from their parent's box, the way inline styles lay out children of a
//! positioned container. Rotation is a `rotate()` transform with a
//! `transform-origin` relative to the element itself. The backend converts
//! between those parent-relative values and the stage coordinates used by
//! [`RenderBackend`].

use std::collections::HashMap;
use std::fmt::Write as _;

use cage_core::{
    BackendError, BackendKind, BackendResult, BoundingRect, ChromeKind, NodeId, RenderBackend,
};
use glam::{Affine2, Vec2};

use crate::markup::escape_attr;
use crate::transform::rotation_about;

/// CSS `display` of an element while it is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Display {
    /// Block box; accepts transforms
    #[default]
    Block,
    /// Inline box; transforms do not apply
    Inline,
}

/// A single element in the tree
#[derive(Debug, Clone)]
pub struct DomElement {
    tag: &'static str,
    class: String,
    kind: ChromeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    /// `left`/`top`, relative to the parent box
    offset: Vec2,
    size: Vec2,
    rotation: f32,
    /// Relative to the element's own top-left
    transform_origin: Vec2,
    display: Display,
    visible: bool,
    cursor: Option<String>,
    is_line: bool,
}

impl DomElement {
    fn new(tag: &'static str, class: impl Into<String>, kind: ChromeKind, parent: NodeId) -> Self {
        Self {
            tag,
            class: class.into(),
            kind,
            parent: Some(parent),
            children: Vec::new(),
            offset: Vec2::ZERO,
            size: Vec2::ZERO,
            rotation: 0.0,
            transform_origin: Vec2::ZERO,
            display: Display::Block,
            visible: true,
            cursor: None,
            is_line: false,
        }
    }

    /// Tag name, e.g. `"div"`
    pub fn tag(&self) -> &str {
        self.tag
    }

    /// Class attribute
    pub fn class(&self) -> &str {
        &self.class
    }

    /// Overlay role of the element
    pub fn kind(&self) -> ChromeKind {
        self.kind
    }

    /// Parent element, `None` for the stage root
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Child elements in document order
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Display mode used while the element is shown
    pub fn display(&self) -> Display {
        self.display
    }

    /// Inline style attribute
    pub fn style(&self) -> String {
        let mut css = String::from("position: absolute;");
        let _ = write!(
            css,
            " left: {}px; top: {}px; width: {}px; height: {}px;",
            self.offset.x, self.offset.y, self.size.x, self.size.y
        );
        if !self.visible {
            css.push_str(" display: none;");
        } else if self.display == Display::Inline {
            css.push_str(" display: inline;");
        }
        if self.rotation != 0.0 {
            let _ = write!(
                css,
                " transform: rotate({}deg); transform-origin: {}px {}px;",
                self.rotation, self.transform_origin.x, self.transform_origin.y
            );
        }
        if let Some(cursor) = &self.cursor {
            let _ = write!(css, " cursor: {};", cursor);
        }
        css
    }

    /// Value of a single style property as it would appear inline
    pub fn style_value(&self, property: &str) -> Option<String> {
        match property {
            "left" => Some(format!("{}px", self.offset.x)),
            "top" => Some(format!("{}px", self.offset.y)),
            "width" => Some(format!("{}px", self.size.x)),
            "height" => Some(format!("{}px", self.size.y)),
            "display" => Some(
                match (self.visible, self.display) {
                    (false, _) => "none",
                    (true, Display::Block) => "block",
                    (true, Display::Inline) => "inline",
                }
                .to_string(),
            ),
            "transform" => (self.rotation != 0.0).then(|| format!("rotate({}deg)", self.rotation)),
            "transform-origin" => (self.rotation != 0.0).then(|| {
                format!("{}px {}px", self.transform_origin.x, self.transform_origin.y)
            }),
            "cursor" => self.cursor.clone(),
            _ => None,
        }
    }
}

/// Chrome class names
fn chrome_class(kind: ChromeKind) -> (&'static str, &'static str) {
    match kind {
        ChromeKind::Frame => ("div", "resize-container"),
        ChromeKind::Handle => ("div", "resize-handle"),
        ChromeKind::RotateBar => ("div", "resize-rotate-bar"),
        ChromeKind::RotateHandle => ("div", "resize-rotate-handle"),
        ChromeKind::ConfirmIcon => ("span", "resize-confirm"),
        ChromeKind::Content => ("div", ""),
    }
}

/// In-memory element tree driven like a page of positioned elements.
#[derive(Debug, Clone)]
pub struct DomBackend {
    root: NodeId,
    elements: HashMap<NodeId, DomElement>,
}

impl Default for DomBackend {
    fn default() -> Self {
        Self::new(Vec2::new(800.0, 600.0))
    }
}

impl DomBackend {
    /// Create a backend whose stage root has the given size.
    pub fn new(stage_size: Vec2) -> Self {
        let root = NodeId::new();
        let mut stage = DomElement::new("div", "stage", ChromeKind::Content, root);
        stage.parent = None;
        stage.size = stage_size;

        let mut elements = HashMap::new();
        elements.insert(root, stage);
        Self { root, elements }
    }

    /// Look up an element
    pub fn element(&self, node: NodeId) -> Option<&DomElement> {
        self.elements.get(&node)
    }

    /// Number of live elements, the stage root included
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns true if only the stage root exists
    pub fn is_empty(&self) -> bool {
        self.elements.len() <= 1
    }

    /// Inline style of `node`
    pub fn style(&self, node: NodeId) -> BackendResult<String> {
        Ok(self.get(node)?.style())
    }

    /// A single inline style property of `node`
    pub fn style_value(&self, node: NodeId, property: &str) -> BackendResult<Option<String>> {
        Ok(self.get(node)?.style_value(property))
    }

    /// Create a host content element at `rect` (stage coordinates).
    pub fn create_element(
        &mut self,
        parent: NodeId,
        tag: &'static str,
        class: &str,
        rect: BoundingRect,
    ) -> BackendResult<NodeId> {
        let mut element = DomElement::new(tag, class, ChromeKind::Content, parent);
        element.offset = rect.origin() - self.absolute_origin(parent)?;
        element.size = rect.size();
        self.insert(parent, element)
    }

    /// Change the display mode of `node`.
    ///
    /// Switching to [`Display::Inline`] drops any rotation, since inline
    /// boxes ignore transforms.
    pub fn set_display(&mut self, node: NodeId, display: Display) -> BackendResult<()> {
        let element = self.get_mut(node)?;
        element.display = display;
        if display == Display::Inline {
            element.rotation = 0.0;
        }
        Ok(())
    }

    /// Serialise the tree to HTML
    pub fn to_html(&self) -> String {
        let mut html = String::new();
        self.write_html(self.root, 0, &mut html);
        html
    }

    fn write_html(&self, node: NodeId, depth: usize, out: &mut String) {
        let Some(element) = self.elements.get(&node) else {
            return;
        };
        let indent = "  ".repeat(depth);
        let _ = write!(out, "{}<{} data-id=\"{}\"", indent, element.tag, node);
        if !element.class.is_empty() {
            let _ = write!(out, " class=\"{}\"", escape_attr(&element.class));
        }
        let _ = write!(out, " style=\"{}\">", escape_attr(&element.style()));
        if element.children.is_empty() {
            let _ = writeln!(out, "</{}>", element.tag);
            return;
        }
        out.push('\n');
        for child in &element.children {
            self.write_html(*child, depth + 1, out);
        }
        let _ = writeln!(out, "{}</{}>", indent, element.tag);
    }

    fn get(&self, node: NodeId) -> BackendResult<&DomElement> {
        self.elements
            .get(&node)
            .ok_or(BackendError::NodeNotFound(node))
    }

    fn get_mut(&mut self, node: NodeId) -> BackendResult<&mut DomElement> {
        self.elements
            .get_mut(&node)
            .ok_or(BackendError::NodeNotFound(node))
    }

    fn insert(&mut self, parent: NodeId, element: DomElement) -> BackendResult<NodeId> {
        let id = NodeId::new();
        self.get_mut(parent)?.children.push(id);
        self.elements.insert(id, element);
        Ok(id)
    }

    fn create_chrome(
        &mut self,
        parent: NodeId,
        rect: BoundingRect,
        kind: ChromeKind,
    ) -> BackendResult<NodeId> {
        let (tag, class) = chrome_class(kind);
        let mut element = DomElement::new(tag, class, kind, parent);
        element.offset = rect.origin() - self.absolute_origin(parent)?;
        element.size = rect.size();
        self.insert(parent, element)
    }

    /// Stage position of the element's untransformed top-left
    fn absolute_origin(&self, node: NodeId) -> BackendResult<Vec2> {
        let mut element = self.get(node)?;
        let mut origin = element.offset;
        while let Some(parent) = element.parent {
            element = self.get(parent)?;
            origin += element.offset;
        }
        Ok(origin)
    }

    /// Combined rotate transforms of `node` and its ancestors
    fn world_transform(&self, node: NodeId) -> BackendResult<Affine2> {
        let element = self.get(node)?;
        let parent = match element.parent {
            Some(parent) => self.world_transform(parent)?,
            None => Affine2::IDENTITY,
        };
        let pivot = self.absolute_origin(node)? + element.transform_origin;
        Ok(parent * rotation_about(pivot, element.rotation))
    }
}

impl RenderBackend for DomBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Dom
    }

    fn root(&self) -> NodeId {
        self.root
    }

    fn contains(&self, node: NodeId) -> bool {
        self.elements.contains_key(&node)
    }

    fn create_group(&mut self, parent: NodeId) -> BackendResult<NodeId> {
        let element = DomElement::new("div", "resize-group", ChromeKind::Content, parent);
        self.insert(parent, element)
    }

    fn create_rect(
        &mut self,
        parent: NodeId,
        rect: BoundingRect,
        kind: ChromeKind,
    ) -> BackendResult<NodeId> {
        self.create_chrome(parent, rect, kind)
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
        self.create_chrome(parent, rect, kind)
    }

    fn create_line(
        &mut self,
        parent: NodeId,
        from: Vec2,
        to: Vec2,
        kind: ChromeKind,
    ) -> BackendResult<NodeId> {
        let id = self.create_chrome(parent, line_box(from, to), kind)?;
        self.get_mut(id)?.is_line = true;
        Ok(id)
    }

    fn remove(&mut self, node: NodeId) -> BackendResult<()> {
        if node == self.root {
            return Err(BackendError::Unsupported {
                node,
                operation: "removal",
            });
        }
        let element = self.get(node)?;
        if let Some(parent) = element.parent
            && let Some(parent) = self.elements.get_mut(&parent)
        {
            parent.children.retain(|child| *child != node);
        }

        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            if let Some(element) = self.elements.remove(&id) {
                stack.extend(element.children);
            }
        }
        tracing::trace!("Removed DOM element {}", node);
        Ok(())
    }

    fn set_position(&mut self, node: NodeId, top_left: Vec2) -> BackendResult<()> {
        let parent_origin = match self.get(node)?.parent {
            Some(parent) => self.absolute_origin(parent)?,
            None => Vec2::ZERO,
        };
        self.get_mut(node)?.offset = top_left - parent_origin;
        Ok(())
    }

    fn set_size(&mut self, node: NodeId, size: Vec2) -> BackendResult<()> {
        self.get_mut(node)?.size = size;
        Ok(())
    }

    fn set_line(&mut self, node: NodeId, from: Vec2, to: Vec2) -> BackendResult<()> {
        if !self.get(node)?.is_line {
            return Err(BackendError::Unsupported {
                node,
                operation: "line endpoints",
            });
        }
        let rect = line_box(from, to);
        self.set_position(node, rect.origin())?;
        self.set_size(node, rect.size())
    }

    fn set_rotation(&mut self, node: NodeId, degrees: f32, pivot: Vec2) -> BackendResult<()> {
        let origin = self.absolute_origin(node)?;
        if !self.supports_rotation(node) {
            return Err(BackendError::Unsupported {
                node,
                operation: "rotation",
            });
        }
        let element = self.get_mut(node)?;
        element.rotation = degrees;
        element.transform_origin = pivot - origin;
        Ok(())
    }

    fn rotation(&self, node: NodeId) -> BackendResult<f32> {
        Ok(self.get(node)?.rotation)
    }

    fn supports_rotation(&self, node: NodeId) -> bool {
        self.elements
            .get(&node)
            .is_some_and(|element| element.display != Display::Inline)
    }

    fn set_visible(&mut self, node: NodeId, visible: bool) -> BackendResult<()> {
        self.get_mut(node)?.visible = visible;
        Ok(())
    }

    fn is_visible(&self, node: NodeId) -> BackendResult<bool> {
        Ok(self.get(node)?.visible)
    }

    fn geometry(&self, node: NodeId) -> BackendResult<BoundingRect> {
        let origin = self.absolute_origin(node)?;
        Ok(BoundingRect::from_origin_size(origin, self.get(node)?.size))
    }

    fn bounding_rect(&self, node: NodeId) -> BackendResult<BoundingRect> {
        let transform = self.world_transform(node)?;
        let corners = self.geometry(node)?.corners();
        Ok(BoundingRect::from_points(
            corners.into_iter().map(|c| transform.transform_point2(c)),
        ))
    }

    fn set_cursor(&mut self, node: NodeId, cursor: &str) -> BackendResult<()> {
        self.get_mut(node)?.cursor = Some(cursor.to_string());
        Ok(())
    }
}

/// Box drawn for a line; one pixel wide along a zero-length axis
fn line_box(from: Vec2, to: Vec2) -> BoundingRect {
    let min = from.min(to);
    let size = (to - from).abs().max(Vec2::ONE);
    BoundingRect::from_origin_size(min, size)
}
