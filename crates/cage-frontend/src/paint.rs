//! Paint a vector scene with egui

use cage_core::{ChromeKind, NodeId, RenderBackend};
use cage_renderer::{Shape, VectorBackend};
use egui::{Color32, Painter, Pos2, Stroke};
use glam::{Affine2, Vec2};

const STAGE_BG: Color32 = Color32::from_rgb(245, 245, 245);
const CHROME: Color32 = Color32::from_rgb(0, 120, 215);
const HANDLE_FILL: Color32 = Color32::WHITE;
const CONFIRM: Color32 = Color32::from_rgb(40, 167, 69);

/// Paint `scene` with its stage origin at `origin`.
pub fn paint_scene(painter: &Painter, origin: Pos2, scene: &VectorBackend) {
    let size = scene.size();
    painter.rect_filled(
        egui::Rect::from_min_size(origin, egui::vec2(size.x, size.y)),
        0.0,
        STAGE_BG,
    );
    paint_node(painter, origin, scene, scene.root());
}

fn paint_node(painter: &Painter, origin: Pos2, scene: &VectorBackend, id: NodeId) {
    let Some(node) = scene.node(id) else {
        return;
    };
    if !node.visible() {
        return;
    }
    let Ok(transform) = scene.world_transform(id) else {
        return;
    };
    let to_screen = |p: Vec2| {
        let p = transform.transform_point2(p);
        Pos2::new(origin.x + p.x, origin.y + p.y)
    };

    match node.shape() {
        Shape::Group | Shape::Viewport => {
            for child in node.children() {
                paint_node(painter, origin, scene, *child);
            }
        }
        Shape::Rect => {
            let Ok(rect) = scene.geometry(id) else {
                return;
            };
            let corners: Vec<Pos2> = rect.corners().into_iter().map(to_screen).collect();
            match node.kind() {
                ChromeKind::Frame => {
                    let mut outline = corners.clone();
                    outline.push(corners[0]);
                    painter.extend(egui::Shape::dashed_line(
                        &outline,
                        Stroke::new(1.0, CHROME),
                        4.0,
                        3.0,
                    ));
                }
                ChromeKind::ConfirmIcon => paint_check(painter, &transform, origin, rect),
                _ => {
                    let fill = node
                        .fill()
                        .map(|[r, g, b, a]| Color32::from_rgba_unmultiplied(r, g, b, a))
                        .unwrap_or(Color32::GRAY);
                    painter.add(egui::Shape::convex_polygon(corners, fill, Stroke::NONE));
                }
            }
        }
        Shape::Circle => {
            let Ok(rect) = scene.geometry(id) else {
                return;
            };
            let fill = match node.kind() {
                ChromeKind::RotateHandle => CHROME,
                _ => HANDLE_FILL,
            };
            painter.circle(
                to_screen(rect.center()),
                rect.width.min(rect.height) / 2.0,
                fill,
                Stroke::new(1.0, CHROME),
            );
        }
        Shape::Line { from, to } => {
            painter.line_segment([to_screen(from), to_screen(to)], Stroke::new(1.0, CHROME));
        }
    }
}

/// Check mark filling the confirm icon box
fn paint_check(painter: &Painter, transform: &Affine2, origin: Pos2, rect: cage_core::BoundingRect) {
    let points = [
        Vec2::new(rect.left + rect.width * 0.25, rect.top + rect.height * 0.5),
        Vec2::new(rect.left + rect.width * 0.45, rect.bottom()),
        Vec2::new(rect.left + rect.width * 0.75, rect.top),
    ]
    .into_iter()
    .map(|p| {
        let p = transform.transform_point2(p);
        Pos2::new(origin.x + p.x, origin.y + p.y)
    })
    .collect();
    painter.line(points, Stroke::new(2.0, CONFIRM));
}
