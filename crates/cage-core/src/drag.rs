//! Drag primitive
//!
//! Turns raw pointer down/move/up input into the gesture contract the
//! controllers consume: one `Start`, any number of `Move`s, one `End`.

use glam::Vec2;

use crate::handle::AxisLock;

/// A raw pointer sample in stage coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerEvent {
    pub position: Vec2,
}

impl PointerEvent {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
        }
    }
}

impl From<Vec2> for PointerEvent {
    fn from(position: Vec2) -> Self {
        Self { position }
    }
}

/// Phase of a drag gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPhase {
    Start,
    Move,
    End,
}

/// A gesture event emitted by [`DragTracker`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragEvent {
    pub phase: DragPhase,
    /// Pointer position with locked axes pinned to the start position
    pub pointer: Vec2,
    /// Pointer position captured at drag start
    pub pos: Vec2,
}

impl DragEvent {
    /// Travel since the drag started.
    pub fn delta(&self) -> Vec2 {
        self.pointer - self.pos
    }
}

/// Tracks a single pointer drag.
#[derive(Debug, Clone, Default)]
pub struct DragTracker {
    lock: AxisLock,
    pos: Option<Vec2>,
    raw_last: Vec2,
}

impl DragTracker {
    pub fn new(lock: AxisLock) -> Self {
        Self {
            lock,
            pos: None,
            raw_last: Vec2::ZERO,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.pos.is_some()
    }

    /// Pointer position captured at drag start.
    pub fn pos(&self) -> Option<Vec2> {
        self.pos
    }

    /// Unlocked distance travelled by the pointer so far.
    pub fn displacement(&self) -> f32 {
        self.pos
            .map(|pos| self.raw_last.distance(pos))
            .unwrap_or(0.0)
    }

    fn event(&self, phase: DragPhase, pos: Vec2, position: Vec2) -> DragEvent {
        DragEvent {
            phase,
            pointer: pos + self.lock.apply(position - pos),
            pos,
        }
    }

    /// Press. Ignored while a drag is already in progress.
    pub fn pointer_down(&mut self, position: Vec2) -> Option<DragEvent> {
        if self.pos.is_some() {
            return None;
        }
        self.pos = Some(position);
        self.raw_last = position;
        Some(self.event(DragPhase::Start, position, position))
    }

    /// Motion. Ignored unless a drag is in progress.
    pub fn pointer_move(&mut self, position: Vec2) -> Option<DragEvent> {
        let pos = self.pos?;
        self.raw_last = position;
        Some(self.event(DragPhase::Move, pos, position))
    }

    /// Release. Ends the drag unconditionally.
    pub fn pointer_up(&mut self, position: Vec2) -> Option<DragEvent> {
        let pos = self.pos.take()?;
        self.raw_last = position;
        Some(self.event(DragPhase::End, pos, position))
    }
}
