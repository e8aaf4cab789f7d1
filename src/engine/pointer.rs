//! Pointer tracking
//!
//! One tracker writes, any number of overlays read. The shared store is a
//! plain `Rc<Cell<_>>` pair handed out by [`pointer_channel`]; only the
//! [`PointerTracker`] half can write.

use std::cell::Cell;
use std::rc::Rc;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::viewport::{Rect, ViewportSize};
use crate::percent_of;

/// Magnetic buttons follow the pointer by this share of its offset
pub const MAGNETIC_STRENGTH: f32 = 0.3;

/// Normalized pointer position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerState {
    /// Horizontal position, percent of viewport width
    pub x_percent: f32,
    /// Vertical position, percent of viewport height
    pub y_percent: f32,
    /// Last raw client position (px); `None` before the first input
    pub client: Option<Vec2>,
}

impl Default for PointerState {
    fn default() -> Self {
        Self {
            x_percent: 50.0,
            y_percent: 50.0,
            client: None,
        }
    }
}

impl PointerState {
    /// `--x` / `--y` custom property values
    pub fn css_vars(&self) -> [(&'static str, String); 2] {
        [
            ("--x", format!("{:.2}%", self.x_percent)),
            ("--y", format!("{:.2}%", self.y_percent)),
        ]
    }

    /// Client position, viewport center before any input
    pub fn client_or_center(&self, viewport: ViewportSize) -> Vec2 {
        self.client.unwrap_or_else(|| viewport.center())
    }
}

/// A raw pointer event, already reduced to coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerInput {
    Mouse { x: f32, y: f32 },
    /// First touch point of a touchstart / touchmove; `None` for an empty list
    Touch { first: Option<Vec2> },
    TouchEnd,
}

impl PointerInput {
    /// Client coordinates this event moves the pointer to
    pub fn position(&self) -> Option<Vec2> {
        match *self {
            PointerInput::Mouse { x, y } => Some(Vec2::new(x, y)),
            PointerInput::Touch { first } => first,
            PointerInput::TouchEnd => None,
        }
    }
}

#[derive(Debug, Default)]
struct Shared {
    state: Cell<PointerState>,
    revision: Cell<u64>,
}

/// Create the single writer and a first reader
pub fn pointer_channel() -> (PointerTracker, PointerReader) {
    let shared = Rc::new(Shared::default());
    (
        PointerTracker {
            shared: shared.clone(),
        },
        PointerReader { shared },
    )
}

/// Exclusive writer of [`PointerState`]
#[derive(Debug)]
pub struct PointerTracker {
    shared: Rc<Shared>,
}

impl PointerTracker {
    /// Apply a coalesced pointer event; returns true if the published state changed
    pub fn apply(&mut self, input: PointerInput, viewport: ViewportSize) -> bool {
        let Some(pos) = input.position() else {
            // Touch end keeps the last known position
            return false;
        };

        let next = PointerState {
            x_percent: percent_of(pos.x, viewport.width).clamp(0.0, 100.0),
            y_percent: percent_of(pos.y, viewport.height).clamp(0.0, 100.0),
            client: Some(pos),
        };
        if next == self.shared.state.get() {
            return false;
        }
        self.shared.state.set(next);
        self.shared.revision.set(self.shared.revision.get() + 1);
        true
    }

    /// Re-express the last client position against a new viewport size
    pub fn renormalize(&mut self, viewport: ViewportSize) -> bool {
        match self.shared.state.get().client {
            Some(pos) => self.apply(PointerInput::Mouse { x: pos.x, y: pos.y }, viewport),
            None => false,
        }
    }

    pub fn reader(&self) -> PointerReader {
        PointerReader {
            shared: self.shared.clone(),
        }
    }

    pub fn state(&self) -> PointerState {
        self.shared.state.get()
    }
}

/// Read-only handle to the pointer store
#[derive(Debug, Clone)]
pub struct PointerReader {
    shared: Rc<Shared>,
}

impl PointerReader {
    pub fn get(&self) -> PointerState {
        self.shared.state.get()
    }

    /// Increments on every published change
    pub fn revision(&self) -> u64 {
        self.shared.revision.get()
    }
}

/// Offset a magnetic element should be pulled by, given the pointer and the
/// element's box
pub fn magnetic_offset(pointer: Vec2, element: Rect) -> Vec2 {
    (pointer - element.center()) * MAGNETIC_STRENGTH
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEW: ViewportSize = ViewportSize {
        width: 1000.0,
        height: 500.0,
    };

    #[test]
    fn test_default_is_center() {
        let (_tracker, reader) = pointer_channel();
        let state = reader.get();
        assert_eq!((state.x_percent, state.y_percent), (50.0, 50.0));
        assert!(state.client.is_none());
        assert_eq!(state.client_or_center(VIEW), Vec2::new(500.0, 250.0));
        assert_eq!(reader.revision(), 0);
    }

    #[test]
    fn test_mouse_and_touch_normalize_identically() {
        let (mut mouse, mouse_reader) = pointer_channel();
        let (mut touch, touch_reader) = pointer_channel();
        mouse.apply(PointerInput::Mouse { x: 250.0, y: 400.0 }, VIEW);
        touch.apply(
            PointerInput::Touch {
                first: Some(Vec2::new(250.0, 400.0)),
            },
            VIEW,
        );
        assert_eq!(mouse_reader.get(), touch_reader.get());
        assert_eq!(mouse_reader.get().x_percent, 25.0);
        assert_eq!(mouse_reader.get().y_percent, 80.0);
    }

    #[test]
    fn test_touch_end_keeps_last_position() {
        let (mut tracker, reader) = pointer_channel();
        tracker.apply(PointerInput::Mouse { x: 100.0, y: 100.0 }, VIEW);
        let before = reader.get();
        assert!(!tracker.apply(PointerInput::TouchEnd, VIEW));
        assert!(!tracker.apply(PointerInput::Touch { first: None }, VIEW));
        assert_eq!(reader.get(), before);
        assert_eq!(reader.revision(), 1);
    }

    #[test]
    fn test_all_readers_see_writes() {
        let (mut tracker, first) = pointer_channel();
        let second = tracker.reader();
        let third = first.clone();
        tracker.apply(PointerInput::Mouse { x: 0.0, y: 500.0 }, VIEW);
        for reader in [&first, &second, &third] {
            assert_eq!(reader.get().x_percent, 0.0);
            assert_eq!(reader.get().y_percent, 100.0);
        }
    }

    #[test]
    fn test_renormalize_after_resize() {
        let (mut tracker, reader) = pointer_channel();
        assert!(!tracker.renormalize(VIEW));
        tracker.apply(PointerInput::Mouse { x: 500.0, y: 250.0 }, VIEW);
        tracker.renormalize(ViewportSize::new(2000.0, 500.0));
        assert_eq!(reader.get().x_percent, 25.0);
    }

    #[test]
    fn test_css_vars_format() {
        let vars = PointerState::default().css_vars();
        assert_eq!(vars[0], ("--x", "50.00%".to_string()));
        assert_eq!(vars[1], ("--y", "50.00%".to_string()));
    }

    #[test]
    fn test_magnetic_offset() {
        let rect = Rect::new(100.0, 100.0, 100.0, 50.0);
        let offset = magnetic_offset(Vec2::new(160.0, 125.0), rect);
        assert!((offset.x - 3.0).abs() < 1e-5);
        assert_eq!(offset.y, 0.0);
    }
}
