//! Canvas and DOM output
//!
//! The string builders here are plain Rust so the native tests cover
//! them; the `canvas` and `dom` submodules push the results into the
//! browser.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
#[cfg(target_arch = "wasm32")]
pub mod dom;

#[cfg(target_arch = "wasm32")]
pub use canvas::ParticleCanvas;
#[cfg(target_arch = "wasm32")]
pub use dom::DomView;

use glam::Vec2;

use crate::consts::ACCENT_RGB;
use crate::engine::{PointerState, UnitFrame};

/// CSS `rgba()` in the accent gold
pub fn accent_rgba(alpha: f32) -> String {
    let (r, g, b) = ACCENT_RGB;
    format!("rgba({},{},{},{:.3})", r, g, b, alpha.clamp(0.0, 1.0))
}

/// Vertical progress bar: scaled from the top edge
pub fn progress_bar_css(progress: f32) -> String {
    format!(
        "transform: scaleY({:.4}); transform-origin: top;",
        progress.clamp(0.0, 1.0)
    )
}

/// Cursor ring follows the raw client position; hidden before any input
pub fn cursor_ring_css(pointer: &PointerState) -> String {
    match pointer.client {
        Some(pos) => format!(
            "transform: translate3d({:.1}px, {:.1}px, 0); opacity: 1;",
            pos.x, pos.y
        ),
        None => "opacity: 0;".to_string(),
    }
}

/// `transform` value for a magnetic element pulled by `offset`
pub fn magnetic_transform(offset: Vec2) -> String {
    format!("translate({:.2}px, {:.2}px)", offset.x, offset.y)
}

/// Inline styles for every unit of a reveal, in order
pub fn unit_styles(frames: &[UnitFrame]) -> Vec<String> {
    frames.iter().map(UnitFrame::css).collect()
}
