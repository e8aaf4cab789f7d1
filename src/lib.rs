//! Stackfolio - a scroll-driven stacked-card portfolio page
//!
//! Core modules:
//! - `engine`: Deterministic presentation core (frame clock, pointer, particles,
//!   intersection gates, section stack, scroll classifier, text reveal)
//! - `content`: Site content, published-item feed, admin gate, upload checks
//! - `boundary`: Fallback rendering around risky visual subtrees
//! - `platform`: Browser glue (storage, media queries, cancelable listeners)
//! - `renderer`: Canvas/DOM output for the wasm page

pub mod boundary;
pub mod content;
pub mod engine;
pub mod error;
pub mod platform;
pub mod renderer;
pub mod settings;

pub use error::{PortfolioError, PortfolioResult};
pub use settings::Settings;

/// Page configuration constants
pub mod consts {
    /// Vertical distance between the resting tops of two stacked cards (px)
    pub const CARD_OFFSET_PX: u32 = 32;
    /// z-index of card `i` is `i * Z_INDEX_STEP + Z_INDEX_BASE`
    pub const Z_INDEX_STEP: i32 = 10;
    pub const Z_INDEX_BASE: i32 = 10;
    /// Deepest pinned offset may use at most this share of the viewport height
    pub const MAX_STACK_FRACTION: f32 = 0.5;

    /// Live particle cap
    pub const PARTICLE_CAP: usize = 40;
    /// Per-frame spawn probability while below the cap
    pub const PARTICLE_SPAWN_CHANCE: f64 = 0.03;
    /// Particles are disabled on viewports narrower than this (px)
    pub const PARTICLE_MIN_VIEWPORT_WIDTH: f32 = 768.0;
    /// Particles spawn this far below the bottom edge and die this far above the top
    pub const PARTICLE_EDGE_MARGIN: f32 = 10.0;

    /// Per-glyph stagger for split text (seconds)
    pub const GLYPH_STAGGER_SECS: f32 = 0.04;
    /// Duration of one glyph entrance (seconds)
    pub const GLYPH_DURATION_SECS: f32 = 0.5;
    /// Duration of one line slide-up (seconds)
    pub const LINE_DURATION_SECS: f32 = 0.6;
    /// Hero name rotation period (ms)
    pub const NAME_ROTATE_INTERVAL_MS: f64 = 3500.0;

    /// Progress spring parameters
    pub const PROGRESS_STIFFNESS: f32 = 100.0;
    pub const PROGRESS_DAMPING: f32 = 30.0;
    pub const PROGRESS_REST_DELTA: f32 = 0.001;
    /// Fixed spring integration step (120 Hz)
    pub const SPRING_DT: f32 = 1.0 / 120.0;
    /// Maximum spring substeps per frame to prevent spiral of death
    pub const MAX_SPRING_SUBSTEPS: u32 = 8;

    /// Featured projects shown on the landing page
    pub const FEATURED_COUNT: usize = 3;
    /// Largest image accepted by the editor (bytes)
    pub const MAX_UPLOAD_BYTES: u64 = 2 * 1024 * 1024;

    /// Accent gold used by particles, cursor ring and progress bar
    pub const ACCENT_RGB: (u8, u8, u8) = (197, 162, 101);
}

/// Zero-padded two-digit section number ("01", "09", "12")
#[inline]
pub fn pad_index(n: usize) -> String {
    format!("{:02}", n)
}

/// `value / total` as a percentage, 50% when `total` is degenerate
#[inline]
pub fn percent_of(value: f32, total: f32) -> f32 {
    if total <= 0.0 || !total.is_finite() {
        return 50.0;
    }
    value / total * 100.0
}
