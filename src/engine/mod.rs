//! Deterministic presentation core
//!
//! All scroll, pointer and animation logic lives here. This module stays pure:
//! - No DOM or canvas access (the platform layer feeds plain data in)
//! - Seeded RNG only
//! - Time only as explicit arguments
//! - Fixed-step integration for springs

pub mod classifier;
pub mod ease;
pub mod frame_clock;
pub mod intersection;
pub mod layout;
pub mod particles;
pub mod pointer;
pub mod presentation;
pub mod text_reveal;
pub mod viewport;

pub use classifier::{ScrollClassifier, ScrollState, SectionReadout, active_index, scroll_target};
pub use ease::{CubicBezier, Spring};
pub use frame_clock::{Coalesce, FrameClock, Signal};
pub use intersection::{GateHandle, GateRegistry, RevealMode, RootMargin, ScopeId, Transition};
pub use layout::{CARD_COLORS, Justify, SectionDescriptor, SectionStack, SectionStyle};
pub use particles::{FieldConfig, Particle, ParticleField, Sprite};
pub use pointer::{PointerInput, PointerReader, PointerState, PointerTracker, magnetic_offset};
pub use presentation::{FrameOutput, Presentation, RawEvent};
pub use text_reveal::{NameCycle, TextReveal, UnitFrame};
pub use viewport::{Rect, ViewportSize};
