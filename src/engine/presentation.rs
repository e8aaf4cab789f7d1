//! Page-level presentation driver
//!
//! Owns every engine component for one mounted page. The platform layer
//! forwards raw events through [`Presentation::on_event`] and runs
//! [`Presentation::on_frame`] from its animation-frame callback, then
//! applies the returned [`FrameOutput`] to the DOM and canvas.

use std::collections::HashMap;

use glam::Vec2;

use super::classifier::{scroll_target, ScrollClassifier, ScrollState, SectionReadout};
use super::frame_clock::{Coalesce, FrameClock, Signal};
use super::intersection::{GateHandle, GateRegistry, RevealMode, RootMargin, Transition};
use super::layout::{SectionStack, SectionStyle};
use super::particles::{FieldConfig, ParticleField, Sprite};
use super::pointer::{pointer_channel, PointerInput, PointerReader, PointerTracker};
use super::text_reveal::{NameCycle, TextReveal, UnitFrame};
use super::viewport::{Rect, ViewportSize};
use crate::error::GateError;
use crate::settings::Settings;

/// Longest frame delta fed to time-based animation, in seconds
const MAX_FRAME_DT: f32 = 0.1;

/// Raw browser event, reduced to plain data
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawEvent {
    Scroll { offset_px: f64, document_height: f64 },
    Pointer(PointerInput),
    Resize(ViewportSize),
}

/// Everything that happened since the last frame, newest value per field
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInput {
    pub scroll: Option<(f64, f64)>,
    pub pointer: Option<PointerInput>,
    pub viewport: Option<ViewportSize>,
}

impl Coalesce for FrameInput {
    fn coalesce(&mut self, newer: Self) {
        if newer.scroll.is_some() {
            self.scroll = newer.scroll;
        }
        // A touch end carries no position; the last move stays authoritative
        if newer.pointer.and_then(|p| p.position()).is_some() {
            self.pointer = newer.pointer;
        } else if self.pointer.is_none() {
            self.pointer = newer.pointer;
        }
        if newer.viewport.is_some() {
            self.viewport = newer.viewport;
        }
    }
}

impl From<RawEvent> for FrameInput {
    fn from(event: RawEvent) -> Self {
        match event {
            RawEvent::Scroll {
                offset_px,
                document_height,
            } => FrameInput {
                scroll: Some((offset_px, document_height)),
                ..Default::default()
            },
            RawEvent::Pointer(input) => FrameInput {
                pointer: Some(input),
                ..Default::default()
            },
            RawEvent::Resize(size) => FrameInput {
                viewport: Some(size),
                ..Default::default()
            },
        }
    }
}

/// What the platform layer must apply after a frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameOutput {
    /// Present when the active section changed (or on the first frame)
    pub readout: Option<SectionReadout>,
    pub active_section: usize,
    /// Smoothed progress bar position, 0..=1
    pub progress: f32,
    /// `--x` / `--y` values, present when the pointer moved
    pub pointer_vars: Option<[(&'static str, String); 2]>,
    /// Fresh card styles after a viewport change
    pub layout: Option<Vec<SectionStyle>>,
    pub sprites: Vec<Sprite>,
    pub gate_transitions: Vec<(GateHandle, Transition)>,
    pub text_frames: Vec<(GateHandle, Vec<UnitFrame>)>,
    /// New headline text when the rotation advanced
    pub headline: Option<String>,
}

#[derive(Debug)]
struct TextEntry {
    reveal: TextReveal,
    /// Final pose already emitted
    settled: bool,
}

pub struct Presentation {
    clock: FrameClock<FrameInput>,
    tracker: PointerTracker,
    reader: PointerReader,
    viewport: ViewportSize,
    stack: SectionStack,
    layout: Vec<SectionStyle>,
    classifier: ScrollClassifier,
    particles: ParticleField,
    gates: GateRegistry,
    texts: HashMap<GateHandle, TextEntry>,
    headline: NameCycle,
    last_frame_ms: Option<f64>,
    first_frame: bool,
}

impl Presentation {
    pub fn new(
        settings: &Settings,
        stack: SectionStack,
        viewport: ViewportSize,
        headline: Vec<String>,
        seed: u64,
    ) -> Self {
        let (tracker, reader) = pointer_channel();
        let layout = stack.layout(viewport.height_px());
        let classifier = ScrollClassifier::new(stack.labels());
        let particles = ParticleField::new(FieldConfig::from_settings(settings), viewport, seed);

        log::info!(
            "Presentation mounted: {} sections, viewport {}x{}, particles {}",
            stack.len(),
            viewport.width,
            viewport.height,
            if particles.is_active() { "on" } else { "off" }
        );

        Self {
            clock: FrameClock::new(),
            tracker,
            reader,
            viewport,
            stack,
            layout,
            classifier,
            particles,
            gates: GateRegistry::new(),
            texts: HashMap::new(),
            headline: NameCycle::new(headline, settings.name_rotate_interval_ms),
            last_frame_ms: None,
            first_frame: true,
        }
    }

    /// Forward a raw event; the caller requests an animation frame on
    /// [`Signal::RequestFrame`]
    pub fn on_event(&mut self, event: RawEvent) -> Signal {
        self.clock.signal(FrameInput::from(event))
    }

    /// Shared pointer store for components outside the driver
    pub fn pointer(&self) -> PointerReader {
        self.reader.clone()
    }

    pub fn mount_gate(&mut self, mode: RevealMode, margin: RootMargin) -> GateHandle {
        self.gates.mount(mode, margin)
    }

    /// Mount a text block behind a once-gate
    pub fn mount_text(&mut self, reveal: TextReveal) -> GateHandle {
        let handle = self.gates.mount(RevealMode::Once, RootMargin::REVEAL);
        self.texts.insert(
            handle,
            TextEntry {
                reveal,
                settled: false,
            },
        );
        handle
    }

    pub fn unmount(&mut self, handle: GateHandle) -> Result<(), GateError> {
        self.gates.unmount(handle)?;
        self.texts.remove(&handle);
        Ok(())
    }

    pub fn gates(&self) -> &GateRegistry {
        &self.gates
    }

    pub fn layout(&self) -> &[SectionStyle] {
        &self.layout
    }

    pub fn stack(&self) -> &SectionStack {
        &self.stack
    }

    pub fn viewport(&self) -> ViewportSize {
        self.viewport
    }

    pub fn active_section(&self) -> usize {
        self.classifier.active()
    }

    pub fn headline(&self) -> &str {
        self.headline.current()
    }

    /// Scroll offset for the navigation menu's jump to section `index`
    pub fn scroll_to(&self, index: usize) -> u32 {
        let index = index.min(self.stack.len().saturating_sub(1));
        scroll_target(index, self.viewport.height_px())
    }

    /// SVG filter id scoped to the gate behind `handle`
    pub fn filter_id(&self, handle: GateHandle) -> Result<String, GateError> {
        self.gates.get(handle).map(|record| record.scope.filter_id())
    }

    /// Pull offset for a magnetic element at `rect`
    pub fn magnetic_offset(&self, rect: Rect) -> Vec2 {
        let pointer = self.reader.get().client_or_center(self.viewport);
        super::pointer::magnetic_offset(pointer, rect)
    }

    /// Run one animation frame. `measure` returns the current client rect
    /// of a gate's element, or `None` if it is not in the document.
    pub fn on_frame(
        &mut self,
        now_ms: f64,
        measure: impl Fn(GateHandle) -> Option<Rect>,
    ) -> FrameOutput {
        let mut out = FrameOutput::default();
        if self.clock.is_cancelled() {
            return out;
        }

        let input = self.clock.take_frame().unwrap_or_default();

        let mut resized = false;
        if let Some(size) = input.viewport
            && size != self.viewport
        {
            resized = true;
            self.viewport = size;
            self.particles.resize(size);
            self.tracker.renormalize(size);
            self.layout = self.stack.layout(size.height_px());
            out.layout = Some(self.layout.clone());
            log::debug!("Viewport resized to {}x{}", size.width, size.height);
        }

        // A resize moves section boundaries even without a scroll event
        let scroll_input = input.scroll.or_else(|| {
            resized.then(|| {
                let last = self.classifier.scroll();
                (
                    f64::from(last.offset_px),
                    f64::from(self.classifier.document_height()),
                )
            })
        });
        if let Some((offset, document_height)) = scroll_input {
            let scroll = ScrollState::new(offset, f64::from(self.viewport.height));
            let document_height = document_height.max(0.0).round() as u32;
            let classified = self.classifier.update(scroll, document_height);
            if classified.changed {
                log::debug!("Active section -> {}", classified.active);
            }
            if classified.changed || self.first_frame {
                out.readout = Some(self.classifier.readout());
            }
        } else if self.first_frame {
            out.readout = Some(self.classifier.readout());
        }
        out.active_section = self.classifier.active();

        if let Some(pointer) = input.pointer
            && self.tracker.apply(pointer, self.viewport)
        {
            out.pointer_vars = Some(self.reader.get().css_vars());
        }

        let dt = match self.last_frame_ms {
            Some(last) => ((now_ms - last) / 1000.0).clamp(0.0, f64::from(MAX_FRAME_DT)) as f32,
            None => 0.0,
        };
        self.last_frame_ms = Some(now_ms);
        out.progress = self.classifier.tick(dt);

        let pending: Vec<_> = self.gates.pending().collect();
        for handle in pending {
            let Some(rect) = measure(handle) else {
                continue;
            };
            match self.gates.observe(handle, rect, self.viewport) {
                Ok(Transition::Unchanged) => {}
                Ok(transition) => out.gate_transitions.push((handle, transition)),
                Err(e) => log::warn!("Gate observe failed: {}", e),
            }
        }

        let now_secs = now_ms / 1000.0;
        for (handle, entry) in self.texts.iter_mut() {
            let in_view = self.gates.is_in_view(*handle).unwrap_or(false);
            entry.reveal.gate(in_view, now_secs);
            if !entry.reveal.is_started() || entry.settled {
                continue;
            }
            out.text_frames.push((*handle, entry.reveal.frame(now_secs)));
            if entry.reveal.is_complete(now_secs) {
                entry.settled = true;
            }
        }

        if self.particles.is_active() {
            self.particles.step();
            out.sprites = self.particles.sprites().collect();
        }

        if self.headline.advance(now_ms) {
            out.headline = Some(self.headline.current().to_string());
        }

        self.first_frame = false;
        out
    }

    /// True while something still animates without new input
    pub fn wants_frames(&self) -> bool {
        if self.clock.is_cancelled() {
            return false;
        }
        self.particles.is_active()
            || !self.classifier.is_settled()
            || self.texts.values().any(|t| !t.settled)
            || self.headline.rotates()
    }

    /// Stop scheduling and drop every mounted piece
    pub fn teardown(&mut self) {
        self.clock.cancel();
        self.gates.clear();
        self.texts.clear();
        self.particles.clear();
        log::info!("Presentation torn down");
    }

    pub fn is_torn_down(&self) -> bool {
        self.clock.is_cancelled()
    }
}
