//! Viewport intersection gates
//!
//! A gate answers "is this element in view?" for one mounted element.
//! Gates live in a slot arena (vector + free list); handles carry a
//! generation so a handle kept past `unmount` is rejected instead of
//! aliasing whichever gate reused its slot.

use serde::{Deserialize, Serialize};

use super::viewport::{Rect, ViewportSize};
use crate::error::GateError;

/// Latching behaviour of a gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RevealMode {
    /// Latches visible after the first entry; replay-proof
    Once,
    /// Follows every enter / exit
    Continuous,
}

/// How far the viewport is grown (positive) or shrunk (negative) before
/// testing intersection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RootMargin {
    Pixels(f32),
    /// Percent of the viewport height
    Percent(f32),
}

impl RootMargin {
    /// Entrance reveals trigger once the element is 10% of the viewport in
    pub const REVEAL: RootMargin = RootMargin::Percent(-10.0);
    /// Continuous effects start slightly before the element scrolls in
    pub const PREFETCH: RootMargin = RootMargin::Pixels(50.0);

    pub fn resolve(&self, viewport: ViewportSize) -> f32 {
        match *self {
            RootMargin::Pixels(px) => px,
            RootMargin::Percent(pct) => viewport.height * pct / 100.0,
        }
    }

    /// The viewport box the element is tested against
    pub fn root(&self, viewport: ViewportSize) -> Rect {
        Rect::new(0.0, 0.0, viewport.width, viewport.height).inflate(self.resolve(viewport))
    }
}

/// Collision-free id for per-instance visual effects (filters, masks)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ScopeId(pub u64);

impl ScopeId {
    /// SVG filter id unique to this instance
    pub fn filter_id(&self) -> String {
        format!("reveal-filter-{}", self.0)
    }
}

/// Handle to a mounted gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GateHandle {
    slot: u32,
    generation: u32,
}

impl GateHandle {
    /// Packed form, stable for the handle's lifetime (used as a DOM key)
    pub fn as_u64(&self) -> u64 {
        (u64::from(self.generation) << 32) | u64::from(self.slot)
    }
}

/// Visibility state of one mounted element
#[derive(Debug, Clone, PartialEq)]
pub struct IntersectionRecord {
    pub handle: GateHandle,
    pub scope: ScopeId,
    pub mode: RevealMode,
    pub margin: RootMargin,
    /// Monotonic: false -> true, never back
    pub has_entered_once: bool,
    pub is_currently_visible: bool,
}

impl IntersectionRecord {
    pub fn is_in_view(&self) -> bool {
        match self.mode {
            RevealMode::Once => self.has_entered_once,
            RevealMode::Continuous => self.is_currently_visible,
        }
    }

    /// Feed a raw intersection result; returns how `is_in_view` moved
    fn record(&mut self, intersecting: bool) -> Transition {
        let before = self.is_in_view();
        self.is_currently_visible = intersecting;
        if intersecting {
            self.has_entered_once = true;
        }
        match (before, self.is_in_view()) {
            (false, true) => Transition::Entered,
            (true, false) => Transition::Exited,
            _ => Transition::Unchanged,
        }
    }
}

/// Change of a gate's `is_in_view` output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Entered,
    Exited,
    Unchanged,
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    record: Option<IntersectionRecord>,
}

/// Arena of mounted gates
#[derive(Debug, Default)]
pub struct GateRegistry {
    slots: Vec<Slot>,
    free: Vec<u32>,
    next_scope: u64,
    live: usize,
}

impl GateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount a gate for a new element
    pub fn mount(&mut self, mode: RevealMode, margin: RootMargin) -> GateHandle {
        let scope = ScopeId(self.next_scope);
        self.next_scope += 1;

        let slot = match self.free.pop() {
            Some(slot) => slot,
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    record: None,
                });
                (self.slots.len() - 1) as u32
            }
        };
        let entry = &mut self.slots[slot as usize];
        let handle = GateHandle {
            slot,
            generation: entry.generation,
        };
        entry.record = Some(IntersectionRecord {
            handle,
            scope,
            mode,
            margin,
            has_entered_once: false,
            is_currently_visible: false,
        });
        self.live += 1;
        handle
    }

    /// Unmount a gate, releasing its slot and scope id
    pub fn unmount(&mut self, handle: GateHandle) -> Result<IntersectionRecord, GateError> {
        let entry = self
            .slots
            .get_mut(handle.slot as usize)
            .filter(|s| s.generation == handle.generation && s.record.is_some())
            .ok_or(GateError::NotMounted(handle.as_u64()))?;
        let record = entry.record.take().ok_or(GateError::NotMounted(handle.as_u64()))?;
        entry.generation = entry.generation.wrapping_add(1);
        self.free.push(handle.slot);
        self.live -= 1;
        Ok(record)
    }

    pub fn get(&self, handle: GateHandle) -> Result<&IntersectionRecord, GateError> {
        self.slots
            .get(handle.slot as usize)
            .filter(|s| s.generation == handle.generation)
            .and_then(|s| s.record.as_ref())
            .ok_or(GateError::NotMounted(handle.as_u64()))
    }

    fn get_mut(&mut self, handle: GateHandle) -> Result<&mut IntersectionRecord, GateError> {
        self.slots
            .get_mut(handle.slot as usize)
            .filter(|s| s.generation == handle.generation)
            .and_then(|s| s.record.as_mut())
            .ok_or(GateError::NotMounted(handle.as_u64()))
    }

    pub fn is_in_view(&self, handle: GateHandle) -> Result<bool, GateError> {
        self.get(handle).map(IntersectionRecord::is_in_view)
    }

    /// Feed an intersection result computed elsewhere (e.g. a browser observer)
    pub fn record(&mut self, handle: GateHandle, intersecting: bool) -> Result<Transition, GateError> {
        Ok(self.get_mut(handle)?.record(intersecting))
    }

    /// Test an element box against the gate's margin-adjusted viewport
    pub fn observe(
        &mut self,
        handle: GateHandle,
        rect: Rect,
        viewport: ViewportSize,
    ) -> Result<Transition, GateError> {
        let record = self.get_mut(handle)?;
        let intersecting = rect.intersects(&record.margin.root(viewport));
        Ok(record.record(intersecting))
    }

    /// Handles of every mounted gate, in slot order
    pub fn handles(&self) -> impl Iterator<Item = GateHandle> + '_ {
        self.slots
            .iter()
            .filter_map(|s| s.record.as_ref().map(|r| r.handle))
    }

    /// Mounted gates that still care about geometry. Latched `Once` gates
    /// can never change again and are skipped.
    pub fn pending(&self) -> impl Iterator<Item = GateHandle> + '_ {
        self.slots.iter().filter_map(|s| {
            s.record
                .as_ref()
                .filter(|r| !(r.mode == RevealMode::Once && r.has_entered_once))
                .map(|r| r.handle)
        })
    }

    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Unmount everything (view teardown)
    pub fn clear(&mut self) {
        let handles: Vec<_> = self.handles().collect();
        for handle in handles {
            let _ = self.unmount(handle);
        }
    }
}
