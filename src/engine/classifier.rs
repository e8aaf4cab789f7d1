//! Scroll position classification
//!
//! Maps the page scroll offset to the active card, the section readout in
//! the corner, and the smoothed progress bar on the right edge.

use serde::{Deserialize, Serialize};

use super::ease::Spring;
use crate::pad_index;

/// Raw scroll position for one coalesced frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrollState {
    pub offset_px: u32,
    /// Always at least 1
    pub viewport_height: u32,
}

impl ScrollState {
    /// Negative or non-finite offsets (overscroll bounce) clamp to 0
    pub fn new(offset_px: f64, viewport_height: f64) -> Self {
        let offset_px = if offset_px.is_finite() && offset_px > 0.0 {
            offset_px.round() as u32
        } else {
            0
        };
        let viewport_height = if viewport_height.is_finite() {
            (viewport_height.round() as u32).max(1)
        } else {
            1
        };
        Self {
            offset_px,
            viewport_height,
        }
    }
}

impl Default for ScrollState {
    fn default() -> Self {
        Self {
            offset_px: 0,
            viewport_height: 1,
        }
    }
}

/// `clamp(floor(offset / viewport_height), 0, count - 1)`
pub fn active_index(scroll: ScrollState, section_count: usize) -> usize {
    if section_count == 0 {
        return 0;
    }
    let raw = (scroll.offset_px / scroll.viewport_height.max(1)) as usize;
    raw.min(section_count - 1)
}

/// Scroll fraction of the scrollable range, 0..=1
pub fn scroll_fraction(scroll: ScrollState, document_height: u32) -> f32 {
    let scrollable = document_height.saturating_sub(scroll.viewport_height);
    if scrollable == 0 {
        return 0.0;
    }
    (scroll.offset_px as f32 / scrollable as f32).clamp(0.0, 1.0)
}

/// Scroll offset that lands section `index` (0-based) at the top
pub fn scroll_target(index: usize, viewport_height: u32) -> u32 {
    index as u32 * viewport_height
}

/// Corner readout: label plus "03 / 09"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionReadout {
    pub label: String,
    pub counter: String,
}

/// Result of classifying one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classified {
    pub active: usize,
    /// Active index differs from the previous frame
    pub changed: bool,
    pub raw_fraction: f32,
}

#[derive(Debug, Clone)]
pub struct ScrollClassifier {
    labels: Vec<String>,
    scroll: ScrollState,
    document_height: u32,
    active: usize,
    progress: Spring,
}

impl ScrollClassifier {
    pub fn new(labels: Vec<String>) -> Self {
        Self {
            labels,
            scroll: ScrollState::default(),
            document_height: 0,
            active: 0,
            progress: Spring::progress(),
        }
    }

    pub fn section_count(&self) -> usize {
        self.labels.len()
    }

    /// Classify a coalesced scroll sample
    pub fn update(&mut self, scroll: ScrollState, document_height: u32) -> Classified {
        self.scroll = scroll;
        self.document_height = document_height;

        let active = active_index(scroll, self.section_count());
        let changed = active != self.active;
        self.active = active;

        let raw_fraction = scroll_fraction(scroll, document_height);
        self.progress.set_target(raw_fraction);

        Classified {
            active,
            changed,
            raw_fraction,
        }
    }

    /// Advance the progress spring by one frame; returns the bar position
    pub fn tick(&mut self, dt: f32) -> f32 {
        self.progress.advance(dt)
    }

    pub fn active(&self) -> usize {
        self.active
    }

    pub fn scroll(&self) -> ScrollState {
        self.scroll
    }

    /// Document height from the last update
    pub fn document_height(&self) -> u32 {
        self.document_height
    }

    /// Smoothed progress, 0..=1
    pub fn progress(&self) -> f32 {
        self.progress.value()
    }

    pub fn is_settled(&self) -> bool {
        self.progress.is_at_rest()
    }

    pub fn readout(&self) -> SectionReadout {
        SectionReadout {
            label: self.labels.get(self.active).cloned().unwrap_or_default(),
            counter: format!(
                "{} / {}",
                pad_index(self.active + 1),
                pad_index(self.section_count())
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn labels(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("S{}", i)).collect()
    }

    #[test]
    fn test_active_index_bounds() {
        let vh = 800;
        assert_eq!(active_index(ScrollState::new(0.0, vh as f64), 9), 0);
        assert_eq!(active_index(ScrollState::new(799.0, vh as f64), 9), 0);
        assert_eq!(active_index(ScrollState::new(800.0, vh as f64), 9), 1);
        assert_eq!(active_index(ScrollState::new(8.0 * 800.0, vh as f64), 9), 8);
        assert_eq!(active_index(ScrollState::new(1e9, vh as f64), 9), 8);
        assert_eq!(active_index(ScrollState::new(500.0, vh as f64), 0), 0);
    }

    #[test]
    fn test_scroll_state_sanitizes() {
        assert_eq!(ScrollState::new(-40.0, 800.0).offset_px, 0);
        assert_eq!(ScrollState::new(f64::NAN, 0.0), ScrollState { offset_px: 0, viewport_height: 1 });
    }

    #[test]
    fn test_scroll_fraction() {
        let s = ScrollState::new(500.0, 1000.0);
        assert_eq!(scroll_fraction(s, 2000), 0.5);
        assert_eq!(scroll_fraction(s, 1000), 0.0);
        assert_eq!(scroll_fraction(ScrollState::new(5000.0, 1000.0), 2000), 1.0);
    }

    #[test]
    fn test_scroll_target() {
        assert_eq!(scroll_target(0, 900), 0);
        assert_eq!(scroll_target(3, 900), 2700);
    }

    #[test]
    fn test_readout_and_change_detection() {
        let mut c = ScrollClassifier::new(labels(9));
        assert_eq!(
            c.readout(),
            SectionReadout {
                label: "S0".into(),
                counter: "01 / 09".into()
            }
        );
        let first = c.update(ScrollState::new(1700.0, 800.0), 9 * 800);
        assert!(first.changed);
        assert_eq!(first.active, 2);
        let second = c.update(ScrollState::new(1750.0, 800.0), 9 * 800);
        assert!(!second.changed);
        assert_eq!(c.readout().counter, "03 / 09");
    }

    #[test]
    fn test_progress_is_smoothed() {
        let mut c = ScrollClassifier::new(labels(9));
        let classified = c.update(ScrollState::new(6400.0, 800.0), 7200);
        assert_eq!(classified.raw_fraction, 1.0);
        let first = c.tick(1.0 / 60.0);
        assert!(first > 0.0 && first < 1.0, "no instantaneous jump: {}", first);
        for _ in 0..600 {
            let v = c.tick(1.0 / 60.0);
            assert!(v <= 1.0);
        }
        assert_eq!(c.progress(), 1.0);
        assert!(c.is_settled());
    }

    proptest! {
        #[test]
        fn prop_active_index_in_bounds(offset in 0.0f64..1e7, vh in 1.0f64..5000.0, n in 1usize..40) {
            let scroll = ScrollState::new(offset, vh);
            let idx = active_index(scroll, n);
            prop_assert!(idx < n);
            if scroll.offset_px >= (n as u32 - 1) * scroll.viewport_height {
                prop_assert_eq!(idx, n - 1);
            }
        }
    }
}
