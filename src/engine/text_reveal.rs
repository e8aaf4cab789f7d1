//! Staggered text entrance
//!
//! Text is cut into units (glyphs or lines). Unit `i` starts
//! `base_delay + i * stagger` after the owning gate first reports the text
//! in view, and eases to rest with [`CubicBezier::OUT_EXPO`].

use super::ease::CubicBezier;
use crate::consts::*;

/// Non-breaking space, keeps runs of spaces from collapsing
pub const NBSP: char = '\u{00A0}';

/// Glyph start pose
const GLYPH_START_Y_PX: f32 = 40.0;
const GLYPH_START_ROTATE_X_DEG: f32 = -90.0;
/// Line start pose (percent of the line's own height)
const LINE_START_Y_PERCENT: f32 = 110.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitKind {
    Glyph,
    Line,
}

/// Unit of vertical offset in a [`UnitFrame`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OffsetUnit {
    Px,
    Percent,
}

/// One animated piece of text
#[derive(Debug, Clone, PartialEq)]
pub struct RevealUnit {
    pub index: usize,
    pub text: String,
    /// Seconds after the reveal starts
    pub delay: f32,
    pub duration: f32,
}

/// Pose of one unit at one instant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitFrame {
    pub progress: f32,
    pub opacity: f32,
    pub translate_y: f32,
    pub unit: OffsetUnit,
    pub rotate_x_deg: f32,
}

impl UnitFrame {
    /// Inline style for the unit's span
    pub fn css(&self) -> String {
        let suffix = match self.unit {
            OffsetUnit::Px => "px",
            OffsetUnit::Percent => "%",
        };
        format!(
            "opacity: {:.3}; transform: translateY({:.2}{}) rotateX({:.1}deg);",
            self.opacity, self.translate_y, suffix, self.rotate_x_deg
        )
    }
}

/// Split `text` into glyph units, spaces made non-breaking
pub fn split_glyphs(text: &str, base_delay: f32) -> Vec<RevealUnit> {
    text.chars()
        .enumerate()
        .map(|(i, c)| RevealUnit {
            index: i,
            text: if c == ' ' { NBSP.to_string() } else { c.to_string() },
            delay: base_delay + i as f32 * GLYPH_STAGGER_SECS,
            duration: GLYPH_DURATION_SECS,
        })
        .collect()
}

/// Split `text` into line units on `\n`; lines share `base_delay`
pub fn split_lines(text: &str, base_delay: f32) -> Vec<RevealUnit> {
    text.split('\n')
        .enumerate()
        .map(|(i, line)| RevealUnit {
            index: i,
            text: line.to_string(),
            delay: base_delay,
            duration: LINE_DURATION_SECS,
        })
        .collect()
}

/// A block of text waiting for, or running, its entrance
#[derive(Debug, Clone, PartialEq)]
pub struct TextReveal {
    kind: UnitKind,
    units: Vec<RevealUnit>,
    ease: CubicBezier,
    /// Seconds timestamp of the first in-view frame
    started_at: Option<f64>,
}

impl TextReveal {
    pub fn glyphs(text: &str, base_delay: f32) -> Self {
        Self {
            kind: UnitKind::Glyph,
            units: split_glyphs(text, base_delay),
            ease: CubicBezier::OUT_EXPO,
            started_at: None,
        }
    }

    pub fn lines(text: &str, base_delay: f32) -> Self {
        Self {
            kind: UnitKind::Line,
            units: split_lines(text, base_delay),
            ease: CubicBezier::OUT_EXPO,
            started_at: None,
        }
    }

    pub fn kind(&self) -> UnitKind {
        self.kind
    }

    pub fn units(&self) -> &[RevealUnit] {
        &self.units
    }

    /// Start the clock the first time the gate reports the text in view.
    /// Later calls never restart it.
    pub fn gate(&mut self, in_view: bool, now_secs: f64) -> bool {
        if in_view && self.started_at.is_none() {
            self.started_at = Some(now_secs);
            return true;
        }
        false
    }

    pub fn is_started(&self) -> bool {
        self.started_at.is_some()
    }

    /// Seconds from start until the last unit lands
    pub fn total_duration(&self) -> f32 {
        self.units
            .iter()
            .map(|u| u.delay + u.duration)
            .fold(0.0, f32::max)
    }

    pub fn is_complete(&self, now_secs: f64) -> bool {
        match self.started_at {
            Some(start) => (now_secs - start) as f32 >= self.total_duration(),
            None => false,
        }
    }

    /// Animation running (started and not yet complete)
    pub fn is_animating(&self, now_secs: f64) -> bool {
        self.is_started() && !self.is_complete(now_secs)
    }

    fn pose(&self, eased: f32, linear: f32) -> UnitFrame {
        match self.kind {
            UnitKind::Glyph => UnitFrame {
                progress: linear,
                opacity: eased.clamp(0.0, 1.0),
                translate_y: GLYPH_START_Y_PX * (1.0 - eased),
                unit: OffsetUnit::Px,
                rotate_x_deg: GLYPH_START_ROTATE_X_DEG * (1.0 - eased),
            },
            UnitKind::Line => UnitFrame {
                progress: linear,
                opacity: 1.0,
                translate_y: LINE_START_Y_PERCENT * (1.0 - eased),
                unit: OffsetUnit::Percent,
                rotate_x_deg: 0.0,
            },
        }
    }

    /// Pose of every unit at `now_secs`; start pose until the gate opens
    pub fn frame(&self, now_secs: f64) -> Vec<UnitFrame> {
        let elapsed = match self.started_at {
            Some(start) => (now_secs - start).max(0.0) as f32,
            None => return self.units.iter().map(|_| self.pose(0.0, 0.0)).collect(),
        };
        self.units
            .iter()
            .map(|u| {
                let linear = if u.duration > 0.0 {
                    ((elapsed - u.delay) / u.duration).clamp(0.0, 1.0)
                } else if elapsed >= u.delay {
                    1.0
                } else {
                    0.0
                };
                self.pose(self.ease.apply(linear), linear)
            })
            .collect()
    }
}

/// Headline that cycles through name variations on a fixed period
#[derive(Debug, Clone)]
pub struct NameCycle {
    variations: Vec<String>,
    interval_ms: f64,
    index: usize,
    last_switch_ms: Option<f64>,
}

impl NameCycle {
    pub fn new(variations: Vec<String>, interval_ms: f64) -> Self {
        Self {
            variations,
            interval_ms: interval_ms.max(1.0),
            index: 0,
            last_switch_ms: None,
        }
    }

    pub fn current(&self) -> &str {
        self.variations
            .get(self.index)
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// Whether there is more than one variation to cycle through
    pub fn rotates(&self) -> bool {
        self.variations.len() > 1
    }

    /// Returns true when the headline switched to the next variation
    pub fn advance(&mut self, now_ms: f64) -> bool {
        let Some(last) = self.last_switch_ms else {
            self.last_switch_ms = Some(now_ms);
            return false;
        };
        if self.variations.len() < 2 || now_ms - last < self.interval_ms {
            return false;
        }
        self.index = (self.index + 1) % self.variations.len();
        self.last_switch_ms = Some(now_ms);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glyph_stagger() {
        let units = split_glyphs("abc", 0.2);
        assert_eq!(units.len(), 3);
        assert!((units[0].delay - 0.2).abs() < 1e-6);
        assert!((units[2].delay - (0.2 + 2.0 * GLYPH_STAGGER_SECS)).abs() < 1e-6);
        assert!(units.windows(2).all(|w| w[0].delay < w[1].delay));
    }

    #[test]
    fn test_spaces_are_non_breaking() {
        let units = split_glyphs("a  b", 0.0);
        assert_eq!(units.len(), 4);
        assert_eq!(units[1].text, "\u{00A0}");
        assert_eq!(units[2].text, "\u{00A0}");
        let joined: String = units.iter().map(|u| u.text.as_str()).collect();
        assert_eq!(joined.chars().filter(|c| *c == ' ').count(), 0);
    }

    #[test]
    fn test_multibyte_glyphs_split_per_char() {
        let units = split_glyphs("鈴木", 0.0);
        assert_eq!(units.len(), 2);
        assert_eq!(units[1].text, "木");
    }

    #[test]
    fn test_nothing_moves_before_gate() {
        let reveal = TextReveal::glyphs("hello", 0.0);
        for f in reveal.frame(100.0) {
            assert_eq!(f.opacity, 0.0);
            assert_eq!(f.translate_y, GLYPH_START_Y_PX);
            assert_eq!(f.rotate_x_deg, GLYPH_START_ROTATE_X_DEG);
        }
        assert!(!reveal.is_complete(1e6));
    }

    #[test]
    fn test_cascade_after_gate() {
        let mut reveal = TextReveal::glyphs("hello", 0.0);
        assert!(!reveal.gate(false, 1.0));
        assert!(reveal.gate(true, 2.0));
        assert!(!reveal.gate(true, 3.0), "gate never restarts");

        let frames = reveal.frame(2.1);
        // Earlier glyphs are further along
        assert!(frames.windows(2).all(|w| w[0].progress >= w[1].progress));
        assert!(frames[0].progress > frames[4].progress);

        let end = 2.0 + reveal.total_duration() as f64 + 0.01;
        let done = reveal.frame(end);
        assert!(done.iter().all(|f| f.opacity == 1.0 && f.translate_y == 0.0));
        assert!(reveal.is_complete(end));
        assert!(!reveal.is_animating(end));
    }

    #[test]
    fn test_lines_slide_from_below() {
        let mut reveal = TextReveal::lines("one\ntwo", 0.0);
        assert_eq!(reveal.units().len(), 2);
        let start = reveal.frame(0.0);
        assert_eq!(start[0].translate_y, LINE_START_Y_PERCENT);
        assert_eq!(start[0].unit, OffsetUnit::Percent);
        reveal.gate(true, 0.0);
        let end = reveal.frame(LINE_DURATION_SECS as f64 + 0.01);
        assert_eq!(end[1].translate_y, 0.0);
        assert!(end[1].css().contains("translateY(0.00%)"));
    }

    #[test]
    fn test_name_cycle() {
        let mut cycle = NameCycle::new(vec!["A".into(), "B".into()], 3500.0);
        assert_eq!(cycle.current(), "A");
        assert!(!cycle.advance(0.0));
        assert!(!cycle.advance(3000.0));
        assert!(cycle.advance(3500.0));
        assert_eq!(cycle.current(), "B");
        assert!(cycle.advance(7000.0));
        assert_eq!(cycle.current(), "A");
    }

    #[test]
    fn test_name_cycle_single_variation_never_switches() {
        let mut cycle = NameCycle::new(vec!["A".into()], 10.0);
        cycle.advance(0.0);
        assert!(!cycle.advance(1000.0));
        assert_eq!(NameCycle::new(Vec::new(), 10.0).current(), "");
    }
}
