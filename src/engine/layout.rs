//! Section stack layout
//!
//! Sections are full-viewport cards. Every card but the last is pinned
//! (`position: sticky`) a little lower than the one before it and painted
//! above it, so scrolling deals the cards onto a visible deck. The last card
//! scrolls normally so the page has a real bottom.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::LayoutError;
use crate::pad_index;

/// Card background palette, by 1-based index
pub const CARD_COLORS: [&str; 9] = [
    "#141414", "#161616", "#141414", "#171717", "#000000", "#161616", "#141414", "#171717",
    "#141414",
];
pub const DEFAULT_CARD_COLOR: &str = "#141414";

/// Main-axis alignment of a card's content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Justify {
    Start,
    #[default]
    Center,
    End,
    Between,
}

impl Justify {
    pub fn as_css(&self) -> &'static str {
        match self {
            Justify::Start => "flex-start",
            Justify::Center => "center",
            Justify::End => "flex-end",
            Justify::Between => "space-between",
        }
    }
}

/// One card in the stack, fixed at composition time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionDescriptor {
    /// 1-based position in the stack
    pub index: usize,
    /// DOM id / anchor
    pub id: String,
    /// Readout and navigation label
    pub label: String,
    /// Nominal resting offset from the top of the viewport (px)
    pub stack_offset: u32,
    pub background: String,
    pub justify: Justify,
    pub is_terminal: bool,
}

/// How a card is positioned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Positioning {
    /// Sticky at `top` px
    Pinned { top: u32 },
    /// Normal flow (terminal card)
    Flow,
}

/// Computed style of one card for a given viewport
#[derive(Debug, Clone, PartialEq)]
pub struct SectionStyle {
    pub index: usize,
    pub positioning: Positioning,
    pub z_index: i32,
    pub min_height: u32,
    pub background: String,
    pub justify: Justify,
    /// "01".."NN" corner badge; terminal cards have none
    pub badge: Option<String>,
}

impl SectionStyle {
    pub fn is_pinned(&self) -> bool {
        matches!(self.positioning, Positioning::Pinned { .. })
    }

    /// Resting top offset, `None` for the flowing card
    pub fn top(&self) -> Option<u32> {
        match self.positioning {
            Positioning::Pinned { top } => Some(top),
            Positioning::Flow => None,
        }
    }

    /// Inline style declaration for the card element
    pub fn css(&self) -> String {
        let position = match self.positioning {
            Positioning::Pinned { top } => format!("position: sticky; top: {}px;", top),
            Positioning::Flow => "position: relative; top: auto;".to_string(),
        };
        format!(
            "{} z-index: {}; min-height: {}px; background-color: {}; justify-content: {};",
            position,
            self.z_index,
            self.min_height,
            self.background,
            self.justify.as_css()
        )
    }
}

/// Builder input for one card
#[derive(Debug, Clone)]
struct PendingSection {
    id: String,
    label: String,
    background: Option<String>,
    justify: Justify,
    terminal: bool,
}

/// Collects sections and validates the stack
#[derive(Debug, Clone)]
pub struct StackBuilder {
    card_offset: u32,
    sections: Vec<PendingSection>,
}

impl StackBuilder {
    pub fn section(self, id: &str, label: &str) -> Self {
        self.push(id, label, None, Justify::default(), false)
    }

    pub fn section_with(self, id: &str, label: &str, background: Option<&str>, justify: Justify) -> Self {
        self.push(id, label, background, justify, false)
    }

    /// The last card; scrolls normally
    pub fn terminal(self, id: &str, label: &str, justify: Justify) -> Self {
        self.push(id, label, None, justify, true)
    }

    fn push(
        mut self,
        id: &str,
        label: &str,
        background: Option<&str>,
        justify: Justify,
        terminal: bool,
    ) -> Self {
        self.sections.push(PendingSection {
            id: id.to_string(),
            label: label.to_string(),
            background: background.map(str::to_string),
            justify,
            terminal,
        });
        self
    }

    pub fn build(self) -> Result<SectionStack, LayoutError> {
        let count = self.sections.len();
        if count == 0 {
            return Err(LayoutError::Empty);
        }
        if let Some((position, s)) = self
            .sections
            .iter()
            .enumerate()
            .find(|(i, s)| s.terminal && *i + 1 != count)
        {
            return Err(LayoutError::TerminalNotLast {
                label: s.label.clone(),
                position: position + 1,
                count,
            });
        }
        if !self.sections[count - 1].terminal {
            return Err(LayoutError::MissingTerminal);
        }

        let card_offset = self.card_offset.max(1);
        let sections = self
            .sections
            .into_iter()
            .enumerate()
            .map(|(i, s)| {
                let index = i + 1;
                SectionDescriptor {
                    index,
                    id: s.id,
                    label: s.label,
                    stack_offset: (index as u32 - 1) * card_offset,
                    background: s.background.unwrap_or_else(|| {
                        CARD_COLORS
                            .get(i)
                            .copied()
                            .unwrap_or(DEFAULT_CARD_COLOR)
                            .to_string()
                    }),
                    justify: s.justify,
                    is_terminal: s.terminal,
                }
            })
            .collect();

        Ok(SectionStack {
            card_offset,
            sections,
        })
    }
}

/// Ordered, validated set of cards
#[derive(Debug, Clone, PartialEq)]
pub struct SectionStack {
    card_offset: u32,
    sections: Vec<SectionDescriptor>,
}

impl SectionStack {
    pub fn builder(card_offset: u32) -> StackBuilder {
        StackBuilder {
            card_offset,
            sections: Vec::new(),
        }
    }

    /// The portfolio page: nine cards, contact last
    pub fn portfolio(card_offset: u32) -> Self {
        let built = Self::builder(card_offset)
            .section("hero", "HERO")
            .section("about", "ABOUT")
            .section_with("services", "SERVICES", None, Justify::Start)
            .section_with("philosophy", "PHILOSOPHY", None, Justify::Start)
            .section_with("perspective", "PERSPECTIVE", Some("#000000"), Justify::Center)
            .section("skills", "SKILLS")
            .section("projects", "PROJECTS")
            .section("personality", "PERSONALITY")
            .terminal("contact", "CONTACT", Justify::Between)
            .build();
        match built {
            Ok(stack) => stack,
            // The composition above is static and always valid
            Err(e) => unreachable!("portfolio stack invalid: {}", e),
        }
    }

    pub fn sections(&self) -> &[SectionDescriptor] {
        &self.sections
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn labels(&self) -> Vec<String> {
        self.sections.iter().map(|s| s.label.clone()).collect()
    }

    /// Position of a section by DOM id
    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.sections.iter().position(|s| s.id == id)
    }

    /// Per-card offset actually used for `viewport_height`.
    ///
    /// The deepest pinned card may sit at most `MAX_STACK_FRACTION` of the
    /// viewport down; the step never drops below 1px so offsets stay distinct.
    pub fn offset_step(&self, viewport_height: u32) -> u32 {
        let pinned = self.sections.iter().filter(|s| !s.is_terminal).count();
        let deepest = pinned.saturating_sub(1) as u32;
        if deepest == 0 {
            return self.card_offset;
        }
        let budget = (viewport_height as f32 * MAX_STACK_FRACTION).floor() as u32;
        self.card_offset.min(budget / deepest).max(1)
    }

    /// Styles for every card at the given viewport height
    pub fn layout(&self, viewport_height: u32) -> Vec<SectionStyle> {
        let viewport_height = viewport_height.max(1);
        let step = self.offset_step(viewport_height);
        self.sections
            .iter()
            .map(|s| {
                let z_index = s.index as i32 * Z_INDEX_STEP + Z_INDEX_BASE;
                if s.is_terminal {
                    SectionStyle {
                        index: s.index,
                        positioning: Positioning::Flow,
                        z_index,
                        min_height: viewport_height,
                        background: s.background.clone(),
                        justify: s.justify,
                        badge: None,
                    }
                } else {
                    let top = (s.index as u32 - 1) * step;
                    SectionStyle {
                        index: s.index,
                        positioning: Positioning::Pinned { top },
                        z_index,
                        min_height: viewport_height.saturating_sub(top),
                        background: s.background.clone(),
                        justify: s.justify,
                        badge: Some(pad_index(s.index)),
                    }
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn stack_of(n: usize) -> SectionStack {
        let mut builder = SectionStack::builder(CARD_OFFSET_PX);
        for i in 1..n {
            builder = builder.section(&format!("s{}", i), &format!("S{}", i));
        }
        builder.terminal("end", "END", Justify::Center).build().unwrap()
    }

    #[test]
    fn test_portfolio_stack() {
        let stack = SectionStack::portfolio(CARD_OFFSET_PX);
        assert_eq!(stack.len(), 9);
        let sections = stack.sections();
        assert_eq!(sections[0].stack_offset, 0);
        assert_eq!(sections[1].stack_offset, 32);
        assert_eq!(sections[7].stack_offset, 7 * 32);
        assert!(sections[8].is_terminal);
        assert_eq!(sections[4].background, "#000000");
        assert_eq!(stack.position_of("projects"), Some(6));
    }

    #[test]
    fn test_layout_on_desktop_uses_full_offset() {
        let styles = SectionStack::portfolio(CARD_OFFSET_PX).layout(900);
        assert_eq!(styles[0].top(), Some(0));
        assert_eq!(styles[2].top(), Some(64));
        assert_eq!(styles[2].z_index, 40);
        assert_eq!(styles[2].min_height, 900 - 64);
        assert_eq!(styles[2].badge.as_deref(), Some("03"));

        let last = &styles[8];
        assert!(!last.is_pinned());
        assert_eq!(last.min_height, 900);
        assert!(last.badge.is_none());
        assert_eq!(last.z_index, 100);
    }

    #[test]
    fn test_short_viewport_scales_offsets() {
        let stack = SectionStack::portfolio(CARD_OFFSET_PX);
        // 8 pinned cards, deepest at 7 steps; 300px viewport allows 150px
        assert_eq!(stack.offset_step(300), 21);
        let styles = stack.layout(300);
        let deepest = styles[7].top().unwrap();
        assert!(deepest <= 150);
        assert!(styles[7].min_height > 0);
    }

    #[test]
    fn test_tiny_viewport_keeps_offsets_distinct() {
        let styles = SectionStack::portfolio(CARD_OFFSET_PX).layout(4);
        let tops: Vec<u32> = styles.iter().filter_map(|s| s.top()).collect();
        assert!(tops.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_css_output() {
        let styles = SectionStack::portfolio(CARD_OFFSET_PX).layout(800);
        let pinned = styles[1].css();
        assert!(pinned.contains("position: sticky; top: 32px;"));
        assert!(pinned.contains("z-index: 30;"));
        assert!(pinned.contains("min-height: 768px;"));
        let flow = styles[8].css();
        assert!(flow.contains("position: relative"));
        assert!(flow.contains("justify-content: space-between"));
    }

    #[test]
    fn test_builder_validation() {
        assert_eq!(SectionStack::builder(32).build(), Err(LayoutError::Empty));
        assert_eq!(
            SectionStack::builder(32).section("a", "A").build(),
            Err(LayoutError::MissingTerminal)
        );
        let err = SectionStack::builder(32)
            .terminal("a", "A", Justify::Center)
            .section("b", "B")
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            LayoutError::TerminalNotLast {
                label: "A".into(),
                position: 1,
                count: 2
            }
        );
    }

    #[test]
    fn test_single_terminal_section() {
        let stack = SectionStack::builder(32)
            .terminal("only", "ONLY", Justify::Center)
            .build()
            .unwrap();
        let styles = stack.layout(700);
        assert_eq!(styles.len(), 1);
        assert!(!styles[0].is_pinned());
    }

    proptest! {
        #[test]
        fn prop_stack_invariants(n in 1usize..30, viewport_height in 1u32..3000) {
            let stack = stack_of(n);
            let styles = stack.layout(viewport_height);
            prop_assert_eq!(styles.len(), n);

            for pair in stack.sections().windows(2) {
                prop_assert!(pair[0].stack_offset < pair[1].stack_offset);
            }
            for pair in styles.windows(2) {
                prop_assert!(pair[0].z_index < pair[1].z_index);
            }
            let tops: Vec<u32> = styles.iter().filter_map(|s| s.top()).collect();
            for pair in tops.windows(2) {
                prop_assert!(pair[0] < pair[1]);
            }

            let (terminal, pinned) = styles.split_last().unwrap();
            prop_assert!(!terminal.is_pinned());
            prop_assert!(pinned.iter().all(|s| s.is_pinned()));
        }
    }
}
