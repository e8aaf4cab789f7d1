//! Applies frame output to the page's DOM

use std::collections::HashMap;

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement};

use super::{cursor_ring_css, progress_bar_css, unit_styles};
use crate::engine::{FrameOutput, GateHandle, PointerState, SectionStyle, TextReveal, Transition};

/// Class toggled on continuous gates while visible
pub const IN_VIEW_CLASS: &str = "in-view";

pub struct DomView {
    document: Document,
    sections: Vec<HtmlElement>,
    readout_label: Option<Element>,
    readout_counter: Option<Element>,
    progress_bar: Option<HtmlElement>,
    cursor_ring: Option<HtmlElement>,
    headline: Option<Element>,
    /// Root element of each mounted gate
    gates: HashMap<GateHandle, Element>,
    /// Unit spans of each mounted text reveal
    units: HashMap<GateHandle, Vec<HtmlElement>>,
}

fn html(el: Element) -> Option<HtmlElement> {
    el.dyn_into::<HtmlElement>().ok()
}

impl DomView {
    /// Collect the `section[data-card]` elements and the fixed overlays
    pub fn new(document: Document) -> Self {
        let mut sections = Vec::new();
        if let Ok(list) = document.query_selector_all("section[data-card]") {
            for i in 0..list.length() {
                if let Some(el) = list.item(i).and_then(|n| n.dyn_into::<HtmlElement>().ok()) {
                    sections.push(el);
                }
            }
        }
        log::info!("Found {} card sections", sections.len());

        Self {
            readout_label: document.get_element_by_id("section-label"),
            readout_counter: document.get_element_by_id("section-counter"),
            progress_bar: document.get_element_by_id("progress-bar").and_then(html),
            cursor_ring: document.get_element_by_id("cursor-ring").and_then(html),
            headline: document.get_element_by_id("headline"),
            document,
            sections,
            gates: HashMap::new(),
            units: HashMap::new(),
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Elements marked for reveal: `(element, text, is_lines, delay)`
    pub fn reveal_targets(&self) -> Vec<(Element, String, bool, f32)> {
        let mut out = Vec::new();
        let Ok(list) = self.document.query_selector_all("[data-reveal]") else {
            return out;
        };
        for i in 0..list.length() {
            let Some(el) = list.item(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
                continue;
            };
            let text = el.text_content().unwrap_or_default();
            let is_lines = el.get_attribute("data-reveal").as_deref() == Some("lines");
            let delay = el
                .get_attribute("data-delay")
                .and_then(|d| d.parse::<f32>().ok())
                .unwrap_or(0.0);
            out.push((el, text, is_lines, delay));
        }
        out
    }

    /// Replace the element's text with one span per unit
    pub fn attach_reveal(&mut self, handle: GateHandle, el: Element, reveal: &TextReveal) {
        el.set_text_content(None);
        let _ = el.set_attribute("data-gate", &handle.as_u64().to_string());
        let mut spans = Vec::with_capacity(reveal.units().len());
        for unit in reveal.units() {
            let Some(span) = self
                .document
                .create_element("span")
                .ok()
                .and_then(html)
            else {
                continue;
            };
            span.set_class_name("reveal-unit");
            span.set_text_content(Some(&unit.text));
            let _ = el.append_child(&span);
            spans.push(span);
        }
        self.units.insert(handle, spans);
        self.gates.insert(handle, el);
    }

    pub fn attach_gate(&mut self, handle: GateHandle, el: Element) {
        let _ = el.set_attribute("data-gate", &handle.as_u64().to_string());
        self.gates.insert(handle, el);
    }

    pub fn gate_element(&self, handle: GateHandle) -> Option<&Element> {
        self.gates.get(&handle)
    }

    pub fn detach(&mut self, handle: GateHandle) {
        self.gates.remove(&handle);
        self.units.remove(&handle);
    }

    pub fn apply_layout(&self, layout: &[SectionStyle]) {
        for (el, style) in self.sections.iter().zip(layout) {
            let _ = el.set_attribute("style", &style.css());
            if let Some(badge) = &style.badge {
                let _ = el.set_attribute("data-badge", badge);
            }
        }
    }

    pub fn apply_pointer(&self, pointer: &PointerState, vars: &[(&'static str, String); 2]) {
        if let Some(root) = self.document.document_element().and_then(html) {
            for (name, value) in vars {
                let _ = root.style().set_property(name, value);
            }
        }
        if let Some(ring) = &self.cursor_ring {
            let _ = ring.set_attribute("style", &cursor_ring_css(pointer));
        }
    }

    pub fn apply(&self, out: &FrameOutput, pointer: &PointerState) {
        if let Some(layout) = &out.layout {
            self.apply_layout(layout);
        }
        if let Some(readout) = &out.readout {
            if let Some(el) = &self.readout_label {
                el.set_text_content(Some(&readout.label));
            }
            if let Some(el) = &self.readout_counter {
                el.set_text_content(Some(&readout.counter));
            }
        }
        if let Some(bar) = &self.progress_bar {
            let _ = bar.set_attribute("style", &progress_bar_css(out.progress));
        }
        if let Some(vars) = &out.pointer_vars {
            self.apply_pointer(pointer, vars);
        }
        for (handle, transition) in &out.gate_transitions {
            let Some(el) = self.gates.get(handle) else {
                continue;
            };
            let classes = el.class_list();
            let _ = match transition {
                Transition::Entered => classes.add_1(IN_VIEW_CLASS),
                Transition::Exited => classes.remove_1(IN_VIEW_CLASS),
                Transition::Unchanged => Ok(()),
            };
        }
        for (handle, frames) in &out.text_frames {
            let Some(spans) = self.units.get(handle) else {
                continue;
            };
            for (span, style) in spans.iter().zip(unit_styles(frames)) {
                let _ = span.set_attribute("style", &style);
            }
        }
        if let (Some(text), Some(el)) = (&out.headline, &self.headline) {
            el.set_text_content(Some(text));
        }
    }
}
