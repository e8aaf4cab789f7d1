//! Media queries and window metrics

use web_sys::window;

use crate::engine::ViewportSize;

pub fn prefers_reduced_motion() -> bool {
    window()
        .and_then(|w| {
            w.match_media("(prefers-reduced-motion: reduce)")
                .ok()
                .flatten()
        })
        .map(|mq| mq.matches())
        .unwrap_or(false)
}

/// Inner window size in CSS px; the engine default when unavailable
pub fn viewport_size() -> ViewportSize {
    let Some(win) = window() else {
        return ViewportSize::default();
    };
    let width = win.inner_width().ok().and_then(|v| v.as_f64());
    let height = win.inner_height().ok().and_then(|v| v.as_f64());
    match (width, height) {
        (Some(w), Some(h)) => ViewportSize::new(w as f32, h as f32),
        _ => ViewportSize::default(),
    }
}

pub fn scroll_offset() -> f64 {
    window().and_then(|w| w.scroll_y().ok()).unwrap_or(0.0)
}

/// Full scrollable height of the document
pub fn document_height() -> f64 {
    window()
        .and_then(|w| w.document())
        .and_then(|d| d.document_element())
        .map(|el| f64::from(el.scroll_height()))
        .unwrap_or(0.0)
}

pub fn device_pixel_ratio() -> f64 {
    window().map(|w| w.device_pixel_ratio()).unwrap_or(1.0)
}

pub fn now_ms() -> f64 {
    window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or_else(js_sys::Date::now)
}
