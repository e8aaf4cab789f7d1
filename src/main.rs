//! Stackfolio entry point
//!
//! Handles platform-specific initialization and runs the presentation loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_page {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Element, Event, HtmlCanvasElement, HtmlElement, KeyboardEvent, MouseEvent, TouchEvent};

    use stackfolio::Settings;
    use stackfolio::boundary::Boundary;
    use stackfolio::content::admin::{AdminGate, KeyChord, is_editor_shortcut};
    use stackfolio::content::feed::{ProjectDisplay, ProjectRecord, featured_projects};
    use stackfolio::content::snapshot::{PROJECT_FEED_KEY, load_content, load_feed};
    use stackfolio::consts::FEATURED_COUNT;
    use stackfolio::engine::{
        GateHandle, PointerInput, Presentation, RawEvent, Rect, RevealMode, RootMargin, SectionStack,
        Signal, TextReveal,
    };
    use stackfolio::error::PortfolioError;
    use stackfolio::platform::media::{
        device_pixel_ratio, document_height, now_ms, prefers_reduced_motion, scroll_offset, viewport_size,
    };
    use stackfolio::platform::{EventListener, LocalStorageCache, ScriptTagSource};
    use stackfolio::renderer::{DomView, ParticleCanvas, magnetic_transform};

    type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

    thread_local! {
        static PAGE: RefCell<Option<Rc<RefCell<Page>>>> = const { RefCell::new(None) };
    }

    /// Page instance holding all state
    struct Page {
        presentation: Presentation,
        view: DomView,
        canvas: Option<ParticleCanvas>,
        canvas_boundary: Boundary,
        projects_boundary: Boundary,
        admin: AdminGate,
        magnetic: Vec<HtmlElement>,
        frame_id: Option<i32>,
        frame_cb: FrameCallback,
        listeners: Vec<EventListener>,
    }

    impl Page {
        fn request_frame(&mut self) {
            if self.frame_id.is_some() || self.presentation.is_torn_down() {
                return;
            }
            let slot = self.frame_cb.clone();
            let slot = slot.borrow();
            let (Some(cb), Some(window)) = (slot.as_ref(), web_sys::window()) else {
                return;
            };
            match window.request_animation_frame(cb.as_ref().unchecked_ref()) {
                Ok(id) => self.frame_id = Some(id),
                Err(e) => log::warn!("request_animation_frame failed: {:?}", e),
            }
        }

        fn on_event(&mut self, event: RawEvent) {
            if self.presentation.on_event(event) == Signal::RequestFrame {
                self.request_frame();
            }
        }

        /// One animation frame
        fn run_frame(&mut self, time: f64) {
            let Page {
                presentation,
                view,
                canvas,
                canvas_boundary,
                magnetic,
                ..
            } = self;

            let out = presentation.on_frame(time, |handle: GateHandle| {
                view.gate_element(handle).map(|el| {
                    let r = el.get_bounding_client_rect();
                    Rect::new(r.left() as f32, r.top() as f32, r.width() as f32, r.height() as f32)
                })
            });

            let pointer = presentation.pointer().get();
            view.apply(&out, &pointer);

            if out.pointer_vars.is_some() {
                for el in magnetic.iter() {
                    let r = el.get_bounding_client_rect();
                    let rect = Rect::new(r.left() as f32, r.top() as f32, r.width() as f32, r.height() as f32);
                    let offset = presentation.magnetic_offset(rect);
                    let _ = el.style().set_property("transform", &magnetic_transform(offset));
                }
            }

            canvas_boundary.render(
                || {
                    let canvas = canvas
                        .as_mut()
                        .ok_or_else(|| PortfolioError::render("particle canvas missing"))?;
                    if out.layout.is_some() {
                        canvas.resize(presentation.viewport(), device_pixel_ratio());
                    }
                    canvas.draw(&out.sprites);
                    Ok(())
                },
                |_| (),
            );
        }

        fn teardown(&mut self) {
            if let (Some(id), Some(window)) = (self.frame_id.take(), web_sys::window()) {
                let _ = window.cancel_animation_frame(id);
            }
            let handles: Vec<GateHandle> = self.presentation.gates().handles().collect();
            for handle in handles {
                self.view.detach(handle);
            }
            self.presentation.teardown();
            self.listeners.clear();
            if let Some(canvas) = &self.canvas {
                canvas.clear();
            }
            // Breaks the closure -> page -> closure cycle
            self.frame_cb.borrow_mut().take();
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Stackfolio starting...");
        let started = now_ms();

        let Some(window) = web_sys::window() else {
            log::error!("No window; nothing to mount");
            return;
        };
        let Some(document) = window.document() else {
            log::error!("No document; nothing to mount");
            return;
        };

        let mut settings = Settings::load();
        settings.reduced_motion |= prefers_reduced_motion();

        let content = load_content(&LocalStorageCache);
        let headline = if settings.effective_name_rotation() {
            content.name_variations()
        } else {
            content.name_variations().into_iter().take(1).collect()
        };

        let viewport = viewport_size();
        let seed = js_sys::Date::now() as u64;
        let presentation = Presentation::new(
            &settings,
            SectionStack::portfolio(settings.card_offset),
            viewport,
            headline,
            seed,
        );

        let canvas = document
            .get_element_by_id("particles")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
            .and_then(|el| match ParticleCanvas::new(el) {
                Ok(c) => Some(c),
                Err(e) => {
                    log::warn!("Particle canvas disabled: {}", e);
                    None
                }
            });

        let view = DomView::new(document.clone());
        view.apply_layout(presentation.layout());

        let page = Rc::new(RefCell::new(Page {
            presentation,
            view,
            canvas,
            canvas_boundary: Boundary::new("particles"),
            projects_boundary: Boundary::new("projects"),
            admin: AdminGate::from_env(settings.allow_unprotected_admin),
            magnetic: collect_html(&document, "[data-magnetic]"),
            frame_id: None,
            frame_cb: Rc::new(RefCell::new(None)),
            listeners: Vec::new(),
        }));

        {
            let mut p = page.borrow_mut();
            if let Some(canvas) = p.canvas.as_mut() {
                canvas.resize(viewport, device_pixel_ratio());
            }
            mount_gates(&mut p, settings.reduced_motion);
            render_projects(&mut p, &document);
        }

        install_frame_callback(&page);
        match install_listeners(&page) {
            Ok(listeners) => page.borrow_mut().listeners = listeners,
            Err(e) => log::error!("Failed to attach listeners: {:?}", e),
        }

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        page.borrow_mut().on_event(RawEvent::Scroll {
            offset_px: scroll_offset(),
            document_height: document_height(),
        });

        PAGE.with(|slot| *slot.borrow_mut() = Some(page));
        log::info!("Stackfolio running! (mounted in {:.0}ms)", now_ms() - started);
    }

    /// Tear the page down: cancels the frame loop and detaches listeners
    pub fn unmount() {
        if let Some(page) = PAGE.with(|slot| slot.borrow_mut().take()) {
            page.borrow_mut().teardown();
        }
    }

    fn collect_html(document: &web_sys::Document, selector: &str) -> Vec<HtmlElement> {
        let mut out = Vec::new();
        if let Ok(list) = document.query_selector_all(selector) {
            for i in 0..list.length() {
                if let Some(el) = list.item(i).and_then(|n| n.dyn_into::<HtmlElement>().ok()) {
                    out.push(el);
                }
            }
        }
        out
    }

    fn mount_gates(page: &mut Page, reduced_motion: bool) {
        if !reduced_motion {
            for (el, text, is_lines, delay) in page.view.reveal_targets() {
                let reveal = if is_lines {
                    TextReveal::lines(&text, delay)
                } else {
                    TextReveal::glyphs(&text, delay)
                };
                let handle = page.presentation.mount_text(reveal.clone());
                tag_scope(page, handle, &el);
                page.view.attach_reveal(handle, el, &reveal);
            }
        }

        let Ok(list) = page.view.document().query_selector_all("[data-gate-mode=\"continuous\"]") else {
            return;
        };
        for i in 0..list.length() {
            if let Some(el) = list.item(i).and_then(|n| n.dyn_into::<Element>().ok()) {
                let handle = page.presentation.mount_gate(RevealMode::Continuous, RootMargin::PREFETCH);
                tag_scope(page, handle, &el);
                page.view.attach_gate(handle, el);
            }
        }
        log::info!("Mounted {} gates", page.presentation.gates().len());
    }

    fn tag_scope(page: &Page, handle: GateHandle, el: &Element) {
        match page.presentation.filter_id(handle) {
            Ok(id) => {
                let _ = el.set_attribute("data-filter-id", &id);
            }
            Err(e) => log::warn!("No scope for gate: {}", e),
        }
    }

    fn render_projects(page: &mut Page, document: &web_sys::Document) {
        let Some(container) = document.get_element_by_id("projects-list") else {
            return;
        };
        let outcome = load_feed::<ProjectRecord>(
            &ScriptTagSource::new("project-feed"),
            &LocalStorageCache,
            PROJECT_FEED_KEY,
        );
        if let (Some(banner), Some(el)) = (&outcome.banner, document.get_element_by_id("feed-banner")) {
            el.set_text_content(Some(banner));
            let _ = el.set_attribute("class", "banner");
        }
        let projects = featured_projects(&outcome.items, FEATURED_COUNT);

        page.projects_boundary.render(
            || {
                container.set_text_content(None);
                for project in &projects {
                    let card = project_card(document, project)?;
                    container
                        .append_child(&card)
                        .map_err(|e| PortfolioError::render(format!("{:?}", e)))?;
                }
                Ok(())
            },
            |message| {
                log::warn!("Showing project fallback: {}", message);
                container.set_text_content(Some(stackfolio::boundary::FALLBACK_MESSAGE));
            },
        );
    }

    fn project_card(document: &web_sys::Document, project: &ProjectDisplay) -> Result<Element, PortfolioError> {
        let make = |tag: &str| {
            document
                .create_element(tag)
                .map_err(|e| PortfolioError::render(format!("create {}: {:?}", tag, e)))
        };
        let card = make("a")?;
        let _ = card.set_attribute("href", &project.url);
        let _ = card.set_attribute("class", "project-card");
        let _ = card.set_attribute("target", "_blank");
        let _ = card.set_attribute("rel", "noopener noreferrer");

        let img = make("img")?;
        if let Some(src) = project.images.first() {
            let _ = img.set_attribute("src", src);
        }
        let _ = img.set_attribute("alt", &project.title);
        let _ = img.set_attribute("loading", "lazy");

        let title = make("h3")?;
        title.set_text_content(Some(&project.title));
        let subtitle = make("p")?;
        subtitle.set_text_content(Some(&project.subtitle));
        let _ = subtitle.set_attribute("class", "subtitle");
        let body = make("p")?;
        body.set_text_content(Some(&project.short_description));

        for child in [&img, &title, &subtitle, &body] {
            card.append_child(child)
                .map_err(|e| PortfolioError::render(format!("{:?}", e)))?;
        }
        Ok(card)
    }

    fn install_frame_callback(page: &Rc<RefCell<Page>>) {
        let weak = Rc::downgrade(page);
        let cb = Closure::<dyn FnMut(f64)>::new(move |time: f64| {
            let Some(page) = weak.upgrade() else {
                return;
            };
            let mut p = page.borrow_mut();
            p.frame_id = None;
            p.run_frame(time);
            if p.presentation.wants_frames() {
                p.request_frame();
            }
        });
        let mut p = page.borrow_mut();
        *p.frame_cb.borrow_mut() = Some(cb);
        p.request_frame();
    }

    fn install_listeners(page: &Rc<RefCell<Page>>) -> Result<Vec<EventListener>, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window.document().ok_or_else(|| JsValue::from_str("no document"))?;
        let mut listeners = Vec::new();

        // Scroll
        {
            let page = page.clone();
            listeners.push(EventListener::passive(&window, "scroll", move |_event: Event| {
                page.borrow_mut().on_event(RawEvent::Scroll {
                    offset_px: scroll_offset(),
                    document_height: document_height(),
                });
            })?);
        }

        // Resize
        {
            let page = page.clone();
            listeners.push(EventListener::passive(&window, "resize", move |_event: Event| {
                let mut p = page.borrow_mut();
                p.on_event(RawEvent::Resize(viewport_size()));
                // Reflow changes the document height too
                p.on_event(RawEvent::Scroll {
                    offset_px: scroll_offset(),
                    document_height: document_height(),
                });
            })?);
        }

        // Mouse move
        {
            let page = page.clone();
            listeners.push(EventListener::passive(&window, "mousemove", move |event: Event| {
                if let Some(event) = event.dyn_ref::<MouseEvent>() {
                    page.borrow_mut().on_event(RawEvent::Pointer(PointerInput::Mouse {
                        x: event.client_x() as f32,
                        y: event.client_y() as f32,
                    }));
                }
            })?);
        }

        // Touch start / move use the first touch point; touch end keeps the last position
        for name in ["touchstart", "touchmove"] {
            let page = page.clone();
            listeners.push(EventListener::passive(&window, name, move |event: Event| {
                if let Some(event) = event.dyn_ref::<TouchEvent>() {
                    let first = event
                        .touches()
                        .get(0)
                        .map(|t| glam::Vec2::new(t.client_x() as f32, t.client_y() as f32));
                    page.borrow_mut()
                        .on_event(RawEvent::Pointer(PointerInput::Touch { first }));
                }
            })?);
        }
        {
            let page = page.clone();
            listeners.push(EventListener::passive(&window, "touchend", move |_event: Event| {
                page.borrow_mut().on_event(RawEvent::Pointer(PointerInput::TouchEnd));
            })?);
        }

        // Navigation menu jumps
        {
            let page = page.clone();
            listeners.push(EventListener::new(&document, "click", move |event: Event| {
                let Some(target) = event.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
                    return;
                };
                let Some(link) = target.closest("[data-nav-index]").ok().flatten() else {
                    return;
                };
                let Some(index) = link
                    .get_attribute("data-nav-index")
                    .and_then(|v| v.parse::<usize>().ok())
                else {
                    return;
                };
                event.prevent_default();
                let y = page.borrow().presentation.scroll_to(index);
                if let Some(window) = web_sys::window() {
                    window.scroll_to_with_x_and_y(0.0, f64::from(y));
                }
            })?);
        }

        // Hidden editor shortcut
        {
            let page = page.clone();
            listeners.push(EventListener::new(&window, "keydown", move |event: Event| {
                let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                    return;
                };
                let key = event.key();
                let chord = KeyChord {
                    key: &key,
                    ctrl: event.ctrl_key(),
                    shift: event.shift_key(),
                };
                if !is_editor_shortcut(chord) {
                    return;
                }
                event.prevent_default();
                open_editor(&page);
            })?);
        }

        log::info!("Attached {} listeners", listeners.len());
        Ok(listeners)
    }

    fn open_editor(page: &Rc<RefCell<Page>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let input = if page.borrow().admin.requires_secret() {
            match window.prompt_with_message("Admin secret") {
                Ok(Some(input)) => Some(input),
                _ => return,
            }
        } else {
            None
        };
        let result = page.borrow_mut().admin.unlock(input.as_deref());
        match result {
            Ok(()) => {
                if let Some(panel) = window.document().and_then(|d| d.get_element_by_id("admin-panel")) {
                    let _ = panel.set_attribute("class", "");
                }
            }
            Err(e) => {
                log::warn!("Editor stays closed: {}", e);
                let _ = window.alert_with_message(&e.to_string());
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_page::run();
}

/// Host hook: detach everything before the page element goes away
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn unmount() {
    wasm_page::unmount();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Stackfolio (native) starting...");
    log::info!("Native mode is a headless walkthrough - run with `trunk serve` for the page");

    walkthrough();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn walkthrough() {
    use stackfolio::Settings;
    use stackfolio::content::feed::landing_projects;
    use stackfolio::content::snapshot::{load_content, save_content};
    use stackfolio::content::upload::{classify_payload, format_size};
    use stackfolio::content::MemoryCache;
    use stackfolio::engine::{PointerInput, Presentation, RawEvent, SectionStack, ViewportSize};

    let settings = Settings::load();
    let stack = SectionStack::portfolio(settings.card_offset);

    for height in [900.0, 320.0] {
        log::info!("Layout at viewport height {}:", height);
        for style in stack.layout(height as u32) {
            log::info!("  {:>2} {}", style.index, style.css());
        }
    }

    let cache = MemoryCache::new();
    let content = load_content(&cache);
    match save_content(&cache, &content) {
        Ok(bytes) => log::info!(
            "Content snapshot {} ({})",
            format_size(bytes as u64),
            classify_payload(bytes as u64).as_str()
        ),
        Err(e) => log::error!("Content save failed: {}", e),
    }

    let viewport = ViewportSize::new(1440.0, 900.0);
    let mut page = Presentation::new(&settings, stack, viewport, content.name_variations(), 42);
    let document_height = f64::from(viewport.height) * page.stack().len() as f64;

    for frame in 0..600u32 {
        let now = f64::from(frame) * 1000.0 / 60.0;
        page.on_event(RawEvent::Scroll {
            offset_px: f64::from(frame) * 12.0,
            document_height,
        });
        page.on_event(RawEvent::Pointer(PointerInput::Mouse {
            x: (frame % 1440) as f32,
            y: 450.0,
        }));
        let out = page.on_frame(now, |_| None);
        if let Some(readout) = out.readout {
            log::info!("t={:>6.0}ms {} {}  progress {:.3}", now, readout.counter, readout.label, out.progress);
        }
        if let Some(headline) = out.headline {
            log::info!("t={:>6.0}ms headline -> {}", now, headline);
        }
        if frame % 120 == 0 {
            log::info!("t={:>6.0}ms {} particle sprites", now, out.sprites.len());
        }
    }
    page.teardown();

    for project in landing_projects(&[]) {
        log::info!("Featured: {} ({})", project.title, project.subtitle);
    }
}
