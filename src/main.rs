//! Portfolio FX entry point
//!
//! On the web this mounts the page effects and the particle background and
//! drives both from `requestAnimationFrame`. Natively it runs a headless demo.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod web {
    use std::cell::RefCell;
    use std::rc::{Rc, Weak};

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, Event, EventTarget, HtmlCanvasElement, HtmlElement, MouseEvent};

    use portfolio_fx::fx::{BoxFrame, BoxState};
    use portfolio_fx::page::{CONTACTS, EXPERIENCE, PROJECTS};
    use portfolio_fx::renderer::CanvasRenderer;
    use portfolio_fx::sim::{DrawCmd, FieldState, TickInput, tick};
    use portfolio_fx::{Manifest, Page, Settings};

    type Shared = Rc<RefCell<App>>;

    thread_local! {
        static APP: RefCell<Option<Shared>> = const { RefCell::new(None) };
    }

    /// A registered DOM listener, kept so teardown can remove it
    struct Listener {
        target: EventTarget,
        kind: &'static str,
        callback: Closure<dyn FnMut(Event)>,
    }

    impl Listener {
        fn new(
            target: &EventTarget,
            kind: &'static str,
            handler: impl FnMut(Event) + 'static,
        ) -> Result<Self, JsValue> {
            let callback = Closure::<dyn FnMut(Event)>::new(handler);
            target.add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())?;
            Ok(Self {
                target: target.clone(),
                kind,
                callback,
            })
        }

        fn remove(&self) {
            if let Err(e) = self
                .target
                .remove_event_listener_with_callback(self.kind, self.callback.as_ref().unchecked_ref())
            {
                log::warn!("Failed to remove {} listener: {:?}", self.kind, e);
            }
        }
    }

    const SVG_NS: &str = "http://www.w3.org/2000/svg";

    /// DOM nodes for one item. Boxes carry a separate text span and an SVG border.
    struct ItemNodes {
        root: HtmlElement,
        text: HtmlElement,
        border: Option<Element>,
    }

    /// DOM nodes for one section
    struct SectionNodes {
        root: HtmlElement,
        items: Vec<ItemNodes>,
    }

    /// Everything the page needs between frames
    struct App {
        page: Page,
        field: FieldState,
        input: TickInput,
        draw: Vec<DrawCmd>,
        renderer: CanvasRenderer,
        sections: Vec<SectionNodes>,
        mounted: bool,
        frame_handle: Option<i32>,
        frame_callback: Option<Closure<dyn FnMut(f64)>>,
        listeners: Vec<Listener>,
    }

    impl App {
        /// Push the page view into the DOM and return boxes waiting for a measurement
        fn sync_dom(&self, now_ms: f64) -> Vec<(usize, f32, f32)> {
            let view = self.page.view(now_ms);
            let mut probes = Vec::new();

            for (section, nodes) in view.sections.iter().zip(&self.sections) {
                set_style(&nodes.root, "visibility", visibility(section.shown));

                for (index, (item, el)) in section.items.iter().zip(&nodes.items).enumerate() {
                    set_style(&el.root, "visibility", visibility(item.shown));
                    let _ = el
                        .root
                        .set_attribute("data-expanded", if item.expanded { "true" } else { "false" });

                    let Some(frame) = item.frame else {
                        set_text(&el.text, item.text);
                        continue;
                    };

                    let state = format!("{:?}", frame.state).to_lowercase();
                    let _ = el.root.set_attribute("data-state", &state);
                    if let Some(border) = &el.border {
                        draw_border(border, &frame);
                    }

                    if frame.probe {
                        // Natural size of the real content, laid out but invisible
                        if let Some(role) = self.page.manifest().experience.get(index) {
                            set_text(&el.text, &role.headline());
                        }
                        set_style(&el.root, "height", "auto");
                        set_style(&el.root, "visibility", "hidden");
                        let rect = el.root.get_bounding_client_rect();
                        probes.push((index, rect.width() as f32, rect.height() as f32));
                    } else if frame.state == BoxState::Hidden {
                        set_text(&el.text, "");
                        set_style(&el.root, "height", "0px");
                    } else {
                        set_text(&el.text, item.text);
                        set_style(&el.root, "height", &format!("{}px", frame.height));
                    }
                }
            }
            probes
        }

        fn teardown(&mut self) {
            if let (Some(handle), Some(window)) = (self.frame_handle.take(), web_sys::window())
                && let Err(e) = window.cancel_animation_frame(handle)
            {
                log::warn!("Failed to cancel animation frame: {:?}", e);
            }
            for listener in self.listeners.drain(..) {
                listener.remove();
            }
            self.frame_callback = None;
            self.page.teardown();
            log::info!("Portfolio FX torn down");
        }
    }

    /// Size the border rect and reveal `stroke_len` of it with a dash offset
    fn draw_border(rect: &Element, frame: &BoxFrame) {
        let attrs = [
            ("width", frame.width.to_string()),
            ("height", frame.height.to_string()),
            ("rx", frame.corner_radius.to_string()),
            ("stroke-dasharray", frame.perimeter.to_string()),
            ("stroke-dashoffset", frame.dash_offset().to_string()),
        ];
        for (name, value) in attrs {
            if let Err(e) = rect.set_attribute(name, &value) {
                log::warn!("Failed to set border {}: {:?}", name, e);
            }
        }
    }

    /// SVG overlay whose single rect traces the box border
    fn create_border(document: &Document, parent: &HtmlElement) -> Result<Element, JsValue> {
        let svg = document.create_element_ns(Some(SVG_NS), "svg")?;
        svg.set_attribute("class", "fx-border")?;
        svg.set_attribute(
            "style",
            "position:absolute;left:0;top:0;overflow:visible;pointer-events:none",
        )?;
        let rect = document.create_element_ns(Some(SVG_NS), "rect")?;
        rect.set_attribute("fill", "none")?;
        rect.set_attribute("stroke", "currentColor")?;
        rect.set_attribute("stroke-width", "1")?;
        svg.append_child(&rect)?;
        parent.append_child(&svg)?;
        Ok(rect)
    }

    fn visibility(shown: bool) -> &'static str {
        if shown { "visible" } else { "hidden" }
    }

    fn set_style(el: &HtmlElement, name: &str, value: &str) {
        if let Err(e) = el.style().set_property(name, value) {
            log::warn!("Failed to set {}: {:?}", name, e);
        }
    }

    fn set_text(el: &HtmlElement, text: &str) {
        if el.text_content().as_deref() != Some(text) {
            el.set_text_content(Some(text));
        }
    }

    fn create(document: &Document, tag: &str, class: &str) -> Result<HtmlElement, JsValue> {
        let el = document.create_element(tag)?;
        el.set_class_name(class);
        el.dyn_into::<HtmlElement>().map_err(JsValue::from)
    }

    fn viewport(window: &web_sys::Window) -> (f32, f32) {
        let width = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        let height = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        (width as f32, height as f32)
    }

    /// Find `#id`, or create it under `<body>`
    fn find_or_create(document: &Document, id: &str, tag: &str) -> Result<Element, JsValue> {
        if let Some(el) = document.get_element_by_id(id) {
            return Ok(el);
        }
        let el = document.create_element(tag)?;
        el.set_id(id);
        document
            .body()
            .ok_or_else(|| JsValue::from_str("document has no body"))?
            .append_child(&el)?;
        Ok(el)
    }

    /// Section and item nodes under `#fx-root`, one per plan entry
    fn build_sections(document: &Document, page: &Page) -> Result<Vec<SectionNodes>, JsValue> {
        let root = find_or_create(document, "fx-root", "main")?;
        let manifest = page.manifest();
        let mut sections = Vec::new();

        for (section, plan) in page.sequencer().plan().iter().enumerate() {
            let section_el = create(document, "section", &format!("fx-section fx-{}", plan.key))?;
            root.append_child(&section_el)?;

            let mut items = Vec::new();
            for item in 0..plan.items {
                let (tag, class) = match section {
                    PROJECTS => ("div", "fx-item fx-project"),
                    EXPERIENCE => ("div", "fx-item fx-box"),
                    CONTACTS => ("a", "fx-item fx-contact"),
                    _ => ("span", "fx-item"),
                };
                let el = create(document, tag, class)?;
                el.set_attribute("data-section", &section.to_string())?;
                el.set_attribute("data-item", &item.to_string())?;
                if section == CONTACTS
                    && let Some(contact) = manifest.contacts.get(item)
                {
                    el.set_attribute("href", &contact.href)?;
                }
                if section == PROJECTS
                    && let Some(project) = manifest.projects.get(item)
                {
                    el.set_attribute("data-id", &project.id)?;
                    if let Some(detail) = &project.detail {
                        el.set_attribute("data-detail", detail)?;
                    }
                }
                let nodes = if section == EXPERIENCE {
                    set_style(&el, "position", "relative");
                    let border = create_border(document, &el)?;
                    let text = create(document, "span", "fx-box-content")?;
                    el.append_child(&text)?;
                    ItemNodes {
                        root: el,
                        text,
                        border: Some(border),
                    }
                } else {
                    ItemNodes {
                        text: el.clone(),
                        root: el,
                        border: None,
                    }
                };
                section_el.append_child(&nodes.root)?;
                items.push(nodes);
            }
            sections.push(SectionNodes {
                root: section_el,
                items,
            });
        }
        Ok(sections)
    }

    fn setup_listeners(app: &Shared, window: &web_sys::Window) -> Result<Vec<Listener>, JsValue> {
        let mut listeners = Vec::new();
        let weak = Rc::downgrade(app);

        // Pointer position feeds particle repulsion
        {
            let weak = weak.clone();
            listeners.push(Listener::new(window, "mousemove", move |event: Event| {
                if let (Some(app), Some(mouse)) = (weak.upgrade(), event.dyn_ref::<MouseEvent>()) {
                    app.borrow_mut().input.pointer =
                        Some(Vec2::new(mouse.client_x() as f32, mouse.client_y() as f32));
                }
            })?);
        }

        // Clicks burst particles and collapse the detail panel unless they hit a project
        {
            let weak = weak.clone();
            listeners.push(Listener::new(window, "click", move |event: Event| {
                let Some(app) = weak.upgrade() else { return };
                let mut app = app.borrow_mut();
                if let Some(mouse) = event.dyn_ref::<MouseEvent>() {
                    app.input
                        .clicks
                        .push(Vec2::new(mouse.client_x() as f32, mouse.client_y() as f32));
                }
                let on_project = event
                    .target()
                    .and_then(|t| t.dyn_into::<Element>().ok())
                    .and_then(|el| el.closest(".fx-project").ok().flatten())
                    .is_some();
                if !on_project {
                    app.page.outside_click();
                }
            })?);
        }

        {
            let weak = weak.clone();
            listeners.push(Listener::new(window, "resize", move |_event: Event| {
                let (Some(app), Some(window)) = (weak.upgrade(), web_sys::window()) else {
                    return;
                };
                let (width, height) = viewport(&window);
                let mut app = app.borrow_mut();
                app.renderer.resize(width as u32, height as u32);
                app.input.resize = Some((width, height));
            })?);
        }

        // Hover glitch and detail toggles on individual items
        let sections: Vec<(usize, Vec<HtmlElement>)> = app
            .borrow()
            .sections
            .iter()
            .enumerate()
            .map(|(section, nodes)| (section, nodes.items.iter().map(|n| n.root.clone()).collect()))
            .collect();
        for (section, items) in sections {
            for (item, el) in items.into_iter().enumerate() {
                for (kind, hovered) in [("mouseenter", true), ("mouseleave", false)] {
                    let weak = weak.clone();
                    listeners.push(Listener::new(&el, kind, move |_event: Event| {
                        if let Some(app) = weak.upgrade() {
                            app.borrow_mut().page.hover(section, item, hovered);
                        }
                    })?);
                }
                if section == PROJECTS {
                    let weak = weak.clone();
                    listeners.push(Listener::new(&el, "click", move |_event: Event| {
                        if let Some(app) = weak.upgrade() {
                            let detail = app.borrow_mut().page.toggle_detail(item);
                            log::debug!("detail panel: {:?}", detail);
                        }
                    })?);
                }
            }
        }

        Ok(listeners)
    }

    fn request_animation_frame(app: &Shared) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let handle = {
            let app = app.borrow();
            let Some(callback) = &app.frame_callback else {
                return;
            };
            window.request_animation_frame(callback.as_ref().unchecked_ref())
        };
        match handle {
            Ok(handle) => app.borrow_mut().frame_handle = Some(handle),
            Err(e) => log::warn!("requestAnimationFrame failed: {:?}", e),
        }
    }

    fn frame_loop(app: &Shared, time: f64) {
        {
            let mut guard = app.borrow_mut();
            let a = &mut *guard;
            a.frame_handle = None;

            if !a.mounted {
                a.page.mount(time);
                a.mounted = true;
            }
            a.page.tick(time);

            tick(&mut a.field, &a.input, &mut a.draw);
            a.renderer.render(&a.draw);
            a.input.clear_events();

            for (item, width, height) in a.sync_dom(time) {
                a.page.measured(item, width, height, time);
            }
        }
        request_animation_frame(app);
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&JsValue::from_str(&e.to_string()));
        }

        log::info!("Portfolio FX starting...");

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        let settings = Settings::load();
        let manifest = document
            .get_element_by_id("fx-content")
            .and_then(|el| el.text_content())
            .and_then(|json| match Manifest::from_json(&json) {
                Ok(manifest) => Some(manifest),
                Err(e) => {
                    log::warn!("Ignoring malformed content: {}", e);
                    None
                }
            })
            .unwrap_or_default();

        let canvas: HtmlCanvasElement = find_or_create(&document, "fx-canvas", "canvas")?.dyn_into()?;
        let (width, height) = viewport(&window);
        canvas.set_width(width as u32);
        canvas.set_height(height as u32);
        let renderer = CanvasRenderer::new(canvas)?;

        let seed = js_sys::Date::now() as u64;
        let field = FieldState::new(width, height, settings.effective_field(), seed);
        let page = Page::new(manifest, settings, seed);
        let sections = build_sections(&document, &page)?;
        log::info!("Page built with seed: {}", seed);

        let app = Rc::new(RefCell::new(App {
            page,
            field,
            input: TickInput::default(),
            draw: Vec::new(),
            renderer,
            sections,
            mounted: false,
            frame_handle: None,
            frame_callback: None,
            listeners: Vec::new(),
        }));

        let listeners = setup_listeners(&app, &window)?;
        let weak: Weak<RefCell<App>> = Rc::downgrade(&app);
        let callback = Closure::<dyn FnMut(f64)>::new(move |time: f64| {
            if let Some(app) = weak.upgrade() {
                frame_loop(&app, time);
            }
        });
        {
            let mut a = app.borrow_mut();
            a.listeners = listeners;
            a.frame_callback = Some(callback);
        }

        request_animation_frame(&app);
        APP.with(|slot| *slot.borrow_mut() = Some(app));

        log::info!("Portfolio FX running!");
        Ok(())
    }

    /// Stop the frame loop, remove every listener and cancel every effect
    pub fn teardown() {
        if let Some(app) = APP.with(|slot| slot.borrow_mut().take()) {
            app.borrow_mut().teardown();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    web::run()
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn teardown() {
    web::teardown();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Portfolio FX (native) starting...");
    log::info!("Native mode is a headless demo - run with `trunk serve` for the web version");

    demo_page();
    demo_field();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Print the greeting and intro as they animate
#[cfg(not(target_arch = "wasm32"))]
fn demo_page() {
    use portfolio_fx::page::{GREETING, INFO};
    use portfolio_fx::{Manifest, Page, Settings};

    let mut page = Page::new(Manifest::default(), Settings::default(), 7);
    page.mount(0.0);

    let mut last = (String::new(), String::new());
    let mut now = 0.0;
    while now <= 12_000.0 {
        page.tick(now);
        let view = page.view(now);
        let greeting = view.sections[GREETING].items[0].text.to_string();
        let intro = view.sections[INFO].items[0].text.to_string();
        if greeting != last.0 {
            println!("{:>6.0}ms  {}", now, greeting);
        }
        if intro != last.1 && (now as u64) % 480 == 0 {
            println!("{:>6.0}ms  {}", now, intro);
        }
        last = (greeting, intro);
        now += 16.0;
    }
}

/// Run the particle field for a few seconds and report the pool
#[cfg(not(target_arch = "wasm32"))]
fn demo_field() {
    use glam::Vec2;
    use portfolio_fx::Settings;
    use portfolio_fx::sim::{FieldState, TickInput, tick};

    let settings = Settings::default();
    let mut field = FieldState::new(800.0, 600.0, settings.effective_field(), 7);
    let mut input = TickInput::default();
    let mut draw = Vec::new();

    for frame in 0..180 {
        if frame == 60 {
            input.clicks.push(Vec2::new(400.0, 300.0));
        }
        input.pointer = Some(Vec2::new(frame as f32 * 4.0, 300.0));
        tick(&mut field, &input, &mut draw);
        input.clear_events();
    }
    println!(
        "field: {} particles, {} draw commands in the last frame",
        field.particles.len(),
        draw.len()
    );
}
