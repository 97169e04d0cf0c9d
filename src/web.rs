//! Browser host.
//!
//! [`start`] binds the widget to `<canvas id="neural-network">`, drives it
//! with `requestAnimationFrame` and wires the page collaborators to their
//! DOM elements. Every DOM hook is optional: a missing element disables its
//! effect and nothing else.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Once;

use glam::Vec2;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    CanvasRenderingContext2d, Document, Element, Event, EventTarget, HtmlCanvasElement,
    HtmlElement, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit,
    KeyboardEvent, MouseEvent, Node, Storage, TouchEvent,
};

use crate::animation::{CancelToken, FrameScheduler};
use crate::canvas::{Canvas2d, Glow};
use crate::config::{BackdropConfig, Rgba};
use crate::error::{GeoError, StorageError};
use crate::input::{MouseAdapter, MouseInput, TouchAdapter, TouchInput};
use crate::page::contact::{self, COPIED_LABEL, COPIED_RESTORE_MS};
use crate::page::effects::{self, ScrollEffects, TitleHue, HUE_TICK_MS};
use crate::page::geo::{finish_label, Provider};
use crate::page::loading::{LoadingProgress, HIDE_AFTER_MS, READY_AFTER_MS, TICK_MS};
use crate::page::metrics::LoadMetrics;
use crate::page::nav::NavMenu;
use crate::page::reveal::{self, REVEALED_CLASS, REVEAL_ROOT_MARGIN, REVEAL_THRESHOLD};
use crate::page::typing::TypingCycle;
use crate::page::visits::{CountUp, KeyValueStore, VisitTracker, COUNT_UP_TICK_MS};
use crate::profile::Viewport;
use crate::widget::NeuralNetworkWidget;

const CANVAS_ID: &str = "neural-network";

// ========== Canvas2d over CanvasRenderingContext2d ==========

/// [`Canvas2d`] backed by a `<canvas>` element's 2D context.
pub struct WebCanvas {
    element: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl WebCanvas {
    pub fn new(element: HtmlCanvasElement) -> Option<Self> {
        let ctx = element
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Self { element, ctx })
    }
}

impl Canvas2d for WebCanvas {
    fn size(&self) -> Vec2 {
        Vec2::new(self.element.width() as f32, self.element.height() as f32)
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.element.set_width(width);
        self.element.set_height(height);
    }

    fn clear_rect(&mut self, origin: Vec2, size: Vec2) {
        self.ctx
            .clear_rect(origin.x as f64, origin.y as f64, size.x as f64, size.y as f64);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.ctx.begin_path();
        if self
            .ctx
            .arc(
                center.x as f64,
                center.y as f64,
                radius as f64,
                0.0,
                std::f64::consts::TAU,
            )
            .is_err()
        {
            return;
        }
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.fill();
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
        self.ctx.begin_path();
        self.ctx.set_stroke_style_str(&color.to_css());
        self.ctx.set_line_width(width as f64);
        self.ctx.move_to(from.x as f64, from.y as f64);
        self.ctx.line_to(to.x as f64, to.y as f64);
        self.ctx.stroke();
    }

    fn set_glow(&mut self, glow: Glow) {
        self.ctx.set_shadow_blur(glow.blur as f64);
        self.ctx.set_shadow_color(&glow.color.to_css());
    }
}

// ========== requestAnimationFrame scheduling ==========

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// Requests the stored callback on the next animation frame.
#[derive(Clone)]
struct RafScheduler {
    callback: FrameCallback,
}

impl FrameScheduler for RafScheduler {
    fn request_frame(&mut self) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let callback = self.callback.borrow();
        if let Some(callback) = callback.as_ref() {
            if let Err(e) = window.request_animation_frame(callback.as_ref().unchecked_ref()) {
                tracing::warn!(error = ?e, "requestAnimationFrame failed");
            }
        }
    }
}

// ========== Browser storage ==========

/// `localStorage` or `sessionStorage`.
pub struct WebStorage(Storage);

impl WebStorage {
    pub fn local() -> Option<Self> {
        web_sys::window()?.local_storage().ok().flatten().map(Self)
    }

    pub fn session() -> Option<Self> {
        web_sys::window()?.session_storage().ok().flatten().map(Self)
    }
}

impl KeyValueStore for WebStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.0.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.0
            .set_item(key, value)
            .map_err(|e| StorageError::Unavailable(format!("{e:?}")))
    }
}

// ========== Console logging ==========

fn init_logging() {
    // The global subscriber can only be installed once per page.
    static LOGGING: Once = Once::new();
    console_error_panic_hook::set_once();
    LOGGING.call_once(|| {
        tracing_wasm::set_as_global_default_with_config(
            tracing_wasm::WASMLayerConfigBuilder::new()
                .set_max_level(tracing::Level::INFO)
                .build(),
        );
    });
}

// ========== Entry point ==========

/// Handle returned to JavaScript.
#[wasm_bindgen]
pub struct BackdropHandle {
    token: Option<CancelToken>,
}

#[wasm_bindgen]
impl BackdropHandle {
    /// Whether the particle network is running.
    #[wasm_bindgen(getter)]
    pub fn running(&self) -> bool {
        self.token.as_ref().is_some_and(|t| !t.is_cancelled())
    }

    /// Stop the particle network.
    pub fn dispose(&self) {
        if let Some(token) = &self.token {
            token.cancel();
        }
    }
}

/// Start the backdrop and the page effects.
#[wasm_bindgen]
pub fn start() -> Result<BackdropHandle, JsValue> {
    init_logging();

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let mut config = BackdropConfig::default();
    config.reduced_motion = prefers_reduced_motion(&window);

    if let Some(body) = document.body() {
        body.class_list().add_1("loading")?;
    }

    let token = start_network(&window, &document, config.clone())?;

    setup_loading(&window, &document)?;
    setup_typing(&document, &config)?;
    setup_scroll_effects(&window, &document)?;
    setup_reveal(&document)?;
    setup_mobile_nav(&document)?;
    setup_smooth_scroll(&document)?;
    setup_copy_to_clipboard(&document)?;
    setup_card_hover(&document)?;
    setup_title_hue(&window, &document)?;
    setup_visits(&window, &document)?;
    setup_location(&window, &document);
    setup_load_metrics(&window)?;

    tracing::info!("portfolio initialized");
    Ok(BackdropHandle { token })
}

fn prefers_reduced_motion(window: &web_sys::Window) -> bool {
    window
        .match_media("(prefers-reduced-motion: reduce)")
        .ok()
        .flatten()
        .is_some_and(|mql| mql.matches())
}

fn touch_capable(window: &web_sys::Window) -> bool {
    window.navigator().max_touch_points() > 0
        || js_sys::Reflect::has(window, &JsValue::from_str("ontouchstart")).unwrap_or(false)
}

fn viewport(window: &web_sys::Window) -> Viewport {
    let dimension = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    Viewport::new(
        dimension(window.inner_width()) as f32,
        dimension(window.inner_height()) as f32,
    )
    .with_touch(touch_capable(window))
}

/// Attach `handler` to `kind` events on `target` for the page's lifetime.
fn listen(
    target: &EventTarget,
    kind: &str,
    handler: impl FnMut(Event) + 'static,
) -> Result<(), JsValue> {
    let closure = Closure::<dyn FnMut(Event)>::new(handler);
    target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

/// Run `tick` every `ms` milliseconds. Returns the interval id.
fn every(window: &web_sys::Window, ms: u32, tick: impl FnMut() + 'static) -> Result<i32, JsValue> {
    let closure = Closure::<dyn FnMut()>::new(tick);
    let id = window.set_interval_with_callback_and_timeout_and_arguments_0(
        closure.as_ref().unchecked_ref(),
        ms as i32,
    )?;
    closure.forget();
    Ok(id)
}

/// Run `f` once after `ms` milliseconds.
fn after(window: &web_sys::Window, ms: u32, f: impl FnOnce() + 'static) -> Result<(), JsValue> {
    let closure = Closure::once(f);
    window.set_timeout_with_callback_and_timeout_and_arguments_0(
        closure.as_ref().unchecked_ref(),
        ms as i32,
    )?;
    closure.forget();
    Ok(())
}

fn html_element(document: &Document, id: &str) -> Option<HtmlElement> {
    document.get_element_by_id(id)?.dyn_into::<HtmlElement>().ok()
}

fn elements(document: &Document, selector: &str) -> Vec<Element> {
    let Ok(nodes) = document.query_selector_all(selector) else {
        return Vec::new();
    };
    (0..nodes.length())
        .filter_map(|i| nodes.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

fn set_class(element: &Element, class: &str, on: bool) {
    let _ = element.class_list().toggle_with_force(class, on);
}

// ========== Particle network ==========

fn start_network(
    window: &web_sys::Window,
    document: &Document,
    config: BackdropConfig,
) -> Result<Option<CancelToken>, JsValue> {
    let canvas = document
        .get_element_by_id(CANVAS_ID)
        .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok());
    let Some(element) = canvas else {
        tracing::warn!(id = CANVAS_ID, "canvas not found; backdrop disabled");
        return Ok(None);
    };

    let slot: Rc<RefCell<Option<NeuralNetworkWidget<WebCanvas>>>> = Rc::new(RefCell::new(None));
    let mut scheduler = RafScheduler {
        callback: Rc::new(RefCell::new(None)),
    };

    // The frame callback must exist before the loop asks for its first frame.
    {
        let slot = slot.clone();
        let mut frame_scheduler = scheduler.clone();
        *scheduler.callback.borrow_mut() = Some(Closure::new(move || {
            if let Some(widget) = slot.borrow_mut().as_mut() {
                widget.frame(&mut frame_scheduler);
            }
        }));
    }

    let Some(widget) = NeuralNetworkWidget::bind(
        WebCanvas::new(element.clone()),
        viewport(window),
        config,
        &mut scheduler,
    ) else {
        return Ok(None);
    };
    let token = widget.cancel_token();
    *slot.borrow_mut() = Some(widget);

    let target: &EventTarget = element.as_ref();
    {
        let slot = slot.clone();
        listen(target, "mousemove", move |event| {
            if let (Some(widget), Some(mouse)) =
                (slot.borrow_mut().as_mut(), event.dyn_ref::<MouseEvent>())
            {
                let position = Vec2::new(mouse.client_x() as f32, mouse.client_y() as f32);
                widget.feed_pointer(&MouseAdapter, &MouseInput::Moved(position));
            }
        })?;
    }
    {
        let slot = slot.clone();
        listen(target, "mouseleave", move |_| {
            if let Some(widget) = slot.borrow_mut().as_mut() {
                widget.feed_pointer(&MouseAdapter, &MouseInput::Left);
            }
        })?;
    }
    {
        let slot = slot.clone();
        let canvas = element.clone();
        listen(target, "touchmove", move |event| {
            event.prevent_default();
            let Some(touch_event) = event.dyn_ref::<TouchEvent>() else {
                return;
            };
            let list = touch_event.touches();
            let touches = (0..list.length())
                .filter_map(|i| list.get(i))
                .map(|t| Vec2::new(t.client_x() as f32, t.client_y() as f32))
                .collect();
            let rect = canvas.get_bounding_client_rect();
            let scroll = web_sys::window()
                .map(|w| {
                    Vec2::new(
                        w.scroll_x().unwrap_or(0.0) as f32,
                        w.scroll_y().unwrap_or(0.0) as f32,
                    )
                })
                .unwrap_or(Vec2::ZERO);
            let input = TouchInput::Moved {
                touches,
                canvas_origin: Vec2::new(rect.left() as f32, rect.top() as f32),
                scroll,
            };
            if let Some(widget) = slot.borrow_mut().as_mut() {
                widget.feed_pointer(&TouchAdapter, &input);
            }
        })?;
    }
    {
        let slot = slot.clone();
        listen(target, "touchend", move |_| {
            if let Some(widget) = slot.borrow_mut().as_mut() {
                widget.feed_pointer(&TouchAdapter, &TouchInput::Ended);
            }
        })?;
    }
    {
        let slot = slot.clone();
        listen(window.as_ref(), "resize", move |_| {
            let mut slot = slot.borrow_mut();
            if let (Some(window), Some(widget)) = (web_sys::window(), slot.as_mut()) {
                widget.resize(viewport(&window));
            }
        })?;
    }

    Ok(Some(token))
}

// ========== Page collaborators ==========

/// The splash's progress bar and status line.
#[derive(Clone)]
struct LoadingView {
    bar: Option<HtmlElement>,
    status: Option<HtmlElement>,
}

impl LoadingView {
    fn show(&self, progress: &LoadingProgress) {
        if let Some(bar) = &self.bar {
            let _ = bar.style().set_property("width", &progress.css_width());
        }
        if let Some(status) = &self.status {
            status.set_text_content(Some(progress.status()));
        }
    }
}

fn setup_loading(window: &web_sys::Window, document: &Document) -> Result<(), JsValue> {
    let screen = html_element(document, "loadingScreen");
    let view = LoadingView {
        bar: html_element(document, "loadingProgress"),
        status: html_element(document, "loadingStatus"),
    };
    let progress = Rc::new(RefCell::new(LoadingProgress::new()));

    let interval = {
        let progress = progress.clone();
        let view = view.clone();
        let mut rng = SmallRng::from_entropy();
        every(window, TICK_MS, move || {
            let mut progress = progress.borrow_mut();
            progress.tick(&mut rng);
            view.show(&progress);
        })?
    };

    let document = document.clone();
    after(window, READY_AFTER_MS, move || {
        let Some(window) = web_sys::window() else {
            return;
        };
        window.clear_interval_with_handle(interval);
        progress.borrow_mut().complete();
        view.show(&progress.borrow());

        let hidden = after(&window, HIDE_AFTER_MS, move || {
            progress.borrow_mut().hide();
            if let Some(screen) = &screen {
                set_class(screen, "hidden", true);
            }
            if let Some(body) = document.body() {
                set_class(&body, "loading", false);
                set_class(&body, "page-loaded", true);
            }
        });
        if let Err(e) = hidden {
            tracing::warn!(error = ?e, "failed to schedule splash hide");
        }
    })
}

fn setup_typing(document: &Document, config: &BackdropConfig) -> Result<(), JsValue> {
    let Some(element) = html_element(document, "typingText") else {
        return Ok(());
    };
    let mut cycle = TypingCycle::new(&config.typing);

    // Self-rescheduling timeout, like the animation-frame callback.
    let callback: FrameCallback = Rc::new(RefCell::new(None));
    let next = callback.clone();
    *callback.borrow_mut() = Some(Closure::new(move || {
        let step = cycle.tick();
        element.set_text_content(Some(&step.text));
        if let (Some(window), Some(cb)) = (web_sys::window(), next.borrow().as_ref()) {
            let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
                cb.as_ref().unchecked_ref(),
                step.delay_ms as i32,
            );
        }
    }));

    if let (Some(window), Some(cb)) = (web_sys::window(), callback.borrow().as_ref()) {
        window.set_timeout_with_callback_and_timeout_and_arguments_0(cb.as_ref().unchecked_ref(), 0)?;
    }
    Ok(())
}

fn setup_scroll_effects(window: &web_sys::Window, document: &Document) -> Result<(), JsValue> {
    let navbar = document.get_element_by_id("navbar");
    let back_to_top = document.get_element_by_id("backToTop");
    let hero = document
        .query_selector(".hero-content")
        .ok()
        .flatten()
        .and_then(|el| el.dyn_into::<HtmlElement>().ok());
    let sections: Vec<HtmlElement> = elements(document, "section[id]")
        .into_iter()
        .filter_map(|el| el.dyn_into::<HtmlElement>().ok())
        .collect();
    let links = elements(document, ".nav-link");

    if let Some(button) = &back_to_top {
        listen(button.as_ref(), "click", |_| {
            if let Some(window) = web_sys::window() {
                scroll_smoothly(&window, 0.0);
            }
        })?;
    }

    listen(window.as_ref(), "scroll", move |_| {
        let Some(window) = web_sys::window() else {
            return;
        };
        let scroll_y = window.page_y_offset().unwrap_or(0.0) as f32;
        let fx = ScrollEffects::at(scroll_y);

        if let Some(navbar) = &navbar {
            set_class(navbar, "scrolled", fx.navbar_scrolled);
        }
        if let Some(button) = &back_to_top {
            set_class(button, "visible", fx.back_to_top_visible);
        }
        if let Some(hero) = &hero {
            let style = hero.style();
            let _ = style.set_property("transform", &fx.hero_transform());
            let _ = style.set_property("opacity", &fx.hero_opacity.to_string());
        }

        let ids: Vec<(String, f32)> = sections
            .iter()
            .map(|s| (s.id(), s.offset_top() as f32))
            .collect();
        let current = effects::active_section(ids.iter().map(|(id, top)| (id.as_str(), *top)), scroll_y);
        for link in &links {
            let href = link.get_attribute("href").unwrap_or_default();
            let active = current.is_some_and(|id| href.strip_prefix('#') == Some(id));
            set_class(link, "active", active);
        }
    })
}

fn setup_reveal(document: &Document) -> Result<(), JsValue> {
    let blocks = elements(document, &reveal::reveal_selector());
    if blocks.is_empty() {
        return Ok(());
    }
    let callback = Closure::<dyn FnMut(js_sys::Array, IntersectionObserver)>::new(
        |entries: js_sys::Array, _observer: IntersectionObserver| {
            for entry in entries.iter() {
                let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                    continue;
                };
                if reveal::should_reveal(entry.is_intersecting()) {
                    set_class(&entry.target(), REVEALED_CLASS, true);
                }
            }
        },
    );
    let options = IntersectionObserverInit::new();
    options.set_threshold(&JsValue::from_f64(REVEAL_THRESHOLD));
    options.set_root_margin(REVEAL_ROOT_MARGIN);
    let observer =
        IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)?;
    callback.forget();

    for block in &blocks {
        observer.observe(block);
    }
    Ok(())
}

fn setup_mobile_nav(document: &Document) -> Result<(), JsValue> {
    let (Some(toggle), Some(menu)) = (
        document.get_element_by_id("navToggle"),
        document.get_element_by_id("navMenu"),
    ) else {
        return Ok(());
    };
    let state = Rc::new(RefCell::new(NavMenu::new()));

    {
        let state = state.clone();
        let menu = menu.clone();
        listen(toggle.as_ref(), "click", move |_| {
            set_class(&menu, "active", state.borrow_mut().toggle());
        })?;
    }
    for link in elements(document, ".nav-link") {
        let state = state.clone();
        let menu = menu.clone();
        listen(link.as_ref(), "click", move |_| {
            set_class(&menu, "active", state.borrow_mut().close());
        })?;
    }
    {
        let state = state.clone();
        let menu = menu.clone();
        listen(document.as_ref(), "click", move |event| {
            let target = event.target().and_then(|t| t.dyn_into::<Node>().ok());
            let inside_toggle = toggle.contains(target.as_ref());
            let inside_menu = menu.contains(target.as_ref());
            let open = state
                .borrow_mut()
                .on_document_click(inside_toggle, inside_menu);
            set_class(&menu, "active", open);
        })?;
    }
    listen(document.as_ref(), "keydown", move |event| {
        if let Some(key) = event.dyn_ref::<KeyboardEvent>().map(|k| k.key()) {
            set_class(&menu, "active", state.borrow_mut().on_key(&key));
        }
    })
}

fn setup_copy_to_clipboard(document: &Document) -> Result<(), JsValue> {
    for item in elements(document, ".contact-item") {
        let label = item.query_selector("span").ok().flatten();
        let target = item.clone();
        listen(target.as_ref(), "click", move |event| {
            let Some(label) = &label else {
                return;
            };
            let text = label.text_content();
            let href = item.get_attribute("href");
            let Some(text) = contact::copy_target(href.as_deref(), text.as_deref()) else {
                return;
            };
            event.prevent_default();
            let Some(window) = web_sys::window() else {
                return;
            };
            let written = JsFuture::from(window.navigator().clipboard().write_text(text));
            let (label, copied) = (label.clone(), text.to_owned());
            wasm_bindgen_futures::spawn_local(async move {
                if let Err(e) = written.await {
                    tracing::warn!(error = ?e, "clipboard write failed");
                    return;
                }
                label.set_text_content(Some(COPIED_LABEL));
                let restored = after(&window, COPIED_RESTORE_MS, move || {
                    label.set_text_content(Some(&copied));
                });
                if let Err(e) = restored {
                    tracing::warn!(error = ?e, "failed to schedule label restore");
                }
            });
        })?;
    }
    Ok(())
}

fn setup_card_hover(document: &Document) -> Result<(), JsValue> {
    for card in elements(document, ".project-card") {
        let Ok(card) = card.dyn_into::<HtmlElement>() else {
            continue;
        };
        for (kind, hovered) in [("mouseenter", true), ("mouseleave", false)] {
            let target = card.clone();
            listen(card.as_ref(), kind, move |_| {
                let _ = target
                    .style()
                    .set_property("transform", effects::card_transform(hovered));
            })?;
        }
    }
    Ok(())
}

/// Log navigation timings once the load event has completed.
fn setup_load_metrics(window: &web_sys::Window) -> Result<(), JsValue> {
    if window.performance().is_none() {
        return Ok(());
    }
    listen(window.as_ref(), "load", |_| {
        let Some(window) = web_sys::window() else {
            return;
        };
        // loadEventEnd is only filled in after the load handlers return.
        let scheduled = after(&window, 0, || {
            let Some(timing) = web_sys::window()
                .and_then(|w| w.performance())
                .map(|p| p.timing())
            else {
                return;
            };
            if let Some(metrics) = LoadMetrics::from_timing(
                timing.navigation_start(),
                timing.dom_content_loaded_event_end(),
                timing.load_event_end(),
            ) {
                metrics.log();
            }
        });
        if let Err(e) = scheduled {
            tracing::warn!(error = ?e, "failed to schedule load metrics");
        }
    })
}

fn scroll_smoothly(window: &web_sys::Window, top: f32) {
    let options = web_sys::ScrollToOptions::new();
    options.set_top(top as f64);
    options.set_behavior(web_sys::ScrollBehavior::Smooth);
    window.scroll_to_with_scroll_to_options(&options);
}

fn setup_smooth_scroll(document: &Document) -> Result<(), JsValue> {
    for anchor in elements(document, "a[href^=\"#\"]") {
        let document = document.clone();
        let href = anchor.get_attribute("href").unwrap_or_default();
        listen(anchor.as_ref(), "click", move |event| {
            event.prevent_default();
            let target = document
                .query_selector(&href)
                .ok()
                .flatten()
                .and_then(|el| el.dyn_into::<HtmlElement>().ok());
            if let (Some(window), Some(target)) = (web_sys::window(), target) {
                scroll_smoothly(&window, effects::smooth_scroll_target(target.offset_top() as f32));
            }
        })?;
    }
    Ok(())
}

fn setup_title_hue(window: &web_sys::Window, document: &Document) -> Result<(), JsValue> {
    let titles: Vec<HtmlElement> = elements(document, ".section-title")
        .into_iter()
        .filter_map(|el| el.dyn_into::<HtmlElement>().ok())
        .collect();
    if titles.is_empty() {
        return Ok(());
    }
    let mut hue = TitleHue::new();
    every(window, HUE_TICK_MS, move || {
        hue.tick();
        let gradient = hue.gradient();
        for title in &titles {
            let _ = title.style().set_property("background-image", &gradient);
        }
    })?;
    Ok(())
}

fn setup_visits(window: &web_sys::Window, document: &Document) -> Result<(), JsValue> {
    let (Some(mut durable), Some(mut session)) = (WebStorage::local(), WebStorage::session())
    else {
        tracing::warn!("browser storage unavailable; visit counter disabled");
        return Ok(());
    };
    let outcome = match VisitTracker::record(&mut durable, &mut session, js_sys::Date::now() as u64)
    {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::warn!(error = %e, "failed to record visit");
            return Ok(());
        }
    };
    tracing::info!(total = outcome.count, "total unique visits");

    let Some(element) = html_element(document, "visitorCount") else {
        return Ok(());
    };
    let mut counter = CountUp::new(outcome.count);
    let interval: Rc<RefCell<Option<i32>>> = Rc::new(RefCell::new(None));
    let handle = interval.clone();
    let id = every(window, COUNT_UP_TICK_MS, move || {
        let (_, done) = counter.tick();
        element.set_text_content(Some(&counter.display()));
        if done {
            if let (Some(window), Some(id)) = (web_sys::window(), *handle.borrow()) {
                window.clear_interval_with_handle(id);
            }
        }
    })?;
    *interval.borrow_mut() = Some(id);
    Ok(())
}

async fn fetch_text(url: &str) -> Result<String, GeoError> {
    let request_error = |e: JsValue| GeoError::Request(format!("{e:?}"));
    let window = web_sys::window().ok_or_else(|| GeoError::Request("no window".into()))?;
    let response: web_sys::Response = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(request_error)?
        .dyn_into()
        .map_err(request_error)?;
    if !response.ok() {
        return Err(GeoError::Request(format!("HTTP {}", response.status())));
    }
    let text = JsFuture::from(response.text().map_err(request_error)?)
        .await
        .map_err(request_error)?;
    text.as_string()
        .ok_or_else(|| GeoError::Request("response body is not text".into()))
}

fn setup_location(window: &web_sys::Window, document: &Document) {
    let Some(element) = html_element(document, "visitorLocation") else {
        return;
    };
    let language = window.navigator().language();

    wasm_bindgen_futures::spawn_local(async move {
        let mut location = None;
        for provider in Provider::CHAIN {
            match fetch_text(provider.url()).await.and_then(|body| provider.parse(&body)) {
                Ok(found) => {
                    location = Some(found);
                    break;
                }
                Err(e) => tracing::warn!(?provider, error = %e, "location provider failed"),
            }
        }
        let label = finish_label(location, language.as_deref());
        tracing::info!(label = %label, "visitor location");
        element.set_text_content(Some(label.text()));
    });
}
