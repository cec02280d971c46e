//! One mounted playfield: a canvas, the engine driving it, the tick timer and
//! every DOM listener it registered.
//!
//! The page holds a `GameHandle` per surface (desktop section, mobile popup)
//! and calls into it from its own buttons and widgets. Timer and listeners are
//! RAII handles owned by the surface, so `dispose()` (or dropping the handle)
//! releases all of them.

mod render;
mod sprites;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo::events::{EventListener, EventListenerOptions};
use gloo::timers::callback::Interval;
use js_sys::Function;
use log::{info, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    CanvasRenderingContext2d, Document, Element, Event, HtmlCanvasElement, HtmlElement,
    KeyboardEvent, Node, TouchEvent, window,
};

use crate::BRANDS;
use crate::audio::{SoundCue, SoundSink, WebAudio};
use crate::config::{EngineConfig, Variant};
use crate::error::SurfaceError;
use crate::game::{Engine, Lifecycle, TickOutcome};
use crate::grid::Direction;
use crate::input::{KeyCommand, SwipeTracker, should_pause_on_click};

use self::sprites::BrandSprites;

struct Surface {
    engine: RefCell<Engine>,
    document: Document,
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    wrapper: HtmlElement,
    sprites: BrandSprites,
    sound: Box<dyn SoundSink>,
    swipe: RefCell<SwipeTracker>,
    chat_open: Cell<bool>,
    disposed: Cell<bool>,
    timer: RefCell<Option<Interval>>,
    listeners: RefCell<Vec<EventListener>>,
    on_change: RefCell<Option<Function>>,
}

impl Surface {
    /// Size the canvas to its wrapper and report the new size to the engine.
    fn measure(&self) {
        let rect = self.wrapper.get_bounding_client_rect();
        self.canvas.set_width(rect.width().max(0.0) as u32);
        self.canvas.set_height(rect.height().max(0.0) as u32);
        if let Err(err) = self.engine.borrow_mut().resize(rect.width(), rect.height()) {
            warn!("surface not playable: {err}");
        }
    }

    fn redraw(&self) {
        let engine = self.engine.borrow();
        render::draw(
            &self.ctx,
            self.canvas.width() as f64,
            self.canvas.height() as f64,
            &engine,
            &self.sprites,
        );
    }

    fn notify(&self) {
        // Cloned so the callback may call back into the handle.
        let callback = self.on_change.borrow().clone();
        if let Some(callback) = callback {
            if let Err(err) = callback.call0(&JsValue::NULL) {
                warn!("on_change callback failed: {err:?}");
            }
        }
    }

    fn has_focus(&self) -> bool {
        let target: &Element = &self.wrapper;
        self.document.active_element().is_some_and(|el| &el == target)
    }

    fn focus(&self) {
        let _ = self.wrapper.focus();
    }

    /// Keep the timer in step with the lifecycle: exactly one interval while
    /// running, none otherwise. A disposed surface never arms one.
    fn sync_timer(self: &Rc<Self>) {
        let running =
            !self.disposed.get() && self.engine.borrow().lifecycle() == Lifecycle::Running;
        let mut timer = self.timer.borrow_mut();
        if !running {
            timer.take();
            return;
        }
        if timer.is_none() {
            let weak = Rc::downgrade(self);
            let period = self.engine.borrow().config().tick_ms;
            *timer = Some(Interval::new(period, move || {
                if let Some(surface) = weak.upgrade() {
                    surface.on_tick();
                }
            }));
        }
    }

    fn on_tick(self: &Rc<Self>) {
        let outcome = self.engine.borrow_mut().tick();
        match outcome {
            TickOutcome::Idle => return,
            TickOutcome::Moved => {}
            TickOutcome::Ate { .. } => self.sound.play(SoundCue::Eat),
            TickOutcome::Over { .. } => {
                self.sound.play(SoundCue::GameOver);
                self.sync_timer();
            }
        }
        self.redraw();
        self.notify();
    }

    /// Common tail of every control call.
    fn settle(self: &Rc<Self>, changed: bool) {
        self.sync_timer();
        if changed {
            self.redraw();
            self.notify();
        }
    }

    fn start(self: &Rc<Self>) -> Result<(), SurfaceError> {
        if self.disposed.get() {
            return Err(SurfaceError::Disposed);
        }
        let before = self.engine.borrow().lifecycle();
        if matches!(before, Lifecycle::Idle | Lifecycle::Over) {
            self.measure();
        }
        let result = self.engine.borrow_mut().start();
        self.settle(result.is_ok() && before != Lifecycle::Running);
        result?;
        self.focus();
        Ok(())
    }

    fn set_direction(self: &Rc<Self>, dir: Direction) {
        if self.disposed.get() {
            return;
        }
        let before = self.engine.borrow().lifecycle();
        if matches!(before, Lifecycle::Idle | Lifecycle::Over) {
            self.measure();
        }
        self.engine.borrow_mut().set_direction(dir);
        let after = self.engine.borrow().lifecycle();
        self.settle(after != before);
    }

    fn toggle_pause(self: &Rc<Self>) {
        if self.disposed.get() {
            return;
        }
        let changed = self.engine.borrow_mut().toggle_pause();
        if changed && self.engine.borrow().lifecycle() == Lifecycle::Running {
            self.focus();
        }
        self.settle(changed);
    }

    fn handle_key(self: &Rc<Self>, event: &KeyboardEvent) {
        if self.chat_open.get() || !self.has_focus() {
            return;
        }
        let Some(command) = KeyCommand::from_key(&event.key()) else {
            return;
        };
        event.prevent_default();
        match command {
            KeyCommand::Turn(dir) => self.set_direction(dir),
            KeyCommand::TogglePause => self.toggle_pause(),
            KeyCommand::Start => {
                if let Err(err) = self.start() {
                    warn!("start key ignored: {err}");
                }
            }
        }
    }

    fn handle_click(self: &Rc<Self>, event: &Event) {
        let target = event.target();
        let node = target.as_ref().and_then(|t| t.dyn_ref::<Node>());
        let inside = self.wrapper.contains(node);
        let selector = self.engine.borrow().config().control_selector.clone();
        let on_control = target
            .as_ref()
            .and_then(|t| t.dyn_ref::<Element>())
            .and_then(|el| el.closest(&selector).ok().flatten())
            .is_some();
        if inside {
            self.focus();
        }
        if should_pause_on_click(inside, on_control, self.engine.borrow().lifecycle()) {
            let changed = self.engine.borrow_mut().pause();
            self.settle(changed);
        }
    }

    fn install_listeners(self: &Rc<Self>) -> Result<(), SurfaceError> {
        let win = window().ok_or(SurfaceError::NoWindow)?;
        let mut listeners = Vec::new();

        let weak = Rc::downgrade(self);
        listeners.push(EventListener::new_with_options(
            &win,
            "keydown",
            EventListenerOptions::enable_prevent_default(),
            move |event: &Event| {
                let Some(surface) = weak.upgrade() else {
                    return;
                };
                if let Some(event) = event.dyn_ref::<KeyboardEvent>() {
                    surface.handle_key(event);
                }
            },
        ));

        let weak = Rc::downgrade(self);
        listeners.push(EventListener::new(&win, "resize", move |_event: &Event| {
            let Some(surface) = weak.upgrade() else {
                return;
            };
            surface.measure();
            surface.redraw();
        }));

        let weak = Rc::downgrade(self);
        listeners.push(EventListener::new(&self.document, "click", move |event: &Event| {
            if let Some(surface) = weak.upgrade() {
                surface.handle_click(event);
            }
        }));

        let weak = Rc::downgrade(self);
        listeners.push(EventListener::new(&self.wrapper, "touchstart", move |event: &Event| {
            let Some(surface) = weak.upgrade() else {
                return;
            };
            if let Some(touch) = first_changed_touch(event) {
                surface.swipe.borrow_mut().begin(touch.0, touch.1);
            }
        }));

        // Keep the page from scrolling under a swipe while a round runs.
        let weak = Rc::downgrade(self);
        listeners.push(EventListener::new_with_options(
            &self.wrapper,
            "touchmove",
            EventListenerOptions::enable_prevent_default(),
            move |event: &Event| {
                let Some(surface) = weak.upgrade() else {
                    return;
                };
                if surface.engine.borrow().lifecycle() == Lifecycle::Running {
                    event.prevent_default();
                }
            },
        ));

        let weak = Rc::downgrade(self);
        listeners.push(EventListener::new(&self.wrapper, "touchend", move |event: &Event| {
            let Some(surface) = weak.upgrade() else {
                return;
            };
            let Some((x, y)) = first_changed_touch(event) else {
                return;
            };
            let swipe = surface.swipe.borrow_mut().end(x, y);
            if let Some(dir) = swipe {
                surface.set_direction(dir);
            }
        }));

        let weak = Rc::downgrade(self);
        listeners.push(EventListener::new(&self.wrapper, "touchcancel", move |_event: &Event| {
            if let Some(surface) = weak.upgrade() {
                surface.swipe.borrow_mut().cancel();
            }
        }));

        *self.listeners.borrow_mut() = listeners;
        Ok(())
    }

    fn dispose(self: &Rc<Self>) {
        self.disposed.set(true);
        self.engine.borrow_mut().force_pause();
        self.timer.borrow_mut().take();
        self.listeners.borrow_mut().clear();
        self.on_change.borrow_mut().take();
    }
}

fn first_changed_touch(event: &Event) -> Option<(f64, f64)> {
    let touch = event.dyn_ref::<TouchEvent>()?.changed_touches().item(0)?;
    Some((touch.client_x() as f64, touch.client_y() as f64))
}

/// Page-facing handle to one mounted game surface.
#[wasm_bindgen]
pub struct GameHandle {
    surface: Rc<Surface>,
}

#[wasm_bindgen]
impl GameHandle {
    /// Mount on `#canvas_id` inside the focusable `#wrapper_id`.
    /// `variant` is `"desktop"` or `"mobile"`.
    pub fn mount(canvas_id: &str, wrapper_id: &str, variant: &str) -> Result<GameHandle, JsValue> {
        let config = Variant::parse(variant).unwrap_or(Variant::Desktop).config();
        Ok(Self::mount_config(canvas_id, wrapper_id, config)?)
    }

    pub fn start(&self) -> Result<(), JsValue> {
        Ok(self.surface.start()?)
    }

    pub fn pause(&self) {
        if self.surface.disposed.get() {
            return;
        }
        let changed = self.surface.engine.borrow_mut().pause();
        self.surface.settle(changed);
    }

    pub fn resume(&self) {
        if self.surface.disposed.get() {
            return;
        }
        let changed = self.surface.engine.borrow_mut().resume();
        if changed {
            self.surface.focus();
        }
        self.surface.settle(changed);
    }

    #[wasm_bindgen(js_name = togglePause)]
    pub fn toggle_pause(&self) {
        self.surface.toggle_pause();
    }

    #[wasm_bindgen(js_name = forcePause)]
    pub fn force_pause(&self) {
        if self.surface.disposed.get() {
            return;
        }
        let changed = self.surface.engine.borrow_mut().force_pause();
        self.surface.settle(changed);
    }

    /// `"up" | "down" | "left" | "right"`; anything else is ignored.
    #[wasm_bindgen(js_name = setDirection)]
    pub fn set_direction(&self, dir: &str) {
        if let Some(dir) = Direction::parse(dir) {
            self.surface.set_direction(dir);
        }
    }

    /// Push notification from the chat widget. Opening pauses the round and
    /// game keys stay unclaimed until it closes.
    #[wasm_bindgen(js_name = setChatOpen)]
    pub fn set_chat_open(&self, open: bool) {
        self.surface.chat_open.set(open);
        if open {
            self.force_pause();
        }
    }

    /// Called with no arguments after every visible state change.
    #[wasm_bindgen(js_name = setOnChange)]
    pub fn set_on_change(&self, callback: Option<Function>) {
        *self.surface.on_change.borrow_mut() = callback;
    }

    #[wasm_bindgen(getter)]
    pub fn score(&self) -> u32 {
        self.surface.engine.borrow().score()
    }

    #[wasm_bindgen(getter)]
    pub fn impact(&self) -> u32 {
        self.surface.engine.borrow().impact()
    }

    #[wasm_bindgen(getter)]
    pub fn lifecycle(&self) -> Lifecycle {
        self.surface.engine.borrow().lifecycle()
    }

    #[wasm_bindgen(getter)]
    pub fn length(&self) -> usize {
        self.surface.engine.borrow().snake().len()
    }

    /// Pause, cancel the timer and drop every listener. The handle stays
    /// readable but inert: later control calls are ignored and `start()`
    /// fails.
    pub fn dispose(&self) {
        self.surface.dispose();
        info!("game surface disposed");
    }
}

#[cfg(feature = "serde_json")]
#[wasm_bindgen]
impl GameHandle {
    /// Like `mount`, with a JSON object overriding preset fields.
    #[wasm_bindgen(js_name = mountWithConfig)]
    pub fn mount_with_config(
        canvas_id: &str,
        wrapper_id: &str,
        variant: &str,
        config_json: &str,
    ) -> Result<GameHandle, JsValue> {
        let preset = Variant::parse(variant).unwrap_or(Variant::Desktop).config();
        let config = preset
            .with_overrides(config_json)
            .map_err(|e| SurfaceError::Config(e.to_string()))?;
        Ok(Self::mount_config(canvas_id, wrapper_id, config)?)
    }

    /// `{"score", "impact", "lifecycle", "length"}` as JSON.
    #[wasm_bindgen(js_name = snapshotJson)]
    pub fn snapshot_json(&self) -> Result<String, JsValue> {
        let snapshot = self.surface.engine.borrow().snapshot();
        serde_json::to_string(&snapshot).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

impl GameHandle {
    fn mount_config(
        canvas_id: &str,
        wrapper_id: &str,
        config: EngineConfig,
    ) -> Result<GameHandle, SurfaceError> {
        let win = window().ok_or(SurfaceError::NoWindow)?;
        let document = win.document().ok_or(SurfaceError::NoDocument)?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| SurfaceError::MissingElement(canvas_id.to_string()))?
            .dyn_into()
            .map_err(|_| SurfaceError::NotACanvas(canvas_id.to_string()))?;
        let wrapper: HtmlElement = document
            .get_element_by_id(wrapper_id)
            .ok_or_else(|| SurfaceError::MissingElement(wrapper_id.to_string()))?
            .dyn_into()
            .map_err(|_| SurfaceError::MissingElement(wrapper_id.to_string()))?;
        if !wrapper.has_attribute("tabindex") {
            // Keyboard input is only taken while the wrapper has focus.
            wrapper.set_tab_index(0);
        }
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|c| c.dyn_into().ok())
            .ok_or(SurfaceError::NoContext)?;

        let urls = BRANDS.iter().take(config.brand_count).map(|(_, url)| *url);
        let sprites = BrandSprites::load(urls);
        let swipe = SwipeTracker::new(config.swipe_threshold_px);
        let surface = Rc::new(Surface {
            engine: RefCell::new(Engine::new(config)),
            document,
            canvas,
            ctx,
            wrapper,
            sprites,
            sound: Box::new(WebAudio::new()),
            swipe: RefCell::new(swipe),
            chat_open: Cell::new(false),
            disposed: Cell::new(false),
            timer: RefCell::new(None),
            listeners: RefCell::new(Vec::new()),
            on_change: RefCell::new(None),
        });
        surface.install_listeners()?;
        surface.measure();
        surface.redraw();
        info!("game surface mounted on #{canvas_id}");
        Ok(GameHandle { surface })
    }
}

impl Drop for GameHandle {
    fn drop(&mut self) {
        self.surface.dispose();
    }
}
