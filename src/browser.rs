//! Browser side: `Surface` over the live document and the event wiring
//! that feeds the page controller.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use log::debug;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, Element, Event, EventTarget, HtmlElement, IntersectionObserver,
    IntersectionObserverEntry, IntersectionObserverInit, ScrollBehavior, ScrollToOptions, Window,
};

use crate::config::GuideConfig;
use crate::controller::{Bindings, PageController};
use crate::surface::Surface;

pub struct BrowserSurface {
    window: Window,
    document: Document,
}

impl BrowserSurface {
    pub fn new() -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("No global window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("Window has no document"))?;
        Ok(BrowserSurface { window, document })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn document(&self) -> &Document {
        &self.document
    }
}

impl Surface for BrowserSurface {
    type Element = Element;

    fn query_all(&self, selector: &str) -> Vec<Element> {
        let Ok(list) = self.document.query_selector_all(selector) else {
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    fn query(&self, selector: &str) -> Option<Element> {
        self.document.query_selector(selector).ok().flatten()
    }

    fn element_by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn closest(&self, element: &Element, selector: &str) -> Option<Element> {
        element.closest(selector).ok().flatten()
    }

    fn find_within(&self, element: &Element, selector: &str) -> Option<Element> {
        element.query_selector(selector).ok().flatten()
    }

    fn attribute(&self, element: &Element, name: &str) -> Option<String> {
        element.get_attribute(name)
    }

    fn set_attribute(&self, element: &Element, name: &str, value: &str) {
        let _ = element.set_attribute(name, value);
    }

    fn text(&self, element: &Element) -> String {
        element.text_content().unwrap_or_default()
    }

    fn set_text(&self, element: &Element, text: &str) {
        element.set_text_content(Some(text));
    }

    fn set_style(&self, element: &Element, property: &str, value: &str) {
        if let Some(html) = element.dyn_ref::<HtmlElement>() {
            let _ = html.style().set_property(property, value);
        }
    }

    fn clear_style(&self, element: &Element, property: &str) {
        if let Some(html) = element.dyn_ref::<HtmlElement>() {
            let _ = html.style().remove_property(property);
        }
    }

    fn create_element(&self, tag: &str) -> Option<Element> {
        self.document.create_element(tag).ok()
    }

    fn append_to_body(&self, element: &Element) {
        if let Some(body) = self.document.body() {
            let _ = body.append_child(element);
        }
    }

    fn remove(&self, element: &Element) {
        element.remove();
    }

    fn offset_top(&self, element: &Element) -> f64 {
        element
            .dyn_ref::<HtmlElement>()
            .map_or(0.0, |html| html.offset_top() as f64)
    }

    fn scroll_y(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }

    fn scroll_to(&self, top: f64) {
        let options = ScrollToOptions::new();
        options.set_top(top);
        options.set_behavior(ScrollBehavior::Smooth);
        self.window.scroll_to_with_scroll_to_options(&options);
    }

    fn alert(&self, message: &str) {
        let _ = self.window.alert_with_message(message);
    }
}

/// Shared state behind every listener
struct Runtime {
    controller: RefCell<PageController<BrowserSurface>>,
    window: Window,
    // (timeout handle, deadline) of the single armed wake-up
    armed: Cell<Option<(i32, u64)>>,
}

impl Runtime {
    /// Keep exactly one timeout pointed at the earliest toast step
    fn rearm(self: &Rc<Self>) {
        let now = now_ms();
        let Some(delay) = self.controller.borrow().next_wakeup(now) else {
            return;
        };
        let due = now + delay;

        if let Some((handle, armed_due)) = self.armed.get() {
            if armed_due <= due {
                return;
            }
            self.window.clear_timeout_with_handle(handle);
        }

        let runtime = Rc::clone(self);
        let callback = Closure::once_into_js(move || {
            runtime.armed.set(None);
            runtime.controller.borrow_mut().tick(now_ms());
            runtime.rearm();
        });

        let timeout = i32::try_from(delay).unwrap_or(i32::MAX);
        match self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), timeout)
        {
            Ok(handle) => self.armed.set(Some((handle, due))),
            Err(e) => debug!("Failed to arm toast timer: {:?}", e),
        }
    }
}

fn now_ms() -> u64 {
    js_sys::Date::now() as u64
}

fn current_year() -> i32 {
    js_sys::Date::new_0().get_full_year() as i32
}

fn listen<F>(target: &EventTarget, event: &str, handler: F) -> Result<(), JsValue>
where
    F: FnMut(Event) + 'static,
{
    let closure = Closure::<dyn FnMut(Event)>::new(handler);
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    // Listeners live as long as the page
    closure.forget();
    Ok(())
}

/// Wire the page now if the document is parsed, otherwise on
/// `DOMContentLoaded`
pub fn start(config: GuideConfig) -> Result<(), JsValue> {
    let surface = BrowserSurface::new()?;
    if surface.document().ready_state() == "loading" {
        let document = surface.document().clone();
        let callback = Closure::once_into_js(move || {
            if let Err(e) = install(surface, config) {
                log::error!("Failed to wire page: {:?}", e);
            }
        });
        document.add_event_listener_with_callback("DOMContentLoaded", callback.unchecked_ref())?;
        Ok(())
    } else {
        install(surface, config)
    }
}

fn install(surface: BrowserSurface, config: GuideConfig) -> Result<(), JsValue> {
    let window = surface.window().clone();
    let mut controller = PageController::new(surface, config);
    let bindings = controller.init(current_year());

    let runtime = Rc::new(Runtime {
        controller: RefCell::new(controller),
        window,
        armed: Cell::new(None),
    });

    wire_nav_links(&runtime, &bindings)?;
    wire_reveal(&runtime, &bindings)?;
    wire_guide_buttons(&runtime, &bindings)?;
    wire_component_cards(&runtime, &bindings)?;
    wire_scroll_button(&runtime, &bindings)?;
    wire_table_rows(&runtime, &bindings)?;

    Ok(())
}

fn wire_nav_links(runtime: &Rc<Runtime>, bindings: &Bindings<Element>) -> Result<(), JsValue> {
    for link in &bindings.nav_links {
        let runtime = Rc::clone(runtime);
        let target = link.clone();
        listen(link, "click", move |event| {
            event.prevent_default();
            runtime.controller.borrow_mut().on_nav_click(&target);
        })?;
    }
    Ok(())
}

fn wire_reveal(runtime: &Rc<Runtime>, bindings: &Bindings<Element>) -> Result<(), JsValue> {
    if bindings.cards.is_empty() {
        return Ok(());
    }

    let handler = {
        let runtime = Rc::clone(runtime);
        Closure::<dyn FnMut(js_sys::Array, IntersectionObserver)>::new(
            move |entries: js_sys::Array, observer: IntersectionObserver| {
                for entry in entries.iter() {
                    let entry: IntersectionObserverEntry = entry.unchecked_into();
                    let ratio = if entry.is_intersecting() {
                        entry.intersection_ratio()
                    } else {
                        0.0
                    };
                    let card = entry.target();
                    if runtime.controller.borrow_mut().on_intersection(&card, ratio) {
                        observer.unobserve(&card);
                    }
                }
            },
        )
    };

    let options = IntersectionObserverInit::new();
    {
        let controller = runtime.controller.borrow();
        let config = controller.config();
        options.set_threshold(&JsValue::from_f64(config.reveal_threshold));
        options.set_root_margin(&config.reveal_root_margin);
    }

    let observer =
        IntersectionObserver::new_with_options(handler.as_ref().unchecked_ref(), &options)?;
    handler.forget();

    for card in &bindings.cards {
        observer.observe(card);
    }
    Ok(())
}

fn wire_guide_buttons(runtime: &Rc<Runtime>, bindings: &Bindings<Element>) -> Result<(), JsValue> {
    for button in &bindings.guide_buttons {
        let runtime = Rc::clone(runtime);
        let target = button.clone();
        listen(button, "click", move |_| {
            runtime.controller.borrow().on_guide_button(&target);
        })?;
    }
    Ok(())
}

fn wire_component_cards(runtime: &Rc<Runtime>, bindings: &Bindings<Element>) -> Result<(), JsValue> {
    for card in &bindings.component_cards {
        let runtime = Rc::clone(runtime);
        let target = card.clone();
        listen(card, "click", move |_| {
            runtime.controller.borrow_mut().on_component_card(&target, now_ms());
            runtime.rearm();
        })?;
    }
    Ok(())
}

fn wire_scroll_button(runtime: &Rc<Runtime>, bindings: &Bindings<Element>) -> Result<(), JsValue> {
    let Some(button) = &bindings.scroll_button else {
        return Ok(());
    };

    let window = runtime.window.clone();
    {
        let runtime = Rc::clone(runtime);
        listen(&window, "scroll", move |_| {
            runtime.controller.borrow().on_scroll();
        })?;
    }

    let runtime = Rc::clone(runtime);
    listen(button, "click", move |_| {
        runtime.controller.borrow().on_scroll_top_click();
    })
}

fn wire_table_rows(runtime: &Rc<Runtime>, bindings: &Bindings<Element>) -> Result<(), JsValue> {
    for row in &bindings.table_rows {
        for (event, entered) in [("mouseenter", true), ("mouseleave", false)] {
            let runtime = Rc::clone(runtime);
            let target = row.clone();
            listen(row, event, move |_| {
                runtime.controller.borrow().on_row_hover(&target, entered);
            })?;
        }
    }
    Ok(())
}
