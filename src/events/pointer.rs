use crate::core::{Cursor, PanelState, Showcase};
use crate::dom;
use crate::input;
use crate::panel;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys as web;

/// What the DOM currently shows, so handlers only touch it on change.
#[derive(Default)]
pub struct Presented {
    panel: PanelState,
    cursor: Cursor,
}

#[derive(Clone)]
pub struct InputWiring {
    pub canvas: web::HtmlCanvasElement,
    pub showcase: Rc<RefCell<Showcase>>,
    pub presented: Rc<RefCell<Presented>>,
}

pub fn wire_input_handlers(w: InputWiring) {
    wire_pointermove(&w);
    wire_click(&w);
}

fn wire_pointermove(w: &InputWiring) {
    let w = w.clone();
    let canvas_for_listener = w.canvas.clone();

    let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        let Some(ndc) = input::pointer_ndc(&ev, &w.canvas) else {
            return;
        };
        w.showcase.borrow_mut().pointer_moved(ndc);
        present(&w);
    }) as Box<dyn FnMut(_)>);

    _ = canvas_for_listener
        .add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
    closure.forget();
}

fn wire_click(w: &InputWiring) {
    let w = w.clone();
    let canvas_for_listener = w.canvas.clone();

    let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::MouseEvent| {
        let Some(ndc) = input::pointer_ndc(&ev, &w.canvas) else {
            return;
        };
        w.showcase.borrow_mut().clicked(ndc);
        present(&w);
        ev.prevent_default();
    }) as Box<dyn FnMut(_)>);

    _ = canvas_for_listener
        .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
    closure.forget();
}

fn present(w: &InputWiring) {
    let showcase = w.showcase.borrow();
    let mut shown = w.presented.borrow_mut();

    let cursor = showcase.cursor();
    if cursor != shown.cursor {
        dom::set_cursor(&w.canvas, cursor);
        shown.cursor = cursor;
    }

    if *showcase.panel() != shown.panel {
        if let Some(document) = dom::window_document() {
            panel::sync(&document, showcase.panel());
        }
        shown.panel = showcase.panel().clone();
    }
}
