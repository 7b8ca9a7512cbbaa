use crate::constants::{HIDDEN_CLASS, PANEL_BODY_ID, PANEL_ID, PANEL_TITLE_ID};
use crate::core::PanelState;
use web_sys as web;

pub fn show(document: &web::Document, title: &str, body: &str) {
    if let Some(el) = document.get_element_by_id(PANEL_TITLE_ID) {
        el.set_text_content(Some(title));
    }
    if let Some(el) = document.get_element_by_id(PANEL_BODY_ID) {
        el.set_text_content(Some(body));
    }
    if let Some(el) = document.get_element_by_id(PANEL_ID) {
        _ = el.class_list().remove_1(HIDDEN_CLASS);
        // fallback for environments without CSS class
        _ = el.set_attribute("style", "");
    }
}

pub fn hide(document: &web::Document) {
    if let Some(el) = document.get_element_by_id(PANEL_ID) {
        _ = el.class_list().add_1(HIDDEN_CLASS);
        // fallback
        _ = el.set_attribute("style", "display:none");
    }
}

/// Bring the DOM panel in line with the controller's panel state.
pub fn sync(document: &web::Document, state: &PanelState) {
    match state {
        PanelState::Hidden => hide(document),
        PanelState::Visible { title, body } => show(document, title, body),
    }
}
