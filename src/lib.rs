#![cfg(target_arch = "wasm32")]
use crate::core::{BackgroundConfig, CubeMap, Exhibit, Showcase, ShowcaseConfig};
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod camera;
mod constants;
mod core;
mod dom;
mod events;
mod frame;
mod input;
mod loader;
mod panel;
mod render;

fn wire_canvas_resize(canvas: &web::HtmlCanvasElement) {
    dom::sync_canvas_backing_size(canvas);
    let canvas_resize = canvas.clone();
    let resize_closure = Closure::wrap(Box::new(move || {
        dom::sync_canvas_backing_size(&canvas_resize);
    }) as Box<dyn FnMut()>);
    if let Some(window) = web::window() {
        _ = window
            .add_event_listener_with_callback("resize", resize_closure.as_ref().unchecked_ref());
    }
    resize_closure.forget();
}

/// Catalog from `CONFIG_URL`, or the built-in one when that is missing or bad.
async fn load_config_or_default() -> ShowcaseConfig {
    match loader::load_config(constants::CONFIG_URL).await {
        Ok(config) => {
            log::info!("[config] {} exhibits from {}", config.exhibits.len(), constants::CONFIG_URL);
            config
        }
        Err(e) => {
            log::warn!("[config] using built-in catalog: {}", e);
            ShowcaseConfig::default()
        }
    }
}

/// Place every exhibit. Primitives appear at once; models appear when their
/// download finishes, and a failed download leaves that slot empty.
fn spawn_exhibits(showcase: &Rc<RefCell<Showcase>>, exhibits: Vec<Exhibit>) {
    for exhibit in exhibits {
        let Some(url) = exhibit.model.clone() else {
            showcase.borrow_mut().add_primitive(&exhibit);
            continue;
        };
        let showcase = showcase.clone();
        spawn_local(async move {
            match loader::load_model(&url).await {
                Ok(fragment) => {
                    showcase.borrow_mut().add_model(&exhibit, fragment);
                }
                Err(e) => log::error!("[load] {} failed: {}", exhibit.name, e),
            }
        });
    }
}

/// Load the background cube map into `slot`. On failure the clear color stays.
fn spawn_background(background: Option<BackgroundConfig>, slot: Rc<RefCell<Option<CubeMap>>>) {
    let Some(background) = background else {
        return;
    };
    spawn_local(async move {
        match loader::load_cube_map(&background).await {
            Ok(cube) => *slot.borrow_mut() = Some(cube),
            Err(e) => log::error!("[load] environment map failed: {}", e),
        }
    });
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("shelf-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    let document = dom::window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;
    let canvas = dom::canvas_by_id(&document, constants::CANVAS_ID)?;

    // Maintain canvas internal pixel size to match CSS size * devicePixelRatio
    wire_canvas_resize(&canvas);
    panel::hide(&document);

    let config = load_config_or_default().await;
    let exhibits = config.exhibits.clone();
    let pending_background = Rc::new(RefCell::new(None));
    spawn_background(config.background.clone(), pending_background.clone());
    let showcase = Rc::new(RefCell::new(Showcase::new(config, rand::random())));
    camera::fit_to_canvas(&mut showcase.borrow_mut(), &canvas);
    spawn_exhibits(&showcase, exhibits);

    events::wire_input_handlers(events::InputWiring {
        canvas: canvas.clone(),
        showcase: showcase.clone(),
        presented: Rc::new(RefCell::new(events::Presented::default())),
    });

    // WebGPU is optional: without it the page still reacts, it just draws nothing.
    let gpu = frame::init_gpu(&canvas).await;

    let frame_ctx = Rc::new(RefCell::new(frame::FrameContext {
        showcase,
        canvas,
        gpu,
        last_instant: Instant::now(),
        pending_background,
    }));
    frame::start_loop(frame_ctx);
    Ok(())
}
