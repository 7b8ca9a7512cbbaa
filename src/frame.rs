use crate::camera;
use crate::constants::MAX_FRAME_DT_SEC;
use crate::core::{CubeMap, Showcase};
use crate::render;
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct FrameContext<'a> {
    pub showcase: Rc<RefCell<Showcase>>,
    pub canvas: web::HtmlCanvasElement,
    pub gpu: Option<render::GpuState<'a>>,
    pub last_instant: Instant,
    /// Decoded background waiting for the GPU to pick it up.
    pub pending_background: Rc<RefCell<Option<CubeMap>>>,
}

impl<'a> FrameContext<'a> {
    pub fn frame(&mut self) {
        let now = Instant::now();
        let dt = clamp_frame_dt(now - self.last_instant);
        self.last_instant = now;

        let mut showcase = self.showcase.borrow_mut();
        camera::fit_to_canvas(&mut showcase, &self.canvas);
        showcase.tick(dt);

        if let Some(g) = &mut self.gpu {
            g.resize_if_needed(self.canvas.width(), self.canvas.height());
            if let Some(cube) = self.pending_background.borrow_mut().take() {
                g.set_background(&cube);
            }
            g.sync_meshes(&showcase.scene);
            if let Err(e) = g.render(&showcase) {
                log::error!("render error: {:?}", e);
            }
        }
    }
}

/// Cap a frame delta so a backgrounded tab does not fast-forward tweens.
#[inline]
fn clamp_frame_dt(dt: Duration) -> Duration {
    dt.min(Duration::from_secs_f32(MAX_FRAME_DT_SEC))
}

pub async fn init_gpu(canvas: &web::HtmlCanvasElement) -> Option<render::GpuState<'static>> {
    // leak a canvas clone to satisfy 'static lifetime for surface
    let leaked_canvas = Box::leak(Box::new(canvas.clone()));
    match render::GpuState::new(leaked_canvas).await {
        Ok(g) => Some(g),
        Err(e) => {
            log::error!("WebGPU init error: {:?}", e);
            None
        }
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext<'static>>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    let frame_ctx_tick = frame_ctx.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        frame_ctx_tick.borrow_mut().frame();
        request_frame(&tick_clone);
    }) as Box<dyn FnMut()>));
    request_frame(&tick);
}

fn request_frame(tick: &Rc<RefCell<Option<Closure<dyn FnMut()>>>>) {
    let Some(w) = web::window() else {
        return;
    };
    if let Some(cb) = tick.borrow().as_ref() {
        _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
