use crate::core::Showcase;
use web_sys as web;

/// Backing-store aspect ratio of the canvas.
#[inline]
pub fn canvas_aspect(canvas: &web::HtmlCanvasElement) -> f32 {
    canvas.width().max(1) as f32 / canvas.height().max(1) as f32
}

/// Keep the projection in step with the canvas after a resize.
pub fn fit_to_canvas(showcase: &mut Showcase, canvas: &web::HtmlCanvasElement) {
    let aspect = canvas_aspect(canvas);
    if (showcase.camera.aspect - aspect).abs() > f32::EPSILON {
        showcase.set_aspect(aspect);
    }
}
