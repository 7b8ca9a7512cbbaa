use glam::Vec2;
use web_sys as web;

/// Map a client-space point to normalized device coordinates of `rect`
/// (`left`, `top`, `width`, `height`): x right, y up, both in `[-1, 1]`.
/// `None` for a zero-sized rect.
#[inline]
pub fn client_to_ndc(x: f32, y: f32, left: f32, top: f32, width: f32, height: f32) -> Option<Vec2> {
    if !(width > 0.0 && height > 0.0) {
        return None;
    }
    let u = (x - left) / width;
    let v = (y - top) / height;
    Some(Vec2::new(u * 2.0 - 1.0, 1.0 - v * 2.0))
}

#[inline]
pub fn pointer_ndc(ev: &web::MouseEvent, canvas: &web::HtmlCanvasElement) -> Option<Vec2> {
    let rect = canvas.get_bounding_client_rect();
    client_to_ndc(
        ev.client_x() as f32,
        ev.client_y() as f32,
        rect.left() as f32,
        rect.top() as f32,
        rect.width() as f32,
        rect.height() as f32,
    )
}

