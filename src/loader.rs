//! Asset fetching over `window.fetch`.
//!
//! Every failure comes back as a `LoadError`; callers log it and carry on
//! without the asset.

use crate::core::{
    decode_cube_map, parse_glb, BackgroundConfig, CubeMap, LoadError, ModelFragment,
    ShowcaseConfig,
};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

pub async fn fetch_bytes(url: &str) -> Result<Vec<u8>, LoadError> {
    let window = web::window().ok_or_else(|| LoadError::fetch(url, "no window"))?;
    let resp = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(|e| LoadError::fetch(url, js_reason(&e)))?;
    let resp: web::Response = resp
        .dyn_into()
        .map_err(|e| LoadError::fetch(url, js_reason(&e)))?;
    if !resp.ok() {
        return Err(LoadError::fetch(url, format!("HTTP {}", resp.status())));
    }
    let body = resp
        .array_buffer()
        .map_err(|e| LoadError::fetch(url, js_reason(&e)))?;
    let buf = JsFuture::from(body)
        .await
        .map_err(|e| LoadError::fetch(url, js_reason(&e)))?;
    Ok(js_sys::Uint8Array::new(&buf).to_vec())
}

pub async fn load_model(url: &str) -> Result<ModelFragment, LoadError> {
    let bytes = fetch_bytes(url).await?;
    let fragment = parse_glb(&bytes)?;
    log::info!(
        "[load] {} ({} bytes, {} meshes)",
        url,
        bytes.len(),
        fragment.mesh_count()
    );
    Ok(fragment)
}

pub async fn load_config(url: &str) -> Result<ShowcaseConfig, LoadError> {
    let bytes = fetch_bytes(url).await?;
    ShowcaseConfig::from_json(&bytes)
}

/// Fetch all six faces, then decode. Any single failure fails the whole map.
pub async fn load_cube_map(background: &BackgroundConfig) -> Result<CubeMap, LoadError> {
    let mut faces = Vec::with_capacity(background.faces.len());
    for url in &background.faces {
        faces.push(fetch_bytes(url).await?);
    }
    let cube = decode_cube_map(&faces)?;
    log::info!("[load] background {}x{} cube map", cube.size, cube.size);
    Ok(cube)
}

fn js_reason(value: &JsValue) -> String {
    value
        .as_string()
        .unwrap_or_else(|| format!("{:?}", value))
}
