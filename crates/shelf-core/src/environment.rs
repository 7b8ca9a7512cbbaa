//! Background cube map decoding.
//!
//! The six face images arrive as encoded bytes in +X, -X, +Y, -Y, +Z, -Z
//! order, which is also the layer order the GPU expects for a cube texture.

use crate::error::LoadError;

/// Decoded cube map: six square RGBA8 faces of `size` x `size` texels.
#[derive(Clone, Debug, PartialEq)]
pub struct CubeMap {
    pub size: u32,
    pub faces: Vec<Vec<u8>>,
}

impl CubeMap {
    pub fn face_bytes(&self) -> usize {
        (self.size * self.size * 4) as usize
    }
}

pub fn decode_cube_map(faces: &[Vec<u8>]) -> Result<CubeMap, LoadError> {
    if faces.len() != 6 {
        return Err(LoadError::CubeFace {
            face: faces.len(),
            reason: format!("expected 6 faces, got {}", faces.len()),
        });
    }
    let mut size = 0;
    let mut decoded = Vec::with_capacity(6);
    for (face, bytes) in faces.iter().enumerate() {
        let rgba = image::load_from_memory(bytes)
            .map_err(|source| LoadError::Image { face, source })?
            .to_rgba8();
        let (w, h) = rgba.dimensions();
        if w != h || w == 0 {
            return Err(LoadError::CubeFace {
                face,
                reason: format!("{w}x{h} is not square"),
            });
        }
        if face == 0 {
            size = w;
        } else if w != size {
            return Err(LoadError::CubeFace {
                face,
                reason: format!("{w}x{w} does not match the first face ({size}x{size})"),
            });
        }
        decoded.push(rgba.into_raw());
    }
    Ok(CubeMap {
        size,
        faces: decoded,
    })
}
