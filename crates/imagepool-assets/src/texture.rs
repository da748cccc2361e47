use crate::error::LoadError;

/// Decoded RGBA8 pixel data backing an image handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureAsset {
    pub width: u32,
    pub height: u32,
    /// Row-major RGBA8 pixels, four bytes each
    pub data: Vec<u8>,
}

impl TextureAsset {
    /// A fully transparent RGBA8 texture.
    pub fn blank(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; (width as usize) * (height as usize) * 4],
        }
    }
}

/// Decode encoded image bytes (PNG, JPEG, etc.) into an RGBA8 texture.
/// `label` names the image in error messages.
pub fn decode_texture(label: &str, bytes: &[u8]) -> Result<TextureAsset, LoadError> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| LoadError::ImageLoadFailed(label.to_string(), e.to_string()))?;

    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();

    Ok(TextureAsset {
        width,
        height,
        data: rgba.into_raw(),
    })
}
