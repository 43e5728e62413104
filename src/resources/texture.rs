use anyhow::Context;
use image::{DynamicImage, ImageFormat};

use crate::resources::load_binary;

/// Decode an image held in memory, using the file extension of `file_name`
/// as a format hint when it has a known one.
pub fn decode_image(bytes: &[u8], file_name: &str) -> anyhow::Result<DynamicImage> {
    let hint = std::path::Path::new(file_name)
        .extension()
        .and_then(ImageFormat::from_extension);
    let img = match hint {
        Some(format) => image::load_from_memory_with_format(bytes, format)
            .with_context(|| format!("could not decode {file_name} as {format:?}"))?,
        None => {
            image::load_from_memory(bytes).with_context(|| format!("could not decode {file_name}"))?
        }
    };
    Ok(img)
}

pub async fn load_image(file_name: &str) -> anyhow::Result<DynamicImage> {
    let data = load_binary(file_name).await?;
    let img = decode_image(&data, file_name)?;
    log::info!("loaded {file_name}: {}x{}", img.width(), img.height());
    Ok(img)
}
