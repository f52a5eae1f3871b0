use fast_image_resize::{images::Image, PixelType, ResizeAlg, ResizeOptions, Resizer};
use image::{DynamicImage, ImageBuffer, Rgb, RgbImage};

use crate::error::{BadgeError, Result};

/// Nearest-neighbor resize to exactly `width` x `height`.
///
/// The source is resampled as RGBA and then flattened the way drawing onto a
/// transparent canvas would: color channels are premultiplied by alpha, so a
/// fully transparent pixel ends up as RGB(0, 0, 0).
pub fn resize_nearest(img: &DynamicImage, width: u32, height: u32) -> Result<RgbImage> {
    if width == 0 || height == 0 {
        return Err(BadgeError::ZeroDimension { width, height });
    }

    let rgba = img.to_rgba8();
    let (src_width, src_height) = rgba.dimensions();
    if src_width == 0 || src_height == 0 {
        return Err(BadgeError::Resize("source image is empty".to_string()));
    }

    let dst_pixels = if src_width == width && src_height == height {
        rgba.into_raw()
    } else {
        let src_image = Image::from_vec_u8(src_width, src_height, rgba.into_raw(), PixelType::U8x4)
            .map_err(|e| BadgeError::Resize(e.to_string()))?;

        let mut dst_image = Image::new(width, height, PixelType::U8x4);

        let options = ResizeOptions::new().resize_alg(ResizeAlg::Nearest);
        Resizer::new()
            .resize(&src_image, &mut dst_image, Some(&options))
            .map_err(|e| BadgeError::Resize(e.to_string()))?;

        dst_image.buffer().to_vec()
    };

    let mut output: RgbImage = ImageBuffer::new(width, height);
    for (pixel, chunk) in output.pixels_mut().zip(dst_pixels.chunks_exact(4)) {
        *pixel = premultiply(chunk[0], chunk[1], chunk[2], chunk[3]);
    }

    Ok(output)
}

#[inline]
fn premultiply(r: u8, g: u8, b: u8, a: u8) -> Rgb<u8> {
    let scale = |c: u8| ((c as u16 * a as u16 + 127) / 255) as u8;
    Rgb([scale(r), scale(g), scale(b)])
}
