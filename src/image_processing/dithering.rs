//! Floyd-Steinberg dithering down to a black & white palette
//!
//! Error is accumulated in gamma-linearized RGB so that the density of white
//! dots follows perceived brightness rather than raw sRGB values.
use image::{Rgb, RgbImage};

pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

const BW_PALETTE: [(f32, f32, f32); 2] = [(0.0, 0.0, 0.0), (255.0, 255.0, 255.0)];

/// Dither an image so that every output pixel is exactly [`BLACK`] or [`WHITE`]
pub fn floyd_steinberg_bw(img: &RgbImage) -> RgbImage {
    let (width, height) = img.dimensions();
    let mut output = RgbImage::new(width, height);
    let (mut working_r, mut working_g, mut working_b) = create_working_buffers(img);

    for y in 0..height {
        for x in 0..width {
            let y_idx = y as usize;
            let x_idx = x as usize;

            let current_r = working_r[y_idx][x_idx].clamp(0.0, 255.0);
            let current_g = working_g[y_idx][x_idx].clamp(0.0, 255.0);
            let current_b = working_b[y_idx][x_idx].clamp(0.0, 255.0);

            let (palette_r, palette_g, palette_b) =
                find_closest_color(current_r, current_g, current_b);

            let pixel = if palette_r > 0.0 { WHITE } else { BLACK };
            output.put_pixel(x, y, pixel);

            distribute_error_floyd_steinberg(
                &mut working_r,
                &mut working_g,
                &mut working_b,
                x,
                y,
                width,
                height,
                current_r - palette_r,
                current_g - palette_g,
                current_b - palette_b,
            );
        }
    }

    output
}

fn find_closest_color(r: f32, g: f32, b: f32) -> (f32, f32, f32) {
    let mut min_distance = f32::MAX;
    let mut closest_color = BW_PALETTE[0];

    for &(pr, pg, pb) in &BW_PALETTE {
        let dr = r - pr;
        let dg = g - pg;
        let db = b - pb;
        let distance = dr * dr + dg * dg + db * db;

        if distance < min_distance {
            min_distance = distance;
            closest_color = (pr, pg, pb);
        }
    }

    closest_color
}

fn create_working_buffers(img: &RgbImage) -> (Vec<Vec<f32>>, Vec<Vec<f32>>, Vec<Vec<f32>>) {
    let (width, height) = img.dimensions();
    let mut working_r: Vec<Vec<f32>> = Vec::with_capacity(height as usize);
    let mut working_g: Vec<Vec<f32>> = Vec::with_capacity(height as usize);
    let mut working_b: Vec<Vec<f32>> = Vec::with_capacity(height as usize);

    for y in 0..height {
        let mut row_r = Vec::with_capacity(width as usize);
        let mut row_g = Vec::with_capacity(width as usize);
        let mut row_b = Vec::with_capacity(width as usize);

        for x in 0..width {
            let pixel = img.get_pixel(x, y);
            row_r.push(linearize(pixel[0]));
            row_g.push(linearize(pixel[1]));
            row_b.push(linearize(pixel[2]));
        }

        working_r.push(row_r);
        working_g.push(row_g);
        working_b.push(row_b);
    }

    (working_r, working_g, working_b)
}

/// Gamma 2.2 approximation of the sRGB transfer curve, scaled back to 0-255
fn linearize(value: u8) -> f32 {
    let normalized = value as f32 / 255.0;
    normalized.powf(2.2) * 255.0
}

#[allow(clippy::too_many_arguments)]
fn distribute_error_floyd_steinberg(
    working_r: &mut [Vec<f32>],
    working_g: &mut [Vec<f32>],
    working_b: &mut [Vec<f32>],
    x: u32,
    y: u32,
    width: u32,
    height: u32,
    error_r: f32,
    error_g: f32,
    error_b: f32,
) {
    //     * 7/16
    // 3/16 5/16 1/16
    let mut spread = |tx: usize, ty: usize, weight: f32| {
        working_r[ty][tx] += error_r * weight;
        working_g[ty][tx] += error_g * weight;
        working_b[ty][tx] += error_b * weight;
    };

    let x_idx = x as usize;
    let y_idx = y as usize;

    if x + 1 < width {
        spread(x_idx + 1, y_idx, 7.0 / 16.0);
    }

    if y + 1 < height {
        if x > 0 {
            spread(x_idx - 1, y_idx + 1, 3.0 / 16.0);
        }
        spread(x_idx, y_idx + 1, 5.0 / 16.0);
        if x + 1 < width {
            spread(x_idx + 1, y_idx + 1, 1.0 / 16.0);
        }
    }
}
