use image::RgbImage;

use crate::error::{BadgeError, Result};
use crate::ratio::Dimensions;

/// One bit per pixel, black = 1, in the badge display's scan order.
///
/// Pixels are laid out column by column: the flat index of `(col, row)` is
/// `col * height + row`, stored in byte `index / 8` at bit `7 - index % 8`
/// (most significant bit first).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Bitmap {
    /// Pack a two-color image.
    ///
    /// Only pixels whose channel sum is zero count as black; anything else,
    /// including very dark grays, is left white.
    pub fn pack(img: &RgbImage) -> Result<Self> {
        let (width, height) = img.dimensions();
        Dimensions::new(width, height).validate()?;

        let mut data = vec![0u8; (width as usize * height as usize) / 8];

        // The display updates left to right, top to bottom within each
        // column, so the vertical axis is the inner loop.
        for col in 0..width {
            for row in 0..height {
                let pixel = img.get_pixel(col, row);
                let sum = pixel[0] as u32 + pixel[1] as u32 + pixel[2] as u32;
                if sum == 0 {
                    let idx = flat_index(col, row, height);
                    data[idx / 8] |= 1 << (7 - idx % 8);
                }
            }
        }

        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Wrap an already packed buffer, checking its length against the size
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let dimensions = Dimensions::new(width, height);
        dimensions.validate()?;
        if data.len() != dimensions.packed_len() {
            return Err(BadgeError::SizeMismatch {
                dimensions: dimensions.to_string(),
                expected: dimensions.packed_len(),
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width, self.height)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Whether the pixel at `(col, row)` is black
    pub fn is_set(&self, col: u32, row: u32) -> bool {
        let idx = flat_index(col, row, self.height);
        self.data[idx / 8] & (1 << (7 - idx % 8)) != 0
    }

    pub fn black_pixel_count(&self) -> u32 {
        self.data.iter().map(|b| b.count_ones()).sum()
    }
}

#[inline]
fn flat_index(col: u32, row: u32, height: u32) -> usize {
    col as usize * height as usize + row as usize
}
