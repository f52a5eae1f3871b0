use std::io::{self, Write};

use super::bitmap::Bitmap;

const SET_GLYPH: char = '*';
const CLEAR_GLYPH: char = ' ';

/// Render a dot-matrix style picture of the bitmap, one line per display row
pub fn render_preview(bitmap: &Bitmap) -> String {
    let width = bitmap.width() as usize;
    let height = bitmap.height() as usize;
    let mut out = String::with_capacity((width + 1) * height);

    for row in 0..bitmap.height() {
        for col in 0..bitmap.width() {
            out.push(if bitmap.is_set(col, row) {
                SET_GLYPH
            } else {
                CLEAR_GLYPH
            });
        }
        out.push('\n');
    }

    out
}

/// Write the preview to `writer`; the CLI passes stderr so stdout stays clean
pub fn write_preview<W: Write>(writer: &mut W, bitmap: &Bitmap) -> io::Result<()> {
    writer.write_all(render_preview(bitmap).as_bytes())?;
    writer.flush()
}
