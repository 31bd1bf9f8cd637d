//! Font resolution, caching and text drawing.
//!
//! Fonts are looked up along an ordered search list and parsed once per
//! process; when no font file on the list is usable the renderer degrades to
//! a built-in 5x7 bitmap glyph set covering the characters the record can
//! contain, scaled to approximate the requested pixel size.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use image::{Rgba, RgbaImage};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use rusttype::{point, Font, Scale};
use tracing::warn;

/// Preferred bundled fonts first, then common platform fallbacks.
pub const FONT_SEARCH_PATHS: &[&str] = &[
    "font/Aileron-SemiBold.otf",
    "font/Aileron-Bold.otf",
    "font/Aileron-Regular.otf",
    "arial.ttf",
    "C:/Windows/Fonts/arial.ttf",
    "C:/Windows/Fonts/calibri.ttf",
    "/System/Library/Fonts/Arial.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
];

static FONT_CACHE: Lazy<Mutex<HashMap<PathBuf, Arc<Font<'static>>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

fn load_cached(path: &Path) -> Option<Arc<Font<'static>>> {
    if let Some(f) = FONT_CACHE.lock().get(path) {
        return Some(Arc::clone(f));
    }
    let bytes = std::fs::read(path).ok()?;
    let font = Arc::new(Font::try_from_vec(bytes)?);
    FONT_CACHE
        .lock()
        .insert(path.to_path_buf(), Arc::clone(&font));
    Some(font)
}

/// A font usable at one pixel size, either a parsed outline font or the
/// built-in bitmap fallback.
pub enum FontHandle {
    Outline {
        font: Arc<Font<'static>>,
        scale: Scale,
    },
    Builtin {
        scale: u32,
    },
}

/// Resolve a font for the given pixel size. Never fails; logs once per call
/// when falling back to the builtin glyph set.
pub fn resolve(px: f32) -> FontHandle {
    for candidate in FONT_SEARCH_PATHS {
        if let Some(font) = load_cached(Path::new(candidate)) {
            return FontHandle::Outline {
                font,
                scale: Scale::uniform(px),
            };
        }
    }
    warn!("no usable font on search path, falling back to builtin glyphs");
    FontHandle::Builtin {
        scale: builtin_scale(px),
    }
}

impl FontHandle {
    /// Rendered width of `text` in pixels.
    pub fn text_width(&self, text: &str) -> f32 {
        match self {
            FontHandle::Outline { font, scale } => {
                let v_metrics = font.v_metrics(*scale);
                font.layout(text, *scale, point(0.0, v_metrics.ascent))
                    .filter_map(|g| g.pixel_bounding_box())
                    .map(|bb| bb.max.x as f32)
                    .fold(0.0, f32::max)
            }
            FontHandle::Builtin { scale } => {
                (text.chars().count() as u32 * GLYPH_ADVANCE * scale) as f32
            }
        }
    }

    /// Draw `text` with its top-left corner at (x, y), alpha-blending glyph
    /// coverage over the existing pixels.
    pub fn draw(&self, img: &mut RgbaImage, x: i32, y: i32, color: Rgba<u8>, text: &str) {
        match self {
            FontHandle::Outline { font, scale } => {
                let v_metrics = font.v_metrics(*scale);
                let origin = point(x as f32, y as f32 + v_metrics.ascent);
                for glyph in font.layout(text, *scale, origin) {
                    let Some(bb) = glyph.pixel_bounding_box() else {
                        continue;
                    };
                    glyph.draw(|gx, gy, coverage| {
                        let px = gx as i32 + bb.min.x;
                        let py = gy as i32 + bb.min.y;
                        if px < 0 || py < 0 {
                            return;
                        }
                        let (px, py) = (px as u32, py as u32);
                        if px >= img.width() || py >= img.height() {
                            return;
                        }
                        if coverage <= 0.0 {
                            return;
                        }
                        let dst = img.get_pixel_mut(px, py);
                        let inv = 1.0 - coverage;
                        dst.0[0] = (color.0[0] as f32 * coverage + dst.0[0] as f32 * inv) as u8;
                        dst.0[1] = (color.0[1] as f32 * coverage + dst.0[1] as f32 * inv) as u8;
                        dst.0[2] = (color.0[2] as f32 * coverage + dst.0[2] as f32 * inv) as u8;
                        dst.0[3] = 255;
                    });
                }
            }
            FontHandle::Builtin { scale } => draw_builtin(img, x, y, color, text, *scale),
        }
    }
}

const GLYPH_COLS: u32 = 5;
const GLYPH_ROWS: u32 = 7;
/// Columns advanced per glyph, including inter-glyph gap.
const GLYPH_ADVANCE: u32 = 6;

fn builtin_scale(px: f32) -> u32 {
    ((px / (GLYPH_ROWS + 1) as f32).round() as u32).max(1)
}

fn draw_builtin(img: &mut RgbaImage, x: i32, y: i32, color: Rgba<u8>, text: &str, scale: u32) {
    let mut caret = x;
    for ch in text.chars() {
        if let Some(rows) = glyph_bitmap(ch) {
            for (r, &bits) in rows.iter().enumerate() {
                for c in 0..GLYPH_COLS {
                    if bits & (1 << (GLYPH_COLS - 1 - c)) == 0 {
                        continue;
                    }
                    fill_square(
                        img,
                        caret + (c * scale) as i32,
                        y + (r as u32 * scale) as i32,
                        scale,
                        color,
                    );
                }
            }
        }
        caret += (GLYPH_ADVANCE * scale) as i32;
    }
}

fn fill_square(img: &mut RgbaImage, x: i32, y: i32, side: u32, color: Rgba<u8>) {
    for dy in 0..side {
        for dx in 0..side {
            let px = x + dx as i32;
            let py = y + dy as i32;
            if px < 0 || py < 0 {
                continue;
            }
            let (px, py) = (px as u32, py as u32);
            if px >= img.width() || py >= img.height() {
                continue;
            }
            img.put_pixel(px, py, color);
        }
    }
}

/// 5x7 bitmaps for every character a record line can contain: digits,
/// sign/punctuation and the uppercase letters used by tickers and the
/// currency symbol. Unknown characters render as blank advances.
fn glyph_bitmap(ch: char) -> Option<[u8; 7]> {
    let rows = match ch {
        '0' => [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
        '1' => [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        '2' => [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111],
        '3' => [0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110],
        '4' => [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
        '5' => [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
        '6' => [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
        '7' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
        '8' => [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
        '9' => [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100],
        '+' => [0b00000, 0b00100, 0b00100, 0b11111, 0b00100, 0b00100, 0b00000],
        '-' => [0b00000, 0b00000, 0b00000, 0b11111, 0b00000, 0b00000, 0b00000],
        '.' => [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b00100, 0b00100],
        ':' => [0b00000, 0b00100, 0b00100, 0b00000, 0b00100, 0b00100, 0b00000],
        'B' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110],
        'C' => [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110],
        'D' => [0b11110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11110],
        'E' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111],
        'H' => [0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'P' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000],
        'S' => [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110],
        'T' => [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100],
        'U' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'Y' => [0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100, 0b00100],
        ' ' => [0; 7],
        _ => return None,
    };
    Some(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BG_COLOR, TEXT_COLOR};

    #[test]
    fn builtin_width_is_per_char_advance() {
        let handle = FontHandle::Builtin { scale: 4 };
        assert_eq!(handle.text_width("12:34"), (5 * GLYPH_ADVANCE * 4) as f32);
        assert_eq!(handle.text_width(""), 0.0);
    }

    #[test]
    fn builtin_scale_tracks_pixel_size() {
        assert_eq!(builtin_scale(32.0), 4);
        assert_eq!(builtin_scale(28.0), 4);
        assert_eq!(builtin_scale(4.0), 1);
    }

    #[test]
    fn builtin_draw_marks_pixels_within_bounds() {
        let mut img = RgbaImage::from_pixel(60, 20, BG_COLOR);
        let handle = FontHandle::Builtin { scale: 1 };
        handle.draw(&mut img, 2, 2, TEXT_COLOR, "+1");
        let touched = img.pixels().filter(|p| **p == TEXT_COLOR).count();
        assert!(touched > 0);
    }

    #[test]
    fn record_characters_all_have_glyphs() {
        for ch in "0123456789+-.: BTCEHYPUSD".chars() {
            assert!(glyph_bitmap(ch).is_some(), "missing glyph for {ch:?}");
        }
    }
}
