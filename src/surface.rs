//! The raster drawing surface every compositor paints into.
//!
//! A surface is created once per instance and reused for every paint; it is
//! never recreated or pooled. Besides the pixel buffer it keeps a journal of
//! committed draw operations so callers and tests can verify compositing
//! order without decoding pixels.

use image::{imageops, Rgba, RgbaImage};
use sha2::{Digest, Sha256};

use crate::color::Color;

/// An axis-aligned rectangle in surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// A committed draw operation, journaled in commit order.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    FillRect {
        rect: Rect,
        color: Color,
    },
    Image {
        /// Source identifier the pixels came from.
        source: String,
        dest: Rect,
    },
    Text {
        content: String,
        x: f32,
        y: f32,
    },
}

/// The raster target: an RGBA pixel buffer plus the draw journal.
#[derive(Debug, Clone)]
pub struct Surface {
    pixels: RgbaImage,
    journal: Vec<DrawCommand>,
}

impl Surface {
    /// A transparent surface of the given dimensions.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 0])),
            journal: Vec::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// The committed draw operations, oldest first.
    pub fn journal(&self) -> &[DrawCommand] {
        &self.journal
    }

    /// The raw pixel buffer.
    pub fn image(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Read one pixel; out-of-bounds reads return transparent black.
    pub fn pixel(&self, x: u32, y: u32) -> Color {
        if x < self.width() && y < self.height() {
            self.pixels.get_pixel(x, y).0
        } else {
            [0, 0, 0, 0]
        }
    }

    /// Hex SHA-256 of the pixel buffer; stable across identical renders.
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.width().to_le_bytes());
        hasher.update(self.height().to_le_bytes());
        hasher.update(self.pixels.as_raw());
        hex::encode(hasher.finalize())
    }

    /// Fill the whole surface with `color`.
    pub fn fill(&mut self, color: Color) {
        let rect = Rect::new(0, 0, self.width(), self.height());
        self.fill_rect(rect, color);
    }

    /// Fill `rect` (clipped to the surface) with `color`, blending when the
    /// color is not fully opaque.
    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        let x0 = rect.x.max(0) as u32;
        let y0 = rect.y.max(0) as u32;
        let x1 = rect
            .x
            .saturating_add(rect.width as i32)
            .clamp(0, self.width() as i32) as u32;
        let y1 = rect
            .y
            .saturating_add(rect.height as i32)
            .clamp(0, self.height() as i32) as u32;
        for y in y0..y1 {
            for x in x0..x1 {
                if color[3] == 255 {
                    self.pixels.put_pixel(x, y, Rgba(color));
                } else {
                    blend(self.pixels.get_pixel_mut(x, y), color, color[3]);
                }
            }
        }
        self.journal.push(DrawCommand::FillRect { rect, color });
    }

    /// Draw `source` pixels, clipping `src` out of them and scaling the clip
    /// into `dest`. Degenerate rectangles commit an empty draw.
    pub fn draw_image(&mut self, pixels: &RgbaImage, source: &str, src: Rect, dest: Rect) {
        let sx = src.x.max(0) as u32;
        let sy = src.y.max(0) as u32;
        let sw = src.width.min(pixels.width().saturating_sub(sx));
        let sh = src.height.min(pixels.height().saturating_sub(sy));

        if sw > 0 && sh > 0 && dest.width > 0 && dest.height > 0 {
            let clipped = imageops::crop_imm(pixels, sx, sy, sw, sh).to_image();
            let scaled = if (sw, sh) == (dest.width, dest.height) {
                clipped
            } else {
                imageops::resize(
                    &clipped,
                    dest.width,
                    dest.height,
                    imageops::FilterType::Triangle,
                )
            };
            imageops::overlay(&mut self.pixels, &scaled, dest.x as i64, dest.y as i64);
        }
        self.journal.push(DrawCommand::Image {
            source: source.to_string(),
            dest,
        });
    }

    /// Blend `color` through a coverage mask at `(x, y)`; used by the text
    /// pass for rasterized glyphs.
    pub(crate) fn blit_mask(
        &mut self,
        x: i32,
        y: i32,
        mask_width: usize,
        mask_height: usize,
        mask: &[u8],
        color: Color,
    ) {
        for row in 0..mask_height {
            let py = y + row as i32;
            if py < 0 || py >= self.height() as i32 {
                continue;
            }
            for col in 0..mask_width {
                let px = x + col as i32;
                if px < 0 || px >= self.width() as i32 {
                    continue;
                }
                let coverage = mask[row * mask_width + col];
                if coverage == 0 {
                    continue;
                }
                let alpha = (color[3] as u16 * coverage as u16 / 255) as u8;
                blend(self.pixels.get_pixel_mut(px as u32, py as u32), color, alpha);
            }
        }
    }

    /// Journal a command without touching pixels (the text pass journals one
    /// entry per item, not per glyph).
    pub(crate) fn record(&mut self, command: DrawCommand) {
        self.journal.push(command);
    }
}

fn blend(dst: &mut Rgba<u8>, src: Color, alpha: u8) {
    let a = alpha as u32;
    let inv = 255 - a;
    for c in 0..3 {
        dst.0[c] = ((src[c] as u32 * a + dst.0[c] as u32 * inv) / 255) as u8;
    }
    dst.0[3] = (a + dst.0[3] as u32 * inv / 255) as u8;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_sets_every_pixel() {
        let mut s = Surface::new(8, 4);
        s.fill([0, 0, 255, 255]);
        assert_eq!(s.pixel(0, 0), [0, 0, 255, 255]);
        assert_eq!(s.pixel(7, 3), [0, 0, 255, 255]);
    }

    #[test]
    fn fill_rect_clips_to_bounds() {
        let mut s = Surface::new(4, 4);
        s.fill_rect(Rect::new(-2, -2, 4, 4), [255, 0, 0, 255]);
        assert_eq!(s.pixel(0, 0), [255, 0, 0, 255]);
        assert_eq!(s.pixel(1, 1), [255, 0, 0, 255]);
        assert_eq!(s.pixel(2, 2), [0, 0, 0, 0]);
    }

    #[test]
    fn draw_image_scales_source_into_dest() {
        let mut s = Surface::new(8, 8);
        let red = RgbaImage::from_pixel(2, 2, Rgba([255, 0, 0, 255]));
        s.draw_image(&red, "red", Rect::new(0, 0, 2, 2), Rect::new(0, 0, 8, 8));
        assert_eq!(s.pixel(0, 0), [255, 0, 0, 255]);
        assert_eq!(s.pixel(7, 7), [255, 0, 0, 255]);
    }

    #[test]
    fn journal_preserves_commit_order() {
        let mut s = Surface::new(4, 4);
        s.fill([0, 0, 0, 255]);
        let px = RgbaImage::from_pixel(1, 1, Rgba([255, 255, 255, 255]));
        s.draw_image(&px, "dot", Rect::new(0, 0, 1, 1), Rect::new(1, 1, 1, 1));
        s.record(DrawCommand::Text {
            content: "x".into(),
            x: 0.0,
            y: 0.0,
        });
        let kinds: Vec<_> = s
            .journal()
            .iter()
            .map(|c| match c {
                DrawCommand::FillRect { .. } => "fill",
                DrawCommand::Image { .. } => "image",
                DrawCommand::Text { .. } => "text",
            })
            .collect();
        assert_eq!(kinds, vec!["fill", "image", "text"]);
    }

    #[test]
    fn digest_is_stable_for_identical_content() {
        let mut a = Surface::new(6, 6);
        let mut b = Surface::new(6, 6);
        a.fill([1, 2, 3, 255]);
        b.fill([1, 2, 3, 255]);
        assert_eq!(a.digest(), b.digest());

        b.fill_rect(Rect::new(0, 0, 1, 1), [9, 9, 9, 255]);
        assert_ne!(a.digest(), b.digest());
    }
}
