//! Text pass: the last paint, after all imagery has committed.
//!
//! Style resolution is per item: explicit props win, then the config
//! defaults, then the fixed size/family fallbacks. Registered typefaces
//! rasterize through fontdue; families with no registered face fall back to
//! the built-in 8x8 bitmap face so text always renders, font files or not.

use std::collections::HashMap;

use super::{Phase, RenderReport};
use crate::color::{self, Color};
use crate::error::{Error, Result};
use crate::surface::{DrawCommand, Surface};
use crate::template::TextItem;

/// Fixed size fallback when neither the item nor the config specifies one.
pub const DEFAULT_SIZE: f32 = 16.0;

/// Fixed family fallback.
pub const DEFAULT_FAMILY: &str = "sans-serif";

const BUILTIN_GLYPH_SIZE: u32 = 8;

/// Horizontal anchoring of a text item around its x position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

impl Align {
    /// Lenient token parse; unknown tokens anchor left.
    pub fn from_token(token: &str) -> Self {
        match token.trim().to_ascii_lowercase().as_str() {
            "center" => Align::Center,
            "right" | "end" => Align::Right,
            _ => Align::Left,
        }
    }
}

/// Config-derived defaults the text pass falls back to.
#[derive(Debug, Clone, Copy)]
pub struct TextDefaults {
    pub color: Color,
    pub align: Align,
}

/// Named typefaces registered from raw font bytes.
#[derive(Default)]
pub struct FontCatalog {
    faces: HashMap<String, fontdue::Font>,
}

impl FontCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `data` and register it under `family`, replacing any previous
    /// face with that name.
    pub fn register(&mut self, family: &str, data: &[u8]) -> Result<()> {
        let face = fontdue::Font::from_bytes(data, fontdue::FontSettings::default())
            .map_err(|e| Error::FontError(format!("'{}': {}", family, e)))?;
        self.faces.insert(family.to_string(), face);
        Ok(())
    }

    pub fn get(&self, family: &str) -> Option<&fontdue::Font> {
        self.faces.get(family)
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }
}

struct ResolvedStyle {
    x: f32,
    y: f32,
    size: f32,
    family: String,
    color: Color,
    align: Align,
}

/// Draw every item in list order, recording one outcome per item.
pub fn draw_all(
    surface: &mut Surface,
    catalog: &FontCatalog,
    defaults: TextDefaults,
    items: &[TextItem],
    report: &mut RenderReport,
) {
    for (index, item) in items.iter().enumerate() {
        if item.value.is_empty() {
            report.advise(format!(
                "text item {} has no value; committing an empty draw",
                index
            ));
        }
        let style = resolve(item, defaults, index, report);
        draw_item(surface, catalog, &style, &item.value);
        report.record(Phase::Text, index, &item.value, None);
    }
}

fn resolve(
    item: &TextItem,
    defaults: TextDefaults,
    index: usize,
    report: &mut RenderReport,
) -> ResolvedStyle {
    let props = &item.props;
    let color = match props.color.as_deref() {
        None => defaults.color,
        Some(token) => color::parse(token).unwrap_or_else(|| {
            report.advise(format!(
                "text item {}: '{}' is not a recognized color; using the default",
                index, token
            ));
            defaults.color
        }),
    };
    ResolvedStyle {
        x: props.x.unwrap_or(0.0),
        y: props.y.unwrap_or(0.0),
        size: props.size.unwrap_or(DEFAULT_SIZE),
        family: props
            .family
            .clone()
            .unwrap_or_else(|| DEFAULT_FAMILY.to_string()),
        color,
        align: props
            .align
            .as_deref()
            .map(Align::from_token)
            .unwrap_or(defaults.align),
    }
}

fn draw_item(surface: &mut Surface, catalog: &FontCatalog, style: &ResolvedStyle, text: &str) {
    let width = measure(catalog, &style.family, text, style.size);
    let start_x = match style.align {
        Align::Left => style.x,
        Align::Center => style.x - width / 2.0,
        Align::Right => style.x - width,
    };

    match catalog.get(&style.family) {
        Some(face) => draw_face(surface, face, text, start_x, style.y, style.size, style.color),
        None => draw_builtin(surface, text, start_x, style.y, style.size, style.color),
    }

    surface.record(DrawCommand::Text {
        content: text.to_string(),
        x: style.x,
        y: style.y,
    });
}

/// Advance width of `text` at `size` in the given family.
pub fn measure(catalog: &FontCatalog, family: &str, text: &str, size: f32) -> f32 {
    match catalog.get(family) {
        Some(face) => text
            .chars()
            .map(|c| face.metrics(c, size).advance_width)
            .sum(),
        None => (text.chars().count() as u32 * BUILTIN_GLYPH_SIZE * builtin_scale(size)) as f32,
    }
}

fn draw_face(
    surface: &mut Surface,
    face: &fontdue::Font,
    text: &str,
    x: f32,
    baseline: f32,
    size: f32,
    color: Color,
) {
    let mut pen = x;
    for c in text.chars() {
        let (metrics, mask) = face.rasterize(c, size);
        let gx = (pen + metrics.xmin as f32).round() as i32;
        let gy = (baseline - (metrics.height as i32 + metrics.ymin) as f32).round() as i32;
        surface.blit_mask(gx, gy, metrics.width, metrics.height, &mask, color);
        pen += metrics.advance_width;
    }
}

fn builtin_scale(size: f32) -> u32 {
    ((size / BUILTIN_GLYPH_SIZE as f32).round() as u32).max(1)
}

fn draw_builtin(
    surface: &mut Surface,
    text: &str,
    x: f32,
    baseline: f32,
    size: f32,
    color: Color,
) {
    let scale = builtin_scale(size);
    let cell = (BUILTIN_GLYPH_SIZE * scale) as usize;
    let mut pen = x.round() as i32;
    let top = baseline.round() as i32 - cell as i32;

    for c in text.chars() {
        let glyph = builtin_glyph(c);
        let mut mask = vec![0u8; cell * cell];
        for (row, bits) in glyph.iter().enumerate() {
            for col in 0..BUILTIN_GLYPH_SIZE as usize {
                if bits & (1u8 << col) != 0 {
                    for dy in 0..scale as usize {
                        for dx in 0..scale as usize {
                            let my = row * scale as usize + dy;
                            let mx = col * scale as usize + dx;
                            mask[my * cell + mx] = 255;
                        }
                    }
                }
            }
        }
        surface.blit_mask(pen, top, cell, cell, &mask, color);
        pen += cell as i32;
    }
}

fn builtin_glyph(c: char) -> [u8; 8] {
    use font8x8::UnicodeFonts;
    font8x8::BASIC_FONTS
        .get(c)
        .or_else(|| font8x8::BASIC_FONTS.get('?'))
        .unwrap_or([0; 8])
}
