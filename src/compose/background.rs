//! Background pass: the first paint, below all other content.
//!
//! Both operations are state-free and paint the full surface rectangle.
//! The orchestrator decides which kind to invoke after classifying the
//! configured background value.

use crate::color::Color;
use crate::error::{Error, Result};
use crate::loader::LoadedImage;
use crate::surface::{Rect, Surface};

/// Fill the whole surface with `color`.
pub fn paint_color(surface: &mut Surface, color: Option<Color>) -> Result<()> {
    let color = color.ok_or(Error::MissingColorError)?;
    surface.fill(color);
    Ok(())
}

/// Draw `image` stretched to the full surface rectangle.
pub fn paint_image(surface: &mut Surface, image: Option<&LoadedImage>) -> Result<()> {
    let image = image.ok_or(Error::MissingImageError)?;
    let src = Rect::new(0, 0, image.width(), image.height());
    let dest = Rect::new(0, 0, surface.width(), surface.height());
    surface.draw_image(&image.pixels, &image.source, src, dest);
    Ok(())
}
