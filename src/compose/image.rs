//! Image pass: ordered compositing of the template's image layers.
//!
//! Every layer source loads concurrently; draws are committed strictly in
//! template order once the loads have settled, so visual order never
//! depends on which load finished first.

use futures::future::join_all;

use super::{Phase, RenderReport};
use crate::error::Result;
use crate::loader::{ImageLoader, LoadedImage};
use crate::surface::{Rect, Surface};
use crate::template::{ImageLayer, ImageProps};

/// Start every layer load at once and wait for all of them, preserving
/// template order in the returned vector.
pub async fn load_all(
    loader: &dyn ImageLoader,
    layers: &[ImageLayer],
) -> Vec<Result<LoadedImage>> {
    join_all(layers.iter().map(|layer| loader.load(&layer.value))).await
}

/// Commit the settled loads onto the surface in template order, recording
/// one outcome per layer.
pub fn commit_all(
    surface: &mut Surface,
    layers: &[ImageLayer],
    loads: Vec<Result<LoadedImage>>,
    report: &mut RenderReport,
) {
    for (index, (layer, load)) in layers.iter().zip(loads).enumerate() {
        match load {
            Ok(image) => {
                commit(surface, &image, &layer.props);
                report.record(Phase::Image, index, &layer.value, None);
            }
            Err(e) => report.record(Phase::Image, index, &layer.value, Some(e)),
        }
    }
}

/// The full pass: load concurrently, then commit in order.
pub async fn draw_all(
    surface: &mut Surface,
    loader: &dyn ImageLoader,
    layers: &[ImageLayer],
    report: &mut RenderReport,
) {
    let loads = load_all(loader, layers).await;
    commit_all(surface, layers, loads, report);
}

/// Draw one layer, clipping its source rect into its destination rect.
pub fn commit(surface: &mut Surface, image: &LoadedImage, props: &ImageProps) {
    let (src, dest) = resolve_rects(image, props);
    surface.draw_image(&image.pixels, &image.source, src, dest);
}

// Geometry defaults: unset source fields mean origin zero / natural
// dimensions; unset destination size means source-rect size.
fn resolve_rects(image: &LoadedImage, props: &ImageProps) -> (Rect, Rect) {
    let sx = props.sx.unwrap_or(0);
    let sy = props.sy.unwrap_or(0);
    let sw = props.swidth.unwrap_or_else(|| image.width().saturating_sub(sx));
    let sh = props
        .sheight
        .unwrap_or_else(|| image.height().saturating_sub(sy));
    let src = Rect::new(sx as i32, sy as i32, sw, sh);
    let dest = Rect::new(
        props.x.unwrap_or(0),
        props.y.unwrap_or(0),
        props.width.unwrap_or(sw),
        props.height.unwrap_or(sh),
    );
    (src, dest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::MemoryLoader;
    use crate::surface::DrawCommand;
    use image::{Rgba, RgbaImage};

    fn loaded(source: &str, w: u32, h: u32, color: [u8; 4]) -> LoadedImage {
        LoadedImage {
            source: source.into(),
            pixels: RgbaImage::from_pixel(w, h, Rgba(color)),
        }
    }

    #[test]
    fn geometry_defaults_to_natural_size_at_origin() {
        let img = loaded("a", 5, 7, [1, 1, 1, 255]);
        let (src, dest) = resolve_rects(&img, &ImageProps::default());
        assert_eq!(src, Rect::new(0, 0, 5, 7));
        assert_eq!(dest, Rect::new(0, 0, 5, 7));
    }

    #[test]
    fn destination_size_defaults_to_source_rect_size() {
        let img = loaded("a", 10, 10, [1, 1, 1, 255]);
        let props = ImageProps {
            sx: Some(2),
            sy: Some(2),
            swidth: Some(4),
            sheight: Some(3),
            x: Some(1),
            y: Some(1),
            ..Default::default()
        };
        let (src, dest) = resolve_rects(&img, &props);
        assert_eq!(src, Rect::new(2, 2, 4, 3));
        assert_eq!(dest, Rect::new(1, 1, 4, 3));
    }

    #[tokio::test]
    async fn draws_commit_in_template_order_and_failures_are_recorded() {
        let loader = MemoryLoader::new();
        loader.insert("first", RgbaImage::from_pixel(1, 1, Rgba([1, 0, 0, 255])));
        loader.insert("third", RgbaImage::from_pixel(1, 1, Rgba([3, 0, 0, 255])));

        let layers = vec![
            ImageLayer::new("first"),
            ImageLayer::new("second-missing"),
            ImageLayer::new("third"),
        ];
        let mut surface = Surface::new(4, 4);
        let mut report = RenderReport::default();
        draw_all(&mut surface, &loader, &layers, &mut report).await;

        let drawn: Vec<_> = surface
            .journal()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Image { source, .. } => Some(source.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(drawn, vec!["first", "third"]);

        assert_eq!(report.outcomes.len(), 3);
        assert!(report.outcomes[0].ok());
        assert!(!report.outcomes[1].ok());
        assert!(report.outcomes[2].ok());
    }
}
