//! Cardpress
//!
//! A template-driven card compositing engine: a declarative template
//! (background + ordered image layers + ordered text items) is rendered
//! onto a raster surface and exported as an encoded image.
//!
//! # Features
//!
//! - **Ordered Compositing**: background, then image layers, then text,
//!   always in template order, with loads running concurrently
//! - **Capability Interfaces**: host-document access and image loading are
//!   traits, with in-memory defaults for headless use and tests
//! - **Export Path**: PNG/JPEG data URIs on demand, plus an optional
//!   download trigger wired into the host
//!
//! # Example
//!
//! ```no_run
//! use cardpress::{CardOptions, Template};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let template = Template::from_json(
//!     r#"{
//!         "background": "navy",
//!         "text": [{"value": "Hello", "props": {"x": 16, "y": 48, "size": 24}}]
//!     }"#,
//! )?;
//!
//! let mut card = cardpress::new_card(CardOptions {
//!     width: 400,
//!     height: 250,
//!     template,
//!     ..Default::default()
//! })?;
//!
//! let report = tokio::runtime::Runtime::new()?.block_on(card.render())?;
//! assert!(report.is_complete());
//! let uri = card.get_image(cardpress::ImageFormat::Png, 1.0)?;
//! println!("{} bytes of data URI", uri.len());
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

pub mod error;
pub use error::{Error, Result};

pub mod color;
pub mod compose;
pub mod config;
pub mod export;
pub mod host;
pub mod loader;
pub mod maker;
pub mod surface;
pub mod template;

pub use compose::text::Align;
pub use compose::{FontCatalog, Phase, RenderReport, StepOutcome};
pub use config::{ConfigKey, ConfigValue};
pub use export::{ImageFormat, DEFAULT_QUALITY};
pub use host::{ElementKind, ElementProps, HostDom, MemoryHost, NodeId};
#[cfg(feature = "http")]
pub use loader::HttpLoader;
pub use loader::{ImageLoader, LoadedImage, LocalLoader, MemoryLoader};
pub use maker::CardMaker;
pub use surface::{DrawCommand, Rect, Surface};
pub use template::{ImageLayer, ImageProps, Template, TextItem, TextProps};

/// Construction options for a [`CardMaker`].
///
/// Unspecified options take the documented defaults; empty strings mean
/// "unset" for `background` and `download`.
///
/// # Examples
///
/// ```
/// let options = cardpress::CardOptions::default();
/// assert_eq!(options.width, 300);
/// assert_eq!(options.color, "black");
/// ```
#[derive(Debug, Clone)]
pub struct CardOptions {
    /// Default text alignment
    pub align: String,
    /// Background color token or image source ("" = unset)
    pub background: String,
    /// Default text color
    pub color: String,
    /// Download trigger target ("" = unset)
    pub download: String,
    /// Container target the surface attaches to
    pub container: String,
    /// Surface width in pixels
    pub width: u32,
    /// Surface height in pixels
    pub height: u32,
    /// The card content to composite
    pub template: Template,
}

impl Default for CardOptions {
    fn default() -> Self {
        Self {
            align: "left".to_string(),
            background: String::new(),
            color: "black".to_string(),
            download: String::new(),
            container: "root".to_string(),
            width: 300,
            height: 150,
            template: Template::default(),
        }
    }
}

/// Create a [`CardMaker`] wired to the in-memory host and the default
/// loader (HTTP-capable when the `http` feature is enabled).
///
/// Embedders with a real host document or their own asset pipeline should
/// call [`CardMaker::new`] with their own [`HostDom`] / [`ImageLoader`]
/// implementations instead.
pub fn new_card(options: CardOptions) -> Result<CardMaker> {
    CardMaker::new(options, Arc::new(MemoryHost::new()), loader::default_loader())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = CardOptions::default();
        assert_eq!(options.width, 300);
        assert_eq!(options.height, 150);
        assert_eq!(options.align, "left");
        assert_eq!(options.container, "root");
        assert!(options.background.is_empty());
        assert!(options.download.is_empty());
    }

    #[test]
    fn test_new_card_constructs_against_the_default_host() {
        let card = new_card(CardOptions::default()).expect("Failed to create card");
        assert!(card.surface_node().is_some());
    }
}
