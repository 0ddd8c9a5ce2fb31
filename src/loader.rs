//! Asynchronous image-source loading.
//!
//! Sources are opaque identifiers: `data:` URIs, filesystem paths, and
//! (with the default-on `http` feature) http/https URLs. Embedders with
//! their own asset story implement [`ImageLoader`] directly; `MemoryLoader`
//! covers tests and fully in-memory setups.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use image::RgbaImage;

use crate::error::{Error, Result};

/// A decoded image plus the identifier it was loaded from.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub source: String,
    pub pixels: RgbaImage,
}

impl LoadedImage {
    /// Decode `bytes` (any format the raster backend understands).
    pub fn from_bytes(source: &str, bytes: &[u8]) -> Result<Self> {
        let pixels = image::load_from_memory(bytes)?.to_rgba8();
        Ok(Self {
            source: source.to_string(),
            pixels,
        })
    }

    /// Natural width of the decoded image.
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Natural height of the decoded image.
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }
}

/// Capability trait: resolve a source identifier to a decoded image.
#[async_trait]
pub trait ImageLoader: Send + Sync {
    async fn load(&self, source: &str) -> Result<LoadedImage>;
}

fn decode_data_uri(source: &str, uri: &str) -> Result<LoadedImage> {
    let (meta, payload) = uri
        .split_once(',')
        .ok_or_else(|| Error::DecodeError(format!("malformed data URI '{}'", source)))?;
    if !meta.ends_with(";base64") {
        return Err(Error::DecodeError(format!(
            "unsupported data URI encoding in '{}'",
            source
        )));
    }
    let bytes = BASE64
        .decode(payload.trim())
        .map_err(|e| Error::DecodeError(format!("invalid base64 in '{}': {}", source, e)))?;
    LoadedImage::from_bytes(source, &bytes)
}

fn load_file(source: &str, path: &std::path::Path) -> Result<LoadedImage> {
    let bytes = std::fs::read(path).map_err(|e| Error::LoadError(format!("{}: {}", source, e)))?;
    LoadedImage::from_bytes(source, &bytes)
}

/// Loads `data:` URIs and filesystem paths. The default loader when the
/// `http` feature is disabled.
#[derive(Debug, Default)]
pub struct LocalLoader;

impl LocalLoader {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ImageLoader for LocalLoader {
    async fn load(&self, source: &str) -> Result<LoadedImage> {
        if let Some(rest) = source.strip_prefix("data:") {
            return decode_data_uri(source, rest);
        }
        load_file(source, std::path::Path::new(source))
    }
}

/// Fetches http/https sources, falling back to data URIs and local paths
/// for everything else.
#[cfg(feature = "http")]
pub struct HttpLoader {
    client: reqwest::Client,
}

#[cfg(feature = "http")]
impl HttpLoader {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

#[cfg(feature = "http")]
impl Default for HttpLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "http")]
#[async_trait]
impl ImageLoader for HttpLoader {
    async fn load(&self, source: &str) -> Result<LoadedImage> {
        match url::Url::parse(source) {
            Ok(parsed) if parsed.scheme() == "http" || parsed.scheme() == "https" => {
                let response = self
                    .client
                    .get(parsed)
                    .send()
                    .await
                    .and_then(|r| r.error_for_status())
                    .map_err(|e| Error::LoadError(format!("{}: {}", source, e)))?;
                let bytes = response
                    .bytes()
                    .await
                    .map_err(|e| Error::LoadError(format!("{}: {}", source, e)))?;
                LoadedImage::from_bytes(source, &bytes)
            }
            Ok(parsed) if parsed.scheme() == "data" => {
                decode_data_uri(source, source.trim_start_matches("data:"))
            }
            Ok(parsed) if parsed.scheme() == "file" => {
                let path = parsed
                    .to_file_path()
                    .map_err(|_| Error::LoadError(format!("{}: not a local path", source)))?;
                load_file(source, &path)
            }
            // Relative paths don't parse as URLs; treat them as files.
            _ => load_file(source, std::path::Path::new(source)),
        }
    }
}

/// In-memory source registry, for tests and embedders that resolve assets
/// themselves.
#[derive(Default)]
pub struct MemoryLoader {
    entries: Mutex<HashMap<String, RgbaImage>>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register decoded pixels under `source`.
    pub fn insert(&self, source: &str, pixels: RgbaImage) {
        self.entries
            .lock()
            .expect("loader registry poisoned")
            .insert(source.to_string(), pixels);
    }
}

#[async_trait]
impl ImageLoader for MemoryLoader {
    async fn load(&self, source: &str) -> Result<LoadedImage> {
        let entries = self.entries.lock().expect("loader registry poisoned");
        match entries.get(source) {
            Some(pixels) => Ok(LoadedImage {
                source: source.to_string(),
                pixels: pixels.clone(),
            }),
            None => Err(Error::LoadError(format!("{}: no such source", source))),
        }
    }
}

/// The loader `new_card` wires in: HTTP-capable when the `http` feature is
/// on, local-only otherwise.
pub fn default_loader() -> Arc<dyn ImageLoader> {
    #[cfg(feature = "http")]
    {
        Arc::new(HttpLoader::new())
    }
    #[cfg(not(feature = "http"))]
    {
        Arc::new(LocalLoader::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn png_bytes(pixels: &RgbaImage) -> Vec<u8> {
        let mut buf = std::io::Cursor::new(Vec::new());
        image::DynamicImage::ImageRgba8(pixels.clone())
            .write_to(&mut buf, image::ImageFormat::Png)
            .expect("encode test png");
        buf.into_inner()
    }

    #[tokio::test]
    async fn data_uri_round_trips() {
        let pixels = RgbaImage::from_pixel(2, 2, Rgba([0, 255, 0, 255]));
        let uri = format!("data:image/png;base64,{}", BASE64.encode(png_bytes(&pixels)));
        let loaded = LocalLoader::new().load(&uri).await.unwrap();
        assert_eq!((loaded.width(), loaded.height()), (2, 2));
        assert_eq!(loaded.pixels.get_pixel(1, 1).0, [0, 255, 0, 255]);
    }

    #[tokio::test]
    async fn malformed_data_uri_is_a_decode_error() {
        let err = LocalLoader::new()
            .load("data:image/png;base64")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::DecodeError(_)));
    }

    #[tokio::test]
    async fn memory_loader_serves_registered_sources() {
        let loader = MemoryLoader::new();
        loader.insert("hero", RgbaImage::from_pixel(3, 1, Rgba([1, 2, 3, 255])));

        let hit = loader.load("hero").await.unwrap();
        assert_eq!((hit.width(), hit.height()), (3, 1));

        let miss = loader.load("villain").await.unwrap_err();
        assert!(matches!(miss, Error::LoadError(_)));
    }
}
