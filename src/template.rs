//! The declarative description of one card's visual content.
//!
//! A template is supplied once at construction and treated as read-mostly.
//! List order is rendering order for both images and text.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Background plus ordered image and text layers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Template {
    /// Color token or image source; `None` defers to the configured
    /// background (or the default-black fallback).
    #[serde(default)]
    pub background: Option<String>,
    #[serde(default)]
    pub images: Vec<ImageLayer>,
    #[serde(default)]
    pub text: Vec<TextItem>,
}

impl Template {
    /// Deserialize a template from its JSON form.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// One image entry: a source identifier plus source/destination geometry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageLayer {
    /// URL, path, or registered source identifier.
    pub value: String,
    #[serde(default)]
    pub props: ImageProps,
}

impl ImageLayer {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            props: ImageProps::default(),
        }
    }
}

/// Source and destination rectangles for an image layer.
///
/// Unspecified source fields default to origin zero / natural dimensions;
/// unspecified destination fields default to origin zero / source-rect size.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImageProps {
    #[serde(default)]
    pub sx: Option<u32>,
    #[serde(default)]
    pub sy: Option<u32>,
    #[serde(default)]
    pub swidth: Option<u32>,
    #[serde(default)]
    pub sheight: Option<u32>,
    #[serde(default)]
    pub x: Option<i32>,
    #[serde(default)]
    pub y: Option<i32>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

/// One text entry with per-item style overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TextItem {
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub props: TextProps,
}

impl TextItem {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            props: TextProps::default(),
        }
    }
}

/// Style overrides for a text item; missing fields fall back to the config
/// defaults (and the fixed size/family defaults).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TextProps {
    #[serde(default)]
    pub x: Option<f32>,
    #[serde(default)]
    pub y: Option<f32>,
    #[serde(default)]
    pub size: Option<f32>,
    #[serde(default)]
    pub family: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub align: Option<String>,
}
