//! The `CardMaker`: owns the config and surface, orchestrates the render
//! passes, and exposes the export/download path.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::color::{self, Color};
use crate::compose::text::{Align, TextDefaults};
use crate::compose::{self, FontCatalog, Phase, RenderReport};
use crate::config::{ConfigKey, ConfigStore, ConfigValue};
use crate::error::{Error, Result};
use crate::export::{self, ImageFormat};
use crate::host::{ElementKind, ElementProps, HostDom, NodeId};
use crate::loader::{ImageLoader, LoadedImage};
use crate::surface::Surface;
use crate::template::Template;
use crate::CardOptions;

enum ResolvedBackground {
    Color(Color),
    Image(LoadedImage),
    Unset,
    Failed(Error),
}

/// Renders one card template onto one surface.
///
/// Construction provisions and attaches the surface; failures there are
/// fatal and abort instance creation. After that, [`render`](Self::render)
/// composites the template and the export operations serialize the surface
/// on demand, including before any render has run.
pub struct CardMaker {
    config: ConfigStore,
    template: Template,
    host: Arc<dyn HostDom>,
    loader: Arc<dyn ImageLoader>,
    fonts: FontCatalog,
    surface: Option<Arc<Mutex<Surface>>>,
    surface_node: Option<NodeId>,
}

impl CardMaker {
    /// Create a maker, provision its surface, and attach it to the
    /// configured container.
    pub fn new(
        options: CardOptions,
        host: Arc<dyn HostDom>,
        loader: Arc<dyn ImageLoader>,
    ) -> Result<Self> {
        let mut config = ConfigStore::new();
        config.set_many(vec![
            (ConfigKey::Align, ConfigValue::from(options.align)),
            (ConfigKey::Background, ConfigValue::from(options.background)),
            (ConfigKey::Color, ConfigValue::from(options.color)),
            (ConfigKey::Download, ConfigValue::from(options.download)),
            (ConfigKey::Container, ConfigValue::from(options.container)),
            (ConfigKey::Width, ConfigValue::from(options.width)),
            (ConfigKey::Height, ConfigValue::from(options.height)),
        ]);

        let mut maker = Self {
            config,
            template: options.template,
            host,
            loader,
            fonts: FontCatalog::new(),
            surface: None,
            surface_node: None,
        };
        maker.make_surface()?;
        maker.attach()?;
        Ok(maker)
    }

    /// Create the raster surface and its host element.
    ///
    /// At most one surface exists per instance; a second call always fails
    /// with [`Error::DuplicateSurfaceError`].
    pub fn make_surface(&mut self) -> Result<()> {
        if self.surface.is_some() {
            return Err(Error::DuplicateSurfaceError);
        }
        let width = self.config.dimension(ConfigKey::Width)?;
        let height = self.config.dimension(ConfigKey::Height)?;
        let node = self
            .host
            .create_element(ElementKind::Surface, ElementProps { width, height });
        self.surface = Some(Arc::new(Mutex::new(Surface::new(width, height))));
        self.surface_node = Some(node);
        Ok(())
    }

    /// Resolve the configured container and append the surface element to
    /// it. Returns the container handle.
    pub fn attach(&mut self) -> Result<NodeId> {
        let target = self.config.text(ConfigKey::Container)?;
        let container = self
            .host
            .resolve(&target)
            .ok_or_else(|| Error::ContainerNotFoundError(target.clone()))?;
        let node = self.surface_node.ok_or(Error::NoSurfaceError)?;
        self.host.append_child(container, node);
        Ok(container)
    }

    /// Composite the template: background, then image layers, then text.
    ///
    /// Background classification/loading and the layer loads run
    /// concurrently; draws are committed serially in that order, so no text
    /// is ever drawn before every image draw has committed. Per-step
    /// failures are aggregated into the returned report rather than
    /// aborting the render.
    pub async fn render(&mut self) -> Result<RenderReport> {
        let mut report = RenderReport::default();

        // A template background fills the config slot when it is empty.
        if self.config.lookup(ConfigKey::Background).is_none() {
            if let Some(bg) = self.template.background.clone() {
                self.config.set(ConfigKey::Background, bg);
            }
        }
        let background = self
            .config
            .lookup(ConfigKey::Background)
            .and_then(|v| v.as_text().map(str::to_owned));

        log::debug!(
            "render: {} image layer(s), {} text item(s)",
            self.template.images.len(),
            self.template.text.len()
        );

        let loader = Arc::clone(&self.loader);
        let resolve_background = async {
            match background.as_deref() {
                None => ResolvedBackground::Unset,
                Some(token) => match color::parse(token) {
                    Some(c) => ResolvedBackground::Color(c),
                    None => match loader.load(token).await {
                        Ok(image) => ResolvedBackground::Image(image),
                        Err(e) => ResolvedBackground::Failed(e),
                    },
                },
            }
        };
        let (resolved, loads) = tokio::join!(
            resolve_background,
            compose::image::load_all(self.loader.as_ref(), &self.template.images)
        );

        let handle = self.surface.as_ref().ok_or(Error::NoSurfaceError)?;
        let mut surface = handle
            .lock()
            .map_err(|_| Error::Other("surface lock poisoned".into()))?;

        let subject = background.unwrap_or_default();
        match resolved {
            ResolvedBackground::Color(c) => {
                let outcome = compose::background::paint_color(&mut surface, Some(c));
                report.record(Phase::Background, 0, subject, outcome.err());
            }
            ResolvedBackground::Image(image) => {
                let outcome = compose::background::paint_image(&mut surface, Some(&image));
                report.record(Phase::Background, 0, subject, outcome.err());
            }
            ResolvedBackground::Unset => {
                report.advise("no background specified; filling with the default black");
                let outcome = compose::background::paint_color(&mut surface, Some(color::BLACK));
                report.record(Phase::Background, 0, "black", outcome.err());
            }
            ResolvedBackground::Failed(e) => {
                report.record(Phase::Background, 0, subject, Some(e));
            }
        }

        compose::image::commit_all(&mut surface, &self.template.images, loads, &mut report);

        let defaults = self.text_defaults(&mut report);
        compose::text::draw_all(
            &mut surface,
            &self.fonts,
            defaults,
            &self.template.text,
            &mut report,
        );

        Ok(report)
    }

    /// Serialize the surface as a `data:` URI in the requested format.
    pub fn get_image(&self, format: ImageFormat, quality: f32) -> Result<String> {
        self.with_surface(|surface| export::to_data_uri(surface, format, quality))?
    }

    /// [`get_image`](Self::get_image) with the documented defaults (lossy
    /// format at maximum quality).
    pub fn get_image_default(&self) -> Result<String> {
        self.get_image(ImageFormat::default(), export::DEFAULT_QUALITY)
    }

    /// Wire the configured download trigger: on activation the host is
    /// redirected to a freshly encoded image payload.
    ///
    /// With no download target configured this is a no-op (advisory only);
    /// a configured but unresolvable target fails with
    /// [`Error::TriggerNotFoundError`].
    pub fn enable_download(&self) -> Result<()> {
        let target = match self
            .config
            .lookup(ConfigKey::Download)
            .and_then(|v| v.as_text().map(str::to_owned))
        {
            None => {
                log::warn!("no download trigger configured; download stays disabled");
                return Ok(());
            }
            Some(t) => t,
        };
        let node = self
            .host
            .resolve(&target)
            .ok_or_else(|| Error::TriggerNotFoundError(target.clone()))?;
        let surface = Arc::clone(self.surface.as_ref().ok_or(Error::NoSurfaceError)?);
        self.host.bind_activation(
            node,
            Box::new(move || {
                let guard = surface.lock().ok()?;
                match export::to_data_uri(&guard, ImageFormat::default(), export::DEFAULT_QUALITY)
                {
                    Ok(uri) => Some(uri),
                    Err(e) => {
                        log::warn!("download export failed: {}", e);
                        None
                    }
                }
            }),
        );
        Ok(())
    }

    /// Fetch one config key; the unset sentinel is an error.
    pub fn get_config(&self, key: ConfigKey) -> Result<ConfigValue> {
        self.config.get(key)
    }

    /// Fetch several config keys; unset keys map to `None`.
    pub fn get_config_many(&self, keys: &[ConfigKey]) -> HashMap<ConfigKey, Option<ConfigValue>> {
        self.config.get_many(keys)
    }

    /// The full config record.
    pub fn config_all(&self) -> &HashMap<ConfigKey, ConfigValue> {
        self.config.all()
    }

    /// Merge one config key and return its post-update value.
    pub fn set_config(
        &mut self,
        key: ConfigKey,
        value: impl Into<ConfigValue>,
    ) -> Option<ConfigValue> {
        self.config.set(key, value)
    }

    /// Merge a batch of config entries and return their post-update values.
    pub fn set_config_many<I>(&mut self, entries: I) -> HashMap<ConfigKey, Option<ConfigValue>>
    where
        I: IntoIterator<Item = (ConfigKey, ConfigValue)>,
    {
        self.config.set_many(entries)
    }

    /// The template this maker renders.
    pub fn template(&self) -> &Template {
        &self.template
    }

    /// Register a typeface for use by text items under `family`.
    pub fn register_font(&mut self, family: &str, data: &[u8]) -> Result<()> {
        self.fonts.register(family, data)
    }

    /// The host element the surface was attached through.
    pub fn surface_node(&self) -> Option<NodeId> {
        self.surface_node
    }

    /// Inspect the surface (pixels, journal, digest) read-only.
    pub fn with_surface<R>(&self, f: impl FnOnce(&Surface) -> R) -> Result<R> {
        let handle = self.surface.as_ref().ok_or(Error::NoSurfaceError)?;
        let guard = handle
            .lock()
            .map_err(|_| Error::Other("surface lock poisoned".into()))?;
        Ok(f(&guard))
    }

    fn text_defaults(&self, report: &mut RenderReport) -> TextDefaults {
        let color = match self
            .config
            .lookup(ConfigKey::Color)
            .and_then(|v| v.as_text().map(str::to_owned))
        {
            None => color::BLACK,
            Some(token) => color::parse(&token).unwrap_or_else(|| {
                report.advise(format!(
                    "'{}' is not a recognized color; defaulting text color to black",
                    token
                ));
                color::BLACK
            }),
        };
        let align = self
            .config
            .lookup(ConfigKey::Align)
            .and_then(|v| v.as_text().map(Align::from_token))
            .unwrap_or_default();
        TextDefaults { color, align }
    }
}
