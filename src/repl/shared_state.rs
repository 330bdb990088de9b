use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, info};

use crate::completion::{CachedValueProvider, CompletionEngine, StaticValueProvider};
use crate::config::{Config, OutputFormat};
use crate::error::{ConfigError, Result};
use crate::schema::{LoadedSchema, SchemaRegistry, load_schema};

/// State shared between the shell, its editor components and one-shot commands.
///
/// Clones share everything: a reload through one clone is seen by the
/// completer, highlighter and prompt holding the others.
#[derive(Clone)]
pub struct SharedState {
    /// Completion engine over the current schema snapshot
    engine: Arc<CompletionEngine>,

    /// Known values declared in the schema file
    values: StaticValueProvider,

    /// Cache in front of `values`, as seen by the engine
    cache: Arc<CachedValueProvider<StaticValueProvider>>,

    /// Schema file to reload from
    schema_path: Option<PathBuf>,

    /// Output format setting
    output_format: Arc<RwLock<OutputFormat>>,

    /// Color output setting
    color_enabled: Arc<RwLock<bool>>,
}

impl SharedState {
    /// Create shared state from configuration, loading the configured schema.
    ///
    /// * `config` - Effective configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let loaded = config
            .schema
            .path
            .as_deref()
            .map(load_schema)
            .transpose()?;
        Ok(Self::with_schema(loaded, config))
    }

    /// Create shared state around an already loaded schema.
    ///
    /// * `loaded` - Schema and known values, or `None` for an empty registry
    /// * `config` - Effective configuration
    pub fn with_schema(loaded: Option<LoadedSchema>, config: &Config) -> Self {
        let (registry, values, schema_path) = match loaded {
            Some(l) => (l.registry, l.values, Some(l.path)),
            None => {
                debug!("No schema configured, starting with an empty registry");
                (SchemaRegistry::empty(), Default::default(), None)
            }
        };

        let values = StaticValueProvider::new(values);
        let cache = Arc::new(CachedValueProvider::new(
            values.clone(),
            config.value_cache_ttl(),
        ));
        let engine = CompletionEngine::new(registry, cache.clone())
            .with_options(config.completion_options());

        Self {
            engine: Arc::new(engine),
            values,
            cache,
            schema_path,
            output_format: Arc::new(RwLock::new(config.display.format)),
            color_enabled: Arc::new(RwLock::new(config.display.color_output)),
        }
    }

    pub fn engine(&self) -> &CompletionEngine {
        &self.engine
    }

    /// Current registry snapshot
    pub fn registry(&self) -> Arc<SchemaRegistry> {
        self.engine.schema().snapshot()
    }

    /// Name of the current schema
    pub fn schema_name(&self) -> String {
        self.registry().name().to_string()
    }

    pub fn schema_path(&self) -> Option<&Path> {
        self.schema_path.as_deref()
    }

    /// Check whether a schema file backs this state
    pub fn has_schema(&self) -> bool {
        self.schema_path.is_some()
    }

    /// Re-read the schema file and publish the new registry and known values.
    ///
    /// On failure the current schema stays in place.
    pub fn reload(&self) -> Result<Arc<SchemaRegistry>> {
        let path = self
            .schema_path
            .as_deref()
            .ok_or_else(|| ConfigError::MissingField("schema.path".to_string()))?;

        let loaded = load_schema(path)?;
        self.engine.schema().publish(loaded.registry);
        self.values.publish(loaded.values);
        self.cache.invalidate();

        let registry = self.registry();
        info!(
            "Reloaded schema '{}' ({} fields) from {}",
            registry.name(),
            registry.len(),
            path.display()
        );
        Ok(registry)
    }

    /// Get current output format.
    pub fn get_format(&self) -> OutputFormat {
        *self
            .output_format
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Set output format.
    pub fn set_format(&self, format: OutputFormat) {
        *self
            .output_format
            .write()
            .unwrap_or_else(PoisonError::into_inner) = format;
    }

    /// Get current color setting.
    pub fn get_color_enabled(&self) -> bool {
        *self
            .color_enabled
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Set color output.
    pub fn set_color_enabled(&self, enabled: bool) {
        *self
            .color_enabled
            .write()
            .unwrap_or_else(PoisonError::into_inner) = enabled;
    }
}
