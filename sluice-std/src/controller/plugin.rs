//! Controller plugins.

use sluice_core::{BoxError, MvcContext, Response};
use std::{
    any::{Any, type_name},
    collections::HashMap,
    fmt,
    sync::{Arc, Mutex, PoisonError},
};
use thiserror::Error;

/// Name of the built-in [`Params`] plugin.
pub const PARAMS_PLUGIN: &str = "params";
/// Name of the built-in [`Redirect`] plugin.
pub const REDIRECT_PLUGIN: &str = "redirect";

type Plugin = Arc<dyn Any + Send + Sync>;
type PluginFactory = Arc<dyn Fn() -> Plugin + Send + Sync>;

/// Errors raised while fetching a plugin.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PluginError {
    /// No factory is registered under the name.
    #[error("no plugin registered under `{0}`")]
    NotFound(String),

    /// The plugin exists but is not of the requested type.
    #[error("plugin `{name}` is not a `{expected}`")]
    WrongType {
        /// The plugin name.
        name: String,
        /// The requested type.
        expected: &'static str,
    },
}

/// Registry of plugin factories, shared by every controller.
#[derive(Clone, Default)]
pub struct PluginManager {
    factories: HashMap<String, PluginFactory>,
}

impl PluginManager {
    /// Create an empty manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a manager with the built-in `params` and `redirect` plugins.
    pub fn with_defaults() -> Self {
        Self::new()
            .register(PARAMS_PLUGIN, || Params)
            .register(REDIRECT_PLUGIN, || Redirect)
    }

    /// Register a factory; a later registration under the same name wins.
    pub fn register<T, F>(mut self, name: impl Into<String>, factory: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.factories
            .insert(name.into(), Arc::new(move || Arc::new(factory()) as Plugin));
        self
    }

    /// Whether a factory is registered under `name`.
    pub fn has(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    fn create(&self, name: &str) -> Result<Plugin, PluginError> {
        self.factories
            .get(name)
            .map(|factory| factory())
            .ok_or_else(|| PluginError::NotFound(name.to_string()))
    }
}

impl fmt::Debug for PluginManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.factories.keys().collect();
        names.sort();
        f.debug_struct("PluginManager").field("plugins", &names).finish()
    }
}

/// Per-controller plugin cache.
///
/// Each plugin is created on first use and reused afterwards.
pub struct Plugins {
    manager: Arc<PluginManager>,
    cache: Mutex<HashMap<String, Plugin>>,
}

impl Plugins {
    /// Create an empty cache over `manager`.
    pub fn new(manager: Arc<PluginManager>) -> Self {
        Self {
            manager,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Fetch the plugin registered under `name` as a `T`.
    pub fn get<T: Any + Send + Sync>(&self, name: &str) -> Result<Arc<T>, PluginError> {
        let plugin = {
            let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
            match cache.get(name) {
                Some(plugin) => Arc::clone(plugin),
                None => {
                    let plugin = self.manager.create(name)?;
                    cache.insert(name.to_string(), Arc::clone(&plugin));
                    plugin
                }
            }
        };
        plugin.downcast::<T>().map_err(|_| PluginError::WrongType {
            name: name.to_string(),
            expected: type_name::<T>(),
        })
    }

    /// The `params` plugin.
    pub fn params(&self) -> Result<Arc<Params>, PluginError> {
        self.get(PARAMS_PLUGIN)
    }

    /// The `redirect` plugin.
    pub fn redirect(&self) -> Result<Arc<Redirect>, PluginError> {
        self.get(REDIRECT_PLUGIN)
    }

    /// Number of plugins created so far.
    pub fn cached(&self) -> usize {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl fmt::Debug for Plugins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Plugins")
            .field("manager", &self.manager)
            .field("cached", &self.cached())
            .finish()
    }
}

/// Reads route and query parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct Params;

impl Params {
    /// A route-match parameter.
    pub fn from_route<'a>(&self, ctx: &'a MvcContext, name: &str) -> Option<&'a str> {
        ctx.route_match()?.param(name)
    }

    /// A query-string parameter.
    pub fn from_query<'a>(&self, ctx: &'a MvcContext, name: &str) -> Option<&'a str> {
        ctx.request().query_param(name)
    }
}

/// Builds redirect responses.
#[derive(Debug, Clone, Copy, Default)]
pub struct Redirect;

impl Redirect {
    /// A `302 Found` response pointing at `url`.
    pub fn to_url(&self, url: &str) -> Result<Response, BoxError> {
        Response::redirect(url)
    }
}
