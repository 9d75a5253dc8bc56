//! Name-keyed controller registry.

use sluice_core::{BoxError, ControllerResolver, Dispatchable, ResolveError};
use std::{collections::HashMap, fmt, sync::Arc};
use thiserror::Error;
use tracing::trace;

type Factory = Arc<dyn Fn() -> Result<Arc<dyn Dispatchable>, BoxError> + Send + Sync>;

/// Returned by a controller factory whose product is not usable.
///
/// [`ControllerManager`] reports it as [`ResolveError::Invalid`] rather than
/// as a failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct InvalidController(pub String);

#[derive(Clone)]
enum Entry {
    Instance(Arc<dyn Dispatchable>),
    Factory(Factory),
    Alias(String),
}

/// Resolves controllers registered as instances, factories or aliases.
///
/// # Example
///
/// ```rust,ignore
/// let controllers = ControllerManager::new()
///     .register("index", |_ctx: &mut MvcContext| Ok(Some(ViewModel::new().into())))
///     .register_factory("users", || Ok(Arc::new(users_controller()) as Arc<dyn Dispatchable>))
///     .alias("home", "index");
/// ```
#[derive(Clone, Default)]
pub struct ControllerManager {
    entries: HashMap<String, Entry>,
}

impl ControllerManager {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a shared controller instance.
    pub fn register<D: Dispatchable + 'static>(
        self,
        name: impl Into<String>,
        controller: D,
    ) -> Self {
        self.register_arc(name, Arc::new(controller))
    }

    /// Register an already shared controller instance.
    pub fn register_arc(
        mut self,
        name: impl Into<String>,
        controller: Arc<dyn Dispatchable>,
    ) -> Self {
        self.entries.insert(name.into(), Entry::Instance(controller));
        self
    }

    /// Register a factory producing a fresh controller per resolution.
    ///
    /// A factory error of type [`InvalidController`] resolves as invalid; any
    /// other error resolves as a failure.
    pub fn register_factory<F>(mut self, name: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> Result<Arc<dyn Dispatchable>, BoxError> + Send + Sync + 'static,
    {
        self.entries.insert(name.into(), Entry::Factory(Arc::new(factory)));
        self
    }

    /// Make `alias` resolve to whatever `target` resolves to.
    pub fn alias(mut self, alias: impl Into<String>, target: impl Into<String>) -> Self {
        self.entries.insert(alias.into(), Entry::Alias(target.into()));
        self
    }

    /// Registered names, aliases included.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl ControllerResolver for ControllerManager {
    fn resolve(&self, name: &str) -> Result<Arc<dyn Dispatchable>, ResolveError> {
        let mut current = name;
        let mut seen = vec![name];
        loop {
            let entry = self
                .entries
                .get(current)
                .ok_or_else(|| ResolveError::NotFound(name.to_string()))?;
            match entry {
                Entry::Instance(controller) => return Ok(Arc::clone(controller)),
                Entry::Factory(factory) => {
                    trace!(controller = %current, "creating controller");
                    return factory().map_err(|source| match source.downcast::<InvalidController>() {
                        Ok(invalid) => ResolveError::Invalid {
                            name: name.to_string(),
                            reason: (*invalid).0,
                        },
                        Err(source) => ResolveError::Failed {
                            name: name.to_string(),
                            source,
                        },
                    });
                }
                Entry::Alias(target) => {
                    if seen.contains(&target.as_str()) {
                        return Err(ResolveError::Invalid {
                            name: name.to_string(),
                            reason: format!("alias cycle through `{target}`"),
                        });
                    }
                    seen.push(target.as_str());
                    current = target.as_str();
                }
            }
        }
    }

    fn has(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }
}

impl fmt::Debug for ControllerManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.names().collect();
        names.sort();
        f.debug_struct("ControllerManager")
            .field("controllers", &names)
            .finish()
    }
}
