//! Tag resolution: the value linking an annotation to the layer beneath it.
//!
//! The built-in default reads [`TAG_ENV_KEY`] from the environment for the
//! application layer and yields an empty tag everywhere else. Callers can
//! install their own resolver; whenever it returns an empty string the
//! built-in default is consulted instead.

use std::fmt;
use std::sync::{Arc, RwLock};

use crate::types::LayerType;

/// Environment variable read for the application-layer tag, e.g. the commit
/// SHA of the workload the application runs in.
pub const TAG_ENV_KEY: &str = "TAG";

/// Resolves the tag for a layer. Must never panic; unresolvable tags are `""`.
pub trait TagResolver: Send + Sync {
    fn resolve(&self, layer: LayerType) -> String;
}

/// The built-in resolver. Reads the environment on every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvTagResolver;

impl TagResolver for EnvTagResolver {
    fn resolve(&self, layer: LayerType) -> String {
        match layer {
            LayerType::Application => std::env::var(TAG_ENV_KEY).unwrap_or_default(),
            LayerType::CiCd | LayerType::Os | LayerType::Host => String::new(),
        }
    }
}

/// A resolver backed by a closure, for stateful or caching lookups.
pub struct FnTagResolver<F>(F);

impl<F> FnTagResolver<F>
where
    F: Fn(LayerType) -> String + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> TagResolver for FnTagResolver<F>
where
    F: Fn(LayerType) -> String + Send + Sync,
{
    fn resolve(&self, layer: LayerType) -> String {
        (self.0)(layer)
    }
}

/// Consults a caller-supplied resolver first and falls back to
/// [`EnvTagResolver`] when it yields an empty tag.
pub struct LayeredTagResolver {
    custom: Arc<dyn TagResolver>,
}

impl LayeredTagResolver {
    pub fn new(custom: Arc<dyn TagResolver>) -> Self {
        Self { custom }
    }
}

impl TagResolver for LayeredTagResolver {
    fn resolve(&self, layer: LayerType) -> String {
        let tag = self.custom.resolve(layer);
        if tag.is_empty() {
            EnvTagResolver.resolve(layer)
        } else {
            tag
        }
    }
}

/// A runtime-swappable resolver.
///
/// A swap replaces the whole `Arc`; a lookup clones the current `Arc` and
/// resolves against it, so in-flight lookups never see a partial update.
pub struct SharedTagResolver {
    current: RwLock<Arc<dyn TagResolver>>,
}

impl SharedTagResolver {
    /// Start with the built-in default.
    pub fn new() -> Self {
        Self {
            current: RwLock::new(Arc::new(EnvTagResolver)),
        }
    }

    /// Start with `custom` layered over the built-in default.
    pub fn with_custom(custom: Arc<dyn TagResolver>) -> Self {
        Self {
            current: RwLock::new(Arc::new(LayeredTagResolver::new(custom))),
        }
    }

    /// Install `custom` (layered over the default) for all subsequent lookups.
    pub fn swap(&self, custom: Arc<dyn TagResolver>) {
        self.replace(Arc::new(LayeredTagResolver::new(custom)));
    }

    /// Restore the built-in default.
    pub fn reset(&self) {
        self.replace(Arc::new(EnvTagResolver));
    }

    fn replace(&self, next: Arc<dyn TagResolver>) {
        // A poisoned lock still holds a complete Arc; keep going.
        let mut guard = self.current.write().unwrap_or_else(|e| e.into_inner());
        *guard = next;
    }

    fn snapshot(&self) -> Arc<dyn TagResolver> {
        let guard = self.current.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&*guard)
    }
}

impl Default for SharedTagResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl TagResolver for SharedTagResolver {
    fn resolve(&self, layer: LayerType) -> String {
        self.snapshot().resolve(layer)
    }
}

impl fmt::Debug for SharedTagResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SharedTagResolver")
    }
}
