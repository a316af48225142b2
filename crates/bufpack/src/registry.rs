// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Codec registry: type name to codec factory.
//!
//! # Architecture
//!
//! ```text
//! Registry::global() (static, OnceLock)
//! +-- codecs: DashMap<String, CodecFactory>
//!     +-- "uint8" .. "int64le"  -> Instance (shared singletons)
//!     +-- "varuint"             -> Instance
//!     +-- "buffer" / "str"      -> Factory (built per field from Options)
//!     +-- "array"               -> Factory
//! ```
//!
//! Registering under an existing name replaces the entry (last writer wins),
//! so hosts can override built-ins. Names are resolved when a field is
//! declared; schemas already built keep the codec they resolved.
//!
//! # Thread Safety
//!
//! Each lookup and registration is atomic. Registration racing with schema
//! construction on another thread is still the host's ordering problem:
//! register before sharing the registry with concurrent builders.

use crate::codec::{ArrayCodec, BytesCodec, Codec, Options, TextCodec, VarUintCodec};
use crate::error::{PackError, Result};
use dashmap::DashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Function building a codec from field options.
pub type FactoryFn = dyn Fn(&Options) -> Result<Arc<dyn Codec>> + Send + Sync;

/// Registry entry: a ready-made codec or a per-field factory.
#[derive(Clone)]
pub enum CodecFactory {
    /// Shared by every field declaring this type.
    Instance(Arc<dyn Codec>),
    /// Materialized once per field declaration.
    Factory(Arc<FactoryFn>),
}

impl CodecFactory {
    pub fn instance(codec: impl Codec + 'static) -> Self {
        Self::Instance(Arc::new(codec))
    }

    pub fn factory<F>(f: F) -> Self
    where
        F: Fn(&Options) -> Result<Arc<dyn Codec>> + Send + Sync + 'static,
    {
        Self::Factory(Arc::new(f))
    }

    /// Produce the codec for one field.
    pub fn build(&self, options: &Options) -> Result<Arc<dyn Codec>> {
        match self {
            Self::Instance(codec) => Ok(Arc::clone(codec)),
            Self::Factory(f) => f(options),
        }
    }
}

impl fmt::Debug for CodecFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Instance(codec) => f.debug_tuple("Instance").field(codec).finish(),
            Self::Factory(_) => f.write_str("Factory(<fn>)"),
        }
    }
}

/// Catalog of codec factories keyed by type name.
#[derive(Debug, Default)]
pub struct Registry {
    codecs: DashMap<String, CodecFactory>,
}

impl Registry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in codecs.
    #[must_use]
    pub fn with_builtins() -> Self {
        let registry = Self::new();
        registry.install_builtins();
        registry
    }

    /// Process-wide registry used by [`Schema::field`](crate::Schema::field).
    pub fn global() -> &'static Registry {
        static REGISTRY: OnceLock<Registry> = OnceLock::new();
        REGISTRY.get_or_init(Registry::with_builtins)
    }

    fn install_builtins(&self) {
        for (name, codec) in crate::codec::integer_builtins() {
            self.codecs
                .insert(name.to_string(), CodecFactory::instance(codec));
        }
        self.codecs
            .insert("varuint".to_string(), CodecFactory::instance(VarUintCodec));
        self.codecs.insert(
            "buffer".to_string(),
            CodecFactory::factory(|options| Ok(Arc::new(BytesCodec::from_options(options)?))),
        );
        self.codecs.insert(
            "str".to_string(),
            CodecFactory::factory(|options| Ok(Arc::new(TextCodec::from_options(options)?))),
        );
        self.codecs.insert(
            "array".to_string(),
            CodecFactory::factory(|options| Ok(Arc::new(ArrayCodec::from_options(options)?))),
        );
        log::debug!(
            "[Registry] installed {} built-in codecs",
            self.codecs.len()
        );
    }

    /// Register `factory` under `name`, returning the entry it replaced.
    pub fn register(&self, name: impl Into<String>, factory: CodecFactory) -> Option<CodecFactory> {
        let name = name.into();
        let previous = self.codecs.insert(name.clone(), factory);
        if previous.is_some() {
            log::debug!("[Registry] replaced codec '{}'", name);
        } else {
            log::debug!("[Registry] registered codec '{}'", name);
        }
        previous
    }

    /// Register a shared codec instance.
    pub fn register_codec(
        &self,
        name: impl Into<String>,
        codec: impl Codec + 'static,
    ) -> Option<CodecFactory> {
        self.register(name, CodecFactory::instance(codec))
    }

    /// Register an options-driven factory.
    pub fn register_factory<F>(&self, name: impl Into<String>, f: F) -> Option<CodecFactory>
    where
        F: Fn(&Options) -> Result<Arc<dyn Codec>> + Send + Sync + 'static,
    {
        self.register(name, CodecFactory::factory(f))
    }

    /// Build the codec registered under `name`.
    pub fn resolve(&self, name: &str, options: &Options) -> Result<Arc<dyn Codec>> {
        // Clone the entry out so a factory may consult the registry itself.
        let factory = self
            .codecs
            .get(name)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| PackError::UnknownCodec(name.to_string()))?;
        factory.build(options)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.codecs.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.codecs.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.codecs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codecs.is_empty()
    }
}

/// Register into the global registry.
pub fn register(name: impl Into<String>, factory: CodecFactory) -> Option<CodecFactory> {
    Registry::global().register(name, factory)
}

/// Resolve a codec from the global registry with default options.
///
/// Convenient for array element types: `Options::new().element(codec("uint8")?)`.
pub fn codec(name: &str) -> Result<Arc<dyn Codec>> {
    Registry::global().resolve(name, &Options::default())
}
