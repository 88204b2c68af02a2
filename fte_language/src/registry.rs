//! Process-wide language cache.
//!
//! Modeled directly on the allocation metadata registry in
//! `glibc_rust::safety::registry`: a [`parking_lot::RwLock`]-guarded map
//! behind a [`std::sync::OnceLock`], with double-checked insertion so two
//! callers racing to build the same language coalesce onto one build.

use crate::{
    dfa::DfaSource,
    error::Error,
    language::{
        Language,
        LanguageSpec,
    },
};
use log::debug;
use parking_lot::RwLock;
use std::{
    collections::HashMap,
    sync::{
        Arc,
        OnceLock,
    },
};

/// A process-wide cache of loaded [`Language`]s, keyed by name. Languages
/// are expensive to build and never evicted; construction for a given name
/// happens at most once.
#[derive(Default)]
pub struct Registry {
    languages: RwLock<HashMap<String, Arc<Language>>>,
}

impl Registry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the cached language for `name`, or build it with `load` if
    /// this is the first request. `load` is only invoked while holding the
    /// map's write lock, so concurrent first-callers for the same (or any
    /// other) name are serialized onto a single build.
    pub fn get<D, F>(&self, name: &str, spec: LanguageSpec, load: F) -> Result<Arc<Language>, Error>
    where
        D: DfaSource + Send + Sync + 'static,
        F: FnOnce() -> Result<D, Error>,
    {
        if let Some(existing) = self.languages.read().get(name) {
            return Ok(existing.clone());
        }

        let mut guard = self.languages.write();
        if let Some(existing) = guard.get(name) {
            return Ok(existing.clone());
        }

        debug!("building language '{name}'");
        let dfa = load()?;
        let language = Arc::new(Language::build(spec, Arc::new(dfa))?);
        guard.insert(name.to_string(), language.clone());
        Ok(language)
    }

    /// The single routing tag this single-language-per-encoder design uses.
    pub fn get_partitions(&self) -> Vec<String> {
        vec!["000".to_string()]
    }

    /// The language name is itself the routing tag.
    pub fn determine_partition(name: &str) -> String {
        name.to_string()
    }
}

static GLOBAL: OnceLock<Registry> = OnceLock::new();

/// The process-wide registry instance.
pub fn global() -> &'static Registry {
    GLOBAL.get_or_init(Registry::new)
}
