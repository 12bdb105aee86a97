// =============================================================================
// CACHE — Les copieurs compilés, un par paire de types
// =============================================================================
//
// Compiler un copieur coûte une introspection complète des deux types ;
// l'exécuter ne coûte que ses étapes. Le cache garantit qu'une paire n'est
// compilée qu'au premier usage, puis réutilisée pour toute la durée du
// processus.
//
// CONCURRENCE :
//   - la table est une DashMap (insertion concurrente sûre)
//   - en cas de course, deux threads peuvent compiler la même paire ;
//     la dernière insertion gagne, les deux copieurs sont équivalents
//   - la compilation se fait HORS de tout verrou de la table
//
// Un cache global est partagé par tous les mappers du processus ; un mapper
// peut aussi recevoir un cache privé (tests, isolation).
//
// =============================================================================

use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::Lazy;
use tracing::trace;

use super::compile::{compile, CompiledCopy};
use super::error::MapResult;
use super::model::TypeDescriptor;
use super::types::TypePair;

static GLOBAL: Lazy<Arc<CopyCache>> = Lazy::new(|| Arc::new(CopyCache::new()));

/// Table concurrente paire de types → copieur compilé
#[derive(Default)]
pub struct CopyCache {
    entries: DashMap<TypePair, Arc<CompiledCopy>>,
}

impl CopyCache {
    pub fn new() -> Self {
        CopyCache {
            entries: DashMap::new(),
        }
    }

    /// Le cache partagé par tout le processus
    pub fn global() -> Arc<CopyCache> {
        Arc::clone(&GLOBAL)
    }

    pub fn get(&self, pair: &TypePair) -> Option<Arc<CompiledCopy>> {
        self.entries.get(pair).map(|entry| Arc::clone(entry.value()))
    }

    /// Le copieur de `pair`, compilé au besoin.
    ///
    /// `describe` n'est appelé qu'en cas d'absence. Une erreur de
    /// compilation n'est pas mise en cache.
    pub fn get_or_compile<F>(&self, pair: TypePair, describe: F) -> MapResult<Arc<CompiledCopy>>
    where
        F: FnOnce() -> (TypeDescriptor, TypeDescriptor),
    {
        if let Some(hit) = self.get(&pair) {
            return Ok(hit);
        }

        let (source, target) = describe();
        let compiled = Arc::new(compile(&source, &target)?);
        trace!(pair = %pair, "copieur inséré dans le cache");
        self.entries.insert(pair, Arc::clone(&compiled));
        Ok(compiled)
    }

    pub fn contains(&self, pair: &TypePair) -> bool {
        self.entries.contains_key(pair)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }
}
