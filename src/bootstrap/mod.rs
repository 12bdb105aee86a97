// =============================================================================
// BOOTSTRAP — La construction du mapper au démarrage
// =============================================================================
//
// Ce module est la seule partie qui touche au monde extérieur (fichiers de
// configuration, catalogue de profils, services). Il produit un `Mapper`
// dont le registre est figé : après `build()`, plus aucune relation ne peut
// être ajoutée.
//
// EXEMPLE :
//
//   let mut catalog = ProfileCatalog::new();
//   catalog.register::<PeopleProfile>("people");
//
//   let config = MapperConfig::from_toml_str(r#"
//       [mapper]
//       profiles = ["people"]
//   "#)?;
//
//   let mapper = MapperBuilder::new().from_config(&config, &catalog)?.build()?;
//
// L'ordre des relations est exactement celui de déclaration : profils dans
// l'ordre où ils sont ajoutés, relations dans l'ordre de chaque profil.
//
// =============================================================================

pub mod catalog;
pub mod config;

use std::sync::Arc;

use tracing::{debug, info};

use crate::core::cache::CopyCache;
use crate::core::error::{MapError, MapResult};
use crate::core::factory::{InstanceFactory, ServiceContainer};
use crate::core::mapper::Mapper;
use crate::core::profile::{Profile, ProfileBuilder};
use crate::core::registry::OverrideRegistry;

use self::catalog::ProfileCatalog;
use self::config::MapperConfig;

/// Assemble profils, cache et fabrique en un `Mapper`.
pub struct MapperBuilder {
    profiles: ProfileBuilder,
    services: Arc<ServiceContainer>,
    factory: Option<Arc<dyn InstanceFactory>>,
    cache: Option<Arc<CopyCache>>,
    validate: bool,
}

impl MapperBuilder {
    pub fn new() -> Self {
        MapperBuilder {
            profiles: ProfileBuilder::new(),
            services: Arc::new(ServiceContainer::new()),
            factory: None,
            cache: None,
            validate: false,
        }
    }

    /// Fabrique utilisée pour créer les instances cibles
    pub fn with_factory(mut self, factory: Arc<dyn InstanceFactory>) -> Self {
        self.factory = Some(factory);
        self
    }

    /// Contexte de résolution : sert aux profils du catalogue ET de fabrique
    pub fn with_services(mut self, services: Arc<ServiceContainer>) -> Self {
        self.factory = Some(Arc::clone(&services) as Arc<dyn InstanceFactory>);
        self.services = services;
        self
    }

    pub fn with_cache(mut self, cache: Arc<CopyCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Un cache propre à ce mapper, au lieu du cache du processus
    pub fn private_cache(self) -> Self {
        self.with_cache(Arc::new(CopyCache::new()))
    }

    pub fn validate_on_build(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }

    pub fn add_profile(mut self, profile: &dyn Profile) -> Self {
        self.profiles.apply(profile);
        self
    }

    /// Ajoute les profils `names` du catalogue, dans cet ordre.
    ///
    /// Tous les profils sont construits avant d'en appliquer un seul :
    /// un nom invalide n'enregistre rien.
    pub fn add_profiles(mut self, catalog: &ProfileCatalog, names: &[String]) -> MapResult<Self> {
        let profiles = names
            .iter()
            .map(|name| catalog.instantiate(name, &self.services))
            .collect::<MapResult<Vec<_>>>()?;
        for profile in &profiles {
            self.profiles.apply(profile.as_ref());
        }
        Ok(self)
    }

    pub fn from_config(self, config: &MapperConfig, catalog: &ProfileCatalog) -> MapResult<Self> {
        let builder = if config.shared_cache {
            self
        } else {
            self.private_cache()
        };
        builder
            .validate_on_build(config.validate_on_build)
            .add_profiles(catalog, &config.profiles)
    }

    /// Fige le registre et construit le mapper.
    ///
    /// Avec la validation activée, échoue sur la première erreur de
    /// compilation (toutes sont journalisées).
    pub fn build(self) -> MapResult<Mapper> {
        let registry = OverrideRegistry::from_relations(self.profiles.into_relations());
        let relations = registry.len();
        let mapper = Mapper::with_parts(
            Arc::new(registry),
            self.cache.unwrap_or_else(CopyCache::global),
            self.factory,
        );

        if self.validate {
            if let Err(errors) = mapper.validate() {
                for error in &errors {
                    debug!(%error, "relation invalide");
                }
                return Err(errors
                    .into_iter()
                    .next()
                    .unwrap_or_else(|| MapError::configuration("validation en échec")));
            }
        }

        info!(relations, validated = self.validate, "mapper construit");
        Ok(mapper)
    }
}

impl Default for MapperBuilder {
    fn default() -> Self {
        MapperBuilder::new()
    }
}
