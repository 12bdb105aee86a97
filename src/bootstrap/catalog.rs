// =============================================================================
// CATALOG — Le catalogue des profils nommés
// =============================================================================
//
// La configuration désigne les profils par leur NOM ; le catalogue associe
// chaque nom à une façon de construire le profil :
//
//   register::<P>("people")         → P::default()
//   register_with("orders", |s| …)  → construit à partir du contexte de
//                                     résolution (services partagés)
//
// Un nom inconnu, ou un constructeur qui échoue, est une erreur de
// configuration levée au démarrage, avant tout mapping.
//
// =============================================================================

use crate::core::error::{BoxError, MapError, MapResult};
use crate::core::factory::ServiceContainer;
use crate::core::profile::Profile;

type ProfileCtor =
    Box<dyn Fn(&ServiceContainer) -> Result<Box<dyn Profile>, BoxError> + Send + Sync>;

/// Constructeurs de profils, par nom, dans l'ordre d'enregistrement
#[derive(Default)]
pub struct ProfileCatalog {
    entries: Vec<(String, ProfileCtor)>,
}

impl ProfileCatalog {
    pub fn new() -> Self {
        ProfileCatalog::default()
    }

    /// Profil construit sans paramètre
    pub fn register<P>(&mut self, name: impl Into<String>) -> &mut Self
    where
        P: Profile + Default + 'static,
    {
        self.register_with(name, |_| Ok(Box::new(P::default()) as Box<dyn Profile>))
    }

    /// Profil construit à partir des services ; remplace un nom déjà présent
    pub fn register_with<F>(&mut self, name: impl Into<String>, ctor: F) -> &mut Self
    where
        F: Fn(&ServiceContainer) -> Result<Box<dyn Profile>, BoxError> + Send + Sync + 'static,
    {
        let name = name.into();
        let ctor: ProfileCtor = Box::new(ctor);
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = ctor,
            None => self.entries.push((name, ctor)),
        }
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    /// Construit le profil `name`
    pub fn instantiate(&self, name: &str, services: &ServiceContainer) -> MapResult<Box<dyn Profile>> {
        let (_, ctor) = self
            .entries
            .iter()
            .find(|(n, _)| n == name)
            .ok_or_else(|| MapError::configuration(format!("profil `{}` inconnu du catalogue", name)))?;
        ctor(services).map_err(|e| {
            MapError::configuration_caused_by(format!("construction du profil `{}` impossible", name), e)
        })
    }
}
