// =============================================================================
// FACTORY — La fabrique d'instances cibles
// =============================================================================
//
// Quand la cible n'existe pas encore (map::<T>, membre imbriqué absent,
// élément de liste), le moteur doit CRÉER une instance de son type.
//
// Deux voies, dans cet ordre :
//   1. la fabrique fournie au mapper (résolution de dépendances), si elle
//      connaît le type
//   2. sinon, la construction sans paramètre déclarée par le type
//
// Si aucune des deux n'aboutit, l'erreur remonte à l'appelant : le moteur
// ne suppose jamais que la construction réussit.
//
// Le `ServiceContainer` est une fabrique minimale : un registre de services
// partagés et de constructeurs de modèles qui peuvent les consulter.
//
// =============================================================================

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use super::error::BoxError;
use super::model::Mappable;
use super::types::TypeKey;

/// Crée des instances de types mappables.
pub trait InstanceFactory: Send + Sync {
    /// `None` si la fabrique ne connaît pas ce type
    fn create(&self, ty: TypeKey) -> Option<Result<Box<dyn Mappable>, BoxError>>;
}

type ModelFactoryFn =
    Arc<dyn Fn(&ServiceContainer) -> Result<Box<dyn Mappable>, BoxError> + Send + Sync>;

/// Contexte de résolution : services partagés + constructeurs de modèles.
///
/// Rempli au bootstrap, puis partagé en lecture seule.
#[derive(Default)]
pub struct ServiceContainer {
    services: HashMap<TypeId, Arc<dyn Any + Send + Sync>>,
    models: HashMap<TypeKey, ModelFactoryFn>,
}

impl ServiceContainer {
    pub fn new() -> Self {
        ServiceContainer::default()
    }

    /// Enregistre un service partagé (remplace un éventuel service du même type)
    pub fn provide<T: Any + Send + Sync>(&mut self, service: T) -> &mut Self {
        self.services.insert(TypeId::of::<T>(), Arc::new(service));
        self
    }

    pub fn resolve<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.services
            .get(&TypeId::of::<T>())
            .and_then(|service| Arc::clone(service).downcast::<T>().ok())
    }

    /// Comme `resolve`, mais l'absence est une erreur
    pub fn require<T: Any + Send + Sync>(&self) -> Result<Arc<T>, BoxError> {
        self.resolve::<T>().ok_or_else(|| {
            format!(
                "service {} non enregistré",
                TypeKey::of::<T>().short_name()
            )
            .into()
        })
    }

    /// Enregistre un constructeur de modèle qui peut consulter les services
    pub fn register_model<T, F>(&mut self, build: F) -> &mut Self
    where
        T: Mappable,
        F: Fn(&ServiceContainer) -> Result<T, BoxError> + Send + Sync + 'static,
    {
        let erased = move |services: &ServiceContainer| -> Result<Box<dyn Mappable>, BoxError> {
            build(services).map(|model| Box::new(model) as Box<dyn Mappable>)
        };
        self.models.insert(TypeKey::of::<T>(), Arc::new(erased));
        self
    }

    pub fn knows_model(&self, ty: &TypeKey) -> bool {
        self.models.contains_key(ty)
    }
}

impl InstanceFactory for ServiceContainer {
    fn create(&self, ty: TypeKey) -> Option<Result<Box<dyn Mappable>, BoxError>> {
        self.models.get(&ty).map(|build| build(self))
    }
}
