// =============================================================================
// PROFILE — Les unités de déclaration des mappings personnalisés
// =============================================================================
//
// Un PROFIL regroupe des déclarations `create_map::<S, D>(...)`. Il n'existe
// que le temps du bootstrap : ce qui survit, ce sont les relations qu'il a
// déclarées, dans l'ordre de déclaration.
//
// EXEMPLE :
//
//   struct OrderProfile;
//
//   impl Profile for OrderProfile {
//       fn configure(&self, maps: &mut ProfileBuilder) {
//           maps.create_map::<Order, OrderDto, _>(|_, src, dst| {
//               dst.reference = format!("CMD-{}", src.number);
//               Ok(())
//           })
//           .reverse::<OrderDto, Order, _>(|_, dto, order| { ... Ok(()) });
//       }
//   }
//
// `create_map` enregistre la relation ALLER ; `.reverse(...)` ajoute la
// relation RETOUR juste après. `.without_default_mapper()` désactive la
// copie structurelle pour les relations de cette déclaration.
//
// =============================================================================

use std::ops::Range;

use tracing::debug;

use super::error::BoxError;
use super::mapper::ObjectMapper;
use super::model::Describe;
use super::registry::MappingRelation;

/// Une unité de déclaration de relations.
pub trait Profile {
    fn configure(&self, maps: &mut ProfileBuilder);

    /// Nom affiché dans les journaux
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Un profil peut aussi être une simple fermeture.
impl<F> Profile for F
where
    F: Fn(&mut ProfileBuilder),
{
    fn configure(&self, maps: &mut ProfileBuilder) {
        self(maps)
    }

    fn name(&self) -> &str {
        "<fermeture>"
    }
}

/// Collecte les relations déclarées par un ou plusieurs profils.
#[derive(Default)]
pub struct ProfileBuilder {
    relations: Vec<MappingRelation>,
}

impl ProfileBuilder {
    pub fn new() -> Self {
        ProfileBuilder::default()
    }

    /// Déclare la relation S → D.
    pub fn create_map<S, D, F>(&mut self, forward: F) -> MapExpression<'_>
    where
        S: Describe,
        D: Describe,
        F: Fn(&dyn ObjectMapper, &S, &mut D) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        let start = self.relations.len();
        let relation = MappingRelation::new::<S, D, F>(forward);
        debug!(pair = %relation.pair(), "relation déclarée");
        self.relations.push(relation);
        MapExpression {
            relations: &mut self.relations,
            declared: start..start + 1,
        }
    }

    /// Déclare S → D et D → S en une fois.
    pub fn create_map_with_reverse<S, D, F, R>(&mut self, forward: F, reverse: R) -> MapExpression<'_>
    where
        S: Describe,
        D: Describe,
        F: Fn(&dyn ObjectMapper, &S, &mut D) -> Result<(), BoxError> + Send + Sync + 'static,
        R: Fn(&dyn ObjectMapper, &D, &mut S) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        self.create_map::<S, D, F>(forward).reverse::<D, S, R>(reverse)
    }

    /// Applique un profil à ce builder
    pub fn apply(&mut self, profile: &dyn Profile) -> &mut Self {
        let before = self.relations.len();
        profile.configure(self);
        debug!(
            profile = profile.name(),
            relations = self.relations.len() - before,
            "profil appliqué"
        );
        self
    }

    pub fn relations(&self) -> &[MappingRelation] {
        &self.relations
    }

    pub fn into_relations(self) -> Vec<MappingRelation> {
        self.relations
    }
}

/// Une déclaration en cours : permet d'ajouter le sens retour et de régler
/// la copie structurelle.
pub struct MapExpression<'b> {
    relations: &'b mut Vec<MappingRelation>,
    declared: Range<usize>,
}

impl<'b> MapExpression<'b> {
    /// Ajoute la relation retour D → S, juste après la relation aller
    pub fn reverse<S, D, R>(self, reverse: R) -> Self
    where
        S: Describe,
        D: Describe,
        R: Fn(&dyn ObjectMapper, &S, &mut D) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        let mut relation = MappingRelation::new::<S, D, R>(reverse);
        if let Some(forward) = self.relations.get(self.declared.start) {
            relation.use_default_mapper = forward.use_default_mapper;
        }
        debug!(pair = %relation.pair(), "relation retour déclarée");
        self.relations.push(relation);
        MapExpression {
            declared: self.declared.start..self.relations.len(),
            relations: self.relations,
        }
    }

    /// Les relations de cette déclaration n'exécutent que la fonction personnalisée
    pub fn without_default_mapper(self) -> Self {
        for relation in &mut self.relations[self.declared.clone()] {
            relation.use_default_mapper = false;
        }
        self
    }
}
