// =============================================================================
// REGISTRY — Le registre ordonné des relations de mapping personnalisées
// =============================================================================
//
// Une RELATION déclare : "pour la paire (S, D), exécute cette fonction",
// avec un drapeau `use_default_mapper` :
//
//   true  → copie structurelle D'ABORD, puis la fonction personnalisée
//   false → la fonction personnalisée SEULE
//
// Le registre est une SÉQUENCE, pas une table : la recherche est un
// parcours linéaire dans l'ordre d'enregistrement et la PREMIÈRE relation
// dont la paire correspond gagne. En cas de doublon, l'ordre de
// déclaration des profils fait foi.
//
// Le registre est construit une fois au bootstrap, puis en lecture seule.
//
// =============================================================================

use std::fmt;
use std::sync::Arc;

use super::error::BoxError;
use super::mapper::ObjectMapper;
use super::model::{Describe, Mappable, ModelRef};
use super::types::TypePair;

/// Fonction personnalisée typée-effacée : (mapper, source, cible)
pub type CustomMapFn =
    Arc<dyn Fn(&dyn ObjectMapper, &dyn Mappable, &mut dyn Mappable) -> Result<(), BoxError> + Send + Sync>;

/// Une relation de mapping personnalisée pour une paire de types.
#[derive(Clone)]
pub struct MappingRelation {
    pair: TypePair,
    source: ModelRef,
    target: ModelRef,
    map_fn: CustomMapFn,
    pub(crate) use_default_mapper: bool,
}

impl MappingRelation {
    /// Relation S → D à partir d'une fonction typée.
    /// Par défaut, la copie structurelle s'exécute avant la fonction.
    pub fn new<S, D, F>(map_fn: F) -> Self
    where
        S: Describe,
        D: Describe,
        F: Fn(&dyn ObjectMapper, &S, &mut D) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        let pair = TypePair::of::<S, D>();
        let erased = move |mapper: &dyn ObjectMapper,
                           source: &dyn Mappable,
                           target: &mut dyn Mappable|
              -> Result<(), BoxError> {
            let found_source = source.type_key();
            let found_target = target.type_key();
            let source = source
                .as_any()
                .downcast_ref::<S>()
                .ok_or_else(|| format!("source {} reçue pour la relation {}", found_source, pair))?;
            let target = target
                .as_any_mut()
                .downcast_mut::<D>()
                .ok_or_else(|| format!("cible {} reçue pour la relation {}", found_target, pair))?;
            map_fn(mapper, source, target)
        };

        MappingRelation {
            pair,
            source: ModelRef::of::<S>(),
            target: ModelRef::of::<D>(),
            map_fn: Arc::new(erased),
            use_default_mapper: true,
        }
    }

    pub fn pair(&self) -> TypePair {
        self.pair
    }

    pub fn source(&self) -> ModelRef {
        self.source
    }

    pub fn target(&self) -> ModelRef {
        self.target
    }

    pub fn use_default_mapper(&self) -> bool {
        self.use_default_mapper
    }

    /// Exécute la fonction personnalisée
    pub fn invoke(
        &self,
        mapper: &dyn ObjectMapper,
        source: &dyn Mappable,
        target: &mut dyn Mappable,
    ) -> Result<(), BoxError> {
        (self.map_fn)(mapper, source, target)
    }
}

impl fmt::Debug for MappingRelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MappingRelation")
            .field("pair", &self.pair)
            .field("use_default_mapper", &self.use_default_mapper)
            .finish()
    }
}

impl fmt::Display for MappingRelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.use_default_mapper {
            write!(f, "{} (structurel + personnalisé)", self.pair)
        } else {
            write!(f, "{} (personnalisé seul)", self.pair)
        }
    }
}

/// Le registre ordonné des relations.
#[derive(Clone, Debug, Default)]
pub struct OverrideRegistry {
    relations: Vec<MappingRelation>,
}

impl OverrideRegistry {
    pub fn new() -> Self {
        OverrideRegistry {
            relations: Vec::new(),
        }
    }

    pub fn from_relations(relations: Vec<MappingRelation>) -> Self {
        OverrideRegistry { relations }
    }

    /// Première relation enregistrée pour `pair`, dans l'ordre d'enregistrement
    pub fn find(&self, pair: &TypePair) -> Option<&MappingRelation> {
        self.relations.iter().find(|r| r.pair == *pair)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MappingRelation> {
        self.relations.iter()
    }

    pub fn len(&self) -> usize {
        self.relations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }
}

impl fmt::Display for OverrideRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "relations = {{")?;
        for relation in &self.relations {
            writeln!(f, "  {}", relation)?;
        }
        write!(f, "}}")
    }
}

// =============================================================================
// TESTS
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fixtures::{Person, PersonDto};
    use crate::core::mapper::Mapper;

    fn set_nickname(value: &'static str) -> MappingRelation {
        MappingRelation::new::<Person, PersonDto, _>(move |_, _, dst| {
            dst.nickname = value.to_string();
            Ok(())
        })
    }

    #[test]
    fn test_first_registered_relation_wins() {
        let registry =
            OverrideRegistry::from_relations(vec![set_nickname("premier"), set_nickname("second")]);

        let relation = registry
            .find(&TypePair::of::<Person, PersonDto>())
            .expect("relation trouvée");
        let mut dto = PersonDto::default();
        relation
            .invoke(&Mapper::new(), &Person::named("A"), &mut dto)
            .unwrap();
        assert_eq!(dto.nickname, "premier");
    }

    #[test]
    fn test_lookup_is_directional() {
        let registry = OverrideRegistry::from_relations(vec![set_nickname("x")]);
        assert!(registry.find(&TypePair::of::<PersonDto, Person>()).is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_invoke_rejects_wrong_types() {
        let relation = set_nickname("x");
        let mut wrong = Person::default();
        let err = relation
            .invoke(&Mapper::new(), &Person::named("A"), &mut wrong)
            .unwrap_err();
        assert!(err.to_string().contains("cible Person"));
    }

    #[test]
    fn test_relation_defaults_to_default_mapper() {
        let relation = set_nickname("x");
        assert!(relation.use_default_mapper());
        assert_eq!(relation.source().key, crate::core::types::TypeKey::of::<Person>());
    }
}
