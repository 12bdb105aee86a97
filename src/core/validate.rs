// =============================================================================
// VALIDATE — Vérification des relations au démarrage
// =============================================================================
//
// Sans validation, une erreur de compilation d'un copieur n'apparaît qu'au
// PREMIER usage de la paire, parfois longtemps après le démarrage.
//
// Ce module pré-compile (à travers le cache) le copieur structurel de
// chaque relation qui en a besoin, et collecte TOUTES les erreurs au lieu
// de s'arrêter à la première :
//   - les copieurs qui ne peuvent pas être compilés (erreurs)
//   - les membres ignorés faute de règle de pont (avertissements)
//   - les relations masquées par une relation antérieure (avertissements)
//
// Le comportement au premier usage ne change pas : la validation ne fait
// que remplir le cache en avance.
//
// =============================================================================

use std::collections::HashSet;

use tracing::warn;

use super::cache::CopyCache;
use super::error::MapError;
use super::mapper::Mapper;
use super::registry::OverrideRegistry;

/// Pré-compile les copieurs des relations `use_default_mapper`.
pub fn validate_relations(
    registry: &OverrideRegistry,
    cache: &CopyCache,
) -> Result<(), Vec<MapError>> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for relation in registry.iter() {
        let pair = relation.pair();
        if !seen.insert(pair) {
            warn!(pair = %pair, "relation masquée par une relation enregistrée avant elle");
            continue;
        }
        if !relation.use_default_mapper() {
            continue;
        }

        let (source, target) = (relation.source(), relation.target());
        match cache.get_or_compile(pair, || ((source.describe)(), (target.describe)())) {
            Ok(copy) => {
                for skip in copy.skipped() {
                    warn!(
                        pair = %pair,
                        member = skip.member,
                        source_ty = %skip.source_ty,
                        target_ty = %skip.target_ty,
                        "membre ignoré : aucune règle de pont"
                    );
                }
            }
            Err(err) => errors.push(err),
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

impl Mapper {
    /// Valide les relations de ce mapper et remplit son cache
    pub fn validate(&self) -> Result<(), Vec<MapError>> {
        validate_relations(self.registry(), self.cache())
    }
}

// =============================================================================
// TESTS
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fixtures::{Person, PersonDto, PersonText};
    use crate::core::model::{Describe, Mappable, Member, TypeDescriptor};
    use crate::core::profile::ProfileBuilder;
    use crate::core::types::{TypeKey, TypePair};
    use std::any::Any;
    use std::sync::Arc;

    /// Type décrit à la main : `age` déclaré nullable, sans primitives
    #[derive(Debug, Clone, Default)]
    struct Legacy {
        age: Option<i32>,
    }

    impl Mappable for Legacy {
        fn type_key(&self) -> TypeKey {
            TypeKey::of::<Legacy>()
        }

        fn describe(&self) -> TypeDescriptor {
            Legacy::descriptor()
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }

        fn into_any(self: Box<Self>) -> Box<dyn Any> {
            self
        }
    }

    impl Describe for Legacy {
        fn descriptor() -> TypeDescriptor {
            TypeDescriptor::of::<Legacy>().member(
                Member::value::<Legacy, Option<i32>>("age", |o| &o.age, |o| &mut o.age)
                    .declare_nullable(TypeKey::of::<i32>()),
            )
        }
    }

    fn registry(configure: impl Fn(&mut ProfileBuilder)) -> OverrideRegistry {
        let mut builder = ProfileBuilder::new();
        configure(&mut builder);
        OverrideRegistry::from_relations(builder.into_relations())
    }

    #[test]
    fn test_valid_relations_warm_the_cache() {
        let registry = registry(|maps| {
            maps.create_map::<Person, PersonDto, _>(|_, _, _| Ok(()));
            maps.create_map::<Person, PersonText, _>(|_, _, _| Ok(()));
        });
        let cache = CopyCache::new();

        assert!(validate_relations(&registry, &cache).is_ok());
        assert!(cache.contains(&TypePair::of::<Person, PersonDto>()));
        assert!(cache.contains(&TypePair::of::<Person, PersonText>()));
    }

    #[test]
    fn test_all_compilation_errors_are_collected() {
        let registry = registry(|maps| {
            maps.create_map::<Legacy, PersonDto, _>(|_, _, _| Ok(()));
            maps.create_map::<Person, PersonDto, _>(|_, _, _| Ok(()));
            maps.create_map::<Legacy, PersonText, _>(|_, _, _| Ok(()));
        });
        let errors = validate_relations(&registry, &CopyCache::new()).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(matches!(&errors[0], MapError::Compilation { member, .. } if member == "age"));
    }

    #[test]
    fn test_custom_only_relations_are_not_compiled() {
        let registry = registry(|maps| {
            maps.create_map::<Legacy, PersonDto, _>(|_, _, _| Ok(()))
                .without_default_mapper();
        });
        let cache = CopyCache::new();
        assert!(validate_relations(&registry, &cache).is_ok());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_mapper_validate_uses_its_cache() {
        let registry = registry(|maps| {
            maps.create_map::<Person, PersonDto, _>(|_, _, _| Ok(()));
        });
        let mapper = Mapper::with_parts(Arc::new(registry), Arc::new(CopyCache::new()), None);
        mapper.validate().unwrap();
        assert_eq!(mapper.cache().len(), 1);
    }
}
