// =============================================================================
// MAPPER — La façade publique du moteur
// =============================================================================
//
// Deux opérations :
//
//   map::<T>(source)         → crée un T (fabrique, sinon constructeur), puis
//                              map_into(source, &mut t), puis le rend
//   map_into(source, target) → modifie `target` en place
//
// ALGORITHME de map_into(source, target) :
//
//   1. source ET cible sont des listes → mapping élément par élément
//   2. sinon, recherche dans le registre de la relation (type(s), type(t)),
//      premier enregistré gagnant
//   3. pas de relation               → copie structurelle (via le cache)
//   4. relation + use_default_mapper → copie structurelle PUIS fonction perso
//   5. relation seule                → fonction perso seule
//   6. toute erreur d'exécution est enveloppée dans UNE erreur
//      d'invocation qui garde la cause ; aucun rollback
//
// LISTES : les éléments mappés sont AJOUTÉS à la fin de la liste cible,
// qui n'est jamais vidée. Mapper deux fois la même source dans la même
// cible duplique les éléments : ce n'est PAS une opération idempotente.
// Vider la cible avant l'appel reste à la charge de l'appelant.
//
// Le mapper est récursif : les étapes "mapping imbriqué" des copieurs et les
// fonctions personnalisées rappellent map_into à travers `&dyn ObjectMapper`.
//
// =============================================================================

use std::fmt;
use std::sync::Arc;

use tracing::trace;

use super::cache::CopyCache;
use super::compile::CompiledCopy;
use super::error::{ListSide, MapError, MapResult};
use super::factory::InstanceFactory;
use super::list::ListView;
use super::model::{Describe, Mappable, ModelRef, TypeDescriptor};
use super::registry::{MappingRelation, OverrideRegistry};
use super::types::{TypeKey, TypePair};

/// La capacité "mapper" vue des copieurs et des fonctions personnalisées.
pub trait ObjectMapper: Send + Sync {
    /// Mappe `source` dans `target`, en place
    fn map_into(&self, source: &dyn Mappable, target: &mut dyn Mappable) -> MapResult<()>;

    /// Crée une instance neuve du type `model`
    fn instantiate(&self, model: ModelRef) -> MapResult<Box<dyn Mappable>>;
}

/// La forme typée `map::<T>(source)`, disponible pour tout `ObjectMapper`.
pub trait ObjectMapperExt: ObjectMapper {
    /// Crée un `T` et y mappe `source`.
    ///
    /// L'instance rendue peut n'être que partiellement remplie : les membres
    /// sans règle de pont gardent leur valeur de construction.
    fn map<T: Describe>(&self, source: &dyn Mappable) -> MapResult<T> {
        let model = ModelRef::of::<T>();
        let mut target = self.instantiate(model)?;
        self.map_into(source, &mut *target)?;
        target
            .into_any()
            .downcast::<T>()
            .map(|target| *target)
            .map_err(|_| MapError::construction(model.key, "instance de type inattendu"))
    }
}

impl<M: ObjectMapper + ?Sized> ObjectMapperExt for M {}

/// Ce qu'il faut exécuter pour une paire de types, résolu une fois par appel
/// (ou une fois pour toute une liste).
enum Plan<'m> {
    Structural(Arc<CompiledCopy>),
    Custom {
        relation: &'m MappingRelation,
        structural: Option<Arc<CompiledCopy>>,
    },
}

/// Le mapper : registre de relations + cache de copieurs + fabrique optionnelle.
///
/// Clonable à faible coût et partageable entre threads.
#[derive(Clone)]
pub struct Mapper {
    registry: Arc<OverrideRegistry>,
    cache: Arc<CopyCache>,
    factory: Option<Arc<dyn InstanceFactory>>,
}

impl Mapper {
    /// Mapper sans relation personnalisée, sur le cache du processus
    pub fn new() -> Self {
        Mapper {
            registry: Arc::new(OverrideRegistry::new()),
            cache: CopyCache::global(),
            factory: None,
        }
    }

    pub fn with_parts(
        registry: Arc<OverrideRegistry>,
        cache: Arc<CopyCache>,
        factory: Option<Arc<dyn InstanceFactory>>,
    ) -> Self {
        Mapper {
            registry,
            cache,
            factory,
        }
    }

    pub fn registry(&self) -> &OverrideRegistry {
        &self.registry
    }

    pub fn cache(&self) -> &Arc<CopyCache> {
        &self.cache
    }

    /// Le copieur structurel d'une paire, compilé au besoin (inspection)
    pub fn plan(
        &self,
        source: &TypeDescriptor,
        target: &TypeDescriptor,
    ) -> MapResult<Arc<CompiledCopy>> {
        self.cache
            .get_or_compile(TypePair::new(source.key, target.key), || {
                (source.clone(), target.clone())
            })
    }

    fn resolve<F>(&self, pair: TypePair, describe: F) -> MapResult<Plan<'_>>
    where
        F: FnOnce() -> (TypeDescriptor, TypeDescriptor),
    {
        match self.registry.find(&pair) {
            None => Ok(Plan::Structural(self.cache.get_or_compile(pair, describe)?)),
            Some(relation) if relation.use_default_mapper() => Ok(Plan::Custom {
                relation,
                structural: Some(self.cache.get_or_compile(pair, describe)?),
            }),
            Some(relation) => Ok(Plan::Custom {
                relation,
                structural: None,
            }),
        }
    }

    fn execute(
        &self,
        plan: &Plan<'_>,
        source: &dyn Mappable,
        target: &mut dyn Mappable,
    ) -> MapResult<()> {
        match plan {
            Plan::Structural(copy) => copy
                .run(source, target, self)
                .map_err(|e| MapError::invocation(copy.pair(), e)),
            Plan::Custom {
                relation,
                structural,
            } => {
                if let Some(copy) = structural {
                    copy.run(source, target, self)
                        .map_err(|e| MapError::invocation(copy.pair(), e))?;
                }
                relation
                    .invoke(self, source, target)
                    .map_err(|e| MapError::invocation(relation.pair(), e))
            }
        }
    }

    fn map_list(
        &self,
        source: &dyn ListView,
        source_key: TypeKey,
        target: &mut dyn ListView,
        target_key: TypeKey,
    ) -> MapResult<()> {
        let source_item = source.element_type().ok_or(MapError::ListElementType {
            list: source_key,
            side: ListSide::Source,
        })?;
        let target_item = target.element_type().ok_or(MapError::ListElementType {
            list: target_key,
            side: ListSide::Target,
        })?;

        let pair = TypePair::new(source_item.key, target_item.key);
        let plan = self.resolve(pair, || {
            ((source_item.describe)(), (target_item.describe)())
        })?;
        trace!(pair = %pair, items = source.len(), "mapping de liste");

        for index in 0..source.len() {
            let mapped = match source.item(index) {
                None => None,
                Some(item) => {
                    let mut fresh = self.instantiate(target_item)?;
                    if item.as_list().is_some() {
                        self.map_into(item, &mut *fresh)?;
                    } else {
                        self.execute(&plan, item, &mut *fresh)?;
                    }
                    Some(fresh)
                }
            };
            if !target.push_item(mapped) {
                return Err(MapError::invocation(
                    pair,
                    format!("élément {} refusé par la liste {}", index, target_key),
                ));
            }
        }
        Ok(())
    }
}

impl Default for Mapper {
    fn default() -> Self {
        Mapper::new()
    }
}

impl fmt::Debug for Mapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mapper")
            .field("relations", &self.registry.len())
            .field("compiled", &self.cache.len())
            .field("factory", &self.factory.is_some())
            .finish()
    }
}

impl ObjectMapper for Mapper {
    fn map_into(&self, source: &dyn Mappable, target: &mut dyn Mappable) -> MapResult<()> {
        let source_key = source.type_key();
        let target_key = target.type_key();

        if let Some(source_list) = source.as_list() {
            if let Some(target_list) = target.as_list_mut() {
                return self.map_list(source_list, source_key, target_list, target_key);
            }
        }

        let pair = TypePair::new(source_key, target_key);
        let plan = self.resolve(pair, || (source.describe(), target.describe()))?;
        let path = match &plan {
            Plan::Structural(_) => "structurel",
            Plan::Custom {
                structural: Some(_),
                ..
            } => "structurel + personnalisé",
            Plan::Custom {
                structural: None, ..
            } => "personnalisé",
        };
        trace!(pair = %pair, path, "mapping");
        self.execute(&plan, source, target)
    }

    fn instantiate(&self, model: ModelRef) -> MapResult<Box<dyn Mappable>> {
        if let Some(created) = self.factory.as_ref().and_then(|f| f.create(model.key)) {
            let instance = created.map_err(|e| MapError::construction(model.key, e))?;
            if instance.type_key() != model.key {
                return Err(MapError::construction(
                    model.key,
                    format!("la fabrique a produit un {}", instance.type_key()),
                ));
            }
            return Ok(instance);
        }
        match model.construct() {
            Some(construct) => Ok(construct()),
            None => Err(MapError::construction(
                model.key,
                "aucun constructeur sans paramètre",
            )),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::BoxError;
    use crate::core::factory::ServiceContainer;
    use crate::core::fixtures::{
        Address, AddressDto, Basket, BasketDto, Line, LineDto, Order, OrderDto, Person,
        PersonDto,
    };
    use crate::core::list::DynList;
    use crate::core::profile::{Profile, ProfileBuilder};
    use proptest::prelude::*;
    use std::error::Error as _;

    fn mapper_with(profile: &dyn Profile) -> Mapper {
        let mut builder = ProfileBuilder::new();
        builder.apply(profile);
        Mapper::with_parts(
            Arc::new(OverrideRegistry::from_relations(builder.into_relations())),
            Arc::new(CopyCache::new()),
            None,
        )
    }

    fn alice() -> Person {
        Person {
            age: Some(30),
            ..Person::named("Alice")
        }
    }

    // -- Copie structurelle ---------------------------------------------------

    #[test]
    fn test_alice_into_fresh_dto() {
        let dto: PersonDto = Mapper::new().map(&alice()).unwrap();
        assert_eq!(dto.name, "Alice");
        assert_eq!(dto.age, 30);
    }

    #[test]
    fn test_bob_absent_age_keeps_previous_value() {
        let bob = Person::named("Bob");
        let mut dto = PersonDto {
            age: 99,
            ..PersonDto::default()
        };
        Mapper::new().map_into(&bob, &mut dto).unwrap();
        assert_eq!(dto.name, "Bob");
        assert_eq!(dto.age, 99);
    }

    #[test]
    fn test_wrap_into_nullable_member() {
        let dto = PersonDto {
            name: "Chloé".into(),
            age: 41,
            ..PersonDto::default()
        };
        let person: Person = Mapper::new().map(&dto).unwrap();
        assert_eq!(person.age, Some(41));
    }

    #[test]
    fn test_readonly_member_never_written() {
        let dto = PersonDto {
            id: 12,
            ..PersonDto::default()
        };
        let mut person = Person {
            id: 5,
            ..Person::default()
        };
        Mapper::new().map_into(&dto, &mut person).unwrap();
        assert_eq!(person.id, 5);
    }

    // -- Mapping imbriqué -----------------------------------------------------

    #[test]
    fn test_nested_absent_source_leaves_target_untouched() {
        let existing = AddressDto {
            city: "Brest".into(),
            zip: Some(29200),
        };
        let mut dto = PersonDto {
            address: Some(existing.clone()),
            ..PersonDto::default()
        };
        let before = dto.address.as_ref().map(|a| a as *const AddressDto);

        Mapper::new().map_into(&Person::named("A"), &mut dto).unwrap();

        assert_eq!(dto.address.as_ref().map(|a| a as *const AddressDto), before);
        assert_eq!(dto.address, Some(existing));
    }

    #[test]
    fn test_nested_absent_target_gets_new_instance() {
        let dto = PersonDto {
            address: Some(AddressDto {
                city: "Lille".into(),
                zip: Some(59000),
            }),
            ..PersonDto::default()
        };
        let mut person = Person::default();
        Mapper::new().map_into(&dto, &mut person).unwrap();
        assert_eq!(
            person.address,
            Some(Address {
                city: "Lille".into(),
                zip: 59000
            })
        );
    }

    #[test]
    fn test_nested_present_target_is_merged_in_place() {
        let dto = PersonDto {
            address: Some(AddressDto {
                city: "Roubaix".into(),
                zip: None,
            }),
            ..PersonDto::default()
        };
        let mut person = Person {
            address: Some(Address {
                city: "Lille".into(),
                zip: 59000,
            }),
            ..Person::default()
        };
        let before = person.address.as_ref().map(|a| a as *const Address);

        Mapper::new().map_into(&dto, &mut person).unwrap();

        // même instance, modifiée en place
        assert_eq!(person.address.as_ref().map(|a| a as *const Address), before);
        // un remplacement aurait remis `zip` à 0
        assert_eq!(
            person.address,
            Some(Address {
                city: "Roubaix".into(),
                zip: 59000
            })
        );
    }

    // -- Listes ---------------------------------------------------------------

    #[test]
    fn test_list_keeps_order_and_holes() {
        let source = vec![Some(Line::new("A1", 1)), None, Some(Line::new("A2", 2))];
        let mut target: Vec<Option<LineDto>> = Vec::new();

        Mapper::new().map_into(&source, &mut target).unwrap();

        assert_eq!(
            target,
            vec![
                Some(LineDto {
                    sku: "A1".into(),
                    quantity: Some(1)
                }),
                None,
                Some(LineDto {
                    sku: "A2".into(),
                    quantity: Some(2)
                }),
            ]
        );
    }

    #[test]
    fn test_embedded_list_member() {
        let order = Order {
            number: "C-7".into(),
            lines: vec![Some(Line::new("X", 3)), None],
        };
        let dto: OrderDto = Mapper::new().map(&order).unwrap();
        assert_eq!(dto.number, "C-7");
        assert_eq!(dto.lines.len(), 2);
        assert_eq!(dto.lines[0].as_ref().unwrap().quantity, Some(3));
        assert!(dto.lines[1].is_none());
    }

    #[test]
    fn test_plain_vec_member_is_mapped_item_by_item() {
        let basket = Basket {
            items: vec![Line::new("A", 1), Line::new("B", 2)],
        };
        let dto: BasketDto = Mapper::new().map(&basket).unwrap();
        assert_eq!(
            dto.items,
            vec![
                LineDto {
                    sku: "A".into(),
                    quantity: Some(1)
                },
                LineDto {
                    sku: "B".into(),
                    quantity: Some(2)
                },
            ]
        );
    }

    #[test]
    fn test_hole_cannot_enter_a_plain_vec() {
        let source = vec![Some(Line::new("A", 1)), None];
        let mut target: Vec<LineDto> = Vec::new();

        let err = Mapper::new().map_into(&source, &mut target).unwrap_err();
        assert!(matches!(err, MapError::Invocation { .. }));
        // aucun rollback : le premier élément reste
        assert_eq!(target.len(), 1);
    }

    #[test]
    fn test_list_append_is_not_idempotent() {
        let order = Order {
            number: "C-8".into(),
            lines: vec![Some(Line::new("X", 1)), Some(Line::new("Y", 2))],
        };
        let mapper = Mapper::new();
        let mut dto = OrderDto::default();
        mapper.map_into(&order, &mut dto).unwrap();
        mapper.map_into(&order, &mut dto).unwrap();
        // la liste cible est complétée, jamais vidée
        assert_eq!(dto.lines.len(), 4);
        assert_eq!(dto.lines[2].as_ref().unwrap().sku, "X");
    }

    #[test]
    fn test_dyn_list_mapping() {
        let mut source = DynList::of::<Line>();
        source.push(Some(Box::new(Line::new("D", 4))));
        source.push(None);
        let mut target = DynList::of::<LineDto>();

        Mapper::new().map_into(&source, &mut target).unwrap();

        assert_eq!(target.len(), 2);
        assert_eq!(target.get_as::<LineDto>(0).unwrap().quantity, Some(4));
        assert!(target.get(1).is_none());
    }

    #[test]
    fn test_untyped_list_is_rejected_before_any_item() {
        let mut source = DynList::untyped();
        source.push(Some(Box::new(Line::new("D", 4))));
        let mut target = DynList::of::<LineDto>();

        let err = Mapper::new().map_into(&source, &mut target).unwrap_err();
        assert!(matches!(
            err,
            MapError::ListElementType {
                side: ListSide::Source,
                ..
            }
        ));
        assert!(target.is_empty());

        let source = vec![Some(Line::new("E", 1))];
        let mut target = DynList::untyped();
        let err = Mapper::new().map_into(&source, &mut target).unwrap_err();
        assert!(matches!(
            err,
            MapError::ListElementType {
                side: ListSide::Target,
                ..
            }
        ));
    }

    // -- Relations personnalisées ---------------------------------------------

    #[test]
    fn test_custom_only_touches_what_it_sets() {
        let mapper = mapper_with(&|maps: &mut ProfileBuilder| {
            maps.create_map::<Person, PersonDto, _>(|_, src, dst| {
                dst.nickname = format!("~{}", src.name);
                Ok(())
            })
            .without_default_mapper();
        });
        let mut dto = PersonDto {
            name: "garde".into(),
            age: 7,
            ..PersonDto::default()
        };

        mapper.map_into(&alice(), &mut dto).unwrap();

        assert_eq!(dto.nickname, "~Alice");
        assert_eq!(dto.name, "garde");
        assert_eq!(dto.age, 7);
    }

    #[test]
    fn test_structural_copy_runs_before_custom() {
        let mapper = mapper_with(&|maps: &mut ProfileBuilder| {
            maps.create_map::<Person, PersonDto, _>(|_, _, dst| {
                dst.nickname = dst.name.to_lowercase();
                Ok(())
            });
        });
        let dto: PersonDto = mapper.map(&alice()).unwrap();
        assert_eq!(dto.age, 30);
        assert_eq!(dto.nickname, "alice");
    }

    #[test]
    fn test_first_registered_relation_is_used() {
        let mapper = mapper_with(&|maps: &mut ProfileBuilder| {
            maps.create_map::<Person, PersonDto, _>(|_, _, dst| {
                dst.nickname = "premier".into();
                Ok(())
            });
            maps.create_map::<Person, PersonDto, _>(|_, _, dst| {
                dst.nickname = "second".into();
                Ok(())
            });
        });
        let dto: PersonDto = mapper.map(&alice()).unwrap();
        assert_eq!(dto.nickname, "premier");
    }

    #[test]
    fn test_custom_function_can_recurse() {
        let mapper = mapper_with(&|maps: &mut ProfileBuilder| {
            maps.create_map::<Order, OrderDto, _>(|mapper, src, dst| {
                dst.number = format!("CMD-{}", src.number);
                mapper.map_into(&src.lines, &mut dst.lines)?;
                Ok(())
            })
            .without_default_mapper();
        });
        let order = Order {
            number: "12".into(),
            lines: vec![Some(Line::new("Z", 9))],
        };
        let dto: OrderDto = mapper.map(&order).unwrap();
        assert_eq!(dto.number, "CMD-12");
        assert_eq!(dto.lines[0].as_ref().unwrap().quantity, Some(9));
    }

    #[test]
    fn test_custom_error_is_wrapped_with_cause() {
        let mapper = mapper_with(&|maps: &mut ProfileBuilder| {
            maps.create_map::<Person, PersonDto, _>(|_, _, _| Err("âge refusé".into()));
        });
        let mut dto = PersonDto::default();
        let err = mapper.map_into(&alice(), &mut dto).unwrap_err();

        match &err {
            MapError::Invocation { pair, .. } => {
                assert_eq!(*pair, TypePair::of::<Person, PersonDto>())
            }
            other => panic!("erreur inattendue : {}", other),
        }
        assert_eq!(err.source().unwrap().to_string(), "âge refusé");
        // pas de rollback : la copie structurelle a déjà eu lieu
        assert_eq!(dto.name, "Alice");
    }

    #[test]
    fn test_nested_failure_surfaces_as_invocation() {
        let mapper = mapper_with(&|maps: &mut ProfileBuilder| {
            maps.create_map::<Address, AddressDto, _>(|_, _, _| Err("ville inconnue".into()));
        });
        let person = Person {
            address: Some(Address::at("Nulle-part")),
            ..Person::named("A")
        };
        let err = mapper.map::<PersonDto>(&person).unwrap_err();
        assert!(matches!(err, MapError::Invocation { .. }));
    }

    // -- Idempotence ----------------------------------------------------------

    #[test]
    fn test_mapping_twice_equals_mapping_once() {
        let source = Person {
            address: Some(Address::at("Metz")),
            tags: vec!["vip".into()],
            ..alice()
        };
        let mapper = Mapper::new();
        let mut once = PersonDto::default();
        mapper.map_into(&source, &mut once).unwrap();
        let mut twice = once.clone();
        mapper.map_into(&source, &mut twice).unwrap();
        assert_eq!(once, twice);
    }

    // -- Fabrique ---------------------------------------------------------------

    #[test]
    fn test_factory_is_used_for_targets() {
        let mut services = ServiceContainer::new();
        services.register_model::<PersonDto, _>(|_| {
            Ok(PersonDto {
                nickname: "fabrique".into(),
                ..PersonDto::default()
            })
        });
        let mapper = Mapper::with_parts(
            Arc::new(OverrideRegistry::new()),
            Arc::new(CopyCache::new()),
            Some(Arc::new(services)),
        );
        let dto: PersonDto = mapper.map(&alice()).unwrap();
        assert_eq!(dto.name, "Alice");
        assert_eq!(dto.nickname, "fabrique");
    }

    #[test]
    fn test_factory_failure_propagates() {
        struct Broken;
        impl InstanceFactory for Broken {
            fn create(&self, _ty: TypeKey) -> Option<Result<Box<dyn Mappable>, BoxError>> {
                Some(Err("plus de mémoire".into()))
            }
        }
        let mapper = Mapper::with_parts(
            Arc::new(OverrideRegistry::new()),
            Arc::new(CopyCache::new()),
            Some(Arc::new(Broken)),
        );
        let err = mapper.map::<PersonDto>(&alice()).unwrap_err();
        assert!(matches!(err, MapError::Construction { .. }));
    }

    #[test]
    fn test_factory_producing_wrong_type_is_rejected() {
        struct Confused;
        impl InstanceFactory for Confused {
            fn create(&self, _ty: TypeKey) -> Option<Result<Box<dyn Mappable>, BoxError>> {
                Some(Ok(Box::new(Address::default())))
            }
        }
        let mapper = Mapper::with_parts(
            Arc::new(OverrideRegistry::new()),
            Arc::new(CopyCache::new()),
            Some(Arc::new(Confused)),
        );
        let err = mapper.map::<PersonDto>(&alice()).unwrap_err();
        assert!(err.to_string().contains("PersonDto"));
    }

    // -- Partage ----------------------------------------------------------------

    #[test]
    fn test_default_mapper_uses_process_cache() {
        let mapper = Mapper::new();
        assert!(Arc::ptr_eq(mapper.cache(), &CopyCache::global()));
    }

    #[test]
    fn test_mapper_is_shared_across_threads() {
        let mapper = Mapper::new();
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let mapper = mapper.clone();
                std::thread::spawn(move || {
                    let source = Person {
                        age: Some(i),
                        ..Person::named("T")
                    };
                    mapper.map::<PersonDto>(&source).map(|dto| dto.age)
                })
            })
            .collect();
        let mut ages: Vec<_> = handles
            .into_iter()
            .map(|h| h.join().unwrap().unwrap())
            .collect();
        ages.sort();
        assert_eq!(ages, vec![0, 1, 2, 3]);
    }

    proptest! {
        #[test]
        fn prop_same_typed_members_are_copied(
            name in ".{0,16}",
            tags in proptest::collection::vec("[a-z]{1,6}", 0..4),
        ) {
            let source = Person { name: name.clone(), tags: tags.clone(), ..Person::default() };
            let dto: PersonDto = Mapper::new().map(&source).unwrap();
            prop_assert_eq!(dto.name, name);
            prop_assert_eq!(dto.tags, tags);
        }

        #[test]
        fn prop_list_mapping_preserves_length_and_order(
            items in proptest::collection::vec(proptest::option::of(("[A-Z]{1,4}", 0u32..100)), 0..12),
        ) {
            let source: Vec<Option<Line>> = items
                .iter()
                .map(|item| item.as_ref().map(|(sku, qty)| Line::new(sku, *qty)))
                .collect();
            let mut target: Vec<Option<LineDto>> = Vec::new();
            Mapper::new().map_into(&source, &mut target).unwrap();

            prop_assert_eq!(target.len(), source.len());
            for (src, dst) in source.iter().zip(&target) {
                match (src, dst) {
                    (Some(src), Some(dst)) => {
                        prop_assert_eq!(&dst.sku, &src.sku);
                        prop_assert_eq!(dst.quantity, Some(src.quantity));
                    }
                    (None, None) => {}
                    _ => prop_assert!(false, "trou déplacé"),
                }
            }
        }
    }
}
