// =============================================================================
// COPYCAT — Moteur de mapping objet-objet en Rust
// =============================================================================
//
// Copycat copie des objets d'un type vers un autre (entité → DTO, DTO →
// entité...) sans code de copie écrit à la main : les membres de même nom
// sont appariés, et un COPIEUR est compilé une fois par paire de types.
//
// Architecture :
//   core/       → Le moteur pur (introspection, copieurs, registre, façade)
//   bootstrap/  → La construction du mapper (configuration, profils nommés)
//
// Concepts fondamentaux :
//   Mappable  = un type qui expose sa table des membres (macro `mappable!`)
//   Copieur   = la copie structurelle compilée d'une paire (S, T)
//   Relation  = une fonction personnalisée pour une paire, déclarée par
//               un profil (create_map), qui prime sur la copie seule
//   Mapper    = la façade : listes, relations, copie, récursion
//
// =============================================================================

pub mod core;
pub mod bootstrap;

pub use crate::bootstrap::catalog::ProfileCatalog;
pub use crate::bootstrap::config::MapperConfig;
pub use crate::bootstrap::MapperBuilder;
pub use crate::core::error::{BoxError, MapError, MapResult};
pub use crate::core::factory::{InstanceFactory, ServiceContainer};
pub use crate::core::list::DynList;
pub use crate::core::mapper::{Mapper, ObjectMapper, ObjectMapperExt};
pub use crate::core::model::{Describe, Mappable};
pub use crate::core::profile::{Profile, ProfileBuilder};
pub use crate::core::types::{TypeKey, TypePair};
