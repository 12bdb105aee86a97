// =============================================================================
// CORE — Le moteur de mapping
// =============================================================================
//
// Ce module regroupe tout le moteur, sans aucune entrée/sortie :
// pas de fichier, pas de configuration, uniquement des types, des
// copieurs et leur exécution.
//
// Architecture :
//   types      → identité des types et des paires (source, cible)
//   model      → la table des membres d'un type (macro `mappable!`)
//   introspect → membres éligibles et appariement par nom
//   list       → la capacité "liste ordonnée homogène"
//   compile    → le compilateur de copieurs structurels
//   cache      → un copieur par paire, compilé au premier usage
//   registry   → les relations personnalisées, premier enregistré gagnant
//   profile    → la déclaration des relations (create_map)
//   factory    → la création des instances cibles
//   mapper     → la façade : listes, relations, copie, récursion
//   validate   → la pré-compilation et la vérification au démarrage
//   error      → la taxonomie des erreurs
//
// =============================================================================

pub mod types;
pub mod error;
pub mod model;
pub mod introspect;
pub mod list;
pub mod compile;
pub mod cache;
pub mod registry;
pub mod profile;
pub mod factory;
pub mod mapper;
pub mod validate;

#[cfg(test)]
pub(crate) mod fixtures;
