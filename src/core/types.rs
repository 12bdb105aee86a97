// =============================================================================
// TYPES — Identité des types et paires (source, cible)
// =============================================================================
//
// Tout le moteur raisonne sur des PAIRES DE TYPES : "comment copier un
// Person vers un PersonDto ?". La paire est la clé du cache des copieurs
// compilés ET de la recherche dans le registre des surcharges.
//
// Une paire est ORDONNÉE :
//   (Person, PersonDto) ≠ (PersonDto, Person)
// Copier dans un sens ne dit rien sur l'autre sens.
//
// L'identité d'un type est son `TypeId` ; le nom (`type_name`) ne sert
// qu'à l'affichage et aux messages d'erreur.
//
// =============================================================================

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Identité d'un type Rust, avec son nom lisible.
///
/// Deux `TypeKey` sont égales si et seulement si leurs `TypeId` le sont.
#[derive(Debug, Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    pub fn of<T: Any + ?Sized>() -> Self {
        TypeKey {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Nom complet, chemins de modules compris
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Nom sans les chemins de modules : `Option<alloc::string::String>` → `Option<String>`
    pub fn short_name(&self) -> String {
        let mut out = String::with_capacity(self.name.len());
        let mut segment = String::new();
        for c in self.name.chars() {
            match c {
                '<' | '>' | ',' | ' ' | '(' | ')' | '[' | ']' | ';' | '&' => {
                    out.push_str(last_path_segment(&segment));
                    segment.clear();
                    out.push(c);
                }
                _ => segment.push(c),
            }
        }
        out.push_str(last_path_segment(&segment));
        out
    }
}

fn last_path_segment(path: &str) -> &str {
    path.rsplit("::").next().unwrap_or(path)
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short_name())
    }
}

/// Une paire ordonnée (type source, type cible).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypePair {
    pub source: TypeKey,
    pub target: TypeKey,
}

impl TypePair {
    pub fn new(source: TypeKey, target: TypeKey) -> Self {
        TypePair { source, target }
    }

    pub fn of<S: Any + ?Sized, T: Any + ?Sized>() -> Self {
        TypePair::new(TypeKey::of::<S>(), TypeKey::of::<T>())
    }

    /// La paire dans l'autre sens (cible → source)
    pub fn reversed(&self) -> Self {
        TypePair::new(self.target, self.source)
    }
}

impl fmt::Display for TypePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source, self.target)
    }
}
