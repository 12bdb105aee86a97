// =============================================================================
// INTROSPECT — Énumération et appariement des membres
// =============================================================================
//
// L'introspecteur répond à deux questions, sans état et sans effet :
//
//   1. Quels membres d'un type sont ÉLIGIBLES ?
//      - côté source : lisibles ET inscriptibles
//      - côté cible  : inscriptibles
//   2. Quelles PAIRES (membre source, membre cible) portent le même nom ?
//
// L'ordre des paires est l'ordre de déclaration des membres source :
// il est stable et déterministe pour un type donné, et c'est l'ordre
// dans lequel le copieur compilé exécutera ses copies.
//
// =============================================================================

use super::model::{Member, TypeDescriptor};

/// Deux membres de même nom, un de chaque côté
#[derive(Debug, Clone, Copy)]
pub struct MemberPair<'d> {
    pub source: &'d Member,
    pub target: &'d Member,
}

/// Membres éligibles comme source : lisibles et inscriptibles
pub fn source_members(desc: &TypeDescriptor) -> impl Iterator<Item = &Member> + '_ {
    desc.members
        .iter()
        .filter(|m| m.is_readable() && m.is_writable())
}

/// Membres éligibles comme cible : inscriptibles
pub fn target_members(desc: &TypeDescriptor) -> impl Iterator<Item = &Member> + '_ {
    desc.members.iter().filter(|m| m.is_writable())
}

/// Apparie par nom les membres éligibles des deux côtés.
pub fn pair_members<'d>(source: &'d TypeDescriptor, target: &'d TypeDescriptor) -> Vec<MemberPair<'d>> {
    source_members(source)
        .filter_map(|s| {
            target_members(target)
                .find(|t| t.name == s.name)
                .map(|t| MemberPair { source: s, target: t })
        })
        .collect()
}
