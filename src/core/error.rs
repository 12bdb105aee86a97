// =============================================================================
// ERROR — Taxonomie des erreurs du moteur de mapping
// =============================================================================
//
// Cinq familles d'erreurs, toutes remontées telles quelles à l'appelant
// (aucune n'est réessayée, aucune n'est avalée) :
//
//   Configuration   → un profil déclaré est introuvable / inconstructible
//                     (au bootstrap, avant tout mapping)
//   Compilation     → le copieur structurel d'une paire ne peut pas être
//                     synthétisé (au premier usage de la paire)
//   Invocation      → une erreur pendant l'exécution d'un copieur ou d'une
//                     fonction personnalisée ; la cause est conservée
//   ListElementType → le type d'élément d'une liste est inconnu
//   Construction    → la fabrique n'a pas pu créer l'instance cible
//
// Aucun rollback : une cible peut rester partiellement modifiée après un
// échec. Pour de l'atomicité, mapper dans une instance jetable.
//
// =============================================================================

use thiserror::Error;

use super::types::{TypeKey, TypePair};

/// Erreur opaque venant du code utilisateur (fonctions personnalisées, fabriques)
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Côté d'une liste dont le type d'élément est inconnu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListSide {
    Source,
    Target,
}

impl std::fmt::Display for ListSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListSide::Source => write!(f, "source"),
            ListSide::Target => write!(f, "cible"),
        }
    }
}

/// Erreurs du moteur de mapping
#[derive(Debug, Error)]
pub enum MapError {
    #[error("configuration invalide : {message}")]
    Configuration {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    #[error("impossible de compiler le copieur {pair} : membre `{member}` ({reason})")]
    Compilation {
        pair: TypePair,
        member: String,
        reason: String,
    },

    #[error("échec du mapping {pair}")]
    Invocation {
        pair: TypePair,
        #[source]
        source: BoxError,
    },

    #[error("type d'élément introuvable pour la liste {side} {list}")]
    ListElementType { list: TypeKey, side: ListSide },

    #[error("impossible de construire une instance de {ty}")]
    Construction {
        ty: TypeKey,
        #[source]
        source: BoxError,
    },
}

impl MapError {
    pub fn configuration(message: impl Into<String>) -> Self {
        MapError::Configuration {
            message: message.into(),
            source: None,
        }
    }

    pub fn configuration_caused_by(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        MapError::Configuration {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    pub fn invocation(pair: TypePair, source: impl Into<BoxError>) -> Self {
        MapError::Invocation {
            pair,
            source: source.into(),
        }
    }

    pub fn construction(ty: TypeKey, source: impl Into<BoxError>) -> Self {
        MapError::Construction {
            ty,
            source: source.into(),
        }
    }
}

/// Résultat des opérations de mapping
pub type MapResult<T> = std::result::Result<T, MapError>;
