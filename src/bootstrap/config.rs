// =============================================================================
// CONFIG — La configuration TOML du bootstrap
// =============================================================================
//
// FORMAT :
//
//   [mapper]
//   profiles = ["people", "orders"]   # noms du catalogue, dans cet ordre
//   shared_cache = true               # cache du processus (défaut) ou privé
//   validate_on_build = false         # pré-compiler et vérifier au build
//
// Les clés inconnues sont refusées : une faute de frappe dans un nom de
// clé est une erreur de configuration, pas un réglage ignoré.
//
// =============================================================================

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{MapError, MapResult};

/// Réglages du mapper construit au démarrage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MapperConfig {
    /// Profils à enregistrer, dans l'ordre d'enregistrement
    #[serde(default)]
    pub profiles: Vec<String>,

    #[serde(default = "default_shared_cache")]
    pub shared_cache: bool,

    #[serde(default)]
    pub validate_on_build: bool,
}

fn default_shared_cache() -> bool {
    true
}

impl Default for MapperConfig {
    fn default() -> Self {
        MapperConfig {
            profiles: Vec::new(),
            shared_cache: default_shared_cache(),
            validate_on_build: false,
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    mapper: MapperConfig,
}

impl MapperConfig {
    pub fn from_toml_str(contents: &str) -> MapResult<Self> {
        let file: ConfigFile = toml::from_str(contents)
            .map_err(|e| MapError::configuration_caused_by("configuration TOML invalide", e))?;
        Ok(file.mapper)
    }

    /// Charge la configuration depuis un fichier
    pub fn load(path: impl AsRef<Path>) -> MapResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            MapError::configuration_caused_by(format!("lecture de {} impossible", path.display()), e)
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn to_toml_string(&self) -> MapResult<String> {
        let file = ConfigFile {
            mapper: self.clone(),
        };
        toml::to_string(&file)
            .map_err(|e| MapError::configuration_caused_by("sérialisation TOML impossible", e))
    }
}
