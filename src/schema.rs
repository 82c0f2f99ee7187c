//! Part-of-speech heading normalization, loaded from `schema/pos.yaml`.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use once_cell::sync::OnceCell;
use serde::Deserialize;
use tracing::{info, warn};

use crate::error::SchemaError;

#[derive(Debug, Deserialize)]
struct PosSchema {
    pos_classes: Vec<PosClass>,
}

#[derive(Debug, Deserialize)]
struct PosClass {
    code: String,
    #[allow(dead_code)]
    name: String,
    variants: Vec<String>,
}

/// Maps section headings ("Proper noun", "Verb") to coarse POS codes.
#[derive(Debug, Clone, Default)]
pub struct PosMap {
    map: HashMap<String, String>,
}

impl PosMap {
    pub fn from_yaml(contents: &str) -> Result<Self, serde_yaml::Error> {
        let schema: PosSchema = serde_yaml::from_str(contents)?;
        let mut map = HashMap::new();
        for pos_class in schema.pos_classes {
            map.insert(pos_class.code.to_lowercase(), pos_class.code.clone());
            for variant in pos_class.variants {
                map.insert(variant.trim().to_lowercase(), pos_class.code.clone());
            }
        }
        Ok(Self { map })
    }

    pub fn load(path: &Path) -> Result<Self, SchemaError> {
        let contents = fs::read_to_string(path).map_err(|source| SchemaError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&contents).map_err(|source| SchemaError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Coarse POS code for a heading; unknown headings are lowercased as is.
    pub fn normalize(&self, heading: &str) -> String {
        let key = heading.trim().to_lowercase();
        self.map.get(&key).cloned().unwrap_or(key)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

static POS_MAP: OnceCell<PosMap> = OnceCell::new();

fn find_schema_file() -> Option<PathBuf> {
    [PathBuf::from("schema/pos.yaml"), PathBuf::from("../schema/pos.yaml")]
        .into_iter()
        .find(|p| p.exists())
}

/// Load the global POS map. An explicit path must load; without one the
/// default locations are tried and a missing file leaves normalization
/// as plain lowercasing.
pub fn init_pos_map(schema_path: Option<&Path>) -> Result<(), SchemaError> {
    let map = match schema_path.map(Path::to_path_buf).or_else(find_schema_file) {
        Some(path) => {
            let map = PosMap::load(&path)?;
            info!(path = %path.display(), headings = map.len(), "loaded POS schema");
            map
        }
        None => {
            warn!("no POS schema found; part-of-speech headings will only be lowercased");
            PosMap::default()
        }
    };
    POS_MAP.set(map).map_err(|_| SchemaError::AlreadyInitialized)
}

/// The global POS map, empty if [`init_pos_map`] was never called.
pub fn pos_map() -> &'static PosMap {
    POS_MAP.get_or_init(PosMap::default)
}

#[cfg(test)]
mod schema_tests {
    use super::*;
    use std::io::Write;

    const SCHEMA: &str = r#"
pos_classes:
  - code: noun
    name: Noun
    variants: ["Noun", "Proper noun"]
  - code: adj
    name: Adjective
    variants: ["Adjective"]
"#;

    #[test]
    fn variants_map_to_code() {
        let map = PosMap::from_yaml(SCHEMA).unwrap();
        assert_eq!(map.normalize("Proper noun"), "noun");
        assert_eq!(map.normalize(" Adjective "), "adj");
        assert_eq!(map.normalize("adj"), "adj");
    }

    #[test]
    fn unknown_heading_is_lowercased() {
        let map = PosMap::from_yaml(SCHEMA).unwrap();
        assert_eq!(map.normalize("Verb"), "verb");
        assert_eq!(PosMap::default().normalize("Pronoun"), "pronoun");
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SCHEMA.as_bytes()).unwrap();
        let map = PosMap::load(file.path()).unwrap();
        assert_eq!(map.normalize("Noun"), "noun");
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = PosMap::load(Path::new("/nonexistent/pos.yaml")).unwrap_err();
        assert!(matches!(err, SchemaError::Read { .. }));
    }

    #[test]
    fn bad_yaml_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"pos_classes: 7").unwrap();
        assert!(matches!(PosMap::load(file.path()), Err(SchemaError::Parse { .. })));
    }
}
