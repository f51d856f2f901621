//! Static catalog of supported icons, color palettes and the sample text.
//! Loaded once at startup and shared read-only afterwards.

use crate::constants::BUNDLED_CATALOG;
use indexmap::IndexMap;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid catalog: {0}")]
    Invalid(String),
}

/// Palette taxonomy: type -> label, and type -> (palette name -> label)
#[derive(Debug, Clone, Deserialize)]
pub struct PaletteCatalog {
    types: IndexMap<String, String>,
    colors: IndexMap<String, IndexMap<String, String>>,
}

/// Supported icon identifiers, in display order
#[derive(Debug, Clone)]
pub struct IconCatalog {
    icons: Vec<String>,
    default_index: usize,
}

/// On-disk layout of the definition file
#[derive(Deserialize)]
struct CatalogFile {
    cmaps: PaletteCatalog,
    supported_icons: Vec<String>,
    #[serde(default)]
    default_icon: Option<String>,
    initial_text: String,
}

#[derive(Debug, Clone)]
pub struct Catalog {
    palettes: PaletteCatalog,
    icons: IconCatalog,
    initial_text: String,
}

impl Catalog {
    /// Catalog compiled into the binary
    pub fn bundled() -> Result<Self, CatalogError> {
        Self::from_json(BUNDLED_CATALOG)
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json(&json)?;
        debug!(path = %path.display(), "Catalog loaded");
        Ok(catalog)
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Self::from_file(file)
    }

    fn from_file(file: CatalogFile) -> Result<Self, CatalogError> {
        let CatalogFile {
            cmaps,
            supported_icons,
            default_icon,
            initial_text,
        } = file;

        if supported_icons.is_empty() {
            return Err(CatalogError::Invalid("no supported icons".into()));
        }
        if cmaps.types.is_empty() {
            return Err(CatalogError::Invalid("no palette types".into()));
        }
        for key in cmaps.types.keys() {
            match cmaps.colors.get(key) {
                Some(names) if !names.is_empty() => {}
                Some(_) => {
                    return Err(CatalogError::Invalid(format!(
                        "palette type '{}' has no palettes",
                        key
                    )))
                }
                None => {
                    return Err(CatalogError::Invalid(format!(
                        "palette type '{}' is missing from cmaps.colors",
                        key
                    )))
                }
            }
        }
        if let Some(orphan) = cmaps.colors.keys().find(|k| !cmaps.types.contains_key(*k)) {
            return Err(CatalogError::Invalid(format!(
                "cmaps.colors lists undeclared palette type '{}'",
                orphan
            )));
        }

        let default_index = match default_icon {
            Some(name) => supported_icons
                .iter()
                .position(|icon| *icon == name)
                .ok_or_else(|| {
                    CatalogError::Invalid(format!("default icon '{}' is not supported", name))
                })?,
            None => 0,
        };

        Ok(Self {
            palettes: cmaps,
            icons: IconCatalog {
                icons: supported_icons,
                default_index,
            },
            initial_text,
        })
    }

    pub fn palettes(&self) -> &PaletteCatalog {
        &self.palettes
    }

    pub fn icons(&self) -> &IconCatalog {
        &self.icons
    }

    pub fn initial_text(&self) -> &str {
        &self.initial_text
    }

    pub fn has_icon(&self, icon: &str) -> bool {
        self.icons.contains(icon)
    }

    pub fn default_icon(&self) -> &str {
        self.icons.default_icon()
    }
}

impl PaletteCatalog {
    /// (key, label) pairs in definition order
    pub fn types(&self) -> impl Iterator<Item = (&str, &str)> {
        self.types.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// (name, label) pairs for one palette type, `None` if the type is unknown
    pub fn names(&self, palette_type: &str) -> Option<impl Iterator<Item = (&str, &str)>> {
        self.colors
            .get(palette_type)
            .map(|names| names.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }

    pub fn first_type(&self) -> &str {
        // Non-empty, checked at load
        self.types.keys().next().map(String::as_str).unwrap_or_default()
    }

    pub fn first_name(&self, palette_type: &str) -> Option<&str> {
        self.colors
            .get(palette_type)
            .and_then(|names| names.keys().next())
            .map(String::as_str)
    }

    pub fn has_type(&self, palette_type: &str) -> bool {
        self.types.contains_key(palette_type)
    }

    pub fn has_palette(&self, palette_type: &str, name: &str) -> bool {
        self.colors
            .get(palette_type)
            .is_some_and(|names| names.contains_key(name))
    }

    pub fn type_label(&self, palette_type: &str) -> Option<&str> {
        self.types.get(palette_type).map(String::as_str)
    }

    pub fn palette_label(&self, palette_type: &str, name: &str) -> Option<&str> {
        self.colors
            .get(palette_type)
            .and_then(|names| names.get(name))
            .map(String::as_str)
    }
}

impl IconCatalog {
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.icons.iter().map(String::as_str)
    }

    pub fn contains(&self, icon: &str) -> bool {
        self.icons.iter().any(|i| i == icon)
    }

    pub fn default_icon(&self) -> &str {
        &self.icons[self.default_index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"{
        "cmaps": {
            "types": { "qualitative": "Qualitative", "sequential": "Sequential" },
            "colors": {
                "qualitative": { "Bold": "Bold", "Safe": "Colorblind Safe" },
                "sequential": { "Mint": "Mint" }
            }
        },
        "supported_icons": ["cloud", "heart"],
        "initial_text": "hello"
    }"#;

    #[test]
    fn bundled_catalog_is_valid() {
        let catalog = Catalog::bundled().unwrap();
        assert!(catalog.icons().iter().count() > 10);
        assert!(catalog.has_icon("heart"));
        assert!(catalog.palettes().has_palette("qualitative", "Bold"));
        assert!(!catalog.initial_text().is_empty());
        assert!(catalog.has_icon(catalog.default_icon()));
    }

    #[test]
    fn preserves_definition_order() {
        let catalog = Catalog::from_json(MINIMAL).unwrap();
        let types: Vec<_> = catalog.palettes().types().map(|(k, _)| k).collect();
        assert_eq!(types, ["qualitative", "sequential"]);
        let names: Vec<_> = catalog
            .palettes()
            .names("qualitative")
            .unwrap()
            .collect();
        assert_eq!(names, [("Bold", "Bold"), ("Safe", "Colorblind Safe")]);
        assert_eq!(catalog.palettes().first_type(), "qualitative");
        assert_eq!(catalog.palettes().first_name("sequential"), Some("Mint"));
    }

    #[test]
    fn default_icon_falls_back_to_first() {
        let catalog = Catalog::from_json(MINIMAL).unwrap();
        assert_eq!(catalog.default_icon(), "cloud");
    }

    #[test]
    fn label_lookups_are_optional() {
        let catalog = Catalog::from_json(MINIMAL).unwrap();
        let palettes = catalog.palettes();
        assert_eq!(palettes.type_label("qualitative"), Some("Qualitative"));
        assert_eq!(palettes.type_label("nope"), None);
        assert_eq!(palettes.palette_label("qualitative", "Safe"), Some("Colorblind Safe"));
        assert_eq!(palettes.palette_label("sequential", "Safe"), None);
        assert!(palettes.names("nope").is_none());
    }

    #[test]
    fn rejects_type_without_palettes() {
        let json = MINIMAL.replace(r#""sequential": { "Mint": "Mint" }"#, r#""sequential": {}"#);
        assert!(matches!(
            Catalog::from_json(&json),
            Err(CatalogError::Invalid(_))
        ));
    }

    #[test]
    fn rejects_orphan_palette_type() {
        let json = MINIMAL.replace(
            r#""sequential": { "Mint": "Mint" }"#,
            r#""sequential": { "Mint": "Mint" }, "diverging": { "Earth": "Earth" }"#,
        );
        assert!(matches!(
            Catalog::from_json(&json),
            Err(CatalogError::Invalid(_))
        ));
    }

    #[test]
    fn rejects_unknown_default_icon() {
        let json = MINIMAL.replace(
            r#""initial_text""#,
            r#""default_icon": "dragon", "initial_text""#,
        );
        assert!(matches!(
            Catalog::from_json(&json),
            Err(CatalogError::Invalid(_))
        ));
    }

    #[test]
    fn rejects_empty_icon_list() {
        let json = MINIMAL.replace(r#"["cloud", "heart"]"#, "[]");
        assert!(matches!(
            Catalog::from_json(&json),
            Err(CatalogError::Invalid(_))
        ));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            Catalog::from_json("{ \"cmaps\": "),
            Err(CatalogError::Parse(_))
        ));
        assert!(matches!(
            Catalog::from_json(r#"{ "supported_icons": [] }"#),
            Err(CatalogError::Parse(_))
        ));
    }

    #[test]
    fn load_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, MINIMAL).unwrap();
        let catalog = Catalog::load(&path).unwrap();
        assert!(catalog.has_icon("heart"));

        let missing = dir.path().join("missing.json");
        assert!(matches!(Catalog::load(&missing), Err(CatalogError::Io { .. })));
    }
}
