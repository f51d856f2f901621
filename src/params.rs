//! Render parameters: raw form state from the sidebar and its validation
//! into a `RenderParameters` value the pipeline can run.

use crate::catalog::Catalog;
use crate::constants::*;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no text to render")]
    EmptyText,
    #[error("unsupported icon '{0}'")]
    UnknownIcon(String),
    #[error("unknown palette type '{0}'")]
    UnknownPaletteType(String),
    #[error("unknown palette '{name}' for type '{palette_type}'")]
    UnknownPalette { palette_type: String, name: String },
    #[error("color count {0} is outside {min}..={max}", min = COLOR_COUNT_RANGE.0, max = COLOR_COUNT_RANGE.1)]
    ColorCount(u8),
    #[error("{axis} {value}px must be within {min}..={max} in steps of {step}", min = DIMENSION_RANGE.0, max = DIMENSION_RANGE.1, step = DIMENSION_STEP)]
    Dimension { axis: &'static str, value: u32 },
    #[error("max font size {0} must be within {min}..={max} in steps of {step}", min = FONT_SIZE_RANGE.0, max = FONT_SIZE_RANGE.1, step = FONT_SIZE_STEP)]
    FontSize(u32),
    #[error("max words '{0}' is not a whole number")]
    MaxWordsNotNumeric(String),
    #[error("max words {0} is outside {min}..={max}", min = MAX_WORDS_RANGE.0, max = MAX_WORDS_RANGE.1)]
    MaxWords(u32),
    #[error("'{0}' is not a hex color")]
    Background(String),
}

/// Widget state as edited in the sidebar. Numeric free-text fields stay raw
/// until `validate`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterInput {
    pub icon: String,
    pub invert_mask: bool,
    pub palette_type: String,
    pub palette_name: String,
    pub color_count: u8,
    pub background: String,
    pub width: u32,
    pub height: u32,
    pub max_font_size: u32,
    pub max_words: String,
    pub collocations: bool,
    pub text: String,
}

/// A fully validated parameter set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderParameters {
    pub icon: String,
    pub invert_mask: bool,
    pub palette_type: String,
    pub palette_name: String,
    pub color_count: u8,
    /// Normalized `#rrggbb`
    pub background: String,
    pub width: u32,
    pub height: u32,
    pub max_font_size: u32,
    pub max_words: u32,
    pub collocations: bool,
    pub text: String,
}

impl ParameterInput {
    pub fn defaults(catalog: &Catalog) -> Self {
        let palettes = catalog.palettes();
        let palette_type = palettes.first_type().to_string();
        let palette_name = palettes
            .first_name(&palette_type)
            .unwrap_or_default()
            .to_string();
        Self {
            icon: catalog.default_icon().to_string(),
            invert_mask: false,
            palette_type,
            palette_name,
            color_count: DEFAULT_COLOR_COUNT,
            background: DEFAULT_BACKGROUND.to_string(),
            width: DEFAULT_DIMENSION,
            height: DEFAULT_DIMENSION,
            max_font_size: DEFAULT_MAX_FONT_SIZE,
            max_words: DEFAULT_MAX_WORDS.to_string(),
            collocations: true,
            text: catalog.initial_text().to_string(),
        }
    }

    /// Switch palette type. The palette name survives only if the new type
    /// offers it; otherwise the type's first palette is selected.
    pub fn select_palette_type(&mut self, catalog: &Catalog, palette_type: &str) {
        let palettes = catalog.palettes();
        if !palettes.has_type(palette_type) {
            return;
        }
        self.palette_type = palette_type.to_string();
        if !palettes.has_palette(palette_type, &self.palette_name) {
            self.palette_name = palettes
                .first_name(palette_type)
                .unwrap_or_default()
                .to_string();
        }
    }

    /// Palette options offered for the currently selected type
    pub fn palette_options<'a>(&self, catalog: &'a Catalog) -> Vec<(&'a str, &'a str)> {
        catalog
            .palettes()
            .names(&self.palette_type)
            .map(|names| names.collect())
            .unwrap_or_default()
    }

    pub fn has_text(&self) -> bool {
        !self.text.trim().is_empty()
    }

    pub fn validate(&self, catalog: &Catalog) -> Result<RenderParameters, ValidationError> {
        if !self.has_text() {
            return Err(ValidationError::EmptyText);
        }
        if !catalog.has_icon(&self.icon) {
            return Err(ValidationError::UnknownIcon(self.icon.clone()));
        }

        let palettes = catalog.palettes();
        if !palettes.has_type(&self.palette_type) {
            return Err(ValidationError::UnknownPaletteType(self.palette_type.clone()));
        }
        if !palettes.has_palette(&self.palette_type, &self.palette_name) {
            return Err(ValidationError::UnknownPalette {
                palette_type: self.palette_type.clone(),
                name: self.palette_name.clone(),
            });
        }
        if !in_range(self.color_count, COLOR_COUNT_RANGE) {
            return Err(ValidationError::ColorCount(self.color_count));
        }

        let background = normalize_hex_color(&self.background)
            .ok_or_else(|| ValidationError::Background(self.background.clone()))?;

        for (axis, value) in [("width", self.width), ("height", self.height)] {
            if !on_grid(value, DIMENSION_RANGE, DIMENSION_STEP) {
                return Err(ValidationError::Dimension { axis, value });
            }
        }
        if !on_grid(self.max_font_size, FONT_SIZE_RANGE, FONT_SIZE_STEP) {
            return Err(ValidationError::FontSize(self.max_font_size));
        }

        let max_words: u32 = self
            .max_words
            .trim()
            .parse()
            .map_err(|_| ValidationError::MaxWordsNotNumeric(self.max_words.clone()))?;
        if !in_range(max_words, MAX_WORDS_RANGE) {
            return Err(ValidationError::MaxWords(max_words));
        }

        Ok(RenderParameters {
            icon: self.icon.clone(),
            invert_mask: self.invert_mask,
            palette_type: self.palette_type.clone(),
            palette_name: self.palette_name.clone(),
            color_count: self.color_count,
            background,
            width: self.width,
            height: self.height,
            max_font_size: self.max_font_size,
            max_words,
            collocations: self.collocations,
            text: self.text.clone(),
        })
    }
}

impl RenderParameters {
    /// `cartocolors.<type>.<name>_<count>`
    pub fn palette_id(&self) -> String {
        format!(
            "{}.{}.{}_{}",
            PALETTE_NAMESPACE, self.palette_type, self.palette_name, self.color_count
        )
    }

    /// Icon mask spec understood by the generator, e.g. `fas fa-heart`
    pub fn icon_spec(&self) -> String {
        format!("{}{}", ICON_NAMESPACE, self.icon)
    }
}

fn in_range<T: PartialOrd>(value: T, (min, max): (T, T)) -> bool {
    value >= min && value <= max
}

fn on_grid(value: u32, range: (u32, u32), step: u32) -> bool {
    in_range(value, range) && (value - range.0) % step == 0
}

/// Accepts `#rgb` or `#rrggbb` (any case), returns lowercase `#rrggbb`
pub fn normalize_hex_color(value: &str) -> Option<String> {
    let hex = value.trim().strip_prefix('#')?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let hex = hex.to_ascii_lowercase();
    match hex.len() {
        6 => Some(format!("#{}", hex)),
        3 => Some(hex.chars().fold(String::from("#"), |mut s, c| {
            s.push(c);
            s.push(c);
            s
        })),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        Catalog::bundled().unwrap()
    }

    fn scenario(catalog: &Catalog) -> ParameterInput {
        let mut input = ParameterInput::defaults(catalog);
        input.icon = "heart".into();
        input.select_palette_type(catalog, "qualitative");
        input.palette_name = "Bold".into();
        input.text = "hello world hello".into();
        input
    }

    #[test]
    fn defaults_validate() {
        let catalog = catalog();
        let params = ParameterInput::defaults(&catalog).validate(&catalog).unwrap();
        assert_eq!(params.width, 512);
        assert_eq!(params.height, 512);
        assert_eq!(params.max_words, 2000);
        assert_eq!(params.color_count, 5);
        assert!(params.collocations);
        assert!(!params.invert_mask);
        assert_eq!(params.icon, catalog.default_icon());
    }

    #[test]
    fn scenario_parameters() {
        let catalog = catalog();
        let params = scenario(&catalog).validate(&catalog).unwrap();
        assert_eq!(params.palette_id(), "cartocolors.qualitative.Bold_5");
        assert_eq!(params.icon_spec(), "fas fa-heart");
        assert_eq!(params.background, "#ffffff");
        assert_eq!(params.max_font_size, 200);
    }

    #[test]
    fn palette_options_follow_selected_type() {
        let catalog = catalog();
        let mut input = ParameterInput::defaults(&catalog);
        let types: Vec<String> = catalog
            .palettes()
            .types()
            .map(|(k, _)| k.to_string())
            .collect();
        for palette_type in types {
            input.select_palette_type(&catalog, &palette_type);
            let expected: Vec<_> = catalog.palettes().names(&palette_type).unwrap().collect();
            assert_eq!(input.palette_options(&catalog), expected);
            assert!(catalog
                .palettes()
                .has_palette(&input.palette_type, &input.palette_name));
        }
    }

    #[test]
    fn switching_type_resets_invalid_palette() {
        let catalog = catalog();
        let mut input = scenario(&catalog);
        input.select_palette_type(&catalog, "sequential");
        assert_eq!(input.palette_type, "sequential");
        assert_eq!(
            Some(input.palette_name.as_str()),
            catalog.palettes().first_name("sequential")
        );

        // Unknown type leaves the selection untouched
        input.select_palette_type(&catalog, "nope");
        assert_eq!(input.palette_type, "sequential");
    }

    #[test]
    fn palette_id_pattern_for_all_counts() {
        let catalog = catalog();
        let mut input = scenario(&catalog);
        let pairs: Vec<(String, String)> = catalog
            .palettes()
            .types()
            .flat_map(|(t, _)| {
                catalog
                    .palettes()
                    .names(t)
                    .into_iter()
                    .flatten()
                    .map(move |(n, _)| (t.to_string(), n.to_string()))
            })
            .collect();
        for (palette_type, name) in pairs {
            for count in 2..=7u8 {
                input.palette_type = palette_type.clone();
                input.palette_name = name.clone();
                input.color_count = count;
                let params = input.validate(&catalog).unwrap();
                assert_eq!(
                    params.palette_id(),
                    format!("cartocolors.{}.{}_{}", palette_type, name, count)
                );
            }
        }
    }

    #[test]
    fn blank_text_is_rejected() {
        let catalog = catalog();
        let mut input = scenario(&catalog);
        for text in ["", "   ", "\n\t "] {
            input.text = text.into();
            assert!(!input.has_text());
            assert_eq!(input.validate(&catalog), Err(ValidationError::EmptyText));
        }
    }

    #[test]
    fn non_numeric_max_words() {
        let catalog = catalog();
        let mut input = scenario(&catalog);
        input.max_words = "abc".into();
        assert_eq!(
            input.validate(&catalog),
            Err(ValidationError::MaxWordsNotNumeric("abc".into()))
        );
        input.max_words = "-5".into();
        assert!(matches!(
            input.validate(&catalog),
            Err(ValidationError::MaxWordsNotNumeric(_))
        ));
    }

    #[test]
    fn max_words_bounds() {
        let catalog = catalog();
        let mut input = scenario(&catalog);
        input.max_words = " 10000 ".into();
        assert_eq!(input.validate(&catalog).unwrap().max_words, 10_000);
        input.max_words = "0".into();
        assert_eq!(input.validate(&catalog), Err(ValidationError::MaxWords(0)));
        input.max_words = "10001".into();
        assert_eq!(input.validate(&catalog), Err(ValidationError::MaxWords(10_001)));
    }

    #[test]
    fn dimension_bounds_and_step() {
        let catalog = catalog();
        let mut input = scenario(&catalog);
        for width in (96..=1024).step_by(8) {
            input.width = width;
            assert!(input.validate(&catalog).is_ok(), "width {}", width);
        }
        input.width = 88;
        assert_eq!(
            input.validate(&catalog),
            Err(ValidationError::Dimension { axis: "width", value: 88 })
        );
        input.width = 512;
        input.height = 100;
        assert_eq!(
            input.validate(&catalog),
            Err(ValidationError::Dimension { axis: "height", value: 100 })
        );
    }

    #[test]
    fn font_size_and_color_count_bounds() {
        let catalog = catalog();
        let mut input = scenario(&catalog);
        input.max_font_size = 405;
        assert_eq!(input.validate(&catalog), Err(ValidationError::FontSize(405)));
        input.max_font_size = 400;
        input.color_count = 8;
        assert_eq!(input.validate(&catalog), Err(ValidationError::ColorCount(8)));
        input.color_count = 1;
        assert_eq!(input.validate(&catalog), Err(ValidationError::ColorCount(1)));
    }

    #[test]
    fn catalog_membership() {
        let catalog = catalog();
        let mut input = scenario(&catalog);
        input.icon = "not-an-icon".into();
        assert!(matches!(
            input.validate(&catalog),
            Err(ValidationError::UnknownIcon(_))
        ));

        let mut input = scenario(&catalog);
        input.palette_name = "Mint".into();
        assert!(matches!(
            input.validate(&catalog),
            Err(ValidationError::UnknownPalette { .. })
        ));

        let mut input = scenario(&catalog);
        input.palette_type = "rainbow".into();
        assert!(matches!(
            input.validate(&catalog),
            Err(ValidationError::UnknownPaletteType(_))
        ));
    }

    #[test]
    fn hex_colors() {
        assert_eq!(normalize_hex_color("#FFFFFF").as_deref(), Some("#ffffff"));
        assert_eq!(normalize_hex_color("#0aF").as_deref(), Some("#00aaff"));
        assert_eq!(normalize_hex_color(" #123abc ").as_deref(), Some("#123abc"));
        assert_eq!(normalize_hex_color("ffffff"), None);
        assert_eq!(normalize_hex_color("#fffff"), None);
        assert_eq!(normalize_hex_color("#gggggg"), None);

        let catalog = catalog();
        let mut input = scenario(&catalog);
        input.background = "white".into();
        assert_eq!(
            input.validate(&catalog),
            Err(ValidationError::Background("white".into()))
        );
    }
}
