//! Application constants and configuration

pub const APP_NAME: &str = "Word Cloud Studio";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Catalog definition compiled into the binary
pub const BUNDLED_CATALOG: &str = include_str!("../assets/config.json");

/// Palette identifiers are `<namespace>.<type>.<name>_<count>` (palettable naming)
pub const PALETTE_NAMESPACE: &str = "cartocolors";
/// Font Awesome solid glyph set
pub const ICON_NAMESPACE: &str = "fas fa-";

pub const DOWNLOAD_LINK_PREFIX: &str = "data:image/png;base64,";
pub const RENDER_FAILED_MESSAGE: &str = "unable to render word cloud with the given settings";

// Parameter bounds (inclusive) and slider steps
pub const COLOR_COUNT_RANGE: (u8, u8) = (2, 7);
pub const DIMENSION_RANGE: (u32, u32) = (96, 1024);
pub const DIMENSION_STEP: u32 = 8;
pub const FONT_SIZE_RANGE: (u32, u32) = (10, 400);
pub const FONT_SIZE_STEP: u32 = 10;
pub const MAX_WORDS_RANGE: (u32, u32) = (1, 10_000);

// Parameter defaults
pub const DEFAULT_COLOR_COUNT: u8 = 5;
pub const DEFAULT_BACKGROUND: &str = "#ffffff";
pub const DEFAULT_DIMENSION: u32 = 512;
pub const DEFAULT_MAX_FONT_SIZE: u32 = 200;
pub const DEFAULT_MAX_WORDS: &str = "2000";

/// Quiet period after the last edit before a render is scheduled
pub const RENDER_DEBOUNCE_MS: u64 = 250;
