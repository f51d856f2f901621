//! Render pipeline: validated parameters in, decoded raster plus a
//! self-contained PNG data link out.

use crate::catalog::Catalog;
use crate::constants::DOWNLOAD_LINK_PREFIX;
use crate::error::Result;
use crate::generator::{GenerateRequest, WordCloudGenerator};
use crate::params::{ParameterInput, RenderParameters};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use image::{ImageFormat, RgbaImage};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::debug;

const OUTPUT_FILE_NAME: &str = "wordcloud.png";

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("scratch directory unavailable: {0}")]
    Scratch(#[source] std::io::Error),
    #[error("generator produced no image at {}", .0.display())]
    Missing(PathBuf),
    #[error("failed to decode generated image: {0}")]
    Decode(#[source] image::ImageError),
    #[error("generated image is {actual_width}x{actual_height}, expected {width}x{height}")]
    SizeMismatch {
        width: u32,
        height: u32,
        actual_width: u32,
        actual_height: u32,
    },
    #[error("failed to encode PNG: {0}")]
    Encode(#[source] image::ImageError),
}

/// A rendered word cloud, ready for display and download
pub struct RenderResult {
    pub image: RgbaImage,
    /// Losslessly encoded `image`
    pub png: Vec<u8>,
    /// `data:image/png;base64,...`
    pub download_link: String,
}

impl RenderResult {
    pub fn from_image(image: RgbaImage) -> std::result::Result<Self, OutputError> {
        let mut png = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .map_err(OutputError::Encode)?;
        let download_link = format!("{}{}", DOWNLOAD_LINK_PREFIX, BASE64.encode(&png));
        Ok(Self {
            image,
            png,
            download_link,
        })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

pub struct RenderPipeline {
    generator: Arc<dyn WordCloudGenerator>,
}

impl RenderPipeline {
    pub fn new(generator: Arc<dyn WordCloudGenerator>) -> Self {
        Self { generator }
    }

    /// Validate the form against the catalog, then render
    pub async fn render_input(
        &self,
        catalog: &Catalog,
        input: &ParameterInput,
        cancel: &CancellationToken,
    ) -> Result<RenderResult> {
        let params = input.validate(catalog)?;
        self.render(&params, cancel).await
    }

    pub async fn render(
        &self,
        params: &RenderParameters,
        cancel: &CancellationToken,
    ) -> Result<RenderResult> {
        // Removed when dropped, on every return path
        let scratch = tempfile::Builder::new()
            .prefix("wordcloud-")
            .tempdir()
            .map_err(OutputError::Scratch)?;
        let output = scratch.path().join(OUTPUT_FILE_NAME);
        let request = GenerateRequest::new(params, &output);

        debug!(
            palette = %request.palette,
            icon = %request.icon_name,
            scratch = %scratch.path().display(),
            "Rendering word cloud"
        );

        self.generator.generate(&request, cancel).await?;
        let result = load_output(&output, params.width, params.height)?;

        debug!(
            width = result.width(),
            height = result.height(),
            png_bytes = result.png.len(),
            "Word cloud rendered"
        );
        Ok(result)
    }
}

fn load_output(path: &Path, width: u32, height: u32) -> std::result::Result<RenderResult, OutputError> {
    if !path.is_file() {
        return Err(OutputError::Missing(path.to_path_buf()));
    }
    let image = image::open(path).map_err(OutputError::Decode)?.to_rgba8();
    let (actual_width, actual_height) = image.dimensions();
    if (actual_width, actual_height) != (width, height) {
        return Err(OutputError::SizeMismatch {
            width,
            height,
            actual_width,
            actual_height,
        });
    }
    RenderResult::from_image(image)
}
