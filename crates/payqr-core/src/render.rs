use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ImageEncoder, Luma};
use qrcode::types::QrError;
use qrcode::{EcLevel, QrCode};
use tracing::debug;

use crate::error::{PayQrError, RenderCode, Result};

pub const MIN_QR_DIMENSION: u32 = 300;

/// Turns text into a scannable image. The facade forwards `Error` untouched.
#[async_trait]
pub trait ImageRenderer: Send + Sync {
    type Asset: Send;
    type Error: std::error::Error + Send + Sync + 'static;

    async fn encode(&self, text: &str) -> std::result::Result<Self::Asset, Self::Error>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Lower bound for both image sides, in pixels.
    pub min_dimension: u32,
    pub ec_level: EcLevel,
    pub quiet_zone: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            min_dimension: MIN_QR_DIMENSION,
            ec_level: EcLevel::M,
            quiet_zone: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrImage {
    pub data: String,
    pub width: u32,
    pub height: u32,
    pub png_bytes: Vec<u8>,
}

impl QrImage {
    pub fn to_data_url(&self) -> String {
        format!("data:image/png;base64,{}", STANDARD.encode(&self.png_bytes))
    }
}

/// Grayscale PNG renderer backed by the `qrcode` crate.
#[derive(Debug, Clone, Default)]
pub struct QrPngRenderer {
    options: RenderOptions,
}

impl QrPngRenderer {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }
}

#[async_trait]
impl ImageRenderer for QrPngRenderer {
    type Asset = QrImage;
    type Error = PayQrError;

    async fn encode(&self, text: &str) -> Result<QrImage> {
        let data = text.to_string();
        let options = self.options;
        tokio::task::spawn_blocking(move || render_png(&data, &options))
            .await
            .map_err(|err| {
                PayQrError::render(RenderCode::Worker, format!("render task failed: {err}"))
            })?
    }
}

pub fn render_png(data: &str, options: &RenderOptions) -> Result<QrImage> {
    let code = QrCode::with_error_correction_level(data.as_bytes(), options.ec_level).map_err(
        |err| {
            let code = match err {
                QrError::DataTooLong => RenderCode::DataTooLong,
                _ => RenderCode::QrEncoding,
            };
            PayQrError::render(code, format!("failed to encode QR data: {err}"))
        },
    )?;

    let dimension = options.min_dimension.max(1);
    let image = code
        .render::<Luma<u8>>()
        .min_dimensions(dimension, dimension)
        .dark_color(Luma([0u8]))
        .light_color(Luma([255u8]))
        .quiet_zone(options.quiet_zone)
        .build();

    let (width, height) = image.dimensions();
    let raw = image.into_raw();
    let mut png_bytes = Vec::new();
    let encoder =
        PngEncoder::new_with_quality(&mut png_bytes, CompressionType::Best, FilterType::Adaptive);
    encoder
        .write_image(&raw, width, height, image::ColorType::L8.into())
        .map_err(|err| {
            PayQrError::render(
                RenderCode::PngEncoding,
                format!("failed to encode PNG bytes: {err}"),
            )
        })?;

    debug!(
        payload_bytes = data.len(),
        width,
        height,
        png_bytes = png_bytes.len(),
        "rendered qr image"
    );

    Ok(QrImage {
        data: data.to_string(),
        width,
        height,
        png_bytes,
    })
}

#[cfg(test)]
mod tests {
    use qrcode::EcLevel;

    use super::{render_png, ImageRenderer, QrPngRenderer, RenderOptions, MIN_QR_DIMENSION};
    use crate::error::{PayQrError, RenderCode};

    const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];
    const BTC_URI: &str = "bitcoin:1D9hTwC4jCnAAg5WtEe6CgwcR17qUdN9ap?&memo=Payment for services";

    fn decode_qr_data(png_bytes: &[u8]) -> String {
        let gray = image::load_from_memory(png_bytes).unwrap().to_luma8();
        let mut prepared = rqrr::PreparedImage::prepare(gray);
        let mut grids = prepared.detect_grids();
        assert!(!grids.is_empty());
        let (_, content) = grids.remove(0).decode().unwrap();
        content
    }

    #[test]
    fn png_decodes_back_to_input_text() {
        let image = render_png(BTC_URI, &RenderOptions::default()).unwrap();
        assert!(image.png_bytes.starts_with(&PNG_SIGNATURE));
        assert_eq!(image.data, BTC_URI);
        assert_eq!(decode_qr_data(&image.png_bytes), BTC_URI);
    }

    #[test]
    fn png_respects_minimum_dimension() {
        let image = render_png(BTC_URI, &RenderOptions::default()).unwrap();
        let decoded = image::load_from_memory(&image.png_bytes).unwrap();
        assert!(decoded.width() >= MIN_QR_DIMENSION);
        assert!(decoded.height() >= MIN_QR_DIMENSION);
        assert_eq!(decoded.width(), image.width);

        let larger = RenderOptions {
            min_dimension: 600,
            ..RenderOptions::default()
        };
        let image = render_png(BTC_URI, &larger).unwrap();
        assert!(image.width >= 600);
    }

    #[test]
    fn data_url_wraps_png_bytes() {
        let image = render_png(BTC_URI, &RenderOptions::default()).unwrap();
        let url = image.to_data_url();
        assert!(url.starts_with("data:image/png;base64,iVBORw0KGgo"));
    }

    #[test]
    fn oversized_text_reports_data_too_long() {
        let text = "x".repeat(8_000);
        let options = RenderOptions {
            ec_level: EcLevel::H,
            ..RenderOptions::default()
        };
        let err = render_png(&text, &options).unwrap_err();
        assert!(matches!(
            err,
            PayQrError::Render {
                code: RenderCode::DataTooLong,
                ..
            }
        ));
    }

    #[test]
    fn rendering_is_deterministic() {
        let first = render_png(BTC_URI, &RenderOptions::default()).unwrap();
        let second = render_png(BTC_URI, &RenderOptions::default()).unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn async_renderer_matches_sync_primitive() {
        let renderer = QrPngRenderer::default();
        let image = renderer.encode(BTC_URI).await.unwrap();
        assert_eq!(image, render_png(BTC_URI, renderer.options()).unwrap());
    }
}
