//! QR artifact rendering.
//!
//! A QR artifact is an opaque reference to a rendered image. The default
//! renderer produces an SVG encoded as a `data:` URI, so the artifact can be
//! stored inline with the record and embedded directly by clients.

use base64::Engine as _;
use qrcode::render::svg;
use qrcode::types::QrError;
use qrcode::QrCode;
use serde_json::json;

use crate::error::AppError;

/// Renders a payload (URL or free text) into a QR artifact reference.
#[cfg_attr(test, mockall::automock)]
pub trait QrRenderer: Send + Sync {
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the payload does not fit in a QR code.
    fn render(&self, payload: &str) -> Result<String, AppError>;
}

/// Renders black-on-white SVG QR codes as base64 data URIs.
#[derive(Debug, Clone)]
pub struct SvgQrRenderer {
    min_size: u32,
}

impl SvgQrRenderer {
    pub fn new(min_size: u32) -> Self {
        Self { min_size }
    }
}

impl Default for SvgQrRenderer {
    fn default() -> Self {
        Self::new(256)
    }
}

impl QrRenderer for SvgQrRenderer {
    fn render(&self, payload: &str) -> Result<String, AppError> {
        let code = QrCode::new(payload.as_bytes()).map_err(|e| match e {
            QrError::DataTooLong => AppError::bad_request(
                "Payload is too long for a QR code",
                json!({ "length": payload.len() }),
            ),
            other => AppError::internal(
                "QR code generation failed",
                json!({ "reason": other.to_string() }),
            ),
        })?;

        let image = code
            .render::<svg::Color>()
            .min_dimensions(self.min_size, self.min_size)
            .dark_color(svg::Color("#000000"))
            .light_color(svg::Color("#ffffff"))
            .build();

        Ok(format!(
            "data:image/svg+xml;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(image)
        ))
    }
}
