//! Wire payload for `POST /render`.
//!
//! # Design
//! The payload is sparse: every optional field is an `Option` skipped when
//! `None`, and the nested groups (`quantize`, `pdf`, `pdf.watermark`) are
//! themselves `Option`s. A group exists only once one of its members has been
//! set, so "group present iff any member set" falls out of the types rather
//! than out of hand-maintained presence flags.

use serde::Serialize;

use crate::types::{
    AccessibilityLevel, BarcodeAnchor, BarcodeType, DitherMethod, EmbedRelationship, Flow,
    Orientation, OutputFormat, PaletteSpec, PdfStandard, WatermarkLayer,
};

/// Content to render. Exactly one is sent, keyed `html` or `url`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderSource {
    Html(String),
    Url(String),
}

impl RenderSource {
    pub fn is_empty(&self) -> bool {
        match self {
            RenderSource::Html(s) | RenderSource::Url(s) => s.is_empty(),
        }
    }
}

/// Body of a render request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderPayload {
    pub format: OutputFormat,
    #[serde(flatten)]
    pub source: RenderSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paper: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orientation: Option<Orientation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margins: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flow: Option<Flow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub density: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    /// Page load timeout on the server, in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantize: Option<Quantize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pdf: Option<PdfOptions>,
}

impl RenderPayload {
    pub fn new(source: RenderSource) -> Self {
        Self {
            format: OutputFormat::default(),
            source,
            width: None,
            height: None,
            paper: None,
            orientation: None,
            margins: None,
            flow: None,
            density: None,
            background: None,
            timeout: None,
            quantize: None,
            pdf: None,
        }
    }

    /// Wire path of the first NaN or infinite number, if any. serde_json
    /// would otherwise encode such values as `null`.
    pub fn non_finite_field(&self) -> Option<&'static str> {
        let bad = |value: Option<f64>| value.is_some_and(|v| !v.is_finite());

        if bad(self.density) {
            return Some("density");
        }
        let pdf = self.pdf.as_ref()?;
        if let Some(watermark) = &pdf.watermark {
            let fields = [
                ("pdf.watermark.opacity", watermark.opacity),
                ("pdf.watermark.rotation", watermark.rotation),
                ("pdf.watermark.font_size", watermark.font_size),
                ("pdf.watermark.scale", watermark.scale),
            ];
            if let Some((name, _)) = fields.into_iter().find(|(_, v)| bad(*v)) {
                return Some(name);
            }
        }
        for barcode in &pdf.barcodes {
            if bad(barcode.size) {
                return Some("pdf.barcodes.size");
            }
            if bad(barcode.margin) {
                return Some("pdf.barcodes.margin");
            }
        }
        None
    }
}

/// Color quantization settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Quantize {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colors: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub palette: Option<PaletteSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dither: Option<DitherMethod>,
}

/// PDF-specific options: metadata, compliance, attachments, barcodes and
/// watermark.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PdfOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bookmarks: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub standard: Option<PdfStandard>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accessibility: Option<AccessibilityLevel>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub embedded_files: Vec<EmbeddedFile>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub barcodes: Vec<Barcode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub watermark: Option<Watermark>,
}

/// Text or image overlay applied to PDF pages.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Watermark {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Base64-encoded PNG or JPEG.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    /// Degrees.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layer: Option<WatermarkLayer>,
    /// Page scope selector such as `"first"` or `"1-3"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pages: Option<String>,
}

/// A file embedded in the output PDF. `data` must already be base64-encoded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbeddedFile {
    pub path: String,
    pub data: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relationship: Option<EmbedRelationship>,
}

impl EmbeddedFile {
    pub fn new(path: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            data: data.into(),
            mime_type: None,
            description: None,
            relationship: None,
        }
    }

    pub fn mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn relationship(mut self, relationship: EmbedRelationship) -> Self {
        self.relationship = Some(relationship);
        self
    }
}

/// A barcode stamped onto PDF pages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Barcode {
    #[serde(rename = "type")]
    pub kind: BarcodeType,
    pub data: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor: Option<BarcodeAnchor>,
    /// Edge length in PDF points.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    /// Distance from the anchored corner in PDF points.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin: Option<f64>,
}

impl Barcode {
    pub fn new(kind: BarcodeType, data: impl Into<String>) -> Self {
        Self {
            kind,
            data: data.into(),
            anchor: None,
            size: None,
            margin: None,
        }
    }

    pub fn anchor(mut self, anchor: BarcodeAnchor) -> Self {
        self.anchor = Some(anchor);
        self
    }

    pub fn size(mut self, points: f64) -> Self {
        self.size = Some(points);
        self
    }

    pub fn margin(mut self, points: f64) -> Self {
        self.margin = Some(points);
        self
    }
}
