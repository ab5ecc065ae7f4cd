//! Fluent builder for render requests.
//!
//! Setters only record values; range checks (colors 2-256, opacity 0-1, ...)
//! are left to the server, which reports violations as a `Server` error.
//! NaN and infinite numbers have no JSON form and fail locally with
//! `InvalidValue` before anything is sent.

use crate::client::ForgeClient;
use crate::error::{ForgeError, Result};
use crate::payload::{Barcode, EmbeddedFile, PdfOptions, Quantize, RenderPayload, RenderSource, Watermark};
use crate::types::{
    AccessibilityLevel, BarcodeType, DitherMethod, Flow, Orientation, OutputFormat, PaletteSpec,
    PdfStandard, WatermarkLayer,
};

/// Accumulates rendering options for one request.
///
/// Created by [`ForgeClient::render_html`] or [`ForgeClient::render_url`]
/// and finished with [`send`](Self::send) or [`send_sync`](Self::send_sync).
/// Sending borrows the builder, so the same request can be sent again.
#[derive(Debug, Clone)]
pub struct RenderRequestBuilder<'c> {
    client: &'c ForgeClient,
    payload: RenderPayload,
}

impl<'c> RenderRequestBuilder<'c> {
    pub(crate) fn new(client: &'c ForgeClient, source: RenderSource) -> Self {
        Self {
            client,
            payload: RenderPayload::new(source),
        }
    }

    /// Output format (default: PDF).
    pub fn format(mut self, format: OutputFormat) -> Self {
        self.payload.format = format;
        self
    }

    /// Viewport width in CSS pixels.
    pub fn width(mut self, px: u32) -> Self {
        self.payload.width = Some(px);
        self
    }

    /// Viewport height in CSS pixels.
    pub fn height(mut self, px: u32) -> Self {
        self.payload.height = Some(px);
        self
    }

    /// Paper size preset: a3, a4, a5, b4, b5, letter, legal, ledger.
    pub fn paper(mut self, size: impl Into<String>) -> Self {
        self.payload.paper = Some(size.into());
        self
    }

    pub fn orientation(mut self, orientation: Orientation) -> Self {
        self.payload.orientation = Some(orientation);
        self
    }

    /// Margins preset or `"T,R,B,L"` in millimetres.
    pub fn margins(mut self, margins: impl Into<String>) -> Self {
        self.payload.margins = Some(margins.into());
        self
    }

    pub fn flow(mut self, flow: Flow) -> Self {
        self.payload.flow = Some(flow);
        self
    }

    /// Output DPI (server default: 96).
    pub fn density(mut self, dpi: f64) -> Self {
        self.payload.density = Some(dpi);
        self
    }

    /// Background as any CSS color.
    pub fn background(mut self, color: impl Into<String>) -> Self {
        self.payload.background = Some(color.into());
        self
    }

    /// Page load timeout on the server side, in seconds.
    pub fn timeout(mut self, seconds: u32) -> Self {
        self.payload.timeout = Some(seconds);
        self
    }

    /// Number of colors to quantize to (2-256).
    pub fn colors(mut self, colors: u16) -> Self {
        self.quantize().colors = Some(colors);
        self
    }

    /// Preset palette or a list of hex colors.
    pub fn palette(mut self, palette: impl Into<PaletteSpec>) -> Self {
        self.quantize().palette = Some(palette.into());
        self
    }

    pub fn dither(mut self, method: DitherMethod) -> Self {
        self.quantize().dither = Some(method);
        self
    }

    pub fn pdf_title(mut self, title: impl Into<String>) -> Self {
        self.pdf().title = Some(title.into());
        self
    }

    pub fn pdf_author(mut self, author: impl Into<String>) -> Self {
        self.pdf().author = Some(author.into());
        self
    }

    pub fn pdf_subject(mut self, subject: impl Into<String>) -> Self {
        self.pdf().subject = Some(subject.into());
        self
    }

    /// Comma-separated keywords.
    pub fn pdf_keywords(mut self, keywords: impl Into<String>) -> Self {
        self.pdf().keywords = Some(keywords.into());
        self
    }

    pub fn pdf_creator(mut self, creator: impl Into<String>) -> Self {
        self.pdf().creator = Some(creator.into());
        self
    }

    /// Generate the PDF outline from headings.
    pub fn pdf_bookmarks(mut self, enabled: bool) -> Self {
        self.pdf().bookmarks = Some(enabled);
        self
    }

    pub fn pdf_standard(mut self, standard: PdfStandard) -> Self {
        self.pdf().standard = Some(standard);
        self
    }

    pub fn pdf_accessibility(mut self, level: AccessibilityLevel) -> Self {
        self.pdf().accessibility = Some(level);
        self
    }

    pub fn pdf_watermark_text(mut self, text: impl Into<String>) -> Self {
        self.watermark().text = Some(text.into());
        self
    }

    /// Base64-encoded PNG or JPEG.
    pub fn pdf_watermark_image(mut self, base64_data: impl Into<String>) -> Self {
        self.watermark().image_data = Some(base64_data.into());
        self
    }

    /// 0.0-1.0, server default 0.15.
    pub fn pdf_watermark_opacity(mut self, opacity: f64) -> Self {
        self.watermark().opacity = Some(opacity);
        self
    }

    /// Degrees, server default -45.
    pub fn pdf_watermark_rotation(mut self, degrees: f64) -> Self {
        self.watermark().rotation = Some(degrees);
        self
    }

    /// Hex text color, server default `#888888`.
    pub fn pdf_watermark_color(mut self, color: impl Into<String>) -> Self {
        self.watermark().color = Some(color.into());
        self
    }

    /// Font size in PDF points.
    pub fn pdf_watermark_font_size(mut self, size: f64) -> Self {
        self.watermark().font_size = Some(size);
        self
    }

    /// Image scale 0.0-1.0, server default 0.5.
    pub fn pdf_watermark_scale(mut self, scale: f64) -> Self {
        self.watermark().scale = Some(scale);
        self
    }

    pub fn pdf_watermark_layer(mut self, layer: WatermarkLayer) -> Self {
        self.watermark().layer = Some(layer);
        self
    }

    /// Pages to watermark, e.g. `"first"`, `"last"` or `"1-3"`.
    pub fn pdf_watermark_pages(mut self, pages: impl Into<String>) -> Self {
        self.watermark().pages = Some(pages.into());
        self
    }

    /// Attach a file to the PDF. `data` must already be base64-encoded.
    pub fn pdf_attach(self, path: impl Into<String>, data: impl Into<String>) -> Self {
        self.pdf_attach_file(EmbeddedFile::new(path, data))
    }

    /// Attach a file with optional MIME type, description or relationship.
    /// Attachments keep the order they were added in.
    pub fn pdf_attach_file(mut self, file: EmbeddedFile) -> Self {
        self.pdf().embedded_files.push(file);
        self
    }

    pub fn pdf_barcode(self, kind: BarcodeType, data: impl Into<String>) -> Self {
        self.pdf_add_barcode(Barcode::new(kind, data))
    }

    /// Add a barcode with anchor, size or margin set.
    pub fn pdf_add_barcode(mut self, barcode: Barcode) -> Self {
        self.pdf().barcodes.push(barcode);
        self
    }

    /// Options accumulated so far.
    pub fn payload(&self) -> &RenderPayload {
        &self.payload
    }

    /// The JSON body `send` would post.
    pub fn build_payload(&self) -> Result<serde_json::Value> {
        if let Some(field) = self.payload.non_finite_field() {
            return Err(ForgeError::InvalidValue(field));
        }
        Ok(serde_json::to_value(&self.payload)?)
    }

    /// Send the request and return the rendered bytes.
    pub async fn send(&self) -> Result<Vec<u8>> {
        self.client.send_async(&self.payload).await
    }

    /// Blocking variant of [`send`](Self::send).
    pub fn send_sync(&self) -> Result<Vec<u8>> {
        self.client.send_blocking(&self.payload)
    }

    fn quantize(&mut self) -> &mut Quantize {
        self.payload.quantize.get_or_insert_with(Quantize::default)
    }

    fn pdf(&mut self) -> &mut PdfOptions {
        self.payload.pdf.get_or_insert_with(PdfOptions::default)
    }

    fn watermark(&mut self) -> &mut Watermark {
        self.pdf().watermark.get_or_insert_with(Watermark::default)
    }
}
