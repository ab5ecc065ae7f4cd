//! Client SDK for the Forge document rendering service.
//!
//! # Overview
//! A [`ForgeClient`] points at one server. [`ForgeClient::render_html`] or
//! [`ForgeClient::render_url`] start a [`RenderRequestBuilder`]; chained
//! setters accumulate options and [`RenderRequestBuilder::send`] (async) or
//! [`RenderRequestBuilder::send_sync`] (blocking) post them to `/render` and
//! return the rendered bytes.
//!
//! ```no_run
//! use forge_sdk::{ForgeClient, OutputFormat, Palette};
//!
//! # fn main() -> forge_sdk::Result<()> {
//! let client = ForgeClient::new("http://localhost:3000");
//! let png = client
//!     .render_url("https://example.com")
//!     .format(OutputFormat::Png)
//!     .width(800)
//!     .palette(Palette::Eink)
//!     .send_sync()?;
//! # let _ = png;
//! # Ok(())
//! # }
//! ```
//!
//! # Design
//! - Requests are built and responses parsed as plain data (`build_*` /
//!   `parse_*` on [`ForgeClient`]); transports only move bytes.
//! - The payload is sparse: unset options, and option groups with no member
//!   set, are absent from the JSON body.
//! - Transport handles are pooled, created lazily and released by
//!   [`ForgeClient::close`] or on drop.

pub mod builder;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod payload;
mod transport;
pub mod types;

pub use builder::RenderRequestBuilder;
pub use client::ForgeClient;
pub use config::ClientConfig;
pub use error::{BoxError, ForgeError, Result};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use payload::{Barcode, EmbeddedFile, PdfOptions, Quantize, RenderPayload, RenderSource, Watermark};
pub use types::{
    AccessibilityLevel, BarcodeAnchor, BarcodeType, DitherMethod, EmbedRelationship, Flow,
    Orientation, OutputFormat, Palette, PaletteSpec, PdfStandard, WatermarkLayer,
};
