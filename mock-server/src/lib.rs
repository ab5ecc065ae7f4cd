use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};

/// Render request as the server understands it. Unknown keys are rejected so
/// a client sending a misspelled field gets a 400 instead of silent success.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RenderRequest {
    pub format: String,
    pub html: Option<String>,
    pub url: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub paper: Option<String>,
    pub orientation: Option<String>,
    pub margins: Option<String>,
    pub flow: Option<String>,
    pub density: Option<f64>,
    pub background: Option<String>,
    pub timeout: Option<u32>,
    pub quantize: Option<Quantize>,
    pub pdf: Option<Pdf>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Quantize {
    pub colors: Option<u32>,
    pub palette: Option<Palette>,
    pub dither: Option<String>,
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Palette {
    Preset(String),
    Custom(Vec<String>),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Pdf {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub keywords: Option<String>,
    pub creator: Option<String>,
    pub bookmarks: Option<bool>,
    pub standard: Option<String>,
    pub accessibility: Option<String>,
    #[serde(default)]
    pub embedded_files: Vec<EmbeddedFile>,
    #[serde(default)]
    pub barcodes: Vec<Barcode>,
    pub watermark: Option<Watermark>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EmbeddedFile {
    pub path: String,
    pub data: String,
    pub mime_type: Option<String>,
    pub description: Option<String>,
    pub relationship: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Barcode {
    #[serde(rename = "type")]
    pub kind: String,
    pub data: String,
    pub anchor: Option<String>,
    pub size: Option<f64>,
    pub margin: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Watermark {
    pub text: Option<String>,
    pub image_data: Option<String>,
    pub opacity: Option<f64>,
    pub rotation: Option<f64>,
    pub color: Option<String>,
    pub font_size: Option<f64>,
    pub scale: Option<f64>,
    pub layer: Option<String>,
    pub pages: Option<String>,
}

/// Every JSON body posted to `/render`, valid or not, in arrival order.
pub type Received = Arc<RwLock<Vec<Value>>>;

pub const PDF_BYTES: &[u8] = b"%PDF-1.7\n%\xe2\xe3\xcf\xd3\n%%EOF\n";
pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n\x00\x00\x00\x0dIHDR";

/// A healthy server that validates and records render requests.
pub fn app() -> Router {
    app_with_log(Received::default())
}

/// Like [`app`], with the request log shared with the caller.
pub fn app_with_log(received: Received) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/render", post(render))
        .route("/_received", get(list_received))
        .with_state(received)
}

/// A server in a bad state: health answers 500 and renders fail with a
/// plain-text 502 body.
pub fn failing_app() -> Router {
    Router::new()
        .route("/health", get(|| async { StatusCode::INTERNAL_SERVER_ERROR }))
        .route(
            "/render",
            post(|| async { (StatusCode::BAD_GATEWAY, "upstream renderer unavailable") }),
        )
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    serve(listener, app()).await
}

pub async fn serve(listener: TcpListener, app: Router) -> Result<(), std::io::Error> {
    axum::serve(listener, app).await
}

async fn health() -> &'static str {
    "ok"
}

async fn list_received(State(received): State<Received>) -> Json<Vec<Value>> {
    Json(received.read().await.clone())
}

async fn render(State(received): State<Received>, body: Bytes) -> Response {
    if let Ok(raw) = serde_json::from_slice::<Value>(&body) {
        received.write().await.push(raw);
    }

    let request: RenderRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => return bad_request(format!("invalid request: {e}")),
    };
    if let Err(message) = validate(&request) {
        return bad_request(message);
    }

    tracing::info!(format = %request.format, "rendered");
    let (content_type, bytes): (&'static str, &'static [u8]) = match request.format.as_str() {
        "pdf" => ("application/pdf", PDF_BYTES),
        "png" => ("image/png", PNG_BYTES),
        "jpeg" => ("image/jpeg", &b"\xff\xd8\xff\xe0"[..]),
        "bmp" => ("image/bmp", &b"BM"[..]),
        "tga" => ("image/x-tga", &b"\x00\x00\x02"[..]),
        "qoi" => ("image/qoi", &b"qoif"[..]),
        _ => ("image/svg+xml", &b"<svg xmlns=\"http://www.w3.org/2000/svg\"/>"[..]),
    };
    (StatusCode::OK, [(header::CONTENT_TYPE, content_type)], bytes).into_response()
}

fn bad_request(message: String) -> Response {
    tracing::warn!(%message, "rejecting render request");
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
}

/// Range and consistency checks the real renderer enforces.
pub fn validate(request: &RenderRequest) -> Result<(), String> {
    if !matches!(
        request.format.as_str(),
        "pdf" | "png" | "jpeg" | "bmp" | "tga" | "qoi" | "svg"
    ) {
        return Err(format!("unsupported format: {}", request.format));
    }
    match (&request.html, &request.url) {
        (Some(_), None) | (None, Some(_)) => {}
        _ => return Err("exactly one of html or url is required".to_string()),
    }
    if let Some(colors) = request.quantize.as_ref().and_then(|q| q.colors) {
        if !(2..=256).contains(&colors) {
            return Err("colors must be between 2 and 256".to_string());
        }
    }
    let watermark = request.pdf.as_ref().and_then(|p| p.watermark.as_ref());
    if let Some(opacity) = watermark.and_then(|w| w.opacity) {
        if !(0.0..=1.0).contains(&opacity) {
            return Err("watermark opacity must be between 0 and 1".to_string());
        }
    }
    Ok(())
}
