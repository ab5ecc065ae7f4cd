//! End-to-end tests against the live mock server.
//!
//! # Design
//! Each test starts its own mock server on a random port and drives the
//! client over real HTTP, once through the blocking transport and once
//! through the async one. The mock rejects unknown payload keys, so any
//! drift in wire field names surfaces here as a 400.

use std::net::SocketAddr;
use std::time::Duration;

use forge_sdk::{
    AccessibilityLevel, Barcode, BarcodeAnchor, BarcodeType, ClientConfig, DitherMethod,
    EmbedRelationship, EmbeddedFile, Flow, ForgeClient, ForgeError, Orientation, OutputFormat,
    Palette, PdfStandard, WatermarkLayer,
};
use mock_server::{Received, PDF_BYTES, PNG_BYTES};

/// Start a mock server on its own thread and runtime.
fn start_blocking(failing: bool) -> (SocketAddr, Received) {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    let received = Received::default();
    let log = received.clone();
    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            let app = if failing {
                mock_server::failing_app()
            } else {
                mock_server::app_with_log(log)
            };
            mock_server::serve(listener, app).await
        })
        .unwrap();
    });

    (addr, received)
}

/// Start a mock server on the current runtime.
async fn start_async(failing: bool) -> (SocketAddr, Received) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let received = Received::default();
    let app = if failing {
        mock_server::failing_app()
    } else {
        mock_server::app_with_log(received.clone())
    };
    tokio::spawn(mock_server::serve(listener, app));
    (addr, received)
}

/// An address nothing listens on.
fn refused_addr() -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap()
}

fn client_for(addr: SocketAddr) -> ForgeClient {
    let config = ClientConfig::new(format!("http://{addr}")).with_timeout(Duration::from_secs(10));
    ForgeClient::with_config(config)
}

// ---------------------------------------------------------------------------
// Blocking
// ---------------------------------------------------------------------------

#[test]
fn blocking_health_and_render() {
    let (addr, received) = start_blocking(false);
    let client = client_for(addr);

    assert!(client.health_sync());

    let bytes = client.render_html("<h1>Hello</h1>").send_sync().unwrap();
    assert_eq!(bytes, PDF_BYTES);

    let log = received.blocking_read();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0], serde_json::json!({"format": "pdf", "html": "<h1>Hello</h1>"}));
}

#[test]
fn blocking_full_option_set_is_accepted() {
    let (addr, received) = start_blocking(false);
    let client = client_for(addr);

    let bytes = client
        .render_url("https://example.com/invoice")
        .format(OutputFormat::Pdf)
        .width(1024)
        .height(768)
        .paper("a4")
        .orientation(Orientation::Portrait)
        .margins("10,10,10,10")
        .flow(Flow::Paginate)
        .density(150.0)
        .background("#fafafa")
        .timeout(30)
        .colors(16)
        .palette(["#000000", "#ffffff"])
        .dither(DitherMethod::FloydSteinberg)
        .pdf_title("Invoice")
        .pdf_author("Billing")
        .pdf_subject("March")
        .pdf_keywords("invoice,march")
        .pdf_creator("forge-sdk")
        .pdf_bookmarks(true)
        .pdf_standard(PdfStandard::PdfA3b)
        .pdf_accessibility(AccessibilityLevel::PdfUa1)
        .pdf_attach_file(
            EmbeddedFile::new("factur-x.xml", "PD94bWw+")
                .mime_type("text/xml")
                .description("structured invoice")
                .relationship(EmbedRelationship::Alternative),
        )
        .pdf_add_barcode(
            Barcode::new(BarcodeType::Qr, "https://example.com/pay/42")
                .anchor(BarcodeAnchor::BottomRight)
                .size(64.0)
                .margin(18.0),
        )
        .pdf_watermark_text("PAID")
        .pdf_watermark_opacity(0.2)
        .pdf_watermark_rotation(30.0)
        .pdf_watermark_color("#00aa00")
        .pdf_watermark_font_size(64.0)
        .pdf_watermark_layer(WatermarkLayer::Over)
        .pdf_watermark_pages("first")
        .send_sync()
        .unwrap();
    assert_eq!(bytes, PDF_BYTES);

    let log = received.blocking_read();
    assert_eq!(log[0]["pdf"]["watermark"]["pages"], "first");
    assert_eq!(log[0]["quantize"]["palette"], serde_json::json!(["#000000", "#ffffff"]));
}

#[test]
fn blocking_validation_error_carries_message() {
    let (addr, _) = start_blocking(false);
    let client = client_for(addr);

    let err = client
        .render_html("<p>x</p>")
        .format(OutputFormat::Png)
        .colors(1)
        .send_sync()
        .unwrap_err();
    match err {
        ForgeError::Server { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "colors must be between 2 and 256");
        }
        other => panic!("expected server error, got {other:?}"),
    }
}

#[test]
fn blocking_failing_server() {
    let (addr, _) = start_blocking(true);
    let client = client_for(addr);

    assert!(!client.health_sync());
    let err = client.render_html("<p>x</p>").send_sync().unwrap_err();
    assert_eq!(err.status(), Some(502));
    assert!(matches!(err, ForgeError::Server { ref message, .. } if message == "HTTP 502"));
}

#[test]
fn blocking_connection_refused() {
    let client = client_for(refused_addr());

    assert!(!client.health_sync());
    let err = client.render_html("<p>x</p>").send_sync().unwrap_err();
    assert!(err.is_connection(), "expected connection error, got {err:?}");
}

#[test]
fn blocking_close_then_reuse() {
    let (addr, received) = start_blocking(false);
    let client = client_for(addr);
    let builder = client.render_html("<p>again</p>");

    builder.send_sync().unwrap();
    client.close();
    client.close();
    builder.send_sync().unwrap();

    let log = received.blocking_read();
    assert_eq!(log.len(), 2);
    assert_eq!(log[0], log[1]);
}

#[test]
fn blocking_concurrent_builders_share_client() {
    let (addr, received) = start_blocking(false);
    let client = client_for(addr);

    std::thread::scope(|scope| {
        for i in 0..4 {
            let client = &client;
            scope.spawn(move || {
                let bytes = client.render_html(format!("<p>{i}</p>")).send_sync().unwrap();
                assert_eq!(bytes, PDF_BYTES);
            });
        }
    });

    assert_eq!(received.blocking_read().len(), 4);
}

// ---------------------------------------------------------------------------
// Async
// ---------------------------------------------------------------------------

#[tokio::test(flavor = "multi_thread")]
async fn async_health_and_render() {
    let (addr, received) = start_async(false).await;
    let client = client_for(addr);

    assert!(client.health().await);

    let builder = client
        .render_url("https://example.com")
        .format(OutputFormat::Png)
        .palette(Palette::Grayscale);
    let first = builder.send().await.unwrap();
    let second = builder.send().await.unwrap();
    assert_eq!(first, PNG_BYTES);
    assert_eq!(first, second);

    let log = received.read().await;
    assert_eq!(log.len(), 2);
    assert_eq!(log[0]["quantize"], serde_json::json!({"palette": "grayscale"}));
}

#[tokio::test(flavor = "multi_thread")]
async fn async_validation_error_carries_message() {
    let (addr, _) = start_async(false).await;
    let client = client_for(addr);

    let err = client
        .render_html("<p>x</p>")
        .pdf_watermark_opacity(2.0)
        .send()
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(400));
    assert_eq!(err.to_string(), "server error (400): watermark opacity must be between 0 and 1");
}

#[tokio::test(flavor = "multi_thread")]
async fn async_failing_server() {
    let (addr, _) = start_async(true).await;
    let client = client_for(addr);

    assert!(!client.health().await);
    let err = client.render_html("<p>x</p>").send().await.unwrap_err();
    assert!(matches!(err, ForgeError::Server { status: 502, ref message } if message == "HTTP 502"));
}

#[tokio::test(flavor = "multi_thread")]
async fn async_connection_refused() {
    let client = client_for(refused_addr());

    assert!(!client.health().await);
    let err = client.render_html("<p>x</p>").send().await.unwrap_err();
    assert!(err.is_connection(), "expected connection error, got {err:?}");
}

#[tokio::test(flavor = "multi_thread")]
async fn async_empty_source_fails_before_io() {
    let client = client_for(refused_addr());
    let err = client.render_url("").send().await.unwrap_err();
    assert!(matches!(err, ForgeError::EmptySource));
}
