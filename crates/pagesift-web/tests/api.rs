//! HTTP-level tests for the filter API, driven through the router with
//! `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode, header};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::Value;
use tower::ServiceExt;

use pagesift_core::FilterOptions;
use pagesift_core::mock::{MockBackend, build_pdf};
use pagesift_web::{AppState, router};

const BOUNDARY: &str = "pagesift-test-boundary";
const TEXTS: [&str; 3] = ["no terms here", "contains cat", "dog and cat both"];
const LABELS: [&str; 3] = ["page-1", "page-2", "page-3"];

enum Part<'a> {
    Text(&'a str, &'a str),
    File(&'a str, &'a [u8]),
}

fn multipart_body(parts: &[Part]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File(name, data) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"source.pdf\"\r\n\
                         Content-Type: application/pdf\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(data);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn app(backend: Arc<MockBackend>) -> Router {
    app_with_limit(backend, 10 * 1024 * 1024)
}

fn app_with_limit(backend: Arc<MockBackend>, max_upload_bytes: usize) -> Router {
    let state = Arc::new(AppState {
        backend,
        options: FilterOptions::default(),
    });
    router(state, max_upload_bytes)
}

async fn post_filter(app: Router, parts: &[Part<'_>]) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri("/api/filter")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

async fn body_json(response: Response<Body>) -> Value {
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/json; charset=utf-8"
    );
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

/// Labels of the pages of `pdf`, in document order.
fn labels(pdf: &[u8]) -> Vec<&'static str> {
    let doc = lopdf::Document::load_mem(pdf).unwrap();
    doc.get_pages()
        .values()
        .map(|&id| {
            let content = String::from_utf8_lossy(&doc.get_page_content(id).unwrap()).into_owned();
            LABELS
                .into_iter()
                .find(|label| content.contains(label))
                .unwrap()
        })
        .collect()
}

fn source_pdf() -> Vec<u8> {
    build_pdf(&LABELS).unwrap()
}

#[tokio::test]
async fn download_ranks_required_matches() {
    let backend = Arc::new(MockBackend::with_pages(TEXTS));
    let pdf = source_pdf();
    let response = post_filter(
        app(backend.clone()),
        &[
            Part::File("file", &pdf),
            Part::Text("requiredTerms", r#"["Cat"]"#),
        ],
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(headers[header::CONTENT_TYPE], "application/pdf");
    assert_eq!(
        headers[header::CONTENT_DISPOSITION],
        "attachment; filename=filtrirano.pdf"
    );
    assert_eq!(headers[header::CACHE_CONTROL], "no-store");

    let bytes = body_bytes(response).await;
    assert_eq!(labels(&bytes), vec!["page-3", "page-2"]);
    assert_eq!(backend.call_count(), 1);
}

#[tokio::test]
async fn download_mode_all() {
    let backend = Arc::new(MockBackend::with_pages(TEXTS));
    let pdf = source_pdf();
    let response = post_filter(
        app(backend),
        &[
            Part::File("file", &pdf),
            Part::Text("terms", "cat, dog"),
            Part::Text("mode", "all"),
        ],
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(labels(&body_bytes(response).await), vec!["page-3"]);
}

#[tokio::test]
async fn preview_returns_snippets_and_pdf() {
    let backend = Arc::new(MockBackend::with_pages(TEXTS));
    let pdf = source_pdf();
    let response = post_filter(
        app(backend),
        &[
            Part::File("file", &pdf),
            Part::Text("terms", "cat"),
            Part::Text("preview", "1"),
        ],
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["count"], 2);
    assert_eq!(json["totalPages"], 3);
    assert_eq!(json["pages"][0]["pageNumber"], 3);
    assert_eq!(json["pages"][0]["textSnippet"], "dog and cat both");
    assert_eq!(json["pages"][1]["pageNumber"], 2);

    let preview = STANDARD
        .decode(json["previewPdf"].as_str().unwrap())
        .unwrap();
    assert_eq!(labels(&preview), vec!["page-3", "page-2"]);
}

#[tokio::test]
async fn no_match_preview_is_ok() {
    let backend = Arc::new(MockBackend::with_pages(TEXTS));
    let pdf = source_pdf();
    let response = post_filter(
        app(backend),
        &[
            Part::File("file", &pdf),
            Part::Text("terms", "bird"),
            Part::Text("preview", "1"),
        ],
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["count"], 0);
    assert_eq!(json["message"], "Nijedna stranica ne sadrži tražene pojmove.");
}

#[tokio::test]
async fn no_match_download_is_not_found() {
    let backend = Arc::new(MockBackend::with_pages(TEXTS));
    let pdf = source_pdf();
    let response = post_filter(
        app(backend),
        &[
            Part::File("file", &pdf),
            Part::Text("requiredTerms", r#"["bird"]"#),
        ],
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["count"], 0);
    assert_eq!(json["message"], "Nijedna stranica ne sadrži tražene pojmove.");
}

#[tokio::test]
async fn malformed_terms_rejected_before_extraction() {
    let backend = Arc::new(MockBackend::with_pages(TEXTS));
    let pdf = source_pdf();
    let response = post_filter(
        app(backend.clone()),
        &[
            Part::File("file", &pdf),
            Part::Text("requiredTerms", "[\"cat\""),
        ],
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Neispravni parametri pretrage.");
    assert_eq!(backend.call_count(), 0);
}

#[tokio::test]
async fn missing_file_rejected() {
    let backend = Arc::new(MockBackend::with_pages(TEXTS));
    let response = post_filter(
        app(backend.clone()),
        &[
            Part::Text("file", "not a file part"),
            Part::Text("terms", "cat"),
        ],
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Nedostaje PDF fajl.");
    assert_eq!(backend.call_count(), 0);
}

#[tokio::test]
async fn blank_terms_rejected() {
    let backend = Arc::new(MockBackend::with_pages(TEXTS));
    let pdf = source_pdf();
    let response = post_filter(
        app(backend),
        &[Part::File("file", &pdf), Part::Text("terms", " ,; | ")],
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Unesite bar jedan pojam za pretragu.");
}

#[tokio::test]
async fn unknown_mode_rejected() {
    let backend = Arc::new(MockBackend::with_pages(TEXTS));
    let pdf = source_pdf();
    let response = post_filter(
        app(backend),
        &[
            Part::File("file", &pdf),
            Part::Text("terms", "cat"),
            Part::Text("mode", "most"),
        ],
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Neispravni parametri pretrage.");
}

#[tokio::test]
async fn both_term_shapes_rejected() {
    let backend = Arc::new(MockBackend::with_pages(TEXTS));
    let pdf = source_pdf();
    let response = post_filter(
        app(backend),
        &[
            Part::File("file", &pdf),
            Part::Text("requiredTerms", r#"["cat"]"#),
            Part::Text("terms", "dog"),
        ],
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn extraction_failure_is_generic_server_error() {
    let backend = Arc::new(MockBackend::failing(2, "broken font"));
    let pdf = source_pdf();
    let response = post_filter(
        app(backend),
        &[Part::File("file", &pdf), Part::Text("terms", "cat")],
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Greška pri obradi PDF fajla.");
    assert!(!json.to_string().contains("broken font"));
}

#[tokio::test]
async fn health_reports_ok() {
    let backend = Arc::new(MockBackend::with_pages(TEXTS));
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = app(backend).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(json, serde_json::json!({ "status": "ok" }));
}

#[tokio::test]
async fn non_multipart_body_is_json_bad_request() {
    let backend = Arc::new(MockBackend::with_pages(TEXTS));
    let request = Request::builder()
        .method("POST")
        .uri("/api/filter")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"terms":"cat"}"#))
        .unwrap();
    let response = app(backend.clone()).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Neispravni parametri pretrage.");
    assert_eq!(backend.call_count(), 0);
}

#[tokio::test]
async fn oversized_file_is_payload_too_large() {
    let backend = Arc::new(MockBackend::with_pages(TEXTS));
    let big = vec![b'x'; 200_000];
    let response = post_filter(
        app_with_limit(backend.clone(), 50_000),
        &[Part::Text("terms", "cat"), Part::File("file", &big)],
    )
    .await;

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let json = body_json(response).await;
    assert_eq!(json["message"], "PDF fajl je prevelik.");
    assert_eq!(backend.call_count(), 0);
}

#[tokio::test]
async fn oversized_unknown_field_is_payload_too_large() {
    let backend = Arc::new(MockBackend::with_pages(TEXTS));
    let filler = "x".repeat(200_000);
    let pdf = source_pdf();
    let response = post_filter(
        app_with_limit(backend.clone(), 50_000),
        &[
            Part::Text("notes", &filler),
            Part::File("file", &pdf),
            Part::Text("terms", "cat"),
        ],
    )
    .await;

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let json = body_json(response).await;
    assert_eq!(json["message"], "PDF fajl je prevelik.");
    assert_eq!(backend.call_count(), 0);
}
