use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Serialize;

use pagesift_core::{PageSnippet, PreviewReport};

pub const NO_MATCH_MESSAGE: &str = "Nijedna stranica ne sadrži tražene pojmove.";
pub const PROCESSING_MESSAGE: &str = "Greška pri obradi PDF fajla.";

// ── Response bodies ─────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct MessageBody {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct NoMatchBody {
    pub count: usize,
    pub message: String,
}

impl NoMatchBody {
    pub fn empty() -> Self {
        Self {
            count: 0,
            message: NO_MATCH_MESSAGE.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageJson {
    pub page_number: usize,
    pub text_snippet: String,
}

impl From<PageSnippet> for PageJson {
    fn from(p: PageSnippet) -> Self {
        PageJson {
            page_number: p.page_number,
            text_snippet: p.text_snippet,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewBody {
    pub count: usize,
    pub pages: Vec<PageJson>,
    pub total_pages: usize,
    /// Base64-encoded PDF of the matched pages in ranked order.
    pub preview_pdf: String,
}

impl From<PreviewReport> for PreviewBody {
    fn from(report: PreviewReport) -> Self {
        PreviewBody {
            count: report.count,
            pages: report.pages.into_iter().map(PageJson::from).collect(),
            total_pages: report.total_pages,
            preview_pdf: STANDARD.encode(&report.preview_pdf),
        }
    }
}

// ── Helpers ─────────────────────────────────────────────────────────────

/// Serialize `body` as JSON with an explicit UTF-8 charset.
pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response {
    match serde_json::to_vec(body) {
        Ok(bytes) => (
            status,
            [(
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/json; charset=utf-8"),
            )],
            bytes,
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "failed to serialize response body");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

pub fn message_response(status: StatusCode, message: &str) -> Response {
    json_response(
        status,
        &MessageBody {
            message: message.to_string(),
        },
    )
}
