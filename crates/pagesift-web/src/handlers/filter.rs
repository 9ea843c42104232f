use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};

use pagesift_core::{FilterOptions, FilterOutcome, FilterRequest, PdfBackend, run_filter};

use crate::error::ApiError;
use crate::models::{NoMatchBody, PreviewBody, json_response};
use crate::state::AppState;
use crate::upload;

const DOWNLOAD_DISPOSITION: &str = "attachment; filename=filtrirano.pdf";

pub async fn filter(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, ApiError> {
    let multipart = multipart.map_err(upload::rejection_error)?;
    let form = upload::parse_multipart(multipart).await?;
    let (file, request) = form.into_request(state.options.locale)?;

    // Create a temp directory (auto-cleaned on drop)
    let temp_dir = tempfile::tempdir()
        .map_err(|e| ApiError::processing("failed to create temp directory", e))?;
    let pdf_path = temp_dir.path().join("upload.pdf");
    std::fs::write(&pdf_path, &file.data)
        .map_err(|e| ApiError::processing("failed to write temp file", e))?;

    tracing::info!(
        filename = %file.filename,
        bytes = file.data.len(),
        preview = request.preview(),
        "filtering upload"
    );

    let preview = request.preview();
    let outcome = filter_blocking(
        pdf_path,
        Arc::clone(&state.backend),
        request,
        state.options.clone(),
    )
    .await
    .map_err(|e| ApiError::processing(&format!("failed to filter {}", file.filename), e))?;

    drop(temp_dir);

    Ok(match outcome {
        FilterOutcome::NoMatch { .. } => {
            let status = if preview {
                StatusCode::OK
            } else {
                StatusCode::NOT_FOUND
            };
            json_response(status, &NoMatchBody::empty())
        }
        FilterOutcome::Preview(report) => json_response(StatusCode::OK, &PreviewBody::from(report)),
        FilterOutcome::Document(document) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, HeaderValue::from_static("application/pdf")),
                (
                    header::CONTENT_DISPOSITION,
                    HeaderValue::from_static(DOWNLOAD_DISPOSITION),
                ),
                (header::CACHE_CONTROL, HeaderValue::from_static("no-store")),
            ],
            document.bytes,
        )
            .into_response(),
    })
}

/// Run the filter pipeline on a blocking thread (MuPDF and lopdf are sync).
async fn filter_blocking(
    path: PathBuf,
    backend: Arc<dyn PdfBackend>,
    request: FilterRequest,
    options: FilterOptions,
) -> Result<FilterOutcome, String> {
    tokio::task::spawn_blocking(move || {
        run_filter(&path, backend.as_ref(), &request, &options).map_err(|e| e.to_string())
    })
    .await
    .map_err(|e| format!("Task join error: {}", e))?
}
