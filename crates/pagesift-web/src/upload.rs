use axum::extract::Multipart;
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::http::StatusCode;
use thiserror::Error;

use pagesift_core::terms::{parse_term_array_with, parse_terms_with};
use pagesift_core::{CaseLocale, FilterRequest, MatchMode, TermError, TermSpec};

/// An uploaded file with its data and metadata.
pub struct UploadedFile {
    pub filename: String,
    pub data: Vec<u8>,
}

/// Raw form fields from the multipart upload, before validation.
#[derive(Default)]
pub struct FilterForm {
    pub file: Option<UploadedFile>,
    pub required_terms: Option<String>,
    pub optional_terms: Option<String>,
    pub terms: Option<String>,
    pub mode: Option<String>,
    pub preview: bool,
}

/// Reasons a request is rejected before any document processing.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ClientInputError {
    #[error("no PDF file in the upload")]
    MissingFile,
    #[error("failed to read form: {0}")]
    Form(String),
    #[error("upload exceeds the size limit")]
    TooLarge,
    #[error("both requiredTerms/optionalTerms and terms were supplied")]
    ConflictingTermFields,
    #[error(transparent)]
    Terms(#[from] TermError),
}

impl ClientInputError {
    pub fn status(&self) -> StatusCode {
        match self {
            ClientInputError::TooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    /// User-facing message (Serbian, kept stable for existing clients).
    pub fn user_message(&self) -> &'static str {
        match self {
            ClientInputError::MissingFile => "Nedostaje PDF fajl.",
            ClientInputError::TooLarge => "PDF fajl je prevelik.",
            ClientInputError::Terms(TermError::NoTerms) => "Unesite bar jedan pojam za pretragu.",
            ClientInputError::Form(_)
            | ClientInputError::ConflictingTermFields
            | ClientInputError::Terms(_) => "Neispravni parametri pretrage.",
        }
    }
}

fn form_error(e: MultipartError) -> ClientInputError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ClientInputError::TooLarge
    } else {
        ClientInputError::Form(e.to_string())
    }
}

/// The request body could not be read as multipart at all.
pub fn rejection_error(rejection: MultipartRejection) -> ClientInputError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ClientInputError::TooLarge
    } else {
        ClientInputError::Form(rejection.body_text())
    }
}

/// Parse a multipart form upload into raw form fields.
pub async fn parse_multipart(mut multipart: Multipart) -> Result<FilterForm, ClientInputError> {
    let mut form = FilterForm::default();

    while let Some(field) = multipart.next_field().await.map_err(form_error)? {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            // Only a file part counts; a plain text field named "file" does not.
            "file" if field.file_name().is_some() => {
                let filename = field.file_name().unwrap_or("upload.pdf").to_string();
                let data = field.bytes().await.map_err(form_error)?.to_vec();
                form.file = Some(UploadedFile { filename, data });
            }
            "requiredTerms" => form.required_terms = Some(field.text().await.map_err(form_error)?),
            "optionalTerms" => form.optional_terms = Some(field.text().await.map_err(form_error)?),
            "terms" => form.terms = Some(field.text().await.map_err(form_error)?),
            "mode" => form.mode = Some(field.text().await.map_err(form_error)?),
            "preview" => form.preview = field.text().await.map_err(form_error)? == "1",
            _ => {
                // Unknown fields are drained, but still count against the limit
                field.bytes().await.map_err(form_error)?;
            }
        }
    }

    Ok(form)
}

impl FilterForm {
    /// Validate the form into the uploaded file and a filter request.
    ///
    /// The file is checked first, then the terms. `requiredTerms` /
    /// `optionalTerms` select the required/optional shape; otherwise
    /// `terms` + `mode` (default `any`) are used.
    pub fn into_request(
        self,
        locale: CaseLocale,
    ) -> Result<(UploadedFile, FilterRequest), ClientInputError> {
        let file = self.file.ok_or(ClientInputError::MissingFile)?;

        let has_json_terms = self.required_terms.is_some() || self.optional_terms.is_some();
        let spec = if has_json_terms {
            if self.terms.is_some() {
                return Err(ClientInputError::ConflictingTermFields);
            }
            TermSpec::required_optional(
                json_terms(self.required_terms.as_deref(), locale)?,
                json_terms(self.optional_terms.as_deref(), locale)?,
            )
        } else {
            let mode = match self.mode.as_deref() {
                Some(raw) if !raw.trim().is_empty() => raw.parse::<MatchMode>()?,
                _ => MatchMode::default(),
            };
            TermSpec::with_mode(
                parse_terms_with(self.terms.as_deref().unwrap_or(""), locale),
                mode,
            )
        };

        let request = FilterRequest::new(spec, self.preview)?;
        Ok((file, request))
    }
}

/// A missing or blank JSON term field means "no terms".
fn json_terms(raw: Option<&str>, locale: CaseLocale) -> Result<Vec<String>, TermError> {
    match raw {
        Some(json) if !json.trim().is_empty() => parse_term_array_with(json, locale),
        _ => Ok(Vec::new()),
    }
}
