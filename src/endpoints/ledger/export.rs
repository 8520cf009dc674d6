use anyhow::Context;
use axum::{extract::Multipart, response::IntoResponse};
use http::header;

use crate::{
    endpoints::ledger::{
        EXPORT_FILE_NAME, LEDGER_TAG,
        upload::{UploadForm, normalize, read_upload},
    },
    error::ApiError,
    ledger,
};

#[utoipa::path(
    post,
    path = "/v1/ledger/export",
    operation_id = "v1/ledger/export",
    tag = LEDGER_TAG,
    request_body(
        content = UploadForm,
        content_type = "multipart/form-data",
    ),
    responses(
        (status = 200, content_type = "text/csv", body = String),
        (status = 400, description = "file could not be read"),
        (status = 422, description = "file does not contain a usable ledger"),
    )
)]
pub async fn export(multipart: Multipart) -> Result<impl IntoResponse, ApiError> {
    let upload = read_upload(multipart).await?;

    let table = normalize(upload).await?;
    let csv = ledger::serialize(&table).context("error serializing ledger")?;

    return Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_owned()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", EXPORT_FILE_NAME),
            ),
        ],
        csv,
    ));
}
