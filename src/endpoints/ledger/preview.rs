use axum::{Json, extract::Multipart, response::IntoResponse};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    endpoints::ledger::{
        LEDGER_TAG,
        upload::{UploadForm, normalize, read_upload},
    },
    error::ApiError,
    ledger::LedgerRecord,
};

#[derive(Debug, Serialize, ToSchema)]
pub struct Output {
    pub file_name: String,
    pub row_count: usize,
    pub records: Vec<LedgerRecord>,
}

#[utoipa::path(
    post,
    path = "/v1/ledger/preview",
    operation_id = "v1/ledger/preview",
    tag = LEDGER_TAG,
    request_body(
        content = UploadForm,
        content_type = "multipart/form-data",
    ),
    responses(
        (status = 200, body = Output),
        (status = 400, description = "file could not be read"),
        (status = 422, description = "file does not contain a usable ledger"),
    )
)]
pub async fn preview(multipart: Multipart) -> Result<impl IntoResponse, ApiError> {
    let upload = read_upload(multipart).await?;
    let file_name = upload.file_name.clone();

    let table = normalize(upload).await?;

    return Ok(Json(Output {
        file_name,
        row_count: table.len(),
        records: table.records,
    }));
}
