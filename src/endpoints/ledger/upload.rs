use anyhow::Context;
use axum::{body::Bytes, extract::Multipart};
use utoipa::ToSchema;

use crate::{
    error::ApiError,
    ledger::{self, LedgerTable},
};

/// Multipart body accepted by the ledger endpoints.
#[allow(dead_code)]
#[derive(ToSchema)]
pub struct UploadForm {
    /// Accounting export, the file name decides csv or spreadsheet parsing.
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

#[derive(Debug)]
pub struct Upload {
    pub file_name: String,
    pub bytes: Bytes,
}

pub async fn read_upload(mut multipart: Multipart) -> Result<Upload, ApiError> {
    let mut upload = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| ApiError::BadRequest(err.body_text()))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field
            .file_name()
            .filter(|name| !name.is_empty())
            .map(|name| name.to_owned())
            .ok_or_else(|| ApiError::BadRequest("Missing file name".to_owned()))?;

        let bytes = field
            .bytes()
            .await
            .map_err(|err| ApiError::BadRequest(err.body_text()))?;

        upload = Some(Upload { file_name, bytes });
    }

    let upload = upload.ok_or_else(|| ApiError::BadRequest("Missing file".to_owned()))?;

    tracing::debug!(
        "received '{}' ({} bytes)",
        upload.file_name,
        upload.bytes.len()
    );

    return Ok(upload);
}

/// Normalizes the upload on a blocking worker.
pub async fn normalize(upload: Upload) -> Result<LedgerTable, ApiError> {
    let table = tokio::task::spawn_blocking(move || {
        ledger::process(&upload.bytes, &upload.file_name)
    })
    .await
    .context("error joining normalization task")??;

    return Ok(table);
}
