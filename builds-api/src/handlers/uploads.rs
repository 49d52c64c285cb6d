use actix_multipart::{Field, Multipart};
use actix_web::{web, HttpResponse, Result};
use futures::TryStreamExt;
use shared_types::UploadKind;
use std::sync::Arc;

use crate::error::BuildError;
use crate::services::ImageUploads;

const MAX_TEXT_FIELD_BYTES: usize = 256;

async fn read_field(
    field: &mut Field,
    limit: usize,
    too_large: impl FnOnce() -> BuildError,
) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    while let Some(chunk) = field.try_next().await? {
        if buf.len() + chunk.len() > limit {
            return Err(too_large().into());
        }
        buf.extend_from_slice(&chunk);
    }
    Ok(buf)
}

async fn read_text(field: &mut Field) -> Result<String> {
    let bytes = read_field(field, MAX_TEXT_FIELD_BYTES, || {
        BuildError::Validation("Form field is too large".to_string())
    })
    .await?;
    String::from_utf8(bytes)
        .map(|s| s.trim().to_string())
        .map_err(|_| BuildError::Validation("Form fields must be UTF-8 text".to_string()).into())
}

pub async fn upload_image(
    uploads: web::Data<Arc<ImageUploads>>,
    mut payload: Multipart,
) -> Result<HttpResponse> {
    let mut file: Option<(String, Vec<u8>)> = None;
    let mut slug: Option<String> = None;
    let mut kind = UploadKind::default();

    while let Some(mut field) = payload.try_next().await? {
        let name = field.name().to_string();
        match name.as_str() {
            "file" => {
                let file_name = field
                    .content_disposition()
                    .get_filename()
                    .unwrap_or_default()
                    .to_string();
                let bytes =
                    read_field(&mut field, uploads.max_bytes(), || uploads.too_large()).await?;
                file = Some((file_name, bytes));
            }
            "slug" => slug = Some(read_text(&mut field).await?),
            "type" => {
                let value = read_text(&mut field).await?;
                kind = UploadKind::parse(&value).ok_or_else(|| {
                    BuildError::Validation("Type must be 'avatar' or 'featured'".to_string())
                })?;
            }
            other => {
                tracing::debug!("Ignoring unexpected upload field {}", other);
                while field.try_next().await?.is_some() {}
            }
        }
    }

    let (file_name, bytes) =
        file.ok_or_else(|| BuildError::Validation("No file uploaded".to_string()))?;
    let slug = slug.ok_or_else(|| BuildError::Validation("Slug is required".to_string()))?;

    let response = uploads.save(&slug, kind, &file_name, &bytes).await?;
    Ok(HttpResponse::Ok().json(response))
}
