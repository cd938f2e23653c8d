//! Artifact download endpoint advertised in every resource endpoint

use actix_web::{HttpResponse, get, web};

use crate::{
    error::{AppError, ServerError},
    model::app_state::AppState,
    service::artifact::content_type,
};

/// Split `7` or `7.csv` into the asset id and optional extension.
fn parse_file_name(file: &str) -> Result<(i64, Option<&str>), ServerError> {
    let (id, extension) = match file.split_once('.') {
        Some((id, ext)) => (id, Some(ext)),
        None => (file, None),
    };
    let id = id
        .parse::<i64>()
        .map_err(|_| ServerError::IllegalArgument(format!("invalid asset id '{}'", id)))?;
    Ok((id, extension))
}

#[get("/{file}")]
pub async fn artifact(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let file = path.into_inner();
    let (asset_id, extension) = parse_file_name(&file)?;

    let content = data.service.artifact(asset_id, extension).await?;
    Ok(HttpResponse::Ok()
        .content_type(content_type(content.extension()))
        .body(content.bytes))
}
