//! Self-description endpoints

use std::str::FromStr;

use actix_web::{HttpResponse, get, web};

use crate::{
    api::ld_json,
    error::{AppError, ServerError},
    model::app_state::AppState,
};

/// Serialization requested through the `/about/{extension}` suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptionFormat {
    JsonLd,
    Json,
}

impl FromStr for DescriptionFormat {
    type Err = ServerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "" | "jsonld" | "json-ld" => Ok(DescriptionFormat::JsonLd),
            "json" => Ok(DescriptionFormat::Json),
            other => Err(ServerError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// The connector self-description
#[get("")]
pub async fn connector(data: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let connector = data.service.connector().await?;
    ld_json(&connector)
}

/// The connector wrapped in a self-description response message
#[get("/self-description")]
pub async fn self_description(data: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let message = data.service.self_description_response().await?;
    ld_json(&message)
}

/// The connector in the format named by the path suffix
#[get("/{extension}")]
pub async fn connector_as(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let format = path.into_inner().parse::<DescriptionFormat>()?;

    let description = data.service.connector().await?;
    match format {
        DescriptionFormat::JsonLd => ld_json(&description),
        DescriptionFormat::Json => Ok(HttpResponse::Ok().json(description)),
    }
}
