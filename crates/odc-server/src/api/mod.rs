pub mod about;
pub mod broker;
pub mod data;
pub mod health;
pub mod messages;
pub mod route;

use actix_web::HttpResponse;
use serde::Serialize;

use odc_common::LD_JSON_CONTENT_TYPE;

use crate::error::AppError;

/// Serialize `value` as a JSON-LD response body.
pub fn ld_json(value: &impl Serialize) -> Result<HttpResponse, AppError> {
    let body = serde_json::to_string(value).map_err(anyhow::Error::from)?;
    Ok(HttpResponse::Ok()
        .content_type(LD_JSON_CONTENT_TYPE)
        .body(body))
}
