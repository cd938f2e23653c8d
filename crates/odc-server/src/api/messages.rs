//! Lifecycle message preview endpoints

use actix_web::{HttpResponse, get, web};

use crate::{
    error::{AppError, ServerError},
    model::app_state::AppState,
    service::broker::BrokerAction,
};

/// Build the register, update or unregister message without sending it.
#[get("/{kind}")]
pub async fn build_message(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let action = path
        .into_inner()
        .parse::<BrokerAction>()
        .map_err(ServerError::IllegalArgument)?;

    let message = data.service.message(action.message_kind()).await?;
    Ok(HttpResponse::Ok().json(message))
}
