//! Broker delivery endpoints

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    error::{AppError, ServerError},
    model::{app_state::AppState, response::Result},
    service::broker::{self, BrokerAction},
};

#[derive(Debug, Deserialize)]
pub struct BrokerRequest {
    pub url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryReceipt {
    pub broker: String,
    pub action: String,
    pub message_id: String,
}

/// Send the register, update or unregister message to the broker named in the body.
#[post("/{action}")]
pub async fn notify_broker(
    data: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<BrokerRequest>,
) -> std::result::Result<HttpResponse, AppError> {
    let action = path
        .into_inner()
        .parse::<BrokerAction>()
        .map_err(ServerError::IllegalArgument)?;
    let BrokerRequest { url } = body.into_inner();

    if url::Url::parse(&url).is_err() {
        return Err(ServerError::IllegalArgument(format!("invalid broker url '{}'", url)).into());
    }

    debug!(broker = %url, action = %action, "Broker delivery requested");

    let message = broker::deliver(&data.service, &data.broker_client, action, &url).await?;

    Ok(Result::<DeliveryReceipt>::http_success(DeliveryReceipt {
        broker: url,
        action: action.to_string(),
        message_id: message.id.to_string(),
    }))
}
