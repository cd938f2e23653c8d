// Error handling for the HTTP surface
// Maps engine and broker failures onto `{code, message, data}` envelopes

use std::fmt::{Display, Formatter};

use actix_web::HttpResponse;

pub use odc_common::error::{
    ARTIFACT_NOT_FOUND, ARTIFACT_UNAVAILABLE, BROKER_DELIVERY_FAILURE, COMPOSITION_FAILURE,
    CONFIG_UNAVAILABLE, ErrorCode, PARAMETER_VALIDATE_ERROR, SERVER_ERROR, TOKEN_UNAVAILABLE,
    URI_CONSTRUCTION_ERROR,
};
use odc_core::EngineError;

use crate::model::response as common;
use crate::service::broker::BrokerClientError;

/// Request-level failures raised by the handlers themselves
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("illegal argument: {0}")]
    IllegalArgument(String),

    #[error("unsupported self-description format '{0}'")]
    UnsupportedFormat(String),
}

// Local wrapper so foreign error types can implement actix-web's ResponseError
#[derive(Debug)]
pub struct AppError {
    inner: anyhow::Error,
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(value: anyhow::Error) -> Self {
        AppError { inner: value }
    }
}

impl From<EngineError> for AppError {
    fn from(value: EngineError) -> Self {
        AppError {
            inner: value.into(),
        }
    }
}

impl From<BrokerClientError> for AppError {
    fn from(value: BrokerClientError) -> Self {
        AppError {
            inner: value.into(),
        }
    }
}

impl From<ServerError> for AppError {
    fn from(value: ServerError) -> Self {
        AppError {
            inner: value.into(),
        }
    }
}

impl AppError {
    pub fn downcast_ref<E: std::error::Error + Send + Sync + 'static>(&self) -> Option<&E> {
        self.inner.downcast_ref::<E>()
    }

    /// HTTP status and envelope code for this failure
    pub fn status_and_code(&self) -> (u16, ErrorCode<'static>) {
        if let Some(e) = self.downcast_ref::<EngineError>() {
            return match e {
                EngineError::ConfigUnavailable(_) => (503, CONFIG_UNAVAILABLE),
                EngineError::Build(_) => (500, URI_CONSTRUCTION_ERROR),
                EngineError::CompositionFailure(_) => (500, COMPOSITION_FAILURE),
                EngineError::TokenUnavailable(_) => (503, TOKEN_UNAVAILABLE),
                EngineError::ArtifactNotFound(_) => (404, ARTIFACT_NOT_FOUND),
                EngineError::ArtifactUnavailable(_) => (503, ARTIFACT_UNAVAILABLE),
            };
        }
        if self.downcast_ref::<BrokerClientError>().is_some() {
            return (502, BROKER_DELIVERY_FAILURE);
        }
        if let Some(e) = self.downcast_ref::<ServerError>() {
            return match e {
                ServerError::IllegalArgument(_) => (400, PARAMETER_VALIDATE_ERROR),
                ServerError::UnsupportedFormat(_) => (406, PARAMETER_VALIDATE_ERROR),
            };
        }
        (500, SERVER_ERROR)
    }
}

impl actix_web::error::ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let (status, code) = self.status_and_code();
        common::Result::<String>::http_response(
            status,
            code.code,
            format!("{:#}", self.inner),
            String::new(),
        )
    }
}
