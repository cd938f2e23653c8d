//! Error codes for connector API responses
//!
//! Every failure the HTTP surface reports carries one of these codes in its
//! `{code, message, data}` envelope.

use serde::{Deserialize, Serialize};

/// Error code structure for API responses
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorCode<'a> {
    pub code: i32,
    pub message: &'a str,
}

pub const SUCCESS: ErrorCode<'static> = ErrorCode {
    code: 0,
    message: "success",
};

pub const PARAMETER_VALIDATE_ERROR: ErrorCode<'static> = ErrorCode {
    code: 20002,
    message: "parameter validate error",
};

// Self-description assembly errors
pub const CONFIG_UNAVAILABLE: ErrorCode<'static> = ErrorCode {
    code: 30001,
    message: "connector configuration unavailable",
};

pub const URI_CONSTRUCTION_ERROR: ErrorCode<'static> = ErrorCode {
    code: 30002,
    message: "descriptor uri construction failed",
};

pub const COMPOSITION_FAILURE: ErrorCode<'static> = ErrorCode {
    code: 30003,
    message: "catalog composition failed",
};

pub const TOKEN_UNAVAILABLE: ErrorCode<'static> = ErrorCode {
    code: 30004,
    message: "security token unavailable",
};

pub const BROKER_DELIVERY_FAILURE: ErrorCode<'static> = ErrorCode {
    code: 30005,
    message: "broker delivery failed",
};

pub const ARTIFACT_NOT_FOUND: ErrorCode<'static> = ErrorCode {
    code: 30006,
    message: "artifact not found",
};

pub const ARTIFACT_UNAVAILABLE: ErrorCode<'static> = ErrorCode {
    code: 30007,
    message: "artifact store unavailable",
};

pub const SERVER_ERROR: ErrorCode<'static> = ErrorCode {
    code: 30000,
    message: "server error",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assembly_codes_are_distinct() {
        let codes = [
            CONFIG_UNAVAILABLE.code,
            URI_CONSTRUCTION_ERROR.code,
            COMPOSITION_FAILURE.code,
            TOKEN_UNAVAILABLE.code,
            BROKER_DELIVERY_FAILURE.code,
            ARTIFACT_NOT_FOUND.code,
            ARTIFACT_UNAVAILABLE.code,
            SERVER_ERROR.code,
        ];
        let mut sorted = codes.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), codes.len());
    }

    #[test]
    fn test_success_code() {
        assert_eq!(SUCCESS.code, 0);
        assert_eq!(SUCCESS.message, "success");
        assert_eq!(ErrorCode::default().code, 0);
    }
}
