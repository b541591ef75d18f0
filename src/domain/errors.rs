use thiserror::Error;

/// Errors returned by the Robot webservice client
#[derive(Debug, Error)]
pub enum RobotError {
    #[error("Transport failure on {endpoint}: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest_middleware::Error,
    },

    #[error("API error on {endpoint}: {status} - {code}")]
    Api {
        endpoint: String,
        status: u16,
        code: String,
        message: Option<String>,
    },

    #[error("Unparseable error body on {endpoint} (HTTP {http_status}): {source}")]
    MalformedErrorBody {
        endpoint: String,
        http_status: u16,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to decode {endpoint} response: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
}

impl RobotError {
    /// A 2xx payload that does not match the expected schema means the upstream
    /// contract changed. Everything else only aborts the current cycle.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }
}

/// Errors raised while loading configuration at startup
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Please provide {0} as environment variable")]
    MissingCredential(&'static str),

    #[error("Invalid {var}: {value} ({reason})")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn json_error() -> serde_json::Error {
        serde_json::from_str::<serde_json::Value>("{not json").unwrap_err()
    }

    #[test]
    fn test_api_error_formatting() {
        let error = RobotError::Api {
            endpoint: "/traffic".to_string(),
            status: 401,
            code: "UNAUTHORIZED".to_string(),
            message: None,
        };

        let msg = error.to_string();
        assert!(msg.contains("401 - UNAUTHORIZED"));
        assert!(msg.contains("/traffic"));
        assert!(!error.is_fatal());
    }

    #[test]
    fn test_only_payload_decode_is_fatal() {
        let decode = RobotError::Decode {
            endpoint: "/server".to_string(),
            source: json_error(),
        };
        let envelope = RobotError::MalformedErrorBody {
            endpoint: "/server".to_string(),
            http_status: 502,
            source: json_error(),
        };

        assert!(decode.is_fatal());
        assert!(!envelope.is_fatal());
        assert!(envelope.to_string().contains("/server"));
    }

    #[test]
    fn test_config_error_formatting() {
        let error = ConfigError::MissingCredential("HETZNER_USER");
        assert!(error.to_string().contains("HETZNER_USER"));
    }
}
