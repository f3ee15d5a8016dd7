use std::time::Duration;

/// What a single outbound gateway call can fail with
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    #[error("gateway call timed out after {0:?}")]
    Timeout(Duration),

    /// The platform refused or failed the request (permissions, unknown message, outage)
    #[error("discord request failed: {0}")]
    Discord(String),

    #[error("webhook {0} has no execution token")]
    MissingToken(u64),

    /// The platform refused this particular payload (HTTP 400); the endpoint itself is fine
    #[error("discord rejected the message: {0}")]
    Rejected(String),
}

impl GatewayError {
    /// Whether the endpoint used for the failed call should be rediscovered before reuse
    pub fn invalidates_endpoint(&self) -> bool {
        !matches!(self, GatewayError::Rejected(_))
    }
}

/// Why a persona message could not be relayed. The original message stays visible in both cases.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RelayError {
    #[error("relay webhook unavailable in channel {channel_id}: {source}")]
    EndpointUnavailable {
        channel_id: u64,
        #[source]
        source: GatewayError,
    },

    #[error("relay send failed in channel {channel_id}: {source}")]
    SendFailed {
        channel_id: u64,
        #[source]
        source: GatewayError,
    },
}

impl RelayError {
    pub fn channel_id(&self) -> u64 {
        match self {
            RelayError::EndpointUnavailable { channel_id, .. }
            | RelayError::SendFailed { channel_id, .. } => *channel_id,
        }
    }
}
