use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::models::SignalReadings;

/// Errors raised while decoding an inbound event envelope.
///
/// `UnrecognizedType` is the contract-violation case: the inbound channel
/// only carries the three known event kinds, so anything else indicates a
/// broken transport or schema upstream and must halt the process. The other
/// variants are plain transport-level malformations.
#[derive(Debug, Error)]
pub enum EventDecodeError {
    #[error("event is missing the type discriminator")]
    MissingType,

    #[error("unrecognized event type: {0}")]
    UnrecognizedType(String),

    #[error("malformed {kind} payload: {source}")]
    MalformedPayload {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl EventDecodeError {
    /// True for the variant that must be surfaced as unrecoverable.
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, EventDecodeError::UnrecognizedType(_))
    }
}

/// `RIDER_STATUS`: fresh signal readings for a rider.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RiderStatusEvent {
    #[serde(rename = "userId")]
    pub user_id: i64,
    #[serde(flatten)]
    pub signals: SignalReadings,
}

/// `RIDER_INTEREST`: a sustained category of interest observed for a rider.
/// `duration` is in milliseconds.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RiderInterestEvent {
    #[serde(rename = "userId")]
    pub user_id: i64,
    pub interest: String,
    #[validate(range(min = 0))]
    pub duration: i64,
}

/// `RIDE_REQUEST`: a rider asking for a ride at the given coordinates.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RideRequestEvent {
    #[serde(rename = "clientId")]
    pub client_id: i64,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
}

/// A decoded inbound event, discriminated by the wire `type` field.
#[derive(Debug, Clone)]
pub enum InboundEvent {
    RiderStatus(RiderStatusEvent),
    RiderInterest(RiderInterestEvent),
    RideRequest(RideRequestEvent),
}

impl InboundEvent {
    /// Decode a raw JSON envelope into a typed event.
    ///
    /// The discriminator is inspected first so an unknown `type` string is
    /// reported as `UnrecognizedType` rather than a generic parse failure.
    pub fn from_value(value: Value) -> Result<Self, EventDecodeError> {
        let kind = value
            .get("type")
            .and_then(Value::as_str)
            .ok_or(EventDecodeError::MissingType)?
            .to_owned();

        match kind.as_str() {
            "RIDER_STATUS" => serde_json::from_value(value)
                .map(InboundEvent::RiderStatus)
                .map_err(|source| EventDecodeError::MalformedPayload {
                    kind: "RIDER_STATUS",
                    source,
                }),
            "RIDER_INTEREST" => serde_json::from_value(value)
                .map(InboundEvent::RiderInterest)
                .map_err(|source| EventDecodeError::MalformedPayload {
                    kind: "RIDER_INTEREST",
                    source,
                }),
            "RIDE_REQUEST" => serde_json::from_value(value)
                .map(InboundEvent::RideRequest)
                .map_err(|source| EventDecodeError::MalformedPayload {
                    kind: "RIDE_REQUEST",
                    source,
                }),
            _ => Err(EventDecodeError::UnrecognizedType(kind)),
        }
    }

    /// The rider id this event belongs to, used as the partition key.
    pub fn partition_key(&self) -> i64 {
        match self {
            InboundEvent::RiderStatus(e) => e.user_id,
            InboundEvent::RiderInterest(e) => e.user_id,
            InboundEvent::RideRequest(e) => e.client_id,
        }
    }

    /// Wire name of the event kind, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            InboundEvent::RiderStatus(_) => "RIDER_STATUS",
            InboundEvent::RiderInterest(_) => "RIDER_INTEREST",
            InboundEvent::RideRequest(_) => "RIDE_REQUEST",
        }
    }

    /// Run the payload-level range validations.
    pub fn validate_payload(&self) -> Result<(), ValidationErrors> {
        match self {
            InboundEvent::RiderStatus(e) => e.validate(),
            InboundEvent::RiderInterest(e) => e.validate(),
            InboundEvent::RideRequest(e) => e.validate(),
        }
    }
}
