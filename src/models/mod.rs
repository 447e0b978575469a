// Model exports
pub mod domain;
pub mod events;
pub mod responses;

pub use domain::{
    AdPlacement, AffinityTag, BusinessProfile, RideRequestContext, RiderProfile, SignalReadings,
};
pub use events::{
    EventDecodeError, InboundEvent, RideRequestEvent, RiderInterestEvent, RiderStatusEvent,
};
pub use responses::{ErrorResponse, EventAccepted, HealthResponse};
