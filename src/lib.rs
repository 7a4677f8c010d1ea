// Hotel room booking: form validation and the submission workflow

pub mod availability;
pub mod catalog;
pub mod form;
pub mod outcome;
pub mod persistence;
pub mod request;
pub mod rest_gateway;
pub mod submitter;
pub mod validation;

// Re-export key types for convenience
pub use availability::{
    AvailabilityError, AvailabilityOracle, RandomAvailability, RandomAvailabilityConfig,
};
pub use catalog::{derive_max_guests, Room, RoomCatalog, RoomFacility};
pub use form::{BookingDraft, GuestAdjustment, GuestOption};
pub use outcome::{BookingOutcome, BookingReceipt, Notice, NoticeVariant};
pub use persistence::{GatewayError, InMemoryGateway, PersistenceGateway};
pub use request::{BookingRecord, BookingRequest, StoredBooking};
pub use rest_gateway::{RestGateway, RestGatewayConfig};
pub use submitter::{
    BookingSubmitter, StateTransition, SubmissionState, SubmitError, SubmitterConfig,
};
pub use validation::{
    validate, validate_on, CapacityError, Field, FieldErrors, ValidationError, ValidationResult,
};
