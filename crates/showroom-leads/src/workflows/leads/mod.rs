//! Lead intake: payload validation, showroom resolution, twin detection and persistence.

pub mod domain;
pub mod factory;
pub mod incident;
pub mod payload;
pub mod repository;
pub mod router;
pub mod specification;
pub mod user;
pub mod validation;

#[cfg(test)]
mod tests;

pub use domain::{
    Event, EventType, Lead, LeadFingerprint, LeadId, LeadInformationBag, LeadView, Location,
    Showroom, ShowroomId, UnknownEventType,
};
pub use factory::{LeadFactory, LeadFactoryError, LeadSubmission};
pub use incident::{IncidentLogger, TracingIncidentLogger};
pub use payload::user_from_payload;
pub use repository::{LeadRepository, RepositoryError, ShowroomRepository};
pub use router::lead_router;
pub use specification::{MatchingLeadSpecification, TwinCheck, TwinSpecification};
pub use user::{LeadError, PersonalInformation, User};
pub use validation::{require_keys, ValidationError};
