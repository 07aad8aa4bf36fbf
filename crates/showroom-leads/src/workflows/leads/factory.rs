use std::backtrace::Backtrace;
use std::error::Error as _;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};

use super::domain::{Event, Lead, LeadId, LeadInformationBag, Showroom};
use super::incident::IncidentLogger;
use super::payload;
use super::repository::{LeadRepository, RepositoryError, ShowroomRepository};
use super::specification::{MatchingLeadSpecification, TwinCheck, TwinSpecification};
use super::user::{LeadError, User};
use super::validation::{
    is_blank, require_keys, ValidationError, EVENT_KEYS, LEAD_KEYS, LOCATION_KEYS, SHOWROOM_KEYS,
};

/// Turns validated request payloads into persisted leads.
///
/// The factory resolves the showroom, builds the event, asks the [`User`] to perform the lead
/// and then either stores it or hands back the twin the repository already holds.
pub struct LeadFactory<S, L, I> {
    showrooms: Arc<S>,
    leads: Arc<L>,
    incidents: Arc<I>,
    twins: Arc<dyn TwinSpecification>,
}

impl<S, L, I> LeadFactory<S, L, I>
where
    S: ShowroomRepository + 'static,
    L: LeadRepository + 'static,
    I: IncidentLogger + 'static,
{
    pub fn new(showrooms: Arc<S>, leads: Arc<L>, incidents: Arc<I>) -> Self {
        let twins = Arc::new(MatchingLeadSpecification::new(leads.clone()));
        Self {
            showrooms,
            leads,
            incidents,
            twins,
        }
    }

    /// Replace the twin detection strategy.
    pub fn with_twin_specification(mut self, twins: Arc<dyn TwinSpecification>) -> Self {
        self.twins = twins;
        self
    }

    /// Create the lead `user` describes in `payload`, or return its stored twin.
    ///
    /// Expected payload shape:
    ///
    /// ```json
    /// {
    ///   "user": { "email": "valid@email.com" },
    ///   "event": {
    ///     "date": "2015/12/31",
    ///     "type": "1",
    ///     "location": {
    ///       "lat": 10, "long": 10,
    ///       "admin_level_1": "Getafe", "admin_level_2": "Madrid", "country": "Spain"
    ///     }
    ///   },
    ///   "showroom": { "id": "1" },
    ///   "info": { "guests": 120 }
    /// }
    /// ```
    ///
    /// Validation is fail-fast and happens before any repository call except the showroom
    /// lookup, which sits between the showroom and event checks.
    pub fn create_lead(&self, user: &User, payload: &Value) -> Result<Lead, LeadFactoryError> {
        self.submit(user, payload).map(LeadSubmission::into_lead)
    }

    /// Like [`LeadFactory::create_lead`], but tells a freshly stored lead apart from a twin.
    pub fn submit(
        &self,
        user: &User,
        payload: &Value,
    ) -> Result<LeadSubmission, LeadFactoryError> {
        require_keys(payload, LEAD_KEYS)?;
        let showroom_payload = &payload["showroom"];
        require_keys(showroom_payload, SHOWROOM_KEYS)?;

        let raw_id = &showroom_payload["id"];
        let showroom = match payload::showroom_id(raw_id) {
            Some(id) => self
                .showrooms
                .find_one_by_id(&id)
                .map_err(|err| self.report(err))?,
            None => None,
        };
        let Some(showroom) = showroom else {
            self.incidents
                .emergency(&format!("Showroom id {} not found", payload::display_id(raw_id)));
            return Err(ValidationError::invalid("Showroom not found").into());
        };

        let event_payload = &payload["event"];
        validate_event(event_payload)?;
        let event = payload::event(event_payload)?;
        let information = payload::information_bag(payload.get("info"))?;

        self.perform(user, &showroom, event, information)
            .map_err(|err| self.report(err))
    }

    /// Fetch a stored lead by identifier.
    pub fn lead(&self, id: &LeadId) -> Result<Lead, LeadFactoryError> {
        let lead = self.leads.fetch(id)?.ok_or(RepositoryError::NotFound)?;
        Ok(lead)
    }

    fn perform(
        &self,
        user: &User,
        showroom: &Showroom,
        event: Event,
        information: LeadInformationBag,
    ) -> Result<LeadSubmission, LeadFactoryError> {
        let lead = user.do_lead(showroom, event, information)?;

        match self.twins.find_twin(&lead)? {
            TwinCheck::Novel => {
                let stored = self.leads.save(lead)?;
                info!(
                    lead_id = stored.id().map(|id| id.0.as_str()),
                    showroom = %showroom.id,
                    "lead stored"
                );
                Ok(LeadSubmission::Created(stored))
            }
            TwinCheck::Twin(existing) => {
                debug!(
                    lead_id = existing.id().map(|id| id.0.as_str()),
                    showroom = %showroom.id,
                    "returning twin lead"
                );
                Ok(LeadSubmission::Twin(existing))
            }
        }
    }

    fn report(&self, err: impl Into<LeadFactoryError>) -> LeadFactoryError {
        let err = err.into();
        let mut message = format!("lead creation failed: {err}");
        let mut source = err.source();
        while let Some(cause) = source {
            message.push_str(&format!("\n  caused by: {cause}"));
            source = cause.source();
        }
        message.push_str(&format!("\n{}", Backtrace::force_capture()));

        self.incidents.emergency(&message);
        err
    }
}

fn validate_event(event: &Value) -> Result<(), ValidationError> {
    require_keys(event, EVENT_KEYS)?;
    if is_blank(&event["date"]) {
        return Err(ValidationError::invalid("Date can not be empty"));
    }

    require_keys(&event["location"], LOCATION_KEYS)
}

/// Outcome of [`LeadFactory::submit`].
#[derive(Debug, Clone, PartialEq)]
pub enum LeadSubmission {
    /// The lead was novel and has just been saved.
    Created(Lead),
    /// A twin was already stored; nothing was saved.
    Twin(Lead),
}

impl LeadSubmission {
    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }

    pub fn lead(&self) -> &Lead {
        match self {
            Self::Created(lead) | Self::Twin(lead) => lead,
        }
    }

    pub fn into_lead(self) -> Lead {
        match self {
            Self::Created(lead) | Self::Twin(lead) => lead,
        }
    }
}

/// Error raised by the lead factory.
#[derive(Debug, thiserror::Error)]
pub enum LeadFactoryError {
    #[error(transparent)]
    InvalidArgument(#[from] ValidationError),
    #[error(transparent)]
    Domain(#[from] LeadError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
