use std::sync::Arc;

use tracing::debug;

use super::domain::Lead;
use super::repository::{LeadRepository, RepositoryError};

/// Result of checking a freshly built lead for an already stored equivalent.
#[derive(Debug, Clone, PartialEq)]
pub enum TwinCheck {
    Novel,
    Twin(Lead),
}

impl TwinCheck {
    pub fn is_twin(&self) -> bool {
        matches!(self, TwinCheck::Twin(_))
    }
}

/// Strategy deciding whether a lead duplicates one that is already stored.
pub trait TwinSpecification: Send + Sync {
    fn find_twin(&self, lead: &Lead) -> Result<TwinCheck, RepositoryError>;
}

/// Treats two leads as twins when their [`LeadFingerprint`](super::domain::LeadFingerprint)s
/// match: same user email, showroom, event type and event date.
pub struct MatchingLeadSpecification<L> {
    repository: Arc<L>,
}

impl<L> MatchingLeadSpecification<L> {
    pub fn new(repository: Arc<L>) -> Self {
        Self { repository }
    }
}

impl<L> TwinSpecification for MatchingLeadSpecification<L>
where
    L: LeadRepository,
{
    fn find_twin(&self, lead: &Lead) -> Result<TwinCheck, RepositoryError> {
        let fingerprint = lead.fingerprint();
        match self.repository.find_matching(&fingerprint)? {
            Some(existing) => {
                debug!(showroom = %fingerprint.showroom_id, "matching lead already stored");
                Ok(TwinCheck::Twin(existing))
            }
            None => Ok(TwinCheck::Novel),
        }
    }
}
