use super::domain::{Lead, LeadFingerprint, LeadId, Showroom, ShowroomId};

/// Showroom catalog lookups.
pub trait ShowroomRepository: Send + Sync {
    fn find_one_by_id(&self, id: &ShowroomId) -> Result<Option<Showroom>, RepositoryError>;
}

/// Storage abstraction for leads so the factory can be exercised in isolation.
pub trait LeadRepository: Send + Sync {
    /// Persist a new lead, returning it with its assigned identifier.
    fn save(&self, lead: Lead) -> Result<Lead, RepositoryError>;
    /// Look up a stored lead sharing the given fingerprint.
    fn find_matching(
        &self,
        fingerprint: &LeadFingerprint,
    ) -> Result<Option<Lead>, RepositoryError>;
    fn fetch(&self, id: &LeadId) -> Result<Option<Lead>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
