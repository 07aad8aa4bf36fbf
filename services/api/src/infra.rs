use metrics_exporter_prometheus::PrometheusHandle;
use showroom_leads::config::LeadsConfig;
use showroom_leads::error::AppError;
use showroom_leads::workflows::leads::{
    Lead, LeadFactory, LeadFingerprint, LeadId, LeadRepository, RepositoryError, Showroom,
    ShowroomId, ShowroomRepository, TracingIncidentLogger,
};
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tracing::debug;

pub(crate) type ServiceLeadFactory =
    LeadFactory<InMemoryShowroomRepository, InMemoryLeadRepository, TracingIncidentLogger>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Clone)]
pub(crate) struct InMemoryShowroomRepository {
    showrooms: Arc<HashMap<ShowroomId, Showroom>>,
}

impl InMemoryShowroomRepository {
    pub(crate) fn with_showrooms(showrooms: Vec<Showroom>) -> Self {
        let showrooms = showrooms
            .into_iter()
            .map(|showroom| (showroom.id.clone(), showroom))
            .collect();
        Self {
            showrooms: Arc::new(showrooms),
        }
    }

    /// Load a JSON array of showrooms.
    pub(crate) fn from_catalog(path: &Path) -> Result<Self, AppError> {
        let raw = std::fs::read_to_string(path)?;
        let showrooms: Vec<Showroom> = serde_json::from_str(&raw)?;
        debug!(path = %path.display(), count = showrooms.len(), "loaded showroom catalog");
        Ok(Self::with_showrooms(showrooms))
    }

    pub(crate) fn len(&self) -> usize {
        self.showrooms.len()
    }
}

impl ShowroomRepository for InMemoryShowroomRepository {
    fn find_one_by_id(&self, id: &ShowroomId) -> Result<Option<Showroom>, RepositoryError> {
        Ok(self.showrooms.get(id).cloned())
    }
}

/// Process-local lead store. `save` re-checks the fingerprint under its lock, so a request that
/// lost the race against an identical one fails with a conflict instead of storing a duplicate.
#[derive(Default)]
pub(crate) struct InMemoryLeadRepository {
    leads: Mutex<HashMap<LeadId, Lead>>,
    sequence: AtomicU64,
}

impl LeadRepository for InMemoryLeadRepository {
    fn save(&self, lead: Lead) -> Result<Lead, RepositoryError> {
        let mut guard = self.leads.lock().expect("lead repository mutex poisoned");
        let fingerprint = lead.fingerprint();
        if guard
            .values()
            .any(|stored| stored.fingerprint() == fingerprint)
        {
            return Err(RepositoryError::Conflict);
        }

        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let id = LeadId(format!("lead-{sequence:06}"));
        let lead = lead.with_id(id.clone());
        guard.insert(id, lead.clone());
        Ok(lead)
    }

    fn find_matching(
        &self,
        fingerprint: &LeadFingerprint,
    ) -> Result<Option<Lead>, RepositoryError> {
        let guard = self.leads.lock().expect("lead repository mutex poisoned");
        Ok(guard
            .values()
            .find(|lead| &lead.fingerprint() == fingerprint)
            .cloned())
    }

    fn fetch(&self, id: &LeadId) -> Result<Option<Lead>, RepositoryError> {
        let guard = self.leads.lock().expect("lead repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}

pub(crate) fn default_showrooms() -> Vec<Showroom> {
    [
        ("1", "Finca El Olivar", "Bodas Getafe"),
        ("2", "Palacio de la Misión", "Eventos Madrid"),
        ("3", "Hotel Miramar", "Celebraciones Costa"),
    ]
    .into_iter()
    .map(|(id, name, provider)| Showroom {
        id: ShowroomId(id.to_string()),
        name: name.to_string(),
        provider: provider.to_string(),
    })
    .collect()
}

/// Build the factory over in-memory adapters, returning it with the catalog size.
pub(crate) fn lead_factory(
    config: &LeadsConfig,
) -> Result<(ServiceLeadFactory, usize), AppError> {
    let showrooms = match &config.showroom_catalog {
        Some(path) => InMemoryShowroomRepository::from_catalog(path)?,
        None => InMemoryShowroomRepository::with_showrooms(default_showrooms()),
    };
    let count = showrooms.len();

    let factory = LeadFactory::new(
        Arc::new(showrooms),
        Arc::new(InMemoryLeadRepository::default()),
        Arc::new(TracingIncidentLogger),
    );
    Ok((factory, count))
}
