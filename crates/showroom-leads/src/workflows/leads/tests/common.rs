use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::{json, Value};

use crate::workflows::leads::domain::{Lead, LeadFingerprint, LeadId, Showroom, ShowroomId};
use crate::workflows::leads::incident::IncidentLogger;
use crate::workflows::leads::repository::{LeadRepository, RepositoryError, ShowroomRepository};
use crate::workflows::leads::specification::{TwinCheck, TwinSpecification};
use crate::workflows::leads::user::{PersonalInformation, User};
use crate::workflows::leads::{lead_router, LeadFactory};

pub(super) type TestFactory = LeadFactory<MemoryShowrooms, MemoryLeads, RecordingIncidents>;

pub(super) fn showroom() -> Showroom {
    Showroom {
        id: ShowroomId("1".to_string()),
        name: "Finca El Olivar".to_string(),
        provider: "Bodas Getafe".to_string(),
    }
}

pub(super) fn personal_information() -> PersonalInformation {
    PersonalInformation::new("testUserName", "testUserSurname", "+34 0123456789")
        .expect("valid personal information")
}

pub(super) fn user() -> User {
    User::new("valid@email.com")
        .expect("valid email")
        .with_personal_information(personal_information())
}

pub(super) fn payload() -> Value {
    json!({
        "user": {
            "email": "valid@email.com",
            "name": "testUserName",
            "surname": "testUserSurname",
            "phone": "+34 0123456789"
        },
        "event": {
            "date": "2015/12/31",
            "type": "1",
            "location": {
                "lat": 10,
                "long": 10,
                "admin_level_1": "Getafe",
                "admin_level_2": "Madrid",
                "country": "Spain"
            }
        },
        "showroom": { "id": "1" }
    })
}

/// Removes `key` from the object at `path` inside `value`.
pub(super) fn without(mut value: Value, path: &[&str], key: &str) -> Value {
    let mut target = &mut value;
    for segment in path {
        target = &mut target[*segment];
    }
    target
        .as_object_mut()
        .expect("path points at an object")
        .remove(key);
    value
}

pub(super) fn build_factory() -> (
    TestFactory,
    Arc<MemoryShowrooms>,
    Arc<MemoryLeads>,
    Arc<RecordingIncidents>,
) {
    let showrooms = Arc::new(MemoryShowrooms::with(vec![showroom()]));
    let leads = Arc::new(MemoryLeads::default());
    let incidents = Arc::new(RecordingIncidents::default());
    let factory = LeadFactory::new(showrooms.clone(), leads.clone(), incidents.clone());
    (factory, showrooms, leads, incidents)
}

pub(super) fn lead_router_with_factory<S, L, I>(factory: LeadFactory<S, L, I>) -> axum::Router
where
    S: ShowroomRepository + 'static,
    L: LeadRepository + 'static,
    I: IncidentLogger + 'static,
{
    lead_router(Arc::new(factory))
}

#[derive(Default)]
pub(super) struct MemoryShowrooms {
    showrooms: HashMap<ShowroomId, Showroom>,
    lookups: AtomicUsize,
}

impl MemoryShowrooms {
    pub(super) fn with(showrooms: Vec<Showroom>) -> Self {
        Self {
            showrooms: showrooms
                .into_iter()
                .map(|showroom| (showroom.id.clone(), showroom))
                .collect(),
            lookups: AtomicUsize::new(0),
        }
    }

    pub(super) fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl ShowroomRepository for MemoryShowrooms {
    fn find_one_by_id(&self, id: &ShowroomId) -> Result<Option<Showroom>, RepositoryError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.showrooms.get(id).cloned())
    }
}

#[derive(Default)]
pub(super) struct MemoryLeads {
    leads: Mutex<Vec<Lead>>,
    saves: AtomicUsize,
    sequence: AtomicU64,
}

impl MemoryLeads {
    pub(super) fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub(super) fn stored(&self) -> Vec<Lead> {
        self.leads.lock().expect("lead mutex poisoned").clone()
    }
}

impl LeadRepository for MemoryLeads {
    fn save(&self, lead: Lead) -> Result<Lead, RepositoryError> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        let id = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        let stored = lead.with_id(LeadId(format!("lead-{id:06}")));
        self.leads
            .lock()
            .expect("lead mutex poisoned")
            .push(stored.clone());
        Ok(stored)
    }

    fn find_matching(
        &self,
        fingerprint: &LeadFingerprint,
    ) -> Result<Option<Lead>, RepositoryError> {
        let guard = self.leads.lock().expect("lead mutex poisoned");
        Ok(guard
            .iter()
            .find(|lead| &lead.fingerprint() == fingerprint)
            .cloned())
    }

    fn fetch(&self, id: &LeadId) -> Result<Option<Lead>, RepositoryError> {
        let guard = self.leads.lock().expect("lead mutex poisoned");
        Ok(guard.iter().find(|lead| lead.id() == Some(id)).cloned())
    }
}

pub(super) struct UnavailableLeads;

impl LeadRepository for UnavailableLeads {
    fn save(&self, _lead: Lead) -> Result<Lead, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn find_matching(
        &self,
        _fingerprint: &LeadFingerprint,
    ) -> Result<Option<Lead>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &LeadId) -> Result<Option<Lead>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

#[derive(Default)]
pub(super) struct RecordingIncidents {
    messages: Mutex<Vec<String>>,
}

impl RecordingIncidents {
    pub(super) fn messages(&self) -> Vec<String> {
        self.messages.lock().expect("incident mutex poisoned").clone()
    }
}

impl IncidentLogger for RecordingIncidents {
    fn emergency(&self, message: &str) {
        self.messages
            .lock()
            .expect("incident mutex poisoned")
            .push(message.to_string());
    }
}

/// Twin specification with a canned answer.
pub(super) struct FixedTwin(pub(super) Option<Lead>);

impl TwinSpecification for FixedTwin {
    fn find_twin(&self, _lead: &Lead) -> Result<TwinCheck, RepositoryError> {
        Ok(match &self.0 {
            Some(twin) => TwinCheck::Twin(twin.clone()),
            None => TwinCheck::Novel,
        })
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
