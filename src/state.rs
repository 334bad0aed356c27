use std::sync::{Arc, RwLock};

use crate::{
    error::StoreError,
    models::{
        call_report::CallReport, camera::Camera, incident::Incident, lost_item::LostItem,
        port_event::PortEvent, role::Role, user::User, work_permit::WorkPermit,
    },
    storage::StorageBackend,
    store::Store,
};

/// Every collection the service owns, loaded once at startup and handed to
/// the handlers through `web::Data`. Lock order where a handler needs more
/// than one store: users before roles.
pub struct AppState {
    pub incidents: RwLock<Store<Incident>>,
    pub work_permits: RwLock<Store<WorkPermit>>,
    pub port_events: RwLock<Store<PortEvent>>,
    pub call_reports: RwLock<Store<CallReport>>,
    pub lost_items: RwLock<Store<LostItem>>,
    pub cameras: RwLock<Store<Camera>>,
    pub users: RwLock<Store<User>>,
    pub roles: RwLock<Store<Role>>,
}

impl AppState {
    pub fn open(backend: Arc<dyn StorageBackend>) -> Result<AppState, StoreError> {
        Ok(AppState {
            incidents: RwLock::new(Store::open(backend.clone())?),
            work_permits: RwLock::new(Store::open(backend.clone())?),
            port_events: RwLock::new(Store::open(backend.clone())?),
            call_reports: RwLock::new(Store::open(backend.clone())?),
            lost_items: RwLock::new(Store::open(backend.clone())?),
            cameras: RwLock::new(Store::open(backend.clone())?),
            users: RwLock::new(Store::open(backend.clone())?),
            roles: RwLock::new(Store::open(backend)?),
        })
    }
}
