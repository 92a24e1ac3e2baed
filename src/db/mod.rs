use std::sync::Arc;

use crate::core::models::Application;
use crate::core::types::ClientId;

pub mod error;
pub mod memory;

pub use error::Error;
pub use memory::MemoryStore;

/// Read-only view of the registered OAuth applications.
pub trait ApplicationStore {
    fn find_application_by_client_id(&self, client_id: &ClientId) -> Result<Option<Application>, Error>;
}

impl<S: ApplicationStore + ?Sized> ApplicationStore for &S {
    fn find_application_by_client_id(&self, client_id: &ClientId) -> Result<Option<Application>, Error> {
        (**self).find_application_by_client_id(client_id)
    }
}

impl<S: ApplicationStore + ?Sized> ApplicationStore for Arc<S> {
    fn find_application_by_client_id(&self, client_id: &ClientId) -> Result<Option<Application>, Error> {
        (**self).find_application_by_client_id(client_id)
    }
}

/// A registry with no applications, for deployments without OAuth clients.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoApplications;

impl ApplicationStore for NoApplications {
    fn find_application_by_client_id(&self, _client_id: &ClientId) -> Result<Option<Application>, Error> {
        Ok(None)
    }
}
