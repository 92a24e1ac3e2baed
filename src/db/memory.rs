use std::collections::HashMap;
use std::fmt::Debug;
use std::path::Path;
use std::sync::RwLock;

use crate::core::models::Application;
use crate::core::types::ClientId;

use super::{ApplicationStore, Error};

#[derive(Default)]
pub struct MemoryStore {
    applications: RwLock<HashMap<ClientId, Application>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_applications<I>(applications: I) -> Self
    where
        I: IntoIterator<Item = Application>,
    {
        let applications = applications
            .into_iter()
            .map(|a| (a.client_id.clone(), a))
            .collect();
        Self {
            applications: RwLock::new(applications),
        }
    }

    /// Loads a JSON array of applications.
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let applications: Vec<Application> = serde_json::from_str(&raw)?;
        tracing::info!(
            path = %path.display(),
            count = applications.len(),
            "Loaded OAuth applications"
        );
        Ok(Self::from_applications(applications))
    }

    pub fn put_application(&self, application: Application) -> Result<Option<Application>, Error> {
        let mut applications = self.applications.write()?;
        Ok(applications.insert(application.client_id.clone(), application))
    }

    pub fn remove_application(&self, client_id: &ClientId) -> Result<Option<Application>, Error> {
        let mut applications = self.applications.write()?;
        Ok(applications.remove(client_id))
    }

    pub fn len(&self) -> usize {
        self.applications.read().map(|a| a.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("applications", &self.len())
            .finish()
    }
}

impl ApplicationStore for MemoryStore {
    fn find_application_by_client_id(&self, client_id: &ClientId) -> Result<Option<Application>, Error> {
        let applications = self.applications.read()?;
        Ok(applications.get(client_id).cloned())
    }
}
