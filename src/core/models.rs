use super::types::*;

/// A registered OAuth client and the redirect URIs it may send users back to.
#[derive(Debug, Clone, PartialEq, Eq)]
#[derive(serde::Deserialize, serde::Serialize)]
pub struct Application {
    pub client_id: ClientId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub redirect_uris: Vec<RedirectUri>,
}

impl Application {
    pub fn new(client_id: ClientId, name: String, redirect_uris: Vec<RedirectUri>) -> Self {
        Self {
            client_id,
            name,
            redirect_uris,
        }
    }

    /// Builds the URI list from a whitespace separated string.
    pub fn from_delimited_uris(client_id: ClientId, name: String, uris: &str) -> Self {
        let redirect_uris = uris
            .split_whitespace()
            .map(|u| RedirectUri(u.to_string()))
            .collect();
        Self::new(client_id, name, redirect_uris)
    }

    pub fn allows_redirect(&self, redirect_to: &str) -> bool {
        self.redirect_uris.iter().any(|u| u.0 == redirect_to)
    }
}
