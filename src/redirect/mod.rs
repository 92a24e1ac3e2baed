//! Validation of post-login and post-logout redirect targets.
//!
//! A target is safe when sending the user there cannot hand the session to
//! an untrusted host. Relative paths always are. Absolute targets must name
//! the requesting host, a host on the [`RedirectPolicy`] allow-list or, when
//! the request carries an OAuth client id, one of that client's registered
//! redirect URIs.

use thiserror::Error;

use crate::core::models::Application;
use crate::core::types::ClientId;
use crate::db::ApplicationStore;

pub mod policy;
pub mod target;

pub use policy::RedirectPolicy;
pub use target::{Scheme, Target};

/// Why a redirect target was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("empty redirect target")]
    Empty,
    #[error("control or format character in redirect target")]
    ControlCharacter,
    #[error("backslash inside the authority")]
    BackslashInAuthority,
    #[error("triple slash after scheme")]
    TripleSlash,
    #[error("scheme is neither http nor https")]
    UnsupportedScheme,
    #[error("scheme without a host")]
    MissingAuthority,
    #[error("credentials in redirect target")]
    Credentials,
    #[error("unparseable redirect target")]
    Unparseable,
    #[error("http target on a secure request")]
    Insecure,
    #[error("host is not trusted")]
    UntrustedHost,
    #[error("not a registered redirect uri of the client")]
    UnregisteredUri,
}

/// The parts of the incoming request that decide where it may redirect to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectRequest {
    pub host: String,
    pub secure: bool,
    pub client_id: Option<ClientId>,
}

impl RedirectRequest {
    pub fn new<H: Into<String>>(host: H, secure: bool) -> Self {
        Self {
            host: host.into(),
            secure,
            client_id: None,
        }
    }

    pub fn with_client_id(mut self, client_id: ClientId) -> Self {
        self.client_id = Some(client_id);
        self
    }

    /// Takes the client id, if any, from a url-encoded query string.
    pub fn from_query<H: Into<String>>(host: H, secure: bool, query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let client_id = form_urlencoded::parse(query.as_bytes())
            .find(|(k, _)| k == "client_id")
            .map(|(_, v)| v.into_owned())
            .filter(|v| !v.is_empty())
            .map(ClientId);

        Self {
            host: host.into(),
            secure,
            client_id,
        }
    }
}

#[derive(Debug)]
pub struct SafeRedirectChecker<S> {
    store: S,
    policy: RedirectPolicy,
}

impl<S: ApplicationStore> SafeRedirectChecker<S> {
    pub fn new(store: S, policy: RedirectPolicy) -> Self {
        Self { store, policy }
    }

    pub fn policy(&self) -> &RedirectPolicy {
        &self.policy
    }

    pub fn is_safe(
        &self,
        redirect_to: &str,
        request_host: &str,
        client_id: Option<&ClientId>,
        require_https: bool,
    ) -> bool {
        match self.check(redirect_to, request_host, client_id, require_https) {
            Ok(()) => true,
            Err(reason) => {
                tracing::debug!(redirect_to, request_host, %reason, "Rejected redirect");
                false
            }
        }
    }

    pub fn is_safe_for(&self, request: &RedirectRequest, redirect_to: &str) -> bool {
        self.is_safe(
            redirect_to,
            &request.host,
            request.client_id.as_ref(),
            request.secure,
        )
    }

    /// Returns `redirect_to` when it is safe for `request`, `fallback` otherwise.
    pub fn safe_or<'a>(
        &self,
        request: &RedirectRequest,
        redirect_to: &'a str,
        fallback: &'a str,
    ) -> &'a str {
        if self.is_safe_for(request, redirect_to) {
            redirect_to
        } else {
            fallback
        }
    }

    /// Same decision as [`is_safe`](Self::is_safe), with the reason on refusal.
    pub fn check(
        &self,
        redirect_to: &str,
        request_host: &str,
        client_id: Option<&ClientId>,
        require_https: bool,
    ) -> Result<(), Rejection> {
        let (scheme, authority, default_port) = match Target::parse(redirect_to)? {
            Target::Relative => return Ok(()),
            Target::Absolute {
                scheme,
                authority,
                default_port,
            } => (scheme, authority, default_port),
        };

        if require_https && scheme == Some(Scheme::Http) {
            return Err(Rejection::Insecure);
        }

        // A known client's registered uris replace the host allow-list.
        match client_id.and_then(|id| self.registered_application(id)) {
            Some(application) if application.allows_redirect(redirect_to) => Ok(()),
            Some(_) => Err(Rejection::UnregisteredUri),
            None if self.allows_authority(&authority, default_port, request_host) => Ok(()),
            None => Err(Rejection::UntrustedHost),
        }
    }

    fn allows_authority(&self, authority: &str, default_port: Option<u16>, request_host: &str) -> bool {
        self.policy.allows_host(authority, request_host)
            || default_port.map_or(false, |port| {
                self.policy
                    .allows_host(&format!("{}:{}", authority, port), request_host)
            })
    }

    fn registered_application(&self, client_id: &ClientId) -> Option<Application> {
        match self.store.find_application_by_client_id(client_id) {
            Ok(application) => application,
            Err(e) => {
                tracing::warn!(client_id = %client_id.0, error = %e, "Application lookup failed");
                None
            }
        }
    }
}
