use std::collections::HashSet;

/// Hosts trusted as redirect destinations in addition to the requesting host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RedirectPolicy {
    allowed_hosts: HashSet<String>,
}

impl RedirectPolicy {
    pub fn from_hosts<I, S>(hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let allowed_hosts = hosts
            .into_iter()
            .map(|h| normalize_host(h.as_ref()))
            .filter(|h| !h.is_empty())
            .collect();
        Self { allowed_hosts }
    }

    /// Parses a comma separated list, as found in configuration.
    pub fn from_delimited_hosts(hosts: &str) -> Self {
        Self::from_hosts(hosts.split(','))
    }

    pub fn allowed_hosts(&self) -> impl Iterator<Item = &str> {
        self.allowed_hosts.iter().map(AsRef::as_ref)
    }

    pub fn allows_host(&self, host: &str, request_host: &str) -> bool {
        let host = normalize_host(host);
        host == normalize_host(request_host) || self.allowed_hosts.contains(&host)
    }
}

fn normalize_host(host: &str) -> String {
    host.trim().to_ascii_lowercase()
}
