use reqwest::{Client, ClientBuilder};
use std::collections::HashSet;
use std::time::Duration;
use url::Url;
use crate::error::LumenError;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_USER_AGENT: &str = concat!("Lumen/", env!("CARGO_PKG_VERSION"));

/// Research providers every Lumen client may talk to.
const DEFAULT_DOMAINS: &[&str] = &[
    "eutils.ncbi.nlm.nih.gov", // PubMed
    "api.crossref.org",        // CrossRef
    "api.semanticscholar.org", // Semantic Scholar
    "export.arxiv.org",        // arXiv
    "doi.org",                 // DOI resolver
    "localhost",
    "127.0.0.1",
];

/// An HTTP client that only issues requests to approved hosts.
#[derive(Debug, Clone)]
pub struct SandboxClient {
    client: Client,
    allowlist: HashSet<String>,
}

impl SandboxClient {
    /// Client with the default allowlist, a 30 s timeout and the crate user agent.
    pub fn new() -> Result<Self, LumenError> {
        Self::with_settings(DEFAULT_TIMEOUT, DEFAULT_USER_AGENT)
    }

    pub fn with_settings(timeout: Duration, user_agent: &str) -> Result<Self, LumenError> {
        let allowlist = DEFAULT_DOMAINS.iter().map(|d| d.to_string()).collect();

        let client = ClientBuilder::new()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self { client, allowlist })
    }

    /// Appends an exact hostname to the allowlist.
    pub fn allow_domain(&mut self, domain: &str) {
        self.allowlist.insert(domain.to_string());
    }

    /// Whether `url` targets an allowed host or a subdomain of one.
    pub fn is_allowed(&self, url: &str) -> bool {
        let Ok(parsed) = Url::parse(url) else { return false };
        let Some(host) = parsed.host_str() else { return false };
        self.allowlist
            .iter()
            .any(|allowed| host == allowed || host.ends_with(&format!(".{allowed}")))
    }

    pub fn get(&self, url: &str) -> Result<reqwest::RequestBuilder, LumenError> {
        if !self.is_allowed(url) {
            return Err(LumenError::SecurityError(format!(
                "domain not in allowlist for URL {url}"
            )));
        }
        Ok(self.client.get(url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_providers_allowed() {
        let c = SandboxClient::new().unwrap();
        assert!(c.is_allowed("https://eutils.ncbi.nlm.nih.gov/entrez/eutils/esearch.fcgi"));
        assert!(c.is_allowed("https://api.crossref.org/works?query=glaucoma"));
        assert!(c.is_allowed("http://export.arxiv.org/api/query"));
    }

    #[test]
    fn test_unknown_host_rejected() {
        let c = SandboxClient::new().unwrap();
        assert!(!c.is_allowed("https://evil.example.com/"));
        assert!(!c.is_allowed("not a url"));
        assert!(matches!(c.get("https://evil.example.com/"), Err(LumenError::SecurityError(_))));
    }

    #[test]
    fn test_subdomain_and_added_domain() {
        let mut c = SandboxClient::new().unwrap();
        assert!(c.is_allowed("https://www.api.crossref.org/x"));
        assert!(!c.is_allowed("https://mirror.example.org/"));
        c.allow_domain("mirror.example.org");
        assert!(c.is_allowed("https://mirror.example.org/"));
    }
}
