//! HTTP transport for the portal.

use reqwest::header::{CONTENT_DISPOSITION, SET_COOKIE};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use std::time::Duration;
use url::Url;

use crate::error::{Error, Result};

/// User-agent identifying the client as the portal's own mobile app.
/// Some deployments reject other agents.
pub const USER_AGENT: &str = "UNIPA/1.1.25 UNIPA-API-SERVER/0.0.1";

/// Path of the semi-documented smartphone endpoint. The JSON envelope
/// travels URI-encoded in the `jsonData` query parameter of a GET.
pub const SMARTPHONE_API_PATH: &str = "/faces/up/ap/SmartphoneAppCommon";

/// HTTP client configuration.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Base address of the portal deployment, e.g.
    /// `https://unipa.example.ac.jp`. May carry a path prefix.
    pub base_url: String,
    /// Connection timeout.
    pub connect_timeout: Duration,
    /// Read timeout.
    pub read_timeout: Duration,
    /// Custom user agent overriding the mobile-app default.
    pub custom_user_agent: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            connect_timeout: Duration::from_secs(5),
            read_timeout: Duration::from_secs(20),
            custom_user_agent: None,
        }
    }
}

impl HttpConfig {
    /// The user agent to send.
    pub fn user_agent(&self) -> &str {
        self.custom_user_agent.as_deref().unwrap_or(USER_AGENT)
    }

    /// Resolve a portal path against the base address. Paths are
    /// appended to the base (keeping any deployment path prefix), not
    /// root-joined.
    pub fn resolve_url(&self, path: &str) -> Result<Url> {
        if path.starts_with("http://") || path.starts_with("https://") {
            return Url::parse(path).map_err(Error::Url);
        }

        let joined = format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&joined).map_err(Error::Url)
    }
}

/// Build a reqwest client with the given configuration.
pub fn build_client(config: &HttpConfig) -> Result<Client> {
    Client::builder()
        .https_only(false)
        .connect_timeout(config.connect_timeout)
        .read_timeout(config.read_timeout)
        .gzip(true)
        .build()
        .map_err(Error::Transport)
}

/// A portal response reduced to what the layers above need: the status,
/// every Set-Cookie value (the session layer scans these for renewals),
/// the raw Content-Disposition, and the undecoded body.
#[derive(Debug)]
pub struct PortalResponse {
    /// HTTP status.
    pub status: StatusCode,
    /// All Set-Cookie header values, in order.
    pub set_cookies: Vec<String>,
    /// Raw Content-Disposition header, when present.
    pub content_disposition: Option<String>,
    body: Vec<u8>,
}

impl PortalResponse {
    /// Whether any Set-Cookie header was present.
    pub fn has_set_cookie(&self) -> bool {
        !self.set_cookies.is_empty()
    }

    /// Body decoded as UTF-8 text.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Take the raw body bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.body
    }
}

async fn read_response(response: reqwest::Response) -> Result<PortalResponse> {
    let status = response.status();
    let set_cookies = response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .map(str::to_owned)
        .collect();
    let content_disposition = response
        .headers()
        .get(CONTENT_DISPOSITION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    let body = response.bytes().await.map_err(Error::Transport)?.to_vec();

    Ok(PortalResponse {
        status,
        set_cookies,
        content_disposition,
        body,
    })
}

/// HTTP request executor.
pub struct HttpExecutor<'a> {
    client: &'a Client,
    config: &'a HttpConfig,
}

impl<'a> HttpExecutor<'a> {
    /// Create a new executor.
    pub fn new(client: &'a Client, config: &'a HttpConfig) -> Self {
        Self { client, config }
    }

    fn build_request(&self, method: Method, url: Url, cookie: Option<&str>) -> RequestBuilder {
        self.client
            .request(method, url)
            .header("User-Agent", self.config.user_agent())
            .header("Cookie", cookie.unwrap_or(""))
    }

    /// GET a portal path with the given session cookie.
    pub async fn get(&self, path: &str, cookie: Option<&str>) -> Result<PortalResponse> {
        let url = self.config.resolve_url(path)?;
        self.execute(Method::GET, url, cookie).await
    }

    /// GET a portal path with extra query parameters.
    pub async fn get_with_query(
        &self,
        path: &str,
        query: &[(String, String)],
        cookie: Option<&str>,
    ) -> Result<PortalResponse> {
        let mut url = self.config.resolve_url(path)?;
        {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in query {
                pairs.append_pair(name, value);
            }
        }
        self.execute(Method::GET, url, cookie).await
    }

    /// GET the smartphone endpoint with the serialized JSON envelope in
    /// the query string, the way the official app does.
    pub async fn get_smartphone_api(
        &self,
        json_data: &str,
        cookie: Option<&str>,
    ) -> Result<PortalResponse> {
        let mut url = self.config.resolve_url(SMARTPHONE_API_PATH)?;
        url.query_pairs_mut().append_pair("jsonData", json_data);
        self.execute(Method::GET, url, cookie).await
    }

    /// POST form fields to a portal path. The portal expects classic
    /// form encoding and a Referer pointing at the base address.
    pub async fn post_form(
        &self,
        path: &str,
        form: &[(String, String)],
        cookie: Option<&str>,
    ) -> Result<PortalResponse> {
        let url = self.config.resolve_url(path)?;
        let response = self
            .build_request(Method::POST, url, cookie)
            .header("Referer", self.config.base_url.as_str())
            .form(form)
            .send()
            .await
            .map_err(Error::Transport)?;
        read_response(response).await
    }

    async fn execute(
        &self,
        method: Method,
        url: Url,
        cookie: Option<&str>,
    ) -> Result<PortalResponse> {
        log::debug!("{} {}", method, url);
        let response = self
            .build_request(method, url, cookie)
            .send()
            .await
            .map_err(Error::Transport)?;
        read_response(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn config(base: &str) -> HttpConfig {
        HttpConfig {
            base_url: base.to_owned(),
            ..Default::default()
        }
    }

    #[test]
    fn test_resolve_url_appends_to_base() {
        let config = config("https://unipa.example.ac.jp");
        let url = config.resolve_url("/faces/up/po/Poa00201Asm.jsp").unwrap();
        assert_eq!(
            url.as_str(),
            "https://unipa.example.ac.jp/faces/up/po/Poa00201Asm.jsp"
        );
    }

    #[test]
    fn test_resolve_url_keeps_deployment_prefix() {
        let config = config("https://portal.example.ac.jp/up/");
        let url = config.resolve_url("/faces/up/ap/SmartphoneAppCommon").unwrap();
        assert_eq!(
            url.as_str(),
            "https://portal.example.ac.jp/up/faces/up/ap/SmartphoneAppCommon"
        );
    }

    #[test]
    fn test_resolve_url_passes_absolute_urls_through() {
        let config = config("https://unipa.example.ac.jp");
        let url = config.resolve_url("https://other.example.ac.jp/x").unwrap();
        assert_eq!(url.as_str(), "https://other.example.ac.jp/x");
    }

    #[test]
    fn test_default_user_agent_is_the_mobile_app() {
        let config = config("https://unipa.example.ac.jp");
        assert_eq!(config.user_agent(), "UNIPA/1.1.25 UNIPA-API-SERVER/0.0.1");

        let custom = HttpConfig {
            custom_user_agent: Some("probe/1.0".to_owned()),
            ..config
        };
        assert_eq!(custom.user_agent(), "probe/1.0");
    }
}
