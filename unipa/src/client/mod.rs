//! Client construction and shared state.

mod http;
mod session;

pub use http::{HttpConfig, HttpExecutor, PortalResponse, SMARTPHONE_API_PATH, USER_AGENT};
pub use session::{extract_session_cookie, SessionState};

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use crate::api::{BulletinApi, MenuApi, SessionApi, TimetableApi};
use crate::error::{Error, Result};
use crate::models::SessionSnapshot;
use http::build_client;

/// Builder for creating UnipaClient.
pub struct UnipaClientBuilder {
    session: Option<SessionSnapshot>,
    http_config: HttpConfig,
}

impl std::fmt::Debug for UnipaClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnipaClientBuilder")
            .field("session", &self.session.as_ref().map(|s| &s.user_id))
            .field("http_config", &self.http_config)
            .finish()
    }
}

impl Default for UnipaClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl UnipaClientBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            session: None,
            http_config: HttpConfig::default(),
        }
    }

    /// Set the portal base address. Required; every deployment hosts its
    /// own instance.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.http_config.base_url = url.into();
        self
    }

    /// Seed the session from a previously exported snapshot.
    pub fn session(mut self, snapshot: SessionSnapshot) -> Self {
        self.session = Some(snapshot);
        self
    }

    /// Set a custom user agent.
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.http_config.custom_user_agent = Some(ua.into());
        self
    }

    /// Set connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.http_config.connect_timeout = timeout;
        self
    }

    /// Set read timeout.
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.http_config.read_timeout = timeout;
        self
    }

    /// Build UnipaClient.
    pub fn build(self) -> Result<UnipaClient> {
        if self.http_config.base_url.is_empty() {
            return Err(Error::InvalidArgument("base URL is required".into()));
        }

        let http_client = build_client(&self.http_config)?;
        let session = self
            .session
            .map(SessionState::from_snapshot)
            .unwrap_or_default();

        Ok(UnipaClient {
            inner: Arc::new(UnipaClientInner {
                http: http_client,
                config: self.http_config,
                session: Mutex::new(session),
            }),
        })
    }
}

/// Internal client state.
pub(crate) struct UnipaClientInner {
    pub http: reqwest::Client,
    pub config: HttpConfig,
    /// Single logical session. Extraction flows against it must not run
    /// concurrently: a postback performed by one flow invalidates the
    /// view state another flow extracted earlier.
    pub session: Mutex<SessionState>,
}

impl UnipaClientInner {
    /// Lock the session state. A poisoned lock only means some flow
    /// panicked mid-update; the identity itself stays usable.
    pub fn session(&self) -> MutexGuard<'_, SessionState> {
        self.session.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Current cookie snapshot.
    pub fn cookie(&self) -> Option<String> {
        self.session().cookie.clone()
    }

    /// Apply cookie renewal from a response.
    pub fn renew_cookie(&self, response: &PortalResponse) {
        self.session().renew_cookie(&response.set_cookies);
    }

    /// Create HTTP executor.
    pub fn executor(&self) -> HttpExecutor<'_> {
        HttpExecutor::new(&self.http, &self.config)
    }
}

/// UNIPA client for interacting with the portal.
#[derive(Clone)]
pub struct UnipaClient {
    pub(crate) inner: Arc<UnipaClientInner>,
}

impl UnipaClient {
    /// Create a new client builder.
    pub fn builder() -> UnipaClientBuilder {
        UnipaClientBuilder::new()
    }

    /// Get the session API (login, status probe, restore/export).
    pub fn session(&self) -> SessionApi {
        SessionApi::new(self.inner.clone())
    }

    /// Get the bulletin board API.
    pub fn bulletins(&self) -> BulletinApi {
        BulletinApi::new(self.inner.clone())
    }

    /// Get the timetable API.
    pub fn timetable(&self) -> TimetableApi {
        TimetableApi::new(self.inner.clone())
    }

    /// Get the menu API.
    pub fn menu(&self) -> MenuApi {
        MenuApi::new(self.inner.clone())
    }

    /// Check if the client holds a login token.
    pub fn is_authenticated(&self) -> bool {
        self.inner.session().shikibetsu_cd.is_some()
    }

    /// Get the current user id, if known.
    pub fn current_user_id(&self) -> Option<String> {
        self.inner.session().user_id.clone()
    }
}

impl std::fmt::Debug for UnipaClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnipaClient")
            .field("authenticated", &self.is_authenticated())
            .field("base_url", &self.inner.config.base_url)
            .finish()
    }
}
