//! Session manager: authentication state and the operations that change it.
//!
//! # Design
//! `SessionManager` is an explicit value the host composes in — it owns the
//! current `Option<Session>`, a `SessionStore` for persistence, and the
//! backend base URL. Its lifecycle is `restore()` at startup and `logout()`
//! as teardown; no ambient globals.
//!
//! Login is a two-round-trip exchange (token, then profile) but behaves as
//! one atomic operation: `parse_login` yields a `PendingLogin` that is not a
//! session, and only `complete_login` installs and persists state. Dropping
//! the pending value discards the token, so a failed profile fetch never
//! leaves a half-established session behind.

use crate::error::{check_status, ApiError};
use crate::http::{json_request, parse_body, HttpMethod, HttpRequest, HttpResponse};
use crate::storage::SessionStore;
use crate::types::{Envelope, LoginResponse, LoginUser, RegisterUser, Session, User};

/// A token obtained from login that has not yet become a session.
///
/// Holds the credential between the two login round-trips. If the profile
/// fetch fails, drop this value and the token is gone; no session state
/// (old or new) is affected.
#[derive(Debug)]
pub struct PendingLogin {
    token: String,
}

/// Owns the authenticated session across the application's lifetime.
pub struct SessionManager {
    base_url: String,
    store: Box<dyn SessionStore>,
    session: Option<Session>,
}

impl SessionManager {
    /// Create a manager with no session. Call `restore` to pick up a
    /// persisted one.
    pub fn new(base_url: &str, store: Box<dyn SessionStore>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            store,
            session: None,
        }
    }

    /// Load a persisted session from the store, if one exists. Returns
    /// whether a session was restored.
    pub fn restore(&mut self) -> Result<bool, ApiError> {
        self.session = self.store.load()?;
        if let Some(session) = &self.session {
            log::debug!("restored session for {}", session.user.email);
        }
        Ok(self.session.is_some())
    }

    /// True iff a token is held — the sole authentication criterion.
    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    /// True iff the cached user record carries the admin flag. Used only to
    /// hide affordances; the backend enforces the actual rule.
    pub fn is_admin(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.user.is_admin)
    }

    pub fn token(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.token.as_str())
    }

    pub fn current_user(&self) -> Option<&User> {
        self.session.as_ref().map(|s| &s.user)
    }

    // -- registration -------------------------------------------------------

    /// Build the account-creation request. Does not establish a session.
    pub fn build_register(&self, input: &RegisterUser) -> Result<HttpRequest, ApiError> {
        if input.name.trim().is_empty() {
            return Err(ApiError::Validation("name is required".to_string()));
        }
        if input.email.trim().is_empty() {
            return Err(ApiError::Validation("email is required".to_string()));
        }
        if input.password.is_empty() {
            return Err(ApiError::Validation("password is required".to_string()));
        }
        json_request(HttpMethod::Post, format!("{}/user/new", self.base_url), input)
    }

    pub fn parse_register(&self, response: HttpResponse) -> Result<User, ApiError> {
        check_status(&response, 201)?;
        parse_body::<Envelope<User>>(&response.body).map(Envelope::into_inner)
    }

    // -- login --------------------------------------------------------------

    /// Build the credential-exchange request.
    pub fn build_login(&self, input: &LoginUser) -> Result<HttpRequest, ApiError> {
        if input.email.trim().is_empty() {
            return Err(ApiError::Validation("email is required".to_string()));
        }
        if input.password.is_empty() {
            return Err(ApiError::Validation("password is required".to_string()));
        }
        json_request(HttpMethod::Post, format!("{}/user/login", self.base_url), input)
    }

    /// Parse the token out of a login response. The result is not yet a
    /// session; follow with `build_profile_with` and `complete_login`.
    pub fn parse_login(&self, response: HttpResponse) -> Result<PendingLogin, ApiError> {
        check_status(&response, 200)?;
        let login = parse_body::<LoginResponse>(&response.body)?;
        Ok(PendingLogin { token: login.token })
    }

    /// Build the profile fetch that turns a pending login into a session.
    pub fn build_profile_with(&self, pending: &PendingLogin) -> HttpRequest {
        profile_request(&self.base_url, &pending.token)
    }

    /// Install the session from a pending login and the profile response,
    /// then persist it. Consumes the pending token either way: on failure it
    /// is discarded and prior session state is untouched.
    pub fn complete_login(
        &mut self,
        pending: PendingLogin,
        response: HttpResponse,
    ) -> Result<&User, ApiError> {
        check_status(&response, 200)?;
        let user = parse_body::<Envelope<User>>(&response.body)?.into_inner();
        let session = Session {
            token: pending.token,
            user,
        };
        self.store.save(&session)?;
        log::info!("session established for {}", session.user.email);
        Ok(&self.session.insert(session).user)
    }

    // -- logout -------------------------------------------------------------

    /// Clear the in-memory session and the persisted one. Cannot fail in a
    /// caller-visible way; storage trouble is logged and swallowed.
    pub fn logout(&mut self) {
        self.session = None;
        if let Err(e) = self.store.clear() {
            log::warn!("failed to clear persisted session: {e}");
        }
        log::info!("session cleared");
    }

    // -- profile ------------------------------------------------------------

    /// Build a re-fetch of the current user's profile. Fails with `Auth` if
    /// no session is held.
    pub fn build_profile(&self) -> Result<HttpRequest, ApiError> {
        let token = self
            .token()
            .ok_or_else(|| ApiError::Auth("not authenticated".to_string()))?;
        Ok(profile_request(&self.base_url, token))
    }

    /// Parse a profile response and refresh the cached user. The refreshed
    /// record is re-persisted; a storage hiccup there is logged, not fatal,
    /// since the fetch itself succeeded.
    pub fn parse_profile(&mut self, response: HttpResponse) -> Result<User, ApiError> {
        check_status(&response, 200)?;
        let user = parse_body::<Envelope<User>>(&response.body)?.into_inner();
        if let Some(session) = &mut self.session {
            session.user = user.clone();
            if let Err(e) = self.store.save(session) {
                log::warn!("failed to persist refreshed profile: {e}");
            }
        }
        Ok(user)
    }

    // -- user listing (admin) -----------------------------------------------

    /// Build the all-accounts listing. Requires a session; the admin rule
    /// itself lives in the backend and surfaces as `Authorization` on 403.
    pub fn build_list_users(&self) -> Result<HttpRequest, ApiError> {
        let token = self
            .token()
            .ok_or_else(|| ApiError::Auth("not authenticated".to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}/user/all", self.base_url),
            headers: Vec::new(),
            body: None,
        }
        .with_bearer(token))
    }

    pub fn parse_list_users(&self, response: HttpResponse) -> Result<Vec<User>, ApiError> {
        check_status(&response, 200)?;
        parse_body::<Envelope<Vec<User>>>(&response.body).map(Envelope::into_inner)
    }
}

/// Client-side check that two password entries match, for registration
/// forms. Kept here so screens share one rule instead of each rolling its
/// own.
pub fn check_password_confirmation(password: &str, confirmation: &str) -> Result<(), ApiError> {
    if password != confirmation {
        return Err(ApiError::Validation("passwords do not match".to_string()));
    }
    Ok(())
}

fn profile_request(base_url: &str, token: &str) -> HttpRequest {
    HttpRequest {
        method: HttpMethod::Get,
        path: format!("{base_url}/user/monprofil"),
        headers: Vec::new(),
        body: None,
    }
    .with_bearer(token)
}
