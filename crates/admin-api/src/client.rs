//! reqwest client for the event backend.

use crate::config::AdminApiConfig;
use crate::tickets::{ActionResult, Activation, Approval, PhoneCheck, Ticket, TicketStatus};
use crate::token::TokenStore;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{info, instrument, warn};

#[derive(Error, Debug)]
pub enum AdminApiError {
    /// 401/403 on an authenticated call; the stored token was cleared.
    #[error("Session expired, log in again")]
    SessionExpired,

    #[error("Backend returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Deserialize)]
struct LoginResponse {
    access_token: String,
}

/// Backend client; every request carries `Authorization: Bearer <token>` once logged in.
#[derive(Debug, Clone)]
pub struct AdminApiClient {
    client: Client,
    base_url: String,
    token: TokenStore,
}

impl AdminApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_token_store(base_url, TokenStore::new())
    }

    pub fn with_token_store(base_url: impl Into<String>, token: TokenStore) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        }
    }

    pub fn from_config(config: &dyn AdminApiConfig) -> Self {
        Self::new(config.base_url())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token_store(&self) -> &TokenStore {
        &self.token
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self
            .client
            .request(method, format!("{}{}", self.base_url, path));
        match self.token.get() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Sends `builder`; 401/403 clear the token, other non-2xx become [`AdminApiError::Status`].
    async fn execute(&self, builder: RequestBuilder) -> Result<Response, AdminApiError> {
        let resp = builder.send().await?;
        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            warn!(status = status.as_u16(), "admin session rejected, clearing token");
            self.token.clear();
            return Err(AdminApiError::SessionExpired);
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AdminApiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(resp)
    }

    async fn execute_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<T, AdminApiError> {
        let resp = self.execute(builder).await?;
        Ok(resp.json().await?)
    }

    /// Exchanges credentials for a token and stores it. Bad credentials are a plain
    /// [`AdminApiError::Status`], not a session expiry.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<(), AdminApiError> {
        let resp = self
            .client
            .post(format!("{}/api/auth/login", self.base_url))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AdminApiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        let login: LoginResponse = resp.json().await?;
        self.token.set(login.access_token);
        info!("step: admin logged in");
        Ok(())
    }

    pub fn logout(&self) {
        self.token.clear();
    }

    #[instrument(skip(self))]
    pub async fn list_tickets(
        &self,
        status: Option<TicketStatus>,
    ) -> Result<Vec<Ticket>, AdminApiError> {
        let mut builder = self.request(Method::GET, "/api/tickets/");
        if let Some(status) = status {
            builder = builder.query(&[("status", status.as_str())]);
        }
        let tickets: Vec<Ticket> = self.execute_json(builder).await?;
        info!(count = tickets.len(), "tickets listed");
        Ok(tickets)
    }

    async fn review(&self, ticket_id: i64, approval: &Approval) -> Result<ActionResult, AdminApiError> {
        let builder = self
            .request(Method::POST, &format!("/api/tickets/{}/approve", ticket_id))
            .json(approval);
        self.execute_json(builder).await
    }

    #[instrument(skip(self))]
    pub async fn approve_ticket(&self, ticket_id: i64) -> Result<ActionResult, AdminApiError> {
        let result = self.review(ticket_id, &Approval::approve()).await?;
        info!(ticket_id, "step: ticket approved");
        Ok(result)
    }

    #[instrument(skip(self))]
    pub async fn reject_ticket(
        &self,
        ticket_id: i64,
        reason: &str,
    ) -> Result<ActionResult, AdminApiError> {
        let result = self.review(ticket_id, &Approval::reject(reason)).await?;
        info!(ticket_id, "step: ticket rejected");
        Ok(result)
    }

    #[instrument(skip(self, activation), fields(code = %activation.code))]
    pub async fn activate_ticket(
        &self,
        activation: &Activation,
    ) -> Result<ActionResult, AdminApiError> {
        let builder = self
            .request(Method::POST, "/api/tickets/activate")
            .json(activation);
        self.execute_json(builder).await
    }

    #[instrument(skip(self))]
    pub async fn check_phone(&self, phone: &str) -> Result<PhoneCheck, AdminApiError> {
        let builder = self.request(Method::GET, &format!("/api/tickets/check/{}", phone));
        self.execute_json(builder).await
    }

    /// Raw stats document; its shape varies between backend versions.
    #[instrument(skip(self))]
    pub async fn dashboard_stats(&self) -> Result<Value, AdminApiError> {
        let builder = self.request(Method::GET, "/api/stats/dashboard");
        self.execute_json(builder).await
    }
}
