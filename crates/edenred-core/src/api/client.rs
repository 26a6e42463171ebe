//! API client for the Edenred Finland REST API.
//!
//! A balance lookup is two requests: `POST /signin` for tokens, then
//! `GET /users/me/user-benefits` with those tokens as cookies. Both requests
//! share one absolute deadline and nothing is retried.

use std::time::Duration;

use reqwest::{header, Client, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tokio::time::{timeout_at, Instant};
use tracing::{debug, info, warn};

use crate::auth::{Credentials, Session};
use crate::models::{Balances, BenefitWallet, UserBenefitsResponse};

use super::{ApiError, BalanceError};

// ============================================================================
// Constants
// ============================================================================

/// Production API endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.myedenred.fi";

const SIGNIN_PATH: &str = "/signin";

const USER_BENEFITS_PATH: &str = "/users/me/user-benefits";

#[derive(Serialize)]
struct SignInRequest<'a> {
    username: &'a str,
    password: &'a str,
    /// Must be present even though it is never filled in
    #[serde(rename = "reCaptchaToken")]
    recaptcha_token: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct SignInResponse {
    #[serde(rename = "sessionToken", default)]
    session_token: Option<String>,
    #[serde(rename = "refreshToken", default)]
    refresh_token: Option<String>,
    #[serde(rename = "expiresIn", default)]
    expires_in: Option<i64>,
    #[serde(default)]
    error: Option<String>,
    #[serde(rename = "errorCode", default)]
    error_code: Option<String>,
    #[serde(rename = "fieldName", default)]
    field_name: Option<String>,
}

impl SignInResponse {
    fn into_session(self) -> Result<Session, ApiError> {
        if let Some(message) = self.error.filter(|e| !e.is_empty()) {
            warn!(
                code = self.error_code.as_deref().unwrap_or(""),
                field = self.field_name.as_deref().unwrap_or(""),
                "Sign-in rejected by provider"
            );
            return Err(ApiError::Rejected {
                message,
                code: self.error_code,
                field: self.field_name,
            });
        }

        match self.session_token.filter(|t| !t.is_empty()) {
            Some(token) => Ok(Session::new(
                token,
                self.refresh_token.unwrap_or_default(),
                self.expires_in,
            )),
            None => Err(ApiError::InvalidResponse(
                "empty session token in response".to_string(),
            )),
        }
    }
}

/// API client for Edenred.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client whose requests individually time out after `timeout`.
    /// `None` or an empty `base_url` selects the production endpoint.
    pub fn new(base_url: Option<&str>, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    /// Create a client around an existing reqwest client.
    pub fn with_client(client: Client, base_url: Option<&str>) -> Self {
        let base_url = base_url
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
            .to_string();

        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sign in and return the lunch and Virike balances.
    ///
    /// Both requests must finish before `deadline`. The first failure ends
    /// the lookup; no partial balances are returned.
    pub async fn fetch_balances(
        &self,
        credentials: &Credentials,
        deadline: Instant,
    ) -> Result<Balances, BalanceError> {
        if !credentials.is_complete() {
            return Err(BalanceError::MissingCredentials);
        }

        let session = self
            .authenticate(credentials, deadline)
            .await
            .map_err(BalanceError::Authentication)?;
        debug!(
            expires_at = ?session.expires_at(),
            expired = session.is_expired(),
            "Signed in"
        );

        let wallets = self
            .fetch_wallets(&session, deadline)
            .await
            .map_err(BalanceError::Fetch)?;

        let balances = Balances::from_wallets(&wallets)?;
        info!(wallets = wallets.len(), "Fetched balances");
        Ok(balances)
    }

    /// Sign in with username and password
    pub async fn authenticate(
        &self,
        credentials: &Credentials,
        deadline: Instant,
    ) -> Result<Session, ApiError> {
        let url = format!("{}{}", self.base_url, SIGNIN_PATH);
        debug!(url = %url, username = credentials.username(), "Signing in");

        let request = self
            .client
            .post(&url)
            .header(header::ACCEPT, "application/json")
            .json(&SignInRequest {
                username: credentials.username(),
                password: credentials.password(),
                recaptcha_token: "",
            });

        let response = Self::send(request, deadline).await?;
        let response = Self::check_response(response, deadline).await?;
        let body: SignInResponse = Self::read_json(response, deadline).await?;
        body.into_session()
    }

    /// Fetch the benefit wallets for a signed-in session
    pub async fn fetch_wallets(
        &self,
        session: &Session,
        deadline: Instant,
    ) -> Result<Vec<BenefitWallet>, ApiError> {
        let url = format!("{}{}", self.base_url, USER_BENEFITS_PATH);
        debug!(url = %url, "Fetching user benefits");

        let mut request = self
            .client
            .get(&url)
            .header(header::ACCEPT, "application/json");
        if let Some(cookie) = session.cookie_header() {
            let value = header::HeaderValue::from_str(&cookie).map_err(|_| {
                ApiError::InvalidToken("token is not valid in a cookie header".to_string())
            })?;
            request = request.header(header::COOKIE, value);
        }

        let response = Self::send(request, deadline).await?;
        let response = Self::check_response(response, deadline).await?;
        let body: UserBenefitsResponse = Self::read_json(response, deadline).await?;
        debug!(count = body.benefits.len(), "Received wallets");
        Ok(body.benefits)
    }

    async fn send(request: RequestBuilder, deadline: Instant) -> Result<Response, ApiError> {
        match timeout_at(deadline, request.send()).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(ApiError::Timeout),
        }
    }

    /// Check for `200 OK`, returning an error with body otherwise.
    async fn check_response(response: Response, deadline: Instant) -> Result<Response, ApiError> {
        if response.status() == StatusCode::OK {
            Ok(response)
        } else {
            let status = response.status();
            let body = match timeout_at(deadline, response.text()).await {
                Ok(text) => text.unwrap_or_default(),
                Err(_) => return Err(ApiError::Timeout),
            };
            Err(ApiError::from_status(status, &body))
        }
    }

    async fn read_json<T: DeserializeOwned>(
        response: Response,
        deadline: Instant,
    ) -> Result<T, ApiError> {
        let bytes = match timeout_at(deadline, response.bytes()).await {
            Ok(result) => result?,
            Err(_) => return Err(ApiError::Timeout),
        };
        serde_json::from_slice(&bytes)
            .map_err(|e| ApiError::InvalidResponse(format!("decode response: {}", e)))
    }
}
