use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use serde::Deserialize;

use super::{ApiError, SessionApi};
use crate::error::{CliError, Result};
use crate::models::{ActiveSession, UserIdentity};

const USER_AGENT: &str = concat!("ocli/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const CURRENT_USER_PATH: &str = "/apis/user.openshift.io/v1/users/~";
const ACCESS_TOKENS_PATH: &str = "/apis/oauth.openshift.io/v1/oauthaccesstokens";

#[derive(Deserialize, Debug)]
struct UserResponse {
    metadata: ObjectMeta,
}

#[derive(Deserialize, Debug)]
struct ObjectMeta {
    name: String,
}

/// Blocking HTTP client bound to one server and one bearer token
pub struct HttpSessionApi {
    client: Client,
    base_url: String,
}

impl HttpSessionApi {
    pub fn new(session: &ActiveSession) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(make_headers(&session.token)?)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url: session.server.trim_end_matches('/').to_string(),
        })
    }
}

impl SessionApi for HttpSessionApi {
    fn whoami(&self) -> std::result::Result<UserIdentity, ApiError> {
        let url = format!("{}{}", self.base_url, CURRENT_USER_PATH);
        tracing::debug!("Requesting current user from {}", url);

        let res = check_status(self.client.get(url).send()?)?;
        let body = res.text()?;
        parse_user(&body)
    }

    fn delete_token(&self, token: &str) -> std::result::Result<(), ApiError> {
        let url = token_url(&self.base_url, token);
        tracing::debug!("Deleting access token at {}", self.base_url);

        check_status(self.client.delete(url).send()?)?;
        Ok(())
    }
}

fn make_headers(token: &str) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    let mut auth = HeaderValue::from_str(&format!("Bearer {}", token))
        .map_err(|_| CliError::ConfigError("Token contains invalid characters".to_string()))?;
    auth.set_sensitive(true);
    headers.insert(AUTHORIZATION, auth);
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    Ok(headers)
}

fn token_url(base_url: &str, token: &str) -> String {
    format!(
        "{}{}/{}",
        base_url,
        ACCESS_TOKENS_PATH,
        urlencoding::encode(token)
    )
}

fn check_status(res: Response) -> std::result::Result<Response, ApiError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }

    let body = res.text().unwrap_or_default();
    tracing::debug!(%status, "Server returned error response");
    Err(ApiError::ErrorResponse(status, body))
}

fn parse_user(body: &str) -> std::result::Result<UserIdentity, ApiError> {
    let user: UserResponse =
        serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))?;

    Ok(UserIdentity {
        name: user.metadata.name,
    })
}
