// API client module: a small blocking HTTP client for the TCO Certified
// API. One call exchanges credentials for a token, the other fetches a
// single page of GTIN product data.

use crate::error::{AuthError, FetchError};
use crate::pages::{PageRequest, PageResponse, PageSource};
use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Production endpoint, used unless overridden.
pub const DEFAULT_BASE_URL: &str = "https://api.tcocertified.com";

/// Header carrying `Bearer <token>` on data requests.
const AUTH_HEADER: &str = "x-auth-token";

/// Holds a reqwest blocking client, the base URL of the API and the bearer
/// token once authentication has succeeded.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<Token>,
}

/// Username and password as typed at the prompt. Never persisted.
#[derive(Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Bearer token returned by the token endpoint.
#[derive(Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    pub fn new(token: impl Into<String>) -> Self {
        Token(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token(<redacted>)")
    }
}

/// The token endpoint may omit the field entirely.
#[derive(Deserialize)]
struct TokenResponse {
    #[serde(default)]
    token: Option<String>,
}

#[derive(Serialize)]
struct PageQuery<'a> {
    page: u32,
    product_type: &'a str,
    jsonld: bool,
}

impl ApiClient {
    /// Create an ApiClient pointed at `base_url` (trailing slashes ignored).
    pub fn new(base_url: impl Into<String>) -> Result<Self, reqwest::Error> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let client = Client::builder().build()?;
        Ok(ApiClient {
            client,
            base_url,
            token: None,
        })
    }

    /// Store the token for subsequent page requests.
    pub fn set_token(&mut self, token: Token) {
        self.token = Some(token);
    }

    /// Headers sent with every data request.
    fn auth_headers(&self) -> Result<HeaderMap, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(t) = &self.token {
            let val = HeaderValue::from_str(&format!("Bearer {}", t.as_str()))
                .map_err(|_| FetchError::InvalidToken)?;
            headers.insert(AUTH_HEADER, val);
        }
        Ok(headers)
    }

    /// POST the credentials to /token and return the bearer token.
    pub fn authenticate(&self, credentials: &Credentials) -> Result<Token, AuthError> {
        let url = format!("{}/token", &self.base_url);
        debug!(%url, username = %credentials.username, "requesting token");
        let res = self
            .client
            .post(&url)
            .json(credentials)
            .send()
            .map_err(AuthError::Transport)?;
        if !res.status().is_success() {
            let (status, body) = status_and_body(res);
            return Err(AuthError::Status { status, body });
        }
        let resp: TokenResponse = res.json().map_err(AuthError::InvalidResponse)?;
        match resp.token {
            Some(token) if !token.is_empty() => Ok(Token(token)),
            _ => Err(AuthError::EmptyToken),
        }
    }

    /// POST to /generic/gtin for one page. Parameters travel in the query
    /// string; the body is empty.
    pub fn fetch_page(&self, request: &PageRequest) -> Result<PageResponse, FetchError> {
        let url = format!("{}/generic/gtin", &self.base_url);
        let query = PageQuery {
            page: request.page,
            product_type: &request.product_type,
            jsonld: request.jsonld,
        };
        let res = self
            .client
            .post(&url)
            .headers(self.auth_headers()?)
            .query(&query)
            .send()
            .map_err(FetchError::Transport)?;
        if !res.status().is_success() {
            let (status, body) = status_and_body(res);
            return Err(FetchError::Status { status, body });
        }
        res.json().map_err(FetchError::InvalidResponse)
    }
}

impl PageSource for ApiClient {
    fn fetch_page(&self, request: &PageRequest) -> Result<PageResponse, FetchError> {
        ApiClient::fetch_page(self, request)
    }
}

fn status_and_body(res: Response) -> (u16, String) {
    let status = res.status().as_u16();
    let txt = res.text().unwrap_or_else(|_| "".into());
    (status, txt)
}
