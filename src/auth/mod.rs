//! Challenge-negotiating HTTP client for registry APIs
//!
//! Registries split reads across an anonymous-capable path and a
//! token-issuing auth server, and tell clients which scheme applies via a
//! 401 challenge. The client here discovers the scheme on the fly, caches
//! the resulting Bearer token for the rest of the run, and retries the
//! original request exactly once.

use anyhow::{bail, Context, Result};
use base64::Engine;
use reqwest::header::{HeaderMap, AUTHORIZATION, WWW_AUTHENTICATE};
use reqwest::{Client, Method, Response, StatusCode};
use serde::Deserialize;
use tracing::debug;


/// Registry credentials supplied at startup, immutable for the run
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: String, password: String) -> Self {
        Self { username, password }
    }

    /// Render as an HTTP Basic authorization header value
    pub fn basic_header(&self) -> String {
        let encoded = base64::engine::general_purpose::STANDARD
            .encode(format!("{}:{}", self.username, self.password));
        format!("Basic {}", encoded)
    }
}

/// Parsed `WWW-Authenticate` challenge
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Challenge {
    /// No challenge, or a scheme we do not recognize
    None,
    /// Server wants HTTP Basic auth with the startup credentials
    Basic,
    /// Server wants a token from the auth server at `realm`
    Bearer {
        realm: String,
        params: Vec<(String, String)>,
    },
}

/// Parse a `WWW-Authenticate` header value: a scheme token followed by
/// comma-separated `key="value"` pairs. `realm` names the auth server and
/// is pulled out of the Bearer parameter list; the remaining pairs become
/// query parameters for the token request.
pub fn parse_challenge(header: &str) -> Challenge {
    let header = header.trim();
    let (scheme, rest) = match header.split_once(char::is_whitespace) {
        Some((scheme, rest)) => (scheme, rest.trim()),
        None => (header, ""),
    };

    if scheme.eq_ignore_ascii_case("basic") {
        return Challenge::Basic;
    }
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Challenge::None;
    }

    let mut realm = None;
    let mut params = Vec::new();
    for pair in rest.split(',') {
        let Some((key, value)) = pair.trim().split_once('=') else {
            continue;
        };
        let key = key.trim();
        let value = value.trim().trim_matches('"');
        if key.eq_ignore_ascii_case("realm") {
            realm = Some(value.to_string());
        } else {
            params.push((key.to_string(), value.to_string()));
        }
    }

    // A Bearer challenge without a realm gives us no auth server to talk
    // to, so there is nothing we can act on.
    match realm {
        Some(realm) => Challenge::Bearer { realm, params },
        None => Challenge::None,
    }
}

#[derive(Debug, Default)]
struct AuthState {
    use_basic: bool,
    /// Cached full `Authorization` header value, e.g. "Bearer abc".
    /// Overwritten whenever a later Bearer challenge is negotiated.
    bearer: Option<String>,
}

#[derive(Deserialize)]
struct TokenResponse {
    token: String,
}

/// HTTP client that transparently satisfies registry auth challenges.
///
/// One instance per registry/credentials pair; the auth state is owned by
/// the instance and mutated in place across calls, so it must not be
/// shared across tasks. Each logical request costs at most two attempts.
pub struct AuthClient {
    http: Client,
    credentials: Option<Credentials>,
    state: AuthState,
}

impl AuthClient {
    pub fn new(credentials: Option<Credentials>) -> Self {
        Self {
            http: Client::new(),
            credentials,
            state: AuthState::default(),
        }
    }

    pub async fn get(&mut self, url: &str) -> Result<Response> {
        self.request(Method::GET, url, HeaderMap::new()).await
    }

    pub async fn get_with_headers(&mut self, url: &str, headers: HeaderMap) -> Result<Response> {
        self.request(Method::GET, url, headers).await
    }

    pub async fn delete(&mut self, url: &str) -> Result<Response> {
        self.request(Method::DELETE, url, HeaderMap::new()).await
    }

    async fn request(&mut self, method: Method, url: &str, headers: HeaderMap) -> Result<Response> {
        let response = self.send(method.clone(), url, headers.clone()).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        self.negotiate(&response).await?;

        let retry = self.send(method, url, headers).await?;
        if retry.status() == StatusCode::UNAUTHORIZED {
            bail!("{}: still unauthorized after negotiating credentials", url);
        }
        Ok(retry)
    }

    async fn send(&self, method: Method, url: &str, mut headers: HeaderMap) -> Result<Response> {
        if let Some(auth) = self.auth_header() {
            headers.insert(AUTHORIZATION, auth.parse()?);
        }
        debug!("{} {}", method, url);
        self.http
            .request(method, url)
            .headers(headers)
            .send()
            .await
            .with_context(|| format!("Failed to reach {}", url))
    }

    /// Current best-known Authorization header. A cached Bearer token wins
    /// over Basic credentials.
    fn auth_header(&self) -> Option<String> {
        if let Some(bearer) = &self.state.bearer {
            return Some(bearer.clone());
        }
        if self.state.use_basic {
            return self.credentials.as_ref().map(Credentials::basic_header);
        }
        None
    }

    /// Update auth state from a 401 response. An unrecognized challenge
    /// leaves the state unchanged; the single retry then repeats the
    /// request as-is.
    async fn negotiate(&mut self, response: &Response) -> Result<()> {
        let challenge = response
            .headers()
            .get(WWW_AUTHENTICATE)
            .and_then(|h| h.to_str().ok())
            .map(parse_challenge)
            .unwrap_or(Challenge::None);

        match challenge {
            Challenge::Basic => {
                debug!("Registry requested basic auth");
                self.state.use_basic = true;
            }
            Challenge::Bearer { realm, params } => {
                let token = self.fetch_token(&realm, &params).await?;
                self.state.bearer = Some(format!("Bearer {}", token));
            }
            Challenge::None => {}
        }
        Ok(())
    }

    /// Exchange the startup credentials for a token at the auth server
    /// named by the challenge. A non-200 here is fatal for the whole run.
    async fn fetch_token(&self, realm: &str, params: &[(String, String)]) -> Result<String> {
        debug!("Fetching token from {}", realm);
        let mut request = self.http.get(realm).query(params);
        if let Some(credentials) = &self.credentials {
            request = request.header(AUTHORIZATION, credentials.basic_header());
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("Failed to reach auth server {}", realm))?;
        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            bail!("{}: status {} ({})", realm, status, body.trim());
        }

        let token: TokenResponse = response
            .json()
            .await
            .with_context(|| format!("Invalid token response from {}", realm))?;
        Ok(token.token)
    }
}
