use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use trendstitch_core::StitchError;
use url::Url;

use crate::config::{Auth, HttpConfig};
use crate::error::map_http_err;
use crate::retry::send_with_retry;

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Authenticated, retrying HTTP client shared by every call of one connector.
pub struct Transport {
    connector: &'static str,
    client: Client,
    cfg: HttpConfig,
    token: Mutex<Option<String>>,
}

impl Transport {
    /// Build the underlying client with the configured timeout and user agent.
    ///
    /// # Errors
    /// Returns `InvalidArg` if the HTTP client cannot be constructed.
    pub fn new(connector: &'static str, cfg: HttpConfig) -> Result<Self, StitchError> {
        let client = Client::builder()
            .timeout(cfg.timeout)
            .user_agent(cfg.user_agent.clone())
            .build()
            .map_err(|e| StitchError::InvalidArg(format!("cannot build http client: {e}")))?;
        Ok(Self {
            connector,
            client,
            cfg,
            token: Mutex::new(None),
        })
    }

    /// Underlying client, for vendors building their own requests.
    #[must_use]
    pub const fn client(&self) -> &Client {
        &self.client
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &HttpConfig {
        &self.cfg
    }

    /// Resolve `path` below the configured base URL.
    ///
    /// # Errors
    /// Returns `InvalidArg` if the joined URL is malformed.
    pub fn endpoint(&self, path: &str) -> Result<Url, StitchError> {
        let joined = format!(
            "{}/{}",
            self.cfg.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&joined).map_err(|e| StitchError::InvalidArg(format!("bad endpoint '{joined}': {e}")))
    }

    /// Exchange client credentials for an access token, once per transport.
    ///
    /// A no-op for every other auth scheme.
    ///
    /// # Errors
    /// Any error of the token request, or `Data` if the token response is malformed.
    pub async fn authenticate(&self) -> Result<(), StitchError> {
        let Auth::ClientCredentials {
            token_url,
            client_id,
            client_secret,
        } = &self.cfg.auth
        else {
            return Ok(());
        };
        let mut guard = self.token.lock().await;
        if guard.is_some() {
            return Ok(());
        }
        let req = self.client.post(token_url.clone()).json(&serde_json::json!({
            "grant_type": "client_credentials",
            "client_id": client_id,
            "client_secret": client_secret,
        }));
        let resp = send_with_retry(self.connector, "auth", req, &self.cfg.retry).await?;
        let body: TokenResponse = resp
            .json()
            .await
            .map_err(|e| map_http_err(self.connector, "auth", &e))?;
        #[cfg(feature = "tracing")]
        tracing::debug!(connector = self.connector, "obtained access token");
        *guard = Some(body.access_token);
        Ok(())
    }

    async fn authorize(&self, req: RequestBuilder) -> Result<RequestBuilder, StitchError> {
        Ok(match &self.cfg.auth {
            Auth::None => req,
            Auth::Bearer { token } => req.bearer_auth(token),
            Auth::Basic { username, password } => req.basic_auth(username, Some(password)),
            Auth::Header { name, value } => req.header(name.as_str(), value.as_str()),
            Auth::ClientCredentials { .. } => {
                self.authenticate().await?;
                let guard = self.token.lock().await;
                match guard.as_deref() {
                    Some(token) => req.bearer_auth(token),
                    None => return Err(StitchError::connector(self.connector, "no access token")),
                }
            }
        })
    }

    /// Authorize and send `req` under the retry policy.
    ///
    /// # Errors
    /// See [`send_with_retry`].
    pub async fn send(&self, capability: &str, req: RequestBuilder) -> Result<Response, StitchError> {
        let req = self.authorize(req).await?;
        send_with_retry(self.connector, capability, req, &self.cfg.retry).await
    }

    /// Authorized `GET` of `url`, decoding the body as JSON.
    ///
    /// # Errors
    /// See [`Self::send`]; `Data` for an undecodable body.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        capability: &str,
        url: Url,
    ) -> Result<T, StitchError> {
        let resp = self.send(capability, self.client.get(url)).await?;
        resp.json()
            .await
            .map_err(|e| map_http_err(self.connector, capability, &e))
    }

    /// Authorized `GET` of `url`, returning the body as text.
    ///
    /// # Errors
    /// See [`Self::send`].
    pub async fn get_text(&self, capability: &str, url: Url) -> Result<String, StitchError> {
        let resp = self.send(capability, self.client.get(url)).await?;
        resp.text()
            .await
            .map_err(|e| map_http_err(self.connector, capability, &e))
    }

    /// Connector name errors are tagged with.
    #[must_use]
    pub const fn connector(&self) -> &'static str {
        self.connector
    }
}
