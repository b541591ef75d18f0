use super::dto::{
    ApiErrorEnvelope, RdnsListItem, ServerListItem, TrafficResponse, into_rdns_table,
};
use crate::config::{RobotCredentials, RobotEnvConfig};
use crate::domain::errors::RobotError;
use crate::domain::ports::RobotApi;
use crate::domain::traffic::{ReverseDnsTable, ServerEntry, TrafficQuery, TrafficTable};
use crate::infrastructure::core::http_client_factory::{HttpClientFactory, endpoint_url};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, StatusCode};
use reqwest_middleware::ClientWithMiddleware;
use serde::de::DeserializeOwned;
use tracing::debug;

pub const SERVER_ENDPOINT: &str = "/server";
pub const RDNS_ENDPOINT: &str = "/rdns";
pub const TRAFFIC_ENDPOINT: &str = "/traffic";

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Authenticated client for the Robot webservice.
pub struct RobotClient {
    client: ClientWithMiddleware,
    base_url: String,
    credentials: RobotCredentials,
}

impl RobotClient {
    pub fn new(config: &RobotEnvConfig) -> Self {
        Self::with_client(
            HttpClientFactory::create_client(&config.http),
            config.base_url.as_str(),
            config.credentials.clone(),
        )
    }

    pub fn with_client(
        client: ClientWithMiddleware,
        base_url: impl Into<String>,
        credentials: RobotCredentials,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            credentials,
        }
    }

    /// Issue one request and return the raw 2xx body.
    ///
    /// `form` is sent url-encoded as the request body. Non-2xx responses are
    /// mapped to `RobotError::Api` or `RobotError::MalformedErrorBody`.
    pub async fn request(
        &self,
        method: Method,
        endpoint: &str,
        form: &[(&str, String)],
    ) -> Result<Vec<u8>, RobotError> {
        let url = endpoint_url(&self.base_url, endpoint);
        debug!("RobotClient: {} {} ({} form fields)", method, url, form.len());

        let body = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(form.iter().map(|(k, v)| (*k, v.as_str())))
            .finish();

        let transport = |source: reqwest_middleware::Error| RobotError::Transport {
            endpoint: endpoint.to_string(),
            source,
        };

        let response = self
            .client
            .request(method, &url)
            .basic_auth(&self.credentials.username, Some(&self.credentials.password))
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(body)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| transport(reqwest_middleware::Error::from(e)))?;

        interpret_response(endpoint, status, bytes.to_vec())
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, RobotError> {
        let body = self.request(Method::GET, endpoint, &[]).await?;
        decode(endpoint, &body)
    }
}

/// Map an HTTP status and body to the client contract.
pub fn interpret_response(
    endpoint: &str,
    status: StatusCode,
    body: Vec<u8>,
) -> Result<Vec<u8>, RobotError> {
    if status.is_success() {
        return Ok(body);
    }

    match serde_json::from_slice::<ApiErrorEnvelope>(&body) {
        Ok(envelope) => Err(RobotError::Api {
            endpoint: endpoint.to_string(),
            status: envelope.error.status,
            code: envelope.error.code,
            message: envelope.error.message,
        }),
        Err(source) => Err(RobotError::MalformedErrorBody {
            endpoint: endpoint.to_string(),
            http_status: status.as_u16(),
            source,
        }),
    }
}

fn decode<T: DeserializeOwned>(endpoint: &str, body: &[u8]) -> Result<T, RobotError> {
    serde_json::from_slice(body).map_err(|source| RobotError::Decode {
        endpoint: endpoint.to_string(),
        source,
    })
}

#[async_trait]
impl RobotApi for RobotClient {
    async fn servers(&self) -> Result<Vec<ServerEntry>, RobotError> {
        let items: Vec<ServerListItem> = self.get_json(SERVER_ENDPOINT).await?;
        Ok(items.into_iter().map(|item| item.server.into()).collect())
    }

    async fn reverse_dns(&self) -> Result<ReverseDnsTable, RobotError> {
        let items: Vec<RdnsListItem> = self.get_json(RDNS_ENDPOINT).await?;
        Ok(into_rdns_table(items))
    }

    async fn traffic(&self, query: &TrafficQuery) -> Result<TrafficTable, RobotError> {
        let body = self
            .request(Method::POST, TRAFFIC_ENDPOINT, &query.form_pairs())
            .await?;
        let response: TrafficResponse = decode(TRAFFIC_ENDPOINT, &body)?;
        Ok(response.traffic.into())
    }
}
