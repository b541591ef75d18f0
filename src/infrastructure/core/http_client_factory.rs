use crate::config::HttpClientSettings;
use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};

pub struct HttpClientFactory;

impl HttpClientFactory {
    /// Creates a new HTTP client with retry middleware
    pub fn create_client(settings: &HttpClientSettings) -> ClientWithMiddleware {
        // Retry policy:
        // - Exponential backoff
        // - Only transient failures (connect errors, timeouts, 5xx, 408, 429)
        // - Bounded by settings.max_retries
        let retry_policy =
            ExponentialBackoff::builder().build_with_max_retries(settings.max_retries);

        let client = Client::builder()
            .pool_max_idle_per_host(2)
            .timeout(settings.timeout)
            .connect_timeout(settings.connect_timeout)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .unwrap_or_else(|_| Client::new());

        ClientBuilder::new(client)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build()
    }
}

/// Joins a base URL and an endpoint path with exactly one `/` between them.
pub fn endpoint_url(base_url: &str, endpoint: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        endpoint.trim_start_matches('/')
    )
}
