//! HTTP client for the Sunflower Land community API.
//!
//! This module provides the [`FarmRequester`] struct for requesting the raw state
//! of a farm.

use std::time::Duration;

use log::{debug, info};
use mockall::automock;
use reqwest::Client;

use crate::farm::{FetchError, response_structs::FarmResponse};

/// HTTP client for requesting farms from the Sunflower Land API.
///
/// # Examples
///
/// ```no_run
/// let requester = FarmRequester::new("https://api.sunflower-land.com", "sfl.key", Duration::from_secs(10))?;
/// let farm = requester.get_farm("23270").await?;
/// println!("Farm: {}", farm.farm);
/// ```
pub struct FarmRequester {
    /// Community API key, sent as `X-API-Key`
    api_key: String,
    /// Sunflower Land API url
    url: String,
    /// HTTP client
    client: Client,
}

/// Trait for making requests to the Sunflower Land API.
///
/// This trait abstracts the HTTP operations for easier testing with mocks.
#[automock]
pub trait Requester {
    /// Fetches the raw state of a farm.
    async fn get_farm(&self, farm_id: &str) -> Result<FarmResponse, FetchError>;
}

impl FarmRequester {
    /// Create a new [FarmRequester].
    ///
    /// # Arguments
    ///
    /// * `url` - The base URL of the Sunflower Land API.
    /// * `api_key` - The community API key.
    /// * `timeout` - Timeout applied to every request.
    pub fn new(url: &str, api_key: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(FarmRequester {
            api_key: api_key.to_string(),
            url: url.to_string(),
            client,
        })
    }
}

impl Requester for FarmRequester {
    /// Request `/community/farms/{farmId}`.
    ///
    /// Any non-success status is reported as [`FetchError::Status`] so the caller
    /// can skip the farm for this cycle.
    async fn get_farm(&self, farm_id: &str) -> Result<FarmResponse, FetchError> {
        let url = format!("{}/community/farms/{}", &self.url, farm_id);
        info!("request farm {}", farm_id);
        debug!("request {}", &url);

        let response = self
            .client
            .get(&url)
            .header("X-API-Key", &self.api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let farm_response: FarmResponse = response.json().await?;

        debug!("response from {} -> {}", &url, &farm_response.farm);

        Ok(farm_response)
    }
}
