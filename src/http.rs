// HTTP implementation of the booking backend

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::{AvailabilityRequest, BookingApi, CampaignWindowsRequest, ReservationRequest};
use crate::config::HttpClientConfig;
use crate::error::ServiceError;
use crate::model::{AccommodationOffering, CampaignWindow};

const API_KEY_HEADER: &str = "x-api-key";

// Shape of an error body; anything else yields a Remote error without detail
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

pub struct HttpBookingApi {
    client: Client,
    config: HttpClientConfig,
}

impl HttpBookingApi {
    pub fn new(config: HttpClientConfig) -> Result<Self, ServiceError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| ServiceError::Network(e.to_string()))?;
        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ServiceError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned + Send,
    {
        let url = self.url(path);
        debug!(%url, "POST");

        let mut request = self.client.post(&url).json(body);
        if !self.config.api_key.is_empty() {
            request = request.header(API_KEY_HEADER, &self.config.api_key);
        }

        let response = request.send().await.map_err(|e| self.transport_error(e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(remote_error(status, &response.text().await.unwrap_or_default()));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ServiceError::Decode(e.to_string()))
    }

    fn transport_error(&self, error: reqwest::Error) -> ServiceError {
        if error.is_timeout() {
            ServiceError::Timeout(self.config.timeout_ms)
        } else {
            ServiceError::Network(error.to_string())
        }
    }
}

fn remote_error(status: StatusCode, body: &str) -> ServiceError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|body| body.message);
    ServiceError::Remote {
        status_code: status.as_u16(),
        message,
    }
}

#[async_trait]
impl BookingApi for HttpBookingApi {
    async fn available_accommodations(
        &self,
        request: &AvailabilityRequest,
    ) -> Result<Vec<AccommodationOffering>, ServiceError> {
        self.post("availability", request).await
    }

    async fn booking_date_ranges(
        &self,
        campaign_type: &str,
    ) -> Result<Vec<CampaignWindow>, ServiceError> {
        let request = CampaignWindowsRequest {
            campaign_type: campaign_type.to_string(),
        };
        self.post("booking-date-ranges", &request).await
    }

    async fn create_reservation(&self, request: &ReservationRequest) -> Result<String, ServiceError> {
        self.post("reservations", request).await
    }
}
