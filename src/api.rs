// Remote operations consumed by the booking widget

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ServiceError;
use crate::model::{AccommodationOffering, CampaignWindow, SearchQuery};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityRequest {
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    pub guests: u32,
    // Empty when unrestricted
    pub campaign_type: String,
}

impl From<&SearchQuery> for AvailabilityRequest {
    fn from(query: &SearchQuery) -> Self {
        Self {
            check_in_date: query.check_in,
            check_out_date: query.check_out,
            guests: query.guests.get(),
            campaign_type: query.campaign_type_or_empty().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignWindowsRequest {
    pub campaign_type: String,
}

// One cart line as sent to the reservation service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationItem {
    pub product_id: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationRequest {
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    pub guests: u32,
    // JSON array of ReservationItem, sent as a single text field
    pub items_json: String,
    pub campaign_type: String,
}

impl ReservationRequest {
    pub fn items(&self) -> Result<Vec<ReservationItem>, ServiceError> {
        serde_json::from_str(&self.items_json).map_err(|e| ServiceError::Decode(e.to_string()))
    }
}

// Backend the widget talks to. Every call may be outstanding concurrently with
// any other; implementations must not assume requests are serialized.
#[async_trait]
pub trait BookingApi: Send + Sync + 'static {
    // Offerings available for the stay, in display order
    async fn available_accommodations(
        &self,
        request: &AvailabilityRequest,
    ) -> Result<Vec<AccommodationOffering>, ServiceError>;

    // Campaign windows, ascending by start date
    async fn booking_date_ranges(
        &self,
        campaign_type: &str,
    ) -> Result<Vec<CampaignWindow>, ServiceError>;

    // Returns the new reservation identifier
    async fn create_reservation(&self, request: &ReservationRequest)
        -> Result<String, ServiceError>;
}
