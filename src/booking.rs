// Booking submission: builds the reservation request and tracks the submission state

use tracing::{info, warn};

use crate::api::{BookingApi, ReservationItem, ReservationRequest};
use crate::cart::Cart;
use crate::error::{ServiceError, WidgetError};
use crate::model::SearchQuery;

pub const RECORD_ID_INPUT: &str = "recordId";
pub const WORKFLOW_COMPLETED_MESSAGE: &str = "Reservation completed successfully!";

pub fn reservation_created_message(reservation_id: &str) -> String {
    format!("Reservation created successfully! (ID: {})", reservation_id)
}

// Idle -> Submitting -> Succeeded | Failed, and both outcomes lead back to Idle.
// Succeeded returns to Idle via `reset` once the confirmation is shown or the
// workflow finishes. Failed stays visible until the retry, which `begin`
// accepts directly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting,
    Succeeded {
        reservation_id: String,
    },
    Failed,
}

// Named input handed to the post-booking workflow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowInput {
    pub name: String,
    pub input_type: String,
    pub value: String,
}

impl FlowInput {
    pub fn record_id(reservation_id: &str) -> Self {
        Self {
            name: RECORD_ID_INPUT.to_string(),
            input_type: "String".to_string(),
            value: reservation_id.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingOutcome {
    // No workflow configured: show a plain confirmation
    Confirmed { message: String },
    // Workflow configured: it takes over the view with the reservation id as input
    HandOff {
        flow_api_name: String,
        inputs: Vec<FlowInput>,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingSubmitter {
    state: SubmissionState,
}

impl BookingSubmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    pub fn is_submitting(&self) -> bool {
        self.state == SubmissionState::Submitting
    }

    // Enter Submitting. Refused for an empty cart or while a submission is in
    // flight, so a double activation cannot create two reservations.
    pub fn begin(&mut self, cart: &Cart) -> bool {
        if cart.is_empty() || self.is_submitting() {
            return false;
        }
        self.state = SubmissionState::Submitting;
        true
    }

    pub fn succeed(&mut self, reservation_id: &str, flow_api_name: Option<&str>) -> BookingOutcome {
        self.state = SubmissionState::Succeeded {
            reservation_id: reservation_id.to_string(),
        };

        match flow_api_name {
            Some(flow_api_name) => BookingOutcome::HandOff {
                flow_api_name: flow_api_name.to_string(),
                inputs: vec![FlowInput::record_id(reservation_id)],
            },
            None => BookingOutcome::Confirmed {
                message: reservation_created_message(reservation_id),
            },
        }
    }

    pub fn fail(&mut self) {
        self.state = SubmissionState::Failed;
    }

    pub fn reset(&mut self) {
        if !self.is_submitting() {
            self.state = SubmissionState::Idle;
        }
    }
}

// Only identifiers and quantities are sent; the snapshotted name and rate stay local
pub fn build_request(cart: &Cart, query: &SearchQuery) -> Result<ReservationRequest, ServiceError> {
    let items: Vec<ReservationItem> = cart
        .items()
        .iter()
        .map(|item| ReservationItem {
            product_id: item.product_id.clone(),
            quantity: item.quantity,
        })
        .collect();
    let items_json = serde_json::to_string(&items).map_err(|e| ServiceError::Encode(e.to_string()))?;

    Ok(ReservationRequest {
        check_in_date: query.check_in,
        check_out_date: query.check_out,
        guests: query.guests.get(),
        items_json,
        campaign_type: query.campaign_type_or_empty().to_string(),
    })
}

pub async fn submit(api: &dyn BookingApi, cart: &Cart, query: &SearchQuery) -> Result<String, WidgetError> {
    let request = build_request(cart, query).map_err(WidgetError::booking)?;
    info!(
        check_in = %request.check_in_date,
        check_out = %request.check_out_date,
        items = cart.len(),
        "Submitting reservation"
    );

    match api.create_reservation(&request).await {
        Ok(reservation_id) => {
            info!(%reservation_id, "Reservation created");
            Ok(reservation_id)
        }
        Err(source) => {
            warn!(error = %source, "Reservation failed");
            Err(WidgetError::booking(source))
        }
    }
}
