// Test doubles and fixtures shared by the module tests

use std::collections::VecDeque;

use async_trait::async_trait;
use chrono::NaiveDate;
use parking_lot::Mutex;
use tokio::sync::oneshot;

use crate::api::{AvailabilityRequest, BookingApi, ReservationRequest};
use crate::cart::{Cart, CartLineItem};
use crate::error::ServiceError;
use crate::model::{AccommodationOffering, CampaignWindow, Family, PricingModel};

pub fn date(iso: &str) -> NaiveDate {
    NaiveDate::parse_from_str(iso, "%Y-%m-%d").unwrap()
}

pub fn dorm(product_id: &str, rate: f64, available_units: u32) -> AccommodationOffering {
    AccommodationOffering {
        product_id: product_id.to_string(),
        name: format!("{} beds", product_id),
        family: Family::Dorm,
        pricing_model: PricingModel::PerPerson,
        rate,
        available_units,
        amenities: Some("Locker\nPrivacy curtain\n".to_string()),
        gender_restriction: None,
        max_guests: 1,
        image_url: None,
    }
}

pub fn private_room(product_id: &str, rate: f64, available_units: u32) -> AccommodationOffering {
    AccommodationOffering {
        product_id: product_id.to_string(),
        name: format!("{} room", product_id),
        family: Family::Private,
        pricing_model: PricingModel::PerRoom,
        rate,
        available_units,
        amenities: None,
        gender_restriction: None,
        max_guests: 2,
        image_url: Some("/img/private.jpg".to_string()),
    }
}

pub fn line_item(product_id: &str, rate: f64, pricing_model: PricingModel, quantity: u32) -> CartLineItem {
    CartLineItem {
        product_id: product_id.to_string(),
        name: format!("{} item", product_id),
        rate,
        pricing_model,
        quantity,
        available_units: quantity,
    }
}

pub fn cart_with(items: Vec<CartLineItem>) -> Cart {
    Cart::from_items(items)
}

// A scripted response, either ready immediately or released by the test
enum Scripted<T> {
    Ready(Result<T, ServiceError>),
    Gated(oneshot::Receiver<Result<T, ServiceError>>),
}

impl<T> Scripted<T> {
    async fn resolve(self) -> Result<T, ServiceError> {
        match self {
            Scripted::Ready(result) => result,
            Scripted::Gated(receiver) => receiver
                .await
                .unwrap_or_else(|_| Err(ServiceError::Network("gate dropped".to_string()))),
        }
    }
}

// In-memory BookingApi that records every request it receives
pub struct MockBookingApi {
    availability: Mutex<VecDeque<Scripted<Vec<AccommodationOffering>>>>,
    default_availability: Mutex<Result<Vec<AccommodationOffering>, ServiceError>>,
    windows: Mutex<Result<Vec<CampaignWindow>, ServiceError>>,
    reservations: Mutex<VecDeque<Scripted<String>>>,
    default_reservation: Mutex<Result<String, ServiceError>>,
    availability_requests: Mutex<Vec<AvailabilityRequest>>,
    window_requests: Mutex<Vec<String>>,
    reservation_requests: Mutex<Vec<ReservationRequest>>,
}

impl MockBookingApi {
    pub fn new() -> Self {
        Self {
            availability: Mutex::new(VecDeque::new()),
            default_availability: Mutex::new(Ok(Vec::new())),
            windows: Mutex::new(Ok(Vec::new())),
            reservations: Mutex::new(VecDeque::new()),
            default_reservation: Mutex::new(Ok("res-default".to_string())),
            availability_requests: Mutex::new(Vec::new()),
            window_requests: Mutex::new(Vec::new()),
            reservation_requests: Mutex::new(Vec::new()),
        }
    }

    // Answer for the next availability call; later calls fall back to the default
    pub fn push_availability(&self, result: Result<Vec<AccommodationOffering>, ServiceError>) {
        self.availability.lock().push_back(Scripted::Ready(result));
    }

    pub fn gate_availability(
        &self,
    ) -> oneshot::Sender<Result<Vec<AccommodationOffering>, ServiceError>> {
        let (sender, receiver) = oneshot::channel();
        self.availability.lock().push_back(Scripted::Gated(receiver));
        sender
    }

    pub fn set_default_availability(&self, result: Result<Vec<AccommodationOffering>, ServiceError>) {
        *self.default_availability.lock() = result;
    }

    pub fn set_windows(&self, result: Result<Vec<CampaignWindow>, ServiceError>) {
        *self.windows.lock() = result;
    }

    pub fn set_reservation(&self, result: Result<String, ServiceError>) {
        *self.default_reservation.lock() = result;
    }

    pub fn gate_reservation(&self) -> oneshot::Sender<Result<String, ServiceError>> {
        let (sender, receiver) = oneshot::channel();
        self.reservations.lock().push_back(Scripted::Gated(receiver));
        sender
    }

    pub fn availability_requests(&self) -> Vec<AvailabilityRequest> {
        self.availability_requests.lock().clone()
    }

    pub fn window_requests(&self) -> Vec<String> {
        self.window_requests.lock().clone()
    }

    pub fn reservation_requests(&self) -> Vec<ReservationRequest> {
        self.reservation_requests.lock().clone()
    }
}

#[async_trait]
impl BookingApi for MockBookingApi {
    async fn available_accommodations(
        &self,
        request: &AvailabilityRequest,
    ) -> Result<Vec<AccommodationOffering>, ServiceError> {
        self.availability_requests.lock().push(request.clone());
        let scripted = self.availability.lock().pop_front();
        if let Some(scripted) = scripted {
            return scripted.resolve().await;
        }
        self.default_availability.lock().clone()
    }

    async fn booking_date_ranges(
        &self,
        campaign_type: &str,
    ) -> Result<Vec<CampaignWindow>, ServiceError> {
        self.window_requests.lock().push(campaign_type.to_string());
        self.windows.lock().clone()
    }

    async fn create_reservation(&self, request: &ReservationRequest) -> Result<String, ServiceError> {
        self.reservation_requests.lock().push(request.clone());
        let scripted = self.reservations.lock().pop_front();
        if let Some(scripted) = scripted {
            return scripted.resolve().await;
        }
        self.default_reservation.lock().clone()
    }
}
