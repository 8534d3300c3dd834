// Core of the hostel booking widget: date windows, pricing, availability,
// cart and reservation submission behind one state container

pub mod api;
pub mod availability;
pub mod booking;
pub mod cart;
pub mod config;
pub mod date_windows;
pub mod error;
pub mod http;
pub mod logging;
pub mod model;
pub mod pricing;
pub mod view;
pub mod widget;

#[cfg(test)]
mod testing;

// Re-export key types for convenience
pub use api::{AvailabilityRequest, BookingApi, ReservationItem, ReservationRequest};
pub use availability::AvailabilitySession;
pub use booking::{BookingOutcome, BookingSubmitter, FlowInput, SubmissionState};
pub use cart::{Cart, CartAction, CartLineItem};
pub use config::{AppConfig, HttpClientConfig, WidgetConfig};
pub use date_windows::CampaignWindows;
pub use error::{ConfigError, ServiceError, WidgetError};
pub use http::HttpBookingApi;
pub use model::{
    AccommodationOffering, CampaignWindow, Family, GuestCount, PricingModel, SearchQuery,
};
pub use view::{derive_view_model, ViewModel};
pub use widget::{ActiveView, BookingWidget, WidgetState};
