// Error types for the remote services and the booking widget

use thiserror::Error;

pub const GENERIC_AVAILABILITY_ERROR: &str = "An error occurred";
pub const GENERIC_BOOKING_ERROR: &str = "Booking failed. Please try again.";

// Failures reported by a BookingApi implementation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ServiceError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timeout after {0}ms")]
    Timeout(u64),

    #[error("API error: {status_code} - {}", .message.as_deref().unwrap_or("no detail"))]
    Remote {
        status_code: u16,
        message: Option<String>,
    },

    #[error("Response decode error: {0}")]
    Decode(String),

    #[error("Request encode error: {0}")]
    Encode(String),
}

impl ServiceError {
    // Structured message carried by the failure payload, if the remote side sent one
    pub fn detail(&self) -> Option<&str> {
        match self {
            ServiceError::Remote {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => Some(message),
            _ => None,
        }
    }

    pub fn detail_or(&self, fallback: &str) -> String {
        self.detail().unwrap_or(fallback).to_string()
    }
}

/// Failures the widget recovers from locally. None of these escape a widget
/// operation; they are recorded in the state snapshot and rendered as messages.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WidgetError {
    #[error("{message}")]
    AvailabilityFetch {
        message: String,
        #[source]
        source: ServiceError,
    },

    // Never shown to the user; the widget degrades to unrestricted mode
    #[error("Campaign lookup failed: {source}")]
    CampaignLookup {
        #[source]
        source: ServiceError,
    },

    #[error("{message}")]
    DateRangeInvalid { message: String },

    #[error("{message}")]
    BookingSubmission {
        message: String,
        #[source]
        source: ServiceError,
    },
}

impl WidgetError {
    pub fn availability(source: ServiceError) -> Self {
        WidgetError::AvailabilityFetch {
            message: source.detail_or(GENERIC_AVAILABILITY_ERROR),
            source,
        }
    }

    pub fn booking(source: ServiceError) -> Self {
        WidgetError::BookingSubmission {
            message: source.detail_or(GENERIC_BOOKING_ERROR),
            source,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
