// Data types shared by the booking engine and the remote services

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// Category an offering is listed under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Family {
    #[serde(rename = "Dorm Bed")]
    Dorm,
    #[serde(rename = "Private Room")]
    Private,
}

// How the rate of an offering is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PricingModel {
    #[serde(rename = "Per Person")]
    PerPerson,
    #[serde(rename = "Per Room")]
    PerRoom,
}

/// One bookable unit type (a dorm bed or private room category) as returned
/// by the availability lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccommodationOffering {
    pub product_id: String,
    pub name: String,
    pub family: Family,
    pub pricing_model: PricingModel,
    // Currency per unit per night
    #[serde(default)]
    pub rate: f64,
    pub available_units: u32,
    // Newline separated
    #[serde(default)]
    pub amenities: Option<String>,
    #[serde(default)]
    pub gender_restriction: Option<String>,
    #[serde(default)]
    pub max_guests: u32,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl AccommodationOffering {
    pub fn is_per_person(&self) -> bool {
        self.pricing_model == PricingModel::PerPerson
    }
}

// Date range during which booking is permitted in campaign mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignWindow {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl CampaignWindow {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            start_date,
            end_date,
        }
    }

    // Inclusive on both ends
    pub fn contains_stay(&self, check_in: NaiveDate, check_out: NaiveDate) -> bool {
        check_in >= self.start_date && check_out <= self.end_date
    }
}

/// Number of guests as picked from the 1..=10 guest selector.
///
/// The selector hands over text, so parsing never fails. The leading run of
/// digits is taken ("3 guests" is 3, "2.5" is 2); no digits, or zero, counts
/// as a single guest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GuestCount(u32);

impl GuestCount {
    pub const MAX_OPTION: u32 = 10;

    pub fn new(count: u32) -> Self {
        Self(count.max(1))
    }

    pub fn parse(text: &str) -> Self {
        let text = text.trim_start();
        let text = text.strip_prefix('+').unwrap_or(text);
        let digits = text
            .find(|c: char| !c.is_ascii_digit())
            .map_or(text, |end| &text[..end]);
        digits
            .parse::<u32>()
            .ok()
            .filter(|count| *count > 0)
            .map_or(Self(1), Self)
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for GuestCount {
    fn default() -> Self {
        Self(1)
    }
}

impl From<&str> for GuestCount {
    fn from(text: &str) -> Self {
        Self::parse(text)
    }
}

// Current search parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: GuestCount,
    pub campaign_type: Option<String>,
}

impl SearchQuery {
    // Default stay: one night starting today
    pub fn starting(today: NaiveDate, campaign_type: Option<String>) -> Self {
        Self {
            check_in: today,
            check_out: next_day(today),
            guests: GuestCount::default(),
            campaign_type,
        }
    }

    pub fn campaign_type_or_empty(&self) -> &str {
        self.campaign_type.as_deref().unwrap_or("")
    }
}

pub fn next_day(date: NaiveDate) -> NaiveDate {
    date.succ_opt().unwrap_or(date)
}
