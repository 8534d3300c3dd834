// Display projection of the widget state. Everything here is derived on each
// call and never stored back on the state.

use chrono::NaiveDate;

use crate::booking::FlowInput;
use crate::cart::CartLineItem;
use crate::config::WidgetConfig;
use crate::date_windows::format_short_date;
use crate::model::{AccommodationOffering, Family, GuestCount};
use crate::pricing::{
    cart_total, format_currency, formatted_cart_total, line_total, max_selectable_quantity,
    night_count,
};
use crate::widget::{ActiveView, WidgetState};

const LOW_AVAILABILITY_THRESHOLD: u32 = 2;

#[derive(Debug, Clone, PartialEq)]
pub struct OfferingView {
    pub product_id: String,
    pub name: String,
    pub family: Family,
    pub formatted_rate: String,
    pub rate_basis: &'static str,
    pub avail_label: String,
    pub is_low_availability: bool,
    pub amenities: Vec<String>,
    pub image_url: Option<String>,
    pub gender_restriction: Option<String>,
    pub max_guests: u32,
    pub is_selected: bool,
    pub is_expanded: bool,
    pub expand_label: String,
}

impl OfferingView {
    pub fn has_amenities(&self) -> bool {
        !self.amenities.is_empty()
    }

    pub fn has_image(&self) -> bool {
        self.image_url.is_some()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoomSection {
    pub key: &'static str,
    pub label: &'static str,
    pub rooms: Vec<OfferingView>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CartLineView {
    pub product_id: String,
    pub name: String,
    pub quantity: u32,
    pub line_total: f64,
    pub formatted_total: String,
    pub qty_label: String,
    pub qty_field_label: &'static str,
    pub qty_options: Vec<u32>,
    pub date_range: String,
    pub night_count: String,
    pub remove_label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowView {
    pub flow_api_name: String,
    pub inputs: Vec<FlowInput>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewModel {
    pub heading: String,
    pub workflow: Option<WorkflowView>,

    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guest_count: u32,
    pub guest_options: Vec<u32>,
    pub date_picker_min: Option<NaiveDate>,
    pub date_picker_max: Option<NaiveDate>,
    pub formatted_date_ranges: String,

    pub is_loading: bool,
    pub error: Option<String>,
    pub date_error: Option<String>,
    pub booking_success: Option<String>,

    pub room_sections: Vec<RoomSection>,
    pub has_results: bool,
    pub has_no_results: bool,

    pub cart_items: Vec<CartLineView>,
    pub cart_total: f64,
    pub formatted_cart_total: String,
    pub night_count: u32,
    pub night_label: &'static str,
    pub date_range_label: String,
    pub is_book_now_disabled: bool,
    pub show_book_now_hint: bool,
}

impl ViewModel {
    pub fn is_showing_booking(&self) -> bool {
        self.workflow.is_none()
    }

    pub fn has_cart_items(&self) -> bool {
        !self.cart_items.is_empty()
    }
}

pub fn derive_view_model(state: &WidgetState, config: &WidgetConfig) -> ViewModel {
    let query = &state.query;
    let offerings = state.availability.offerings();
    let nights = night_count(query.check_in, query.check_out);
    let date_range_label = format!(
        "{} - {}",
        format_short_date(query.check_in),
        format_short_date(query.check_out)
    );
    let has_cart_items = !state.cart.is_empty();

    let cart_items = state
        .cart
        .items()
        .iter()
        .map(|item| cart_line_view(item, offerings, nights, &date_range_label))
        .collect();

    let workflow = match &state.active_view {
        ActiveView::Booking => None,
        ActiveView::Workflow {
            flow_api_name,
            inputs,
        } => Some(WorkflowView {
            flow_api_name: flow_api_name.clone(),
            inputs: inputs.clone(),
        }),
    };

    ViewModel {
        heading: config.heading.clone(),
        workflow,

        check_in: query.check_in,
        check_out: query.check_out,
        guest_count: query.guests.get(),
        guest_options: (1..=GuestCount::MAX_OPTION).collect(),
        date_picker_min: state.windows.picker_min(),
        date_picker_max: state.windows.picker_max(),
        formatted_date_ranges: state.windows.formatted(),

        is_loading: state.availability.is_loading(),
        error: state.error.as_ref().map(ToString::to_string),
        date_error: state.date_error.as_ref().map(ToString::to_string),
        booking_success: state.booking_success.clone(),

        room_sections: room_sections(state),
        has_results: !offerings.is_empty(),
        has_no_results: !state.availability.is_loading()
            && offerings.is_empty()
            && state.error.is_none(),

        cart_items,
        cart_total: cart_total(state.cart.items(), nights),
        formatted_cart_total: formatted_cart_total(state.cart.items(), nights),
        night_count: nights,
        night_label: night_label(nights),
        date_range_label,
        is_book_now_disabled: !has_cart_items
            || state.submission.is_submitting()
            || state.date_error.is_some(),
        show_book_now_hint: !has_cart_items,
    }
}

fn room_sections(state: &WidgetState) -> Vec<RoomSection> {
    [
        ("dorm", "Dorm Rooms", Family::Dorm),
        ("private", "Private Rooms", Family::Private),
    ]
    .into_iter()
    .filter_map(|(key, label, family)| {
        let rooms: Vec<OfferingView> = state
            .availability
            .offerings_in(family)
            .map(|offering| offering_view(offering, state))
            .collect();
        (!rooms.is_empty()).then_some(RoomSection { key, label, rooms })
    })
    .collect()
}

fn offering_view(offering: &AccommodationOffering, state: &WidgetState) -> OfferingView {
    let is_expanded = state.expanded.contains(&offering.product_id);
    let amenities = offering
        .amenities
        .as_deref()
        .unwrap_or_default()
        .split('\n')
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    OfferingView {
        product_id: offering.product_id.clone(),
        name: offering.name.clone(),
        family: offering.family,
        formatted_rate: format_currency(offering.rate),
        rate_basis: if offering.is_per_person() {
            "/ person / night"
        } else {
            "/ room / night"
        },
        avail_label: format!("{} LEFT!", offering.available_units),
        is_low_availability: offering.available_units <= LOW_AVAILABILITY_THRESHOLD,
        amenities,
        image_url: offering.image_url.clone(),
        gender_restriction: offering.gender_restriction.clone(),
        max_guests: offering.max_guests,
        is_selected: state.cart.contains(&offering.product_id),
        is_expanded,
        expand_label: if is_expanded {
            format!("Collapse {}", offering.name)
        } else {
            format!("Expand {}", offering.name)
        },
    }
}

fn cart_line_view(
    item: &CartLineItem,
    offerings: &[AccommodationOffering],
    nights: u32,
    date_range_label: &str,
) -> CartLineView {
    let total = line_total(item, nights);
    let unit = if item.is_per_person() {
        plural(item.quantity, "person", "persons")
    } else {
        plural(item.quantity, "room", "rooms")
    };

    CartLineView {
        product_id: item.product_id.clone(),
        name: item.name.clone(),
        quantity: item.quantity,
        line_total: total,
        formatted_total: format_currency(total),
        qty_label: format!(
            "{} {} for {} {}",
            item.quantity,
            unit,
            nights,
            plural(nights, "night", "nights")
        ),
        qty_field_label: if item.is_per_person() {
            "No. of guests"
        } else {
            "No. of rooms"
        },
        qty_options: (1..=max_selectable_quantity(item, offerings)).collect(),
        date_range: date_range_label.to_string(),
        night_count: format!("{} {}", nights, night_label(nights)),
        remove_label: format!("Remove {}", item.name),
    }
}

fn night_label(nights: u32) -> &'static str {
    if nights == 1 {
        "NIGHT"
    } else {
        "NIGHTS"
    }
}

fn plural(count: u32, one: &'static str, many: &'static str) -> &'static str {
    if count == 1 {
        one
    } else {
        many
    }
}
