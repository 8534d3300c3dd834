// Night count and money totals for a stay

use chrono::NaiveDate;

use crate::cart::CartLineItem;
use crate::model::AccommodationOffering;

// Whole nights between the dates, never less than one
pub fn night_count(check_in: NaiveDate, check_out: NaiveDate) -> u32 {
    let days = (check_out - check_in).num_days();
    if days > 0 {
        u32::try_from(days).unwrap_or(u32::MAX)
    } else {
        1
    }
}

pub fn line_total(item: &CartLineItem, nights: u32) -> f64 {
    item.rate * f64::from(item.quantity) * f64::from(nights)
}

// Folded from +0.0; a float sum over no items would start at -0.0
pub fn cart_total(items: &[CartLineItem], nights: u32) -> f64 {
    items
        .iter()
        .fold(0.0, |total, item| total + line_total(item, nights))
}

pub fn formatted_cart_total(items: &[CartLineItem], nights: u32) -> String {
    format_currency(cart_total(items, nights))
}

pub fn format_currency(amount: f64) -> String {
    format!("${:.2}", amount)
}

// Upper bound for the quantity picker. Advisory only: quantities already in the
// cart are not re-clamped when inventory drops.
pub fn max_selectable_quantity(item: &CartLineItem, offerings: &[AccommodationOffering]) -> u32 {
    offerings
        .iter()
        .find(|offering| offering.product_id == item.product_id)
        .map_or(1, |offering| offering.available_units)
}
