// Runs the initial search against a live booking service and logs the result.
//
// Usage: booking_widget [--verbose] [--json] <config.toml>

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tracing::info;

use hostel_booking::{logging, AppConfig, BookingWidget, HttpBookingApi};

#[tokio::main]
async fn main() -> Result<()> {
    let mut verbose = false;
    let mut json = false;
    let mut config_path = None;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "-v" | "--verbose" => verbose = true,
            "--json" => json = true,
            _ => config_path = Some(arg),
        }
    }
    let Some(config_path) = config_path else {
        bail!("usage: booking_widget [--verbose] [--json] <config.toml>");
    };

    // JSON output for log collectors; --verbose only affects the compact format
    if json {
        logging::init_json_logger();
    } else {
        logging::init_logger(verbose);
    }

    let config = AppConfig::from_file(&config_path)
        .with_context(|| format!("failed to load config from {}", config_path))?;
    info!(base_url = %config.service.base_url, "Loaded configuration");

    let api = HttpBookingApi::new(config.service.clone()).context("failed to build HTTP client")?;
    let today = chrono::Local::now().date_naive();
    let widget = BookingWidget::new(Arc::new(api), config.widget.clone(), today);

    widget.initialize().await;

    let view = widget.view();
    info!(
        heading = %view.heading,
        stay = %view.date_range_label,
        nights = view.night_count,
        guests = view.guest_count,
        "Initial search finished"
    );
    if !view.formatted_date_ranges.is_empty() {
        info!(ranges = %view.formatted_date_ranges, "Bookable periods");
    }
    if let Some(error) = &view.error {
        bail!("availability lookup failed: {}", error);
    }
    if view.has_no_results {
        info!("No rooms available for these dates");
    }
    for section in &view.room_sections {
        for room in &section.rooms {
            info!(
                section = section.label,
                id = %room.product_id,
                name = %room.name,
                rate = %room.formatted_rate,
                basis = room.rate_basis,
                availability = %room.avail_label,
                "Offering"
            );
        }
    }

    Ok(())
}
