// Campaign date windows: validates a stay against the periods a campaign allows

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::api::BookingApi;
use crate::error::WidgetError;
use crate::model::{next_day, CampaignWindow};

const OUTSIDE_WINDOWS_PREFIX: &str = "Selected dates are outside the available booking periods: ";

/// Ordered set of campaign windows. An empty set means bookings are not
/// restricted, which is also what a failed lookup degrades to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CampaignWindows {
    windows: Vec<CampaignWindow>,
}

impl CampaignWindows {
    pub fn new(windows: Vec<CampaignWindow>) -> Self {
        Self { windows }
    }

    pub fn unrestricted() -> Self {
        Self::default()
    }

    // Fetch the windows for a campaign. Lookup failures never block booking.
    pub async fn load(api: &dyn BookingApi, campaign_type: &str) -> Self {
        match api.booking_date_ranges(campaign_type).await {
            Ok(windows) => {
                debug!(campaign_type, count = windows.len(), "Loaded campaign windows");
                Self::new(windows)
            }
            Err(source) => {
                let error = WidgetError::CampaignLookup { source };
                warn!(campaign_type, %error, "Proceeding without date restrictions");
                Self::unrestricted()
            }
        }
    }

    pub fn windows(&self) -> &[CampaignWindow] {
        &self.windows
    }

    pub fn is_restricted(&self) -> bool {
        !self.windows.is_empty()
    }

    // The whole stay has to sit inside one window. Two windows that between them
    // cover every night do not count.
    pub fn fits_single_window(&self, check_in: NaiveDate, check_out: NaiveDate) -> bool {
        self.windows.is_empty()
            || self
                .windows
                .iter()
                .any(|window| window.contains_stay(check_in, check_out))
    }

    // Snap an initial stay into the first window when it does not already fit
    pub fn constrain_initial(
        &self,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> (NaiveDate, NaiveDate) {
        if self.fits_single_window(check_in, check_out) {
            return (check_in, check_out);
        }

        match self.windows.first() {
            Some(first) => {
                let snapped_out = next_day(first.start_date).min(first.end_date);
                debug!(
                    %check_in, %check_out,
                    snapped_in = %first.start_date, %snapped_out,
                    "Snapped stay into first campaign window"
                );
                (first.start_date, snapped_out)
            }
            None => (check_in, check_out),
        }
    }

    pub fn validate(&self, check_in: NaiveDate, check_out: NaiveDate) -> Result<(), WidgetError> {
        if self.fits_single_window(check_in, check_out) {
            Ok(())
        } else {
            Err(WidgetError::DateRangeInvalid {
                message: format!("{}{}", OUTSIDE_WINDOWS_PREFIX, self.formatted()),
            })
        }
    }

    // "SAT JUN 1 – MON JUN 10, THU JUN 20 – SUN JUN 30"
    pub fn formatted(&self) -> String {
        self.windows
            .iter()
            .map(|window| {
                format!(
                    "{} – {}",
                    format_short_date(window.start_date),
                    format_short_date(window.end_date)
                )
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn picker_min(&self) -> Option<NaiveDate> {
        self.windows.first().map(|window| window.start_date)
    }

    pub fn picker_max(&self) -> Option<NaiveDate> {
        self.windows.last().map(|window| window.end_date)
    }
}

// Fixed short style, e.g. "SAT JUN 1"
pub fn format_short_date(date: NaiveDate) -> String {
    date.format("%a %b %-d").to_string().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServiceError;
    use crate::testing::{date, MockBookingApi};
    use test_case::test_case;

    fn june_windows() -> CampaignWindows {
        CampaignWindows::new(vec![
            CampaignWindow::new(date("2024-06-01"), date("2024-06-10")),
            CampaignWindow::new(date("2024-06-20"), date("2024-06-30")),
        ])
    }

    #[test_case("2024-06-05", "2024-06-08", true; "inside first window")]
    #[test_case("2024-06-01", "2024-06-10", true; "exactly the first window")]
    #[test_case("2024-06-21", "2024-06-30", true; "inside second window")]
    #[test_case("2024-06-08", "2024-06-22", false; "spanning the gap")]
    #[test_case("2024-05-30", "2024-06-02", false; "starting before")]
    #[test_case("2024-06-29", "2024-07-01", false; "ending after")]
    #[test_case("2024-06-12", "2024-06-14", false; "inside the gap")]
    fn test_fits_single_window(check_in: &str, check_out: &str, expected: bool) {
        assert_eq!(
            june_windows().fits_single_window(date(check_in), date(check_out)),
            expected
        );
    }

    #[test]
    fn test_unrestricted_accepts_everything() {
        let windows = CampaignWindows::unrestricted();
        assert!(windows.fits_single_window(date("1999-01-01"), date("2099-01-01")));
        assert!(windows.validate(date("2024-06-08"), date("2024-06-22")).is_ok());
        assert_eq!(
            windows.constrain_initial(date("2024-06-08"), date("2024-06-22")),
            (date("2024-06-08"), date("2024-06-22"))
        );
        assert_eq!(windows.picker_min(), None);
        assert_eq!(windows.formatted(), "");
    }

    #[test]
    fn test_constrain_initial_snaps_to_first_window() {
        let (check_in, check_out) =
            june_windows().constrain_initial(date("2024-05-01"), date("2024-05-02"));
        assert_eq!(check_in, date("2024-06-01"));
        assert_eq!(check_out, date("2024-06-02"));
    }

    #[test]
    fn test_constrain_initial_keeps_valid_stay() {
        let stay = (date("2024-06-21"), date("2024-06-23"));
        assert_eq!(june_windows().constrain_initial(stay.0, stay.1), stay);
    }

    #[test]
    fn test_constrain_initial_single_day_window() {
        let windows =
            CampaignWindows::new(vec![CampaignWindow::new(date("2024-08-15"), date("2024-08-15"))]);
        let (check_in, check_out) = windows.constrain_initial(date("2024-01-01"), date("2024-01-02"));
        assert_eq!(check_in, date("2024-08-15"));
        assert_eq!(check_out, date("2024-08-15"));
    }

    #[test]
    fn test_validate_lists_every_window() {
        let error = june_windows()
            .validate(date("2024-06-08"), date("2024-06-22"))
            .unwrap_err();
        assert_eq!(
            error.to_string(),
            "Selected dates are outside the available booking periods: \
             SAT JUN 1 – MON JUN 10, THU JUN 20 – SUN JUN 30"
        );
    }

    #[test]
    fn test_picker_bounds() {
        let windows = june_windows();
        assert_eq!(windows.picker_min(), Some(date("2024-06-01")));
        assert_eq!(windows.picker_max(), Some(date("2024-06-30")));
    }

    #[test]
    fn test_format_short_date() {
        assert_eq!(format_short_date(date("2024-06-01")), "SAT JUN 1");
        assert_eq!(format_short_date(date("2024-12-25")), "WED DEC 25");
    }

    #[tokio::test]
    async fn test_load_windows() {
        let api = MockBookingApi::new();
        api.set_windows(Ok(june_windows().windows().to_vec()));

        let windows = CampaignWindows::load(&api, "summer").await;
        assert_eq!(windows, june_windows());
        assert_eq!(api.window_requests(), vec!["summer".to_string()]);
    }

    #[tokio::test]
    async fn test_failed_lookup_degrades_to_unrestricted() {
        let api = MockBookingApi::new();
        api.set_windows(Err(ServiceError::Network("connection refused".to_string())));

        let windows = CampaignWindows::load(&api, "summer").await;
        assert!(!windows.is_restricted());
    }
}
