// Availability session: the current inventory snapshot and the query that refreshes it

use tracing::{debug, info, warn};

use crate::api::{AvailabilityRequest, BookingApi};
use crate::error::WidgetError;
use crate::model::{AccommodationOffering, Family, SearchQuery};

/// Inventory snapshot plus the bookkeeping of the queries that refresh it.
///
/// Queries are not tagged or cancelled. When several are outstanding, the one
/// that completes last overwrites the snapshot, whichever was issued last.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AvailabilitySession {
    offerings: Vec<AccommodationOffering>,
    in_flight: usize,
    is_loading: bool,
}

impl AvailabilitySession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offerings(&self) -> &[AccommodationOffering] {
        &self.offerings
    }

    pub fn offerings_in(&self, family: Family) -> impl Iterator<Item = &AccommodationOffering> {
        self.offerings
            .iter()
            .filter(move |offering| offering.family == family)
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    // Number of queries issued but not yet completed
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn begin(&mut self) {
        self.in_flight += 1;
        self.is_loading = true;
    }

    // Any completion clears the loading flag, even with other queries still out.
    // Returns the error to display: None on success, which clears any prior one.
    pub fn complete(
        &mut self,
        result: Result<Vec<AccommodationOffering>, WidgetError>,
    ) -> Option<WidgetError> {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.is_loading = false;
        match result {
            Ok(offerings) => {
                self.offerings = offerings;
                None
            }
            Err(error) => {
                self.offerings.clear();
                Some(error)
            }
        }
    }
}

// Run one availability lookup. Always resolves; failures come back as
// AvailabilityFetch with a user-facing message.
pub async fn query(
    api: &dyn BookingApi,
    search: &SearchQuery,
) -> Result<Vec<AccommodationOffering>, WidgetError> {
    let request = AvailabilityRequest::from(search);
    debug!(
        check_in = %request.check_in_date,
        check_out = %request.check_out_date,
        guests = request.guests,
        campaign_type = %request.campaign_type,
        "Querying availability"
    );

    match api.available_accommodations(&request).await {
        Ok(offerings) => {
            info!(count = offerings.len(), "Availability received");
            Ok(offerings)
        }
        Err(source) => {
            warn!(error = %source, "Availability lookup failed");
            Err(WidgetError::availability(source))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServiceError;
    use crate::model::GuestCount;
    use crate::testing::{date, dorm, private_room, MockBookingApi};
    use tokio_test::{assert_err, assert_ok};

    fn search() -> SearchQuery {
        SearchQuery {
            check_in: date("2024-06-03"),
            check_out: date("2024-06-05"),
            guests: GuestCount::new(3),
            campaign_type: Some("summer".to_string()),
        }
    }

    #[tokio::test]
    async fn test_query_sends_search_parameters() {
        let api = MockBookingApi::new();
        api.push_availability(Ok(vec![dorm("d1", 20.0, 4)]));

        let offerings = assert_ok!(query(&api, &search()).await);
        assert_eq!(offerings.len(), 1);

        let requests = api.availability_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].check_in_date, date("2024-06-03"));
        assert_eq!(requests[0].check_out_date, date("2024-06-05"));
        assert_eq!(requests[0].guests, 3);
        assert_eq!(requests[0].campaign_type, "summer");
    }

    #[tokio::test]
    async fn test_query_without_campaign_sends_empty_type() {
        let api = MockBookingApi::new();
        api.push_availability(Ok(vec![]));

        let mut unrestricted = search();
        unrestricted.campaign_type = None;
        assert_ok!(query(&api, &unrestricted).await);
        assert_eq!(api.availability_requests()[0].campaign_type, "");
    }

    #[tokio::test]
    async fn test_query_failure_uses_payload_message() {
        let api = MockBookingApi::new();
        api.push_availability(Err(ServiceError::Remote {
            status_code: 400,
            message: Some("Guests exceed capacity".to_string()),
        }));

        let error = assert_err!(query(&api, &search()).await);
        assert_eq!(error.to_string(), "Guests exceed capacity");
    }

    #[test]
    fn test_success_replaces_snapshot() {
        let mut session = AvailabilitySession::new();
        session.begin();
        let error = session.complete(Err(WidgetError::availability(ServiceError::Timeout(100))));
        assert!(error.is_some());

        session.begin();
        assert!(session.is_loading());
        let error = session.complete(Ok(vec![dorm("d1", 20.0, 4), private_room("p1", 80.0, 1)]));
        assert!(!session.is_loading());
        assert!(error.is_none());
        assert_eq!(session.offerings().len(), 2);

        session.begin();
        let _ = session.complete(Ok(vec![private_room("p2", 85.0, 2)]));
        let ids: Vec<_> = session.offerings().iter().map(|o| o.product_id.as_str()).collect();
        assert_eq!(ids, vec!["p2"]);
    }

    #[test]
    fn test_failure_clears_snapshot() {
        let mut session = AvailabilitySession::new();
        session.begin();
        let _ = session.complete(Ok(vec![dorm("d1", 20.0, 4)]));

        session.begin();
        let error = session.complete(Err(WidgetError::availability(ServiceError::Network(
            "reset".to_string(),
        ))));
        assert!(session.offerings().is_empty());
        assert!(!session.is_loading());
        assert_eq!(error.unwrap().to_string(), "An error occurred");
    }

    #[test]
    fn test_first_completion_clears_loading() {
        let mut session = AvailabilitySession::new();
        session.begin();
        session.begin();
        assert_eq!(session.in_flight(), 2);

        let _ = session.complete(Ok(vec![]));
        assert!(!session.is_loading());
        assert_eq!(session.in_flight(), 1);
    }

    #[test]
    fn test_offerings_by_family() {
        let mut session = AvailabilitySession::new();
        session.begin();
        let _ = session.complete(Ok(vec![
            dorm("d1", 20.0, 4),
            private_room("p1", 80.0, 1),
            dorm("d2", 18.0, 9),
        ]));

        assert_eq!(session.offerings_in(Family::Dorm).count(), 2);
        assert_eq!(session.offerings_in(Family::Private).count(), 1);
    }
}
