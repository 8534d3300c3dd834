// Booking widget: wires the date validator, availability session, cart and
// submitter together and owns the state snapshot they operate on.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::watch;
use tracing::{debug, info};

use crate::api::BookingApi;
use crate::availability::{self, AvailabilitySession};
use crate::booking::{self, BookingOutcome, BookingSubmitter, FlowInput, WORKFLOW_COMPLETED_MESSAGE};
use crate::cart::{Cart, CartAction};
use crate::config::WidgetConfig;
use crate::date_windows::CampaignWindows;
use crate::error::WidgetError;
use crate::model::{next_day, GuestCount, SearchQuery};
use crate::view::{derive_view_model, ViewModel};

// Workflow statuses that hand control back to the booking view
const TERMINAL_FLOW_STATUSES: [&str; 2] = ["FINISHED", "FINISHED_SCREEN"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActiveView {
    Booking,
    Workflow {
        flow_api_name: String,
        inputs: Vec<FlowInput>,
    },
}

/// Complete widget state. Each operation on [`BookingWidget`] replaces it in a
/// single step, so observers see one change per user action or completed call.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetState {
    pub query: SearchQuery,
    pub windows: CampaignWindows,
    pub availability: AvailabilitySession,
    pub cart: Cart,
    pub expanded: HashSet<String>,
    pub submission: BookingSubmitter,
    // Availability and booking failures share one banner
    pub error: Option<WidgetError>,
    pub date_error: Option<WidgetError>,
    pub booking_success: Option<String>,
    pub active_view: ActiveView,
}

impl WidgetState {
    pub fn new(query: SearchQuery) -> Self {
        Self {
            query,
            windows: CampaignWindows::unrestricted(),
            availability: AvailabilitySession::new(),
            cart: Cart::new(),
            expanded: HashSet::new(),
            submission: BookingSubmitter::new(),
            error: None,
            date_error: None,
            booking_success: None,
            active_view: ActiveView::Booking,
        }
    }

    // Record the verdict for the current stay; true when it may be queried
    fn validate_dates(&mut self) -> bool {
        match self.windows.validate(self.query.check_in, self.query.check_out) {
            Ok(()) => {
                self.date_error = None;
                true
            }
            Err(error) => {
                debug!(%error, "Stay rejected");
                self.date_error = Some(error);
                false
            }
        }
    }
}

pub struct BookingWidget {
    api: Arc<dyn BookingApi>,
    config: WidgetConfig,
    state: watch::Sender<WidgetState>,
}

impl BookingWidget {
    pub fn new(api: Arc<dyn BookingApi>, config: WidgetConfig, today: NaiveDate) -> Self {
        let query = SearchQuery::starting(today, config.campaign_type().map(str::to_string));
        let (state, _) = watch::channel(WidgetState::new(query));
        Self { api, config, state }
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    // Receives one notification per state change; re-render from `view()`
    pub fn subscribe(&self) -> watch::Receiver<WidgetState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> WidgetState {
        self.state.borrow().clone()
    }

    pub fn view(&self) -> ViewModel {
        derive_view_model(&self.state.borrow(), &self.config)
    }

    // Apply one mutation and notify subscribers once
    fn update<R: Default>(&self, mutate: impl FnOnce(&mut WidgetState) -> R) -> R {
        let mut output = R::default();
        self.state.send_modify(|state| output = mutate(state));
        output
    }

    // Load campaign windows when configured, settle the initial stay, then query
    pub async fn initialize(&self) {
        if self.config.campaign_aware() {
            let campaign_type = self.state.borrow().query.campaign_type_or_empty().to_string();
            let windows = CampaignWindows::load(self.api.as_ref(), &campaign_type).await;
            self.update(|state| {
                let (check_in, check_out) =
                    windows.constrain_initial(state.query.check_in, state.query.check_out);
                state.query.check_in = check_in;
                state.query.check_out = check_out;
                state.windows = windows;
                state.date_error = None;
            });
        }
        self.refresh_availability().await;
    }

    /// Query availability for the current search and reconcile the cart with
    /// the result.
    ///
    /// Concurrent refreshes are not sequenced: whichever response arrives last
    /// determines the snapshot, and the first completion clears the loading flag.
    pub async fn refresh_availability(&self) {
        self.update(|state| state.availability.begin());
        let query = self.state.borrow().query.clone();

        let result = availability::query(self.api.as_ref(), &query).await;

        self.update(|state| {
            let succeeded = result.is_ok();
            state.error = state.availability.complete(result);
            if succeeded {
                state.cart = state.cart.reconcile(state.availability.offerings());
            }
        });
    }

    pub async fn change_check_in(&self, check_in: NaiveDate) {
        let valid = self.update(|state| {
            state.query.check_in = check_in;
            if state.query.check_out <= check_in {
                state.query.check_out = next_day(check_in);
            }
            state.validate_dates()
        });
        if valid {
            self.refresh_availability().await;
        }
    }

    // Check-out is taken as given; a stay that ends before it starts still prices as one night
    pub async fn change_check_out(&self, check_out: NaiveDate) {
        let valid = self.update(|state| {
            state.query.check_out = check_out;
            state.validate_dates()
        });
        if valid {
            self.refresh_availability().await;
        }
    }

    pub async fn change_guest_count(&self, guests: &str) {
        let guests = GuestCount::parse(guests);
        self.update(|state| state.query.guests = guests);
        self.refresh_availability().await;
    }

    pub fn toggle_select(&self, product_id: &str) {
        self.update(|state| {
            state.cart =
                state
                    .cart
                    .toggle_select(product_id, state.availability.offerings(), state.query.guests);
        });
    }

    pub fn toggle_expand(&self, product_id: &str) {
        self.update(|state| {
            if !state.expanded.remove(product_id) {
                state.expanded.insert(product_id.to_string());
            }
        });
    }

    pub fn change_quantity(&self, product_id: &str, quantity: u32) {
        self.update(|state| {
            state.cart = state.cart.apply(CartAction::ChangeQuantity {
                product_id,
                quantity,
            });
        });
    }

    pub fn remove_item(&self, product_id: &str) {
        self.update(|state| {
            state.cart = state.cart.apply(CartAction::Remove { product_id });
        });
    }

    /// Submit the cart as a reservation.
    ///
    /// Ignored while the cart is empty or another submission is in flight. On
    /// success the cart is cleared and availability refreshed; on failure the
    /// cart is kept for a retry.
    pub async fn book_now(&self) {
        let pending = self.update(|state| {
            if !state.submission.begin(&state.cart) {
                return None;
            }
            state.error = None;
            state.booking_success = None;
            Some((state.cart.clone(), state.query.clone()))
        });
        let Some((cart, query)) = pending else {
            debug!("Booking request ignored");
            return;
        };

        let result = booking::submit(self.api.as_ref(), &cart, &query).await;
        let flow_api_name = self.config.flow_api_name();

        let booked = self.update(|state| match result {
            Ok(reservation_id) => {
                state.cart = state.cart.apply(CartAction::Clear);
                match state.submission.succeed(&reservation_id, flow_api_name) {
                    BookingOutcome::Confirmed { message } => {
                        state.booking_success = Some(message);
                        state.submission.reset();
                    }
                    BookingOutcome::HandOff {
                        flow_api_name,
                        inputs,
                    } => {
                        info!(%flow_api_name, %reservation_id, "Handing off to workflow");
                        state.active_view = ActiveView::Workflow {
                            flow_api_name,
                            inputs,
                        };
                    }
                }
                true
            }
            Err(error) => {
                state.submission.fail();
                state.error = Some(error);
                false
            }
        });

        // Inventory has just gone down
        if booked {
            self.refresh_availability().await;
        }
    }

    pub fn flow_status_changed(&self, status: &str) {
        if !TERMINAL_FLOW_STATUSES.contains(&status) {
            debug!(status, "Workflow still running");
            return;
        }
        self.update(|state| {
            state.active_view = ActiveView::Booking;
            state.submission.reset();
            state.booking_success = Some(WORKFLOW_COMPLETED_MESSAGE.to_string());
        });
    }
}
