// Cart of selected offerings, kept consistent with the latest inventory snapshot

use std::collections::HashSet;

use tracing::debug;

use crate::model::{AccommodationOffering, GuestCount, PricingModel};

// A selected offering. Name, rate and pricing model are copied at selection
// time and are not refreshed by later availability results.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLineItem {
    pub product_id: String,
    pub name: String,
    pub rate: f64,
    pub pricing_model: PricingModel,
    pub quantity: u32,
    pub available_units: u32,
}

impl CartLineItem {
    // Per-person offerings start with one unit per guest, up to what is left
    pub fn from_offering(offering: &AccommodationOffering, guests: GuestCount) -> Self {
        let quantity = if offering.is_per_person() {
            guests.get().min(offering.available_units).max(1)
        } else {
            1
        };

        Self {
            product_id: offering.product_id.clone(),
            name: offering.name.clone(),
            rate: offering.rate,
            pricing_model: offering.pricing_model,
            quantity,
            available_units: offering.available_units,
        }
    }

    pub fn is_per_person(&self) -> bool {
        self.pricing_model == PricingModel::PerPerson
    }
}

#[derive(Debug, Clone)]
pub enum CartAction<'a> {
    Select {
        offering: &'a AccommodationOffering,
        guests: GuestCount,
    },
    Deselect {
        product_id: &'a str,
    },
    ChangeQuantity {
        product_id: &'a str,
        quantity: u32,
    },
    Remove {
        product_id: &'a str,
    },
    Reconcile {
        offerings: &'a [AccommodationOffering],
    },
    Clear,
}

/// Ordered list of line items, at most one per offering.
///
/// The cart is an immutable value: [`Cart::apply`] returns the next cart and
/// leaves the current one untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    items: Vec<CartLineItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub(crate) fn from_items(items: Vec<CartLineItem>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, product_id: &str) -> bool {
        self.get(product_id).is_some()
    }

    pub fn get(&self, product_id: &str) -> Option<&CartLineItem> {
        self.items.iter().find(|item| item.product_id == product_id)
    }

    pub fn apply(&self, action: CartAction<'_>) -> Cart {
        match action {
            CartAction::Select { offering, guests } => {
                if self.contains(&offering.product_id) {
                    return self.clone();
                }
                let mut items = self.items.clone();
                items.push(CartLineItem::from_offering(offering, guests));
                Cart { items }
            }
            CartAction::Deselect { product_id } | CartAction::Remove { product_id } => {
                self.retain(|item| item.product_id != product_id)
            }
            CartAction::ChangeQuantity {
                product_id,
                quantity,
            } => {
                // Zero would break the one-unit minimum; larger values are taken
                // as-is even if inventory has since dropped below them.
                if quantity == 0 {
                    debug!(product_id, "Ignoring quantity change to zero");
                    return self.clone();
                }
                let items = self
                    .items
                    .iter()
                    .map(|item| {
                        if item.product_id == product_id {
                            CartLineItem {
                                quantity,
                                ..item.clone()
                            }
                        } else {
                            item.clone()
                        }
                    })
                    .collect();
                Cart { items }
            }
            CartAction::Reconcile { offerings } => {
                let present: HashSet<&str> = offerings
                    .iter()
                    .map(|offering| offering.product_id.as_str())
                    .collect();
                let next = self.retain(|item| present.contains(item.product_id.as_str()));
                if next.len() < self.len() {
                    debug!(pruned = self.len() - next.len(), "Pruned cart items no longer offered");
                }
                next
            }
            CartAction::Clear => Cart::new(),
        }
    }

    // Select when absent, deselect when present. None when there is nothing to do.
    pub fn toggle_action<'a>(
        &self,
        product_id: &'a str,
        offerings: &'a [AccommodationOffering],
        guests: GuestCount,
    ) -> Option<CartAction<'a>> {
        if self.contains(product_id) {
            return Some(CartAction::Deselect { product_id });
        }
        offerings
            .iter()
            .find(|offering| offering.product_id == product_id)
            .map(|offering| CartAction::Select { offering, guests })
    }

    pub fn toggle_select(
        &self,
        product_id: &str,
        offerings: &[AccommodationOffering],
        guests: GuestCount,
    ) -> Cart {
        match self.toggle_action(product_id, offerings, guests) {
            Some(action) => self.apply(action),
            None => self.clone(),
        }
    }

    pub fn reconcile(&self, offerings: &[AccommodationOffering]) -> Cart {
        self.apply(CartAction::Reconcile { offerings })
    }

    fn retain(&self, keep: impl Fn(&CartLineItem) -> bool) -> Cart {
        Cart {
            items: self.items.iter().filter(|item| keep(item)).cloned().collect(),
        }
    }
}
