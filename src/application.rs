use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::core::{Car, CarId, Customer, Money, Period, Reservation, ReservationId};
use crate::domain::Entity;
use crate::infrastructure::{RentalError, RentalStore};

/// 窓口セッション
///
/// Sequences store calls on behalf of one customer and remembers which reservations
/// it opened. Errors from the store are passed through untouched and never retried.
#[derive(Debug, Clone)]
pub struct RentalSession {
    store: Arc<RentalStore>,
    customer: Customer,
    reservation_ids: Vec<ReservationId>,
}

impl RentalSession {
    pub fn new(store: Arc<RentalStore>, customer: Customer) -> Self {
        Self {
            store,
            customer,
            reservation_ids: Vec::new(),
        }
    }

    pub fn customer(&self) -> &Customer {
        &self.customer
    }

    pub fn search(&self, make: &str, max_price: &Money) -> Vec<Car> {
        self.store.search_cars(make, max_price)
    }

    pub fn book(&mut self, car_id: CarId, period: Period) -> Result<Reservation, RentalError> {
        let reservation = self
            .store
            .create_reservation(self.customer.clone(), car_id, period)?;
        self.reservation_ids.push(reservation.id());
        debug!(
            "session of {} booked reservation {}",
            self.customer.name(),
            reservation.id()
        );
        Ok(reservation)
    }

    pub fn pay(&self, id: ReservationId) -> Result<Reservation, RentalError> {
        self.store.process_payment(id)
    }

    pub fn reschedule(&self, id: ReservationId, period: Period) -> Result<Reservation, RentalError> {
        self.store.modify_reservation(id, period)
    }

    pub fn cancel(&mut self, id: ReservationId) -> Result<Reservation, RentalError> {
        let cancelled = self.store.cancel_reservation(id)?;
        self.reservation_ids.retain(|r| *r != id);
        Ok(cancelled)
    }

    /// Books the car and settles the bill in one go.
    ///
    /// A failed payment leaves the booking in place and unpaid.
    pub fn checkout(&mut self, car_id: CarId, period: Period) -> Result<Reservation, RentalError> {
        let reservation = self.book(car_id, period)?;
        let paid = self.pay(reservation.id())?;
        info!(
            "checkout of car {} completed for {} ({})",
            car_id,
            self.customer.name(),
            paid.total_price()
        );
        Ok(paid)
    }

    /// Current state of the reservations opened in this session that are still active.
    pub fn reservations(&self) -> Vec<Reservation> {
        self.reservation_ids
            .iter()
            .filter_map(|id| self.store.reservation(*id))
            .collect()
    }
}
