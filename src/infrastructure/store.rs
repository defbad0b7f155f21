use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};

use crate::domain::core::{
    availability, Car, CarId, Customer, Money, Period, Reservation, ReservationId,
};
use crate::domain::{Aggregation, Entity, IdGenerator};

use super::{Journal, JournalEntry, RentalError, StoreSettings};

/// In-memory table of cars and active reservations.
///
/// Every public method holds the store's single lock for its whole body, so each call is
/// atomic with respect to every other. Records only leave the store as clones.
#[derive(Debug)]
pub struct RentalStore {
    inventory: Mutex<Inventory>,
}

#[derive(Debug)]
struct Inventory {
    cars: HashMap<CarId, Car>,
    reservations: HashMap<ReservationId, Reservation>,
    ids: IdGenerator,
    journal: Journal,
}

impl RentalStore {
    pub fn new(settings: &StoreSettings) -> Self {
        Self {
            inventory: Mutex::new(Inventory {
                cars: HashMap::new(),
                reservations: HashMap::new(),
                ids: IdGenerator::new(),
                journal: Journal::new(settings.journal_limit),
            }),
        }
    }

    // Checks always run before the first write, so a poisoned guard still holds consistent state.
    fn lock(&self) -> MutexGuard<'_, Inventory> {
        self.inventory.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Inserts the car, replacing any car already stored under the same id.
    pub fn add_car(&self, mut car: Car) {
        let mut guard = self.lock();
        let inventory = &mut *guard;
        let id = car.id();
        inventory.journal.record(car.pop_all());
        if inventory.cars.insert(id, car).is_some() {
            debug!("car {} replaced", id);
        } else {
            info!("car {} added", id);
        }
    }

    /// Available cars of the given make whose daily rate is within `max_price`, ordered by id.
    pub fn search_cars(&self, make: &str, max_price: &Money) -> Vec<Car> {
        let inventory = self.lock();
        let mut cars = inventory
            .cars
            .values()
            .filter(|car| {
                car.is_available() && car.make() == make && car.daily_rate().at_most(max_price)
            })
            .cloned()
            .collect::<Vec<_>>();
        cars.sort_by_key(|car| car.id());
        debug!("search for {} up to {}: {} hit(s)", make, max_price, cars.len());
        cars
    }

    /// Whether no active reservation of the car overlaps `period`.
    pub fn is_available(&self, car_id: CarId, period: &Period) -> bool {
        let inventory = self.lock();
        availability::is_free(inventory.reservations.values(), car_id, period, None)
    }

    pub fn create_reservation(
        &self,
        customer: Customer,
        car_id: CarId,
        period: Period,
    ) -> Result<Reservation, RentalError> {
        let mut guard = self.lock();
        let inventory = &mut *guard;
        let Some(car) = inventory.cars.get_mut(&car_id) else {
            debug!("reservation rejected, car {} not found", car_id);
            return Err(RentalError::CarNotFound(car_id));
        };
        if !car.is_available()
            || !availability::is_free(inventory.reservations.values(), car_id, &period, None)
        {
            debug!("reservation rejected, car {} not available for {}", car_id, period);
            return Err(RentalError::CarUnavailable(car_id));
        }

        let id = inventory.ids.generate::<ReservationId>();
        let mut reservation = Reservation::create(id, customer, car_id, period, car.daily_rate());
        car.set_available(false);
        inventory.journal.record(reservation.pop_all());
        inventory.journal.record(car.pop_all());
        info!(
            "reservation {} created for car {} ({}), total {}",
            id,
            car_id,
            reservation.period(),
            reservation.total_price()
        );
        inventory.reservations.insert(id, reservation.clone());
        Ok(reservation)
    }

    /// Moves a reservation to a new period. Its id, price and payment state stay as they are.
    pub fn modify_reservation(
        &self,
        id: ReservationId,
        period: Period,
    ) -> Result<Reservation, RentalError> {
        let mut guard = self.lock();
        let inventory = &mut *guard;
        let Some(car_id) = inventory.reservations.get(&id).map(|r| r.car_id()) else {
            debug!("modification rejected, reservation {} not found", id);
            return Err(RentalError::ReservationNotFound(id));
        };
        if !availability::is_free(inventory.reservations.values(), car_id, &period, Some(id)) {
            debug!("modification rejected, car {} not available for {}", car_id, period);
            return Err(RentalError::CarUnavailable(car_id));
        }
        let Some(reservation) = inventory.reservations.get_mut(&id) else {
            return Err(RentalError::ReservationNotFound(id));
        };
        reservation
            .change_period(period)
            .map_err(|e| RentalError::from_reservation(id, e))?;
        inventory.journal.record(reservation.pop_all());
        info!("reservation {} moved to {}", id, reservation.period());
        Ok(reservation.clone())
    }

    /// Retires the reservation and marks its car available again.
    ///
    /// The car is released without rescanning the remaining reservations; creation and
    /// modification already keep a car to one overlapping booking at a time.
    pub fn cancel_reservation(&self, id: ReservationId) -> Result<Reservation, RentalError> {
        let mut guard = self.lock();
        let inventory = &mut *guard;
        let Some(reservation) = inventory.reservations.get_mut(&id) else {
            debug!("cancellation rejected, reservation {} not found", id);
            return Err(RentalError::ReservationNotFound(id));
        };
        reservation
            .cancel()
            .map_err(|e| RentalError::from_reservation(id, e))?;
        inventory.journal.record(reservation.pop_all());
        let cancelled = reservation.clone();
        inventory.reservations.remove(&id);

        let car_id = cancelled.car_id();
        match inventory.cars.get_mut(&car_id) {
            Some(car) => {
                car.set_available(true);
                inventory.journal.record(car.pop_all());
            }
            None => warn!("reservation {} referenced unknown car {}", id, car_id),
        }
        info!("reservation {} cancelled, car {} released", id, car_id);
        Ok(cancelled)
    }

    pub fn process_payment(&self, id: ReservationId) -> Result<Reservation, RentalError> {
        let mut guard = self.lock();
        let inventory = &mut *guard;
        let Some(reservation) = inventory.reservations.get_mut(&id) else {
            debug!("payment rejected, reservation {} not found", id);
            return Err(RentalError::ReservationNotFound(id));
        };
        if let Err(e) = reservation.pay() {
            warn!("payment rejected for reservation {}: {}", id, e);
            return Err(RentalError::from_reservation(id, e));
        }
        inventory.journal.record(reservation.pop_all());
        info!(
            "payment of {} processed for reservation {}",
            reservation.total_price(),
            id
        );
        Ok(reservation.clone())
    }

    pub fn car(&self, id: CarId) -> Option<Car> {
        self.lock().cars.get(&id).cloned()
    }

    /// All cars, ordered by id.
    pub fn cars(&self) -> Vec<Car> {
        let mut cars = self.lock().cars.values().cloned().collect::<Vec<_>>();
        cars.sort_by_key(|car| car.id());
        cars
    }

    pub fn reservation(&self, id: ReservationId) -> Option<Reservation> {
        self.lock().reservations.get(&id).cloned()
    }

    /// All active reservations, ordered by id.
    pub fn reservations(&self) -> Vec<Reservation> {
        let mut reservations = self
            .lock()
            .reservations
            .values()
            .cloned()
            .collect::<Vec<_>>();
        reservations.sort_by_key(|reservation| reservation.id());
        reservations
    }

    pub fn journal(&self) -> Vec<JournalEntry> {
        self.lock().journal.entries()
    }
}

impl Default for RentalStore {
    fn default() -> Self {
        Self::new(&StoreSettings::default())
    }
}
