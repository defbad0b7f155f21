pub mod availability;
mod car;
mod customer;
mod money;
mod period;
mod reservation;

use serde::{Deserialize, Serialize};

pub use self::car::*;
pub use self::customer::*;
pub use self::money::*;
pub use self::period::*;
pub use self::reservation::*;

/// Any event recorded by the rental domain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RentalEvent {
    CarEvent(CarEvent),
    ReservationEvent(ReservationEvent),
}

impl From<CarEvent> for RentalEvent {
    fn from(value: CarEvent) -> Self {
        Self::CarEvent(value)
    }
}

impl From<ReservationEvent> for RentalEvent {
    fn from(value: ReservationEvent) -> Self {
        Self::ReservationEvent(value)
    }
}
