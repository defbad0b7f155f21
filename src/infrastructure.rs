mod journal;
mod store;

use serde::Deserialize;
use thiserror::Error;

use crate::domain::core::{CarId, ReservationError, ReservationId};

pub use self::journal::*;
pub use self::store::*;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RentalError {
    #[error("Car not found: {0}")]
    CarNotFound(CarId),
    #[error("Car not available: {0}")]
    CarUnavailable(CarId),
    #[error("Reservation not found: {0}")]
    ReservationNotFound(ReservationId),
    #[error("Reservation already paid: {0}")]
    AlreadyPaid(ReservationId),
}

/// How a transport should report a [`RentalError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Conflict,
}

impl RentalError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RentalError::CarNotFound(_) | RentalError::ReservationNotFound(_) => {
                ErrorKind::NotFound
            }
            RentalError::CarUnavailable(_) | RentalError::AlreadyPaid(_) => ErrorKind::Conflict,
        }
    }

    /// A cancelled reservation has left the active table, so it reads as not found.
    fn from_reservation(id: ReservationId, error: ReservationError) -> Self {
        match error {
            ReservationError::AlreadyPaid => RentalError::AlreadyPaid(id),
            ReservationError::MismatchedId
            | ReservationError::Cancelled
            | ReservationError::InvalidStatusTransition => RentalError::ReservationNotFound(id),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct StoreSettings {
    /// Maximum number of journal entries kept; `0` turns the journal off.
    pub journal_limit: usize,
}

impl StoreSettings {
    pub const DEFAULT_JOURNAL_LIMIT: usize = 1024;
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            journal_limit: Self::DEFAULT_JOURNAL_LIMIT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind() {
        let car = CarId::from(1u64);
        let reservation = ReservationId::from(1u64);
        assert_eq!(RentalError::CarNotFound(car).kind(), ErrorKind::NotFound);
        assert_eq!(
            RentalError::ReservationNotFound(reservation).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(RentalError::CarUnavailable(car).kind(), ErrorKind::Conflict);
        assert_eq!(RentalError::AlreadyPaid(reservation).kind(), ErrorKind::Conflict);
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            RentalError::AlreadyPaid(ReservationId::from(4u64)).to_string(),
            "Reservation already paid: 4"
        );
    }
}
