//! Availability lookups over the active reservations of a car.
//!
//! Every lookup is a linear scan; the working set of a single rental desk is small.
//! A fleet-sized deployment would swap this for an interval tree keyed by car,
//! keeping the same inclusive overlap rule.

use crate::domain::Entity;

use super::{CarId, Period, Reservation, ReservationId};

/// Active reservations of `car_id` whose period overlaps `period`.
///
/// `exclude` skips one reservation, so a booking can be moved without colliding with itself.
pub fn conflicts<'a, I>(
    reservations: I,
    car_id: CarId,
    period: &'a Period,
    exclude: Option<ReservationId>,
) -> impl Iterator<Item = &'a Reservation> + 'a
where
    I: IntoIterator<Item = &'a Reservation> + 'a,
    I::IntoIter: 'a,
{
    reservations.into_iter().filter(move |r| {
        r.is_active()
            && r.car_id() == car_id
            && Some(r.id()) != exclude
            && r.period().overlaps(period)
    })
}

pub fn is_free<'a, I>(
    reservations: I,
    car_id: CarId,
    period: &'a Period,
    exclude: Option<ReservationId>,
) -> bool
where
    I: IntoIterator<Item = &'a Reservation> + 'a,
    I::IntoIter: 'a,
{
    conflicts(reservations, car_id, period, exclude)
        .next()
        .is_none()
}

#[cfg(test)]
mod tests {
    use crate::domain::core::{Currency, Customer, Money};

    use super::*;

    fn reservation(id: u64, car: u64, start: &str, end: &str) -> Reservation {
        Reservation::create(
            id.into(),
            Customer::default(),
            car.into(),
            Period::new(start, end),
            &Money::new(50, Currency::USD),
        )
    }

    #[test]
    fn test_is_free_per_car() {
        let reservations = vec![
            reservation(1, 1, "2025-03-29", "2025-03-30"),
            reservation(2, 2, "2025-04-01", "2025-04-05"),
        ];
        let period = Period::new("2025-03-30", "2025-04-01");
        assert!(!is_free(&reservations, 1u64.into(), &period, None));
        assert!(!is_free(&reservations, 2u64.into(), &period, None));
        assert!(is_free(&reservations, 3u64.into(), &period, None));
        assert!(is_free(
            &reservations,
            1u64.into(),
            &Period::new("2025-03-31", "2025-04-10"),
            None
        ));
    }

    #[test]
    fn test_exclude_self() {
        let reservations = vec![reservation(1, 1, "2025-03-29", "2025-03-30")];
        let period = Period::new("2025-03-30", "2025-03-31");
        assert!(is_free(&reservations, 1u64.into(), &period, Some(1u64.into())));
        assert!(!is_free(&reservations, 1u64.into(), &period, Some(2u64.into())));
    }

    #[test]
    fn test_cancelled_do_not_conflict() {
        let mut cancelled = reservation(1, 1, "2025-03-29", "2025-03-30");
        cancelled.cancel().unwrap();
        let reservations = vec![cancelled, reservation(2, 1, "2025-04-01", "2025-04-02")];
        let period = Period::new("2025-03-28", "2025-04-01");
        let ids = conflicts(&reservations, 1u64.into(), &period, None)
            .map(|r| *r.id())
            .collect::<Vec<_>>();
        assert_eq!(ids, vec![2]);
    }
}
