//! Contention tests: many callers racing for the same car must never double-book it.

use std::sync::Arc;

use rental::domain::core::{Car, CarId, Currency, Customer, Money, Period};
use rental::domain::Entity;
use rental::infrastructure::{RentalError, RentalStore};

fn store_with_one_car() -> Arc<RentalStore> {
    let store = RentalStore::default();
    store.add_car(Car::create(
        CarId::from(1u64),
        "Toyota".to_owned(),
        "Corolla".to_owned(),
        2020,
        "ABC123".to_owned(),
        Money::new(50, Currency::USD),
    ));
    Arc::new(store)
}

fn customer(i: usize) -> Customer {
    Customer::new(format!("Customer {}", i), "", format!("D{:06}", i))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_last_car_100_requests() {
    let store = store_with_one_car();

    let mut handles = vec![];
    for i in 0..100 {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move {
            // Every request overlaps 2025-03-30.
            let start = if i % 2 == 0 { "2025-03-29" } else { "2025-03-30" };
            store.create_reservation(
                customer(i),
                CarId::from(1u64),
                Period::new(start, "2025-03-31"),
            )
        }));
    }

    let mut created = vec![];
    let mut rejected = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(reservation) => created.push(reservation),
            Err(RentalError::CarUnavailable(_)) => rejected += 1,
            Err(e) => panic!("unexpected error: {}", e),
        }
    }

    assert_eq!(created.len(), 1);
    assert_eq!(rejected, 99);
    assert_eq!(store.reservations(), created);
    assert!(!store.car(CarId::from(1u64)).unwrap().is_available());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_payment_charges_once() {
    let store = store_with_one_car();
    let reservation = store
        .create_reservation(
            customer(0),
            CarId::from(1u64),
            Period::new("2025-03-29", "2025-03-30"),
        )
        .unwrap();

    let mut handles = vec![];
    for _ in 0..50 {
        let store = Arc::clone(&store);
        let id = reservation.id();
        handles.push(tokio::spawn(async move { store.process_payment(id) }));
    }

    let mut paid = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => paid += 1,
            Err(e) => assert_eq!(e, RentalError::AlreadyPaid(reservation.id())),
        }
    }
    assert_eq!(paid, 1);
    assert!(store.reservation(reservation.id()).unwrap().is_paid());
}

#[test]
fn test_ids_strictly_increase_across_threads() {
    let store = Arc::new(RentalStore::default());
    for id in 1..=8u64 {
        store.add_car(Car::create(
            CarId::from(id),
            "Honda".to_owned(),
            "Civic".to_owned(),
            2021,
            format!("XYZ{}", id),
            Money::new(60, Currency::USD),
        ));
    }

    let handles = (1..=8u64)
        .map(|id| {
            let store = Arc::clone(&store);
            std::thread::spawn(move || {
                let mut ids = vec![];
                for round in 0..25 {
                    let reservation = store
                        .create_reservation(
                            customer(round),
                            CarId::from(id),
                            Period::new("2025-03-29", "2025-03-30"),
                        )
                        .unwrap();
                    ids.push(*reservation.id());
                    store.cancel_reservation(reservation.id()).unwrap();
                }
                ids
            })
        })
        .collect::<Vec<_>>();

    let mut all = vec![];
    for handle in handles {
        let ids = handle.join().unwrap();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
        all.extend(ids);
    }
    all.sort_unstable();
    all.dedup();
    assert_eq!(all, (1..=200).collect::<Vec<u64>>());
    assert!(store.reservations().is_empty());
}
