use std::{error::Error, sync::Arc};

use chrono::NaiveDate;
use rental::{
    application::RentalSession,
    domain::{
        core::{Car, Currency, Customer, Money, Period},
        Entity,
    },
    infrastructure::RentalStore,
    RentalConfig,
};
use tracing::{error, info, warn, Level};

#[tokio::main]
async fn main() {
    match RentalConfig::load() {
        Ok(config) => {
            tracing_subscriber::fmt()
                .with_max_level(Level::from(&config.logger.level))
                .init();
            if let Err(error) = run(config) {
                error!("application error: {}", error);
            }
        }
        Err(error) => {
            tracing_subscriber::fmt::init();
            error!("application error: {}", error)
        }
    }
}

fn run(config: RentalConfig) -> Result<(), Box<dyn Error>> {
    let store = Arc::new(RentalStore::new(&config.store));
    let fleet = if config.fleet.is_empty() {
        default_fleet()
    } else {
        config.fleet.into_iter().map(Car::from).collect()
    };
    for car in fleet {
        store.add_car(car);
    }

    let mut session = RentalSession::new(
        Arc::clone(&store),
        Customer::new("John Doe", "john.doe@example.com", "D123456"),
    );

    let cars = session.search("Toyota", &Money::new(100, Currency::USD));
    info!("available cars: {}", serde_json::to_string(&cars)?);
    let Some(car) = cars.first() else {
        warn!("no Toyota available, nothing to book");
        return Ok(());
    };

    let reservation = session.book(car.id(), period("2025-03-29", "2025-03-30")?)?;
    info!("reservation created: {}", serde_json::to_string(&reservation)?);

    match session.pay(reservation.id()) {
        Ok(_) => info!("payment successful"),
        Err(e) => warn!("payment error: {}", e),
    }

    match session.reschedule(reservation.id(), period("2025-04-01", "2025-04-02")?) {
        Ok(_) => info!("reservation modified successfully"),
        Err(e) => warn!("modification error: {}", e),
    }

    match session.cancel(reservation.id()) {
        Ok(_) => info!("reservation cancelled"),
        Err(e) => warn!("cancellation error: {}", e),
    }

    println!("{}", serde_json::to_string_pretty(&store.journal())?);
    Ok(())
}

/// The store compares dates as plain strings, so they are checked here before use.
fn period(start: &str, end: &str) -> Result<Period, Box<dyn Error>> {
    iso_date(start)?;
    iso_date(end)?;
    Ok(Period::new(start, end))
}

fn iso_date(value: &str) -> Result<NaiveDate, Box<dyn Error>> {
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")?;
    if date.format("%Y-%m-%d").to_string() != value {
        return Err(format!("date is not zero-padded YYYY-MM-DD: {}", value).into());
    }
    Ok(date)
}

fn default_fleet() -> Vec<Car> {
    vec![
        Car::create(
            1u64.into(),
            "Toyota".to_owned(),
            "Corolla".to_owned(),
            2020,
            "ABC123".to_owned(),
            Money::new(50, Currency::USD),
        ),
        Car::create(
            2u64.into(),
            "Honda".to_owned(),
            "Civic".to_owned(),
            2021,
            "XYZ789".to_owned(),
            Money::new(60, Currency::USD),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_rejects_malformed_dates() {
        assert!(period("2025-03-29", "2025-03-30").is_ok());
        assert!(period("2025-3-29", "2025-03-30").is_err());
        assert!(period("2025-02-30", "2025-03-01").is_err());
    }

    #[test]
    fn test_default_fleet() {
        let fleet = default_fleet();
        assert_eq!(fleet.len(), 2);
        assert_eq!(fleet[0].make(), "Toyota");
        assert_eq!(fleet[1].daily_rate(), &Money::new(60, Currency::USD));
    }
}
