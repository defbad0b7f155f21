use config::{Config, ConfigError};
use serde::Deserialize;

use crate::domain::core::{Car, Currency, Money};
use crate::infrastructure::StoreSettings;

pub mod application;
pub mod domain;
pub mod infrastructure;

#[derive(Clone, Debug, Deserialize)]
pub struct RentalConfig {
    pub logger: Logger,
    pub store: StoreSettings,
    #[serde(default)]
    pub fleet: Vec<FleetCar>,
}

impl RentalConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("rental")
    }

    /// `name` is resolved like `config::File::with_name`; a missing file falls back to defaults.
    pub fn load_from(name: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("logger.level", "INFO")?
            .set_default("store.journal_limit", StoreSettings::DEFAULT_JOURNAL_LIMIT as i64)?
            .add_source(config::File::with_name(name).required(false))
            .add_source(
                config::Environment::with_prefix("RENTAL")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize::<RentalConfig>()
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Logger {
    pub level: Level,
}

#[derive(Clone, Debug, Deserialize)]
pub enum Level {
    TRACE,
    DEBUG,
    INFO,
    WARN,
    ERROR,
}

impl From<&Level> for tracing::Level {
    fn from(value: &Level) -> Self {
        match value {
            Level::TRACE => tracing::Level::TRACE,
            Level::DEBUG => tracing::Level::DEBUG,
            Level::INFO => tracing::Level::INFO,
            Level::WARN => tracing::Level::WARN,
            Level::ERROR => tracing::Level::ERROR,
        }
    }
}

/// A car listed in the `fleet` section of the configuration.
#[derive(Clone, Debug, Deserialize)]
pub struct FleetCar {
    pub id: u64,
    pub make: String,
    pub model: String,
    pub year: u16,
    pub license_plate: String,
    pub daily_rate: u64,
    #[serde(default)]
    pub currency: Currency,
}

impl From<FleetCar> for Car {
    fn from(value: FleetCar) -> Self {
        Car::create(
            value.id.into(),
            value.make,
            value.model,
            value.year,
            value.license_plate,
            Money::new(value.daily_rate, value.currency),
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::Entity;

    use super::*;

    #[test]
    fn test_load_defaults_without_file() {
        let config = RentalConfig::load_from("does-not-exist").unwrap();
        assert!(matches!(config.logger.level, Level::INFO));
        assert_eq!(
            config.store.journal_limit,
            StoreSettings::DEFAULT_JOURNAL_LIMIT
        );
        assert!(config.fleet.is_empty());
    }

    #[test]
    fn test_fleet_car_into_car() {
        let car = Car::from(FleetCar {
            id: 7,
            make: "Toyota".to_owned(),
            model: "Corolla".to_owned(),
            year: 2020,
            license_plate: "ABC123".to_owned(),
            daily_rate: 50,
            currency: Currency::USD,
        });
        assert_eq!(*car.id(), 7);
        assert_eq!(car.daily_rate(), &Money::new(50, Currency::USD));
        assert!(car.is_available());
    }
}
