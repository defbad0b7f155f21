use std::convert::Infallible;

use derive_more::{Deref, Display, From, IntoIterator};
use serde::{Deserialize, Serialize};

use crate::domain::{Aggregation, Entity, Event, EventQueue, Id};

use super::Money;

/// 車両ID
#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    From,
    Deref,
    Default,
)]
pub struct CarId(u64);

impl Id for CarId {
    type Inner = u64;
}

/// 車両イベント
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CarEvent {
    /// 車両が登録された
    CarRegistered {
        id: CarId,
        make: String,
        model: String,
        year: u16,
        license_plate: String,
        daily_rate: Money,
        available: bool,
    },
    /// 貸出可否が変更された
    CarAvailabilityChanged { id: CarId, available: bool },
}

impl Event for CarEvent {
    type Id = CarId;
}

/// 車両エンティティ
#[derive(Debug, Default, Clone, IntoIterator, Serialize, Deserialize)]
pub struct Car {
    id: CarId,
    make: String,
    model: String,
    year: u16,
    license_plate: String,
    daily_rate: Money,
    available: bool,
    #[serde(skip)]
    #[into_iterator]
    events: EventQueue<CarEvent>,
}

impl Car {
    /// Registers a car that is immediately available for rent.
    pub fn create(
        id: CarId,
        make: String,
        model: String,
        year: u16,
        license_plate: String,
        daily_rate: Money,
    ) -> Self {
        Self::register(id, make, model, year, license_plate, daily_rate, true)
    }

    pub fn register(
        id: CarId,
        make: String,
        model: String,
        year: u16,
        license_plate: String,
        daily_rate: Money,
        available: bool,
    ) -> Self {
        let mut entity = Car {
            id,
            make: make.clone(),
            model: model.clone(),
            year,
            license_plate: license_plate.clone(),
            daily_rate: daily_rate.clone(),
            available,
            ..Default::default()
        };
        entity.events.push(CarEvent::CarRegistered {
            id,
            make,
            model,
            year,
            license_plate,
            daily_rate,
            available,
        });
        entity
    }

    /// Records a change only when the flag actually flips.
    pub fn set_available(&mut self, available: bool) {
        if self.available == available {
            return;
        }
        self.available = available;
        self.events.push(CarEvent::CarAvailabilityChanged {
            id: self.id,
            available,
        });
    }

    pub fn make(&self) -> &str {
        &self.make
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn year(&self) -> u16 {
        self.year
    }

    pub fn license_plate(&self) -> &str {
        &self.license_plate
    }

    pub fn daily_rate(&self) -> &Money {
        &self.daily_rate
    }

    pub fn is_available(&self) -> bool {
        self.available
    }
}

impl Entity for Car {
    type Id = CarId;

    const ENTITY_NAME: &'static str = "car";

    fn id(&self) -> Self::Id {
        self.id
    }
}

impl Aggregation for Car {
    type Event = CarEvent;
    type Error = Infallible;

    fn validate(&self, _event: &Self::Event) -> Result<(), Self::Error> {
        Ok(())
    }

    fn apply(&mut self, event: Self::Event) {
        match event {
            CarEvent::CarRegistered {
                id,
                make,
                model,
                year,
                license_plate,
                daily_rate,
                available,
            } => {
                *self = Self::register(id, make, model, year, license_plate, daily_rate, available);
            }
            CarEvent::CarAvailabilityChanged { id, available } => {
                if self.id == id {
                    self.set_available(available);
                }
            }
        }
    }

    fn events(&self) -> &EventQueue<Self::Event> {
        &self.events
    }

    fn events_mut(&mut self) -> &mut EventQueue<Self::Event> {
        &mut self.events
    }
}

impl PartialEq for Car {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.make == other.make
            && self.model == other.model
            && self.year == other.year
            && self.license_plate == other.license_plate
            && self.daily_rate == other.daily_rate
            && self.available == other.available
    }
}

impl Eq for Car {}
