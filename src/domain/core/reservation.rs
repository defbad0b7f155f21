use derive_more::{Deref, Display, Error, From, IntoIterator};
use serde::{Deserialize, Serialize};

use crate::domain::{Aggregation, Entity, Event, EventQueue, Id};

use super::{CarId, Customer, Money, Period};

/// 予約ID
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
pub struct ReservationId(u64);

impl Id for ReservationId {
    type Inner = u64;
}

/// 予約イベント
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReservationEvent {
    /// 予約が作成された
    ReservationCreated {
        id: ReservationId,
        customer: Customer,
        car_id: CarId,
        period: Period,
        total_price: Money,
    },
    /// 予約期間が変更された
    ReservationPeriodChanged { id: ReservationId, period: Period },
    /// 支払いが完了した
    ReservationPaid { id: ReservationId },
    /// 予約がキャンセルされた
    ReservationCancelled { id: ReservationId },
}

impl Event for ReservationEvent {
    type Id = ReservationId;
}

/// 予約エンティティ
#[derive(Debug, Default, Clone, IntoIterator, Serialize, Deserialize)]
pub struct Reservation {
    id: ReservationId,
    customer: Customer,
    car_id: CarId,
    period: Period,
    total_price: Money,
    status: ReservationStatus,
    #[serde(skip)]
    #[into_iterator]
    events: EventQueue<ReservationEvent>,
}

impl Reservation {
    /// The total price is a single day's rate no matter how long the period is.
    pub fn create(
        id: ReservationId,
        customer: Customer,
        car_id: CarId,
        period: Period,
        daily_rate: &Money,
    ) -> Self {
        let total_price = daily_rate.clone();
        let mut entity = Reservation {
            id,
            customer: customer.clone(),
            car_id,
            period: period.clone(),
            total_price: total_price.clone(),
            ..Default::default()
        };
        entity.events.push(ReservationEvent::ReservationCreated {
            id,
            customer,
            car_id,
            period,
            total_price,
        });
        entity
    }

    pub fn change_period(&mut self, period: Period) -> Result<(), ReservationError> {
        self.validate_period_changed()?;
        self.period = period.clone();
        self.events
            .push(ReservationEvent::ReservationPeriodChanged { id: self.id, period });
        Ok(())
    }

    pub fn pay(&mut self) -> Result<(), ReservationError> {
        self.validate_status(ReservationStatus::Paid)?;
        self.status = ReservationStatus::Paid;
        self.events
            .push(ReservationEvent::ReservationPaid { id: self.id });
        Ok(())
    }

    pub fn cancel(&mut self) -> Result<(), ReservationError> {
        self.validate_status(ReservationStatus::Cancelled)?;
        self.status = ReservationStatus::Cancelled;
        self.events
            .push(ReservationEvent::ReservationCancelled { id: self.id });
        Ok(())
    }

    pub fn customer(&self) -> &Customer {
        &self.customer
    }

    pub fn car_id(&self) -> CarId {
        self.car_id
    }

    pub fn period(&self) -> &Period {
        &self.period
    }

    pub fn total_price(&self) -> &Money {
        &self.total_price
    }

    pub fn status(&self) -> ReservationStatus {
        self.status
    }

    pub fn is_paid(&self) -> bool {
        self.status == ReservationStatus::Paid
    }

    pub fn is_active(&self) -> bool {
        self.status != ReservationStatus::Cancelled
    }

    fn validate_id(&self, id: &ReservationId) -> Result<(), ReservationError> {
        match self.id == *id {
            true => Ok(()),
            false => Err(ReservationError::MismatchedId),
        }
    }

    fn validate_period_changed(&self) -> Result<(), ReservationError> {
        match self.status {
            ReservationStatus::Cancelled => Err(ReservationError::Cancelled),
            ReservationStatus::Booked | ReservationStatus::Paid => Ok(()),
        }
    }

    fn validate_status(&self, status: ReservationStatus) -> Result<(), ReservationError> {
        match (self.status, status) {
            (ReservationStatus::Booked, ReservationStatus::Paid)
            | (ReservationStatus::Booked, ReservationStatus::Cancelled)
            | (ReservationStatus::Paid, ReservationStatus::Cancelled) => Ok(()),
            (ReservationStatus::Paid, ReservationStatus::Paid) => Err(ReservationError::AlreadyPaid),
            (ReservationStatus::Cancelled, _) => Err(ReservationError::Cancelled),
            (_, ReservationStatus::Booked) => Err(ReservationError::InvalidStatusTransition),
        }
    }
}

impl Entity for Reservation {
    type Id = ReservationId;

    const ENTITY_NAME: &'static str = "reservation";

    fn id(&self) -> Self::Id {
        self.id
    }
}

impl Aggregation for Reservation {
    type Event = ReservationEvent;
    type Error = ReservationError;

    fn validate(&self, event: &Self::Event) -> Result<(), Self::Error> {
        match event {
            ReservationEvent::ReservationCreated { .. } => Ok(()),
            ReservationEvent::ReservationPeriodChanged { id, .. } => {
                self.validate_id(id)?;
                self.validate_period_changed()
            }
            ReservationEvent::ReservationPaid { id } => {
                self.validate_id(id)?;
                self.validate_status(ReservationStatus::Paid)
            }
            ReservationEvent::ReservationCancelled { id } => {
                self.validate_id(id)?;
                self.validate_status(ReservationStatus::Cancelled)
            }
        }
    }

    fn apply(&mut self, event: Self::Event) {
        match event {
            ReservationEvent::ReservationCreated {
                id,
                customer,
                car_id,
                period,
                total_price,
            } => {
                if self.id != id {
                    *self = Self::create(id, customer, car_id, period, &total_price);
                }
            }
            ReservationEvent::ReservationPeriodChanged { id, period } => {
                if self.id == id {
                    if let Err(_e) = self.change_period(period) {}
                }
            }
            ReservationEvent::ReservationPaid { id } => {
                if self.id == id {
                    if let Err(_e) = self.pay() {}
                }
            }
            ReservationEvent::ReservationCancelled { id } => {
                if self.id == id {
                    if let Err(_e) = self.cancel() {}
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

impl PartialEq for Reservation {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.customer == other.customer
            && self.car_id == other.car_id
            && self.period == other.period
            && self.total_price == other.total_price
            && self.status == other.status
    }
}

impl Eq for Reservation {}

/// 予約エラー
#[derive(Error, Display, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservationError {
    /// IDが一致しません
    #[display(fmt = "ID does not match")]
    MismatchedId,
    /// 支払い済みです
    #[display(fmt = "Reservation is already paid")]
    AlreadyPaid,
    /// キャンセル済みです
    #[display(fmt = "Reservation is cancelled")]
    Cancelled,
    /// 不正なステータス遷移です
    #[display(fmt = "Invalid status transition")]
    InvalidStatusTransition,
}

/// 予約ステータス
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ReservationStatus {
    /// 予約済み
    #[default]
    Booked,
    /// 支払い済み
    Paid,
    /// キャンセル
    Cancelled,
}
