use serde::{Deserialize, Serialize};

/// 予約したお客様
///
/// Copied into every reservation; the store keeps no customer table of its own.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Customer {
    name: String,
    contact: String,
    drivers_license: String,
}

impl Customer {
    pub fn new(
        name: impl Into<String>,
        contact: impl Into<String>,
        drivers_license: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            contact: contact.into(),
            drivers_license: drivers_license.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn contact(&self) -> &str {
        &self.contact
    }

    pub fn drivers_license(&self) -> &str {
        &self.drivers_license
    }
}
