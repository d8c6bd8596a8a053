use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

use crate::entity::RentalDuration;

/// Rental price per day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Fromln, AsRefln)]
pub struct RentPrice(f64);

impl RentPrice {
    pub fn new(price: impl Into<f64>) -> Self {
        Self(price.into())
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    pub fn is_valid(&self) -> bool {
        self.0.is_finite() && self.0 > 0.0
    }

    pub fn line_total(&self, duration: &RentalDuration) -> f64 {
        self.0 * f64::from(duration.days())
    }
}
