use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

use crate::entity::amounts_match;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Fromln, AsRefln)]
pub struct TotalAmount(f64);

impl TotalAmount {
    pub fn new(amount: impl Into<f64>) -> Self {
        Self(amount.into())
    }

    pub fn sum(amounts: impl IntoIterator<Item = f64>) -> Self {
        Self(amounts.into_iter().sum())
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    pub fn matches(&self, other: f64) -> bool {
        amounts_match(self.0, other)
    }
}
