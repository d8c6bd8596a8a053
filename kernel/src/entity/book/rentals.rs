use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

use crate::entity::BookQuantity;

/// How many copies of a book have ever been rented out.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Serialize, Deserialize, Fromln, AsRefln)]
pub struct TotalRentals(i64);

impl TotalRentals {
    pub fn new(total: impl Into<i64>) -> Self {
        Self(total.into())
    }

    pub fn add(&self, taken: &BookQuantity) -> Self {
        let taken: &i32 = taken.as_ref();
        Self(self.0 + i64::from(*taken))
    }
}
