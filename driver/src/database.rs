mod postgres;

#[cfg(feature = "memory")]
mod memory;

pub use self::postgres::*;

#[cfg(feature = "memory")]
pub use self::memory::*;
