mod money;
mod operation;
mod time;

pub use self::{money::*, operation::*, time::*};
