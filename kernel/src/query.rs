mod book;
mod cart;
mod feedback;
mod payment;
mod rental;
mod user;

pub use self::{book::*, cart::*, feedback::*, payment::*, rental::*, user::*};
