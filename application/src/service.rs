mod book;
mod cart;
mod checkout;
mod feedback;
mod payment;
mod rental;
mod user;

pub use self::{book::*, cart::*, checkout::*, feedback::*, payment::*, rental::*, user::*};
