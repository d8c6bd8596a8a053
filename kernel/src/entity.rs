mod book;
mod cart;
mod common;
mod feedback;
mod payment;
mod rental;
mod user;

pub use self::{book::*, cart::*, common::*, feedback::*, payment::*, rental::*, user::*};
