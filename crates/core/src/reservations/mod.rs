//! Reservations module - reserved instance rows and their terms.

mod reservations_model;

pub use reservations_model::{
    first_full_year, ReservationRow, ReservationType, Term, UpfrontPayment,
};
