//! Typed form models.
//!
//! Every form has a pure `validate` returning the list of field errors; an
//! empty list means the form can be sent.

pub mod bird;
pub mod incubation;
pub mod photo;
pub mod sale;
pub mod share;
