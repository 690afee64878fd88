//! Supporting services outside the persistence layer.

pub mod badge;
