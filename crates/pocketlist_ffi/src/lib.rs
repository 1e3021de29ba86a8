//! Flutter-facing bridge crate for the Pocketlist core.

pub mod api;
