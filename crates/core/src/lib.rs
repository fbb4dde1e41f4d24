//! Core business logic for tutorium.

pub mod services;

pub use services::*;
