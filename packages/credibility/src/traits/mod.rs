//! Core trait abstractions.

pub mod provider;

pub use provider::Provider;
