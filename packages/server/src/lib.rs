// Credibility Check - HTTP API
//
// Thin host around the `credibility` pipeline: process configuration,
// logging setup and the JSON routes. All analysis logic lives in the library.

pub mod config;
pub mod server;

pub use config::*;
