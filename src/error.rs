//! Centralized error type for the ponte umbrella crate.
//!
//! Wraps the subsystem errors so `?` propagates naturally across crate
//! boundaries.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Schema(#[from] ponte_patch::SchemaError),

    #[error(transparent)]
    Decode(#[from] ponte_bridge::DecodeError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
