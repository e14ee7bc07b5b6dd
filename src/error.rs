//! Crate-level error type for the handful of programmer-error conditions that
//! are not already modeled as `Option`/`bool`/`Route{success:false}`.
//!
//! Everything else in this crate signals failure through a sentinel return
//! value, per the "exception-free numeric code" convention carried throughout
//! numal/collision/navsys.

use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuylError {
    #[error("tick callback already attached")]
    AlreadyAttached,

    #[error("tick callback not attached")]
    NotAttached,

    #[error("grid dimensions must be non-zero (got {width}x{height})")]
    InvalidGrid { width: u32, height: u32 },
}

pub type BuylResult<T> = Result<T, BuylError>;
