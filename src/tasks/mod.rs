//! Background Tasks Module
//!
//! Contains background tasks owned by a cache store.
//!
//! # Tasks
//! - Expiry sweep: deletes expired entries from the document store on an interval

mod sweeper;

pub use sweeper::{SweepState, Sweeper};
