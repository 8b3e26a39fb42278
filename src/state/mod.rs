//! State module for the pagination driver
//!
//! - `DriverState`: where the per-seed loop currently is
//! - `StopReason`: why a seed's session ended

mod driver_state;

pub use driver_state::{DriverState, StopReason};
