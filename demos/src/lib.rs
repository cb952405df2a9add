//! # timesample demos
//!
//! Command-line demos for the sampling core.
//!
//! ## Available Demos
//!
//! - `wave_mesh` - Authors an animated wave grid and replays it

/// Demos library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
