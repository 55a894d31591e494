//! Function blocks for cyclic controllers.
//!
//! Blocks are called once per control-loop iteration with the current
//! virtual timestamp (see [`robosim_common::to_time`]):
//!
//! - **Timers** ([`timers`]): TON (debounce), TP (fixed-length pulse)
//! - **Triggers** ([`triggers`]): R_TRIG, F_TRIG
//!
//! # Example
//!
//! ```
//! use robosim_stdlib::timers::Ton;
//! use robosim_stdlib::triggers::RTrig;
//!
//! // Debounced button: qualifies after being held for 1 s
//! let mut ton = Ton::new();
//! let mut rtrig = RTrig::new();
//!
//! let held = ton.call(true, 1_000_000_000, 0);
//! assert!(!rtrig.call(held));
//!
//! let held = ton.call(true, 1_000_000_000, 1_000_000_000);
//! assert!(rtrig.call(held));
//! ```

pub mod timers;
pub mod triggers;

pub use timers::{Ton, Tp};
pub use triggers::{FTrig, RTrig};
