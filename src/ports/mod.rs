//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the assignment loop and an
//! external system (time, the issue tracker). Live implementations live in
//! `src/adapters/`; tests substitute mocks behind the same traits.

pub mod clock;
pub mod tracker;

pub use clock::Clock;
pub use tracker::{Issue, Tracker, Transition};
