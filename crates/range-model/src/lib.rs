//! Trimview Range Model
//!
//! Defines the selection state behind the trimmer:
//! - **Bounds:** a `[left, right]` pixel interval with scale/lerp helpers
//! - **RangeModel:** the two-handle interval with width limits, zoom
//!   expansion around a pivot, and the expand/collapse animation
//! - **TimeScale:** conversion between track pixels and media milliseconds
//!
//! This crate is pure computation. Nothing here owns a timer; animation is
//! advanced by passing timestamps to [`RangeModel::step_animation`].

pub mod animation;
pub mod range;
pub mod time_scale;

pub use animation::{Bounds, BoundsAnimation};
pub use range::{clamp, RangeModel};
pub use time_scale::{TimeScale, TrimWindow};
