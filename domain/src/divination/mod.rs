//! Divination domain.
//!
//! - [`kind::DivinationKind`]: the four oracles offered to the user
//! - [`request::DivinationRequest`]: a validated, immutable submission

pub mod kind;
pub mod request;
