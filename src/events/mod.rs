//! Event types produced by the resize subject.
//!
//! Submodules:
//! - [`resize`] – viewport dimensions delivered to observers
pub mod resize;
