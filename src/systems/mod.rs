//! ECS systems.
//!
//! - [`resize`] – drain subject events into messages and apply the viewport size
pub mod resize;
