//! Debounced viewport resize notifier.
//!
//! A [`ResizeSubject`](subject::ResizeSubject) tracks named observers and,
//! while subscribed to its host, collapses bursts of viewport `resize` and
//! `orientationchange` signals into one delayed delivery of the current
//! dimensions to every observer.
//!
//! # Project Structure
//!
//! - [`events`] – the [`ResizeEvent`](events::resize::ResizeEvent) value type
//! - [`host`] – host seams (viewport query, change signals, timers) and a manual host
//! - [`resources`] – subject configuration and ECS resources for world integration
//! - [`subject`] – the subject, its observer registry and observer names
//! - [`systems`] – ECS systems moving resize events into a `bevy_ecs` world

pub mod events;
pub mod host;
pub mod resources;
pub mod subject;
pub mod systems;
