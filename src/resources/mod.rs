//! Configuration and ECS resources.
//!
//! Overview
//! - `resizebridge` – channel bridge from a subject into a `bevy_ecs` world
//! - `subjectconfig` – subject options (debounce delay) and INI persistence
//! - `viewportsize` – last delivered viewport size and letterbox math
pub mod resizebridge;
pub mod subjectconfig;
pub mod viewportsize;
