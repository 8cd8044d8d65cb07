//! Viewport resize event.
//!
//! A [`ResizeEvent`] is produced every time the subject reads the viewport:
//! when an observer is added, on a debounced dispatch, or on an explicit
//! [`dispatch`](crate::subject::ResizeSubject::dispatch). It also implements
//! [`Message`] so hosts running an ECS world can queue it with
//! `Messages<ResizeEvent>`.
//!
//! # Related
//!
//! - [`crate::subject::ResizeSubject`] – produces these events
//! - [`crate::systems::resize`] – systems that consume them inside a world

use bevy_ecs::message::Message;
use serde::{Deserialize, Serialize};

/// Viewport dimensions delivered to observers.
#[derive(Message, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ResizeEvent {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl ResizeEvent {
    /// Placeholder reported when the host has no viewport.
    pub const ZERO: ResizeEvent = ResizeEvent {
        width: 0,
        height: 0,
    };

    pub fn new(width: u32, height: u32) -> Self {
        ResizeEvent { width, height }
    }

    /// Build an event from an optional host reading, falling back to [`ResizeEvent::ZERO`].
    pub fn from_reading(reading: Option<(u32, u32)>) -> Self {
        match reading {
            Some((width, height)) => ResizeEvent { width, height },
            None => ResizeEvent::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_reading_none_is_zero() {
        let e = ResizeEvent::from_reading(None);
        assert_eq!(e, ResizeEvent::ZERO);
    }

    #[test]
    fn test_from_reading_some() {
        let e = ResizeEvent::from_reading(Some((1280, 720)));
        assert_eq!(e.width, 1280);
        assert_eq!(e.height, 720);
    }

    #[test]
    fn test_serializes_as_plain_object() {
        let json = serde_json::to_string(&ResizeEvent::new(200, 100)).unwrap();
        assert_eq!(json, r#"{"width":200,"height":100}"#);
    }
}
