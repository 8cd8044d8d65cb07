//! Viewport size resource.
//!
//! Tracks the last viewport dimensions delivered by the resize subject,
//! which may differ from the fixed render resolution a world draws at.
//! Updated by [`apply_viewport_size`](crate::systems::resize::apply_viewport_size).

use bevy_ecs::prelude::Resource;

use crate::events::resize::ResizeEvent;

/// Destination rectangle for a letterboxed render, in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Letterbox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Current viewport size in pixels.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewportSize {
    /// Width in pixels.
    pub w: u32,
    /// Height in pixels.
    pub h: u32,
}

impl From<ResizeEvent> for ViewportSize {
    fn from(event: ResizeEvent) -> Self {
        ViewportSize {
            w: event.width,
            h: event.height,
        }
    }
}

impl ViewportSize {
    /// Whether nothing can be drawn (no viewport, or collapsed).
    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    /// Fit a `game_width` x `game_height` render inside the viewport.
    ///
    /// The result preserves the render aspect ratio and is centered, leaving
    /// bars on the sides (pillarbox) or top and bottom (letterbox). An empty
    /// viewport yields a zero rectangle.
    pub fn letterbox(&self, game_width: u32, game_height: u32) -> Letterbox {
        if self.is_empty() || game_width == 0 || game_height == 0 {
            return Letterbox {
                x: 0.0,
                y: 0.0,
                width: 0.0,
                height: 0.0,
            };
        }
        let game_w = game_width as f32;
        let game_h = game_height as f32;
        let view_w = self.w as f32;
        let view_h = self.h as f32;

        if view_w / view_h > game_w / game_h {
            // Viewport is wider than the render: bars on the sides
            let scaled_w = game_w * (view_h / game_h);
            Letterbox {
                x: (view_w - scaled_w) / 2.0,
                y: 0.0,
                width: scaled_w,
                height: view_h,
            }
        } else {
            // Viewport is taller: bars top and bottom
            let scaled_h = game_h * (view_w / game_w);
            Letterbox {
                x: 0.0,
                y: (view_h - scaled_h) / 2.0,
                width: view_w,
                height: scaled_h,
            }
        }
    }
}
