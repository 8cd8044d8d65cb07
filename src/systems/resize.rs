//! Resize bridge systems.
//!
//! These systems move events produced by a
//! [`ResizeSubject`](crate::subject::ResizeSubject) into the ECS world:
//! - [`poll_resize_messages`] non-blockingly drains the bridge channel into
//!   `Messages<ResizeEvent>`.
//! - [`update_resize_messages`] advances the message queue so newly written
//!   messages become readable.
//! - [`apply_viewport_size`] writes the most recent size into
//!   [`ViewportSize`].
//!
//! Run them in that order, once per frame.

use bevy_ecs::prelude::{MessageReader, MessageWriter, Messages, Res, ResMut};

use crate::events::resize::ResizeEvent;
use crate::resources::resizebridge::ResizeBridge;
use crate::resources::viewportsize::ViewportSize;

/// Drain pending events from the bridge into [`Messages<ResizeEvent>`].
pub fn poll_resize_messages(bridge: Res<ResizeBridge>, mut writer: MessageWriter<ResizeEvent>) {
    writer.write_batch(bridge.rx_event.try_iter());
}

/// Advance the ECS message queue for [`ResizeEvent`].
pub fn update_resize_messages(mut msgs: ResMut<Messages<ResizeEvent>>) {
    msgs.update();
}

/// Store the last size read this frame in [`ViewportSize`].
///
/// Earlier events in the same frame are superseded.
pub fn apply_viewport_size(
    mut reader: MessageReader<ResizeEvent>,
    mut viewport: ResMut<ViewportSize>,
) {
    if let Some(event) = reader.read().last() {
        let size = ViewportSize::from(*event);
        if *viewport != size {
            *viewport = size;
        }
    }
}
