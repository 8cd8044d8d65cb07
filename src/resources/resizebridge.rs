//! ECS resource that bridges a resize subject into a `bevy_ecs` world.
//!
//! Use [`setup_resize_bridge`] once during initialization. It registers an
//! observer on the subject that forwards every delivered event into a
//! channel, and inserts the [`ResizeBridge`], [`ViewportSize`] and
//! `Messages<ResizeEvent>` resources. The systems in
//! [`crate::systems::resize`] then move events from the channel into the
//! world each frame.

use bevy_ecs::prelude::*;
use crossbeam_channel::{Receiver, Sender, unbounded};
use log::warn;

use crate::events::resize::ResizeEvent;
use crate::resources::viewportsize::ViewportSize;
use crate::subject::ResizeSubject;
use crate::subject::name::ObserverToken;

/// Receiving end of the subject-to-world channel.
#[derive(Resource)]
pub struct ResizeBridge {
    /// Events delivered by the subject and not yet polled.
    pub rx_event: Receiver<ResizeEvent>,
}

/// Observer callback that forwards events into `tx`.
///
/// Sending only fails once the world side is gone; the event is dropped.
pub fn channel_observer(tx: Sender<ResizeEvent>) -> impl FnMut(ResizeEvent) + 'static {
    move |event| {
        if tx.send(event).is_err() {
            warn!("Resize bridge receiver dropped; event {}x{} lost", event.width, event.height);
        }
    }
}

/// Connect `subject` to `world`.
///
/// The returned token identifies the forwarding observer, so it can be
/// removed later with [`ResizeSubject::delete_observer`]. Because adding an
/// observer delivers the current size immediately, the first poll already
/// sees a value.
pub fn setup_resize_bridge(world: &mut World, subject: &mut ResizeSubject) -> ObserverToken {
    let (tx_event, rx_event) = unbounded::<ResizeEvent>();
    let token = ObserverToken::new();

    world.insert_resource(ResizeBridge { rx_event });
    world.insert_resource(ViewportSize::default());
    world.insert_resource(Messages::<ResizeEvent>::default());

    subject.add_observer(token, channel_observer(tx_event));
    token
}
