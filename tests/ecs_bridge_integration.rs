//! ECS bridge integration tests.
//!
//! A subject connected with `setup_resize_bridge` must feed its events into
//! a `bevy_ecs` world: the channel is drained into `Messages<ResizeEvent>`
//! and the last size of each frame ends up in `ViewportSize`.

use std::rc::Rc;

use bevy_ecs::prelude::*;
use bevy_ecs::system::SystemState;

use resizesubject::events::resize::ResizeEvent;
use resizesubject::host::SignalKind;
use resizesubject::host::manual::ManualHost;
use resizesubject::resources::resizebridge::{ResizeBridge, setup_resize_bridge};
use resizesubject::resources::viewportsize::ViewportSize;
use resizesubject::subject::ResizeSubject;
use resizesubject::systems::resize::{
    apply_viewport_size, poll_resize_messages, update_resize_messages,
};

fn bridge_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems(
        (
            poll_resize_messages,
            update_resize_messages,
            apply_viewport_size,
        )
            .chain(),
    );
    schedule
}

#[test]
fn setup_inserts_resources_and_primes_channel() {
    let host = Rc::new(ManualHost::new(1280, 720));
    let mut subject = ResizeSubject::new(host);
    let mut world = World::new();

    setup_resize_bridge(&mut world, &mut subject);

    assert!(world.contains_resource::<ResizeBridge>());
    assert!(world.contains_resource::<Messages<ResizeEvent>>());
    assert_eq!(*world.resource::<ViewportSize>(), ViewportSize::default());
    // Adding the forwarding observer delivered the current size once
    assert_eq!(world.resource::<ResizeBridge>().rx_event.len(), 1);
}

#[test]
fn first_frame_applies_initial_size() {
    let host = Rc::new(ManualHost::new(1280, 720));
    let mut subject = ResizeSubject::new(host);
    let mut world = World::new();
    setup_resize_bridge(&mut world, &mut subject);

    let mut schedule = bridge_schedule();
    schedule.run(&mut world);

    assert_eq!(*world.resource::<ViewportSize>(), ViewportSize { w: 1280, h: 720 });
}

#[test]
fn debounced_resize_reaches_world() {
    let host = Rc::new(ManualHost::new(1280, 720));
    let mut subject = ResizeSubject::new(host.clone());
    subject.subscribe();
    let mut world = World::new();
    setup_resize_bridge(&mut world, &mut subject);
    let mut schedule = bridge_schedule();
    schedule.run(&mut world);

    host.set_size(1000, 500);
    host.emit(SignalKind::Resize);
    host.advance(10);
    host.set_size(900, 400);
    host.emit(SignalKind::Resize);

    schedule.run(&mut world);
    assert_eq!(*world.resource::<ViewportSize>(), ViewportSize { w: 1280, h: 720 });

    host.advance(33);
    schedule.run(&mut world);
    assert_eq!(*world.resource::<ViewportSize>(), ViewportSize { w: 900, h: 400 });
}

#[test]
fn last_event_in_a_frame_wins() {
    let host = Rc::new(ManualHost::new(10, 10));
    let mut subject = ResizeSubject::new(host);
    let mut world = World::new();
    setup_resize_bridge(&mut world, &mut subject);

    subject
        .notify_observers(ResizeEvent::new(300, 200))
        .notify_observers(ResizeEvent::new(640, 480));
    let mut schedule = bridge_schedule();
    schedule.run(&mut world);

    assert_eq!(*world.resource::<ViewportSize>(), ViewportSize { w: 640, h: 480 });
}

#[test]
fn polled_events_are_readable_as_messages() {
    let host = Rc::new(ManualHost::new(10, 10));
    let mut subject = ResizeSubject::new(host);
    let mut world = World::new();
    setup_resize_bridge(&mut world, &mut subject);
    subject.notify_observers(ResizeEvent::new(200, 100));

    {
        let mut state = SystemState::<(Res<ResizeBridge>, MessageWriter<ResizeEvent>)>::new(&mut world);
        let (bridge, mut writer) = state.get_mut(&mut world);
        writer.write_batch(bridge.rx_event.try_iter());
    }
    world.resource_mut::<Messages<ResizeEvent>>().update();

    let mut state = SystemState::<MessageReader<ResizeEvent>>::new(&mut world);
    let mut reader = state.get_mut(&mut world);
    let events: Vec<ResizeEvent> = reader.read().copied().collect();
    assert_eq!(events, vec![ResizeEvent::new(10, 10), ResizeEvent::new(200, 100)]);
}

#[test]
fn deleting_bridge_observer_stops_forwarding() {
    let host = Rc::new(ManualHost::new(10, 10));
    let mut subject = ResizeSubject::new(host);
    let mut world = World::new();
    let token = setup_resize_bridge(&mut world, &mut subject);
    let mut schedule = bridge_schedule();
    schedule.run(&mut world);

    subject
        .delete_observer(token)
        .notify_observers(ResizeEvent::new(50, 50));
    schedule.run(&mut world);

    assert_eq!(*world.resource::<ViewportSize>(), ViewportSize { w: 10, h: 10 });
    assert!(world.resource::<ResizeBridge>().rx_event.is_empty());
}
