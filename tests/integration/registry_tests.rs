//! Registry contracts: FIFO across producers, one-and-done scans,
//! registration priority, and unregister.

use anyhow::Result;
use eventer::Error;
use eventer::events::{EventQueue, Payload};
use eventer::registry::Eventer;
use eventer::sources::{EdgeEvents, InterruptPinSource, PolledPin};

use crate::mock_hw::{ManualClock, MockButton, MockIrqPin};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Ev {
    CancelDown,
    CancelUp,
    StartDown,
    StartUp,
    Door,
    App,
}

#[test]
fn fifo_across_polled_interrupt_and_application_producers() -> Result<()> {
    let queue: EventQueue<Ev> = EventQueue::new();
    let clock = ManualClock::at(100);
    let door = MockIrqPin::default();
    let start = MockButton::default();
    let mut eventer = Eventer::new(&queue, &clock);

    eventer.register(PolledPin::new(
        eventer.publisher(),
        EdgeEvents::both(Ev::StartDown, Ev::StartUp),
        start.clone(),
        None,
    )?);
    eventer.register(InterruptPinSource::new(
        eventer.publisher(),
        EdgeEvents::rising_only(Ev::Door),
        door.clone(),
        None,
    )?);

    door.edge(true);
    eventer.publish(Ev::App, Some(Payload::User(1)));
    start.press();
    clock.advance(5);
    assert!(eventer.poll_once());
    door.edge(false); // falling edge not enabled
    door.edge(true);

    let order: Vec<Ev> = std::iter::from_fn(|| eventer.next()).map(|e| e.id).collect();
    assert_eq!(order, vec![Ev::Door, Ev::App, Ev::StartDown, Ev::Door]);
    Ok(())
}

#[test]
fn earlier_registration_wins_the_scan() -> Result<()> {
    let queue: EventQueue<Ev> = EventQueue::new();
    let clock = ManualClock::at(0);
    let cancel = MockButton::default();
    let start = MockButton::default();
    let mut eventer = Eventer::new(&queue, &clock);

    eventer.register(PolledPin::new(
        eventer.publisher(),
        EdgeEvents::both(Ev::CancelDown, Ev::CancelUp),
        cancel.clone(),
        None,
    )?);
    eventer.register(PolledPin::new(
        eventer.publisher(),
        EdgeEvents::both(Ev::StartDown, Ev::StartUp),
        start.clone(),
        None,
    )?);

    cancel.press();
    start.press();

    assert!(eventer.poll_once());
    assert_eq!(eventer.pending(), 1, "one and done");
    assert_eq!(eventer.next().map(|e| e.id), Some(Ev::CancelDown));

    assert!(eventer.poll_once());
    assert_eq!(eventer.next().map(|e| e.id), Some(Ev::StartDown));
    assert!(!eventer.poll_once());
    Ok(())
}

#[test]
fn unregister_releases_interrupt_and_rejects_unknown_id() -> Result<()> {
    let queue: EventQueue<Ev> = EventQueue::new();
    let clock = ManualClock::at(0);
    let door = MockIrqPin::default();
    let mut eventer = Eventer::new(&queue, &clock);

    let id = eventer.register(InterruptPinSource::new(
        eventer.publisher(),
        EdgeEvents::both(Ev::Door, Ev::Door),
        door.clone(),
        None,
    )?);
    assert!(door.is_listening());
    assert!(!eventer.requires_polling());

    eventer.unregister(id)?;
    assert!(!door.is_listening());
    door.edge(true);
    assert_eq!(eventer.pending(), 0);

    assert_eq!(eventer.unregister(id), Err(Error::NotFound(id)));
    Ok(())
}

#[test]
fn unregistered_polled_source_is_never_polled_again() -> Result<()> {
    let queue: EventQueue<Ev> = EventQueue::new();
    let clock = ManualClock::at(0);
    let start = MockButton::default();
    let mut eventer = Eventer::new(&queue, &clock);

    let id = eventer.register(PolledPin::new(
        eventer.publisher(),
        EdgeEvents::both(Ev::StartDown, Ev::StartUp),
        start.clone(),
        None,
    )?);
    eventer.unregister(id)?;

    start.press();
    assert!(!eventer.poll_once());
    assert_eq!(eventer.next(), None);
    Ok(())
}

#[test]
fn full_queue_drops_and_counts() {
    let queue: EventQueue<Ev, 4> = EventQueue::new();
    let clock = ManualClock::at(0);
    let eventer = Eventer::new(&queue, &clock);

    for _ in 0..4 {
        assert!(eventer.publish(Ev::App, None));
    }
    assert!(!eventer.publish(Ev::Door, None));
    assert_eq!(eventer.dropped(), 1);
    assert_eq!(eventer.pending(), 4);

    // Accepted events are still delivered in order.
    assert!(std::iter::from_fn(|| eventer.next()).all(|e| e.id == Ev::App));
}
