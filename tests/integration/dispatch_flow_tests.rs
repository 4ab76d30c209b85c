//! End-to-end dispatch: a toaster-style controller with a polled start
//! button, an interrupt-driven cancel button, and a restartable timer.

use anyhow::Result;
use eventer::config::DispatchConfig;
use eventer::dispatch::{DispatchLoop, Labels};
use eventer::error::FaultKind;
use eventer::events::{EventQueue, Millis, Payload};
use eventer::registry::Eventer;
use eventer::sources::{EdgeEvents, InterruptPinSource, PolledPin, Publisher, Timer, TimerMode};
use eventer::Error;

use crate::mock_hw::{ManualClock, MockButton, MockIrqPin};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum St {
    Idle,
    Toasting,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Ev {
    Start,
    Cancel,
    Timeout,
}

static STATES: [(St, &str); 3] = [
    (St::Idle, "IDLE"),
    (St::Toasting, "TOASTING"),
    (St::Done, "DONE"),
];
static EVENTS: [(Ev, &str); 3] = [
    (Ev::Start, "START"),
    (Ev::Cancel, "CANCEL"),
    (Ev::Timeout, "TIMEOUT"),
];

const TOAST_MS: Millis = 1000;

fn toaster<'t>(
    timer: &'t Timer<'_, Ev>,
    labels: Labels<St, Ev>,
) -> impl FnMut(St, Ev, Millis, Option<Payload>) -> eventer::Result<St> + 't {
    move |state, event, _ms, payload| match (state, event) {
        (St::Idle, Ev::Start) => {
            timer.start(None, None)?;
            Ok(St::Toasting)
        }
        (St::Toasting, Ev::Cancel) => {
            timer.cancel();
            Ok(St::Idle)
        }
        (St::Toasting, Ev::Timeout) => Ok(St::Done),
        (St::Done, Ev::Start) => Ok(St::Idle),
        // A timer that fired just before a cancel still delivers its event.
        (St::Idle, Ev::Timeout) => Ok(St::Idle),
        (St::Idle | St::Done, Ev::Cancel) => Ok(state),
        (St::Toasting, Ev::Start) => Err(labels.unrecognized_event(state, event)),
        (St::Done, Ev::Timeout) => Err(labels.unexpected_event(state, event, payload)),
    }
}

#[test]
fn start_then_timeout_reaches_done() -> Result<()> {
    let queue: EventQueue<Ev> = EventQueue::new();
    let clock = ManualClock::at(0);
    // The timer must outlive the cancel line, whose handler shares its
    // registry lifetime.
    let timer = Timer::new(
        Publisher::new(&queue, &clock),
        Ev::Timeout,
        TimerMode::OneShot,
        Some(TOAST_MS),
        None,
    );
    let start = MockButton::default();
    let cancel = MockIrqPin::default();
    let mut eventer = Eventer::new(&queue, &clock);
    eventer.register(PolledPin::new(
        eventer.publisher(),
        EdgeEvents::rising_only(Ev::Start),
        start.clone(),
        None,
    )?);
    eventer.register(InterruptPinSource::new(
        eventer.publisher(),
        EdgeEvents::rising_only(Ev::Cancel),
        cancel.clone(),
        None,
    )?);
    eventer.register(&timer);

    let labels = Labels::new(&STATES, &EVENTS);
    let mut dl = DispatchLoop::new(DispatchConfig { trace: true }, labels);
    let mut transition = toaster(&timer, labels);

    let mut state = dl.step(&mut eventer, &mut transition, St::Idle)?;
    assert_eq!(state, St::Idle);

    start.press();
    state = dl.step(&mut eventer, &mut transition, state)?;
    assert_eq!(state, St::Toasting);
    assert!(timer.is_running());

    start.release();
    clock.advance(TOAST_MS - 1);
    state = dl.step(&mut eventer, &mut transition, state)?;
    assert_eq!(state, St::Toasting);

    clock.advance(1);
    state = dl.step(&mut eventer, &mut transition, state)?;
    assert_eq!(state, St::Done);
    assert!(!timer.is_running());
    assert_eq!(dl.dispatched(), 2);
    Ok(())
}

#[test]
fn cancel_racing_timer_is_tolerated() -> Result<()> {
    let queue: EventQueue<Ev> = EventQueue::new();
    let clock = ManualClock::at(0);
    // The timer must outlive the cancel line, whose handler shares its
    // registry lifetime.
    let timer = Timer::new(
        Publisher::new(&queue, &clock),
        Ev::Timeout,
        TimerMode::OneShot,
        Some(TOAST_MS),
        None,
    );
    let start = MockButton::default();
    let cancel = MockIrqPin::default();
    let mut eventer = Eventer::new(&queue, &clock);
    eventer.register(PolledPin::new(
        eventer.publisher(),
        EdgeEvents::rising_only(Ev::Start),
        start.clone(),
        None,
    )?);
    eventer.register(InterruptPinSource::new(
        eventer.publisher(),
        EdgeEvents::rising_only(Ev::Cancel),
        cancel.clone(),
        None,
    )?);
    eventer.register(&timer);

    let labels = Labels::new(&STATES, &EVENTS);
    let mut dl = DispatchLoop::new(DispatchConfig::default(), labels);
    let mut transition = toaster(&timer, labels);

    start.press();
    let mut state = dl.step(&mut eventer, &mut transition, St::Idle)?;
    assert_eq!(state, St::Toasting);

    // Cancel lands in the queue, then the same iteration's scan fires the
    // timer behind it.
    clock.advance(TOAST_MS);
    cancel.edge(true);
    state = dl.step(&mut eventer, &mut transition, state)?;
    assert_eq!(state, St::Idle);
    assert_eq!(eventer.pending(), 1, "timeout already queued");

    state = dl.step(&mut eventer, &mut transition, state)?;
    assert_eq!(state, St::Idle);
    assert_eq!(eventer.pending(), 0);
    Ok(())
}

#[test]
fn run_stops_on_state_machine_fault() -> Result<()> {
    let queue: EventQueue<Ev> = EventQueue::new();
    let clock = ManualClock::at(0);
    let timer = Timer::new(
        Publisher::new(&queue, &clock),
        Ev::Timeout,
        TimerMode::OneShot,
        Some(TOAST_MS),
        None,
    );
    let mut eventer = Eventer::new(&queue, &clock);
    eventer.register(&timer);

    let labels = Labels::new(&STATES, &EVENTS);
    let mut dl = DispatchLoop::new(DispatchConfig::default(), labels);

    eventer.publish(Ev::Timeout, Some(Payload::User(3)));
    let err = match dl.run(&mut eventer, toaster(&timer, labels), St::Done) {
        Err(e) => e,
        Ok(never) => match never {},
    };

    match err {
        Error::StateMachine(fault) => {
            assert_eq!(fault.kind, FaultKind::UnexpectedEvent);
            assert_eq!(fault.message.as_str(), "Unexpected TIMEOUT:3 in DONE");
        }
        other => anyhow::bail!("expected a state machine fault, got {other}"),
    }
    Ok(())
}
