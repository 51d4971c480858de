//! End-to-end tests for `SentryService` against `MockHardware`.

use crate::mock_hw::{ActuatorCall, MockHardware, MockSink, cold_frame, frame_with_peak};

use fireguard::adapters::log_sink::render;
use fireguard::app::events::{AppEvent, DirectionReason};
use fireguard::app::service::SentryService;
use fireguard::config::{InitFailurePolicy, SentryConfig};
use fireguard::control::patrol::Direction;
use fireguard::error::{BusError, ConfigStep, Error};
use fireguard::fsm::StateId;
use fireguard::report::{MATRIX_END, MATRIX_TITLE};

// ── Helpers ───────────────────────────────────────────────────

fn started(config: SentryConfig) -> (SentryService, MockHardware, MockSink) {
    let mut app = SentryService::new(config).unwrap();
    let mut hw = MockHardware::new();
    let mut sink = MockSink::new();
    app.bring_up(&mut hw, &mut sink).unwrap();
    app.start(&mut sink);
    (app, hw, sink)
}

fn run(app: &mut SentryService, hw: &mut MockHardware, sink: &mut MockSink, ticks: usize) {
    for _ in 0..ticks {
        app.tick(hw, sink);
    }
}

/// Drive the default service into Alert at position 400.
fn alerting() -> (SentryService, MockHardware, MockSink) {
    let (mut app, mut hw, mut sink) = started(SentryConfig::default());
    run(&mut app, &mut hw, &mut sink, 399);
    hw.push_frame(frame_with_peak(6_000, 2, 14));
    app.tick(&mut hw, &mut sink);
    assert_eq!(app.state(), StateId::Alert);
    (app, hw, sink)
}

// ── Lifecycle ─────────────────────────────────────────────────

#[test]
fn start_emits_initial_state() {
    let (app, hw, sink) = started(SentryConfig::default());
    assert_eq!(app.state(), StateId::Scanning);
    assert_eq!(app.direction(), Direction::Retreating);
    assert_eq!(app.position(), 0);
    assert_eq!(hw.init_calls, 1);
    assert!(matches!(sink.events[0], AppEvent::Started(StateId::Scanning)));
}

// ── Patrol ────────────────────────────────────────────────────

#[test]
fn reading_every_twenty_steps() {
    let (mut app, mut hw, mut sink) = started(SentryConfig::default());

    run(&mut app, &mut hw, &mut sink, 19);
    assert_eq!(hw.steps(), 19);
    assert_eq!(hw.acquisitions, 0);

    app.tick(&mut hw, &mut sink);
    assert_eq!(hw.acquisitions, 1);
    let report = sink.events.iter().find_map(|e| match e {
        AppEvent::Reading(r) => Some(*r),
        _ => None,
    });
    let report = report.unwrap();
    assert_eq!(report.position, 20);
    assert_eq!(report.sweep_range, 800);

    run(&mut app, &mut hw, &mut sink, 80);
    assert_eq!(hw.acquisitions, 5);
    assert_eq!(app.tick_count(), 100);
}

#[test]
fn sweep_reverses_at_range() {
    let (mut app, mut hw, mut sink) = started(SentryConfig::default());

    run(&mut app, &mut hw, &mut sink, 799);
    assert_eq!(app.position(), 799);
    assert_eq!(hw.last_step(), Some(Direction::Retreating));

    app.tick(&mut hw, &mut sink);
    assert_eq!(app.position(), 0);
    assert_eq!(app.direction(), Direction::Advancing);
    assert_eq!(
        sink.count(|e| matches!(
            e,
            AppEvent::DirectionChanged {
                direction: Direction::Advancing,
                reason: DirectionReason::SweepBoundary,
            }
        )),
        1
    );

    app.tick(&mut hw, &mut sink);
    assert_eq!(hw.last_step(), Some(Direction::Advancing));
    assert_eq!(app.position(), 1);
}

#[test]
fn homing_turns_towards_low_columns_once() {
    let mut config = SentryConfig::default();
    config.initial_direction = Direction::Advancing;
    let (mut app, mut hw, mut sink) = started(config);

    hw.push_frame(frame_with_peak(6_000, 4, 5));
    hw.push_frame(frame_with_peak(6_000, 4, 6));
    run(&mut app, &mut hw, &mut sink, 20);
    assert_eq!(app.direction(), Direction::Retreating);
    assert_eq!(app.state(), StateId::Scanning);

    // already homing: no second flip
    run(&mut app, &mut hw, &mut sink, 20);
    assert_eq!(app.direction(), Direction::Retreating);
    assert_eq!(
        sink.count(|e| matches!(
            e,
            AppEvent::DirectionChanged {
                reason: DirectionReason::Homing,
                ..
            }
        )),
        1
    );
    assert_eq!(hw.last_step(), Some(Direction::Retreating));
}

#[test]
fn threshold_is_exclusive() {
    let (mut app, mut hw, mut sink) = started(SentryConfig::default());
    hw.push_frame(frame_with_peak(5_000, 2, 14));
    run(&mut app, &mut hw, &mut sink, 20);
    assert_eq!(app.state(), StateId::Scanning);
}

#[test]
fn hot_spot_beyond_band_is_ignored() {
    let mut config = SentryConfig::default();
    config.band_min_col = 8;
    config.band_max_col = 10;
    let (mut app, mut hw, mut sink) = started(config);

    hw.push_frame(frame_with_peak(6_000, 2, 14));
    run(&mut app, &mut hw, &mut sink, 20);
    assert_eq!(app.state(), StateId::Scanning);
    assert_eq!(app.direction(), Direction::Retreating);
    assert_eq!(sink.count(|e| matches!(e, AppEvent::DirectionChanged { .. })), 0);
}

// ── Alert ─────────────────────────────────────────────────────

#[test]
fn in_band_hazard_stops_the_head() {
    let (mut app, mut hw, mut sink) = alerting();

    assert_eq!(app.position(), 400);
    assert_eq!(hw.steps(), 400);
    assert_eq!(
        sink.count(|e| matches!(e, AppEvent::HazardConfirmed { peak, .. } if peak.col == 14)),
        1
    );
    assert_eq!(
        sink.count(|e| matches!(
            e,
            AppEvent::StateChanged {
                from: StateId::Scanning,
                to: StateId::Alert,
            }
        )),
        1
    );

    hw.push_frame(frame_with_peak(6_200, 2, 13));
    app.tick(&mut hw, &mut sink);
    assert_eq!(hw.steps(), 400);
}

#[test]
fn alert_cadence_runs_routine_in_order() {
    let (mut app, mut hw, mut sink) = alerting();
    hw.distance_cm = 87.5;
    hw.clear();

    hw.push_frame(frame_with_peak(6_200, 2, 13));
    app.tick(&mut hw, &mut sink);

    assert_eq!(
        hw.calls,
        vec![
            ActuatorCall::Range,
            ActuatorCall::Alarm,
            ActuatorCall::Indicator(0),
            ActuatorCall::Pause(1000),
            ActuatorCall::Indicator(105),
            ActuatorCall::Pause(1000),
            ActuatorCall::Pause(1000),
        ]
    );
    assert!(sink.events.iter().any(|e| matches!(
        e,
        AppEvent::AlertTick { peak, distance_cm, frame }
            if peak.value == 6_200 && *distance_cm == 87.5 && frame.peak == Some(*peak)
    )));
    assert_eq!(app.state(), StateId::Alert);
}

#[test]
fn every_alert_measurement_dumps_the_matrix() {
    let (mut app, mut hw, mut sink) = alerting();
    hw.push_frame(frame_with_peak(6_200, 2, 13));
    hw.push_frame(frame_with_peak(6_400, 3, 14));
    hw.push_frame(frame_with_peak(6_100, 2, 15));
    run(&mut app, &mut hw, &mut sink, 3);

    let mut titles = 0;
    let mut ends = 0;
    for event in &sink.events {
        render(event, |_, line| {
            if line == MATRIX_TITLE {
                titles += 1;
            }
            if line == MATRIX_END {
                ends += 1;
            }
        });
    }
    // one block for the confirmation, one per alert tick
    assert_eq!(sink.count(|e| matches!(e, AppEvent::AlertTick { .. })), 3);
    assert_eq!(titles, 4);
    assert_eq!(ends, 4);
}

#[test]
fn alert_clears_and_patrol_resumes_from_zero() {
    let (mut app, mut hw, mut sink) = alerting();
    hw.clear();

    hw.push_frame(cold_frame());
    app.tick(&mut hw, &mut sink);

    assert_eq!(app.state(), StateId::Scanning);
    assert_eq!(app.position(), 0);
    assert_eq!(app.direction(), Direction::Retreating);
    assert_eq!(hw.calls, vec![ActuatorCall::Pause(1000)]);
    assert_eq!(sink.count(|e| matches!(e, AppEvent::AlertCleared)), 1);

    app.tick(&mut hw, &mut sink);
    assert_eq!(hw.last_step(), Some(Direction::Retreating));
    assert_eq!(app.position(), 1);
}

#[test]
fn hazard_drifting_out_of_band_clears_alert() {
    let (mut app, mut hw, mut sink) = alerting();
    hw.push_frame(frame_with_peak(7_000, 2, 3));
    app.tick(&mut hw, &mut sink);
    assert_eq!(app.state(), StateId::Scanning);
}

#[test]
fn failed_read_during_alert_keeps_alerting() {
    let (mut app, mut hw, mut sink) = alerting();
    hw.clear();
    hw.push_error(Error::AcquisitionTimeout);
    app.tick(&mut hw, &mut sink);

    assert_eq!(app.state(), StateId::Alert);
    assert_eq!(hw.calls, vec![ActuatorCall::Pause(1000)]);
}

// ── Sensor failures ───────────────────────────────────────────

#[test]
fn failed_acquisition_skips_the_check() {
    let (mut app, mut hw, mut sink) = started(SentryConfig::default());
    hw.push_error(Error::Bus(BusError::Nack));
    run(&mut app, &mut hw, &mut sink, 20);

    assert_eq!(app.state(), StateId::Scanning);
    assert_eq!(
        sink.count(|e| matches!(e, AppEvent::AcquisitionFailed(Error::Bus(BusError::Nack)))),
        1
    );
    assert_eq!(sink.count(|e| matches!(e, AppEvent::Reading(_))), 0);

    // patrol carries on
    run(&mut app, &mut hw, &mut sink, 20);
    assert_eq!(sink.count(|e| matches!(e, AppEvent::Reading(_))), 1);
}

#[test]
fn reinitialize_policy_recovers_at_next_check() {
    let mut app = SentryService::new(SentryConfig::default()).unwrap();
    let mut hw = MockHardware::new();
    let mut sink = MockSink::new();
    hw.init_results.push_back(Err(Error::Config(ConfigStep::Identity)));
    hw.init_results.push_back(Err(Error::Config(ConfigStep::RefreshRate)));

    app.bring_up(&mut hw, &mut sink).unwrap();
    assert!(app.is_sensor_degraded());
    app.start(&mut sink);

    // first check: re-init fails again, no acquisition
    run(&mut app, &mut hw, &mut sink, 20);
    assert_eq!(hw.init_calls, 2);
    assert_eq!(hw.acquisitions, 0);
    assert!(app.is_sensor_degraded());

    // second check: re-init succeeds, reading follows
    run(&mut app, &mut hw, &mut sink, 20);
    assert_eq!(hw.init_calls, 3);
    assert_eq!(hw.acquisitions, 1);
    assert!(!app.is_sensor_degraded());
    assert_eq!(sink.count(|e| matches!(e, AppEvent::SensorRecovered)), 1);
    assert_eq!(sink.count(|e| matches!(e, AppEvent::Reading(_))), 1);
}

#[test]
fn continue_policy_never_reinitializes() {
    let mut config = SentryConfig::default();
    config.init_failure = InitFailurePolicy::Continue;
    let mut app = SentryService::new(config).unwrap();
    let mut hw = MockHardware::new();
    let mut sink = MockSink::new();
    hw.init_results.push_back(Err(Error::Config(ConfigStep::Identity)));

    app.bring_up(&mut hw, &mut sink).unwrap();
    app.start(&mut sink);
    run(&mut app, &mut hw, &mut sink, 60);

    assert_eq!(hw.init_calls, 1);
    assert_eq!(hw.acquisitions, 3);
    assert!(app.is_sensor_degraded());
}

#[test]
fn zero_check_interval_is_refused() {
    let mut config = SentryConfig::default();
    config.steps_per_check = 0;
    assert!(SentryService::new(config).is_err());
}

#[test]
fn halt_policy_refuses_to_run() {
    let mut config = SentryConfig::default();
    config.init_failure = InitFailurePolicy::Halt;
    let mut app = SentryService::new(config).unwrap();
    let mut hw = MockHardware::new();
    let mut sink = MockSink::new();
    hw.init_results.push_back(Err(Error::Config(ConfigStep::ChessMode)));

    assert_eq!(
        app.bring_up(&mut hw, &mut sink),
        Err(Error::Config(ConfigStep::ChessMode))
    );
}
