//! Data-model validation tests
//!
//! Covers settings normalization, lane geometry, the signal state
//! machine and the fixed-step accumulator.

use junction_sim::simulation::{
    build_lanes, Axis, FixedStepper, LaneId, Settings, SettingsPatch, SignalMode, SignalState,
    MAX_LANE_DENSITY, MAX_SPAWN_RATE_PER_MIN, MAX_SPEED_MULTIPLIER, MIN_LANE_DENSITY,
    MIN_SPAWN_RATE_PER_MIN, MIN_SPEED_MULTIPLIER, PHASE_DURATION_MS,
};

#[test]
fn test_default_settings() {
    let settings = Settings::default();
    assert_eq!(settings.spawn_rate_per_min, 60.0);
    assert_eq!(settings.speed_multiplier, 1.0);
    assert_eq!(settings.signal_mode, SignalMode::Auto);
    assert_eq!(settings.lane_density, 0.6);
}

#[test]
fn test_normalize_empty_patch_yields_defaults() {
    let settings = Settings::normalized(SettingsPatch::default());
    assert_eq!(settings, Settings::default());
}

#[test]
fn test_normalize_clamps_every_field() {
    let settings = Settings::normalized(SettingsPatch {
        spawn_rate_per_min: Some(999.0),
        speed_multiplier: Some(0.01),
        signal_mode: Some("blink".to_string()),
        lane_density: Some(7.5),
    });
    assert_eq!(settings.spawn_rate_per_min, MAX_SPAWN_RATE_PER_MIN);
    assert_eq!(settings.speed_multiplier, MIN_SPEED_MULTIPLIER);
    assert_eq!(settings.signal_mode, SignalMode::Blink);
    assert_eq!(settings.lane_density, MAX_LANE_DENSITY);

    let settings = Settings::normalized(SettingsPatch {
        spawn_rate_per_min: Some(1.0),
        speed_multiplier: Some(99.0),
        signal_mode: Some("off".to_string()),
        lane_density: Some(0.0),
    });
    assert_eq!(settings.spawn_rate_per_min, MIN_SPAWN_RATE_PER_MIN);
    assert_eq!(settings.speed_multiplier, MAX_SPEED_MULTIPLIER);
    assert_eq!(settings.signal_mode, SignalMode::Off);
    assert_eq!(settings.lane_density, MIN_LANE_DENSITY);
}

#[test]
fn test_normalize_rejects_garbage_input() {
    let settings = Settings::normalized(SettingsPatch {
        spawn_rate_per_min: Some(f32::NAN),
        speed_multiplier: Some(f32::INFINITY),
        signal_mode: Some("purple".to_string()),
        lane_density: Some(f32::NEG_INFINITY),
    });
    // Non-finite numbers and unrecognized modes fall back to defaults
    assert_eq!(settings, Settings::default());
}

#[test]
fn test_signal_mode_parse_round_trip() {
    for mode in [SignalMode::Auto, SignalMode::Blink, SignalMode::Off] {
        let parsed: SignalMode = mode.to_string().parse().expect("mode should parse");
        assert_eq!(parsed, mode);
    }
    assert!("sideways".parse::<SignalMode>().is_err());
    // Parsing tolerates case
    assert_eq!("BLINK".parse::<SignalMode>().unwrap(), SignalMode::Blink);
}

#[test]
fn test_with_patch_overrides_only_set_fields() {
    let base = Settings::normalized(SettingsPatch {
        spawn_rate_per_min: Some(80.0),
        ..Default::default()
    });

    let updated = base.with_patch(SettingsPatch {
        lane_density: Some(0.9),
        ..Default::default()
    });

    assert_eq!(updated.spawn_rate_per_min, 80.0);
    assert_eq!(updated.lane_density, 0.9);
    assert_eq!(updated.speed_multiplier, base.speed_multiplier);
    assert_eq!(updated.signal_mode, base.signal_mode);
}

#[test]
fn test_build_lanes_geometry() {
    let lanes = build_lanes(1280.0, 720.0);

    // Fixed order matching LaneId::ALL
    for (index, lane) in lanes.iter().enumerate() {
        assert_eq!(lane.id, LaneId::ALL[index]);
        assert_eq!(lane.id.index(), index);
        assert_eq!(lane.signal_group, lane.axis);
    }

    let east = &lanes[LaneId::Eastbound.index()];
    assert_eq!(east.axis, Axis::Horizontal);
    assert_eq!(east.length, 1400.0);
    assert_eq!(east.start.x, -60.0);
    assert_eq!(east.start.y, 326.0);
    assert_eq!((east.dir.x, east.dir.y), (1.0, 0.0));
    assert_eq!(east.stop_line_s, 630.0);
    assert_eq!(east.intersection_start_s, 655.0);
    assert_eq!(east.intersection_end_s, 745.0);

    let west = &lanes[LaneId::Westbound.index()];
    assert_eq!((west.dir.x, west.dir.y), (-1.0, 0.0));
    assert_eq!(west.start.y, 394.0);

    let south = &lanes[LaneId::Southbound.index()];
    assert_eq!(south.axis, Axis::Vertical);
    assert_eq!(south.length, 840.0);
    assert_eq!((south.dir.x, south.dir.y), (0.0, 1.0));
    assert_eq!(south.stop_line_s, 350.0);
    assert_eq!(south.start.x, 674.0);

    let north = &lanes[LaneId::Northbound.index()];
    assert_eq!((north.dir.x, north.dir.y), (0.0, -1.0));
    assert_eq!(north.start.x, 606.0);

    // Landmarks are ordered along every lane
    for lane in &lanes {
        assert!(lane.stop_line_s < lane.intersection_start_s);
        assert!(lane.intersection_start_s < lane.intersection_end_s);
        assert!(lane.intersection_end_s < lane.length);
    }
}

#[test]
fn test_lane_point_at_follows_direction() {
    let lanes = build_lanes(1280.0, 720.0);

    let east = &lanes[LaneId::Eastbound.index()];
    let point = east.point_at(60.0);
    assert_eq!((point.x, point.y), (0.0, 326.0));

    let south = &lanes[LaneId::Southbound.index()];
    let end = south.point_at(south.length);
    assert_eq!((end.x, end.y), (674.0, 780.0));
}

#[test]
fn test_signal_machine_flips_only_in_auto() {
    let mut signals = SignalState::new();
    assert_eq!(signals.phase, Axis::Horizontal);

    // Frozen outside auto mode
    signals.advance(SignalMode::Blink, 10_000);
    signals.advance(SignalMode::Off, 10_000);
    assert_eq!(signals.phase, Axis::Horizontal);
    assert_eq!(signals.phase_elapsed_ms, 0);

    // One tick short of the duration holds the phase
    signals.advance(SignalMode::Auto, PHASE_DURATION_MS - 100);
    assert_eq!(signals.phase, Axis::Horizontal);

    signals.advance(SignalMode::Auto, 100);
    assert_eq!(signals.phase, Axis::Vertical);
    assert_eq!(signals.phase_elapsed_ms, 0);
}

#[test]
fn test_signal_right_of_way() {
    let signals = SignalState::new();

    assert!(signals.allows(Axis::Horizontal, SignalMode::Auto));
    assert!(!signals.allows(Axis::Vertical, SignalMode::Auto));

    // Off and blink never withhold right-of-way
    assert!(signals.allows(Axis::Vertical, SignalMode::Off));
    assert!(signals.allows(Axis::Vertical, SignalMode::Blink));
}

#[test]
fn test_stepper_pays_out_fixed_steps() {
    let mut stepper = FixedStepper::new();

    assert_eq!(stepper.advance(250), 2);
    // 50 ms carried over from the previous frame
    assert_eq!(stepper.advance(50), 1);
    assert_eq!(stepper.advance(99), 0);
    assert_eq!(stepper.advance(1), 1);
}

#[test]
fn test_stepper_caps_frame_delta() {
    let mut stepper = FixedStepper::new();
    // A stall delivers at most one second of catch-up
    assert_eq!(stepper.advance(30_000), 10);
    assert_eq!(stepper.advance(0), 0);
}

#[test]
fn test_stepper_reset_drops_remainder() {
    let mut stepper = FixedStepper::new();
    assert_eq!(stepper.advance(150), 1);
    stepper.reset();
    assert_eq!(stepper.advance(99), 0);
}
