//! Integration tests for the particle-network widget.
//!
//! These drive the widget end to end through the public API: a recording
//! canvas stands in for the drawing surface and a counting scheduler for the
//! display's frame callback.

use neural_backdrop::prelude::*;
use neural_backdrop::{DrawCommand, NetworkState, PointerState};

fn config() -> BackdropConfig {
    BackdropConfig::default()
}

fn seeded(seed: u64) -> SpawnContext {
    SpawnContext::with_seed(&config().simulation, seed)
}

fn desktop_widget(seed: u64) -> NeuralNetworkWidget<Recorder> {
    NeuralNetworkWidget::with_spawn(
        Recorder::new(1, 1),
        Viewport::new(1200.0, 800.0),
        config(),
        seeded(seed),
    )
}

// ============================================================================
// Rendering
// ============================================================================

#[test]
fn test_two_particles_100_apart_draw_one_faded_line() {
    let mut widget = desktop_widget(1);
    let mut scheduler = CountingScheduler::default();
    // Same velocity for both, so the gap stays 100 through the step.
    let velocity = Vec2::new(0.1, 0.1);
    widget.state_mut().particles = vec![
        Particle::new(Vec2::new(100.0, 100.0), velocity, 2.0),
        Particle::new(Vec2::new(200.0, 100.0), velocity, 2.0),
    ];

    widget.start(&mut scheduler);
    assert!(widget.frame(&mut scheduler));

    let frame = widget.canvas().last_frame();
    let lines: Vec<_> = frame
        .iter()
        .filter_map(|c| match c {
            DrawCommand::Line { width, color, .. } => Some((*width, *color)),
            _ => None,
        })
        .collect();
    assert_eq!(lines.len(), 1);

    let (width, color) = lines[0];
    assert_eq!(width, 2.5);
    let expected = (1.0 - 100.0 / 150.0) * 0.8;
    assert!((color.a - expected).abs() < 1e-4, "opacity {}", color.a);
    assert!((color.a - 0.2667).abs() < 1e-3);
    assert_eq!(widget.last_stats().connections, 1);
}

#[test]
fn test_circles_use_profile_size_multiplier() {
    let mut widget = desktop_widget(2);
    let mut scheduler = CountingScheduler::default();
    widget.state_mut().particles = vec![Particle::new(
        Vec2::new(300.0, 300.0),
        Vec2::new(0.1, -0.1),
        2.0,
    )];
    widget.start(&mut scheduler);
    widget.frame(&mut scheduler);

    let radii: Vec<f32> = widget
        .canvas()
        .last_frame()
        .iter()
        .filter_map(|c| match c {
            DrawCommand::Circle { radius, .. } => Some(*radius),
            _ => None,
        })
        .collect();
    // Plain fill plus glow fill.
    assert_eq!(radii, vec![3.0, 3.0]);
}

#[test]
fn test_snapshot_pixels_show_particles() {
    let cfg = config();
    let canvas = RasterCanvas::new(1, 1).with_background(cfg.visuals.background);
    let mut widget = NeuralNetworkWidget::with_spawn(
        canvas,
        Viewport::new(400.0, 300.0),
        cfg.clone(),
        seeded(3),
    );
    widget.state_mut().particles = vec![Particle::new(
        Vec2::new(200.0, 150.0),
        Vec2::new(0.1, 0.1),
        2.0,
    )];
    let mut scheduler = CountingScheduler::default();
    widget.start(&mut scheduler);
    widget.frame(&mut scheduler);

    let center = widget.particles()[0].position;
    let lit = widget.canvas().pixel(center.x as u32, center.y as u32);
    assert!(lit.g > 0.6 && lit.b > 0.8, "particle pixel {lit:?}");

    let corner = widget.canvas().pixel(0, 0);
    let bg = cfg.visuals.background;
    assert!((corner.r - bg.r).abs() < 0.01 && (corner.b - bg.b).abs() < 0.01);
}

// ============================================================================
// Device profile
// ============================================================================

#[test]
fn test_class_flip_reinitializes_with_new_count() {
    let mut widget = desktop_widget(4);
    assert_eq!(widget.particles().len(), 80);
    assert_eq!(widget.state().generation, 0);

    widget.resize(Viewport::new(500.0, 800.0));
    assert_eq!(widget.profile().class, DeviceClass::Mobile);
    assert_eq!(widget.particles().len(), 35);
    assert_eq!(widget.state().generation, 1);

    // Staying mobile keeps the particles.
    let before = widget.particles().to_vec();
    widget.resize(Viewport::new(600.0, 900.0));
    assert_eq!(widget.particles(), &before[..]);
    assert_eq!(widget.state().generation, 1);

    widget.resize(Viewport::new(1200.0, 800.0));
    assert_eq!(widget.particles().len(), 80);
    assert_eq!(widget.state().generation, 2);
}

#[test]
fn test_shrinking_resize_turns_stragglers_inward() {
    let mut widget = desktop_widget(10);
    let mut scheduler = CountingScheduler::default();
    // Speeds well above the floor, so only the edge bounce can flip a sign.
    for p in &mut widget.state_mut().particles {
        p.velocity = Vec2::new(0.2f32.copysign(p.velocity.x), 0.2f32.copysign(p.velocity.y));
    }

    widget.resize(Viewport::new(900.0, 500.0));
    assert_eq!(widget.profile().class, DeviceClass::Desktop);
    assert_eq!(widget.state().generation, 0);
    let bounds = widget.state().bounds;
    assert_eq!(bounds, Vec2::new(900.0, 500.0));

    let before = widget.particles().to_vec();
    let outside = before
        .iter()
        .filter(|p| p.position.x > bounds.x + 1.0 || p.position.y > bounds.y + 1.0)
        .count();
    assert!(outside > 0, "seed left no particle outside the smaller canvas");

    widget.start(&mut scheduler);
    widget.frame(&mut scheduler);

    for (old, new) in before.iter().zip(widget.particles()) {
        if old.position.x > bounds.x + 1.0 {
            assert!(new.velocity.x < 0.0, "x straggler {old:?} -> {new:?}");
        }
        if old.position.y > bounds.y + 1.0 {
            assert!(new.velocity.y < 0.0, "y straggler {old:?} -> {new:?}");
        }
    }
    assert_eq!(widget.particles().len(), 80);
    assert_eq!(widget.state().generation, 0);
}

#[test]
fn test_profile_thresholds() {
    let profile = profile_at(500.0, false);
    assert_eq!((profile.class, profile.particle_count), (DeviceClass::Mobile, 35));

    let profile = profile_at(768.0, false);
    assert_eq!(profile.class, DeviceClass::Mobile);

    let profile = profile_at(1200.0, false);
    assert_eq!((profile.class, profile.particle_count), (DeviceClass::Desktop, 80));

    let profile = profile_at(1200.0, true);
    assert_eq!(profile.class, DeviceClass::Mobile);
}

fn profile_at(width: f32, touch: bool) -> DeviceProfile {
    DeviceProfile::resolve(
        &Viewport::new(width, 800.0).with_touch(touch),
        &config().profile,
    )
}

// ============================================================================
// Simulation properties
// ============================================================================

#[test]
fn test_velocity_never_rests_below_floor() {
    let cfg = config();
    let rules = Rule::defaults(&cfg.simulation);
    let pointer = PointerState::absent(cfg.simulation.pointer_radius);
    let mut state = NetworkState::new(80, Vec2::new(1200.0, 800.0), seeded(5));

    for frame in 0..2000 {
        state.step(&rules, &pointer);
        for p in &state.particles {
            assert!(
                p.velocity.x.abs() >= cfg.simulation.min_speed - 1e-6
                    && p.velocity.y.abs() >= cfg.simulation.min_speed - 1e-6,
                "frame {frame}: velocity {:?} below floor",
                p.velocity
            );
        }
    }
}

#[test]
fn test_particles_stay_near_bounds() {
    let cfg = config();
    let rules = Rule::defaults(&cfg.simulation);
    let pointer = PointerState::absent(cfg.simulation.pointer_radius);
    let bounds = Vec2::new(300.0, 200.0);
    let mut state = NetworkState::new(35, bounds, seeded(6));

    for _ in 0..5000 {
        state.step(&rules, &pointer);
        for p in &state.particles {
            assert!(p.position.x > -1.0 && p.position.x < bounds.x + 1.0);
            assert!(p.position.y > -1.0 && p.position.y < bounds.y + 1.0);
        }
    }
}

#[test]
fn test_absent_pointer_matches_rules_without_repulsion() {
    let cfg = config();
    let with_pointer_rule = Rule::defaults(&cfg.simulation);
    let without: Vec<Rule> = with_pointer_rule
        .iter()
        .filter(|r| !r.uses_pointer())
        .cloned()
        .collect();
    let pointer = PointerState::absent(cfg.simulation.pointer_radius);

    let mut a = NetworkState::new(40, Vec2::new(800.0, 600.0), seeded(7));
    let mut b = a.clone();
    for _ in 0..100 {
        a.step(&with_pointer_rule, &pointer);
        b.step(&without, &pointer);
    }
    assert_eq!(a.particles, b.particles);
}

#[test]
fn test_pointer_pushes_particles_away() {
    let mut widget = desktop_widget(8);
    let mut scheduler = CountingScheduler::default();
    widget.state_mut().particles = vec![Particle::new(
        Vec2::new(400.0, 400.0),
        Vec2::new(0.1, 0.1),
        2.0,
    )];
    widget.feed_pointer(&MouseAdapter, &MouseInput::Moved(Vec2::new(450.0, 400.0)));
    widget.start(&mut scheduler);
    widget.frame(&mut scheduler);

    // Pointer sits to the right, so the particle is pushed left.
    assert!(widget.particles()[0].velocity.x < 0.0);

    widget.feed_pointer(&MouseAdapter, &MouseInput::Left);
    assert!(widget.pointer().position.is_none());
}

// ============================================================================
// Loop lifecycle
// ============================================================================

#[test]
fn test_cancel_token_stops_the_loop() {
    let mut widget = desktop_widget(9);
    let mut scheduler = CountingScheduler::default();
    widget.start(&mut scheduler);
    assert!(widget.frame(&mut scheduler));
    let requested = scheduler.requests;

    widget.cancel_token().cancel();
    assert!(!widget.frame(&mut scheduler));
    assert_eq!(scheduler.requests, requested);
}
