//! The particle-network widget: state, profile, pointer and loop bound to one
//! drawable surface.

use glam::Vec2;

use crate::animation::{AnimationLoop, CancelToken, FrameScheduler};
use crate::canvas::Canvas2d;
use crate::config::BackdropConfig;
use crate::input::{PointerAdapter, PointerState, PointerTracker, PointerUpdate};
use crate::particle::Particle;
use crate::profile::{DeviceProfile, Viewport};
use crate::render::{FrameStats, Renderer};
use crate::rules::{step_all, Rule, StepContext};
use crate::spawn::SpawnContext;

/// Everything the simulation step reads and writes, with no surface attached.
#[derive(Debug, Clone)]
pub struct NetworkState {
    pub particles: Vec<Particle>,
    /// Canvas size in pixels.
    pub bounds: Vec2,
    pub spawn: SpawnContext,
    /// Bumped every time the collection is rebuilt.
    pub generation: u64,
}

impl NetworkState {
    pub fn new(count: usize, bounds: Vec2, mut spawn: SpawnContext) -> Self {
        let particles = spawn.spawn_many(count, bounds);
        Self {
            particles,
            bounds,
            spawn,
            generation: 0,
        }
    }

    /// Discard every particle and spawn `count` fresh ones.
    pub fn reinitialize(&mut self, count: usize) {
        self.particles = self.spawn.spawn_many(count, self.bounds);
        self.generation += 1;
    }

    /// Advance every particle by one frame.
    pub fn step(&mut self, rules: &[Rule], pointer: &PointerState) {
        let mut ctx = StepContext {
            bounds: self.bounds,
            pointer,
            spawn: &mut self.spawn,
        };
        step_all(&mut self.particles, rules, &mut ctx);
    }
}

/// One particle network bound to one canvas.
///
/// ```ignore
/// let widget = NeuralNetworkWidget::bind(Some(canvas), viewport, config, &mut scheduler);
/// // on every display frame:
/// widget.frame(&mut scheduler);
/// ```
pub struct NeuralNetworkWidget<C: Canvas2d> {
    canvas: C,
    state: NetworkState,
    rules: Vec<Rule>,
    renderer: Renderer,
    pointer: PointerTracker,
    profile: DeviceProfile,
    viewport: Viewport,
    config: BackdropConfig,
    animation: AnimationLoop,
    last_stats: FrameStats,
}

impl<C: Canvas2d> NeuralNetworkWidget<C> {
    /// Bind to `canvas` and start the loop.
    ///
    /// Declines (returns `None`) when there is no surface to draw on, so a
    /// page without the canvas element simply has no backdrop. An invalid
    /// configuration is declined the same way.
    pub fn bind(
        canvas: Option<C>,
        viewport: Viewport,
        config: BackdropConfig,
        scheduler: &mut dyn FrameScheduler,
    ) -> Option<Self> {
        let Some(canvas) = canvas else {
            tracing::warn!("no drawable surface; particle network not started");
            return None;
        };
        if let Err(e) = config.validate() {
            tracing::warn!(error = %e, "invalid configuration; particle network not started");
            return None;
        }
        let spawn = SpawnContext::new(&config.simulation);
        let mut widget = Self::with_spawn(canvas, viewport, config, spawn);
        widget.start(scheduler);
        Some(widget)
    }

    /// Build an idle widget with an explicit random source.
    pub fn with_spawn(
        mut canvas: C,
        viewport: Viewport,
        config: BackdropConfig,
        spawn: SpawnContext,
    ) -> Self {
        let viewport = viewport.with_touch(viewport.touch_capable || config.touch);
        let profile = DeviceProfile::resolve(&viewport, &config.profile);
        canvas.resize(viewport.width as u32, viewport.height as u32);
        let state = NetworkState::new(profile.particle_count, canvas.size(), spawn);

        tracing::info!(
            class = ?profile.class,
            particles = profile.particle_count,
            width = viewport.width,
            height = viewport.height,
            "particle network initialized"
        );
        if config.reduced_motion {
            tracing::info!("reduced motion preference detected; animations minimized");
        }

        Self {
            canvas,
            state,
            rules: Rule::defaults(&config.simulation),
            renderer: Renderer::new(&config.visuals),
            pointer: PointerTracker::new(config.simulation.pointer_radius),
            profile,
            viewport,
            config,
            animation: AnimationLoop::new(),
            last_stats: FrameStats::default(),
        }
    }

    pub fn start(&mut self, scheduler: &mut dyn FrameScheduler) -> bool {
        self.animation.start(scheduler)
    }

    /// One display frame: simulate, render, reschedule.
    ///
    /// Returns `false` once the widget has been disposed.
    pub fn frame(&mut self, scheduler: &mut dyn FrameScheduler) -> bool {
        let Self {
            canvas,
            state,
            rules,
            renderer,
            pointer,
            profile,
            animation,
            last_stats,
            ..
        } = self;

        animation.tick(scheduler, || {
            state.step(rules, pointer.state());
            *last_stats = renderer.draw(canvas, &state.particles, profile);
        })
    }

    /// React to a viewport change.
    ///
    /// The canvas always takes the new size. The particle collection is
    /// rebuilt only when the device class flips; otherwise particles keep
    /// their state and the next bounce check pulls them into the new bounds.
    pub fn resize(&mut self, viewport: Viewport) {
        let viewport = viewport.with_touch(
            viewport.touch_capable || self.viewport.touch_capable || self.config.touch,
        );
        let profile = DeviceProfile::resolve(&viewport, &self.config.profile);

        self.canvas
            .resize(viewport.width as u32, viewport.height as u32);
        self.state.bounds = self.canvas.size();
        self.viewport = viewport;

        if profile.class != self.profile.class {
            tracing::info!(
                from = ?self.profile.class,
                to = ?profile.class,
                particles = profile.particle_count,
                "device class changed; reinitializing particles"
            );
            self.state.reinitialize(profile.particle_count);
        }
        self.profile = profile;
    }

    /// Mark the device as touch capable, e.g. after the first touch event.
    pub fn set_touch_capable(&mut self) {
        if !self.viewport.touch_capable {
            self.resize(self.viewport.with_touch(true));
        }
    }

    pub fn apply_pointer(&mut self, update: PointerUpdate) {
        self.pointer.apply(update);
    }

    /// Feed a raw event through one of the pointer adapters.
    pub fn feed_pointer<A: PointerAdapter>(&mut self, adapter: &A, event: &A::Event) -> bool {
        self.pointer.feed(adapter, event)
    }

    /// Stop the loop; pending frames become no-ops.
    pub fn dispose(&mut self) {
        self.animation.dispose();
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.animation.token()
    }

    pub fn is_running(&self) -> bool {
        self.animation.is_running()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.state.particles
    }

    pub fn state(&self) -> &NetworkState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut NetworkState {
        &mut self.state
    }

    pub fn profile(&self) -> &DeviceProfile {
        &self.profile
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn pointer(&self) -> &PointerState {
        self.pointer.state()
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut C {
        &mut self.canvas
    }

    pub fn last_stats(&self) -> FrameStats {
        self.last_stats
    }

    pub fn frames(&self) -> u64 {
        self.animation.clock().frame()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::CountingScheduler;
    use crate::canvas::{DrawCommand, Recorder};
    use crate::config::SimulationConfig;
    use crate::profile::DeviceClass;

    fn widget(width: f32) -> NeuralNetworkWidget<Recorder> {
        let spawn = SpawnContext::with_seed(&SimulationConfig::default(), 5);
        NeuralNetworkWidget::with_spawn(
            Recorder::new(1, 1),
            Viewport::new(width, 700.0),
            BackdropConfig::default(),
            spawn,
        )
    }

    #[test]
    fn test_bind_without_surface_declines() {
        let mut scheduler = CountingScheduler::default();
        let widget = NeuralNetworkWidget::<Recorder>::bind(
            None,
            Viewport::new(1200.0, 800.0),
            BackdropConfig::default(),
            &mut scheduler,
        );
        assert!(widget.is_none());
        assert_eq!(scheduler.requests, 0);
    }

    #[test]
    fn test_bind_rejects_invalid_config() {
        let mut config = BackdropConfig::default();
        config.simulation.min_radius = 2.0;
        config.simulation.max_radius = 2.0;
        let mut scheduler = CountingScheduler::default();
        let widget = NeuralNetworkWidget::bind(
            Some(Recorder::new(1, 1)),
            Viewport::new(1200.0, 800.0),
            config,
            &mut scheduler,
        );
        assert!(widget.is_none());
        assert_eq!(scheduler.requests, 0);
    }

    #[test]
    fn test_bind_starts_loop() {
        let mut scheduler = CountingScheduler::default();
        let widget = NeuralNetworkWidget::bind(
            Some(Recorder::new(1, 1)),
            Viewport::new(1200.0, 800.0),
            BackdropConfig::default(),
            &mut scheduler,
        )
        .unwrap();
        assert!(widget.is_running());
        assert_eq!(scheduler.requests, 1);
        assert_eq!(widget.canvas().size(), Vec2::new(1200.0, 800.0));
        assert_eq!(widget.particles().len(), 80);
        assert_eq!(
            widget.canvas().commands().first(),
            Some(&DrawCommand::Resize {
                width: 1200,
                height: 800
            })
        );
    }

    #[test]
    fn test_config_touch_forces_mobile() {
        let mut config = BackdropConfig::default();
        config.touch = true;
        let widget = NeuralNetworkWidget::with_spawn(
            Recorder::new(1, 1),
            Viewport::new(1600.0, 900.0),
            config,
            SpawnContext::with_seed(&SimulationConfig::default(), 1),
        );
        assert_eq!(widget.profile().class, DeviceClass::Mobile);
        assert_eq!(widget.particles().len(), 35);
    }

    #[test]
    fn test_resize_within_class_keeps_particles() {
        let mut w = widget(1200.0);
        let before = w.particles().to_vec();
        w.resize(Viewport::new(1400.0, 900.0));

        assert_eq!(w.particles(), &before[..]);
        assert_eq!(w.state().generation, 0);
        assert_eq!(w.state().bounds, Vec2::new(1400.0, 900.0));
    }

    #[test]
    fn test_touch_event_flips_to_mobile() {
        let mut w = widget(1200.0);
        w.set_touch_capable();
        assert!(w.profile().is_mobile());
        assert_eq!(w.particles().len(), 35);
        assert_eq!(w.state().generation, 1);

        // Touch capability is sticky across later resizes.
        w.resize(Viewport::new(1920.0, 1080.0));
        assert!(w.profile().is_mobile());
        assert_eq!(w.state().generation, 1);
    }

    #[test]
    fn test_frame_draws_every_particle() {
        let mut scheduler = CountingScheduler::default();
        let mut w = widget(1200.0);
        w.start(&mut scheduler);
        assert!(w.frame(&mut scheduler));

        // Two fills per particle: plain, then glowing.
        assert_eq!(w.canvas().circles().count(), 160);
        assert_eq!(w.last_stats().particles, 80);
        assert_eq!(w.frames(), 1);
    }

    #[test]
    fn test_dispose_stops_frames() {
        let mut scheduler = CountingScheduler::default();
        let mut w = widget(1200.0);
        w.start(&mut scheduler);
        w.dispose();

        let before = w.particles().to_vec();
        assert!(!w.frame(&mut scheduler));
        assert_eq!(w.particles(), &before[..]);
        assert_eq!(scheduler.requests, 1);
    }
}
