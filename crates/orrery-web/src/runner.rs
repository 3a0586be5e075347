use orrery_engine::{
    build_instance_buffer, EngineContext, EngineError, FrameClock, FrameData, FrameLoop,
    FrameRequest, FrameScheduler, InputEvent, InstanceBuffer, RenderError, Renderer, View,
    ViewConfig, Viewport,
};

/// Generic view runner that wires up the engine loop.
///
/// Each concrete view (e.g., `solar-system`) keeps one runner in a
/// `thread_local!` and exports free functions via `#[wasm_bindgen]`, because
/// wasm-bindgen cannot export generic structs directly.
pub struct ViewRunner<V: View, S: FrameScheduler, R: Renderer> {
    view: V,
    ctx: EngineContext,
    frame_loop: FrameLoop<S>,
    clock: FrameClock,
    instances: InstanceBuffer,
    target: R,
    config: ViewConfig,
    initialized: bool,
}

impl<V: View, S: FrameScheduler, R: Renderer> ViewRunner<V, S, R> {
    pub fn new(view: V, scheduler: S, target: R, viewport: Viewport) -> Self {
        let config = view.config();
        Self {
            ctx: EngineContext::new(&config, viewport),
            frame_loop: FrameLoop::new(scheduler),
            clock: FrameClock::new(config.time_step),
            instances: InstanceBuffer::with_capacity(config.max_instances),
            view,
            target,
            config,
            initialized: false,
        }
    }

    /// Build the scene and publish the first frame. Call once after
    /// construction; on error the runner stays uninitialized.
    pub fn init(&mut self) -> Result<(), EngineError> {
        self.config.validate()?;
        self.view.init(&mut self.ctx)?;
        self.ctx.propagate_transforms();

        build_instance_buffer(self.ctx.scene.iter(), &self.ctx.points, &mut self.instances);
        if self.instances.instance_count() > self.config.max_instances {
            return Err(EngineError::CapacityExceeded {
                what: "instance",
                needed: self.instances.instance_count(),
                capacity: self.config.max_instances,
            });
        }
        if self.ctx.points.len() > self.config.max_points {
            return Err(EngineError::CapacityExceeded {
                what: "point",
                needed: self.ctx.points.len(),
                capacity: self.config.max_points,
            });
        }

        let viewport = self.ctx.camera.viewport();
        self.target.resize(viewport.width as u32, viewport.height as u32);
        self.initialized = true;
        log::info!(
            "initialized: {} entities, {} points, backend {}",
            self.ctx.scene.len(),
            self.ctx.points.len(),
            self.target.backend()
        );
        self.present_idle();
        Ok(())
    }

    /// Stopped → Running. Returns `Ok(false)` if nothing changed.
    pub fn start(&mut self) -> Result<bool, EngineError> {
        if !self.initialized {
            log::warn!("start ignored: view not initialized");
            return Ok(false);
        }
        self.clock.resync();
        let started = self.frame_loop.start()?;
        if started {
            log::info!("animation started");
        }
        Ok(started)
    }

    /// Any state → Stopped. Idempotent.
    pub fn stop(&mut self) -> bool {
        let was_running = self.frame_loop.stop();
        if was_running {
            log::info!("animation stopped");
        }
        was_running
    }

    /// Stop the loop and release scene resources. The runner must be
    /// re-created to be used again.
    pub fn destroy(&mut self) {
        self.stop();
        self.ctx.scene.clear();
        self.ctx.transforms.clear();
        self.ctx.points.clear();
        self.instances.clear();
        self.initialized = false;
        log::info!("view destroyed");
    }

    /// Frame callback from the scheduler: one tick plus present.
    pub fn on_frame(&mut self, request: FrameRequest, timestamp_ms: f64) {
        if !self.frame_loop.begin_frame(request) {
            log::debug!("dropping stale frame {:?}", request);
            return;
        }

        let step = self.clock.advance(timestamp_ms);
        self.view.update(&mut self.ctx, step);

        if let Err(e) = self.present() {
            log::error!("render failed, stopping animation: {e}");
            self.frame_loop.stop();
            return;
        }

        if let Err(e) = self.frame_loop.end_frame() {
            log::error!("could not schedule next frame: {e}");
        }
    }

    /// Apply an input event. Out-of-range values are ignored.
    pub fn input(&mut self, event: InputEvent) {
        if !self.initialized {
            log::warn!("input ignored: view not initialized");
            return;
        }
        if !event.is_finite() {
            log::warn!("ignoring non-finite input {:?}", event);
            return;
        }
        self.view.handle_input(&mut self.ctx, &event);
        self.present_idle();
    }

    /// Keep camera aspect and render target size in step with the canvas.
    /// The page origin set by `set_viewport` is kept.
    pub fn resize(&mut self, width: f32, height: f32) {
        let current = self.ctx.camera.viewport();
        self.set_viewport(current.left, current.top, width, height);
    }

    /// Place the canvas rect on the page. Pointer coordinates are then read
    /// in the same page space as `left`/`top`. Non-finite origins fall back
    /// to 0.
    pub fn set_viewport(&mut self, left: f32, top: f32, width: f32, height: f32) {
        let finite_or_zero = |v: f32| if v.is_finite() { v } else { 0.0 };
        let viewport = Viewport::new(width, height)
            .with_origin(finite_or_zero(left), finite_or_zero(top));
        self.ctx.camera.set_viewport(viewport);
        self.target.resize(viewport.width as u32, viewport.height as u32);
        self.present_idle();
    }

    /// Pick at viewport pixel (x, y). Returns whether something was hit.
    pub fn select(&mut self, x: f32, y: f32) -> bool {
        if !self.initialized || !x.is_finite() || !y.is_finite() {
            return false;
        }
        self.view.select_at(&self.ctx, x, y)
    }

    pub fn selection_json(&self) -> Option<String> {
        self.view.selection_json()
    }

    pub fn clear_selection(&mut self) {
        self.view.clear_selection();
    }

    /// The host lost its drawing surface; the next tick fails and stops the loop.
    pub fn context_lost(&mut self) {
        log::warn!("render context lost");
        self.target.invalidate();
    }

    fn present(&mut self) -> Result<(), RenderError> {
        self.ctx.propagate_transforms();
        build_instance_buffer(self.ctx.scene.iter(), &self.ctx.points, &mut self.instances);

        let viewport = self.ctx.camera.viewport();
        let frame = FrameData {
            instances: self.instances.instances(),
            additive_split: self.instances.additive_split(),
            points: self.ctx.points.vertices(),
            points_generation: self.ctx.points.generation(),
            camera: self.ctx.camera.uniform(),
            viewport_width: viewport.width,
            viewport_height: viewport.height,
            frame: self.clock.frames(),
            running: self.frame_loop.is_running(),
        };
        self.target.draw(&frame)
    }

    /// Redraw outside the loop so camera changes show while stopped.
    fn present_idle(&mut self) {
        if !self.initialized || self.frame_loop.is_running() {
            return;
        }
        if let Err(e) = self.present() {
            log::warn!("present failed: {e}");
        }
    }

    // ---- Accessors ----

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn is_running(&self) -> bool {
        self.frame_loop.is_running()
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn context(&self) -> &EngineContext {
        &self.ctx
    }

    pub fn target(&self) -> &R {
        &self.target
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    pub fn frame_loop(&self) -> &FrameLoop<S> {
        &self.frame_loop
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        self.frame_loop.scheduler_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::SharedBufferTarget;
    use orrery_engine::bridge::protocol::{HEADER_INSTANCE_COUNT, HEADER_RUNNING};
    use orrery_engine::{Color, Entity, EntityId, FrameStep, ManualScheduler, MeshComponent};
    use glam::Vec3;

    /// Minimal view: spheres that drift along +X one unit per tick.
    struct Drift {
        spheres: usize,
        ids: Vec<EntityId>,
        ticks: u32,
        wheel: f32,
        max_instances: usize,
    }

    impl Drift {
        fn new(spheres: usize) -> Self {
            Self { spheres, ids: Vec::new(), ticks: 0, wheel: 0.0, max_instances: 8 }
        }
    }

    impl View for Drift {
        fn config(&self) -> ViewConfig {
            ViewConfig { max_instances: self.max_instances, max_points: 8, ..ViewConfig::default() }
        }

        fn init(&mut self, ctx: &mut EngineContext) -> Result<(), EngineError> {
            for _ in 0..self.spheres {
                let id = ctx.next_id();
                ctx.scene.spawn(
                    Entity::new(id).with_mesh(MeshComponent::sphere(1.0, Color::WHITE)),
                );
                self.ids.push(id);
            }
            ctx.camera.set_position(Vec3::new(0.0, 0.0, 50.0));
            Ok(())
        }

        fn update(&mut self, ctx: &mut EngineContext, step: FrameStep) {
            self.ticks += 1;
            for &id in &self.ids {
                if let Some(e) = ctx.scene.get_mut(id) {
                    e.pos.x += step.scale as f32;
                }
            }
        }

        fn handle_input(&mut self, _ctx: &mut EngineContext, event: &InputEvent) {
            if let InputEvent::Wheel { delta_y } = event {
                self.wheel += delta_y;
            }
        }
    }

    type TestRunner = ViewRunner<Drift, ManualScheduler, SharedBufferTarget>;

    fn runner(view: Drift) -> TestRunner {
        let target = SharedBufferTarget::from_config(&view.config());
        ViewRunner::new(view, ManualScheduler::new(), target, Viewport::new(800.0, 600.0))
    }

    fn deliver_due(r: &mut TestRunner, timestamp: f64) {
        for request in r.scheduler_mut().take_due() {
            r.on_frame(request, timestamp);
        }
    }

    #[test]
    fn init_publishes_first_frame() {
        let mut r = runner(Drift::new(2));
        r.init().unwrap();
        assert!(r.is_initialized());
        assert!(!r.is_running());
        assert_eq!(r.target().buffer()[HEADER_INSTANCE_COUNT], 2.0);
        assert_eq!(r.target().buffer()[HEADER_RUNNING], 0.0);
        assert_eq!(r.target().size(), (800, 600));
    }

    #[test]
    fn init_rejects_scene_over_capacity() {
        let mut view = Drift::new(3);
        view.max_instances = 2;
        let mut r = runner(view);
        let err = r.init().unwrap_err();
        assert!(matches!(err, EngineError::CapacityExceeded { what: "instance", needed: 3, capacity: 2 }));
        assert!(!r.is_initialized());
    }

    #[test]
    fn start_before_init_is_ignored() {
        let mut r = runner(Drift::new(1));
        assert!(!r.start().unwrap());
        assert_eq!(r.scheduler_mut().due_len(), 0);
    }

    #[test]
    fn running_loop_ticks_once_per_frame() {
        let mut r = runner(Drift::new(1));
        r.init().unwrap();
        assert!(r.start().unwrap());
        assert!(!r.start().unwrap());

        for i in 0..5 {
            deliver_due(&mut r, i as f64 * 16.0);
        }

        assert_eq!(r.view().ticks, 5);
        let id = r.view().ids[0];
        assert_eq!(r.context().scene.get(id).unwrap().pos.x, 5.0);
        assert_eq!(r.target().buffer()[HEADER_RUNNING], 1.0);
        assert_eq!(r.scheduler_mut().due_len(), 1);
    }

    #[test]
    fn stale_callbacks_after_stop_do_nothing() {
        let mut r = runner(Drift::new(1));
        r.init().unwrap();
        r.start().unwrap();
        deliver_due(&mut r, 0.0);

        // Callback already queued by the host when stop() runs.
        let queued = r.scheduler_mut().take_due();
        assert!(r.stop());
        assert!(!r.stop());
        for request in queued {
            r.on_frame(request, 16.0);
        }

        assert_eq!(r.view().ticks, 1);
        assert_eq!(r.scheduler_mut().due_len(), 0);
    }

    #[test]
    fn lost_context_stops_loop() {
        let mut r = runner(Drift::new(1));
        r.init().unwrap();
        r.start().unwrap();
        r.context_lost();
        deliver_due(&mut r, 0.0);

        assert!(!r.is_running());
        assert_eq!(r.scheduler_mut().due_len(), 0);
    }

    #[test]
    fn unavailable_scheduler_fails_start() {
        let mut r = runner(Drift::new(1));
        r.init().unwrap();
        r.scheduler_mut().set_unavailable(true);
        assert!(matches!(r.start(), Err(EngineError::SchedulerUnavailable(_))));
        assert!(!r.is_running());
    }

    #[test]
    fn input_reaches_view_while_stopped() {
        let mut r = runner(Drift::new(1));
        r.input(InputEvent::Wheel { delta_y: 5.0 });
        assert_eq!(r.view().wheel, 0.0);

        r.init().unwrap();
        r.input(InputEvent::Wheel { delta_y: 5.0 });
        r.input(InputEvent::Wheel { delta_y: f32::NAN });
        assert_eq!(r.view().wheel, 5.0);
    }

    #[test]
    fn resize_updates_camera_and_target() {
        let mut r = runner(Drift::new(1));
        r.init().unwrap();
        r.resize(1000.0, 500.0);
        assert!((r.context().camera.aspect() - 2.0).abs() < 1e-6);
        assert_eq!(r.target().size(), (1000, 500));

        r.resize(0.0, f32::NAN);
        assert!(r.context().camera.aspect().is_finite());
    }

    #[test]
    fn viewport_origin_survives_resize() {
        let mut r = runner(Drift::new(1));
        r.init().unwrap();
        r.set_viewport(120.0, 40.0, 800.0, 600.0);
        r.resize(1000.0, 500.0);

        let viewport = r.context().camera.viewport();
        assert_eq!((viewport.left, viewport.top), (120.0, 40.0));
        assert_eq!(r.target().size(), (1000, 500));

        // Page-space center of the offset rect looks straight at the target.
        let ray = r.context().camera.ray_through(620.0, 290.0).unwrap();
        assert!((ray.dir - Vec3::NEG_Z).length() < 1e-4);

        r.set_viewport(f32::NAN, 10.0, 800.0, 600.0);
        assert_eq!(r.context().camera.viewport().left, 0.0);
    }

    #[test]
    fn destroy_stops_and_clears() {
        let mut r = runner(Drift::new(2));
        r.init().unwrap();
        r.start().unwrap();
        r.destroy();
        assert!(!r.is_running());
        assert!(!r.is_initialized());
        assert!(r.context().scene.is_empty());
        assert!(!r.start().unwrap());
    }
}
