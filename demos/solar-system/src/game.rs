/// Solar System: orbit-camera orrery with click-to-inspect.
///
/// The simulation advances circular orbits and spins; the scene graph
/// composes the moon through Earth's spin; picking casts a ray through the
/// perspective camera against each body's bounding sphere.

use orrery_engine::{EngineContext, EngineError, FrameStep, InputEvent, Rng, View, ViewConfig};

use crate::animation::Simulation;
use crate::bodies::CelestialBody;
use crate::config::SolarSystemConfig;
use crate::controls::{OrbitControls, Release};
use crate::inspector::{self, Candidate, Inspector};
use crate::scene::{self, SceneNodes};

/// Render instances needed by the default scene, with headroom.
const MAX_INSTANCES: usize = 64;

pub struct SolarSystem {
    config: SolarSystemConfig,
    controls: OrbitControls,
    sim: Simulation,
    inspector: Inspector,
    /// `None` until init builds the scene.
    nodes: Option<SceneNodes>,
}

impl SolarSystem {
    pub fn new() -> Self {
        Self::with_config(SolarSystemConfig::default())
    }

    pub fn with_config(config: SolarSystemConfig) -> Self {
        Self {
            controls: OrbitControls::new(config.controls.clone()),
            sim: Simulation::new(config.animation.clone()),
            inspector: Inspector::new(),
            nodes: None,
            config,
        }
    }

    /// Build from a (possibly partial) JSON configuration document.
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        Ok(Self::with_config(SolarSystemConfig::from_json(json)?))
    }

    pub fn simulation(&self) -> &Simulation {
        &self.sim
    }

    pub fn controls(&self) -> &OrbitControls {
        &self.controls
    }

    pub fn inspector(&self) -> &Inspector {
        &self.inspector
    }

    pub fn nodes(&self) -> Option<&SceneNodes> {
        self.nodes.as_ref()
    }

    fn pick(&self, ctx: &EngineContext, x: f32, y: f32) -> Option<&'static CelestialBody> {
        let nodes = self.nodes.as_ref()?;
        let candidates = nodes.selectable.iter().filter_map(|s| {
            let entity = ctx.scene.get(s.id)?;
            Some(Candidate {
                center: entity.pos,
                radius: entity.world_pick_radius()?,
                body: s.body,
            })
        });
        inspector::select_at(&ctx.camera, x, y, candidates)
    }
}

impl Default for SolarSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl View for SolarSystem {
    fn config(&self) -> ViewConfig {
        ViewConfig {
            time_step: self.config.animation.time_step,
            max_instances: MAX_INSTANCES,
            max_points: self.config.scene.total_points(),
            ..ViewConfig::default()
        }
    }

    fn init(&mut self, ctx: &mut EngineContext) -> Result<(), EngineError> {
        self.config.validate()?;

        let mut rng = Rng::new(self.config.scene.seed);
        let nodes = scene::build(ctx, &self.config.scene, &mut rng);

        self.sim = if self.config.scene.random_start_angles {
            Simulation::with_random_angles(self.config.animation.clone(), &mut rng)
        } else {
            Simulation::new(self.config.animation.clone())
        };
        nodes.sync(&self.sim, &mut ctx.transforms);
        self.controls.reset();
        self.controls.apply(&mut ctx.camera);

        self.nodes = Some(nodes);
        Ok(())
    }

    fn update(&mut self, ctx: &mut EngineContext, step: FrameStep) {
        let Some(nodes) = &self.nodes else { return };
        self.sim.step(step.scale);
        nodes.sync(&self.sim, &mut ctx.transforms);
    }

    fn handle_input(&mut self, ctx: &mut EngineContext, event: &InputEvent) {
        match *event {
            InputEvent::PointerDown { x, y } => {
                self.controls.on_pointer_down(x, y);
            }
            InputEvent::PointerMove { x, y } => {
                if self.controls.on_pointer_move(x, y) {
                    self.controls.apply(&mut ctx.camera);
                }
            }
            InputEvent::PointerUp { x, y } => {
                if let Release::Click { x, y } = self.controls.on_pointer_up(x, y) {
                    self.select_at(ctx, x, y);
                }
            }
            InputEvent::Wheel { delta_y } => {
                self.controls.on_wheel(delta_y);
                self.controls.apply(&mut ctx.camera);
            }
            InputEvent::ResetView => {
                self.controls.reset();
                self.controls.apply(&mut ctx.camera);
            }
        }
    }

    fn select_at(&mut self, ctx: &EngineContext, x: f32, y: f32) -> bool {
        match self.pick(ctx, x, y) {
            Some(body) => {
                self.inspector.show(body);
                true
            }
            None => false,
        }
    }

    fn selection_json(&self) -> Option<String> {
        self.inspector.to_json()
    }

    fn clear_selection(&mut self) {
        self.inspector.close();
    }
}
