/// Click-to-inspect: ray picking against body bounding spheres and the
/// record shown in the host's info panel.

use glam::Vec3;
use orrery_engine::PerspectiveCamera;
use serde::Serialize;

use crate::bodies::{BodyKind, CelestialBody};

/// One labelled line of the info panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InfoField {
    pub label: String,
    pub value: &'static str,
}

/// Everything the info panel shows for one body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BodyInfo {
    pub name: &'static str,
    pub kind: BodyKind,
    pub fields: Vec<InfoField>,
}

impl BodyInfo {
    /// Fields in display order; facts the body lacks are omitted.
    pub fn from_body(body: &'static CelestialBody) -> Self {
        let f = &body.facts;
        let distance_label = format!("Distance from {}", body.primary.unwrap_or("Sun"));

        let optional: [(String, Option<&'static str>); 9] = [
            ("Diameter".into(), f.diameter),
            ("Mass".into(), f.mass),
            (distance_label, f.distance_from_primary),
            ("Orbital Period".into(), f.orbital_period),
            ("Day Length".into(), f.day_length),
            ("Temperature".into(), f.temperature),
            ("Composition".into(), f.composition),
            ("Age".into(), f.age),
            ("Luminosity".into(), f.luminosity),
        ];

        let mut fields = vec![InfoField { label: "Type".into(), value: body.kind.label() }];
        fields.extend(
            optional
                .into_iter()
                .filter_map(|(label, value)| value.map(|value| InfoField { label, value })),
        );

        Self { name: body.name, kind: body.kind, fields }
    }

    pub fn field(&self, label: &str) -> Option<&'static str> {
        self.fields.iter().find(|f| f.label == label).map(|f| f.value)
    }
}

/// A body's bounding sphere at its current world position.
#[derive(Debug, Clone, Copy)]
pub struct Candidate {
    pub center: Vec3,
    pub radius: f32,
    pub body: &'static CelestialBody,
}

/// The body whose bounding sphere the ray through viewport pixel (x, y)
/// hits first, if any.
pub fn select_at(
    camera: &PerspectiveCamera,
    x: f32,
    y: f32,
    candidates: impl IntoIterator<Item = Candidate>,
) -> Option<&'static CelestialBody> {
    let ray = camera.ray_through(x, y)?;
    candidates
        .into_iter()
        .filter_map(|c| ray.intersect_sphere(c.center, c.radius).map(|t| (t, c.body)))
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, body)| body)
}

/// Holds the record currently on display.
#[derive(Debug, Default)]
pub struct Inspector {
    current: Option<BodyInfo>,
}

impl Inspector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, body: &'static CelestialBody) {
        log::info!("inspecting {}", body.name);
        self.current = Some(BodyInfo::from_body(body));
    }

    pub fn close(&mut self) {
        self.current = None;
    }

    pub fn current(&self) -> Option<&BodyInfo> {
        self.current.as_ref()
    }

    pub fn to_json(&self) -> Option<String> {
        let info = self.current.as_ref()?;
        match serde_json::to_string(info) {
            Ok(json) => Some(json),
            Err(e) => {
                log::error!("failed to serialize inspector record: {e}");
                None
            }
        }
    }
}
