/// Celestial body registry: visual scale, motion rates and the descriptive
/// facts shown in the inspector.
///
/// Distances and radii are scene units, deliberately not to scale. Angular
/// speeds are radians per nominal tick.

use orrery_engine::Color;
use serde::Serialize;

/// What kind of body this is. Serialized as the label shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BodyKind {
    Star,
    Planet,
    #[serde(rename = "Natural Satellite")]
    NaturalSatellite,
}

impl BodyKind {
    pub fn label(self) -> &'static str {
        match self {
            BodyKind::Star => "Star",
            BodyKind::Planet => "Planet",
            BodyKind::NaturalSatellite => "Natural Satellite",
        }
    }
}

/// Human-readable facts. Absent entries are left out of the inspector.
#[derive(Debug, Clone, Copy, Default)]
pub struct BodyFacts {
    pub diameter: Option<&'static str>,
    pub mass: Option<&'static str>,
    /// Distance from the body this one orbits.
    pub distance_from_primary: Option<&'static str>,
    pub orbital_period: Option<&'static str>,
    pub day_length: Option<&'static str>,
    pub temperature: Option<&'static str>,
    pub composition: Option<&'static str>,
    pub age: Option<&'static str>,
    pub luminosity: Option<&'static str>,
}

/// One body of the system. Immutable after construction.
#[derive(Debug, Clone, Copy)]
pub struct CelestialBody {
    pub name: &'static str,
    pub kind: BodyKind,
    /// Body this one orbits. `None` for the sun; the sun for planets.
    pub primary: Option<&'static str>,
    pub visual_radius: f32,
    /// Distance from the primary (0 for the sun).
    pub orbit_distance: f32,
    pub orbit_speed: f64,
    pub spin_speed: f64,
    pub color: Color,
    pub shininess: f32,
    pub emissive: f32,
    pub facts: BodyFacts,
}

/// Index constants into `BODIES`.
pub const SUN: usize = 0;
pub const EARTH: usize = 3;
pub const SATURN: usize = 6;
pub const MOON: usize = 10;
pub const PLANET_RANGE: std::ops::Range<usize> = 1..10;
pub const BODY_COUNT: usize = 11;

#[allow(clippy::too_many_arguments)]
const fn planet(
    name: &'static str,
    visual_radius: f32,
    orbit_distance: f32,
    orbit_speed: f64,
    spin_speed: f64,
    color: u32,
    shininess: f32,
    facts: BodyFacts,
) -> CelestialBody {
    CelestialBody {
        name,
        kind: BodyKind::Planet,
        primary: Some("Sun"),
        visual_radius,
        orbit_distance,
        orbit_speed,
        spin_speed,
        color: Color::from_hex(color),
        shininess,
        emissive: 0.0,
        facts,
    }
}

const fn facts(
    diameter: &'static str,
    mass: &'static str,
    distance: &'static str,
    orbital_period: &'static str,
    day_length: &'static str,
    composition: &'static str,
    temperature: &'static str,
) -> BodyFacts {
    BodyFacts {
        diameter: Some(diameter),
        mass: Some(mass),
        distance_from_primary: Some(distance),
        orbital_period: Some(orbital_period),
        day_length: Some(day_length),
        temperature: Some(temperature),
        composition: Some(composition),
        age: None,
        luminosity: None,
    }
}

pub static BODIES: [CelestialBody; BODY_COUNT] = [
    // ── Sun ──────────────────────────────────────────────────────────
    CelestialBody {
        name: "Sun",
        kind: BodyKind::Star,
        primary: None,
        visual_radius: 10.0,
        orbit_distance: 0.0,
        orbit_speed: 0.0,
        spin_speed: 0.005,
        color: Color::from_hex(0xffaa00),
        shininess: 0.0,
        emissive: 0.6,
        facts: BodyFacts {
            diameter: Some("1,392,700 km"),
            mass: Some("1.989 × 10³⁰ kg"),
            distance_from_primary: None,
            orbital_period: None,
            day_length: None,
            temperature: Some("5,778 K (surface)"),
            composition: Some("73% Hydrogen, 25% Helium, 2% Other"),
            age: Some("4.6 billion years"),
            luminosity: Some("3.828 × 10²⁶ watts"),
        },
    },
    // ── Planets ──────────────────────────────────────────────────────
    planet("Mercury", 1.2, 25.0, 0.02, 0.01, 0x8c7853, 30.0, facts(
        "4,879 km", "3.3011 × 10²³ kg", "57.9 million km", "88 Earth days",
        "58.6 Earth days", "Iron core, silicate mantle", "167°C (day), -173°C (night)",
    )),
    planet("Venus", 1.8, 35.0, 0.015, -0.005, 0xffc649, 100.0, facts(
        "12,104 km", "4.8675 × 10²⁴ kg", "108.2 million km", "225 Earth days",
        "243 Earth days (retrograde)", "Iron core, rocky mantle, thick atmosphere",
        "462°C (hottest planet)",
    )),
    planet("Earth", 2.0, 50.0, 0.01, 0.02, 0x6b93d6, 30.0, facts(
        "12,756 km", "5.9724 × 10²⁴ kg", "149.6 million km", "365.25 days",
        "24 hours", "Iron core, silicate mantle, 71% water surface", "15°C average",
    )),
    planet("Mars", 1.6, 70.0, 0.008, 0.018, 0xcd5c5c, 30.0, facts(
        "6,792 km", "6.4171 × 10²³ kg", "227.9 million km", "687 Earth days",
        "24.6 hours", "Iron core, basaltic mantle, iron oxide surface", "-65°C average",
    )),
    planet("Jupiter", 8.0, 120.0, 0.005, 0.04, 0xd8ca9d, 30.0, facts(
        "142,984 km", "1.8982 × 10²⁷ kg", "778.5 million km", "11.9 Earth years",
        "9.9 hours", "89% hydrogen, 10% helium, 1% other", "-110°C average",
    )),
    planet("Saturn", 7.0, 180.0, 0.003, 0.038, 0xfad5a5, 10.0, facts(
        "120,536 km", "5.6834 × 10²⁶ kg", "1.43 billion km", "29.4 Earth years",
        "10.7 hours", "96% hydrogen, 3% helium, 1% other", "-140°C average",
    )),
    planet("Uranus", 4.0, 240.0, 0.002, 0.03, 0x4fd0e7, 30.0, facts(
        "51,118 km", "8.6810 × 10²⁵ kg", "2.87 billion km", "84 Earth years",
        "17.2 hours", "Water, methane, ammonia ices", "-195°C average",
    )),
    planet("Neptune", 3.8, 300.0, 0.001, 0.032, 0x4b70dd, 30.0, facts(
        "49,528 km", "1.0243 × 10²⁶ kg", "4.50 billion km", "165 Earth years",
        "16.1 hours", "Water, methane, ammonia ices", "-200°C average",
    )),
    planet("Pluto", 0.8, 380.0, 0.0008, 0.008, 0x967117, 30.0, facts(
        "2,376 km", "1.303 × 10²² kg", "5.91 billion km", "248 Earth years",
        "6.4 Earth days", "Rock and ice", "-375°C average",
    )),
    // ── Moon ─────────────────────────────────────────────────────────
    // Orbit angle is elapsed time × orbit_speed; spin advances by the same
    // rate each tick.
    CelestialBody {
        name: "Moon",
        kind: BodyKind::NaturalSatellite,
        primary: Some("Earth"),
        visual_radius: 0.3,
        orbit_distance: 4.0,
        orbit_speed: 0.1,
        spin_speed: 0.1,
        color: Color::from_hex(0x888888),
        shininess: 30.0,
        emissive: 0.0,
        facts: BodyFacts {
            diameter: Some("3,474 km"),
            mass: None,
            distance_from_primary: Some("384,400 km"),
            orbital_period: Some("27.3 Earth days"),
            day_length: None,
            temperature: None,
            composition: None,
            age: None,
            luminosity: None,
        },
    },
];

pub fn all() -> &'static [CelestialBody] {
    &BODIES
}

pub fn sun() -> &'static CelestialBody {
    &BODIES[SUN]
}

pub fn moon() -> &'static CelestialBody {
    &BODIES[MOON]
}

pub fn planets() -> &'static [CelestialBody] {
    &BODIES[PLANET_RANGE]
}

/// Look a body up by its display name (case-sensitive).
pub fn by_name(name: &str) -> Option<&'static CelestialBody> {
    BODIES.iter().find(|b| b.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_has_sun_nine_planets_and_moon() {
        assert_eq!(all().len(), BODY_COUNT);
        assert_eq!(sun().kind, BodyKind::Star);
        assert_eq!(planets().len(), 9);
        assert!(planets().iter().all(|p| p.kind == BodyKind::Planet));
        assert_eq!(moon().kind, BodyKind::NaturalSatellite);
        assert_eq!(BODIES[EARTH].name, "Earth");
        assert_eq!(BODIES[SATURN].name, "Saturn");
    }

    #[test]
    fn planets_are_ordered_outward() {
        let distances: Vec<f32> = planets().iter().map(|p| p.orbit_distance).collect();
        assert!(distances.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(sun().orbit_distance, 0.0);
    }

    #[test]
    fn primaries_exist() {
        for body in all() {
            if let Some(primary) = body.primary {
                assert!(by_name(primary).is_some(), "{} orbits unknown {}", body.name, primary);
            }
        }
        assert_eq!(moon().primary, Some("Earth"));
    }

    #[test]
    fn lookup_by_name() {
        let earth = by_name("Earth").unwrap();
        assert_eq!(earth.orbit_distance, 50.0);
        assert_eq!(earth.orbit_speed, 0.01);
        assert!(by_name("Vulcan").is_none());
        assert!(by_name("earth").is_none());
    }

    #[test]
    fn venus_spins_retrograde() {
        assert!(by_name("Venus").unwrap().spin_speed < 0.0);
    }

    #[test]
    fn moon_has_no_mass_entry() {
        assert!(moon().facts.mass.is_none());
        assert_eq!(moon().facts.distance_from_primary, Some("384,400 km"));
    }
}
