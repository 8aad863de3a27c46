//! Reference positions of the named bodies used for "nearest body".
//!
//! Orbits are animated elsewhere; telemetry measures against each body's
//! reference radius on the +X axis.

use glam::Vec3;

/// World units per astronomical unit.
pub const AU: f32 = 1000.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CelestialBody {
    pub name: &'static str,
    /// Reference orbit radius in AU.
    pub orbit_au: f32,
}

impl CelestialBody {
    const fn new(name: &'static str, orbit_au: f32) -> Self {
        Self { name, orbit_au }
    }

    #[must_use]
    pub fn reference_position(&self) -> Vec3 {
        Vec3::new(self.orbit_au * AU, 0.0, 0.0)
    }
}

pub const BODIES: [CelestialBody; 10] = [
    CelestialBody::new("Sun", 0.0),
    CelestialBody::new("Mercury", 0.39),
    CelestialBody::new("Venus", 0.72),
    CelestialBody::new("Earth", 1.0),
    CelestialBody::new("Mars", 1.52),
    CelestialBody::new("Asteroid Belt", 2.7),
    CelestialBody::new("Jupiter", 5.2),
    CelestialBody::new("Saturn", 9.58),
    CelestialBody::new("Uranus", 19.22),
    CelestialBody::new("Neptune", 30.05),
];

/// Closest body by straight-line distance. Ties go to the body listed first.
#[must_use]
pub fn nearest_body(position: Vec3) -> &'static CelestialBody {
    let mut nearest = &BODIES[0];
    let mut best = position.distance_squared(nearest.reference_position());
    for body in &BODIES[1..] {
        let d = position.distance_squared(body.reference_position());
        if d < best {
            best = d;
            nearest = body;
        }
    }
    nearest
}
