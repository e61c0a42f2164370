//! Construction-time configuration for a simulation instance

use crate::error::SimError;
use glam::DVec2;

/// `value` if it is finite and strictly positive
pub(crate) fn positive(name: &'static str, value: f64) -> Result<f64, SimError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(SimError::InvalidParameter { name, value })
    }
}

/// `value` if it is finite and not negative
pub(crate) fn non_negative(name: &'static str, value: f64) -> Result<f64, SimError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(SimError::InvalidParameter { name, value })
    }
}

/// The shared circle that angle-constrained nodes orbit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub radius: f64,
    pub center: DVec2,
}

impl Circle {
    pub const DEFAULT_CENTER: DVec2 = DVec2::new(0.5, 0.5);

    /// Circle of the given radius around the default center `(0.5, 0.5)`
    pub fn new(radius: f64) -> Self {
        Self {
            radius,
            center: Self::DEFAULT_CENTER,
        }
    }

    pub fn with_center(mut self, center: DVec2) -> Self {
        self.center = center;
        self
    }

    /// Radius must be positive and the center finite
    pub fn validate(&self) -> Result<(), SimError> {
        positive("circle radius", self.radius)?;
        if !self.center.is_finite() {
            return Err(SimError::InvalidParameter {
                name: "circle center",
                value: if self.center.x.is_finite() { self.center.y } else { self.center.x },
            });
        }
        Ok(())
    }

    /// Point on the circle at `angle` radians
    pub fn point_at(&self, angle: f64) -> DVec2 {
        self.center + self.radius * DVec2::new(angle.cos(), angle.sin())
    }
}

/// Simulation constants
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    /// Integration timestep `T`
    pub timestep: f64,
    /// Damping coefficient applied as `-velocity * friction`
    pub friction: f64,
    /// Mass given to nodes that do not specify one
    pub default_mass: f64,
    /// When present, nodes may be placed on and constrained to this circle
    pub circle: Option<Circle>,
    /// Seed for random placement; `None` draws from OS entropy
    pub seed: Option<u64>,
    /// Track every pair that receives a force in the link table
    pub track_forces: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            timestep: 0.2,
            friction: 1e2,
            default_mass: 1e5,
            circle: None,
            seed: None,
            track_forces: true,
        }
    }
}

impl SimConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timestep(mut self, timestep: f64) -> Self {
        self.timestep = timestep;
        self
    }

    pub fn with_friction(mut self, friction: f64) -> Self {
        self.friction = friction;
        self
    }

    pub fn with_mass(mut self, mass: f64) -> Self {
        self.default_mass = mass;
        self
    }

    pub fn with_circle(mut self, circle: Circle) -> Self {
        self.circle = Some(circle);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Reject values the integrator cannot divide by or step with
    pub fn validate(&self) -> Result<(), SimError> {
        positive("timestep", self.timestep)?;
        non_negative("friction", self.friction)?;
        positive("default mass", self.default_mass)?;
        if let Some(circle) = &self.circle {
            circle.validate()?;
        }
        Ok(())
    }

    /// Do not add a link for pairs that only carry forces
    pub fn without_force_links(mut self) -> Self {
        self.track_forces = false;
        self
    }
}
