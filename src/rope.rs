//! Rope Solver (PBD / XPBD)
//!
//! Particle chain with one stretch constraint per segment and one bend
//! constraint per interior particle. Particles with zero mass are anchors:
//! they follow `bind position + target` every step.
//!
//! # Models
//!
//! - Stretching: PBD or XPBD distance constraints
//! - Bending: spring-damper on the angle (velocity level), PBD angle,
//!   XPBD angle, PBD distance (skip-one link), PBD height (Volino) and
//!   PBD triangle (Kelager)
//!
//! The solver runs in the caller's frame: [`Rope::step`] takes the anchor
//! target for that step, there is no world to register with.

use core::f32::consts::PI;

use crate::debug_draw::{DebugColor, DebugDraw};
use crate::error::{PhysicsError, Result};
use crate::math::Vec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Fewest particles a rope can have.
pub const MIN_PARTICLES: usize = 2;

// ============================================================================
// Tuning
// ============================================================================

/// Stretch constraint formulation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum StretchingModel {
    /// Stiffness-scaled position projection
    #[default]
    Pbd,
    /// Compliant projection with damping
    Xpbd,
}

/// Bend constraint formulation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BendingModel {
    /// Analytic spring-damper on the bend angle, applied to velocities
    SpringAngle,
    /// Stiffness-scaled angle projection
    #[default]
    PbdAngle,
    /// Compliant angle projection with damping
    XpbdAngle,
    /// Distance constraint between the two outer particles
    PbdDistance,
    /// Height of the middle particle over the outer edge (Volino)
    PbdHeight,
    /// Middle particle toward the triangle centroid (Kelager)
    PbdTriangle,
}

/// Solver settings.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RopeTuning {
    /// Stretch formulation
    pub stretching_model: StretchingModel,
    /// Bend formulation
    pub bending_model: BendingModel,
    /// Velocity damping rate (`v *= exp(-dt * damping)`)
    pub damping: f32,
    /// PBD stretch stiffness
    pub stretch_stiffness: f32,
    /// XPBD stretch frequency
    pub stretch_hertz: f32,
    /// XPBD stretch damping ratio
    pub stretch_damping: f32,
    /// PBD bend stiffness
    pub bend_stiffness: f32,
    /// Spring / XPBD bend frequency
    pub bend_hertz: f32,
    /// Spring / XPBD bend damping ratio
    pub bend_damping: f32,
    /// Use rest lengths instead of current lengths in the angle Jacobians
    pub isometric: bool,
    /// Use the effective mass computed at creation
    pub fixed_effective_mass: bool,
    /// Reserved; accepted and ignored
    pub warm_start: bool,
}

impl Default for RopeTuning {
    fn default() -> Self {
        Self {
            stretching_model: StretchingModel::Pbd,
            bending_model: BendingModel::PbdAngle,
            damping: 0.0,
            stretch_stiffness: 1.0,
            stretch_hertz: 1.0,
            stretch_damping: 0.0,
            bend_stiffness: 0.5,
            bend_hertz: 1.0,
            bend_damping: 0.0,
            isometric: false,
            fixed_effective_mass: false,
            warm_start: false,
        }
    }
}

impl RopeTuning {
    /// Every scalar must be finite and non-negative.
    ///
    /// # Errors
    ///
    /// [`PhysicsError::InvalidConfiguration`] naming the first bad field.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            (self.damping, "rope damping must be finite and >= 0"),
            (self.stretch_stiffness, "stretch stiffness must be finite and >= 0"),
            (self.stretch_hertz, "stretch hertz must be finite and >= 0"),
            (self.stretch_damping, "stretch damping must be finite and >= 0"),
            (self.bend_stiffness, "bend stiffness must be finite and >= 0"),
            (self.bend_hertz, "bend hertz must be finite and >= 0"),
            (self.bend_damping, "bend damping must be finite and >= 0"),
        ];
        for (value, reason) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(PhysicsError::InvalidConfiguration { reason });
            }
        }
        Ok(())
    }
}

/// Everything needed to build a [`Rope`].
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RopeDef {
    /// World offset added to every vertex
    pub position: Vec2,
    /// Bind positions, relative to `position`
    pub vertices: Vec<Vec2>,
    /// Particle masses; 0 pins the particle
    pub masses: Vec<f32>,
    /// Gravitational acceleration
    pub gravity: Vec2,
    /// Solver settings
    pub tuning: RopeTuning,
}

// ============================================================================
// Constraints
// ============================================================================

/// Distance constraint between neighbouring particles.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StretchConstraint {
    /// First particle
    pub i1: usize,
    /// Second particle
    pub i2: usize,
    /// Rest length
    pub rest_length: f32,
    /// Inverse mass of `i1`
    pub inv_mass1: f32,
    /// Inverse mass of `i2`
    pub inv_mass2: f32,
    /// Accumulated XPBD multiplier
    pub lambda: f32,
    /// Spring stiffness derived from `stretch_hertz`
    pub spring: f32,
    /// Damper coefficient derived from `stretch_damping`
    pub damper: f32,
}

/// Bend constraint over three consecutive particles.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BendConstraint {
    /// First particle
    pub i1: usize,
    /// Middle particle
    pub i2: usize,
    /// Last particle
    pub i3: usize,
    /// Rest length of `i1 -> i2`
    pub rest_length1: f32,
    /// Rest length of `i2 -> i3`
    pub rest_length2: f32,
    /// Inverse mass of `i1`
    pub inv_mass1: f32,
    /// Inverse mass of `i2`
    pub inv_mass2: f32,
    /// Inverse mass of `i3`
    pub inv_mass3: f32,
    /// Accumulated XPBD multiplier
    pub lambda: f32,
    /// Angle-constraint inverse effective mass at creation
    pub inv_effective_mass: f32,
    /// Barycentric weight of `i1` for the height model
    pub alpha1: f32,
    /// Barycentric weight of `i3` for the height model
    pub alpha2: f32,
    /// Spring stiffness derived from `bend_hertz`
    pub spring: f32,
    /// Damper coefficient derived from `bend_damping`
    pub damper: f32,
}

/// Angle Jacobians for the edges `d1 = p2 - p1`, `d2 = p3 - p2`.
#[inline]
fn angle_jacobians(d1: Vec2, d2: Vec2, l1_sq: f32, l2_sq: f32) -> (Vec2, Vec2, Vec2) {
    let jd1 = d1.skew() * (-1.0 / l1_sq);
    let jd2 = d2.skew() * (1.0 / l2_sq);
    (-jd1, jd1 - jd2, jd2)
}

impl BendConstraint {
    #[inline]
    fn inv_mass_sum(&self, j1: Vec2, j2: Vec2, j3: Vec2) -> f32 {
        self.inv_mass1 * j1.dot(j1) + self.inv_mass2 * j2.dot(j2) + self.inv_mass3 * j3.dot(j3)
    }

    /// Squared edge lengths used by the angle models.
    #[inline]
    fn edge_lengths_sq(&self, d1: Vec2, d2: Vec2, isometric: bool) -> (f32, f32) {
        if isometric {
            (
                self.rest_length1 * self.rest_length1,
                self.rest_length2 * self.rest_length2,
            )
        } else {
            (d1.length_squared(), d2.length_squared())
        }
    }
}

// ============================================================================
// Rope
// ============================================================================

/// PBD / XPBD rope.
#[derive(Clone, Debug)]
pub struct Rope {
    position: Vec2,
    bind_positions: Vec<Vec2>,
    positions: Vec<Vec2>,
    prev_positions: Vec<Vec2>,
    velocities: Vec<Vec2>,
    inv_masses: Vec<f32>,
    stretch: Vec<StretchConstraint>,
    bend: Vec<BendConstraint>,
    gravity: Vec2,
    tuning: RopeTuning,
}

impl Rope {
    /// Build a rope from its definition.
    ///
    /// # Errors
    ///
    /// - [`PhysicsError::TooFewParticles`] for fewer than [`MIN_PARTICLES`] vertices
    /// - [`PhysicsError::MassCountMismatch`] when vertices and masses differ in length
    /// - [`PhysicsError::DegenerateGeometry`] for non-finite vertices
    /// - [`PhysicsError::InvalidConfiguration`] from [`RopeTuning::validate`]
    pub fn new(def: &RopeDef) -> Result<Self> {
        let count = def.vertices.len();
        if count < MIN_PARTICLES {
            return Err(PhysicsError::TooFewParticles {
                count,
                min: MIN_PARTICLES,
            });
        }
        if def.masses.len() != count {
            return Err(PhysicsError::MassCountMismatch {
                vertices: count,
                masses: def.masses.len(),
            });
        }
        if !def.position.is_finite() || def.vertices.iter().any(|v| !v.is_finite()) {
            return Err(PhysicsError::DegenerateGeometry {
                reason: "non-finite rope vertex",
            });
        }
        def.tuning.validate()?;

        let bind_positions = def.vertices.clone();
        let positions: Vec<Vec2> = bind_positions.iter().map(|&b| b + def.position).collect();
        let inv_masses: Vec<f32> = def
            .masses
            .iter()
            .map(|&m| if m > 0.0 { 1.0 / m } else { 0.0 })
            .collect();

        let stretch = (0..count - 1)
            .map(|i| StretchConstraint {
                i1: i,
                i2: i + 1,
                rest_length: positions[i].distance(positions[i + 1]),
                inv_mass1: inv_masses[i],
                inv_mass2: inv_masses[i + 1],
                ..StretchConstraint::default()
            })
            .collect();

        let bend = (0..count.saturating_sub(2))
            .map(|i| Self::build_bend(&positions, &inv_masses, i))
            .collect();

        let mut rope = Self {
            position: def.position,
            bind_positions,
            prev_positions: positions.clone(),
            positions,
            velocities: vec![Vec2::ZERO; count],
            inv_masses,
            stretch,
            bend,
            gravity: def.gravity,
            tuning: def.tuning,
        };
        rope.apply_tuning(def.tuning);

        tracing::debug!(
            particles = count,
            stretch = rope.stretch.len(),
            bend = rope.bend.len(),
            bending = ?def.tuning.bending_model,
            stretching = ?def.tuning.stretching_model,
            "rope created"
        );
        Ok(rope)
    }

    fn build_bend(positions: &[Vec2], inv_masses: &[f32], i: usize) -> BendConstraint {
        let (p1, p2, p3) = (positions[i], positions[i + 1], positions[i + 2]);
        let mut c = BendConstraint {
            i1: i,
            i2: i + 1,
            i3: i + 2,
            rest_length1: p1.distance(p2),
            rest_length2: p2.distance(p3),
            inv_mass1: inv_masses[i],
            inv_mass2: inv_masses[i + 1],
            inv_mass3: inv_masses[i + 2],
            ..BendConstraint::default()
        };

        let e1 = p2 - p1;
        let e2 = p3 - p2;
        let l1_sq = e1.length_squared();
        let l2_sq = e2.length_squared();
        if l1_sq * l2_sq == 0.0 {
            return c;
        }

        let (j1, j2, j3) = angle_jacobians(e1, e2, l1_sq, l2_sq);
        c.inv_effective_mass = c.inv_mass_sum(j1, j2, j3);

        let r = p3 - p1;
        let rr = r.length_squared();
        if rr == 0.0 {
            return c;
        }
        // Barycentric coordinates of the middle particle on the outer edge
        c.alpha1 = e2.dot(r) / rr;
        c.alpha2 = e1.dot(r) / rr;
        c
    }

    // ---- tuning ----

    /// Replace the tuning and recompute spring/damper values.
    ///
    /// # Errors
    ///
    /// [`RopeTuning::validate`] failures; the rope keeps its old tuning.
    pub fn set_tuning(&mut self, tuning: RopeTuning) -> Result<()> {
        tuning.validate()?;
        self.apply_tuning(tuning);
        Ok(())
    }

    fn apply_tuning(&mut self, tuning: RopeTuning) {
        self.tuning = tuning;
        if tuning.warm_start {
            tracing::debug!("rope warm starting requested; lambdas are reset every step regardless");
        }

        let bend_omega = 2.0 * PI * tuning.bend_hertz;
        for c in &mut self.bend {
            let l1_sq = c.rest_length1 * c.rest_length1;
            let l2_sq = c.rest_length2 * c.rest_length2;
            c.spring = 0.0;
            c.damper = 0.0;
            if l1_sq * l2_sq == 0.0 {
                continue;
            }

            // Flattened triangle
            let j2 = 1.0 / c.rest_length1 + 1.0 / c.rest_length2;
            let sum = c.inv_mass1 / l1_sq + c.inv_mass2 * j2 * j2 + c.inv_mass3 / l2_sq;
            if sum == 0.0 {
                continue;
            }
            let mass = 1.0 / sum;
            c.spring = mass * bend_omega * bend_omega;
            c.damper = 2.0 * mass * tuning.bend_damping * bend_omega;
        }

        let stretch_omega = 2.0 * PI * tuning.stretch_hertz;
        for c in &mut self.stretch {
            c.spring = 0.0;
            c.damper = 0.0;
            let sum = c.inv_mass1 + c.inv_mass2;
            if sum == 0.0 {
                continue;
            }
            let mass = 1.0 / sum;
            c.spring = mass * stretch_omega * stretch_omega;
            c.damper = 2.0 * mass * tuning.stretch_damping * stretch_omega;
        }
    }

    // ---- stepping ----

    /// Advance by `dt` with `iterations` constraint passes. Anchors are driven
    /// to `bind position + target`.
    pub fn step(&mut self, dt: f32, iterations: usize, target: Vec2) {
        if dt == 0.0 {
            return;
        }
        self.position = target;

        let inv_dt = 1.0 / dt;
        let damping = (-dt * self.tuning.damping).exp();

        for i in 0..self.positions.len() {
            if self.inv_masses[i] > 0.0 {
                self.velocities[i] *= damping;
                self.velocities[i] += self.gravity * dt;
            } else {
                self.velocities[i] = (self.bind_positions[i] + target - self.prev_positions[i]) * inv_dt;
            }
        }

        if self.tuning.bending_model == BendingModel::SpringAngle {
            self.apply_bend_forces(dt);
        }

        for c in &mut self.bend {
            c.lambda = 0.0;
        }
        for c in &mut self.stretch {
            c.lambda = 0.0;
        }

        for (p, v) in self.positions.iter_mut().zip(&self.velocities) {
            *p += *v * dt;
        }

        for _ in 0..iterations {
            match self.tuning.bending_model {
                BendingModel::SpringAngle => {}
                BendingModel::PbdAngle => self.solve_bend_pbd_angle(),
                BendingModel::XpbdAngle => self.solve_bend_xpbd_angle(dt),
                BendingModel::PbdDistance => self.solve_bend_pbd_distance(),
                BendingModel::PbdHeight => self.solve_bend_pbd_height(),
                BendingModel::PbdTriangle => self.solve_bend_pbd_triangle(),
            }

            match self.tuning.stretching_model {
                StretchingModel::Pbd => self.solve_stretch_pbd(),
                StretchingModel::Xpbd => self.solve_stretch_xpbd(dt),
            }
        }

        for i in 0..self.positions.len() {
            self.velocities[i] = (self.positions[i] - self.prev_positions[i]) * inv_dt;
            self.prev_positions[i] = self.positions[i];
        }
    }

    /// Re-anchor every particle at `bind position + position` and zero the
    /// velocities and multipliers.
    pub fn reset(&mut self, position: Vec2) {
        self.position = position;
        for i in 0..self.positions.len() {
            let p = self.bind_positions[i] + position;
            self.positions[i] = p;
            self.prev_positions[i] = p;
            self.velocities[i] = Vec2::ZERO;
        }
        for c in &mut self.bend {
            c.lambda = 0.0;
        }
        for c in &mut self.stretch {
            c.lambda = 0.0;
        }
    }

    // ---- stretch solvers ----

    fn solve_stretch_pbd(&mut self) {
        let stiffness = self.tuning.stretch_stiffness;
        for c in &self.stretch {
            let p1 = self.positions[c.i1];
            let p2 = self.positions[c.i2];
            let (d, length) = (p2 - p1).normalize_with_length();

            let sum = c.inv_mass1 + c.inv_mass2;
            if sum == 0.0 {
                continue;
            }
            let s1 = c.inv_mass1 / sum;
            let s2 = c.inv_mass2 / sum;
            let error = c.rest_length - length;

            self.positions[c.i1] = p1 - d * (stiffness * s1 * error);
            self.positions[c.i2] = p2 + d * (stiffness * s2 * error);
        }
    }

    fn solve_stretch_xpbd(&mut self, dt: f32) {
        for c in &mut self.stretch {
            let p1 = self.positions[c.i1];
            let p2 = self.positions[c.i2];
            let dp1 = p1 - self.prev_positions[c.i1];
            let dp2 = p2 - self.prev_positions[c.i2];

            let (u, length) = (p2 - p1).normalize_with_length();
            let j1 = -u;
            let j2 = u;

            let sum = c.inv_mass1 + c.inv_mass2;
            if sum == 0.0 || c.spring == 0.0 {
                continue;
            }

            let alpha = 1.0 / (c.spring * dt * dt);
            let beta = dt * dt * c.damper;
            let sigma = alpha * beta / dt;
            let constraint = length - c.rest_length;

            // Rate of change, from the start-of-step positions
            let constraint_dot = j1.dot(dp1) + j2.dot(dp2);

            let b = constraint + alpha * c.lambda + sigma * constraint_dot;
            let sum2 = (1.0 + sigma) * sum + alpha;
            let impulse = -b / sum2;

            self.positions[c.i1] = p1 + j1 * (c.inv_mass1 * impulse);
            self.positions[c.i2] = p2 + j2 * (c.inv_mass2 * impulse);
            c.lambda += impulse;
        }
    }

    // ---- bend solvers ----

    fn apply_bend_forces(&mut self, dt: f32) {
        let omega = 2.0 * PI * self.tuning.bend_hertz;
        let isometric = self.tuning.isometric;
        let fixed_mass = self.tuning.fixed_effective_mass;

        for c in &self.bend {
            let p1 = self.positions[c.i1];
            let p2 = self.positions[c.i2];
            let p3 = self.positions[c.i3];
            let v1 = self.velocities[c.i1];
            let v2 = self.velocities[c.i2];
            let v3 = self.velocities[c.i3];

            let d1 = p2 - p1;
            let d2 = p3 - p2;
            let (l1_sq, l2_sq) = c.edge_lengths_sq(d1, d2, isometric);
            if l1_sq * l2_sq == 0.0 {
                continue;
            }

            let angle = d1.cross(d2).atan2(d1.dot(d2));
            let (j1, j2, j3) = angle_jacobians(d1, d2, l1_sq, l2_sq);
            let sum = if fixed_mass {
                c.inv_effective_mass
            } else {
                c.inv_mass_sum(j1, j2, j3)
            };
            if sum == 0.0 {
                continue;
            }

            let mass = 1.0 / sum;
            let spring = mass * omega * omega;
            let damper = 2.0 * mass * self.tuning.bend_damping * omega;

            let constraint = angle;
            let constraint_dot = j1.dot(v1) + j2.dot(v2) + j3.dot(v3);
            let impulse = -dt * (spring * constraint + damper * constraint_dot);

            self.velocities[c.i1] += j1 * (c.inv_mass1 * impulse);
            self.velocities[c.i2] += j2 * (c.inv_mass2 * impulse);
            self.velocities[c.i3] += j3 * (c.inv_mass3 * impulse);
        }
    }

    fn solve_bend_pbd_angle(&mut self) {
        let stiffness = self.tuning.bend_stiffness;
        let isometric = self.tuning.isometric;
        let fixed_mass = self.tuning.fixed_effective_mass;

        for c in &self.bend {
            let p1 = self.positions[c.i1];
            let p2 = self.positions[c.i2];
            let p3 = self.positions[c.i3];

            let d1 = p2 - p1;
            let d2 = p3 - p2;
            let angle = d1.cross(d2).atan2(d1.dot(d2));

            let (l1_sq, l2_sq) = c.edge_lengths_sq(d1, d2, isometric);
            if l1_sq * l2_sq == 0.0 {
                continue;
            }

            let (j1, j2, j3) = angle_jacobians(d1, d2, l1_sq, l2_sq);
            let mut sum = if fixed_mass {
                c.inv_effective_mass
            } else {
                c.inv_mass_sum(j1, j2, j3)
            };
            if sum == 0.0 {
                sum = c.inv_effective_mass;
            }
            if sum == 0.0 {
                continue;
            }

            let impulse = -stiffness * angle / sum;

            self.positions[c.i1] = p1 + j1 * (c.inv_mass1 * impulse);
            self.positions[c.i2] = p2 + j2 * (c.inv_mass2 * impulse);
            self.positions[c.i3] = p3 + j3 * (c.inv_mass3 * impulse);
        }
    }

    fn solve_bend_xpbd_angle(&mut self, dt: f32) {
        let isometric = self.tuning.isometric;
        let fixed_mass = self.tuning.fixed_effective_mass;

        for c in &mut self.bend {
            let p1 = self.positions[c.i1];
            let p2 = self.positions[c.i2];
            let p3 = self.positions[c.i3];
            let dp1 = p1 - self.prev_positions[c.i1];
            let dp2 = p2 - self.prev_positions[c.i2];
            let dp3 = p3 - self.prev_positions[c.i3];

            let d1 = p2 - p1;
            let d2 = p3 - p2;
            let (l1_sq, l2_sq) = c.edge_lengths_sq(d1, d2, isometric);
            if l1_sq * l2_sq == 0.0 {
                continue;
            }

            let angle = d1.cross(d2).atan2(d1.dot(d2));
            let (j1, j2, j3) = angle_jacobians(d1, d2, l1_sq, l2_sq);
            let sum = if fixed_mass {
                c.inv_effective_mass
            } else {
                c.inv_mass_sum(j1, j2, j3)
            };
            if sum == 0.0 || c.spring == 0.0 {
                continue;
            }

            let alpha = 1.0 / (c.spring * dt * dt);
            let beta = dt * dt * c.damper;
            let sigma = alpha * beta / dt;
            let constraint = angle;

            let constraint_dot = j1.dot(dp1) + j2.dot(dp2) + j3.dot(dp3);

            let b = constraint + alpha * c.lambda + sigma * constraint_dot;
            let sum2 = (1.0 + sigma) * sum + alpha;
            let impulse = -b / sum2;

            self.positions[c.i1] = p1 + j1 * (c.inv_mass1 * impulse);
            self.positions[c.i2] = p2 + j2 * (c.inv_mass2 * impulse);
            self.positions[c.i3] = p3 + j3 * (c.inv_mass3 * impulse);
            c.lambda += impulse;
        }
    }

    fn solve_bend_pbd_distance(&mut self) {
        let stiffness = self.tuning.bend_stiffness;
        for c in &self.bend {
            let p1 = self.positions[c.i1];
            let p3 = self.positions[c.i3];
            let (d, length) = (p3 - p1).normalize_with_length();

            let sum = c.inv_mass1 + c.inv_mass3;
            if sum == 0.0 {
                continue;
            }
            let s1 = c.inv_mass1 / sum;
            let s3 = c.inv_mass3 / sum;
            let error = c.rest_length1 + c.rest_length2 - length;

            self.positions[c.i1] = p1 - d * (stiffness * s1 * error);
            self.positions[c.i3] = p3 + d * (stiffness * s3 * error);
        }
    }

    fn solve_bend_pbd_height(&mut self) {
        let stiffness = self.tuning.bend_stiffness;
        for c in &self.bend {
            let p1 = self.positions[c.i1];
            let p2 = self.positions[c.i2];
            let p3 = self.positions[c.i3];

            // Barycentric weights stay at their rest values
            let d = p1 * c.alpha1 + p3 * c.alpha2 - p2;
            let (d_hat, d_len) = d.normalize_with_length();
            if d_len == 0.0 {
                continue;
            }

            let j1 = d_hat * c.alpha1;
            let j2 = -d_hat;
            let j3 = d_hat * c.alpha2;

            let sum = c.inv_mass1 * c.alpha1 * c.alpha1
                + c.inv_mass2
                + c.inv_mass3 * c.alpha2 * c.alpha2;
            if sum == 0.0 {
                continue;
            }

            let mass = 1.0 / sum;
            let impulse = -stiffness * mass * d_len;

            self.positions[c.i1] = p1 + j1 * (c.inv_mass1 * impulse);
            self.positions[c.i2] = p2 + j2 * (c.inv_mass2 * impulse);
            self.positions[c.i3] = p3 + j3 * (c.inv_mass3 * impulse);
        }
    }

    fn solve_bend_pbd_triangle(&mut self) {
        let stiffness = self.tuning.bend_stiffness;
        for c in &self.bend {
            let b0 = self.positions[c.i1];
            let v = self.positions[c.i2];
            let b1 = self.positions[c.i3];

            let wb0 = c.inv_mass1;
            let wv = c.inv_mass2;
            let wb1 = c.inv_mass3;

            let w = wb0 + wb1 + 2.0 * wv;
            if w == 0.0 {
                continue;
            }
            let inv_w = stiffness / w;

            let d = v - (b0 + v + b1) * (1.0 / 3.0);

            self.positions[c.i1] = b0 + d * (2.0 * wb0 * inv_w);
            self.positions[c.i2] = v + d * (-4.0 * wv * inv_w);
            self.positions[c.i3] = b1 + d * (2.0 * wb1 * inv_w);
        }
    }

    // ---- debug draw ----

    /// Emit one segment per link and one point per particle.
    pub fn draw(&self, draw: &mut dyn DebugDraw) {
        for pair in self.positions.windows(2) {
            draw.draw_segment(pair[0], pair[1], DebugColor::ROPE);
        }
        for (p, &inv_mass) in self.positions.iter().zip(&self.inv_masses) {
            let color = if inv_mass > 0.0 {
                DebugColor::PARTICLE
            } else {
                DebugColor::PINNED
            };
            draw.draw_point(*p, 5.0, color);
        }
    }

    // ---- accessors ----

    /// Number of particles.
    #[inline]
    #[must_use]
    pub fn particle_count(&self) -> usize {
        self.positions.len()
    }

    /// Current particle positions.
    #[inline]
    #[must_use]
    pub fn positions(&self) -> &[Vec2] {
        &self.positions
    }

    /// Current particle velocities.
    #[inline]
    #[must_use]
    pub fn velocities(&self) -> &[Vec2] {
        &self.velocities
    }

    /// Per-particle inverse masses.
    #[inline]
    #[must_use]
    pub fn inverse_masses(&self) -> &[f32] {
        &self.inv_masses
    }

    /// Bind positions relative to the rope origin.
    #[inline]
    #[must_use]
    pub fn bind_positions(&self) -> &[Vec2] {
        &self.bind_positions
    }

    /// Stretch constraints, one per link.
    #[inline]
    #[must_use]
    pub fn stretch_constraints(&self) -> &[StretchConstraint] {
        &self.stretch
    }

    /// Bend constraints, one per interior particle.
    #[inline]
    #[must_use]
    pub fn bend_constraints(&self) -> &[BendConstraint] {
        &self.bend
    }

    /// Active tuning.
    #[inline]
    #[must_use]
    pub fn tuning(&self) -> &RopeTuning {
        &self.tuning
    }

    /// Last anchor target (or creation offset).
    #[inline]
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Gravity.
    #[inline]
    #[must_use]
    pub fn gravity(&self) -> Vec2 {
        self.gravity
    }

    /// Change gravity.
    #[inline]
    pub fn set_gravity(&mut self, gravity: Vec2) {
        self.gravity = gravity;
    }

    /// Sum of current link lengths.
    #[must_use]
    pub fn current_length(&self) -> f32 {
        self.positions.windows(2).map(|w| w[0].distance(w[1])).sum()
    }

    /// Sum of rest lengths.
    #[must_use]
    pub fn rest_length(&self) -> f32 {
        self.stretch.iter().map(|c| c.rest_length).sum()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::debug_draw::DebugDrawData;
    use approx::assert_abs_diff_eq;

    const DT: f32 = 1.0 / 60.0;

    /// Horizontal rope with its first particle pinned.
    fn hanging_def(count: usize, tuning: RopeTuning) -> RopeDef {
        let vertices = (0..count).map(|i| Vec2::new(i as f32 * 0.5, 0.0)).collect();
        let mut masses = vec![1.0; count];
        masses[0] = 0.0;
        RopeDef {
            position: Vec2::new(0.0, 10.0),
            vertices,
            masses,
            gravity: Vec2::new(0.0, -10.0),
            tuning,
        }
    }

    #[test]
    fn test_rejects_bad_definitions() {
        let one = RopeDef {
            vertices: vec![Vec2::ZERO],
            masses: vec![1.0],
            ..RopeDef::default()
        };
        assert_eq!(
            Rope::new(&one).err(),
            Some(PhysicsError::TooFewParticles { count: 1, min: 2 })
        );

        let mismatch = RopeDef {
            vertices: vec![Vec2::ZERO, Vec2::ONE],
            masses: vec![1.0],
            ..RopeDef::default()
        };
        assert!(matches!(
            Rope::new(&mismatch),
            Err(PhysicsError::MassCountMismatch { vertices: 2, masses: 1 })
        ));

        let bad_tuning = RopeDef {
            tuning: RopeTuning {
                bend_hertz: -1.0,
                ..RopeTuning::default()
            },
            ..hanging_def(3, RopeTuning::default())
        };
        assert!(matches!(
            Rope::new(&bad_tuning),
            Err(PhysicsError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_creation_layout() {
        let rope = Rope::new(&hanging_def(5, RopeTuning::default())).unwrap();
        assert_eq!(rope.particle_count(), 5);
        assert_eq!(rope.stretch_constraints().len(), 4);
        assert_eq!(rope.bend_constraints().len(), 3);
        assert_eq!(rope.positions()[2], Vec2::new(1.0, 10.0));
        assert_eq!(rope.inverse_masses()[0], 0.0);
        assert_abs_diff_eq!(rope.rest_length(), 2.0, epsilon = 1e-6);

        // Straight, evenly spaced: middle particle halfway along the outer edge
        let c = rope.bend_constraints()[1];
        assert_abs_diff_eq!(c.alpha1, 0.5, epsilon = 1e-6);
        assert_abs_diff_eq!(c.alpha2, 0.5, epsilon = 1e-6);
        assert!(c.inv_effective_mass > 0.0);
    }

    #[test]
    fn test_tuning_springs() {
        let rope = Rope::new(&hanging_def(3, RopeTuning::default())).unwrap();
        let omega = 2.0 * PI;
        // Pinned + free: effective mass 1
        assert_abs_diff_eq!(rope.stretch_constraints()[0].spring, omega * omega, epsilon = 1e-3);
        assert_eq!(rope.stretch_constraints()[0].damper, 0.0);

        let mut rope = rope;
        rope.set_tuning(RopeTuning {
            stretch_damping: 1.0,
            ..RopeTuning::default()
        })
        .unwrap();
        assert_abs_diff_eq!(rope.stretch_constraints()[0].damper, 2.0 * omega, epsilon = 1e-3);
        assert!(rope
            .set_tuning(RopeTuning {
                damping: f32::NAN,
                ..RopeTuning::default()
            })
            .is_err());
        assert_eq!(rope.tuning().stretch_damping, 1.0);
    }

    #[test]
    fn test_anchor_tracks_target() {
        let bending_models = [
            BendingModel::SpringAngle,
            BendingModel::PbdAngle,
            BendingModel::XpbdAngle,
            BendingModel::PbdDistance,
            BendingModel::PbdHeight,
            BendingModel::PbdTriangle,
        ];
        for stretching_model in [StretchingModel::Pbd, StretchingModel::Xpbd] {
            for bending_model in bending_models {
                for iterations in [0, 1, 50] {
                    let tuning = RopeTuning {
                        stretching_model,
                        bending_model,
                        ..RopeTuning::default()
                    };
                    let mut rope = Rope::new(&hanging_def(4, tuning)).unwrap();
                    let bind = rope.bind_positions()[0];
                    for i in 0..30 {
                        let target = Vec2::new(i as f32 * 0.1, 10.0 + i as f32 * 0.05);
                        rope.step(DT, iterations, target);
                        let anchor = rope.positions()[0];
                        assert_abs_diff_eq!(anchor.x, bind.x + target.x, epsilon = 1e-4);
                        assert_abs_diff_eq!(anchor.y, bind.y + target.y, epsilon = 1e-4);
                    }
                }
            }
        }
    }

    #[test]
    fn test_two_particle_stretch_converges_pbd() {
        let def = RopeDef {
            position: Vec2::ZERO,
            vertices: vec![Vec2::ZERO, Vec2::new(1.0, 0.0)],
            masses: vec![0.0, 1.0],
            gravity: Vec2::new(0.0, -10.0),
            tuning: RopeTuning::default(),
        };
        let mut rope = Rope::new(&def).unwrap();
        assert!(rope.bend_constraints().is_empty());
        for _ in 0..120 {
            rope.step(DT, 8, Vec2::ZERO);
        }
        assert_abs_diff_eq!(rope.current_length(), 1.0, epsilon = 1e-4);
        // Swung down under gravity
        assert!(rope.positions()[1].y < 0.0);
    }

    #[test]
    fn test_two_particle_stretch_converges_xpbd() {
        let def = RopeDef {
            position: Vec2::ZERO,
            vertices: vec![Vec2::ZERO, Vec2::new(1.0, 0.0)],
            masses: vec![0.0, 1.0],
            gravity: Vec2::new(0.0, -10.0),
            tuning: RopeTuning {
                stretching_model: StretchingModel::Xpbd,
                stretch_hertz: 30.0,
                stretch_damping: 1.0,
                ..RopeTuning::default()
            },
        };
        let mut rope = Rope::new(&def).unwrap();
        for _ in 0..120 {
            rope.step(DT, 8, Vec2::ZERO);
        }
        assert_abs_diff_eq!(rope.current_length(), 1.0, epsilon = 0.05);
    }

    #[test]
    fn test_every_model_stays_finite() {
        let bending = [
            BendingModel::SpringAngle,
            BendingModel::PbdAngle,
            BendingModel::XpbdAngle,
            BendingModel::PbdDistance,
            BendingModel::PbdHeight,
            BendingModel::PbdTriangle,
        ];
        for bending_model in bending {
            for stretching_model in [StretchingModel::Pbd, StretchingModel::Xpbd] {
                for isometric in [false, true] {
                    let tuning = RopeTuning {
                        bending_model,
                        stretching_model,
                        isometric,
                        fixed_effective_mass: isometric,
                        damping: 0.1,
                        stretch_hertz: 30.0,
                        bend_hertz: 2.0,
                        bend_damping: 0.5,
                        ..RopeTuning::default()
                    };
                    let mut rope = Rope::new(&hanging_def(8, tuning)).unwrap();
                    for _ in 0..120 {
                        rope.step(DT, 4, Vec2::new(0.0, 10.0));
                    }
                    assert!(
                        rope.positions().iter().all(|p| p.is_finite()),
                        "{bending_model:?}/{stretching_model:?} produced non-finite positions"
                    );
                    assert!(
                        rope.current_length() < 2.0 * rope.rest_length(),
                        "{bending_model:?}/{stretching_model:?} over-stretched"
                    );
                }
            }
        }
    }

    #[test]
    fn test_pbd_angle_straightens() {
        let def = RopeDef {
            position: Vec2::ZERO,
            vertices: vec![Vec2::ZERO, Vec2::new(1.0, 0.0), Vec2::new(1.0, 1.0)],
            masses: vec![1.0, 1.0, 1.0],
            gravity: Vec2::ZERO,
            tuning: RopeTuning::default(),
        };
        let bend_angle = |rope: &Rope| {
            let p = rope.positions();
            let d1 = p[1] - p[0];
            let d2 = p[2] - p[1];
            d1.cross(d2).atan2(d1.dot(d2)).abs()
        };

        let mut rope = Rope::new(&def).unwrap();
        let before = bend_angle(&rope);
        rope.step(DT, 1, Vec2::ZERO);
        assert!(bend_angle(&rope) < before);
    }

    #[test]
    fn test_zero_dt_is_noop() {
        let mut rope = Rope::new(&hanging_def(4, RopeTuning::default())).unwrap();
        let before = rope.positions().to_vec();
        rope.step(0.0, 8, Vec2::new(100.0, 100.0));
        assert_eq!(rope.positions(), before.as_slice());
    }

    #[test]
    fn test_reset() {
        let tuning = RopeTuning {
            stretching_model: StretchingModel::Xpbd,
            ..RopeTuning::default()
        };
        let mut rope = Rope::new(&hanging_def(4, tuning)).unwrap();
        for _ in 0..10 {
            rope.step(DT, 4, Vec2::new(0.0, 10.0));
        }
        rope.reset(Vec2::new(-3.0, 2.0));

        assert_eq!(rope.position(), Vec2::new(-3.0, 2.0));
        for (p, b) in rope.positions().iter().zip(rope.bind_positions()) {
            assert_eq!(*p, *b + Vec2::new(-3.0, 2.0));
        }
        assert!(rope.velocities().iter().all(|v| *v == Vec2::ZERO));
        assert!(rope.stretch_constraints().iter().all(|c| c.lambda == 0.0));
        assert!(rope.bend_constraints().iter().all(|c| c.lambda == 0.0));
    }

    #[test]
    fn test_draw() {
        let rope = Rope::new(&hanging_def(4, RopeTuning::default())).unwrap();
        let mut data = DebugDrawData::new();
        rope.draw(&mut data);
        assert_eq!(data.segments.len(), 3);
        assert_eq!(data.points.len(), 4);
        assert_eq!(data.points[0].color, DebugColor::PINNED);
        assert_eq!(data.points[1].color, DebugColor::PARTICLE);
    }

    #[test]
    fn test_warm_start_is_accepted() {
        let tuning = RopeTuning {
            warm_start: true,
            ..RopeTuning::default()
        };
        let mut rope = Rope::new(&hanging_def(3, tuning)).unwrap();
        rope.step(DT, 2, Vec2::new(0.0, 10.0));
        assert!(rope.positions().iter().all(|p| p.is_finite()));
    }
}
