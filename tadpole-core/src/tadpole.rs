//! A single tadpole: steering, locomotion and arrival detection.

use rand::Rng;

use crate::config::{Arena, PondConfig};
use crate::geometry;
use crate::render::TadpoleShape;
use crate::{math, Vector2D};

/// Number of points in the trailing chain, including the head
pub const TAIL_LENGTH: usize = 10;
/// Number of leading chain points drawn as the body
pub const BODY_POINTS: usize = 3;

/// A food item a tadpole is steering toward
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Target {
    pub slot: usize,
    /// Distinguishes successive food items placed in the same slot
    pub ticket: u64,
    pub position: Vector2D,
}

impl Target {
    fn key(&self) -> (usize, u64) {
        (self.slot, self.ticket)
    }
}

/// Proof that a tadpole reached a target.
///
/// Only [`Tadpole::tick`] can produce one, so the food pool records
/// arrivals strictly on behalf of the tadpole that made them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arrival {
    tadpole: usize,
    slot: usize,
    ticket: u64,
}

impl Arrival {
    #[cfg(test)]
    pub(crate) fn for_test(tadpole: usize, slot: usize, ticket: u64) -> Self {
        Self {
            tadpole,
            slot,
            ticket,
        }
    }

    pub fn tadpole(&self) -> usize {
        self.tadpole
    }

    pub fn slot(&self) -> usize {
        self.slot
    }

    pub fn ticket(&self) -> u64 {
        self.ticket
    }
}

/// A single tadpole entity
#[derive(Debug, Clone)]
pub struct Tadpole {
    pub id: usize,
    velocity: Vector2D,
    /// Free-roam velocity restored once there is nothing left to chase
    wander_velocity: Vector2D,
    path: [Vector2D; TAIL_LENGTH],
    retarget_interval: f32,
    retarget_budget: f32,
    sway: f32,
    chasing: Option<(usize, u64)>,
    reached_current_target: bool,
}

impl Tadpole {
    pub fn new(id: usize, head: Vector2D, velocity: Vector2D, retarget_interval: f32) -> Self {
        Self {
            id,
            velocity,
            wander_velocity: velocity,
            path: [head; TAIL_LENGTH],
            retarget_interval,
            retarget_budget: retarget_interval,
            sway: 0.0,
            chasing: None,
            reached_current_target: false,
        }
    }

    /// Tadpole at a random spot with a random wander velocity.
    ///
    /// The whole chain starts collapsed onto the head and unfurls while
    /// swimming.
    pub fn random<R: Rng + ?Sized>(id: usize, config: &PondConfig, rng: &mut R) -> Self {
        let head = Vector2D::new(
            rng.gen_range(0.0..config.arena.width),
            rng.gen_range(0.0..config.arena.height),
        );
        let velocity = Vector2D::new(
            random_component(config, rng),
            random_component(config, rng),
        );
        let interval = rng.gen_range(config.retarget_interval.clone());
        Self::new(id, head, velocity, interval)
    }

    pub fn head(&self) -> Vector2D {
        self.path[0]
    }

    pub fn velocity(&self) -> Vector2D {
        self.velocity
    }

    pub fn wander_velocity(&self) -> Vector2D {
        self.wander_velocity
    }

    pub fn speed(&self) -> f32 {
        self.velocity.magnitude()
    }

    pub fn path(&self) -> &[Vector2D; TAIL_LENGTH] {
        &self.path
    }

    pub fn retarget_budget(&self) -> f32 {
        self.retarget_budget
    }

    pub fn retarget_interval(&self) -> f32 {
        self.retarget_interval
    }

    pub fn reached_current_target(&self) -> bool {
        self.reached_current_target
    }

    pub fn is_chasing(&self) -> bool {
        self.chasing.is_some()
    }

    /// Advance one frame toward `target`, or wander when there is none.
    ///
    /// Returns an [`Arrival`] the first time the head comes within
    /// `arrival_epsilon` of the current target on both axes.
    pub fn tick(&mut self, target: Option<Target>, arena: Arena, arrival_epsilon: f32) -> Option<Arrival> {
        let target = target.filter(|t| t.position.is_finite());
        self.track(target);

        if self.retarget_budget <= 0.0 {
            self.retarget_budget = self.retarget_interval;
            self.velocity = match target {
                Some(t) => geometry::velocity_toward(
                    self.velocity.magnitude(),
                    geometry::angle_to_target(self.head(), t.position),
                ),
                None => self.wander_velocity,
            };
        }

        let motion = self.velocity;
        let mut head = self.path[0] + motion;

        if geometry::reflect_axis(&mut head.x, &mut self.velocity.x, arena.width) && target.is_none() {
            self.wander_velocity.x = self.velocity.x;
        }
        if geometry::reflect_axis(&mut head.y, &mut self.velocity.y, arena.height) && target.is_none() {
            self.wander_velocity.y = self.velocity.y;
        }
        self.path[0] = head;

        self.retarget_budget -= motion.magnitude();

        geometry::update_trailing_chain(&mut self.path, motion, &mut self.sway);

        let target = target?;
        if self.reached_current_target {
            return None;
        }
        let head = self.head();
        if math::abs(head.x - target.position.x) < arrival_epsilon
            && math::abs(head.y - target.position.y) < arrival_epsilon
        {
            self.reached_current_target = true;
            return Some(Arrival {
                tadpole: self.id,
                slot: target.slot,
                ticket: target.ticket,
            });
        }
        None
    }

    /// Current outline for the render sink
    pub fn shape(&self, head_length: f32) -> TadpoleShape {
        let head = self.head();
        let mut body = [head; BODY_POINTS];
        body.copy_from_slice(&self.path[..BODY_POINTS]);

        TadpoleShape {
            head_start: head,
            head_end: head + Vector2D::from_polar(head_length, self.velocity.angle()),
            body,
            tail: self.path,
        }
    }

    fn track(&mut self, target: Option<Target>) {
        let key = target.map(|t| t.key());
        if key != self.chasing {
            self.chasing = key;
            self.reached_current_target = false;
        }
    }
}

fn random_component<R: Rng + ?Sized>(config: &PondConfig, rng: &mut R) -> f32 {
    let magnitude = rng.gen_range(config.wander_speed.clone());
    if rng.gen_bool(0.5) {
        magnitude
    } else {
        -magnitude
    }
}
