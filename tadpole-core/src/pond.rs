//! The pond: owns the population and the food pool and drives them frame
//! by frame.

use alloc::vec::Vec;

use rand::rngs::SmallRng;
use rand::SeedableRng;
use tadpole_shared::PondStatus;

use crate::config::PondConfig;
use crate::error::PondError;
use crate::food::FoodPool;
use crate::frame::{FrameClock, FrameRequestId, FrameTask};
use crate::render::RenderSink;
use crate::tadpole::Tadpole;
use crate::Vector2D;

/// Top-level simulation state bound to one render sink.
///
/// Each tadpole ticks as its own frame task and the food pool depletes as a
/// separate task that only runs while food is out. All mutation goes through
/// `&mut self`, so the food pool is the only writer of target state and a
/// tadpole's reached flag is only ever set from that tadpole's own
/// [`Arrival`](crate::Arrival).
pub struct Pond<S: RenderSink> {
    config: PondConfig,
    sink: S,
    rng: SmallRng,
    tadpoles: Vec<Tadpole>,
    pool: FoodPool,
    clock: FrameClock,
    tadpole_frames: Vec<Option<FrameRequestId>>,
    depletion_frame: Option<FrameRequestId>,
}

impl<S: RenderSink> Pond<S> {
    /// Empty pond seeded from system entropy
    #[cfg(feature = "std")]
    pub fn new(config: PondConfig, sink: S) -> Result<Self, PondError> {
        Self::with_rng(config, sink, SmallRng::from_entropy())
    }

    /// Empty pond with a seeded generator
    pub fn with_seed(config: PondConfig, sink: S, seed: u64) -> Result<Self, PondError> {
        Self::with_rng(config, sink, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(config: PondConfig, sink: S, rng: SmallRng) -> Result<Self, PondError> {
        config.validate()?;
        let base_radius = config.food_radius(0);

        let mut pond = Self {
            config,
            sink,
            rng,
            tadpoles: Vec::new(),
            pool: FoodPool::new(0, base_radius),
            clock: FrameClock::new(),
            tadpole_frames: Vec::new(),
            depletion_frame: None,
        };
        pond.sink.reset(0, 0);
        pond.sink.free_food_changed(0);
        Ok(pond)
    }

    /// Replace the population with `count` fresh tadpoles.
    ///
    /// Every standing frame request is cancelled first, the food pool is
    /// emptied and resized to `count` slots, and the free food counter is
    /// re-issued.
    pub fn set_tadpole_count(&mut self, count: usize) -> Result<(), PondError> {
        if count > self.config.max_tadpoles {
            return Err(PondError::TooManyTadpoles {
                requested: count,
                max: self.config.max_tadpoles,
            });
        }

        self.cancel_frames();

        let config = &self.config;
        let rng = &mut self.rng;
        self.tadpoles = (0..count)
            .map(|id| Tadpole::random(id, config, &mut *rng))
            .collect();
        self.pool.reset(count, config.food_radius(count));

        self.sink.reset(count, count);
        self.sink.free_food_changed(self.pool.free_count());

        let clock = &mut self.clock;
        self.tadpole_frames = (0..count)
            .map(|id| Some(clock.request(FrameTask::Tadpole(id))))
            .collect();

        log::debug!(
            "pond reset with {} tadpoles, food radius {:.2}",
            count,
            self.pool.base_radius()
        );
        Ok(())
    }

    /// Drop food at arena coordinates `(x, y)`.
    ///
    /// Returns the slot holding the new food, or `None` when no slot is free
    /// or the point lies outside the arena. Neither case is an error.
    pub fn drop_food(&mut self, x: f32, y: f32) -> Option<usize> {
        let position = Vector2D::new(x, y);
        // tadpoles never leave the arena, so food outside it is never eaten
        if !self.config.arena.contains(position) {
            log::debug!("food at ({}, {}) outside the arena ignored", x, y);
            return None;
        }
        let slot = self.pool.try_allocate(position)?;

        self.sink.draw_food(slot, &self.pool.shape(slot));
        self.sink.free_food_changed(self.pool.free_count());

        if self.depletion_frame.is_none() {
            log::trace!("depletion loop resumed");
            self.depletion_frame = Some(self.clock.request(FrameTask::Depletion));
        }
        Some(slot)
    }

    /// Run every task due this frame, then let the sink finish the frame
    pub fn frame(&mut self) {
        for (id, task) in self.clock.advance() {
            match task {
                FrameTask::Tadpole(index) => {
                    debug_assert_eq!(self.tadpole_frames.get(index).copied().flatten(), Some(id));
                    self.tick_tadpole(index);
                }
                FrameTask::Depletion => {
                    debug_assert_eq!(self.depletion_frame, Some(id));
                    self.deplete_food();
                }
            }
        }
        self.sink.end_frame();
    }

    /// Stop the simulation and drop the population.
    ///
    /// After this no task is scheduled, so [`Pond::frame`] does nothing until
    /// the next [`Pond::set_tadpole_count`].
    pub fn teardown(&mut self) {
        self.cancel_frames();
        self.tadpoles.clear();
        self.pool.reset(0, self.config.food_radius(0));
        self.sink.reset(0, 0);
        self.sink.free_food_changed(0);
        log::debug!("pond torn down");
    }

    fn tick_tadpole(&mut self, index: usize) {
        let target = self.pool.target_for(index);
        let Some(tadpole) = self.tadpoles.get_mut(index) else {
            return;
        };

        let arrival = tadpole.tick(target, self.config.arena, self.config.arrival_epsilon);
        if let Some(arrival) = arrival {
            if self.pool.signal_arrival(arrival) {
                log::trace!("tadpole {} reached food slot {}", index, arrival.slot());
            }
        }

        self.sink.draw_tadpole(index, &tadpole.shape(self.config.head_length));
        self.tadpole_frames[index] = Some(self.clock.request(FrameTask::Tadpole(index)));
    }

    fn deplete_food(&mut self) {
        let released = self.pool.deplete(&mut self.sink);
        if released > 0 {
            self.sink.free_food_changed(self.pool.free_count());
        }

        if self.pool.is_idle() {
            log::trace!("depletion loop idle");
            self.depletion_frame = None;
        } else {
            self.depletion_frame = Some(self.clock.request(FrameTask::Depletion));
        }
    }

    fn cancel_frames(&mut self) {
        for id in self.tadpole_frames.drain(..).flatten() {
            self.clock.cancel(id);
        }
        if let Some(id) = self.depletion_frame.take() {
            self.clock.cancel(id);
        }
    }

    pub fn config(&self) -> &PondConfig {
        &self.config
    }

    pub fn tadpoles(&self) -> &[Tadpole] {
        &self.tadpoles
    }

    pub fn tadpole_count(&self) -> usize {
        self.tadpoles.len()
    }

    pub fn pool(&self) -> &FoodPool {
        &self.pool
    }

    /// Number of free food slots, the externally observed counter
    pub fn free_food(&self) -> usize {
        self.pool.free_count()
    }

    pub fn frame_number(&self) -> u64 {
        self.clock.frame()
    }

    /// Standing frame requests, one per tadpole plus one while food is out
    pub fn scheduled_tasks(&self) -> usize {
        self.clock.pending_count()
    }

    pub fn is_depleting(&self) -> bool {
        self.depletion_frame.is_some()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn status(&self) -> PondStatus {
        PondStatus {
            tadpole_count: self.tadpoles.len(),
            free_food: self.pool.free_count(),
            active_food: self.pool.used_count(),
            frame: self.clock.frame(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{FoodShape, TadpoleShape};

    #[derive(Default)]
    struct CountingSink {
        tadpole_draws: usize,
        food_draws: Vec<(usize, FoodShape)>,
        counters: Vec<usize>,
        resets: Vec<(usize, usize)>,
        frames: usize,
    }

    impl RenderSink for CountingSink {
        fn draw_tadpole(&mut self, _id: usize, _shape: &TadpoleShape) {
            self.tadpole_draws += 1;
        }

        fn draw_food(&mut self, slot: usize, shape: &FoodShape) {
            self.food_draws.push((slot, *shape));
        }

        fn free_food_changed(&mut self, free: usize) {
            self.counters.push(free);
        }

        fn reset(&mut self, tadpoles: usize, food_slots: usize) {
            self.resets.push((tadpoles, food_slots));
        }

        fn end_frame(&mut self) {
            self.frames += 1;
        }
    }

    fn pond(count: usize) -> Pond<CountingSink> {
        let mut pond = Pond::with_seed(PondConfig::default(), CountingSink::default(), 11).unwrap();
        pond.set_tadpole_count(count).unwrap();
        pond
    }

    #[test]
    fn test_new_pond_is_empty() {
        let pond = Pond::with_seed(PondConfig::default(), CountingSink::default(), 1).unwrap();
        assert_eq!(pond.tadpole_count(), 0);
        assert_eq!(pond.free_food(), 0);
        assert_eq!(pond.sink().counters, vec![0]);
        assert_eq!(pond.scheduled_tasks(), 0);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let result = Pond::with_seed(PondConfig::with_arena(-1.0, 10.0), CountingSink::default(), 1);
        assert!(matches!(result, Err(PondError::Config(_))));
    }

    #[test]
    fn test_reset_schedules_one_task_per_tadpole() {
        let pond = pond(5);
        assert_eq!(pond.tadpole_count(), 5);
        assert_eq!(pond.free_food(), 5);
        assert_eq!(pond.scheduled_tasks(), 5);
        assert_eq!(pond.sink().resets.last(), Some(&(5, 5)));
        assert_eq!(pond.sink().counters.last(), Some(&5));
    }

    #[test]
    fn test_too_many_tadpoles() {
        let mut pond = pond(2);
        let err = pond.set_tadpole_count(501).unwrap_err();
        assert_eq!(err, PondError::TooManyTadpoles { requested: 501, max: 500 });
        // state untouched
        assert_eq!(pond.tadpole_count(), 2);
        assert_eq!(pond.scheduled_tasks(), 2);
    }

    #[test]
    fn test_frame_ticks_every_tadpole_once() {
        let mut pond = pond(4);
        pond.frame();
        assert_eq!(pond.sink().tadpole_draws, 4);
        assert_eq!(pond.sink().frames, 1);
        assert_eq!(pond.scheduled_tasks(), 4);
        pond.frame();
        assert_eq!(pond.sink().tadpole_draws, 8);
        assert_eq!(pond.frame_number(), 2);
    }

    #[test]
    fn test_recount_cancels_old_tasks() {
        let mut pond = pond(4);
        pond.drop_food(10.0, 10.0);
        assert_eq!(pond.scheduled_tasks(), 5);

        pond.set_tadpole_count(2).unwrap();
        assert_eq!(pond.scheduled_tasks(), 2);
        assert!(!pond.is_depleting());

        pond.frame();
        assert_eq!(pond.sink().tadpole_draws, 2);
    }

    #[test]
    fn test_drop_food_starts_depletion_once() {
        let mut pond = pond(3);
        assert_eq!(pond.drop_food(100.0, 100.0), Some(0));
        assert!(pond.is_depleting());
        assert_eq!(pond.drop_food(200.0, 100.0), Some(1));
        // one depletion task no matter how much food is out
        assert_eq!(pond.scheduled_tasks(), 4);
        assert_eq!(pond.sink().counters, vec![0, 3, 2, 1]);

        let (slot, shape) = pond.sink().food_draws[0];
        assert_eq!(slot, 0);
        assert_eq!(shape.center, Some(Vector2D::new(100.0, 100.0)));
        assert_eq!(shape.radius, pond.config().food_radius(3));
    }

    #[test]
    fn test_drop_without_free_slot_is_noop() {
        let mut pond = pond(1);
        assert_eq!(pond.drop_food(1.0, 1.0), Some(0));
        let counters = pond.sink().counters.len();
        assert_eq!(pond.drop_food(2.0, 2.0), None);
        assert_eq!(pond.sink().counters.len(), counters);
        assert_eq!(pond.pool().used_slots(), &[0]);
    }

    #[test]
    fn test_non_finite_drop_is_ignored() {
        let mut pond = pond(2);
        assert_eq!(pond.drop_food(f32::NAN, 1.0), None);
        assert_eq!(pond.drop_food(1.0, f32::INFINITY), None);
        assert_eq!(pond.free_food(), 2);
        assert!(!pond.is_depleting());
    }

    #[test]
    fn test_drop_outside_arena_is_ignored() {
        let mut pond = pond(2);
        let arena = pond.config().arena;
        assert_eq!(pond.drop_food(-1.0, 10.0), None);
        assert_eq!(pond.drop_food(10.0, arena.height + 0.5), None);
        assert_eq!(pond.drop_food(arena.width * 2.0, arena.height * 2.0), None);
        assert_eq!(pond.free_food(), 2);
        assert!(!pond.is_depleting());

        assert_eq!(pond.drop_food(0.0, 0.0), Some(0));
        assert_eq!(pond.drop_food(arena.width, arena.height), Some(1));
    }

    #[test]
    fn test_teardown_stops_everything() {
        let mut pond = pond(3);
        pond.drop_food(5.0, 5.0);
        pond.teardown();
        assert_eq!(pond.scheduled_tasks(), 0);
        assert_eq!(pond.tadpole_count(), 0);

        let draws = pond.sink().tadpole_draws;
        pond.frame();
        assert_eq!(pond.sink().tadpole_draws, draws);
    }

    #[test]
    fn test_zero_tadpoles() {
        let mut pond = pond(0);
        assert_eq!(pond.free_food(), 0);
        assert_eq!(pond.drop_food(1.0, 1.0), None);
        pond.frame();
        assert_eq!(pond.sink().tadpole_draws, 0);
    }

    #[test]
    fn test_status() {
        let mut pond = pond(3);
        pond.drop_food(50.0, 50.0);
        pond.frame();
        let status = pond.status();
        assert_eq!(status.tadpole_count, 3);
        assert_eq!(status.frame, 1);
        assert_eq!(status.free_food + status.active_food, 3);
    }
}
