//! Bounded pool of food slots shared by the whole population.
//!
//! Every slot sits either on the free stack or in the used list. Dropping
//! food pops the most recently freed slot; a used slot shrinks as tadpoles
//! reach it and returns to the free stack once every tadpole has eaten.
//! Tadpoles work through active food oldest first, so each item behaves like
//! a queue entry consumed once by every tadpole.

use alloc::vec;
use alloc::vec::Vec;

use crate::render::{FoodShape, RenderSink};
use crate::tadpole::{Arrival, Target};
use crate::Vector2D;

/// One placeable food item
#[derive(Debug, Clone, PartialEq)]
pub struct FoodSlot {
    index: usize,
    position: Option<Vector2D>,
    remaining: usize,
    ticket: u64,
    /// Which tadpoles reached the current item
    reached: Vec<bool>,
    reached_count: usize,
}

impl FoodSlot {
    fn new(index: usize, population: usize) -> Self {
        Self {
            index,
            position: None,
            remaining: 0,
            ticket: 0,
            reached: vec![false; population],
            reached_count: 0,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn position(&self) -> Option<Vector2D> {
        self.position
    }

    pub fn remaining(&self) -> usize {
        self.remaining
    }

    pub fn ticket(&self) -> u64 {
        self.ticket
    }

    pub fn is_active(&self) -> bool {
        self.position.is_some()
    }

    pub fn reached_count(&self) -> usize {
        self.reached_count
    }

    pub fn has_reached(&self, tadpole: usize) -> bool {
        self.reached.get(tadpole).copied().unwrap_or(false)
    }

    fn target(&self) -> Option<Target> {
        self.position.map(|position| Target {
            slot: self.index,
            ticket: self.ticket,
            position,
        })
    }
}

/// Fixed-capacity food allocator
#[derive(Debug, Clone)]
pub struct FoodPool {
    slots: Vec<FoodSlot>,
    /// LIFO of inactive slot indices
    free: Vec<usize>,
    /// Active slot indices in drop order
    used: Vec<usize>,
    base_radius: f32,
    next_ticket: u64,
}

impl FoodPool {
    /// Pool with one slot per tadpole
    pub fn new(population: usize, base_radius: f32) -> Self {
        Self {
            slots: (0..population)
                .map(|index| FoodSlot::new(index, population))
                .collect(),
            // reversed so slot 0 is handed out first
            free: (0..population).rev().collect(),
            used: Vec::new(),
            base_radius,
            next_ticket: 0,
        }
    }

    /// Drop every item and resize to a new population
    pub fn reset(&mut self, population: usize, base_radius: f32) {
        let next_ticket = self.next_ticket;
        *self = Self::new(population, base_radius);
        // tickets stay unique across resets
        self.next_ticket = next_ticket;
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Amount a fresh item starts with, one unit per tadpole
    pub fn initial_amount(&self) -> usize {
        self.slots.len()
    }

    pub fn base_radius(&self) -> f32 {
        self.base_radius
    }

    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    pub fn used_count(&self) -> usize {
        self.used.len()
    }

    /// No item is depleting
    pub fn is_idle(&self) -> bool {
        self.used.is_empty()
    }

    pub fn free_slots(&self) -> &[usize] {
        &self.free
    }

    pub fn used_slots(&self) -> &[usize] {
        &self.used
    }

    pub fn slot(&self, index: usize) -> Option<&FoodSlot> {
        self.slots.get(index)
    }

    pub fn slots(&self) -> &[FoodSlot] {
        &self.slots
    }

    /// Place food at `position`.
    ///
    /// Returns `None` without touching the pool when every slot is in use or
    /// the position is not finite.
    pub fn try_allocate(&mut self, position: Vector2D) -> Option<usize> {
        if !position.is_finite() {
            log::debug!("ignoring food drop at non-finite position {:?}", position);
            return None;
        }

        let Some(index) = self.free.pop() else {
            log::trace!("food pool exhausted, drop at {:?} ignored", position);
            return None;
        };

        let initial = self.initial_amount();
        let slot = &mut self.slots[index];
        slot.position = Some(position);
        slot.remaining = initial;
        slot.ticket = self.next_ticket;
        slot.reached.iter_mut().for_each(|flag| *flag = false);
        slot.reached_count = 0;
        self.next_ticket += 1;
        self.used.push(index);

        log::debug!(
            "food slot {} placed at ({:.1}, {:.1}), {} free",
            index,
            position.x,
            position.y,
            self.free.len()
        );
        Some(index)
    }

    /// Oldest active item `tadpole` has not reached yet
    pub fn target_for(&self, tadpole: usize) -> Option<Target> {
        self.used
            .iter()
            .map(|&index| &self.slots[index])
            .find(|slot| slot.reached.get(tadpole) == Some(&false))
            .and_then(FoodSlot::target)
    }

    /// Record an arrival, returns `false` if it was stale or already counted
    pub fn signal_arrival(&mut self, arrival: Arrival) -> bool {
        let Some(slot) = self.slots.get_mut(arrival.slot()) else {
            return false;
        };
        if !slot.is_active() || slot.ticket != arrival.ticket() {
            return false;
        }
        match slot.reached.get_mut(arrival.tadpole()) {
            Some(flag) if !*flag => {
                *flag = true;
                slot.reached_count += 1;
                true
            }
            _ => false,
        }
    }

    /// Current drawable state of a slot
    pub fn shape(&self, index: usize) -> FoodShape {
        match self.slots.get(index) {
            Some(slot) if slot.is_active() && slot.remaining > 0 => FoodShape {
                center: slot.position,
                radius: self.base_radius * (slot.remaining as f32 / self.initial_amount() as f32),
            },
            _ => FoodShape::HIDDEN,
        }
    }

    /// Shrink every active item by the arrivals it has seen.
    ///
    /// Items with nothing left are emptied and pushed back onto the free
    /// stack. Each used slot's new shape goes to `sink`. Returns the number
    /// of slots released.
    pub fn deplete<S: RenderSink + ?Sized>(&mut self, sink: &mut S) -> usize {
        let initial = self.initial_amount();
        let base_radius = self.base_radius;
        let mut released = 0;

        let mut used = core::mem::take(&mut self.used);
        used.retain(|&index| {
            let slot = &mut self.slots[index];
            let remaining = initial.saturating_sub(slot.reached_count).min(slot.remaining);
            slot.remaining = remaining;

            if remaining > 0 {
                let shape = FoodShape {
                    center: slot.position,
                    radius: base_radius * (remaining as f32 / initial as f32),
                };
                sink.draw_food(index, &shape);
                return true;
            }

            slot.position = None;
            self.free.push(index);
            released += 1;
            log::debug!("food slot {} eaten, {} free", index, self.free.len());
            sink.draw_food(index, &FoodShape::HIDDEN);
            false
        });
        self.used = used;

        released
    }
}
