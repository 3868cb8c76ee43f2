//! Geometry handed to the drawing surface.
//!
//! The pond pushes shapes into a [`RenderSink`] as soon as they change and
//! never reads anything back, so a sink is free to mutate retained drawing
//! primitives directly or to buffer shapes and repaint in [`RenderSink::end_frame`].

use crate::tadpole::{BODY_POINTS, TAIL_LENGTH};
use crate::Vector2D;

/// Drawable outline of one tadpole
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TadpoleShape {
    pub head_start: Vector2D,
    pub head_end: Vector2D,
    /// Control points of the short body curve
    pub body: [Vector2D; BODY_POINTS],
    /// Control points of the full tail curve, starting at the head
    pub tail: [Vector2D; TAIL_LENGTH],
}

/// Drawable state of one food slot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FoodShape {
    pub center: Option<Vector2D>,
    pub radius: f32,
}

impl FoodShape {
    /// Shape of an empty slot
    pub const HIDDEN: FoodShape = FoodShape {
        center: None,
        radius: 0.0,
    };

    pub fn is_visible(&self) -> bool {
        self.center.is_some() && self.radius > 0.0
    }
}

/// Receives geometry from the pond every frame
pub trait RenderSink {
    /// Called after every tick of tadpole `id`
    fn draw_tadpole(&mut self, id: usize, shape: &TadpoleShape);

    /// Called when food slot `slot` is placed, shrinks or is emptied
    fn draw_food(&mut self, slot: usize, shape: &FoodShape);

    /// Called whenever the number of free food slots changes
    fn free_food_changed(&mut self, _free: usize) {}

    /// Called when the population is rebuilt, before any new geometry arrives
    fn reset(&mut self, _tadpoles: usize, _food_slots: usize) {}

    /// Called once all tasks of a frame have run
    fn end_frame(&mut self) {}
}

impl<S: RenderSink + ?Sized> RenderSink for &mut S {
    fn draw_tadpole(&mut self, id: usize, shape: &TadpoleShape) {
        (**self).draw_tadpole(id, shape)
    }

    fn draw_food(&mut self, slot: usize, shape: &FoodShape) {
        (**self).draw_food(slot, shape)
    }

    fn free_food_changed(&mut self, free: usize) {
        (**self).free_food_changed(free)
    }

    fn reset(&mut self, tadpoles: usize, food_slots: usize) {
        (**self).reset(tadpoles, food_slots)
    }

    fn end_frame(&mut self) {
        (**self).end_frame()
    }
}
