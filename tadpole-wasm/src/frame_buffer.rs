use tadpole_core::{FoodShape, RenderSink, TadpoleShape};

/// Latest geometry for every primitive on the canvas.
///
/// The canvas keeps no retained scene, so shapes pushed by the pond are
/// stored here and repainted together at the end of each frame.
#[derive(Debug, Default)]
pub struct FrameBuffer {
    tadpoles: Vec<Option<TadpoleShape>>,
    food: Vec<FoodShape>,
    free_food: usize,
    counter_dirty: bool,
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tadpoles that have been drawn at least once since the last reset
    pub fn tadpoles(&self) -> impl Iterator<Item = &TadpoleShape> {
        self.tadpoles.iter().flatten()
    }

    /// Food items currently worth painting
    pub fn visible_food(&self) -> impl Iterator<Item = &FoodShape> {
        self.food.iter().filter(|shape| shape.is_visible())
    }

    pub fn free_food(&self) -> usize {
        self.free_food
    }

    /// Counter value to publish, once per change
    pub fn take_counter_update(&mut self) -> Option<usize> {
        if std::mem::take(&mut self.counter_dirty) {
            Some(self.free_food)
        } else {
            None
        }
    }
}

impl RenderSink for FrameBuffer {
    fn draw_tadpole(&mut self, id: usize, shape: &TadpoleShape) {
        if id >= self.tadpoles.len() {
            self.tadpoles.resize(id + 1, None);
        }
        self.tadpoles[id] = Some(*shape);
    }

    fn draw_food(&mut self, slot: usize, shape: &FoodShape) {
        if slot >= self.food.len() {
            self.food.resize(slot + 1, FoodShape::HIDDEN);
        }
        self.food[slot] = *shape;
    }

    fn free_food_changed(&mut self, free: usize) {
        self.free_food = free;
        self.counter_dirty = true;
    }

    fn reset(&mut self, tadpoles: usize, food_slots: usize) {
        self.tadpoles.clear();
        self.tadpoles.resize(tadpoles, None);
        self.food.clear();
        self.food.resize(food_slots, FoodShape::HIDDEN);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tadpole_core::{Pond, PondConfig, Vector2D};

    #[test]
    fn test_buffer_tracks_latest_shapes() {
        let mut pond = Pond::with_seed(PondConfig::default(), FrameBuffer::new(), 3).unwrap();
        pond.set_tadpole_count(6).unwrap();
        assert_eq!(pond.sink().tadpoles().count(), 0);

        pond.frame();
        assert_eq!(pond.sink().tadpoles().count(), 6);
        for (shape, tadpole) in pond.sink().tadpoles().zip(pond.tadpoles()) {
            assert_eq!(shape.head_start, tadpole.head());
        }
    }

    #[test]
    fn test_food_visibility() {
        let mut buffer = FrameBuffer::new();
        buffer.reset(2, 2);
        assert_eq!(buffer.visible_food().count(), 0);

        let shape = FoodShape {
            center: Some(Vector2D::new(4.0, 4.0)),
            radius: 3.0,
        };
        buffer.draw_food(1, &shape);
        assert_eq!(buffer.visible_food().collect::<Vec<_>>(), vec![&shape]);

        buffer.draw_food(1, &FoodShape::HIDDEN);
        assert_eq!(buffer.visible_food().count(), 0);
    }

    #[test]
    fn test_counter_update_is_taken_once() {
        let mut buffer = FrameBuffer::new();
        assert_eq!(buffer.take_counter_update(), None);
        buffer.free_food_changed(4);
        buffer.free_food_changed(3);
        assert_eq!(buffer.take_counter_update(), Some(3));
        assert_eq!(buffer.take_counter_update(), None);
        assert_eq!(buffer.free_food(), 3);
    }
}
