mod frame_buffer;

pub use frame_buffer::FrameBuffer;

use tadpole_core::{FoodShape, Pond, PondConfig, RenderSink, TadpoleShape, Vector2D};
use tadpole_shared::{clamp_tadpole_count, parse_tadpole_count, PondSettings};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Element, HtmlCanvasElement, MouseEvent, TouchEvent};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    fn log(s: &str);
}

macro_rules! console_log {
    ($($t:tt)*) => (log(&format_args!($($t)*).to_string()))
}

const BACKGROUND: &str = "#e8f4f8";
const TADPOLE_COLOR: &str = "green";
const FOOD_COLOR: &str = "brown";
const HEAD_WIDTH: f64 = 20.0;
const BODY_WIDTH: f64 = 10.0;
const TAIL_WIDTH: f64 = 4.0;

/// Paints the buffered frame onto a 2d canvas
struct CanvasSink {
    buffer: FrameBuffer,
    context: CanvasRenderingContext2d,
    width: f64,
    height: f64,
    counter: Option<Element>,
}

impl CanvasSink {
    fn paint(&self) -> Result<(), JsValue> {
        let ctx = &self.context;
        ctx.set_fill_style_str(BACKGROUND);
        ctx.fill_rect(0.0, 0.0, self.width, self.height);

        ctx.set_fill_style_str(FOOD_COLOR);
        for food in self.buffer.visible_food() {
            self.paint_food(food)?;
        }

        ctx.set_stroke_style_str(TADPOLE_COLOR);
        ctx.set_line_cap("round");
        for tadpole in self.buffer.tadpoles() {
            self.paint_tadpole(tadpole);
        }
        Ok(())
    }

    fn paint_food(&self, food: &FoodShape) -> Result<(), JsValue> {
        if let Some(center) = food.center {
            self.context.begin_path();
            self.context.arc(
                center.x as f64,
                center.y as f64,
                food.radius as f64,
                0.0,
                std::f64::consts::TAU,
            )?;
            self.context.fill();
        }
        Ok(())
    }

    fn paint_tadpole(&self, shape: &TadpoleShape) {
        self.stroke_polyline(&[shape.head_start, shape.head_end], HEAD_WIDTH);
        self.stroke_polyline(&shape.body, BODY_WIDTH);
        self.stroke_polyline(&shape.tail, TAIL_WIDTH);
    }

    fn stroke_polyline(&self, points: &[Vector2D], width: f64) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        self.context.set_line_width(width);
        self.context.begin_path();
        self.context.move_to(first.x as f64, first.y as f64);
        for point in rest {
            self.context.line_to(point.x as f64, point.y as f64);
        }
        self.context.stroke();
    }
}

impl RenderSink for CanvasSink {
    fn draw_tadpole(&mut self, id: usize, shape: &TadpoleShape) {
        self.buffer.draw_tadpole(id, shape);
    }

    fn draw_food(&mut self, slot: usize, shape: &FoodShape) {
        self.buffer.draw_food(slot, shape);
    }

    fn free_food_changed(&mut self, free: usize) {
        self.buffer.free_food_changed(free);
    }

    fn reset(&mut self, tadpoles: usize, food_slots: usize) {
        self.buffer.reset(tadpoles, food_slots);
    }

    fn end_frame(&mut self) {
        if let Err(err) = self.paint() {
            console_log!("failed to paint frame: {:?}", err);
        }
        if let Some(free) = self.buffer.take_counter_update() {
            if let Some(counter) = &self.counter {
                counter.set_text_content(Some(&free.to_string()));
            }
        }
    }
}

/// Browser front end of the pond.
///
/// JavaScript drives the frame loop by calling [`PondSimulation::frame`]
/// from `requestAnimationFrame` and forwards clicks on the canvas.
#[wasm_bindgen]
pub struct PondSimulation {
    pond: Pond<CanvasSink>,
    canvas: HtmlCanvasElement,
}

#[wasm_bindgen]
impl PondSimulation {
    #[wasm_bindgen(constructor)]
    pub fn new(
        canvas_id: &str,
        width: f64,
        height: f64,
        tadpole_count: usize,
    ) -> Result<PondSimulation, JsValue> {
        let config = PondConfig::with_arena(width as f32, height as f32);
        Self::build(canvas_id, config, tadpole_count)
    }

    /// Build a pond from a JSON encoded settings object
    pub fn from_settings(canvas_id: &str, settings_json: &str) -> Result<PondSimulation, JsValue> {
        let settings: PondSettings = serde_json::from_str(settings_json)
            .map_err(|err| JsValue::from_str(&format!("invalid settings: {}", err)))?;
        Self::build(canvas_id, PondConfig::from(&settings), settings.tadpole_count)
    }

    /// Show the free food counter in the element with id `element_id`
    pub fn attach_counter(&mut self, element_id: &str) -> Result<(), JsValue> {
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or("no document")?;
        let element = document
            .get_element_by_id(element_id)
            .ok_or("counter element not found")?;
        element.set_text_content(Some(&self.pond.free_food().to_string()));
        self.pond.sink_mut().counter = Some(element);
        Ok(())
    }

    /// Advance and paint one frame
    pub fn frame(&mut self) {
        self.pond.frame();
    }

    /// Rebuild the pond with `count` tadpoles, clamped to the allowed range.
    ///
    /// Asking for the current count changes nothing. Returns the count in
    /// effect afterwards.
    pub fn set_tadpole_count(&mut self, count: i32) -> Result<usize, JsValue> {
        let count = clamp_tadpole_count(count as i64, self.pond.config().max_tadpoles);
        if count == self.pond.tadpole_count() {
            return Ok(count);
        }
        self.pond.set_tadpole_count(count).map_err(to_js)?;
        console_log!("Pond reset with {} tadpoles", count);
        Ok(count)
    }

    /// Apply the raw value of the tadpole count input.
    ///
    /// Anything that is not a whole number counts as zero.
    pub fn update_count_from_input(&mut self, input: &str) -> Result<usize, JsValue> {
        let count = parse_tadpole_count(input, self.pond.config().max_tadpoles);
        let count = i32::try_from(count).unwrap_or(i32::MAX);
        self.set_tadpole_count(count)
    }

    /// Drop food at canvas coordinates. Returns the slot used, if any.
    ///
    /// Points outside the canvas or a full pool drop nothing.
    pub fn drop_food(&mut self, x: f64, y: f64) -> Option<u32> {
        let slot = self.pond.drop_food(x as f32, y as f32);
        match slot {
            Some(slot) => console_log!("Food dropped at ({}, {}) into slot {}", x, y, slot),
            None => console_log!("No food dropped at ({}, {})", x, y),
        }
        slot.map(|slot| slot as u32)
    }

    /// Drop food under a point in client coordinates
    pub fn drop_at_client(&mut self, client_x: i32, client_y: i32) -> Option<u32> {
        let (x, y) = self.to_canvas(client_x, client_y)?;
        self.drop_food(x, y)
    }

    pub fn handle_mouse_click(&mut self, event: MouseEvent) -> Option<u32> {
        self.drop_at_client(event.client_x(), event.client_y())
    }

    /// Drop food under every finger that just touched the canvas
    pub fn handle_touch(&mut self, event: TouchEvent) {
        let touches = event.changed_touches();
        for i in 0..touches.length() {
            if let Some(touch) = touches.item(i) {
                self.drop_at_client(touch.client_x(), touch.client_y());
            }
        }
    }

    pub fn tadpole_count(&self) -> usize {
        self.pond.tadpole_count()
    }

    pub fn free_food(&self) -> usize {
        self.pond.free_food()
    }

    /// Current pond status as JSON
    pub fn status(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.pond.status()).map_err(to_js)
    }

    /// Cancel every scheduled task and clear the canvas
    pub fn teardown(&mut self) {
        self.pond.teardown();
        self.pond.frame();
        console_log!("Pond torn down");
    }

    fn build(
        canvas_id: &str,
        config: PondConfig,
        tadpole_count: usize,
    ) -> Result<PondSimulation, JsValue> {
        console_log!("Initializing pond with {} tadpoles", tadpole_count);

        let window = web_sys::window().ok_or("no global window")?;
        let document = window.document().ok_or("no document")?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or("canvas not found")?
            .dyn_into::<HtmlCanvasElement>()?;

        let width = config.arena.width as f64;
        let height = config.arena.height as f64;
        canvas.set_width(width as u32);
        canvas.set_height(height as u32);

        let context = canvas
            .get_context("2d")?
            .ok_or("no 2d context")?
            .dyn_into::<CanvasRenderingContext2d>()?;

        let sink = CanvasSink {
            buffer: FrameBuffer::new(),
            context,
            width,
            height,
            counter: None,
        };
        let count = clamp_tadpole_count(tadpole_count as i64, config.max_tadpoles);
        let mut pond = Pond::new(config, sink).map_err(to_js)?;
        pond.set_tadpole_count(count).map_err(to_js)?;

        Ok(PondSimulation { pond, canvas })
    }

    /// Map a client point to canvas pixels, or `None` when it misses the canvas.
    ///
    /// The canvas may be scaled by CSS, so the offset inside the bounding
    /// rect is stretched back to the canvas resolution.
    fn to_canvas(&self, client_x: i32, client_y: i32) -> Option<(f64, f64)> {
        let canvas_element: &Element = self.canvas.as_ref();
        let rect = canvas_element.get_bounding_client_rect();
        canvas_point(
            (client_x as f64 - rect.left(), client_y as f64 - rect.top()),
            (rect.width(), rect.height()),
            (self.canvas.width() as f64, self.canvas.height() as f64),
        )
    }
}

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Scale an offset inside a rect of `rect_size` to a surface of `surface_size`
fn canvas_point(
    offset: (f64, f64),
    rect_size: (f64, f64),
    surface_size: (f64, f64),
) -> Option<(f64, f64)> {
    let (dx, dy) = offset;
    let (rect_width, rect_height) = rect_size;
    if rect_width <= 0.0 || rect_height <= 0.0 {
        return None;
    }
    if !(0.0..=rect_width).contains(&dx) || !(0.0..=rect_height).contains(&dy) {
        return None;
    }
    let (width, height) = surface_size;
    Some((dx * width / rect_width, dy * height / rect_height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canvas_point_unscaled() {
        assert_eq!(
            canvas_point((30.0, 40.0), (400.0, 300.0), (400.0, 300.0)),
            Some((30.0, 40.0))
        );
    }

    #[test]
    fn test_canvas_point_scaled_by_css() {
        // 400x300 canvas shown at 200x150
        assert_eq!(
            canvas_point((100.0, 75.0), (200.0, 150.0), (400.0, 300.0)),
            Some((200.0, 150.0))
        );
        assert_eq!(
            canvas_point((200.0, 150.0), (200.0, 150.0), (400.0, 300.0)),
            Some((400.0, 300.0))
        );
    }

    #[test]
    fn test_canvas_point_outside_rect() {
        let rect = (200.0, 150.0);
        let surface = (400.0, 300.0);
        assert_eq!(canvas_point((-1.0, 10.0), rect, surface), None);
        assert_eq!(canvas_point((10.0, 151.0), rect, surface), None);
        assert_eq!(canvas_point((10.0, 10.0), (0.0, 0.0), surface), None);
    }
}
