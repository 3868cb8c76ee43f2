//! Headless pond runner.
//!
//! Runs the pond for a fixed number of frames, drops food on a script and
//! renders the last frame as SVG.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use serde::Serialize;
use tadpole_core::{FoodShape, Pond, PondConfig, RenderSink, TadpoleShape, Vector2D};
use tadpole_shared::{clamp_tadpole_count, FoodDrop, PondSettings, PondStatus};

/// Food dropped before frame `at_frame` runs
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScheduledDrop {
    pub drop: FoodDrop,
    pub at_frame: u64,
}

impl FromStr for ScheduledDrop {
    type Err = anyhow::Error;

    /// Parses `x,y` or `x,y@frame`
    fn from_str(s: &str) -> Result<Self> {
        let (coords, at_frame) = match s.split_once('@') {
            Some((coords, frame)) => (
                coords,
                frame
                    .trim()
                    .parse::<u64>()
                    .with_context(|| format!("invalid frame in drop '{}'", s))?,
            ),
            None => (s, 0),
        };

        let Some((x, y)) = coords.split_once(',') else {
            bail!("drop '{}' must look like x,y or x,y@frame", s);
        };
        let x: f32 = x.trim().parse().with_context(|| format!("invalid x in drop '{}'", s))?;
        let y: f32 = y.trim().parse().with_context(|| format!("invalid y in drop '{}'", s))?;

        let drop = FoodDrop::new(x, y);
        if !drop.is_finite() {
            bail!("drop '{}' is not a finite position", s);
        }
        Ok(Self { drop, at_frame })
    }
}

/// Everything needed for one headless run
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub settings: PondSettings,
    pub frames: u64,
    pub drops: Vec<ScheduledDrop>,
    pub seed: Option<u64>,
}

/// Outcome of a headless run
#[derive(Debug, Serialize)]
pub struct RunReport {
    pub status: PondStatus,
    /// Drops that found a free slot
    pub accepted_drops: usize,
    /// Drops turned away because every slot was busy
    pub rejected_drops: usize,
    /// Drops skipped because they fell outside the arena
    pub out_of_arena_drops: usize,
    #[serde(skip)]
    pub scene: SvgSink,
}

/// Run the pond headless and keep the final frame
pub fn run(options: &RunOptions) -> Result<RunReport> {
    let config = PondConfig::from(&options.settings);
    let requested = i64::try_from(options.settings.tadpole_count).unwrap_or(i64::MAX);
    let count = clamp_tadpole_count(requested, config.max_tadpoles);
    if count != options.settings.tadpole_count {
        log::warn!(
            "tadpole count {} clamped to {}",
            options.settings.tadpole_count,
            count
        );
    }

    let sink = SvgSink::new(config.arena.width, config.arena.height);
    let mut pond = match options.seed {
        Some(seed) => Pond::with_seed(config, sink, seed),
        None => Pond::new(config, sink),
    }
    .context("invalid pond settings")?;
    pond.set_tadpole_count(count)?;

    let mut schedule: BTreeMap<u64, Vec<FoodDrop>> = BTreeMap::new();
    for scheduled in &options.drops {
        if scheduled.at_frame >= options.frames {
            log::warn!(
                "drop at ({}, {}) scheduled for frame {} never happens",
                scheduled.drop.x,
                scheduled.drop.y,
                scheduled.at_frame
            );
            continue;
        }
        schedule.entry(scheduled.at_frame).or_default().push(scheduled.drop);
    }

    let mut accepted_drops = 0;
    let mut rejected_drops = 0;
    let mut out_of_arena_drops = 0;
    for frame in 0..options.frames {
        for drop in schedule.remove(&frame).unwrap_or_default() {
            if !pond.config().arena.contains(Vector2D::new(drop.x, drop.y)) {
                log::warn!("frame {}: food at ({}, {}) is outside the arena", frame, drop.x, drop.y);
                out_of_arena_drops += 1;
                continue;
            }
            match pond.drop_food(drop.x, drop.y) {
                Some(slot) => {
                    log::debug!("frame {}: food at ({}, {}) in slot {}", frame, drop.x, drop.y, slot);
                    accepted_drops += 1;
                }
                None => {
                    log::info!("frame {}: no free food for ({}, {})", frame, drop.x, drop.y);
                    rejected_drops += 1;
                }
            }
        }
        pond.frame();
    }

    let status = pond.status();
    log::info!(
        "ran {} frames: {} tadpoles, {} free food, {} active",
        status.frame,
        status.tadpole_count,
        status.free_food,
        status.active_food
    );

    let scene = pond.sink().clone();
    pond.teardown();
    Ok(RunReport {
        status,
        accepted_drops,
        rejected_drops,
        out_of_arena_drops,
        scene,
    })
}

/// Render sink that keeps the latest shapes and writes them out as SVG
#[derive(Debug, Clone, Default)]
pub struct SvgSink {
    width: f32,
    height: f32,
    tadpoles: BTreeMap<usize, TadpoleShape>,
    food: BTreeMap<usize, FoodShape>,
    free_food: usize,
    frames: u64,
}

impl SvgSink {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn tadpole_count(&self) -> usize {
        self.tadpoles.len()
    }

    pub fn visible_food(&self) -> usize {
        self.food.values().filter(|food| food.is_visible()).count()
    }

    pub fn free_food(&self) -> usize {
        self.free_food
    }

    /// Frames completed since the sink was created
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn to_svg(&self) -> String {
        let mut svg = String::new();
        // writing into a String cannot fail
        let _ = self.write_svg(&mut svg);
        svg
    }

    fn write_svg(&self, out: &mut String) -> std::fmt::Result {
        writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = self.width,
            h = self.height
        )?;
        writeln!(out, r##"  <rect width="100%" height="100%" fill="#e8f4f8"/>"##)?;

        for food in self.food.values() {
            if let Some(center) = food.center.filter(|_| food.is_visible()) {
                writeln!(
                    out,
                    r#"  <circle cx="{:.2}" cy="{:.2}" r="{:.2}" fill="brown"/>"#,
                    center.x, center.y, food.radius
                )?;
            }
        }

        for (id, tadpole) in &self.tadpoles {
            writeln!(out, r#"  <g id="tadpole-{}" stroke="green" stroke-linecap="round" fill="none">"#, id)?;
            writeln!(
                out,
                r#"    <line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke-width="20"/>"#,
                tadpole.head_start.x, tadpole.head_start.y, tadpole.head_end.x, tadpole.head_end.y
            )?;
            writeln!(out, r#"    <path d="{}" stroke-width="10"/>"#, path_data(&tadpole.body))?;
            writeln!(out, r#"    <path d="{}" stroke-width="4"/>"#, path_data(&tadpole.tail))?;
            writeln!(out, "  </g>")?;
        }

        writeln!(
            out,
            r#"  <text x="10" y="20" font-family="sans-serif" font-size="14">free food: {}</text>"#,
            self.free_food
        )?;
        writeln!(out, "</svg>")
    }
}

fn path_data(points: &[Vector2D]) -> String {
    let mut d = String::new();
    for (i, point) in points.iter().enumerate() {
        let command = if i == 0 { 'M' } else { 'L' };
        let _ = write!(d, "{}{:.2},{:.2}", command, point.x, point.y);
    }
    d
}

impl RenderSink for SvgSink {
    fn draw_tadpole(&mut self, id: usize, shape: &TadpoleShape) {
        self.tadpoles.insert(id, *shape);
    }

    fn draw_food(&mut self, slot: usize, shape: &FoodShape) {
        self.food.insert(slot, *shape);
    }

    fn free_food_changed(&mut self, free: usize) {
        self.free_food = free;
    }

    fn reset(&mut self, _tadpoles: usize, _food_slots: usize) {
        self.tadpoles.clear();
        self.food.clear();
    }

    fn end_frame(&mut self) {
        self.frames += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_drop() {
        let drop: ScheduledDrop = "12.5, 40".parse().unwrap();
        assert_eq!(drop.drop, FoodDrop::new(12.5, 40.0));
        assert_eq!(drop.at_frame, 0);

        let drop: ScheduledDrop = "1,2@30".parse().unwrap();
        assert_eq!(drop.drop, FoodDrop::new(1.0, 2.0));
        assert_eq!(drop.at_frame, 30);
    }

    #[test]
    fn test_parse_drop_rejects_garbage() {
        for input in ["", "12", "a,b", "1,2@x", "1,2@-3", "NaN,4", "inf,1"] {
            assert!(input.parse::<ScheduledDrop>().is_err(), "accepted {:?}", input);
        }
    }

    #[test]
    fn test_path_data() {
        let points = [Vector2D::new(0.0, 1.0), Vector2D::new(2.5, 3.0)];
        assert_eq!(path_data(&points), "M0.00,1.00L2.50,3.00");
        assert_eq!(path_data(&[]), "");
    }

    #[test]
    fn test_svg_lists_visible_shapes_only() {
        let mut sink = SvgSink::new(100.0, 50.0);
        sink.draw_food(
            0,
            &FoodShape {
                center: Some(Vector2D::new(10.0, 10.0)),
                radius: 4.0,
            },
        );
        sink.draw_food(1, &FoodShape::HIDDEN);
        sink.free_food_changed(1);

        let svg = sink.to_svg();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r#"viewBox="0 0 100 50""#));
        assert_eq!(svg.matches("<circle").count(), 1);
        assert!(svg.contains("free food: 1"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_reset_clears_scene() {
        let mut sink = SvgSink::new(10.0, 10.0);
        sink.draw_food(
            0,
            &FoodShape {
                center: Some(Vector2D::new(1.0, 1.0)),
                radius: 2.0,
            },
        );
        sink.end_frame();
        assert_eq!(sink.visible_food(), 1);

        sink.reset(3, 3);
        assert_eq!(sink.visible_food(), 0);
        assert_eq!(sink.tadpole_count(), 0);
        assert_eq!(sink.frames(), 1);
    }
}
