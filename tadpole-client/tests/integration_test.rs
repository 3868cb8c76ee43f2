use anyhow::Result;
use tadpole_client::{run, RunOptions, ScheduledDrop};
use tadpole_shared::PondSettings;

fn settings(width: f32, height: f32, count: usize) -> PondSettings {
    PondSettings {
        arena_width: width,
        arena_height: height,
        tadpole_count: count,
        ..PondSettings::default()
    }
}

fn drops(specs: &[&str]) -> Result<Vec<ScheduledDrop>> {
    specs.iter().map(|spec| spec.parse()).collect()
}

#[test]
fn test_run_without_food() -> Result<()> {
    let report = run(&RunOptions {
        settings: settings(400.0, 300.0, 12),
        frames: 60,
        drops: Vec::new(),
        seed: Some(1),
    })?;

    assert_eq!(report.status.frame, 60);
    assert_eq!(report.status.tadpole_count, 12);
    assert_eq!(report.status.free_food, 12);
    assert_eq!(report.status.active_food, 0);
    assert_eq!(report.scene.tadpole_count(), 12);
    assert_eq!(report.scene.frames(), 60);
    Ok(())
}

#[test]
fn test_busy_pool_rejects_drops() -> Result<()> {
    let report = run(&RunOptions {
        settings: settings(1000.0, 600.0, 2),
        frames: 3,
        drops: drops(&["100,100", "200,200", "300,300", "400,400@1"])?,
        seed: Some(7),
    })?;

    assert_eq!(report.accepted_drops, 2);
    assert_eq!(report.rejected_drops, 2);
    assert_eq!(report.status.free_food, 0);
    assert_eq!(report.status.active_food, 2);
    assert_eq!(report.scene.visible_food(), 2);
    Ok(())
}

#[test]
fn test_food_gets_eaten() -> Result<()> {
    let report = run(&RunOptions {
        settings: settings(120.0, 80.0, 4),
        frames: 5_000,
        drops: drops(&["60,40"])?,
        seed: Some(77),
    })?;

    assert_eq!(report.accepted_drops, 1);
    assert_eq!(report.status.free_food, 4);
    assert_eq!(report.status.active_food, 0);
    assert_eq!(report.scene.visible_food(), 0);
    Ok(())
}

#[test]
fn test_drop_outside_arena_is_skipped() -> Result<()> {
    let report = run(&RunOptions {
        settings: settings(120.0, 80.0, 4),
        frames: 5_000,
        drops: drops(&["500,500", "60,40"])?,
        seed: Some(77),
    })?;

    assert_eq!(report.out_of_arena_drops, 1);
    assert_eq!(report.accepted_drops, 1);
    assert_eq!(report.rejected_drops, 0);
    assert_eq!(report.status.free_food, 4);
    assert_eq!(report.status.active_food, 0);
    Ok(())
}

#[test]
fn test_huge_count_is_clamped_to_max() -> Result<()> {
    let report = run(&RunOptions {
        settings: settings(300.0, 300.0, usize::MAX),
        frames: 1,
        drops: Vec::new(),
        seed: Some(3),
    })?;

    assert_eq!(report.status.tadpole_count, 500);
    Ok(())
}

#[test]
fn test_count_is_clamped() -> Result<()> {
    let report = run(&RunOptions {
        settings: settings(300.0, 300.0, 10_000),
        frames: 1,
        drops: Vec::new(),
        seed: Some(3),
    })?;

    assert_eq!(report.status.tadpole_count, 500);
    Ok(())
}

#[test]
fn test_invalid_arena_is_an_error() {
    let result = run(&RunOptions {
        settings: settings(0.0, 300.0, 1),
        frames: 1,
        drops: Vec::new(),
        seed: Some(3),
    });
    assert!(result.is_err());
}

#[test]
fn test_late_drops_are_skipped() -> Result<()> {
    let report = run(&RunOptions {
        settings: settings(300.0, 300.0, 3),
        frames: 10,
        drops: drops(&["10,10@10", "20,20@500"])?,
        seed: Some(5),
    })?;

    assert_eq!(report.accepted_drops, 0);
    assert_eq!(report.rejected_drops, 0);
    assert_eq!(report.status.free_food, 3);
    Ok(())
}

#[test]
fn test_svg_written_to_disk() -> Result<()> {
    let report = run(&RunOptions {
        settings: settings(200.0, 100.0, 3),
        frames: 20,
        drops: drops(&["50,50@5"])?,
        seed: Some(11),
    })?;

    let path = std::env::temp_dir().join(format!("tadpole-client-{}.svg", std::process::id()));
    std::fs::write(&path, report.scene.to_svg())?;
    let svg = std::fs::read_to_string(&path)?;
    std::fs::remove_file(&path)?;

    assert!(svg.starts_with("<svg"));
    assert_eq!(svg.matches("<g id=\"tadpole-").count(), 3);
    assert!(svg.contains(r#"viewBox="0 0 200 100""#));
    Ok(())
}
