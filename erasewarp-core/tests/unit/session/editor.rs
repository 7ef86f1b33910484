use super::*;
use crate::foundation::core::{Rgba, Vec2};

const PAINT: Rgba = Rgba::new(1.0, 1.0, 1.0, 1.0);

fn session(w: u32, h: u32, viewport: Size) -> EditSession {
    let image = PixelBuffer::filled(w, h, PAINT).unwrap();
    let config = SessionConfig {
        threads: Some(2),
        ..SessionConfig::default()
    };
    EditSession::new(image, viewport, config).unwrap()
}

#[test]
fn new_fits_image_and_starts_at_baseline() {
    let s = session(100, 50, Size::new(400.0, 400.0));
    assert_eq!(s.transform().scale, 4.0);
    assert_eq!(s.transform().offset, Vec2::new(0.0, 100.0));
    assert!(s.grid().is_at_baseline());
    assert_eq!(s.grid().current().get(0, 0), Some(Point::new(0.0, 100.0)));
    assert_eq!(s.grid().current().get(2, 2), Some(Point::new(400.0, 300.0)));
    assert_eq!(s.mode(), ToolMode::Erase);
}

#[test]
fn new_rejects_bad_config_and_viewport() {
    let image = PixelBuffer::new(4, 4).unwrap();
    let config = SessionConfig {
        threads: Some(0),
        ..SessionConfig::default()
    };
    assert!(EditSession::new(image.clone(), Size::new(10.0, 10.0), config).is_err());
    assert!(EditSession::new(image, Size::new(0.0, 10.0), SessionConfig::default()).is_err());
}

#[test]
fn press_stamps_once_and_drag_fills_the_gap() {
    let mut s = session(100, 100, Size::new(100.0, 100.0));
    assert_eq!(s.erase_radius_px(), 17.0);

    let out = s.pointer_pressed(Point::new(20.0, 50.0)).unwrap();
    assert_eq!(out, PointerOutcome::Erased { stamps: 1 });
    assert_eq!(s.image().get(20, 50), Some(Rgba::TRANSPARENT));

    // 60 px at 8.5 px spacing -> 7 steps -> 8 stamps.
    let out = s.pointer_moved(Point::new(80.0, 50.0)).unwrap();
    assert_eq!(out, PointerOutcome::Erased { stamps: 8 });
    for x in 20..=80 {
        assert_eq!(s.image().get(x, 50), Some(Rgba::TRANSPARENT), "x={x}");
    }
    assert_eq!(s.image().get(50, 10), Some(PAINT));

    s.pointer_released();
    let out = s.pointer_moved(Point::new(50.0, 90.0)).unwrap();
    assert_eq!(out, PointerOutcome::Ignored);
    assert_eq!(s.image().get(50, 90), Some(PAINT));
}

#[test]
fn erase_radius_follows_display_scale() {
    let mut s = session(50, 50, Size::new(100.0, 100.0));
    assert_eq!(s.erase_radius_px(), 8.5);
    s.pointer_pressed(Point::new(50.0, 50.0)).unwrap();
    assert_eq!(s.image().get(25, 25), Some(Rgba::TRANSPARENT));
    assert_eq!(s.image().get(25, 34), Some(PAINT));
    assert_eq!(s.image().get(25, 33), Some(Rgba::TRANSPARENT));
}

#[test]
fn press_outside_image_is_ignored() {
    let mut s = session(50, 50, Size::new(200.0, 100.0));
    // Image spans x in [50, 150] on screen.
    let before = s.image().clone();
    let out = s.pointer_pressed(Point::new(10.0, 50.0)).unwrap();
    assert_eq!(out, PointerOutcome::Ignored);
    assert_eq!(s.image(), &before);
}

#[test]
fn far_drag_sample_erases_only_the_visible_part() {
    let mut s = session(64, 64, Size::new(64.0, 64.0));
    s.pointer_pressed(Point::new(5.0, 5.0)).unwrap();

    let out = s.pointer_moved(Point::new(1e18, 5.0)).unwrap();
    let PointerOutcome::Erased { stamps } = out else {
        panic!("expected an erase, got {out:?}");
    };
    assert!((1..=8).contains(&stamps), "stamps={stamps}");
    assert_eq!(s.image().get(60, 5), Some(Rgba::TRANSPARENT));
    assert_eq!(s.image().get(60, 60), Some(PAINT));

    let out = s.pointer_moved(Point::new(-1e18, -1e18)).unwrap();
    assert_eq!(out, PointerOutcome::Ignored);
}

#[test]
fn warp_drag_then_commit_replaces_image_and_resets_grid() {
    let mut image = PixelBuffer::new(101, 101).unwrap();
    for y in 0..101 {
        for x in 0..101 {
            image.put(x, y, Rgba::new(x as f32 / 255.0, y as f32 / 255.0, 0.0, 1.0));
        }
    }
    let mut s = EditSession::new(image, Size::new(101.0, 101.0), SessionConfig::default()).unwrap();
    s.set_mode(ToolMode::Warp);
    assert!(!s.commit_warp().unwrap());

    let center = s.grid().current().get(1, 1).unwrap();
    let out = s.pointer_pressed(center).unwrap();
    assert_eq!(out, PointerOutcome::Selected { row: 1, col: 1 });
    let out = s.pointer_moved(center + Vec2::new(10.0, 10.0)).unwrap();
    assert_eq!(out, PointerOutcome::Moved { row: 1, col: 1 });
    assert!(!s.grid().is_at_baseline());

    let preview = s.preview().unwrap().unwrap();
    assert_eq!(preview.cells, s.config().warp.drag_preview_cells);
    s.pointer_released();

    assert!(s.commit_warp().unwrap());
    assert!(s.grid().is_at_baseline());
    assert!(s.preview().unwrap().is_none());

    let px = s.image().get(50, 50).unwrap();
    assert_eq!((px.r * 255.0).round() as u32, 40);
    assert_eq!((px.g * 255.0).round() as u32, 40);
}

#[test]
fn warp_press_away_from_handles_selects_nothing() {
    let mut s = session(100, 100, Size::new(100.0, 100.0));
    s.set_mode(ToolMode::Warp);
    let out = s.pointer_pressed(Point::new(25.0, 25.0)).unwrap();
    assert_eq!(out, PointerOutcome::Ignored);
    assert_eq!(s.selected(), None);
    assert_eq!(
        s.pointer_moved(Point::new(30.0, 30.0)).unwrap(),
        PointerOutcome::Ignored
    );
    assert!(s.grid().is_at_baseline());
}

#[test]
fn resize_and_mode_switch_discard_warp_edits() {
    let mut s = session(100, 100, Size::new(100.0, 100.0));
    s.set_mode(ToolMode::Warp);
    s.pointer_pressed(Point::new(50.0, 50.0)).unwrap();
    s.pointer_moved(Point::new(70.0, 50.0)).unwrap();
    assert!(!s.grid().is_at_baseline());

    s.resize_viewport(Size::new(200.0, 200.0)).unwrap();
    assert!(s.grid().is_at_baseline());
    assert_eq!(s.transform().scale, 2.0);
    assert_eq!(s.selected(), None);

    s.pointer_pressed(Point::new(100.0, 100.0)).unwrap();
    s.pointer_moved(Point::new(120.0, 100.0)).unwrap();
    s.set_mode(ToolMode::Warp);
    assert!(s.grid().is_at_baseline());
}

#[test]
fn failed_resize_keeps_previous_state() {
    let mut s = session(10, 10, Size::new(20.0, 20.0));
    assert!(s.resize_viewport(Size::new(-1.0, 5.0)).is_err());
    assert_eq!(s.viewport(), Size::new(20.0, 20.0));
    assert_eq!(s.transform().scale, 2.0);
}

#[test]
fn replace_image_refits() {
    let mut s = session(10, 10, Size::new(100.0, 100.0));
    s.replace_image(PixelBuffer::new(50, 25).unwrap()).unwrap();
    assert_eq!(s.transform().scale, 2.0);
    assert_eq!(s.grid().baseline().get(2, 2), Some(Point::new(100.0, 75.0)));
    assert_eq!(s.into_image().width(), 50);
}
