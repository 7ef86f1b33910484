use super::*;

fn model() -> GridModel {
    GridModel::new(Rect::new(10.0, 20.0, 210.0, 120.0))
}

#[test]
fn uniform_places_corners_midpoints_and_center() {
    let g = ControlGrid::uniform(Rect::new(10.0, 20.0, 210.0, 120.0));
    assert_eq!(g.get(0, 0), Some(Point::new(10.0, 20.0)));
    assert_eq!(g.get(0, 1), Some(Point::new(110.0, 20.0)));
    assert_eq!(g.get(1, 1), Some(Point::new(110.0, 70.0)));
    assert_eq!(g.get(2, 2), Some(Point::new(210.0, 120.0)));
    assert_eq!(g.get(2, 0), Some(Point::new(10.0, 120.0)));
    assert_eq!(g.points()[lattice_index(1, 2)], Point::new(210.0, 70.0));
    assert_eq!(g.get(3, 0), None);
}

#[test]
fn fresh_model_is_at_baseline() {
    let m = model();
    assert!(m.is_at_baseline());
    assert_eq!(m.current(), m.baseline());
}

#[test]
fn moving_then_restoring_exact_value_returns_to_baseline() {
    let mut m = model();
    let original = m.current().get(1, 1).unwrap();
    m.set_point(1, 1, original + Vec2::new(10.0, 10.0)).unwrap();
    assert!(!m.is_at_baseline());
    assert_eq!(m.baseline().get(1, 1), Some(original));

    m.set_point(1, 1, original).unwrap();
    assert!(m.is_at_baseline());
}

#[test]
fn reset_and_revert_restore_baseline() {
    let mut m = model();
    m.set_point(0, 2, Point::new(0.0, 0.0)).unwrap();
    m.revert();
    assert!(m.is_at_baseline());

    m.set_point(0, 2, Point::new(0.0, 0.0)).unwrap();
    let rect = Rect::new(0.0, 0.0, 50.0, 50.0);
    m.reset(rect);
    assert!(m.is_at_baseline());
    assert_eq!(m.baseline().get(2, 2), Some(Point::new(50.0, 50.0)));
}

#[test]
fn set_rejects_bad_cells_and_values() {
    let mut m = model();
    let before = m.clone();
    assert!(m.set_point(0, 3, Point::ZERO).is_err());
    assert!(m.set_point(1, 1, Point::new(f64::INFINITY, 0.0)).is_err());
    assert_eq!(m, before);
}

#[test]
fn free_function_agrees_with_model() {
    let mut m = model();
    assert!(is_grid_at_baseline(m.current(), m.baseline()));
    m.set_point(2, 1, Point::new(1.0, 2.0)).unwrap();
    assert!(!is_grid_at_baseline(m.current(), m.baseline()));
}

#[test]
fn handles_are_pushed_outward_on_the_rim() {
    let g = ControlGrid::uniform(Rect::new(0.0, 0.0, 100.0, 100.0));
    assert_eq!(g.handle_position(0, 0, 10.0), Some(Point::new(-10.0, -10.0)));
    assert_eq!(g.handle_position(1, 1, 10.0), Some(Point::new(50.0, 50.0)));
    assert_eq!(g.handle_position(2, 1, 10.0), Some(Point::new(50.0, 110.0)));
    assert_eq!(g.handle_position(1, 2, 10.0), Some(Point::new(110.0, 50.0)));
}

#[test]
fn pick_handle_prefers_nearest_within_radius() {
    let m = GridModel::new(Rect::new(0.0, 0.0, 100.0, 100.0));
    assert_eq!(m.pick_handle(Point::new(52.0, 49.0), 10.0, 15.0), Some((1, 1)));
    assert_eq!(m.pick_handle(Point::new(-8.0, -9.0), 10.0, 15.0), Some((0, 0)));
    // The raw corner is 14.1 px from its handle: still inside the radius.
    assert_eq!(m.pick_handle(Point::new(0.0, 0.0), 10.0, 15.0), Some((0, 0)));
    assert_eq!(m.pick_handle(Point::new(25.0, 25.0), 10.0, 15.0), None);
}
