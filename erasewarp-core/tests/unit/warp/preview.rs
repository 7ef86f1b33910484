use super::*;
use crate::foundation::core::Vec2;

#[test]
fn identity_grid_tiles_the_display_rect() {
    let grid = ControlGrid::uniform(Rect::new(0.0, 0.0, 100.0, 100.0));
    let mesh = PreviewMesh::build(&grid, 50, 50, 2).unwrap();
    assert_eq!(mesh.quads.len(), 4);

    let first = mesh.quads[0];
    assert_eq!(first.source, Rect::new(0.0, 0.0, 25.0, 25.0));
    assert_eq!(first.dest, Rect::new(0.0, 0.0, 50.0, 50.0));

    let last = mesh.quads[3];
    assert_eq!(last.source, Rect::new(25.0, 25.0, 50.0, 50.0));
    assert!((last.dest.x1 - 100.0).abs() < 1e-9);
    assert!((last.dest.y1 - 100.0).abs() < 1e-9);
}

#[test]
fn moved_center_moves_shared_corner() {
    let mut grid = ControlGrid::uniform(Rect::new(0.0, 0.0, 100.0, 100.0));
    grid.set(1, 1, Point::new(50.0, 50.0) + Vec2::new(10.0, 5.0)).unwrap();
    let mesh = PreviewMesh::build(&grid, 100, 100, 2).unwrap();

    assert_eq!(mesh.quads[0].dest.x1, 60.0);
    assert_eq!(mesh.quads[0].dest.y1, 55.0);
    // Top-right quad stretches down to the moved center.
    assert_eq!(mesh.quads[1].dest.y1, 55.0);
    assert_eq!(mesh.quads[1].dest.x0, 50.0);
    // Bottom-right quad is bounded by the unmoved edge midpoints.
    assert_eq!(mesh.quads[3].dest.x0, 50.0);
    assert_eq!(mesh.quads[3].dest.y0, 50.0);
}

#[test]
fn source_rects_cover_the_image() {
    let grid = ControlGrid::uniform(Rect::new(0.0, 0.0, 64.0, 32.0));
    let mesh = PreviewMesh::build(&grid, 64, 32, 5).unwrap();
    assert_eq!(mesh.cells, 5);
    let area: f64 = mesh.quads.iter().map(|q| q.source.area()).sum();
    assert!((area - 64.0 * 32.0).abs() < 1e-6);
}

#[test]
fn rejects_zero_cells_and_empty_source() {
    let grid = ControlGrid::uniform(Rect::new(0.0, 0.0, 1.0, 1.0));
    assert!(PreviewMesh::build(&grid, 10, 10, 0).is_err());
    assert!(PreviewMesh::build(&grid, 0, 10, 4).is_err());
}
