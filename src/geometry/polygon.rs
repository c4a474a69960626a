//! Point-in-polygon test for zone classification.

use super::bbox::Point;

const EDGE_EPSILON: f64 = 1e-9;

/// Ray-casting point-in-polygon test.
///
/// A ray is cast from `point` towards +x and edge crossings are counted;
/// an odd count means inside. Points lying exactly on an edge or a vertex
/// are treated as inside. Polygons with fewer than three vertices contain
/// nothing.
pub fn point_in_polygon(point: Point, polygon: &[(i32, i32)]) -> bool {
    if polygon.len() < 3 {
        return false;
    }

    let px = f64::from(point.x);
    let py = f64::from(point.y);

    let mut inside = false;
    let mut prev = polygon[polygon.len() - 1];
    for &curr in polygon {
        let (ax, ay) = (f64::from(prev.0), f64::from(prev.1));
        let (bx, by) = (f64::from(curr.0), f64::from(curr.1));

        if on_segment(px, py, ax, ay, bx, by) {
            return true;
        }

        // Half-open on y so a vertex shared by two edges is counted once.
        if (ay > py) != (by > py) {
            let x_cross = ax + (py - ay) * (bx - ax) / (by - ay);
            if px < x_cross {
                inside = !inside;
            }
        }
        prev = curr;
    }

    inside
}

fn on_segment(px: f64, py: f64, ax: f64, ay: f64, bx: f64, by: f64) -> bool {
    let cross = (bx - ax) * (py - ay) - (by - ay) * (px - ax);
    if cross.abs() > EDGE_EPSILON {
        return false;
    }
    px >= ax.min(bx) && px <= ax.max(bx) && py >= ay.min(by) && py <= ay.max(by)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE: [(i32, i32); 4] = [(0, 0), (10, 0), (10, 10), (0, 10)];

    #[test]
    fn test_square_inside_outside() {
        assert!(point_in_polygon(Point::new(5.0, 5.0), &SQUARE));
        assert!(!point_in_polygon(Point::new(15.0, 15.0), &SQUARE));
        assert!(!point_in_polygon(Point::new(-0.5, 5.0), &SQUARE));
    }

    #[test]
    fn test_boundary_is_inside() {
        for p in [
            Point::new(0.0, 5.0),
            Point::new(10.0, 5.0),
            Point::new(5.0, 0.0),
            Point::new(5.0, 10.0),
            Point::new(0.0, 0.0),
            Point::new(10.0, 10.0),
        ] {
            assert!(point_in_polygon(p, &SQUARE), "{p:?} should be inside");
        }
        assert!(!point_in_polygon(Point::new(10.01, 5.0), &SQUARE));
    }

    #[test]
    fn test_vertex_winding_does_not_matter() {
        let mut reversed = SQUARE;
        reversed.reverse();
        for p in [Point::new(5.0, 5.0), Point::new(0.0, 3.0), Point::new(11.0, 3.0)] {
            assert_eq!(point_in_polygon(p, &SQUARE), point_in_polygon(p, &reversed));
        }
    }

    #[test]
    fn test_concave_polygon() {
        // U shape open at the top
        let u = [(0, 0), (30, 0), (30, 30), (20, 30), (20, 10), (10, 10), (10, 30), (0, 30)];
        assert!(point_in_polygon(Point::new(5.0, 20.0), &u));
        assert!(point_in_polygon(Point::new(25.0, 20.0), &u));
        assert!(!point_in_polygon(Point::new(15.0, 20.0), &u));
        assert!(point_in_polygon(Point::new(15.0, 5.0), &u));
    }

    #[test]
    fn test_ray_through_vertex() {
        // Ray from (0, 5) passes exactly through the vertex at (10, 5)
        let diamond = [(5, 0), (10, 5), (5, 10), (0, 5)];
        assert!(point_in_polygon(Point::new(5.0, 5.0), &diamond));
        assert!(!point_in_polygon(Point::new(-1.0, 5.0), &diamond));
        assert!(!point_in_polygon(Point::new(11.0, 5.0), &diamond));
    }

    #[test]
    fn test_too_few_vertices() {
        assert!(!point_in_polygon(Point::new(0.0, 0.0), &[(0, 0), (1, 1)]));
    }
}
