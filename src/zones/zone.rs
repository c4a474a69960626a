use crate::error::{Error, Result};
use crate::geometry::{Point, point_in_polygon};

pub type ZoneId = u32;

/// Polygon vertex in integer pixel coordinates.
pub type Vertex = (i32, i32);

/// A closed polygon marking a restricted area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Zone {
    id: ZoneId,
    points: Vec<Vertex>,
}

impl Zone {
    /// Fails with [`Error::InvalidZone`] when fewer than three vertices are given.
    pub fn new(id: ZoneId, points: Vec<Vertex>) -> Result<Self> {
        if points.len() < 3 {
            return Err(Error::InvalidZone {
                vertices: points.len(),
            });
        }
        Ok(Self { id, points })
    }

    pub fn id(&self) -> ZoneId {
        self.id
    }

    /// Vertices in drawing order; the closing edge is implied.
    pub fn points(&self) -> &[Vertex] {
        &self.points
    }

    pub fn contains(&self, point: Point) -> bool {
        point_in_polygon(point, &self.points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_short_polygons() {
        for points in [vec![], vec![(0, 0)], vec![(0, 0), (5, 5)]] {
            let n = points.len();
            match Zone::new(0, points) {
                Err(Error::InvalidZone { vertices }) => assert_eq!(vertices, n),
                other => panic!("expected InvalidZone, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_contains() {
        let zone = Zone::new(3, vec![(0, 0), (10, 0), (10, 10), (0, 10)]).unwrap();
        assert!(zone.contains(Point::new(5.0, 5.0)));
        assert!(!zone.contains(Point::new(15.0, 15.0)));
    }
}
