mod bbox;
mod polygon;

pub use bbox::{BoundingBox, Point, iou_batch};
pub use polygon::point_in_polygon;
