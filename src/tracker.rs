mod matching;
mod track;
mod track_manager;
mod track_state;

pub use matching::{AssignmentResult, Detection, associate, greedy_assignment, iou_distance};
pub use track::Track;
pub use track_manager::{TrackManager, TrackerConfig};
pub use track_state::TrackState;
