//! Restricted zones: polygon storage, classification and persistence.

mod store;
mod zone;
mod zone_manager;

pub use zone::{Vertex, Zone, ZoneId};
pub use zone_manager::ZoneManager;
