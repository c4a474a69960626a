use std::collections::BTreeSet;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::geometry::Point;
use crate::zones::store;
use crate::zones::zone::{Vertex, Zone, ZoneId};

/// Ordered collection of restricted zones.
///
/// Zones keep their creation order. New zones get ids one past the highest
/// id ever handed out by this manager (or loaded into it); [`clear`] starts
/// numbering over from zero.
///
/// [`clear`]: ZoneManager::clear
#[derive(Debug, Clone, Default)]
pub struct ZoneManager {
    zones: Vec<Zone>,
    next_id: ZoneId,
}

impl ZoneManager {
    /// Create an empty zone set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a manager from already-validated zones. Duplicate ids are rejected.
    pub fn from_zones(zones: Vec<Zone>) -> Result<Self> {
        let mut ids = BTreeSet::new();
        for zone in &zones {
            if !ids.insert(zone.id()) {
                return Err(Error::malformed(format!("duplicate zone id {}", zone.id())));
            }
        }
        let next_id = match ids.last() {
            Some(&max) => max.checked_add(1).ok_or_else(|| {
                Error::malformed(format!("zone id {max} leaves no room for new zones"))
            })?,
            None => 0,
        };
        Ok(Self { zones, next_id })
    }

    /// All zones in creation order.
    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    /// Look up a zone by id.
    pub fn get(&self, id: ZoneId) -> Option<&Zone> {
        self.zones.iter().find(|z| z.id() == id)
    }

    /// Number of zones.
    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Append a new zone and return its id.
    pub fn add_zone(&mut self, vertices: Vec<Vertex>) -> Result<ZoneId> {
        let next_id = self.next_id.checked_add(1).ok_or(Error::ZoneIdsExhausted)?;
        let zone = Zone::new(self.next_id, vertices)?;
        let id = zone.id();
        self.next_id = next_id;
        self.zones.push(zone);
        Ok(id)
    }

    /// Redraw an existing zone in place, keeping its id and position.
    pub fn replace_zone(&mut self, id: ZoneId, vertices: Vec<Vertex>) -> Result<()> {
        let slot = self
            .zones
            .iter_mut()
            .find(|z| z.id() == id)
            .ok_or(Error::ZoneNotFound(id))?;
        *slot = Zone::new(id, vertices)?;
        Ok(())
    }

    /// Remove a zone and return it. Its id is never handed out again.
    pub fn remove_zone(&mut self, id: ZoneId) -> Result<Zone> {
        let pos = self
            .zones
            .iter()
            .position(|z| z.id() == id)
            .ok_or(Error::ZoneNotFound(id))?;
        Ok(self.zones.remove(pos))
    }

    /// Drop all zones before a full redraw.
    pub fn clear(&mut self) {
        self.zones.clear();
        self.next_id = 0;
    }

    /// Ids of every zone containing `point`, in ascending order.
    pub fn classify(&self, point: Point) -> BTreeSet<ZoneId> {
        self.zones
            .iter()
            .filter(|z| z.contains(point))
            .map(Zone::id)
            .collect()
    }

    /// Whether `point` lies in any zone.
    pub fn contains_point(&self, point: Point) -> bool {
        self.zones.iter().any(|z| z.contains(point))
    }

    /// Read a zone collection from a JSON document.
    pub fn load<R: Read>(source: R) -> Result<Self> {
        Self::from_zones(store::read_zones(source)?)
    }

    /// Write the zone collection as a JSON document.
    pub fn save<W: Write>(&self, sink: W) -> Result<()> {
        store::write_zones(sink, &self.zones)
    }

    /// Load zones from `path`. A missing file yields an empty manager.
    pub fn load_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = match File::open(path) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                info!(path = %path.display(), "no zones file found");
                return Ok(Self::new());
            }
            Err(err) => return Err(err.into()),
        };
        let manager = Self::load(BufReader::new(file))?;
        info!(path = %path.display(), count = manager.len(), "loaded zones");
        Ok(manager)
    }

    /// Like [`load_file`](Self::load_file), but any failure falls back to an
    /// empty zone set.
    pub fn load_or_empty(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        Self::load_file(path).unwrap_or_else(|err| {
            warn!(path = %path.display(), error = %err, "failed to load zones, starting empty");
            Self::new()
        })
    }

    /// Write zones to `path`, replacing any existing file.
    pub fn save_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut writer = BufWriter::new(File::create(path)?);
        self.save(&mut writer)?;
        writer.flush()?;
        info!(path = %path.display(), count = self.len(), "saved zones");
        Ok(())
    }
}
