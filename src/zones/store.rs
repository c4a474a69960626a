//! JSON exchange format for zone collections.
//!
//! ```json
//! { "zones": [ { "id": 0, "points": [[120, 40], [300, 40], [300, 220]] } ] }
//! ```

use std::collections::HashSet;
use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::zones::zone::{Zone, ZoneId};

#[derive(Debug, Serialize, Deserialize)]
struct ZoneFile {
    zones: Vec<ZoneRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ZoneRecord {
    id: ZoneId,
    points: Vec<[i32; 2]>,
}

pub(crate) fn read_zones<R: Read>(reader: R) -> Result<Vec<Zone>> {
    let file: ZoneFile = serde_json::from_reader(reader)?;

    let mut seen = HashSet::new();
    let mut zones = Vec::with_capacity(file.zones.len());
    for record in file.zones {
        if !seen.insert(record.id) {
            return Err(Error::malformed(format!("duplicate zone id {}", record.id)));
        }
        let points = record.points.into_iter().map(|[x, y]| (x, y)).collect();
        let zone = Zone::new(record.id, points).map_err(|err| {
            Error::malformed(format!("zone {}: {err}", record.id))
        })?;
        zones.push(zone);
    }
    Ok(zones)
}

pub(crate) fn write_zones<W: Write>(writer: W, zones: &[Zone]) -> Result<()> {
    let file = ZoneFile {
        zones: zones
            .iter()
            .map(|zone| ZoneRecord {
                id: zone.id(),
                points: zone.points().iter().map(|&(x, y)| [x, y]).collect(),
            })
            .collect(),
    };
    serde_json::to_writer_pretty(writer, &file)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(json: &str) -> Result<Vec<Zone>> {
        read_zones(json.as_bytes())
    }

    #[test]
    fn test_reads_original_layout() {
        let zones = read(r#"{"zones": [{"points": [[1, 2], [3, 4], [5, 7]], "id": 4}]}"#).unwrap();
        assert_eq!(zones.len(), 1);
        assert_eq!(zones[0].id(), 4);
        assert_eq!(zones[0].points(), &[(1, 2), (3, 4), (5, 7)]);
    }

    #[test]
    fn test_schema_violations_are_malformed() {
        let cases = [
            "",
            "[]",
            r#"{"regions": []}"#,
            r#"{"zones": [{"id": 0}]}"#,
            r#"{"zones": [{"id": "a", "points": [[0, 0], [1, 0], [1, 1]]}]}"#,
            r#"{"zones": [{"id": 0, "points": [[0, 0, 3], [1, 0], [1, 1]]}]}"#,
            r#"{"zones": [{"id": 0, "points": [[0.5, 0], [1, 0], [1, 1]]}]}"#,
            r#"{"zones": [{"id": 0, "points": [[0, 0], [1, 0]]}]}"#,
            r#"{"zones": [{"id": 1, "points": [[0, 0], [1, 0], [1, 1]]},
                          {"id": 1, "points": [[0, 0], [2, 0], [2, 2]]}]}"#,
        ];
        for json in cases {
            assert!(
                matches!(read(json), Err(Error::MalformedZoneFile { .. })),
                "expected malformed for {json:?}"
            );
        }
    }

    #[test]
    fn test_empty_collection() {
        assert!(read(r#"{"zones": []}"#).unwrap().is_empty());
    }
}
