//! Test helpers for writing plan inputs and table files.

use camino::{Utf8Path, Utf8PathBuf};
use serde_json::{Value, json};
use std::fs;
use tempfile::TempDir;

/// Roughly 0.3 km of latitude.
const PARK_OFFSET: f64 = 0.0027;

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    fs::write(path.as_std_path(), contents).expect("write file");
}

pub(super) struct Workspace {
    _tmp: TempDir,
    pub(super) root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let tmp = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf-8 workspace");
        Self { _tmp: tmp, root }
    }

    pub(super) fn write_json(&self, name: &str, value: &Value) -> Utf8PathBuf {
        let path = self.root.join(name);
        let payload = serde_json::to_string_pretty(value).expect("serialize json");
        write_utf8(&path, payload.as_bytes());
        path
    }

    /// Mapping and sequence tables matching [`park_and_cafe`].
    pub(super) fn write_tables(&self) -> (Utf8PathBuf, Utf8PathBuf) {
        let mappings = self.write_json(
            "mappings.json",
            &json!({ "quiet": ["park"], "coffee": ["cafe"] }),
        );
        let sequences = self.write_json(
            "sequences.json",
            &json!([{ "from_type": "park", "to_type": "cafe", "reason": "coffee after a walk" }]),
        );
        (mappings, sequences)
    }
}

/// A visitor wanting quiet and coffee, with a park and a cafe to the north.
pub(super) fn park_and_cafe(crowd_level: &str) -> Value {
    let place = |id: &str, kind: &str, offset: f64| {
        json!({
            "id": id,
            "name": id,
            "type": kind,
            "lat": 51.5 + offset,
            "lng": -0.12,
            "avg_duration_minutes": 30,
            "crowd_level": crowd_level,
            "open_from": "08:00",
            "open_to": "18:00"
        })
    };
    json!({
        "user": {
            "lat": 51.5,
            "lng": -0.12,
            "start_time": "09:00",
            "time_available_minutes": 120,
            "preferences": ["quiet", "coffee"],
            "avoid": ["crowded"]
        },
        "places": [
            place("cafe", "cafe", PARK_OFFSET * 2.0),
            place("park", "park", PARK_OFFSET),
        ]
    })
}
