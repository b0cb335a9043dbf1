//! JSON file storage for heats, the volunteer roster, and availability.
//!
//! The engine itself does no I/O; these loaders run once before an
//! invocation and `save_heats` once after. No locking is performed:
//! concurrent writers must be serialized by the caller.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::engine::RawAvailability;
use crate::error::{CrewError, Result};
use crate::model::{Heat, Volunteer};

/// Older exports wrap the heat list in an object; accept both shapes.
#[derive(Deserialize)]
#[serde(untagged)]
enum HeatsFile {
    Bare(Vec<Heat>),
    Wrapped { heats: Vec<Heat> },
}

pub fn load_heats(path: &Path) -> Result<Vec<Heat>> {
    let text = read_required(path)?;
    match serde_json::from_str::<HeatsFile>(&text) {
        Ok(HeatsFile::Bare(heats)) | Ok(HeatsFile::Wrapped { heats }) => Ok(heats),
        Err(source) => Err(CrewError::Malformed {
            path: path.to_path_buf(),
            source,
        }),
    }
}

pub fn save_heats(path: &Path, heats: &[Heat]) -> Result<()> {
    let json = serde_json::to_string_pretty(heats).map_err(|source| CrewError::Malformed {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, json)?;
    Ok(())
}

pub fn load_volunteers(path: &Path) -> Result<Vec<Volunteer>> {
    let text = read_required(path)?;
    serde_json::from_str(&text).map_err(|source| CrewError::Malformed {
        path: path.to_path_buf(),
        source,
    })
}

/// A missing availability file is an empty map: a roster with no declared
/// availability is valid, just unschedulable.
pub fn load_availability(path: &Path) -> Result<RawAvailability> {
    if !path.exists() {
        return Ok(RawAvailability::default());
    }
    let text = fs::read_to_string(path)?;
    serde_json::from_str(&text).map_err(|source| CrewError::Malformed {
        path: path.to_path_buf(),
        source,
    })
}

fn read_required(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(CrewError::NotFound(path.to_path_buf()));
    }
    Ok(fs::read_to_string(path)?)
}
