//! Null/min/max overrides for floating point containers
//!
//! Some producers record the statistics of float rasters in the GDAL
//! no-data tag and in the GeoTIFF vertical citation, formatted as
//! `"Null: X, Non-Null Min: Y, Non-Null Avg: Z, Non-Null Max: W|"`.

use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

use crate::engine::scalar::SampleStats;

lazy_static! {
    /// `key: value`, with nothing else containing a colon
    static ref FIELD_RE: Regex = Regex::new(r"^([^:]*):([^:]*)$").unwrap();
}

/// Applies the no-data tag and the citation string to `stats`
///
/// The no-data tag wins over the citation's null field. Anything that
/// does not parse leaves the current value alone.
pub fn apply_overrides(stats: &mut SampleStats, gdal_nodata: Option<&str>, citation: Option<&str>) {
    let mut null_found = false;

    if let Some(nodata) = gdal_nodata {
        match nodata.trim().parse::<f32>() {
            Ok(value) => {
                stats.null = value as f64;
                null_found = true;
            }
            Err(e) => debug!("Ignoring GDAL nodata {:?}: {}", nodata, e),
        }
    }

    let citation = match citation {
        Some(citation) => citation,
        None => return,
    };

    let fields: Vec<&str> = citation.split(',').collect();
    if fields.len() != 4 {
        debug!("Vertical citation has {} fields, expected 4: {:?}", fields.len(), citation);
        return;
    }

    if !null_found {
        if let Some(value) = field_value(fields[0], "null") {
            stats.null = value;
        }
    }
    if let Some(value) = field_value(fields[1], "min") {
        stats.min = value;
    }
    // fields[2] is the average
    if let Some(value) = field_value(fields[3], "max") {
        stats.max = value;
    }
}

/// Parses `field` when its key contains `key`, case-insensitively
fn field_value(field: &str, key: &str) -> Option<f64> {
    let caps = FIELD_RE.captures(field)?;
    let name = caps.get(1)?.as_str().to_lowercase();
    if !name.contains(key) {
        return None;
    }

    let raw = caps.get(2)?.as_str().trim().trim_matches('|').trim();
    if raw.is_empty() {
        return None;
    }

    match raw.parse::<f64>() {
        Ok(value) => Some(value),
        Err(e) => {
            debug!("Unparsable citation value {:?} for {}: {}", raw, key, e);
            None
        }
    }
}
