//! GeoKey directory lookups
//!
//! The engine only needs one key out of the GeoTIFF directory: the
//! vertical citation, which some producers use to record null and
//! min/max statistics for floating point elevation rasters.

use log::debug;

use crate::io::seekable::SeekableReader;
use crate::tiff::constants::{geo_keys, tags};
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::ifd::IFD;
use crate::tiff::reader::TiffReader;

/// One entry of the GeoKey directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeoKeyEntry {
    pub key_id: u16,
    /// 0 for an inline short, otherwise the tag holding the value
    pub tiff_tag_location: u16,
    pub count: u16,
    pub value_offset: u16,
}

/// Parses the GeoKey directory tag of `ifd`
///
/// Returns an empty list when the directory has no GeoKeys.
pub fn read_geo_key_directory(reader: &mut dyn SeekableReader, tiff_reader: &TiffReader, ifd: &IFD) -> TiffResult<Vec<GeoKeyEntry>> {
    if !ifd.has_tag(tags::GEO_KEY_DIRECTORY_TAG) {
        return Ok(Vec::new());
    }

    let values = tiff_reader.read_tag_values(reader, ifd, tags::GEO_KEY_DIRECTORY_TAG)?;
    if values.len() < 4 {
        return Err(TiffError::GenericError("Invalid GeoKey directory header".to_string()));
    }

    // Header: version, revision, minor revision, number of keys.
    let num_keys = values[3] as usize;
    debug!("GeoKey directory: version={}, revision={}.{}, keys={}",
           values[0], values[1], values[2], num_keys);

    let entries = values[4..]
        .chunks_exact(4)
        .take(num_keys)
        .map(|key| GeoKeyEntry {
            key_id: key[0] as u16,
            tiff_tag_location: key[1] as u16,
            count: key[2] as u16,
            value_offset: key[3] as u16,
        })
        .collect();

    Ok(entries)
}

/// Looks up an ASCII-valued GeoKey
pub fn read_ascii_key(reader: &mut dyn SeekableReader, tiff_reader: &TiffReader, ifd: &IFD, key_id: u16) -> TiffResult<Option<String>> {
    let keys = read_geo_key_directory(reader, tiff_reader, ifd)?;
    let key = match keys.iter().find(|k| k.key_id == key_id) {
        Some(key) if key.tiff_tag_location == tags::GEO_ASCII_PARAMS_TAG => *key,
        _ => return Ok(None),
    };

    let params = tiff_reader.read_tag_ascii(reader, ifd, tags::GEO_ASCII_PARAMS_TAG)?;
    let start = key.value_offset as usize;
    let end = (start + key.count as usize).min(params.len());
    if start >= end {
        return Ok(None);
    }

    Ok(params.get(start..end).map(|s| s.to_string()))
}

/// Reads the vertical citation string, if the directory carries one
pub fn read_vertical_citation(reader: &mut dyn SeekableReader, tiff_reader: &TiffReader, ifd: &IFD) -> TiffResult<Option<String>> {
    read_ascii_key(reader, tiff_reader, ifd, geo_keys::VERTICAL_CITATION)
}
