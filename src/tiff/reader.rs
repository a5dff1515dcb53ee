//! TIFF/BigTIFF directory reader
//!
//! Parses the header and walks the IFD chain. Tag payloads are fetched
//! on demand through the `read_tag_*` methods, which handle inline and
//! offset-stored values alike.

use log::{debug, info, warn};
use std::collections::HashSet;
use std::io::{Read, Seek, SeekFrom};

use crate::io::byte_order::{ByteOrder, ByteOrderHandler};
use crate::io::seekable::SeekableReader;
use crate::tiff::constants::{field_types, header};
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::ifd::{IFD, IFDEntry};
use crate::tiff::types::TIFF;
use crate::utils::tag_utils;

/// Upper bound on chained directories before the chain is considered corrupt
const MAX_IFDS: usize = 4096;

/// Largest tag payload read into memory
const MAX_TAG_BYTES: u64 = 256 * 1024 * 1024;

/// Reader for TIFF and BigTIFF containers
pub struct TiffReader {
    byte_order_handler: Option<Box<dyn ByteOrderHandler>>,
    is_big_tiff: bool,
}

impl Default for TiffReader {
    fn default() -> Self {
        Self::new()
    }
}

impl TiffReader {
    pub fn new() -> Self {
        TiffReader {
            byte_order_handler: None,
            is_big_tiff: false,
        }
    }

    fn handler(&self) -> TiffResult<&dyn ByteOrderHandler> {
        self.byte_order_handler
            .as_deref()
            .ok_or_else(|| TiffError::GenericError("Byte order not yet determined".to_string()))
    }

    /// Byte order of the container, once the header has been read
    pub fn byte_order(&self) -> Option<ByteOrder> {
        self.byte_order_handler.as_ref().map(|h| h.byte_order())
    }

    pub fn is_big_tiff(&self) -> bool {
        self.is_big_tiff
    }

    /// Reads the header and every directory in the chain
    pub fn read(&mut self, reader: &mut dyn SeekableReader) -> TiffResult<TIFF> {
        reader.seek(SeekFrom::Start(0))?;

        let byte_order = ByteOrder::detect(reader)?;
        debug!("Detected byte order: {}", byte_order.name());
        self.byte_order_handler = Some(byte_order.create_handler());

        self.is_big_tiff = self.read_version(reader)?;

        let first_ifd_offset = self.read_offset(reader)?;
        debug!("First IFD offset: {}", first_ifd_offset);

        let file_size = stream_size(reader)?;
        if first_ifd_offset >= file_size || first_ifd_offset < 8 {
            return Err(TiffError::GenericError(format!(
                "Invalid IFD offset: {} (file size: {})",
                first_ifd_offset, file_size
            )));
        }

        let mut tiff = TIFF::new(self.is_big_tiff, byte_order);
        tiff.ifds = self.read_ifd_chain(reader, first_ifd_offset, file_size)?;

        info!("Read {} IFDs from {} container",
              tiff.ifds.len(), if self.is_big_tiff { "BigTIFF" } else { "TIFF" });
        Ok(tiff)
    }

    /// Reads the version word, validating the BigTIFF preamble when present
    fn read_version(&self, reader: &mut dyn SeekableReader) -> TiffResult<bool> {
        let handler = self.handler()?;
        let version = handler.read_u16(reader)?;
        debug!("TIFF version: {}", version);

        match version {
            header::TIFF_VERSION => Ok(false),
            header::BIG_TIFF_VERSION => {
                let offset_size = handler.read_u16(reader)?;
                let zeros = handler.read_u16(reader)?;
                if offset_size != header::BIGTIFF_OFFSET_SIZE || zeros != 0 {
                    warn!("Invalid BigTIFF header: offset_size={}, zeros={}", offset_size, zeros);
                    return Err(TiffError::InvalidBigTIFFHeader);
                }
                Ok(true)
            }
            _ => Err(TiffError::UnsupportedVersion(version)),
        }
    }

    fn read_offset(&self, reader: &mut dyn SeekableReader) -> TiffResult<u64> {
        let handler = self.handler()?;
        if self.is_big_tiff {
            Ok(handler.read_u64(reader)?)
        } else {
            Ok(handler.read_u32(reader)? as u64)
        }
    }

    /// Walks the directory chain, stopping (with a warning) at the first
    /// damaged link rather than failing the whole container
    fn read_ifd_chain(&self, reader: &mut dyn SeekableReader, first_ifd_offset: u64, file_size: u64) -> TiffResult<Vec<IFD>> {
        let mut ifds = Vec::new();
        let mut visited = HashSet::new();
        let mut ifd_offset = first_ifd_offset;

        while ifd_offset != 0 && ifds.len() < MAX_IFDS {
            if ifd_offset >= file_size {
                warn!("IFD offset {} exceeds file size {}, stopping IFD chain", ifd_offset, file_size);
                break;
            }
            if !visited.insert(ifd_offset) {
                warn!("IFD chain loops back to offset {}, stopping", ifd_offset);
                break;
            }

            let ifd = match self.read_ifd(reader, ifd_offset, ifds.len()) {
                Ok(ifd) => ifd,
                Err(e) => {
                    warn!("Error reading IFD {}: {}", ifds.len(), e);
                    break;
                }
            };

            // The next-offset word directly follows the last entry.
            let next = match self.read_offset(reader) {
                Ok(offset) => offset,
                Err(e) => {
                    warn!("Error reading next IFD offset: {}", e);
                    ifds.push(ifd);
                    break;
                }
            };

            ifds.push(ifd);

            if next != 0 && (next >= file_size || next < 8) {
                warn!("Invalid next IFD offset: {}, stopping IFD chain", next);
                break;
            }
            ifd_offset = next;
        }

        Ok(ifds)
    }

    /// Reads a single IFD at `offset`
    pub fn read_ifd(&self, reader: &mut dyn SeekableReader, offset: u64, number: usize) -> TiffResult<IFD> {
        reader.seek(SeekFrom::Start(offset))?;

        let handler = self.handler()?;
        let entry_count = if self.is_big_tiff {
            handler.read_u64(reader)?
        } else {
            handler.read_u16(reader)? as u64
        };
        debug!("IFD #{} at {}: {} entries", number, offset, entry_count);

        let mut ifd = IFD::new(number, offset);
        for _ in 0..entry_count {
            let entry = self.read_ifd_entry(reader)?;
            ifd.add_entry(entry);
        }

        Ok(ifd)
    }

    fn read_ifd_entry(&self, reader: &mut dyn SeekableReader) -> TiffResult<IFDEntry> {
        let handler = self.handler()?;
        let byte_order = handler.byte_order();

        let tag = handler.read_u16(reader)?;
        let field_type = handler.read_u16(reader)?;
        let count = if self.is_big_tiff {
            handler.read_u64(reader)?
        } else {
            handler.read_u32(reader)? as u64
        };

        let field_len = if self.is_big_tiff { 8 } else { 4 };
        let mut inline_bytes = [0u8; 8];
        reader.read_exact(&mut inline_bytes[..field_len])?;

        let mut entry = IFDEntry::with_inline_bytes(tag, field_type, count, 0, inline_bytes);
        entry.value_offset = if entry.is_value_inline(self.is_big_tiff) {
            if count == 0 {
                0
            } else {
                tag_utils::decode_u64_values(&inline_bytes[..field_len], field_type, 1, byte_order)
                    .ok()
                    .and_then(|values| values.first().copied())
                    .unwrap_or_else(|| raw_offset(&inline_bytes, field_len, byte_order))
            }
        } else {
            raw_offset(&inline_bytes, field_len, byte_order)
        };

        Ok(entry)
    }

    /// Returns the raw payload bytes of an entry, wherever they are stored
    pub fn entry_bytes(&self, reader: &mut dyn SeekableReader, entry: &IFDEntry) -> TiffResult<Vec<u8>> {
        let total = (entry.get_field_type_size() as u64).saturating_mul(entry.count);
        if total > MAX_TAG_BYTES {
            return Err(TiffError::GenericError(format!(
                "Tag {} payload of {} bytes is too large", entry.tag, total
            )));
        }

        if entry.is_value_inline(self.is_big_tiff) {
            return Ok(entry.inline_bytes[..total as usize].to_vec());
        }

        let mut bytes = vec![0u8; total as usize];
        reader.seek(SeekFrom::Start(entry.value_offset))?;
        reader.read_exact(&mut bytes)?;
        Ok(bytes)
    }

    /// Reads a tag's values as unsigned integers
    pub fn read_tag_values(&self, reader: &mut dyn SeekableReader, ifd: &IFD, tag: u16) -> TiffResult<Vec<u64>> {
        let entry = ifd.get_entry(tag).ok_or(TiffError::TagNotFound(tag))?;
        let bytes = self.entry_bytes(reader, entry)?;
        tag_utils::decode_u64_values(&bytes, entry.field_type, entry.count as usize, self.handler()?.byte_order())
    }

    /// Reads a tag's values as `f64`, accepting any numeric field type
    pub fn read_tag_f64_values(&self, reader: &mut dyn SeekableReader, ifd: &IFD, tag: u16) -> TiffResult<Vec<f64>> {
        let entry = ifd.get_entry(tag).ok_or(TiffError::TagNotFound(tag))?;
        let bytes = self.entry_bytes(reader, entry)?;
        tag_utils::decode_f64_values(&bytes, entry.field_type, entry.count as usize, self.handler()?.byte_order())
    }

    /// Reads an ASCII tag, dropping trailing NULs
    pub fn read_tag_ascii(&self, reader: &mut dyn SeekableReader, ifd: &IFD, tag: u16) -> TiffResult<String> {
        let entry = ifd.get_entry(tag).ok_or(TiffError::TagNotFound(tag))?;
        if entry.field_type != field_types::ASCII {
            return Err(TiffError::UnsupportedFieldType(entry.field_type));
        }

        let mut bytes = self.entry_bytes(reader, entry)?;
        while bytes.last() == Some(&0) {
            bytes.pop();
        }

        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

fn raw_offset(bytes: &[u8; 8], field_len: usize, byte_order: ByteOrder) -> u64 {
    if field_len == 8 {
        byte_order.decode_u64(bytes)
    } else {
        byte_order.decode_u32(&bytes[..4]) as u64
    }
}

/// Size of the underlying stream, restoring the current position
pub fn stream_size(reader: &mut dyn SeekableReader) -> TiffResult<u64> {
    let current_position = reader.stream_position()?;
    let size = match reader.seek(SeekFrom::End(0)) {
        Ok(size) => size,
        Err(e) => {
            warn!("Could not determine stream size: {}", e);
            u64::MAX
        }
    };
    reader.seek(SeekFrom::Start(current_position))?;
    Ok(size)
}
