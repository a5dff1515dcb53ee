//! Handler for PackBits run-length data

use log::warn;

use crate::tiff::errors::TiffResult;
use super::handler::CompressionHandler;

/// Macintosh PackBits (compression code 32773)
pub struct PackBitsHandler;

impl CompressionHandler for PackBitsHandler {
    fn decompress(&self, data: &[u8], expected_len: usize) -> TiffResult<Vec<u8>> {
        let mut out = Vec::with_capacity(expected_len);
        let mut pos = 0;

        while pos < data.len() {
            if expected_len > 0 && out.len() >= expected_len {
                break;
            }

            let header = data[pos] as i8;
            pos += 1;

            match header {
                0..=127 => {
                    let run = header as usize + 1;
                    let end = (pos + run).min(data.len());
                    if end - pos < run {
                        warn!("PackBits literal run truncated ({} of {} bytes)", end - pos, run);
                    }
                    out.extend_from_slice(&data[pos..end]);
                    pos = end;
                }
                -127..=-1 => {
                    let Some(&value) = data.get(pos) else {
                        warn!("PackBits repeat run missing its value byte");
                        break;
                    };
                    pos += 1;
                    let run = 1 - header as isize;
                    out.extend(std::iter::repeat(value).take(run as usize));
                }
                // -128 is a no-op
                _ => {}
            }
        }

        Ok(out)
    }

    fn compress(&self, data: &[u8]) -> TiffResult<Vec<u8>> {
        let mut out = Vec::with_capacity(data.len() + data.len() / 128 + 1);
        let mut pos = 0;

        while pos < data.len() {
            let mut run = 1;
            while pos + run < data.len() && run < 128 && data[pos + run] == data[pos] {
                run += 1;
            }

            if run >= 2 {
                out.push((1 - run as isize) as i8 as u8);
                out.push(data[pos]);
                pos += run;
                continue;
            }

            // Literal stretch up to the next repeat of two or more.
            let start = pos;
            while pos < data.len() && pos - start < 128 {
                if pos + 1 < data.len() && data[pos] == data[pos + 1] {
                    break;
                }
                pos += 1;
            }
            if pos == start {
                pos += 1;
            }
            out.push((pos - start - 1) as u8);
            out.extend_from_slice(&data[start..pos]);
        }

        Ok(out)
    }

    fn name(&self) -> &'static str {
        "PackBits"
    }

    fn code(&self) -> u64 {
        32773
    }
}
