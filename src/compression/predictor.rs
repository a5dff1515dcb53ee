//! Horizontal differencing predictor (predictor 2)
//!
//! Undone in place on decoded rows, sample-wise, in the container's byte
//! order. Sub-byte samples are never predicted.

use crate::io::byte_order::ByteOrder;
use crate::tiff::constants::predictor;
use crate::tiff::errors::{TiffError, TiffResult};

/// Layout of a decoded unit, enough to walk its rows
#[derive(Debug, Clone, Copy)]
pub struct PredictorLayout {
    /// Pixels per row
    pub width: usize,
    pub rows: usize,
    /// Interleaved samples per pixel within this unit
    pub samples: usize,
    pub bits_per_sample: u16,
    pub byte_order: ByteOrder,
}

/// Reverses `predictor_code` over `data`
pub fn undo_predictor(data: &mut [u8], predictor_code: u16, layout: PredictorLayout) -> TiffResult<()> {
    match predictor_code {
        0 | predictor::NONE => Ok(()),
        predictor::HORIZONTAL_DIFFERENCING => undo_horizontal(data, layout),
        other => Err(TiffError::GenericError(format!("Unsupported predictor: {}", other))),
    }
}

fn undo_horizontal(data: &mut [u8], layout: PredictorLayout) -> TiffResult<()> {
    let bytes = match layout.bits_per_sample {
        8 => 1,
        16 => 2,
        32 => 4,
        64 => 8,
        bits => {
            return Err(TiffError::GenericError(format!(
                "Horizontal predictor not defined for {}-bit samples", bits
            )))
        }
    };

    let stride = layout.samples;
    let row_len = layout.width * stride * bytes;
    if row_len == 0 {
        return Ok(());
    }

    let order = layout.byte_order;
    for row in data.chunks_exact_mut(row_len).take(layout.rows) {
        for i in stride..layout.width * stride {
            let cur = i * bytes;
            let prev = (i - stride) * bytes;
            match bytes {
                1 => row[cur] = row[cur].wrapping_add(row[prev]),
                2 => {
                    let v = order.decode_u16(&row[cur..]).wrapping_add(order.decode_u16(&row[prev..]));
                    order.encode_u16(&mut row[cur..cur + 2], v);
                }
                4 => {
                    let v = order.decode_u32(&row[cur..]).wrapping_add(order.decode_u32(&row[prev..]));
                    order.encode_u32(&mut row[cur..cur + 4], v);
                }
                _ => {
                    let v = order.decode_u64(&row[cur..]).wrapping_add(order.decode_u64(&row[prev..]));
                    order.encode_u64(&mut row[cur..cur + 8], v);
                }
            }
        }
    }

    Ok(())
}
