//! Canonical sample types
//!
//! A container is decoded into exactly one `ScalarType`, chosen once at
//! open time from the first directory's bit depth, sample format and
//! declared maximum sample value.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::tiff::constants::sample_format;
use crate::tiff::errors::{TiffError, TiffResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScalarType {
    U8,
    /// 11 significant bits stored in 16
    U11,
    U12,
    U13,
    U14,
    U15,
    U16,
    I16,
    U32,
    I32,
    F32,
    F64,
}

impl ScalarType {
    /// Picks the sample type for a directory
    ///
    /// `max_sample` is the declared MaxSampleValue, used to narrow 16-bit
    /// unsigned data to its packed bit depth. A missing value means full
    /// 16 bits.
    pub fn resolve(bits_per_sample: u16, format: u16, max_sample: Option<f64>) -> TiffResult<ScalarType> {
        let unsupported = TiffError::UnsupportedScalarType { bits: bits_per_sample, sample_format: format };

        match bits_per_sample {
            16 => match format {
                sample_format::SIGNED => Ok(ScalarType::I16),
                sample_format::UNSIGNED | sample_format::VOID | 0 => Ok(Self::bucket_u16(max_sample)),
                _ => Err(unsupported),
            },
            32 => match format {
                sample_format::UNSIGNED => Ok(ScalarType::U32),
                sample_format::SIGNED => Ok(ScalarType::I32),
                sample_format::IEEEFP => Ok(ScalarType::F32),
                // Pairs of signed 16-bit values
                sample_format::COMPLEX_INT => Ok(ScalarType::I16),
                _ => Err(unsupported),
            },
            64 if format == sample_format::IEEEFP => Ok(ScalarType::F64),
            1..=8 => Ok(ScalarType::U8),
            _ => Err(unsupported),
        }
    }

    fn bucket_u16(max_sample: Option<f64>) -> ScalarType {
        let max = match max_sample {
            Some(max) if !max.is_nan() => max,
            _ => return ScalarType::U16,
        };

        if max <= 2047.0 {
            ScalarType::U11
        } else if max <= 4095.0 {
            ScalarType::U12
        } else if max <= 8191.0 {
            ScalarType::U13
        } else if max <= 16383.0 {
            ScalarType::U14
        } else if max <= 32767.0 {
            ScalarType::U15
        } else {
            ScalarType::U16
        }
    }

    pub fn bytes_per_sample(&self) -> usize {
        match self {
            ScalarType::U8 => 1,
            ScalarType::U11
            | ScalarType::U12
            | ScalarType::U13
            | ScalarType::U14
            | ScalarType::U15
            | ScalarType::U16
            | ScalarType::I16 => 2,
            ScalarType::U32 | ScalarType::I32 | ScalarType::F32 => 4,
            ScalarType::F64 => 8,
        }
    }

    pub fn is_float(&self) -> bool {
        matches!(self, ScalarType::F32 | ScalarType::F64)
    }

    /// Value reserved for "no data"
    pub fn default_null(&self) -> f64 {
        match self {
            ScalarType::I16 => i16::MIN as f64,
            ScalarType::I32 => i32::MIN as f64,
            ScalarType::F32 => -1.0 / f32::EPSILON as f64,
            ScalarType::F64 => -1.0 / f64::EPSILON,
            _ => 0.0,
        }
    }

    /// Smallest valid (non-null) value
    pub fn default_min(&self) -> f64 {
        match self {
            ScalarType::I16 => -32767.0,
            ScalarType::I32 => -2147483647.0,
            ScalarType::F32 | ScalarType::F64 => self.default_null() + 1.0,
            _ => 1.0,
        }
    }

    pub fn default_max(&self) -> f64 {
        match self {
            ScalarType::U8 => u8::MAX as f64,
            ScalarType::U11 => 2047.0,
            ScalarType::U12 => 4095.0,
            ScalarType::U13 => 8191.0,
            ScalarType::U14 => 16383.0,
            ScalarType::U15 => 32767.0,
            ScalarType::U16 => u16::MAX as f64,
            ScalarType::I16 => i16::MAX as f64,
            ScalarType::U32 => u32::MAX as f64,
            ScalarType::I32 => i32::MAX as f64,
            ScalarType::F32 => 1.0 / f32::EPSILON as f64,
            ScalarType::F64 => 1.0 / f64::EPSILON,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ScalarType::U8 => "uint8",
            ScalarType::U11 => "usint11",
            ScalarType::U12 => "usint12",
            ScalarType::U13 => "usint13",
            ScalarType::U14 => "usint14",
            ScalarType::U15 => "usint15",
            ScalarType::U16 => "uint16",
            ScalarType::I16 => "sint16",
            ScalarType::U32 => "uint32",
            ScalarType::I32 => "sint32",
            ScalarType::F32 => "float32",
            ScalarType::F64 => "float64",
        }
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Minimum, maximum and null sample values of a container
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleStats {
    pub min: f64,
    pub max: f64,
    pub null: f64,
}

impl SampleStats {
    /// Starts from declared tag values; missing ones are NaN until validated
    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        SampleStats {
            min: min.unwrap_or(f64::NAN),
            max: max.unwrap_or(f64::NAN),
            null: f64::NAN,
        }
    }

    /// Replaces unusable values with the type's defaults
    ///
    /// A min or max equal to the null sentinel, or NaN, falls back to the
    /// natural minimum or maximum. An unset null gets the type's null.
    pub fn validate(&mut self, scalar: ScalarType) {
        let null = scalar.default_null();

        if self.min == null || self.min.is_nan() {
            self.min = scalar.default_min();
        }
        if self.max == null || self.max.is_nan() {
            self.max = scalar.default_max();
        }
        if self.null.is_nan() {
            self.null = null;
        }
    }
}
