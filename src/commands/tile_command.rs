//! Single tile command
//!
//! Fetches one rectangle at one level, reports its status and per-band
//! statistics, and optionally writes it out as a PNG.

use clap::ArgMatches;
use image::{DynamicImage, GrayImage, RgbImage};
use log::{error, info};

use crate::commands::command_traits::Command;
use crate::commands::source_args::{parse_list, parse_value, SourceArgs};
use crate::engine::{OutputTile, Region, ScalarType};
use crate::tiff::errors::{TiffError, TiffResult};
use crate::utils::logger::Logger;

pub struct TileCommand<'a> {
    source_args: SourceArgs,
    rect: Region,
    level: u32,
    output_file: Option<String>,
    logger: &'a Logger,
}

/// Summary of one band's non-null samples
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandStats {
    pub valid: usize,
    pub nulls: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

impl BandStats {
    pub fn compute(tile: &OutputTile, band: usize) -> BandStats {
        let null = tile.null_value(band);
        let mut stats = BandStats { valid: 0, nulls: 0, min: f64::NAN, max: f64::NAN, mean: 0.0 };
        let mut sum = 0.0;

        for value in tile.band_values(band) {
            if value == null {
                stats.nulls += 1;
                continue;
            }
            stats.valid += 1;
            sum += value;
            stats.min = if stats.min.is_nan() { value } else { stats.min.min(value) };
            stats.max = if stats.max.is_nan() { value } else { stats.max.max(value) };
        }

        if stats.valid > 0 {
            stats.mean = sum / stats.valid as f64;
        }
        stats
    }
}

/// Parses `x,y,w,h`
pub fn parse_rect(value: &str) -> TiffResult<Region> {
    let parts = parse_list::<i64>(value, "tile rectangle")?;
    if parts.len() != 4 || parts[2] <= 0 || parts[3] <= 0 {
        return Err(TiffError::GenericError(format!("Tile must be x,y,width,height, got '{}'", value)));
    }
    let coord = |v: i64| i32::try_from(v).map_err(|_| TiffError::GenericError(format!("Coordinate {} out of range", v)));
    let size = |v: i64| u32::try_from(v).map_err(|_| TiffError::GenericError(format!("Size {} out of range", v)));

    Ok(Region::new(coord(parts[0])?, coord(parts[1])?, size(parts[2])?, size(parts[3])?))
}

/// Renders a tile as an 8-bit image
///
/// Three or more bands give RGB from the first three, fewer give gray
/// from the first. 8-bit samples are copied; anything else is scaled
/// linearly from `min..=max`, with nulls drawn black.
pub fn tile_to_image(tile: &OutputTile, min: f64, max: f64) -> TiffResult<DynamicImage> {
    let width = tile.width();
    let height = tile.height();
    let bands = if tile.band_count() >= 3 { 3 } else { 1 };

    let planes: Vec<Vec<u8>> = (0..bands)
        .map(|band| {
            let null = tile.null_value(band);
            tile.band_values(band)
                .into_iter()
                .map(|v| to_byte(v, null, min, max, tile.scalar_type()))
                .collect()
        })
        .collect();

    let invalid = || TiffError::GenericError(format!("Cannot build a {}x{} image", width, height));
    if bands == 3 {
        let pixels = (0..planes[0].len())
            .flat_map(|i| [planes[0][i], planes[1][i], planes[2][i]])
            .collect();
        RgbImage::from_raw(width, height, pixels).map(DynamicImage::ImageRgb8).ok_or_else(invalid)
    } else {
        let pixels = planes.into_iter().next().unwrap_or_default();
        GrayImage::from_raw(width, height, pixels).map(DynamicImage::ImageLuma8).ok_or_else(invalid)
    }
}

fn to_byte(value: f64, null: f64, min: f64, max: f64, scalar: ScalarType) -> u8 {
    if scalar == ScalarType::U8 {
        return value as u8;
    }
    if value == null || max <= min {
        return 0;
    }
    (((value - min) / (max - min)).clamp(0.0, 1.0) * 255.0).round() as u8
}

impl<'a> TileCommand<'a> {
    pub fn new(args: &ArgMatches, logger: &'a Logger) -> TiffResult<Self> {
        let rect = args.get_one::<String>("tile")
            .ok_or_else(|| TiffError::GenericError("Missing tile rectangle".to_string()))
            .and_then(|value| parse_rect(value))?;
        let level = match args.get_one::<String>("level") {
            Some(value) => parse_value::<u32>(value, "level")?,
            None => 0,
        };

        Ok(TileCommand {
            source_args: SourceArgs::from_matches(args)?,
            rect,
            level,
            output_file: args.get_one::<String>("output").cloned(),
            logger,
        })
    }

    fn save(&self, tile: &OutputTile, min: f64, max: f64, path: &str) -> TiffResult<()> {
        let image = tile_to_image(tile, min, max)?;
        match image.save(path) {
            Ok(_) => {
                info!("Tile saved to {}", path);
                Ok(())
            }
            Err(e) => {
                error!("Failed to save tile: {}", e);
                Err(TiffError::GenericError(format!("Failed to save tile: {}", e)))
            }
        }
    }
}

impl<'a> Command for TileCommand<'a> {
    fn execute(&self) -> TiffResult<()> {
        let mut source = self.source_args.open()?;
        let (min, max) = (source.min_pixel_value(), source.max_pixel_value());
        if !source.is_valid_level(self.level) {
            info!("Level {} is not valid for {}; the tile will be blank", self.level, self.source_args.input);
        }

        let tile = source.get_tile(self.rect, self.level);
        info!("Tile {} at level {}: {} ({} band(s) of {})",
              tile.region(), self.level, tile.status(), tile.band_count(), tile.scalar_type());

        for band in 0..tile.band_count() {
            let stats = BandStats::compute(tile, band);
            info!("  Band {}: {} valid, {} null, min {}, max {}, mean {:.3}",
                  band, stats.valid, stats.nulls, stats.min, stats.max, stats.mean);
        }

        if let Some(path) = &self.output_file {
            self.save(tile, min, max, path)?;
        }

        self.logger.log(&format!("Read tile {} of {}", self.rect, self.source_args.input))?;
        Ok(())
    }
}
