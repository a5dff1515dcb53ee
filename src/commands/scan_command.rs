//! Level scan command
//!
//! Walks every output tile of one resolution level and counts how many
//! come back full, partial or empty.

use std::collections::BTreeMap;

use clap::ArgMatches;
use log::{debug, info};

use crate::commands::command_traits::Command;
use crate::commands::source_args::{parse_value, SourceArgs};
use crate::engine::{DataStatus, Region, TiffTileSource};
use crate::tiff::errors::{TiffError, TiffResult};
use crate::utils::logger::Logger;
use crate::utils::progress::ProgressTracker;

pub struct ScanCommand<'a> {
    source_args: SourceArgs,
    level: u32,
    logger: &'a Logger,
}

/// Output tiles covering `bounds`, row by row
pub fn tile_grid(bounds: &Region, tile_width: u32, tile_height: u32) -> Vec<Region> {
    if bounds.is_empty() || tile_width == 0 || tile_height == 0 {
        return Vec::new();
    }

    let mut tiles = Vec::new();
    let mut y = bounds.y as i64;
    while y < bounds.end_y() {
        let mut x = bounds.x as i64;
        while x < bounds.end_x() {
            tiles.push(Region::new(x as i32, y as i32, tile_width, tile_height));
            x += tile_width as i64;
        }
        y += tile_height as i64;
    }
    tiles
}

/// Counts the status of every output tile of `level`
pub fn scan_level(
    source: &mut TiffTileSource,
    level: u32,
    progress: &ProgressTracker,
) -> BTreeMap<String, usize> {
    let grid = tile_grid(&source.image_rect(level), source.tile_width(), source.tile_height());
    let mut counts = BTreeMap::new();

    for rect in grid {
        let status = source.get_tile(rect, level).status();
        if status == DataStatus::Empty {
            debug!("Tile {} at level {} is empty", rect, level);
        }
        *counts.entry(status.to_string()).or_insert(0) += 1;
        progress.increment(1);
    }

    counts
}

impl<'a> ScanCommand<'a> {
    pub fn new(args: &ArgMatches, logger: &'a Logger) -> TiffResult<Self> {
        let level = match args.get_one::<String>("level") {
            Some(value) => parse_value::<u32>(value, "level")?,
            None => 0,
        };

        Ok(ScanCommand {
            source_args: SourceArgs::from_matches(args)?,
            level,
            logger,
        })
    }
}

impl<'a> Command for ScanCommand<'a> {
    fn execute(&self) -> TiffResult<()> {
        let mut source = self.source_args.open()?;
        if !source.is_valid_level(self.level) {
            return Err(TiffError::GenericError(format!(
                "Level {} is not valid; {} has {} level(s)",
                self.level, self.source_args.input, source.number_of_levels()
            )));
        }

        let bounds = source.image_rect(self.level);
        let total = tile_grid(&bounds, source.tile_width(), source.tile_height()).len();
        info!("Scanning level {} ({} samples x {} lines) in {} tiles of {}x{}",
              self.level, bounds.width, bounds.height, total, source.tile_width(), source.tile_height());

        let progress = ProgressTracker::new(total as u64, &format!("level {}", self.level));
        let counts = scan_level(&mut source, self.level, &progress);
        progress.finish();

        for (status, count) in &counts {
            info!("  {}: {}", status, count);
        }

        self.logger.log(&format!("Scanned level {} of {}", self.level, self.source_args.input))?;
        Ok(())
    }
}
