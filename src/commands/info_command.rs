//! Container summary command
//!
//! Opens the input and reports its directories, resolution levels, masks,
//! read methods and sample range.

use clap::ArgMatches;
use log::info;

use crate::commands::command_traits::Command;
use crate::commands::source_args::SourceArgs;
use crate::engine::TiffTileSource;
use crate::tiff::directory::DirectoryState;
use crate::tiff::errors::TiffResult;
use crate::utils::logger::Logger;
use crate::utils::tag_utils::{get_compression_name, get_photometric_name};

pub struct InfoCommand<'a> {
    source_args: SourceArgs,
    verbose: bool,
    logger: &'a Logger,
}

impl<'a> InfoCommand<'a> {
    pub fn new(args: &ArgMatches, logger: &'a Logger) -> TiffResult<Self> {
        Ok(InfoCommand {
            source_args: SourceArgs::from_matches(args)?,
            verbose: args.get_flag("verbose"),
            logger,
        })
    }

    /// Role of a directory: level, mask or ignored
    fn role(source: &TiffTileSource, directory: usize) -> String {
        let index = source.page_index();
        if let Some(level) = index.level_of_directory(directory) {
            format!("level {}", level)
        } else if index.masks.contains(&directory) {
            "mask".to_string()
        } else {
            "ignored".to_string()
        }
    }

    fn display_directory(&self, source: &TiffTileSource, page: &DirectoryState) {
        let layout = if page.is_tiled() {
            format!("tiles {}x{}", page.tile_width, page.tile_length)
        } else {
            format!("strips of {} rows", page.rows_per_strip)
        };

        info!("  Directory {}: {}x{}, {}, {}",
              page.index, page.width, page.length, layout, Self::role(source, page.index));
        info!("    {} x {}-bit sample(s), format {}, {} planes",
              page.samples_per_pixel, page.bits_per_sample, page.sample_format,
              if page.is_separate() { "separate" } else { "contiguous" });
        info!("    Compression: {}, photometric: {}, read method: {}",
              get_compression_name(page.compression as u64),
              get_photometric_name(page.photometric as u64),
              source.read_method_name(page.index));

        if self.verbose {
            info!("    Subfile type: {}, predictor: {}, color map: {}",
                  page.subfile_type, page.predictor, if page.has_color_map() { "yes" } else { "no" });
            if let Some(nodata) = &page.gdal_nodata {
                info!("    GDAL no-data: {}", nodata);
            }
            if let Some(citation) = &page.vertical_citation {
                info!("    Vertical citation: {}", citation);
            }
        }
    }

    fn display_levels(&self, source: &TiffTileSource) {
        let start = source.starting_res_level();
        info!("Resolution levels: {} (starting at {}, r0 {})",
              source.number_of_levels(), start, if source.has_r0() { "present" } else { "absent" });

        let last = start + source.page_index().levels.len() as u32;
        for level in (0..last).filter(|&level| source.is_valid_level(level)) {
            info!("  Level {}: {} samples x {} lines", level,
                  source.number_of_samples(level), source.number_of_lines(level));
        }
    }
}

impl<'a> Command for InfoCommand<'a> {
    fn execute(&self) -> TiffResult<()> {
        let source = self.source_args.open()?;

        if let Some(state) = source.state() {
            info!("{}: {} ({} byte order), {} directories",
                  state.connection, if state.big_tiff { "BigTIFF" } else { "TIFF" },
                  state.byte_order.name(), state.number_of_directories());
            for page in &state.directories {
                self.display_directory(&source, page);
            }
        }

        self.display_levels(&source);

        info!("Scalar type: {}, min {}, max {}, null {}",
              source.scalar_type(), source.min_pixel_value(), source.max_pixel_value(), source.null_pixel_value());
        info!("Bands: {} input, {} output {:?}{}",
              source.number_of_input_bands(), source.number_of_output_bands(), source.output_band_list(),
              if source.is_band_selector() { " (band selectable)" } else { "" });
        if source.is_color_mapped() {
            info!("Color mapped; palette {}", if source.apply_color_palette() { "applied" } else { "not applied" });
        }
        info!("Output tiles: {}x{} (image tiles {}x{})",
              source.tile_width(), source.tile_height(), source.image_tile_width(), source.image_tile_height());

        self.logger.log(&format!("Summarized {}", self.source_args.input))?;
        Ok(())
    }
}
