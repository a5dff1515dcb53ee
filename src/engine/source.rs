//! Tile source
//!
//! `TiffTileSource` opens a container through a [`StreamOpener`], builds
//! the page index, resolves the scalar type and a read method for every
//! directory, then serves output tiles for any rectangle and resolution
//! level. Decode failures never escape [`TiffTileSource::get_tile`]; they
//! are logged and the tile comes back blank.

use std::sync::Arc;

use log::{debug, info, warn};

use crate::engine::buffer::{buffer_size, ScratchBuffer};
use crate::engine::citation;
use crate::engine::decode::{rgba, scanline, tiled, u16_strip, DecodeContext};
use crate::engine::options::EngineOptions;
use crate::engine::page_index::PageIndex;
use crate::engine::palette::{color_map_lut, Palette};
use crate::engine::raw::UnitReader;
use crate::engine::rect::Region;
use crate::engine::scalar::{SampleStats, ScalarType};
use crate::engine::strategy::{select_read_method, PageLayout, ReadMethod};
use crate::engine::tile::OutputTile;
use crate::io::seekable::SeekableReader;
use crate::io::stream::StreamOpener;
use crate::tiff::constants::sample_format;
use crate::tiff::directory::DirectoryState;
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::state::HandlerState;

/// Property holding the palette flag
pub const APPLY_COLOR_PALETTE_PROPERTY: &str = "apply_color_palette_flag";
/// Read-only property naming the format
pub const FILE_TYPE_PROPERTY: &str = "file_type";

/// Default output tile edge for strip organized containers
const STRIP_OUTPUT_TILE: u32 = 64;

/// Tiled access to a multi-directory TIFF container
pub struct TiffTileSource {
    opener: Arc<dyn StreamOpener>,
    options: EngineOptions,
    connection: Option<String>,
    state: Option<HandlerState>,
    units: Option<UnitReader>,
    index: PageIndex,
    scalar: ScalarType,
    stats: SampleStats,
    /// Input bands after color map and complex sample handling
    samples_per_pixel: u16,
    read_methods: Vec<ReadMethod>,
    palettes: Vec<Option<Palette>>,
    output_bands: Vec<u32>,
    current_directory: Option<usize>,
    output_tile_size: (u32, u32),
    buffer: ScratchBuffer,
    tile: Option<OutputTile>,
}

impl TiffTileSource {
    pub fn new(opener: Arc<dyn StreamOpener>) -> Self {
        Self::with_options(opener, EngineOptions::default())
    }

    pub fn with_options(opener: Arc<dyn StreamOpener>, options: EngineOptions) -> Self {
        let mut stats = SampleStats::new(None, None);
        stats.validate(ScalarType::U8);

        TiffTileSource {
            opener,
            options,
            connection: None,
            state: None,
            units: None,
            index: PageIndex::default(),
            scalar: ScalarType::U8,
            stats,
            samples_per_pixel: 0,
            read_methods: Vec::new(),
            palettes: Vec::new(),
            output_bands: Vec::new(),
            current_directory: None,
            output_tile_size: (0, 0),
            buffer: ScratchBuffer::new(),
            tile: None,
        }
    }

    /// Opens `connection`, parsing every directory's tags
    ///
    /// Any open source is closed first. On failure the source is left
    /// closed.
    pub fn open(&mut self, connection: &str) -> TiffResult<()> {
        self.close();
        let mut stream = self.open_stream(connection)?;

        let state = match HandlerState::read(stream.as_mut(), connection) {
            Ok(state) => state,
            Err(e) => {
                warn!("Cannot read directories of {}: {}", connection, e);
                return Err(e);
            }
        };

        self.complete_open(connection, stream, state)
    }

    /// Opens `connection` using a previously built handler state
    ///
    /// The tags are taken from `state` instead of being parsed again.
    pub fn open_with_state(&mut self, connection: &str, state: HandlerState) -> TiffResult<()> {
        self.close();
        let stream = self.open_stream(connection)?;
        self.complete_open(connection, stream, state)
    }

    /// Applies saved options, then opens `connection`
    pub fn load_options(&mut self, options: EngineOptions, connection: &str) -> TiffResult<()> {
        self.options = options;
        self.output_bands.clear();
        self.open(connection)
    }

    fn open_stream(&self, connection: &str) -> TiffResult<Box<dyn SeekableReader>> {
        if connection.is_empty() {
            return Err(TiffError::GenericError("Empty connection string".to_string()));
        }
        self.opener.open(connection).map_err(|e| {
            warn!("Cannot open {}: {}", connection, e);
            TiffError::StreamOpen(connection.to_string(), e)
        })
    }

    fn complete_open(&mut self, connection: &str, stream: Box<dyn SeekableReader>, state: HandlerState) -> TiffResult<()> {
        match self.setup(connection, stream, state) {
            Ok(()) => {
                info!("Opened {}: {} directories, {} levels, {} {} band(s)",
                      connection, self.number_of_directories(), self.number_of_levels(),
                      self.scalar, self.samples_per_pixel);
                Ok(())
            }
            Err(e) => {
                warn!("Cannot open {}: {}", connection, e);
                self.close();
                Err(e)
            }
        }
    }

    fn setup(&mut self, connection: &str, stream: Box<dyn SeekableReader>, state: HandlerState) -> TiffResult<()> {
        if state.directories.is_empty() {
            return Err(TiffError::NoDirectories);
        }

        let index = PageIndex::build(&state.directories)?;
        let first = index.levels[0];
        let page = &state.directories[first];

        let scalar = ScalarType::resolve(page.bits_per_sample, page.sample_format, page.max_sample_value)?;

        let mut stats = SampleStats::new(page.min_sample_value, page.max_sample_value);
        stats.validate(scalar);
        if scalar == ScalarType::F32 {
            citation::apply_overrides(&mut stats, page.gdal_nodata.as_deref(), page.vertical_citation.as_deref());
        }
        debug!("Scalar {} with min {}, max {}, null {}", scalar, stats.min, stats.max, stats.null);

        let output_tile_size = if page.is_tiled() {
            (page.tile_width, page.tile_length)
        } else {
            (STRIP_OUTPUT_TILE, STRIP_OUTPUT_TILE)
        };

        self.units = Some(UnitReader::new(stream, state.byte_order));
        self.connection = Some(connection.to_string());
        self.index = index;
        self.scalar = scalar;
        self.stats = stats;
        self.output_tile_size = output_tile_size;
        self.state = Some(state);
        self.current_directory = None;
        self.set_read_methods();

        if let Some(bands) = self.options.bands.clone() {
            if !is_identity(&bands) && !self.set_output_band_list(&bands) {
                warn!("Ignoring band list {:?} for {}", bands, connection);
            }
        }

        Ok(())
    }

    /// Derives band counts, palettes and read methods from the tags
    ///
    /// Runs at open and whenever the palette flag changes.
    fn set_read_methods(&mut self) {
        let apply = self.options.apply_color_palette_flag;
        let state = match &self.state {
            Some(state) => state,
            None => return,
        };
        let first = match state.directory(self.index.levels.first().copied().unwrap_or(0)) {
            Some(page) => page,
            None => return,
        };

        let samples_per_pixel = effective_samples_per_pixel(first, apply);

        self.palettes = state
            .directories
            .iter()
            .map(|page| match (&page.color_map, apply) {
                (Some(map), true) => Palette::from_color_map(map),
                _ => None,
            })
            .collect();

        self.read_methods = state
            .directories
            .iter()
            .map(|page| {
                let layout = PageLayout::from_directory(page, apply, samples_per_pixel);
                let method = select_read_method(&layout);
                debug!("Directory {} reads with {}", page.index, method);
                method
            })
            .collect();
        self.samples_per_pixel = samples_per_pixel;
    }

    /// Releases the stream and forgets the container
    pub fn close(&mut self) {
        if let Some(connection) = self.connection.take() {
            debug!("Closing {}", connection);
        }
        self.state = None;
        self.units = None;
        self.index = PageIndex::default();
        self.scalar = ScalarType::U8;
        self.stats = SampleStats::new(None, None);
        self.stats.validate(ScalarType::U8);
        self.samples_per_pixel = 0;
        self.read_methods.clear();
        self.palettes.clear();
        self.output_bands.clear();
        self.current_directory = None;
        self.output_tile_size = (0, 0);
        self.buffer.release();
        self.tile = None;
    }

    pub fn is_open(&self) -> bool {
        self.units.is_some() && self.state.is_some()
    }

    pub fn connection(&self) -> Option<&str> {
        self.connection.as_deref()
    }

    /// Tag state of every directory, for saving and reuse
    pub fn state(&self) -> Option<&HandlerState> {
        self.state.as_ref()
    }

    pub fn page_index(&self) -> &PageIndex {
        &self.index
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Options describing the current setup, ready to persist
    ///
    /// The band list is only kept when it can be honored and is not the
    /// identity.
    pub fn save_options(&self) -> EngineOptions {
        let mut options = self.options.clone();
        options.bands = if self.is_band_selector() && !self.output_bands.is_empty() && !is_identity(&self.output_bands) {
            Some(self.output_bands.clone())
        } else {
            None
        };
        options
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.options.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.options.enabled
    }

    pub fn set_buffer_scan_line_reads(&mut self, buffered: bool) {
        if self.options.buffer_scan_line_reads != buffered {
            self.options.buffer_scan_line_reads = buffered;
            self.buffer.release();
        }
    }

    /// Fetches `rect` at `level` into the source's own tile
    ///
    /// The returned tile is overwritten by the next call. Closed or
    /// disabled sources, invalid levels and decode errors all give a
    /// blank tile of the requested size.
    pub fn get_tile(&mut self, rect: Region, level: u32) -> &OutputTile {
        let bands = self.number_of_output_bands().max(1);

        let mut tile = match self.tile.take() {
            Some(mut tile) if tile.band_count() == bands && tile.scalar_type() == self.scalar => {
                tile.set_region(rect);
                tile
            }
            _ => OutputTile::new(rect, bands, self.scalar, &self.stats),
        };

        if let Err(e) = self.fill_tile(&mut tile, level) {
            debug!("Tile {} at level {} is blank: {}", rect, level, e);
            tile.make_blank();
        }

        self.tile.insert(tile)
    }

    /// Fills a caller-owned tile with its region at `level`
    ///
    /// Regions outside the image, invalid levels and disabled sources
    /// blank the tile and succeed. Read and allocation errors blank the
    /// tile and are returned.
    pub fn fill_tile(&mut self, tile: &mut OutputTile, level: u32) -> TiffResult<()> {
        if !self.is_open() {
            tile.make_blank();
            return Err(TiffError::NotOpen);
        }
        if !self.options.enabled || !self.is_valid_level(level) {
            tile.make_blank();
            return Ok(());
        }
        if tile.band_count() != self.number_of_output_bands() {
            tile.make_blank();
            return Err(TiffError::GenericError(format!(
                "Tile has {} bands, source outputs {}", tile.band_count(), self.number_of_output_bands()
            )));
        }

        let directory = match self.index.directory_for_level(level, self.options.starting_res_level) {
            Some(directory) => directory,
            None => {
                tile.make_blank();
                return Ok(());
            }
        };

        let tile_rect = tile.region();
        let image_rect = self.image_rect(level);
        if !tile_rect.intersects(&image_rect) {
            tile.make_blank();
            return Ok(());
        }

        let mut reallocate = !self.buffer.is_allocated();
        if (tile_rect.width, tile_rect.height) != self.output_tile_size {
            self.output_tile_size = (tile_rect.width, tile_rect.height);
            reallocate = true;
        }
        if self.current_directory != Some(directory) {
            debug!("Switching to directory {} for level {}", directory, level);
            self.current_directory = Some(directory);
            reallocate = true;
        }
        if reallocate {
            if let Err(e) = self.allocate_buffer(directory) {
                tile.make_blank();
                return Err(e);
            }
        }

        let clip = tile_rect.clip_to(&image_rect);
        if !tile_rect.completely_within(&clip) {
            tile.make_blank();
        }

        if let Err(e) = self.load_tile(tile, &clip, level, directory) {
            tile.make_blank();
            return Err(e);
        }

        tile.validate();
        Ok(())
    }

    fn allocate_buffer(&mut self, directory: usize) -> TiffResult<()> {
        let page = self
            .state
            .as_ref()
            .and_then(|state| state.directory(directory))
            .ok_or(TiffError::NotOpen)?;
        let method = self.read_methods.get(directory).copied().unwrap_or(ReadMethod::Unknown);

        let size = buffer_size(
            method,
            page,
            self.scalar.bytes_per_sample(),
            self.samples_per_pixel as usize,
            self.output_tile_size.1,
            self.options.buffer_scan_line_reads,
        );

        match size {
            Some(size) => self.buffer.ensure(size),
            None => {
                warn!("Unknown read method for directory {}", directory);
                self.buffer.release();
                Err(TiffError::UnsupportedReadMethod(directory))
            }
        }
    }

    fn load_tile(&mut self, tile: &mut OutputTile, clip: &Region, level: u32, directory: usize) -> TiffResult<()> {
        let state = self.state.as_ref().ok_or(TiffError::NotOpen)?;
        let units = self.units.as_mut().ok_or(TiffError::NotOpen)?;
        let page = state
            .directory(directory)
            .ok_or_else(|| TiffError::GenericError(format!("No directory {}", directory)))?;

        let identity: Vec<u32>;
        let band_list: &[u32] = if self.output_bands.is_empty() {
            identity = (0..self.samples_per_pixel as u32).collect();
            &identity
        } else {
            &self.output_bands
        };

        let ctx = DecodeContext {
            page,
            level,
            samples_per_pixel: self.samples_per_pixel as usize,
            bytes_per_sample: self.scalar.bytes_per_sample(),
            band_list,
            palette: self.palettes.get(directory).and_then(|p| p.as_ref()),
            buffered: self.options.buffer_scan_line_reads,
        };
        let buffer = &mut self.buffer;

        match self.read_methods.get(directory).copied().unwrap_or(ReadMethod::Unknown) {
            ReadMethod::Tile => tiled::load_from_tile(&ctx, units, buffer, clip, tile),
            ReadMethod::ScanLine => scanline::load_from_scan_line(&ctx, units, buffer, clip, tile),
            ReadMethod::RgbaU8Tile => rgba::load_from_rgba_tile(&ctx, units, buffer, clip, tile),
            ReadMethod::RgbaU8Strip => rgba::load_from_rgba_strip(&ctx, units, buffer, clip, tile),
            ReadMethod::RgbaU8aStrip => rgba::load_from_rgba_strip_null_remap(&ctx, units, buffer, clip, tile),
            ReadMethod::U16Strip => u16_strip::load_from_u16_strip(&ctx, units, buffer, clip, tile),
            ReadMethod::Unknown => {
                warn!("Directory {} has no usable read method", directory);
                Err(TiffError::UnsupportedReadMethod(directory))
            }
        }
    }

    /// Sets the output band order
    ///
    /// Only honored when every directory is tiled with separate planes.
    /// Returns whether the list was taken.
    pub fn set_output_band_list(&mut self, bands: &[u32]) -> bool {
        if !self.is_band_selector() {
            return false;
        }

        let inputs = self.number_of_input_bands();
        if bands.is_empty() || bands.iter().any(|&b| b >= inputs) {
            warn!("Band list {:?} is out of range for {} input bands", bands, inputs);
            return false;
        }

        self.output_bands = bands.to_vec();
        self.options.bands = Some(self.output_bands.clone());
        if let Some(tile) = &self.tile {
            if tile.band_count() != self.output_bands.len() {
                self.tile = None;
            }
        }
        true
    }

    pub fn output_band_list(&self) -> Vec<u32> {
        if self.output_bands.is_empty() {
            (0..self.number_of_input_bands()).collect()
        } else {
            self.output_bands.clone()
        }
    }

    /// Whether every directory is read as separate-plane native tiles
    pub fn is_band_selector(&self) -> bool {
        let state = match &self.state {
            Some(state) if self.is_open() && !self.read_methods.is_empty() => state,
            _ => return false,
        };

        self.read_methods.len() == state.directories.len()
            && self
                .read_methods
                .iter()
                .zip(&state.directories)
                .all(|(method, page)| *method == ReadMethod::Tile && page.is_separate())
    }

    /// Turns color map expansion on or off
    ///
    /// On color mapped containers this recomputes the band count and read
    /// methods and drops the cached tile and buffer.
    pub fn set_apply_color_palette(&mut self, flag: bool) {
        self.options.apply_color_palette_flag = flag;

        if self.is_color_mapped() {
            self.set_read_methods();
            self.output_bands.clear();
            self.tile = None;
            self.buffer.release();
            debug!("Palette {}; {} input band(s)", if flag { "applied" } else { "off" }, self.samples_per_pixel);
        }
    }

    pub fn apply_color_palette(&self) -> bool {
        self.options.apply_color_palette_flag
    }

    /// Whether the active directory carries a color map
    pub fn is_color_mapped(&self) -> bool {
        let directory = self.current_directory.or_else(|| self.index.levels.first().copied());
        match (&self.state, directory) {
            (Some(state), Some(directory)) => state.directory(directory).map_or(false, |p| p.has_color_map()),
            _ => false,
        }
    }

    /// 8-bit lookup table of the first level's color map
    pub fn lut(&self) -> Option<Vec<[u8; 3]>> {
        let first = self.index.levels.first().copied()?;
        let page = self.state.as_ref()?.directory(first)?;
        page.color_map.as_deref().map(color_map_lut)
    }

    pub fn set_property(&mut self, name: &str, value: &str) -> bool {
        match name {
            APPLY_COLOR_PALETTE_PROPERTY => match parse_bool(value) {
                Some(flag) => {
                    self.set_apply_color_palette(flag);
                    true
                }
                None => {
                    warn!("Invalid value {:?} for {}", value, name);
                    false
                }
            },
            _ => false,
        }
    }

    pub fn property(&self, name: &str) -> Option<String> {
        match name {
            APPLY_COLOR_PALETTE_PROPERTY => Some(self.options.apply_color_palette_flag.to_string()),
            FILE_TYPE_PROPERTY => Some("TIFF".to_string()),
            _ => None,
        }
    }

    pub fn property_names(&self) -> Vec<&'static str> {
        vec![APPLY_COLOR_PALETTE_PROPERTY, FILE_TYPE_PROPERTY]
    }

    /// Offsets levels when this container serves as another source's
    /// overview
    pub fn set_starting_res_level(&mut self, level: u32) {
        self.options.starting_res_level = level;
    }

    pub fn starting_res_level(&self) -> u32 {
        self.options.starting_res_level
    }

    pub fn has_r0(&self) -> bool {
        self.index.r0_is_full_res
    }

    pub fn number_of_levels(&self) -> u32 {
        self.index.number_of_levels(self.options.starting_res_level)
    }

    pub fn is_valid_level(&self, level: u32) -> bool {
        self.is_open() && self.index.is_valid_level(level, self.options.starting_res_level)
    }

    fn level_page(&self, level: u32) -> Option<&DirectoryState> {
        if !self.is_open() {
            return None;
        }
        let directory = self.index.directory_for_level(level, self.options.starting_res_level)?;
        self.state.as_ref()?.directory(directory)
    }

    /// Lines at `level`, 0 for invalid levels
    pub fn number_of_lines(&self, level: u32) -> u32 {
        self.level_page(level).map_or(0, |page| page.length)
    }

    /// Samples per line at `level`, 0 for invalid levels
    pub fn number_of_samples(&self, level: u32) -> u32 {
        self.level_page(level).map_or(0, |page| page.width)
    }

    /// Zero based bounds of `level`
    pub fn image_rect(&self, level: u32) -> Region {
        Region::new(0, 0, self.number_of_samples(level), self.number_of_lines(level))
    }

    pub fn scalar_type(&self) -> ScalarType {
        self.scalar
    }

    pub fn number_of_input_bands(&self) -> u32 {
        self.samples_per_pixel as u32
    }

    pub fn number_of_output_bands(&self) -> usize {
        if self.output_bands.is_empty() {
            self.samples_per_pixel as usize
        } else {
            self.output_bands.len()
        }
    }

    pub fn min_pixel_value(&self) -> f64 {
        self.stats.min
    }

    pub fn max_pixel_value(&self) -> f64 {
        self.stats.max
    }

    pub fn null_pixel_value(&self) -> f64 {
        self.stats.null
    }

    pub fn number_of_directories(&self) -> usize {
        self.state.as_ref().map_or(0, |state| state.number_of_directories())
    }

    pub fn read_method(&self, directory: usize) -> ReadMethod {
        self.read_methods.get(directory).copied().unwrap_or(ReadMethod::Unknown)
    }

    pub fn read_method_name(&self, directory: usize) -> &'static str {
        self.read_method(directory).name()
    }

    /// Native tile width of the first level, 0 for strips
    pub fn image_tile_width(&self) -> u32 {
        self.level_page(0).map_or(0, |page| page.tile_width)
    }

    pub fn image_tile_height(&self) -> u32 {
        self.level_page(0).map_or(0, |page| page.tile_length)
    }

    /// Width of the output tiles currently served
    pub fn tile_width(&self) -> u32 {
        self.output_tile_size.0
    }

    pub fn tile_height(&self) -> u32 {
        self.output_tile_size.1
    }
}

/// Input bands of the first level as the engine outputs them
fn effective_samples_per_pixel(page: &DirectoryState, apply_palette: bool) -> u16 {
    if page.has_color_map() {
        return if apply_palette { 3 } else { 1 };
    }
    if page.sample_format == sample_format::COMPLEX_INT && page.bits_per_sample == 32 {
        // Real and imaginary parts come out as separate bands.
        return page.samples_per_pixel * 2;
    }
    page.samples_per_pixel
}

fn is_identity(bands: &[u32]) -> bool {
    bands.iter().enumerate().all(|(i, &b)| b as usize == i)
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Some(true),
        "false" | "no" | "0" | "off" => Some(false),
        _ => None,
    }
}
