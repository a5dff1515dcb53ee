//! In-memory TIFF fixtures for the integration tests
//!
//! `build_tiff` lays a file out as header, every directory with its
//! out-of-line tag values, then all strip and tile payloads. Payloads come
//! last so truncating the buffer cuts into image data, never into tags.

#![allow(dead_code)]

use byteorder::{BigEndian, LittleEndian, WriteBytesExt};

use rastertile::compression::{CompressionFactory, CompressionHandler};
use rastertile::tiff::constants::{compression, field_types, photometric, planar_config, sample_format, tags};
use rastertile::{EngineOptions, RasterTile, TiffTileSource};

/// One directory to be written
#[derive(Debug, Clone)]
pub struct Page {
    pub width: u32,
    pub length: u32,
    pub bits_per_sample: u16,
    pub samples_per_pixel: u16,
    pub sample_format: u16,
    pub photometric: u16,
    pub compression: u16,
    pub predictor: u16,
    pub planar_config: u16,
    pub subfile_type: u32,
    pub rows_per_strip: u32,
    pub tile_size: Option<(u32, u32)>,
    pub color_map: Option<Vec<u16>>,
    pub max_sample_value: Option<u16>,
    pub gdal_nodata: Option<String>,
    pub vertical_citation: Option<String>,
    /// Decoded strip or tile payloads, plane-major for separate planes
    pub units: Vec<Vec<u8>>,
}

impl Page {
    fn new(width: u32, length: u32, bits: u16, spp: u16, units: Vec<Vec<u8>>) -> Page {
        Page {
            width,
            length,
            bits_per_sample: bits,
            samples_per_pixel: spp,
            sample_format: sample_format::UNSIGNED,
            photometric: if spp >= 3 { photometric::RGB } else { photometric::BLACK_IS_ZERO },
            compression: compression::NONE,
            predictor: 1,
            planar_config: planar_config::CHUNKY,
            subfile_type: 0,
            rows_per_strip: length,
            tile_size: None,
            color_map: None,
            max_sample_value: None,
            gdal_nodata: None,
            vertical_citation: None,
            units,
        }
    }

    pub fn strips(width: u32, length: u32, bits: u16, spp: u16, rows_per_strip: u32, units: Vec<Vec<u8>>) -> Page {
        Page { rows_per_strip, ..Page::new(width, length, bits, spp, units) }
    }

    pub fn tiles(width: u32, length: u32, bits: u16, spp: u16, tile: (u32, u32), units: Vec<Vec<u8>>) -> Page {
        Page { tile_size: Some(tile), ..Page::new(width, length, bits, spp, units) }
    }

    pub fn compressed(mut self, code: u16) -> Page {
        self.compression = code;
        self
    }

    /// Horizontal differencing, applied to 8-bit payloads at build time
    pub fn with_predictor(mut self) -> Page {
        self.predictor = 2;
        self
    }

    pub fn reduced(mut self) -> Page {
        self.subfile_type = 1;
        self
    }

    pub fn subfile(mut self, subfile_type: u32) -> Page {
        self.subfile_type = subfile_type;
        self
    }

    pub fn photometric(mut self, photometric: u16) -> Page {
        self.photometric = photometric;
        self
    }

    pub fn planar(mut self) -> Page {
        self.planar_config = planar_config::PLANAR;
        self
    }

    pub fn sample_format(mut self, format: u16) -> Page {
        self.sample_format = format;
        self
    }

    pub fn color_map(mut self, map: Vec<u16>) -> Page {
        self.photometric = photometric::PALETTE;
        self.color_map = Some(map);
        self
    }

    pub fn max_sample(mut self, max: u16) -> Page {
        self.max_sample_value = Some(max);
        self
    }

    pub fn nodata(mut self, nodata: &str) -> Page {
        self.gdal_nodata = Some(nodata.to_string());
        self
    }

    pub fn citation(mut self, citation: &str) -> Page {
        self.vertical_citation = Some(citation.to_string());
        self
    }

    /// Pixel width of one unit row
    fn unit_width(&self) -> usize {
        match self.tile_size {
            Some((tw, _)) => tw as usize,
            None => self.width as usize,
        }
    }

    fn encoded_units(&self) -> Vec<Vec<u8>> {
        let handler = CompressionFactory::create_handler(self.compression as u64).unwrap();
        let samples = if self.planar_config == planar_config::PLANAR { 1 } else { self.samples_per_pixel as usize };
        let row_len = self.unit_width() * samples;

        self.units
            .iter()
            .map(|unit| {
                let mut data = unit.clone();
                if self.predictor == 2 && self.bits_per_sample == 8 {
                    for row in data.chunks_mut(row_len) {
                        for i in (samples..row.len()).rev() {
                            row[i] = row[i].wrapping_sub(row[i - samples]);
                        }
                    }
                }
                handler.compress(&data).unwrap()
            })
            .collect()
    }
}

struct Entry {
    tag: u16,
    field_type: u16,
    count: u32,
    data: Vec<u8>,
}

struct Writer {
    big_endian: bool,
}

impl Writer {
    fn u16(&self, buf: &mut Vec<u8>, value: u16) {
        if self.big_endian {
            buf.write_u16::<BigEndian>(value).unwrap();
        } else {
            buf.write_u16::<LittleEndian>(value).unwrap();
        }
    }

    fn u32(&self, buf: &mut Vec<u8>, value: u32) {
        if self.big_endian {
            buf.write_u32::<BigEndian>(value).unwrap();
        } else {
            buf.write_u32::<LittleEndian>(value).unwrap();
        }
    }

    fn shorts(&self, tag: u16, values: &[u16]) -> Entry {
        let mut data = Vec::new();
        for &v in values {
            self.u16(&mut data, v);
        }
        Entry { tag, field_type: field_types::SHORT, count: values.len() as u32, data }
    }

    fn longs(&self, tag: u16, values: &[u32]) -> Entry {
        let mut data = Vec::new();
        for &v in values {
            self.u32(&mut data, v);
        }
        Entry { tag, field_type: field_types::LONG, count: values.len() as u32, data }
    }

    fn ascii(&self, tag: u16, text: &str) -> Entry {
        let mut data = text.as_bytes().to_vec();
        data.push(0);
        Entry { tag, field_type: field_types::ASCII, count: data.len() as u32, data }
    }

    fn entries(&self, page: &Page, offsets: &[u32], counts: &[u32]) -> Vec<Entry> {
        let spp = page.samples_per_pixel as usize;
        let mut entries = vec![
            self.longs(tags::NEW_SUBFILE_TYPE, &[page.subfile_type]),
            self.longs(tags::IMAGE_WIDTH, &[page.width]),
            self.longs(tags::IMAGE_LENGTH, &[page.length]),
            self.shorts(tags::BITS_PER_SAMPLE, &vec![page.bits_per_sample; spp]),
            self.shorts(tags::COMPRESSION, &[page.compression]),
            self.shorts(tags::PHOTOMETRIC_INTERPRETATION, &[page.photometric]),
            self.shorts(tags::SAMPLES_PER_PIXEL, &[page.samples_per_pixel]),
            self.shorts(tags::PLANAR_CONFIGURATION, &[page.planar_config]),
            self.shorts(tags::SAMPLE_FORMAT, &vec![page.sample_format; spp]),
        ];

        match page.tile_size {
            Some((tw, th)) => {
                entries.push(self.longs(tags::TILE_WIDTH, &[tw]));
                entries.push(self.longs(tags::TILE_LENGTH, &[th]));
                entries.push(self.longs(tags::TILE_OFFSETS, offsets));
                entries.push(self.longs(tags::TILE_BYTE_COUNTS, counts));
            }
            None => {
                entries.push(self.longs(tags::STRIP_OFFSETS, offsets));
                entries.push(self.longs(tags::ROWS_PER_STRIP, &[page.rows_per_strip]));
                entries.push(self.longs(tags::STRIP_BYTE_COUNTS, counts));
            }
        }

        if page.predictor != 1 {
            entries.push(self.shorts(tags::PREDICTOR, &[page.predictor]));
        }
        if let Some(max) = page.max_sample_value {
            entries.push(self.shorts(tags::MAX_SAMPLE_VALUE, &[max]));
        }
        if let Some(map) = &page.color_map {
            entries.push(self.shorts(tags::COLOR_MAP, map));
        }
        if let Some(citation) = &page.vertical_citation {
            let text = format!("{}|", citation);
            entries.push(self.shorts(
                tags::GEO_KEY_DIRECTORY_TAG,
                &[1, 1, 0, 1, 4097, tags::GEO_ASCII_PARAMS_TAG, text.len() as u16, 0],
            ));
            entries.push(self.ascii(tags::GEO_ASCII_PARAMS_TAG, &text));
        }
        if let Some(nodata) = &page.gdal_nodata {
            entries.push(self.ascii(tags::GDAL_NODATA, nodata));
        }

        entries.sort_by_key(|e| e.tag);
        entries
    }
}

fn padded(len: usize) -> usize {
    len + len % 2
}

fn directory_size(entries: &[Entry]) -> usize {
    let external: usize = entries.iter().filter(|e| e.data.len() > 4).map(|e| padded(e.data.len())).sum();
    2 + 12 * entries.len() + 4 + external
}

/// Writes a classic TIFF holding `pages` in order
pub fn build_tiff(pages: &[Page], big_endian: bool) -> Vec<u8> {
    let writer = Writer { big_endian };
    let encoded: Vec<Vec<Vec<u8>>> = pages.iter().map(|p| p.encoded_units()).collect();

    // Directory sizes do not depend on the offset values, only on their count.
    let sizes: Vec<usize> = pages
        .iter()
        .zip(&encoded)
        .map(|(page, units)| {
            let zeros = vec![0u32; units.len()];
            directory_size(&writer.entries(page, &zeros, &zeros))
        })
        .collect();

    let mut data_offset = 8 + sizes.iter().sum::<usize>();
    let mut unit_offsets = Vec::new();
    for units in &encoded {
        let mut offsets = Vec::new();
        for unit in units {
            offsets.push(data_offset as u32);
            data_offset += unit.len();
        }
        unit_offsets.push(offsets);
    }

    let mut buf = Vec::new();
    buf.extend_from_slice(if big_endian { b"MM" } else { b"II" });
    writer.u16(&mut buf, 42);
    writer.u32(&mut buf, 8);

    let mut ifd_offset = 8;
    for (i, page) in pages.iter().enumerate() {
        let counts: Vec<u32> = encoded[i].iter().map(|u| u.len() as u32).collect();
        let entries = writer.entries(page, &unit_offsets[i], &counts);

        let mut external_offset = ifd_offset + 2 + 12 * entries.len() + 4;
        let mut external = Vec::new();

        writer.u16(&mut buf, entries.len() as u16);
        for entry in &entries {
            writer.u16(&mut buf, entry.tag);
            writer.u16(&mut buf, entry.field_type);
            writer.u32(&mut buf, entry.count);
            if entry.data.len() <= 4 {
                let mut field = [0u8; 4];
                field[..entry.data.len()].copy_from_slice(&entry.data);
                buf.extend_from_slice(&field);
            } else {
                writer.u32(&mut buf, external_offset as u32);
                external.extend_from_slice(&entry.data);
                if entry.data.len() % 2 == 1 {
                    external.push(0);
                }
                external_offset += padded(entry.data.len());
            }
        }

        let next = if i + 1 < pages.len() { ifd_offset + sizes[i] } else { 0 };
        writer.u32(&mut buf, next as u32);
        buf.extend_from_slice(&external);
        ifd_offset += sizes[i];
    }

    for units in &encoded {
        for unit in units {
            buf.extend_from_slice(unit);
        }
    }

    buf
}

/// Row-major 8-bit image of `width x length` pixels with `spp` samples
pub fn image_u8<F>(width: u32, length: u32, spp: usize, f: F) -> Vec<u8>
where
    F: Fn(u32, u32, usize) -> u8,
{
    let mut data = Vec::with_capacity(width as usize * length as usize * spp);
    for y in 0..length {
        for x in 0..width {
            for s in 0..spp {
                data.push(f(x, y, s));
            }
        }
    }
    data
}

/// Cuts a row-major image into strips of `rows_per_strip` rows
pub fn split_strips(image: &[u8], row_bytes: usize, rows_per_strip: u32) -> Vec<Vec<u8>> {
    image.chunks(row_bytes * rows_per_strip as usize).map(|c| c.to_vec()).collect()
}

/// Cuts a row-major image into zero-padded `tw x th` tiles
pub fn split_tiles(image: &[u8], width: u32, length: u32, pixel_bytes: usize, tw: u32, th: u32) -> Vec<Vec<u8>> {
    let mut tiles = Vec::new();
    for ty in (0..length).step_by(th as usize) {
        for tx in (0..width).step_by(tw as usize) {
            let mut tile = vec![0u8; (tw * th) as usize * pixel_bytes];
            for row in 0..th {
                let y = ty + row;
                if y >= length {
                    break;
                }
                for col in 0..tw {
                    let x = tx + col;
                    if x >= width {
                        break;
                    }
                    let src = ((y * width + x) as usize) * pixel_bytes;
                    let dst = ((row * tw + col) as usize) * pixel_bytes;
                    tile[dst..dst + pixel_bytes].copy_from_slice(&image[src..src + pixel_bytes]);
                }
            }
            tiles.push(tile);
        }
    }
    tiles
}

/// Encodes 16-bit samples in the file's byte order
pub fn u16_bytes(values: &[u16], big_endian: bool) -> Vec<u8> {
    let mut out = Vec::with_capacity(values.len() * 2);
    for &v in values {
        if big_endian {
            out.write_u16::<BigEndian>(v).unwrap();
        } else {
            out.write_u16::<LittleEndian>(v).unwrap();
        }
    }
    out
}

pub fn f32_bytes(values: &[f32]) -> Vec<u8> {
    let mut out = Vec::with_capacity(values.len() * 4);
    for &v in values {
        out.write_f32::<LittleEndian>(v).unwrap();
    }
    out
}

/// The 8x8 gray fixture: pixel (x, y) holds `y * 8 + x + 1`, four rows per strip
pub fn gray_8x8() -> Page {
    let image = image_u8(8, 8, 1, |x, y, _| (y * 8 + x + 1) as u8);
    Page::strips(8, 8, 8, 1, 4, split_strips(&image, 8, 4))
}

/// A 256 entry 16-bit color map: red = i, green = 255 - i, blue = 128
pub fn ramp_color_map() -> Vec<u16> {
    let mut map = Vec::with_capacity(768);
    map.extend((0..256u16).map(|i| i << 8));
    map.extend((0..256u16).map(|i| (255 - i) << 8));
    map.extend((0..256u16).map(|_| 0x8000));
    map
}

pub fn open(pages: &[Page]) -> TiffTileSource {
    open_with(pages, EngineOptions::default())
}

pub fn open_with(pages: &[Page], options: EngineOptions) -> TiffTileSource {
    RasterTile::open_bytes("fixture.tif", build_tiff(pages, false), options).unwrap()
}
