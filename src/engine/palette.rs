//! Color map lookup tables

/// A page's color map as 8-bit RGB entries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    entries: Vec<[u8; 3]>,
}

impl Palette {
    /// Builds the table from a ColorMap tag (all reds, then greens, then blues)
    ///
    /// Entries are scaled from the 16-bit tag range. Maps whose values
    /// all fit in a byte were written as 8-bit by their producer and are
    /// taken as is.
    pub fn from_color_map(color_map: &[u16]) -> Option<Palette> {
        let n = color_map.len() / 3;
        if n == 0 {
            return None;
        }

        let (red, rest) = color_map.split_at(n);
        let (green, blue) = rest.split_at(n);
        let eight_bit = color_map.iter().all(|&v| v < 256);
        let scale = |v: u16| if eight_bit { v as u8 } else { (v >> 8) as u8 };

        let entries = (0..n)
            .map(|i| [scale(red[i]), scale(green[i]), scale(blue[i])])
            .collect();

        Some(Palette { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// RGB for a sample index; out of range indexes are black
    pub fn rgb(&self, index: usize) -> [u8; 3] {
        self.entries.get(index).copied().unwrap_or([0, 0, 0])
    }

    pub fn entries(&self) -> &[[u8; 3]] {
        &self.entries
    }
}

/// 8-bit lookup table of a 16-bit color map, `v / 65535 * 255` truncated
pub fn color_map_lut(color_map: &[u16]) -> Vec<[u8; 3]> {
    let n = color_map.len() / 3;
    let scale = |v: u16| ((v as f64 / 65535.0) * 255.0) as u8;

    (0..n)
        .map(|i| [scale(color_map[i]), scale(color_map[n + i]), scale(color_map[2 * n + i])])
        .collect()
}
