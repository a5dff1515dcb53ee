//! Resolution levels and masks
//!
//! Classifies the directories of a container into the pages usable as
//! resolution levels and the pages holding masks, and maps resolution
//! levels back to directories, including when the container is chained
//! as the overview of another source.

use log::warn;

use crate::tiff::directory::DirectoryState;
use crate::tiff::errors::{TiffError, TiffResult};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageIndex {
    /// Directory index of each resolution level, level 0 first
    pub levels: Vec<usize>,
    /// Directories holding transparency or bit masks
    pub masks: Vec<usize>,
    /// Whether level 0 is a full resolution image rather than a reduced one
    pub r0_is_full_res: bool,
}

impl PageIndex {
    /// Builds the index from every directory of a container
    ///
    /// Directories without usable dimensions are skipped. The first
    /// remaining directory is always level 0.
    pub fn build(pages: &[DirectoryState]) -> TiffResult<PageIndex> {
        if pages.is_empty() {
            return Err(TiffError::NoDirectories);
        }

        let mut index = PageIndex::default();

        for (i, page) in pages.iter().enumerate() {
            if !page.has_dimensions() {
                warn!("Directory {} has no usable dimensions ({}x{}), skipping", i, page.width, page.length);
                continue;
            }

            if index.levels.is_empty() {
                index.levels.push(i);
                index.r0_is_full_res = !page.is_reduced();
                continue;
            }

            if page.is_reduced() {
                // A full resolution page plus a reduced page that is not
                // half its size is an embedded thumbnail, not an overview.
                let accept = !(pages.len() == 2 && i == 1) || is_power_of_two_decimation(pages, i);
                if accept {
                    index.levels.push(i);
                }
            } else if page.is_mask() {
                index.masks.push(i);
            } else {
                warn!("Unhandled sub file type {} for directory {}", page.subfile_type, i);
            }
        }

        if index.levels.is_empty() {
            return Err(TiffError::MissingDimensions);
        }

        Ok(index)
    }

    /// Levels this container contributes
    ///
    /// When serving as an overview of a source that already has r0, our
    /// own full resolution page is not counted.
    pub fn number_of_levels(&self, starting_res_level: u32) -> u32 {
        let count = self.levels.len() as u32;
        if starting_res_level > 0 && self.r0_is_full_res {
            count.saturating_sub(1)
        } else {
            count
        }
    }

    pub fn is_valid_level(&self, level: u32, starting_res_level: u32) -> bool {
        let count = self.levels.len() as u32;
        if starting_res_level == 0 || self.r0_is_full_res {
            level < count
        } else {
            level >= starting_res_level && level - starting_res_level < count
        }
    }

    /// Translates a caller level into an index into `levels`
    ///
    /// The starting offset is only subtracted when the container is used
    /// as an overview and has no full resolution page of its own.
    pub fn adjust_level(&self, level: u32, starting_res_level: u32) -> u32 {
        if starting_res_level > 0 && !self.r0_is_full_res && level >= starting_res_level {
            level - starting_res_level
        } else {
            level
        }
    }

    /// Directory serving `level`, if the level is valid
    pub fn directory_for_level(&self, level: u32, starting_res_level: u32) -> Option<usize> {
        if !self.is_valid_level(level, starting_res_level) {
            return None;
        }
        self.levels.get(self.adjust_level(level, starting_res_level) as usize).copied()
    }

    /// Resolution level of a directory, if it is one
    pub fn level_of_directory(&self, directory: usize) -> Option<usize> {
        self.levels.iter().position(|&d| d == directory)
    }
}

/// Whether page `idx` is half the size of page `idx - 1`
///
/// Each dimension may be rounded either way, so a 101 pixel wide page
/// accepts a 50 or 51 pixel wide reduction.
pub fn is_power_of_two_decimation(pages: &[DirectoryState], idx: usize) -> bool {
    if idx == 0 || idx >= pages.len() {
        return false;
    }

    let prev = &pages[idx - 1];
    let cur = &pages[idx];

    let halves = |prev: u32, cur: u32| prev / 2 == cur || (prev + 1) / 2 == cur;
    halves(prev.width, cur.width) && halves(prev.length, cur.length)
}
