//! Display lookup tables.
//!
//! A [`ColorModel`] maps stored sample values to display colors. Images share
//! it through `Arc`, so a conversion can carry it over to the new pixel
//! representation without copying or modifying it.

use alloc::vec::Vec;
use rgb::Rgb;

/// Number of entries in a lookup table.
pub const LUT_SIZE: usize = 256;

/// 256-entry RGB lookup table.
///
/// Samples of more than 8 bits are scaled into the table through the
/// image's display range by the host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColorModel {
    entries: Vec<Rgb<u8>>,
    inverted: bool,
}

impl ColorModel {
    /// Linear black-to-white ramp.
    pub fn grayscale() -> Self {
        let entries = (0..LUT_SIZE)
            .map(|i| {
                let v = i as u8;
                Rgb { r: v, g: v, b: v }
            })
            .collect();
        Self {
            entries,
            inverted: false,
        }
    }

    /// Build a table from explicit entries.
    ///
    /// Returns `None` unless exactly [`LUT_SIZE`] entries are given.
    pub fn from_entries(entries: Vec<Rgb<u8>>) -> Option<Self> {
        (entries.len() == LUT_SIZE).then_some(Self {
            entries,
            inverted: false,
        })
    }

    /// The same table read back to front.
    pub fn inverted(&self) -> Self {
        let mut entries = self.entries.clone();
        entries.reverse();
        Self {
            entries,
            inverted: !self.inverted,
        }
    }

    /// Whether this table is the reverse of the one it was built from.
    pub fn is_inverted(&self) -> bool {
        self.inverted
    }

    /// Color for a table index.
    pub fn lookup(&self, index: u8) -> Rgb<u8> {
        self.entries[usize::from(index)]
    }

    /// All entries in index order.
    pub fn entries(&self) -> &[Rgb<u8>] {
        &self.entries
    }

    /// Whether every entry has equal red, green and blue.
    pub fn is_grayscale(&self) -> bool {
        self.entries.iter().all(|c| c.r == c.g && c.g == c.b)
    }
}

impl Default for ColorModel {
    fn default() -> Self {
        Self::grayscale()
    }
}
