//! Palette storage and the decoder that expands a 2-byte-per-cell index array
//! into a [`VoxelGrid`].
//!
//! ## Index layout
//!
//! The index array holds one little-endian `u16` per cell, 4096 cells in
//! total. Cells are ordered with `x` outermost and `z` innermost, so the cell
//! at linear position `p` is `(p / 256, (p / 16) % 16, p % 16)` and its index
//! is `(bytes[2p + 1] << 8) | bytes[2p]`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::grid::{GRID_VOLUME, VoxelGrid};
use crate::value::VoxelValue;

/// Byte length of a complete index array (2 bytes × 4096 cells).
pub const BITS_LEN: usize = GRID_VOLUME * 2;

/// Largest palette a `u16` index can address.
pub const MAX_PALETTE_LEN: usize = u16::MAX as usize + 1;

/// Position of a value inside its [`Palette`].
///
/// Two cells are *identity-equal* when they hold the same slot, even if a
/// palette happens to contain two entries with identical content.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PaletteSlot(pub u16);

impl PaletteSlot {
    /// Returns the slot as a `usize` offset.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Errors raised while decoding a micro-voxel volume.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The block entity carries no palette list.
    #[error("no palette found for bits block")]
    MissingPalette,
    /// The block entity carries no index array.
    #[error("no bits_v2 array found for bits block")]
    MissingBits,
    /// The index array does not hold exactly one `u16` per cell.
    #[error("bits array has {actual} bytes, expected {expected}")]
    BitsLength {
        /// Required byte count.
        expected: usize,
        /// Byte count received.
        actual: usize,
    },
    /// The palette has more entries than a `u16` index can address.
    #[error("palette has {0} entries, at most {max} are addressable", max = MAX_PALETTE_LEN)]
    PaletteTooLarge(usize),
    /// A cell references a slot past the end of the palette.
    #[error("cell {cell} references palette index {index}, palette has {palette_len} entries")]
    IndexOutOfRange {
        /// Linear cell position (0..4096).
        cell: usize,
        /// Decoded palette index.
        index: u16,
        /// Number of palette entries.
        palette_len: usize,
    },
}

/// Ordered list of values referenced by [`PaletteSlot`].
///
/// Entries are kept exactly as supplied; duplicates are not collapsed so that
/// slot identity matches the source data.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Palette {
    entries: Vec<VoxelValue>,
}

impl Palette {
    /// Creates a palette from entries in slot order.
    pub fn new(entries: Vec<VoxelValue>) -> Self {
        Self { entries }
    }

    /// Returns the value stored at `slot`, if any.
    pub fn get(&self, slot: PaletteSlot) -> Option<&VoxelValue> {
        self.entries.get(slot.index())
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the palette has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the values in slot order.
    pub fn entries(&self) -> &[VoxelValue] {
        &self.entries
    }
}

impl FromIterator<VoxelValue> for Palette {
    fn from_iter<I: IntoIterator<Item = VoxelValue>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Decodes a palette and its index array into a fully populated grid.
///
/// # Errors
///
/// Returns [`DecodeError::MissingPalette`] or [`DecodeError::MissingBits`] when
/// an input is absent, [`DecodeError::PaletteTooLarge`] for palettes beyond
/// [`MAX_PALETTE_LEN`] entries, [`DecodeError::BitsLength`] when `bits` is not
/// exactly [`BITS_LEN`] bytes, and [`DecodeError::IndexOutOfRange`] for the first cell
/// whose index falls outside the palette.
pub fn decode_grid(palette: Option<Palette>, bits: Option<&[u8]>) -> Result<VoxelGrid, DecodeError> {
    let palette = palette.ok_or(DecodeError::MissingPalette)?;
    let bits = bits.ok_or(DecodeError::MissingBits)?;
    if palette.len() > MAX_PALETTE_LEN {
        return Err(DecodeError::PaletteTooLarge(palette.len()));
    }
    if bits.len() != BITS_LEN {
        return Err(DecodeError::BitsLength {
            expected: BITS_LEN,
            actual: bits.len(),
        });
    }

    let palette_len = palette.len();
    let mut cells = Vec::with_capacity(GRID_VOLUME);
    for (cell, pair) in bits.chunks_exact(2).enumerate() {
        let index = u16::from_le_bytes([pair[0], pair[1]]);
        if index as usize >= palette_len {
            return Err(DecodeError::IndexOutOfRange {
                cell,
                index,
                palette_len,
            });
        }
        cells.push(PaletteSlot(index));
    }

    tracing::trace!(palette_len, "decoded micro-voxel grid");
    Ok(VoxelGrid::from_raw_parts(palette, cells.into_boxed_slice()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GRID_SIZE;

    fn stone_dirt() -> Palette {
        Palette::new(vec![
            VoxelValue::air(),
            VoxelValue::new("minecraft:stone"),
            VoxelValue::new("minecraft:dirt"),
        ])
    }

    #[test]
    fn test_missing_palette_fails() {
        let bits = vec![0u8; BITS_LEN];
        assert_eq!(
            decode_grid(None, Some(&bits)).unwrap_err(),
            DecodeError::MissingPalette
        );
    }

    #[test]
    fn test_missing_bits_fails() {
        assert_eq!(
            decode_grid(Some(stone_dirt()), None).unwrap_err(),
            DecodeError::MissingBits
        );
    }

    #[test]
    fn test_short_bits_fails() {
        let bits = vec![0u8; BITS_LEN - 2];
        assert_eq!(
            decode_grid(Some(stone_dirt()), Some(&bits)).unwrap_err(),
            DecodeError::BitsLength {
                expected: BITS_LEN,
                actual: BITS_LEN - 2
            }
        );
    }

    #[test]
    fn test_out_of_range_index_reports_cell() {
        let mut bits = vec![0u8; BITS_LEN];
        // Cell 5 references slot 3 in a 3-entry palette.
        bits[10] = 3;
        assert_eq!(
            decode_grid(Some(stone_dirt()), Some(&bits)).unwrap_err(),
            DecodeError::IndexOutOfRange {
                cell: 5,
                index: 3,
                palette_len: 3
            }
        );
    }

    #[test]
    fn test_high_byte_is_significant() {
        let mut bits = vec![0u8; BITS_LEN];
        bits[1] = 1; // index 256 at cell 0
        let err = decode_grid(Some(stone_dirt()), Some(&bits)).unwrap_err();
        assert!(matches!(err, DecodeError::IndexOutOfRange { index: 256, .. }));
    }

    #[test]
    fn test_empty_palette_rejects_every_index() {
        let bits = vec![0u8; BITS_LEN];
        assert!(matches!(
            decode_grid(Some(Palette::default()), Some(&bits)),
            Err(DecodeError::IndexOutOfRange { cell: 0, .. })
        ));
    }

    #[test]
    fn test_oversized_palette_fails() {
        let palette: Palette = (0..=MAX_PALETTE_LEN)
            .map(|i| VoxelValue::new(format!("mod:block_{i}")))
            .collect();
        let bits = vec![0u8; BITS_LEN];
        assert_eq!(
            decode_grid(Some(palette), Some(&bits)).unwrap_err(),
            DecodeError::PaletteTooLarge(MAX_PALETTE_LEN + 1)
        );
    }

    #[test]
    fn test_full_u16_palette_decodes() {
        let palette: Palette = (0..MAX_PALETTE_LEN)
            .map(|i| VoxelValue::new(format!("mod:block_{i}")))
            .collect();
        let mut bits = vec![0u8; BITS_LEN];
        bits[0] = 0xFF;
        bits[1] = 0xFF;
        let grid = decode_grid(Some(palette), Some(&bits)).unwrap();
        assert_eq!(grid.slot(0, 0, 0), PaletteSlot(u16::MAX));
        assert_eq!(grid.get(0, 0, 0).id, "mod:block_65535");
    }

    #[test]
    fn test_linear_order_is_x_then_y_then_z() {
        let mut bits = vec![0u8; BITS_LEN];
        // (x=1, y=2, z=3) → p = 1*256 + 2*16 + 3
        let p = 256 + 2 * GRID_SIZE + 3;
        bits[2 * p] = 2;
        let grid = decode_grid(Some(stone_dirt()), Some(&bits)).unwrap();
        assert_eq!(grid.slot(1, 2, 3), PaletteSlot(2));
        assert_eq!(grid.get(1, 2, 3).id, "minecraft:dirt");
        assert_eq!(grid.slot(3, 2, 1), PaletteSlot(0));
    }

    #[test]
    fn test_duplicate_entries_keep_distinct_slots() {
        let palette = Palette::new(vec![
            VoxelValue::new("minecraft:stone"),
            VoxelValue::new("minecraft:stone"),
        ]);
        let mut bits = vec![0u8; BITS_LEN];
        bits[2] = 1;
        let grid = decode_grid(Some(palette), Some(&bits)).unwrap();
        assert_ne!(grid.slot(0, 0, 0), grid.slot(0, 0, 1));
        assert_eq!(grid.get(0, 0, 0), grid.get(0, 0, 1));
    }
}
