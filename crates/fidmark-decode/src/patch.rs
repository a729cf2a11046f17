//! Fixed-size binary patch produced by marker rectification.

use fidmark_core::GrayImage;

/// A square binary grid, row-major, `true` = dark cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BitPatch {
    size: usize,
    cells: Vec<bool>,
}

impl BitPatch {
    /// Build a patch from explicit cells. `None` unless `cells` is a square
    /// grid of `size * size` entries with `size >= 3` (a border ring plus at
    /// least one interior cell).
    pub fn new(size: usize, cells: Vec<bool>) -> Option<Self> {
        if size < 3 || cells.len() != size * size {
            return None;
        }
        Some(Self { size, cells })
    }

    /// Binarize a small rectified grayscale grid with a fixed threshold.
    ///
    /// Intensities `<= threshold` count as dark, matching the binarization
    /// applied to the full frame before contour extraction.
    pub fn from_gray(img: &GrayImage, threshold: u8) -> Option<Self> {
        if img.width != img.height {
            return None;
        }
        let cells = img.data.iter().map(|&v| v <= threshold).collect();
        Self::new(img.width, cells)
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn is_dark(&self, x: usize, y: usize) -> bool {
        self.cells[y * self.size + x]
    }

    /// True when every cell of the outer ring is dark.
    ///
    /// This is the hard false-positive gate: a single light border cell means
    /// the quad was not a marker (or the rectification missed it).
    pub fn has_solid_border(&self) -> bool {
        let n = self.size;
        for i in 0..n {
            if !self.is_dark(i, 0)
                || !self.is_dark(i, n - 1)
                || !self.is_dark(0, i)
                || !self.is_dark(n - 1, i)
            {
                return false;
            }
        }
        true
    }

    /// Pack the interior cells (border ring excluded) into a row-major code,
    /// dark = 1. At the default 6x6 grid this is a 16-bit value.
    pub fn inner_code(&self) -> u64 {
        let n = self.size;
        let bits = n - 2;
        let mut code = 0u64;
        for y in 0..bits {
            for x in 0..bits {
                if self.is_dark(x + 1, y + 1) {
                    code |= 1u64 << (y * bits + x);
                }
            }
        }
        code
    }

    /// Number of interior bits per side.
    #[inline]
    pub fn inner_size(&self) -> usize {
        self.size - 2
    }
}
