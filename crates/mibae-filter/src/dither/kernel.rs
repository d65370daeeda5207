//! Error diffusion kernel definitions.
//!
//! Each kernel lists the not-yet-visited neighbors that receive a share of a
//! cell's error under a row-major, left-to-right scan.

/// An error diffusion kernel.
///
/// Each neighbor at `(dx, dy)` receives `error * weight / divisor`. Most
/// kernels hand on all of the error; Atkinson hands on 6/8 of it.
#[derive(Debug, Clone, Copy)]
pub struct Kernel {
    /// (dx, dy, weight) entries, `dy >= 0` and `dx > 0` when `dy == 0`.
    pub entries: &'static [(i32, i32, u8)],

    /// Total divisor for normalizing weights.
    pub divisor: u8,
}

impl Kernel {
    /// Fraction of the error distributed in total.
    pub fn propagation(&self) -> f32 {
        let sum: u32 = self.entries.iter().map(|&(_, _, w)| w as u32).sum();
        sum as f32 / self.divisor as f32
    }

    /// Per-entry factors `weight / divisor * intensity`.
    pub fn scaled(&self, intensity: f32) -> impl Iterator<Item = (i32, i32, f32)> + '_ {
        let divisor = self.divisor as f32;
        self.entries
            .iter()
            .map(move |&(dx, dy, w)| (dx, dy, w as f32 / divisor * intensity))
    }
}

/// Floyd-Steinberg dithering kernel.
///
/// ```text
///        X   7
///    3   5   1
/// ```
pub const FLOYD_STEINBERG: Kernel = Kernel {
    entries: &[
        (1, 0, 7),  // right
        (-1, 1, 3), // bottom-left
        (0, 1, 5),  // bottom
        (1, 1, 1),  // bottom-right
    ],
    divisor: 16,
};

/// Atkinson dithering kernel, 75% propagation.
///
/// ```text
///        X   1   1
///    1   1   1
///        1
/// ```
pub const ATKINSON: Kernel = Kernel {
    entries: &[
        (1, 0, 1),
        (2, 0, 1),
        (-1, 1, 1),
        (0, 1, 1),
        (1, 1, 1),
        (0, 2, 1),
    ],
    divisor: 8,
};

/// Sierra Lite dithering kernel.
///
/// ```text
///    X   2
///    1   1
/// ```
pub const SIERRA_LITE: Kernel = Kernel {
    entries: &[(1, 0, 2), (-1, 1, 1), (0, 1, 1)],
    divisor: 4,
};
