//! Tone library: periodic binary bitmaps used as halftone dots and lines.
//!
//! Every tone shares the same period [`PERIOD`], so pattern tiles and search
//! windows all have the same shape. A set bit means "foreground".

use std::fmt;

use crate::api::FilterError;

/// Side length of every tone bitmap, tile and search window.
pub const PERIOD: usize = 8;

/// Number of pixels in one tile or window.
pub const TILE_AREA: usize = PERIOD * PERIOD;

/// Index of a tone within its [`ToneLibrary`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ToneId(usize);

impl ToneId {
    /// Position of the tone in its library.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ToneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tone#{}", self.0)
    }
}

/// A periodic square bitmap.
///
/// Row `y` is stored as a bit mask where the most significant bit is
/// column 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tone {
    name: String,
    rows: [u8; PERIOD],
}

impl Tone {
    /// Create a tone from row bit masks (MSB = leftmost column).
    pub fn new(name: impl Into<String>, rows: [u8; PERIOD]) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    /// Parse a tone from text rows, `#` for foreground and `.` for background.
    ///
    /// # Errors
    ///
    /// [`FilterError::InvalidTone`] unless there are exactly [`PERIOD`] rows
    /// of [`PERIOD`] characters drawn from `#` and `.`.
    ///
    /// ```
    /// use mibae_filter::Tone;
    ///
    /// let rows = ["#.......", "........", "....#...", "........",
    ///             "#.......", "........", "....#...", "........"];
    /// let tone = Tone::parse("sparse", &rows).unwrap();
    /// assert!(tone.is_foreground(0, 0));
    /// assert!(tone.is_foreground(4, 2));
    /// assert!(!tone.is_foreground(1, 0));
    /// ```
    pub fn parse<S: AsRef<str>>(name: &str, rows: &[S]) -> Result<Self, FilterError> {
        let invalid = |reason: String| FilterError::InvalidTone {
            name: name.to_string(),
            reason,
        };

        if rows.len() != PERIOD {
            return Err(invalid(format!(
                "expected {PERIOD} rows, got {}",
                rows.len()
            )));
        }

        let mut masks = [0u8; PERIOD];
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.chars().count() != PERIOD {
                return Err(invalid(format!("row {y} must have {PERIOD} cells")));
            }
            for (x, cell) in row.chars().enumerate() {
                match cell {
                    '#' => masks[y] |= 0x80 >> x,
                    '.' => {}
                    other => return Err(invalid(format!("unexpected '{other}' in row {y}"))),
                }
            }
        }

        Ok(Self::new(name, masks))
    }

    /// Tone name as used in configuration.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether pixel `(x, y)` of the infinite periodic tiling is foreground.
    #[inline]
    pub fn is_foreground(&self, x: usize, y: usize) -> bool {
        let row = self.rows[y % PERIOD];
        (row >> (PERIOD - 1 - x % PERIOD)) & 1 == 1
    }

    /// Fraction of foreground cells in one period (0.0..=1.0).
    pub fn coverage(&self) -> f32 {
        let set: u32 = self.rows.iter().map(|r| r.count_ones()).sum();
        set as f32 / TILE_AREA as f32
    }

    /// Render one period as text, `#` for foreground.
    pub fn to_rows(&self) -> Vec<String> {
        (0..PERIOD)
            .map(|y| {
                (0..PERIOD)
                    .map(|x| if self.is_foreground(x, y) { '#' } else { '.' })
                    .collect()
            })
            .collect()
    }
}

/// The ordered, immutable set of tones a filter may draw from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToneLibrary {
    tones: Vec<Tone>,
}

impl ToneLibrary {
    /// The built-in dot and line screens, lightest first.
    pub fn builtin() -> Self {
        Self {
            tones: vec![
                Tone::new("blank", [0x00; PERIOD]),
                Tone::new("dot12", [0x88, 0x00, 0x22, 0x00, 0x88, 0x00, 0x22, 0x00]),
                Tone::new("dot25", [0xAA, 0x00, 0xAA, 0x00, 0xAA, 0x00, 0xAA, 0x00]),
                Tone::new("diagonal", [0x88, 0x44, 0x22, 0x11, 0x88, 0x44, 0x22, 0x11]),
                Tone::new("antidiagonal", [0x11, 0x22, 0x44, 0x88, 0x11, 0x22, 0x44, 0x88]),
                Tone::new("hline", [0xFF, 0x00, 0xFF, 0x00, 0xFF, 0x00, 0xFF, 0x00]),
                Tone::new("vline", [0xAA; PERIOD]),
                Tone::new("checker", [0xAA, 0x55, 0xAA, 0x55, 0xAA, 0x55, 0xAA, 0x55]),
                Tone::new("dot75", [0x55, 0xFF, 0x55, 0xFF, 0x55, 0xFF, 0x55, 0xFF]),
                Tone::new("dot88", [0x77, 0xFF, 0xDD, 0xFF, 0x77, 0xFF, 0xDD, 0xFF]),
                Tone::new("solid", [0xFF; PERIOD]),
            ],
        }
    }

    /// Append a tone, replacing any existing tone with the same name in place.
    pub fn with_tone(mut self, tone: Tone) -> Self {
        match self.tones.iter().position(|t| t.name == tone.name) {
            Some(existing) => self.tones[existing] = tone,
            None => self.tones.push(tone),
        }
        self
    }

    /// Look up a tone by id.
    ///
    /// # Errors
    ///
    /// [`FilterError::UnknownTone`] if the id does not belong to this library.
    #[inline]
    pub fn get(&self, id: ToneId) -> Result<&Tone, FilterError> {
        self.tones
            .get(id.0)
            .ok_or_else(|| FilterError::UnknownTone(id.to_string()))
    }

    /// Resolve a tone name.
    ///
    /// # Errors
    ///
    /// [`FilterError::UnknownTone`] if no tone has that name.
    pub fn find(&self, name: &str) -> Result<ToneId, FilterError> {
        self.tones
            .iter()
            .position(|t| t.name == name)
            .map(ToneId)
            .ok_or_else(|| FilterError::UnknownTone(name.to_string()))
    }

    /// Resolve a list of names into ids, keeping their order.
    ///
    /// # Errors
    ///
    /// Fails on the first unknown name.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<ToneId>, FilterError> {
        names.iter().map(|n| self.find(n.as_ref())).collect()
    }

    /// All tone ids in library order.
    pub fn ids(&self) -> impl Iterator<Item = ToneId> {
        (0..self.tones.len()).map(ToneId)
    }

    /// Name of a tone, or `"?"` for a foreign id.
    pub fn name(&self, id: ToneId) -> &str {
        self.tones.get(id.0).map_or("?", |t| t.name.as_str())
    }

    /// Number of tones.
    #[inline]
    pub fn len(&self) -> usize {
        self.tones.len()
    }

    /// Whether the library has no tones.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tones.is_empty()
    }
}

impl Default for ToneLibrary {
    fn default() -> Self {
        Self::builtin()
    }
}
