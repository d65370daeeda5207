//! Color distance strategies and their memoizing wrapper.
//!
//! Pattern search compares every window pixel against every candidate tile,
//! so the same color pairs come up over and over. [`CachedDistance`] remembers
//! each pair's result for the life of the cache.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{PoisonError, RwLock};

use crate::api::FilterError;
use crate::color::{Lab, LinearRgb, Rgb};

/// A symmetric, non-negative color difference.
pub trait ColorDistance: Send + Sync {
    /// Distance between two colors; `0.0` iff they are equal.
    fn distance(&self, a: Rgb, b: Rgb) -> f32;
}

/// CIE ΔE\*76: Euclidean distance in CIE L\*a\*b\* (D65).
#[derive(Debug, Clone, Copy, Default)]
pub struct Perceptual;

impl ColorDistance for Perceptual {
    #[inline]
    fn distance(&self, a: Rgb, b: Rgb) -> f32 {
        if a == b {
            return 0.0;
        }
        let la = Lab::from(LinearRgb::from(a));
        let lb = Lab::from(LinearRgb::from(b));
        la.delta_e(lb)
    }
}

/// Sum of squared 8-bit channel differences.
#[derive(Debug, Clone, Copy, Default)]
pub struct Euclidean;

impl ColorDistance for Euclidean {
    #[inline]
    fn distance(&self, a: Rgb, b: Rgb) -> f32 {
        let dr = a.r as f32 - b.r as f32;
        let dg = a.g as f32 - b.g as f32;
        let db = a.b as f32 - b.b as f32;
        dr * dr + dg * dg + db * db
    }
}

/// Which distance strategy a filter uses.
///
/// # Example
///
/// ```
/// use mibae_filter::DistanceMetric;
///
/// let metric: DistanceMetric = "euclidean".parse().unwrap();
/// assert_eq!(metric, DistanceMetric::Euclidean);
/// assert_eq!(DistanceMetric::default(), DistanceMetric::Perceptual);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DistanceMetric {
    /// CIE Lab ΔE\*76.
    #[default]
    Perceptual,
    /// Squared RGB distance.
    Euclidean,
}

impl DistanceMetric {
    /// Configuration name of the metric.
    pub fn name(self) -> &'static str {
        match self {
            DistanceMetric::Perceptual => "perceptual",
            DistanceMetric::Euclidean => "euclidean",
        }
    }
}

impl ColorDistance for DistanceMetric {
    #[inline]
    fn distance(&self, a: Rgb, b: Rgb) -> f32 {
        match self {
            DistanceMetric::Perceptual => Perceptual.distance(a, b),
            DistanceMetric::Euclidean => Euclidean.distance(a, b),
        }
    }
}

impl FromStr for DistanceMetric {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "perceptual" | "lab" | "cie76" => Ok(DistanceMetric::Perceptual),
            "euclidean" | "rgb" => Ok(DistanceMetric::Euclidean),
            other => Err(FilterError::InvalidOption {
                option: "metric",
                reason: format!("unknown metric '{other}'"),
            }),
        }
    }
}

impl fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Memoizing wrapper around a [`DistanceMetric`].
///
/// Keys are the ordered channel sextet `(a.r, a.g, a.b, b.r, b.g, b.b)`.
/// Entries are never evicted; a cached value always equals the direct
/// computation.
#[derive(Debug, Default)]
pub struct CachedDistance {
    metric: DistanceMetric,
    memo: RwLock<HashMap<[u8; 6], f32>>,
}

impl CachedDistance {
    pub fn new(metric: DistanceMetric) -> Self {
        Self {
            metric,
            memo: RwLock::new(HashMap::new()),
        }
    }

    #[inline]
    pub fn metric(&self) -> DistanceMetric {
        self.metric
    }

    /// Number of memoized pairs.
    pub fn len(&self) -> usize {
        self.memo.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ColorDistance for CachedDistance {
    fn distance(&self, a: Rgb, b: Rgb) -> f32 {
        let key = [a.r, a.g, a.b, b.r, b.g, b.b];
        if let Some(&d) = self
            .memo
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return d;
        }

        let d = self.metric.distance(a, b);
        self.memo
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(key)
            .or_insert(d);
        d
    }
}
