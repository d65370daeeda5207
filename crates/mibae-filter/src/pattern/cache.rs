use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use super::{Pattern, PatternTile};
use crate::api::FilterError;
use crate::tone::ToneLibrary;

/// Grow-only cache of rendered tiles, shared between filter runs.
///
/// Tiles are rendered at most once per distinct [`Pattern`] and never
/// evicted. A cache is bound to one [`ToneLibrary`] since tone ids are only
/// meaningful within their library.
#[derive(Debug)]
pub struct PatternCache {
    tones: Arc<ToneLibrary>,
    tiles: RwLock<HashMap<Pattern, Arc<PatternTile>>>,
}

impl PatternCache {
    pub fn new(tones: Arc<ToneLibrary>) -> Self {
        Self {
            tones,
            tiles: RwLock::new(HashMap::new()),
        }
    }

    /// The library this cache renders from.
    #[inline]
    pub fn tones(&self) -> &Arc<ToneLibrary> {
        &self.tones
    }

    /// Return the tile for `pattern`, rendering it on first use.
    ///
    /// A pattern that is already cached yields the very same `Arc`. When two
    /// callers race on a missing pattern, the first insert wins and both get
    /// that tile.
    ///
    /// # Errors
    ///
    /// [`FilterError::UnknownTone`] if the pattern's tone is not in this
    /// cache's library.
    pub fn render_or_fetch(&self, pattern: &Pattern) -> Result<Arc<PatternTile>, FilterError> {
        {
            // Entries are write-once, so a poisoned map is still consistent.
            let tiles = self.tiles.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(tile) = tiles.get(pattern) {
                return Ok(Arc::clone(tile));
            }
        }

        let tone = self.tones.get(pattern.tone())?;
        let rendered = Arc::new(PatternTile::render(tone, pattern));

        let mut tiles = self.tiles.write().unwrap_or_else(PoisonError::into_inner);
        let tile = tiles.entry(*pattern).or_insert(rendered);
        Ok(Arc::clone(tile))
    }

    /// Number of cached tiles.
    pub fn len(&self) -> usize {
        self.tiles
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
