//! In-process backend: an R-tree for range queries plus a token index.

use hashbrown::HashMap;
use rstar::{RTree, RTreeObject, AABB};
use tracing::info;

use super::{PoiStore, SpatialIndex, TextIndex};
use crate::error::Result;
use crate::models::{BoundingBox, Poi};
use crate::pagination::PageWindow;

/// R-tree entry pointing back at a record by its row number
#[derive(Clone)]
struct IndexedPoi {
    row: usize,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for IndexedPoi {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// Immutable POI collection indexed for spatial and text lookups.
///
/// Row order is insertion order; both indexes return candidates in row
/// order so that paging over them is stable.
pub struct MemoryStore {
    rows: Vec<Poi>,
    tree: RTree<IndexedPoi>,
    tokens: HashMap<String, Vec<usize>>,
    by_id: HashMap<String, usize>,
}

impl MemoryStore {
    /// Build both indexes over `pois`
    pub fn build(pois: Vec<Poi>) -> Self {
        info!("Building in-memory index for {} POIs...", pois.len());

        let indexed: Vec<IndexedPoi> = pois
            .iter()
            .enumerate()
            .map(|(row, poi)| IndexedPoi {
                row,
                envelope: AABB::from_point([poi.longitude, poi.latitude]),
            })
            .collect();

        let mut tokens: HashMap<String, Vec<usize>> = HashMap::new();
        let mut by_id = HashMap::with_capacity(pois.len());

        for (row, poi) in pois.iter().enumerate() {
            for token in searchable_text(poi).flat_map(tokenize) {
                let postings = tokens.entry(token).or_default();
                if postings.last() != Some(&row) {
                    postings.push(row);
                }
            }
            by_id.entry(poi.id.clone()).or_insert(row);
        }

        let tree = RTree::bulk_load(indexed);
        info!(
            "Index built with {} entries and {} distinct tokens",
            tree.size(),
            tokens.len()
        );

        Self {
            rows: pois,
            tree,
            tokens,
            by_id,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn rows_within(&self, bbox: &BoundingBox) -> Vec<usize> {
        let query_envelope =
            AABB::from_corners([bbox.min_lon, bbox.min_lat], [bbox.max_lon, bbox.max_lat]);

        // R-tree containment is inclusive; tighten it to strict afterwards
        let mut rows: Vec<usize> = self
            .tree
            .locate_in_envelope(&query_envelope)
            .filter(|ip| {
                let [min_lon, min_lat] = ip.envelope.lower();
                let [max_lon, max_lat] = ip.envelope.upper();
                bbox.strictly_contains(min_lat, min_lon, max_lat, max_lon)
            })
            .map(|ip| ip.row)
            .collect();
        rows.sort_unstable();
        rows
    }

    /// Rows containing every token of `query`, ascending
    fn rows_matching(&self, query: &str) -> Vec<usize> {
        let mut terms: Vec<String> = tokenize(query).collect();
        terms.sort();
        terms.dedup();

        let mut postings = Vec::with_capacity(terms.len());
        for term in &terms {
            match self.tokens.get(term) {
                Some(rows) => postings.push(rows),
                None => return Vec::new(),
            }
        }

        // Walk the shortest list and probe the others
        postings.sort_by_key(|rows| rows.len());
        let Some((first, rest)) = postings.split_first() else {
            return Vec::new();
        };

        first
            .iter()
            .copied()
            .filter(|row| rest.iter().all(|rows| rows.binary_search(row).is_ok()))
            .collect()
    }

    fn page<'a>(&'a self, rows: impl Iterator<Item = usize> + 'a, window: PageWindow) -> Vec<Poi> {
        let offset = usize::try_from(window.offset).unwrap_or(usize::MAX);
        rows.skip(offset)
            .take(window.limit as usize)
            .map(|row| self.rows[row].clone())
            .collect()
    }
}

impl SpatialIndex for MemoryStore {
    async fn within(&self, bbox: &BoundingBox, window: PageWindow) -> Result<Vec<Poi>> {
        let rows = self.rows_within(bbox);
        Ok(self.page(rows.into_iter(), window))
    }
}

impl TextIndex for MemoryStore {
    async fn matching(
        &self,
        query: &str,
        country: Option<&str>,
        window: PageWindow,
    ) -> Result<Vec<Poi>> {
        let rows = self.rows_matching(query);
        let filtered = rows.into_iter().filter(|row| match country {
            Some(country) => self.rows[*row].in_country(country),
            None => true,
        });
        Ok(self.page(filtered, window))
    }
}

impl PoiStore for MemoryStore {
    async fn get(&self, id: &str) -> Result<Option<Poi>> {
        Ok(self.by_id.get(id).map(|row| self.rows[*row].clone()))
    }
}

/// Fields that feed the text index
fn searchable_text(poi: &Poi) -> impl Iterator<Item = &str> {
    [
        Some(poi.name.as_str()),
        poi.main_category.as_deref(),
        poi.address.as_deref(),
        poi.locality.as_deref(),
        poi.region.as_deref(),
    ]
    .into_iter()
    .flatten()
}

/// Lower-cased alphanumeric runs
pub(crate) fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
}
