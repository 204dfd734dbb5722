//! JSON-backed WordNet-style lexicon with path similarity.
//!
//! The file format is a flat list of synsets, each naming its lemmas and its
//! hypernym parents:
//!
//! ```json
//! { "name": "mini-wordnet",
//!   "synsets": [
//!     { "id": "dog.n.01", "pos": "n", "lemmas": ["dog"], "parents": ["canine.n.02"] }
//!   ] }
//! ```
//!
//! Lookup order is file order, which is what the resolver treats as the
//! candidate order for tie-breaking.

use std::collections::{HashMap, VecDeque};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use knoex_shared::{Category, KnoexError, Result, Sense};

use crate::{Ontology, ensure_same_category};

// ---------------------------------------------------------------------------
// File model
// ---------------------------------------------------------------------------

/// WordNet's own part-of-speech codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NativePos {
    #[serde(rename = "n")]
    Noun,
    #[serde(rename = "v")]
    Verb,
    #[serde(rename = "a")]
    Adj,
    #[serde(rename = "s")]
    AdjSatellite,
    #[serde(rename = "r")]
    Adverb,
}

impl NativePos {
    /// The disambiguation category this code belongs to, if any.
    pub fn category(&self) -> Option<Category> {
        match self {
            Self::Noun => Some(Category::Noun),
            Self::Verb => Some(Category::Verb),
            Self::Adj | Self::AdjSatellite => Some(Category::Adjective),
            Self::Adverb => None,
        }
    }
}

/// Native codes searched for a category. Adjective lookups include satellites.
pub fn native_pos(category: Category) -> &'static [NativePos] {
    match category {
        Category::Noun => &[NativePos::Noun],
        Category::Verb => &[NativePos::Verb],
        Category::Adjective => &[NativePos::Adj, NativePos::AdjSatellite],
    }
}

/// Root of a lexicon file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LexiconFile {
    /// Lexicon name, surfaced in exports.
    pub name: String,
    /// Synsets in lookup order.
    pub synsets: Vec<SynsetEntry>,
}

/// One synset entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynsetEntry {
    pub id: String,
    pub pos: NativePos,
    pub lemmas: Vec<String>,
    /// Hypernym synset ids.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parents: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub definition: String,
}

// ---------------------------------------------------------------------------
// Lexicon
// ---------------------------------------------------------------------------

/// In-memory lexicon indexed by id and by `(lemma, pos)`.
#[derive(Debug, Clone)]
pub struct JsonLexicon {
    name: String,
    synsets: Vec<SynsetEntry>,
    /// Parent indices, parallel to `synsets`.
    parents: Vec<Vec<usize>>,
    by_id: HashMap<String, usize>,
    by_lemma: HashMap<(String, NativePos), Vec<usize>>,
}

impl JsonLexicon {
    /// Load a lexicon from a JSON file on disk.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| KnoexError::io(path, e))?;
        let lexicon = Self::from_json_str(&content)?;
        info!(
            name = %lexicon.name,
            synsets = lexicon.synsets.len(),
            "lexicon loaded"
        );
        Ok(lexicon)
    }

    /// Parse a lexicon from JSON text.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let file: LexiconFile = serde_json::from_str(content)
            .map_err(|e| KnoexError::parse(format!("invalid lexicon JSON: {e}")))?;
        Self::from_file(file)
    }

    /// Build the lookup indexes, rejecting duplicate ids and dangling parents.
    pub fn from_file(file: LexiconFile) -> Result<Self> {
        let mut by_id = HashMap::with_capacity(file.synsets.len());
        for (i, entry) in file.synsets.iter().enumerate() {
            if by_id.insert(entry.id.clone(), i).is_some() {
                return Err(KnoexError::Lexicon(format!(
                    "duplicate synset id '{}'",
                    entry.id
                )));
            }
        }

        let mut parents = Vec::with_capacity(file.synsets.len());
        let mut by_lemma: HashMap<(String, NativePos), Vec<usize>> = HashMap::new();

        for (i, entry) in file.synsets.iter().enumerate() {
            let resolved = entry
                .parents
                .iter()
                .map(|p| {
                    by_id.get(p).copied().ok_or_else(|| {
                        KnoexError::Lexicon(format!(
                            "synset '{}' names unknown parent '{p}'",
                            entry.id
                        ))
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            parents.push(resolved);

            for lemma in &entry.lemmas {
                let slot = by_lemma.entry((normalize_lemma(lemma), entry.pos)).or_default();
                if !slot.contains(&i) {
                    slot.push(i);
                }
            }
        }

        Ok(Self {
            name: file.name,
            synsets: file.synsets,
            parents,
            by_id,
            by_lemma,
        })
    }

    /// Number of synsets.
    pub fn len(&self) -> usize {
        self.synsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.synsets.is_empty()
    }

    /// Gloss of a sense, if it has one.
    pub fn definition(&self, sense: &Sense) -> Option<&str> {
        let entry = &self.synsets[*self.by_id.get(&sense.id)?];
        (!entry.definition.is_empty()).then_some(entry.definition.as_str())
    }

    /// Resolve a sense to its synset index, checking the category matches.
    fn index_of(&self, sense: &Sense) -> Result<usize> {
        let idx = *self
            .by_id
            .get(&sense.id)
            .ok_or_else(|| KnoexError::Lexicon(format!("unknown sense '{}'", sense.id)))?;
        if self.synsets[idx].pos.category() != Some(sense.category) {
            return Err(KnoexError::Lexicon(format!(
                "sense '{}' is not a {} synset",
                sense.id, sense.category
            )));
        }
        Ok(idx)
    }

    /// Hop distance from `start` to each of its ancestors (itself at 0).
    fn ancestor_distances(&self, start: usize) -> HashMap<usize, usize> {
        let mut dist = HashMap::from([(start, 0)]);
        let mut queue = VecDeque::from([start]);

        while let Some(node) = queue.pop_front() {
            let d = dist[&node];
            for &parent in &self.parents[node] {
                if !dist.contains_key(&parent) {
                    dist.insert(parent, d + 1);
                    queue.push_back(parent);
                }
            }
        }

        dist
    }

    /// Shortest path between two synsets through a shared ancestor.
    fn shortest_path(&self, a: usize, b: usize) -> Option<usize> {
        let da = self.ancestor_distances(a);
        let db = self.ancestor_distances(b);
        da.iter()
            .filter_map(|(node, x)| db.get(node).map(|y| x + y))
            .min()
    }
}

impl Ontology for JsonLexicon {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookup(&self, lemma: &str, category: Category) -> Vec<Sense> {
        let key = normalize_lemma(lemma);
        let mut indices: Vec<usize> = native_pos(category)
            .iter()
            .filter_map(|pos| self.by_lemma.get(&(key.clone(), *pos)))
            .flatten()
            .copied()
            .collect();
        // Satellites are indexed separately; restore file order.
        indices.sort_unstable();

        debug!(lemma, %category, found = indices.len(), "lexicon lookup");

        indices
            .into_iter()
            .map(|i| Sense::new(self.synsets[i].id.clone(), category))
            .collect()
    }

    /// WordNet path similarity: `1 / (shortest_path + 1)`, or `0.0` when the
    /// two synsets share no ancestor.
    fn similarity(&self, a: &Sense, b: &Sense) -> Result<f64> {
        ensure_same_category(a, b)?;
        let ia = self.index_of(a)?;
        let ib = self.index_of(b)?;

        Ok(match self.shortest_path(ia, ib) {
            Some(d) => 1.0 / (d as f64 + 1.0),
            None => 0.0,
        })
    }
}

/// Lowercase and join multiword lemmas with underscores, WordNet style.
fn normalize_lemma(lemma: &str) -> String {
    lemma
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}
