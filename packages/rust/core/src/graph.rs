//! Concept graph: an arena of concepts plus a separate relation table.
//!
//! Concepts point at each other in both directions (hypernym one way, hyponym
//! back), so nodes live in a `Vec` addressed by [`ConceptId`] and edges are
//! stored as `(source, label, target)` triples.

use std::collections::HashMap;

use serde::{Serialize, Serializer};

use knoex_shared::{Sense, Term};

// ---------------------------------------------------------------------------
// Ids and nodes
// ---------------------------------------------------------------------------

/// Stable index of a concept within one [`ConceptGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ConceptId(pub usize);

impl std::fmt::Display for ConceptId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "c{}", self.0)
    }
}

/// A node in the output graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Concept {
    /// A resolved word sense and the term it was resolved for.
    Sense { sense: Sense, term: Term },
    /// A multiword phrase node with no sense of its own.
    Name { words: Vec<String>, head: String },
}

impl Concept {
    /// Head token used for relation matching.
    pub fn head(&self) -> &str {
        match self {
            Self::Sense { term, .. } => &term.head,
            Self::Name { head, .. } => head,
        }
    }

    pub fn sense(&self) -> Option<&Sense> {
        match self {
            Self::Sense { sense, .. } => Some(sense),
            Self::Name { .. } => None,
        }
    }

    pub fn is_name(&self) -> bool {
        matches!(self, Self::Name { .. })
    }
}

// ---------------------------------------------------------------------------
// Relations
// ---------------------------------------------------------------------------

/// Edge label: taxonomy direction or a label taken from a Hearst pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RelationLabel {
    Hypernym,
    Hyponym,
    Pattern(String),
}

impl std::fmt::Display for RelationLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hypernym => f.write_str("hypernym"),
            Self::Hyponym => f.write_str("hyponym"),
            Self::Pattern(label) => f.write_str(label),
        }
    }
}

impl Serialize for RelationLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A directed, labeled edge.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Relation {
    pub source: ConceptId,
    pub label: RelationLabel,
    pub target: ConceptId,
}

// ---------------------------------------------------------------------------
// Graph
// ---------------------------------------------------------------------------

/// Concepts, their relations, and the set returned to callers.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConceptGraph {
    concepts: Vec<Concept>,
    relations: Vec<Relation>,
    /// Top-level result set, in insertion order.
    members: Vec<ConceptId>,
    #[serde(skip)]
    sense_index: HashMap<(Sense, Term), ConceptId>,
    #[serde(skip)]
    name_index: HashMap<Vec<String>, ConceptId>,
}

impl ConceptGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a sense-concept, or return the existing one for the same
    /// `(sense, term)`. Sense-concepts are always members of the result.
    pub fn add_sense_concept(&mut self, sense: Sense, term: Term) -> ConceptId {
        let key = (sense, term);
        if let Some(id) = self.sense_index.get(&key) {
            return *id;
        }

        let id = ConceptId(self.concepts.len());
        let (sense, term) = key.clone();
        self.concepts.push(Concept::Sense { sense, term });
        self.sense_index.insert(key, id);
        self.members.push(id);
        id
    }

    /// Insert a name-concept for a multiword term, deduplicated by its words.
    /// Name-concepts are not members unless [`promote`](Self::promote)d.
    pub fn add_name_concept(&mut self, term: &Term) -> ConceptId {
        if let Some(id) = self.name_index.get(&term.words) {
            return *id;
        }

        let id = ConceptId(self.concepts.len());
        self.concepts.push(Concept::Name {
            words: term.words.clone(),
            head: term.head.clone(),
        });
        self.name_index.insert(term.words.clone(), id);
        id
    }

    /// Make a concept a top-level member of the result set.
    pub fn promote(&mut self, id: ConceptId) {
        if !self.members.contains(&id) {
            self.members.push(id);
        }
    }

    /// Add an edge unless the identical edge already exists.
    pub fn relate(&mut self, source: ConceptId, label: RelationLabel, target: ConceptId) {
        let relation = Relation {
            source,
            label,
            target,
        };
        if !self.relations.contains(&relation) {
            self.relations.push(relation);
        }
    }

    /// Link a name-concept under a sense-concept: `name --hypernym--> sense`
    /// and `sense --hyponym--> name`.
    pub fn link_name(&mut self, name: ConceptId, sense: ConceptId) {
        self.relate(name, RelationLabel::Hypernym, sense);
        self.relate(sense, RelationLabel::Hyponym, name);
    }

    pub fn get(&self, id: ConceptId) -> Option<&Concept> {
        self.concepts.get(id.0)
    }

    /// All concepts in the arena, including unlinked name-concepts.
    pub fn concepts(&self) -> impl Iterator<Item = (ConceptId, &Concept)> {
        self.concepts
            .iter()
            .enumerate()
            .map(|(i, c)| (ConceptId(i), c))
    }

    pub fn relations(&self) -> &[Relation] {
        &self.relations
    }

    /// The returned concept set.
    pub fn members(&self) -> &[ConceptId] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.concepts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.concepts.is_empty()
    }

    pub fn outgoing(&self, id: ConceptId) -> impl Iterator<Item = &Relation> {
        self.relations.iter().filter(move |r| r.source == id)
    }

    pub fn incoming(&self, id: ConceptId) -> impl Iterator<Item = &Relation> {
        self.relations.iter().filter(move |r| r.target == id)
    }

    /// Find the sense-concept for a `(sense, term)` pair.
    pub fn find_sense_concept(&self, sense: &Sense, term: &Term) -> Option<ConceptId> {
        self.sense_index
            .get(&(sense.clone(), term.clone()))
            .copied()
    }

    /// Find the name-concept for a multiword surface form.
    pub fn find_name_concept(&self, words: &[String]) -> Option<ConceptId> {
        self.name_index.get(words).copied()
    }

    /// Name-concepts reachable by one edge from a member.
    pub fn reachable_name_concepts(&self) -> Vec<ConceptId> {
        let mut found = Vec::new();
        for member in &self.members {
            for rel in self.outgoing(*member) {
                let is_name = self.get(rel.target).is_some_and(Concept::is_name);
                if is_name && !found.contains(&rel.target) {
                    found.push(rel.target);
                }
            }
        }
        found
    }
}
