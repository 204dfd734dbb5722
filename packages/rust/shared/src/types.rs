//! Core domain types: grammatical categories, terms, and senses.

use serde::{Deserialize, Serialize};

/// Current schema version for the exported graph document.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// Grammatical category a term is disambiguated under.
///
/// Senses are only ever compared within one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Noun,
    Verb,
    Adjective,
}

impl Category {
    /// All categories, in partitioning order.
    pub const ALL: [Category; 3] = [Category::Noun, Category::Verb, Category::Adjective];

    /// Map a simplified part-of-speech tag (`N`, `V`, `ADJ`) to a category.
    ///
    /// Long forms (`NOUN`, `VERB`, `ADJECTIVE`) are accepted too. Anything
    /// else is out of scope for disambiguation and yields `None`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_uppercase().as_str() {
            "N" | "NOUN" => Some(Self::Noun),
            "V" | "VERB" => Some(Self::Verb),
            "ADJ" | "ADJECTIVE" => Some(Self::Adjective),
            _ => None,
        }
    }

    /// The simplified tag written on terms for this category.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Noun => "N",
            Self::Verb => "V",
            Self::Adjective => "ADJ",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Noun => "NOUN",
            Self::Verb => "VERB",
            Self::Adjective => "ADJECTIVE",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Term
// ---------------------------------------------------------------------------

/// A phrase as written, plus its head token and that token's tag.
///
/// A term with more than one word is a multiword term; only its head is
/// looked up in the ontology.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Term {
    /// Surface tokens in order.
    pub words: Vec<String>,
    /// The distinguished head token.
    pub head: String,
    /// Part-of-speech tag of the head (`N`, `V`, `ADJ`, or anything else).
    pub tag: String,
}

impl Term {
    pub fn new(words: Vec<String>, head: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            words,
            head: head.into(),
            tag: tag.into(),
        }
    }

    /// A single-word term whose head is the word itself.
    pub fn simple(word: impl Into<String>, tag: impl Into<String>) -> Self {
        let word = word.into();
        Self {
            words: vec![word.clone()],
            head: word,
            tag: tag.into(),
        }
    }

    /// Category of the head, if it is one we disambiguate.
    pub fn category(&self) -> Option<Category> {
        Category::from_tag(&self.tag)
    }

    pub fn is_multiword(&self) -> bool {
        self.words.len() > 1
    }

    /// Surface form joined with single spaces.
    pub fn surface(&self) -> String {
        self.words.join(" ")
    }
}

impl std::fmt::Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.surface(), self.tag)
    }
}

// ---------------------------------------------------------------------------
// Sense
// ---------------------------------------------------------------------------

/// An ontology-issued sense identifier, scoped to one category.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Sense {
    /// Opaque identifier (e.g., `bank.n.01`).
    pub id: String,
    /// Category the sense belongs to.
    pub category: Category,
}

impl Sense {
    pub fn new(id: impl Into<String>, category: Category) -> Self {
        Self {
            id: id.into(),
            category,
        }
    }
}

impl std::fmt::Display for Sense {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.id)
    }
}
