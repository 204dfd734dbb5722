//! Ontology adapter trait and the built-in WordNet-style lexicon.
//!
//! The disambiguation core only ever talks to an [`Ontology`]: it asks for the
//! candidate senses of a head token and for pairwise similarity between two
//! senses of the same category. [`JsonLexicon`] is the adapter shipped with
//! knoex; other ontologies plug in by implementing the trait.

mod wordnet;

use knoex_shared::{Category, KnoexError, Result, Sense};

pub use wordnet::{JsonLexicon, LexiconFile, NativePos, SynsetEntry, native_pos};

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Read-only access to a lexical ontology.
pub trait Ontology: Send + Sync {
    /// Human-readable ontology name for tracing and export.
    fn name(&self) -> &str;

    /// Candidate senses for `lemma` under `category`, in ontology order.
    /// An empty result means the lemma is unknown in that category.
    fn lookup(&self, lemma: &str, category: Category) -> Vec<Sense>;

    /// Similarity between two senses of the same category.
    ///
    /// Implementations must return [`KnoexError::CrossCategory`] when the
    /// categories differ instead of producing a score.
    fn similarity(&self, a: &Sense, b: &Sense) -> Result<f64>;
}

impl<T: Ontology + ?Sized> Ontology for &T {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn lookup(&self, lemma: &str, category: Category) -> Vec<Sense> {
        (**self).lookup(lemma, category)
    }

    fn similarity(&self, a: &Sense, b: &Sense) -> Result<f64> {
        (**self).similarity(a, b)
    }
}

/// Fail with [`KnoexError::CrossCategory`] unless both senses share a category.
pub fn ensure_same_category(a: &Sense, b: &Sense) -> Result<()> {
    if a.category == b.category {
        Ok(())
    } else {
        Err(KnoexError::CrossCategory {
            left: a.clone(),
            right: b.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_category_passes() {
        let a = Sense::new("dog.n.01", Category::Noun);
        let b = Sense::new("animal.n.01", Category::Noun);
        assert!(ensure_same_category(&a, &b).is_ok());
    }

    #[test]
    fn mixed_categories_fail_fast() {
        let a = Sense::new("dog.n.01", Category::Noun);
        let b = Sense::new("run.v.01", Category::Verb);
        let err = ensure_same_category(&a, &b).unwrap_err();
        assert!(matches!(err, KnoexError::CrossCategory { .. }));
    }
}
