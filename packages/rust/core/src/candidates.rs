//! Candidate-set construction and the easy/hard split.

use tracing::{debug, warn};

use knoex_lexicon::Ontology;
use knoex_shared::{Category, Sense, Term};

/// The ordered candidate senses for one term's head.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateSet {
    pub term: Term,
    /// Senses in ontology order.
    pub senses: Vec<Sense>,
}

impl CandidateSet {
    pub fn len(&self) -> usize {
        self.senses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.senses.is_empty()
    }
}

/// Output of candidate construction for one category group.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidateBuild {
    /// One set per term that had at least one sense.
    pub sets: Vec<CandidateSet>,
    /// Every multiword term seen, whether or not its head resolved.
    pub multiwords: Vec<Term>,
    /// Terms whose head had no sense in this category.
    pub unresolved: Vec<Term>,
}

/// Look up every term's head under `category`.
///
/// A miss is a soft failure: the term is logged and left out of resolution.
pub fn build_candidate_sets(
    terms: &[Term],
    category: Category,
    ontology: &dyn Ontology,
) -> CandidateBuild {
    let mut build = CandidateBuild::default();

    for term in terms {
        if term.is_multiword() {
            build.multiwords.push(term.clone());
        }

        let senses = ontology.lookup(&term.head, category);
        if senses.is_empty() {
            warn!(head = %term.head, %category, "no sense found for term");
            build.unresolved.push(term.clone());
            continue;
        }

        build.sets.push(CandidateSet {
            term: term.clone(),
            senses,
        });
    }

    build
}

/// Candidate sets divided by ambiguity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Split {
    pub easy: Vec<CandidateSet>,
    pub hard: Vec<CandidateSet>,
}

/// Sets with at most `threshold` senses are easy; the rest are hard.
///
/// When nothing qualifies as easy, the smallest set (first on ties) is moved
/// to the easy side so resolution always has an anchor.
pub fn split_easy_hard(sets: Vec<CandidateSet>, threshold: usize) -> Split {
    let (mut easy, mut hard): (Vec<_>, Vec<_>) =
        sets.into_iter().partition(|s| s.len() <= threshold);

    if easy.is_empty() && !hard.is_empty() {
        let mut smallest = 0;
        for (i, set) in hard.iter().enumerate() {
            if set.len() < hard[smallest].len() {
                smallest = i;
            }
        }
        let fallback = hard.remove(smallest);
        debug!(
            head = %fallback.term.head,
            candidates = fallback.len(),
            "no easy term, falling back to least ambiguous"
        );
        easy.push(fallback);
    }

    Split { easy, hard }
}
