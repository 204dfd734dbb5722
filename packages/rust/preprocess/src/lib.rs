//! Phrase preprocessing: turn raw phrase text into a tagged [`Term`].
//!
//! Hearst-pattern triples arrive as plain text. Before their phrases can be
//! disambiguated they need a head token and a category, which is what a
//! [`PhraseTagger`] provides. [`LexiconTagger`] is a lightweight tagger that
//! asks the ontology which category the head belongs to.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, instrument};

use knoex_lexicon::Ontology;
use knoex_shared::{Category, KnoexError, Result, Term};

/// Tag written on heads the ontology does not know in any category.
pub const UNKNOWN_TAG: &str = "X";

/// Word tokens: letters/digits with inner apostrophes or hyphens.
static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\p{L}\p{N}]+(?:['\-][\p{L}\p{N}]+)*").expect("token regex")
});

/// Determiners and quantifiers stripped from the front of a phrase.
const LEADING_STOPWORDS: &[&str] = &[
    "a", "an", "the", "some", "any", "other", "such", "many", "several", "all", "each", "every",
    "these", "those", "this", "that",
];

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Produces a [`Term`] with head token and category resolved.
pub trait PhraseTagger {
    fn tag_phrase(&self, text: &str) -> Result<Term>;
}

// ---------------------------------------------------------------------------
// Lexicon-backed tagger
// ---------------------------------------------------------------------------

/// Head-final tagger that probes the ontology for the head's category.
///
/// The head is the last token. Its category is the first of NOUN, VERB,
/// ADJECTIVE under which the ontology knows it; a head unknown everywhere is
/// tagged [`UNKNOWN_TAG`].
pub struct LexiconTagger<'a> {
    ontology: &'a dyn Ontology,
}

impl<'a> LexiconTagger<'a> {
    pub fn new(ontology: &'a dyn Ontology) -> Self {
        Self { ontology }
    }
}

impl PhraseTagger for LexiconTagger<'_> {
    #[instrument(skip(self))]
    fn tag_phrase(&self, text: &str) -> Result<Term> {
        let words = content_tokens(text);
        let head = words
            .last()
            .cloned()
            .ok_or_else(|| KnoexError::validation(format!("phrase '{text}' has no words")))?;

        let tag = Category::ALL
            .into_iter()
            .find(|c| !self.ontology.lookup(&head, *c).is_empty())
            .map(|c| c.tag())
            .unwrap_or(UNKNOWN_TAG);

        debug!(%head, tag, words = words.len(), "phrase tagged");
        Ok(Term::new(words, head, tag))
    }
}

/// Lowercased word tokens with leading determiners removed.
///
/// A phrase made only of stopwords keeps its last token so it still has a head.
pub fn content_tokens(text: &str) -> Vec<String> {
    let tokens: Vec<String> = TOKEN_RE
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .collect();

    let skip = tokens
        .iter()
        .take_while(|t| LEADING_STOPWORDS.contains(&t.as_str()))
        .count()
        .min(tokens.len().saturating_sub(1));

    tokens.into_iter().skip(skip).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use knoex_lexicon::JsonLexicon;
    use std::path::Path;

    fn mini() -> JsonLexicon {
        JsonLexicon::load(Path::new("../../../fixtures/lexicon/mini.lexicon.json"))
            .expect("load fixture lexicon")
    }

    #[test]
    fn tokens_are_lowercased_and_determiners_dropped() {
        assert_eq!(content_tokens("The Dog"), vec!["dog"]);
        assert_eq!(
            content_tokens("such machine learning!"),
            vec!["machine", "learning"]
        );
        assert_eq!(content_tokens("rock-and-roll music"), vec!["rock-and-roll", "music"]);
    }

    #[test]
    fn all_stopword_phrase_keeps_a_head() {
        assert_eq!(content_tokens("the other"), vec!["other"]);
        assert!(content_tokens("  ...  ").is_empty());
    }

    #[test]
    fn simple_noun_phrase() {
        let lex = mini();
        let tagger = LexiconTagger::new(&lex);
        let term = tagger.tag_phrase("a dog").unwrap();
        assert_eq!(term, Term::simple("dog", "N"));
    }

    #[test]
    fn multiword_phrase_is_head_final() {
        let lex = mini();
        let tagger = LexiconTagger::new(&lex);
        let term = tagger.tag_phrase("Machine Learning").unwrap();
        assert!(term.is_multiword());
        assert_eq!(term.head, "learning");
        assert_eq!(term.category(), Some(Category::Noun));
    }

    #[test]
    fn category_probe_order() {
        let lex = mini();
        let tagger = LexiconTagger::new(&lex);
        assert_eq!(tagger.tag_phrase("walk").unwrap().tag, "V");
        // `fast` is an adjective and an adverb; adjectives win over unknown.
        assert_eq!(tagger.tag_phrase("fast").unwrap().tag, "ADJ");
    }

    #[test]
    fn unknown_head_gets_unknown_tag() {
        let lex = mini();
        let tagger = LexiconTagger::new(&lex);
        let term = tagger.tag_phrase("unicorns").unwrap();
        assert_eq!(term.tag, UNKNOWN_TAG);
        assert_eq!(term.category(), None);
    }

    #[test]
    fn empty_phrase_is_rejected() {
        let lex = mini();
        let tagger = LexiconTagger::new(&lex);
        assert!(tagger.tag_phrase("   ").is_err());
    }
}
