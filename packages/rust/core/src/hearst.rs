//! Hearst-pattern pair resolution.
//!
//! Each `(subject, relation, object)` triple is disambiguated on its own by
//! searching every pairing of the two phrases' candidate senses.

use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use knoex_lexicon::Ontology;
use knoex_preprocess::PhraseTagger;
use knoex_shared::{Result, Sense, Term};

use crate::graph::{ConceptGraph, ConceptId, RelationLabel};

/// A relation triple produced by upstream pattern extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Triple {
    pub subject: String,
    pub relation: String,
    pub object: String,
}

impl Triple {
    pub fn new(
        subject: impl Into<String>,
        relation: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            relation: relation.into(),
            object: object.into(),
        }
    }
}

/// Result of resolving a batch of triples.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HearstResolution {
    pub graph: ConceptGraph,
    /// Triples that could not be resolved, with the reason.
    pub skipped: Vec<(Triple, String)>,
}

/// The highest-similarity `(a, b)` pairing. Scans `left` outer, `right`
/// inner; the first pair reaching the maximum wins.
pub fn best_pair<'a>(
    left: &'a [Sense],
    right: &'a [Sense],
    ontology: &dyn Ontology,
) -> Result<Option<(&'a Sense, &'a Sense)>> {
    let mut best: Option<(&Sense, &Sense, f64)> = None;

    for a in left {
        for b in right {
            let sim = ontology.similarity(a, b)?;
            if best.is_none_or(|(_, _, s)| sim > s) {
                best = Some((a, b, sim));
            }
        }
    }

    Ok(best.map(|(a, b, _)| (a, b)))
}

/// Resolve every triple and link the results into one graph.
///
/// Both phrases are looked up under the subject's category. Triples whose
/// phrases cannot be tagged or have no senses are skipped with a diagnostic.
#[instrument(skip_all, fields(triples = triples.len()))]
pub fn resolve_hearst_pairs(
    triples: &[Triple],
    tagger: &dyn PhraseTagger,
    ontology: &dyn Ontology,
    include_name_concepts: bool,
) -> Result<HearstResolution> {
    let mut resolution = HearstResolution::default();

    for triple in triples {
        match resolve_triple(&mut resolution.graph, triple, tagger, ontology, include_name_concepts)? {
            Ok(()) => {}
            Err(reason) => {
                warn!(subject = %triple.subject, object = %triple.object, %reason, "triple skipped");
                resolution.skipped.push((triple.clone(), reason));
            }
        }
    }

    info!(
        concepts = resolution.graph.len(),
        relations = resolution.graph.relations().len(),
        skipped = resolution.skipped.len(),
        "hearst pairs resolved"
    );

    Ok(resolution)
}

/// Outer `Err` aborts the batch; inner `Err` skips this triple.
fn resolve_triple(
    graph: &mut ConceptGraph,
    triple: &Triple,
    tagger: &dyn PhraseTagger,
    ontology: &dyn Ontology,
    include_name_concepts: bool,
) -> Result<std::result::Result<(), String>> {
    let subject = match tagger.tag_phrase(&triple.subject) {
        Ok(term) => term,
        Err(e) => return Ok(Err(format!("subject not tagged: {e}"))),
    };
    let object = match tagger.tag_phrase(&triple.object) {
        Ok(term) => term,
        Err(e) => return Ok(Err(format!("object not tagged: {e}"))),
    };

    let Some(category) = subject.category() else {
        return Ok(Err(format!("subject tag '{}' has no category", subject.tag)));
    };

    if object.category() != Some(category) {
        // Kept for compatibility: the object is still looked up as the subject's category.
        warn!(
            object = %object,
            %category,
            "object category differs from subject, looking up under subject category"
        );
    }

    let left = ontology.lookup(&subject.head, category);
    let right = ontology.lookup(&object.head, category);

    let Some((a, b)) = best_pair(&left, &right, ontology)? else {
        return Ok(Err(format!(
            "no {category} senses for '{}' and '{}'",
            subject.head, object.head
        )));
    };

    let subject_id = add_with_name(graph, a.clone(), subject, include_name_concepts);
    let object_id = add_with_name(graph, b.clone(), object, include_name_concepts);
    graph.relate(
        subject_id,
        RelationLabel::Pattern(triple.relation.clone()),
        object_id,
    );

    Ok(Ok(()))
}

/// Add a sense-concept and, for a multiword term, its linked name-concept.
fn add_with_name(
    graph: &mut ConceptGraph,
    sense: Sense,
    term: Term,
    include_name_concepts: bool,
) -> ConceptId {
    let multiword = term.is_multiword().then(|| term.clone());
    let id = graph.add_sense_concept(sense, term);

    if let Some(term) = multiword {
        let name = graph.add_name_concept(&term);
        graph.link_name(name, id);
        if include_name_concepts {
            graph.promote(name);
        }
    }

    id
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Concept;
    use knoex_lexicon::JsonLexicon;
    use knoex_preprocess::LexiconTagger;
    use knoex_shared::Category;
    use std::path::Path;

    fn mini() -> JsonLexicon {
        JsonLexicon::load(Path::new("../../../fixtures/lexicon/mini.lexicon.json"))
            .expect("load fixture lexicon")
    }

    fn sense_id(graph: &ConceptGraph, id: ConceptId) -> String {
        graph.get(id).and_then(Concept::sense).unwrap().id.clone()
    }

    #[test]
    fn dog_is_a_animal() {
        let lex = mini();
        let tagger = LexiconTagger::new(&lex);
        let res = resolve_hearst_pairs(
            &[Triple::new("dog", "is-a", "animal")],
            &tagger,
            &lex,
            false,
        )
        .unwrap();

        let graph = &res.graph;
        assert_eq!(graph.members().len(), 2);
        let dog = graph.members()[0];
        let animal = graph.members()[1];
        assert_eq!(sense_id(graph, dog), "dog.n.01");
        assert_eq!(sense_id(graph, animal), "animal.n.01");

        let edges: Vec<_> = graph.outgoing(dog).collect();
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].label, RelationLabel::Pattern("is-a".into()));
        assert_eq!(edges[0].target, animal);
        assert!(res.skipped.is_empty());
    }

    #[test]
    fn best_pair_prefers_first_on_ties() {
        let lex = mini();
        // (fast.a.01, fast.a.01) and (quick.s.01, quick.s.01) both score 1.0.
        let senses = lex.lookup("fast", Category::Adjective);
        let (a, b) = best_pair(&senses, &senses, &lex).unwrap().unwrap();
        assert_eq!(a.id, "fast.a.01");
        assert_eq!(b.id, "fast.a.01");
    }

    #[test]
    fn best_pair_propagates_lexicon_errors() {
        let lex = mini();
        let left = lex.lookup("fast", Category::Adjective);
        // An adverb synset mislabelled as an adjective.
        let right = vec![Sense::new("fast.r.01", Category::Adjective)];
        assert!(best_pair(&left, &right, &lex).is_err());
    }

    #[test]
    fn empty_side_yields_no_pair() {
        let lex = mini();
        let left = lex.lookup("dog", Category::Noun);
        assert!(best_pair(&left, &[], &lex).unwrap().is_none());
    }

    #[test]
    fn multiword_phrase_gets_linked_name_concept() {
        let lex = mini();
        let tagger = LexiconTagger::new(&lex);
        let res = resolve_hearst_pairs(
            &[Triple::new("machine learning", "such-as", "cognition")],
            &tagger,
            &lex,
            false,
        )
        .unwrap();

        let graph = &res.graph;
        let words = vec!["machine".to_string(), "learning".to_string()];
        let name = graph.find_name_concept(&words).expect("name concept");
        let subject = graph.members()[0];

        assert!(graph
            .outgoing(name)
            .any(|r| r.label == RelationLabel::Hypernym && r.target == subject));
        assert!(graph
            .outgoing(subject)
            .any(|r| r.label == RelationLabel::Hyponym && r.target == name));
        assert!(graph
            .outgoing(subject)
            .any(|r| r.label == RelationLabel::Pattern("such-as".into())));
        assert!(!graph.members().contains(&name));
    }

    #[test]
    fn object_is_looked_up_under_subject_category() {
        let lex = mini();
        let tagger = LexiconTagger::new(&lex);
        // `walk` is a verb; `dog` has no verb sense, so nothing resolves.
        let res = resolve_hearst_pairs(
            &[Triple::new("walk", "is-a", "dog")],
            &tagger,
            &lex,
            false,
        )
        .unwrap();
        assert!(res.graph.is_empty());
        assert_eq!(res.skipped.len(), 1);
        assert!(res.skipped[0].1.contains("VERB"));
    }

    #[test]
    fn unknown_subject_is_skipped() {
        let lex = mini();
        let tagger = LexiconTagger::new(&lex);
        let res = resolve_hearst_pairs(
            &[
                Triple::new("unicorn", "is-a", "animal"),
                Triple::new("dog", "is-a", "animal"),
            ],
            &tagger,
            &lex,
            false,
        )
        .unwrap();
        assert_eq!(res.skipped.len(), 1);
        assert_eq!(res.graph.members().len(), 2);
    }

    #[test]
    fn repeated_triples_deduplicate_concepts() {
        let lex = mini();
        let tagger = LexiconTagger::new(&lex);
        let triple = Triple::new("dog", "is-a", "animal");
        let res =
            resolve_hearst_pairs(&[triple.clone(), triple], &tagger, &lex, false).unwrap();
        assert_eq!(res.graph.members().len(), 2);
        assert_eq!(res.graph.relations().len(), 1);
    }
}
