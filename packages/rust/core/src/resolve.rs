//! Sense resolution by aggregate pairwise similarity.
//!
//! Easy terms are resolved first by mutual consensus and become the anchor
//! set. Each hard term is then resolved against the anchors alone; hard terms
//! never see each other. Optionally, a refinement pass re-picks every term
//! against all other terms' current choices.

use tracing::{debug, instrument, trace};

use knoex_lexicon::Ontology;
use knoex_shared::{Result, Sense, Strategy, Term};

use crate::candidates::{CandidateSet, Split};

/// A term paired with the sense chosen for it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Resolved {
    pub sense: Sense,
    pub term: Term,
}

/// Sum of similarities between `candidate` and every sense in `pool`.
/// An empty pool scores zero.
fn score<'a>(
    candidate: &Sense,
    pool: impl IntoIterator<Item = &'a Sense>,
    ontology: &dyn Ontology,
) -> Result<f64> {
    let mut total = 0.0;
    for other in pool {
        total += ontology.similarity(candidate, other)?;
    }
    Ok(total)
}

/// Index of the highest-scoring candidate against `pool`; ties keep the
/// earliest candidate.
fn best_candidate<'a>(
    set: &CandidateSet,
    pool: &[&'a Sense],
    ontology: &dyn Ontology,
) -> Result<usize> {
    let mut best = 0;
    let mut best_score = f64::NEG_INFINITY;

    for (i, candidate) in set.senses.iter().enumerate() {
        let s = score(candidate, pool.iter().copied(), ontology)?;
        trace!(sense = %candidate, score = s, "candidate scored");
        if s > best_score {
            best = i;
            best_score = s;
        }
    }

    Ok(best)
}

/// Resolve the easy terms against each other.
///
/// Each term's candidates are scored against the flattened candidates of
/// every other easy term.
#[instrument(skip_all, fields(easy = easy.len()))]
pub fn resolve_anchors(easy: &[CandidateSet], ontology: &dyn Ontology) -> Result<Vec<Resolved>> {
    let mut anchors = Vec::with_capacity(easy.len());

    for (i, set) in easy.iter().enumerate() {
        let pool: Vec<&Sense> = easy
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != i)
            .flat_map(|(_, other)| other.senses.iter())
            .collect();

        let chosen = best_candidate(set, &pool, ontology)?;
        debug!(head = %set.term.head, sense = %set.senses[chosen], "anchor resolved");
        anchors.push(Resolved {
            sense: set.senses[chosen].clone(),
            term: set.term.clone(),
        });
    }

    Ok(anchors)
}

/// Resolve each hard term against the fixed anchor senses.
///
/// Returns only the newly resolved hard terms; `anchors` is read-only.
#[instrument(skip_all, fields(anchors = anchors.len(), hard = hard.len()))]
pub fn resolve_residual(
    anchors: &[Resolved],
    hard: &[CandidateSet],
    ontology: &dyn Ontology,
) -> Result<Vec<Resolved>> {
    let pool: Vec<&Sense> = anchors.iter().map(|a| &a.sense).collect();

    hard.iter()
        .map(|set| {
            let chosen = best_candidate(set, &pool, ontology)?;
            debug!(head = %set.term.head, sense = %set.senses[chosen], "hard term resolved");
            Ok(Resolved {
                sense: set.senses[chosen].clone(),
                term: set.term.clone(),
            })
        })
        .collect()
}

/// Re-pick each term against all other terms' current senses until no choice
/// changes or `rounds` passes have run. Returns the number of passes made.
///
/// `resolved[i]` must be the choice made from `sets[i]`.
pub fn refine(
    resolved: &mut [Resolved],
    sets: &[&CandidateSet],
    rounds: u32,
    ontology: &dyn Ontology,
) -> Result<u32> {
    let mut passes = 0;

    while passes < rounds {
        passes += 1;
        let mut changed = false;

        for i in 0..resolved.len() {
            let chosen = {
                let pool: Vec<&Sense> = resolved
                    .iter()
                    .enumerate()
                    .filter(|(j, _)| *j != i)
                    .map(|(_, r)| &r.sense)
                    .collect();
                best_candidate(sets[i], &pool, ontology)?
            };

            let sense = &sets[i].senses[chosen];
            if *sense != resolved[i].sense {
                debug!(
                    head = %resolved[i].term.head,
                    from = %resolved[i].sense,
                    to = %sense,
                    "refinement changed sense"
                );
                resolved[i].sense = sense.clone();
                changed = true;
            }
        }

        if !changed {
            break;
        }
    }

    Ok(passes)
}

/// Resolve a whole category group: anchors, then residuals appended after
/// them, then refinement if the strategy asks for it.
pub fn resolve_group(
    split: &Split,
    strategy: Strategy,
    ontology: &dyn Ontology,
) -> Result<Vec<Resolved>> {
    let mut resolved = resolve_anchors(&split.easy, ontology)?;
    let residual = resolve_residual(&resolved, &split.hard, ontology)?;
    resolved.extend(residual);

    if let Strategy::Refine { rounds } = strategy {
        let sets: Vec<&CandidateSet> = split.easy.iter().chain(split.hard.iter()).collect();
        let passes = refine(&mut resolved, &sets, rounds, ontology)?;
        debug!(passes, "refinement finished");
    }

    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidates::{build_candidate_sets, split_easy_hard};
    use knoex_lexicon::JsonLexicon;
    use knoex_shared::{Category, KnoexError};
    use std::path::Path;

    fn mini() -> JsonLexicon {
        JsonLexicon::load(Path::new("../../../fixtures/lexicon/mini.lexicon.json"))
            .expect("load fixture lexicon")
    }

    fn bank_river_money(lex: &JsonLexicon) -> Split {
        let terms = vec![
            Term::simple("bank", "N"),
            Term::simple("river", "N"),
            Term::simple("money", "N"),
        ];
        let build = build_candidate_sets(&terms, Category::Noun, lex);
        split_easy_hard(build.sets, 3)
    }

    #[test]
    fn anchors_pick_one_own_sense_per_easy_term() {
        let lex = mini();
        let split = bank_river_money(&lex);
        let anchors = resolve_anchors(&split.easy, &lex).unwrap();

        assert_eq!(anchors.len(), split.easy.len());
        for (anchor, set) in anchors.iter().zip(&split.easy) {
            assert!(set.senses.contains(&anchor.sense));
            assert_eq!(anchor.term, set.term);
        }
        assert_eq!(anchors[0].sense.id, "river.n.01");
        assert_eq!(anchors[1].sense.id, "money.n.01");
    }

    #[test]
    fn bank_resolves_to_riverside_sense() {
        let lex = mini();
        let split = bank_river_money(&lex);
        let resolved = resolve_group(&split, Strategy::FixedAnchors, &lex).unwrap();

        let ids: Vec<&str> = resolved.iter().map(|r| r.sense.id.as_str()).collect();
        assert_eq!(ids, vec!["river.n.01", "money.n.01", "bank.n.01"]);
    }

    #[test]
    fn residual_resolution_leaves_anchors_untouched() {
        let lex = mini();
        let split = bank_river_money(&lex);
        let anchors = resolve_anchors(&split.easy, &lex).unwrap();
        let before = anchors.clone();

        let residual = resolve_residual(&anchors, &split.hard, &lex).unwrap();
        assert_eq!(anchors, before);
        assert_eq!(residual.len(), 1);
    }

    #[test]
    fn hard_terms_do_not_influence_each_other() {
        let lex = mini();
        let anchors = vec![Resolved {
            sense: Sense::new("river.n.01", Category::Noun),
            term: Term::simple("river", "N"),
        }];
        let bank = build_candidate_sets(&[Term::simple("bank", "N")], Category::Noun, &lex)
            .sets
            .remove(0);

        let alone = resolve_residual(&anchors, std::slice::from_ref(&bank), &lex).unwrap();
        let paired = resolve_residual(&anchors, &[bank.clone(), bank.clone()], &lex).unwrap();
        assert_eq!(paired[0], alone[0]);
        assert_eq!(paired[1], alone[0]);
    }

    #[test]
    fn single_term_with_empty_pool_takes_first_candidate() {
        let lex = mini();
        let build = build_candidate_sets(&[Term::simple("river", "N")], Category::Noun, &lex);
        let anchors = resolve_anchors(&build.sets, &lex).unwrap();
        assert_eq!(anchors[0].sense.id, "river.n.01");
    }

    #[test]
    fn ties_resolve_to_first_candidate() {
        let lex = mini();
        // Each `fast` sees the other's two senses; both candidates score 1.0.
        let sets = build_candidate_sets(
            &[Term::simple("fast", "ADJ"), Term::simple("fast", "ADJ")],
            Category::Adjective,
            &lex,
        )
        .sets;
        let anchors = resolve_anchors(&sets, &lex).unwrap();
        assert_eq!(anchors[0].sense.id, "fast.a.01");
        assert_eq!(anchors[1].sense.id, "fast.a.01");
    }

    #[test]
    fn refine_keeps_a_stable_resolution() {
        let lex = mini();
        let split = bank_river_money(&lex);
        let fixed = resolve_group(&split, Strategy::FixedAnchors, &lex).unwrap();
        let refined = resolve_group(&split, Strategy::Refine { rounds: 3 }, &lex).unwrap();
        assert_eq!(fixed, refined);
    }

    #[test]
    fn refine_stops_after_first_unchanged_pass() {
        let lex = mini();
        let split = bank_river_money(&lex);
        let mut resolved = resolve_group(&split, Strategy::FixedAnchors, &lex).unwrap();
        let sets: Vec<&CandidateSet> = split.easy.iter().chain(split.hard.iter()).collect();
        let passes = refine(&mut resolved, &sets, 10, &lex).unwrap();
        assert_eq!(passes, 1);
    }

    #[test]
    fn refine_corrects_a_poor_starting_choice() {
        let lex = mini();
        let split = bank_river_money(&lex);
        let sets: Vec<&CandidateSet> = split.easy.iter().chain(split.hard.iter()).collect();
        let mut resolved = resolve_group(&split, Strategy::FixedAnchors, &lex).unwrap();
        resolved[2].sense = Sense::new("bank.n.05", Category::Noun);

        refine(&mut resolved, &sets, 3, &lex).unwrap();
        assert_eq!(resolved[2].sense.id, "bank.n.01");
    }

    #[test]
    fn cross_category_pool_aborts() {
        let lex = mini();
        let sets = vec![
            CandidateSet {
                term: Term::simple("dog", "N"),
                senses: vec![Sense::new("dog.n.01", Category::Noun)],
            },
            CandidateSet {
                term: Term::simple("run", "V"),
                senses: vec![Sense::new("run.v.01", Category::Verb)],
            },
        ];
        let err = resolve_anchors(&sets, &lex).unwrap_err();
        assert!(matches!(err, KnoexError::CrossCategory { .. }));
    }
}
