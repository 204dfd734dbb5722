//! Turn resolved `(sense, term)` pairs into concepts and attach multiword
//! phrases beneath the sense-concept that shares their head.

use tracing::debug;

use knoex_shared::Term;

use crate::graph::{Concept, ConceptGraph, ConceptId};
use crate::resolve::Resolved;

/// Add one category group's concepts to `graph`.
///
/// Each multiword term becomes a name-concept linked to every sense-concept
/// from this group whose term has the same head token. A name-concept with no
/// match stays in the arena unlinked. Returns the group's sense-concept ids.
pub fn assemble_concepts(
    graph: &mut ConceptGraph,
    resolved: &[Resolved],
    multiwords: &[Term],
    include_name_concepts: bool,
) -> Vec<ConceptId> {
    let mut sense_ids: Vec<ConceptId> = Vec::with_capacity(resolved.len());
    for r in resolved {
        let id = graph.add_sense_concept(r.sense.clone(), r.term.clone());
        if !sense_ids.contains(&id) {
            sense_ids.push(id);
        }
    }

    for term in multiwords {
        let name = graph.add_name_concept(term);

        let matches: Vec<ConceptId> = sense_ids
            .iter()
            .copied()
            .filter(|id| {
                graph
                    .get(*id)
                    .is_some_and(|c| matches!(c, Concept::Sense { .. }) && c.head() == term.head)
            })
            .collect();

        if matches.is_empty() {
            debug!(phrase = %term.surface(), head = %term.head, "multiword head not resolved, left unlinked");
        }
        for sense in matches {
            graph.link_name(name, sense);
        }

        if include_name_concepts {
            graph.promote(name);
        }
    }

    sense_ids
}
