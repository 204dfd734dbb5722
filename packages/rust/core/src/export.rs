//! Serializable envelope for handing a concept graph to downstream consumers.

use chrono::{DateTime, Utc};
use serde::Serialize;

use knoex_shared::{CURRENT_SCHEMA_VERSION, Term};

use crate::graph::ConceptGraph;

/// One exported graph, as written by the CLI.
#[derive(Debug, Clone, Serialize)]
pub struct GraphDocument<'a> {
    /// Schema version for forward compatibility.
    pub schema_version: u32,
    /// Tool version that produced the document.
    pub tool_version: String,
    /// When the document was produced.
    pub generated_at: DateTime<Utc>,
    /// Name of the ontology senses were drawn from.
    pub lexicon: String,
    /// Terms whose head had no sense.
    #[serde(skip_serializing_if = "no_terms")]
    pub unresolved: &'a [Term],
    /// Terms outside every disambiguated category.
    #[serde(skip_serializing_if = "no_terms")]
    pub excluded: &'a [Term],
    pub graph: &'a ConceptGraph,
}

impl<'a> GraphDocument<'a> {
    pub fn new(
        lexicon: impl Into<String>,
        tool_version: impl Into<String>,
        graph: &'a ConceptGraph,
    ) -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            tool_version: tool_version.into(),
            generated_at: Utc::now(),
            lexicon: lexicon.into(),
            unresolved: &[],
            excluded: &[],
            graph,
        }
    }

    /// Attach the terms that did not make it into the graph.
    pub fn with_dropped(mut self, unresolved: &'a [Term], excluded: &'a [Term]) -> Self {
        self.unresolved = unresolved;
        self.excluded = excluded;
        self
    }
}

fn no_terms(terms: &&[Term]) -> bool {
    terms.is_empty()
}
