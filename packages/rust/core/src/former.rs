//! Concept formation over one batch of terms.
//!
//! Partition → candidate sets → easy/hard split → anchor and residual
//! resolution → concept assembly, run once per category. All groups write
//! into one [`ConceptGraph`].

use tracing::{info, instrument};

use knoex_lexicon::Ontology;
use knoex_preprocess::PhraseTagger;
use knoex_shared::{Category, FormerConfig, Result, Term};

use crate::assemble::assemble_concepts;
use crate::candidates::{build_candidate_sets, split_easy_hard};
use crate::graph::ConceptGraph;
use crate::hearst::{self, HearstResolution, Triple};
use crate::partition::partition_terms;
use crate::resolve::resolve_group;

/// Outcome of forming concepts for one batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Formation {
    pub graph: ConceptGraph,
    /// Terms dropped because their head had no sense.
    pub unresolved: Vec<Term>,
    /// Terms outside every disambiguated category.
    pub excluded: Vec<Term>,
}

/// Disambiguates term batches against an ontology.
pub struct ConceptFormer<'a> {
    ontology: &'a dyn Ontology,
    config: FormerConfig,
}

impl<'a> ConceptFormer<'a> {
    pub fn new(ontology: &'a dyn Ontology, config: FormerConfig) -> Self {
        Self { ontology, config }
    }

    pub fn config(&self) -> &FormerConfig {
        &self.config
    }

    /// Form concepts for a batch of terms.
    ///
    /// A cross-category comparison aborts the batch with
    /// [`KnoexError::CrossCategory`](knoex_shared::KnoexError::CrossCategory).
    #[instrument(skip_all, fields(terms = terms.len(), ontology = %self.ontology.name()))]
    pub fn form_concepts(&self, terms: &[Term]) -> Result<Formation> {
        let partition = partition_terms(terms);
        let mut formation = Formation {
            excluded: partition.excluded.clone(),
            ..Default::default()
        };

        for (category, group) in partition.groups() {
            let unresolved = self.form_group(category, group, &mut formation.graph)?;
            formation.unresolved.extend(unresolved);
        }

        info!(
            concepts = formation.graph.members().len(),
            relations = formation.graph.relations().len(),
            unresolved = formation.unresolved.len(),
            excluded = formation.excluded.len(),
            "concepts formed"
        );

        Ok(formation)
    }

    /// Resolve one category group into `graph`; returns the terms with no sense.
    ///
    /// Resolution finishes before anything is written, so a failed group
    /// leaves `graph` untouched.
    #[instrument(skip_all, fields(%category, terms = terms.len()))]
    fn form_group(
        &self,
        category: Category,
        terms: &[Term],
        graph: &mut ConceptGraph,
    ) -> Result<Vec<Term>> {
        let build = build_candidate_sets(terms, category, self.ontology);
        let split = split_easy_hard(build.sets, self.config.easy_threshold);
        let resolved = resolve_group(&split, self.config.strategy, self.ontology)?;

        assemble_concepts(
            graph,
            &resolved,
            &build.multiwords,
            self.config.include_name_concepts,
        );

        Ok(build.unresolved)
    }

    /// Resolve Hearst-pattern triples into their own concept graph.
    pub fn find_hearst_concepts(
        &self,
        triples: &[Triple],
        tagger: &dyn PhraseTagger,
    ) -> Result<HearstResolution> {
        hearst::resolve_hearst_pairs(
            triples,
            tagger,
            self.ontology,
            self.config.include_name_concepts,
        )
    }
}
