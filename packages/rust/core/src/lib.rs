//! Word-sense disambiguation and concept-graph assembly for knoex.
//!
//! This crate takes tagged terms (or Hearst-pattern triples), picks the most
//! plausible ontology sense for each by mutual similarity, and links the
//! results into a graph of concepts.

pub mod assemble;
pub mod candidates;
pub mod export;
pub mod former;
pub mod graph;
pub mod hearst;
pub mod partition;
pub mod resolve;

pub use export::GraphDocument;
pub use former::{ConceptFormer, Formation};
pub use graph::{Concept, ConceptGraph, ConceptId, Relation, RelationLabel};
pub use hearst::{HearstResolution, Triple};
