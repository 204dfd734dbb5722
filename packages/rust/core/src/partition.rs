//! Split a batch of terms into per-category groups.

use tracing::debug;

use knoex_shared::{Category, Term};

/// Terms grouped by category, plus those outside every category.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Partition {
    pub nouns: Vec<Term>,
    pub verbs: Vec<Term>,
    pub adjectives: Vec<Term>,
    /// Terms whose tag maps to no category; never disambiguated.
    pub excluded: Vec<Term>,
}

impl Partition {
    pub fn group(&self, category: Category) -> &[Term] {
        match category {
            Category::Noun => &self.nouns,
            Category::Verb => &self.verbs,
            Category::Adjective => &self.adjectives,
        }
    }

    /// Non-empty groups in noun, verb, adjective order.
    pub fn groups(&self) -> impl Iterator<Item = (Category, &[Term])> {
        Category::ALL
            .into_iter()
            .map(|c| (c, self.group(c)))
            .filter(|(_, terms)| !terms.is_empty())
    }
}

/// Partition terms by the category of their head, keeping input order.
pub fn partition_terms(terms: &[Term]) -> Partition {
    let mut partition = Partition::default();

    for term in terms {
        match term.category() {
            Some(Category::Noun) => partition.nouns.push(term.clone()),
            Some(Category::Verb) => partition.verbs.push(term.clone()),
            Some(Category::Adjective) => partition.adjectives.push(term.clone()),
            None => {
                debug!(%term, "term outside disambiguated categories, excluded");
                partition.excluded.push(term.clone());
            }
        }
    }

    partition
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partitions_by_category_in_order() {
        let terms = vec![
            Term::simple("dog", "N"),
            Term::simple("run", "V"),
            Term::simple("fast", "ADJ"),
            Term::simple("river", "N"),
            Term::simple("quickly", "ADV"),
        ];

        let p = partition_terms(&terms);
        assert_eq!(p.nouns, vec![Term::simple("dog", "N"), Term::simple("river", "N")]);
        assert_eq!(p.verbs.len(), 1);
        assert_eq!(p.adjectives.len(), 1);
        assert_eq!(p.excluded, vec![Term::simple("quickly", "ADV")]);
    }

    #[test]
    fn no_term_lands_in_two_groups() {
        let terms = vec![
            Term::simple("bank", "N"),
            Term::simple("bank", "V"),
            Term::simple("the", "DET"),
        ];
        let p = partition_terms(&terms);
        let total = p.nouns.len() + p.verbs.len() + p.adjectives.len() + p.excluded.len();
        assert_eq!(total, terms.len());
    }

    #[test]
    fn groups_skip_empty_categories() {
        let p = partition_terms(&[Term::simple("walk", "V")]);
        let cats: Vec<Category> = p.groups().map(|(c, _)| c).collect();
        assert_eq!(cats, vec![Category::Verb]);
    }
}
