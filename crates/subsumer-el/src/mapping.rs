//! 概念マップ S とロールマップ R

use std::collections::{HashMap, HashSet};
use subsumer_core::{Concept, ConceptInclusion, Role};

/// Working sets of the completion algorithm.
///
/// `S(C)` holds the concepts C is known to be subsumed by, `R(r)` the pairs
/// `(C, D)` such that C is known to reach D through r. Both only grow.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionState {
    pub(crate) subsumers: HashMap<Concept, HashSet<Concept>>,
    pub(crate) links: HashMap<Role, HashSet<(Concept, Concept)>>,
}

impl CompletionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// S(C), if C is a key
    pub fn subsumers(&self, concept: &Concept) -> Option<&HashSet<Concept>> {
        self.subsumers.get(concept)
    }

    /// R(r), if r was registered
    pub fn links(&self, role: &Role) -> Option<&HashSet<(Concept, Concept)>> {
        self.links.get(role)
    }

    /// Whether `superclass ∈ S(subclass)`
    pub fn subsumes(&self, subclass: &Concept, superclass: &Concept) -> bool {
        self.subsumers
            .get(subclass)
            .map_or(false, |supers| supers.contains(superclass))
    }

    pub fn concepts(&self) -> impl Iterator<Item = &Concept> {
        self.subsumers.keys()
    }

    pub fn roles(&self) -> impl Iterator<Item = &Role> {
        self.links.keys()
    }

    /// Total number of entries over all S sets
    pub fn subsumer_entries(&self) -> usize {
        self.subsumers.values().map(HashSet::len).sum()
    }

    /// Total number of pairs over all R sets
    pub fn link_entries(&self) -> usize {
        self.links.values().map(HashSet::len).sum()
    }

    /// Add `superclass` to S(`concept`); false if already present or not a key
    pub(crate) fn add_subsumer(&mut self, concept: &Concept, superclass: Concept) -> bool {
        self.subsumers
            .get_mut(concept)
            .map_or(false, |supers| supers.insert(superclass))
    }

    pub(crate) fn add_link(&mut self, role: Role, from: Concept, to: Concept) -> bool {
        self.links.entry(role).or_default().insert((from, to))
    }

    fn seed(&mut self, concept: &Concept) {
        self.subsumers
            .insert(concept.clone(), HashSet::from([concept.clone(), Concept::top()]));
    }

    fn seed_expression(&mut self, expression: &Concept) {
        match expression {
            Concept::Named(_) | Concept::Nominal(_) => self.seed(expression),
            Concept::Intersection(conjunction) => {
                for operand in conjunction.operands() {
                    self.seed(operand);
                }
            }
            Concept::Existential { role, filler } => {
                self.links.insert(role.clone(), HashSet::new());
                self.seed(filler);
            }
        }
    }
}

/// Seed S and R from the concepts and roles of a normalized axiom set.
///
/// Every named concept or nominal on either side gets `S(C) = {C, ⊤}`, as do
/// the operands of intersections and the fillers of existentials; each role
/// of an existential gets an empty `R(r)`.
pub fn initialize<'a, I>(axioms: I) -> CompletionState
where
    I: IntoIterator<Item = &'a ConceptInclusion>,
{
    let mut state = CompletionState::new();
    for axiom in axioms {
        state.seed_expression(&axiom.subclass);
        state.seed_expression(&axiom.superclass);
    }
    state
}
