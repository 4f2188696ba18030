//! 完備化規則 CR1〜CR6 の不動点計算

use crate::mapping::CompletionState;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Dfs;
use std::collections::HashMap;
use subsumer_core::{Concept, ConceptInclusion, Role};
use tracing::{debug, trace};

/// Normalized axioms indexed by the rule that consumes them
#[derive(Debug, Default)]
struct AxiomIndex {
    /// CR1: `C' ⊑ D`, neither side existential, keyed by C'
    told: HashMap<Concept, Vec<Concept>>,
    /// CR2: `C1 ⊓ C2 ⊑ D`, D not existential
    conjunctions: Vec<(Concept, Concept, Concept)>,
    /// CR3: `C' ⊑ ∃r.D`, C' not existential, keyed by C'
    existentials: HashMap<Concept, Vec<(Role, Concept)>>,
    /// CR4: `∃r.D' ⊑ E`, keyed by r then D'
    restrictions: HashMap<Role, HashMap<Concept, Vec<Concept>>>,
}

impl AxiomIndex {
    fn new<'a, I>(axioms: I) -> Self
    where
        I: IntoIterator<Item = &'a ConceptInclusion>,
    {
        let mut index = AxiomIndex::default();
        for axiom in axioms {
            match (&axiom.subclass, &axiom.superclass) {
                (Concept::Existential { role, filler }, superclass) => {
                    index
                        .restrictions
                        .entry(role.clone())
                        .or_default()
                        .entry(filler.as_ref().clone())
                        .or_default()
                        .push(superclass.clone());
                }
                (subclass, Concept::Existential { role, filler }) => {
                    index
                        .existentials
                        .entry(subclass.clone())
                        .or_default()
                        .push((role.clone(), filler.as_ref().clone()));
                }
                (subclass, superclass) => {
                    if let Concept::Intersection(conjunction) = subclass {
                        if let Some((left, right)) = conjunction.as_pair() {
                            index
                                .conjunctions
                                .push((left.clone(), right.clone(), superclass.clone()));
                        }
                    }
                    index
                        .told
                        .entry(subclass.clone())
                        .or_default()
                        .push(superclass.clone());
                }
            }
        }
        index
    }
}

/// Outcome of a saturation run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaturationStats {
    /// Rounds executed, the final unproductive one included
    pub rounds: usize,
    pub subsumer_entries: usize,
    pub link_entries: usize,
}

/// Applies CR1–CR6 over a fixed set of normalized axioms.
///
/// Each rule computes its additions against the state as it was when the
/// rule started; they are merged once the rule is done.
#[derive(Debug)]
pub struct CompletionEngine {
    index: AxiomIndex,
}

impl CompletionEngine {
    pub fn new<'a, I>(axioms: I) -> Self
    where
        I: IntoIterator<Item = &'a ConceptInclusion>,
    {
        Self {
            index: AxiomIndex::new(axioms),
        }
    }

    /// Run rounds until one changes nothing
    pub fn saturate(&self, state: &mut CompletionState) -> SaturationStats {
        let mut rounds = 0;
        loop {
            rounds += 1;
            if !self.round(state) {
                break;
            }
        }

        let stats = SaturationStats {
            rounds,
            subsumer_entries: state.subsumer_entries(),
            link_entries: state.link_entries(),
        };
        debug!(
            "Saturated after {} rounds: {} subsumer entries, {} link entries",
            stats.rounds, stats.subsumer_entries, stats.link_entries
        );
        stats
    }

    /// Apply CR1 through CR6 once each; true if any of them added something
    pub fn round(&self, state: &mut CompletionState) -> bool {
        let mut changed = false;

        changed |= merge_subsumers(state, self.cr1(state), "CR1");
        changed |= merge_subsumers(state, self.cr2(state), "CR2");
        changed |= merge_links(state, self.cr3(state));
        changed |= merge_subsumers(state, self.cr4(state), "CR4");
        changed |= merge_subsumers(state, self.cr5(state), "CR5");
        changed |= merge_subsumers(state, self.cr6(state), "CR6");

        changed
    }

    /// CR1: `C' ∈ S(C)`, `C' ⊑ D` ⟹ `D ∈ S(C)`
    fn cr1(&self, state: &CompletionState) -> Vec<(Concept, Concept)> {
        let mut additions = Vec::new();
        for (concept, supers) in &state.subsumers {
            for told in supers.iter().filter_map(|s| self.index.told.get(s)) {
                additions.extend(
                    told.iter()
                        .filter(|d| !supers.contains(*d))
                        .map(|d| (concept.clone(), d.clone())),
                );
            }
        }
        additions
    }

    /// CR2: `C1, C2 ∈ S(C)`, `C1 ⊓ C2 ⊑ D` ⟹ `D ∈ S(C)`
    fn cr2(&self, state: &CompletionState) -> Vec<(Concept, Concept)> {
        let mut additions = Vec::new();
        for (concept, supers) in &state.subsumers {
            for (left, right, superclass) in &self.index.conjunctions {
                if supers.contains(left) && supers.contains(right) && !supers.contains(superclass) {
                    additions.push((concept.clone(), superclass.clone()));
                }
            }
        }
        additions
    }

    /// CR3: `C' ∈ S(C)`, `C' ⊑ ∃r.D` ⟹ `(C, D) ∈ R(r)`
    fn cr3(&self, state: &CompletionState) -> Vec<(Role, Concept, Concept)> {
        let mut additions = Vec::new();
        for (concept, supers) in &state.subsumers {
            for existentials in supers.iter().filter_map(|s| self.index.existentials.get(s)) {
                for (role, filler) in existentials {
                    let present = state
                        .links
                        .get(role)
                        .map_or(false, |pairs| pairs.contains(&(concept.clone(), filler.clone())));
                    if !present {
                        additions.push((role.clone(), concept.clone(), filler.clone()));
                    }
                }
            }
        }
        additions
    }

    /// CR4: `(C, D) ∈ R(r)`, `D' ∈ S(D)`, `∃r.D' ⊑ E` ⟹ `E ∈ S(C)`
    fn cr4(&self, state: &CompletionState) -> Vec<(Concept, Concept)> {
        let mut additions = Vec::new();
        for (role, pairs) in &state.links {
            let Some(by_filler) = self.index.restrictions.get(role) else {
                continue;
            };
            for (from, to) in pairs {
                let Some(target_supers) = state.subsumers.get(to) else {
                    continue;
                };
                for superclasses in target_supers.iter().filter_map(|d| by_filler.get(d)) {
                    additions.extend(superclasses.iter().map(|e| (from.clone(), e.clone())));
                }
            }
        }
        additions
    }

    /// CR5: `(C, D) ∈ R(r)`, `⊥ ∈ S(D)` ⟹ `⊥ ∈ S(C)`
    fn cr5(&self, state: &CompletionState) -> Vec<(Concept, Concept)> {
        let bottom = Concept::bottom();
        state
            .links
            .values()
            .flatten()
            .filter(|(_, to)| state.subsumes(to, &bottom))
            .map(|(from, _)| (from.clone(), bottom.clone()))
            .collect()
    }

    /// CR6: `{a} ∈ S(C1) ∩ S(C2)`, C2 reachable from C1 ⟹ `S(C2) ⊆ S(C1)`
    fn cr6(&self, state: &CompletionState) -> Vec<(Concept, Concept)> {
        let graph = LinkGraph::build(state);
        let mut additions = Vec::new();

        for (first, first_supers) in &state.subsumers {
            if first.is_bottom() || !first_supers.iter().any(Concept::is_nominal) {
                continue;
            }
            let Some(start) = graph.node(first) else {
                continue;
            };

            let mut dfs = Dfs::new(&graph.graph, start);
            while let Some(next) = dfs.next(&graph.graph) {
                let second = graph.graph[next];
                if second == first {
                    continue;
                }
                let Some(second_supers) = state.subsumers.get(second) else {
                    continue;
                };
                // the first shared nominal decides
                let shared_nominal = first_supers
                    .iter()
                    .find(|c| c.is_nominal() && second_supers.contains(*c));
                if shared_nominal.is_some() {
                    additions.extend(
                        second_supers
                            .difference(first_supers)
                            .map(|c| (first.clone(), c.clone())),
                    );
                }
            }
        }
        additions
    }
}

/// Saturate `state` with the given normalized axioms
pub fn saturate<'a, I>(state: &mut CompletionState, axioms: I) -> SaturationStats
where
    I: IntoIterator<Item = &'a ConceptInclusion>,
{
    CompletionEngine::new(axioms).saturate(state)
}

/// Concept keys connected by every R pair, roles ignored
struct LinkGraph<'a> {
    graph: DiGraph<&'a Concept, ()>,
    nodes: HashMap<&'a Concept, NodeIndex>,
}

impl<'a> LinkGraph<'a> {
    fn build(state: &'a CompletionState) -> Self {
        let mut graph = LinkGraph {
            graph: DiGraph::new(),
            nodes: HashMap::new(),
        };
        for concept in state.subsumers.keys() {
            graph.add_node(concept);
        }
        for (from, to) in state.links.values().flatten() {
            let from = graph.add_node(from);
            let to = graph.add_node(to);
            graph.graph.add_edge(from, to, ());
        }
        graph
    }

    fn add_node(&mut self, concept: &'a Concept) -> NodeIndex {
        let graph = &mut self.graph;
        *self
            .nodes
            .entry(concept)
            .or_insert_with(|| graph.add_node(concept))
    }

    fn node(&self, concept: &Concept) -> Option<NodeIndex> {
        self.nodes.get(concept).copied()
    }
}

fn merge_subsumers(state: &mut CompletionState, additions: Vec<(Concept, Concept)>, rule: &str) -> bool {
    let mut added = 0;
    for (concept, superclass) in additions {
        if state.add_subsumer(&concept, superclass) {
            added += 1;
        }
    }
    if added > 0 {
        trace!("{} added {} subsumers", rule, added);
    }
    added > 0
}

fn merge_links(state: &mut CompletionState, additions: Vec<(Role, Concept, Concept)>) -> bool {
    let mut added = 0;
    for (role, from, to) in additions {
        if state.add_link(role, from, to) {
            added += 1;
        }
    }
    if added > 0 {
        trace!("CR3 added {} links", added);
    }
    added > 0
}
