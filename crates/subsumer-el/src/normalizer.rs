//! 二項正規形への正規化
//!
//! 正規化後の公理は次の形のみ:
//! - 左辺: 名前付き概念, ノミナル, 基本概念二つの交差, 基本概念上の存在制限
//! - 右辺: 名前付き概念, ノミナル, 基本概念上の存在制限

use crate::guard;
use crate::ElError;
use std::collections::HashSet;
use subsumer_core::{Concept, ConceptInclusion, Conjunction, Iri, Role};
use tracing::{debug, trace};

/// Counter-backed generator of synthetic concepts named `{prefix}{n}`.
///
/// Names in the reserved set are skipped, so temps never alias a concept of
/// the ontology being normalized.
#[derive(Debug, Clone)]
pub struct TempConcepts {
    prefix: String,
    next: usize,
    reserved: HashSet<Iri>,
    issued: HashSet<Iri>,
}

impl TempConcepts {
    pub fn new<S: Into<String>>(prefix: S) -> Self {
        Self {
            prefix: prefix.into(),
            next: 0,
            reserved: HashSet::new(),
            issued: HashSet::new(),
        }
    }

    /// Mark IRIs that must never be issued
    pub fn reserve<I>(&mut self, iris: I)
    where
        I: IntoIterator<Item = Iri>,
    {
        self.reserved.extend(iris);
    }

    pub fn fresh(&mut self) -> Concept {
        Concept::Named(self.fresh_iri())
    }

    pub fn fresh_iri(&mut self) -> Iri {
        loop {
            let iri = Iri::new(format!("{}{}", self.prefix, self.next));
            self.next += 1;
            if !self.reserved.contains(&iri) {
                self.issued.insert(iri.clone());
                return iri;
            }
        }
    }

    /// Number of names handed out so far; skipped reserved names not counted
    pub fn issued(&self) -> usize {
        self.issued.len()
    }

    /// Whether `iri` was handed out by this generator
    pub fn is_issued(&self, iri: &Iri) -> bool {
        self.issued.contains(iri)
    }

    /// Restart numbering from 0; reserved names stay reserved
    pub fn reset(&mut self) {
        self.next = 0;
        self.issued.clear();
    }
}

/// Rewrites concept inclusions into binary normal form
#[derive(Debug, Clone)]
pub struct Normalizer {
    temps: TempConcepts,
}

impl Normalizer {
    pub fn new(temps: TempConcepts) -> Self {
        Self { temps }
    }

    pub fn temps(&self) -> &TempConcepts {
        &self.temps
    }

    pub fn temps_mut(&mut self) -> &mut TempConcepts {
        &mut self.temps
    }

    /// Normalize a set of axioms.
    ///
    /// Every axiom passes the bottom guard before any is rewritten, so a
    /// rejected set leaves the temp counter untouched.
    pub fn normalize<'a, I>(&mut self, axioms: I) -> Result<HashSet<ConceptInclusion>, ElError>
    where
        I: IntoIterator<Item = &'a ConceptInclusion>,
    {
        let axioms: Vec<&ConceptInclusion> = axioms.into_iter().collect();
        guard::validate_all(axioms.iter().copied())?;

        let first_temp = self.temps.issued();
        let mut normalized = HashSet::new();
        for axiom in &axioms {
            self.normalize_axiom(axiom, &mut normalized);
        }

        debug!(
            "Normalized {} axioms into {} ({} temp concepts)",
            axioms.len(),
            normalized.len(),
            self.temps.issued() - first_temp
        );
        Ok(normalized)
    }

    fn normalize_axiom(&mut self, axiom: &ConceptInclusion, out: &mut HashSet<ConceptInclusion>) {
        let mut subclass = self.normalize_subclass(&axiom.subclass, out);
        let superclass = self.normalize_superclass(&axiom.superclass, out);

        // compound ⊑ ∃r.B has no rule; name the left side first
        if (subclass.is_intersection() || subclass.is_existential()) && superclass.is_existential() {
            subclass = self.reduce_to_class(&subclass, out);
        }

        let normalized = ConceptInclusion::new(subclass, superclass);
        trace!("{} => {}", axiom, normalized);
        out.insert(normalized);
    }

    fn normalize_subclass(&mut self, concept: &Concept, out: &mut HashSet<ConceptInclusion>) -> Concept {
        match concept {
            Concept::Named(_) | Concept::Nominal(_) => concept.clone(),
            Concept::Intersection(conjunction) => self.normalize_intersection(conjunction, out),
            Concept::Existential { role, filler } => self.normalize_existential(role, filler, out),
        }
    }

    fn normalize_superclass(&mut self, concept: &Concept, out: &mut HashSet<ConceptInclusion>) -> Concept {
        match concept {
            Concept::Intersection(conjunction) => {
                let binary = self.normalize_intersection(conjunction, out);
                self.reduce_to_class(&binary, out)
            }
            _ => self.normalize_subclass(concept, out),
        }
    }

    /// Rewrite an intersection into one over exactly two basic operands.
    ///
    /// Existential operands are named first; wider conjunctions are folded
    /// pairwise, left to right, each pair replaced by a temp equivalent to it,
    /// until two operands remain.
    fn normalize_intersection(&mut self, conjunction: &Conjunction, out: &mut HashSet<ConceptInclusion>) -> Concept {
        let mut operands: Vec<Concept> = conjunction
            .operands()
            .iter()
            .map(|operand| self.atomize(operand, out))
            .collect();

        while operands.len() > 2 {
            let mut paired = Vec::with_capacity(operands.len() / 2 + 1);
            for chunk in operands.chunks(2) {
                match chunk {
                    [left, right] => {
                        let temp = self.temps.fresh();
                        define_conjunction(&temp, left, right, out);
                        paired.push(temp);
                    }
                    _ => paired.extend(chunk.iter().cloned()),
                }
            }
            operands = paired;
        }

        Concept::intersection_of(operands)
    }

    /// Rewrite ∃r.C so that the filler is basic
    fn normalize_existential(&mut self, role: &Role, filler: &Concept, out: &mut HashSet<ConceptInclusion>) -> Concept {
        match filler {
            Concept::Named(_) | Concept::Nominal(_) => Concept::existential(role.clone(), filler.clone()),
            Concept::Intersection(conjunction) => {
                let binary = self.normalize_intersection(conjunction, out);
                let temp = self.reduce_to_class(&binary, out);
                Concept::existential(role.clone(), temp)
            }
            Concept::Existential {
                role: inner_role,
                filler: inner_filler,
            } => {
                let inner = self.normalize_existential(inner_role, inner_filler, out);
                let temp = self.reduce_to_class(&inner, out);
                Concept::existential(role.clone(), temp)
            }
        }
    }

    /// Basic operands pass through, anything else becomes a named temp
    fn atomize(&mut self, operand: &Concept, out: &mut HashSet<ConceptInclusion>) -> Concept {
        match operand {
            Concept::Named(_) | Concept::Nominal(_) => operand.clone(),
            Concept::Existential { role, filler } => {
                let existential = self.normalize_existential(role, filler, out);
                self.reduce_to_class(&existential, out)
            }
            Concept::Intersection(conjunction) => {
                let binary = self.normalize_intersection(conjunction, out);
                self.reduce_to_class(&binary, out)
            }
        }
    }

    /// Replace a compound expression by a fresh temp concept equivalent to it.
    ///
    /// `A ⊓ B` yields `T ⊑ A`, `T ⊑ B`, `A ⊓ B ⊑ T`; `∃r.A` yields `T ⊑ ∃r.A`,
    /// `∃r.A ⊑ T`. Expressions not yet in normal form are normalized first.
    pub fn reduce_to_class(&mut self, concept: &Concept, out: &mut HashSet<ConceptInclusion>) -> Concept {
        match concept {
            Concept::Named(_) | Concept::Nominal(_) => concept.clone(),
            Concept::Intersection(conjunction) => match conjunction.as_pair() {
                Some((left, right)) if left.is_basic() && right.is_basic() => {
                    let temp = self.temps.fresh();
                    define_conjunction(&temp, left, right, out);
                    temp
                }
                _ => {
                    let binary = self.normalize_intersection(conjunction, out);
                    self.reduce_to_class(&binary, out)
                }
            },
            Concept::Existential { filler, .. } if filler.is_basic() => {
                let temp = self.temps.fresh();
                out.insert(ConceptInclusion::new(temp.clone(), concept.clone()));
                out.insert(ConceptInclusion::new(concept.clone(), temp.clone()));
                temp
            }
            Concept::Existential { role, filler } => {
                let existential = self.normalize_existential(role, filler, out);
                self.reduce_to_class(&existential, out)
            }
        }
    }
}

fn define_conjunction(temp: &Concept, left: &Concept, right: &Concept, out: &mut HashSet<ConceptInclusion>) {
    out.insert(ConceptInclusion::new(temp.clone(), left.clone()));
    out.insert(ConceptInclusion::new(temp.clone(), right.clone()));
    out.insert(ConceptInclusion::new(
        Concept::intersection_of(vec![left.clone(), right.clone()]),
        temp.clone(),
    ));
}

/// Whether an axiom has one of the shapes the completion rules expect
pub fn is_normal_form(axiom: &ConceptInclusion) -> bool {
    let existential_over_basic =
        |c: &Concept| matches!(c, Concept::Existential { filler, .. } if filler.is_basic());

    let subclass_ok = match &axiom.subclass {
        Concept::Named(_) | Concept::Nominal(_) => true,
        Concept::Intersection(conjunction) => conjunction
            .as_pair()
            .map_or(false, |(left, right)| left.is_basic() && right.is_basic()),
        existential => existential_over_basic(existential),
    };
    let superclass_ok = axiom.superclass.is_basic() || existential_over_basic(&axiom.superclass);
    let no_compound_into_existential =
        !(axiom.superclass.is_existential() && (axiom.subclass.is_intersection() || axiom.subclass.is_existential()));

    subclass_ok && superclass_ok && no_compound_into_existential
}
