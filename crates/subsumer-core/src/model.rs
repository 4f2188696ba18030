//! EL++ 概念式データモデル

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::fmt;

/// owl:Thing (⊤)
pub const OWL_THING: &str = "http://www.w3.org/2002/07/owl#Thing";
/// owl:Nothing (⊥)
pub const OWL_NOTHING: &str = "http://www.w3.org/2002/07/owl#Nothing";

/// IRI wrapper for type safety
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Iri(pub String);

impl Iri {
    pub fn new<S: Into<String>>(s: S) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Iri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Object property
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Role(pub Iri);

impl Role {
    pub fn new<S: Into<String>>(s: S) -> Self {
        Self(Iri::new(s))
    }

    pub fn iri(&self) -> &Iri {
        &self.0
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", short_name(&self.0))
    }
}

/// Named individual
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Individual(pub Iri);

impl Individual {
    pub fn new<S: Into<String>>(s: S) -> Self {
        Self(Iri::new(s))
    }

    pub fn iri(&self) -> &Iri {
        &self.0
    }
}

impl fmt::Display for Individual {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", short_name(&self.0))
    }
}

/// Operands of an intersection.
///
/// Always holds at least two operands, flattened (no operand is itself an
/// intersection), sorted and free of duplicates, so two conjunctions over the
/// same operands compare equal regardless of the order they were written in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "Vec<Concept>", into = "Vec<Concept>")]
pub struct Conjunction(Vec<Concept>);

impl Conjunction {
    /// Build a conjunction, returning `None` when fewer than two distinct
    /// operands remain after flattening.
    pub fn new<I>(operands: I) -> Option<Self>
    where
        I: IntoIterator<Item = Concept>,
    {
        let mut flat = Vec::new();
        for operand in operands {
            match operand {
                Concept::Intersection(Conjunction(inner)) => flat.extend(inner),
                other => flat.push(other),
            }
        }
        flat.sort();
        flat.dedup();

        if flat.len() < 2 {
            None
        } else {
            Some(Self(flat))
        }
    }

    pub fn operands(&self) -> &[Concept] {
        &self.0
    }

    /// The two operands of a binary conjunction
    pub fn as_pair(&self) -> Option<(&Concept, &Concept)> {
        match self.0.as_slice() {
            [left, right] => Some((left, right)),
            _ => None,
        }
    }
}

impl TryFrom<Vec<Concept>> for Conjunction {
    type Error = String;

    fn try_from(operands: Vec<Concept>) -> Result<Self, Self::Error> {
        let count = operands.len();
        Conjunction::new(operands)
            .ok_or_else(|| format!("intersection needs at least two distinct operands, got {}", count))
    }
}

impl From<Conjunction> for Vec<Concept> {
    fn from(conjunction: Conjunction) -> Self {
        conjunction.0
    }
}

/// Concept expression
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Concept {
    /// Atomic concept, including owl:Thing and owl:Nothing
    Named(Iri),

    /// Enumeration of individuals: {i1, ..., in}
    Nominal(BTreeSet<Individual>),

    /// Intersection: C1 ⊓ ... ⊓ Cn
    Intersection(Conjunction),

    /// Existential restriction: ∃R.C
    Existential { role: Role, filler: Box<Concept> },
}

impl Concept {
    pub fn named<S: Into<String>>(iri: S) -> Self {
        Concept::Named(Iri::new(iri))
    }

    pub fn top() -> Self {
        Concept::named(OWL_THING)
    }

    pub fn bottom() -> Self {
        Concept::named(OWL_NOTHING)
    }

    pub fn nominal<I>(individuals: I) -> Self
    where
        I: IntoIterator<Item = Individual>,
    {
        Concept::Nominal(individuals.into_iter().collect())
    }

    /// Intersection of the given operands.
    ///
    /// A single distinct operand is returned as is, an empty list is ⊤.
    pub fn intersection_of<I>(operands: I) -> Self
    where
        I: IntoIterator<Item = Concept>,
    {
        let operands: Vec<Concept> = operands.into_iter().collect();
        match Conjunction::new(operands.iter().cloned()) {
            Some(conjunction) => Concept::Intersection(conjunction),
            None => operands.into_iter().next().unwrap_or_else(Concept::top),
        }
    }

    pub fn existential(role: Role, filler: Concept) -> Self {
        Concept::Existential {
            role,
            filler: Box::new(filler),
        }
    }

    pub fn is_top(&self) -> bool {
        matches!(self, Concept::Named(iri) if iri.as_str() == OWL_THING)
    }

    pub fn is_bottom(&self) -> bool {
        matches!(self, Concept::Named(iri) if iri.as_str() == OWL_NOTHING)
    }

    pub fn is_named(&self) -> bool {
        matches!(self, Concept::Named(_))
    }

    pub fn is_nominal(&self) -> bool {
        matches!(self, Concept::Nominal(_))
    }

    pub fn is_intersection(&self) -> bool {
        matches!(self, Concept::Intersection(_))
    }

    pub fn is_existential(&self) -> bool {
        matches!(self, Concept::Existential { .. })
    }

    /// Named concept or nominal: the shapes allowed as existential fillers
    /// and intersection operands in normal form.
    pub fn is_basic(&self) -> bool {
        matches!(self, Concept::Named(_) | Concept::Nominal(_))
    }

    /// ⊥ anywhere in the nested structure, this expression included
    pub fn contains_bottom(&self) -> bool {
        match self {
            Concept::Named(_) => self.is_bottom(),
            Concept::Nominal(_) => false,
            Concept::Intersection(conjunction) => {
                conjunction.operands().iter().any(Concept::contains_bottom)
            }
            Concept::Existential { filler, .. } => filler.contains_bottom(),
        }
    }

    /// Every IRI this expression mentions (classes, roles and individuals)
    pub fn signature(&self) -> HashSet<Iri> {
        let mut signature = HashSet::new();
        self.collect_signature(&mut signature);
        signature
    }

    pub(crate) fn collect_signature(&self, signature: &mut HashSet<Iri>) {
        match self {
            Concept::Named(iri) => {
                signature.insert(iri.clone());
            }
            Concept::Nominal(individuals) => {
                signature.extend(individuals.iter().map(|i| i.0.clone()));
            }
            Concept::Intersection(conjunction) => {
                for operand in conjunction.operands() {
                    operand.collect_signature(signature);
                }
            }
            Concept::Existential { role, filler } => {
                signature.insert(role.0.clone());
                filler.collect_signature(signature);
            }
        }
    }

    /// Copy in which every named concept mapped by `rename` is replaced
    pub fn rename_named<F>(&self, rename: &F) -> Concept
    where
        F: Fn(&Iri) -> Option<Iri>,
    {
        match self {
            Concept::Named(iri) => rename(iri).map_or_else(|| self.clone(), Concept::Named),
            Concept::Nominal(_) => self.clone(),
            Concept::Intersection(conjunction) => Concept::intersection_of(
                conjunction.operands().iter().map(|operand| operand.rename_named(rename)),
            ),
            Concept::Existential { role, filler } => {
                Concept::existential(role.clone(), filler.rename_named(rename))
            }
        }
    }
}

impl fmt::Display for Concept {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            _ if self.is_top() => write!(f, "⊤"),
            _ if self.is_bottom() => write!(f, "⊥"),
            Concept::Named(iri) => write!(f, "{}", short_name(iri)),
            Concept::Nominal(individuals) => write!(f, "{{{}}}", individuals.iter().join(", ")),
            Concept::Intersection(conjunction) => {
                let operands = conjunction.operands().iter().map(|operand| match operand {
                    Concept::Existential { .. } => format!("({})", operand),
                    _ => operand.to_string(),
                });
                write!(f, "{}", operands.format(" ⊓ "))
            }
            Concept::Existential { role, filler } => match filler.as_ref() {
                Concept::Intersection(_) => write!(f, "∃{}.({})", role, filler),
                _ => write!(f, "∃{}.{}", role, filler),
            },
        }
    }
}

/// SubClassOf(C D): C ⊑ D
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct ConceptInclusion {
    pub subclass: Concept,
    pub superclass: Concept,
}

impl ConceptInclusion {
    pub fn new(subclass: Concept, superclass: Concept) -> Self {
        Self {
            subclass,
            superclass,
        }
    }

    pub fn signature(&self) -> HashSet<Iri> {
        let mut signature = HashSet::new();
        self.subclass.collect_signature(&mut signature);
        self.superclass.collect_signature(&mut signature);
        signature
    }
}

impl fmt::Display for ConceptInclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ⊑ {}", self.subclass, self.superclass)
    }
}

/// Local part of an IRI for display: the fragment, else the last path segment.
fn short_name(iri: &Iri) -> &str {
    let s = iri.as_str();
    s.rsplit(['#', '/'])
        .next()
        .filter(|local| !local.is_empty())
        .unwrap_or(s)
}
