//! 概念式ビルダー

use crate::model::{Concept, ConceptInclusion, Individual, Iri, Role};

/// Builds expressions whose names resolve against a base IRI as `{base}#{name}`
#[derive(Debug, Clone)]
pub struct ExpressionFactory {
    base: Iri,
}

impl ExpressionFactory {
    pub fn new(base: Iri) -> Self {
        Self { base }
    }

    pub fn iri(&self, name: &str) -> Iri {
        Iri::new(format!("{}#{}", self.base, name))
    }

    pub fn class(&self, name: &str) -> Concept {
        Concept::Named(self.iri(name))
    }

    pub fn role(&self, name: &str) -> Role {
        Role(self.iri(name))
    }

    pub fn individual(&self, name: &str) -> Individual {
        Individual(self.iri(name))
    }

    pub fn one_of(&self, names: &[&str]) -> Concept {
        Concept::nominal(names.iter().map(|name| self.individual(name)))
    }

    pub fn intersection_of<I>(&self, operands: I) -> Concept
    where
        I: IntoIterator<Item = Concept>,
    {
        Concept::intersection_of(operands)
    }

    pub fn some_values_from(&self, role: &str, filler: Concept) -> Concept {
        Concept::existential(self.role(role), filler)
    }

    pub fn subclass_of(&self, subclass: Concept, superclass: Concept) -> ConceptInclusion {
        ConceptInclusion::new(subclass, superclass)
    }

    pub fn thing(&self) -> Concept {
        Concept::top()
    }

    pub fn nothing(&self) -> Concept {
        Concept::bottom()
    }
}
