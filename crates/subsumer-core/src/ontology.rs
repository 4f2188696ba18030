//! TBox コンテナ

use crate::model::{ConceptInclusion, Iri};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Whether axioms of imported ontologies take part in reasoning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Imports {
    /// Only the axioms asserted in the ontology itself
    #[default]
    Excluded,
    /// Asserted axioms plus those of every (transitively) imported ontology
    Included,
}

/// Ontology holding a TBox of concept inclusions
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ontology {
    /// Ontology IRI
    pub iri: Option<Iri>,

    /// Concept inclusions asserted in this ontology
    pub axioms: Vec<ConceptInclusion>,

    /// Imported ontologies
    pub imports: Vec<Ontology>,
}

impl Ontology {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_iri(iri: Iri) -> Self {
        Self {
            iri: Some(iri),
            ..Self::default()
        }
    }

    pub fn add_axiom(&mut self, axiom: ConceptInclusion) {
        self.axioms.push(axiom);
    }

    pub fn add_import(&mut self, ontology: Ontology) {
        self.imports.push(ontology);
    }

    /// Concept inclusions to reason over
    pub fn tbox(&self, imports: Imports) -> Vec<&ConceptInclusion> {
        let mut tbox: Vec<&ConceptInclusion> = self.axioms.iter().collect();
        if imports == Imports::Included {
            for imported in &self.imports {
                tbox.extend(imported.tbox(Imports::Included));
            }
        }
        tbox
    }

    /// Every IRI mentioned by the axioms here or in any import.
    ///
    /// Read from the axioms on each call, so it holds however they were added.
    pub fn signature(&self) -> HashSet<Iri> {
        self.tbox(Imports::Included)
            .into_iter()
            .flat_map(ConceptInclusion::signature)
            .collect()
    }
}

impl FromIterator<ConceptInclusion> for Ontology {
    fn from_iter<T: IntoIterator<Item = ConceptInclusion>>(iter: T) -> Self {
        let mut ontology = Ontology::new();
        for axiom in iter {
            ontology.add_axiom(axiom);
        }
        ontology
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Concept, Individual, Role};

    fn class(name: &str) -> Concept {
        Concept::named(format!("http://example.org/football#{}", name))
    }

    fn squadra_axiom() -> ConceptInclusion {
        ConceptInclusion::new(
            class("Squadra"),
            Concept::existential(
                Role::new("http://example.org/football#haCapitano"),
                Concept::nominal(vec![Individual::new("http://example.org/football#totti")]),
            ),
        )
    }

    #[test]
    fn test_ontology_creation() {
        let ontology = Ontology::new();
        assert!(ontology.iri.is_none());
        assert!(ontology.axioms.is_empty());
        assert!(ontology.signature().is_empty());
    }

    #[test]
    fn test_signature_covers_classes_roles_and_individuals() {
        let mut ontology = Ontology::with_iri(Iri::new("http://example.org/football"));
        ontology.add_axiom(squadra_axiom());

        let signature = ontology.signature();
        assert_eq!(ontology.axioms.len(), 1);
        assert_eq!(signature.len(), 3);
        assert!(signature.contains(&Iri::new("http://example.org/football#Squadra")));
        assert!(signature.contains(&Iri::new("http://example.org/football#haCapitano")));
        assert!(signature.contains(&Iri::new("http://example.org/football#totti")));
    }

    #[test]
    fn test_signature_ignores_how_axioms_were_added() {
        let literal = Ontology {
            axioms: vec![squadra_axiom()],
            ..Default::default()
        };
        let mut pushed = Ontology::new();
        pushed.axioms.push(squadra_axiom());
        let json = r#"{"iri": null, "axioms": [], "imports": []}"#;
        let mut deserialized: Ontology = serde_json::from_str(json).unwrap();
        deserialized.axioms.push(squadra_axiom());

        let expected: Ontology = vec![squadra_axiom()].into_iter().collect();
        assert_eq!(literal.signature(), expected.signature());
        assert_eq!(pushed.signature(), expected.signature());
        assert_eq!(deserialized.signature(), expected.signature());
    }

    #[test]
    fn test_tbox_imports() {
        let mut imported = Ontology::new();
        imported.add_axiom(ConceptInclusion::new(class("Persona"), class("Essere")));

        let mut ontology: Ontology =
            vec![ConceptInclusion::new(class("Coach"), class("Persona"))].into_iter().collect();
        ontology.add_import(imported);

        assert_eq!(ontology.tbox(Imports::Excluded).len(), 1);
        assert_eq!(ontology.tbox(Imports::Included).len(), 2);
        assert!(ontology
            .signature()
            .contains(&Iri::new("http://example.org/football#Essere")));
    }
}
