//! 包摂クエリ

use crate::completion::CompletionEngine;
use crate::config::ReasonerConfig;
use crate::guard;
use crate::mapping::initialize;
use crate::normalizer::{Normalizer, TempConcepts};
use crate::ElError;
use std::collections::{HashMap, HashSet};
use subsumer_core::{Concept, ConceptInclusion, Iri, Ontology};
use tracing::{debug, info};

/// EL++ subsumption reasoner over a fixed TBox.
///
/// The TBox is normalized once at construction. Each query adds two proxy
/// axioms `X ⊑ sub` and `super ⊑ Y` on top of it and saturates from scratch.
#[derive(Debug, Clone)]
pub struct ElReasoner {
    config: ReasonerConfig,
    normalizer: Normalizer,
    base: HashSet<ConceptInclusion>,
    signature: HashSet<Iri>,
}

impl ElReasoner {
    pub fn new(ontology: &Ontology) -> Result<Self, ElError> {
        Self::with_config(ontology, ReasonerConfig::default())
    }

    pub fn with_config(ontology: &Ontology, config: ReasonerConfig) -> Result<Self, ElError> {
        config.validate()?;

        let signature = ontology.signature();
        let mut temps = TempConcepts::new(config.temp_prefix.clone());
        temps.reserve(signature.iter().cloned());
        temps.reserve([Iri::new(config.sub_proxy.clone()), Iri::new(config.super_proxy.clone())]);

        let tbox = ontology.tbox(config.imports);
        let mut normalizer = Normalizer::new(temps);
        let base = normalizer.normalize(tbox.iter().copied())?;

        info!(
            "Reasoner ready: {} TBox axioms, {} normalized, {} temp concepts",
            tbox.len(),
            base.len(),
            normalizer.temps().issued()
        );

        Ok(Self {
            config,
            normalizer,
            base,
            signature,
        })
    }

    pub fn config(&self) -> &ReasonerConfig {
        &self.config
    }

    /// The normalized TBox every query starts from
    pub fn normalized_axioms(&self) -> &HashSet<ConceptInclusion> {
        &self.base
    }

    /// Decide whether `subclass ⊑ superclass` follows from the TBox.
    ///
    /// Fails with [`ElError::InvalidAxiom`] if ⊥ appears in `subclass` or
    /// nested in `superclass`. A bare ⊥ as `superclass` asks whether
    /// `subclass` is unsatisfiable.
    pub fn classify(&self, subclass: &Concept, superclass: &Concept) -> Result<bool, ElError> {
        let query = ConceptInclusion::new(subclass.clone(), superclass.clone());
        guard::validate(&query)?;

        let mut normalizer = self.normalizer.clone();
        let query_signature = query.signature();
        normalizer.temps_mut().reserve(query_signature.iter().cloned());

        // a query class spelled like a base temp is still a class of its own
        let mut renamed = HashMap::new();
        for iri in &query_signature {
            if normalizer.temps().is_issued(iri) {
                renamed.insert(iri.clone(), normalizer.temps_mut().fresh_iri());
            }
        }
        let (sub, sup) = if renamed.is_empty() {
            (query.subclass.clone(), query.superclass.clone())
        } else {
            debug!("Renaming {} query names that clash with temp concepts", renamed.len());
            let rename = |iri: &Iri| renamed.get(iri).cloned();
            (
                query.subclass.rename_named(&rename),
                query.superclass.rename_named(&rename),
            )
        };

        let x = self.proxy(&self.config.sub_proxy, &query_signature, &mut normalizer);
        let mut fictitious = vec![ConceptInclusion::new(x.clone(), sub)];
        let y = if sup.is_bottom() {
            Concept::bottom()
        } else {
            let y = self.proxy(&self.config.super_proxy, &query_signature, &mut normalizer);
            fictitious.push(ConceptInclusion::new(sup, y.clone()));
            y
        };

        let extra = normalizer.normalize(&fictitious)?;
        let axioms: Vec<&ConceptInclusion> = self.base.iter().chain(extra.iter()).collect();

        let mut state = initialize(axioms.iter().copied());
        let stats = CompletionEngine::new(axioms.iter().copied()).saturate(&mut state);
        let result = state.subsumes(&x, &y);

        debug!("{}: {} after {} rounds", query, result, stats.rounds);
        Ok(result)
    }

    /// [`classify`](Self::classify) with the query given as an axiom
    pub fn classify_axiom(&self, axiom: &ConceptInclusion) -> Result<bool, ElError> {
        self.classify(&axiom.subclass, &axiom.superclass)
    }

    /// The configured proxy, or a fresh temp if the name is already taken
    fn proxy(&self, name: &str, query_signature: &HashSet<Iri>, normalizer: &mut Normalizer) -> Concept {
        let iri = Iri::new(name);
        if self.signature.contains(&iri) || query_signature.contains(&iri) {
            debug!("Proxy {} clashes with the signature, using a temp concept", name);
            normalizer.temps_mut().fresh()
        } else {
            Concept::Named(iri)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BottomPosition;
    use subsumer_core::{ExpressionFactory, Imports};

    fn factory() -> ExpressionFactory {
        ExpressionFactory::new(Iri::new("http://example.org/football"))
    }

    fn reasoner(axioms: Vec<ConceptInclusion>) -> ElReasoner {
        let ontology: Ontology = axioms.into_iter().collect();
        ElReasoner::new(&ontology).unwrap()
    }

    #[test]
    fn test_told_and_reflexive_subsumption() {
        let of = factory();
        let r = reasoner(vec![of.subclass_of(of.class("Titolare"), of.class("Giocatore"))]);

        assert!(r.classify(&of.class("Titolare"), &of.class("Giocatore")).unwrap());
        assert!(r.classify(&of.class("Titolare"), &of.class("Titolare")).unwrap());
        assert!(!r.classify(&of.class("Giocatore"), &of.class("Titolare")).unwrap());
    }

    #[test]
    fn test_unknown_concepts() {
        let of = factory();
        let r = reasoner(vec![of.subclass_of(of.class("Titolare"), of.class("Giocatore"))]);

        assert!(!r.classify(&of.class("Arbitro"), &of.class("Giocatore")).unwrap());
        assert!(r.classify(&of.class("Arbitro"), &of.thing()).unwrap());
    }

    #[test]
    fn test_queries_leave_no_state_behind() {
        let of = factory();
        let r = reasoner(vec![of.subclass_of(of.class("Titolare"), of.class("Giocatore"))]);
        let before = r.normalized_axioms().clone();
        let sub = of.intersection_of(vec![of.class("Titolare"), of.class("Riserva"), of.class("Capitano")]);

        let first = r.classify(&sub, &of.class("Giocatore")).unwrap();
        let second = r.classify(&sub, &of.class("Giocatore")).unwrap();

        assert!(first);
        assert_eq!(first, second);
        assert_eq!(r.normalized_axioms(), &before);
    }

    #[test]
    fn test_bottom_queries() {
        let of = factory();
        let r = reasoner(vec![of.subclass_of(of.class("Fantasma"), of.nothing())]);

        assert!(r.classify(&of.class("Fantasma"), &of.nothing()).unwrap());
        assert!(!r.classify(&of.class("Giocatore"), &of.nothing()).unwrap());
        assert!(matches!(
            r.classify(&of.nothing(), &of.class("Giocatore")),
            Err(ElError::InvalidAxiom { position: BottomPosition::Subclass, .. })
        ));
        assert!(matches!(
            r.classify(&of.class("Giocatore"), &of.some_values_from("haCoach", of.nothing())),
            Err(ElError::InvalidAxiom { position: BottomPosition::NestedSuperclass, .. })
        ));
    }

    #[test]
    fn test_invalid_base_ontology() {
        let of = factory();
        let ontology: Ontology = vec![of.subclass_of(of.nothing(), of.class("Giocatore"))]
            .into_iter()
            .collect();

        assert!(matches!(ElReasoner::new(&ontology), Err(ElError::InvalidAxiom { .. })));
    }

    #[test]
    fn test_invalid_config() {
        let config = ReasonerConfig {
            temp_prefix: String::new(),
            ..ReasonerConfig::default()
        };
        assert!(matches!(
            ElReasoner::with_config(&Ontology::new(), config),
            Err(ElError::Config(_))
        ));
    }

    #[test]
    fn test_proxy_names_clashing_with_ontology() {
        let config = ReasonerConfig::default();
        let fit0 = Concept::named(config.sub_proxy.clone());
        let fit1 = Concept::named(config.super_proxy.clone());
        let giocatore = Concept::named("http://example.org/football#Giocatore");
        let ontology: Ontology = vec![ConceptInclusion::new(fit0.clone(), giocatore.clone())]
            .into_iter()
            .collect();
        let r = ElReasoner::with_config(&ontology, config).unwrap();

        assert!(r.classify(&fit0, &giocatore).unwrap());
        assert!(!r.classify(&giocatore, &fit0).unwrap());
        assert!(!r.classify(&fit1, &giocatore).unwrap());
        assert!(r.classify(&fit1, &fit1).unwrap());
    }

    #[test]
    fn test_imports_follow_config() {
        let of = factory();
        let mut imported = Ontology::new();
        imported.add_axiom(of.subclass_of(of.class("Coach"), of.class("Persona")));
        let mut ontology = Ontology::new();
        ontology.add_axiom(of.subclass_of(of.class("CapoAllenatore"), of.class("Coach")));
        ontology.add_import(imported);

        let excluded = ElReasoner::new(&ontology).unwrap();
        assert!(!excluded.classify(&of.class("CapoAllenatore"), &of.class("Persona")).unwrap());

        let config = ReasonerConfig {
            imports: Imports::Included,
            ..ReasonerConfig::default()
        };
        let included = ElReasoner::with_config(&ontology, config).unwrap();
        assert!(included.classify(&of.class("CapoAllenatore"), &of.class("Persona")).unwrap());
    }

    fn temp_collision_axioms() -> Vec<ConceptInclusion> {
        let of = factory();
        vec![
            ConceptInclusion::new(Concept::named("#TEMP0"), of.class("Z")),
            of.subclass_of(of.class("A"), of.intersection_of(vec![of.class("B"), of.class("C")])),
        ]
    }

    fn assert_temps_avoid_ontology_names(r: &ElReasoner) {
        let of = factory();
        assert!(!r.classify(&of.class("A"), &of.class("Z")).unwrap());
        assert!(r.classify(&of.class("A"), &of.class("B")).unwrap());
        assert!(r.classify(&Concept::named("#TEMP0"), &of.class("Z")).unwrap());
        assert!(!r
            .normalized_axioms()
            .iter()
            .any(|axiom| axiom.subclass == Concept::named("#TEMP0") && axiom.superclass != of.class("Z")));
    }

    #[test]
    fn test_temps_avoid_names_added_through_add_axiom() {
        let mut ontology = Ontology::new();
        for axiom in temp_collision_axioms() {
            ontology.add_axiom(axiom);
        }
        assert_temps_avoid_ontology_names(&ElReasoner::new(&ontology).unwrap());
    }

    #[test]
    fn test_temps_avoid_names_of_directly_built_ontologies() {
        let literal = Ontology {
            axioms: temp_collision_axioms(),
            ..Default::default()
        };
        assert_temps_avoid_ontology_names(&ElReasoner::new(&literal).unwrap());

        let mut imported = Ontology::new();
        imported.axioms.push(temp_collision_axioms().remove(0));
        let mut importing = Ontology::new();
        importing.axioms.push(temp_collision_axioms().remove(1));
        importing.imports.push(imported);
        let config = ReasonerConfig {
            imports: Imports::Included,
            ..ReasonerConfig::default()
        };
        assert_temps_avoid_ontology_names(&ElReasoner::with_config(&importing, config).unwrap());
    }

    #[test]
    fn test_query_names_spelled_like_base_temps() {
        let of = factory();
        let r = reasoner(vec![of.subclass_of(
            of.class("A"),
            of.intersection_of(vec![of.class("B"), of.class("C")]),
        )]);
        let temp0 = Concept::named("#TEMP0");

        assert!(r.normalized_axioms().iter().any(|axiom| axiom.subclass == temp0));
        assert!(!r.classify(&temp0, &of.class("B")).unwrap());
        assert!(!r.classify(&of.class("A"), &temp0).unwrap());
        assert!(r.classify(&temp0, &temp0).unwrap());
        assert!(r
            .classify(&of.intersection_of(vec![temp0.clone(), of.class("A")]), &of.class("B"))
            .unwrap());
    }

    #[test]
    fn test_classify_axiom() {
        let of = factory();
        let r = reasoner(vec![of.subclass_of(of.class("Titolare"), of.class("Giocatore"))]);

        assert!(r
            .classify_axiom(&of.subclass_of(of.class("Titolare"), of.class("Giocatore")))
            .unwrap());
    }
}
