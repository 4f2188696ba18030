//! EL++ 概念式モデル
//!
//! このクレートは推論エンジンが扱うデータを提供します:
//! - 概念式 (名前付き概念, ノミナル, 交差, 存在制限)
//! - 概念包含公理と TBox コンテナ
//! - IRI ベースの概念式ビルダー

pub mod model;
pub mod ontology;
pub mod factory;

pub use model::{Concept, ConceptInclusion, Conjunction, Individual, Iri, Role, OWL_NOTHING, OWL_THING};
pub use ontology::{Imports, Ontology};
pub use factory::ExpressionFactory;
