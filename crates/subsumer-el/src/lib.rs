//! EL++ 包摂推論エンジン
//!
//! このクレートは完備化規則に基づく包摂判定を提供します:
//! - ⊥ の出現位置検証
//! - 二項正規形への正規化
//! - 概念/ロールマップ S, R の初期化
//! - 完備化規則 CR1〜CR6 の不動点計算
//! - 仮想概念を用いた包摂クエリ

pub mod config;
pub mod guard;
pub mod normalizer;
pub mod mapping;
pub mod completion;
pub mod reasoner;

pub use config::ReasonerConfig;
pub use guard::BottomPosition;
pub use normalizer::{Normalizer, TempConcepts};
pub use mapping::{initialize, CompletionState};
pub use completion::{saturate, CompletionEngine, SaturationStats};
pub use reasoner::ElReasoner;

// Re-export model types used throughout the public API
pub use subsumer_core::{Concept, ConceptInclusion, ExpressionFactory, Imports, Individual, Iri, Ontology, Role};

// Error types
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ElError {
    #[error("Invalid axiom {axiom}: bottom concept found in {position}")]
    InvalidAxiom {
        axiom: ConceptInclusion,
        position: BottomPosition,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}
