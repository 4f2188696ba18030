//! ⊥ の出現位置検証

use crate::ElError;
use std::fmt;
use subsumer_core::ConceptInclusion;

/// Where a disallowed ⊥ was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BottomPosition {
    /// Anywhere in the subclass, including a bare ⊥
    Subclass,
    /// Nested inside a compound superclass
    NestedSuperclass,
}

impl fmt::Display for BottomPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BottomPosition::Subclass => write!(f, "subclass position"),
            BottomPosition::NestedSuperclass => write!(f, "nested superclass position"),
        }
    }
}

/// Reject ⊥ in the subclass or nested in a non-atomic superclass.
///
/// A bare `C ⊑ ⊥` states that C is unsatisfiable and is accepted.
pub fn validate(axiom: &ConceptInclusion) -> Result<(), ElError> {
    if axiom.subclass.contains_bottom() {
        return Err(invalid(axiom, BottomPosition::Subclass));
    }
    if !axiom.superclass.is_named() && axiom.superclass.contains_bottom() {
        return Err(invalid(axiom, BottomPosition::NestedSuperclass));
    }
    Ok(())
}

/// Validate every axiom, stopping at the first violation
pub fn validate_all<'a, I>(axioms: I) -> Result<(), ElError>
where
    I: IntoIterator<Item = &'a ConceptInclusion>,
{
    axioms.into_iter().try_for_each(validate)
}

fn invalid(axiom: &ConceptInclusion, position: BottomPosition) -> ElError {
    ElError::InvalidAxiom {
        axiom: axiom.clone(),
        position,
    }
}
