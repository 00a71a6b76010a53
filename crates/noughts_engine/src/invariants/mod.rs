//! First-class invariants for the snapshot history.
//!
//! Invariants are logical properties that must hold after every append.
//! The session controller checks them in debug builds; tests check them
//! directly.

mod alternating_marks;
mod single_step;

pub use alternating_marks::AlternatingMarksInvariant;
pub use single_step::SingleStepInvariant;

/// A property of `S` that every reachable state satisfies.
pub trait Invariant<S> {
    /// True if the property holds for `state`.
    fn holds(state: &S) -> bool;

    /// One-line statement of the property.
    fn description() -> &'static str;
}

/// A failed invariant, named by its description.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
#[display("Invariant violated: {}", description)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a violation for the invariant described by `description`.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// Invariants checked as a group.
pub trait InvariantSet<S> {
    /// Checks every member, collecting all failures rather than stopping
    /// at the first.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

impl<S, A, B> InvariantSet<S> for (A, B)
where
    A: Invariant<S>,
    B: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let checks: [(fn(&S) -> bool, &'static str); 2] = [
            (A::holds, A::description()),
            (B::holds, B::description()),
        ];
        let violations: Vec<_> = checks
            .into_iter()
            .filter(|(holds, _)| !holds(state))
            .map(|(_, description)| InvariantViolation::new(description))
            .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

/// All history invariants as a composable set.
pub type HistoryInvariants = (SingleStepInvariant, AlternatingMarksInvariant);
