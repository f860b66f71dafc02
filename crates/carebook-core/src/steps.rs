//! The five form steps and the controller that moves between them.
//!
//! Forward moves are gated on the current step being complete; backward
//! moves are always allowed. Out-of-range moves are no-ops, never errors.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Step {
    #[default]
    Person,
    Child,
    Notes,
    Payment,
    Offerings,
}

impl Step {
    pub const ALL: [Step; 5] = [Step::Person, Step::Child, Step::Notes, Step::Payment, Step::Offerings];

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn next(&self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    pub fn prev(&self) -> Option<Self> {
        self.index().checked_sub(1).and_then(Self::from_index)
    }

    pub fn is_last(&self) -> bool {
        self.next().is_none()
    }

    pub fn title_key(&self) -> &'static str {
        match self {
            Step::Person => "steps.person",
            Step::Child => "steps.child",
            Step::Notes => "steps.notes",
            Step::Payment => "steps.payment",
            Step::Offerings => "steps.offerings",
        }
    }
}

/// Answers whether a step's required fields are satisfied.
pub trait StepGate {
    fn is_satisfied(&self, step: Step) -> bool;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepController {
    current: Step,
}

impl StepController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Step {
        self.current
    }

    pub fn can_advance(&self, gate: &impl StepGate) -> bool {
        self.current.next().is_some() && gate.is_satisfied(self.current)
    }

    /// Move one step forward if the current step is satisfied. Returns
    /// whether the step changed.
    pub fn advance(&mut self, gate: &impl StepGate) -> bool {
        if !self.can_advance(gate) {
            debug!(step = ?self.current, "Advance blocked");
            return false;
        }
        if let Some(next) = self.current.next() {
            info!(from = ?self.current, to = ?next, "Advancing step");
            self.current = next;
        }
        true
    }

    /// Move one step back. Returns whether the step changed.
    pub fn retreat(&mut self) -> bool {
        match self.current.prev() {
            Some(prev) => {
                self.current = prev;
                true
            }
            None => false,
        }
    }

    /// On the last step with its own check satisfied.
    pub fn ready_to_submit(&self, gate: &impl StepGate) -> bool {
        self.current.is_last() && gate.is_satisfied(self.current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Gate(fn(Step) -> bool);

    impl StepGate for Gate {
        fn is_satisfied(&self, step: Step) -> bool {
            (self.0)(step)
        }
    }

    fn always(_: Step) -> bool {
        true
    }

    fn never(_: Step) -> bool {
        false
    }

    const OPEN: Gate = Gate(always);
    const CLOSED: Gate = Gate(never);

    fn at(step: Step) -> StepController {
        StepController { current: step }
    }

    #[test]
    fn test_step_index_roundtrip() {
        for step in Step::ALL {
            assert_eq!(Step::from_index(step.index()), Some(step));
        }
        assert_eq!(Step::from_index(5), None);
    }

    #[test]
    fn test_step_neighbours() {
        assert_eq!(Step::Person.prev(), None);
        assert_eq!(Step::Person.next(), Some(Step::Child));
        assert_eq!(Step::Offerings.next(), None);
        assert_eq!(Step::Offerings.prev(), Some(Step::Payment));
        assert!(Step::Offerings.is_last());
    }

    #[test]
    fn test_initial_step() {
        assert_eq!(StepController::new().current(), Step::Person);
    }

    #[test]
    fn test_advance_blocked_when_unsatisfied() {
        let mut steps = at(Step::Payment);
        assert!(!steps.advance(&CLOSED));
        assert_eq!(steps.current(), Step::Payment);
    }

    #[test]
    fn test_advance_when_satisfied() {
        let mut steps = at(Step::Payment);
        assert!(steps.advance(&OPEN));
        assert_eq!(steps.current(), Step::Offerings);
    }

    #[test]
    fn test_advance_only_checks_current_step() {
        fn person_only(step: Step) -> bool {
            step == Step::Person
        }
        let only_person = Gate(person_only);
        let mut steps = StepController::new();
        assert!(steps.advance(&only_person));
        assert!(!steps.advance(&only_person));
        assert_eq!(steps.current(), Step::Child);
    }

    #[test]
    fn test_advance_past_last_is_noop() {
        let mut steps = at(Step::Offerings);
        assert!(!steps.advance(&OPEN));
        assert_eq!(steps.current(), Step::Offerings);
    }

    #[test]
    fn test_retreat_bounds() {
        let mut steps = StepController::new();
        assert!(!steps.retreat());
        assert_eq!(steps.current(), Step::Person);

        let mut steps = at(Step::Notes);
        assert!(steps.retreat());
        assert_eq!(steps.current(), Step::Child);
    }

    #[test]
    fn test_ready_to_submit() {
        assert!(at(Step::Offerings).ready_to_submit(&OPEN));
        assert!(!at(Step::Offerings).ready_to_submit(&CLOSED));
        assert!(!at(Step::Payment).ready_to_submit(&OPEN));
    }
}
