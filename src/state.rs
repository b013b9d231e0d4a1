//! Wizard snapshot
//!
//! `WizardState` is the pair (current step, form data). It is a plain value:
//! every operation returns a new snapshot and leaves persistence to the
//! session that owns it (see [`crate::wizard::SignupWizard`]).
//!
//! # Invariants
//!
//! - While the role is `boarding_finder`, the step is one of 1, 2 or 7
//! - While the role is unset, the step is 1
//! - The step is always within 1..=7 (guaranteed by the `Step` type)
//!
//! The first two are upheld by forward navigation but are not enforced on
//! restore or by `retreat`/`jump_to`. [`WizardState::violations`] reports them
//! for diagnostics.

use std::fmt;

use crate::form_data::{FormData, FormDataPatch};
use crate::types::{Step, UserType};

/// A role/step combination the signup flow never produces going forward
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvariantViolation {
    /// A boarding finder sits on one of the owner-only steps 3..=6
    FinderOnOwnerStep(Step),
    /// No role chosen but the session is past the first step
    UnsetRolePastFirstStep(Step),
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FinderOnOwnerStep(step) => write!(
                f,
                "boarding_finder is on owner-only step {} ({})",
                step.number(),
                step
            ),
            Self::UnsetRolePastFirstStep(step) => write!(
                f,
                "no role selected but session is on step {} ({})",
                step.number(),
                step
            ),
        }
    }
}

/// Canonical wizard snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WizardState {
    current_step: Step,
    form_data: FormData,
}

impl WizardState {
    /// Fresh snapshot: step 1, every field empty
    pub fn initial() -> Self {
        Self::default()
    }

    /// Build a snapshot from its parts, as restored from a store.
    ///
    /// Does not check the role/step invariants.
    pub fn from_parts(current_step: Step, form_data: FormData) -> Self {
        Self {
            current_step,
            form_data,
        }
    }

    #[inline]
    pub fn current_step(&self) -> Step {
        self.current_step
    }

    #[inline]
    pub fn form_data(&self) -> &FormData {
        &self.form_data
    }

    #[inline]
    pub fn user_type(&self) -> UserType {
        self.form_data.user_type
    }

    /// Snapshot with `patch` overlaid onto the form data. The step is untouched.
    pub fn with_form_data(&self, patch: &FormDataPatch) -> Self {
        Self {
            current_step: self.current_step,
            form_data: self.form_data.merge(patch),
        }
    }

    /// Snapshot on `step` with the same form data
    pub fn with_step(&self, step: Step) -> Self {
        Self {
            current_step: step,
            form_data: self.form_data.clone(),
        }
    }

    /// Returns true once the terminal step has been reached
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.current_step.is_terminal()
    }

    /// Role/step combinations that break the flow's invariants
    pub fn violations(&self) -> Vec<InvariantViolation> {
        let step = self.current_step;
        let mut found = Vec::new();

        match self.user_type() {
            UserType::BoardingFinder if step.is_owner_only() => {
                found.push(InvariantViolation::FinderOnOwnerStep(step));
            }
            UserType::Unset if step != Step::FIRST => {
                found.push(InvariantViolation::UnsetRolePastFirstStep(step));
            }
            _ => {}
        }

        found
    }

    /// Returns true if no invariant is violated
    pub fn is_consistent(&self) -> bool {
        self.violations().is_empty()
    }
}
