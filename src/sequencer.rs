//! Step sequencing
//!
//! Decides where the wizard goes next. Owners walk every step; finders jump
//! from the account step straight to completion.
//!
//! # Step Flow
//!
//! ```text
//! boarding_owner:  1 -> 2 -> 3 -> 4 -> 5 -> 6 -> 7
//! boarding_finder: 1 -> 2 ---------------------> 7
//! ```
//!
//! All transitions are pure and total. Moving past either end is a no-op and
//! an out-of-range jump target is ignored; nothing here returns an error.
//! `retreat` and `jump_to` are not role-aware: stepping back from 7 as a
//! finder lands on step 6. That case is left as is and reported by the
//! session (see [`crate::wizard::SignupWizard::prev_step`]).

use crate::state::WizardState;
use crate::types::{Step, UserType};

/// Transition functions over [`WizardState`]
#[derive(Debug, Clone, Copy, Default)]
pub struct StepSequencer;

impl StepSequencer {
    /// Step that follows `step` for `role`, or `None` at the terminal step
    pub const fn next_step(step: Step, role: UserType) -> Option<Step> {
        match (role, step) {
            (UserType::BoardingFinder, Step::Account) => Some(Step::Complete),
            _ => step.following(),
        }
    }

    /// Step before `step`, or `None` at the first step
    pub const fn previous_step(step: Step) -> Option<Step> {
        step.preceding()
    }

    /// Move forward one step, applying the finder skip rule
    pub fn advance(state: &WizardState) -> WizardState {
        match Self::next_step(state.current_step(), state.user_type()) {
            Some(next) => state.with_step(next),
            None => state.clone(),
        }
    }

    /// Move back one step
    pub fn retreat(state: &WizardState) -> WizardState {
        match Self::previous_step(state.current_step()) {
            Some(previous) => state.with_step(previous),
            None => state.clone(),
        }
    }

    /// Go to step number `target` regardless of role. Targets outside
    /// `1..=7` leave the snapshot unchanged.
    pub fn jump_to(state: &WizardState, target: i64) -> WizardState {
        match u8::try_from(target).ok().and_then(Step::from_number) {
            Some(step) => state.with_step(step),
            None => state.clone(),
        }
    }

    /// Steps reachable by forward navigation for `role`
    pub fn reachable_steps(role: UserType) -> Vec<Step> {
        let mut steps = vec![Step::FIRST];
        if !role.is_set() {
            return steps;
        }

        let mut current = Step::FIRST;
        while let Some(next) = Self::next_step(current, role) {
            steps.push(next);
            current = next;
        }
        steps
    }

    /// Number of forward moves from the first step to completion for `role`
    pub fn path_length(role: UserType) -> usize {
        Self::reachable_steps(role).len().saturating_sub(1)
    }
}
