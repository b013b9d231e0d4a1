//! Signup wizard session
//!
//! [`SignupWizard`] owns one [`WizardState`] and the [`PersistenceAdapter`]
//! it is written through. It is the only way the surrounding UI reads or
//! changes the snapshot.
//!
//! Every form update is followed by exactly one `save()` of the post-update
//! snapshot, even when the patch changes nothing. Navigation saves only when
//! the step moves: advancing on the last step, retreating on the first and an
//! out-of-range jump write nothing. Adapter failures are logged and otherwise
//! ignored so navigation can always proceed.

use tracing::{debug, info, warn};

use crate::form_data::{FormData, FormDataPatch};
use crate::persistence::PersistenceAdapter;
use crate::sequencer::StepSequencer;
use crate::state::WizardState;
use crate::types::{Step, UserType};

/// A single signup session
///
/// # Example
///
/// ```
/// use signup_wizard::{FormDataPatch, KeyValueAdapter, MemoryStore, SignupWizard, Step, UserType};
///
/// let mut wizard = SignupWizard::initialize(KeyValueAdapter::new(MemoryStore::new()));
/// wizard.update_form_data(&FormDataPatch::new().with_user_type(UserType::BoardingFinder));
///
/// assert_eq!(wizard.next_step(), Step::Account);
/// // Finders skip the owner-only steps
/// assert_eq!(wizard.next_step(), Step::Complete);
/// ```
#[derive(Debug)]
pub struct SignupWizard<P> {
    state: WizardState,
    adapter: P,
}

impl<P: PersistenceAdapter> SignupWizard<P> {
    /// Start a session, resuming from the adapter when it holds a snapshot.
    ///
    /// A snapshot that cannot be read back is reported and replaced by the
    /// default one. A restored snapshot is adopted verbatim, even if its role
    /// and step disagree.
    pub fn initialize(adapter: P) -> Self {
        let state = match adapter.load() {
            Ok(Some(restored)) => {
                info!(
                    "Resuming signup at step {} ({})",
                    restored.current_step().number(),
                    restored.current_step()
                );
                for violation in restored.violations() {
                    warn!("Restored signup snapshot is inconsistent: {}", violation);
                }
                restored
            }
            Ok(None) => {
                info!("Starting new signup session");
                WizardState::initial()
            }
            Err(e) => {
                warn!("Discarding unreadable signup snapshot: {}", e);
                WizardState::initial()
            }
        };

        Self { state, adapter }
    }

    #[inline]
    pub fn current_step(&self) -> Step {
        self.state.current_step()
    }

    #[inline]
    pub fn form_data(&self) -> &FormData {
        self.state.form_data()
    }

    #[inline]
    pub fn user_type(&self) -> UserType {
        self.state.user_type()
    }

    #[inline]
    pub fn snapshot(&self) -> &WizardState {
        &self.state
    }

    pub fn adapter(&self) -> &P {
        &self.adapter
    }

    pub fn into_adapter(self) -> P {
        self.adapter
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.state.is_complete()
    }

    /// Progress along the path for the current role (0-100).
    ///
    /// A step off the role's path is measured against the full seven steps.
    pub fn progress_percent(&self) -> u8 {
        let role = self.user_type();
        let path = StepSequencer::reachable_steps(role);
        let step = self.current_step();

        let (position, moves) = match path.iter().position(|s| *s == step) {
            Some(index) if path.len() > 1 => (index, path.len() - 1),
            _ => (
                usize::from(step.number() - 1),
                usize::from(Step::TOTAL_STEPS - 1),
            ),
        };

        // position <= moves, so this fits in a u8
        (position * 100 / moves) as u8
    }

    /// Overlay `patch` onto the form data. Never validates.
    ///
    /// Always saves, so a store left stale or unreadable is overwritten with
    /// the live snapshot.
    pub fn update_form_data(&mut self, patch: &FormDataPatch) -> &WizardState {
        debug!("Updating form fields: {:?}", patch.touched_fields());
        let next = self.state.with_form_data(patch);
        self.commit(next);
        &self.state
    }

    /// Advance one step; boarding finders skip from step 2 to step 7.
    pub fn next_step(&mut self) -> Step {
        let next = StepSequencer::advance(&self.state);
        self.transition(next);
        self.current_step()
    }

    /// Go back one step.
    ///
    /// Not role-aware: a boarding finder on step 7 goes back to step 6, an
    /// owner-only step. That move is kept and logged.
    pub fn prev_step(&mut self) -> Step {
        let previous = StepSequencer::retreat(&self.state);
        self.transition(previous);
        self.current_step()
    }

    /// Jump to step `n` without a role check; `n` outside 1..=7 is ignored.
    pub fn go_to_step(&mut self, n: i64) -> Step {
        let target = StepSequencer::jump_to(&self.state, n);
        if target == self.state {
            debug!("Ignoring jump to step {}", n);
        }
        self.transition(target);
        self.current_step()
    }

    /// Drop all progress and the saved snapshot, returning the fresh snapshot.
    pub fn reset(&mut self) -> &WizardState {
        info!("Resetting signup session");
        self.state = WizardState::initial();
        if let Err(e) = self.adapter.clear() {
            warn!("Failed to clear saved signup snapshot: {}", e);
        }
        &self.state
    }

    /// Commit a navigation result; a step that did not move writes nothing.
    fn transition(&mut self, next: WizardState) {
        if next == self.state {
            return;
        }
        debug!(
            "Signup step {} -> {}",
            self.state.current_step().number(),
            next.current_step().number()
        );
        self.commit(next);
    }

    fn commit(&mut self, next: WizardState) {
        for violation in next.violations() {
            warn!("Signup snapshot left the role's path: {}", violation);
        }

        self.state = next;
        if let Err(e) = self.adapter.save(&self.state) {
            warn!("Failed to save signup snapshot: {}", e);
        }
    }
}
