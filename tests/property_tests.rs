//! Property-Based Tests for the Signup Wizard
//!
//! Uses proptest for testing invariants over arbitrary navigation sequences.
//!
//! These tests verify:
//! - The step never leaves 1..=7 whatever the navigation
//! - Forward navigation keeps finders on steps 1, 2 and 7
//! - Owners advance one step at a time
//! - Successive updates accumulate fields
//! - Save → load returns the same snapshot

use proptest::prelude::*;

use signup_wizard::{
    FormDataPatch, FormField, KeyValueAdapter, MemoryStore, PersistenceAdapter, SignupWizard,
    Step, StepSequencer, UserType, WizardState,
};

#[derive(Debug, Clone)]
enum Nav {
    Next,
    Prev,
    Goto(i64),
}

fn role_strategy() -> impl Strategy<Value = UserType> {
    prop_oneof![
        Just(UserType::Unset),
        Just(UserType::BoardingFinder),
        Just(UserType::BoardingOwner),
    ]
}

fn step_strategy() -> impl Strategy<Value = Step> {
    (1u8..=7).prop_map(|n| Step::from_number(n).expect("in range"))
}

fn nav_strategy() -> impl Strategy<Value = Nav> {
    prop_oneof![
        Just(Nav::Next),
        Just(Nav::Prev),
        (-3i64..12).prop_map(Nav::Goto),
        prop_oneof![Just(i64::MIN), Just(i64::MAX), Just(-1i64)].prop_map(Nav::Goto),
        any::<i64>().prop_map(Nav::Goto),
    ]
}

/// Text fields that can be set with `with_text`
fn text_field_strategy() -> impl Strategy<Value = FormField> {
    prop_oneof![
        Just(FormField::FullName),
        Just(FormField::Email),
        Just(FormField::Password),
        Just(FormField::ConfirmPassword),
        Just(FormField::Username),
        Just(FormField::Description),
        Just(FormField::Phone),
        Just(FormField::Country),
        Just(FormField::District),
        Just(FormField::Division),
        Just(FormField::PostalCode),
        Just(FormField::IdNumber),
    ]
}

fn snapshot(role: UserType, step: Step) -> WizardState {
    WizardState::initial()
        .with_form_data(&FormDataPatch::new().with_user_type(role))
        .with_step(step)
}

proptest! {
    /// Any navigation sequence keeps the step in range
    #[test]
    fn step_stays_in_range(
        role in role_strategy(),
        start in step_strategy(),
        navs in proptest::collection::vec(nav_strategy(), 0..40),
    ) {
        let mut state = snapshot(role, start);
        for nav in navs {
            state = match nav {
                Nav::Next => StepSequencer::advance(&state),
                Nav::Prev => StepSequencer::retreat(&state),
                Nav::Goto(n) => StepSequencer::jump_to(&state, n),
            };
            let n = state.current_step().number();
            prop_assert!((1..=7).contains(&n));
        }
    }

    /// A jump to a number outside 1..=7 leaves the snapshot untouched
    #[test]
    fn out_of_range_jump_is_ignored(
        role in role_strategy(),
        start in step_strategy(),
        target in any::<i64>().prop_filter("outside 1..=7", |n| !(1..=7).contains(n)),
    ) {
        let state = snapshot(role, start);
        prop_assert_eq!(StepSequencer::jump_to(&state, target), state);
    }

    /// Advancing alone never takes a finder onto an owner-only step
    #[test]
    fn finder_forward_path_stays_allowed(advances in 0usize..20) {
        let mut state = snapshot(UserType::BoardingFinder, Step::RoleSelection);
        for _ in 0..advances {
            state = StepSequencer::advance(&state);
            prop_assert!(state.is_consistent());
        }
    }

    /// Owners advance by exactly one below the last step
    #[test]
    fn owner_advances_by_one(k in 1u8..=6) {
        let start = Step::from_number(k).expect("in range");
        let next = StepSequencer::advance(&snapshot(UserType::BoardingOwner, start));
        prop_assert_eq!(next.current_step().number(), k + 1);
    }

    /// Later updates keep fields set by earlier ones
    #[test]
    fn updates_accumulate(
        first in text_field_strategy(),
        second in text_field_strategy(),
        a in "[a-zA-Z0-9 @.]{0,24}",
        b in "[a-zA-Z0-9 @.]{0,24}",
    ) {
        prop_assume!(first != second);
        let state = WizardState::initial()
            .with_form_data(&FormDataPatch::new().with_text(first, a.clone()))
            .with_form_data(&FormDataPatch::new().with_text(second, b.clone()));

        prop_assert_eq!(state.form_data().value(first), Some(a.as_str()));
        prop_assert_eq!(state.form_data().value(second), Some(b.as_str()));
        prop_assert_eq!(state.current_step(), Step::RoleSelection);
    }

    /// What was saved is what is loaded
    #[test]
    fn save_load_round_trip(
        role in role_strategy(),
        step in step_strategy(),
        field in text_field_strategy(),
        value in "\\PC{0,32}",
    ) {
        let state = snapshot(role, step)
            .with_form_data(&FormDataPatch::new().with_text(field, value));
        let mut adapter = KeyValueAdapter::new(MemoryStore::new());
        adapter.save(&state).expect("memory save");
        prop_assert_eq!(adapter.load().expect("memory load"), Some(state));
    }

    /// The session writes its final snapshot through the adapter
    #[test]
    fn session_store_matches_session_state(
        role in role_strategy(),
        navs in proptest::collection::vec(nav_strategy(), 1..20),
    ) {
        let mut wizard = SignupWizard::initialize(KeyValueAdapter::new(MemoryStore::new()));
        wizard.update_form_data(
            &FormDataPatch::new()
                .with_user_type(role)
                .with_text(FormField::Email, "a@b.com"),
        );
        for nav in navs {
            match nav {
                Nav::Next => { wizard.next_step(); }
                Nav::Prev => { wizard.prev_step(); }
                Nav::Goto(n) => { wizard.go_to_step(n); }
            }
        }
        let expected = wizard.snapshot().clone();
        prop_assert_eq!(wizard.adapter().load().expect("memory load"), Some(expected));
    }
}
