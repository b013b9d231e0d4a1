//! Signup Wizard Library
//!
//! This library provides the resumable, role-aware signup flow of the rental
//! marketplace: the wizard snapshot, the step sequencer and the persistence
//! port the snapshot is written through.

pub mod cli;
pub mod config;
pub mod error;
pub mod form_data;
pub mod persistence;
pub mod sequencer;
pub mod state;
pub mod types;
pub mod wizard;

// Re-export main types for convenience
pub use config::WizardConfig;
pub use error::{Result, WizardError};
pub use form_data::{FileHandle, FormData, FormDataPatch, FormField};
pub use persistence::{
    EntryKeys, FileStore, KeyValueAdapter, KeyValueStore, MemoryStore, PersistenceAdapter,
};
pub use sequencer::StepSequencer;
pub use state::{InvariantViolation, WizardState};
pub use types::{Step, UserType};
pub use wizard::SignupWizard;
