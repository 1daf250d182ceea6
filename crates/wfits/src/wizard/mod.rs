//! Multi-step wizard used by the upload slideshow and the onboarding form.
//!
//! A [`Wizard`] walks a fixed list of [`StepDescriptor`]s. Steps may attach
//! async hooks that veto leaving them; the last step hands the collected
//! step data to a [`CompletionHandler`]. Progress can be persisted through a
//! [`WizardStore`] and resumed by a later wizard using the same key.

pub mod controller;
pub mod error;
pub mod events;
pub mod persistence;
pub mod progress;
pub mod state;
pub mod step;

pub use controller::{
    CompletionMode, IgnoreReason, RefusalReason, StepPayload, Transition, Wizard, WizardBuilder,
};
pub use error::{PersistenceError, WizardError};
pub use events::{WizardEvent, WizardEvents};
pub use persistence::{MemoryStore, SqliteStore, WizardStore};
pub use progress::{Progress, StepMarker, StepProgress};
pub use state::{Phase, Snapshot, StepData, WizardState};
pub use step::{
    completion_fn, hook_fn, CompletionHandler, HookError, SkipHandler, StepDescriptor, StepHook,
};
