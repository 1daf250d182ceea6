//! Linear step wizard behind the upload slideshow and the onboarding step form.

use std::sync::{Arc, Mutex, MutexGuard};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{debug, info, info_span, warn, Instrument};

use super::error::WizardError;
use super::events::{WizardEvent, WizardEvents};
use super::persistence::WizardStore;
use super::progress::Progress;
use super::state::{Phase, Snapshot, StepData, WizardState};
use super::step::{CompletionHandler, SkipHandler, StepDescriptor, StepHook};

/// Bounds for data a step can store.
pub trait StepPayload: Clone + Send + Sync + Serialize + DeserializeOwned + 'static {}

impl<T> StepPayload for T where T: Clone + Send + Sync + Serialize + DeserializeOwned + 'static {}

/// What happens after the completion handler succeeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompletionMode {
    /// Stay in `Completed`.
    #[default]
    Finish,
    /// Drop the data and start over at the initial step.
    Restart,
}

/// Why a permitted navigation did not move the wizard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum RefusalReason {
    HookDeclined,
    HookFailed(String),
    CompletionDeclined,
    CompletionFailed(String),
}

/// Why a navigation call was not attempted at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    Busy,
    CannotProceed,
    OutOfRange,
    SameStep,
    AtFirstStep,
    AlreadyCompleted,
}

/// Outcome of a navigation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Moved { from: usize, to: usize },
    Completed,
    Refused(RefusalReason),
    Ignored(IgnoreReason),
}

impl Transition {
    pub fn is_moved(&self) -> bool {
        matches!(self, Transition::Moved { .. })
    }
}

struct Inner<T> {
    current_step: usize,
    step_data: StepData<T>,
    can_proceed: bool,
    phase: Phase,
}

impl<T: Clone> Inner<T> {
    fn enter_step(&mut self, index: usize, descriptor: &StepDescriptor) {
        self.current_step = index;
        self.can_proceed = !descriptor.requires_validation;
    }

    fn snapshot(&self) -> Snapshot<T> {
        Snapshot {
            current_step: self.current_step,
            step_data: self.step_data.clone(),
        }
    }
}

/// Claim on a wizard for one navigation. Dropping it before it settles,
/// because the future was cancelled or a hook panicked, puts the wizard back
/// to `Idle`.
struct TransitionGuard<'a, T> {
    inner: &'a Mutex<Inner<T>>,
    settled: bool,
}

impl<T> TransitionGuard<'_, T> {
    fn settle(mut self) {
        self.settled = true;
    }
}

impl<T> Drop for TransitionGuard<'_, T> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let mut inner = match self.inner.lock() {
            Ok(inner) => inner,
            Err(poisoned) => poisoned.into_inner(),
        };
        if inner.phase == Phase::Transitioning {
            inner.phase = Phase::Idle;
            warn!(step = inner.current_step, "Navigation abandoned before it settled");
        }
    }
}

type Claim<'a, T> = Result<(usize, TransitionGuard<'a, T>), IgnoreReason>;

struct StoreBinding {
    store: Arc<dyn WizardStore>,
    key: String,
}

/// Drives a fixed sequence of steps.
///
/// All methods take `&self`; at most one navigation is in flight per wizard
/// and calls made meanwhile return [`IgnoreReason::Busy`]. State is never
/// locked across a hook's `.await`.
pub struct Wizard<T> {
    steps: Vec<StepDescriptor>,
    initial_step: usize,
    mode: CompletionMode,
    inner: Mutex<Inner<T>>,
    store: Option<StoreBinding>,
    on_complete: Option<Arc<dyn CompletionHandler<T>>>,
    on_skip: Option<Arc<dyn SkipHandler>>,
    events: WizardEvents,
}

pub struct WizardBuilder<T> {
    steps: Vec<StepDescriptor>,
    initial_step: usize,
    mode: CompletionMode,
    store: Option<StoreBinding>,
    on_complete: Option<Arc<dyn CompletionHandler<T>>>,
    on_skip: Option<Arc<dyn SkipHandler>>,
    event_capacity: usize,
}

impl<T: StepPayload> WizardBuilder<T> {
    pub fn initial_step(mut self, step: usize) -> Self {
        self.initial_step = step;
        self
    }

    pub fn mode(mut self, mode: CompletionMode) -> Self {
        self.mode = mode;
        self
    }

    /// Persists snapshots under `key` and resumes from it on build.
    pub fn store(mut self, store: Arc<dyn WizardStore>, key: impl Into<String>) -> Self {
        self.store = Some(StoreBinding {
            store,
            key: key.into(),
        });
        self
    }

    pub fn on_complete(mut self, handler: Arc<dyn CompletionHandler<T>>) -> Self {
        self.on_complete = Some(handler);
        self
    }

    pub fn on_skip(mut self, handler: Arc<dyn SkipHandler>) -> Self {
        self.on_skip = Some(handler);
        self
    }

    pub fn event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity.max(1);
        self
    }

    pub fn build(self) -> Result<Wizard<T>, WizardError> {
        let total = self.steps.len();
        if total == 0 {
            return Err(WizardError::NoSteps);
        }
        if self.initial_step >= total {
            return Err(WizardError::InitialStepOutOfRange {
                initial: self.initial_step,
                total,
            });
        }

        let resumed = self
            .store
            .as_ref()
            .and_then(|binding| load_snapshot::<T>(binding, total));
        let (current_step, step_data) = match resumed {
            Some(snapshot) => (snapshot.current_step, snapshot.step_data),
            None => (self.initial_step, StepData::new()),
        };

        let inner = Inner {
            current_step,
            step_data,
            can_proceed: !self.steps[current_step].requires_validation,
            phase: Phase::Idle,
        };

        debug!(steps = total, current_step, "Wizard built");

        Ok(Wizard {
            steps: self.steps,
            initial_step: self.initial_step,
            mode: self.mode,
            inner: Mutex::new(inner),
            store: self.store,
            on_complete: self.on_complete,
            on_skip: self.on_skip,
            events: WizardEvents::new(self.event_capacity),
        })
    }
}

fn load_snapshot<T: StepPayload>(binding: &StoreBinding, total: usize) -> Option<Snapshot<T>> {
    let raw = match binding.store.load(&binding.key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            warn!(key = %binding.key, error = %e, "Failed to load wizard snapshot");
            return None;
        }
    };

    match serde_json::from_str::<Snapshot<T>>(&raw) {
        Ok(snapshot) if snapshot.fits(total) => {
            info!(key = %binding.key, step = snapshot.current_step, "Resuming wizard");
            Some(snapshot)
        }
        Ok(snapshot) => {
            warn!(
                key = %binding.key,
                step = snapshot.current_step,
                total,
                "Ignoring wizard snapshot that does not fit the steps"
            );
            None
        }
        Err(e) => {
            warn!(key = %binding.key, error = %e, "Ignoring undecodable wizard snapshot");
            None
        }
    }
}

impl<T: StepPayload> Wizard<T> {
    pub fn builder(steps: Vec<StepDescriptor>) -> WizardBuilder<T> {
        WizardBuilder {
            steps,
            initial_step: 0,
            mode: CompletionMode::default(),
            store: None,
            on_complete: None,
            on_skip: None,
            event_capacity: 32,
        }
    }

    pub fn steps(&self) -> &[StepDescriptor] {
        &self.steps
    }

    pub fn total_steps(&self) -> usize {
        self.steps.len()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<WizardEvent> {
        self.events.subscribe()
    }

    pub fn state(&self) -> Result<WizardState<T>, WizardError> {
        let inner = self.lock()?;
        Ok(WizardState {
            current_step: inner.current_step,
            total_steps: self.steps.len(),
            step_data: inner.step_data.clone(),
            can_proceed: inner.can_proceed,
            is_loading: inner.phase == Phase::Transitioning,
            phase: inner.phase,
        })
    }

    pub fn current_step(&self) -> Result<usize, WizardError> {
        Ok(self.lock()?.current_step)
    }

    pub fn progress(&self) -> Result<Progress, WizardError> {
        let inner = self.lock()?;
        Ok(Progress::compute(
            &self.steps,
            inner.current_step,
            inner.phase == Phase::Completed,
        ))
    }

    /// Called by the active step when its validity changes.
    pub fn set_can_proceed(&self, can_proceed: bool) -> Result<(), WizardError> {
        self.lock()?.can_proceed = can_proceed;
        Ok(())
    }

    pub fn step_data(&self, step: usize) -> Result<Option<T>, WizardError> {
        Ok(self.lock()?.step_data.get(&step).cloned())
    }

    /// Stores the payload of `step`, replacing any earlier one.
    pub fn update_step_data(&self, step: usize, payload: T) -> Result<(), WizardError> {
        let total = self.steps.len();
        if step >= total {
            return Err(WizardError::StepOutOfRange { step, total });
        }

        let snapshot = {
            let mut inner = self.lock()?;
            inner.step_data.insert(step, payload);
            (inner.phase != Phase::Completed).then(|| inner.snapshot())
        };
        if let Some(snapshot) = snapshot {
            self.persist(&snapshot);
        }
        Ok(())
    }

    /// Advances one step, or completes the flow from the last step.
    pub async fn go_next(&self) -> Result<Transition, WizardError> {
        self.next_inner().instrument(info_span!("wizard.next")).await
    }

    pub async fn go_previous(&self) -> Result<Transition, WizardError> {
        self.previous_inner()
            .instrument(info_span!("wizard.previous"))
            .await
    }

    /// Jumps directly to `target`. Only the current step's hook runs.
    pub async fn go_to_step(&self, target: usize) -> Result<Transition, WizardError> {
        self.go_to_inner(target)
            .instrument(info_span!("wizard.go_to", target))
            .await
    }

    /// Hands control to the skip handler. The wizard state is left as is.
    /// Returns false when no handler is registered.
    pub async fn skip(&self) -> Result<bool, WizardError> {
        let Some(handler) = self.on_skip.clone() else {
            return Ok(false);
        };
        let current = self.current_step()?;
        if let Err(e) = handler.skip(current).await {
            warn!(step = current, error = %e, "Skip handler failed");
        }
        Ok(true)
    }

    async fn next_inner(&self) -> Result<Transition, WizardError> {
        let (from, guard) = match self.begin(|inner| {
            if inner.can_proceed {
                Ok(())
            } else {
                Err(IgnoreReason::CannotProceed)
            }
        })? {
            Ok(claim) => claim,
            Err(reason) => return Ok(ignored(reason)),
        };

        let hook = self.steps[from].on_next.clone();
        if let Err(reason) = run_hook(hook, from).await {
            return self.refuse(guard, from, reason);
        }

        if from + 1 < self.steps.len() {
            self.commit_move(guard, from, from + 1)
        } else {
            self.complete(guard, from).await
        }
    }

    async fn previous_inner(&self) -> Result<Transition, WizardError> {
        let (from, guard) = match self.begin(|inner| {
            if inner.current_step == 0 {
                Err(IgnoreReason::AtFirstStep)
            } else {
                Ok(())
            }
        })? {
            Ok(claim) => claim,
            Err(reason) => return Ok(ignored(reason)),
        };

        let hook = self.steps[from].on_previous.clone();
        if let Err(reason) = run_hook(hook, from).await {
            return self.refuse(guard, from, reason);
        }

        self.commit_move(guard, from, from - 1)
    }

    async fn go_to_inner(&self, target: usize) -> Result<Transition, WizardError> {
        let total = self.steps.len();
        let (from, guard) = match self.begin(|inner| {
            if target >= total {
                Err(IgnoreReason::OutOfRange)
            } else if target == inner.current_step {
                Err(IgnoreReason::SameStep)
            } else if target > inner.current_step && !inner.can_proceed {
                Err(IgnoreReason::CannotProceed)
            } else {
                Ok(())
            }
        })? {
            Ok(claim) => claim,
            Err(reason) => return Ok(ignored(reason)),
        };

        let hook = if target > from {
            self.steps[from].on_next.clone()
        } else {
            self.steps[from].on_previous.clone()
        };
        if let Err(reason) = run_hook(hook, from).await {
            return self.refuse(guard, from, reason);
        }

        self.commit_move(guard, from, target)
    }

    async fn complete(
        &self,
        guard: TransitionGuard<'_, T>,
        from: usize,
    ) -> Result<Transition, WizardError> {
        let data = self.lock()?.step_data.clone();

        let outcome = match self.on_complete.clone() {
            Some(handler) => handler.complete(data).await,
            None => Ok(true),
        };
        match outcome {
            Ok(true) => {}
            Ok(false) => {
                warn!(step = from, "Completion handler declined");
                return self.refuse(guard, from, RefusalReason::CompletionDeclined);
            }
            Err(e) => {
                warn!(step = from, error = %e, "Completion handler failed");
                return self.refuse(guard, from, RefusalReason::CompletionFailed(e.to_string()));
            }
        }

        self.clear_persisted();
        let total_steps = self.steps.len();

        match self.mode {
            CompletionMode::Finish => {
                self.lock()?.phase = Phase::Completed;
                guard.settle();
                self.events.send(WizardEvent::Completed { total_steps });
                info!(total_steps, "Wizard completed");
            }
            CompletionMode::Restart => {
                {
                    let mut inner = self.lock()?;
                    inner.step_data.clear();
                    inner.enter_step(self.initial_step, &self.steps[self.initial_step]);
                    inner.phase = Phase::Idle;
                }
                guard.settle();
                self.events.send(WizardEvent::Completed { total_steps });
                self.events.send(WizardEvent::Restarted {
                    step: self.initial_step,
                });
                info!(total_steps, restart_at = self.initial_step, "Wizard completed, restarting");
            }
        }

        Ok(Transition::Completed)
    }

    /// Claims the wizard for a navigation if it is idle and `check` passes.
    /// Returns the current step and the claim.
    fn begin<F>(&self, check: F) -> Result<Claim<'_, T>, WizardError>
    where
        F: FnOnce(&Inner<T>) -> Result<(), IgnoreReason>,
    {
        let mut inner = self.lock()?;
        match inner.phase {
            Phase::Completed => return Ok(Err(IgnoreReason::AlreadyCompleted)),
            Phase::Transitioning => return Ok(Err(IgnoreReason::Busy)),
            Phase::Idle => {}
        }
        if let Err(reason) = check(&inner) {
            return Ok(Err(reason));
        }
        inner.phase = Phase::Transitioning;
        let guard = TransitionGuard {
            inner: &self.inner,
            settled: false,
        };
        Ok(Ok((inner.current_step, guard)))
    }

    fn commit_move(
        &self,
        guard: TransitionGuard<'_, T>,
        from: usize,
        to: usize,
    ) -> Result<Transition, WizardError> {
        let snapshot = {
            let mut inner = self.lock()?;
            inner.enter_step(to, &self.steps[to]);
            inner.phase = Phase::Idle;
            inner.snapshot()
        };
        guard.settle();
        self.persist(&snapshot);
        self.events.send(WizardEvent::StepChanged { from, to });
        debug!(from, to, "Wizard moved");
        Ok(Transition::Moved { from, to })
    }

    fn refuse(
        &self,
        guard: TransitionGuard<'_, T>,
        step: usize,
        reason: RefusalReason,
    ) -> Result<Transition, WizardError> {
        self.lock()?.phase = Phase::Idle;
        guard.settle();
        self.events.send(WizardEvent::NavigationRefused {
            step,
            reason: reason.clone(),
        });
        Ok(Transition::Refused(reason))
    }

    fn persist(&self, snapshot: &Snapshot<T>) {
        let Some(binding) = &self.store else {
            return;
        };
        let json = match serde_json::to_string(snapshot) {
            Ok(json) => json,
            Err(e) => {
                warn!(key = %binding.key, error = %e, "Failed to serialize wizard snapshot");
                return;
            }
        };
        if let Err(e) = binding.store.save(&binding.key, &json) {
            warn!(key = %binding.key, error = %e, "Failed to save wizard snapshot");
        }
    }

    fn clear_persisted(&self) {
        if let Some(binding) = &self.store {
            if let Err(e) = binding.store.clear(&binding.key) {
                warn!(key = %binding.key, error = %e, "Failed to clear wizard snapshot");
            }
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner<T>>, WizardError> {
        self.inner.lock().map_err(|_| WizardError::LockPoisoned)
    }
}

fn ignored(reason: IgnoreReason) -> Transition {
    debug!(?reason, "Navigation ignored");
    Transition::Ignored(reason)
}

async fn run_hook(hook: Option<Arc<dyn StepHook>>, step: usize) -> Result<(), RefusalReason> {
    let Some(hook) = hook else {
        return Ok(());
    };
    match hook.run().await {
        Ok(true) => Ok(()),
        Ok(false) => {
            info!(step, "Step hook declined the transition");
            Err(RefusalReason::HookDeclined)
        }
        Err(e) => {
            warn!(step, error = %e, "Step hook failed");
            Err(RefusalReason::HookFailed(e.to_string()))
        }
    }
}
