//! Step descriptors and the async hooks attached to them.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use super::state::StepData;

/// Error type returned by caller-supplied hooks and handlers.
pub type HookError = Box<dyn std::error::Error + Send + Sync>;

/// Transition hook run before leaving a step.
///
/// `Ok(true)` lets the transition through; `Ok(false)` or an error keeps the
/// wizard on the current step.
#[async_trait]
pub trait StepHook: Send + Sync {
    async fn run(&self) -> Result<bool, HookError>;
}

/// Invoked with the accumulated step data when the last step is confirmed.
#[async_trait]
pub trait CompletionHandler<T>: Send + Sync {
    async fn complete(&self, data: StepData<T>) -> Result<bool, HookError>;
}

/// Invoked when the user skips the flow.
#[async_trait]
pub trait SkipHandler: Send + Sync {
    async fn skip(&self, current_step: usize) -> Result<(), HookError>;
}

pub struct FnHook<F>(F);

#[async_trait]
impl<F, Fut> StepHook for FnHook<F>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<bool, HookError>> + Send,
{
    async fn run(&self) -> Result<bool, HookError> {
        (self.0)().await
    }
}

/// Wraps an async closure as a [`StepHook`].
pub fn hook_fn<F, Fut>(f: F) -> Arc<dyn StepHook>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<bool, HookError>> + Send + 'static,
{
    Arc::new(FnHook(f))
}

pub struct FnCompletion<F>(F);

#[async_trait]
impl<T, F, Fut> CompletionHandler<T> for FnCompletion<F>
where
    T: Send + 'static,
    F: Fn(StepData<T>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<bool, HookError>> + Send,
{
    async fn complete(&self, data: StepData<T>) -> Result<bool, HookError> {
        (self.0)(data).await
    }
}

/// Wraps an async closure as a [`CompletionHandler`].
pub fn completion_fn<T, F, Fut>(f: F) -> Arc<dyn CompletionHandler<T>>
where
    T: Send + 'static,
    F: Fn(StepData<T>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<bool, HookError>> + Send + 'static,
{
    Arc::new(FnCompletion(f))
}

/// One wizard screen. Descriptors are immutable once handed to a wizard.
#[derive(Clone)]
pub struct StepDescriptor {
    pub title: String,
    pub description: String,
    /// Opaque key the caller uses to pick what to render.
    pub content_key: String,
    /// When true the step starts blocked until it reports itself valid.
    pub requires_validation: bool,
    pub on_next: Option<Arc<dyn StepHook>>,
    pub on_previous: Option<Arc<dyn StepHook>>,
}

impl StepDescriptor {
    pub fn new(title: impl Into<String>) -> Self {
        let title = title.into();
        Self {
            content_key: title.to_lowercase().replace(' ', "-"),
            title,
            description: String::new(),
            requires_validation: false,
            on_next: None,
            on_previous: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn content_key(mut self, key: impl Into<String>) -> Self {
        self.content_key = key.into();
        self
    }

    pub fn requires_validation(mut self, required: bool) -> Self {
        self.requires_validation = required;
        self
    }

    pub fn on_next(mut self, hook: Arc<dyn StepHook>) -> Self {
        self.on_next = Some(hook);
        self
    }

    pub fn on_previous(mut self, hook: Arc<dyn StepHook>) -> Self {
        self.on_previous = Some(hook);
        self
    }
}

impl fmt::Debug for StepDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepDescriptor")
            .field("title", &self.title)
            .field("content_key", &self.content_key)
            .field("requires_validation", &self.requires_validation)
            .field("on_next", &self.on_next.is_some())
            .field("on_previous", &self.on_previous.is_some())
            .finish()
    }
}
