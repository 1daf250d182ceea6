//! Builder patterns for creating test data programmatically.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use wfits::actions::ItemUpload;
use wfits::categorizer::Categorized;
use wfits::wizard::{CompletionHandler, HookError, StepData, StepDescriptor, StepHook};

/// Minimal categorized item for categorizer tests.
#[derive(Debug, Clone, PartialEq)]
pub struct TestItem {
    pub label: String,
    pub category: String,
}

impl Categorized for TestItem {
    fn category_name(&self) -> &str {
        &self.category
    }
}

pub fn item(label: &str, category: &str) -> TestItem {
    TestItem {
        label: label.to_string(),
        category: category.to_string(),
    }
}

/// Builder for `ItemUpload` forms.
pub struct UploadBuilder {
    upload: ItemUpload,
}

impl UploadBuilder {
    pub fn new(name: &str, category: &str) -> Self {
        Self {
            upload: ItemUpload {
                item_name: name.to_string(),
                item_url: format!("https://img.example/{}.png", name.to_lowercase()),
                category: category.to_string(),
                colour: "Black".to_string(),
                size: "m".to_string(),
                environment: "Warm".to_string(),
                waterproof: false,
            },
        }
    }

    pub fn colour(mut self, colour: &str) -> Self {
        self.upload.colour = colour.to_string();
        self
    }

    pub fn size(mut self, size: &str) -> Self {
        self.upload.size = size.to_string();
        self
    }

    pub fn environment(mut self, environment: &str) -> Self {
        self.upload.environment = environment.to_string();
        self
    }

    pub fn waterproof(mut self) -> Self {
        self.upload.waterproof = true;
        self
    }

    pub fn build(self) -> ItemUpload {
        self.upload
    }
}

/// Hook that records how often it ran and answers with a fixed outcome.
pub struct RecordingHook {
    calls: AtomicUsize,
    outcome: Result<bool, String>,
}

impl RecordingHook {
    pub fn allowing() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            outcome: Ok(true),
        })
    }

    pub fn declining() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            outcome: Ok(false),
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            outcome: Err(message.to_string()),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StepHook for RecordingHook {
    async fn run(&self) -> Result<bool, HookError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.outcome {
            Ok(allowed) => Ok(*allowed),
            Err(message) => Err(message.clone().into()),
        }
    }
}

/// Completion handler that keeps every payload it received.
pub struct RecordingCompletion<T> {
    pub received: Mutex<Vec<StepData<T>>>,
    fail_first: AtomicUsize,
}

impl<T> RecordingCompletion<T> {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            received: Mutex::new(Vec::new()),
            fail_first: AtomicUsize::new(0),
        })
    }

    /// Fails the first `n` invocations.
    pub fn failing_first(n: usize) -> Arc<Self> {
        Arc::new(Self {
            received: Mutex::new(Vec::new()),
            fail_first: AtomicUsize::new(n),
        })
    }

    pub fn count(&self) -> usize {
        self.received.lock().unwrap().len()
    }
}

#[async_trait]
impl<T: Clone + Send + 'static> CompletionHandler<T> for RecordingCompletion<T> {
    async fn complete(&self, data: StepData<T>) -> Result<bool, HookError> {
        let remaining = self.fail_first.load(Ordering::SeqCst);
        if remaining > 0 {
            self.fail_first.store(remaining - 1, Ordering::SeqCst);
            return Err("completion failed".into());
        }
        self.received.lock().unwrap().push(data);
        Ok(true)
    }
}

/// Builder for a list of plain steps.
pub struct StepsBuilder {
    steps: Vec<StepDescriptor>,
}

impl StepsBuilder {
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    pub fn step(mut self, title: &str) -> Self {
        self.steps.push(StepDescriptor::new(title));
        self
    }

    pub fn validated_step(mut self, title: &str) -> Self {
        self.steps
            .push(StepDescriptor::new(title).requires_validation(true));
        self
    }

    pub fn step_with_next(mut self, title: &str, hook: Arc<dyn StepHook>) -> Self {
        self.steps.push(StepDescriptor::new(title).on_next(hook));
        self
    }

    pub fn step_with_previous(mut self, title: &str, hook: Arc<dyn StepHook>) -> Self {
        self.steps.push(StepDescriptor::new(title).on_previous(hook));
        self
    }

    pub fn build(self) -> Vec<StepDescriptor> {
        self.steps
    }
}
