//! Index-based progress view for the step-form header.

use serde::Serialize;

use super::step::StepDescriptor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepMarker {
    Completed,
    Current,
    Upcoming,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepProgress {
    pub index: usize,
    pub title: String,
    pub marker: StepMarker,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Progress {
    /// 1-based position of the current step.
    pub position: usize,
    pub total: usize,
    /// 0.0 on the first step, 1.0 on the last step or once completed.
    pub fraction: f32,
    pub steps: Vec<StepProgress>,
}

impl Progress {
    pub(crate) fn compute(steps: &[StepDescriptor], current: usize, completed: bool) -> Self {
        let total = steps.len();
        let fraction = if completed || total <= 1 {
            1.0
        } else {
            current as f32 / (total - 1) as f32
        };

        let steps = steps
            .iter()
            .enumerate()
            .map(|(index, step)| {
                let marker = if completed || index < current {
                    StepMarker::Completed
                } else if index == current {
                    StepMarker::Current
                } else {
                    StepMarker::Upcoming
                };
                StepProgress {
                    index,
                    title: step.title.clone(),
                    marker,
                }
            })
            .collect();

        Self {
            position: current + 1,
            total,
            fraction,
            steps,
        }
    }

    /// "Step k of N".
    pub fn label(&self) -> String {
        format!("Step {} of {}", self.position, self.total)
    }
}
