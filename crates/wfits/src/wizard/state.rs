use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Per-step payloads keyed by step index.
pub type StepData<T> = BTreeMap<usize, T>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Transitioning,
    Completed,
}

/// Point-in-time copy of a wizard's state.
#[derive(Debug, Clone, PartialEq)]
pub struct WizardState<T> {
    pub current_step: usize,
    pub total_steps: usize,
    pub step_data: StepData<T>,
    pub can_proceed: bool,
    pub is_loading: bool,
    pub phase: Phase,
}

impl<T> WizardState<T> {
    pub fn is_first_step(&self) -> bool {
        self.current_step == 0
    }

    pub fn is_last_step(&self) -> bool {
        self.current_step + 1 == self.total_steps
    }

    pub fn is_completed(&self) -> bool {
        self.phase == Phase::Completed
    }
}

/// The persisted part of a wizard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", bound(deserialize = "T: Deserialize<'de>"))]
pub struct Snapshot<T> {
    pub current_step: usize,
    #[serde(default)]
    pub step_data: StepData<T>,
}

impl<T> Snapshot<T> {
    /// A snapshot fits a wizard when every index it mentions is in range.
    pub fn fits(&self, total_steps: usize) -> bool {
        self.current_step < total_steps && self.step_data.keys().all(|k| *k < total_steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_json_shape() {
        let mut data = StepData::new();
        data.insert(1, "photo.png".to_string());
        let snapshot = Snapshot {
            current_step: 1,
            step_data: data,
        };

        let json = serde_json::to_string(&snapshot).unwrap();
        assert_eq!(json, r#"{"currentStep":1,"stepData":{"1":"photo.png"}}"#);

        let back: Snapshot<String> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }

    #[test]
    fn test_snapshot_without_step_data() {
        let snapshot: Snapshot<String> = serde_json::from_str(r#"{"currentStep":2}"#).unwrap();
        assert_eq!(snapshot.current_step, 2);
        assert!(snapshot.step_data.is_empty());
    }

    #[test]
    fn test_snapshot_fits() {
        let snapshot: Snapshot<u8> = Snapshot {
            current_step: 2,
            step_data: StepData::new(),
        };
        assert!(snapshot.fits(3));
        assert!(!snapshot.fits(2));

        let mut data = StepData::new();
        data.insert(5, 1u8);
        let stale = Snapshot {
            current_step: 0,
            step_data: data,
        };
        assert!(!stale.fits(3));
    }

    #[test]
    fn test_state_flags() {
        let state: WizardState<()> = WizardState {
            current_step: 2,
            total_steps: 3,
            step_data: StepData::new(),
            can_proceed: true,
            is_loading: false,
            phase: Phase::Idle,
        };
        assert!(state.is_last_step());
        assert!(!state.is_first_step());
        assert!(!state.is_completed());
    }
}
