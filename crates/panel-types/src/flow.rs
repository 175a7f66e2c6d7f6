//! Dispatch flow state machine.
//!
//! Idle -> Validating -> (Executing | AwaitingInput) -> Completing -> Idle
//!
//! Valid transitions:
//! - Idle -> Validating
//! - Validating -> Idle (unknown control, rejected input)
//! - Validating -> Executing
//! - Validating -> AwaitingInput
//! - AwaitingInput -> Validating (input submitted)
//! - AwaitingInput -> Idle (abandoned or expired)
//! - Executing -> Completing
//! - Executing -> Idle (announcement failed)
//! - Completing -> Idle

use serde::{Deserialize, Serialize};

use crate::errors::PanelError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowState {
    Idle,
    Validating,
    Executing,
    AwaitingInput,
    Completing,
}

pub fn validate_transition(from: FlowState, to: FlowState) -> Result<(), PanelError> {
    use FlowState::*;

    let valid = matches!(
        (from, to),
        (Idle, Validating)
            | (Validating, Idle)
            | (Validating, Executing)
            | (Validating, AwaitingInput)
            | (AwaitingInput, Validating)
            | (AwaitingInput, Idle)
            | (Executing, Completing)
            | (Executing, Idle)
            | (Completing, Idle)
    );

    if valid {
        Ok(())
    } else {
        Err(PanelError::InvalidTransition { from, to })
    }
}

/// One operator round-trip walking the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flow {
    state: FlowState,
    trail: Vec<FlowState>,
}

impl Flow {
    pub fn new() -> Self {
        Self {
            state: FlowState::Idle,
            trail: vec![FlowState::Idle],
        }
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    /// Every state visited, oldest first.
    pub fn trail(&self) -> &[FlowState] {
        &self.trail
    }

    pub fn advance(&mut self, to: FlowState) -> Result<(), PanelError> {
        validate_transition(self.state, to)?;
        self.state = to;
        self.trail.push(to);
        Ok(())
    }

    pub fn is_idle(&self) -> bool {
        self.state == FlowState::Idle
    }
}

impl Default for Flow {
    fn default() -> Self {
        Self::new()
    }
}
