//! Endpoint health state.
//!
//! # States
//! - Alive: last probe got a success status with a JSON body
//! - Down: anything else
//!
//! There is no Unknown state; before the first probe the indicator shows
//! whatever its static markup says.

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

/// Health State enum.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthState {
    Alive = 1,
    Down = 2,
}

impl HealthState {
    pub fn is_alive(self) -> bool {
        self == HealthState::Alive
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HealthState::Alive => "alive",
            HealthState::Down => "down",
        }
    }

    /// Process exit status for a one-shot check: 0 alive, 1 down.
    pub fn exit_status(self) -> u8 {
        match self {
            HealthState::Alive => 0,
            HealthState::Down => 1,
        }
    }

    fn from_raw(val: u8) -> Option<Self> {
        match val {
            1 => Some(HealthState::Alive),
            2 => Some(HealthState::Down),
            _ => None,
        }
    }
}

impl fmt::Display for HealthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Last applied state, `None` until the first probe completes.
#[derive(Debug, Default)]
pub(crate) struct LastState(AtomicU8);

impl LastState {
    pub(crate) fn load(&self) -> Option<HealthState> {
        HealthState::from_raw(self.0.load(Ordering::Relaxed))
    }

    /// Store a new state, returning the previous one.
    pub(crate) fn swap(&self, state: HealthState) -> Option<HealthState> {
        HealthState::from_raw(self.0.swap(state as u8, Ordering::Relaxed))
    }
}
