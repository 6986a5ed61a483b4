//! Runtime motor state

use crate::types::{Direction, Speed, StepSign};

/// Control phase derived from the running/ramping flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Outputs idle or braking
    Idle,
    /// Holding a fixed speed
    Running,
    /// A ramp is in flight
    Ramping,
}

#[cfg(feature = "defmt")]
impl defmt::Format for Phase {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Phase::Idle => defmt::write!(fmt, "Idle"),
            Phase::Running => defmt::write!(fmt, "Running"),
            Phase::Ramping => defmt::write!(fmt, "Ramping"),
        }
    }
}

/// Snapshot of the driver's control state
///
/// `target_speed` and `step_sign` are only meaningful while `ramping`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MotorState {
    pub direction: Direction,
    pub speed: Speed,
    pub running: bool,
    pub ramping: bool,
    pub target_speed: Speed,
    pub step_sign: StepSign,
}

impl MotorState {
    pub const fn phase(&self) -> Phase {
        if self.ramping {
            Phase::Ramping
        } else if self.running {
            Phase::Running
        } else {
            Phase::Idle
        }
    }

    /// Whether `speed` has reached or passed the ramp target
    pub(crate) fn at_target(&self) -> bool {
        match self.step_sign {
            StepSign::Up => self.speed >= self.target_speed,
            StepSign::Down => self.speed <= self.target_speed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_follows_flags() {
        let mut state = MotorState::default();
        assert_eq!(state.phase(), Phase::Idle);

        state.running = true;
        assert_eq!(state.phase(), Phase::Running);

        state.ramping = true;
        assert_eq!(state.phase(), Phase::Ramping);
    }

    #[test]
    fn at_target_counts_overshoot() {
        let mut state = MotorState {
            speed: Speed::new(60),
            target_speed: Speed::new(50),
            step_sign: StepSign::Up,
            ..MotorState::default()
        };
        assert!(state.at_target());

        state.step_sign = StepSign::Down;
        assert!(!state.at_target());

        state.speed = Speed::new(50);
        assert!(state.at_target());
    }
}
