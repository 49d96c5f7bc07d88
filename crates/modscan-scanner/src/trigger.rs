//! Edge detection for the scan button.
//!
//! A level must climb through `rise` to open the gate and fall through
//! `fall` to close it. The gap between the two thresholds absorbs jitter
//! around either one, so a noisy press yields a single trigger.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GateThresholds {
    pub rise: f32,
    pub fall: f32,
}

impl Default for GateThresholds {
    fn default() -> Self {
        Self {
            rise: 1.0,
            fall: 0.1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GateState {
    #[default]
    Idle,
    /// The gate opened on this sample.
    Rising,
    High,
    /// The gate closed on this sample.
    Falling,
}

impl GateState {
    pub fn is_gate_active(self) -> bool {
        matches!(self, GateState::Rising | GateState::High)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TriggerState {
    pub gate_active: bool,
    pub trigger_fired: bool,
}

#[derive(Debug, Clone)]
pub struct GateTriggerReceiver {
    thresholds: GateThresholds,
    prev_level: f32,
    state: GateState,
}

impl Default for GateTriggerReceiver {
    fn default() -> Self {
        Self::new(GateThresholds::default())
    }
}

impl GateTriggerReceiver {
    pub fn new(thresholds: GateThresholds) -> Self {
        Self {
            thresholds,
            prev_level: 0.0,
            state: GateState::Idle,
        }
    }

    pub fn reset(&mut self) {
        self.prev_level = 0.0;
        self.state = GateState::Idle;
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn thresholds(&self) -> GateThresholds {
        self.thresholds
    }

    pub fn update(&mut self, level: f32) -> TriggerState {
        let GateThresholds { rise, fall } = self.thresholds;
        let active = self.state.is_gate_active();
        let rising_edge = self.prev_level < rise && level >= rise;
        let falling_edge = self.prev_level >= fall && level < fall;

        self.state = if rising_edge {
            if active {
                GateState::High
            } else {
                GateState::Rising
            }
        } else if falling_edge {
            if active {
                GateState::Falling
            } else {
                GateState::Idle
            }
        } else {
            match self.state {
                GateState::Rising => GateState::High,
                GateState::Falling => GateState::Idle,
                steady => steady,
            }
        };
        self.prev_level = level;

        TriggerState {
            gate_active: self.state.is_gate_active(),
            trigger_fired: self.state == GateState::Rising,
        }
    }

    pub fn update_gate(&mut self, level: f32) -> bool {
        self.update(level).gate_active
    }

    pub fn update_trigger(&mut self, level: f32) -> bool {
        self.update(level).trigger_fired
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn run(receiver: &mut GateTriggerReceiver, levels: &[f32]) -> Vec<TriggerState> {
        levels.iter().map(|&level| receiver.update(level)).collect()
    }

    #[test]
    fn one_trigger_per_press() {
        let mut receiver = GateTriggerReceiver::default();
        let states = run(&mut receiver, &[0.0, 10.0, 10.0, 10.0, 0.0, 0.0]);
        let fired: Vec<_> = states.iter().map(|s| s.trigger_fired).collect();
        let gate: Vec<_> = states.iter().map(|s| s.gate_active).collect();
        assert_eq!(fired, vec![false, true, false, false, false, false]);
        assert_eq!(gate, vec![false, true, true, true, false, false]);
    }

    #[test]
    fn walks_through_every_state() {
        let mut receiver = GateTriggerReceiver::default();
        let mut seen = Vec::new();
        for level in [0.0, 5.0, 5.0, 0.0, 0.0] {
            receiver.update(level);
            seen.push(receiver.state());
        }
        assert_eq!(
            seen,
            vec![
                GateState::Idle,
                GateState::Rising,
                GateState::High,
                GateState::Falling,
                GateState::Idle,
            ]
        );
    }

    #[test]
    fn jitter_inside_the_band_does_not_retrigger() {
        let mut receiver = GateTriggerReceiver::default();
        let levels = [0.0, 1.2, 0.5, 1.1, 0.3, 1.5, 0.05, 1.0];
        let fired: Vec<_> = levels
            .iter()
            .map(|&level| receiver.update_trigger(level))
            .collect();
        assert_eq!(
            fired,
            vec![false, true, false, false, false, false, false, true]
        );
    }

    #[test]
    fn levels_below_the_rise_threshold_never_open_the_gate() {
        let mut receiver = GateTriggerReceiver::default();
        for level in [0.0, 0.5, 0.99, 0.2, 0.0] {
            assert!(!receiver.update_gate(level));
        }
        assert_eq!(receiver.state(), GateState::Idle);
    }

    #[test]
    fn reset_forgets_a_held_gate() {
        let mut receiver = GateTriggerReceiver::default();
        receiver.update(10.0);
        assert!(receiver.state().is_gate_active());
        receiver.reset();
        assert_eq!(receiver.state(), GateState::Idle);
        assert!(receiver.update_trigger(10.0));
    }

    #[test]
    fn custom_thresholds() {
        let mut receiver = GateTriggerReceiver::new(GateThresholds { rise: 2.0, fall: 1.0 });
        assert!(!receiver.update_trigger(1.5));
        assert!(receiver.update_trigger(2.0));
        assert!(receiver.update_gate(1.2));
        assert!(!receiver.update_gate(0.9));
    }
}
