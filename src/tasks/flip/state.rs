#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipState {
    Idle,
    Measuring,
    Correcting,
    Animating,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlipStateChange {
    pub from: FlipState,
    pub to: FlipState,
}

#[derive(Debug)]
pub struct FlipSM {
    state: FlipState,
}

impl Default for FlipSM {
    fn default() -> Self {
        Self::new()
    }
}

impl FlipSM {
    pub const fn new() -> Self {
        Self {
            state: FlipState::Idle,
        }
    }

    pub const fn current(&self) -> FlipState {
        self.state
    }

    pub fn on_play(&mut self) -> Option<FlipStateChange> {
        if self.state == FlipState::Idle {
            return self.goto(FlipState::Measuring);
        }
        None
    }

    pub fn on_measured(&mut self) -> Option<FlipStateChange> {
        if self.state == FlipState::Measuring {
            return self.goto(FlipState::Correcting);
        }
        None
    }

    pub fn on_corrected(&mut self) -> Option<FlipStateChange> {
        if self.state == FlipState::Correcting {
            return self.goto(FlipState::Animating);
        }
        None
    }

    pub fn on_reset(&mut self) -> Option<FlipStateChange> {
        self.goto(FlipState::Idle)
    }

    fn goto(&mut self, to: FlipState) -> Option<FlipStateChange> {
        if self.state == to {
            return None;
        }
        let ch = FlipStateChange {
            from: self.state,
            to,
        };
        self.state = to;
        Some(ch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_cycle() {
        let mut sm = FlipSM::new();
        assert_eq!(sm.current(), FlipState::Idle);
        let ch = sm.on_play().unwrap();
        assert_eq!((ch.from, ch.to), (FlipState::Idle, FlipState::Measuring));
        sm.on_measured().unwrap();
        let ch = sm.on_corrected().unwrap();
        assert_eq!((ch.from, ch.to), (FlipState::Correcting, FlipState::Animating));
        let ch = sm.on_reset().unwrap();
        assert_eq!((ch.from, ch.to), (FlipState::Animating, FlipState::Idle));
    }

    #[test]
    fn out_of_order_events_are_ignored() {
        let mut sm = FlipSM::new();
        assert!(sm.on_measured().is_none());
        assert!(sm.on_corrected().is_none());
        sm.on_play();
        assert!(sm.on_play().is_none());
        assert!(sm.on_corrected().is_none());
        assert_eq!(sm.current(), FlipState::Measuring);
    }

    #[test]
    fn reset_from_idle_is_a_no_op() {
        let mut sm = FlipSM::new();
        assert!(sm.on_reset().is_none());
        sm.on_play();
        assert!(sm.on_reset().is_some());
        assert!(sm.on_reset().is_none());
    }
}
