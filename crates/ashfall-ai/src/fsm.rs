//! Minimal state machine runtime
//!
//! Holds one active state and forwards the per-tick callbacks to it. States
//! request transitions by returning the next state from a callback; the
//! machine performs the swap, so a transition always runs the old state's
//! `exit` before the new state's `enter`. An exited state is dropped, which
//! means it can never receive another call for that activation.

/// A state driven by [`StateMachine`] over a context `C`.
///
/// Every callback except `enter`/`exit` may return `Some(next)` to request a
/// transition.
pub trait State<C>: Sized {
    /// Short name for logging
    fn name(&self) -> &'static str;

    fn enter(&mut self, _ctx: &mut C) {}

    fn exit(&mut self, _ctx: &mut C) {}

    fn handle_input(&mut self, _ctx: &mut C) -> Option<Self> {
        None
    }

    fn update(&mut self, _ctx: &mut C) -> Option<Self> {
        None
    }

    fn physics_update(&mut self, _ctx: &mut C) -> Option<Self> {
        None
    }
}

/// Owns the active state.
#[derive(Debug)]
pub struct StateMachine<S> {
    current: Option<S>,
    transitions: u64,
}

impl<S> StateMachine<S> {
    /// A machine with no active state; every callback is a no-op until the
    /// first [`StateMachine::change_state`].
    pub fn new() -> Self {
        Self {
            current: None,
            transitions: 0,
        }
    }

    pub fn current(&self) -> Option<&S> {
        self.current.as_ref()
    }

    /// Number of completed transitions, including the initial one
    pub fn transitions(&self) -> u64 {
        self.transitions
    }

    /// Exit the current state (if any), make `next` current, then enter it.
    pub fn change_state<C>(&mut self, mut next: S, ctx: &mut C)
    where
        S: State<C>,
    {
        if let Some(mut previous) = self.current.take() {
            previous.exit(ctx);
            tracing::trace!(from = previous.name(), to = next.name(), "state change");
        }
        next.enter(ctx);
        self.current = Some(next);
        self.transitions += 1;
    }

    pub fn handle_input<C>(&mut self, ctx: &mut C)
    where
        S: State<C>,
    {
        let next = self.current.as_mut().and_then(|state| state.handle_input(ctx));
        if let Some(next) = next {
            self.change_state(next, ctx);
        }
    }

    pub fn update<C>(&mut self, ctx: &mut C)
    where
        S: State<C>,
    {
        let next = self.current.as_mut().and_then(|state| state.update(ctx));
        if let Some(next) = next {
            self.change_state(next, ctx);
        }
    }

    pub fn physics_update<C>(&mut self, ctx: &mut C)
    where
        S: State<C>,
    {
        let next = self.current.as_mut().and_then(|state| state.physics_update(ctx));
        if let Some(next) = next {
            self.change_state(next, ctx);
        }
    }
}

impl<S> Default for StateMachine<S> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records every callback as "<state>.<callback>"
    #[derive(Default)]
    struct Log(Vec<String>);

    #[derive(Debug, PartialEq)]
    enum Probe {
        A { updates: u32 },
        B,
    }

    impl State<Log> for Probe {
        fn name(&self) -> &'static str {
            match self {
                Probe::A { .. } => "A",
                Probe::B => "B",
            }
        }

        fn enter(&mut self, ctx: &mut Log) {
            ctx.0.push(format!("{}.enter", self.name()));
        }

        fn exit(&mut self, ctx: &mut Log) {
            ctx.0.push(format!("{}.exit", self.name()));
        }

        fn handle_input(&mut self, ctx: &mut Log) -> Option<Self> {
            ctx.0.push(format!("{}.input", self.name()));
            None
        }

        fn update(&mut self, ctx: &mut Log) -> Option<Self> {
            ctx.0.push(format!("{}.update", self.name()));
            match self {
                Probe::A { updates } => {
                    *updates += 1;
                    (*updates >= 2).then_some(Probe::B)
                }
                Probe::B => Some(Probe::A { updates: 0 }),
            }
        }

        fn physics_update(&mut self, ctx: &mut Log) -> Option<Self> {
            ctx.0.push(format!("{}.physics", self.name()));
            None
        }
    }

    #[test]
    fn test_empty_machine_is_noop() {
        let mut fsm: StateMachine<Probe> = StateMachine::new();
        let mut log = Log::default();
        fsm.handle_input(&mut log);
        fsm.update(&mut log);
        fsm.physics_update(&mut log);
        assert!(log.0.is_empty());
        assert!(fsm.current().is_none());
    }

    #[test]
    fn test_exit_runs_before_enter() {
        let mut fsm = StateMachine::new();
        let mut log = Log::default();
        fsm.change_state(Probe::A { updates: 0 }, &mut log);
        fsm.change_state(Probe::B, &mut log);
        fsm.change_state(Probe::A { updates: 0 }, &mut log);
        assert_eq!(log.0, vec!["A.enter", "A.exit", "B.enter", "B.exit", "A.enter"]);
        assert_eq!(fsm.transitions(), 3);
    }

    #[test]
    fn test_no_update_before_enter_and_none_after_exit() {
        let mut fsm = StateMachine::new();
        let mut log = Log::default();
        fsm.change_state(Probe::A { updates: 0 }, &mut log);
        for _ in 0..3 {
            fsm.handle_input(&mut log);
            fsm.update(&mut log);
            fsm.physics_update(&mut log);
        }

        // For each activation, calls must sit strictly between its enter and exit.
        let mut active: Option<String> = None;
        for entry in &log.0 {
            let (state, call) = entry.split_once('.').unwrap();
            match call {
                "enter" => {
                    assert!(active.is_none(), "enter while {active:?} still active");
                    active = Some(state.to_string());
                }
                "exit" => {
                    assert_eq!(active.as_deref(), Some(state));
                    active = None;
                }
                _ => assert_eq!(active.as_deref(), Some(state), "{entry} outside activation"),
            }
        }
    }

    #[test]
    fn test_transition_from_update_continues_in_same_pass() {
        let mut fsm = StateMachine::new();
        let mut log = Log::default();
        fsm.change_state(Probe::A { updates: 1 }, &mut log);
        fsm.update(&mut log);
        fsm.physics_update(&mut log);
        assert_eq!(
            log.0,
            vec!["A.enter", "A.update", "A.exit", "B.enter", "B.physics"]
        );
        assert_eq!(fsm.current(), Some(&Probe::B));
    }
}
