//! Named-state registry with enter/exit/update/render hooks.
//!
//! States are registered once and live as long as the machine. At most one
//! state is current. Every change, including a change to the state that is
//! already current, calls `exit` on the old state before `enter` on the new
//! one.
//!
//! A state never reaches back into the machine that owns it. To move on it
//! returns a `Transition` from `update`; the machine applies it after the
//! state's `update` has returned. The context type `C` is whatever the owner
//! needs to lend its states for the duration of one call (typically the
//! entity's data plus a view of the level), which keeps the machine free of
//! back-references.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use crate::render::RenderList;

/// A request, returned from `State::update`, to switch to another state.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition<N, P> {
    pub to: N,
    pub params: P,
}

impl<N, P> Transition<N, P> {
    pub fn with(to: N, params: P) -> Self {
        Self { to, params }
    }
}

impl<N, P: Default> Transition<N, P> {
    pub fn to(to: N) -> Self {
        Self {
            to,
            params: P::default(),
        }
    }
}

pub trait State<N, C> {
    /// Data handed to `enter` when switching into this state.
    type Params;

    fn enter(&mut self, _ctx: &mut C, _params: Self::Params) {}

    fn exit(&mut self, _ctx: &mut C) {}

    fn update(&mut self, _ctx: &mut C, _dt: f64) -> Option<Transition<N, Self::Params>> {
        None
    }

    fn render(&self, _ctx: &C, _out: &mut RenderList) {}
}

#[derive(Debug, Clone)]
pub struct StateMachine<N, S> {
    states: HashMap<N, S>,
    current: Option<N>,
}

impl<N, S> StateMachine<N, S>
where
    N: Copy + Eq + Hash + Debug,
{
    pub fn new() -> Self {
        Self {
            states: HashMap::new(),
            current: None,
        }
    }

    /// Register `state` under `name`. Names can only be registered once.
    pub fn add(&mut self, name: N, state: S) -> Result<(), String> {
        if self.states.contains_key(&name) {
            return Err(format!("State {:?} is already registered", name));
        }
        self.states.insert(name, state);
        Ok(())
    }

    pub fn current(&self) -> Option<N> {
        self.current
    }

    pub fn current_state(&self) -> Option<&S> {
        self.current.and_then(|name| self.states.get(&name))
    }

    pub fn state(&self, name: N) -> Option<&S> {
        self.states.get(&name)
    }

    pub fn state_mut(&mut self, name: N) -> Option<&mut S> {
        self.states.get_mut(&name)
    }

    /// Exit the current state (if any), then enter `name` with `params`.
    /// An unknown name leaves the machine untouched.
    pub fn change<C>(
        &mut self,
        name: N,
        params: <S as State<N, C>>::Params,
        ctx: &mut C,
    ) -> Result<(), String>
    where
        S: State<N, C>,
    {
        if !self.states.contains_key(&name) {
            return Err(format!("State {:?} is not registered", name));
        }

        if let Some(previous) = self.current {
            if let Some(state) = self.states.get_mut(&previous) {
                state.exit(ctx);
            }
            log::trace!("State change {:?} -> {:?}", previous, name);
        }

        self.current = Some(name);
        if let Some(state) = self.states.get_mut(&name) {
            state.enter(ctx, params);
        }
        Ok(())
    }

    /// Update the current state and apply the transition it asks for.
    pub fn update<C>(&mut self, ctx: &mut C, dt: f64)
    where
        S: State<N, C>,
    {
        let Some(name) = self.current else {
            return;
        };
        let transition = match self.states.get_mut(&name) {
            Some(state) => state.update(ctx, dt),
            None => None,
        };
        if let Some(transition) = transition {
            if let Err(err) = self.change(transition.to, transition.params, ctx) {
                log::error!("Rejected transition out of {:?}: {}", name, err);
            }
        }
    }

    pub fn render<C>(&self, ctx: &C, out: &mut RenderList)
    where
        S: State<N, C>,
    {
        if let Some(state) = self.current_state() {
            state.render(ctx, out);
        }
    }
}

impl<N, S> Default for StateMachine<N, S>
where
    N: Copy + Eq + Hash + Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Name {
        A,
        B,
        C,
    }

    /// Records every hook call into the shared log.
    struct Spy {
        name: Name,
        next: Option<Name>,
    }

    impl Spy {
        fn new(name: Name) -> Self {
            Self { name, next: None }
        }
    }

    impl State<Name, Vec<String>> for Spy {
        type Params = u32;

        fn enter(&mut self, log: &mut Vec<String>, params: u32) {
            log.push(format!("enter {:?} {}", self.name, params));
        }

        fn exit(&mut self, log: &mut Vec<String>) {
            log.push(format!("exit {:?}", self.name));
        }

        fn update(&mut self, log: &mut Vec<String>, _dt: f64) -> Option<Transition<Name, u32>> {
            log.push(format!("update {:?}", self.name));
            self.next.take().map(|to| Transition::with(to, 9))
        }

        fn render(&self, _log: &Vec<String>, out: &mut RenderList) {
            out.push_overlay([0, 0, 0], 0.5);
        }
    }

    fn machine() -> StateMachine<Name, Spy> {
        let mut machine = StateMachine::new();
        machine.add(Name::A, Spy::new(Name::A)).unwrap();
        machine.add(Name::B, Spy::new(Name::B)).unwrap();
        machine.add(Name::C, Spy::new(Name::C)).unwrap();
        machine
    }

    #[test]
    fn no_current_state_until_first_change() {
        let mut machine = machine();
        let mut log = Vec::new();
        machine.update(&mut log, 0.1);
        let mut out = RenderList::new();
        machine.render(&log, &mut out);

        assert_eq!(machine.current(), None);
        assert!(log.is_empty());
        assert!(out.is_empty());
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut machine = machine();
        let err = machine.add(Name::A, Spy::new(Name::A)).unwrap_err();
        assert!(err.contains("already registered"));
    }

    #[test]
    fn exit_runs_before_enter_on_every_change() {
        let mut machine = machine();
        let mut log = Vec::new();

        machine.change(Name::A, 1, &mut log).unwrap();
        machine.change(Name::B, 2, &mut log).unwrap();
        machine.change(Name::B, 3, &mut log).unwrap();
        machine.change(Name::C, 4, &mut log).unwrap();

        assert_eq!(
            log,
            vec![
                "enter A 1",
                "exit A",
                "enter B 2",
                "exit B",
                "enter B 3",
                "exit B",
                "enter C 4",
            ]
        );
        assert_eq!(machine.current(), Some(Name::C));
    }

    #[test]
    fn unknown_state_leaves_current_untouched() {
        let mut machine: StateMachine<Name, Spy> = StateMachine::new();
        machine.add(Name::A, Spy::new(Name::A)).unwrap();
        let mut log = Vec::new();
        machine.change(Name::A, 0, &mut log).unwrap();

        let err = machine.change(Name::B, 0, &mut log).unwrap_err();
        assert!(err.contains("not registered"));
        assert_eq!(machine.current(), Some(Name::A));
        assert_eq!(log, vec!["enter A 0"]);
    }

    #[test]
    fn transition_returned_from_update_is_applied_after_update() {
        let mut machine = machine();
        let mut log = Vec::new();
        machine.change(Name::A, 0, &mut log).unwrap();
        machine.state_mut(Name::A).unwrap().next = Some(Name::C);

        machine.update(&mut log, 0.016);
        machine.update(&mut log, 0.016);

        assert_eq!(
            log,
            vec!["enter A 0", "update A", "exit A", "enter C 9", "update C"]
        );
        assert_eq!(machine.current(), Some(Name::C));
    }

    #[test]
    fn render_delegates_to_current_state() {
        let mut machine = machine();
        let mut log = Vec::new();
        machine.change(Name::B, 0, &mut log).unwrap();
        let mut out = RenderList::new();
        machine.render(&log, &mut out);
        assert_eq!(out.len(), 1);
    }
}
