//! The atom: state store, action dispatcher, observer registry, and fuse

use crate::{
    merge::{shallow_merge, MergeFn},
    Action, ActionId, Error, Result, State, TraceEvent, TraceFn, Value,
};
use indexmap::IndexMap;
use std::rc::Rc;

/// A handler producing state changes for one action type
///
/// Receives the scoped dispatch context and the action payload; the handler
/// itself is responsible for calling [`Split::update`] with a delta.
pub type Handler = Rc<dyn Fn(&mut Split<'_>, Option<&Value>) -> Result<()>>;

/// The evolution function: decides what state changes an action causes
pub type EvolveFn = Rc<dyn Fn(&mut Split<'_>, &Action) -> Result<()>>;

/// A registered observer, called with the atom after every state change
pub type ListenerFn = Rc<dyn Fn(&mut Atom) -> Result<()>>;

/// The actions registry: a dispatch table from action type to handler
#[derive(Clone, Default)]
pub struct Actions(IndexMap<ActionId, Handler>);

impl Actions {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for an action type, builder style
    pub fn on(
        mut self,
        kind: impl Into<ActionId>,
        handler: impl Fn(&mut Split<'_>, Option<&Value>) -> Result<()> + 'static,
    ) -> Self {
        self.0.insert(kind.into(), Rc::new(handler));
        self
    }

    /// Insert a handler, replacing any existing one for the same type
    pub fn insert(&mut self, kind: impl Into<ActionId>, handler: Handler) {
        self.0.insert(kind.into(), handler);
    }

    /// Look up the handler for an action type
    pub fn get(&self, kind: &ActionId) -> Option<&Handler> {
        self.0.get(kind)
    }

    /// Merge another registry into this one, last write wins
    pub fn merge(&mut self, other: Actions) {
        for (kind, handler) in other.0 {
            self.0.insert(kind, handler);
        }
    }

    /// Check if a handler is registered for an action type
    pub fn contains(&self, kind: &ActionId) -> bool {
        self.0.contains_key(kind)
    }

    /// Number of registered handlers
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// How the atom evolves named actions into state changes
#[derive(Clone)]
pub enum Evolution {
    /// Custom evolution function
    Fn(EvolveFn),
    /// Dictionary dispatch over an actions registry
    Actions(Actions),
}

impl Evolution {
    /// Wrap a closure as a custom evolution function
    pub fn function(f: impl Fn(&mut Split<'_>, &Action) -> Result<()> + 'static) -> Self {
        Evolution::Fn(Rc::new(f))
    }
}

impl Default for Evolution {
    /// Dictionary dispatch over an empty registry
    fn default() -> Self {
        Evolution::Actions(Actions::new())
    }
}

/// Configuration for an atom
#[derive(Clone)]
pub struct AtomConfig {
    /// Merge strategy for direct updates
    pub merge: MergeFn,
    /// Optional trace hook, invoked for every dispatch and update
    pub tracer: Option<TraceFn>,
}

impl Default for AtomConfig {
    fn default() -> Self {
        Self {
            merge: Rc::new(shallow_merge),
            tracer: None,
        }
    }
}

impl AtomConfig {
    /// Default configuration: shallow merge, no tracer
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the merge strategy
    pub fn with_merge(mut self, merge: impl Fn(&State, &State) -> State + 'static) -> Self {
        self.merge = Rc::new(merge);
        self
    }

    /// Enable tracing with the given hook
    pub fn with_tracer(mut self, tracer: impl Fn(TraceEvent<'_>) + 'static) -> Self {
        self.tracer = Some(Rc::new(tracer));
        self
    }
}

/// Token returned from [`Atom::observe`], used to remove the listener again
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// The reactive state container
///
/// Holds the current state, the actions registry, and the listener list
/// behind a single-writer API. All dispatch and notification is synchronous:
/// every listener and evolution invocation completes on the calling stack
/// before the originating call returns.
pub struct Atom {
    state: State,
    actions: Actions,
    evolve: EvolveFn,
    listeners: Vec<(ListenerId, ListenerFn)>,
    next_listener_id: u64,
    seq: u64,
    merge: MergeFn,
    tracer: Option<TraceFn>,
}

impl Atom {
    /// Create an atom with dictionary evolution over an empty registry
    pub fn new(initial: State) -> Self {
        Self::with_config(initial, Evolution::default(), AtomConfig::default())
    }

    /// Create an atom from an actions registry (dictionary evolution)
    pub fn with_actions(initial: State, actions: Actions) -> Self {
        Self::with_config(initial, Evolution::Actions(actions), AtomConfig::default())
    }

    /// Create an atom with a custom evolution function
    pub fn with_evolve(
        initial: State,
        evolve: impl Fn(&mut Split<'_>, &Action) -> Result<()> + 'static,
    ) -> Self {
        Self::with_config(initial, Evolution::function(evolve), AtomConfig::default())
    }

    /// Create an atom with explicit evolution and configuration
    pub fn with_config(initial: State, evolution: Evolution, config: AtomConfig) -> Self {
        let (evolve, actions): (EvolveFn, Actions) = match evolution {
            Evolution::Fn(f) => (f, Actions::new()),
            Evolution::Actions(actions) => (Rc::new(dictionary_evolve), actions),
        };
        Self {
            state: initial,
            actions,
            evolve,
            listeners: Vec::new(),
            next_listener_id: 0,
            seq: 0,
            merge: config.merge,
            tracer: config.tracer,
        }
    }

    /// Current state. No side effects.
    pub fn get(&self) -> &State {
        &self.state
    }

    /// Dispatch a named action without payload
    pub fn dispatch(&mut self, kind: impl Into<ActionId>) -> Result<()> {
        self.dispatch_in(kind.into(), None, &[])
    }

    /// Dispatch a named action with a payload
    pub fn dispatch_with(
        &mut self,
        kind: impl Into<ActionId>,
        payload: impl Into<Value>,
    ) -> Result<()> {
        self.dispatch_in(kind.into(), Some(payload.into()), &[])
    }

    /// Merge a partial state directly, then notify listeners
    pub fn update(&mut self, delta: State) -> Result<()> {
        self.update_in(delta, &[])
    }

    /// Register a listener, appended after all existing ones
    ///
    /// Registering the same logic twice creates two independent entries,
    /// each removable by its own token.
    pub fn observe(&mut self, listener: impl Fn(&mut Atom) -> Result<()> + 'static) -> ListenerId {
        let id = ListenerId(self.next_listener_id);
        self.next_listener_id += 1;
        self.listeners.push((id, Rc::new(listener)));
        id
    }

    /// Remove a listener by token
    ///
    /// Returns false if it was already removed or never registered; that is
    /// not an error.
    pub fn unobserve(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    /// Compose additional state and handlers into this atom
    ///
    /// Registry entries merge last-write-wins; state goes through the
    /// normal update path, triggering merge, trace, and notification.
    pub fn fuse(&mut self, more_state: Option<State>, more_actions: Option<Actions>) -> Result<()> {
        if let Some(actions) = more_actions {
            self.actions.merge(actions);
        }
        if let Some(state) = more_state {
            self.update(state)?;
        }
        Ok(())
    }

    fn dispatch_in(&mut self, kind: ActionId, payload: Option<Value>, source: &[Action]) -> Result<()> {
        self.seq += 1;
        let action = Action {
            seq: self.seq,
            kind,
            payload,
        };
        if let Some(tracer) = self.tracer.clone() {
            tracer(TraceEvent::Action {
                action: &action,
                source,
                state: &self.state,
            });
        }
        // The ancestor chain is only tracked while someone is watching
        let source = if self.tracer.is_some() {
            let mut chain = source.to_vec();
            chain.push(action.clone());
            chain
        } else {
            Vec::new()
        };
        let evolve = Rc::clone(&self.evolve);
        let mut split = Split { atom: self, source };
        evolve(&mut split, &action)
    }

    fn update_in(&mut self, delta: State, source: &[Action]) -> Result<()> {
        let next = (self.merge)(&self.state, &delta);
        let prev = std::mem::replace(&mut self.state, next);
        if let Some(tracer) = self.tracer.clone() {
            tracer(TraceEvent::Update {
                delta: &delta,
                source,
                prev: &prev,
                state: &self.state,
            });
        }
        self.notify()
    }

    /// Notify listeners in registration order
    ///
    /// Iterates over a snapshot so listeners may observe, unobserve, or
    /// dispatch re-entrantly without invalidating the iteration. A failing
    /// listener stops the round; later listeners are not invoked.
    fn notify(&mut self) -> Result<()> {
        let snapshot: Vec<ListenerFn> = self.listeners.iter().map(|(_, f)| Rc::clone(f)).collect();
        for listener in snapshot {
            listener(self)?;
        }
        Ok(())
    }
}

impl Default for Atom {
    fn default() -> Self {
        Self::new(State::new())
    }
}

/// Scoped dispatch context handed to evolution functions and handlers
///
/// Carries the ancestor-action chain so nested dispatches can be traced back
/// to their causal root. The chain is populated only while tracing is
/// enabled.
pub struct Split<'a> {
    atom: &'a mut Atom,
    source: Vec<Action>,
}

impl Split<'_> {
    /// Current state
    pub fn get(&self) -> &State {
        self.atom.get()
    }

    /// Dispatch a further named action from inside an evolution call
    pub fn dispatch(&mut self, kind: impl Into<ActionId>) -> Result<()> {
        self.atom.dispatch_in(kind.into(), None, &self.source)
    }

    /// Dispatch a further named action with a payload
    pub fn dispatch_with(
        &mut self,
        kind: impl Into<ActionId>,
        payload: impl Into<Value>,
    ) -> Result<()> {
        self.atom
            .dispatch_in(kind.into(), Some(payload.into()), &self.source)
    }

    /// Merge a state delta, notifying listeners before returning
    pub fn update(&mut self, delta: State) -> Result<()> {
        self.atom.update_in(delta, &self.source)
    }

    /// Look up a handler in the actions registry
    pub fn handler(&self, kind: &ActionId) -> Option<Handler> {
        self.atom.actions.get(kind).cloned()
    }
}

/// Dictionary dispatch: run the registered handler for the action's type
///
/// A missing handler is an error at the point of lookup; nothing is
/// recovered internally.
fn dictionary_evolve(split: &mut Split<'_>, action: &Action) -> Result<()> {
    let handler = split
        .handler(&action.kind)
        .ok_or_else(|| Error::UnknownAction(action.kind.clone()))?;
    handler(split, action.payload.as_ref())
}
