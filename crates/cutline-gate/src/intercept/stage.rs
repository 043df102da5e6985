use std::sync::Arc;

use cutline_core::{encode, Action, Dispatched};

use crate::config::schema::InterceptorSection;
use crate::criteria::Criteria;

/// Pipeline context handed to a stage by the surrounding dispatcher.
pub trait StoreContext {
    type State;
    fn get_state(&self) -> Self::State;
}

impl<F, S> StoreContext for F
where
    F: Fn() -> S,
{
    type State = S;

    fn get_state(&self) -> S {
        self()
    }
}

/// Policy gate, configured once.
/// Cheap to clone; the criteria are shared.
pub struct Interceptor<C> {
    criteria: Arc<C>,
    name: String,
    trace_blocked: bool,
}

impl<C> Clone for Interceptor<C> {
    fn clone(&self) -> Self {
        Self {
            criteria: Arc::clone(&self.criteria),
            name: self.name.clone(),
            trace_blocked: self.trace_blocked,
        }
    }
}

impl<C> Interceptor<C> {
    pub fn new(criteria: C) -> Self {
        Self::with_config(criteria, &InterceptorSection::default())
    }

    pub fn with_config(criteria: C, cfg: &InterceptorSection) -> Self {
        Self {
            criteria: Arc::new(criteria),
            name: cfg.name.clone(),
            trace_blocked: cfg.trace_blocked,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn criteria(&self) -> &C {
        &self.criteria
    }

    /// Decide one action: the action itself, or its envelope when the
    /// criteria return exactly `false`.
    ///
    /// A panicking criteria propagates; the action is never forwarded.
    pub fn gate<S, P>(&self, state: &S, action: Action<P>) -> Dispatched<P>
    where
        C: Criteria<S, P>,
    {
        if self.criteria.evaluate(state, &action).is_deny() {
            if self.trace_blocked {
                tracing::debug!(
                    stage = %self.name,
                    action_type = %action.action_type,
                    "action blocked"
                );
            }
            return Dispatched::Blocked(encode(action));
        }

        tracing::trace!(stage = %self.name, action_type = %action.action_type, "action permitted");
        Dispatched::Action(action)
    }

    /// Attach the store context.
    pub fn bind<'a, X: StoreContext>(&'a self, ctx: &'a X) -> BoundInterceptor<'a, C, X> {
        BoundInterceptor {
            interceptor: self,
            ctx,
        }
    }
}

/// Interceptor bound to a store context.
pub struct BoundInterceptor<'a, C, X> {
    interceptor: &'a Interceptor<C>,
    ctx: &'a X,
}

impl<'a, C, X> BoundInterceptor<'a, C, X> {
    /// Attach the downstream stage.
    pub fn next<N>(self, next: N) -> Stage<'a, C, X, N> {
        Stage { bound: self, next }
    }
}

/// Fully assembled stage.
pub struct Stage<'a, C, X, N> {
    bound: BoundInterceptor<'a, C, X>,
    next: N,
}

impl<'a, C, X, N> Stage<'a, C, X, N> {
    /// Gate `action` against the current state and forward the result.
    /// Returns whatever the next stage returns.
    pub fn handle<P, R>(&self, action: Action<P>) -> R
    where
        X: StoreContext,
        C: Criteria<X::State, P>,
        N: Fn(Dispatched<P>) -> R,
    {
        let state = self.bound.ctx.get_state();
        let out = self.bound.interceptor.gate(&state, action);
        (self.next)(out)
    }
}
