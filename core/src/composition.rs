//! Reducer composition utilities
//!
//! The client splits its workflows across several reducers that all operate
//! on the same application state and action type. [`combine_reducers`] runs
//! them in order and concatenates their effects.
//!
//! # Example
//!
//! ```
//! use tripsync_core::effect::Effect;
//! use tripsync_core::reducer::Reducer;
//! use tripsync_core::{SmallVec, smallvec};
//! use tripsync_core::composition::{BoxedReducer, combine_reducers};
//!
//! #[derive(Default)]
//! struct FormState {
//!     train: Option<String>,
//!     submitted: bool,
//! }
//!
//! #[derive(Clone)]
//! enum FormAction {
//!     PickTrain(String),
//!     Submit,
//! }
//!
//! struct PickerReducer;
//! struct SubmitReducer;
//!
//! impl Reducer for PickerReducer {
//!     type State = FormState;
//!     type Action = FormAction;
//!     type Environment = ();
//!
//!     fn reduce(&self, state: &mut FormState, action: FormAction, _env: &()) -> SmallVec<[Effect<FormAction>; 4]> {
//!         if let FormAction::PickTrain(name) = action {
//!             state.train = Some(name);
//!         }
//!         SmallVec::new()
//!     }
//! }
//!
//! impl Reducer for SubmitReducer {
//!     type State = FormState;
//!     type Action = FormAction;
//!     type Environment = ();
//!
//!     fn reduce(&self, state: &mut FormState, action: FormAction, _env: &()) -> SmallVec<[Effect<FormAction>; 4]> {
//!         if matches!(action, FormAction::Submit) && state.train.is_some() {
//!             state.submitted = true;
//!         }
//!         smallvec![Effect::None]
//!     }
//! }
//!
//! let reducers: Vec<BoxedReducer<FormState, FormAction, ()>> =
//!     vec![Box::new(PickerReducer), Box::new(SubmitReducer)];
//! let combined = combine_reducers(reducers);
//! let mut state = FormState::default();
//! combined.reduce(&mut state, FormAction::PickTrain("Local Passenger".into()), &());
//! combined.reduce(&mut state, FormAction::Submit, &());
//! assert!(state.submitted);
//! ```

use crate::effect::Effect;
use crate::reducer::Reducer;
use smallvec::SmallVec;

/// Boxed reducer over a shared state/action/environment triple.
pub type BoxedReducer<S, A, E> = Box<dyn Reducer<State = S, Action = A, Environment = E> + Send + Sync>;

/// Combines multiple reducers that operate on the same state and action types.
///
/// Each reducer is run in sequence, and all effects are collected and
/// concatenated. `Effect::None` values are dropped so callers can rely on an
/// empty result meaning "nothing to execute".
#[must_use]
pub fn combine_reducers<S, A, E>(reducers: Vec<BoxedReducer<S, A, E>>) -> CombinedReducer<S, A, E>
where
    S: 'static,
    A: Clone + 'static,
    E: 'static,
{
    CombinedReducer { reducers }
}

/// A combined reducer that runs multiple reducers in sequence.
///
/// Created by [`combine_reducers`].
pub struct CombinedReducer<S, A, E>
where
    S: 'static,
    A: Clone + 'static,
    E: 'static,
{
    reducers: Vec<BoxedReducer<S, A, E>>,
}

impl<S, A, E> CombinedReducer<S, A, E>
where
    S: 'static,
    A: Clone + 'static,
    E: 'static,
{
    /// Number of child reducers
    #[must_use]
    pub fn len(&self) -> usize {
        self.reducers.len()
    }

    /// True when no child reducers were supplied
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reducers.is_empty()
    }
}

impl<S, A, E> Reducer for CombinedReducer<S, A, E>
where
    S: 'static,
    A: Clone + 'static,
    E: 'static,
{
    type State = S;
    type Action = A;
    type Environment = E;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let mut all_effects = SmallVec::new();

        for reducer in &self.reducers {
            let effects = reducer.reduce(state, action.clone(), env);
            all_effects.extend(effects.into_iter().filter(|effect| !effect.is_none()));
        }

        all_effects
    }
}
