//! Form state and the submit lifecycle of one calculator component.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tracing::{debug, error, info, instrument, warn};

use super::calculation::RemoteCalculation;
use super::error::{CallError, UNEXPECTED_ERROR_MESSAGE};
use super::transport::FunctionTransport;

/// Where a component is in its request lifecycle. Result and error are
/// mutually exclusive by construction.
#[derive(Debug, Clone, PartialEq)]
pub enum Phase<T> {
    Idle,
    Loading,
    Success(T),
    Failure(String),
}

impl<T> Phase<T> {
    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    #[must_use]
    pub fn result(&self) -> Option<&T> {
        match self {
            Self::Success(value) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failure(message) => Some(message),
            _ => None,
        }
    }
}

/// Owned copy of a component's state, taken under the lock.
#[derive(Debug, Clone)]
pub struct Snapshot<F, O> {
    pub form: F,
    pub phase: Phase<O>,
}

/// Initial form values, nothing submitted.
impl<F: Default, O> Default for Snapshot<F, O> {
    fn default() -> Self {
        Self {
            form: F::default(),
            phase: Phase::Idle,
        }
    }
}

/// What happened to a submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    /// The call finished and its outcome was stored.
    Settled,
    /// A call was already in flight; nothing was sent.
    Ignored,
    /// The component was reset or dropped before the call finished; the
    /// outcome was discarded.
    Abandoned,
}

struct State<C: RemoteCalculation> {
    form: C::Form,
    phase: Phase<C::Output>,
    /// Bumped by `reset`; a call only settles into the generation it started in.
    generation: u64,
}

/// One calculator component: its form, its phase and the call in flight.
///
/// At most one call runs per component. The call itself runs on a spawned
/// task holding only a weak reference back, so it always settles (or is
/// discarded) even if the submitter goes away.
pub struct Interaction<C: RemoteCalculation> {
    transport: Arc<dyn FunctionTransport>,
    endpoint: String,
    state: Mutex<State<C>>,
}

impl<C: RemoteCalculation> Interaction<C> {
    /// Component in its initial state, posting to the function's fixed endpoint.
    #[must_use]
    pub fn new(transport: Arc<dyn FunctionTransport>) -> Self {
        Self::with_endpoint(transport, C::ENDPOINT)
    }

    #[must_use]
    pub fn with_endpoint(
        transport: Arc<dyn FunctionTransport>,
        endpoint: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            endpoint: endpoint.into(),
            state: Mutex::new(State {
                form: C::Form::default(),
                phase: Phase::Idle,
                generation: 0,
            }),
        }
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot<C::Form, C::Output> {
        let state = self.state.lock();
        Snapshot {
            form: state.form.clone(),
            phase: state.phase.clone(),
        }
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state.lock().phase.is_loading()
    }

    /// Back to the default form and `Idle`. A call in flight is abandoned.
    pub fn reset(&self) {
        let mut state = self.state.lock();
        state.generation = state.generation.wrapping_add(1);
        state.form = C::Form::default();
        state.phase = Phase::Idle;
        debug!(function = C::NAME, "component reset");
    }

    /// Store `form`, call the remote function with it and record the outcome.
    ///
    /// Ignored while a previous call is still in flight.
    #[instrument(skip_all, fields(function = C::NAME))]
    pub async fn submit(self: &Arc<Self>, form: C::Form) -> Submission {
        let Some(generation) = self.begin(form.clone()) else {
            debug!("call already in flight, submit ignored");
            return Submission::Ignored;
        };

        let transport = Arc::clone(&self.transport);
        let endpoint = self.endpoint.clone();
        let component = Arc::downgrade(self);
        let call = tokio::spawn(async move {
            let outcome = call_function::<C>(transport.as_ref(), &endpoint, &form).await;
            settle(&component, generation, outcome)
        });

        match call.await {
            Ok(submission) => submission,
            Err(err) => {
                error!(error = %err, "function call task failed");
                self.store(generation, Phase::Failure(UNEXPECTED_ERROR_MESSAGE.to_owned()))
            }
        }
    }

    fn begin(&self, form: C::Form) -> Option<u64> {
        let mut state = self.state.lock();
        if state.phase.is_loading() {
            return None;
        }
        state.form = form;
        state.phase = Phase::Loading;
        Some(state.generation)
    }

    fn store(&self, generation: u64, phase: Phase<C::Output>) -> Submission {
        let mut state = self.state.lock();
        if state.generation != generation || !state.phase.is_loading() {
            debug!("outcome arrived after reset, discarded");
            return Submission::Abandoned;
        }
        state.phase = phase;
        Submission::Settled
    }
}

fn settle<C: RemoteCalculation>(
    component: &Weak<Interaction<C>>,
    generation: u64,
    outcome: Result<C::Output, CallError>,
) -> Submission {
    let phase = match outcome {
        Ok(output) => {
            info!(function = C::NAME, "function call succeeded");
            Phase::Success(output)
        }
        Err(err) => {
            warn!(function = C::NAME, error = %err, "function call failed");
            Phase::Failure(err.user_message())
        }
    };

    match component.upgrade() {
        Some(component) => component.store(generation, phase),
        None => {
            debug!(function = C::NAME, "component dropped before the call finished");
            Submission::Abandoned
        }
    }
}

/// POST the form's request body to `endpoint` and decode the reply.
///
/// # Errors
/// [`CallError::Transport`] when no reply arrived, [`CallError::HttpStatus`]
/// for a non-2xx reply, [`CallError::Decode`] when a 2xx body does not match
/// the expected shape.
pub async fn call_function<C: RemoteCalculation>(
    transport: &dyn FunctionTransport,
    endpoint: &str,
    form: &C::Form,
) -> Result<C::Output, CallError> {
    let body = serde_json::to_value(C::request(form)).map_err(CallError::Encode)?;
    debug!(function = C::NAME, %body, "posting to remote function");

    let reply = transport.post_json(endpoint, &body).await?;
    if !reply.status.is_success() {
        return Err(CallError::from_status(reply.status, &reply.body));
    }

    serde_json::from_slice(&reply.body).map_err(CallError::Decode)
}
