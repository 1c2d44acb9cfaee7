//! The function runner: per-visitor ticket pricing and sum cards behind a
//! shared transport.

use std::sync::Arc;

use axum::Router;
use runner_http::HttpClient;
use uuid::Uuid;

use crate::api::rest::routes;
use crate::domain::{
    FunctionTransport, HttpFunctionTransport, SUM_FUNCTION_URL, Session, SessionStore,
    TICKET_FUNCTION_URL,
};

pub struct FunctionRunner {
    transport: Arc<dyn FunctionTransport>,
    ticket_url: String,
    sum_url: String,
    sessions: SessionStore,
}

impl FunctionRunner {
    /// Cards posting to their fixed function URLs.
    #[must_use]
    pub fn new(transport: Arc<dyn FunctionTransport>) -> Self {
        Self::with_endpoints(transport, TICKET_FUNCTION_URL, SUM_FUNCTION_URL)
    }

    #[must_use]
    pub fn from_client(client: HttpClient) -> Self {
        Self::new(Arc::new(HttpFunctionTransport::new(client)))
    }

    /// Cards posting to the given URLs instead.
    #[must_use]
    pub fn with_endpoints(
        transport: Arc<dyn FunctionTransport>,
        ticket_url: impl Into<String>,
        sum_url: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            ticket_url: ticket_url.into(),
            sum_url: sum_url.into(),
            sessions: SessionStore::default(),
        }
    }

    /// Keep at most `limit` visitor sessions.
    #[must_use]
    pub fn with_session_limit(mut self, limit: usize) -> Self {
        self.sessions = SessionStore::new(limit);
        self
    }

    #[must_use]
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// The visitor's session if `id` names a live one.
    #[must_use]
    pub fn session(&self, id: Option<Uuid>) -> Option<Arc<Session>> {
        id.and_then(|id| self.sessions.get(&id))
    }

    /// Start a session with both cards in their initial state.
    pub fn open_session(&self) -> (Uuid, Arc<Session>) {
        let (id, session) = self.sessions.insert(Session::new(
            &self.transport,
            &self.ticket_url,
            &self.sum_url,
        ));
        tracing::debug!(session = %id, "opened visitor session");
        (id, session)
    }

    #[must_use]
    pub fn router(self: Arc<Self>) -> Router {
        tracing::info!(
            ticket = %self.ticket_url,
            sum = %self.sum_url,
            max_sessions = self.sessions.capacity(),
            "registering function runner routes"
        );
        routes::register_routes(Router::new(), self)
    }
}
