pub mod calculation;
pub mod error;
pub mod interaction;
pub mod session;
pub mod sum;
pub mod ticket;
pub mod transport;

pub use calculation::{RemoteCalculation, format_number, parse_decimal, parse_integer};
pub use error::{CallError, TransportError, UNEXPECTED_ERROR_MESSAGE, UNKNOWN_ERROR_MESSAGE};
pub use interaction::{Interaction, Phase, Snapshot, Submission, call_function};
pub use session::{DEFAULT_MAX_SESSIONS, Session, SessionStore};
pub use sum::{SUM_FUNCTION_URL, SumCalculation, SumForm, SumRequest, SumResult};
pub use ticket::{
    TICKET_FUNCTION_URL, TicketCalculation, TicketForm, TicketRequest, TicketResult,
};
pub use transport::{FunctionTransport, HttpFunctionTransport, RawReply};
