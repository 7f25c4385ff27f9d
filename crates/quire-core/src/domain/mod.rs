//! Domain model (ids, tasks, server snapshots, display rows, errors, events).

pub mod display;
pub mod errors;
pub mod events;
pub mod ids;
pub mod status;
pub mod task;

pub use self::display::{DisplayItem, DisplayKey, DisplayView, StatusCounts};
pub use self::errors::{ErrorKind, PersistenceError, PollError, TaskError};
pub use self::events::DomainEvent;
pub use self::ids::{BookId, ParseIdError, TaskId};
pub use self::status::{BookResult, CurrentJob, ServerStatus, StatusReport};
pub use self::task::{Task, TaskStatus};
