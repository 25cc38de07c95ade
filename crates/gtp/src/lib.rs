//! GTP protocol driver for engine subprocesses.
//!
//! One [`GameSession`] owns one engine process for its whole lifetime and
//! exposes the line-protocol-shaped API the job layer drives: version
//! handshake, move generation, score query, training-data dumps, SGF
//! read/write and teardown.

pub mod error;
pub mod process;
mod record;
pub mod session;
pub mod state;

pub use error::{GtpError, Result};
pub use process::{find_engine_binary, DEFAULT_ENGINE_BINARY};
pub use session::{GameSession, StartOptions};
pub use state::{GameState, BOARD_SIZE, MAX_MOVES};
