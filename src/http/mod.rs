//! Command API subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection on the api bind address
//!     → server.rs (Axum setup, graceful shutdown, fault classification)
//!     → request.rs (request ID assigned and echoed back)
//!     → CommandRuntime (dispatch, owned by the commands module)
//!     → response.rs (command errors as JSON bodies)
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{MakeRequestUuidV4, X_REQUEST_ID};
pub use server::{CommandServer, ServerHandle, API_PREFIX};
