//! Common code for resume agent clients: talking to the API and keeping track
//! of the session.

/// Talk to the resume agent API.
pub mod api;
pub use api::Client;

/// The state of one user's session with the API.
pub mod session;
pub use session::Session;

#[cfg(test)]
mod test;
