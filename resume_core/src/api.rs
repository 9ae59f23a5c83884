/// Things that can go wrong in the API
pub mod error;
pub use error::Error;

/// The client that makes requests to the API
pub mod client;
pub use client::Client;

/// Register a new account
pub mod signup;

/// Exchange credentials for an access token
pub mod login;

/// Parse resume text into structured data
pub mod parse;
