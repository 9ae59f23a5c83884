use serde::{Deserialize, Serialize};

/// The display name we register every account with.
pub const FULL_NAME: &str = "Test User";

/// The request to register a new account.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct Req {
    /// Email to use for contact and login.
    pub email: String,

    /// Plaintext password to use for login.
    pub password: String,

    /// Name to show for the account.
    pub full_name: String,
}

impl Req {
    /// Build a request with the standard display name.
    pub fn new(email: String, password: String) -> Self {
        Self {
            email,
            password,
            full_name: FULL_NAME.to_owned(),
        }
    }
}

/// Where the signup endpoint lives.
pub const PATH: &str = "/api/v1/signup";
