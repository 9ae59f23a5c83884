use crossterm::event::KeyEvent;
use resume_core::{api::login, session::Operation};
use serde_json::Value;

/// Things that can happen to this app
#[derive(Debug)]
pub enum Action {
    /// The user did something on the keyboard
    Key(KeyEvent),

    /// The user pasted some text into the terminal
    Paste(String),

    /// Something went wrong with the terminal itself; display it to the user
    Problem(String),

    /// A call finished and the server sent back some JSON
    Succeeded(Operation, Value),

    /// We logged in successfully and got a token
    LoggedIn(login::LoggedIn),

    /// A call failed for the given reason
    Failed(Operation, String),
}
