use crate::api::{login, parse, signup, Client};
use serde_json::Value;
use std::collections::BTreeSet;

/// How many characters of the token to show before eliding the rest.
const TOKEN_PREVIEW_LEN: usize = 20;

/// The calls a session can make to the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Operation {
    /// Create a new account
    Register,

    /// Log in and get a token
    Authenticate,

    /// Send resume text to be parsed
    SubmitResumeText,
}

impl Operation {
    /// A short human-readable name for status displays.
    pub fn label(self) -> &'static str {
        match self {
            Self::Register => "signing up",
            Self::Authenticate => "logging in",
            Self::SubmitResumeText => "parsing resume",
        }
    }
}

/// What the user typed into the login fields.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Email address, which is also the login username
    pub email: String,

    /// Plaintext password
    pub password: String,
}

/// The most recent thing that happened as a result of talking to the server.
/// Every finished call replaces whatever was here before.
#[derive(Debug, Default, Clone, PartialEq)]
pub enum LastResult {
    /// Nothing has finished yet.
    #[default]
    None,

    /// The server sent back some JSON.
    Response(Value),

    /// Something went wrong.
    Error(String),
}

/// A call that is ready to send: a snapshot of the client (including the
/// token, if any) and the request body built from the current fields.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    /// Create a new account
    Register(Client, signup::Req),

    /// Log in and get a token
    Authenticate(Client, login::Req),

    /// Send resume text to be parsed
    SubmitResumeText(Client, parse::Req),
}

impl Call {
    /// Which operation this call is for.
    pub fn operation(&self) -> Operation {
        match self {
            Self::Register(..) => Operation::Register,
            Self::Authenticate(..) => Operation::Authenticate,
            Self::SubmitResumeText(..) => Operation::SubmitResumeText,
        }
    }
}

/// All the state for one user's session: what they've typed, whether they're
/// logged in, and what the server last said.
///
/// Only two auth states exist. Without a token we're unauthenticated and
/// resume parsing is unavailable. A successful login moves us to
/// authenticated, and nothing moves us back.
#[derive(Debug, Clone)]
pub struct Session {
    /// Where to send requests, plus the token once we have one
    client: Client,

    /// Login fields
    credentials: Credentials,

    /// Text to send for parsing
    resume_text: String,

    /// What to show the user
    last_result: LastResult,

    /// Calls that have started but not finished
    in_flight: BTreeSet<Operation>,
}

impl Session {
    /// Start an unauthenticated session against the given server.
    pub fn new(server: String) -> Self {
        Self {
            client: Client::new(server),
            credentials: Credentials::default(),
            resume_text: String::new(),
            last_result: LastResult::None,
            in_flight: BTreeSet::new(),
        }
    }

    /// The server we're talking to.
    pub fn server(&self) -> &str {
        &self.client.server
    }

    /// The current login fields.
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Replace both login fields at once.
    pub fn credentials_changed(&mut self, email: String, password: String) {
        self.credentials = Credentials { email, password };
    }

    /// Replace the email field.
    pub fn set_email(&mut self, email: String) {
        self.credentials.email = email;
    }

    /// Replace the password field.
    pub fn set_password(&mut self, password: String) {
        self.credentials.password = password;
    }

    /// The text that will be sent for parsing.
    pub fn resume_text(&self) -> &str {
        &self.resume_text
    }

    /// Replace the text that will be sent for parsing.
    pub fn set_resume_text(&mut self, text: String) {
        self.resume_text = text;
    }

    /// The current token, if we've logged in.
    pub fn token(&self) -> Option<&str> {
        self.client.auth.as_deref()
    }

    /// Whether resume parsing should be offered at all.
    pub fn parse_available(&self) -> bool {
        self.token().is_some_and(|token| !token.is_empty())
    }

    /// The start of the token, suitable for showing on screen.
    pub fn token_preview(&self) -> Option<String> {
        self.token().map(|token| {
            let mut preview: String = token.chars().take(TOKEN_PREVIEW_LEN).collect();
            preview.push_str("...");
            preview
        })
    }

    /// What to show the user about the most recent call.
    pub fn last_result(&self) -> &LastResult {
        &self.last_result
    }

    /// Whether a call for `op` has started and not yet finished.
    pub fn is_in_flight(&self, op: Operation) -> bool {
        self.in_flight.contains(&op)
    }

    /// All the calls currently in flight, in a stable order.
    pub fn in_flight(&self) -> impl Iterator<Item = Operation> + '_ {
        self.in_flight.iter().copied()
    }

    /// Mark `op` as in flight. Returns `false` if it already was, in which
    /// case the caller should not send anything.
    pub fn call_started(&mut self, op: Operation) -> bool {
        self.in_flight.insert(op)
    }

    /// The signup request for the current credentials.
    pub fn register_request(&self) -> signup::Req {
        signup::Req::new(
            self.credentials.email.clone(),
            self.credentials.password.clone(),
        )
    }

    /// The login request for the current credentials.
    pub fn authenticate_request(&self) -> login::Req {
        login::Req {
            username: self.credentials.email.clone(),
            password: self.credentials.password.clone(),
        }
    }

    /// The parse request for the current text, or `None` if we're not logged
    /// in and so should not be sending one at all.
    pub fn submit_request(&self) -> Option<parse::Req> {
        if self.parse_available() {
            Some(parse::Req {
                resume_text: self.resume_text.clone(),
            })
        } else {
            None
        }
    }

    /// Try to start `op`, returning the call to send. Returns `None` when the
    /// operation is not available (parsing without a token) or the same
    /// operation is already in flight.
    pub fn start(&mut self, op: Operation) -> Option<Call> {
        let call = match op {
            Operation::Register => Call::Register(self.client.clone(), self.register_request()),
            Operation::Authenticate => {
                Call::Authenticate(self.client.clone(), self.authenticate_request())
            }
            Operation::SubmitResumeText => {
                Call::SubmitResumeText(self.client.clone(), self.submit_request()?)
            }
        };

        if self.call_started(op) {
            Some(call)
        } else {
            tracing::debug!(?op, "ignoring duplicate call while one is in flight");
            None
        }
    }

    /// A call finished and the server sent back `body`.
    pub fn call_succeeded(&mut self, op: Operation, body: Value) {
        self.in_flight.remove(&op);
        self.last_result = LastResult::Response(body);
    }

    /// Login finished and gave us `token`. We keep the full response to show
    /// the user as well.
    pub fn auth_succeeded(&mut self, token: String, body: Value) {
        if token.is_empty() {
            self.call_failed(
                Operation::Authenticate,
                "login response did not contain an access token".to_owned(),
            );
            return;
        }

        self.client.auth = Some(token);
        self.call_succeeded(Operation::Authenticate, body);
    }

    /// A call failed. The message replaces any previous response. A failed
    /// login leaves an existing token alone.
    pub fn call_failed(&mut self, op: Operation, message: String) {
        self.in_flight.remove(&op);
        self.last_result = LastResult::Error(message);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn session() -> Session {
        Session::new("http://localhost:8000".into())
    }

    fn logged_in(token: &str) -> Session {
        let mut session = session();
        assert!(session.call_started(Operation::Authenticate));
        session.auth_succeeded(token.into(), json!({"access_token": token}));
        session
    }

    mod auth_state {
        use super::*;

        #[test]
        fn starts_unauthenticated() {
            let session = session();

            assert_eq!(session.token(), None);
            assert!(!session.parse_available());
            assert_eq!(session.last_result(), &LastResult::None);
        }

        #[test]
        fn login_sets_token_and_shows_response() {
            let mut session = session();
            session.credentials_changed("a@b.com".into(), "p".into());

            assert!(session.start(Operation::Authenticate).is_some());
            session.auth_succeeded("tok123".into(), json!({"access_token": "tok123"}));

            assert_eq!(session.token(), Some("tok123"));
            assert!(session.parse_available());
            assert_eq!(
                session.last_result(),
                &LastResult::Response(json!({"access_token": "tok123"}))
            );
        }

        #[test]
        fn register_does_not_authenticate() {
            let mut session = session();

            assert!(session.start(Operation::Register).is_some());
            session.call_succeeded(Operation::Register, json!({"id": 1}));

            assert!(!session.parse_available());
        }

        #[test]
        fn failed_login_keeps_previous_token() {
            let mut session = logged_in("old");

            assert!(session.start(Operation::Authenticate).is_some());
            session.call_failed(Operation::Authenticate, "bad password".into());

            assert_eq!(session.token(), Some("old"));
            assert!(session.parse_available());
        }

        #[test]
        fn empty_token_is_not_stored() {
            let mut session = session();

            assert!(session.start(Operation::Authenticate).is_some());
            session.auth_succeeded(String::new(), json!({"access_token": ""}));

            assert_eq!(session.token(), None);
            assert!(!session.parse_available());
            assert!(matches!(session.last_result(), LastResult::Error(_)));
        }

        #[test]
        fn relogin_replaces_token() {
            let mut session = logged_in("first");

            assert!(session.start(Operation::Authenticate).is_some());
            session.auth_succeeded("second".into(), json!({}));

            assert_eq!(session.token(), Some("second"));
        }
    }

    mod gating {
        use super::*;

        #[test]
        fn no_submit_before_login() {
            let mut session = session();
            session.set_resume_text("Jane Doe".into());

            assert_eq!(session.submit_request(), None);
            assert_eq!(session.start(Operation::SubmitResumeText), None);
            assert!(!session.is_in_flight(Operation::SubmitResumeText));
        }

        #[test]
        fn submit_after_login_carries_token_and_text() {
            let mut session = logged_in("tok123");
            session.set_resume_text("Jane Doe".into());

            match session.start(Operation::SubmitResumeText) {
                Some(Call::SubmitResumeText(client, req)) => {
                    assert_eq!(client.auth.as_deref(), Some("tok123"));
                    assert_eq!(req.resume_text, "Jane Doe");
                }
                other => panic!("expected a submit call, got {other:?}"),
            }
        }

        proptest! {
            #[test]
            fn unreachable_whatever_else_happens(email: String, password: String, text: String) {
                let mut session = session();
                session.credentials_changed(email, password);
                session.set_resume_text(text);

                if session.start(Operation::Register).is_some() {
                    session.call_succeeded(Operation::Register, json!({}));
                }
                if session.start(Operation::Authenticate).is_some() {
                    session.call_failed(Operation::Authenticate, "nope".into());
                }

                prop_assert!(!session.parse_available());
                prop_assert!(session.start(Operation::SubmitResumeText).is_none());
            }
        }
    }

    mod requests {
        use super::*;

        #[test]
        fn register_scenario() {
            let mut session = session();
            session.credentials_changed("a@b.com".into(), "p".into());

            assert_eq!(
                session.start(Operation::Register),
                Some(Call::Register(
                    Client::new("http://localhost:8000".into()),
                    signup::Req {
                        email: "a@b.com".into(),
                        password: "p".into(),
                        full_name: "Test User".into(),
                    }
                ))
            );
        }

        proptest! {
            #[test]
            fn register_uses_current_credentials(email: String, password: String) {
                let mut session = session();
                session.set_email(email.clone());
                session.set_password(password.clone());

                let req = session.register_request();
                prop_assert_eq!(req.email, email);
                prop_assert_eq!(req.password, password);
                prop_assert_eq!(req.full_name, signup::FULL_NAME);
            }

            #[test]
            fn authenticate_uses_current_credentials(email: String, password: String) {
                let mut session = session();
                session.credentials_changed(email.clone(), password.clone());

                let req = session.authenticate_request();
                prop_assert_eq!(req.username, email);
                prop_assert_eq!(req.password, password);
            }
        }
    }

    mod results {
        use super::*;

        #[test]
        fn error_clears_previous_response() {
            let mut session = session();

            assert!(session.start(Operation::Register).is_some());
            session.call_succeeded(Operation::Register, json!({"id": 1}));
            assert!(session.start(Operation::Register).is_some());
            session.call_failed(Operation::Register, "Network Error".into());

            assert_eq!(
                session.last_result(),
                &LastResult::Error("Network Error".into())
            );
        }

        #[test]
        fn response_clears_previous_error() {
            let mut session = session();

            assert!(session.start(Operation::Register).is_some());
            session.call_failed(Operation::Register, "Network Error".into());
            assert!(session.start(Operation::Register).is_some());
            session.call_succeeded(Operation::Register, json!({"id": 1}));

            assert_eq!(
                session.last_result(),
                &LastResult::Response(json!({"id": 1}))
            );
        }

        #[test]
        fn later_arrival_wins() {
            let mut session = logged_in("tok");

            assert!(session.start(Operation::Register).is_some());
            assert!(session.start(Operation::SubmitResumeText).is_some());

            session.call_succeeded(Operation::SubmitResumeText, json!({"parsed": true}));
            session.call_succeeded(Operation::Register, json!({"id": 1}));

            assert_eq!(
                session.last_result(),
                &LastResult::Response(json!({"id": 1}))
            );
        }
    }

    mod in_flight {
        use super::*;

        #[test]
        fn duplicate_call_is_rejected() {
            let mut session = session();

            assert!(session.start(Operation::Register).is_some());
            assert_eq!(session.start(Operation::Register), None);
        }

        #[test]
        fn different_operations_can_overlap() {
            let mut session = session();

            assert!(session.start(Operation::Register).is_some());
            assert!(session.start(Operation::Authenticate).is_some());
            assert_eq!(
                session.in_flight().collect::<Vec<_>>(),
                vec![Operation::Register, Operation::Authenticate]
            );
        }

        #[test]
        fn finishing_allows_another_call() {
            let mut session = session();

            assert!(session.start(Operation::Register).is_some());
            session.call_failed(Operation::Register, "oops".into());

            assert!(session.start(Operation::Register).is_some());
        }
    }

    mod token_preview {
        use super::*;

        #[test]
        fn none_without_token() {
            assert_eq!(session().token_preview(), None);
        }

        #[test]
        fn truncates_long_tokens() {
            let session = logged_in("abcdefghijklmnopqrstuvwxyz");

            assert_eq!(
                session.token_preview().as_deref(),
                Some("abcdefghijklmnopqrst...")
            );
        }
    }
}
