use serde::{Deserialize, Serialize};

/// The request to parse some resume text.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct Req {
    /// Plain text of the resume, as pasted by the user.
    pub resume_text: String,
}

/// Where the parse endpoint lives.
pub const PATH: &str = "/api/v1/resumes/parse";
