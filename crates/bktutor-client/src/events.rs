//! What a controller asks its renderer to do after an operation.

use bktutor_shared::types::SessionId;

/// Page-level destinations of the web application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Login,
    StudentHome,
    SessionDetail(SessionId),
    AttendedDetail(String),
}

impl Navigation {
    pub fn path(&self) -> String {
        match self {
            Navigation::Login => "/login.html".to_string(),
            Navigation::StudentHome => "/student.html".to_string(),
            Navigation::SessionDetail(id) => format!("/session.html?id={id}"),
            Navigation::AttendedDetail(id) => format!("/attended.html?id={id}"),
        }
    }
}

/// Result of a controller operation.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Stay on the current page; re-read controller state.
    Stay,
    /// Leave the page. Controller state should be dropped.
    Navigate(Navigation),
}

impl Step {
    pub fn to_login() -> Self {
        Step::Navigate(Navigation::Login)
    }

    pub fn is_redirect(&self) -> bool {
        matches!(self, Step::Navigate(_))
    }
}

/// Inline status message shown next to a form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub is_error: bool,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}
