use yew::Callback;

use crate::util::{cerror, clog, cwarn};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

impl Severity {
    pub fn css_name(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Notice {
    pub message: String,
    pub severity: Severity,
}

impl Notice {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Severity::Info, message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(Severity::Success, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }
}

/// Fire-and-forget user notifications. Implementations must not panic.
pub trait Notifier {
    fn notify(&self, notice: Notice);
}

// The toast stack component hands out a callback; every notice is mirrored to the console.
impl Notifier for Callback<Notice> {
    fn notify(&self, notice: Notice) {
        match notice.severity {
            Severity::Error => cerror(&notice.message),
            Severity::Warning => cwarn(&notice.message),
            _ => clog(&notice.message),
        }
        self.emit(notice);
    }
}
