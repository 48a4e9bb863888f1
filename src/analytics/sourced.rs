use crate::error::InvocationError;

/// Data together with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub enum Sourced<T> {
    Live(T),
    Fallback(T, InvocationError),
}

impl<T> Sourced<T> {
    pub fn data(&self) -> &T {
        match self {
            Sourced::Live(data) | Sourced::Fallback(data, _) => data,
        }
    }

    pub fn into_data(self) -> T {
        match self {
            Sourced::Live(data) | Sourced::Fallback(data, _) => data,
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self, Sourced::Live(_))
    }

    pub fn source(&self) -> &'static str {
        if self.is_live() {
            "live"
        } else {
            "fallback"
        }
    }

    pub fn fallback_reason(&self) -> Option<&InvocationError> {
        match self {
            Sourced::Live(_) => None,
            Sourced::Fallback(_, reason) => Some(reason),
        }
    }
}
