//! Best-effort estimates with explicit fallback

/// Outcome of a stage that substitutes a fixed default instead of failing
///
/// Callers that only need the value use [`Estimate::value`]; callers that need
/// to report substitutions check [`Estimate::is_fallback`].
#[derive(Debug, Clone, PartialEq)]
pub enum Estimate<T> {
    /// The stage ran and produced a value from the signal
    Success(T),

    /// The stage could not run; `value` is the documented default
    Fallback {
        /// Substituted default
        value: T,
        /// Why the default was used
        reason: String,
    },
}

impl<T> Estimate<T> {
    /// Build a fallback, logging the reason
    pub fn fallback(value: T, reason: impl Into<String>) -> Self {
        let reason = reason.into();
        log::warn!("Using fallback value: {}", reason);
        Estimate::Fallback { value, reason }
    }

    /// Borrow the value regardless of its origin
    pub fn value(&self) -> &T {
        match self {
            Estimate::Success(value) => value,
            Estimate::Fallback { value, .. } => value,
        }
    }

    /// Take the value regardless of its origin
    pub fn into_value(self) -> T {
        match self {
            Estimate::Success(value) => value,
            Estimate::Fallback { value, .. } => value,
        }
    }

    /// True if the default was substituted
    pub fn is_fallback(&self) -> bool {
        matches!(self, Estimate::Fallback { .. })
    }

    /// Reason for the substitution, if any
    pub fn fallback_reason(&self) -> Option<&str> {
        match self {
            Estimate::Success(_) => None,
            Estimate::Fallback { reason, .. } => Some(reason),
        }
    }

    /// `"detected"` or `"fallback"`, as recorded in analysis metadata
    pub fn source_name(&self) -> &'static str {
        if self.is_fallback() {
            "fallback"
        } else {
            "detected"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success() {
        let e = Estimate::Success(3);
        assert_eq!(*e.value(), 3);
        assert!(!e.is_fallback());
        assert_eq!(e.fallback_reason(), None);
        assert_eq!(e.source_name(), "detected");
    }

    #[test]
    fn test_fallback() {
        let e = Estimate::fallback("C", "profile was silent");
        assert!(e.is_fallback());
        assert_eq!(e.fallback_reason(), Some("profile was silent"));
        assert_eq!(e.source_name(), "fallback");
        assert_eq!(e.into_value(), "C");
    }
}
