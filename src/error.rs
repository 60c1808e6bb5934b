use thiserror::Error;

/// Errors surfaced by the session core.
///
/// `TimerNotArmed` and `LoggerClosed` are contract violations: the state
/// machine arms the timers before any read and finalizes the logger exactly
/// once, so hitting either at runtime means corrupted sequencing and the
/// session must fail fast rather than keep collecting suspect data.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("timer read before the session was started")]
    TimerNotArmed,
    #[error("log record appended after finalize")]
    LoggerClosed,
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        assert_eq!(
            SessionError::TimerNotArmed.to_string(),
            "timer read before the session was started"
        );
        assert_eq!(
            SessionError::LoggerClosed.to_string(),
            "log record appended after finalize"
        );
    }

    #[test]
    fn io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: SessionError = io.into();
        assert!(matches!(err, SessionError::Io(_)));
    }
}
