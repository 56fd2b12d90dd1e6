use crate::render::RenderError;
use harborcore::prelude::GeoError;
use serde::Serialize;

/// Failure category attached to a failed session, stable across messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    Fetch,
    Parse,
    Validation,
    Render,
}

/// Terminal error for one load attempt. Each kind aborts the whole
/// transition; nothing is retried internally.
#[derive(thiserror::Error, Debug)]
pub enum SessionError {
    #[error("fetch failed for {resource}: {detail}")]
    Fetch {
        resource: &'static str,
        detail: String,
    },
    #[error("parse failed for {resource}: {detail}")]
    Parse {
        resource: &'static str,
        detail: String,
    },
    #[error("validation failed: {0}")]
    Validation(#[source] GeoError),
    #[error("render registration failed: {0}")]
    Render(#[from] RenderError),
}

impl SessionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SessionError::Fetch { .. } => ErrorKind::Fetch,
            SessionError::Parse { .. } => ErrorKind::Parse,
            SessionError::Validation(_) => ErrorKind::Validation,
            SessionError::Render(_) => ErrorKind::Render,
        }
    }

    /// Splits a core error from payload handling: malformed text is a parse
    /// failure, bad coordinates or radius are validation failures.
    pub fn from_payload(err: GeoError, resource: &'static str) -> Self {
        match err {
            GeoError::Parse(detail) => SessionError::Parse { resource, detail },
            other => SessionError::Validation(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_errors_split_into_parse_and_validation() {
        let parse = SessionError::from_payload(GeoError::Parse("bad".into()), "ports");
        assert_eq!(parse.kind(), ErrorKind::Parse);

        let validation = SessionError::from_payload(GeoError::InvalidRadius(-1.0), "ports");
        assert_eq!(validation.kind(), ErrorKind::Validation);
    }

    #[test]
    fn fetch_errors_name_the_resource() {
        let err = SessionError::Fetch {
            resource: "samples",
            detail: "status 503".into(),
        };
        assert_eq!(err.kind(), ErrorKind::Fetch);
        assert!(err.to_string().contains("samples"));
    }
}
