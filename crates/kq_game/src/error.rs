use std::path::PathBuf;

/// Failure to load a content file (world or replay). Gameplay itself never
/// errors; these only surface at startup.
#[derive(Debug)]
pub enum LoadError {
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        what: &'static str,
        source: serde_json::Error,
    },
    Invalid {
        what: &'static str,
        reason: String,
    },
}

impl LoadError {
    pub fn invalid(what: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            what,
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read { path, source } => {
                write!(f, "Failed to read {}: {source}", path.display())
            }
            Self::Parse { what, source } => write!(f, "Failed to parse {what} JSON: {source}"),
            Self::Invalid { what, reason } => write!(f, "{what} validation failed: {reason}"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::Invalid { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_message_names_the_content_kind() {
        let err = LoadError::invalid("World", "exit in 'start' targets missing room 'nowhere'");
        assert_eq!(
            err.to_string(),
            "World validation failed: exit in 'start' targets missing room 'nowhere'"
        );
    }
}
