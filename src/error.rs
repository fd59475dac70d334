/// Failure categories surfaced by a run.
///
/// Every kind is fatal. Numeric coercion problems are not represented here:
/// they turn into missing cells and are handled by imputation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Invalid flags or configuration.
    Usage,
    /// A source locator could not be read or decoded.
    SourceUnavailable,
    /// A requested column is missing, or two tables collide on a column name.
    SchemaMismatch,
    /// A date cell could not be parsed into a calendar date.
    DateParseError,
    /// Two rows of one table share a date key.
    DuplicateKeyError,
    /// The output could not be written.
    IoError,
}

impl ErrorKind {
    pub fn exit_code(self) -> u8 {
        match self {
            ErrorKind::Usage => 2,
            ErrorKind::SourceUnavailable => 3,
            ErrorKind::SchemaMismatch => 4,
            ErrorKind::DateParseError => 5,
            ErrorKind::DuplicateKeyError => 6,
            ErrorKind::IoError => 7,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    kind: ErrorKind,
    message: String,
}

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn usage(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Usage, message)
    }

    pub fn source_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::SourceUnavailable, message)
    }

    pub fn schema_mismatch(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::SchemaMismatch, message)
    }

    pub fn date_parse(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::DateParseError, message)
    }

    pub fn duplicate_key(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::DuplicateKeyError, message)
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::IoError, message)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn exit_code(&self) -> u8 {
        self.kind.exit_code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("kind", &self.kind)
            .field("exit_code", &self.exit_code())
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_distinct_per_kind() {
        let kinds = [
            ErrorKind::Usage,
            ErrorKind::SourceUnavailable,
            ErrorKind::SchemaMismatch,
            ErrorKind::DateParseError,
            ErrorKind::DuplicateKeyError,
            ErrorKind::IoError,
        ];
        let mut codes: Vec<u8> = kinds.iter().map(|k| k.exit_code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), kinds.len());
        assert!(codes.iter().all(|&c| c != 0));
    }

    #[test]
    fn display_shows_message_only() {
        let err = AppError::duplicate_key("Duplicate date 2024-01-02 in sleep source.");
        assert_eq!(err.to_string(), "Duplicate date 2024-01-02 in sleep source.");
        assert_eq!(err.kind(), ErrorKind::DuplicateKeyError);
        assert_eq!(err.exit_code(), 6);
    }
}
