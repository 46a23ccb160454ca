use super::domain::Statement;

/// Default lower bound on the trimmed input length.
pub const DEFAULT_MIN_INPUT_CHARS: usize = 10;

/// Rejected analysis input. The caller is expected to re-prompt.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("no statement text supplied")]
    Empty,
    #[error("statement text must contain at least {minimum} characters (got {actual})")]
    TooShort { minimum: usize, actual: usize },
    #[error("no statements found after splitting on `|` or newlines")]
    NoStatements,
}

/// Splits raw text into statements.
///
/// Any `|` in the text makes it the delimiter; otherwise statements are
/// separated by newlines. Pieces are trimmed and blank pieces dropped, and
/// the input order is kept.
pub fn parse_statements(text: &str) -> Vec<Statement> {
    let delimiter = if text.contains('|') { '|' } else { '\n' };
    text.split(delimiter).filter_map(Statement::new).collect()
}

/// Checks the trimmed input length before any statement is sent out.
pub fn validate_input(text: &str, minimum: usize) -> Result<&str, InputError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(InputError::Empty);
    }

    let actual = trimmed.chars().count();
    if actual < minimum {
        return Err(InputError::TooShort { minimum, actual });
    }

    Ok(trimmed)
}
