//! Error type for reading and parsing a single export file

/// Error from reading or parsing one export file.
///
/// A file either yields all of its records or fails as a whole; there are
/// no partial results.
#[derive(Debug)]
pub enum ScanError {
    Io(std::io::Error),
    /// Syntax error reported by the XML reader
    Xml { message: String, position: u64 },
    /// End of input reached while `element` was still open
    Truncated { element: String },
    /// No root element at all
    Empty,
}

impl std::fmt::Display for ScanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "IO: {e}"),
            Self::Xml { message, position } => {
                write!(f, "XML error at byte {position}: {message}")
            }
            Self::Truncated { element } => {
                write!(f, "unexpected end of file inside <{element}>")
            }
            Self::Empty => write!(f, "no element found"),
        }
    }
}

impl std::error::Error for ScanError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl ScanError {
    /// True when the file does not exist (as opposed to being unreadable)
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Io(e) if e.kind() == std::io::ErrorKind::NotFound)
    }
}

impl From<std::io::Error> for ScanError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::ErrorKind;

    #[test]
    fn not_found_is_missing() {
        let err = ScanError::Io(std::io::Error::new(ErrorKind::NotFound, "gone"));
        assert!(err.is_missing());
    }

    #[test]
    fn permission_denied_is_not_missing() {
        let err = ScanError::Io(std::io::Error::new(ErrorKind::PermissionDenied, "no"));
        assert!(!err.is_missing());
    }

    #[test]
    fn xml_errors_are_not_missing() {
        assert!(!ScanError::Empty.is_missing());
        let err = ScanError::Truncated {
            element: "PubmedArticle".to_string(),
        };
        assert!(!err.is_missing());
    }

    #[test]
    fn display_io() {
        let err = ScanError::Io(std::io::Error::new(ErrorKind::NotFound, "not found"));
        assert!(format!("{err}").contains("IO:"));
    }

    #[test]
    fn display_truncated_names_element() {
        let err = ScanError::Truncated {
            element: "Article".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "unexpected end of file inside <Article>"
        );
    }

    #[test]
    fn display_xml_includes_position() {
        let err = ScanError::Xml {
            message: "mismatched tag".to_string(),
            position: 42,
        };
        assert_eq!(err.to_string(), "XML error at byte 42: mismatched tag");
    }
}
