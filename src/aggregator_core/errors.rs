//! Error taxonomy for scanning a single source

#[derive(Debug)]
pub enum ScanError {
    /// The source could not be opened or read
    Read(std::io::Error),
    /// The source contained malformed or truncated record data
    Decode(serde_json::Error),
}

impl From<std::io::Error> for ScanError {
    fn from(err: std::io::Error) -> Self {
        ScanError::Read(err)
    }
}

impl From<serde_json::Error> for ScanError {
    fn from(err: serde_json::Error) -> Self {
        ScanError::Decode(err)
    }
}

impl std::fmt::Display for ScanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScanError::Read(e) => write!(f, "Read error: {}", e),
            ScanError::Decode(e) => write!(f, "Decode error: {}", e),
        }
    }
}

impl std::error::Error for ScanError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScanError::Read(e) => Some(e),
            ScanError::Decode(e) => Some(e),
        }
    }
}
