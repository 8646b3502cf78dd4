use thiserror::Error;

/// Wire format a [`TreeDump`](super::TreeDump) was being read from or written to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DumpFormat {
    Json,
    Binary,
}

impl std::fmt::Display for DumpFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json => f.write_str("json"),
            Self::Binary => f.write_str("binary"),
        }
    }
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    /// A live tree could not be written out.
    #[error("Could not write {format} tree dump: {reason}")]
    Encode { format: DumpFormat, reason: String },

    /// Input was not a well-formed tree dump.
    #[error("Could not read {format} tree dump: {reason}")]
    Decode { format: DumpFormat, reason: String },

    /// Dump layout is newer or older than this build understands.
    #[error("Tree dump has layout version {found}, this build reads {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },
}

impl SnapshotError {
    pub(crate) fn encode(format: DumpFormat, err: impl std::fmt::Display) -> Self {
        Self::Encode {
            format,
            reason: err.to_string(),
        }
    }

    pub(crate) fn decode(format: DumpFormat, err: impl std::fmt::Display) -> Self {
        Self::Decode {
            format,
            reason: err.to_string(),
        }
    }
}
