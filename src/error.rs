pub type OverlayResult<T> = Result<T, OverlayError>;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum OverlayError {
    #[error("malformed move mnemonic {mnemonic:?}: {reason}")]
    MalformedMove { mnemonic: String, reason: String },

    #[error("no pending move: index {index} is past the end of a {len} move solution")]
    NoPendingMove { index: usize, len: usize },

    #[error("invalid face table: {0}")]
    InvalidFaceTable(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

impl OverlayError {
    pub fn malformed_move(mnemonic: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedMove {
            mnemonic: mnemonic.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_face_table(msg: impl Into<String>) -> Self {
        Self::InvalidFaceTable(msg.into())
    }

    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
