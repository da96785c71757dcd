use memechat_provider::ProviderError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Message cannot be empty")]
    InvalidInput,
    #[error(transparent)]
    Upstream(#[from] ProviderError),
    #[error("{0}")]
    Internal(String),
}

impl ChatError {
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, ChatError::InvalidInput)
    }
}
