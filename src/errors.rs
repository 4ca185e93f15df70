use boxsave_config::ConfigError;
use boxsave_core::CoreError;
use boxsave_domain::DraftError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, BoxsaveError>;

/// Error type returned by the [`CampaignManager`](crate::CampaignManager) facade.
#[derive(Debug, Error)]
pub enum BoxsaveError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl From<DraftError> for BoxsaveError {
    fn from(err: DraftError) -> Self {
        BoxsaveError::Core(CoreError::Draft(err))
    }
}

impl BoxsaveError {
    /// True when the call was refused before any state changed and the user can retry.
    pub fn is_precondition(&self) -> bool {
        matches!(self, BoxsaveError::Core(err) if err.is_precondition())
    }

    /// Short notice suitable for showing next to the control that triggered it.
    pub fn user_notice(&self) -> String {
        match self {
            BoxsaveError::Core(err) if err.is_precondition() => err.to_string(),
            BoxsaveError::Core(CoreError::NoOpenCampaign) => "open a campaign first".into(),
            _ => "something went wrong while saving; try again".into(),
        }
    }
}
