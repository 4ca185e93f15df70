use boxsave_domain::{Amount, CampaignId, DraftError};
use thiserror::Error;
use uuid::Uuid;

pub type CoreResult<T> = Result<T, CoreError>;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("select at least one box")]
    EmptySelection,
    #[error("enter a contributor name")]
    BlankContributor,
    #[error("box {0} does not exist")]
    BoxNotFound(usize),
    #[error("box {0} is not paid")]
    BoxNotPaid(usize),
    #[error("payment not found: {0}")]
    PaymentNotFound(Uuid),
    #[error("campaign not found: {0}")]
    CampaignNotFound(CampaignId),
    #[error("campaign has not been saved yet")]
    CampaignNotSaved,
    #[error("no campaign is open")]
    NoOpenCampaign,
    #[error("target amount must be positive (got {0})")]
    InvalidTarget(Amount),
    #[error(transparent)]
    Draft(#[from] DraftError),
    #[error("campaign state is inconsistent: {0}")]
    InvariantViolation(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Serialization error: {0}")]
    Serde(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// True for caller mistakes that were rejected before any state changed.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            CoreError::EmptySelection
                | CoreError::BlankContributor
                | CoreError::BoxNotFound(_)
                | CoreError::BoxNotPaid(_)
                | CoreError::PaymentNotFound(_)
                | CoreError::InvalidTarget(_)
                | CoreError::Draft(_)
        )
    }
}
