use authbench_common::network::classify::AddressError;
use authbench_common::render::RenderError;
use thiserror::Error;

use crate::remote::RemoteError;

#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error(transparent)]
    Remote(#[from] RemoteError),
    #[error("host reported an unusable address list")]
    Address(#[from] AddressError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

pub type Result<T, E = ProvisionError> = std::result::Result<T, E>;
