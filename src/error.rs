//! Crate-level error wrapping every module's error type.

use crate::export::ExportError;
use crate::loader::LoadError;
use crate::pagination::PageError;
use crate::settings::SettingsError;
use crate::surface::SurfaceError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Surface(#[from] SurfaceError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Page(#[from] PageError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error(transparent)]
    Settings(#[from] SettingsError),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Whether the error comes from user input (a bad file, a failed export)
    /// and should be shown as a notice rather than treated as a bug.
    pub fn is_user_facing(&self) -> bool {
        match self {
            Error::Load(_) | Error::Settings(_) => true,
            Error::Export(ExportError::Surface(_)) => false,
            Error::Export(_) => true,
            Error::Surface(_) | Error::Page(_) => false,
        }
    }
}
