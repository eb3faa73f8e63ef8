use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BinfmtError {
    /// No emulation profile exists for the requested architecture.
    #[error("architecture `{0}` is not supported")]
    UnsupportedArchitecture(String),

    /// A binfmt_misc control file is missing (facility not built in or not mounted).
    #[error("binfmt_misc control file {} does not exist", .0.display())]
    FacilityUnavailable(PathBuf),

    #[error("failed to write {}: {source}", path.display())]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, BinfmtError>;
