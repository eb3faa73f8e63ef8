use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::{arch, Arch, BinfmtError, RegistrationRecord, Result};

/// Default binfmt_misc mount point.
pub const DEFAULT_ROOT: &str = "/proc/sys/fs/binfmt_misc";

/// Environment variable overriding [`DEFAULT_ROOT`].
pub const ROOT_ENV: &str = "BINFMT_MISC_ROOT";

/// Value written to `status` to drop every registered handler.
const DISABLE_ALL: &[u8] = b"-1\n";

/// Writes handler registrations through the binfmt_misc control files.
///
/// Calls are independent of each other. Callers that want a clean table run
/// [`Registrar::disable_all`] before [`Registrar::register`].
#[derive(Debug, Clone)]
pub struct Registrar {
    root: PathBuf,
}

impl Registrar {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Uses `$BINFMT_MISC_ROOT` when set and non-empty, [`DEFAULT_ROOT`] otherwise.
    pub fn from_env() -> Self {
        match std::env::var_os(ROOT_ENV) {
            Some(root) if !root.is_empty() => Self::new(root),
            _ => Self::default(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn status_path(&self) -> PathBuf {
        self.root.join("status")
    }

    pub fn register_path(&self) -> PathBuf {
        self.root.join("register")
    }

    /// Ensures both control files are present.
    pub fn check(&self) -> Result<()> {
        require(&self.status_path())?;
        require(&self.register_path())
    }

    /// Unregisters every binary format handler known to the kernel.
    pub fn disable_all(&self) -> Result<()> {
        let status = self.status_path();
        require(&status)?;
        write_control(&status, DISABLE_ALL)?;
        log::info!("Cleared all binfmt_misc registrations");
        Ok(())
    }

    /// Registers `interpreter` as the handler for `arch` binaries.
    ///
    /// `interpreter` must be absolute as seen from inside the target root.
    /// Returns the record that was written.
    pub fn register(&self, arch: Arch, interpreter: &str) -> Result<RegistrationRecord> {
        if !interpreter.starts_with('/') {
            log::warn!(
                "Interpreter path {interpreter:?} is not absolute; the kernel will resolve it relative to the caller"
            );
        }

        let record = RegistrationRecord::new(arch, interpreter)?;
        log::debug!("{} interpreter, flags {}", record.kind(), record.flags());

        let register = self.register_path();
        require(&register)?;
        write_control(&register, record.to_string().as_bytes())?;
        log::info!("Registered {} handler {}", arch, interpreter);
        Ok(record)
    }

    /// Resolves an architecture identifier, then registers as [`Registrar::register`].
    pub fn register_named(
        &self,
        architecture: &str,
        interpreter: &str,
    ) -> Result<RegistrationRecord> {
        let arch = arch::resolve(architecture)?;
        log::debug!("Resolved {architecture:?} to {arch}");
        self.register(arch, interpreter)
    }
}

impl Default for Registrar {
    fn default() -> Self {
        Self::new(DEFAULT_ROOT)
    }
}

/// A missing file means the facility is absent; any other stat error is reported as is.
fn require(path: &Path) -> Result<()> {
    match path.try_exists() {
        Ok(true) => Ok(()),
        Ok(false) => Err(BinfmtError::FacilityUnavailable(path.to_path_buf())),
        Err(source) => Err(BinfmtError::WriteFailure {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Writes `contents` to an existing control file in one call.
fn write_control(path: &Path, contents: &[u8]) -> Result<()> {
    let to_error = |source: io::Error| match source.kind() {
        io::ErrorKind::NotFound => BinfmtError::FacilityUnavailable(path.to_path_buf()),
        _ => BinfmtError::WriteFailure {
            path: path.to_path_buf(),
            source,
        },
    };

    let mut file = OpenOptions::new()
        .write(true)
        .truncate(true)
        .open(path)
        .map_err(to_error)?;
    file.write_all(contents).map_err(to_error)
}
