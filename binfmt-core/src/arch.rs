use std::fmt;

use crate::{BinfmtError, Result};

/// Target architectures that have an emulation profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arch {
    Arm,
    Arm64,
}

/// Substring rules evaluated top to bottom, first hit wins.
///
/// `arm64` must be tried before `arm`, otherwise every 64-bit name would
/// resolve to the 32-bit profile.
static RULES: &[(&str, Arch)] = &[
    ("arm64", Arch::Arm64),
    ("aarch64", Arch::Arm64),
    ("arm", Arch::Arm),
];

impl Arch {
    pub const ALL: [Arch; 2] = [Arch::Arm, Arch::Arm64];

    /// Name of the handler entry under the binfmt_misc mount.
    pub fn name(self) -> &'static str {
        match self {
            Arch::Arm => "arm",
            Arch::Arm64 => "arm64",
        }
    }
}

/// Maps an architecture identifier such as `armv7l` or `aarch64` to its tag.
pub fn resolve(architecture: &str) -> Result<Arch> {
    RULES
        .iter()
        .find(|&&(needle, _)| architecture.contains(needle))
        .map(|&(_, arch)| arch)
        .ok_or_else(|| BinfmtError::UnsupportedArchitecture(architecture.to_string()))
}

impl std::str::FromStr for Arch {
    type Err = BinfmtError;

    fn from_str(s: &str) -> Result<Self> {
        resolve(s)
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
