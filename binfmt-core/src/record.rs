use std::fmt;

use crate::signature;
use crate::{Arch, InterpreterKind, Result};

/// One line for `binfmt_misc/register`:
/// `:name:M::magic:mask:interpreter:flags`.
///
/// The offset field is left empty, so the magic is matched from byte 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationRecord {
    arch: Arch,
    kind: InterpreterKind,
    magic: String,
    mask: String,
    interpreter: String,
}

impl RegistrationRecord {
    /// Builds the record for `interpreter` emulating `arch`.
    ///
    /// `interpreter` is the path as seen from inside the chroot, so it is not
    /// checked against the host filesystem.
    pub fn new(arch: Arch, interpreter: &str) -> Result<Self> {
        let sig = signature::lookup(arch)?;
        Ok(Self {
            arch,
            kind: InterpreterKind::detect(interpreter),
            magic: sig.escaped_magic(),
            mask: sig.escaped_mask(),
            interpreter: interpreter.to_string(),
        })
    }

    pub fn arch(&self) -> Arch {
        self.arch
    }

    pub fn name(&self) -> &'static str {
        self.arch.name()
    }

    pub fn kind(&self) -> InterpreterKind {
        self.kind
    }

    pub fn magic(&self) -> &str {
        &self.magic
    }

    pub fn mask(&self) -> &str {
        &self.mask
    }

    pub fn interpreter(&self) -> &str {
        &self.interpreter
    }

    pub fn flags(&self) -> &'static str {
        self.kind.flags()
    }
}

impl fmt::Display for RegistrationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            ":{}:M::{}:{}:{}:{}",
            self.name(),
            self.magic,
            self.mask,
            self.interpreter,
            self.flags()
        )
    }
}
