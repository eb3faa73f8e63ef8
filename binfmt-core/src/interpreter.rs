use std::fmt;
use std::path::Path;

/// Suffix marking a self-contained wrapper around the emulator.
const WRAPPER_SUFFIX: &str = "-binfmt";

/// How the kernel has to launch the interpreter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InterpreterKind {
    /// A regular emulator binary (e.g. `qemu-arm`).
    Plain,
    /// A `*-binfmt` wrapper that re-executes the emulator itself.
    Wrapper,
}

impl InterpreterKind {
    /// Classifies an interpreter by the last segment of its path.
    pub fn detect(interpreter: &str) -> Self {
        let is_wrapper = Path::new(interpreter)
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.ends_with(WRAPPER_SUFFIX));

        if is_wrapper {
            InterpreterKind::Wrapper
        } else {
            InterpreterKind::Plain
        }
    }

    /// binfmt_misc flag string for this kind.
    ///
    /// `O` hands the open binary to the interpreter and `C` takes credentials
    /// from it; `P` preserves the original `argv[0]`.
    pub fn flags(self) -> &'static str {
        match self {
            InterpreterKind::Plain => "OC",
            InterpreterKind::Wrapper => "P",
        }
    }
}

impl fmt::Display for InterpreterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InterpreterKind::Plain => "plain",
            InterpreterKind::Wrapper => "wrapper",
        };
        f.write_str(name)
    }
}
