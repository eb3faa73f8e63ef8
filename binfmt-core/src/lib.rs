pub mod arch;
mod error;
pub mod interpreter;
pub mod record;
pub mod registrar;
pub mod signature;

pub use arch::*;
pub use error::*;
pub use interpreter::*;
pub use record::*;
pub use registrar::*;
pub use signature::{detect, Signature};
