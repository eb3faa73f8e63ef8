pub mod table;

use std::fmt::Write;

use crate::{Arch, BinfmtError, Result};
pub use table::SIGNATURES;

/// Byte pattern the kernel compares against the start of an executable.
///
/// A set bit in `mask` means the corresponding bit of `magic` must match, a
/// clear bit is ignored. `mask` may be shorter than `magic`; the missing bytes
/// are compared exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    pub magic: &'static [u8],
    pub mask: &'static [u8],
}

impl Signature {
    pub fn escaped_magic(&self) -> String {
        escape(self.magic)
    }

    pub fn escaped_mask(&self) -> String {
        escape(self.mask)
    }

    /// Returns true if a file starting with `header` would be handed to this
    /// signature's interpreter.
    pub fn matches(&self, header: &[u8]) -> bool {
        if header.len() < self.magic.len() {
            return false;
        }
        self.magic
            .iter()
            .zip(header)
            .enumerate()
            .all(|(i, (&magic, &byte))| {
                let mask = self.mask.get(i).copied().unwrap_or(0xff);
                byte & mask == magic & mask
            })
    }
}

/// Encodes bytes for the binfmt_misc register parser.
///
/// ASCII letters and digits are kept literal, everything else becomes `\xHH`.
/// Field separators (`:`) and backslashes therefore never appear unescaped.
pub fn escape(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 4);
    for &b in bytes {
        if b.is_ascii_alphanumeric() {
            out.push(b as char);
        } else {
            // Writing into a String cannot fail.
            let _ = write!(out, "\\x{b:02x}");
        }
    }
    out
}

/// Finds the signature registered for `arch`.
pub fn lookup(arch: Arch) -> Result<&'static Signature> {
    SIGNATURES
        .iter()
        .find(|(a, _)| *a == arch)
        .map(|(_, sig)| sig)
        .ok_or_else(|| BinfmtError::UnsupportedArchitecture(arch.to_string()))
}

/// Returns the architecture whose signature matches the leading bytes of a file.
pub fn detect(header: &[u8]) -> Option<Arch> {
    SIGNATURES
        .iter()
        .find(|(_, sig)| sig.matches(header))
        .map(|&(arch, _)| arch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use byteorder::{WriteBytesExt, LE};
    use goblin::elf::header::{
        ELFCLASS32, ELFCLASS64, EM_AARCH64, EM_ARM, EM_X86_64, ET_CORE, ET_DYN, ET_EXEC, ET_REL,
    };
    use goblin::elf::Elf;

    const ELFOSABI_LINUX: u8 = 3;

    /// Builds a little-endian ELF file header with empty program/section tables.
    fn elf_header(class: u8, osabi: u8, e_type: u16, e_machine: u16) -> Vec<u8> {
        let wide = class == ELFCLASS64;
        let mut buf = vec![0x7f, b'E', b'L', b'F', class, 1, 1, osabi];
        buf.resize(16, 0);
        buf.write_u16::<LE>(e_type).unwrap();
        buf.write_u16::<LE>(e_machine).unwrap();
        buf.write_u32::<LE>(1).unwrap();
        if wide {
            buf.write_u64::<LE>(0x40_0000).unwrap();
            buf.write_u64::<LE>(64).unwrap();
            buf.write_u64::<LE>(0).unwrap();
            buf.write_u32::<LE>(0).unwrap();
            buf.write_u16::<LE>(64).unwrap();
            buf.write_u16::<LE>(56).unwrap();
        } else {
            buf.write_u32::<LE>(0x1_0000).unwrap();
            buf.write_u32::<LE>(52).unwrap();
            buf.write_u32::<LE>(0).unwrap();
            buf.write_u32::<LE>(0x0500_0000).unwrap();
            buf.write_u16::<LE>(52).unwrap();
            buf.write_u16::<LE>(32).unwrap();
        }
        buf.write_u16::<LE>(0).unwrap();
        buf.write_u16::<LE>(if wide { 64 } else { 40 }).unwrap();
        buf.write_u16::<LE>(0).unwrap();
        buf.write_u16::<LE>(0).unwrap();
        buf
    }

    /// Same as [`elf_header`], checked against goblin's parser.
    fn parsed_header(class: u8, osabi: u8, e_type: u16, e_machine: u16) -> Vec<u8> {
        let buf = elf_header(class, osabi, e_type, e_machine);
        let header = Elf::parse_header(&buf).unwrap();
        assert_eq!(header.e_machine, e_machine);
        assert_eq!(header.e_type, e_type);
        assert_eq!(header.e_ident[4], class);
        buf
    }

    #[test]
    fn escape_keeps_alphanumerics() {
        assert_eq!(escape(b"\x7fELF\x01"), "\\x7fELF\\x01");
        assert_eq!(escape(&[0x00, 0x28, 0xb7, 0xfe]), "\\x00\\x28\\xb7\\xfe");
        assert_eq!(escape(b"a:b\\"), "a\\x3ab\\x5c");
        assert_eq!(escape(&[]), "");
    }

    #[test]
    fn escaped_tables() {
        let arm = lookup(Arch::Arm).unwrap();
        assert_eq!(
            arm.escaped_magic(),
            "\\x7fELF\\x01\\x01\\x01\\x00\\x00\\x00\\x00\\x00\\x00\\x00\\x00\\x00\\x02\\x00\\x28\\x00"
        );
        assert_eq!(
            arm.escaped_mask(),
            "\\xff\\xff\\xff\\xff\\xff\\xff\\xff\\x00\\xff\\xff\\xff\\xff\\xff\\xff\\xff\\xff\\xfe\\xff\\xff\\xff"
        );

        let arm64 = lookup(Arch::Arm64).unwrap();
        assert_eq!(
            arm64.escaped_magic(),
            "\\x7fELF\\x02\\x01\\x01\\x00\\x00\\x00\\x00\\x00\\x00\\x00\\x00\\x00\\x02\\x00\\xb7"
        );
        assert_eq!(
            arm64.escaped_mask(),
            "\\xff\\xff\\xff\\xff\\xff\\xff\\xff\\x00\\xff\\xff\\xff\\xff\\xff\\xff\\xff\\xff\\xfe\\xff\\xff"
        );
    }

    #[test]
    fn one_entry_per_arch() {
        for arch in Arch::ALL {
            let count = SIGNATURES.iter().filter(|(a, _)| *a == arch).count();
            assert_eq!(count, 1, "{arch}");
            let sig = lookup(arch).unwrap();
            assert!(sig.mask.len() <= sig.magic.len(), "{arch}");
        }
    }

    #[test]
    fn arm_executables_and_libraries() {
        for e_type in [ET_EXEC, ET_DYN] {
            for osabi in [0, ELFOSABI_LINUX] {
                let header = parsed_header(ELFCLASS32, osabi, e_type, EM_ARM);
                assert_eq!(detect(&header), Some(Arch::Arm));
                assert!(!lookup(Arch::Arm64).unwrap().matches(&header));
            }
        }
    }

    #[test]
    fn aarch64_executables_and_libraries() {
        for e_type in [ET_EXEC, ET_DYN] {
            let header = parsed_header(ELFCLASS64, 0, e_type, EM_AARCH64);
            assert_eq!(detect(&header), Some(Arch::Arm64));
            assert!(!lookup(Arch::Arm).unwrap().matches(&header));
        }
    }

    #[test]
    fn foreign_or_non_executable_headers() {
        let host = parsed_header(ELFCLASS64, 0, ET_EXEC, EM_X86_64);
        assert_eq!(detect(&host), None);

        for e_type in [ET_REL, ET_CORE] {
            assert_eq!(detect(&parsed_header(ELFCLASS32, 0, e_type, EM_ARM)), None);
            assert_eq!(detect(&parsed_header(ELFCLASS64, 0, e_type, EM_AARCH64)), None);
        }

        // 64-bit class with a 32-bit ARM machine.
        assert_eq!(detect(&parsed_header(ELFCLASS64, 0, ET_EXEC, EM_ARM)), None);
    }

    #[test]
    fn truncated_header_never_matches() {
        let header = elf_header(ELFCLASS32, 0, ET_EXEC, EM_ARM);
        assert_eq!(detect(&header[..19]), None);
        assert_eq!(detect(&[]), None);
        assert_eq!(detect(b"#!/bin/sh\n"), None);
    }
}
