use crate::signature::Signature;
use crate::Arch;

/// Magic/mask pairs matched against the first bytes of an ELF file.
///
/// Layout of the matched prefix (`Elf32_Ehdr` / `Elf64_Ehdr`):
/// - `0..4`   `\x7fELF`
/// - `4`      class (1 = 32-bit, 2 = 64-bit)
/// - `5`      data encoding (1 = little endian)
/// - `6`      ident version
/// - `7`      OS/ABI, masked out so SYSV and GNU/Linux binaries both match
/// - `8..16`  padding
/// - `16..18` `e_type`, low bit masked so `ET_EXEC` (2) and `ET_DYN` (3) both match
/// - `18..20` `e_machine`
#[rustfmt::skip]
pub static SIGNATURES: &[(Arch, Signature)] = &[
    (
        Arch::Arm,
        Signature {
            magic: &[
                0x7f, b'E', b'L', b'F',
                0x01, 0x01, 0x01, 0x00,
                0x00, 0x00, 0x00, 0x00,
                0x00, 0x00, 0x00, 0x00,
                0x02, 0x00, 0x28, 0x00,
            ],
            mask: &[
                0xff, 0xff, 0xff, 0xff,
                0xff, 0xff, 0xff, 0x00,
                0xff, 0xff, 0xff, 0xff,
                0xff, 0xff, 0xff, 0xff,
                0xfe, 0xff, 0xff, 0xff,
            ],
        },
    ),
    (
        Arch::Arm64,
        Signature {
            // Only the low byte of e_machine (EM_AARCH64 = 0xb7) is checked.
            magic: &[
                0x7f, b'E', b'L', b'F',
                0x02, 0x01, 0x01, 0x00,
                0x00, 0x00, 0x00, 0x00,
                0x00, 0x00, 0x00, 0x00,
                0x02, 0x00, 0xb7,
            ],
            mask: &[
                0xff, 0xff, 0xff, 0xff,
                0xff, 0xff, 0xff, 0x00,
                0xff, 0xff, 0xff, 0xff,
                0xff, 0xff, 0xff, 0xff,
                0xfe, 0xff, 0xff,
            ],
        },
    ),
];
