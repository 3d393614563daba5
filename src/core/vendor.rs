use std::fmt;

use serde::Serialize;

use crate::cpuid::RegisterQuadruple;

/// The 12-byte vendor id from leaf 0, e.g. `GenuineIntel`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VendorString([u8; 12]);

impl VendorString {
    pub fn as_bytes(&self) -> &[u8; 12] {
        &self.0
    }

    /// One character per byte, so the result always has exactly 12
    /// characters. Zero bytes are kept; other control bytes become `?` so a
    /// hostile vendor id cannot split a report line.
    pub fn as_text(&self) -> String {
        self.0
            .iter()
            .map(|&b| match b {
                0 => '\0',
                b if b.is_ascii_control() => '?',
                b => char::from(b),
            })
            .collect()
    }

    pub fn is_printable(&self) -> bool {
        self.0.iter().all(|b| b.is_ascii_graphic() || *b == b' ')
    }
}

impl fmt::Display for VendorString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

impl Serialize for VendorString {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.as_text())
    }
}

/// Leaf 0 spells the vendor across EBX, EDX, ECX in that order.
pub fn decode_vendor(regs: &RegisterQuadruple) -> VendorString {
    let ordered = [regs.ebx, regs.edx, regs.ecx];
    let mut bytes = [0u8; 12];
    bytes.copy_from_slice(bytemuck::bytes_of(&ordered));
    VendorString(bytes)
}

/// Processor brand string from the three brand leaves (48 bytes, NUL padded).
pub fn decode_brand(leaves: &[RegisterQuadruple; 3]) -> String {
    let raw: &[u8] = bytemuck::cast_slice(&leaves[..]);
    let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
    String::from_utf8_lossy(&raw[..end]).trim().to_string()
}
