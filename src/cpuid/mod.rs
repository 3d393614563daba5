//! CPUID access.
//!
//! Exactly one backend is compiled in, picked by cargo feature:
//! `intrinsic` (default) wraps `std::arch`'s `__cpuid_count`, `asm` issues the
//! instruction through inline assembly. Both expose the same [`CpuidSource`]
//! through [`NativeCpuid`].

#[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
compile_error!("simd_probe reads CPUID and only builds for x86 and x86_64 targets");

#[cfg(all(feature = "intrinsic", feature = "asm"))]
compile_error!("features `intrinsic` and `asm` select competing CPUID backends; enable exactly one");

#[cfg(not(any(feature = "intrinsic", feature = "asm")))]
compile_error!("no CPUID backend selected; enable either the `intrinsic` or the `asm` feature");

#[cfg(feature = "asm")]
pub mod asm;
#[cfg(feature = "intrinsic")]
pub mod intrinsic;

use bytemuck::{Pod, Zeroable};

/// Vendor id string; EAX holds the highest basic leaf.
pub const LEAF_VENDOR: u32 = 0x0;
/// Processor info and feature bits.
pub const LEAF_FEATURES: u32 = 0x1;
/// Structured extended feature flags (sub-leaf 0).
pub const LEAF_STRUCTURED_EXT: u32 = 0x7;
/// Highest extended leaf in EAX.
pub const LEAF_EXT_MAX: u32 = 0x8000_0000;
/// First of the three processor brand string leaves.
pub const LEAF_BRAND_FIRST: u32 = 0x8000_0002;
/// Last of the three processor brand string leaves.
pub const LEAF_BRAND_LAST: u32 = 0x8000_0004;

/// The four registers returned by one CPUID query.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct RegisterQuadruple {
    pub eax: u32,
    pub ebx: u32,
    pub ecx: u32,
    pub edx: u32,
}

impl RegisterQuadruple {
    pub const fn new(eax: u32, ebx: u32, ecx: u32, edx: u32) -> Self {
        Self { eax, ebx, ecx, edx }
    }

    pub fn get(&self, register: Register) -> u32 {
        match register {
            Register::Eax => self.eax,
            Register::Ebx => self.ebx,
            Register::Ecx => self.ecx,
            Register::Edx => self.edx,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Register {
    Eax,
    Ebx,
    Ecx,
    Edx,
}

/// Anything that can answer a CPUID query.
pub trait CpuidSource {
    fn query(&self, leaf: u32, subleaf: u32) -> RegisterQuadruple;

    /// Query `leaf` with no sub-leaf selection. The leaf is not validated.
    fn query_basic(&self, leaf: u32) -> RegisterQuadruple {
        self.query(leaf, 0)
    }

    fn query_extended(&self, leaf: u32, subleaf: u32) -> RegisterQuadruple {
        self.query(leaf, subleaf)
    }
}

/// The CPUID backend selected at compile time.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeCpuid;

impl CpuidSource for NativeCpuid {
    #[cfg(feature = "intrinsic")]
    fn query(&self, leaf: u32, subleaf: u32) -> RegisterQuadruple {
        intrinsic::cpuid(leaf, subleaf)
    }

    #[cfg(feature = "asm")]
    fn query(&self, leaf: u32, subleaf: u32) -> RegisterQuadruple {
        asm::cpuid(leaf, subleaf)
    }
}

/// Table-backed source for deterministic tests. Unknown leaves read as zero.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct FixedCpuid {
    entries: std::collections::HashMap<(u32, u32), RegisterQuadruple>,
}

#[cfg(test)]
impl FixedCpuid {
    pub(crate) fn with(mut self, leaf: u32, subleaf: u32, regs: RegisterQuadruple) -> Self {
        self.entries.insert((leaf, subleaf), regs);
        self
    }
}

#[cfg(test)]
impl CpuidSource for FixedCpuid {
    fn query(&self, leaf: u32, subleaf: u32) -> RegisterQuadruple {
        self.entries.get(&(leaf, subleaf)).copied().unwrap_or_default()
    }
}
