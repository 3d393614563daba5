#[cfg(target_arch = "x86")]
use std::arch::x86::__cpuid_count;
#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::__cpuid_count;

use super::RegisterQuadruple;

/// CPUID through the compiler intrinsic.
#[allow(unused_unsafe)]
pub fn cpuid(leaf: u32, subleaf: u32) -> RegisterQuadruple {
    // CPUID is present on every target this crate builds for.
    let result = unsafe { __cpuid_count(leaf, subleaf) };
    RegisterQuadruple::new(result.eax, result.ebx, result.ecx, result.edx)
}
