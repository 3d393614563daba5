use std::arch::asm;

use super::RegisterQuadruple;

/// CPUID issued directly with inline assembly.
///
/// LLVM reserves (r|e)bx, so it is swapped through a scratch register.
pub fn cpuid(leaf: u32, subleaf: u32) -> RegisterQuadruple {
    let eax: u32;
    let ebx: u32;
    let ecx: u32;
    let edx: u32;

    #[cfg(target_arch = "x86_64")]
    unsafe {
        asm!(
            "mov {scratch:r}, rbx",
            "cpuid",
            "xchg {scratch:r}, rbx",
            scratch = out(reg) ebx,
            inout("eax") leaf => eax,
            inout("ecx") subleaf => ecx,
            out("edx") edx,
            options(nostack, preserves_flags),
        );
    }

    #[cfg(target_arch = "x86")]
    unsafe {
        asm!(
            "mov {scratch:e}, ebx",
            "cpuid",
            "xchg {scratch:e}, ebx",
            scratch = out(reg) ebx,
            inout("eax") leaf => eax,
            inout("ecx") subleaf => ecx,
            out("edx") edx,
            options(nostack, preserves_flags),
        );
    }

    RegisterQuadruple::new(eax, ebx, ecx, edx)
}
