//! SIMD feature flags and the capability bitmask.
//!
//! `FEATURE_TABLE` is the single source of enumeration order: it drives flag
//! decoding, bitmask bit positions and report line order.

use bitflags::bitflags;

use crate::cpuid::{Register, RegisterQuadruple};

/// Which captured snapshot a flag is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureLeaf {
    /// Leaf 1.
    Basic,
    /// Leaf 7, sub-leaf 0.
    StructuredExt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimdFeature {
    Sse,
    Sse2,
    Sse3,
    Ssse3,
    Sse4_1,
    Sse4_2,
    Fma,
    Avx,
    Avx2,
}

pub struct FeatureSpec {
    pub feature: SimdFeature,
    pub name: &'static str,
    pub report_key: &'static str,
    pub leaf: FeatureLeaf,
    pub register: Register,
    pub bit: u32,
}

impl FeatureSpec {
    pub const fn mask(&self) -> u32 {
        1 << self.bit
    }
}

pub const FEATURE_COUNT: usize = 9;

/// Bit positions from the Intel SDM / AMD APM CPUID tables.
#[rustfmt::skip]
pub static FEATURE_TABLE: [FeatureSpec; FEATURE_COUNT] = [
    FeatureSpec { feature: SimdFeature::Sse, name: "SSE", report_key: "CPU_SIMD_HAS_SSE", leaf: FeatureLeaf::Basic, register: Register::Edx, bit: 25 },
    FeatureSpec { feature: SimdFeature::Sse2, name: "SSE2", report_key: "CPU_SIMD_HAS_SSE2", leaf: FeatureLeaf::Basic, register: Register::Edx, bit: 26 },
    FeatureSpec { feature: SimdFeature::Sse3, name: "SSE3", report_key: "CPU_SIMD_HAS_SSE3", leaf: FeatureLeaf::Basic, register: Register::Ecx, bit: 0 },
    FeatureSpec { feature: SimdFeature::Ssse3, name: "SSSE3", report_key: "CPU_SIMD_HAS_SSSE3", leaf: FeatureLeaf::Basic, register: Register::Ecx, bit: 9 },
    FeatureSpec { feature: SimdFeature::Sse4_1, name: "SSE4.1", report_key: "CPU_SIMD_HAS_SSE4_1", leaf: FeatureLeaf::Basic, register: Register::Ecx, bit: 19 },
    FeatureSpec { feature: SimdFeature::Sse4_2, name: "SSE4.2", report_key: "CPU_SIMD_HAS_SSE4_2", leaf: FeatureLeaf::Basic, register: Register::Ecx, bit: 20 },
    FeatureSpec { feature: SimdFeature::Fma, name: "FMA", report_key: "CPU_SIMD_HAS_FMA", leaf: FeatureLeaf::Basic, register: Register::Ecx, bit: 12 },
    FeatureSpec { feature: SimdFeature::Avx, name: "AVX", report_key: "CPU_SIMD_HAS_AVX", leaf: FeatureLeaf::Basic, register: Register::Ecx, bit: 28 },
    FeatureSpec { feature: SimdFeature::Avx2, name: "AVX2", report_key: "CPU_SIMD_HAS_AVX2", leaf: FeatureLeaf::StructuredExt, register: Register::Ebx, bit: 5 },
];

impl SimdFeature {
    /// Position in `FEATURE_TABLE`, which is also the bitmask bit.
    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn spec(self) -> &'static FeatureSpec {
        &FEATURE_TABLE[self.index()]
    }
}

bitflags! {
    /// Compact encoding of the decoded flags; bit i is `FEATURE_TABLE[i]`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct SimdFeatures: u32 {
        const SSE = 1 << 0;
        const SSE2 = 1 << 1;
        const SSE3 = 1 << 2;
        const SSSE3 = 1 << 3;
        const SSE4_1 = 1 << 4;
        const SSE4_2 = 1 << 5;
        const FMA = 1 << 6;
        const AVX = 1 << 7;
        const AVX2 = 1 << 8;
    }
}

/// Decoded presence of each feature, in table order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FeatureFlags([bool; FEATURE_COUNT]);

impl FeatureFlags {
    pub fn from_array(flags: [bool; FEATURE_COUNT]) -> Self {
        Self(flags)
    }

    pub fn has(&self, feature: SimdFeature) -> bool {
        self.0[feature.index()]
    }

    /// `(spec, present)` pairs in enumeration order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static FeatureSpec, bool)> + '_ {
        FEATURE_TABLE.iter().zip(self.0.iter().copied())
    }
}

pub fn decode_flags(leaf1: &RegisterQuadruple, leaf7: &RegisterQuadruple) -> FeatureFlags {
    let mut flags = [false; FEATURE_COUNT];
    for (slot, spec) in flags.iter_mut().zip(FEATURE_TABLE.iter()) {
        let regs = match spec.leaf {
            FeatureLeaf::Basic => leaf1,
            FeatureLeaf::StructuredExt => leaf7,
        };
        *slot = (regs.get(spec.register) & spec.mask()) != 0;
    }
    FeatureFlags(flags)
}

pub fn assemble_bitmask(flags: &FeatureFlags) -> SimdFeatures {
    flags
        .iter()
        .filter(|(_, present)| *present)
        .fold(SimdFeatures::empty(), |acc, (spec, _)| {
            acc | SimdFeatures::from_bits_retain(1 << spec.feature.index())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_order_matches_enum() {
        for (i, spec) in FEATURE_TABLE.iter().enumerate() {
            assert_eq!(spec.feature.index(), i, "{} out of order", spec.name);
        }
        assert_eq!(SimdFeatures::all().bits(), 0x1ff);
    }

    #[test]
    fn test_sse_sse2_only() {
        let leaf1 = RegisterQuadruple::new(0, 0, 0, (1 << 25) | (1 << 26));
        let leaf7 = RegisterQuadruple::default();
        let flags = decode_flags(&leaf1, &leaf7);

        assert!(flags.has(SimdFeature::Sse));
        assert!(flags.has(SimdFeature::Sse2));
        for feature in [
            SimdFeature::Sse3,
            SimdFeature::Ssse3,
            SimdFeature::Sse4_1,
            SimdFeature::Sse4_2,
            SimdFeature::Fma,
            SimdFeature::Avx,
            SimdFeature::Avx2,
        ] {
            assert!(!flags.has(feature), "{:?} should be clear", feature);
        }
        assert_eq!(assemble_bitmask(&flags).bits(), 3);
    }

    #[test]
    fn test_avx2_only() {
        let leaf1 = RegisterQuadruple::default();
        let leaf7 = RegisterQuadruple::new(0, 1 << 5, 0, 0);
        let flags = decode_flags(&leaf1, &leaf7);
        let bits = assemble_bitmask(&flags);
        assert_eq!(bits, SimdFeatures::AVX2);
        assert_eq!(bits.bits(), 256);
    }

    #[test]
    fn test_flags_ignore_unrelated_registers() {
        // EAX/EBX of leaf 1 and everything but EBX of leaf 7 carry no flags.
        let leaf1 = RegisterQuadruple::new(u32::MAX, u32::MAX, 0, 0);
        let leaf7 = RegisterQuadruple::new(u32::MAX, 0, u32::MAX, u32::MAX);
        assert_eq!(assemble_bitmask(&decode_flags(&leaf1, &leaf7)), SimdFeatures::empty());
    }

    #[test]
    fn test_all_feature_bits_set() {
        let leaf1 = RegisterQuadruple::new(0, 0, u32::MAX, u32::MAX);
        let leaf7 = RegisterQuadruple::new(0, u32::MAX, 0, 0);
        assert_eq!(assemble_bitmask(&decode_flags(&leaf1, &leaf7)), SimdFeatures::all());
    }

    #[test]
    fn test_fma_bit_position() {
        let leaf1 = RegisterQuadruple::new(0, 0, 1 << 12, 0);
        let flags = decode_flags(&leaf1, &RegisterQuadruple::default());
        assert!(flags.has(SimdFeature::Fma));
        assert_eq!(assemble_bitmask(&flags), SimdFeatures::FMA);
    }

    #[test]
    fn test_bitmask_every_combination() {
        for combo in 0u32..512 {
            let mut array = [false; FEATURE_COUNT];
            for (i, slot) in array.iter_mut().enumerate() {
                *slot = combo & (1 << i) != 0;
            }
            let bits = assemble_bitmask(&FeatureFlags::from_array(array)).bits();
            for (i, present) in array.iter().enumerate() {
                assert_eq!(bits & (1 << i) != 0, *present);
            }
            assert_eq!(bits >> FEATURE_COUNT, 0);
            assert_eq!(bits, combo);
        }
    }
}
