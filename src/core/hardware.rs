//! Hardware Detection Module
//! Runs the CPUID sequence once and decodes it.
use tracing::{debug, trace};

use crate::core::features::{assemble_bitmask, decode_flags, FeatureFlags, SimdFeatures};
use crate::core::vendor::{decode_brand, decode_vendor, VendorString};
use crate::cpuid::{
    CpuidSource, NativeCpuid, RegisterQuadruple, LEAF_BRAND_FIRST, LEAF_BRAND_LAST, LEAF_EXT_MAX,
    LEAF_FEATURES, LEAF_STRUCTURED_EXT, LEAF_VENDOR,
};

/// Raw registers captured during one probe run.
#[derive(Debug, Clone)]
pub struct CpuSnapshot {
    pub vendor_leaf: RegisterQuadruple,
    pub feature_leaf: RegisterQuadruple,
    pub extended_feature_leaf: RegisterQuadruple,
    pub brand_leaves: Option<[RegisterQuadruple; 3]>,
}

impl CpuSnapshot {
    /// Leaf 0, leaf 1, leaf 7/0, then the brand leaves, in that order.
    pub fn capture<S: CpuidSource>(cpu: &S) -> Self {
        let vendor_leaf = cpu.query_basic(LEAF_VENDOR);
        trace!(?vendor_leaf, "leaf 0");
        let max_basic_leaf = vendor_leaf.eax;

        let feature_leaf = cpu.query_basic(LEAF_FEATURES);
        trace!(?feature_leaf, "leaf 1");

        // Leaves above the reported maximum return undefined data.
        let extended_feature_leaf = if max_basic_leaf >= LEAF_STRUCTURED_EXT {
            cpu.query_extended(LEAF_STRUCTURED_EXT, 0)
        } else {
            debug!(max_basic_leaf, "leaf 7 not supported, treating AVX2 as absent");
            RegisterQuadruple::default()
        };
        trace!(?extended_feature_leaf, "leaf 7/0");

        let max_ext_leaf = cpu.query_basic(LEAF_EXT_MAX).eax;
        let brand_leaves = if max_ext_leaf >= LEAF_BRAND_LAST {
            Some([
                cpu.query_basic(LEAF_BRAND_FIRST),
                cpu.query_basic(LEAF_BRAND_FIRST + 1),
                cpu.query_basic(LEAF_BRAND_LAST),
            ])
        } else {
            debug!(max_ext_leaf, "brand string leaves not supported");
            None
        };

        Self {
            vendor_leaf,
            feature_leaf,
            extended_feature_leaf,
            brand_leaves,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CpuFeatures {
    pub vendor: VendorString,
    pub brand: Option<String>,
    pub max_basic_leaf: u32,
    pub flags: FeatureFlags,
    pub bits: SimdFeatures,
}

impl CpuFeatures {
    /// Probe the CPU this process runs on.
    pub fn detect() -> Self {
        Self::from_snapshot(&CpuSnapshot::capture(&NativeCpuid))
    }

    pub fn from_snapshot(snapshot: &CpuSnapshot) -> Self {
        let vendor = decode_vendor(&snapshot.vendor_leaf);
        let flags = decode_flags(&snapshot.feature_leaf, &snapshot.extended_feature_leaf);
        let bits = assemble_bitmask(&flags);
        let brand = snapshot
            .brand_leaves
            .as_ref()
            .map(decode_brand)
            .filter(|b| !b.is_empty());

        debug!(vendor = %vendor, brand = ?brand, bits = bits.bits(), "decoded cpu features");

        Self {
            vendor,
            brand,
            max_basic_leaf: snapshot.vendor_leaf.eax,
            flags,
            bits,
        }
    }
}
