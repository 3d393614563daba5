use crate::core::features::SimdFeature;
use crate::core::hardware::CpuFeatures;

#[derive(Debug, PartialEq, Eq)]
pub enum HealthStatus {
    Healthy,
    Suspicious(String),
}

/// Feature pairs where the first normally implies the second.
const IMPLIED: [(SimdFeature, SimdFeature); 7] = [
    (SimdFeature::Sse2, SimdFeature::Sse),
    (SimdFeature::Sse3, SimdFeature::Sse2),
    (SimdFeature::Ssse3, SimdFeature::Sse3),
    (SimdFeature::Sse4_1, SimdFeature::Ssse3),
    (SimdFeature::Sse4_2, SimdFeature::Sse4_1),
    (SimdFeature::Avx2, SimdFeature::Avx),
    (SimdFeature::Fma, SimdFeature::Avx),
];

pub struct Diagnostics;

impl Diagnostics {
    /// Sanity checks on a decoded probe. A hypervisor masking CPUID bits is
    /// the usual cause of a `Suspicious` result; the report is unaffected.
    pub fn check_health(features: &CpuFeatures) -> Vec<HealthStatus> {
        let mut findings = Vec::new();

        if !features.vendor.is_printable() {
            findings.push(HealthStatus::Suspicious(format!(
                "Vendor string is not printable: {:?}",
                features.vendor.as_bytes()
            )));
        }

        for (feature, required) in IMPLIED {
            if features.flags.has(feature) && !features.flags.has(required) {
                findings.push(HealthStatus::Suspicious(format!(
                    "{} reported without {}",
                    feature.spec().name,
                    required.spec().name
                )));
            }
        }

        if findings.is_empty() {
            findings.push(HealthStatus::Healthy);
        }
        findings
    }
}
