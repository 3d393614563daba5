//! Report rendering.
//!
//! The `KEY=VALUE` form is parsed line by line by the build system, so line
//! order and spelling here are a wire contract.

use std::fmt::Write as _;
use std::io::Write;

use serde::Serialize;

use crate::core::features::{FeatureFlags, SimdFeatures};
use crate::core::hardware::CpuFeatures;
use crate::core::vendor::VendorString;
use crate::error::ProbeError;

/// Model name is not decoded from CPUID in the key-value report.
pub const VENDOR_MODEL_PLACEHOLDER: &str = "Intel Core i0";

pub const REPORT_LINES: usize = 12;

fn flag_text(present: bool) -> &'static str {
    if present {
        "TRUE"
    } else {
        "FALSE"
    }
}

/// Renders the 12-line `KEY=VALUE` report, each line newline-terminated.
pub fn report(vendor: &VendorString, flags: &FeatureFlags, bitmask: SimdFeatures) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(out, "VENDOR_NAME={}", vendor);
    let _ = writeln!(out, "VENDOR_MODEL={}", VENDOR_MODEL_PLACEHOLDER);
    for (spec, present) in flags.iter() {
        let _ = writeln!(out, "{}={}", spec.report_key, flag_text(present));
    }
    let _ = writeln!(out, "CPU_SIMD_FEATURES_BITS={}", bitmask.bits());
    out
}

#[derive(Serialize)]
struct JsonReport<'a> {
    vendor_name: &'a VendorString,
    vendor_model: &'static str,
    brand_string: Option<&'a str>,
    max_basic_leaf: u32,
    features: Vec<FeatureEntry>,
    features_bits: u32,
}

#[derive(Serialize)]
struct FeatureEntry {
    name: &'static str,
    key: &'static str,
    present: bool,
}

pub fn report_json(features: &CpuFeatures) -> Result<String, ProbeError> {
    let export = JsonReport {
        vendor_name: &features.vendor,
        vendor_model: VENDOR_MODEL_PLACEHOLDER,
        brand_string: features.brand.as_deref(),
        max_basic_leaf: features.max_basic_leaf,
        features: features
            .flags
            .iter()
            .map(|(spec, present)| FeatureEntry {
                name: spec.name,
                key: spec.report_key,
                present,
            })
            .collect(),
        features_bits: features.bits.bits(),
    };
    let mut json = serde_json::to_string_pretty(&export)?;
    json.push('\n');
    Ok(json)
}

/// Writes the whole report in one call.
pub fn write_report<W: Write>(mut writer: W, text: &str) -> Result<(), ProbeError> {
    writer.write_all(text.as_bytes())?;
    writer.flush()?;
    Ok(())
}
