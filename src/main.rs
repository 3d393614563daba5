use clap::{Parser, ValueEnum};
use simd_probe::core::diagnostics::{Diagnostics, HealthStatus};
use simd_probe::core::hardware::CpuFeatures;
use simd_probe::report::{report, report_json, write_report};
use tracing::{debug, warn, Level};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// KEY=VALUE lines for build systems
    Env,
    /// Single JSON object
    Json,
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Env)]
    format: OutputFormat,

    /// Log to stderr (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    // stdout is reserved for the report.
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let features = CpuFeatures::detect();

    for status in Diagnostics::check_health(&features) {
        match status {
            HealthStatus::Healthy => debug!("cpu feature flags are consistent"),
            HealthStatus::Suspicious(msg) => warn!("{}", msg),
        }
    }

    let text = match args.format {
        OutputFormat::Env => report(&features.vendor, &features.flags, features.bits),
        OutputFormat::Json => report_json(&features)?,
    };
    write_report(std::io::stdout().lock(), &text)?;

    Ok(())
}
