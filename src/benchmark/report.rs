use core::fmt;

use super::BenchReport;
use crate::config::BenchConfig;

const TOP: &str = "/----------------------------------------------------------\\";
const HEADER: &str = "|      hash function      |  collisions  |  non-uniformity |";
const RULE: &str = "| ----------------------- | ------------ | --------------- |";
const BOTTOM: &str = "\\----------------------------------------------------------/";

/// Framed text table of benchmark results.
///
/// Names are cut to 23 characters and deviations printed with twelve
/// decimals.
///
/// # Examples
///
/// ```rust
/// use micro_hash::BenchConfig;
/// use micro_hash::benchmark::BenchReport;
/// use micro_hash::benchmark::ReportTable;
///
/// let config = BenchConfig::new(10_000_000, 12).unwrap();
/// let reports = [BenchReport {
///     name: "int32_rob",
///     collisions: 0,
///     mean_deviation: 39.740234375,
/// }];
///
/// let table = ReportTable::new(&config, &reports).to_string();
/// assert!(table.starts_with("Iterating over 10000000 random values...\nPrecision set to 12\n"));
/// assert!(table.contains("| int32_rob               | 0            | 39.740234375000 |\n"));
/// ```
#[derive(Clone, Copy, Debug)]
pub struct ReportTable<'a> {
    config: &'a BenchConfig,
    reports: &'a [BenchReport],
}

impl<'a> ReportTable<'a> {
    /// Creates a table over `reports`, headed by the run parameters in
    /// `config`.
    pub fn new(config: &'a BenchConfig, reports: &'a [BenchReport]) -> Self {
        Self { config, reports }
    }
}

impl fmt::Display for ReportTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Iterating over {} random values...",
            self.config.iterations()
        )?;
        writeln!(f, "Precision set to {}", self.config.precision())?;
        writeln!(f, "{TOP}")?;
        writeln!(f, "{HEADER}")?;
        writeln!(f, "{RULE}")?;
        for report in self.reports {
            writeln!(
                f,
                "| {:<23.23} | {:<12} | {:<12.12} |",
                report.name, report.collisions, report.mean_deviation
            )?;
        }
        writeln!(f, "{BOTTOM}")
    }
}
