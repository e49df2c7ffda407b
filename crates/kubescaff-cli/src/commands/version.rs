//! `kubescaff version`.

use serde::Serialize;

use crate::cli::OutputFormat;
use crate::error::CliResult;
use crate::output::OutputManager;

#[derive(Debug, Serialize)]
struct VersionInfo<'a> {
    version: &'a str,
    project_version: Option<&'a str>,
    plugins: &'a [String],
}

/// Prints the tool version and, when known, the active project version and
/// plugin keys.
pub fn execute(
    output: &OutputManager,
    project_version: Option<&str>,
    plugins: &[String],
) -> CliResult<()> {
    let info = VersionInfo {
        version: env!("CARGO_PKG_VERSION"),
        project_version,
        plugins,
    };

    if output.format() == OutputFormat::Json {
        let value = serde_json::to_value(&info).map_err(std::io::Error::other)?;
        output.json(&value)?;
        return Ok(());
    }

    output.print(&format!("kubescaff {}", info.version))?;
    if let Some(version) = info.project_version {
        output.print(&format!("project version: {version}"))?;
    }
    if !info.plugins.is_empty() {
        output.print(&format!("plugins: {}", info.plugins.join(", ")))?;
    }
    Ok(())
}
