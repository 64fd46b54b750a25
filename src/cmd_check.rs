//! `check` subcommand.

use deskhand_config::Config;

use crate::register::desktop;

/// Probe every backend once and print the report. Fails when any backend
/// is unavailable so scripts can gate on the exit status.
pub(crate) async fn check_environment(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let report = desktop(config).check_environment().await;
    println!("{}", report);

    let missing = report.unavailable().count();
    if missing > 0 {
        return Err(format!("{} backend(s) unavailable", missing).into());
    }
    println!("All backends available.");
    Ok(())
}
