//! `capabilities` subcommand.

use deskhand_config::Config;
use deskhand_core::OperationListing;
use deskhand_protocols::SideEffect;

use crate::register::{build_router, desktop};

/// Print the discovery list.
pub(crate) fn list_capabilities(
    config: &Config,
    format: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let router = build_router(config, desktop(config));
    let listings = router.list_capability_operations();

    match format {
        "json" => {
            let json = serde_json::to_string_pretty(&listings)?;
            println!("{}", json);
        }
        _ => print!("{}", render_table(&listings)),
    }

    Ok(())
}

fn render_table(listings: &[OperationListing]) -> String {
    let mut out = format!("{:<26} {:<8} {}\n", "OPERATION", "EFFECT", "DESCRIPTION");
    out.push_str(&"-".repeat(80));
    out.push('\n');
    for listing in listings {
        let effect = match listing.side_effect {
            SideEffect::ReadOnly => "read",
            SideEffect::Mutating => "mutate",
        };
        out.push_str(&format!(
            "{:<26} {:<8} {}\n",
            listing.operation_id(),
            effect,
            listing.description
        ));
    }
    out
}
