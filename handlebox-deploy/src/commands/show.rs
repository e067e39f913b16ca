use handlebox_types::constants::GITHUB_BOX;
use handlebox_types::primitives::AppId;

use crate::client::NodeClient;
use crate::config::DeployConfig;
use crate::error::DeployError;
use crate::format::{print_success, style_dim};

/// Read the `github` box back and print the stored handle.
pub async fn run(config: &DeployConfig, app_id: AppId) -> Result<(), DeployError> {
    let client = NodeClient::new(&config.node_url)?;

    match client.get_box(app_id, &hex::encode(GITHUB_BOX)).await? {
        Some(slot) => {
            let name = hex::decode(&slot.name)
                .map_err(|e| DeployError::Serialization(e.to_string()))?;
            let value = hex::decode(&slot.value)
                .map_err(|e| DeployError::Serialization(e.to_string()))?;
            print_success(&format!(
                "Stored handle: {}",
                String::from_utf8_lossy(&value)
            ));
            println!(
                "  {}",
                style_dim().apply_to(format!("Box: {}", String::from_utf8_lossy(&name)))
            );
        }
        None => {
            println!(
                "  {}",
                style_dim().apply_to(format!(
                    "Application {} has no stored handle yet.",
                    app_id
                ))
            );
        }
    }
    Ok(())
}
