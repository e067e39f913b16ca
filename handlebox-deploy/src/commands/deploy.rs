use handlebox_app::program::ProgramArtifact;
use handlebox_app::state::StateSchema;

use crate::client::{NodeClient, SchemaParams};
use crate::config::DeployConfig;
use crate::error::DeployError;
use crate::format::{
    format_address, format_amount, print_divider, print_success, style_bold, style_dim,
};
use crate::prompt::confirm;
use crate::signer::operator_keypair;

/// Compile the program artifacts on the node and create the application.
pub async fn run(config: &DeployConfig, yes: bool) -> Result<(), DeployError> {
    let approval_text = std::fs::read_to_string(&config.approval_path)?;
    let clear_text = std::fs::read_to_string(&config.clear_path)?;

    // Validate the artifacts locally before spending anything.
    ProgramArtifact::parse(&approval_text)?;
    ProgramArtifact::parse(&clear_text)?;

    let keypair = operator_keypair(config)?;
    let sender = keypair.address();

    let client = NodeClient::new(&config.node_url)?;
    let balance = client.get_balance(&hex::encode(sender)).await?;

    if !yes {
        println!();
        println!("  {}", style_bold().apply_to("Create Application"));
        print_divider();
        println!("  Creator:  {}", format_address(&sender));
        println!(
            "  Balance:  {}",
            style_dim().apply_to(format_amount(balance))
        );
        println!("  Programs: {}, {}", config.approval_path, config.clear_path);
        println!();

        if !confirm("Create this application?")? {
            println!("  Cancelled.");
            return Ok(());
        }
    }

    let approval = client.compile_program(&approval_text).await?;
    let clear = client.compile_program(&clear_text).await?;

    // The schema the application has always declared: one reserved uint
    // slot and one byte-slice slot for the owner address.
    let schema = SchemaParams::from(StateSchema::new(1, 1));
    let created = client
        .create_application(
            &hex::encode(sender),
            &approval.bytecode,
            &clear.bytecode,
            schema,
        )
        .await?;

    print_success(&format!("Created application {}", created.app_id));
    println!(
        "  {}",
        style_dim().apply_to(format!("Application address: {}", created.address))
    );
    Ok(())
}
