use handlebox_app::deposit::deposit_group;
use handlebox_types::primitives::{app_address, Amount, AppId};
use handlebox_types::transaction::compute_group_id;

use crate::client::NodeClient;
use crate::config::DeployConfig;
use crate::error::DeployError;
use crate::format::{
    format_address, format_amount, print_divider, print_error, print_success, style_bold,
    style_dim, style_info,
};
use crate::prompt::confirm;
use crate::signer::{encode_signed, operator_keypair, sign_transaction};

/// Submit the grouped deposit: a payment into the application address
/// followed by the application call that stores the handle.
pub async fn run(
    config: &DeployConfig,
    app_id: AppId,
    handle: &str,
    amount: Amount,
    yes: bool,
) -> Result<(), DeployError> {
    let keypair = operator_keypair(config)?;
    let sender = keypair.address();

    let client = NodeClient::new(&config.node_url)?;

    // Pre-check sender balance.
    let balance = client.get_balance(&hex::encode(sender)).await?;
    if balance < amount {
        return Err(DeployError::InsufficientBalance {
            available: balance,
            required: amount,
        });
    }

    if !yes {
        println!();
        println!("  {}", style_bold().apply_to("Deposit Summary"));
        print_divider();
        println!("  From:     {}", format_address(&sender));
        println!(
            "  To:       {} (application {})",
            format_address(&app_address(app_id)),
            app_id
        );
        println!("  Amount:   {}", style_bold().apply_to(format_amount(amount)));
        println!("  Handle:   {}", style_info().apply_to(handle));
        println!(
            "  Balance:  {}",
            style_dim().apply_to(format_amount(balance))
        );
        println!();

        if !confirm("Submit this deposit?")? {
            println!("  Cancelled.");
            return Ok(());
        }
    }

    let group = deposit_group(sender, app_id, handle.as_bytes(), amount);
    let group_id =
        compute_group_id(&group).map_err(|e| DeployError::Serialization(e.to_string()))?;

    let mut wire = Vec::with_capacity(group.len());
    for txn in &group {
        let signed = sign_transaction(&keypair, txn, &group_id)?;
        wire.push(encode_signed(&signed)?);
    }

    let result = client.submit_group(wire).await?;
    if !result.success {
        let reason = result.reason.unwrap_or_else(|| "unknown".to_string());
        print_error(&format!("Deposit rejected: {}", reason));
        return Err(DeployError::NodeRejected { reason });
    }

    print_success(&format!(
        "Deposit confirmed in round {}",
        result.round.unwrap_or_default()
    ));
    for line in &result.logs {
        println!("  {}", style_dim().apply_to(line));
    }
    println!(
        "  {}",
        style_dim().apply_to(format!("Group id: {}", hex::encode(group_id)))
    );
    Ok(())
}
