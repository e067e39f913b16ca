use crate::error::DeployError;
use crate::format::{print_divider, print_success, style_bold, style_dim};
use crate::signer::{generate_mnemonic, Keypair};

/// Generate a fresh operator mnemonic and print the derived address.
pub fn run() -> Result<(), DeployError> {
    let mnemonic = generate_mnemonic();
    let keypair = Keypair::from_mnemonic(&mnemonic.to_string())?;

    print_success("Generated operator key");
    print_divider();
    println!("  Address:  {}", hex::encode(keypair.address()));
    println!(
        "  Mnemonic: {}",
        style_bold().apply_to(mnemonic.to_string())
    );
    println!(
        "  {}",
        style_dim().apply_to("Write the mnemonic down; it is the only copy of this key.")
    );
    Ok(())
}
