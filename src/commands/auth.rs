use anyhow::Result;
use shiftsync_core::remote::provider::Provider;

pub async fn run(provider_name: &str) -> Result<()> {
    let provider = Provider::from_name(provider_name);

    println!("Authenticating with {provider_name}...");

    // Provider handles the full OAuth flow and stores credentials/tokens
    let account = provider.authenticate().await?;

    println!("Authenticated as: {account}\n");
    println!("Add these lines to the [calendar] section of your config:\n");
    println!("provider = \"{provider_name}\"");
    println!("account = \"{account}\"");
    println!("\nThen run `shiftsync` to sync your shifts.");

    Ok(())
}
