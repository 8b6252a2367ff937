//! Walk the full custody flow: register a coin, deposit, then execute an
//! agent-signed withdrawal carrying a settlement task batch.
//!
//! Run with: cargo run -p custodia-core --example withdraw_flow

use std::sync::Arc;

use custodia_core::{InMemoryTokens, TokenConnector, Vault, VaultConfig};
use custodia_crypto::{sign_request, AgentKeyPair, SigningDomain};
use custodia_types::{Address, Amount, CoinId, Task, TaskKind, WithdrawalRequest};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let admin = Address::from_bytes([0xAD; 20]);
    let vault_address = Address::from_bytes([0xCC; 20]);
    let weth = Address::from_bytes([0xE0; 20]);
    let alice = Address::from_bytes([0x01; 20]);
    let bob = Address::from_bytes([0x02; 20]);
    let coin = CoinId::new(1);

    let domain = SigningDomain::new("Crash", "1.0", 31337, vault_address);
    let tokens = Arc::new(InMemoryTokens::new(vault_address));
    let vault = Vault::new(VaultConfig::new(admin, domain.clone()), tokens.clone());

    // Admin setup: trust an agent key, register WETH as coin 1
    let agent = AgentKeyPair::generate();
    vault.set_agent_address(admin, agent.address()).await?;
    vault.add_coin(admin, coin, weth).await?;

    // Alice and Bob deposit into custody
    for (user, amount) in [(alice, 10u128), (bob, 5)] {
        tokens.mint(weth, user, Amount::new(amount)).await;
        tokens.approve(weth, user, Amount::new(amount)).await;
        vault.deposit(user, coin, Amount::new(amount)).await?;
    }

    println!("custodied alice={}", vault.user_balance(alice, coin).await);
    println!("custodied bob={}", vault.user_balance(bob, coin).await);

    // The agent authorizes one batch: alice withdraws 1, and bob settles 2
    // over to alice internally
    let request = WithdrawalRequest::simple(alice, coin, Amount::new(1), 0)
        .with_task(Task {
            kind: TaskKind::Debit,
            user: bob,
            coin_id: coin,
            amount: Amount::new(2),
            nonce: 0,
        })
        .with_task(Task {
            kind: TaskKind::Credit,
            user: alice,
            coin_id: coin,
            amount: Amount::new(2),
            nonce: 1,
        });
    let signature = sign_request(&agent, &domain, &request)?;

    let receipt = vault.withdraw(&request, &signature).await?;
    println!("receipt {} digest 0x{}", receipt.receipt_id.0, receipt.digest);

    println!("custodied alice={}", vault.user_balance(alice, coin).await);
    println!("custodied bob={}", vault.user_balance(bob, coin).await);
    println!("wallet alice={}", tokens.balance_of(weth, alice).await);

    // A replay of the same signed request is dead on arrival
    match vault.withdraw(&request, &signature).await {
        Err(err) => println!("replay rejected: {}", err),
        Ok(_) => unreachable!("replay must not execute"),
    }

    Ok(())
}
