use splitly::config::CONFIG;
use splitly::core::models::{NewTransaction, TransactionKind, User};
use splitly::{InMemoryCache, InMemoryLogging, InMemoryStorage, SplitlyService};
use tracing::info;

fn profile(id: &str, name: &str, email: &str) -> User {
    User {
        id: id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        avatar_url: None,
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(CONFIG.log_level.as_str())
        .init();

    let service = SplitlyService::new(
        InMemoryStorage::new(),
        InMemoryLogging::new(),
        InMemoryCache::new(),
    );

    let ana = service
        .add_user(profile("ana", "Ana", "ana@example.com"), None)
        .await?;
    let bo = service
        .add_user(profile("bo", "Bo", "bo@example.com"), None)
        .await?;
    let cam = service
        .add_user(profile("cam", "Cam", "cam@example.com"), None)
        .await?;

    let group = service
        .create_group("Flat 4B".to_string(), vec![bo.clone(), cam.clone()], &ana)
        .await?;
    info!(group_id = %group.id, "seeded demo group");

    service
        .create_transaction(
            &group.id,
            NewTransaction {
                title: "Groceries".to_string(),
                amount: 90.0,
                kind: TransactionKind::Expense,
                paid_by: ana.id.clone(),
                paid_to: None,
                split_between: vec![ana.id.clone(), bo.id.clone(), cam.id.clone()],
                category: Some("groceries".to_string()),
                notes: None,
            },
            &ana,
        )
        .await?;

    service
        .create_transaction(
            &group.id,
            NewTransaction {
                title: "Settling groceries".to_string(),
                amount: 30.0,
                kind: TransactionKind::Settlement,
                paid_by: bo.id.clone(),
                paid_to: Some(ana.id.clone()),
                split_between: Vec::new(),
                category: None,
                notes: None,
            },
            &bo,
        )
        .await?;

    service
        .create_transaction(
            &group.id,
            NewTransaction {
                title: "Concert ticket loan".to_string(),
                amount: 45.0,
                kind: TransactionKind::Loan,
                paid_by: ana.id.clone(),
                paid_to: Some(cam.id.clone()),
                split_between: Vec::new(),
                category: None,
                notes: Some("Pay back whenever".to_string()),
            },
            &ana,
        )
        .await?;

    let balances = service.get_group_balances(&group.id, &ana).await?;
    println!("{}", serde_json::to_string_pretty(&balances)?);

    let summary = service.get_user_summary(&group.id, &ana.id, &ana).await?;
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}
