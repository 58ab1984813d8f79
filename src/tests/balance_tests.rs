use crate::constants::BALANCES_QUERIED;
use crate::core::errors::SplitlyError;
use crate::core::ledger;
use crate::tests::{create_test_service, expense_input, settlement_input, test_user};

#[tokio::test]
async fn balances_reflect_writes_immediately() {
    let service = create_test_service();
    let alice = service
        .add_user(test_user("u1", "Alice"), None)
        .await
        .unwrap();
    let bob = service.add_user(test_user("u2", "Bob"), None).await.unwrap();
    let group = service
        .create_group("Flat".to_string(), vec![bob.clone()], &alice)
        .await
        .unwrap();

    // Prime the cache with an empty ledger.
    let balances = service.get_group_balances(&group.id, &alice).await.unwrap();
    assert!(balances.settlement_plan().is_empty());

    service
        .create_transaction(
            &group.id,
            expense_input("Dinner", 50.0, "u1", &["u1", "u2"]),
            &alice,
        )
        .await
        .unwrap();

    let balances = service.get_group_balances(&group.id, &alice).await.unwrap();
    assert_eq!(
        ledger::balance_between(balances.balances(), "u2", "u1"),
        -25.0
    );
    assert_eq!(balances.settlement_plan().len(), 1);
}

#[tokio::test]
async fn balance_response_carries_both_plans() {
    let service = create_test_service();
    let alice = service
        .add_user(test_user("u1", "Alice"), None)
        .await
        .unwrap();
    let bob = service.add_user(test_user("u2", "Bob"), None).await.unwrap();
    let cam = service.add_user(test_user("u3", "Cam"), None).await.unwrap();
    let group = service
        .create_group("Flat".to_string(), vec![bob.clone(), cam.clone()], &alice)
        .await
        .unwrap();

    // u1 owes u2, u2 owes u3; the netted plan shortcuts through u2.
    service
        .create_transaction(&group.id, expense_input("A", 10.0, "u2", &["u1"]), &alice)
        .await
        .unwrap();
    service
        .create_transaction(&group.id, expense_input("B", 10.0, "u3", &["u2"]), &alice)
        .await
        .unwrap();

    let balances = service.get_group_balances(&group.id, &alice).await.unwrap();
    assert_eq!(balances.settlement_plan().len(), 2);
    assert_eq!(balances.minimized_plan().len(), 1);
    assert_eq!(balances.minimized_plan()[0].from, "u1");
    assert_eq!(balances.minimized_plan()[0].to, "u3");
}

#[tokio::test]
async fn suggest_settlement_amount_matches_outstanding_debt() {
    let service = create_test_service();
    let alice = service
        .add_user(test_user("u1", "Alice"), None)
        .await
        .unwrap();
    let bob = service.add_user(test_user("u2", "Bob"), None).await.unwrap();
    let group = service
        .create_group("Flat".to_string(), vec![bob.clone()], &alice)
        .await
        .unwrap();
    service
        .create_transaction(
            &group.id,
            expense_input("Dinner", 50.0, "u1", &["u1", "u2"]),
            &alice,
        )
        .await
        .unwrap();

    let suggestion = service
        .suggest_settlement_amount(&group.id, "u2", "u1", &bob)
        .await
        .unwrap();
    assert_eq!(suggestion, Some(25.0));

    let suggestion = service
        .suggest_settlement_amount(&group.id, "u1", "u2", &bob)
        .await
        .unwrap();
    assert_eq!(suggestion, None);
}

#[tokio::test]
async fn user_summary_aggregates_position() {
    let service = create_test_service();
    let alice = service
        .add_user(test_user("u1", "Alice"), None)
        .await
        .unwrap();
    let bob = service.add_user(test_user("u2", "Bob"), None).await.unwrap();
    let cam = service.add_user(test_user("u3", "Cam"), None).await.unwrap();
    let group = service
        .create_group("Flat".to_string(), vec![bob.clone(), cam.clone()], &alice)
        .await
        .unwrap();

    service
        .create_transaction(
            &group.id,
            expense_input("Groceries", 90.0, "u1", &["u1", "u2", "u3"]),
            &alice,
        )
        .await
        .unwrap();
    service
        .create_transaction(&group.id, settlement_input(30.0, "u2", "u1"), &bob)
        .await
        .unwrap();

    let summary = service
        .get_user_summary(&group.id, "u1", &alice)
        .await
        .unwrap();
    assert_eq!(summary.total_owed, 30.0);
    assert_eq!(summary.total_owing, 0.0);
    assert_eq!(summary.net_balance, 30.0);
    assert_eq!(summary.stats.total_paid, 90.0);
    assert_eq!(summary.stats.total_received, 30.0);
    assert_eq!(summary.stats.expense_count, 1);
    assert_eq!(summary.stats.settlement_count, 1);

    let summary = service
        .get_user_summary(&group.id, "u2", &bob)
        .await
        .unwrap();
    assert_eq!(summary.total_owed, 0.0);
    assert_eq!(summary.total_owing, 0.0);
    assert_eq!(summary.net_balance, 0.0);
    assert_eq!(summary.stats.settlement_count, 1);
}

#[tokio::test]
async fn summaries_require_membership() {
    let service = create_test_service();
    let alice = service
        .add_user(test_user("u1", "Alice"), None)
        .await
        .unwrap();
    let mallory = service
        .add_user(test_user("u9", "Mallory"), None)
        .await
        .unwrap();
    let group = service
        .create_group("Flat".to_string(), Vec::new(), &alice)
        .await
        .unwrap();

    let result = service.get_user_summary(&group.id, "u9", &alice).await;
    assert!(matches!(result, Err(SplitlyError::NotGroupMember(_))));

    let result = service.get_group_balances(&group.id, &mallory).await;
    assert!(matches!(result, Err(SplitlyError::NotGroupMember(_))));
}

#[tokio::test]
async fn balance_queries_are_audited() {
    let service = create_test_service();
    let alice = service
        .add_user(test_user("u1", "Alice"), None)
        .await
        .unwrap();
    let group = service
        .create_group("Flat".to_string(), Vec::new(), &alice)
        .await
        .unwrap();

    service.get_group_balances(&group.id, &alice).await.unwrap();

    let audits = service.get_group_audits(&group.id).await.unwrap();
    assert!(audits.iter().any(|a| a.action == BALANCES_QUERIED));

    let logs = service.get_app_logs().await.unwrap();
    assert!(!logs.is_empty());
}
