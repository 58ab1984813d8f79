use crate::core::errors::SplitlyError;
use crate::tests::{create_test_service, test_user};

#[tokio::test]
async fn add_user_stores_profile() {
    let service = create_test_service();
    let user = service
        .add_user(test_user("u1", "Alice"), None)
        .await
        .unwrap();
    assert_eq!(user.id, "u1");

    let fetched = service.get_user("u1").await.unwrap().unwrap();
    assert_eq!(fetched, user);
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
    let service = create_test_service();
    service
        .add_user(test_user("u1", "Alice"), None)
        .await
        .unwrap();

    let mut other = test_user("u2", "Bob");
    other.email = "u1@example.com".to_string();
    let result = service.add_user(other, None).await;
    assert!(matches!(
        result,
        Err(SplitlyError::EmailAlreadyRegistered(_))
    ));
}

#[tokio::test]
async fn malformed_email_is_rejected() {
    let service = create_test_service();

    let mut user = test_user("u1", "Alice");
    user.email = "invalid".to_string();
    assert!(matches!(
        service.add_user(user, None).await,
        Err(SplitlyError::InvalidEmail(_))
    ));

    let mut user = test_user("u2", "Bob");
    user.email = String::new();
    assert!(matches!(
        service.add_user(user, None).await,
        Err(SplitlyError::MissingEmail)
    ));
}

#[tokio::test]
async fn blank_name_is_rejected() {
    let service = create_test_service();
    let result = service.add_user(test_user("u1", "   "), None).await;
    assert!(matches!(result, Err(SplitlyError::InvalidInput(field, _)) if field == "name"));
}

#[tokio::test]
async fn update_profile_changes_name_and_avatar() {
    let service = create_test_service();
    service
        .add_user(test_user("u1", "Alice"), None)
        .await
        .unwrap();

    let updated = service
        .update_profile(
            "u1",
            Some("Alicia".to_string()),
            Some("https://cdn.example.com/a.png".to_string()),
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Alicia");
    assert_eq!(
        updated.avatar_url.as_deref(),
        Some("https://cdn.example.com/a.png")
    );

    let fetched = service.get_user("u1").await.unwrap().unwrap();
    assert_eq!(fetched.name, "Alicia");
    assert_eq!(fetched.email, "u1@example.com");
}

#[tokio::test]
async fn update_profile_for_unknown_user_fails() {
    let service = create_test_service();
    let result = service
        .update_profile("missing", Some("Name".to_string()), None)
        .await;
    assert!(matches!(result, Err(SplitlyError::UserNotFound(_))));
}
