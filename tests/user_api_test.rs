// ==========================================
// UserApi / RealmApi 集成测试
// ==========================================
// 测试目标: 单用户 CRUD、重复冲突、分页过滤、租户管理
// ==========================================

mod test_helpers;

use scim_provision::api::{ApiError, RealmApi, UserApi};
use scim_provision::domain::realm::RealmCreate;
use scim_provision::domain::user::{EmailAddress, ScimUserCreate, ScimUserUpdate};
use scim_provision::logging;
use test_helpers::{create_test_db, insert_test_realm, TEST_REALM_ID};

fn setup() -> (tempfile::NamedTempFile, String) {
    logging::init_test();
    let (temp_file, db_path) = create_test_db().expect("Failed to create test db");
    insert_test_realm(&db_path, TEST_REALM_ID).expect("Failed to insert realm");
    (temp_file, db_path)
}

fn create_request(user_name: &str, email: &str) -> ScimUserCreate {
    ScimUserCreate {
        schemas: vec![scim_provision::SCIM_USER_SCHEMA.to_string()],
        user_name: user_name.to_string(),
        external_id: None,
        first_name: "John".to_string(),
        sur_name: "Doe".to_string(),
        display_name: "John Doe".to_string(),
        active: true,
        emails: vec![EmailAddress::primary(email)],
    }
}

#[tokio::test]
async fn test_create_and_get_user() {
    let (_tmp, db_path) = setup();
    let api = UserApi::new(db_path);

    let view = api
        .create_user(TEST_REALM_ID, create_request("jdoe", "john@x.com"))
        .await
        .unwrap();
    assert_eq!(view.user_name, "jdoe");
    assert_eq!(view.meta.resource_type, "User");
    assert!(view.meta.location.contains(TEST_REALM_ID));

    let fetched = api.get_user(TEST_REALM_ID, &view.id).await.unwrap();
    assert_eq!(fetched.user_name, "jdoe");
    assert_eq!(fetched.emails.len(), 1);
}

#[tokio::test]
async fn test_create_duplicate_username_conflicts() {
    let (_tmp, db_path) = setup();
    let api = UserApi::new(db_path);

    api.create_user(TEST_REALM_ID, create_request("jdoe", "a@x.com"))
        .await
        .unwrap();
    let result = api
        .create_user(TEST_REALM_ID, create_request("jdoe", "b@x.com"))
        .await;

    match result {
        Err(ApiError::Conflict(msg)) => assert!(msg.contains("jdoe")),
        other => panic!("Expected Conflict, got {:?}", other.map(|v| v.user_name)),
    }
}

#[tokio::test]
async fn test_create_in_missing_realm_not_found() {
    logging::init_test();
    let (_tmp, db_path) = create_test_db().expect("Failed to create test db");
    let api = UserApi::new(db_path);

    let result = api
        .create_user("realm_ghost", create_request("jdoe", "a@x.com"))
        .await;
    assert!(matches!(result, Err(ApiError::NotFound(_))));
}

#[tokio::test]
async fn test_create_rejects_invalid_email() {
    let (_tmp, db_path) = setup();
    let api = UserApi::new(db_path);

    let result = api
        .create_user(TEST_REALM_ID, create_request("jdoe", "not-an-email"))
        .await;
    assert!(matches!(result, Err(ApiError::InvalidInput(_))));
}

#[tokio::test]
async fn test_get_user_by_username_and_email() {
    let (_tmp, db_path) = setup();
    let api = UserApi::new(db_path);
    api.create_user(TEST_REALM_ID, create_request("jdoe", "john@x.com"))
        .await
        .unwrap();

    let by_name = api
        .get_user_by_username(TEST_REALM_ID, "jdoe")
        .await
        .unwrap();
    let by_email = api
        .get_user_by_email(TEST_REALM_ID, "john@x.com")
        .await
        .unwrap();
    assert_eq!(by_name.id, by_email.id);

    let missing = api.get_user_by_email(TEST_REALM_ID, "ghost@x.com").await;
    assert!(matches!(missing, Err(ApiError::NotFound(_))));
}

#[tokio::test]
async fn test_list_users_pagination_and_filter() {
    let (_tmp, db_path) = setup();
    let api = UserApi::new(db_path);

    for i in 0..5 {
        let mut req = create_request(&format!("user{}", i), &format!("u{}@x.com", i));
        req.first_name = format!("First{}", i);
        api.create_user(TEST_REALM_ID, req).await.unwrap();
    }

    // 分页
    let page = api.list_users(TEST_REALM_ID, 2, 2, None).await.unwrap();
    assert_eq!(page.total_results, 5);
    assert_eq!(page.items_per_page, 2);
    assert_eq!(page.start_index, 2);
    assert_eq!(page.resources[0].user_name, "user1");

    // 过滤（userName 子串）
    let filtered = api
        .list_users(TEST_REALM_ID, 1, 100, Some("user3"))
        .await
        .unwrap();
    assert_eq!(filtered.total_results, 1);
    assert_eq!(filtered.resources[0].user_name, "user3");
}

#[tokio::test]
async fn test_update_user_partial_fields() {
    let (_tmp, db_path) = setup();
    let api = UserApi::new(db_path);
    let created = api
        .create_user(TEST_REALM_ID, create_request("jdoe", "john@x.com"))
        .await
        .unwrap();

    let update = ScimUserUpdate {
        display_name: Some("Johnny".to_string()),
        active: Some(false),
        ..ScimUserUpdate::default()
    };
    let updated = api
        .update_user(TEST_REALM_ID, &created.id, update)
        .await
        .unwrap();

    // 仅提供的字段被覆盖
    assert_eq!(updated.display_name, "Johnny");
    assert!(!updated.active);
    assert_eq!(updated.user_name, "jdoe");
    assert_eq!(updated.emails[0].value, "john@x.com");
}

#[tokio::test]
async fn test_delete_user() {
    let (_tmp, db_path) = setup();
    let api = UserApi::new(db_path);
    let created = api
        .create_user(TEST_REALM_ID, create_request("jdoe", "john@x.com"))
        .await
        .unwrap();

    api.delete_user(TEST_REALM_ID, &created.id).await.unwrap();
    let gone = api.get_user(TEST_REALM_ID, &created.id).await;
    assert!(matches!(gone, Err(ApiError::NotFound(_))));

    // 重复删除报 NotFound
    let again = api.delete_user(TEST_REALM_ID, &created.id).await;
    assert!(matches!(again, Err(ApiError::NotFound(_))));
}

#[tokio::test]
async fn test_same_username_allowed_across_realms() {
    let (_tmp, db_path) = setup();
    insert_test_realm(&db_path, "realm_other001").unwrap();
    let api = UserApi::new(db_path);

    api.create_user(TEST_REALM_ID, create_request("jdoe", "a@x.com"))
        .await
        .unwrap();
    // 租户是唯一性隔离边界
    api.create_user("realm_other001", create_request("jdoe", "a@x.com"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_realm_api_lifecycle() {
    logging::init_test();
    let (_tmp, db_path) = create_test_db().expect("Failed to create test db");
    let api = RealmApi::new(db_path);

    let created = api
        .create_realm(RealmCreate {
            name: "Engineering".to_string(),
            description: Some("Engineering tenant".to_string()),
        })
        .await
        .unwrap();
    assert!(created.realm_id.starts_with("realm_"));

    let fetched = api.get_realm(&created.realm_id).await.unwrap();
    assert_eq!(fetched.name, "Engineering");

    let all = api.list_realms().await.unwrap();
    assert_eq!(all.len(), 1);

    let missing = api.get_realm("realm_ghost").await;
    assert!(matches!(missing, Err(ApiError::NotFound(_))));

    let invalid = api
        .create_realm(RealmCreate {
            name: "   ".to_string(),
            description: None,
        })
        .await;
    assert!(matches!(invalid, Err(ApiError::InvalidInput(_))));
}
