//! Database-level tests for user storage: defaults, lookups, and the email
//! uniqueness constraint that resolves concurrent duplicate sign-ups.

use gatehouse_db::models::user::CreateUser;
use gatehouse_db::repositories::UserRepo;
use sqlx::PgPool;

fn input(email: &str) -> CreateUser {
    CreateUser {
        email: email.to_string(),
        password_hash: "$argon2id$fake$hash".to_string(),
        name: Some("Test User".to_string()),
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_defaults_role_to_user(pool: PgPool) {
    let user = UserRepo::create(&pool, &input("new@test.com"))
        .await
        .expect("creation should succeed");

    assert_eq!(user.email, "new@test.com");
    assert_eq!(user.role, "USER");
    assert_eq!(user.name.as_deref(), Some("Test User"));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_find_by_email_and_id(pool: PgPool) {
    let created = UserRepo::create(&pool, &input("lookup@test.com"))
        .await
        .unwrap();

    let by_email = UserRepo::find_by_email(&pool, "lookup@test.com")
        .await
        .unwrap()
        .expect("user should be found");
    assert_eq!(by_email.id, created.id);

    let by_id = UserRepo::find_by_id(&pool, created.id)
        .await
        .unwrap()
        .expect("user should be found");
    assert_eq!(by_id.email, "lookup@test.com");

    assert!(UserRepo::find_by_email(&pool, "ghost@test.com")
        .await
        .unwrap()
        .is_none());
}

/// A duplicate email loses at the storage layer with a unique violation.
#[sqlx::test(migrations = "./migrations")]
async fn test_duplicate_email_is_rejected(pool: PgPool) {
    UserRepo::create(&pool, &input("dup@test.com")).await.unwrap();

    let err = UserRepo::create(&pool, &input("dup@test.com"))
        .await
        .expect_err("duplicate email must fail");

    match err {
        sqlx::Error::Database(db_err) => {
            assert_eq!(db_err.code().as_deref(), Some("23505"));
        }
        other => panic!("expected unique violation, got {other:?}"),
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_role(pool: PgPool) {
    let user = UserRepo::create(&pool, &input("promote@test.com"))
        .await
        .unwrap();

    let updated = UserRepo::update_role(&pool, user.id, "MODERATOR")
        .await
        .unwrap()
        .expect("user should exist");
    assert_eq!(updated.role, "MODERATOR");
    assert!(updated.updated_at >= user.updated_at);

    let missing = UserRepo::update_role(&pool, uuid::Uuid::new_v4(), "ADMIN")
        .await
        .unwrap();
    assert!(missing.is_none());
}
