//! Database-backed tests for the token service: session pairing and
//! rotation.

mod common;

use gatehouse_api::auth::token;
use gatehouse_db::repositories::SessionRepo;
use sqlx::PgPool;
use uuid::Uuid;

/// A freshly issued pair passes the authoritative check; an invalidated
/// session fails it even though the signature is still valid.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_verify_requires_live_session(pool: PgPool) {
    let jwt = common::test_config().jwt;
    let (user, _) = common::create_test_user(&pool, "pair@test.com", "USER").await;

    let issued = token::issue(&pool, &jwt, user.id)
        .await
        .expect("issue should succeed");

    let ok = token::verify_with_session(&pool, &jwt, &issued.token, issued.session_id)
        .await
        .expect("check should succeed");
    assert!(ok);

    SessionRepo::invalidate(&pool, issued.session_id)
        .await
        .expect("invalidate should succeed");

    let ok = token::verify_with_session(&pool, &jwt, &issued.token, issued.session_id)
        .await
        .expect("check should succeed");
    assert!(!ok, "revoked session must fail the pairing check");
}

/// A valid token presented against someone else's session fails: the stored
/// token must equal the presented one.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_verify_rejects_mismatched_pairing(pool: PgPool) {
    let jwt = common::test_config().jwt;
    let (alice, _) = common::create_test_user(&pool, "alice@test.com", "USER").await;
    let (bob, _) = common::create_test_user(&pool, "bob@test.com", "USER").await;

    let alice_issued = token::issue(&pool, &jwt, alice.id).await.expect("issue");
    let bob_issued = token::issue(&pool, &jwt, bob.id).await.expect("issue");

    let ok = token::verify_with_session(&pool, &jwt, &alice_issued.token, bob_issued.session_id)
        .await
        .expect("check should succeed");
    assert!(!ok);

    // A nonexistent session fails closed too.
    let ok = token::verify_with_session(&pool, &jwt, &alice_issued.token, Uuid::new_v4())
        .await
        .expect("check should succeed");
    assert!(!ok);
}

/// Refresh rotates: the old pair dies, the new pair works.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_refresh_rotates_the_pair(pool: PgPool) {
    let jwt = common::test_config().jwt;
    let (user, _) = common::create_test_user(&pool, "rotate@test.com", "USER").await;

    let old = token::issue(&pool, &jwt, user.id).await.expect("issue");
    let new = token::refresh(&pool, &jwt, user.id, old.session_id)
        .await
        .expect("refresh should succeed");

    assert_ne!(old.session_id, new.session_id);
    assert_ne!(old.token, new.token);

    let old_ok = token::verify_with_session(&pool, &jwt, &old.token, old.session_id)
        .await
        .expect("check should succeed");
    assert!(!old_ok, "old pair must be dead after rotation");

    let new_ok = token::verify_with_session(&pool, &jwt, &new.token, new.session_id)
        .await
        .expect("check should succeed");
    assert!(new_ok);
}
