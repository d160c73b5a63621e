//! Integration tests for sessions, premium flags, and purchase idempotency.

use chrono::{Duration, Utc};
use sqlx::PgPool;
use waymark_core::payments::{PURCHASE_PATH_BUNDLE, PURCHASE_PREMIUM_MEMBERSHIP};
use waymark_db::is_unique_violation;
use waymark_db::models::path::CreatePath;
use waymark_db::models::quiz_purchase::CreateQuizPurchase;
use waymark_db::models::session::CreateSession;
use waymark_db::models::user::CreateUser;
use waymark_db::repositories::{PathRepo, QuizPurchaseRepo, SessionRepo, UserRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn make_user(pool: &PgPool, email: &str) -> i64 {
    UserRepo::create(
        pool,
        &CreateUser {
            email: email.to_string(),
            password_hash: "$argon2id$test-hash".to_string(),
            name: None,
            verification_token: format!("token-{email}"),
            verification_token_expires_at: Utc::now() + Duration::hours(24),
        },
    )
    .await
    .unwrap()
    .id
}

async fn make_path(pool: &PgPool, slug: &str) -> i64 {
    PathRepo::create(
        pool,
        &CreatePath {
            slug: slug.to_string(),
            title: slug.to_string(),
            description: None,
            is_published: true,
        },
    )
    .await
    .unwrap()
    .id
}

fn bundle_purchase(user_id: i64, path_id: i64, payment_id: &str) -> CreateQuizPurchase {
    CreateQuizPurchase {
        user_id,
        path_id: Some(path_id),
        purchase_type: PURCHASE_PATH_BUNDLE.to_string(),
        amount_cents: 500,
        stripe_payment_id: payment_id.to_string(),
        is_active: true,
    }
}

// ---------------------------------------------------------------------------
// Test: Session lifecycle
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_session_lifecycle(pool: PgPool) {
    let user = make_user(&pool, "sess@example.com").await;
    let session = SessionRepo::create(
        &pool,
        &CreateSession {
            user_id: user,
            token_hash: "hash-1".to_string(),
            expires_at: Utc::now() + Duration::days(30),
        },
    )
    .await
    .unwrap();
    assert!(!session.is_revoked);

    let found = SessionRepo::find_active_by_token_hash(&pool, "hash-1")
        .await
        .unwrap();
    assert_eq!(found.unwrap().user_id, user);

    assert!(SessionRepo::revoke_by_token_hash(&pool, "hash-1").await.unwrap());
    assert!(SessionRepo::find_active_by_token_hash(&pool, "hash-1")
        .await
        .unwrap()
        .is_none());
    // Second revoke is a no-op.
    assert!(!SessionRepo::revoke_by_token_hash(&pool, "hash-1").await.unwrap());

    let deleted = SessionRepo::cleanup_expired(&pool).await.unwrap();
    assert_eq!(deleted, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_expired_session_is_not_active(pool: PgPool) {
    let user = make_user(&pool, "expired@example.com").await;
    SessionRepo::create(
        &pool,
        &CreateSession {
            user_id: user,
            token_hash: "hash-old".to_string(),
            expires_at: Utc::now() - Duration::hours(1),
        },
    )
    .await
    .unwrap();

    assert!(SessionRepo::find_active_by_token_hash(&pool, "hash-old")
        .await
        .unwrap()
        .is_none());
    assert_eq!(SessionRepo::cleanup_expired(&pool).await.unwrap(), 1);
}

// ---------------------------------------------------------------------------
// Test: Purchase idempotency key
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_duplicate_payment_id_rejected_as_unique_violation(pool: PgPool) {
    let user = make_user(&pool, "buyer@example.com").await;
    let path = make_path(&pool, "p").await;

    QuizPurchaseRepo::create(&pool, &bundle_purchase(user, path, "pi_once"))
        .await
        .unwrap();
    assert!(QuizPurchaseRepo::find_by_payment_id(&pool, "pi_once")
        .await
        .unwrap()
        .is_some());

    let err = QuizPurchaseRepo::create(&pool, &bundle_purchase(user, path, "pi_once"))
        .await
        .unwrap_err();
    assert!(is_unique_violation(&err, "uq_quiz_purchases_payment"));
    assert!(!is_unique_violation(&err, "uq_users_email"));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_active_purchases_filtered(pool: PgPool) {
    let user = make_user(&pool, "filter@example.com").await;
    let path_a = make_path(&pool, "a").await;
    let path_b = make_path(&pool, "b").await;

    QuizPurchaseRepo::create(&pool, &bundle_purchase(user, path_a, "pi_active"))
        .await
        .unwrap();
    let mut inactive = bundle_purchase(user, path_b, "pi_inactive");
    inactive.is_active = false;
    QuizPurchaseRepo::create(&pool, &inactive).await.unwrap();

    let active = QuizPurchaseRepo::list_active_for_user(&pool, user)
        .await
        .unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].path_id, Some(path_a));
    assert_eq!(active[0].purchase_type, PURCHASE_PATH_BUNDLE);
}

// ---------------------------------------------------------------------------
// Test: Premium flag
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_set_premium_stamps_purchase_time(pool: PgPool) {
    let user = make_user(&pool, "premium@example.com").await;
    let before = UserRepo::find_by_id(&pool, user).await.unwrap().unwrap();
    assert!(!before.is_premium);
    assert!(before.premium_purchased_at.is_none());

    assert!(UserRepo::set_premium(&pool, user).await.unwrap());

    let after = UserRepo::find_by_id(&pool, user).await.unwrap().unwrap();
    assert!(after.is_premium);
    assert!(after.premium_purchased_at.is_some());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_premium_purchase_without_path(pool: PgPool) {
    let user = make_user(&pool, "allaccess@example.com").await;
    let purchase = QuizPurchaseRepo::create(
        &pool,
        &CreateQuizPurchase {
            user_id: user,
            path_id: None,
            purchase_type: PURCHASE_PREMIUM_MEMBERSHIP.to_string(),
            amount_cents: 2500,
            stripe_payment_id: "pi_premium".to_string(),
            is_active: true,
        },
    )
    .await
    .unwrap();
    assert_eq!(purchase.path_id, None);
    assert_eq!(purchase.purchase_type, PURCHASE_PREMIUM_MEMBERSHIP);
}
