//! Integration tests for profile provisioning and the atomic credit
//! deduction -- the correctness-critical statement of the system.

use sqlx::PgPool;
use uuid::Uuid;
use viralthumb_db::models::profile::ProvisionProfile;
use viralthumb_db::repositories::{CreditDeductionError, ProfileRepo};

fn provision_input(id: Uuid, username: &str) -> ProvisionProfile {
    ProvisionProfile {
        id,
        email: format!("{username}@example.com"),
        username: username.to_string(),
        full_name: "Creator".to_string(),
        avatar_url: String::new(),
    }
}

// ---------------------------------------------------------------------------
// Provisioning
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn provision_grants_initial_credits(pool: PgPool) {
    let id = Uuid::new_v4();
    let profile = ProfileRepo::provision(&pool, &provision_input(id, "fresh_creator"))
        .await
        .unwrap();

    assert_eq!(profile.id, id);
    assert_eq!(profile.credits, 50);
    assert_eq!(profile.plan, "free");
    assert_eq!(profile.role, "user");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn provision_is_idempotent_and_keeps_credits(pool: PgPool) {
    let id = Uuid::new_v4();
    ProfileRepo::provision(&pool, &provision_input(id, "repeat_creator"))
        .await
        .unwrap();

    // Spend some credits, then provision again (e.g. a fresh sign-in).
    ProfileRepo::deduct_credits(&pool, id, 50, 3).await.unwrap();

    let mut second = provision_input(id, "repeat_creator");
    second.email = "new-address@example.com".to_string();
    let profile = ProfileRepo::provision(&pool, &second).await.unwrap();

    assert_eq!(profile.credits, 47, "re-provisioning must not reset credits");
    assert_eq!(profile.email, "new-address@example.com");
}

// ---------------------------------------------------------------------------
// Atomic deduction
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn deduct_returns_post_deduction_balance(pool: PgPool) {
    let id = Uuid::new_v4();
    ProfileRepo::provision(&pool, &provision_input(id, "spender"))
        .await
        .unwrap();

    let balance = ProfileRepo::deduct_credits(&pool, id, 50, 3).await.unwrap();
    assert_eq!(balance, 47);

    let profile = ProfileRepo::find_by_id(&pool, id).await.unwrap().unwrap();
    assert_eq!(profile.credits, 47);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deduct_rejects_insufficient_balance_without_mutation(pool: PgPool) {
    let id = Uuid::new_v4();
    ProfileRepo::provision(&pool, &provision_input(id, "broke_creator"))
        .await
        .unwrap();
    sqlx::query("UPDATE profiles SET credits = 2 WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await
        .unwrap();

    let err = ProfileRepo::deduct_credits(&pool, id, 2, 3).await.unwrap_err();
    match err {
        CreditDeductionError::Insufficient { balance, requested } => {
            assert_eq!(balance, 2);
            assert_eq!(requested, 3);
        }
        other => panic!("expected Insufficient, got {other:?}"),
    }

    let profile = ProfileRepo::find_by_id(&pool, id).await.unwrap().unwrap();
    assert_eq!(profile.credits, 2, "failed deduction must leave the row unchanged");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deduct_never_drives_balance_negative(pool: PgPool) {
    let id = Uuid::new_v4();
    ProfileRepo::provision(&pool, &provision_input(id, "double_spender"))
        .await
        .unwrap();
    sqlx::query("UPDATE profiles SET credits = 4 WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await
        .unwrap();

    // Two submissions both passed the advisory pre-check against a cached
    // balance of 4. Only one may settle.
    let first = ProfileRepo::deduct_credits(&pool, id, 4, 3).await;
    let second = ProfileRepo::deduct_credits(&pool, id, 4, 3).await;

    assert_eq!(first.unwrap(), 1);
    assert!(matches!(
        second.unwrap_err(),
        CreditDeductionError::Insufficient { balance: 1, requested: 3 }
    ));

    let profile = ProfileRepo::find_by_id(&pool, id).await.unwrap().unwrap();
    assert_eq!(profile.credits, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deduct_applies_stale_expected_balance_correctly(pool: PgPool) {
    let id = Uuid::new_v4();
    ProfileRepo::provision(&pool, &provision_input(id, "stale_creator"))
        .await
        .unwrap();

    // Caller believes the balance is 50, but it is actually 10. The
    // authoritative figure wins; the expected value is only a hint.
    sqlx::query("UPDATE profiles SET credits = 10 WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await
        .unwrap();

    let balance = ProfileRepo::deduct_credits(&pool, id, 50, 3).await.unwrap();
    assert_eq!(balance, 7);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deduct_refuses_missing_and_deleted_profiles(pool: PgPool) {
    let missing = Uuid::new_v4();
    assert!(matches!(
        ProfileRepo::deduct_credits(&pool, missing, 50, 3).await.unwrap_err(),
        CreditDeductionError::NotFound(_)
    ));

    let id = Uuid::new_v4();
    ProfileRepo::provision(&pool, &provision_input(id, "departed_creator"))
        .await
        .unwrap();
    sqlx::query("UPDATE profiles SET deleted_at = NOW() WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await
        .unwrap();

    assert!(matches!(
        ProfileRepo::deduct_credits(&pool, id, 50, 3).await.unwrap_err(),
        CreditDeductionError::NotFound(_)
    ));
}
