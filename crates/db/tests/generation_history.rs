//! Integration tests for generation record inserts and history listing.

use sqlx::PgPool;
use uuid::Uuid;
use viralthumb_db::models::generation::CreateGeneration;
use viralthumb_db::models::profile::ProvisionProfile;
use viralthumb_db::repositories::{GenerationRepo, ProfileRepo};

async fn seed_account(pool: &PgPool, username: &str) -> Uuid {
    let id = Uuid::new_v4();
    ProfileRepo::provision(
        pool,
        &ProvisionProfile {
            id,
            email: format!("{username}@example.com"),
            username: username.to_string(),
            full_name: "Creator".to_string(),
            avatar_url: String::new(),
        },
    )
    .await
    .unwrap();
    id
}

fn record(account_id: Uuid, prompt: &str, url: &str) -> CreateGeneration {
    CreateGeneration {
        account_id,
        prompt: prompt.to_string(),
        output_url: url.to_string(),
        credits_used: 1,
        title: Some(format!("SHOCKING: {prompt} (1 Mind-Blowing Tips)")),
        description: None,
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_returns_row_with_defaults(pool: PgPool) {
    let account_id = seed_account(&pool, "historian").await;

    let row = GenerationRepo::create(&pool, &record(account_id, "Epic Explosion", "https://cdn/x.png"))
        .await
        .unwrap();

    assert_eq!(row.account_id, account_id);
    assert_eq!(row.credits_used, 1);
    assert_eq!(row.output_url, "https://cdn/x.png");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn history_is_newest_first_and_scoped_to_account(pool: PgPool) {
    let account_id = seed_account(&pool, "prolific").await;
    let other_id = seed_account(&pool, "neighbor").await;

    for i in 0..5 {
        GenerationRepo::create(&pool, &record(account_id, &format!("prompt {i}"), "a.png"))
            .await
            .unwrap();
    }
    GenerationRepo::create(&pool, &record(other_id, "someone else", "b.png"))
        .await
        .unwrap();

    let rows = GenerationRepo::list_for_account(&pool, account_id, None, None)
        .await
        .unwrap();

    assert_eq!(rows.len(), 5);
    assert!(rows.iter().all(|r| r.account_id == account_id));
    // Same-timestamp rows fall back to id ordering, so the last insert leads.
    assert_eq!(rows[0].prompt, "prompt 4");
    assert_eq!(rows[4].prompt, "prompt 0");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn history_pagination_clamps_inputs(pool: PgPool) {
    let account_id = seed_account(&pool, "paginator").await;
    for i in 0..3 {
        GenerationRepo::create(&pool, &record(account_id, &format!("p{i}"), "a.png"))
            .await
            .unwrap();
    }

    let limited = GenerationRepo::list_for_account(&pool, account_id, Some(2), None)
        .await
        .unwrap();
    assert_eq!(limited.len(), 2);

    let offset = GenerationRepo::list_for_account(&pool, account_id, Some(2), Some(2))
        .await
        .unwrap();
    assert_eq!(offset.len(), 1);

    // Nonsense inputs are clamped rather than rejected.
    let clamped = GenerationRepo::list_for_account(&pool, account_id, Some(-5), Some(-10))
        .await
        .unwrap();
    assert_eq!(clamped.len(), 1);
}
