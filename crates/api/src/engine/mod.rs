//! Production adapters wiring the generation pipeline to its live
//! collaborators: the generative API, the object store, and Postgres.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;
use viralthumb_core::types::AccountId;
use viralthumb_db::models::generation::CreateGeneration;
use viralthumb_db::repositories::{CreditDeductionError, GenerationRepo, ProfileRepo};
use viralthumb_db::DbPool;
use viralthumb_genai::GenAiApi;
use viralthumb_pipeline::{
    ArchiveError, CreditLedger, GenerateError, GenerationArchive, GenerationPipeline,
    ImageGenerator, LedgerError, MetadataError, MetadataGenerator, MetadataSuggestion,
    NewGenerationRecord, ObjectStore, PipelineConfig, StoreError,
};
use viralthumb_storage::StorageApi;

use crate::config::ServerConfig;

// ---------------------------------------------------------------------------
// Generative API adapters
// ---------------------------------------------------------------------------

/// [`ImageGenerator`] backed by the generative API.
pub struct LiveImageGenerator(pub Arc<GenAiApi>);

#[async_trait]
impl ImageGenerator for LiveImageGenerator {
    async fn generate_variation(
        &self,
        prompt: &str,
        style: &str,
        reference_images: &[String],
        index: u32,
    ) -> Result<String, GenerateError> {
        self.0
            .generate_variation(prompt, style, reference_images, index)
            .await
            .map_err(|e| GenerateError(e.to_string()))
    }
}

/// [`MetadataGenerator`] backed by the generative API's text model.
pub struct LiveMetadataGenerator(pub Arc<GenAiApi>);

#[async_trait]
impl MetadataGenerator for LiveMetadataGenerator {
    async fn suggest_metadata(
        &self,
        prompt: &str,
        style: &str,
        image_urls: &[String],
    ) -> Result<MetadataSuggestion, MetadataError> {
        let suggestion = self
            .0
            .suggest_metadata(prompt, style, image_urls)
            .await
            .map_err(|e| MetadataError(e.to_string()))?;
        Ok(MetadataSuggestion {
            titles: suggestion.titles,
            description: suggestion.description,
        })
    }
}

// ---------------------------------------------------------------------------
// Object store adapter
// ---------------------------------------------------------------------------

/// [`ObjectStore`] backed by the bucket HTTP API.
pub struct BucketObjectStore(pub Arc<StorageApi>);

#[async_trait]
impl ObjectStore for BucketObjectStore {
    async fn store(
        &self,
        account_id: AccountId,
        item_id: Uuid,
        data_url: &str,
    ) -> Result<String, StoreError> {
        self.0
            .store_object(account_id, item_id, data_url)
            .await
            .map(|stored| stored.public_url)
            .map_err(|e| StoreError(e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Postgres adapters
// ---------------------------------------------------------------------------

/// [`CreditLedger`] backed by the atomic deduction in [`ProfileRepo`].
pub struct PgCreditLedger {
    pub pool: DbPool,
}

#[async_trait]
impl CreditLedger for PgCreditLedger {
    async fn deduct(
        &self,
        account_id: AccountId,
        expected_balance: i32,
        amount: i32,
    ) -> Result<i32, LedgerError> {
        ProfileRepo::deduct_credits(&self.pool, account_id, expected_balance, amount)
            .await
            .map_err(|e| match e {
                CreditDeductionError::Insufficient { balance, .. } => {
                    LedgerError::Insufficient { balance }
                }
                CreditDeductionError::NotFound(id) => {
                    LedgerError::Unavailable(format!("no live profile for account {id}"))
                }
                CreditDeductionError::Database(err) => LedgerError::Unavailable(err.to_string()),
            })
    }
}

/// [`GenerationArchive`] backed by [`GenerationRepo`].
pub struct PgGenerationArchive {
    pub pool: DbPool,
}

#[async_trait]
impl GenerationArchive for PgGenerationArchive {
    async fn record(&self, record: NewGenerationRecord) -> Result<(), ArchiveError> {
        GenerationRepo::create(
            &self.pool,
            &CreateGeneration {
                account_id: record.account_id,
                prompt: record.prompt,
                output_url: record.output_url,
                credits_used: record.credits_used,
                title: Some(record.title),
                description: Some(record.description),
            },
        )
        .await
        .map(|_| ())
        .map_err(|e| ArchiveError(e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Wiring
// ---------------------------------------------------------------------------

/// Build the production pipeline from config, pool, and the shared
/// generative API client.
pub fn build_pipeline(
    config: &ServerConfig,
    pool: DbPool,
    genai: Arc<GenAiApi>,
) -> Arc<GenerationPipeline> {
    let storage = Arc::new(StorageApi::new(
        config.storage.url.clone(),
        config.storage.bucket.clone(),
        config.storage.service_key.clone(),
    ));

    Arc::new(GenerationPipeline::new(
        Arc::new(LiveImageGenerator(genai.clone())),
        Arc::new(LiveMetadataGenerator(genai)),
        Arc::new(BucketObjectStore(storage)),
        Arc::new(PgCreditLedger { pool: pool.clone() }),
        Arc::new(PgGenerationArchive { pool }),
        PipelineConfig {
            sandbox: config.sandbox_mode,
            ..PipelineConfig::default()
        },
    ))
}
