//! The staged generation orchestrator.
//!
//! Stage order and failure policy:
//!
//! | Stage    | Failure scope | On failure                                   |
//! |----------|---------------|----------------------------------------------|
//! | validate | batch         | abort, no side effects                       |
//! | produce  | per item      | record and continue; abort only on 0 items   |
//! | upload   | per item      | keep inline payload (degrade, don't drop)    |
//! | annotate | batch         | templated titles/description                 |
//! | settle   | batch         | abort; produced items still returned         |
//! | persist  | per item      | log and continue                             |
//!
//! Settlement happens only after all production and upload attempts for the
//! batch complete; crediting is never split per-item mid-batch.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;
use uuid::Uuid;
use viralthumb_core::generation::{self, CreditState};
use viralthumb_core::types::AccountId;

use crate::contracts::{
    CreditLedger, GenerationArchive, ImageGenerator, LedgerError, MetadataGenerator,
    MetadataSuggestion, NewGenerationRecord, ObjectStore,
};
use crate::outcome::{
    AccountContext, GeneratedItem, GenerationOutcome, GenerationRequest, ImageRef, ProduceOutcome,
    SubmitError,
};

/// Tuning knobs for the pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Variations requested per batch.
    pub variation_count: u32,
    /// Budget for the metadata call before templated fallback kicks in.
    pub metadata_timeout: Duration,
    /// Sandbox / no-backing-store mode: upload, settlement, and persistence
    /// are skipped, inline payloads are final, and a fixed local decrement
    /// stands in for the ledger call. Used for demos and disconnected
    /// operation.
    pub sandbox: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            variation_count: generation::VARIATION_COUNT,
            metadata_timeout: Duration::from_secs(generation::TEXT_MODEL_TIMEOUT_SECS),
            sandbox: false,
        }
    }
}

/// Drives one generation submission through its stages.
///
/// Holds no durable state; all durable state lives behind the collaborator
/// contracts.
pub struct GenerationPipeline {
    generator: Arc<dyn ImageGenerator>,
    metadata: Arc<dyn MetadataGenerator>,
    store: Arc<dyn ObjectStore>,
    ledger: Arc<dyn CreditLedger>,
    archive: Arc<dyn GenerationArchive>,
    config: PipelineConfig,
}

impl GenerationPipeline {
    pub fn new(
        generator: Arc<dyn ImageGenerator>,
        metadata: Arc<dyn MetadataGenerator>,
        store: Arc<dyn ObjectStore>,
        ledger: Arc<dyn CreditLedger>,
        archive: Arc<dyn GenerationArchive>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            generator,
            metadata,
            store,
            ledger,
            archive,
            config,
        }
    }

    /// Submit one generation batch.
    ///
    /// Resubmitting an identical request is a brand-new, independently
    /// charged operation; no deduplication by content is performed.
    pub async fn submit(
        &self,
        account: AccountContext,
        request: GenerationRequest,
    ) -> Result<GenerationOutcome, SubmitError> {
        // -- validate --
        generation::validate_submission(&request.prompt, request.reference_images.len())
            .map_err(|e| SubmitError::InvalidRequest(e.to_string()))?;

        // Advisory pre-check against the cached balance. The authoritative
        // check is the atomic deduction at settlement.
        let full_cost = generation::batch_cost(self.config.variation_count);
        if account.displayed_balance < full_cost {
            return Err(SubmitError::InsufficientCredits {
                required: full_cost,
                balance: account.displayed_balance,
                items: Vec::new(),
            });
        }

        // -- produce --
        let produced = self.produce(&request).await;
        let produced: Vec<(u32, String)> = produced
            .into_iter()
            .filter_map(|outcome| match outcome {
                ProduceOutcome::Produced { index, data_url } => Some((index, data_url)),
                ProduceOutcome::Failed { .. } => None,
            })
            .collect();

        if produced.is_empty() {
            return Err(SubmitError::GenerationFailed(
                "no variations produced".to_string(),
            ));
        }

        // -- upload --
        let (images, degraded_uploads) = if self.config.sandbox {
            let inline = produced
                .into_iter()
                .map(|(index, data_url)| (index, ImageRef::Inline { data_url }))
                .collect();
            (inline, 0)
        } else {
            self.upload(account.account_id, produced).await
        };

        // -- annotate --
        let items = self.annotate(&request, &images).await;
        let amount = generation::batch_cost(items.len() as u32);

        // -- settle --
        let credit = if self.config.sandbox {
            let mut credit = CreditState::optimistic(account.displayed_balance);
            // No ledger in sandbox mode; a fixed local decrement stands in
            // for the authoritative value.
            credit.confirm((account.displayed_balance - amount).max(0));
            credit
        } else {
            match self
                .ledger
                .deduct(account.account_id, account.displayed_balance, amount)
                .await
            {
                Ok(balance) => {
                    let mut credit = CreditState::optimistic(account.displayed_balance);
                    credit.confirm(balance);
                    credit
                }
                Err(LedgerError::Insufficient { balance }) => {
                    tracing::warn!(
                        account_id = %account.account_id,
                        cached_balance = account.displayed_balance,
                        authoritative_balance = balance,
                        uncharged_items = items.len(),
                        "Settlement rejected a stale pre-check; returning produced items uncharged",
                    );
                    return Err(SubmitError::InsufficientCredits {
                        required: amount,
                        balance,
                        items,
                    });
                }
                Err(LedgerError::Unavailable(reason)) => {
                    tracing::error!(
                        account_id = %account.account_id,
                        uncharged_items = items.len(),
                        error = %reason,
                        "Credit settlement unreachable; returning produced items uncharged",
                    );
                    return Err(SubmitError::Settlement {
                        reason,
                        items,
                    });
                }
            }
        };

        // -- persist --
        if !self.config.sandbox {
            self.persist(account.account_id, &request, &items).await;
        }

        // Exclude anything not recognizable as image data from rendering
        // without failing the batch.
        let mut items = items;
        let before = items.len();
        items.retain(|item| generation::is_displayable_url(item.image.url()));
        if items.len() < before {
            tracing::warn!(
                excluded = before - items.len(),
                "Excluded non-displayable items from the result set",
            );
        }

        Ok(GenerationOutcome {
            items,
            credit,
            degraded_uploads,
        })
    }

    // -----------------------------------------------------------------------
    // Stages
    // -----------------------------------------------------------------------

    /// Run the variation loop. Per-item failures are recorded and the loop
    /// continues to the next index; items preserve their original ordinal.
    async fn produce(&self, request: &GenerationRequest) -> Vec<ProduceOutcome> {
        let mut outcomes = Vec::with_capacity(self.config.variation_count as usize);
        for index in 0..self.config.variation_count {
            match self
                .generator
                .generate_variation(
                    &request.prompt,
                    &request.style,
                    &request.reference_images,
                    index,
                )
                .await
            {
                Ok(data_url) => {
                    tracing::debug!(index, "Variation produced");
                    outcomes.push(ProduceOutcome::Produced { index, data_url });
                }
                Err(e) => {
                    tracing::warn!(index, error = %e, "Variation failed; continuing batch");
                    outcomes.push(ProduceOutcome::Failed {
                        index,
                        reason: e.to_string(),
                    });
                }
            }
        }
        outcomes
    }

    /// Move temporary payloads into durable storage, in original order.
    /// An upload failure keeps the inline payload as the item's permanent
    /// representation.
    async fn upload(
        &self,
        account_id: AccountId,
        produced: Vec<(u32, String)>,
    ) -> (Vec<(u32, ImageRef)>, u32) {
        let mut images = Vec::with_capacity(produced.len());
        let mut degraded = 0;

        for (index, data_url) in produced {
            let item_id = Uuid::new_v4();
            match self.store.store(account_id, item_id, &data_url).await {
                Ok(url) => images.push((index, ImageRef::Durable { url })),
                Err(e) => {
                    tracing::warn!(
                        index,
                        error = %e,
                        "Durable upload failed; keeping inline payload",
                    );
                    degraded += 1;
                    images.push((index, ImageRef::Inline { data_url }));
                }
            }
        }

        (images, degraded)
    }

    /// Attach titles and descriptions. The metadata call is best-effort and
    /// time-boxed; any failure degrades to the templated forms.
    async fn annotate(
        &self,
        request: &GenerationRequest,
        images: &[(u32, ImageRef)],
    ) -> Vec<GeneratedItem> {
        let urls: Vec<String> = images
            .iter()
            .map(|(_, image)| image.url().to_string())
            .collect();

        let suggestion: Option<MetadataSuggestion> = match timeout(
            self.config.metadata_timeout,
            self.metadata
                .suggest_metadata(&request.prompt, &request.style, &urls),
        )
        .await
        {
            Ok(Ok(suggestion)) => Some(suggestion),
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Metadata suggestion failed; using templated fallback");
                None
            }
            Err(_) => {
                tracing::warn!(
                    timeout_secs = self.config.metadata_timeout.as_secs(),
                    "Metadata suggestion timed out; using templated fallback",
                );
                None
            }
        };

        images
            .iter()
            .enumerate()
            .map(|(position, (index, image))| {
                let suggested = suggestion
                    .as_ref()
                    .and_then(|s| s.titles.get(position))
                    .map(String::as_str);
                let title = generation::resolve_title(suggested, &request.prompt, position);
                let description = suggestion
                    .as_ref()
                    .map(|s| s.description.trim())
                    .filter(|d| !d.is_empty())
                    .map(str::to_string)
                    .unwrap_or_else(|| generation::fallback_description(&title));
                GeneratedItem {
                    index: *index,
                    image: image.clone(),
                    title,
                    description,
                }
            })
            .collect()
    }

    /// Write one generation record per item. Each write is independent; a
    /// failure is logged and never blocks the user from the images they
    /// already paid for.
    async fn persist(
        &self,
        account_id: AccountId,
        request: &GenerationRequest,
        items: &[GeneratedItem],
    ) {
        for item in items {
            let record = NewGenerationRecord {
                account_id,
                prompt: request.prompt.clone(),
                output_url: item.image.url().to_string(),
                credits_used: generation::CREDITS_PER_VARIATION,
                title: item.title.clone(),
                description: item.description.clone(),
            };
            if let Err(e) = self.archive.record(record).await {
                tracing::error!(
                    index = item.index,
                    error = %e,
                    "Failed to persist generation record; result still returned",
                );
            }
        }
    }
}
