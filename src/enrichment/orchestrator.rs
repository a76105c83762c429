//! Two-phase enrichment pipeline.
//!
//! Phase 1 (email discovery) fans out in fixed-size batches: every lead in a
//! batch runs concurrently, batches run strictly one after another. Phase 2
//! (icebreaker generation) is sequential and feeds off the scraped-content
//! cache that phase 1 populated. One lead's failure never aborts its batch;
//! only setup/precondition problems surface as errors.

use futures::future::join_all;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::EnrichmentConfig;
use crate::domain::normalize_url;
use crate::extractor::EmailExtractor;
use crate::models::{EnrichedLead, EnrichmentStatus, Result, UsageTotals};
use crate::services::{
    with_retries, LlmService, ScrapeService, ServiceHealth,
};

/// Contact-page guesses tried when the main page has no email-shaped text.
const CONTACT_PAGE_PATHS: &[&str] = &["/contact", "/contact-us", "/about"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressStage {
    DiscoveryStarted,
    DiscoveryFinished,
    IcebreakerStarted,
    IcebreakerFinished,
}

#[derive(Debug, Clone, Copy)]
pub struct ProgressUpdate {
    pub lead_index: usize,
    pub total: usize,
    pub stage: ProgressStage,
    pub usage: UsageTotals,
}

pub type ProgressCallback = Arc<dyn Fn(ProgressUpdate) + Send + Sync>;

pub struct EnrichmentOrchestrator {
    config: EnrichmentConfig,
    scraper: Arc<dyn ScrapeService>,
    llm: Arc<dyn LlmService>,
    health: ServiceHealth,
    extractor: EmailExtractor,
    /// website URL -> main-page markdown, written in phase 1, read in phase 2.
    content_cache: Mutex<HashMap<String, String>>,
    /// Lead ids that went through phase 1; phase 2 refuses anything else.
    discovered: Mutex<HashSet<Uuid>>,
    usage: Mutex<UsageTotals>,
}

impl EnrichmentOrchestrator {
    pub fn new(
        config: EnrichmentConfig,
        scraper: Arc<dyn ScrapeService>,
        llm: Arc<dyn LlmService>,
        health: ServiceHealth,
    ) -> Self {
        Self {
            config,
            scraper,
            llm,
            health,
            extractor: EmailExtractor::new(),
            content_cache: Mutex::new(HashMap::new()),
            discovered: Mutex::new(HashSet::new()),
            usage: Mutex::new(UsageTotals::default()),
        }
    }

    pub async fn usage(&self) -> UsageTotals {
        *self.usage.lock().await
    }

    fn ensure_ready(&self) -> Result<()> {
        if !self.health.ready() {
            return Err(
                "enrichment services are not configured; set ANTHROPIC_API_KEY and \
                 FIRECRAWL_API_KEY"
                    .into(),
            );
        }
        Ok(())
    }

    async fn emit(
        &self,
        progress: &Option<ProgressCallback>,
        lead_index: usize,
        total: usize,
        stage: ProgressStage,
    ) {
        if let Some(callback) = progress {
            let usage = *self.usage.lock().await;
            callback(ProgressUpdate {
                lead_index,
                total,
                stage,
                usage,
            });
        }
    }

    /// Phase 1: discover contact emails for every pending lead.
    ///
    /// Pending leads are processed in batches of `max_concurrency`; skipped
    /// and pre-seeded leads are passed through untouched and re-appended
    /// after the batches, without any network calls.
    pub async fn run_discovery(
        &self,
        leads: Vec<EnrichedLead>,
        progress: Option<ProgressCallback>,
    ) -> Result<Vec<EnrichedLead>> {
        self.ensure_ready()?;

        let (workable, untouched): (Vec<_>, Vec<_>) = leads
            .into_iter()
            .partition(|lead| lead.status == EnrichmentStatus::Pending);

        let total = workable.len();
        info!(
            "Starting email discovery: {} leads in batches of {}",
            total, self.config.max_concurrency
        );

        let mut results = Vec::with_capacity(total + untouched.len());
        let mut queue = workable.into_iter();
        let mut processed = 0usize;
        let mut batch_number = 0usize;

        loop {
            let batch: Vec<EnrichedLead> =
                queue.by_ref().take(self.config.max_concurrency).collect();
            if batch.is_empty() {
                break;
            }
            batch_number += 1;
            debug!("Dispatching batch {} ({} leads)", batch_number, batch.len());

            let tasks = batch.into_iter().enumerate().map(|(offset, lead)| {
                self.discover_lead(lead, processed + offset, total, progress.clone())
            });
            let batch_results = join_all(tasks).await;
            processed += batch_results.len();
            results.extend(batch_results);
        }

        {
            let mut discovered = self.discovered.lock().await;
            for lead in &results {
                discovered.insert(lead.lead.id);
            }
            // Pre-seeded completed leads are selectable for phase 2 as well;
            // skipped leads are not.
            for lead in &untouched {
                if lead.status == EnrichmentStatus::Completed {
                    discovered.insert(lead.lead.id);
                }
            }
        }

        results.extend(untouched);

        let usage = self.usage().await;
        info!(
            "Email discovery finished: {} leads, {} pages scraped, {}in/{}out tokens",
            results.len(),
            usage.pages_scraped,
            usage.input_tokens,
            usage.output_tokens
        );
        Ok(results)
    }

    /// Runs one lead through scrape + extraction. Never fails the batch:
    /// every error lands in the lead's own status and message.
    async fn discover_lead(
        &self,
        mut lead: EnrichedLead,
        index: usize,
        total: usize,
        progress: Option<ProgressCallback>,
    ) -> EnrichedLead {
        lead.status = EnrichmentStatus::Processing;
        self.emit(&progress, index, total, ProgressStage::DiscoveryStarted)
            .await;

        let outcome = self.scrape_and_extract(&mut lead).await;
        if let Err(message) = outcome {
            warn!("Lead {} failed: {}", lead.display_label(), message);
            lead.status = EnrichmentStatus::Failed;
            lead.error_message = Some(message);
        }

        self.emit(&progress, index, total, ProgressStage::DiscoveryFinished)
            .await;
        lead
    }

    async fn scrape_and_extract(
        &self,
        lead: &mut EnrichedLead,
    ) -> std::result::Result<(), String> {
        let url = normalize_url(&lead.lead.website).map_err(|e| e.to_string())?;

        let retries = self.config.retry_attempts;
        let main = with_retries(retries, "scrape", || {
            self.scraper.scrape(url.as_str())
        })
        .await;
        if !main.success {
            return Err(main
                .error
                .unwrap_or_else(|| "scrape failed".to_string()));
        }
        self.usage.lock().await.add_page();

        let main_markdown = main.markdown.unwrap_or_default();
        self.content_cache
            .lock()
            .await
            .insert(lead.lead.website.clone(), main_markdown.clone());

        // Main page came back clean but without anything email-shaped: try
        // the usual contact-page locations before giving up.
        let mut content = main_markdown;
        if !self.extractor.has_email_shaped_content(&content) {
            for path in CONTACT_PAGE_PATHS {
                let Ok(guess) = url.join(path) else {
                    continue;
                };
                let page = with_retries(retries, "scrape contact page", || {
                    self.scraper.scrape(guess.as_str())
                })
                .await;
                if !page.success {
                    continue;
                }
                self.usage.lock().await.add_page();
                if let Some(markdown) = page.markdown {
                    if self.extractor.has_email_shaped_content(&markdown) {
                        debug!("Found email-shaped content on {}", guess);
                        content = markdown;
                        break;
                    }
                }
            }
        }

        let extraction = with_retries(retries, "extract emails", || {
            self.llm
                .extract_emails(&content, &lead.domain_validation.domain)
        })
        .await;
        self.usage
            .lock()
            .await
            .add_tokens(extraction.input_tokens, extraction.output_tokens);

        if !extraction.success {
            return Err(extraction
                .error
                .unwrap_or_else(|| "email extraction failed".to_string()));
        }

        lead.email = extraction.primary_email;
        lead.email_confidence = Some(extraction.confidence);
        lead.status = EnrichmentStatus::Completed;
        Ok(())
    }

    /// Phase 2: generate icebreakers for a caller-selected subset of
    /// already-discovered leads, strictly sequentially.
    ///
    /// Rejects any lead that never went through phase 1 — the content cache
    /// this phase leans on only exists for discovered leads.
    pub async fn run_icebreakers(
        &self,
        leads: Vec<EnrichedLead>,
        progress: Option<ProgressCallback>,
    ) -> Result<Vec<EnrichedLead>> {
        self.ensure_ready()?;

        {
            let discovered = self.discovered.lock().await;
            for lead in &leads {
                if !discovered.contains(&lead.lead.id) {
                    return Err(format!(
                        "lead '{}' has not been through email discovery",
                        lead.display_label()
                    )
                    .into());
                }
            }
        }

        let total = leads.len();
        let tone = self.config.icebreaker_tone;
        info!("Generating icebreakers for {} leads", total);

        let mut results = Vec::with_capacity(total);
        for (index, mut lead) in leads.into_iter().enumerate() {
            self.emit(&progress, index, total, ProgressStage::IcebreakerStarted)
                .await;

            match self.lead_content(&lead).await {
                Some(content) => {
                    let response = with_retries(
                        self.config.retry_attempts,
                        "generate icebreaker",
                        || {
                            self.llm.generate_icebreaker(
                                &content,
                                lead.lead.company.as_deref(),
                                &lead.domain_validation.domain,
                                tone,
                            )
                        },
                    )
                    .await;
                    self.usage
                        .lock()
                        .await
                        .add_tokens(response.input_tokens, response.output_tokens);

                    if response.success {
                        lead.icebreaker = Some(response.icebreaker);
                    } else {
                        let message = response
                            .error
                            .unwrap_or_else(|| "icebreaker generation failed".to_string());
                        warn!(
                            "Icebreaker failed for {}: {}",
                            lead.display_label(),
                            message
                        );
                        lead.error_message = Some(message);
                    }
                }
                None => {
                    // Synthetic failure: no cached content and the re-scrape
                    // came up empty. The lead keeps its discovery status.
                    warn!(
                        "No content available for icebreaker: {}",
                        lead.display_label()
                    );
                    lead.error_message =
                        Some("no scraped content available for icebreaker".to_string());
                }
            }

            self.emit(&progress, index, total, ProgressStage::IcebreakerFinished)
                .await;
            results.push(lead);
        }

        Ok(results)
    }

    /// Cached phase-1 markdown, or an opportunistic re-scrape on a miss.
    async fn lead_content(&self, lead: &EnrichedLead) -> Option<String> {
        if let Some(content) = self
            .content_cache
            .lock()
            .await
            .get(&lead.lead.website)
            .cloned()
        {
            return Some(content);
        }

        let url = normalize_url(&lead.lead.website).ok()?;
        let response = with_retries(self.config.retry_attempts, "re-scrape", || {
            self.scraper.scrape(url.as_str())
        })
        .await;
        if !response.success {
            return None;
        }
        self.usage.lock().await.add_page();

        let markdown = response.markdown?;
        self.content_cache
            .lock()
            .await
            .insert(lead.lead.website.clone(), markdown.clone());
        Some(markdown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Tone;
    use crate::ingest::{initialize_leads, parse_csv};
    use crate::services::{ExtractEmailsResponse, IcebreakerResponse, ScrapeResponse};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex as StdMutex;
    use std::time::Duration;

    fn test_config(max_concurrency: usize, retry_attempts: u32) -> EnrichmentConfig {
        EnrichmentConfig {
            max_concurrency,
            retry_attempts,
            include_icebreaker: true,
            icebreaker_tone: Tone::Professional,
        }
    }

    fn ready() -> ServiceHealth {
        ServiceHealth {
            has_anthropic_key: true,
            has_firecrawl_key: true,
        }
    }

    fn leads_from(websites: &[&str]) -> Vec<EnrichedLead> {
        let csv = format!("website\n{}\n", websites.join("\n"));
        initialize_leads(parse_csv(&csv).unwrap())
    }

    #[derive(Default)]
    struct MockScraper {
        current: AtomicUsize,
        max_concurrent: AtomicUsize,
        fail_first: AtomicUsize,
        events: StdMutex<Vec<String>>,
        fail_url_parts: Vec<String>,
        /// (url substring, markdown) overrides checked before the default.
        pages: Vec<(String, String)>,
        default_markdown: String,
    }

    impl MockScraper {
        fn with_markdown(markdown: &str) -> Self {
            Self {
                default_markdown: markdown.to_string(),
                ..Self::default()
            }
        }

        fn scrape_calls(&self) -> Vec<String> {
            self.events
                .lock()
                .unwrap()
                .iter()
                .filter(|e| e.starts_with("start:"))
                .map(|e| e["start:".len()..].to_string())
                .collect()
        }
    }

    #[async_trait]
    impl ScrapeService for MockScraper {
        async fn scrape(&self, url: &str) -> ScrapeResponse {
            let running = self.current.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_concurrent.fetch_max(running, Ordering::SeqCst);
            self.events.lock().unwrap().push(format!("start:{}", url));

            tokio::time::sleep(Duration::from_millis(10)).await;

            self.events.lock().unwrap().push(format!("end:{}", url));
            self.current.fetch_sub(1, Ordering::SeqCst);

            if self
                .fail_first
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok()
            {
                return ScrapeResponse::failure(url, "mock transient failure");
            }
            if self.fail_url_parts.iter().any(|part| url.contains(part)) {
                return ScrapeResponse::failure(url, "mock scrape failure");
            }

            let markdown = self
                .pages
                .iter()
                .find(|(part, _)| url.contains(part))
                .map(|(_, md)| md.clone())
                .unwrap_or_else(|| self.default_markdown.clone());

            ScrapeResponse {
                success: true,
                url: url.to_string(),
                markdown: Some(markdown),
                title: None,
                description: None,
                error: None,
            }
        }
    }

    /// Extracts with the real heuristics so content routing is observable.
    #[derive(Default)]
    struct MockLlm {
        extract_contents: StdMutex<Vec<String>>,
    }

    #[async_trait]
    impl LlmService for MockLlm {
        async fn extract_emails(&self, content: &str, domain: &str) -> ExtractEmailsResponse {
            self.extract_contents
                .lock()
                .unwrap()
                .push(content.to_string());
            let extractor = EmailExtractor::new();
            let emails = extractor.rank_emails(
                &extractor.extract_emails_from_content(content),
                domain,
            );
            ExtractEmailsResponse {
                success: true,
                primary_email: emails.first().cloned(),
                confidence: crate::models::Confidence::Medium,
                emails,
                input_tokens: 10,
                output_tokens: 5,
                error: None,
            }
        }

        async fn generate_icebreaker(
            &self,
            content: &str,
            _company_name: Option<&str>,
            domain: &str,
            _tone: Tone,
        ) -> IcebreakerResponse {
            if content.is_empty() {
                return IcebreakerResponse::failure("no content");
            }
            IcebreakerResponse {
                success: true,
                icebreaker: format!("Really enjoyed reading about the work at {}.", domain),
                input_tokens: 20,
                output_tokens: 8,
                error: None,
            }
        }
    }

    fn orchestrator_with(
        config: EnrichmentConfig,
        scraper: Arc<MockScraper>,
        llm: Arc<MockLlm>,
    ) -> EnrichmentOrchestrator {
        EnrichmentOrchestrator::new(config, scraper, llm, ready())
    }

    #[tokio::test]
    async fn discovery_completes_all_leads_with_bounded_concurrency() {
        let scraper = Arc::new(MockScraper::with_markdown("Contact sales@acme.com"));
        let llm = Arc::new(MockLlm::default());
        let orchestrator = orchestrator_with(test_config(2, 0), scraper.clone(), llm);

        let leads = leads_from(&["a-one.com", "b-two.com", "c-three.com", "d-four.com", "e.com"]);
        let results = orchestrator.run_discovery(leads, None).await.unwrap();

        assert_eq!(results.len(), 5);
        assert!(results
            .iter()
            .all(|l| l.status == EnrichmentStatus::Completed));
        assert!(results.iter().all(|l| l.email.is_some()));
        assert_eq!(scraper.max_concurrent.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn next_batch_starts_after_previous_resolves() {
        let scraper = Arc::new(MockScraper::with_markdown("Contact sales@acme.com"));
        let llm = Arc::new(MockLlm::default());
        let orchestrator = orchestrator_with(test_config(2, 0), scraper.clone(), llm);

        let leads = leads_from(&["a-one.com", "b-two.com", "c-three.com"]);
        orchestrator.run_discovery(leads, None).await.unwrap();

        let events = scraper.events.lock().unwrap().clone();
        let pos = |needle: &str| events.iter().position(|e| e.contains(needle)).unwrap();
        assert!(pos("start:https://c-three.com") > pos("end:https://a-one.com"));
        assert!(pos("start:https://c-three.com") > pos("end:https://b-two.com"));
    }

    #[tokio::test]
    async fn invalid_domains_are_never_scraped() {
        let scraper = Arc::new(MockScraper::with_markdown("Contact sales@acme.com"));
        let llm = Arc::new(MockLlm::default());
        let orchestrator = orchestrator_with(test_config(3, 0), scraper.clone(), llm);

        let leads = leads_from(&["acme.com", "not a domain"]);
        let results = orchestrator.run_discovery(leads, None).await.unwrap();

        assert_eq!(results.len(), 2);
        let skipped = results
            .iter()
            .find(|l| l.status == EnrichmentStatus::Skipped)
            .unwrap();
        assert_eq!(skipped.lead.website, "not a domain");
        // skipped leads come after the processed batches
        assert_eq!(results.last().unwrap().lead.website, "not a domain");

        let calls = scraper.scrape_calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].contains("acme.com"));
    }

    #[tokio::test]
    async fn preseeded_completed_leads_bypass_discovery() {
        let scraper = Arc::new(MockScraper::with_markdown("Contact sales@acme.com"));
        let llm = Arc::new(MockLlm::default());
        let orchestrator = orchestrator_with(test_config(3, 0), scraper.clone(), llm);

        let csv = "website,email\nacme.com,jane@acme.com\n";
        let leads = initialize_leads(parse_csv(csv).unwrap());
        let results = orchestrator.run_discovery(leads, None).await.unwrap();

        assert_eq!(results[0].status, EnrichmentStatus::Completed);
        assert_eq!(results[0].email.as_deref(), Some("jane@acme.com"));
        assert!(scraper.scrape_calls().is_empty());
    }

    #[tokio::test]
    async fn one_failure_does_not_abort_siblings_or_later_batches() {
        let scraper = Arc::new(MockScraper {
            fail_url_parts: vec!["b-two.com".to_string()],
            default_markdown: "Contact sales@acme.com".to_string(),
            ..MockScraper::default()
        });
        let llm = Arc::new(MockLlm::default());
        let orchestrator = orchestrator_with(test_config(2, 0), scraper.clone(), llm);

        let leads = leads_from(&["a-one.com", "b-two.com", "c-three.com"]);
        let results = orchestrator.run_discovery(leads, None).await.unwrap();

        let by_site = |site: &str| {
            results
                .iter()
                .find(|l| l.lead.website == site)
                .unwrap()
        };
        assert_eq!(by_site("a-one.com").status, EnrichmentStatus::Completed);
        assert_eq!(by_site("c-three.com").status, EnrichmentStatus::Completed);

        let failed = by_site("b-two.com");
        assert_eq!(failed.status, EnrichmentStatus::Failed);
        assert!(failed
            .error_message
            .as_deref()
            .unwrap()
            .contains("mock scrape failure"));
    }

    #[tokio::test]
    async fn retries_recover_transient_scrape_failures() {
        let scraper = Arc::new(MockScraper {
            fail_first: AtomicUsize::new(1),
            default_markdown: "Contact sales@acme.com".to_string(),
            ..MockScraper::default()
        });
        let llm = Arc::new(MockLlm::default());
        let orchestrator = orchestrator_with(test_config(1, 1), scraper.clone(), llm);

        let results = orchestrator
            .run_discovery(leads_from(&["acme.com"]), None)
            .await
            .unwrap();
        assert_eq!(results[0].status, EnrichmentStatus::Completed);
        assert_eq!(scraper.scrape_calls().len(), 2);
    }

    #[tokio::test]
    async fn falls_back_to_contact_pages_when_main_page_has_no_email() {
        let scraper = Arc::new(MockScraper {
            pages: vec![
                (
                    "/contact".to_string(),
                    "Reach us at hello@acme.com".to_string(),
                ),
            ],
            default_markdown: "Just marketing copy, no addresses".to_string(),
            ..MockScraper::default()
        });
        let llm = Arc::new(MockLlm::default());
        let orchestrator = orchestrator_with(test_config(1, 0), scraper.clone(), llm.clone());

        let results = orchestrator
            .run_discovery(leads_from(&["acme.com"]), None)
            .await
            .unwrap();

        assert_eq!(results[0].email.as_deref(), Some("hello@acme.com"));
        let calls = scraper.scrape_calls();
        assert!(calls.iter().any(|u| u.ends_with("/contact")));
    }

    #[tokio::test]
    async fn completed_without_email_when_nothing_found_anywhere() {
        let scraper = Arc::new(MockScraper::with_markdown("No addresses on this site"));
        let llm = Arc::new(MockLlm::default());
        let orchestrator = orchestrator_with(test_config(1, 0), scraper.clone(), llm);

        let results = orchestrator
            .run_discovery(leads_from(&["acme.com"]), None)
            .await
            .unwrap();
        assert_eq!(results[0].status, EnrichmentStatus::Completed);
        assert!(results[0].email.is_none());
        // all three contact-page guesses were tried before giving up
        assert_eq!(scraper.scrape_calls().len(), 1 + CONTACT_PAGE_PATHS.len());
    }

    #[tokio::test]
    async fn progress_fires_twice_per_lead_and_accumulates_usage() {
        let scraper = Arc::new(MockScraper::with_markdown("Contact sales@acme.com"));
        let llm = Arc::new(MockLlm::default());
        let orchestrator = orchestrator_with(test_config(2, 0), scraper, llm);

        let updates: Arc<StdMutex<Vec<ProgressUpdate>>> = Arc::new(StdMutex::new(Vec::new()));
        let sink = updates.clone();
        let callback: ProgressCallback = Arc::new(move |update| {
            sink.lock().unwrap().push(update);
        });

        let leads = leads_from(&["a-one.com", "b-two.com"]);
        orchestrator
            .run_discovery(leads, Some(callback))
            .await
            .unwrap();

        let updates = updates.lock().unwrap();
        assert_eq!(updates.len(), 4);
        let finished: Vec<_> = updates
            .iter()
            .filter(|u| u.stage == ProgressStage::DiscoveryFinished)
            .collect();
        assert_eq!(finished.len(), 2);
        let last_usage = finished.iter().map(|u| u.usage).last().unwrap();
        assert_eq!(
            orchestrator.usage().await.input_tokens,
            20,
            "two extraction calls at 10 input tokens each"
        );
        assert!(last_usage.pages_scraped >= 1);
    }

    #[tokio::test]
    async fn phase2_rejects_undiscovered_leads() {
        let scraper = Arc::new(MockScraper::with_markdown("Contact sales@acme.com"));
        let llm = Arc::new(MockLlm::default());
        let orchestrator = orchestrator_with(test_config(2, 0), scraper, llm);

        let leads = leads_from(&["acme.com"]);
        let err = orchestrator
            .run_icebreakers(leads, None)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("has not been through email discovery"));
    }

    #[tokio::test]
    async fn phase2_reuses_cached_content() {
        let scraper = Arc::new(MockScraper::with_markdown("Contact sales@acme.com"));
        let llm = Arc::new(MockLlm::default());
        let orchestrator = orchestrator_with(test_config(2, 0), scraper.clone(), llm);

        let discovered = orchestrator
            .run_discovery(leads_from(&["acme.com"]), None)
            .await
            .unwrap();
        let scrapes_after_phase1 = scraper.scrape_calls().len();

        let enriched = orchestrator
            .run_icebreakers(discovered, None)
            .await
            .unwrap();

        assert!(enriched[0].icebreaker.is_some());
        assert_eq!(
            scraper.scrape_calls().len(),
            scrapes_after_phase1,
            "phase 2 must not re-scrape when the cache has content"
        );
        // status untouched by phase 2
        assert_eq!(enriched[0].status, EnrichmentStatus::Completed);
    }

    #[tokio::test]
    async fn phase2_records_synthetic_failure_without_content() {
        // scrape fails throughout: phase 1 marks the lead failed and caches
        // nothing, phase 2's re-scrape fails again
        let scraper = Arc::new(MockScraper {
            fail_url_parts: vec!["acme.com".to_string()],
            ..MockScraper::default()
        });
        let llm = Arc::new(MockLlm::default());
        let orchestrator = orchestrator_with(test_config(1, 0), scraper, llm);

        let discovered = orchestrator
            .run_discovery(leads_from(&["acme.com"]), None)
            .await
            .unwrap();
        assert_eq!(discovered[0].status, EnrichmentStatus::Failed);

        let enriched = orchestrator
            .run_icebreakers(discovered, None)
            .await
            .unwrap();
        assert!(enriched[0].icebreaker.is_none());
        assert_eq!(
            enriched[0].error_message.as_deref(),
            Some("no scraped content available for icebreaker")
        );
        assert_eq!(enriched[0].status, EnrichmentStatus::Failed);
    }

    #[tokio::test]
    async fn unready_services_abort_before_any_work() {
        let scraper = Arc::new(MockScraper::with_markdown("Contact sales@acme.com"));
        let llm = Arc::new(MockLlm::default());
        let orchestrator = EnrichmentOrchestrator::new(
            test_config(2, 0),
            scraper.clone(),
            llm,
            ServiceHealth {
                has_anthropic_key: false,
                has_firecrawl_key: true,
            },
        );

        let err = orchestrator
            .run_discovery(leads_from(&["acme.com"]), None)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("not configured"));
        assert!(scraper.scrape_calls().is_empty());
    }
}
