//! Link resolution, registration and management service.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::application::retry::RetryPolicy;
use crate::domain::entities::{Link, NewLink, RegisterLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;
use crate::utils::code_generator::{CodeGenerator, RandomCodeGenerator, validate_custom_alias};
use crate::utils::url_normalizer::normalize_url;

/// Minimum number of candidates drawn before registration gives up.
pub const MIN_GENERATION_ATTEMPTS: usize = 3;

/// Service for resolving and registering short links.
///
/// Resolution goes through the injected cache first and falls back to the
/// repository. Registration validates input, draws collision-free codes and
/// relies on the repository's uniqueness guarantee for concurrent writers.
pub struct LinkService {
    link_repository: Arc<dyn LinkRepository>,
    cache: Arc<dyn CacheService>,
    code_generator: Arc<dyn CodeGenerator>,
    generation_attempts: usize,
    retry: RetryPolicy,
}

impl LinkService {
    /// Creates a service with the random code generator and default limits.
    pub fn new(link_repository: Arc<dyn LinkRepository>, cache: Arc<dyn CacheService>) -> Self {
        Self {
            link_repository,
            cache,
            code_generator: Arc::new(RandomCodeGenerator),
            generation_attempts: MIN_GENERATION_ATTEMPTS,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_code_generator(mut self, code_generator: Arc<dyn CodeGenerator>) -> Self {
        self.code_generator = code_generator;
        self
    }

    /// Sets how many candidate codes are drawn. Values below 3 are raised to 3.
    pub fn with_generation_attempts(mut self, attempts: usize) -> Self {
        self.generation_attempts = attempts.max(MIN_GENERATION_ATTEMPTS);
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Resolves a short code or alias to its link, case-insensitively.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] if the code is empty
    /// - [`AppError::NotFound`] if no link owns the code
    /// - [`AppError::Transient`] if the store stays unreachable after retries
    pub async fn resolve(&self, code: &str) -> Result<Link, AppError> {
        let code = code.trim();
        if code.is_empty() {
            return Err(AppError::invalid_field("code", "Short code is required"));
        }

        let key = code.to_lowercase();

        match self.cache.get_link(&key).await {
            Ok(Some(link)) => return Ok(link),
            Ok(None) => {}
            Err(e) => warn!("Cache lookup failed for {}: {}", key, e),
        }

        let link = self
            .retry
            .run(|| self.link_repository.find_by_handle(&key))
            .await?
            .ok_or_else(|| {
                debug!("Short link not found: {}", code);
                AppError::not_found("Short link not found", json!({ "code": code }))
            })?;

        match self.cache.set_link(&key, &link, None).await {
            Ok(()) => self.drop_if_deleted(&key, link.id).await,
            Err(e) => warn!("Cache store failed for {}: {}", key, e),
        }

        Ok(link)
    }

    /// Evicts a freshly cached entry whose link was deleted between the
    /// store read and the cache write. Otherwise the delete's invalidation
    /// runs first and the stale entry would live for the whole TTL.
    async fn drop_if_deleted(&self, key: &str, link_id: i64) {
        match self.link_repository.find_by_handle(key).await {
            Ok(Some(current)) if current.id == link_id => return,
            Ok(_) => debug!("Link for {} deleted while caching", key),
            Err(e) => warn!("Cache recheck failed for {}: {}", key, e),
        }

        if let Err(e) = self.cache.invalidate(key).await {
            warn!("Cache invalidation failed for {}: {}", key, e);
        }
    }

    /// Registers a new short link.
    ///
    /// # Validation
    ///
    /// - The URL is trimmed and gets `https://` when it has no scheme
    /// - A custom alias must be 3-20 characters of letters, digits, `-` and `_`
    /// - A blank alias counts as no alias
    /// - A blank title falls back to the destination URL
    ///
    /// # Code Generation
    ///
    /// Without an alias, candidates are drawn from the code generator until
    /// one is free. A collision detected at insert time also costs an attempt.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] for a bad URL or alias
    /// - [`AppError::AliasTaken`] if the alias is used as a code or alias
    /// - [`AppError::GenerationExhausted`] if every candidate collided
    /// - [`AppError::Transient`] if a probe stays unreachable after retries, or
    ///   the insert itself fails transiently (inserts run once)
    pub async fn register(&self, request: RegisterLink) -> Result<Link, AppError> {
        let long_url = normalize_url(&request.long_url)
            .map_err(|e| AppError::invalid_field("long_url", e.to_string()))?;

        let alias = request
            .custom_alias
            .as_deref()
            .filter(|a| !a.trim().is_empty())
            .map(validate_custom_alias)
            .transpose()?;

        let title = request
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from)
            .unwrap_or_else(|| long_url.clone());

        let template = NewLink {
            long_url,
            code: None,
            alias: None,
            title: Some(title),
            user_id: request.user_id,
            qr_code: request.qr_code,
        };

        let link = match alias {
            Some(alias) => self.register_alias(template, alias).await?,
            None => self.register_generated(template).await?,
        };

        for handle in link.handles() {
            if let Err(e) = self.cache.invalidate(&handle).await {
                warn!("Cache invalidation failed for {}: {}", handle, e);
            }
        }

        metrics::counter!("links_registered_total").increment(1);
        info!(
            link_id = link.id,
            code = link.public_code(),
            "Registered short link"
        );

        Ok(link)
    }

    async fn register_alias(&self, template: NewLink, alias: String) -> Result<Link, AppError> {
        let taken = || {
            AppError::alias_taken(
                "This alias is already taken",
                json!({ "field": "custom_alias", "alias": alias }),
            )
        };

        if self
            .retry
            .run(|| self.link_repository.handle_exists(&alias))
            .await?
        {
            return Err(taken());
        }

        let new_link = NewLink {
            alias: Some(alias.clone()),
            ..template
        };

        match self.link_repository.create(new_link).await {
            Err(AppError::AliasTaken { .. }) => Err(taken()),
            other => other,
        }
    }

    async fn register_generated(&self, template: NewLink) -> Result<Link, AppError> {
        for attempt in 1..=self.generation_attempts {
            let code = self.code_generator.generate();

            if self
                .retry
                .run(|| self.link_repository.handle_exists(&code))
                .await?
            {
                metrics::counter!("code_collisions_total").increment(1);
                debug!(attempt, "Generated code {} already exists", code);
                continue;
            }

            let new_link = NewLink {
                code: Some(code.clone()),
                ..template.clone()
            };

            // Inserts are not retried: a lost commit acknowledgement would
            // otherwise turn into a collision and a second record.
            match self.link_repository.create(new_link).await {
                Ok(link) => return Ok(link),
                Err(AppError::AliasTaken { .. }) => {
                    metrics::counter!("code_collisions_total").increment(1);
                    debug!(attempt, "Generated code {} was taken concurrently", code);
                }
                Err(e) => return Err(e),
            }
        }

        warn!(
            attempts = self.generation_attempts,
            "Short code generation exhausted"
        );
        Err(AppError::generation_exhausted(
            "Could not generate a unique short code, please retry",
            json!({ "attempts": self.generation_attempts }),
        ))
    }

    /// Retrieves a link by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the link does not exist.
    pub async fn get_link(&self, id: i64) -> Result<Link, AppError> {
        self.retry
            .run(|| self.link_repository.find_by_id(id))
            .await?
            .ok_or_else(|| AppError::not_found("Link not found", json!({ "id": id })))
    }

    /// Lists links newest first. `page` is 1-based.
    pub async fn list_links(
        &self,
        user_id: Option<Uuid>,
        page: i64,
        page_size: i64,
    ) -> Result<Vec<Link>, AppError> {
        let offset = (page.max(1) - 1) * page_size;
        self.retry
            .run(|| self.link_repository.list(user_id, offset, page_size))
            .await
    }

    pub async fn count_links(&self, user_id: Option<Uuid>) -> Result<i64, AppError> {
        self.retry
            .run(|| self.link_repository.count(user_id))
            .await
    }

    /// Deletes a link, its handles and its clicks, and evicts it from the cache.
    ///
    /// Ownership checks belong to the caller.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the link does not exist.
    pub async fn delete_link(&self, id: i64) -> Result<Link, AppError> {
        let link = self
            .retry
            .run(|| self.link_repository.delete(id))
            .await?
            .ok_or_else(|| AppError::not_found("Link not found", json!({ "id": id })))?;

        for handle in link.handles() {
            if let Err(e) = self.cache.invalidate(&handle).await {
                warn!("Cache invalidation failed for {}: {}", handle, e);
            }
        }

        info!(link_id = id, "Deleted short link");
        Ok(link)
    }

    /// Checks that the link store answers.
    pub async fn store_healthy(&self) -> bool {
        self.link_repository.count(None).await.is_ok()
    }
}
