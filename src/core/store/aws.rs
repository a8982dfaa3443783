//! AWS store backend.
//!
//! Secrets live in AWS Secrets Manager, parameters in SSM Parameter
//! Store. Enable with `--features aws` (on by default).
//!
//! Credentials and region come from the default provider chain
//! (environment, ~/.aws/config, instance profile). Every call runs under
//! the caller-configured timeout; expiry is classified as a transient
//! failure so the idempotent operations can be retried whole.

use std::collections::VecDeque;
use std::future::Future;
use std::time::Duration;

use aws_sdk_secretsmanager::error::ProvideErrorMetadata;
use tracing::{debug, trace};

use crate::core::record::{RecordKind, RecordMeta, RecordRef, TagMap};
use crate::core::store::{Acked, CreateOutcome, RecordIter, StoreClient, TagFilter};
use crate::error::{Result, StoreError};

/// AWS-backed record store.
///
/// Holds one Secrets Manager client and one SSM client over a shared
/// current-thread runtime; the CLI itself stays synchronous.
pub struct AwsStore {
    runtime: tokio::runtime::Runtime,
    secrets: aws_sdk_secretsmanager::Client,
    ssm: aws_sdk_ssm::Client,
    timeout: Duration,
}

impl AwsStore {
    /// Connect using the default AWS credential provider chain.
    pub fn connect(timeout: Duration) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| {
                StoreError::TransientUnavailable(format!("failed to create runtime: {}", e))
            })?;

        debug!("loading AWS config from default provider chain");
        let config =
            runtime.block_on(aws_config::load_defaults(aws_config::BehaviorVersion::latest()));

        Ok(Self {
            secrets: aws_sdk_secretsmanager::Client::new(&config),
            ssm: aws_sdk_ssm::Client::new(&config),
            runtime,
            timeout,
        })
    }

    /// Run one SDK call under the operation timeout.
    fn call<F, T>(&self, op: &str, fut: F) -> Result<T>
    where
        F: Future<Output = T>,
    {
        self.runtime
            .block_on(async { tokio::time::timeout(self.timeout, fut).await })
            .map_err(|_| {
                StoreError::TransientUnavailable(format!(
                    "{}: timed out after {}s",
                    op,
                    self.timeout.as_secs()
                ))
                .into()
            })
    }

    fn secret_tags(tags: &TagMap) -> Vec<aws_sdk_secretsmanager::types::Tag> {
        tags.iter()
            .map(|(k, v)| {
                aws_sdk_secretsmanager::types::Tag::builder()
                    .key(k)
                    .value(v)
                    .build()
            })
            .collect()
    }

    fn parameter_tags(tags: &TagMap) -> Result<Vec<aws_sdk_ssm::types::Tag>> {
        tags.iter()
            .map(|(k, v)| {
                aws_sdk_ssm::types::Tag::builder()
                    .key(k)
                    .value(v)
                    .build()
                    .map_err(|e| StoreError::ValidationFailed(format!("invalid tag: {}", e)).into())
            })
            .collect()
    }
}

/// Map a service error onto the store taxonomy by its error code.
///
/// Unrecognized codes (including network-level failures surfaced as
/// unhandled variants) land in the retryable bucket; the upsert protocol
/// is idempotent, so retrying whole is always safe.
fn classify<E: ProvideErrorMetadata>(op: &str, err: E) -> StoreError {
    let code = err.code().unwrap_or("unknown").to_string();
    let text = format!(
        "{}: {} ({})",
        op,
        err.message().unwrap_or("no diagnostic from provider"),
        code
    );
    match code.as_str() {
        "AccessDeniedException" | "AccessDenied" | "UnauthorizedOperation"
        | "UnrecognizedClientException" | "ExpiredTokenException" => {
            StoreError::NotAuthorized(text)
        }
        "ValidationException" | "ValidationError" | "InvalidParameterException"
        | "InvalidRequestException" | "MalformedPolicyDocumentException"
        | "ParameterLimitExceeded" | "ParameterPatternMismatchException"
        | "PoliciesLimitExceededException" | "InvalidAllowedPatternException" => {
            StoreError::ValidationFailed(text)
        }
        _ => StoreError::TransientUnavailable(text),
    }
}

impl StoreClient for AwsStore {
    fn create_record(
        &self,
        name: &str,
        value: &str,
        kind: RecordKind,
        tags: &TagMap,
    ) -> Result<CreateOutcome> {
        trace!(name, %kind, "create record");
        match kind {
            RecordKind::Secret => {
                let result = self.call(
                    "create secret",
                    self.secrets
                        .create_secret()
                        .name(name)
                        .secret_string(value)
                        .set_tags(Some(Self::secret_tags(tags)))
                        .send(),
                )?;
                match result {
                    Ok(_) => Ok(CreateOutcome::Created(RecordRef::new(name, kind))),
                    Err(err) => {
                        let service = err.into_service_error();
                        if service.is_resource_exists_exception() {
                            trace!(name, "secret already exists");
                            Ok(CreateOutcome::Conflict)
                        } else {
                            Err(classify("create secret", service).into())
                        }
                    }
                }
            }
            RecordKind::Parameter => {
                let result = self.call(
                    "create parameter",
                    self.ssm
                        .put_parameter()
                        .name(name)
                        .value(value)
                        .r#type(aws_sdk_ssm::types::ParameterType::String)
                        .overwrite(false)
                        .set_tags(Some(Self::parameter_tags(tags)?))
                        .send(),
                )?;
                match result {
                    Ok(_) => Ok(CreateOutcome::Created(RecordRef::new(name, kind))),
                    Err(err) => {
                        let service = err.into_service_error();
                        if service.is_parameter_already_exists() {
                            trace!(name, "parameter already exists");
                            Ok(CreateOutcome::Conflict)
                        } else {
                            Err(classify("create parameter", service).into())
                        }
                    }
                }
            }
        }
    }

    fn update_value(&self, name: &str, value: &str, kind: RecordKind) -> Result<Acked> {
        trace!(name, %kind, "update value");
        match kind {
            RecordKind::Secret => {
                let result = self.call(
                    "update secret value",
                    self.secrets
                        .put_secret_value()
                        .secret_id(name)
                        .secret_string(value)
                        .send(),
                )?;
                match result {
                    Ok(_) => Ok(Acked::Ack),
                    Err(err) => {
                        let service = err.into_service_error();
                        if service.is_resource_not_found_exception() {
                            Ok(Acked::NotFound)
                        } else {
                            Err(classify("update secret value", service).into())
                        }
                    }
                }
            }
            RecordKind::Parameter => {
                // Tags cannot ride along with Overwrite=true; the tag
                // merge is a separate call by provider rule, which is
                // what makes the fallback path two-step in the first
                // place.
                let result = self.call(
                    "update parameter value",
                    self.ssm
                        .put_parameter()
                        .name(name)
                        .value(value)
                        .r#type(aws_sdk_ssm::types::ParameterType::String)
                        .overwrite(true)
                        .send(),
                )?;
                match result {
                    // Overwrite=true upserts at the provider: a racing
                    // delete still converges to the written value.
                    Ok(_) => Ok(Acked::Ack),
                    Err(err) => {
                        Err(classify("update parameter value", err.into_service_error()).into())
                    }
                }
            }
        }
    }

    fn merge_tags(&self, name: &str, tags: &TagMap, kind: RecordKind) -> Result<Acked> {
        trace!(name, %kind, count = tags.len(), "merge tags");
        match kind {
            RecordKind::Secret => {
                let result = self.call(
                    "tag secret",
                    self.secrets
                        .tag_resource()
                        .secret_id(name)
                        .set_tags(Some(Self::secret_tags(tags)))
                        .send(),
                )?;
                match result {
                    Ok(_) => Ok(Acked::Ack),
                    Err(err) => {
                        let service = err.into_service_error();
                        if service.is_resource_not_found_exception() {
                            Ok(Acked::NotFound)
                        } else {
                            Err(classify("tag secret", service).into())
                        }
                    }
                }
            }
            RecordKind::Parameter => {
                let result = self.call(
                    "tag parameter",
                    self.ssm
                        .add_tags_to_resource()
                        .resource_type(aws_sdk_ssm::types::ResourceTypeForTagging::Parameter)
                        .resource_id(name)
                        .set_tags(Some(Self::parameter_tags(tags)?))
                        .send(),
                )?;
                match result {
                    Ok(_) => Ok(Acked::Ack),
                    Err(err) => {
                        let service = err.into_service_error();
                        if service.is_invalid_resource_id() {
                            Ok(Acked::NotFound)
                        } else {
                            Err(classify("tag parameter", service).into())
                        }
                    }
                }
            }
        }
    }

    fn describe_record(&self, name: &str, kind: RecordKind) -> Result<Option<RecordMeta>> {
        trace!(name, %kind, "describe record");
        match kind {
            RecordKind::Secret => {
                let result = self.call(
                    "describe secret",
                    self.secrets.describe_secret().secret_id(name).send(),
                )?;
                match result {
                    Ok(out) => {
                        let tags = out
                            .tags()
                            .iter()
                            .filter_map(|t| Some((t.key()?.to_string(), t.value()?.to_string())))
                            .collect();
                        Ok(Some(RecordMeta {
                            reference: RecordRef::new(name, kind),
                            tags,
                        }))
                    }
                    Err(err) => {
                        let service = err.into_service_error();
                        if service.is_resource_not_found_exception() {
                            Ok(None)
                        } else {
                            Err(classify("describe secret", service).into())
                        }
                    }
                }
            }
            RecordKind::Parameter => {
                let exists = self.call(
                    "describe parameter",
                    self.ssm.get_parameter().name(name).send(),
                )?;
                if let Err(err) = exists {
                    let service = err.into_service_error();
                    return if service.is_parameter_not_found() {
                        Ok(None)
                    } else {
                        Err(classify("describe parameter", service).into())
                    };
                }

                let result = self.call(
                    "list parameter tags",
                    self.ssm
                        .list_tags_for_resource()
                        .resource_type(aws_sdk_ssm::types::ResourceTypeForTagging::Parameter)
                        .resource_id(name)
                        .send(),
                )?;
                match result {
                    Ok(out) => {
                        let tags = out
                            .tag_list()
                            .iter()
                            .map(|t| (t.key().to_string(), t.value().to_string()))
                            .collect();
                        Ok(Some(RecordMeta {
                            reference: RecordRef::new(name, kind),
                            tags,
                        }))
                    }
                    Err(err) => {
                        let service = err.into_service_error();
                        // Deleted between the probe and the tag read
                        if service.is_invalid_resource_id() {
                            Ok(None)
                        } else {
                            Err(classify("list parameter tags", service).into())
                        }
                    }
                }
            }
        }
    }

    fn delete_record(&self, name: &str, kind: RecordKind, force: bool) -> Result<Acked> {
        debug!(name, %kind, force, "delete record");
        match kind {
            RecordKind::Secret => {
                let result = self.call(
                    "delete secret",
                    self.secrets
                        .delete_secret()
                        .secret_id(name)
                        .force_delete_without_recovery(force)
                        .send(),
                )?;
                match result {
                    Ok(_) => Ok(Acked::Ack),
                    Err(err) => {
                        let service = err.into_service_error();
                        if service.is_resource_not_found_exception() {
                            Ok(Acked::NotFound)
                        } else {
                            Err(classify("delete secret", service).into())
                        }
                    }
                }
            }
            RecordKind::Parameter => {
                // Parameter Store has no recovery window; force is moot
                let result = self.call(
                    "delete parameter",
                    self.ssm.delete_parameter().name(name).send(),
                )?;
                match result {
                    Ok(_) => Ok(Acked::Ack),
                    Err(err) => {
                        let service = err.into_service_error();
                        if service.is_parameter_not_found() {
                            Ok(Acked::NotFound)
                        } else {
                            Err(classify("delete parameter", service).into())
                        }
                    }
                }
            }
        }
    }

    fn list_records(&self, kind: RecordKind, filter: &TagFilter) -> RecordIter<'_> {
        Box::new(PagedListing {
            store: self,
            kind,
            filter: filter.clone(),
            buffer: VecDeque::new(),
            next_token: None,
            started: false,
            done: false,
        })
    }
}

/// Lazy paging iterator over one kind's listing API.
///
/// A page is only fetched when the consumer drains the buffer, and a
/// fresh `list_records` call restarts from the first page.
struct PagedListing<'a> {
    store: &'a AwsStore,
    kind: RecordKind,
    filter: TagFilter,
    buffer: VecDeque<RecordRef>,
    next_token: Option<String>,
    started: bool,
    done: bool,
}

impl PagedListing<'_> {
    fn fetch_page(&mut self) -> Result<()> {
        match self.kind {
            RecordKind::Secret => {
                let key_filter = aws_sdk_secretsmanager::types::Filter::builder()
                    .key(aws_sdk_secretsmanager::types::FilterNameStringType::TagKey)
                    .values(&self.filter.key)
                    .build();
                let value_filter = aws_sdk_secretsmanager::types::Filter::builder()
                    .key(aws_sdk_secretsmanager::types::FilterNameStringType::TagValue)
                    .values(&self.filter.value)
                    .build();
                let store = self.store;
                let token = self.next_token.take();
                let result = store.call(
                    "list secrets",
                    store
                        .secrets
                        .list_secrets()
                        .filters(key_filter)
                        .filters(value_filter)
                        .set_next_token(token)
                        .send(),
                )?;
                let out = result.map_err(|err| classify("list secrets", err.into_service_error()))?;
                for entry in out.secret_list() {
                    // The provider filters are key/value independent, so
                    // re-check the exact pair on the returned tags.
                    let matched = entry.tags().iter().any(|t| {
                        t.key() == Some(self.filter.key.as_str())
                            && t.value() == Some(self.filter.value.as_str())
                    });
                    if matched {
                        if let Some(name) = entry.name() {
                            self.buffer.push_back(RecordRef::new(name, RecordKind::Secret));
                        }
                    }
                }
                self.next_token = out.next_token().map(|s| s.to_string());
            }
            RecordKind::Parameter => {
                let tag_filter = aws_sdk_ssm::types::ParameterStringFilter::builder()
                    .key(format!("tag:{}", self.filter.key))
                    .values(&self.filter.value)
                    .build()
                    .map_err(|e| StoreError::ValidationFailed(format!("invalid filter: {}", e)))?;
                let store = self.store;
                let token = self.next_token.take();
                let result = store.call(
                    "list parameters",
                    store
                        .ssm
                        .describe_parameters()
                        .parameter_filters(tag_filter)
                        .set_next_token(token)
                        .send(),
                )?;
                let out =
                    result.map_err(|err| classify("list parameters", err.into_service_error()))?;
                for meta in out.parameters() {
                    if let Some(name) = meta.name() {
                        self.buffer
                            .push_back(RecordRef::new(name, RecordKind::Parameter));
                    }
                }
                self.next_token = out.next_token().map(|s| s.to_string());
            }
        }
        Ok(())
    }
}

impl Iterator for PagedListing<'_> {
    type Item = Result<RecordRef>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(record) = self.buffer.pop_front() {
                return Some(Ok(record));
            }
            if self.done {
                return None;
            }
            if self.started && self.next_token.is_none() {
                self.done = true;
                return None;
            }
            self.started = true;
            if let Err(e) = self.fetch_page() {
                self.done = true;
                return Some(Err(e));
            }
        }
    }
}
