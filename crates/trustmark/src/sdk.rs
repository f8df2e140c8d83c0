//! The annotation pipeline.
//!
//! One pass per data item: hash once, run every configured annotator in
//! order against a shared [`Lineage`], sign each annotation, and hand the
//! resulting list to the stream as a single [`Envelope`]. Any failure before
//! the send aborts the item and nothing is published.

use std::sync::Arc;

use tracing::{debug, info, warn};
use trustmark_core::{
    Annotation, AnnotationList, AnnotationType, LayerType, Lineage, SdkInfo, SharedTagResolver,
    TagResolver,
};
use trustmark_crypto::{new_hash_provider, new_signature_provider, HashProvider, SignatureProvider};
use trustmark_stream::{Envelope, SdkAction, StreamProvider, StreamRegistry};

use crate::annotators::{new_annotator, Annotator};
use crate::context::AnnotationContext;
use crate::error::{Result, SdkError};

pub struct Sdk {
    annotators: Vec<Box<dyn Annotator>>,
    hasher: Box<dyn HashProvider>,
    signer: Box<dyn SignatureProvider>,
    stream: Arc<dyn StreamProvider>,
    layer: LayerType,
    host: String,
    tags: SharedTagResolver,
}

impl Sdk {
    pub fn builder(config: SdkInfo) -> SdkBuilder {
        SdkBuilder::new(config)
    }

    /// Build every provider named by `config`, constructing the stream
    /// through `registry`.
    pub fn from_config(config: &SdkInfo, registry: &StreamRegistry) -> Result<Self> {
        SdkBuilder::new(config.clone()).build_with(registry)
    }

    pub fn layer(&self) -> LayerType {
        self.layer
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Configured annotator kinds, in execution order.
    pub fn annotator_kinds(&self) -> Vec<AnnotationType> {
        self.annotators.iter().map(|a| a.kind()).collect()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Stream Lifecycle
    // ─────────────────────────────────────────────────────────────────────────

    pub async fn connect(&self) -> Result<()> {
        self.stream.connect().await?;
        info!(stream = %self.stream.stream_type(), layer = %self.layer, "sdk connected");
        Ok(())
    }

    pub async fn close(&self) -> Result<()> {
        self.stream.close().await?;
        info!(stream = %self.stream.stream_type(), "sdk closed");
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Lifecycle Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Annotate newly created data and publish the list.
    pub async fn create(&self, ctx: &AnnotationContext, data: &[u8]) -> Result<AnnotationList> {
        self.run(SdkAction::Create, ctx, data).await
    }

    /// Annotate data passing through this node and publish the list.
    pub async fn transit(&self, ctx: &AnnotationContext, data: &[u8]) -> Result<AnnotationList> {
        self.run(SdkAction::Transit, ctx, data).await
    }

    /// Annotate data leaving the system and publish the list.
    pub async fn publish(&self, ctx: &AnnotationContext, data: &[u8]) -> Result<AnnotationList> {
        self.run(SdkAction::Publish, ctx, data).await
    }

    /// Record that `old` was replaced by `new`.
    ///
    /// The list starts with a `src` annotation keyed by `old`, followed by
    /// the configured annotations over `new`.
    pub async fn mutate(
        &self,
        ctx: &AnnotationContext,
        old: &[u8],
        new: &[u8],
    ) -> Result<AnnotationList> {
        let origin = self.lineage(old);
        let link = Annotation::new(&origin, self.layer, AnnotationType::Source, true);

        let mut list = AnnotationList::new();
        list.push(self.sign(link)?);
        for annotation in self.annotate(ctx, new)? {
            list.push(annotation);
        }
        self.emit(SdkAction::Mutate, list).await
    }

    /// Produce the signed annotation list for `data` without publishing it.
    pub fn annotate(&self, ctx: &AnnotationContext, data: &[u8]) -> Result<AnnotationList> {
        let lineage = self.lineage(data);
        let mut list = AnnotationList::new();
        for annotator in &self.annotators {
            let annotation = annotator
                .annotate(ctx, &lineage, self.layer, data)
                .map_err(|e| {
                    warn!(annotator = %annotator.kind(), key = %lineage.key, error = %e, "annotation aborted");
                    e
                })?;
            list.push(self.sign(annotation)?);
        }
        Ok(list)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Tag Resolution
    // ─────────────────────────────────────────────────────────────────────────

    /// Install `resolver` for every item annotated from now on. Whenever it
    /// yields an empty tag the built-in default applies.
    pub fn set_tag_resolver(&self, resolver: Arc<dyn TagResolver>) {
        self.tags.swap(resolver);
    }

    pub fn reset_tag_resolver(&self) {
        self.tags.reset();
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internal
    // ─────────────────────────────────────────────────────────────────────────

    fn lineage(&self, data: &[u8]) -> Lineage {
        Lineage::new(
            self.hasher.derive(data),
            self.hasher.hash_type(),
            self.host.as_str(),
            self.tags.resolve(self.layer),
        )
    }

    fn sign(&self, annotation: Annotation) -> Result<Annotation> {
        let signature = self.signer.sign(&annotation.signing_bytes()?)?;
        Ok(annotation.with_signature(signature))
    }

    async fn run(
        &self,
        action: SdkAction,
        ctx: &AnnotationContext,
        data: &[u8],
    ) -> Result<AnnotationList> {
        let list = self.annotate(ctx, data)?;
        self.emit(action, list).await
    }

    async fn emit(&self, action: SdkAction, list: AnnotationList) -> Result<AnnotationList> {
        let envelope = Envelope::new(action, list);
        if let Err(e) = self.stream.send(&envelope).await {
            warn!(%action, stream = %self.stream.stream_type(), error = %e, "publish failed");
            return Err(e.into());
        }
        debug!(%action, annotations = envelope.content.len(), "annotation list published");
        Ok(envelope.content)
    }
}

/// Assembles an [`Sdk`], letting callers supply the stream, tag resolver
/// and host name instead of deriving them from configuration.
pub struct SdkBuilder {
    config: SdkInfo,
    stream: Option<Arc<dyn StreamProvider>>,
    tag_resolver: Option<Arc<dyn TagResolver>>,
    host: Option<String>,
}

impl SdkBuilder {
    pub fn new(config: SdkInfo) -> Self {
        Self {
            config,
            stream: None,
            tag_resolver: None,
            host: None,
        }
    }

    /// Use `stream` instead of building one from configuration.
    pub fn stream(mut self, stream: Arc<dyn StreamProvider>) -> Self {
        self.stream = Some(stream);
        self
    }

    pub fn tag_resolver(mut self, resolver: Arc<dyn TagResolver>) -> Self {
        self.tag_resolver = Some(resolver);
        self
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Build, constructing the stream (if not supplied) from the built-in
    /// registry.
    pub fn build(self) -> Result<Sdk> {
        self.build_with(&StreamRegistry::new())
    }

    pub fn build_with(self, registry: &StreamRegistry) -> Result<Sdk> {
        let cfg = self.config;
        let annotators = cfg
            .annotators
            .iter()
            .map(|kind| new_annotator(*kind, &cfg))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let hasher = new_hash_provider(cfg.hash.kind);
        let signer = new_signature_provider(&cfg.signature.private_key)?;
        let stream = match self.stream {
            Some(stream) => stream,
            None => registry.build(&cfg.stream)?,
        };
        let host = match self.host {
            Some(host) => host,
            None => hostname::get()
                .map_err(SdkError::Host)?
                .to_string_lossy()
                .into_owned(),
        };
        let tags = match self.tag_resolver {
            Some(resolver) => SharedTagResolver::with_custom(resolver),
            None => SharedTagResolver::new(),
        };

        debug!(
            annotators = ?cfg.annotators,
            hash = %cfg.hash.kind,
            signature = %cfg.signature.private_key.kind,
            stream = %stream.stream_type(),
            layer = %cfg.layer,
            "sdk assembled"
        );
        Ok(Sdk {
            annotators,
            hasher,
            signer,
            stream,
            layer: cfg.layer,
            host,
            tags,
        })
    }
}
