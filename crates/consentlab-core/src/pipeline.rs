//! The consent pipeline: one shared backend wired into every component.
//!
//!   TextSource → TextSourceAdapter → DocumentText → DocumentAnalyzer → RiskAssessment
//!
//! The translator and Q&A engine run later, as often as the patient asks, on
//! the assessment summary and the document text respectively.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::info;

use consentlab_contracts::{
    assessment::RiskAssessment,
    document::DocumentText,
    error::ConsentResult,
    language::Language,
};

use crate::analyze::DocumentAnalyzer;
use crate::backend::DEFAULT_TIMEOUT;
use crate::extract::{PdfExtractReader, TextSource, TextSourceAdapter};
use crate::qa::QaEngine;
use crate::report::ReportExtractor;
use crate::traits::{GenerativeBackend, ResponseVerifier, TextLayerReader};
use crate::translate::Translator;

/// Runtime knobs shared by every component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Bound on each backend call.
    pub timeout: Duration,
    /// Languages the translator accepts. Always includes English.
    pub enabled_languages: Vec<Language>,
    /// Keep translations in memory for the life of the pipeline.
    pub translation_cache: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            enabled_languages: Language::ALL.to_vec(),
            translation_cache: false,
        }
    }
}

/// A document that has been extracted and analyzed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalyzedDocument {
    pub document: DocumentText,
    pub assessment: RiskAssessment,
}

pub struct ConsentPipeline {
    adapter: TextSourceAdapter,
    analyzer: DocumentAnalyzer,
    translator: Translator,
    qa: QaEngine,
    reports: ReportExtractor,
}

impl ConsentPipeline {
    /// Build a pipeline that reads PDFs with `pdf-extract`.
    pub fn new(
        backend: Arc<dyn GenerativeBackend>,
        verifier: Arc<dyn ResponseVerifier>,
        options: PipelineOptions,
    ) -> Self {
        Self::with_reader(backend, verifier, Arc::new(PdfExtractReader), options)
    }

    pub fn with_reader(
        backend: Arc<dyn GenerativeBackend>,
        verifier: Arc<dyn ResponseVerifier>,
        reader: Arc<dyn TextLayerReader>,
        options: PipelineOptions,
    ) -> Self {
        let PipelineOptions { timeout, enabled_languages, translation_cache } = options;
        info!(
            backend = backend.name(),
            timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            languages = enabled_languages.len(),
            translation_cache,
            "consent pipeline ready"
        );

        Self {
            adapter: TextSourceAdapter::new(backend.clone(), reader, timeout),
            analyzer: DocumentAnalyzer::new(backend.clone(), verifier, timeout),
            translator: Translator::new(backend.clone(), enabled_languages, translation_cache, timeout),
            qa: QaEngine::new(backend.clone(), timeout),
            reports: ReportExtractor::new(backend, timeout),
        }
    }

    pub fn adapter(&self) -> &TextSourceAdapter {
        &self.adapter
    }

    pub fn analyzer(&self) -> &DocumentAnalyzer {
        &self.analyzer
    }

    pub fn translator(&self) -> &Translator {
        &self.translator
    }

    pub fn qa(&self) -> &QaEngine {
        &self.qa
    }

    pub fn reports(&self) -> &ReportExtractor {
        &self.reports
    }

    /// Extract then analyze. An extraction failure stops before analysis.
    pub async fn process(&self, source: TextSource) -> ConsentResult<AnalyzedDocument> {
        let document = self.adapter.extract(source).await?;
        let assessment = self.analyzer.analyze(document.content()).await?;
        Ok(AnalyzedDocument { document, assessment })
    }
}
