//! # consentlab-core
//!
//! The consent-document pipeline: trait seams for the generative backend,
//! payload verifier, and PDF text reader, plus the components built on them.
//!
//! - `TextSourceAdapter`: PDF, scan, or capture into `DocumentText`
//! - `DocumentAnalyzer`: text into a verified `RiskAssessment`
//! - `Translator`: summaries into other enabled languages
//! - `QaEngine`: answers grounded only in the consent form
//! - `ReportExtractor`: patient details from a medical report
//! - `ConsentPipeline`: one backend shared by all of the above

pub mod analyze;
pub mod backend;
pub mod extract;
pub mod pipeline;
pub mod prompts;
pub mod qa;
pub mod report;
pub mod response;
pub mod traits;
pub mod translate;

#[cfg(test)]
mod test_support;

pub use analyze::{analysis_schema, DocumentAnalyzer};
pub use extract::{PdfExtractReader, TextSource, TextSourceAdapter};
pub use pipeline::{AnalyzedDocument, ConsentPipeline, PipelineOptions};
pub use qa::{QaEngine, FALLBACK_ANSWER};
pub use report::ReportExtractor;
pub use traits::{GenerativeBackend, ResponseVerifier, TextLayerReader};
pub use translate::Translator;
