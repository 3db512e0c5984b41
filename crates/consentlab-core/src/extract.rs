//! Text Source Adapter: turns an uploaded PDF, scanned page, or camera
//! capture into `DocumentText`.
//!
//! PDFs are read from their embedded text layer only, on tokio's blocking
//! pool. Images go through one recognition call to the backend. Nothing is
//! cached.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use consentlab_contracts::{
    backend::{GenerateRequest, InlineImage},
    document::{DocumentText, TextOrigin},
    error::ExtractionError,
};

use crate::backend::call_backend;
use crate::prompts::OCR_PROMPT;
use crate::traits::{GenerativeBackend, TextLayerReader};

/// A document handed over for extraction.
#[derive(Debug, Clone)]
pub enum TextSource {
    /// Raw bytes of an uploaded PDF.
    Pdf(Vec<u8>),
    /// An image to recognize; `origin` records how it was obtained.
    Image { image: InlineImage, origin: TextOrigin },
}

impl TextSource {
    /// A camera snapshot given as a base64 data URL.
    pub fn capture(data_url: &str) -> Result<Self, ExtractionError> {
        let image = InlineImage::from_data_url(data_url)?;
        Ok(Self::Image { image, origin: TextOrigin::Capture })
    }

    pub fn scan(image: InlineImage) -> Self {
        Self::Image { image, origin: TextOrigin::Scan }
    }

    pub fn origin(&self) -> TextOrigin {
        match self {
            Self::Pdf(_) => TextOrigin::Upload,
            Self::Image { origin, .. } => *origin,
        }
    }
}

/// Reads PDF text layers with the `pdf-extract` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfExtractReader;

impl TextLayerReader for PdfExtractReader {
    fn read_text(&self, pdf: &[u8]) -> Result<String, String> {
        // pdf-extract panics on some malformed inputs instead of erroring.
        match std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(pdf)) {
            Ok(Ok(text)) => Ok(text),
            Ok(Err(e)) => Err(e.to_string()),
            Err(_) => Err("PDF parser aborted on malformed input".to_string()),
        }
    }
}

pub struct TextSourceAdapter {
    backend: Arc<dyn GenerativeBackend>,
    reader: Arc<dyn TextLayerReader>,
    timeout: Duration,
}

impl TextSourceAdapter {
    pub fn new(
        backend: Arc<dyn GenerativeBackend>,
        reader: Arc<dyn TextLayerReader>,
        timeout: Duration,
    ) -> Self {
        Self { backend, reader, timeout }
    }

    /// Produce normalized document text, or say why none is available.
    ///
    /// # Errors
    ///
    /// - `NoTextLayer` for a PDF whose text layer is blank (no OCR fallback)
    /// - `UnreadablePdf` when the PDF cannot be parsed
    /// - `NoRecognizedText` when image recognition returns nothing
    /// - `Backend` when the recognition call fails
    pub async fn extract(&self, source: TextSource) -> Result<DocumentText, ExtractionError> {
        match source {
            TextSource::Pdf(bytes) => self.extract_pdf(bytes).await,
            TextSource::Image { image, origin } => self.recognize(image, origin).await,
        }
    }

    async fn extract_pdf(&self, bytes: Vec<u8>) -> Result<DocumentText, ExtractionError> {
        let pdf_len = bytes.len();
        let reader = Arc::clone(&self.reader);
        let text = tokio::task::spawn_blocking(move || reader.read_text(&bytes))
            .await
            .map_err(|e| e.to_string())
            .and_then(|read| read)
            .map_err(|detail| {
                warn!(pdf_len, detail = %detail, "PDF could not be parsed");
                ExtractionError::UnreadablePdf { detail }
            })?;

        let document = DocumentText::new(text, TextOrigin::Upload).inspect_err(|_| {
            warn!(pdf_len, "PDF has no readable text layer");
        })?;

        info!(pdf_len, text_len = document.content().len(), "PDF text layer extracted");
        Ok(document)
    }

    async fn recognize(
        &self,
        image: InlineImage,
        origin: TextOrigin,
    ) -> Result<DocumentText, ExtractionError> {
        let image_len = image.bytes.len();
        let request = GenerateRequest::with_image(OCR_PROMPT, image);
        let text = call_backend(self.backend.as_ref(), &request, self.timeout, "recognize").await?;

        // An empty recognition result is never a missing text layer, even for
        // uploaded images.
        if text.trim().is_empty() {
            warn!(image_len, origin = ?origin, "no text recognized in image");
            return Err(ExtractionError::NoRecognizedText);
        }

        let document = DocumentText::new(text, origin)?;
        info!(image_len, origin = ?origin, text_len = document.content().len(), "image text recognized");
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::DEFAULT_TIMEOUT;
    use crate::test_support::{FixedTextReader, ScriptedBackend};
    use consentlab_contracts::error::BackendError;

    fn adapter(backend: Arc<ScriptedBackend>, reader: Arc<FixedTextReader>) -> TextSourceAdapter {
        TextSourceAdapter::new(backend, reader, DEFAULT_TIMEOUT)
    }

    /// A one-page PDF whose page content stream is `content`, with a correct
    /// cross-reference table.
    fn single_page_pdf(content: &str) -> Vec<u8> {
        let objects = [
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
             /Resources << /Font << /F1 5 0 R >> >> /Contents 4 0 R >>"
                .to_string(),
            format!("<< /Length {} >>\nstream\n{}\nendstream", content.len(), content),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>".to_string(),
        ];

        let mut pdf = b"%PDF-1.4\n".to_vec();
        let mut offsets = Vec::with_capacity(objects.len());
        for (i, body) in objects.iter().enumerate() {
            offsets.push(pdf.len());
            pdf.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", i + 1, body).as_bytes());
        }
        let xref_start = pdf.len();
        let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
        for offset in offsets {
            xref.push_str(&format!("{offset:010} 00000 n \n"));
        }
        xref.push_str(&format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            xref_start
        ));
        pdf.extend_from_slice(xref.as_bytes());
        pdf
    }

    #[tokio::test]
    async fn pdf_text_layer_is_returned_without_backend_call() {
        let backend = Arc::new(ScriptedBackend::replying(Vec::<String>::new()));
        let reader = Arc::new(FixedTextReader::new("Consent for appendectomy."));
        let adapter = adapter(backend.clone(), reader.clone());

        let doc = adapter.extract(TextSource::Pdf(b"%PDF-1.4".to_vec())).await.unwrap();
        assert_eq!(doc.content(), "Consent for appendectomy.");
        assert_eq!(doc.origin(), TextOrigin::Upload);
        assert_eq!(backend.call_count(), 0);
        assert_eq!(reader.call_count(), 1);
    }

    #[tokio::test]
    async fn blank_text_layer_is_no_text_layer() {
        let backend = Arc::new(ScriptedBackend::replying(["should not be used"]));
        let reader = Arc::new(FixedTextReader::new(" \n \n"));
        let adapter = adapter(backend.clone(), reader.clone());

        let err = adapter.extract(TextSource::Pdf(vec![1, 2, 3])).await.unwrap_err();
        assert_eq!(err.reason(), "no-text-layer");
        assert_eq!(backend.call_count(), 0);
        assert_eq!(reader.call_count(), 1);
    }

    #[tokio::test]
    async fn unparseable_pdf_is_reported() {
        let backend = Arc::new(ScriptedBackend::replying(Vec::<String>::new()));
        let adapter = adapter(backend, Arc::new(FixedTextReader::broken("bad xref table")));

        let err = adapter.extract(TextSource::Pdf(vec![0])).await.unwrap_err();
        assert_eq!(err, ExtractionError::UnreadablePdf { detail: "bad xref table".into() });
    }

    #[tokio::test]
    async fn scanned_image_is_recognized_with_ocr_prompt() {
        let backend = Arc::new(ScriptedBackend::replying(["CONSENT FOR CATARACT SURGERY"]));
        let reader = Arc::new(FixedTextReader::new(""));
        let adapter = adapter(backend.clone(), reader.clone());

        let doc = adapter
            .extract(TextSource::scan(InlineImage::jpeg(vec![0xff, 0xd8])))
            .await
            .unwrap();
        assert_eq!(doc.origin(), TextOrigin::Scan);
        assert_eq!(doc.content(), "CONSENT FOR CATARACT SURGERY");
        assert_eq!(reader.call_count(), 0);

        let requests = backend.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].prompt, OCR_PROMPT);
        assert_eq!(requests[0].inline_image.as_ref().unwrap().mime_type, "image/jpeg");
    }

    #[tokio::test]
    async fn empty_recognition_is_distinct_from_missing_text_layer() {
        let backend = Arc::new(ScriptedBackend::replying(["   "]));
        let reader = Arc::new(FixedTextReader::new(""));
        let adapter = adapter(backend, reader.clone());
        let source = TextSource::Image { image: InlineImage::jpeg(vec![1]), origin: TextOrigin::Upload };

        let err = adapter.extract(source).await.unwrap_err();
        assert_eq!(err.reason(), "no-recognized-text");
        assert_eq!(reader.call_count(), 0);
    }

    #[tokio::test]
    async fn recognition_backend_failure_is_wrapped() {
        let backend = Arc::new(ScriptedBackend::failing(BackendError::Transport { reason: "reset".into() }));
        let adapter = adapter(backend, Arc::new(FixedTextReader::new("")));
        let source = TextSource::capture("data:image/jpeg;base64,/9j/4AAQ").unwrap();

        let err = adapter.extract(source).await.unwrap_err();
        assert_eq!(err.reason(), "backend-failure");
        assert!(matches!(err, ExtractionError::Backend(BackendError::Transport { .. })));
    }

    // ── pdf-extract ───────────────────────────────────────────────────────────

    #[test]
    fn pdf_extract_reader_rejects_garbage() {
        assert!(PdfExtractReader.read_text(b"not a pdf at all").is_err());
    }

    #[test]
    fn pdf_extract_reader_reads_text_layer() {
        let pdf = single_page_pdf("BT /F1 12 Tf 72 720 Td (Consent for appendectomy) Tj ET");
        let text = PdfExtractReader.read_text(&pdf).unwrap();
        assert!(text.contains("appendectomy"), "extracted {text:?}");
    }

    #[tokio::test]
    async fn image_only_pdf_is_no_text_layer() {
        let backend = Arc::new(ScriptedBackend::replying(Vec::<String>::new()));
        let adapter = TextSourceAdapter::new(backend.clone(), Arc::new(PdfExtractReader), DEFAULT_TIMEOUT);

        let err = adapter.extract(TextSource::Pdf(single_page_pdf(""))).await.unwrap_err();
        assert_eq!(err, ExtractionError::NoTextLayer);
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn real_pdf_flows_through_adapter() {
        let backend = Arc::new(ScriptedBackend::replying(Vec::<String>::new()));
        let adapter = TextSourceAdapter::new(backend, Arc::new(PdfExtractReader), DEFAULT_TIMEOUT);
        let pdf = single_page_pdf("BT /F1 12 Tf 72 720 Td (Risks include bleeding) Tj ET");

        let doc = adapter.extract(TextSource::Pdf(pdf)).await.unwrap();
        assert_eq!(doc.origin(), TextOrigin::Upload);
        assert!(doc.content().contains("bleeding"));
    }
}
