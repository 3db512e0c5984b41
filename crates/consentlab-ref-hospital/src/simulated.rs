//! Deterministic stand-ins for the external collaborators.
//!
//! `SimulatedBackend` answers each pipeline prompt the way a generative model
//! plausibly would, chosen from the prompt's shape and the mock documents it
//! embeds. `MockPdfReader` reads the text layer out of `mock_pdf` bytes.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use consentlab_contracts::{
    backend::{GenerateRequest, GenerateResponse},
    error::BackendError,
};
use consentlab_core::{prompts::UNSURE_PHRASE, GenerativeBackend, TextLayerReader};

use crate::mock_data::{CATARACT_CONSENT, MOCK_PDF_HEADER};

// ── Canned replies ───────────────────────────────────────────────────────────

const APPENDECTOMY_ANALYSIS: &str = r#"Here is the analysis of the consent form:

```json
{
  "summary": "Doctors will remove your appendix through three small cuts in your belly while you are asleep. Most people go home in one or two days. You should avoid lifting heavy things for about a month.",
  "riskLevel": "Medium",
  "riskFactors": ["Bleeding", "Infection of the wound or belly", "Injury to the bowel or bladder", "Reaction to anesthesia"]
}
```"#;

const CATARACT_ANALYSIS: &str = r#"{"summary": "The cloudy lens in your right eye will be replaced with a clear artificial lens. Your eye will be numbed and you will stay awake. You will use eye drops and wear a shield at night for a week.", "riskLevel": "low", "riskFactors": ["Blurred vision for a while", "Eye infection", "Raised eye pressure"]}"#;

const BYPASS_ANALYSIS: &str = r#"{"summary": "Surgeons will use blood vessels from your leg or chest to go around blocked heart arteries. A machine will pump your blood while your heart is stopped. This is a major operation with serious possible risks.", "riskLevel": "high", "riskFactors": ["Heart attack", "Stroke", "Kidney failure", "Bleeding needing transfusion", "Death in about 2 of 100 patients"]}"#;

const EXPERIMENTAL_ANALYSIS: &str = r#"{"summary": "This is a trial of a new gene treatment.", "riskLevel": "severe", "riskFactors": ["Unknown long-term effects"]}"#;

const GENERIC_ANALYSIS: &str = r#"{"summary": "This form describes a medical procedure and its risks.", "riskLevel": "medium", "riskFactors": ["General procedural risks"]}"#;

const REPORT_EXTRACTION: &str = r#"```json
{
  "patient_name": "Meera Iyer",
  "gender": "Female",
  "disease": "Acute appendicitis",
  "treatment_course": "Laparoscopic appendectomy",
  "notes": "Allergic to penicillin; lives alone, arrange follow-up"
}
```"#;

// ── SimulatedBackend ─────────────────────────────────────────────────────────

/// A `GenerativeBackend` with scripted, prompt-driven answers.
///
/// Every request is recorded. `set_outage(true)` makes every later call fail
/// with HTTP 503 until cleared.
#[derive(Default)]
pub struct SimulatedBackend {
    requests: Arc<Mutex<Vec<GenerateRequest>>>,
    outage: AtomicBool,
}

impl SimulatedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_outage(&self, down: bool) {
        self.outage.store(down, Ordering::SeqCst);
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .last()
            .map(|r| r.prompt.clone())
    }

    fn reply_for(request: &GenerateRequest) -> String {
        let prompt = request.prompt.as_str();

        if request.inline_image.is_some() {
            return CATARACT_CONSENT.to_string();
        }
        if prompt.starts_with("Analyze this medical consent form") {
            return analysis_for(prompt).to_string();
        }
        if let Some(rest) = prompt.strip_prefix("Translate the following medical consent text to ") {
            return translation_for(rest);
        }
        if prompt.starts_with("You are a friendly medical assistant") {
            return answer_for(prompt);
        }
        if prompt.starts_with("Extract patient information") {
            return REPORT_EXTRACTION.to_string();
        }
        "I'm not able to help with that request.".to_string()
    }
}

#[async_trait]
impl GenerativeBackend for SimulatedBackend {
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, BackendError> {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).push(request.clone());

        if self.outage.load(Ordering::SeqCst) {
            return Err(BackendError::Http { status: 503, body: "model overloaded".to_string() });
        }
        Ok(GenerateResponse::new(Self::reply_for(request)))
    }

    fn name(&self) -> &str {
        "simulated-gemini"
    }
}

fn analysis_for(prompt: &str) -> &'static str {
    if prompt.contains("APPENDECTOMY") {
        APPENDECTOMY_ANALYSIS
    } else if prompt.contains("CATARACT") {
        CATARACT_ANALYSIS
    } else if prompt.contains("CORONARY ARTERY BYPASS") {
        BYPASS_ANALYSIS
    } else if prompt.contains("EXPERIMENTAL") {
        EXPERIMENTAL_ANALYSIS
    } else {
        GENERIC_ANALYSIS
    }
}

/// `rest` is "{Language}. Maintain medical accuracy and clarity:\n\n{text}".
fn translation_for(rest: &str) -> String {
    let language = rest.split('.').next().unwrap_or_default();
    match language {
        "Hindi" => "डॉक्टर आपके पेट में तीन छोटे चीरों से आपका अपेंडिक्स निकालेंगे, जब आप बेहोश होंगे। \
                    ज़्यादातर लोग एक या दो दिन में घर चले जाते हैं। लगभग एक महीने तक भारी सामान न उठाएँ।"
            .to_string(),
        "Tamil" => "நீங்கள் தூங்கும் போது மருத்துவர்கள் உங்கள் வயிற்றில் மூன்று சிறிய வெட்டுகள் மூலம் \
                    உங்கள் குடல்வாலை அகற்றுவார்கள்."
            .to_string(),
        other => {
            let text = rest.split_once("\n\n").map(|(_, t)| t).unwrap_or_default();
            format!("[{other}] {text}")
        }
    }
}

fn answer_for(prompt: &str) -> String {
    let question = prompt
        .lines()
        .find_map(|line| line.strip_prefix("Patient asks: "))
        .unwrap_or_default()
        .to_lowercase();
    let hindi = prompt.contains("Answer in Hindi.");

    if question.contains("home") || question.contains("recover") {
        if hindi {
            "ज़्यादातर लोग ऑपरेशन के एक या दो दिन बाद घर चले जाते हैं। लगभग दो हफ्ते में आप सामान्य काम कर पाएँगे।"
                .to_string()
        } else {
            "Most people go home one or two days after the operation. You should be back to normal in about two weeks."
                .to_string()
        }
    } else if question.contains("bleed") || question.contains("risk") {
        if hindi {
            "हाँ, थोड़ा खून बहने और संक्रमण का खतरा होता है। डॉक्टर इस पर ध्यान रखेंगे।".to_string()
        } else {
            "There is a small chance of bleeding or infection. Your care team will watch for both.".to_string()
        }
    } else {
        format!("{UNSURE_PHRASE}. Please ask your doctor.")
    }
}

// ── MockPdfReader ────────────────────────────────────────────────────────────

/// Reads the text layer of bytes built by `mock_data::mock_pdf`.
#[derive(Debug, Default, Clone, Copy)]
pub struct MockPdfReader;

impl TextLayerReader for MockPdfReader {
    fn read_text(&self, pdf: &[u8]) -> Result<String, String> {
        let body = pdf
            .strip_prefix(MOCK_PDF_HEADER)
            .ok_or_else(|| "missing %PDF header".to_string())?;
        String::from_utf8(body.to_vec()).map_err(|e| format!("corrupt text layer: {e}"))
    }
}
