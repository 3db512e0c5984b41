//! Prompt templates for each backend operation.
//!
//! Document and question text are embedded verbatim. Callers log prompt
//! lengths only, never the prompts themselves.

use consentlab_contracts::language::Language;

pub const OCR_PROMPT: &str =
    "Extract all text from this medical consent form image. Provide the complete text content.";

/// The exact phrase the Q&A prompt asks the model to use when the consent form
/// does not answer a question.
pub const UNSURE_PHRASE: &str = "I'm not sure about that specific detail";

pub fn analysis_prompt(consent_text: &str) -> String {
    format!(
        "Analyze this medical consent form and provide:\n\
         1. A simplified summary in plain language (3-5 sentences)\n\
         2. Risk level (exactly one of: low, medium, high)\n\
         3. Key risk factors (list 3-5 main risks)\n\
         \n\
         Consent Form:\n\
         {consent_text}\n\
         \n\
         Respond ONLY in JSON format:\n\
         {{\n  \"summary\": \"...\",\n  \"riskLevel\": \"low|medium|high\",\n  \"riskFactors\": [\"risk1\", \"risk2\", ...]\n}}"
    )
}

pub fn translation_prompt(text: &str, language: Language) -> String {
    format!(
        "Translate the following medical consent text to {}. Maintain medical accuracy and clarity:\n\n{text}",
        language.name()
    )
}

pub fn question_prompt(question: &str, consent_text: &str, language: Language) -> String {
    format!(
        "You are a friendly medical assistant helping patients understand their consent forms. \
         Answer in {language}.\n\
         \n\
         IMPORTANT RULES:\n\
         - Keep answers SHORT (2-3 sentences maximum)\n\
         - Use SIMPLE, everyday language\n\
         - Be warm and conversational like talking to a friend\n\
         - Avoid medical jargon\n\
         - Only use information from the consent form below\n\
         - If you don't know, say \"{UNSURE_PHRASE}\"\n\
         \n\
         Consent Form:\n\
         {consent_text}\n\
         \n\
         Patient asks: {question}\n\
         \n\
         Give a brief, simple, friendly answer:",
        language = language.name()
    )
}

pub fn report_prompt(report_text: &str) -> String {
    format!(
        "Extract patient information from this medical report and return ONLY a JSON object with these exact fields:\n\
         {{\n\
         \x20 \"patient_name\": \"full name\",\n\
         \x20 \"age\": \"age as number\",\n\
         \x20 \"gender\": \"Male/Female/Other\",\n\
         \x20 \"disease\": \"primary diagnosis\",\n\
         \x20 \"treatment_course\": \"recommended treatment\",\n\
         \x20 \"notes\": \"any additional relevant information\"\n\
         }}\n\
         \n\
         Report text:\n\
         {report_text}\n\
         \n\
         Return ONLY the JSON, no other text."
    )
}
