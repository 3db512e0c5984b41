//! Simulated hospital data for the ConsentLab reference runtime.
//!
//! All data in this module is hardcoded and fictional. Consent forms, reports,
//! and staff accounts stand in for what a hospital would upload or store.

use consentlab_contracts::session::{HospitalUser, StaffRole};

// ── Consent forms (mock) ─────────────────────────────────────────────────────

pub const APPENDECTOMY_CONSENT: &str = "\
INFORMED CONSENT FOR LAPAROSCOPIC APPENDECTOMY

Procedure: Removal of the appendix through three small abdominal incisions \
using a camera and instruments, under general anesthesia.

Expected benefits: Relief of abdominal pain and prevention of appendix rupture.

Risks: Bleeding; wound or abdominal infection; injury to the bowel or bladder; \
reaction to anesthesia; conversion to open surgery if the appendix cannot be \
removed safely.

Recovery: Most patients go home within 24 to 48 hours and return to normal \
activity in about two weeks. Avoid lifting heavy objects for four weeks.

Alternatives: Antibiotic treatment alone, which carries a risk of recurrence.";

/// Printed on paper and photographed; reaches the pipeline as an image.
pub const CATARACT_CONSENT: &str = "\
CONSENT FOR CATARACT SURGERY (PHACOEMULSIFICATION)

The cloudy lens of your right eye will be broken up with ultrasound and \
replaced with an artificial lens. The eye is numbed with drops; you stay awake.

Risks: Temporary blurred vision; eye infection; raised eye pressure; \
swelling of the retina; rarely, detachment of the retina.

You will wear an eye shield at night for one week and use antibiotic drops \
four times a day.";

pub const CORONARY_BYPASS_CONSENT: &str = "\
CONSENT FOR CORONARY ARTERY BYPASS GRAFTING

Blood vessels from your leg or chest will be used to bypass blocked heart \
arteries. Your heart will be stopped and a heart-lung machine will keep blood \
flowing during the operation.

Risks: Heart attack; stroke; kidney failure; bleeding needing transfusion; \
infection of the chest wound; irregular heartbeat; death (about 2 in 100).";

/// A form whose simulated analysis comes back with an unusable risk level.
pub const EXPERIMENTAL_THERAPY_CONSENT: &str = "\
CONSENT FOR EXPERIMENTAL GENE THERAPY TRIAL

You will receive an investigational treatment that has not been approved. \
Long-term effects are unknown.";

// ── Medical report (mock) ────────────────────────────────────────────────────

/// A referral letter with no stated age.
pub const REFERRAL_REPORT: &str = "\
REFERRAL LETTER - SURGICAL OUTPATIENTS

Patient: Meera Iyer
Sex: Female

Presenting complaint: Right lower abdominal pain for two days, fever, nausea.
Examination: Tenderness at McBurney's point. WBC 14,200.
Impression: Acute appendicitis.
Plan: Laparoscopic appendectomy. Keep nil by mouth.
Notes: Allergic to penicillin. Lives alone; arrange post-discharge follow-up.";

// ── Mock documents ───────────────────────────────────────────────────────────

/// Header marking bytes produced by `mock_pdf`.
pub const MOCK_PDF_HEADER: &[u8] = b"%PDF-mock\n";

/// A stand-in PDF whose text layer is `text`. An empty `text` models an
/// image-only scan saved as PDF.
pub fn mock_pdf(text: &str) -> Vec<u8> {
    let mut bytes = MOCK_PDF_HEADER.to_vec();
    bytes.extend_from_slice(text.as_bytes());
    bytes
}

/// A camera snapshot of the printed cataract consent form, as a data URL.
pub const CATARACT_CAPTURE_DATA_URL: &str = "data:image/jpeg;base64,/9j/4AAQSkZJRgABAQAAAQABAAD/2wBD";

// ── Staff accounts (mock) ────────────────────────────────────────────────────

pub fn consent_officer() -> HospitalUser {
    HospitalUser {
        id: "staff-0117".to_string(),
        email: "r.menon@sunrise-hospital.example".to_string(),
        role: StaffRole::ConsentOfficer,
        hospital_name: "Sunrise Multispeciality Hospital".to_string(),
        full_name: "Radhika Menon".to_string(),
    }
}

pub fn attending_surgeon() -> HospitalUser {
    HospitalUser {
        id: "staff-0042".to_string(),
        email: "a.khan@sunrise-hospital.example".to_string(),
        role: StaffRole::Doctor,
        hospital_name: "Sunrise Multispeciality Hospital".to_string(),
        full_name: "Dr. Arif Khan".to_string(),
    }
}
