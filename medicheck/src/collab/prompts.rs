//! Prompt templates and the default insurance policy for the LLM collaborators.
//!
//! Each prompt asks for a strict JSON answer whose field names match the
//! verdict structs in `collab`; the caller fills the `{...}` placeholders
//! with `str::replace`.

/// Guardrail classification. Placeholder: `{json_data}`.
pub const GUARDRAIL_PROMPT: &str = r#"You are an expert clinical document classifier. A user uploads a JSON document. Determine whether it represents a clinical summary intended for insurance approval (for example, an inpatient hospitalization claim).

Answer with JSON only, in exactly this shape:
{
  "is_in_domain": true/false,
  "explanation": "A polite message for the user; if the document is not an insurance clinical summary, explain what is missing or why it is not valid."
}

Uploaded JSON:
{json_data}
"#;

/// Field validation with suggestions. Placeholders: `{json_data}`, `{example_json}`.
pub const VALIDATOR_PROMPT: &str = r#"You are an expert clinical documentation reviewer. Check the clinical summary below for completeness against the example structure: patient demographics (full name, age, gender, insurance id), history of present illness (chief complaint, duration, onset, associated symptoms, documentation date), procedures and treatments, imaging and lab results, diagnosis and discharge summary (final diagnosis, ICD-10 code, treatment summary, discharge plan), and physician signature (attending physician, date of report, digital signature).

Answer with JSON only, in exactly this shape:
{
  "is_valid": true/false,
  "missing_fields": ["dotted.path.of.each.missing.field"],
  "suggestions": ["Actionable suggestions for completing the summary."]
}

Clinical summary:
{json_data}

Example of a complete summary:
{example_json}
"#;

/// Policy evaluation. Placeholders: `{policy}`, `{json_data}`.
pub const POLICY_EVAL_PROMPT: &str = r#"You are an expert insurance policy evaluator. Given the insurance policy and a patient's clinical summary (JSON), decide whether the patient is eligible for insurance approval under the policy.

Answer with JSON only, in exactly this shape:
{
  "approved": true/false,
  "failed_criteria": ["Each policy criterion the summary fails."],
  "explanation": "A clear message for the user about approval or denial and why."
}

Insurance policy:
{policy}

Patient clinical summary:
{json_data}
"#;

/// Document extraction from raw text. Placeholder: `{source_text}`.
pub const EXTRACTION_PROMPT: &str = r#"You are an expert at reading clinical documents. Extract a structured clinical summary from the raw document text below as a single JSON object with these sections: patient_demographics, hpi, procedures_treatments, imaging_lab_results, diagnosis_discharge_summary, physician_signature. Use null for values the text does not provide.

If the text does not contain a clinical summary at all, answer instead with:
{
  "rejected": true,
  "explanation": "A polite message telling the user why no clinical summary could be extracted."
}

Document text:
{source_text}
"#;

/// Free-text summary generation. Placeholder: `{json_data}`.
pub const SUMMARY_PROMPT: &str = r#"You are a clinical documentation assistant. Write a clear prose summary of about 250 words of the clinical summary JSON below, covering the patient, presentation, treatment, and discharge plan. Answer with the summary text only.

Clinical summary:
{json_data}
"#;

/// Compact example of a complete clinical summary, shown to the validator model.
pub const EXAMPLE_SUMMARY: &str = r#"{
  "patient_demographics": {
    "full_name": "Jane Doe",
    "age": 62,
    "gender": "female",
    "insurance_id": "INS-204876"
  },
  "hpi": {
    "chief_complaint": "Chest pain",
    "duration": "2 days",
    "onset": "Sudden, at rest",
    "associated_symptoms": ["shortness of breath", "diaphoresis"],
    "documentation_date": "2024-11-02"
  },
  "procedures_treatments": ["Coronary angiography", "Drug-eluting stent placement"],
  "imaging_lab_results": ["Troponin I elevated", "ECG: ST depression in V4-V6"],
  "diagnosis_discharge_summary": {
    "final_diagnosis": "Non-ST elevation myocardial infarction",
    "icd_10_code": "I21.4",
    "treatment_summary": "PCI with stent to LAD; dual antiplatelet therapy started.",
    "discharge_plan": "Cardiology follow-up in 2 weeks; cardiac rehabilitation."
  },
  "physician_signature": {
    "attending_physician": "Dr. A. Mensah",
    "date_of_report": "2024-11-05",
    "digital_signature": "signed/AM-8841"
  }
}"#;

/// Default insurance approval criteria, used when no policy text is supplied.
pub const DEFAULT_POLICY: &str = r#"Insurance Approval Criteria

Patient Profile
- Age is greater than 50 years.
- Weight is less than 80 kg.
- No history of:
  - Alcohol consumption.
  - Smoking.
  - Substance addiction.

Clinical Justification
- Clear and recent documentation of symptoms.
- Stable and recorded vital signs:
  - Blood pressure, heart rate, temperature.
- Medical history supports the need for the procedure.

Supporting Evidence
- Recent lab results are available and relevant.
  - Blood tests, imaging reports, or diagnostic scans.
- Procedure is recommended by a treating physician.
- Referral note or clinical summary is attached.
"#;
