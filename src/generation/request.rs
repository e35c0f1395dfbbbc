// Inbound job payload, validation, and the normalized request form
// Author: kelexine (https://github.com/kelexine)

use crate::cache::make_key;
use crate::utils::sanitize_prompt_input;
use serde::Deserialize;
use std::collections::BTreeMap;

const MAX_PRODUCT_NAME_CHARS: usize = 100;
const MAX_PRODUCT_DETAILS_CHARS: usize = 1000;
const MAX_KEYWORDS_CHARS: usize = 200;
const MAX_EXTRA_INSTRUCTIONS_CHARS: usize = 500;

/// Raw job fields as submitted over the session, before sanitization.
#[derive(Debug, Clone, Deserialize)]
pub struct JobSubmission {
    #[serde(default)]
    pub product_name: String,
    #[serde(default)]
    pub product_details: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_tone")]
    pub tone: String,
    #[serde(default)]
    pub keywords: String,
    #[serde(default)]
    pub audience: String,
    #[serde(default)]
    pub platform: String,
    #[serde(default)]
    pub usps: String,
    #[serde(default)]
    pub cta_style: String,
    /// "Yes" switches the viral style directive on; any other value is off.
    #[serde(default)]
    pub viral: String,
    #[serde(default)]
    pub extra_instructions: String,
    #[serde(default)]
    pub generate_image: bool,
}

fn default_language() -> String {
    "English".to_string()
}

fn default_tone() -> String {
    "Professional".to_string()
}

impl Default for JobSubmission {
    fn default() -> Self {
        Self {
            product_name: String::new(),
            product_details: String::new(),
            language: default_language(),
            tone: default_tone(),
            keywords: String::new(),
            audience: String::new(),
            platform: String::new(),
            usps: String::new(),
            cta_style: String::new(),
            viral: String::new(),
            extra_instructions: String::new(),
            generate_image: false,
        }
    }
}

impl JobSubmission {
    /// Check field bounds, reporting every violation at once keyed by field
    /// name. Runs on the raw input, before sanitization.
    pub fn validate(&self) -> Result<(), BTreeMap<String, String>> {
        let mut errors = BTreeMap::new();

        if self.product_name.trim().is_empty() {
            errors.insert(
                "product_name".to_string(),
                "Product name is required".to_string(),
            );
        } else if self.product_name.chars().count() > MAX_PRODUCT_NAME_CHARS {
            errors.insert(
                "product_name".to_string(),
                "Product name must be under 100 characters".to_string(),
            );
        }

        if self.product_details.chars().count() > MAX_PRODUCT_DETAILS_CHARS {
            errors.insert(
                "product_details".to_string(),
                "Product details must be under 1000 characters".to_string(),
            );
        }

        if self.keywords.chars().count() > MAX_KEYWORDS_CHARS {
            errors.insert(
                "keywords".to_string(),
                "Keywords must be under 200 characters".to_string(),
            );
        }

        if self.extra_instructions.chars().count() > MAX_EXTRA_INSTRUCTIONS_CHARS {
            errors.insert(
                "extra_instructions".to_string(),
                "Extra instructions must be under 500 characters".to_string(),
            );
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Normalized, sanitized generation parameters. Immutable once constructed;
/// owned by the job that created it.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub product_name: String,
    pub product_details: String,
    pub language: String,
    pub tone: String,
    pub keywords: String,
    pub audience: String,
    pub platform: String,
    pub usps: String,
    pub cta_style: String,
    pub viral: bool,
    pub extra_instructions: String,
}

impl GenerationRequest {
    /// Sanitize every free-text field of a validated submission.
    pub fn from_submission(job: &JobSubmission) -> Self {
        Self {
            product_name: sanitize_prompt_input(&job.product_name),
            product_details: sanitize_prompt_input(&job.product_details),
            language: sanitize_prompt_input(&job.language),
            tone: sanitize_prompt_input(&job.tone),
            keywords: sanitize_prompt_input(&job.keywords),
            audience: sanitize_prompt_input(&job.audience),
            platform: sanitize_prompt_input(&job.platform),
            usps: sanitize_prompt_input(&job.usps),
            cta_style: sanitize_prompt_input(&job.cta_style),
            viral: job.viral == "Yes",
            extra_instructions: sanitize_prompt_input(&job.extra_instructions),
        }
    }

    /// Cache fingerprint over every normalized field plus the model id.
    /// A pure function of the sanitized request: logically-identical jobs
    /// always collide.
    pub fn fingerprint(&self, model: &str) -> String {
        let viral = if self.viral { "true" } else { "false" };
        make_key(
            "product_description",
            &[
                ("product_name", self.product_name.as_str()),
                ("product_details", self.product_details.as_str()),
                ("language", self.language.as_str()),
                ("tone", self.tone.as_str()),
                ("keywords", self.keywords.as_str()),
                ("audience", self.audience.as_str()),
                ("platform", self.platform.as_str()),
                ("usps", self.usps.as_str()),
                ("cta_style", self.cta_style.as_str()),
                ("viral_flag", viral),
                ("extra_instructions", self.extra_instructions.as_str()),
                ("model", model),
            ],
        )
    }
}
