// Prompt assembly for description and image generation
// Author: kelexine (https://github.com/kelexine)

use super::GenerationRequest;

/// System instruction sent with every description request.
pub const SYSTEM_MESSAGE: &str = "You are an advanced marketing copywriter assistant \
specializing in compelling product descriptions. Follow the user instructions precisely \
and format your response into labeled sections. Ensure the Body section always has at \
least one substantial paragraph with engaging content. Use persuasive language and focus \
on benefits rather than just features.";

/// Assemble the structured user prompt: one line per non-empty field, a
/// style directive switched by the viral flag, the labeled-section output
/// contract, and any extra instructions appended verbatim (they were already
/// sanitized upstream).
pub fn build_user_prompt(request: &GenerationRequest) -> String {
    let mut lines = vec![format!("Product Name: {}", request.product_name)];

    let optional = [
        ("Product Details", &request.product_details),
        ("Language", &request.language),
        ("Tone", &request.tone),
        ("SEO Keywords", &request.keywords),
        ("Target Audience", &request.audience),
        ("Platform", &request.platform),
        ("Unique Selling Points", &request.usps),
        ("CTA Style", &request.cta_style),
    ];
    for (label, value) in optional {
        if !value.is_empty() {
            lines.push(format!("{}: {}", label, value));
        }
    }

    if request.viral {
        lines.push("Include emotional triggers, social proof, and FOMO for a viral effect.".to_string());
    } else {
        lines.push("Avoid explicit FOMO or hype; keep it persuasive yet balanced.".to_string());
    }

    let mut instructions = String::from(
        "Write a compelling product description with these labeled sections:\n\
         Hook: (A short, attention-grabbing opening line)\n\
         Body: (At least one full paragraph describing benefits and features)\n\
         CTA: (A clear call-to-action)\n\n\
         Then provide a line labeled 'Suggested Hashtags and Keywords:' at the end. \
         Make sure each section is clearly marked.",
    );

    if !request.extra_instructions.is_empty() {
        instructions.push_str("\nAdditional instructions:\n");
        instructions.push_str(&request.extra_instructions);
    }

    format!("{}\n\n{}", lines.join("\n"), instructions)
}

/// Image prompt for a product shot; explicitly forbids embedded text, logos,
/// and branding.
pub fn build_image_prompt(product_name: &str) -> String {
    format!(
        "Generate a realistic, high-quality image of the product: {}. \
         Do not include any text, logos, or branding.",
        product_name
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::JobSubmission;

    fn request_for(job: JobSubmission) -> GenerationRequest {
        GenerationRequest::from_submission(&job)
    }

    #[test]
    fn test_prompt_contains_section_contract() {
        let request = request_for(JobSubmission {
            product_name: "Trail Pack".to_string(),
            ..Default::default()
        });
        let prompt = build_user_prompt(&request);
        assert!(prompt.contains("Hook:"));
        assert!(prompt.contains("Body:"));
        assert!(prompt.contains("CTA:"));
        assert!(prompt.contains("Suggested Hashtags and Keywords:"));
    }

    #[test]
    fn test_empty_fields_omitted() {
        let request = request_for(JobSubmission {
            product_name: "Trail Pack".to_string(),
            keywords: String::new(),
            audience: String::new(),
            ..Default::default()
        });
        let prompt = build_user_prompt(&request);
        assert!(prompt.contains("Product Name: Trail Pack"));
        assert!(!prompt.contains("SEO Keywords:"));
        assert!(!prompt.contains("Target Audience:"));
    }

    #[test]
    fn test_viral_flag_switches_style_directive() {
        let viral = request_for(JobSubmission {
            product_name: "Trail Pack".to_string(),
            viral: "Yes".to_string(),
            ..Default::default()
        });
        let prompt = build_user_prompt(&viral);
        assert!(prompt.contains("FOMO for a viral effect"));

        let balanced = request_for(JobSubmission {
            product_name: "Trail Pack".to_string(),
            ..Default::default()
        });
        let prompt = build_user_prompt(&balanced);
        assert!(prompt.contains("persuasive yet balanced"));
    }

    #[test]
    fn test_extra_instructions_appended() {
        let request = request_for(JobSubmission {
            product_name: "Trail Pack".to_string(),
            extra_instructions: "Mention the lifetime warranty".to_string(),
            ..Default::default()
        });
        let prompt = build_user_prompt(&request);
        assert!(prompt.contains("Additional instructions:\nMention the lifetime warranty"));
    }

    #[test]
    fn test_image_prompt_forbids_branding() {
        let prompt = build_image_prompt("Trail Pack");
        assert!(prompt.contains("Trail Pack"));
        assert!(prompt.contains("Do not include any text, logos, or branding"));
    }
}
