//! Prompt composition for the generative API calls.
//!
//! The image prompt bakes in the per-variation composition hint so the three
//! variations of a batch diverge visually instead of being three samples of
//! the same instruction.

/// Per-variation composition hints; the variation index selects one.
pub const VARIATION_HINTS: &[&str] = &[
    "Dynamic close-up, high contrast, vibrant cinematic colors, focus on main subject.",
    "Cinematic wide angle, dramatic depth of field, atmospheric lighting, professional composition.",
    "Action-heavy scene, bold saturation, high energy, extreme attention-grabbing detail.",
];

/// Build the system prompt for one image variation.
pub fn compose_image_prompt(prompt: &str, style: &str, index: u32) -> String {
    let hint = VARIATION_HINTS[index as usize % VARIATION_HINTS.len()];
    format!(
        "Generate a professional, family-friendly viral high-CTR YouTube thumbnail image.\n\
         CONCEPT: \"{prompt}\"\n\
         VISUAL STYLE: {style}\n\
         COMPOSITION: {hint}\n\n\
         IMPORTANT GUIDELINES:\n\
         1. Create a safe, appropriate, and professional thumbnail suitable for all audiences.\n\
         2. Do not include any text, letters, or numbers in the image.\n\
         3. If people are in the provided assets, incorporate them naturally and professionally into the scene.\n\
         4. Ensure the result is 16:9 aspect ratio, high definition.\n\
         5. Focus on clarity, high impact, and visual appeal.\n\
         6. Keep content appropriate, professional, and suitable for YouTube's community guidelines."
    )
}

/// Build the structured-output prompt asking for one title per image plus a
/// shared description.
pub fn compose_metadata_prompt(prompt: &str, style: &str, image_urls: &[String]) -> String {
    format!(
        "Generate {count} viral clickbait titles and one shared description for a set of \
         YouTube thumbnails.\n\
         Concept: \"{prompt}\"\n\
         Visual style: {style}\n\
         Thumbnails: {urls}",
        count = image_urls.len(),
        urls = image_urls.join(", "),
    )
}

/// Build the scoring rubric for CTR analysis of a single thumbnail.
pub fn compose_scoring_prompt(prompt: &str) -> String {
    format!(
        "Analyze this YouTube thumbnail for the concept: \"{prompt}\".\n\
         Evaluate it based on:\n\
         1. Visual Hierarchy (is the subject clear?)\n\
         2. Color Palette (is it eye-catching?)\n\
         3. Emotional Trigger (does it provoke curiosity?)\n\n\
         Return a JSON object with:\n\
         - score (0-100)\n\
         - label (e.g., \"Viral Potential\", \"Needs Work\", \"Algorithm Bait\")\n\
         - feedback (one sentence of specific advice)"
    )
}

/// Build the free-text prompt-enhancement instruction.
pub fn compose_enhancement_prompt(prompt: &str) -> String {
    format!(
        "Enhance this idea for an AI image generator focusing on cinematic lighting \
         and composition: {prompt}"
    )
}

// ---------------------------------------------------------------------------
// Data-URL helpers
// ---------------------------------------------------------------------------

/// Extract the MIME type from a `data:` URL, defaulting to `image/jpeg`.
pub fn mime_type_of(data_url: &str) -> &str {
    data_url
        .strip_prefix("data:")
        .and_then(|rest| rest.split_once(";base64,"))
        .map(|(mime, _)| mime)
        .filter(|mime| !mime.is_empty())
        .unwrap_or("image/jpeg")
}

/// Extract the base64 payload from a `data:` URL, if it is one.
pub fn base64_payload_of(data_url: &str) -> Option<&str> {
    data_url
        .strip_prefix("data:")
        .and_then(|rest| rest.split_once(";base64,"))
        .map(|(_, payload)| payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_prompt_embeds_concept_style_and_hint() {
        let prompt = compose_image_prompt("Epic Explosion", "Gaming High Energy", 1);
        assert!(prompt.contains("CONCEPT: \"Epic Explosion\""));
        assert!(prompt.contains("VISUAL STYLE: Gaming High Energy"));
        assert!(prompt.contains(VARIATION_HINTS[1]));
    }

    #[test]
    fn image_prompt_hint_wraps_past_known_variations() {
        let prompt = compose_image_prompt("x", "y", 4);
        assert!(prompt.contains(VARIATION_HINTS[1]));
    }

    #[test]
    fn mime_type_parses_data_urls() {
        assert_eq!(mime_type_of("data:image/png;base64,AAAA"), "image/png");
        assert_eq!(mime_type_of("data:image/webp;base64,BBBB"), "image/webp");
        assert_eq!(mime_type_of("https://example.com/a.png"), "image/jpeg");
    }

    #[test]
    fn base64_payload_extracted_only_from_data_urls() {
        assert_eq!(base64_payload_of("data:image/png;base64,AAAA"), Some("AAAA"));
        assert_eq!(base64_payload_of("https://example.com/a.png"), None);
    }
}
