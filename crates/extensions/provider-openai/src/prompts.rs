//! Prompt templates.

use vibey_protocols::AnalysisResult;

/// User prompt asking for a JSON verdict on a post.
pub fn analysis_prompt(post_text: &str) -> String {
    format!(
        "Analyze this tweet: \"{post_text}\"\n\n\
         Is this about leadership, business, startups, or controversial topics? \
         Is it engaging enough to comment on? Reply ONLY with JSON: \
         {{\"worth_commenting\": true/false, \"topic\": \"brief topic\", \
         \"vibe\": \"professional/casual/controversial\"}}"
    )
}

/// System prompt for writing a reply in a plain, brief register.
pub fn reply_system_prompt(post_text: &str, analysis: &AnalysisResult) -> String {
    format!(
        "You write Twitter replies like a real person on Reddit. Be direct, cut the fluff, \
         speak in plain facts.

RULES:
- NO em dashes (\u{2014})
- NO rhetoric stacking (\"not just X, but Y\")
- NO additive framing (\"more than\", \"beyond\")
- NO filler words: \"actually\", \"notably\", \"essentially\", \"fundamentally\", \"truly\"
- NO fancy/official language
- Use radical brevity - cut everything unnecessary
- Short, heavy words
- Sound like giving a straight answer, not a sales pitch
- Match the vibe: {vibe}
- Keep under 280 characters
- No hashtags unless natural
- No emojis unless it fits

Topic: {topic}

WRONG: \"Hedera doesn't care about the hype. It's built to actually stay standing when the pressure is on.\"
RIGHT: \"Hedera is strong. It just keeps running when others break.\"

Reply to: \"{post_text}\"

Write ONLY the comment, nothing else.",
        vibe = analysis.vibe,
        topic = analysis.topic,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use vibey_protocols::Vibe;

    #[test]
    fn test_analysis_prompt_embeds_text() {
        let prompt = analysis_prompt("Founders burn out");
        assert!(prompt.starts_with("Analyze this tweet: \"Founders burn out\""));
        assert!(prompt.contains("{\"worth_commenting\": true/false"));
    }

    #[test]
    fn test_reply_prompt_embeds_analysis() {
        let analysis = AnalysisResult::new(true, "hiring", Vibe::Professional);
        let prompt = reply_system_prompt("We are hiring", &analysis);
        assert!(prompt.contains("Match the vibe: professional"));
        assert!(prompt.contains("Topic: hiring"));
        assert!(prompt.contains("Reply to: \"We are hiring\""));
    }
}
