// Prompt constants and prompt-building for resume summaries.

/// System prompt sent with every summary request.
pub const SUMMARY_SYSTEM: &str = "You are an expert recruiter and resume reviewer. \
    Summarize the following resume for a hiring manager. \
    Cover the candidate's current role, years of experience, core skills, \
    notable achievements and education. \
    Use only information present in the resume. Do NOT invent details. \
    Respond with the summary text only, without introductions or apologies.";

/// A composed prompt: the system instruction plus the user turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

/// Combines the fixed system instruction, optional caller instructions and
/// the resume text. Blank `instructions` are ignored.
pub fn build_summary_prompt(resume_text: &str, instructions: Option<&str>) -> Prompt {
    let mut system = String::with_capacity(SUMMARY_SYSTEM.len() + 256);
    system.push_str(SUMMARY_SYSTEM);

    if let Some(extra) = instructions.map(str::trim).filter(|s| !s.is_empty()) {
        system.push_str("\n\nAdditional instructions:\n");
        system.push_str(extra);
    }

    let mut user = String::with_capacity(resume_text.len() + 64);
    user.push_str("RESUME TEXT TO SUMMARIZE:\n---\n");
    user.push_str(resume_text.trim());
    user.push_str("\n---\n\nNow, provide the summary.");

    Prompt { system, user }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_without_instructions_uses_default_system() {
        let prompt = build_summary_prompt("  Jane Doe, Rust engineer  ", None);
        assert_eq!(prompt.system, SUMMARY_SYSTEM);
        assert!(prompt.user.contains("---\nJane Doe, Rust engineer\n---"));
    }

    #[test]
    fn test_instructions_are_appended_to_system() {
        let prompt = build_summary_prompt("resume", Some("Answer in Portuguese."));
        assert!(prompt.system.starts_with(SUMMARY_SYSTEM));
        assert!(prompt
            .system
            .ends_with("Additional instructions:\nAnswer in Portuguese."));
    }

    #[test]
    fn test_blank_instructions_are_ignored() {
        let prompt = build_summary_prompt("resume", Some("   \n"));
        assert_eq!(prompt.system, SUMMARY_SYSTEM);
    }
}
