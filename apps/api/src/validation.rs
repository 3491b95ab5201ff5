/// Checks resume text before it is sent anywhere.
///
/// FAIL conditions:
/// - empty or whitespace-only
/// - longer than `max_chars` characters (counted as chars, not bytes)
pub fn validate_resume_text(text: &str, max_chars: usize) -> Result<(), String> {
    if text.trim().is_empty() {
        return Err("resume_text cannot be empty".to_string());
    }

    let len = text.chars().count();
    if len > max_chars {
        return Err(format!(
            "resume_text is too long ({len} characters, maximum is {max_chars})"
        ));
    }

    Ok(())
}
