pub fn build_extraction_prompt(chunk_text: &str) -> String {
    format!(
        r#"You are extracting structured legal facts from a statute text.

INSTRUCTIONS:
1. Find every criminal offence defined or punished in the text below
2. For each offence, identify the chapter, the section number, and the punishment
3. Output one line per offence, with fields separated by the | character
4. Output nothing else: no explanations, no markdown, no numbering

FORMAT (one line per offence):
offence | chapter | section | punishment

RULES:
- Keep field text short and verbatim from the statute where possible
- If the chapter is not stated in this passage, write UNKNOWN for that field
- If the text contains no offences at all, output the single word NONE

TEXT:
{}

OUTPUT:"#,
        chunk_text
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_chunk_text() {
        let prompt = build_extraction_prompt("Section 303. Theft.");
        assert!(prompt.contains("Section 303. Theft."));
        assert!(prompt.contains("offence | chapter | section | punishment"));
    }
}
