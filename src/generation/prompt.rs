/// Build the continuation prompt for the given document text.
pub fn build_prompt(text: &str) -> String {
    format!(
        "You are a helpful writing assistant. Continue the following text in a natural, coherent way.\n\
         Write 1-3 sentences that flow naturally from the existing content. Do not repeat what's already written.\n\
         Existing text: \"{text}\" Continue writing from where it left off:"
    )
}
