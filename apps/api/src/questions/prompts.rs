// All LLM prompt constants for the question generator.
// Reuses cross-cutting fragments from llm_client::prompts.

/// System prompt for question generation. `JSON_ONLY_SYSTEM` is appended at call time.
pub const GENERATION_SYSTEM: &str = "You are a helpful assistant that generates \
    interview questions in JSON format.";

/// Question generation prompt template.
/// Replace: {role}, {difficulty}
pub const GENERATION_PROMPT_TEMPLATE: &str = r#"You are an expert interview question generator. Generate exactly 10 interview questions for a {role} position at {difficulty} level.

For each question, provide:
1. The question text (clear and specific)
2. A concise model answer (2-3 sentences that demonstrate expected knowledge)
3. Relevant tags (skills, topics, and difficulty level)

Return a JSON object with this exact structure:
{
  "questions": [
    {
      "question": "Question text here",
      "modelAnswer": "Expected answer here (2-3 sentences)",
      "tags": ["skill1", "skill2", "topic", "{difficulty}"]
    }
  ]
}

Ensure questions are:
- Relevant to the {role} role
- Appropriate for {difficulty} level
- Cover different aspects (technical, behavioral, problem-solving)
- Include tags that reflect skills, technologies, and topics"#;
