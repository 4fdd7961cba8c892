//! Function-call request construction for entity extraction

use crate::config::ExtractorConfig;
use crate::schema::ExtractionSchema;
use jarvis_llm::{ChatMessage, FunctionCallMode, FunctionCallRequest, FunctionSpec};

/// Builds the outbound function-calling request
pub struct PromptBuilder<'a> {
    config: &'a ExtractorConfig,
    use_case: &'a str,
    text: &'a str,
}

impl<'a> PromptBuilder<'a> {
    /// Create a new prompt builder
    pub fn new(config: &'a ExtractorConfig, use_case: &'a str, text: &'a str) -> Self {
        Self {
            config,
            use_case,
            text,
        }
    }

    /// Build the complete request with `schema` as the function parameters
    ///
    /// The conversation is exactly two messages: the system instruction,
    /// then the raw user text. Temperature is always 0.
    pub fn build(&self, schema: &ExtractionSchema) -> FunctionCallRequest {
        FunctionCallRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage::system(self.system_instruction()),
                ChatMessage::user(self.text),
            ],
            function: FunctionSpec {
                name: self.config.function_name.clone(),
                description: format!(
                    "{} Use case: {}.",
                    self.config.function_description, self.use_case
                ),
                parameters: schema.to_value(),
            },
            function_call: FunctionCallMode::Auto,
            temperature: 0.0,
        }
    }

    fn system_instruction(&self) -> String {
        format!(
            "{}\nAlways respond by calling the `{}` function. Never respond with plain text.",
            EXTRACTION_INSTRUCTIONS, self.config.function_name
        )
    }
}

const EXTRACTION_INSTRUCTIONS: &str = r#"You are an entity extraction engine for business requests.
Read the user's message and fill in the function parameters with values stated in it.
Rules:
- Only use values that appear in the message; do not guess or invent values
- Leave out any parameter the message does not mention
- Copy values as written (do not translate them)"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaBuilder;
    use jarvis_llm::MessageRole;
    use std::collections::BTreeSet;

    fn schema() -> ExtractionSchema {
        let allowed: BTreeSet<String> =
            ["origin", "destination"].iter().map(|s| s.to_string()).collect();
        let required: BTreeSet<String> = ["origin"].iter().map(|s| s.to_string()).collect();
        SchemaBuilder::build(&allowed, &required)
    }

    #[test]
    fn test_two_messages_system_then_user() {
        let config = ExtractorConfig::default();
        let request =
            PromptBuilder::new(&config, "CreateShipment", "Ship from Mumbai").build(&schema());

        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, MessageRole::System);
        assert_eq!(request.messages[1].role, MessageRole::User);
        assert_eq!(request.messages[1].content, "Ship from Mumbai");
    }

    #[test]
    fn test_system_instruction_names_function() {
        let config = ExtractorConfig::default();
        let request = PromptBuilder::new(&config, "CreateShipment", "x").build(&schema());

        let system = &request.messages[0].content;
        assert!(system.contains("`extract_entities`"));
        assert!(system.contains("Never respond with plain text"));
    }

    #[test]
    fn test_function_spec_and_sampling() {
        let config = ExtractorConfig::for_model("gpt-4o-mini");
        let request = PromptBuilder::new(&config, "CreateShipment", "x").build(&schema());

        assert_eq!(request.model, "gpt-4o-mini");
        assert_eq!(request.function.name, "extract_entities");
        assert!(request.function.description.contains("CreateShipment"));
        assert_eq!(request.function.parameters, schema().to_value());
        assert_eq!(request.function_call, FunctionCallMode::Auto);
        assert_eq!(request.temperature, 0.0);
    }
}
