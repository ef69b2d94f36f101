//! Prompt builder

use super::instructions::InstructionTable;
use crate::divination::{kind::DivinationKind, request::DivinationRequest};
use serde::{Deserialize, Serialize};

/// The two strings sent to the generation service.
///
/// Serializes to the proxy body `{ "prompt": ..., "systemInstruction": ... }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DivinationPrompt {
    pub prompt: String,
    pub system_instruction: String,
}

/// Builds prompts from a borrowed [`InstructionTable`]. Side-effect free.
#[derive(Debug, Clone, Copy)]
pub struct PromptBuilder<'a> {
    instructions: &'a InstructionTable,
}

impl<'a> PromptBuilder<'a> {
    pub fn new(instructions: &'a InstructionTable) -> Self {
        Self { instructions }
    }

    /// The user half of the prompt: question, optional context, closing cue.
    pub fn user_prompt(&self, user_text: &str, context: Option<&str>) -> String {
        let context = context
            .map(|c| format!("背景信息: {}", c))
            .unwrap_or_default();
        format!("用户问题: {}。{}。请开始占卜。", user_text, context)
    }

    /// Template and user prompt as a single string.
    pub fn build(&self, kind: DivinationKind, user_text: &str, context: Option<&str>) -> String {
        format!(
            "{}\n\n{}",
            self.instructions.get(kind),
            self.user_prompt(user_text, context)
        )
    }

    /// Split form used on the wire.
    pub fn prompt_for(&self, request: &DivinationRequest) -> DivinationPrompt {
        DivinationPrompt {
            prompt: self.user_prompt(request.user_text(), request.context()),
            system_instruction: self.instructions.get(request.kind()).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_prompt_without_context() {
        let table = InstructionTable::builtin();
        let builder = PromptBuilder::new(&table);
        assert_eq!(
            builder.user_prompt("我的事业如何？", None),
            "用户问题: 我的事业如何？。。请开始占卜。"
        );
    }

    #[test]
    fn test_build_includes_template_and_context() {
        let table = InstructionTable::builtin().with_override(DivinationKind::Tarot, "SYSTEM");
        let prompt = PromptBuilder::new(&table).build(
            DivinationKind::Tarot,
            "love",
            Some("用户出生日期: 1990-01-01"),
        );
        assert!(prompt.starts_with("SYSTEM\n\n"));
        assert!(prompt.contains("用户问题: love。"));
        assert!(prompt.contains("背景信息: 用户出生日期: 1990-01-01"));
    }

    #[test]
    fn test_astrology_birth_date_reaches_prompt() {
        let table = InstructionTable::builtin();
        let request =
            DivinationRequest::with_birth_date(DivinationKind::Astrology, "", Some("1990-01-01"))
                .unwrap();
        let prompt = PromptBuilder::new(&table).prompt_for(&request);
        assert!(prompt.prompt.contains("1990-01-01"));
        assert_eq!(
            prompt.system_instruction,
            table.get(DivinationKind::Astrology)
        );
    }

    #[test]
    fn test_wire_shape() {
        let prompt = DivinationPrompt {
            prompt: "p".to_string(),
            system_instruction: "s".to_string(),
        };
        let json = serde_json::to_value(&prompt).unwrap();
        assert_eq!(json, serde_json::json!({"prompt": "p", "systemInstruction": "s"}));
    }
}
