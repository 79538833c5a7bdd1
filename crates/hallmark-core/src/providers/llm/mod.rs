use crate::model::LlmResponse;
use async_trait::async_trait;

/// The external text-generation capability. Unreliable by contract:
/// calls may fail with transport or quota errors and the returned text
/// has no guaranteed structure. Callers strip markup and validate.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> anyhow::Result<LlmResponse>;
    fn provider_name(&self) -> &'static str;
}

/// Removes code-fence markup a model commonly wraps around SQL or JSON.
pub fn strip_code_fences(text: &str) -> String {
    text.replace("```sql", "")
        .replace("```json", "")
        .replace("```", "")
        .trim()
        .to_string()
}

pub mod fake;
pub mod gemini;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_sql_fence() {
        let fenced = "```sql\nSELECT 1\n```";
        assert_eq!(strip_code_fences(fenced), "SELECT 1");
    }

    #[test]
    fn strips_json_fence() {
        let fenced = "```json\n{\"decision\": \"APPROVED\"}\n```";
        assert_eq!(strip_code_fences(fenced), "{\"decision\": \"APPROVED\"}");
    }

    #[test]
    fn plain_text_untouched() {
        assert_eq!(strip_code_fences("SELECT 1"), "SELECT 1");
    }
}
