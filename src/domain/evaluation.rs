//! LLM-as-judge evaluation: prompt construction and verdict parsing

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::domain::llm::Message;
use crate::domain::DomainError;

static NUMBER_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"-?\d+(?:\.\d+)?").unwrap());

/// Build the judge prompt for scoring a recorded generation against a
/// named criteria.
pub fn build_judge_messages(criteria: &str, input: &Value, output: &str) -> Vec<Message> {
    let system = format!(
        "You are an evaluation judge. Rate how well the assistant's answer \
         satisfies the criteria \"{}\" on a scale from 0.0 to 1.0. \
         Respond with only a number.",
        criteria
    );

    let user = format!(
        "Conversation input:\n{}\n\nAssistant answer:\n{}",
        serde_json::to_string_pretty(input).unwrap_or_else(|_| input.to_string()),
        output
    );

    vec![Message::system(system), Message::user(user)]
}

/// Parse the judge's reply into a score in 0.0..=1.0.
///
/// Accepts a bare number or prose containing one ("Score: 0.75"). Anything
/// without a number, or with a number outside the range, is a parse failure.
pub fn parse_judge_score(text: &str) -> Result<f64, DomainError> {
    let trimmed = text.trim();

    let raw = match trimmed.parse::<f64>() {
        Ok(value) => value,
        Err(_) => NUMBER_PATTERN
            .find(trimmed)
            .and_then(|m| m.as_str().parse::<f64>().ok())
            .ok_or_else(|| {
                DomainError::evaluation_parse(format!(
                    "Judge output contains no numeric score: {:?}",
                    truncate(trimmed, 120)
                ))
            })?,
    };

    if !(0.0..=1.0).contains(&raw) {
        return Err(DomainError::evaluation_parse(format!(
            "Judge score {} is outside 0.0..=1.0",
            raw
        )));
    }

    Ok(raw)
}

fn truncate(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_bare_number() {
        assert_eq!(parse_judge_score("0.75").unwrap(), 0.75);
        assert_eq!(parse_judge_score(" 1 ").unwrap(), 1.0);
        assert_eq!(parse_judge_score("0").unwrap(), 0.0);
    }

    #[test]
    fn test_parse_number_in_prose() {
        assert_eq!(parse_judge_score("Score: 0.6").unwrap(), 0.6);
        assert_eq!(
            parse_judge_score("I would rate this 0.9 out of 1.0.").unwrap(),
            0.9
        );
    }

    #[test]
    fn test_parse_no_number() {
        let err = parse_judge_score("The answer looks fine to me.").unwrap_err();
        assert!(matches!(err, DomainError::EvaluationParse { .. }));
    }

    #[test]
    fn test_parse_out_of_range() {
        let err = parse_judge_score("7.5").unwrap_err();
        assert!(matches!(err, DomainError::EvaluationParse { .. }));
    }

    #[test]
    fn test_judge_messages_embed_criteria() {
        let messages =
            build_judge_messages("helpfulness", &json!([{"role": "user", "content": "Hi"}]), "Hello!");

        assert_eq!(messages.len(), 2);
        assert!(messages[0].content.contains("helpfulness"));
        assert!(messages[0].content.contains("Respond with only a number"));
        assert!(messages[1].content.contains("Hello!"));
    }
}
