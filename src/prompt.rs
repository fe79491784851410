use regex::Regex;
use std::sync::OnceLock;

pub const FALLBACK_PROMPT: &str = "What is your favorite book?";
pub const FALLBACK_ANSWER: &str = "Sorry, I couldn't answer that.";
pub const FALLBACK_QUESTION: &str = "Which empire built the Hagia Sophia in Constantinople?";

pub const QUESTION_PROMPT: &str =
    "Ask one interesting history trivia question. \
    Reply with the question only, on a single line, \
    without numbering, quotes or the answer.";

// concatenate the prompt with the question. eg: prompt = ANSWER_PROMPT + question
pub const ANSWER_PROMPT: &str =
    "Answer the following history trivia question in two or three sentences. \
    Start with the direct answer, then give one piece of context.\nQuestion: ";

pub fn answer_prompt(question: &str) -> String {
    format!("{}{}", ANSWER_PROMPT, question)
}

/// Answer prompt that also lists answers already logged today, so the model
/// does not repeat itself.
pub fn answer_prompt_avoiding(question: &str, previous: &[String]) -> String {
    if previous.is_empty() {
        return answer_prompt(question);
    }
    let listed = previous.iter()
        .map(|answer| format!("- {}", answer))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "{}\nDo not repeat any of these earlier answers:\n{}",
        answer_prompt(question),
        listed
    )
}

pub fn follow_up_question(sentence: &str) -> String {
    format!(
        "Earlier today we learned: \"{}\" What happened next, and why did it matter historically?",
        sentence
    )
}

fn sentence_regex() -> &'static Regex {
    static SENTENCE: OnceLock<Regex> = OnceLock::new();
    SENTENCE.get_or_init(|| Regex::new(r"(?s)^(.*?[.!?])(?:\s|$)").unwrap())
}

/// Leading sentence of `text`: everything up to the first `.`, `!` or `?`
/// followed by whitespace or the end. The whole text when no terminator exists.
pub fn first_sentence(text: &str) -> String {
    let text = text.trim();
    sentence_regex()
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| text.to_string())
}
