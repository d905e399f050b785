//! Canonical prompts shared by the cloud adapters and local sessions.

use crate::types::{
    DraftOptions, Operation, ProcessingRequest, SummaryFormat, SummaryKind, SummaryLength,
    SummaryOptions,
};

const SUMMARY_JSON_SHAPE: &str = r#"{"tldr": string, "keyPoints": string[]}"#;
const DRAFT_JSON_SHAPE: &str = r#"{"drafts": [{"subject": string, "body": string}]}"#;
const DESCRIBE_INSTRUCTION: &str =
    "Describe this image in two or three sentences for someone who cannot see it. \
     Mention any visible text.";

/// Single-message prompt sent to a cloud provider
pub fn remote_prompt(request: &ProcessingRequest) -> String {
    match request.operation {
        Operation::Summarise => format!(
            "Summarise the following email thread. Respond with only a JSON object of the form {} \
             where tldr is one or two sentences and keyPoints has at most 5 short entries.\n\n\
             Thread:\n{}",
            SUMMARY_JSON_SHAPE, request.text
        ),
        Operation::Draft => format!(
            "{}\nRespond with only a JSON object of the form {} containing exactly 3 drafts \
             ordered short, medium, comprehensive. Each subject must be at most 120 characters \
             and each body at most 2000 characters.\n\nThread:\n{}",
            draft_instructions(&request.draft),
            DRAFT_JSON_SHAPE,
            request.text
        ),
        Operation::Multimodal => format!("{}\n\n{}", DESCRIBE_INSTRUCTION, request.text),
    }
}

/// System prompt for a local session
pub fn local_system_prompt(request: &ProcessingRequest) -> String {
    match request.operation {
        Operation::Summarise => summary_instructions(&request.summary),
        Operation::Draft => draft_instructions(&request.draft),
        Operation::Multimodal => DESCRIBE_INSTRUCTION.to_string(),
    }
}

/// Minimal prompt used to check that a credential works
pub fn probe_prompt() -> &'static str {
    "Reply with the single word: ok"
}

fn draft_instructions(options: &DraftOptions) -> String {
    let mut out = format!(
        "You are an email assistant. Write three reply drafts for the thread: a short one, \
         a medium one and a comprehensive one. {}",
        options.tone.instruction()
    );
    if let Some(guidance) = options.guidance.as_deref().map(str::trim).filter(|g| !g.is_empty()) {
        out.push_str(" Follow this guidance from the user: ");
        out.push_str(guidance);
    }
    out
}

fn summary_instructions(options: &SummaryOptions) -> String {
    let kind = match options.kind {
        SummaryKind::KeyPoints => "Extract the key points of the email thread.",
        SummaryKind::Tldr => "Give a quick overview of the email thread.",
        SummaryKind::Teaser => "Write an enticing teaser for the email thread.",
        SummaryKind::Headline => "Write a headline capturing the email thread.",
    };
    let length = match options.length {
        SummaryLength::Short => "Keep it very brief.",
        SummaryLength::Medium => "Keep it brief.",
        SummaryLength::Long => "Be thorough but stay focused.",
    };
    let format = match options.format {
        SummaryFormat::PlainText => "Use plain text inside JSON strings.",
        SummaryFormat::Markdown => "Markdown is allowed inside JSON strings.",
    };
    format!(
        "{} {} {} Answer with a JSON object of the form {} with at most 5 key points.",
        kind, length, format, SUMMARY_JSON_SHAPE
    )
}
