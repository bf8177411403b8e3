//! Prompt construction for sprint narratives.

use serde::Serialize;
use sprint_core::finding::Finding;
use sprint_report::StyleHints;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

/// System and user messages asking for a short narrative over `findings`.
///
/// Findings are listed in the order given, which the assembler has already
/// sorted most severe first.
#[must_use]
pub fn build_messages(findings: &[Finding], hints: &StyleHints) -> Vec<ChatMessage> {
    let system = format!(
        "You are the scrum master for {team}. Write the \"{section}\" part of the \
         sprint health report for {sprint} on board \"{board}\". Use two or three short \
         paragraphs of plain prose. Lead with the most severe issues, name the cards and \
         people involved, and end with the single most important next step. Do not invent \
         facts beyond the findings provided.",
        team = hints.team_name,
        section = hints.section_title,
        sprint = hints.sprint_name,
        board = hints.board_name,
    );

    let mut user = String::from("Findings:\n");
    for finding in findings {
        user.push_str(&format!(
            "- [{}] {} / {}: {}\n",
            finding.severity.as_str().to_uppercase(),
            finding.category.label(),
            finding.subject.display_name(),
            finding.message
        ));
    }

    vec![
        ChatMessage {
            role: "system",
            content: system,
        },
        ChatMessage {
            role: "user",
            content: user,
        },
    ]
}
