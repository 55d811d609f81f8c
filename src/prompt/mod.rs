// Prompt assembly: a constant system persona plus a user message embedding
// the retrieved grounding context and the literal question.


use crate::generation::{ChatMessage, Role};

/// Persona and behavioral rules sent as the system message on every request
pub const SYSTEM_PROMPT: &str = "\
You are CeylonTrip, an AI travel assistant specialized ONLY in Sri Lanka.

RULES:
- You MUST answer ONLY questions related to travel in Sri Lanka.
- If the user asks about another country (India, Thailand, etc.), reply:
  \"I can only answer questions about traveling in Sri Lanka.\"
- Use the provided CONTEXT when possible (destinations, routes, tips).
- Do NOT invent live prices, real-time schedules, or current weather.
- If something is not covered in the context, say you are not sure and suggest
  what the traveler can check locally (guesthouses, official sites, operators).
- Keep itineraries geographically sensible and mention approximate travel times when relevant.
- Prefer clear bullet points and day-by-day plans when the user asks for itineraries.
- If the user message is small talk (e.g. \"ok\", \"thanks\", \"hi\"), respond briefly and naturally
  without giving extra Sri Lanka information.";

/// Separator between retrieved chunks in the user message
pub const CONTEXT_SEPARATOR: &str = "\n\n---\n\n";

/// Fixed refusal returned when retrieval yields no grounding context;
/// the generation endpoint is never invoked in that case.
pub const NO_CONTEXT_REPLY: &str = "I can only help with travel questions related to Sri Lanka.";

/// Build the two-message exchange for a grounded question
#[inline]
pub fn build_messages(context_chunks: &[String], question: &str) -> Vec<ChatMessage> {
    let context_text = context_chunks.join(CONTEXT_SEPARATOR);

    let user_block = format!(
        "Use the following CONTEXT about Sri Lanka to answer the QUESTION.\n\
         If the CONTEXT is insufficient, say you are not sure and explain what the traveler\n\
         should check locally (e.g. with accommodation, official sites, or operators).\n\
         \n\
         CONTEXT:\n\
         {context_text}\n\
         \n\
         QUESTION:\n\
         {question}"
    );

    vec![
        ChatMessage {
            role: Role::System,
            content: SYSTEM_PROMPT.to_string(),
        },
        ChatMessage {
            role: Role::User,
            content: user_block,
        },
    ]
}
