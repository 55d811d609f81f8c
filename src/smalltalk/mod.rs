// Fixed-set small-talk filter. Conversational filler is answered directly
// and never reaches retrieval or the generation endpoint.

#[cfg(test)]
mod tests;

const THANKS: [&str; 4] = ["thanks", "thank you", "tnx", "thx"];
const GREETINGS: [&str; 3] = ["hi", "hello", "hey"];
const FAREWELLS: [&str; 3] = ["bye", "goodbye", "see you"];
const OTHER: [&str; 9] = [
    "ok", "okay", "kk", "k", "great", "nice", "cool", "awesome", "good",
];
const OTHER_MULTIWORD: [&str; 2] = ["good job", "well done"];

const THANKS_REPLY: &str =
    "You're welcome! If you want, I can help you plan more Sri Lanka trips 😊";
const GREETING_REPLY: &str =
    "Hi! I'm CeylonTrip. Ask me anything about traveling in Sri Lanka 🌴";
const FAREWELL_REPLY: &str = "Bye! Hope you have an amazing trip in Sri Lanka someday 🇱🇰";
const GENERIC_REPLY: &str = "Got it! Whenever you're ready, ask me about Sri Lanka travel plans 😊";

fn normalized(message: &str) -> String {
    message.trim().to_lowercase()
}

/// Exact-set membership after lowercasing and trimming. Anything outside the
/// fixed vocabulary is not small talk and falls through to retrieval.
#[inline]
pub fn is_small_talk(message: &str) -> bool {
    let msg = normalized(message);
    let msg = msg.as_str();

    THANKS.contains(&msg)
        || GREETINGS.contains(&msg)
        || FAREWELLS.contains(&msg)
        || OTHER.contains(&msg)
        || OTHER_MULTIWORD.contains(&msg)
}

/// Canned reply for a small-talk message. Total over the fixed vocabulary,
/// with a generic fallback for members outside the three named sub-groups.
#[inline]
pub fn small_talk_reply(message: &str) -> &'static str {
    let msg = normalized(message);
    let msg = msg.as_str();

    if THANKS.contains(&msg) {
        THANKS_REPLY
    } else if GREETINGS.contains(&msg) {
        GREETING_REPLY
    } else if FAREWELLS.contains(&msg) {
        FAREWELL_REPLY
    } else {
        GENERIC_REPLY
    }
}
