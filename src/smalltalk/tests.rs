use super::*;

#[test]
fn membership_is_case_and_whitespace_insensitive() {
    assert!(is_small_talk("  OK  "));
    assert!(is_small_talk("Thanks"));
    assert!(is_small_talk("HELLO"));
    assert!(is_small_talk("\tgood job\n"));
}

#[test]
fn membership_is_exact_not_substring() {
    assert!(!is_small_talk("ok thanks"));
    assert!(!is_small_talk("hello there"));
    assert!(!is_small_talk("thanks for the itinerary"));
    assert!(!is_small_talk(""));
}

#[test]
fn questions_are_not_small_talk() {
    assert!(!is_small_talk("What is Ella like?"));
    assert!(!is_small_talk("how do I get from Kandy to Ella"));
}

#[test]
fn sub_groups_map_to_their_canned_replies() {
    assert_eq!(small_talk_reply("thanks"), small_talk_reply("THX"));
    assert!(small_talk_reply("thanks").contains("welcome"));
    assert!(small_talk_reply("hi").contains("CeylonTrip"));
    assert!(small_talk_reply("bye").contains("Bye"));
}

#[test]
fn other_members_get_the_generic_fallback() {
    assert_eq!(small_talk_reply("cool"), small_talk_reply("well done"));
    assert!(small_talk_reply("ok").contains("Whenever you're ready"));
}
