use std::collections::HashMap;

pub const FALLBACK_REPLY: &str =
    "Sorry, I don't understand. you can call this number for further enquiry 6307593809";

/// Keyword table for the support chatbot. Built once at startup and shared
/// read-only through `AppState`; lookups are on the lowercased message.
pub fn response_table() -> HashMap<String, String> {
    [
        ("hi", "Hello! How can I assist you?"),
        ("hello", "Hi there! How can I help?"),
        ("bye", "Goodbye! Have a great day!"),
        (
            "how are you",
            "I'm just a bot, but I'm doing great! How about you?",
        ),
        ("phone no", "789456123"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}
