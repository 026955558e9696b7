use burgerbot::core::config::{DEFAULT_BOT_NAME, bot_name_or_default};

#[test]
fn test_bot_name_defaults() {
    assert_eq!(bot_name_or_default(None), DEFAULT_BOT_NAME);
    assert_eq!(bot_name_or_default(Some(String::new())), "burgerbot");
    assert_eq!(bot_name_or_default(Some("   ".to_string())), "burgerbot");
}

#[test]
fn test_bot_name_override_is_trimmed() {
    assert_eq!(
        bot_name_or_default(Some(" lunchbot ".to_string())),
        "lunchbot"
    );
}
