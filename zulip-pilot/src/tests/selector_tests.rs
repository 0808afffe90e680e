use crate::selector::Selector;

#[test]
fn hash_prefix_parses_as_id() {
    assert_eq!(
        Selector::from("#compose-textarea"),
        Selector::Id("compose-textarea".to_string())
    );
}

#[test]
fn id_prefix_parses_as_id() {
    assert_eq!(
        Selector::from("id:id_username"),
        Selector::Id("id_username".to_string())
    );
}

#[test]
fn css_prefix_parses_as_css() {
    assert_eq!(
        Selector::from("css:button[type='submit']"),
        Selector::Css("button[type='submit']".to_string())
    );
}

#[test]
fn bare_string_defaults_to_css() {
    assert_eq!(
        Selector::from(".message_row"),
        Selector::Css(".message_row".to_string())
    );
}

#[test]
fn empty_string_is_invalid() {
    assert!(matches!(Selector::from(""), Selector::Invalid(_)));
    assert!(matches!(Selector::from("   "), Selector::Invalid(_)));
}

#[test]
fn display_round_trips_through_parsing() {
    for anchor in [
        "#id_password",
        "css:a.message-time",
        "css:li.topic-list-item[data-topic-name=\"test-topic\"] > a.topic-box",
    ] {
        let selector = Selector::from(anchor);
        assert_eq!(Selector::from(selector.to_string().as_str()), selector);
    }
}
