use super::*;

#[test]
fn test_derive_key_mona_lisa() {
    let key = CacheKey::derive("Leonardo da Vinci", "Mona Lisa");
    assert_eq!(key.as_str(), "Leonardo_da_Vinci_Mona_Lisa");
}

#[test]
fn test_sanitize_strips_forbidden_characters() {
    assert_eq!(sanitize_component(r#"a<b>c:d"e/f\g|h?i*j"#), "abcdefghij");
}

#[test]
fn test_sanitize_collapses_whitespace_and_underscores() {
    assert_eq!(sanitize_component("  The \t Starry\n\nNight  "), "The_Starry_Night");
    assert_eq!(sanitize_component("a___b"), "a_b");
    assert_eq!(sanitize_component("_ leading and trailing _"), "leading_and_trailing");
}

#[test]
fn test_sanitize_forbidden_chars_between_spaces() {
    // "Self-Portrait / Study" leaves two spaces that collapse to one underscore
    assert_eq!(sanitize_component("Self-Portrait / Study"), "Self-Portrait_Study");
}

#[test]
fn test_sanitize_empty_input() {
    assert_eq!(sanitize_component(""), "");
    assert_eq!(sanitize_component("???"), "");
    assert!(CacheKey::derive("", "").is_empty());
}

#[test]
fn test_derive_key_with_one_empty_side() {
    assert_eq!(CacheKey::derive("", "Guernica").as_str(), "Guernica");
    assert_eq!(CacheKey::derive("Picasso", "***").as_str(), "Picasso");
}

#[test]
fn test_sanitize_truncates_to_max_len() {
    let long = "x".repeat(500);
    assert_eq!(sanitize_component(&long).chars().count(), MAX_KEY_LEN);
}

#[test]
fn test_derive_key_caps_total_length() {
    let artist = "a".repeat(180);
    let title = "b".repeat(180);
    let key = CacheKey::derive(&artist, &title);
    assert_eq!(key.as_str().chars().count(), MAX_KEY_LEN);
    assert!(!key.as_str().ends_with('_'));
}

#[test]
fn test_truncation_counts_characters_not_bytes() {
    let title = "é".repeat(300);
    let key = sanitize_component(&title);
    assert_eq!(key.chars().count(), MAX_KEY_LEN);
}

#[test]
fn test_derive_key_properties_hold_for_awkward_inputs() {
    let inputs = [
        ("", ""),
        ("   ", "\t\n"),
        ("Jan van Eyck", "The Arnolfini Portrait"),
        ("Anonymous <Workshop>", "Panel: \"Saint?\" *restored*"),
        ("Hokusai", "The Great Wave off Kanagawa\u{3000}(神奈川沖浪裏)"),
        ("__", "__"),
        ("a/b\\c", "d|e"),
    ];
    for (artist, title) in inputs {
        let key = CacheKey::derive(artist, title);
        let s = key.as_str();
        assert!(!s.contains(['<', '>', ':', '"', '/', '\\', '|', '?', '*']), "{s}");
        assert!(!s.chars().any(char::is_whitespace), "{s}");
        assert!(s.chars().count() <= MAX_KEY_LEN);
        assert!(!s.starts_with('_') && !s.ends_with('_'), "{s}");
    }
}

#[test]
fn test_derive_key_is_deterministic() {
    let a = CacheKey::derive("Johannes Vermeer", "Girl with a Pearl Earring");
    let b = CacheKey::derive("Johannes Vermeer", "Girl with a Pearl Earring");
    assert_eq!(a, b);
}

#[test]
fn test_identity_substitutes_unknown() {
    let id = ArtworkIdentity::new(None, Some("Venus of Willendorf"));
    assert_eq!(id.artist, UNKNOWN_LABEL);
    assert_eq!(id.cache_key().as_str(), "Unknown_Venus_of_Willendorf");

    let blank = ArtworkIdentity::new(Some("  "), Some(""));
    assert_eq!(blank.cache_key().as_str(), "Unknown_Unknown");
}

#[test]
fn test_file_name_accepts_dotted_extension() {
    let key = CacheKey::derive("Leonardo da Vinci", "Mona Lisa");
    assert_eq!(key.file_name("jpg"), "Leonardo_da_Vinci_Mona_Lisa.jpg");
    assert_eq!(key.file_name(".png"), "Leonardo_da_Vinci_Mona_Lisa.png");
}

#[test]
fn test_identity_reads_from_catalog_json() {
    let id: ArtworkIdentity =
        serde_json::from_str(r#"{"artist": "Sandro Botticelli", "title": "The Birth of Venus"}"#)
            .unwrap();
    assert_eq!(id.to_string(), "The Birth of Venus by Sandro Botticelli");
    assert_eq!(id.cache_key().as_str(), "Sandro_Botticelli_The_Birth_of_Venus");
}
