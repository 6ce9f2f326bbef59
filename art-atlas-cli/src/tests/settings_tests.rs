use super::*;

#[test]
fn test_missing_file_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let settings = Settings::load(&dir.path().join("settings.toml")).unwrap();
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.budget.max_bytes, 1024 * 1024);
    assert_eq!(settings.http.timeout_secs, 15);
}

#[test]
fn test_partial_file_keeps_other_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.toml");
    std::fs::write(
        &path,
        "[budget]\nmax_bytes = 524288\n\n[http]\nrequest_delay_ms = 0\n",
    )
    .unwrap();

    let settings = Settings::load(&path).unwrap();
    assert_eq!(settings.budget.max_bytes, 524_288);
    assert_eq!(settings.budget.max_dimension, 2000);
    assert_eq!(settings.http.request_delay_ms, 0);
    assert_eq!(settings.http.max_download_bytes, 64 * 1024 * 1024);
}

#[test]
fn test_invalid_file_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.toml");
    std::fs::write(&path, "[budget]\nmax_bytes = \"lots\"\n").unwrap();

    let err = Settings::load(&path).unwrap_err();
    assert!(matches!(err, CliError::Config(_)));
}

#[test]
fn test_write_if_missing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("art-atlas").join("settings.toml");

    assert!(Settings::default().write_if_missing(&path).unwrap());
    assert_eq!(Settings::load(&path).unwrap(), Settings::default());

    std::fs::write(&path, "[budget]\nmax_dimension = 800\n").unwrap();
    assert!(!Settings::default().write_if_missing(&path).unwrap());
    assert_eq!(Settings::load(&path).unwrap().budget.max_dimension, 800);
}

#[test]
fn test_settings_path_location() {
    let path = settings_path();
    assert!(path.ends_with("art-atlas/settings.toml"));
}
