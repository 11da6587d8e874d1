use super::*;

#[test]
fn defaults_apply_when_the_file_is_empty() {
    let config = load_from(&FileConfig::default());
    assert_eq!(config, DaemonConfig::default());
}

#[test]
fn file_values_override_the_built_in_defaults() {
    std::env::remove_var("IQ_SWEEP_INTERVAL_SECS");
    std::env::remove_var("IQ_SWEEP_COMPANY_ID");
    let file = parse_file_config(r#"sweep_interval_secs = 90"#);
    let config = load_from(&file);
    assert_eq!(config.sweep_interval, Duration::from_secs(90));
    assert!(config.sweep_company_id.is_none());
}

#[test]
fn env_vars_override_the_config_file() {
    std::env::set_var("IQ_SWEEP_INTERVAL_SECS", "15");
    let file = parse_file_config(r#"sweep_interval_secs = 90"#);
    let config = load_from(&file);
    assert_eq!(config.sweep_interval, Duration::from_secs(15));
    std::env::remove_var("IQ_SWEEP_INTERVAL_SECS");
}

#[test]
fn malformed_files_fall_back_to_defaults_instead_of_panicking() {
    let file = parse_file_config("not valid toml {{{");
    assert_eq!(file, FileConfig::default());
}
