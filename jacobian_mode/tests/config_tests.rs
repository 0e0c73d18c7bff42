//! Integration tests: loading selector configuration from files

use jacobian_mode::ansatz::models;
use jacobian_mode::*;
use std::io::Write;

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(contents.as_bytes()).expect("write config");
    file
}

#[test]
fn test_load_config_file() {
    let file = write_config(
        r#"
[project]
name = "heisenberg"

[jacobian]
mode = "complex"
cache = false
"#,
    );
    let config = ModeConfig::load(file.path()).unwrap();
    assert_eq!(
        config,
        ModeConfig {
            mode: Some(JacobianMode::Complex),
            holomorphic: None,
            cache: false,
        }
    );
}

#[test]
fn test_loaded_config_drives_selector() {
    let file = write_config("[jacobian]\nholomorphic = true\n");
    let mut selector = ModeSelector::new(ModeConfig::load(file.path()).unwrap());
    let samples = AbstractArray::new(vec![16, 4], DType::Float64);

    let complex = models::init_rbm_avals(4, 1, DType::Complex128);
    assert_eq!(
        selector.select(&models::rbm(), &complex, None, &samples),
        Ok(JacobianMode::Holomorphic)
    );

    let real = models::init_rbm_avals(4, 1, DType::Float64);
    assert_eq!(
        selector.select(&models::rbm(), &real, None, &samples),
        Err(ModeError::RealParametersHolomorphic)
    );
}

#[test]
fn test_load_rejects_unknown_key() {
    let file = write_config("[jacobian]\nmethod = \"real\"\n");
    let err = ModeConfig::load(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Toml(_)), "{err:?}");
}

#[test]
fn test_config_serializes_to_toml() {
    let config = ModeConfig {
        mode: Some(JacobianMode::Holomorphic),
        holomorphic: None,
        cache: true,
    };
    let text = toml::to_string(&config).unwrap();
    insta::assert_snapshot!(text, @r#"
    mode = "holomorphic"
    cache = true
    "#);
}
