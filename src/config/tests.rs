use super::*;
use serial_test::serial;
use std::env;
use std::net::IpAddr;
use std::path::PathBuf;
use tempfile::TempDir;

const ALL_VARS: [&str; 10] = [
    Config::ENV_PORT,
    Config::ENV_BIND_ADDR,
    Config::ENV_MODEL_ID,
    Config::ENV_MODEL_PATH,
    Config::ENV_MODEL_CACHE,
    Config::ENV_MAX_SEQ_LEN,
    Config::ENV_DEVICE,
    Config::ENV_STUB_EMBEDDER,
    Config::ENV_EXCELLENT_THRESHOLD,
    Config::ENV_PARTIAL_THRESHOLD,
];

fn with_env_vars<F, R>(vars: &[(&str, &str)], f: F) -> R
where
    F: FnOnce() -> R,
{
    clear_semgrade_env();

    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, value) in vars {
        unsafe { env::set_var(key, value) };
    }

    let result = f();

    clear_semgrade_env();
    result
}

fn clear_semgrade_env() {
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for key in ALL_VARS {
        unsafe { env::remove_var(key) };
    }
}

fn model_dir_with(files: &[&str]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for file in files {
        std::fs::write(dir.path().join(file), b"{}").unwrap();
    }
    dir
}

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.port, 8501);
    assert_eq!(
        config.bind_addr,
        IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1))
    );
    assert_eq!(config.model_id, DEFAULT_MODEL_ID);
    assert!(config.model_path.is_none());
    assert!(config.model_cache.is_none());
    assert_eq!(config.max_seq_len, 256);
    assert_eq!(config.device, DevicePreference::Auto);
    assert!(!config.stub_embedder);
    assert_eq!(config.excellent_threshold, 85.0);
    assert_eq!(config.partial_threshold, 60.0);
}

#[test]
fn test_socket_addr() {
    let config = Config::default();
    assert_eq!(config.socket_addr(), "127.0.0.1:8501");

    let config = Config {
        port: 3000,
        bind_addr: "0.0.0.0".parse().unwrap(),
        ..Default::default()
    };
    assert_eq!(config.socket_addr(), "0.0.0.0:3000");
}

#[test]
#[serial]
fn test_from_env_defaults() {
    let config = with_env_vars(&[], || Config::from_env().unwrap());
    assert_eq!(config.port, 8501);
    assert_eq!(config.model_id, DEFAULT_MODEL_ID);
    assert!(!config.stub_embedder);
}

#[test]
#[serial]
fn test_from_env_overrides() {
    let config = with_env_vars(
        &[
            (Config::ENV_PORT, "9000"),
            (Config::ENV_BIND_ADDR, "0.0.0.0"),
            (Config::ENV_MODEL_ID, "BAAI/bge-small-en-v1.5"),
            (Config::ENV_MODEL_PATH, "/models/minilm"),
            (Config::ENV_MODEL_CACHE, "/var/cache/hf"),
            (Config::ENV_MAX_SEQ_LEN, "128"),
            (Config::ENV_DEVICE, "cpu"),
            (Config::ENV_STUB_EMBEDDER, "yes"),
            (Config::ENV_EXCELLENT_THRESHOLD, "90"),
            (Config::ENV_PARTIAL_THRESHOLD, "55.5"),
        ],
        || Config::from_env().unwrap(),
    );

    assert_eq!(config.port, 9000);
    assert_eq!(config.bind_addr.to_string(), "0.0.0.0");
    assert_eq!(config.model_id, "BAAI/bge-small-en-v1.5");
    assert_eq!(config.model_path, Some(PathBuf::from("/models/minilm")));
    assert_eq!(config.model_cache, Some(PathBuf::from("/var/cache/hf")));
    assert_eq!(config.max_seq_len, 128);
    assert_eq!(config.device, DevicePreference::Cpu);
    assert!(config.stub_embedder);
    assert_eq!(config.excellent_threshold, 90.0);
    assert_eq!(config.partial_threshold, 55.5);
}

#[test]
#[serial]
fn test_blank_values_fall_back_to_defaults() {
    let config = with_env_vars(
        &[(Config::ENV_MODEL_ID, "   "), (Config::ENV_MODEL_PATH, "")],
        || Config::from_env().unwrap(),
    );
    assert_eq!(config.model_id, DEFAULT_MODEL_ID);
    assert!(config.model_path.is_none());
}

#[test]
#[serial]
fn test_invalid_port() {
    let err = with_env_vars(&[(Config::ENV_PORT, "0")], || Config::from_env().unwrap_err());
    assert!(matches!(err, ConfigError::InvalidPort { .. }));

    let err = with_env_vars(&[(Config::ENV_PORT, "http")], || {
        Config::from_env().unwrap_err()
    });
    assert!(matches!(err, ConfigError::PortParseError { .. }));
}

#[test]
#[serial]
fn test_invalid_bind_addr() {
    let err = with_env_vars(&[(Config::ENV_BIND_ADDR, "localhost:80")], || {
        Config::from_env().unwrap_err()
    });
    assert!(matches!(err, ConfigError::InvalidBindAddr { .. }));
}

#[test]
#[serial]
fn test_invalid_max_seq_len() {
    let err = with_env_vars(&[(Config::ENV_MAX_SEQ_LEN, "0")], || {
        Config::from_env().unwrap_err()
    });
    assert!(matches!(
        err,
        ConfigError::InvalidValue { name, .. } if name == Config::ENV_MAX_SEQ_LEN
    ));

    let err = with_env_vars(&[(Config::ENV_MAX_SEQ_LEN, "-5")], || {
        Config::from_env().unwrap_err()
    });
    assert!(matches!(err, ConfigError::InvalidValue { .. }));
}

#[test]
#[serial]
fn test_invalid_device() {
    let err = with_env_vars(&[(Config::ENV_DEVICE, "tpu")], || {
        Config::from_env().unwrap_err()
    });
    assert!(err.to_string().contains(Config::ENV_DEVICE));
}

#[test]
#[serial]
fn test_bool_parsing() {
    for value in ["1", "true", "TRUE", "on"] {
        let config = with_env_vars(&[(Config::ENV_STUB_EMBEDDER, value)], || {
            Config::from_env().unwrap()
        });
        assert!(config.stub_embedder, "{value} should enable");
    }

    for value in ["0", "false", "Off", "no"] {
        let config = with_env_vars(&[(Config::ENV_STUB_EMBEDDER, value)], || {
            Config::from_env().unwrap()
        });
        assert!(!config.stub_embedder, "{value} should disable");
    }

    let err = with_env_vars(&[(Config::ENV_STUB_EMBEDDER, "maybe")], || {
        Config::from_env().unwrap_err()
    });
    assert!(matches!(err, ConfigError::InvalidValue { .. }));
}

#[test]
#[serial]
fn test_non_finite_threshold_rejected() {
    let err = with_env_vars(&[(Config::ENV_EXCELLENT_THRESHOLD, "inf")], || {
        Config::from_env().unwrap_err()
    });
    assert!(matches!(err, ConfigError::InvalidValue { .. }));

    let err = with_env_vars(&[(Config::ENV_PARTIAL_THRESHOLD, "sixty")], || {
        Config::from_env().unwrap_err()
    });
    assert!(matches!(err, ConfigError::InvalidValue { .. }));
}

#[test]
fn test_validate_stub_skips_model_checks() {
    let config = Config {
        stub_embedder: true,
        model_path: Some(PathBuf::from("/definitely/not/here")),
        ..Default::default()
    };
    assert!(config.validate().is_ok());
}

#[test]
fn test_validate_default_hub_config() {
    assert!(Config::default().validate().is_ok());
}

#[test]
fn test_validate_missing_model_dir() {
    let config = Config {
        model_path: Some(PathBuf::from("/definitely/not/here")),
        ..Default::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::PathNotFound { .. })
    ));
}

#[test]
fn test_validate_model_path_is_file() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("model.bin");
    std::fs::write(&file, b"x").unwrap();

    let config = Config {
        model_path: Some(file),
        ..Default::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::NotADirectory { .. })
    ));
}

#[test]
fn test_validate_incomplete_model_dir() {
    let dir = model_dir_with(&[MODEL_CONFIG_FILE, MODEL_TOKENIZER_FILE]);
    let config = Config {
        model_path: Some(dir.path().to_path_buf()),
        ..Default::default()
    };

    match config.validate() {
        Err(ConfigError::MissingModelFile { file, .. }) => assert_eq!(file, MODEL_WEIGHTS_FILE),
        other => panic!("expected MissingModelFile, got {other:?}"),
    }
}

#[test]
fn test_validate_complete_model_dir() {
    let dir = model_dir_with(&[MODEL_CONFIG_FILE, MODEL_TOKENIZER_FILE, MODEL_WEIGHTS_FILE]);
    let config = Config {
        model_path: Some(dir.path().to_path_buf()),
        ..Default::default()
    };
    assert!(config.validate().is_ok());
}

#[test]
fn test_validate_cache_must_be_directory() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("cache");
    std::fs::write(&file, b"x").unwrap();

    let config = Config {
        model_cache: Some(file),
        ..Default::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::NotADirectory { .. })
    ));
}

#[test]
fn test_validate_overlapping_thresholds() {
    let config = Config {
        excellent_threshold: 50.0,
        partial_threshold: 70.0,
        stub_embedder: true,
        ..Default::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidThresholds { .. })
    ));
}

#[test]
fn test_grading_policy_from_thresholds() {
    let config = Config {
        excellent_threshold: 92.0,
        partial_threshold: 70.0,
        ..Default::default()
    };
    let policy = config.grading_policy().unwrap();
    assert_eq!(policy.excellent_at(), 92.0);
    assert_eq!(policy.partial_at(), 70.0);
}

#[test]
fn test_sentence_config_stub() {
    let config = Config {
        stub_embedder: true,
        ..Default::default()
    };
    assert!(config.sentence_config().testing_stub);
}

#[test]
fn test_sentence_config_local_wins_over_hub() {
    let config = Config {
        model_path: Some(PathBuf::from("/models/minilm")),
        model_id: "ignored/model".to_string(),
        max_seq_len: 64,
        device: DevicePreference::Cpu,
        ..Default::default()
    };
    let sentence = config.sentence_config();

    assert_eq!(
        sentence.source,
        ModelSource::Local(PathBuf::from("/models/minilm"))
    );
    assert_eq!(sentence.max_seq_len, 64);
    assert_eq!(sentence.device, DevicePreference::Cpu);
    assert!(!sentence.testing_stub);
}

#[test]
fn test_sentence_config_hub() {
    let config = Config {
        model_cache: Some(PathBuf::from("/var/cache/hf")),
        ..Default::default()
    };

    assert_eq!(
        config.sentence_config().source,
        ModelSource::Hub {
            model_id: DEFAULT_MODEL_ID.to_string(),
            cache_dir: Some(PathBuf::from("/var/cache/hf")),
        }
    );
}
