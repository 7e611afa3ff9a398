#![cfg(feature = "serde")]

use simdchol::{cholesky::*, kernels::*};

#[test]
fn test_settings_json_round_trip() {
    let settings = CholeskySettingsBuilder::default()
        .kernel_method("simd".to_string())
        .build()
        .unwrap();

    let json = settings.to_json().unwrap();
    assert_eq!(json, r#"{"kernel_method":"simd"}"#);

    let restored = CholeskySettings::from_json(&json).unwrap();
    assert_eq!(restored, settings);
    assert_eq!(restored.kernel(), Ok(KernelVariant::Simd));
}

#[test]
fn test_settings_json_defaults_and_errors() {
    // missing fields take default values
    let settings = CholeskySettings::from_json("{}").unwrap();
    assert_eq!(settings, CholeskySettings::default());

    assert_eq!(
        CholeskySettings::from_json(r#"{"kernel_method":"gpu"}"#),
        Err(SettingsError::BadFieldValue("kernel_method"))
    );
    assert!(matches!(
        CholeskySettings::from_json("not json"),
        Err(SettingsError::Json(_))
    ));
}

#[test]
fn test_engine_from_json_settings() {
    let settings = CholeskySettings::from_json(r#"{"kernel_method":"auto"}"#).unwrap();
    let engine = CholeskyEngine::new(4, Some(settings)).unwrap();
    assert_eq!(engine.kernel(), KernelVariant::best());
    assert_eq!(engine.size(), 4);
}
