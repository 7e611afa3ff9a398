use crate::kernels::{KernelError, KernelVariant};
use derive_builder::Builder;
use std::str::FromStr;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Error type returned by settings validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    /// A field holds a value that is not valid for this build
    #[error("Bad value for field \"{0}\"")]
    BadFieldValue(&'static str),
    /// Settings could not be read from / written to json
    #[cfg(feature = "serde")]
    #[error("Invalid settings json: {0}")]
    Json(String),
}

/// Construction settings for a [`CholeskyEngine`](crate::cholesky::CholeskyEngine).
///
/// Build with [`CholeskySettingsBuilder`], which validates the string
/// valued fields before returning.
#[derive(Builder, Debug, Clone, PartialEq, Eq)]
#[builder(build_fn(validate = "Self::validate"))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CholeskySettings {
    /// reduction kernels: "scalar", "simd", "auto", or "blas"
    /// (the last only when compiled with the `blas` feature)
    #[builder(default = r#""scalar".to_string()"#)]
    pub kernel_method: String,
}

impl Default for CholeskySettings {
    fn default() -> CholeskySettings {
        CholeskySettings {
            kernel_method: "scalar".to_string(),
        }
    }
}

impl CholeskySettings {
    /// Checks that the settings are valid.  This only ensures that fields
    /// specified by strings contain valid options.
    pub fn validate(&self) -> Result<(), SettingsError> {
        validate_kernel_method(&self.kernel_method)
    }

    /// Resolves `kernel_method` to a kernel variant
    pub fn kernel(&self) -> Result<KernelVariant, KernelError> {
        KernelVariant::from_str(&self.kernel_method)
    }

    /// Reads settings from a json string.  Missing fields take their
    /// default values.
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: CholeskySettings =
            serde_json::from_str(json).map_err(|e| SettingsError::Json(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> Result<String, SettingsError> {
        serde_json::to_string(self).map_err(|e| SettingsError::Json(e.to_string()))
    }
}

// pre build checker (for auto-validation when using the builder)

impl From<SettingsError> for CholeskySettingsBuilderError {
    fn from(e: SettingsError) -> Self {
        CholeskySettingsBuilderError::ValidationError(e.to_string())
    }
}

/// Automatic pre-build settings validation
impl CholeskySettingsBuilder {
    /// check that the specified kernel_method is valid
    pub fn validate(&self) -> Result<(), SettingsError> {
        if let Some(ref kernel_method) = self.kernel_method {
            validate_kernel_method(kernel_method)?;
        }
        Ok(())
    }
}

fn validate_kernel_method(kernel_method: &str) -> Result<(), SettingsError> {
    match KernelVariant::from_str(kernel_method) {
        Ok(_) => Ok(()),
        Err(_) => Err(SettingsError::BadFieldValue("kernel_method")),
    }
}

#[test]
fn test_settings_validate() {
    // all standard settings
    let settings = CholeskySettingsBuilder::default().build().unwrap();
    assert_eq!(settings, CholeskySettings::default());
    assert_eq!(settings.kernel(), Ok(KernelVariant::Scalar));

    for method in ["scalar", "simd", "auto"] {
        assert!(CholeskySettingsBuilder::default()
            .kernel_method(method.to_string())
            .build()
            .is_ok());
    }

    // fail on unknown kernel method
    assert!(CholeskySettingsBuilder::default()
        .kernel_method("foo".to_string())
        .build()
        .is_err());

    // fail on kernel options in disabled feature
    let builder = CholeskySettingsBuilder::default()
        .kernel_method("blas".to_string())
        .build();
    cfg_if::cfg_if! {
        if #[cfg(feature = "blas")] {
            assert!(builder.is_ok());
        }
        else {
            assert!(builder.is_err());
        }
    }

    // directly construct bad settings and manually check
    let settings = CholeskySettings {
        kernel_method: "foo".to_string(),
    };
    assert_eq!(
        settings.validate(),
        Err(SettingsError::BadFieldValue("kernel_method"))
    );
}
