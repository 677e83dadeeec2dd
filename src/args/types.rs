use std::num::NonZeroU64;
use std::path::Path;

use clap::ValueEnum;

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositiveU64(NonZeroU64);

impl PositiveU64 {
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0.get()
    }
}

impl TryFrom<u64> for PositiveU64 {
    type Error = ValidationError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        NonZeroU64::new(value)
            .map(PositiveU64)
            .ok_or(ValidationError::ValueTooSmall { min: 1 })
    }
}

impl std::str::FromStr for PositiveU64 {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: u64 = s
            .parse()
            .map_err(|err| ValidationError::InvalidNumber { source: err })?;
        PositiveU64::try_from(value)
    }
}

/// Surface that `convert` writes.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    Toml,
    Hcl,
}

impl OutputFormat {
    /// Picks HCL for a `.hcl` output path and TOML otherwise.
    #[must_use]
    pub fn for_path(path: Option<&Path>) -> Self {
        match path.and_then(|path| path.extension()).and_then(|ext| ext.to_str()) {
            Some("hcl") => Self::Hcl,
            Some(_) | None => Self::Toml,
        }
    }
}
