use std::path::PathBuf;

use crate::Ear;

/// Reasons a dataset could not be loaded.
///
/// Individual lines which fail to parse are not errors: they load as zero and are reported in the log.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Unable to open the {ear} ear dataset at {}: {source}", .path.display())]
    Open {
        ear: Ear,
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Error while reading the {ear} ear dataset: {source}")]
    Read { ear: Ear, source: std::io::Error },

    #[error("The {ear} ear dataset has {found} coefficients, but exactly {expected} are required")]
    WrongCoefficientCount {
        ear: Ear,
        expected: usize,
        found: usize,
    },
}
