use std::path::{Path, PathBuf};

use crate::Ear;

/// File name of the left ear's coefficients within a dataset directory.
pub const LEFT_FILE_NAME: &str = "hrir_l.txt";

/// File name of the right ear's coefficients within a dataset directory.
pub const RIGHT_FILE_NAME: &str = "hrir_r.txt";

/// If set, this environment variable names the directory holding the dataset and takes priority over the platform
/// default.
pub const DATA_DIR_ENV: &str = "SOUNDSTAGE_DATA_DIR";

/// Where the two text files of a dataset live.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct DatasetPaths {
    pub left: PathBuf,
    pub right: PathBuf,
}

impl DatasetPaths {
    /// The dataset stored with the standard file names in `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> DatasetPaths {
        let dir = dir.as_ref();
        DatasetPaths {
            left: dir.join(LEFT_FILE_NAME),
            right: dir.join(RIGHT_FILE_NAME),
        }
    }

    /// The dataset in the directory named by [DATA_DIR_ENV] if set, otherwise in the platform's data directory for
    /// SoundStage.
    ///
    /// Returns `None` only if the environment variable is unset and the platform has no notion of a home directory.
    pub fn default_location() -> Option<DatasetPaths> {
        if let Some(dir) = std::env::var_os(DATA_DIR_ENV) {
            return Some(Self::in_dir(dir));
        }

        directories::ProjectDirs::from("", "", "SoundStage").map(|dirs| Self::in_dir(dirs.data_dir()))
    }

    pub fn for_ear(&self, ear: Ear) -> &Path {
        match ear {
            Ear::Left => &self.left,
            Ear::Right => &self.right,
        }
    }
}
