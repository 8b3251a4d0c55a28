use soundstage_datasets::LoadError;

use crate::block_buffer::BlockSizeError;

#[derive(Debug, derive_more::Display, derive_more::IsVariant)]
enum ErrorPayload {
    #[display(fmt = "HRIR dataset error: {}", _0)]
    Dataset(LoadError),

    #[display(fmt = "Block size error: {}", _0)]
    BlockSize(BlockSizeError),

    #[display(fmt = "Unable to determine where the HRIR dataset lives; specify a directory explicitly")]
    NoDatasetLocation,
}

#[derive(Debug, thiserror::Error)]
#[error("{payload}")]
pub struct Error {
    payload: ErrorPayload,
}

macro_rules! conv {
    ($variant: ident, $from_err: path) => {
        impl From<$from_err> for Error {
            fn from(value: $from_err) -> Error {
                Error {
                    payload: ErrorPayload::$variant(value),
                }
            }
        }
    };
}

conv!(Dataset, LoadError);
conv!(BlockSize, BlockSizeError);

impl Error {
    pub(crate) fn no_dataset_location() -> Error {
        Error {
            payload: ErrorPayload::NoDatasetLocation,
        }
    }

    /// Does this error come from loading the HRIR dataset?
    pub fn is_dataset(&self) -> bool {
        self.payload.is_dataset() || self.payload.is_no_dataset_location()
    }

    /// Was a block size rejected?
    pub fn is_block_size(&self) -> bool {
        self.payload.is_block_size()
    }

    /// The underlying dataset error, if this is one.
    pub fn as_load_error(&self) -> Option<&LoadError> {
        match &self.payload {
            ErrorPayload::Dataset(e) => Some(e),
            _ => None,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
