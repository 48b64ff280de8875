use core::error::Error;

type BoxError = Box<dyn Error + Send + Sync>;

/// Failure of a [`DataDecoder`] or [`DataEncoder`].
///
/// The format's own error is kept as the source.
///
/// [`DataDecoder`]: crate::DataDecoder
/// [`DataEncoder`]: crate::DataEncoder
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("failed to decode {format}: {source}")]
    Decode {
        format: &'static str,
        source: BoxError,
    },
    #[error("failed to encode {format}: {source}")]
    Encode {
        format: &'static str,
        source: BoxError,
    },
}

impl CodecError {
    #[inline]
    pub fn decode<E: Into<BoxError>>(format: &'static str) -> impl FnOnce(E) -> Self {
        move |error| Self::Decode {
            format,
            source: error.into(),
        }
    }

    #[inline]
    pub fn encode<E: Into<BoxError>>(format: &'static str) -> impl FnOnce(E) -> Self {
        move |error| Self::Encode {
            format,
            source: error.into(),
        }
    }

    /// The name of the format that failed.
    pub fn format(&self) -> &'static str {
        match self {
            Self::Decode { format, .. } | Self::Encode { format, .. } => format,
        }
    }
}
