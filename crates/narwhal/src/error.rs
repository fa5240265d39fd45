pub type Result<T> = std::result::Result<T, Error>;

/// Boxed error returned by caller-supplied hooks and predicates.
pub type CallbackError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no split node found in the laid out parts")]
    MissingSplit,

    #[error("no merge node found in the laid out parts")]
    MissingMerge,

    #[error("split node already exists -- existing: `{existing}` new: `{found}`")]
    DuplicateSplit { existing: String, found: String },

    #[error("merge node already exists -- existing: `{existing}` new: `{found}`")]
    DuplicateMerge { existing: String, found: String },

    #[error("{layout} does not support an angle of {angle} degrees")]
    UnsupportedAngle { layout: &'static str, angle: f64 },

    #[error("root `{key}` is not a node in the network being laid out")]
    RootNotInNetwork { key: String },

    #[error("invalid value for `{name}`: {message}")]
    InvalidOption { name: &'static str, message: String },

    #[error("unknown layout algorithm `{name}`")]
    UnknownAlgorithm { name: String },

    #[error("invalid layout configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error(transparent)]
    Network(#[from] narwhal_network::Error),

    #[error(transparent)]
    Callback(CallbackError),
}

impl Error {
    pub fn callback(err: impl Into<CallbackError>) -> Self {
        Self::Callback(err.into())
    }
}

pub(crate) fn ensure_spacing(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidOption {
            name,
            message: format!("expected a finite, non-negative number, got {value}"),
        })
    }
}
