use dynarr::ArrayError;

#[derive(Debug)]
pub enum LogError {
    UnknownFormat(ArrayError),
    IoError(std::io::Error),
}

impl core::fmt::Display for LogError {

    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::UnknownFormat(_) => write!(f, "unknown custom log format"),
            Self::IoError(_) => write!(f, "IO error"),
        }
    }
}

impl core::error::Error for LogError {

    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::UnknownFormat(err) => Some(err),
            Self::IoError(err) => Some(err),
        }
    }
}

impl From<ArrayError> for LogError {

    fn from(value: ArrayError) -> Self {
        Self::UnknownFormat(value)
    }
}

impl From<std::io::Error> for LogError {

    fn from(value: std::io::Error) -> Self {
        Self::IoError(value)
    }
}
