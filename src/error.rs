// A tiny error type so we don't rely on anyhow/thiserror.
// Every variant states *where* things went wrong.
use std::fmt::{self, Display};

#[derive(Debug)]
pub enum Error {
    WindowInit(String),   // Creating the window failed
    WindowUpdate(String), // Pushing the frame to the window failed
    Encode(String),       // Turning the canvas into PNG bytes failed
    Decode(String),       // Reading an image (bytes, data URL or file) failed
    Config(String),       // Reading or writing the settings file failed
    Credits(String),      // Reading or writing the credit ledger failed
    EmptyCanvas,          // Generation asked for with nothing drawn
    Transform(String),    // An external AI collaborator reported a failure
}

impl Display for Error {
    // This decides how the error is printed to your console.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::WindowInit(s) => write!(f, "Window init error: {s}"),
            Error::WindowUpdate(s) => write!(f, "Window update error: {s}"),
            Error::Encode(s) => write!(f, "Image encode error: {s}"),
            Error::Decode(s) => write!(f, "Image decode error: {s}"),
            Error::Config(s) => write!(f, "Settings error: {s}"),
            Error::Credits(s) => write!(f, "Credit ledger error: {s}"),
            Error::EmptyCanvas => write!(f, "Canvas is empty: draw something before generating"),
            Error::Transform(s) => write!(f, "Transform error: {s}"),
        }
    }
}

impl std::error::Error for Error {}
