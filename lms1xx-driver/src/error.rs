use std::error::Error;
use std::fmt::{self, Display};
use std::io;

#[derive(Debug)]
pub enum Lms1xxError {
    ConnectionError(io::Error),
    TimeoutError(),
    FramingError(String),
    MalformedResponse(String),
    UnexpectedResponse(String, String),
    DecodeError(String),
    StateError(&'static str),
    InvalidConfig(String),
}

impl fmt::Display for Lms1xxError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Lms1xxError::ConnectionError(err) => Display::fmt(&err, f),
            Lms1xxError::TimeoutError() => write!(f, "Operation timed out"),
            Lms1xxError::FramingError(detail) => write!(f, "Telegram framing violated: {}.", detail),
            Lms1xxError::MalformedResponse(detail) => write!(f, "Malformed response: {}.", detail),
            Lms1xxError::UnexpectedResponse(expected, actual) => write!(f, "Expected response \"{}\" but obtained \"{}\".", expected, actual),
            Lms1xxError::DecodeError(detail) => write!(f, "Scan data could not be decoded: {}.", detail),
            Lms1xxError::StateError(detail) => write!(f, "Operation not allowed in the current session state: {}.", detail),
            Lms1xxError::InvalidConfig(detail) => write!(f, "Invalid scan configuration: {}.", detail),
        }
    }
}

impl Error for Lms1xxError {}

impl From<io::Error> for Lms1xxError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => Lms1xxError::TimeoutError(),
            _ => Lms1xxError::ConnectionError(err),
        }
    }
}
