mod constants;

mod term;
pub use term::Term;

mod config;
pub use config::{DecodeConfig, EncodeConfig, MinorVersion, DEFAULT_BUFFER_SIZE};

mod decoder;
pub use decoder::{DecodeError, Decoder};

mod encoder;
pub use encoder::{EncodeError, Encoder};
