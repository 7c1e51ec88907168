pub mod classify;
pub mod content;
pub mod error;
pub mod lookahead;
pub mod normalise;
pub mod pull;
pub mod types;

pub use classify::{classify, Shape};
pub use content::{ByteStream, BytesNormaliser, ContentNormaliser};
pub use error::{NormaliseError, Result};
pub use lookahead::Lookahead;
pub use normalise::{normalise, FileRecordStream};
pub use pull::{PullReader, PullSource};
pub use types::{
    Blob, FileInput, FileRecord, InputValue, Mode, Mtime, StreamSource, ValueIter, ValueStream,
};
