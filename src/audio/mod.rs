//! Upload handling and advisory audio validation

mod uploads;
mod validate;

pub use uploads::{StoredUpload, UploadStore};
pub use validate::{validate_wav, AudioLimits, AudioProbe};
