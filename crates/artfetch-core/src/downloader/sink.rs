//! Response sink that materializes the destination file lazily.
//!
//! Nothing touches the filesystem until the first byte of a 2xx body arrives
//! (or the transfer ends with an empty 2xx body), so an error response never
//! leaves a file behind. Bytes of non-2xx responses are kept as diagnostics.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::cancel::CancelFlag;
use crate::error::{FetchError, MAX_ERROR_BODY};
use crate::http::{is_success, ResponseSink};

pub(super) struct FileSink<'a> {
    destination: &'a Path,
    cancel: &'a CancelFlag,
    file: Option<BufWriter<File>>,
    written: u64,
    last_status: Option<u32>,
    error_body: Vec<u8>,
    failure: Option<FetchError>,
}

impl<'a> FileSink<'a> {
    pub(super) fn new(destination: &'a Path, cancel: &'a CancelFlag) -> Self {
        Self {
            destination,
            cancel,
            file: None,
            written: 0,
            last_status: None,
            error_body: Vec::new(),
            failure: None,
        }
    }

    /// Body of the last non-2xx response, for error reporting.
    pub(super) fn error_body(&self) -> &[u8] {
        &self.error_body
    }

    /// The error that made this sink refuse a chunk, if any.
    pub(super) fn take_failure(&mut self) -> Option<FetchError> {
        self.failure.take()
    }

    /// Flush the destination (creating it for an empty body) and return the byte count.
    pub(super) fn finish(mut self) -> Result<u64, FetchError> {
        if self.file.is_none() {
            self.open()?;
        }
        if let Some(mut file) = self.file.take() {
            file.flush()
                .map_err(|e| FetchError::io("copy body to output file", self.destination, e))?;
        }
        Ok(self.written)
    }

    fn open(&mut self) -> Result<(), FetchError> {
        if let Some(parent) = self.destination.parent() {
            fs::create_dir_all(parent).map_err(|e| FetchError::io("make output dir", parent, e))?;
        }
        let file = File::create(self.destination)
            .map_err(|e| FetchError::io("open output file", self.destination, e))?;
        tracing::trace!(path = %self.destination.display(), "output file created");
        self.file = Some(BufWriter::new(file));
        Ok(())
    }

    fn refuse(&mut self, failure: FetchError) -> io::Error {
        let err = io::Error::other(failure.to_string());
        self.failure = Some(failure);
        err
    }

    fn write_body(&mut self, data: &[u8]) -> Result<(), FetchError> {
        if self.file.is_none() {
            self.open()?;
        }
        if let Some(file) = self.file.as_mut() {
            file.write_all(data)
                .map_err(|e| FetchError::io("copy body to output file", self.destination, e))?;
            self.written += data.len() as u64;
        }
        Ok(())
    }
}

impl ResponseSink for FileSink<'_> {
    fn write(&mut self, status: u32, data: &[u8]) -> io::Result<()> {
        if self.cancel.is_cancelled() {
            return Err(self.refuse(FetchError::Cancelled));
        }
        // A new status means a new response (redirect hop); only the last one's body counts.
        if self.last_status != Some(status) {
            self.error_body.clear();
            self.last_status = Some(status);
        }
        if !is_success(status) {
            let room = MAX_ERROR_BODY.saturating_sub(self.error_body.len());
            self.error_body.extend_from_slice(&data[..data.len().min(room)]);
            return Ok(());
        }
        self.write_body(data).map_err(|failure| self.refuse(failure))
    }
}
