//! src/stream/io.rs
//!
//! Normalized I/O for the codec.
//!
//! - `InputSource` / `OutputSink` let callers hand over readers, paths or
//!   in-memory buffers; `open_input` / `open_output` turn them into boxed
//!   `Read` / `Write` objects.
//! - `read_full` fills a buffer across short reads, which `Read::read` is
//!   allowed to return at any time.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Cursor, Read, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::types::StreamError;

/// Canonical input abstraction
pub enum InputSource {
    Reader(Box<dyn Read + Send>),
    File(PathBuf),
    Memory(Vec<u8>),
}

/// Canonical output abstraction
pub enum OutputSink {
    Writer(Box<dyn Write + Send>),
    File(PathBuf),
    /// Collect the output in memory; it is handed back through the
    /// telemetry snapshot.
    Memory,
}

/// Normalize input source into a boxed reader
pub fn open_input(src: InputSource) -> Result<Box<dyn Read + Send>, StreamError> {
    let reader: Box<dyn Read + Send> = match src {
        InputSource::Reader(r) => r,
        InputSource::File(p) => Box::new(BufReader::new(File::open(p)?)),
        InputSource::Memory(b) => Box::new(Cursor::new(b)),
    };
    Ok(reader)
}

/// Normalize output sink into a boxed writer.
///
/// For `OutputSink::Memory` the second element is the shared buffer that
/// receives everything written.
pub fn open_output(
    sink: OutputSink,
) -> Result<(Box<dyn Write + Send>, Option<Arc<Mutex<Vec<u8>>>>), StreamError> {
    match sink {
        OutputSink::Writer(w) => Ok((w, None)),
        OutputSink::File(p) => Ok((Box::new(BufWriter::new(File::create(p)?)), None)),
        OutputSink::Memory => {
            let buf = Arc::new(Mutex::new(Vec::new()));
            let writer = SharedBufferWriter { buf: buf.clone() };
            Ok((Box::new(writer), Some(buf)))
        }
    }
}

/// Take the bytes collected by a memory sink.
pub fn take_captured(buf: &Arc<Mutex<Vec<u8>>>) -> Vec<u8> {
    match buf.lock() {
        Ok(mut guard) => std::mem::take(&mut *guard),
        Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
    }
}

pub struct SharedBufferWriter {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl Write for SharedBufferWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        let mut guard = self
            .buf
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "capture buffer poisoned"))?;
        guard.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Read until `buf` is full or the source reports EOF.
///
/// Returns the number of bytes read; less than `buf.len()` only at EOF.
pub fn read_full<R: Read + ?Sized>(r: &mut R, buf: &mut [u8]) -> Result<usize, StreamError> {
    let mut off = 0;
    while off < buf.len() {
        match r.read(&mut buf[off..]) {
            Ok(0) => break,
            Ok(n) => off += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(StreamError::Io(e)),
        }
    }
    Ok(off)
}

/// Fill `buf` completely; a short source is `StreamError::Truncated`.
pub fn read_exact_or_truncated<R: Read + ?Sized>(
    r: &mut R,
    buf: &mut [u8],
    context: &'static str,
) -> Result<(), StreamError> {
    let n = read_full(r, buf)?;
    if n < buf.len() {
        return Err(StreamError::Truncated {
            context,
            expected: buf.len() as u64,
            actual: n as u64,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Hands out at most `step` bytes per call.
    struct Trickle<'a> {
        data: &'a [u8],
        step: usize,
    }

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = self.step.min(buf.len()).min(self.data.len());
            buf[..n].copy_from_slice(&self.data[..n]);
            self.data = &self.data[n..];
            Ok(n)
        }
    }

    #[test]
    fn read_full_loops_over_short_reads() {
        let data: Vec<u8> = (0..100).collect();
        let mut r = Trickle { data: &data, step: 7 };
        let mut buf = [0u8; 64];
        assert_eq!(read_full(&mut r, &mut buf).unwrap(), 64);
        assert_eq!(&buf[..], &data[..64]);

        let mut rest = [0u8; 64];
        assert_eq!(read_full(&mut r, &mut rest).unwrap(), 36);
    }

    #[test]
    fn read_exact_or_truncated_reports_counts() {
        let mut r = Cursor::new(vec![1u8, 2, 3]);
        let mut buf = [0u8; 5];
        match read_exact_or_truncated(&mut r, &mut buf, "test") {
            Err(StreamError::Truncated { context, expected, actual }) => {
                assert_eq!(context, "test");
                assert_eq!(expected, 5);
                assert_eq!(actual, 3);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn memory_sink_captures_writes() {
        let (mut w, buf) = open_output(OutputSink::Memory).unwrap();
        w.write_all(b"hello").unwrap();
        w.write_all(b" world").unwrap();
        let buf = buf.unwrap();
        assert_eq!(take_captured(&buf), b"hello world");
    }
}
