use std::error::Error;
use std::fmt;
use std::io::{self, Write};

/// Failure while writing rows.
#[derive(Debug)]
pub enum SinkError {
    /// The reader on the other end of the output stream went away.
    ConsumerClosed,
    Io(io::Error),
}

impl fmt::Display for SinkError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SinkError::ConsumerClosed => write!(f, "output consumer closed the stream"),
            SinkError::Io(e) => write!(f, "Error writing output: {}", e),
        }
    }
}

impl Error for SinkError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SinkError::ConsumerClosed => None,
            SinkError::Io(e) => Some(e),
        }
    }
}

impl From<io::Error> for SinkError {
    fn from(e: io::Error) -> Self {
        if e.kind() == io::ErrorKind::BrokenPipe {
            SinkError::ConsumerClosed
        } else {
            SinkError::Io(e)
        }
    }
}

impl From<csv::Error> for SinkError {
    fn from(e: csv::Error) -> Self {
        match e.into_kind() {
            csv::ErrorKind::Io(e) => SinkError::from(e),
            other => SinkError::Io(io::Error::new(
                io::ErrorKind::Other,
                format!("{:?}", other),
            )),
        }
    }
}

/// True when `err` (or anything in its chain) is a closed consumer.
pub fn is_consumer_closed(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        matches!(
            cause.downcast_ref::<SinkError>(),
            Some(SinkError::ConsumerClosed)
        )
    })
}

/// Tab-separated row writer.
pub struct TsvSink<W: Write> {
    writer: csv::Writer<W>,
    rows: u64,
}

impl<W: Write> TsvSink<W> {
    pub fn new(out: W) -> Self {
        let writer = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .quote_style(csv::QuoteStyle::Never)
            .from_writer(out);
        Self { writer, rows: 0 }
    }

    pub fn write_header(&mut self, fields: &[String]) -> Result<(), SinkError> {
        self.writer.write_record(fields)?;
        Ok(())
    }

    pub fn write_row(&mut self, row: &[String]) -> Result<(), SinkError> {
        self.writer.write_record(row)?;
        self.rows += 1;
        Ok(())
    }

    /// Data rows written so far, header excluded.
    pub fn rows(&self) -> u64 {
        self.rows
    }

    pub fn finish(&mut self) -> Result<(), SinkError> {
        self.writer.flush()?;
        Ok(())
    }
}
