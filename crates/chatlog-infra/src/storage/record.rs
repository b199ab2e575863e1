//! Fixed-size binary record codec for the history file.
//!
//! The file is a bare sequence of records with no header, count, magic or
//! version. End of file is the only terminator.
//!
//! ```text
//! offset  size  field
//! 0       8     created_at, i64 little-endian (seconds since epoch)
//! 8       256   text, UTF-8 bytes then zero padding; byte 255 is always 0
//! ```
//!
//! A trailing partial record is treated as end of stream.

use std::io::{self, ErrorKind, Read, Write};

use chatlog_types::message::{MAX_TEXT_BYTES, Message, MessageText, TEXT_FIELD_LEN};
use tracing::{debug, warn};

/// Width of the timestamp field.
pub const TIMESTAMP_LEN: usize = 8;

/// Total length of one record (264 bytes).
pub const RECORD_LEN: usize = TIMESTAMP_LEN + TEXT_FIELD_LEN;

/// Encode one message as a fixed-size record.
pub fn encode_record(message: &Message) -> [u8; RECORD_LEN] {
    let mut record = [0u8; RECORD_LEN];
    record[..TIMESTAMP_LEN].copy_from_slice(&message.created_at().to_le_bytes());

    // MessageText is bounded to MAX_TEXT_BYTES, so the terminator byte stays zero.
    let text = message.text().as_str().as_bytes();
    let len = text.len().min(MAX_TEXT_BYTES);
    record[TIMESTAMP_LEN..TIMESTAMP_LEN + len].copy_from_slice(&text[..len]);
    record
}

/// Decode one record.
///
/// Text runs to the first zero byte within the first 255 bytes of the field.
/// Invalid UTF-8 is replaced and the result is re-bounded.
pub fn decode_record(record: &[u8; RECORD_LEN]) -> Message {
    let mut stamp = [0u8; TIMESTAMP_LEN];
    stamp.copy_from_slice(&record[..TIMESTAMP_LEN]);
    let created_at = i64::from_le_bytes(stamp);

    let field = &record[TIMESTAMP_LEN..TIMESTAMP_LEN + MAX_TEXT_BYTES];
    let end = field.iter().position(|&b| b == 0).unwrap_or(field.len());
    let text = MessageText::new(&String::from_utf8_lossy(&field[..end]));

    Message::new(text, created_at)
}

/// Write `messages` as consecutive records. Returns the number written.
pub fn write_records<'a, W, I>(writer: &mut W, messages: I) -> io::Result<usize>
where
    W: Write,
    I: IntoIterator<Item = &'a Message>,
{
    let mut written = 0;
    for message in messages {
        writer.write_all(&encode_record(message))?;
        written += 1;
    }
    Ok(written)
}

/// Iterator over the records of a history stream.
///
/// Stops at end of file, at a partial trailing record, or at the first read
/// error. None of these end the iteration with a failure; a read error is
/// kept and can be collected with [`take_error`](Self::take_error).
pub struct RecordReader<R> {
    inner: R,
    done: bool,
    error: Option<io::Error>,
}

impl<R: Read> RecordReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            done: false,
            error: None,
        }
    }

    /// The read error that ended the stream, if any.
    ///
    /// `None` after a clean end of file or a discarded partial record.
    pub fn take_error(&mut self) -> Option<io::Error> {
        self.error.take()
    }

    /// Fill `buf` as far as the stream allows. Returns the bytes read.
    fn fill(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(err),
            }
        }
        Ok(filled)
    }
}

impl<R: Read> Iterator for RecordReader<R> {
    type Item = Message;

    fn next(&mut self) -> Option<Message> {
        if self.done {
            return None;
        }

        let mut record = [0u8; RECORD_LEN];
        match self.fill(&mut record) {
            Ok(RECORD_LEN) => Some(decode_record(&record)),
            Ok(0) => {
                self.done = true;
                None
            }
            Ok(partial) => {
                debug!(partial, "discarding partial trailing record");
                self.done = true;
                None
            }
            Err(err) => {
                warn!(error = %err, "history read failed, treating as end of stream");
                self.done = true;
                self.error = Some(err);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(text: &str, created_at: i64) -> Message {
        Message::new(MessageText::new(text), created_at)
    }

    #[test]
    fn test_record_layout() {
        let record = encode_record(&msg("hi", 0x0102_0304));
        assert_eq!(record.len(), 264);
        assert_eq!(&record[..8], &[0x04, 0x03, 0x02, 0x01, 0, 0, 0, 0]);
        assert_eq!(&record[8..10], b"hi");
        assert!(record[10..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_full_text_keeps_terminator() {
        let record = encode_record(&msg(&"m".repeat(300), 1));
        assert!(record[8..8 + 255].iter().all(|&b| b == b'm'));
        assert_eq!(record[RECORD_LEN - 1], 0);
        assert_eq!(decode_record(&record).text().as_str().len(), 255);
    }

    #[test]
    fn test_negative_timestamp_survives() {
        let record = encode_record(&msg("past", -86_400));
        assert_eq!(decode_record(&record).created_at(), -86_400);
    }

    #[test]
    fn test_decode_ignores_missing_terminator() {
        let mut record = [b'z'; RECORD_LEN];
        record[..TIMESTAMP_LEN].copy_from_slice(&5i64.to_le_bytes());
        let message = decode_record(&record);
        assert_eq!(message.created_at(), 5);
        assert_eq!(message.text().as_str().len(), MAX_TEXT_BYTES);
    }

    #[test]
    fn test_decode_replaces_invalid_utf8() {
        let mut record = [0u8; RECORD_LEN];
        record[8..11].copy_from_slice(&[b'o', 0xFF, b'k']);
        assert_eq!(decode_record(&record).text().as_str(), "o\u{FFFD}k");
    }

    #[test]
    fn test_reader_stops_at_partial_record() {
        let mut bytes = Vec::new();
        write_records(&mut bytes, &[msg("a", 1), msg("b", 2)]).unwrap();
        bytes.extend_from_slice(&[7u8; 100]);

        let messages: Vec<Message> = RecordReader::new(bytes.as_slice()).collect();
        assert_eq!(messages, vec![msg("a", 1), msg("b", 2)]);
    }

    #[test]
    fn test_reader_on_empty_stream() {
        let empty: &[u8] = &[];
        assert_eq!(RecordReader::new(empty).count(), 0);
    }

    #[test]
    fn test_reader_stops_on_read_error() {
        struct Failing;
        impl Read for Failing {
            fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::other("device gone"))
            }
        }
        let mut reader = RecordReader::new(Failing);
        assert!(reader.next().is_none());
        assert!(reader.next().is_none());
        assert_eq!(reader.take_error().unwrap().to_string(), "device gone");
        assert!(reader.take_error().is_none());
    }

    #[test]
    fn test_reader_keeps_records_before_error() {
        struct FailAfter {
            data: Vec<u8>,
            pos: usize,
        }
        impl Read for FailAfter {
            fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
                if self.pos >= self.data.len() {
                    return Err(io::Error::other("device gone"));
                }
                let n = buf.len().min(self.data.len() - self.pos);
                buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
                self.pos += n;
                Ok(n)
            }
        }

        let mut data = Vec::new();
        write_records(&mut data, &[msg("a", 1)]).unwrap();
        let mut reader = RecordReader::new(FailAfter { data, pos: 0 });

        let messages: Vec<Message> = reader.by_ref().collect();
        assert_eq!(messages, vec![msg("a", 1)]);
        assert!(reader.take_error().is_some());
    }

    #[test]
    fn test_clean_end_has_no_error() {
        let mut bytes = Vec::new();
        write_records(&mut bytes, &[msg("a", 1)]).unwrap();
        bytes.extend_from_slice(&[1u8; 10]);

        let mut reader = RecordReader::new(bytes.as_slice());
        assert_eq!(reader.by_ref().count(), 1);
        assert!(reader.take_error().is_none());
    }
}
