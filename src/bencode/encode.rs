use super::error::BencodeError;
use super::value::Value;
use std::io::Write;

/// Streaming bencode primitives.
///
/// Callers nest `open_*`/`close_*` pairs to build arbitrarily deep structures
/// without first constructing a [`Value`] tree. Dictionary keys are written
/// with [`write_bytes`](Encoder::write_bytes) like any other byte string; the
/// caller is responsible for emitting them in the order it wants.
///
/// Every `open_*` must be matched by the corresponding `close_*`. A mismatch
/// is a bug in the caller and panics rather than returning an error.
pub trait Encoder {
    /// Writes an integer as `i<decimal>e`.
    fn write_int(&mut self, value: i64) -> Result<(), BencodeError>;

    /// Writes a byte string as `<length>:<bytes>`.
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), BencodeError>;

    /// Starts a list (`l`).
    fn open_list(&mut self) -> Result<(), BencodeError>;

    /// Ends the innermost open list (`e`).
    fn close_list(&mut self) -> Result<(), BencodeError>;

    /// Starts a dictionary (`d`).
    fn open_dict(&mut self) -> Result<(), BencodeError>;

    /// Ends the innermost open dictionary (`e`).
    fn close_dict(&mut self) -> Result<(), BencodeError>;

    /// Writes a UTF-8 string as a byte string.
    fn write_str(&mut self, s: &str) -> Result<(), BencodeError> {
        self.write_bytes(s.as_bytes())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Container {
    List,
    Dict,
}

/// An [`Encoder`] that writes straight to any [`Write`] sink.
///
/// Only the length prefix of a byte string is formatted ahead of time; the
/// content is handed to the sink as-is.
///
/// # Examples
///
/// ```
/// use torrentize::bencode::{BencodeWriter, Encoder};
///
/// let mut writer = BencodeWriter::new(Vec::new());
/// writer.open_dict().unwrap();
/// writer.write_str("spam").unwrap();
/// writer.open_list().unwrap();
/// writer.write_int(1).unwrap();
/// writer.write_str("two").unwrap();
/// writer.close_list().unwrap();
/// writer.close_dict().unwrap();
///
/// assert_eq!(writer.finish().unwrap(), b"d4:spamli1e3:twoee");
/// ```
#[derive(Debug)]
pub struct BencodeWriter<W: Write> {
    sink: W,
    open: Vec<Container>,
}

impl<W: Write> BencodeWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            sink,
            open: Vec::new(),
        }
    }

    /// Returns the number of currently open lists and dictionaries.
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    /// Flushes the sink and hands it back.
    ///
    /// # Panics
    ///
    /// Panics if a list or dictionary is still open.
    pub fn finish(mut self) -> Result<W, BencodeError> {
        assert!(
            self.open.is_empty(),
            "bencode writer finished with {} unclosed container(s)",
            self.open.len()
        );
        self.sink.flush()?;
        Ok(self.sink)
    }

    fn close(&mut self, expected: Container) -> Result<(), BencodeError> {
        match self.open.pop() {
            Some(found) if found == expected => {}
            found => panic!("bencode close mismatch: expected {expected:?}, open {found:?}"),
        }
        self.sink.write_all(b"e")?;
        Ok(())
    }
}

impl<W: Write> Encoder for BencodeWriter<W> {
    fn write_int(&mut self, value: i64) -> Result<(), BencodeError> {
        write!(self.sink, "i{}e", value)?;
        Ok(())
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), BencodeError> {
        write!(self.sink, "{}:", bytes.len())?;
        self.sink.write_all(bytes)?;
        Ok(())
    }

    fn open_list(&mut self) -> Result<(), BencodeError> {
        self.sink.write_all(b"l")?;
        self.open.push(Container::List);
        Ok(())
    }

    fn close_list(&mut self) -> Result<(), BencodeError> {
        self.close(Container::List)
    }

    fn open_dict(&mut self) -> Result<(), BencodeError> {
        self.sink.write_all(b"d")?;
        self.open.push(Container::Dict);
        Ok(())
    }

    fn close_dict(&mut self) -> Result<(), BencodeError> {
        self.close(Container::Dict)
    }
}

/// Encodes a bencode value to a byte vector.
///
/// Dictionaries are emitted in key order, so decoding canonical bencode and
/// encoding it again reproduces the input exactly.
///
/// # Examples
///
/// ```
/// use torrentize::bencode::{encode, Value};
///
/// let list = Value::List(vec![Value::Integer(1), Value::string("two")]);
/// assert_eq!(encode(&list).unwrap(), b"li1e3:twoe");
/// ```
pub fn encode(value: &Value) -> Result<Vec<u8>, BencodeError> {
    let mut writer = BencodeWriter::new(Vec::new());
    encode_value(value, &mut writer)?;
    writer.finish()
}

/// Writes a value tree through any [`Encoder`].
pub fn encode_value<E: Encoder + ?Sized>(value: &Value, encoder: &mut E) -> Result<(), BencodeError> {
    match value {
        Value::Integer(i) => encoder.write_int(*i)?,
        Value::Bytes(b) => encoder.write_bytes(b)?,
        Value::List(l) => {
            encoder.open_list()?;
            for item in l {
                encode_value(item, encoder)?;
            }
            encoder.close_list()?;
        }
        Value::Dict(d) => {
            encoder.open_dict()?;
            for (key, val) in d {
                encoder.write_bytes(key)?;
                encode_value(val, encoder)?;
            }
            encoder.close_dict()?;
        }
    }
    Ok(())
}
