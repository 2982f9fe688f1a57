use std::collections::BTreeMap;

use bytes::Bytes;

use super::*;

fn written(f: impl FnOnce(&mut BencodeWriter<Vec<u8>>) -> Result<(), BencodeError>) -> Vec<u8> {
    let mut writer = BencodeWriter::new(Vec::new());
    f(&mut writer).unwrap();
    writer.finish().unwrap()
}

#[test]
fn test_write_int() {
    assert_eq!(written(|w| w.write_int(42)), b"i42e");
    assert_eq!(written(|w| w.write_int(-42)), b"i-42e");
    assert_eq!(written(|w| w.write_int(0)), b"i0e");
    assert_eq!(
        written(|w| w.write_int(i64::MIN)),
        b"i-9223372036854775808e"
    );
}

#[test]
fn test_write_bytes_raw_content() {
    assert_eq!(written(|w| w.write_bytes(b"spam")), b"4:spam");
    assert_eq!(written(|w| w.write_bytes(b"")), b"0:");
    // no escaping of delimiters or binary data
    assert_eq!(
        written(|w| w.write_bytes(&[b'e', b':', 0, 0xff])),
        b"4:e:\x00\xff"
    );
}

#[test]
fn test_write_nested() {
    let out = written(|w| {
        w.open_dict()?;
        w.write_str("list")?;
        w.open_list()?;
        w.write_str("spam")?;
        w.open_list()?;
        w.close_list()?;
        w.write_int(42)?;
        w.close_list()?;
        w.close_dict()
    });
    assert_eq!(out, b"d4:listl4:spamlei42eee");
}

#[test]
fn test_writer_tracks_depth() {
    let mut writer = BencodeWriter::new(Vec::new());
    assert_eq!(writer.depth(), 0);
    writer.open_dict().unwrap();
    writer.open_list().unwrap();
    assert_eq!(writer.depth(), 2);
    writer.close_list().unwrap();
    writer.close_dict().unwrap();
    assert_eq!(writer.depth(), 0);
}

#[test]
#[should_panic(expected = "close mismatch")]
fn test_mismatched_close_panics() {
    let mut writer = BencodeWriter::new(Vec::new());
    writer.open_list().unwrap();
    let _ = writer.close_dict();
}

#[test]
#[should_panic(expected = "close mismatch")]
fn test_close_without_open_panics() {
    let mut writer = BencodeWriter::new(Vec::new());
    let _ = writer.close_list();
}

#[test]
#[should_panic(expected = "unclosed")]
fn test_finish_with_open_container_panics() {
    let mut writer = BencodeWriter::new(Vec::new());
    writer.open_dict().unwrap();
    let _ = writer.finish();
}

struct FullDisk;

impl std::io::Write for FullDisk {
    fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
        Err(std::io::Error::other("no space left on device"))
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_sink_failure_is_io_error() {
    let mut writer = BencodeWriter::new(FullDisk);
    let err = writer.write_bytes(b"spam").unwrap_err();
    assert!(matches!(err, BencodeError::Io(_)));
}

#[test]
fn test_decode_integer() {
    assert_eq!(decode(b"i42e").unwrap(), Value::Integer(42));
    assert_eq!(decode(b"i-42e").unwrap(), Value::Integer(-42));
    assert_eq!(decode(b"i0e").unwrap(), Value::Integer(0));
}

#[test]
fn test_decode_integer_invalid() {
    assert!(decode(b"i-0e").is_err());
    assert!(decode(b"i03e").is_err());
    assert!(decode(b"ie").is_err());
    assert!(decode(b"i12").is_err());
}

#[test]
fn test_decode_bytes() {
    assert_eq!(
        decode(b"4:spam").unwrap(),
        Value::Bytes(Bytes::from_static(b"spam"))
    );
    assert_eq!(decode(b"0:").unwrap(), Value::Bytes(Bytes::new()));
    assert!(matches!(decode(b"5:spam"), Err(BencodeError::UnexpectedEof)));
}

#[test]
fn test_decode_dict() {
    let result = decode(b"d3:cow3:moo4:spam4:eggse").unwrap();
    let dict = result.as_dict().unwrap();
    assert_eq!(dict.len(), 2);
    assert_eq!(result.get(b"cow").and_then(Value::as_str), Some("moo"));
    assert_eq!(result.get(b"spam").and_then(Value::as_str), Some("eggs"));
}

#[test]
fn test_decode_dict_rejects_non_string_key() {
    assert!(matches!(
        decode(b"di1ei2ee"),
        Err(BencodeError::UnexpectedChar('i'))
    ));
}

#[test]
fn test_decode_trailing_data() {
    assert!(matches!(decode(b"i42eextra"), Err(BencodeError::TrailingData)));
}

#[test]
fn test_decode_nesting_limit() {
    let mut deep = vec![b'l'; 100];
    deep.extend(vec![b'e'; 100]);
    assert!(matches!(decode(&deep), Err(BencodeError::NestingTooDeep)));
}

#[test]
fn test_encode_value_tree() {
    let mut dict = BTreeMap::new();
    dict.insert(Bytes::from_static(b"b"), Value::Integer(2));
    dict.insert(Bytes::from_static(b"a"), Value::string("one"));
    let value = Value::List(vec![Value::Dict(dict), Value::Integer(-1)]);
    assert_eq!(encode(&value).unwrap(), b"ld1:a3:one1:bi2eei-1ee");
}

#[test]
fn test_roundtrip_canonical_document() {
    let original = b"d8:announce15:http://test.com4:infod4:name4:test12:piece lengthi16384eee";
    let decoded = decode(original).unwrap();
    assert_eq!(encode(&decoded).unwrap(), original);
}
