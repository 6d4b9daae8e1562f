use super::*;
use pretty_assertions::assert_eq;

fn drain(stream: &mut dyn SourceStream, max: usize) -> Result<Vec<u8>, StreamError> {
    let mut out = Vec::new();
    while stream.read_more(max, &mut out)? > 0 {}
    Ok(out)
}

#[test]
fn test_str_stream_chunks() {
    let mut stream = StrStream::new("abcdefg", 3);
    let mut out = Vec::new();
    assert_eq!(stream.read_more(100, &mut out), Ok(3));
    assert_eq!(stream.read_more(2, &mut out), Ok(2));
    assert_eq!(stream.read_more(100, &mut out), Ok(2));
    assert_eq!(stream.read_more(100, &mut out), Ok(0));
    assert_eq!(out, b"abcdefg");
}

#[test]
fn test_reader_stream() {
    let mut stream = ReaderStream::new(&b"print 1;\n"[..]);
    assert_eq!(drain(&mut stream, 4), Ok(b"print 1;\n".to_vec()));
}

#[test]
fn test_crlf_filter_across_chunks() {
    let source = StrStream::new("a\r\nb\r", 2);
    let mut chain = FilterChain::new(Box::new(source)).with_filter(Box::new(CrlfFilter::default()));
    assert_eq!(chain.len(), 1);
    assert_eq!(drain(&mut chain, 16), Ok(b"a\nb\r".to_vec()));
}

struct DropAll;

impl SourceFilter for DropAll {
    fn name(&self) -> &str {
        "drop"
    }

    fn apply(&mut self, _input: &[u8], _eof: bool, _out: &mut Vec<u8>) -> Result<(), StreamError> {
        Ok(())
    }
}

#[test]
fn test_filter_swallowing_everything_reaches_eof() {
    let source = StrStream::new("xxxx", 1);
    let mut chain = FilterChain::new(Box::new(source)).with_filter(Box::new(DropAll));
    let mut out = Vec::new();
    assert_eq!(chain.read_more(8, &mut out), Ok(0));
    assert_eq!(chain.read_more(8, &mut out), Ok(0));
    assert!(out.is_empty());
}

struct Failing;

impl SourceFilter for Failing {
    fn name(&self) -> &str {
        "failing"
    }

    fn apply(&mut self, _input: &[u8], _eof: bool, _out: &mut Vec<u8>) -> Result<(), StreamError> {
        Err(StreamError::Filter {
            filter: self.name().to_string(),
            message: "bad input".to_string(),
        })
    }
}

#[test]
fn test_filter_error_propagates() {
    let mut chain =
        FilterChain::new(Box::new(StrStream::new("x", 1))).with_filter(Box::new(Failing));
    let err = chain.read_more(8, &mut Vec::new());
    assert_eq!(
        err.map_err(|e| e.to_string()),
        Err("source filter `failing` failed: bad input".to_string())
    );
}
