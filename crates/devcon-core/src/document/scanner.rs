//! String-literal-aware scanner that blanks out comments and trailing commas.
//!
//! Removed bytes are replaced with spaces (newlines are kept), so byte offsets,
//! lines and columns in the output line up with the original text.

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Failure while scanning, located by byte offset into the original text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScanError {
    UnterminatedComment { offset: usize },
}

impl ScanError {
    pub(crate) fn offset(&self) -> usize {
        match self {
            ScanError::UnterminatedComment { offset } => *offset,
        }
    }
}

/// Strip `//` and `/* */` comments and trailing commas outside string literals.
pub(crate) fn strip(text: &str) -> Result<Vec<u8>, ScanError> {
    let mut bytes = strip_comments(text.as_bytes())?;
    blank_trailing_commas(&mut bytes);
    Ok(bytes)
}

/// Whether the scanned output holds nothing but whitespace.
pub(crate) fn is_blank(bytes: &[u8]) -> bool {
    bytes.iter().all(u8::is_ascii_whitespace)
}

fn blank(byte: u8) -> u8 {
    match byte {
        b'\n' | b'\r' => byte,
        _ => b' ',
    }
}

fn strip_comments(src: &[u8]) -> Result<Vec<u8>, ScanError> {
    let mut out = Vec::with_capacity(src.len());
    let mut i = 0;

    if src.starts_with(UTF8_BOM) {
        out.extend_from_slice(b"   ");
        i = UTF8_BOM.len();
    }

    let mut in_string = false;
    while i < src.len() {
        let byte = src[i];

        if in_string {
            out.push(byte);
            match byte {
                b'\\' if i + 1 < src.len() => {
                    out.push(src[i + 1]);
                    i += 2;
                    continue;
                }
                b'"' => in_string = false,
                _ => {}
            }
            i += 1;
            continue;
        }

        match (byte, src.get(i + 1)) {
            (b'"', _) => {
                in_string = true;
                out.push(byte);
                i += 1;
            }
            (b'/', Some(b'/')) => {
                while i < src.len() && src[i] != b'\n' {
                    out.push(blank(src[i]));
                    i += 1;
                }
            }
            (b'/', Some(b'*')) => {
                let start = i;
                out.extend_from_slice(b"  ");
                i += 2;
                loop {
                    if i >= src.len() {
                        return Err(ScanError::UnterminatedComment { offset: start });
                    }
                    if src[i] == b'*' && src.get(i + 1) == Some(&b'/') {
                        out.extend_from_slice(b"  ");
                        i += 2;
                        break;
                    }
                    out.push(blank(src[i]));
                    i += 1;
                }
            }
            _ => {
                out.push(byte);
                i += 1;
            }
        }
    }

    Ok(out)
}

/// Replace a `,` that follows a value and whose next significant byte closes
/// an object or array. Commas after `{`, `[`, `,` or `:` are left for the
/// JSON parser to reject.
fn blank_trailing_commas(bytes: &mut [u8]) {
    let mut in_string = false;
    let mut previous: Option<u8> = None;
    let mut i = 0;
    while i < bytes.len() {
        let byte = bytes[i];
        if in_string {
            match byte {
                b'\\' => {
                    i += 2;
                    continue;
                }
                b'"' => {
                    in_string = false;
                    previous = Some(b'"');
                }
                _ => {}
            }
            i += 1;
            continue;
        }

        match byte {
            b'"' => in_string = true,
            b',' => {
                let next = bytes[i + 1..]
                    .iter()
                    .find(|b| !b.is_ascii_whitespace())
                    .copied();
                let closes = matches!(next, Some(b'}') | Some(b']'));
                if closes && previous.is_some_and(ends_value) {
                    bytes[i] = b' ';
                } else {
                    previous = Some(b',');
                }
            }
            _ if byte.is_ascii_whitespace() => {}
            _ => previous = Some(byte),
        }
        i += 1;
    }
}

/// Last byte of a string, container, number or `true`/`false`/`null`.
fn ends_value(byte: u8) -> bool {
    matches!(byte, b'"' | b'}' | b']') || byte.is_ascii_alphanumeric()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stripped(text: &str) -> String {
        String::from_utf8(strip(text).unwrap()).unwrap()
    }

    #[test]
    fn preserves_length_and_newlines() {
        let text = "{\n  // hello\n  \"a\": 1 /* x\ny */\n}";
        let out = stripped(text);
        assert_eq!(out.len(), text.len());
        assert_eq!(out.matches('\n').count(), text.matches('\n').count());
        assert!(!out.contains("hello"));
        assert!(!out.contains('x'));
    }

    #[test]
    fn leaves_comment_markers_inside_strings() {
        let text = r#"{"url": "http://example.com/*not*/", "glob": "a//b"}"#;
        assert_eq!(stripped(text), text);
    }

    #[test]
    fn leaves_commas_inside_strings() {
        let text = r#"{"a": ",}", "b": ",]"}"#;
        assert_eq!(stripped(text), text);
    }

    #[test]
    fn escaped_quote_does_not_end_string() {
        let text = r#"{"a": "say \"//hi\""}"#;
        assert_eq!(stripped(text), text);
    }

    #[test]
    fn blanks_trailing_commas() {
        assert_eq!(stripped("[1, 2,]"), "[1, 2 ]");
        assert_eq!(stripped("{\"a\": 1,\n}"), "{\"a\": 1 \n}");
    }

    #[test]
    fn trailing_comma_before_comment_then_brace() {
        let out = stripped("{\"a\": 1, // note\n}");
        assert!(!out.contains(','));
    }

    #[test]
    fn double_comma_is_left_alone() {
        assert_eq!(stripped("[1,,]"), "[1,,]");
    }

    #[test]
    fn comma_without_a_preceding_value_is_kept() {
        assert_eq!(stripped("{,}"), "{,}");
        assert_eq!(stripped("[,]"), "[,]");
        assert_eq!(stripped("{\"a\": ,}"), "{\"a\": ,}");
        assert_eq!(stripped("{\"a\": [,]}"), "{\"a\": [,]}");
    }

    #[test]
    fn trailing_comma_after_each_value_kind() {
        assert_eq!(stripped("[\"x\",]"), "[\"x\" ]");
        assert_eq!(stripped("[[1],]"), "[[1] ]");
        assert_eq!(stripped("[{},]"), "[{} ]");
        assert_eq!(stripped("[true, null,]"), "[true, null ]");
        assert_eq!(stripped("[1.5e3,]"), "[1.5e3 ]");
    }

    #[test]
    fn unterminated_block_comment_reports_start() {
        let err = strip("{\"a\": 1 /* open").unwrap_err();
        assert_eq!(err.offset(), 8);
    }

    #[test]
    fn byte_order_mark_is_blanked() {
        let out = strip("\u{feff}{}").unwrap();
        assert_eq!(&out[..3], b"   ");
        assert_eq!(&out[3..], b"{}");
    }

    #[test]
    fn comment_only_input_is_blank() {
        assert!(is_blank(&strip("// nothing\n/* here */").unwrap()));
        assert!(!is_blank(&strip("{}").unwrap()));
    }
}
