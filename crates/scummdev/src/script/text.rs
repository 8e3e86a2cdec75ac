use super::{decode::DecodeError, var::VarSpec};

/// The escape introducer inside string literals.
const ESCAPE: u8 = 0xFF;

/// One piece of an in-script string literal.
///
/// Literal runs never contain the 0x00 terminator or the 0xFF escape byte;
/// those always split the string into items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextItem {
    Raw(Vec<u8>),
    /// Escape 1: line break.
    Newline,
    /// Escape 2: keep the current text on screen.
    KeepText,
    /// Escape 3: pause until the line is dismissed.
    Wait,
    /// Escape 8: mid-line break.
    Break,
    /// Escape 4: splice in the decimal value of a variable.
    IntVar(VarSpec),
    /// Escape 5: splice in a verb name looked up through a variable.
    VerbVar(VarSpec),
    /// Escape 6: splice in an actor/object name looked up through a variable.
    NameVar(VarSpec),
    /// Escape 7: splice in another string looked up through a variable.
    StringVar(VarSpec),
    /// Any other escape code with its raw 16-bit operand.
    Control { code: u8, arg: u16 },
}

/// A decoded in-script string: a sequence of items terminated on disk by a
/// single 0x00 byte.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Text {
    pub items: Vec<TextItem>,
}

impl Text {
    #[must_use]
    pub fn from_literal(bytes: &[u8]) -> Text {
        if bytes.is_empty() {
            return Text::default();
        }
        Text {
            items: vec![TextItem::Raw(bytes.to_vec())],
        }
    }

    /// Decodes one string starting at `bytes[0]`, returning the items and
    /// the number of bytes consumed including the terminator.
    pub fn decode(bytes: &[u8], base_offset: usize) -> Result<(Text, usize), DecodeError> {
        let mut items = Vec::new();
        let mut run = Vec::new();
        let mut pos = 0;
        let truncated = |pos: usize| DecodeError::TruncatedInput {
            offset: base_offset + pos,
        };
        loop {
            let byte = *bytes.get(pos).ok_or_else(|| truncated(pos))?;
            pos += 1;
            match byte {
                0x00 => {
                    if !run.is_empty() {
                        items.push(TextItem::Raw(std::mem::take(&mut run)));
                    }
                    return Ok((Text { items }, pos));
                }
                ESCAPE => {
                    if !run.is_empty() {
                        items.push(TextItem::Raw(std::mem::take(&mut run)));
                    }
                    let code = *bytes.get(pos).ok_or_else(|| truncated(pos))?;
                    pos += 1;
                    items.push(match code {
                        1 => TextItem::Newline,
                        2 => TextItem::KeepText,
                        3 => TextItem::Wait,
                        8 => TextItem::Break,
                        _ => {
                            let lo = *bytes.get(pos).ok_or_else(|| truncated(pos))?;
                            let hi = *bytes.get(pos + 1).ok_or_else(|| truncated(pos + 1))?;
                            pos += 2;
                            let arg = u16::from_le_bytes([lo, hi]);
                            match code {
                                4 => TextItem::IntVar(VarSpec::decode(arg)),
                                5 => TextItem::VerbVar(VarSpec::decode(arg)),
                                6 => TextItem::NameVar(VarSpec::decode(arg)),
                                7 => TextItem::StringVar(VarSpec::decode(arg)),
                                _ => TextItem::Control { code, arg },
                            }
                        }
                    });
                }
                _ => run.push(byte),
            }
        }
    }

    pub fn encode_into(&self, out: &mut Vec<u8>) {
        for item in &self.items {
            match item {
                TextItem::Raw(bytes) => out.extend_from_slice(bytes),
                TextItem::Newline => out.extend_from_slice(&[ESCAPE, 1]),
                TextItem::KeepText => out.extend_from_slice(&[ESCAPE, 2]),
                TextItem::Wait => out.extend_from_slice(&[ESCAPE, 3]),
                TextItem::Break => out.extend_from_slice(&[ESCAPE, 8]),
                TextItem::IntVar(var) => encode_var_escape(out, 4, *var),
                TextItem::VerbVar(var) => encode_var_escape(out, 5, *var),
                TextItem::NameVar(var) => encode_var_escape(out, 6, *var),
                TextItem::StringVar(var) => encode_var_escape(out, 7, *var),
                TextItem::Control { code, arg } => {
                    out.extend_from_slice(&[ESCAPE, *code]);
                    out.extend_from_slice(&arg.to_le_bytes());
                }
            }
        }
        out.push(0x00);
    }

    #[must_use]
    pub fn byte_length(&self) -> usize {
        let mut out = Vec::new();
        self.encode_into(&mut out);
        out.len()
    }
}

fn encode_var_escape(out: &mut Vec<u8>, code: u8, var: VarSpec) {
    out.extend_from_slice(&[ESCAPE, code]);
    out.extend_from_slice(&var.encode().to_le_bytes());
}

impl std::fmt::Display for Text {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for item in &self.items {
            if !first {
                write!(f, " + ")?;
            }
            first = false;
            match item {
                TextItem::Raw(bytes) => {
                    write!(f, "\"")?;
                    for &byte in bytes {
                        if byte.is_ascii() && !byte.is_ascii_control() && byte != b'"' {
                            write!(f, "{}", byte as char)?;
                        } else {
                            write!(f, "\\x{byte:02X}")?;
                        }
                    }
                    write!(f, "\"")?;
                }
                TextItem::Newline => write!(f, "newline()")?,
                TextItem::KeepText => write!(f, "keepText()")?,
                TextItem::Wait => write!(f, "wait()")?,
                TextItem::Break => write!(f, "break()")?,
                TextItem::IntVar(var) => write!(f, "getInt({var})")?,
                TextItem::VerbVar(var) => write!(f, "getVerb({var})")?,
                TextItem::NameVar(var) => write!(f, "getName({var})")?,
                TextItem::StringVar(var) => write!(f, "getString({var})")?,
                TextItem::Control { code, arg } => write!(f, "code({code}, {arg})")?,
            }
        }
        if first {
            write!(f, "\"\"")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(bytes: &[u8]) -> (Text, usize) {
        let (text, consumed) = Text::decode(bytes, 0).unwrap();
        let mut reencoded = Vec::new();
        text.encode_into(&mut reencoded);
        assert_eq!(reencoded, &bytes[..consumed]);
        assert_eq!(text.byte_length(), consumed);
        (text, consumed)
    }

    #[test]
    fn plain_string() {
        let (text, consumed) = roundtrip(b"hello\x00rest");
        assert_eq!(consumed, 6);
        assert_eq!(text.items, vec![TextItem::Raw(b"hello".to_vec())]);
    }

    #[test]
    fn empty_string_is_just_the_terminator() {
        let (text, consumed) = roundtrip(&[0x00]);
        assert_eq!(consumed, 1);
        assert!(text.items.is_empty());
    }

    #[test]
    fn bare_escapes_take_no_operand() {
        let (text, consumed) = roundtrip(&[b'a', 0xFF, 1, 0xFF, 2, 0xFF, 3, 0xFF, 8, b'b', 0x00]);
        assert_eq!(consumed, 11);
        assert_eq!(
            text.items,
            vec![
                TextItem::Raw(vec![b'a']),
                TextItem::Newline,
                TextItem::KeepText,
                TextItem::Wait,
                TextItem::Break,
                TextItem::Raw(vec![b'b']),
            ]
        );
    }

    #[test]
    fn operand_escapes_take_two_bytes() {
        // getInt(Var[5]), then an unknown code 12 with raw operand.
        let (text, _) = roundtrip(&[0xFF, 4, 0x05, 0x00, 0xFF, 12, 0x34, 0x12, 0x00]);
        assert_eq!(
            text.items,
            vec![
                TextItem::IntVar(VarSpec::Global(5)),
                TextItem::Control {
                    code: 12,
                    arg: 0x1234,
                },
            ]
        );
    }

    #[test]
    fn operand_can_be_a_bit_variable() {
        let (text, _) = roundtrip(&[0xFF, 6, 0x01, 0x90, 0x00]);
        assert_eq!(
            text.items,
            vec![TextItem::NameVar(VarSpec::Bit { num: 1, bit: 1 })]
        );
    }

    #[test]
    fn missing_terminator_is_truncation() {
        let err = Text::decode(b"abc", 10).unwrap_err();
        assert!(matches!(err, DecodeError::TruncatedInput { offset: 13 }));
    }
}
