use super::{
    decode::{DecodeError, decode_one},
    encode,
    inst::Instruction,
};

/// Drives the instruction codec across a whole script buffer, yielding
/// `(offset, instruction)` pairs in order.
///
/// There is no instruction count anywhere in the format: the only way to
/// find instruction *i+1* is `offset(i) + byte_length(i)`, which is exactly
/// how this iterator advances.
pub struct ScriptStream<'a> {
    bytes: &'a [u8],
    offset: usize,
    failed: bool,
}

impl<'a> ScriptStream<'a> {
    #[must_use]
    pub fn new(bytes: &'a [u8]) -> ScriptStream<'a> {
        ScriptStream {
            bytes,
            offset: 0,
            failed: false,
        }
    }

    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl Iterator for ScriptStream<'_> {
    type Item = Result<(usize, Instruction), DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.offset >= self.bytes.len() {
            return None;
        }
        match decode_one(self.bytes, self.offset) {
            Ok((inst, len)) => {
                let at = self.offset;
                debug_assert!(len > 0);
                self.offset += len;
                Some(Ok((at, inst)))
            }
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}

/// Decodes an entire script buffer into its ordered instruction sequence.
pub fn decode_script(bytes: &[u8]) -> Result<Vec<(usize, Instruction)>, DecodeError> {
    ScriptStream::new(bytes).collect()
}

/// Serializes an instruction sequence back into one script buffer.
#[must_use]
pub fn encode_script(instructions: &[Instruction]) -> Vec<u8> {
    let mut out = Vec::new();
    for inst in instructions {
        encode::encode_into(inst, &mut out);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::var::{Param, VarSpec};

    #[test]
    fn offsets_are_contiguous() {
        // stopObjectCode; move Var[1] := 42; breakHere; unknown 0xF0.
        let bytes = [0x00, 0x1A, 0x01, 0x00, 0x2A, 0x00, 0x80, 0xF0];
        let script = decode_script(&bytes).unwrap();
        assert_eq!(script.len(), 4);
        assert_eq!(script[0].0, 0);
        assert_eq!(script[1].0, 1);
        assert_eq!(script[2].0, 6);
        assert_eq!(script[3].0, 7);
        let mut expected = 0;
        for (offset, inst) in &script {
            assert_eq!(*offset, expected);
            expected += inst.byte_length();
        }
        assert_eq!(expected, bytes.len());
    }

    #[test]
    fn decoding_never_overruns() {
        let bytes = [0x00, 0x00, 0x80, 0x00];
        let mut stream = ScriptStream::new(&bytes);
        while stream.next().is_some() {
            assert!(stream.offset() <= bytes.len());
        }
        assert_eq!(stream.offset(), bytes.len());
    }

    #[test]
    fn script_round_trip() {
        let bytes = [0x00, 0x1A, 0x01, 0x00, 0x2A, 0x00, 0x80, 0xF0];
        let script = decode_script(&bytes).unwrap();
        let instructions: Vec<_> = script.into_iter().map(|(_, inst)| inst).collect();
        assert_eq!(encode_script(&instructions), bytes);
    }

    #[test]
    fn truncation_surfaces_as_error() {
        // A move instruction cut off in the middle of its operand.
        let bytes = [0x1A, 0x01];
        let err = decode_script(&bytes).unwrap_err();
        assert_eq!(err, DecodeError::TruncatedInput { offset: 2 });
    }

    #[test]
    fn assignment_decodes_to_global_var() {
        let bytes = [0x1A, 0x01, 0x00, 0x2A, 0x00];
        let script = decode_script(&bytes).unwrap();
        assert_eq!(script.len(), 1);
        let (offset, inst) = &script[0];
        assert_eq!(*offset, 0);
        assert_eq!(
            *inst,
            Instruction::Move {
                var: VarSpec::Global(1),
                value: Param::Imm(42),
            }
        );
        assert_eq!(inst.byte_length(), 5);
    }
}
