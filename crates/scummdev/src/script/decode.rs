use log::trace;

use super::{
    inst::{
        ActorOp, CursorOp, DrawObjectOp, ExprItem, Instruction, MatrixOp, PrintOp, ResourceOp,
        RoomOp, SaveRestoreVerbsOp, StringOp, SystemOp, VerbOp, WaitOp,
    },
    text::Text,
    var::{ByteParam, PARAM_1, PARAM_2, PARAM_3, Param, VarSpec, WordParam},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("truncated instruction input at offset {offset}")]
    TruncatedInput { offset: usize },
}

/// The list terminator for sub-operation and argument lists.
const LIST_END: u8 = 0xFF;

/// Internal decode outcome. `Unrecognized` never escapes this module: the
/// entry point turns it into [`Instruction::Invalid`] carrying whatever
/// bytes were consumed up to that point.
enum Fail {
    Truncated { offset: usize },
    Unrecognized,
}

type DResult<T> = Result<T, Fail>;

/// Decodes exactly one instruction starting at `bytes[offset]`.
///
/// Returns the instruction and the exact number of bytes consumed for it.
/// Opcodes outside the recognized table are never an error; they come back
/// as [`Instruction::Invalid`] of nonzero length so the caller can keep
/// walking the script. Only running out of bytes mid-layout fails.
pub fn decode_one(bytes: &[u8], offset: usize) -> Result<(Instruction, usize), DecodeError> {
    let mut decoder = Decoder {
        bytes,
        start: offset,
        pos: offset,
    };
    match decoder.instruction() {
        Ok(inst) => {
            trace!("{offset:#06x}: {inst}");
            Ok((inst, decoder.consumed()))
        }
        Err(Fail::Unrecognized) => {
            let raw = bytes[decoder.start..decoder.pos].to_vec();
            trace!("{offset:#06x}: unrecognized bytes {raw:02X?}");
            Ok((Instruction::Invalid(raw), decoder.consumed()))
        }
        Err(Fail::Truncated { offset }) => Err(DecodeError::TruncatedInput { offset }),
    }
}

struct Decoder<'a> {
    bytes: &'a [u8],
    start: usize,
    pos: usize,
}

impl Decoder<'_> {
    fn consumed(&self) -> usize {
        self.pos - self.start
    }

    fn u8(&mut self) -> DResult<u8> {
        let byte = *self
            .bytes
            .get(self.pos)
            .ok_or(Fail::Truncated { offset: self.pos })?;
        self.pos += 1;
        Ok(byte)
    }

    fn u16(&mut self) -> DResult<u16> {
        let lo = self.u8()?;
        let hi = self.u8()?;
        Ok(u16::from_le_bytes([lo, hi]))
    }

    fn i16(&mut self) -> DResult<i16> {
        Ok(self.u16()? as i16)
    }

    fn u24(&mut self) -> DResult<u32> {
        let a = self.u8()?;
        let b = self.u8()?;
        let c = self.u8()?;
        Ok(u32::from_le_bytes([a, b, c, 0]))
    }

    /// A result-variable slot: always a raw 16-bit variable number, no
    /// addressing-mode bit involved.
    fn result_var(&mut self) -> DResult<VarSpec> {
        Ok(VarSpec::decode(self.u16()?))
    }

    fn byte_param(&mut self, opcode: u8, mask: u8) -> DResult<ByteParam> {
        if opcode & mask != 0 {
            Ok(Param::Var(self.result_var()?))
        } else {
            Ok(Param::Imm(self.u8()?))
        }
    }

    fn word_param(&mut self, opcode: u8, mask: u8) -> DResult<WordParam> {
        if opcode & mask != 0 {
            Ok(Param::Var(self.result_var()?))
        } else {
            Ok(Param::Imm(self.u16()?))
        }
    }

    /// Rejects a sub-opcode or auxiliary byte whose high bits carry flags
    /// its operation does not use; such bytes are outside the closed table.
    fn flags(&self, byte: u8, allowed: u8) -> DResult<()> {
        if byte & 0xE0 & !allowed != 0 {
            Err(Fail::Unrecognized)
        } else {
            Ok(())
        }
    }

    /// An auxiliary addressing byte: flags in the high bits, nothing in the
    /// low bits.
    fn aux(&mut self, allowed: u8) -> DResult<u8> {
        let byte = self.u8()?;
        if byte & 0x1F != 0 {
            return Err(Fail::Unrecognized);
        }
        self.flags(byte, allowed)?;
        Ok(byte)
    }

    /// A sentinel-terminated word-argument list. Each entry is introduced
    /// by its own addressing byte (base 0x01, variable flag 0x80).
    fn word_list(&mut self) -> DResult<Vec<WordParam>> {
        let mut args = Vec::new();
        loop {
            let aux = self.u8()?;
            if aux == LIST_END {
                return Ok(args);
            }
            if aux & !PARAM_1 != 0x01 {
                return Err(Fail::Unrecognized);
            }
            args.push(self.word_param(aux, PARAM_1)?);
        }
    }

    fn text(&mut self) -> DResult<Text> {
        let (text, consumed) = Text::decode(&self.bytes[self.pos..], self.pos)
            .map_err(|DecodeError::TruncatedInput { offset }| Fail::Truncated { offset })?;
        self.pos += consumed;
        Ok(text)
    }

    fn compare(
        &mut self,
        opcode: u8,
        build: fn(VarSpec, WordParam, i16) -> Instruction,
    ) -> DResult<Instruction> {
        let var = self.result_var()?;
        let value = self.word_param(opcode, PARAM_1)?;
        let target = self.i16()?;
        Ok(build(var, value, target))
    }

    fn assign(
        &mut self,
        opcode: u8,
        build: fn(VarSpec, WordParam) -> Instruction,
    ) -> DResult<Instruction> {
        let var = self.result_var()?;
        let value = self.word_param(opcode, PARAM_1)?;
        Ok(build(var, value))
    }

    fn get_actor(
        &mut self,
        opcode: u8,
        build: fn(VarSpec, ByteParam) -> Instruction,
    ) -> DResult<Instruction> {
        let result = self.result_var()?;
        let actor = self.byte_param(opcode, PARAM_1)?;
        Ok(build(result, actor))
    }

    fn get_object(
        &mut self,
        opcode: u8,
        build: fn(VarSpec, WordParam) -> Instruction,
    ) -> DResult<Instruction> {
        let result = self.result_var()?;
        let object = self.word_param(opcode, PARAM_1)?;
        Ok(build(result, object))
    }

    fn instruction(&mut self) -> DResult<Instruction> {
        use Instruction as I;
        let op = self.u8()?;
        Ok(match op {
            0x00 => I::StopObjectCode,
            0x80 => I::BreakHere,
            0x18 => I::Jump {
                target: self.i16()?,
            },
            0x40 => I::Cutscene {
                args: self.word_list()?,
            },
            0xC0 => I::EndCutscene,
            0x58 => I::Override { arg: self.u8()? },
            0x60 | 0xE0 => I::FreezeScripts {
                flag: self.byte_param(op, PARAM_1)?,
            },
            0xCC => {
                let value = self.u8()?;
                let mut rooms = Vec::new();
                loop {
                    let room = self.u8()?;
                    if room == 0 {
                        break;
                    }
                    rooms.push(room);
                }
                I::PseudoRoom { value, rooms }
            }

            // Comparisons.
            0x48 | 0xC8 => self.compare(op, |var, value, target| I::IsEqual { var, value, target })?,
            0x08 | 0x88 => {
                self.compare(op, |var, value, target| I::IsNotEqual { var, value, target })?
            }
            0x78 | 0xF8 => {
                self.compare(op, |var, value, target| I::IsGreater { var, value, target })?
            }
            0x04 | 0x84 => self.compare(op, |var, value, target| I::IsGreaterEqual {
                var,
                value,
                target,
            })?,
            0x44 | 0xC4 => self.compare(op, |var, value, target| I::IsLess { var, value, target })?,
            0x38 | 0xB8 => {
                self.compare(op, |var, value, target| I::IsLessEqual { var, value, target })?
            }
            0x28 => I::EqualZero {
                var: self.result_var()?,
                target: self.i16()?,
            },
            0xA8 => I::NotEqualZero {
                var: self.result_var()?,
                target: self.i16()?,
            },
            0x1D | 0x9D => {
                let object = self.word_param(op, PARAM_1)?;
                let classes = self.word_list()?;
                let target = self.i16()?;
                I::ClassOfIs {
                    object,
                    classes,
                    target,
                }
            }

            // Assignment and arithmetic.
            0x1A | 0x9A => self.assign(op, |var, value| I::Move { var, value })?,
            0x5A | 0xDA => self.assign(op, |var, value| I::Add { var, value })?,
            0x3A | 0xBA => self.assign(op, |var, value| I::Subtract { var, value })?,
            0x1B | 0x9B => self.assign(op, |var, value| I::Multiply { var, value })?,
            0x5B | 0xDB => self.assign(op, |var, value| I::Divide { var, value })?,
            0x17 | 0x97 => self.assign(op, |var, value| I::And { var, value })?,
            0x57 | 0xD7 => self.assign(op, |var, value| I::Or { var, value })?,
            0x46 => I::Increment {
                var: self.result_var()?,
            },
            0xC6 => I::Decrement {
                var: self.result_var()?,
            },
            0x26 | 0xA6 => {
                let var = self.result_var()?;
                let count = self.u8()?;
                let wide = op & PARAM_1 != 0;
                let mut values = Vec::with_capacity(usize::from(count));
                for _ in 0..count {
                    values.push(if wide {
                        self.u16()?
                    } else {
                        u16::from(self.u8()?)
                    });
                }
                I::SetVarRange { var, wide, values }
            }
            0xAC => {
                let var = self.result_var()?;
                let mut items = Vec::new();
                loop {
                    let sub = self.u8()?;
                    if sub == LIST_END {
                        break;
                    }
                    items.push(match sub & 0x1F {
                        1 => {
                            self.flags(sub, PARAM_1)?;
                            ExprItem::Value(self.word_param(sub, PARAM_1)?)
                        }
                        2 if sub == 2 => ExprItem::Add,
                        3 if sub == 3 => ExprItem::Subtract,
                        4 if sub == 4 => ExprItem::Multiply,
                        5 if sub == 5 => ExprItem::Divide,
                        6 if sub == 6 => {
                            let nested_start = self.pos;
                            match self.instruction() {
                                Ok(inst) => ExprItem::Operation(Box::new(inst)),
                                Err(Fail::Unrecognized) => ExprItem::Operation(Box::new(
                                    I::Invalid(self.bytes[nested_start..self.pos].to_vec()),
                                )),
                                Err(fail) => return Err(fail),
                            }
                        }
                        _ => return Err(Fail::Unrecognized),
                    });
                }
                I::Expression { var, items }
            }

            // Timing.
            0x2E => I::Delay {
                ticks: self.u24()?,
            },
            0x2B => I::DelayVariable {
                var: self.result_var()?,
            },

            // Actors.
            0x01 | 0x21 | 0x41 | 0x61 | 0x81 | 0xA1 | 0xC1 | 0xE1 => I::PutActor {
                actor: self.byte_param(op, PARAM_1)?,
                x: self.word_param(op, PARAM_2)?,
                y: self.word_param(op, PARAM_3)?,
            },
            0x03 | 0x83 => self.get_actor(op, |result, actor| I::GetActorRoom { result, actor })?,
            0x06 | 0x86 => {
                self.get_actor(op, |result, actor| I::GetActorElevation { result, actor })?
            }
            0x09 | 0x49 | 0x89 | 0xC9 => I::FaceActor {
                actor: self.byte_param(op, PARAM_1)?,
                object: self.word_param(op, PARAM_2)?,
            },
            0x0D | 0x4D | 0x8D | 0xCD => I::WalkActorToActor {
                actor: self.byte_param(op, PARAM_1)?,
                to_actor: self.byte_param(op, PARAM_2)?,
                distance: self.u8()?,
            },
            0x0E | 0x4E | 0x8E | 0xCE => I::PutActorAtObject {
                actor: self.byte_param(op, PARAM_1)?,
                object: self.word_param(op, PARAM_2)?,
            },
            0x11 | 0x51 | 0x91 | 0xD1 => I::AnimateActor {
                actor: self.byte_param(op, PARAM_1)?,
                animation: self.byte_param(op, PARAM_2)?,
            },
            0x13 | 0x53 | 0x93 | 0xD3 => self.actor_ops(op)?,
            0x15 | 0x55 | 0x95 | 0xD5 => {
                let result = self.result_var()?;
                let x = self.word_param(op, PARAM_1)?;
                let y = self.word_param(op, PARAM_2)?;
                I::ActorFromPos { result, x, y }
            }
            0x1E | 0x3E | 0x5E | 0x7E | 0x9E | 0xBE | 0xDE | 0xFE => I::WalkActorTo {
                actor: self.byte_param(op, PARAM_1)?,
                x: self.word_param(op, PARAM_2)?,
                y: self.word_param(op, PARAM_3)?,
            },
            0x1F | 0x5F | 0x9F | 0xDF => I::IsActorInBox {
                actor: self.byte_param(op, PARAM_1)?,
                box_id: self.byte_param(op, PARAM_2)?,
                target: self.i16()?,
            },
            0x22 | 0xA2 => self.get_actor(op, |result, actor| I::GetAnimCounter { result, actor })?,
            0x23 | 0xA3 => self.get_object(op, |result, actor| I::GetActorY { result, actor })?,
            0x43 | 0xC3 => self.get_object(op, |result, actor| I::GetActorX { result, actor })?,
            0x2D | 0x6D | 0xAD | 0xED => I::PutActorInRoom {
                actor: self.byte_param(op, PARAM_1)?,
                room: self.byte_param(op, PARAM_2)?,
            },
            0x31 | 0xB1 => {
                self.get_actor(op, |result, owner| I::GetInventoryCount { result, owner })?
            }
            0x3B | 0xBB => self.get_actor(op, |result, actor| I::GetActorScale { result, actor })?,
            0x52 | 0xD2 => I::ActorFollowCamera {
                actor: self.byte_param(op, PARAM_1)?,
            },
            0x56 | 0xD6 => self.get_actor(op, |result, actor| I::GetActorMoving { result, actor })?,
            0x63 | 0xE3 => self.get_actor(op, |result, actor| I::GetActorFacing { result, actor })?,
            0x6C | 0xEC => self.get_actor(op, |result, actor| I::GetActorWidth { result, actor })?,
            0x71 | 0xF1 => {
                self.get_actor(op, |result, actor| I::GetActorCostume { result, actor })?
            }
            0x7B | 0xFB => {
                self.get_actor(op, |result, actor| I::GetActorWalkBox { result, actor })?
            }

            // Objects.
            0x05 | 0x85 => {
                let object = self.word_param(op, PARAM_1)?;
                let sub = self.u8()?;
                let draw_op = match sub & 0x1F {
                    1 => {
                        self.flags(sub, PARAM_1 | PARAM_2)?;
                        DrawObjectOp::At {
                            x: self.word_param(sub, PARAM_1)?,
                            y: self.word_param(sub, PARAM_2)?,
                        }
                    }
                    2 => {
                        self.flags(sub, PARAM_1)?;
                        DrawObjectOp::Image {
                            image: self.word_param(sub, PARAM_1)?,
                        }
                    }
                    0x1F if sub == 0x1F => DrawObjectOp::Draw,
                    _ => return Err(Fail::Unrecognized),
                };
                I::DrawObject {
                    object,
                    op: draw_op,
                }
            }
            0x07 | 0x47 | 0x87 | 0xC7 => I::SetState {
                object: self.word_param(op, PARAM_1)?,
                state: self.byte_param(op, PARAM_2)?,
            },
            0x0F | 0x8F => {
                self.get_object(op, |result, object| I::GetObjectState { result, object })?
            }
            0x10 | 0x90 => {
                self.get_object(op, |result, object| I::GetObjectOwner { result, object })?
            }
            0x25 | 0x65 | 0xA5 | 0xE5 => I::PickupObject {
                object: self.word_param(op, PARAM_1)?,
                room: self.byte_param(op, PARAM_2)?,
            },
            0x50 | 0xD0 => I::PickupObjectOld {
                object: self.word_param(op, PARAM_1)?,
            },
            0x29 | 0x69 | 0xA9 | 0xE9 => I::SetOwnerOf {
                object: self.word_param(op, PARAM_1)?,
                owner: self.byte_param(op, PARAM_2)?,
            },
            0x34 | 0x74 | 0xB4 | 0xF4 => {
                let result = self.result_var()?;
                let object1 = self.word_param(op, PARAM_1)?;
                let object2 = self.word_param(op, PARAM_2)?;
                I::GetDist {
                    result,
                    object1,
                    object2,
                }
            }
            0x35 | 0x75 | 0xB5 | 0xF5 => {
                let result = self.result_var()?;
                let x = self.byte_param(op, PARAM_1)?;
                let y = self.byte_param(op, PARAM_2)?;
                I::FindObject { result, x, y }
            }
            0x36 | 0x76 | 0xB6 | 0xF6 => I::WalkActorToObject {
                actor: self.byte_param(op, PARAM_1)?,
                object: self.word_param(op, PARAM_2)?,
            },
            0x3D | 0x7D | 0xBD | 0xFD => {
                let result = self.result_var()?;
                let owner = self.byte_param(op, PARAM_1)?;
                let index = self.byte_param(op, PARAM_2)?;
                I::FindInventory {
                    result,
                    owner,
                    index,
                }
            }
            0x54 | 0xD4 => I::SetObjectName {
                object: self.word_param(op, PARAM_1)?,
                name: self.text()?,
            },
            0x5D | 0xDD => I::SetClass {
                object: self.word_param(op, PARAM_1)?,
                classes: self.word_list()?,
            },
            0x66 | 0xE6 => self.get_object(op, |result, object| I::GetClosestObjActor {
                result,
                object,
            })?,
            0x67 | 0xE7 => {
                let result = self.result_var()?;
                let string = self.byte_param(op, PARAM_1)?;
                I::GetStringWidth { result, string }
            }
            0x6E | 0xEE => I::StopObjectScript {
                script: self.byte_param(op, PARAM_1)?,
            },

            // Rooms and camera.
            0x12 | 0x92 => I::PanCameraTo {
                x: self.word_param(op, PARAM_1)?,
            },
            0x32 | 0xB2 => I::SetCameraAt {
                x: self.word_param(op, PARAM_1)?,
            },
            0x24 | 0x64 | 0xA4 | 0xE4 => I::LoadRoomWithEgo {
                object: self.word_param(op, PARAM_1)?,
                room: self.byte_param(op, PARAM_2)?,
                x: self.i16()?,
                y: self.i16()?,
            },
            0x30 => self.matrix_ops()?,
            0x33 => self.room_ops()?,
            0x3F | 0x7F | 0xBF | 0xFF => {
                let x = self.word_param(op, PARAM_1)?;
                let y = self.word_param(op, PARAM_2)?;
                let aux = self.aux(PARAM_1 | PARAM_2 | PARAM_3)?;
                I::DrawBox {
                    x,
                    y,
                    x2: self.word_param(aux, PARAM_1)?,
                    y2: self.word_param(aux, PARAM_2)?,
                    color: self.byte_param(aux, PARAM_3)?,
                }
            }
            0x5C => {
                let sub = self.u8()?;
                if sub & 0x1F != 3 {
                    return Err(Fail::Unrecognized);
                }
                self.flags(sub, PARAM_1)?;
                I::OldRoomEffect {
                    effect: self.word_param(sub, PARAM_1)?,
                }
            }
            0x72 | 0xF2 => I::LoadRoom {
                room: self.byte_param(op, PARAM_1)?,
            },

            // Scripts.
            0x0A | 0x2A | 0x4A | 0x6A | 0x8A | 0xAA | 0xCA | 0xEA => I::StartScript {
                script: self.byte_param(op, PARAM_1)?,
                args: self.word_list()?,
                recursive: op & 0x20 != 0,
                freeze_resistant: op & 0x40 != 0,
            },
            0x37 | 0x77 | 0xB7 | 0xF7 => I::StartObject {
                object: self.word_param(op, PARAM_1)?,
                script: self.byte_param(op, PARAM_2)?,
                args: self.word_list()?,
            },
            0x42 | 0xC2 => I::ChainScript {
                script: self.byte_param(op, PARAM_1)?,
                args: self.word_list()?,
            },
            0x62 | 0xE2 => I::StopScript {
                script: self.byte_param(op, PARAM_1)?,
            },
            0x68 | 0xE8 => {
                self.get_actor(op, |result, script| I::IsScriptRunning { result, script })?
            }

            // Sound.
            0x02 | 0x82 => I::StartMusic {
                sound: self.byte_param(op, PARAM_1)?,
            },
            0x1C | 0x9C => I::StartSound {
                sound: self.byte_param(op, PARAM_1)?,
            },
            0x20 => I::StopMusic,
            0x3C | 0xBC => I::StopSound {
                sound: self.byte_param(op, PARAM_1)?,
            },
            0x4C => I::SoundKludge {
                args: self.word_list()?,
            },
            0x7C | 0xFC => {
                self.get_actor(op, |result, sound| I::IsSoundRunning { result, sound })?
            }
            0x16 | 0x96 => self.get_actor(op, |result, max| I::GetRandomNr { result, max })?,

            // Verbs and interface.
            0x0B | 0x4B | 0x8B | 0xCB => {
                let result = self.result_var()?;
                let verb = self.word_param(op, PARAM_1)?;
                let entrypoint = self.word_param(op, PARAM_2)?;
                I::GetVerbEntrypoint {
                    result,
                    verb,
                    entrypoint,
                }
            }
            0x19 | 0x39 | 0x59 | 0x79 | 0x99 | 0xB9 | 0xD9 | 0xF9 => {
                let verb = self.byte_param(op, PARAM_1)?;
                let objects = if verb == Param::Imm(0xFE) {
                    None
                } else {
                    Some((
                        self.word_param(op, PARAM_2)?,
                        self.word_param(op, PARAM_3)?,
                    ))
                };
                I::DoSentence { verb, objects }
            }
            0x7A | 0xFA => self.verb_ops(op)?,
            0xAB => self.save_restore_verbs()?,
            0x2C => self.cursor_command()?,
            0x98 => {
                let sub = self.u8()?;
                let system_op = match sub {
                    1 => SystemOp::Restart,
                    2 => SystemOp::Pause,
                    3 => SystemOp::Quit,
                    _ => return Err(Fail::Unrecognized),
                };
                I::SystemOps { op: system_op }
            }
            0xAE => {
                let sub = self.u8()?;
                let wait_op = match sub & 0x1F {
                    1 => {
                        self.flags(sub, PARAM_1)?;
                        WaitOp::ForActor(self.byte_param(sub, PARAM_1)?)
                    }
                    2 if sub == 2 => WaitOp::ForMessage,
                    3 if sub == 3 => WaitOp::ForCamera,
                    4 if sub == 4 => WaitOp::ForSentence,
                    _ => return Err(Fail::Unrecognized),
                };
                I::Wait { op: wait_op }
            }
            0x27 => self.string_ops()?,
            0x0C => self.resource_routines()?,
            0x14 | 0x94 => I::Print {
                actor: self.byte_param(op, PARAM_1)?,
                ops: self.print_ops()?,
            },
            0xD8 => I::PrintEgo {
                ops: self.print_ops()?,
            },
            0x6B | 0xEB => I::Debug {
                value: self.word_param(op, PARAM_1)?,
            },

            _ => return Err(Fail::Unrecognized),
        })
    }

    fn actor_ops(&mut self, op: u8) -> DResult<Instruction> {
        let actor = self.byte_param(op, PARAM_1)?;
        let mut ops = Vec::new();
        loop {
            let sub = self.u8()?;
            if sub == LIST_END {
                return Ok(Instruction::ActorOps { actor, ops });
            }
            let item = match sub & 0x1F {
                0 => {
                    self.flags(sub, PARAM_1)?;
                    ActorOp::Dummy(self.byte_param(sub, PARAM_1)?)
                }
                1 => {
                    self.flags(sub, PARAM_1)?;
                    ActorOp::Costume(self.byte_param(sub, PARAM_1)?)
                }
                2 => {
                    self.flags(sub, PARAM_1 | PARAM_2)?;
                    ActorOp::StepDist(
                        self.byte_param(sub, PARAM_1)?,
                        self.byte_param(sub, PARAM_2)?,
                    )
                }
                3 => {
                    self.flags(sub, PARAM_1)?;
                    ActorOp::Sound(self.byte_param(sub, PARAM_1)?)
                }
                4 => {
                    self.flags(sub, PARAM_1)?;
                    ActorOp::WalkAnim(self.byte_param(sub, PARAM_1)?)
                }
                5 => {
                    self.flags(sub, PARAM_1 | PARAM_2)?;
                    ActorOp::TalkAnim(
                        self.byte_param(sub, PARAM_1)?,
                        self.byte_param(sub, PARAM_2)?,
                    )
                }
                6 => {
                    self.flags(sub, PARAM_1)?;
                    ActorOp::StandAnim(self.byte_param(sub, PARAM_1)?)
                }
                7 => {
                    self.flags(sub, PARAM_1 | PARAM_2 | PARAM_3)?;
                    ActorOp::Animations(
                        self.byte_param(sub, PARAM_1)?,
                        self.byte_param(sub, PARAM_2)?,
                        self.byte_param(sub, PARAM_3)?,
                    )
                }
                8 if sub == 8 => ActorOp::Init,
                9 => {
                    self.flags(sub, PARAM_1)?;
                    ActorOp::Elevation(self.word_param(sub, PARAM_1)?)
                }
                10 if sub == 10 => ActorOp::AnimDefault,
                11 => {
                    self.flags(sub, PARAM_1 | PARAM_2)?;
                    ActorOp::Palette(
                        self.byte_param(sub, PARAM_1)?,
                        self.byte_param(sub, PARAM_2)?,
                    )
                }
                12 => {
                    self.flags(sub, PARAM_1)?;
                    ActorOp::TalkColor(self.byte_param(sub, PARAM_1)?)
                }
                13 if sub == 13 => ActorOp::Name(self.text()?),
                14 => {
                    self.flags(sub, PARAM_1)?;
                    ActorOp::InitAnim(self.byte_param(sub, PARAM_1)?)
                }
                16 => {
                    self.flags(sub, PARAM_1)?;
                    ActorOp::Width(self.byte_param(sub, PARAM_1)?)
                }
                17 => {
                    self.flags(sub, PARAM_1 | PARAM_2)?;
                    ActorOp::Scale(
                        self.byte_param(sub, PARAM_1)?,
                        self.byte_param(sub, PARAM_2)?,
                    )
                }
                18 if sub == 18 => ActorOp::NeverZClip,
                19 => {
                    self.flags(sub, PARAM_1)?;
                    ActorOp::SetZClip(self.byte_param(sub, PARAM_1)?)
                }
                20 if sub == 20 => ActorOp::IgnoreBoxes,
                21 => {
                    self.flags(sub, PARAM_1)?;
                    ActorOp::AnimSpeed(self.byte_param(sub, PARAM_1)?)
                }
                22 => {
                    self.flags(sub, PARAM_1)?;
                    ActorOp::ShadowMode(self.byte_param(sub, PARAM_1)?)
                }
                _ => return Err(Fail::Unrecognized),
            };
            ops.push(item);
        }
    }

    fn verb_ops(&mut self, op: u8) -> DResult<Instruction> {
        let verb = self.byte_param(op, PARAM_1)?;
        let mut ops = Vec::new();
        loop {
            let sub = self.u8()?;
            if sub == LIST_END {
                return Ok(Instruction::VerbOps { verb, ops });
            }
            let item = match sub & 0x1F {
                1 => {
                    self.flags(sub, PARAM_1)?;
                    VerbOp::Image(self.word_param(sub, PARAM_1)?)
                }
                2 if sub == 2 => VerbOp::Text(self.text()?),
                3 => {
                    self.flags(sub, PARAM_1)?;
                    VerbOp::Color(self.byte_param(sub, PARAM_1)?)
                }
                4 => {
                    self.flags(sub, PARAM_1)?;
                    VerbOp::HiColor(self.byte_param(sub, PARAM_1)?)
                }
                5 => {
                    self.flags(sub, PARAM_1 | PARAM_2)?;
                    VerbOp::At {
                        x: self.word_param(sub, PARAM_1)?,
                        y: self.word_param(sub, PARAM_2)?,
                    }
                }
                6 if sub == 6 => VerbOp::On,
                7 if sub == 7 => VerbOp::Off,
                8 if sub == 8 => VerbOp::Delete,
                9 if sub == 9 => VerbOp::New,
                16 => {
                    self.flags(sub, PARAM_1)?;
                    VerbOp::DimColor(self.byte_param(sub, PARAM_1)?)
                }
                17 if sub == 17 => VerbOp::Dim,
                18 => {
                    self.flags(sub, PARAM_1)?;
                    VerbOp::Key(self.byte_param(sub, PARAM_1)?)
                }
                19 if sub == 19 => VerbOp::Center,
                20 => {
                    self.flags(sub, PARAM_1)?;
                    VerbOp::SetToString(self.word_param(sub, PARAM_1)?)
                }
                22 => {
                    self.flags(sub, PARAM_1 | PARAM_2)?;
                    VerbOp::SetToObject {
                        object: self.word_param(sub, PARAM_1)?,
                        room: self.byte_param(sub, PARAM_2)?,
                    }
                }
                23 => {
                    self.flags(sub, PARAM_1)?;
                    VerbOp::BackColor(self.byte_param(sub, PARAM_1)?)
                }
                _ => return Err(Fail::Unrecognized),
            };
            ops.push(item);
        }
    }

    fn print_ops(&mut self) -> DResult<Vec<PrintOp>> {
        let mut ops = Vec::new();
        loop {
            let sub = self.u8()?;
            if sub == LIST_END {
                return Ok(ops);
            }
            let item = match sub & 0x1F {
                0 => {
                    self.flags(sub, PARAM_1 | PARAM_2)?;
                    PrintOp::At {
                        x: self.word_param(sub, PARAM_1)?,
                        y: self.word_param(sub, PARAM_2)?,
                    }
                }
                1 => {
                    self.flags(sub, PARAM_1)?;
                    PrintOp::Color(self.byte_param(sub, PARAM_1)?)
                }
                2 => {
                    self.flags(sub, PARAM_1)?;
                    PrintOp::Clipped(self.word_param(sub, PARAM_1)?)
                }
                3 => {
                    self.flags(sub, PARAM_1 | PARAM_2)?;
                    PrintOp::RestoreBackground {
                        x: self.word_param(sub, PARAM_1)?,
                        y: self.word_param(sub, PARAM_2)?,
                    }
                }
                4 if sub == 4 => PrintOp::Center,
                6 if sub == 6 => PrintOp::Left,
                7 if sub == 7 => PrintOp::Overhead,
                8 => {
                    self.flags(sub, PARAM_1 | PARAM_2)?;
                    PrintOp::PlayCdTrack {
                        a: self.word_param(sub, PARAM_1)?,
                        b: self.word_param(sub, PARAM_2)?,
                    }
                }
                // The message ends the layout list without a terminator.
                15 if sub == 15 => {
                    ops.push(PrintOp::Message(self.text()?));
                    return Ok(ops);
                }
                _ => return Err(Fail::Unrecognized),
            };
            ops.push(item);
        }
    }

    fn cursor_command(&mut self) -> DResult<Instruction> {
        let sub = self.u8()?;
        let cursor_op = match sub & 0x1F {
            1 if sub == 1 => CursorOp::CursorShow,
            2 if sub == 2 => CursorOp::CursorHide,
            3 if sub == 3 => CursorOp::UserputOn,
            4 if sub == 4 => CursorOp::UserputOff,
            5 if sub == 5 => CursorOp::CursorSoftOn,
            6 if sub == 6 => CursorOp::CursorSoftOff,
            7 if sub == 7 => CursorOp::UserputSoftOn,
            8 if sub == 8 => CursorOp::UserputSoftOff,
            10 => {
                self.flags(sub, PARAM_1 | PARAM_2)?;
                CursorOp::SetCursorImg {
                    cursor: self.byte_param(sub, PARAM_1)?,
                    image: self.byte_param(sub, PARAM_2)?,
                }
            }
            11 => {
                self.flags(sub, PARAM_1 | PARAM_2 | PARAM_3)?;
                CursorOp::SetCursorHotspot {
                    cursor: self.byte_param(sub, PARAM_1)?,
                    x: self.byte_param(sub, PARAM_2)?,
                    y: self.byte_param(sub, PARAM_3)?,
                }
            }
            12 => {
                self.flags(sub, PARAM_1)?;
                CursorOp::InitCursor(self.byte_param(sub, PARAM_1)?)
            }
            13 => {
                self.flags(sub, PARAM_1)?;
                CursorOp::InitCharset(self.byte_param(sub, PARAM_1)?)
            }
            14 if sub == 14 => CursorOp::LoadCharset {
                args: self.word_list()?,
            },
            _ => return Err(Fail::Unrecognized),
        };
        Ok(Instruction::CursorCommand { op: cursor_op })
    }

    fn string_ops(&mut self) -> DResult<Instruction> {
        let sub = self.u8()?;
        let string_op = match sub & 0x1F {
            1 => {
                self.flags(sub, PARAM_1)?;
                StringOp::PutCode {
                    string: self.byte_param(sub, PARAM_1)?,
                    text: self.text()?,
                }
            }
            2 => {
                self.flags(sub, PARAM_1 | PARAM_2)?;
                StringOp::Copy {
                    dest: self.byte_param(sub, PARAM_1)?,
                    source: self.byte_param(sub, PARAM_2)?,
                }
            }
            3 => {
                self.flags(sub, PARAM_1 | PARAM_2 | PARAM_3)?;
                StringOp::SetChar {
                    string: self.byte_param(sub, PARAM_1)?,
                    index: self.byte_param(sub, PARAM_2)?,
                    ch: self.byte_param(sub, PARAM_3)?,
                }
            }
            4 => {
                self.flags(sub, PARAM_1 | PARAM_2)?;
                StringOp::GetChar {
                    result: self.result_var()?,
                    string: self.byte_param(sub, PARAM_1)?,
                    index: self.byte_param(sub, PARAM_2)?,
                }
            }
            5 => {
                self.flags(sub, PARAM_1 | PARAM_2)?;
                StringOp::Create {
                    string: self.byte_param(sub, PARAM_1)?,
                    size: self.byte_param(sub, PARAM_2)?,
                }
            }
            _ => return Err(Fail::Unrecognized),
        };
        Ok(Instruction::StringOps { op: string_op })
    }

    fn resource_routines(&mut self) -> DResult<Instruction> {
        let sub = self.u8()?;
        let code = sub & 0x1F;
        let resource_op = match code {
            1..=16 | 18 | 19 => {
                self.flags(sub, PARAM_1)?;
                let id = self.byte_param(sub, PARAM_1)?;
                match code {
                    1 => ResourceOp::LoadScript(id),
                    2 => ResourceOp::LoadSound(id),
                    3 => ResourceOp::LoadCostume(id),
                    4 => ResourceOp::LoadRoom(id),
                    5 => ResourceOp::NukeScript(id),
                    6 => ResourceOp::NukeSound(id),
                    7 => ResourceOp::NukeCostume(id),
                    8 => ResourceOp::NukeRoom(id),
                    9 => ResourceOp::LockScript(id),
                    10 => ResourceOp::LockSound(id),
                    11 => ResourceOp::LockCostume(id),
                    12 => ResourceOp::LockRoom(id),
                    13 => ResourceOp::UnlockScript(id),
                    14 => ResourceOp::UnlockSound(id),
                    15 => ResourceOp::UnlockCostume(id),
                    16 => ResourceOp::UnlockRoom(id),
                    18 => ResourceOp::LoadCharset(id),
                    _ => ResourceOp::NukeCharset(id),
                }
            }
            17 if sub == 17 => ResourceOp::ClearHeap,
            20 => {
                self.flags(sub, PARAM_1 | PARAM_2)?;
                ResourceOp::LoadFlObject {
                    object: self.word_param(sub, PARAM_1)?,
                    room: self.byte_param(sub, PARAM_2)?,
                }
            }
            _ => return Err(Fail::Unrecognized),
        };
        Ok(Instruction::ResourceRoutines { op: resource_op })
    }

    fn room_ops(&mut self) -> DResult<Instruction> {
        let sub = self.u8()?;
        let room_op = match sub & 0x1F {
            1 => {
                self.flags(sub, PARAM_1 | PARAM_2)?;
                RoomOp::Scroll {
                    min: self.word_param(sub, PARAM_1)?,
                    max: self.word_param(sub, PARAM_2)?,
                }
            }
            2 => {
                self.flags(sub, PARAM_1 | PARAM_2)?;
                RoomOp::Color {
                    color: self.word_param(sub, PARAM_1)?,
                    index: self.word_param(sub, PARAM_2)?,
                }
            }
            3 => {
                self.flags(sub, PARAM_1 | PARAM_2)?;
                RoomOp::SetScreen {
                    a: self.word_param(sub, PARAM_1)?,
                    b: self.word_param(sub, PARAM_2)?,
                }
            }
            4 => {
                self.flags(sub, PARAM_1 | PARAM_2 | PARAM_3)?;
                let red = self.word_param(sub, PARAM_1)?;
                let green = self.word_param(sub, PARAM_2)?;
                let blue = self.word_param(sub, PARAM_3)?;
                let aux = self.aux(PARAM_1)?;
                RoomOp::SetPalColor {
                    red,
                    green,
                    blue,
                    index: self.byte_param(aux, PARAM_1)?,
                }
            }
            5 if sub == 5 => RoomOp::ShakeOn,
            6 if sub == 6 => RoomOp::ShakeOff,
            8 => {
                self.flags(sub, PARAM_1 | PARAM_2 | PARAM_3)?;
                RoomOp::Intensity {
                    scale: self.byte_param(sub, PARAM_1)?,
                    start: self.byte_param(sub, PARAM_2)?,
                    end: self.byte_param(sub, PARAM_3)?,
                }
            }
            10 => {
                self.flags(sub, PARAM_1)?;
                RoomOp::ScreenEffect {
                    effect: self.word_param(sub, PARAM_1)?,
                }
            }
            13 => {
                self.flags(sub, PARAM_1)?;
                RoomOp::SaveString {
                    slot: self.byte_param(sub, PARAM_1)?,
                    name: self.text()?,
                }
            }
            14 => {
                self.flags(sub, PARAM_1)?;
                RoomOp::LoadString {
                    slot: self.byte_param(sub, PARAM_1)?,
                    name: self.text()?,
                }
            }
            16 => {
                self.flags(sub, PARAM_1 | PARAM_2)?;
                RoomOp::CycleDelay {
                    index: self.byte_param(sub, PARAM_1)?,
                    delay: self.byte_param(sub, PARAM_2)?,
                }
            }
            _ => return Err(Fail::Unrecognized),
        };
        Ok(Instruction::RoomOps { op: room_op })
    }

    fn matrix_ops(&mut self) -> DResult<Instruction> {
        let sub = self.u8()?;
        let matrix_op = match sub & 0x1F {
            1 => {
                self.flags(sub, PARAM_1 | PARAM_2)?;
                MatrixOp::SetBoxFlags {
                    box_id: self.byte_param(sub, PARAM_1)?,
                    flags: self.byte_param(sub, PARAM_2)?,
                }
            }
            2 => {
                self.flags(sub, PARAM_1 | PARAM_2)?;
                MatrixOp::SetBoxScale {
                    box_id: self.byte_param(sub, PARAM_1)?,
                    scale: self.byte_param(sub, PARAM_2)?,
                }
            }
            3 => {
                self.flags(sub, PARAM_1 | PARAM_2)?;
                MatrixOp::SetBoxSlot {
                    box_id: self.byte_param(sub, PARAM_1)?,
                    slot: self.byte_param(sub, PARAM_2)?,
                }
            }
            4 if sub == 4 => MatrixOp::CreateBoxMatrix,
            _ => return Err(Fail::Unrecognized),
        };
        Ok(Instruction::MatrixOps { op: matrix_op })
    }

    fn save_restore_verbs(&mut self) -> DResult<Instruction> {
        let sub = self.u8()?;
        let code = sub & 0x1F;
        if !(1..=3).contains(&code) {
            return Err(Fail::Unrecognized);
        }
        self.flags(sub, PARAM_1 | PARAM_2 | PARAM_3)?;
        let start = self.byte_param(sub, PARAM_1)?;
        let end = self.byte_param(sub, PARAM_2)?;
        let mode = self.byte_param(sub, PARAM_3)?;
        let op = match code {
            1 => SaveRestoreVerbsOp::Save { start, end, mode },
            2 => SaveRestoreVerbsOp::Restore { start, end, mode },
            _ => SaveRestoreVerbsOp::Delete { start, end, mode },
        };
        Ok(Instruction::SaveRestoreVerbs { op })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::{
        encode::encode,
        text::{Text, TextItem},
    };

    /// Decodes, checks the reported length against the input, and checks
    /// that re-encoding reproduces the input byte-exactly.
    fn roundtrip(bytes: &[u8]) -> Instruction {
        let (inst, len) = decode_one(bytes, 0).unwrap();
        assert_eq!(len, bytes.len(), "length mismatch for {inst}");
        assert_eq!(encode(&inst), bytes, "re-encode mismatch for {inst}");
        assert_eq!(inst.byte_length(), len);
        inst
    }

    #[test]
    fn stop_object_code_is_one_byte() {
        let inst = roundtrip(&[0x00]);
        assert_eq!(inst, Instruction::StopObjectCode);
    }

    #[test]
    fn move_immediate_to_global() {
        let inst = roundtrip(&[0x1A, 0x01, 0x00, 0x2A, 0x00]);
        assert_eq!(
            inst,
            Instruction::Move {
                var: VarSpec::Global(1),
                value: Param::Imm(42),
            }
        );
    }

    #[test]
    fn move_variable_to_local() {
        // 0x9A = move with the value flagged as a variable reference.
        let inst = roundtrip(&[0x9A, 0x03, 0x40, 0x07, 0x00]);
        assert_eq!(
            inst,
            Instruction::Move {
                var: VarSpec::Local(3),
                value: Param::Var(VarSpec::Global(7)),
            }
        );
    }

    #[test]
    fn unknown_opcode_becomes_invalid() {
        let (inst, len) = decode_one(&[0xF0], 0).unwrap();
        assert_eq!(inst, Instruction::Invalid(vec![0xF0]));
        assert_eq!(len, 1);
        assert_eq!(encode(&inst), &[0xF0]);
    }

    #[test]
    fn aliased_forms_differ_only_in_addressing() {
        let base = roundtrip(&[0x01, 5, 0x10, 0x00, 0x20, 0x00]);
        let Instruction::PutActor { actor, x, y } = base else {
            panic!("not a putActor: {base}");
        };
        assert_eq!(actor, Param::Imm(5));
        assert_eq!(x, Param::Imm(0x10));
        assert_eq!(y, Param::Imm(0x20));

        // Same shape with all three parameters flagged as variables.
        let flagged = roundtrip(&[0xE1, 0x01, 0x00, 0x02, 0x00, 0x03, 0x00]);
        let Instruction::PutActor { actor, x, y } = flagged else {
            panic!("not a putActor: {flagged}");
        };
        assert_eq!(actor, Param::Var(VarSpec::Global(1)));
        assert_eq!(x, Param::Var(VarSpec::Global(2)));
        assert_eq!(y, Param::Var(VarSpec::Global(3)));
    }

    #[test]
    fn comparison_with_jump_tail() {
        // unless (Var[8] == 100) goto -6
        let inst = roundtrip(&[0x48, 0x08, 0x00, 0x64, 0x00, 0xFA, 0xFF]);
        assert_eq!(
            inst,
            Instruction::IsEqual {
                var: VarSpec::Global(8),
                value: Param::Imm(100),
                target: -6,
            }
        );
    }

    #[test]
    fn equal_zero_and_not_equal_zero_are_distinct_ops() {
        let eq = roundtrip(&[0x28, 0x05, 0x00, 0x02, 0x00]);
        assert!(matches!(eq, Instruction::EqualZero { .. }));
        let ne = roundtrip(&[0xA8, 0x05, 0x00, 0x02, 0x00]);
        assert!(matches!(ne, Instruction::NotEqualZero { .. }));
    }

    #[test]
    fn start_script_carries_behavior_bits() {
        // 0x6A = startScript | recursive | freeze-resistant, one argument.
        let inst = roundtrip(&[0x6A, 0x0B, 0x01, 0x64, 0x00, 0xFF]);
        assert_eq!(
            inst,
            Instruction::StartScript {
                script: Param::Imm(11),
                args: vec![Param::Imm(100)],
                recursive: true,
                freeze_resistant: true,
            }
        );
    }

    #[test]
    fn word_list_entries_carry_their_own_flags() {
        // cutscene([5, Var[2]])
        let inst = roundtrip(&[0x40, 0x01, 0x05, 0x00, 0x81, 0x02, 0x00, 0xFF]);
        assert_eq!(
            inst,
            Instruction::Cutscene {
                args: vec![Param::Imm(5), Param::Var(VarSpec::Global(2))],
            }
        );
    }

    #[test]
    fn malformed_list_entry_poisons_the_instruction() {
        // 0x42 is not a valid argument introducer.
        let (inst, len) = decode_one(&[0x40, 0x42], 0).unwrap();
        assert_eq!(inst, Instruction::Invalid(vec![0x40, 0x42]));
        assert_eq!(len, 2);
    }

    #[test]
    fn actor_ops_list() {
        let bytes = [
            0x13, 0x01, // actorOps(1, ...
            0x01, 0x0C, // Costume(12)
            0x82, 0x04, 0x40, 0x05, // StepDist(Local[4], 5)
            0x08, // Init
            0x0D, b'G', b'u', b'y', 0x00, // Name("Guy")
            0xFF,
        ];
        let inst = roundtrip(&bytes);
        assert_eq!(
            inst,
            Instruction::ActorOps {
                actor: Param::Imm(1),
                ops: vec![
                    ActorOp::Costume(Param::Imm(12)),
                    ActorOp::StepDist(
                        Param::Var(VarSpec::Local(4)),
                        Param::Imm(5),
                    ),
                    ActorOp::Init,
                    ActorOp::Name(Text::from_literal(b"Guy")),
                ],
            }
        );
    }

    #[test]
    fn stray_flags_on_no_param_sub_op_are_invalid() {
        // Init (8) with a meaningless 0x80 flag is outside the table.
        let (inst, len) = decode_one(&[0x13, 0x01, 0x88], 0).unwrap();
        assert_eq!(inst, Instruction::Invalid(vec![0x13, 0x01, 0x88]));
        assert_eq!(len, 3);
    }

    #[test]
    fn unknown_actor_sub_op_is_invalid_not_fatal() {
        let (inst, len) = decode_one(&[0x13, 0x01, 0x1E], 0).unwrap();
        assert_eq!(inst, Instruction::Invalid(vec![0x13, 0x01, 0x1E]));
        assert_eq!(len, 3);
    }

    #[test]
    fn actor_ops_40_alias_normalizes() {
        // The 0x40 bit on the actorOps opcode selects nothing; 0x53 decodes
        // to the same shape as 0x13 and re-encodes canonically.
        let (inst, len) = decode_one(&[0x53, 0x07, 0xFF], 0).unwrap();
        assert_eq!(len, 3);
        assert_eq!(
            inst,
            Instruction::ActorOps {
                actor: Param::Imm(7),
                ops: vec![],
            }
        );
        assert_eq!(encode(&inst), &[0x13, 0x07, 0xFF]);
    }

    #[test]
    fn print_with_layout_and_message() {
        let bytes = [
            0x14, 0x01, // print(1, ...
            0x00, 0xA0, 0x00, 0x08, 0x00, // At(160, 8)
            0x04, // Center
            0x0F, b'h', b'i', 0xFF, 0x02, 0x00, // Text("hi" + keepText())
        ];
        let inst = roundtrip(&bytes);
        assert_eq!(
            inst,
            Instruction::Print {
                actor: Param::Imm(1),
                ops: vec![
                    PrintOp::At {
                        x: Param::Imm(160),
                        y: Param::Imm(8),
                    },
                    PrintOp::Center,
                    PrintOp::Message(Text {
                        items: vec![TextItem::Raw(b"hi".to_vec()), TextItem::KeepText],
                    }),
                ],
            }
        );
    }

    #[test]
    fn print_without_message_ends_on_sentinel() {
        let inst = roundtrip(&[0xD8, 0x07, 0xFF]);
        assert_eq!(
            inst,
            Instruction::PrintEgo {
                ops: vec![PrintOp::Overhead],
            }
        );
    }

    #[test]
    fn expression_with_nested_instruction() {
        let bytes = [
            0xAC, 0x02, 0x00, // Var[2] = expression(...)
            0x01, 0x01, 0x00, // value 1
            0x06, 0x16, 0x00, 0x00, 0x14, // nested: getRandomNr into Var[0]
            0x02, // +
            0xFF,
        ];
        let inst = roundtrip(&bytes);
        let Instruction::Expression { var, items } = &inst else {
            panic!("not an expression: {inst}");
        };
        assert_eq!(*var, VarSpec::Global(2));
        assert_eq!(items.len(), 3);
        assert_eq!(items[0], ExprItem::Value(Param::Imm(1)));
        assert!(matches!(
            &items[1],
            ExprItem::Operation(nested)
                if matches!(**nested, Instruction::GetRandomNr { .. })
        ));
        assert_eq!(items[2], ExprItem::Add);
    }

    #[test]
    fn do_sentence_stop_form_has_no_objects() {
        let inst = roundtrip(&[0x19, 0xFE]);
        assert_eq!(
            inst,
            Instruction::DoSentence {
                verb: Param::Imm(0xFE),
                objects: None,
            }
        );
        let full = roundtrip(&[0x19, 0x03, 0x23, 0x01, 0x45, 0x01]);
        assert!(matches!(
            full,
            Instruction::DoSentence {
                objects: Some(_),
                ..
            }
        ));
    }

    #[test]
    fn draw_box_reads_auxiliary_flags() {
        let bytes = [
            0x3F, 0x0A, 0x00, 0x14, 0x00, // drawBox(10, 20, ...
            0x80, 0x01, 0x00, 0x28, 0x00, 0x0F, // x2=Var[1], y2=40, color=15
        ];
        let inst = roundtrip(&bytes);
        assert_eq!(
            inst,
            Instruction::DrawBox {
                x: Param::Imm(10),
                y: Param::Imm(20),
                x2: Param::Var(VarSpec::Global(1)),
                y2: Param::Imm(40),
                color: Param::Imm(15),
            }
        );
    }

    #[test]
    fn compound_family_round_trips() {
        // One representative per compound family.
        roundtrip(&[0x0C, 0x01, 0x0A]); // resourceRoutines loadScript(10)
        roundtrip(&[0x0C, 0x94, 0x05, 0x00, 0x07]); // loadFlObject(Var[5], 7)
        roundtrip(&[0x0C, 0x11]); // clearHeap
        roundtrip(&[0x27, 0x02, 0x01, 0x02]); // stringOps copy
        roundtrip(&[0x27, 0x04, 0x09, 0x00, 0x01, 0x00]); // getStringChar
        roundtrip(&[0x2C, 0x01]); // cursorShow
        roundtrip(&[0x2C, 0x0E, 0x01, 0x02, 0x00, 0xFF]); // loadCharset([2])
        roundtrip(&[0x7A, 0x07, 0x02, b'O', b'p', b'e', b'n', 0x00, 0xFF]); // verbOps text
        roundtrip(&[0xAB, 0x01, 0x01, 0x08, 0x00]); // saveVerbs
        roundtrip(&[0xAE, 0x01, 0x05]); // waitForActor(5)
        roundtrip(&[0xAE, 0x02]); // waitForMessage
        roundtrip(&[0x98, 0x03]); // systemOps quit
        roundtrip(&[0x30, 0x01, 0x02, 0x03]); // setBoxFlags(2, 3)
        roundtrip(&[0x33, 0x0A, 0x86, 0x00]); // screenEffect(134)
        roundtrip(&[0x33, 0x04, 0x01, 0x00, 0x02, 0x00, 0x03, 0x00, 0x00, 0x05]); // setPalColor
        roundtrip(&[0x05, 0x1E, 0x00, 0x1F]); // drawObject(30, draw())
        roundtrip(&[0x05, 0x1E, 0x00, 0x41, 0x64, 0x00, 0x07, 0x40]); // drawObject setXY
    }

    #[test]
    fn unknown_sub_opcode_in_family_is_invalid() {
        let (inst, len) = decode_one(&[0x98, 0x07], 0).unwrap();
        assert_eq!(inst, Instruction::Invalid(vec![0x98, 0x07]));
        assert_eq!(len, 2);
        let (inst, len) = decode_one(&[0x0C, 0x1F], 0).unwrap();
        assert_eq!(inst, Instruction::Invalid(vec![0x0C, 0x1F]));
        assert_eq!(len, 2);
    }

    #[test]
    fn simple_op_round_trips() {
        roundtrip(&[0x18, 0x10, 0x00]); // goto +16
        roundtrip(&[0x80]); // breakHere
        roundtrip(&[0xC0]); // endCutscene
        roundtrip(&[0x58, 0x01]); // beginOverride
        roundtrip(&[0x58, 0x00]); // endOverride
        roundtrip(&[0x2E, 0x10, 0x27, 0x00]); // delay(10000)
        roundtrip(&[0x2B, 0x0A, 0x00]); // delayVariable(Var[10])
        roundtrip(&[0x46, 0x09, 0x00]); // Var[9]++
        roundtrip(&[0xC6, 0x09, 0x40]); // Local[9]--
        roundtrip(&[0xCC, 0x5B, 0x81, 0x82, 0x00]); // pseudoRoom
        roundtrip(&[0x26, 0x03, 0x00, 0x02, 0x0A, 0x14]); // setVarRange bytes
        roundtrip(&[0xA6, 0x03, 0x00, 0x01, 0xE8, 0x03]); // setVarRange words
        roundtrip(&[0x24, 0x37, 0x01, 0x14, 0xA0, 0x00, 0x48, 0x00]); // loadRoomWithEgo
        roundtrip(&[0x5C, 0x03, 0x86, 0x00]); // oldRoomEffect(134)
        roundtrip(&[0x0D, 0x01, 0x02, 0x28]); // walkActorToActor dist 40
        roundtrip(&[0x19, 0xFE]); // doSentence stop
        roundtrip(&[0x67, 0x04, 0x00, 0x01]); // getStringWidth
        roundtrip(&[0x6B, 0x40, 0x00]); // debug(64)
        roundtrip(&[0x4C, 0x01, 0x03, 0x00, 0xFF]); // soundKludge([3])
        roundtrip(&[0x20]); // stopMusic
    }

    #[test]
    fn truncated_tail_is_an_error() {
        assert_eq!(
            decode_one(&[0x1A, 0x01], 0),
            Err(DecodeError::TruncatedInput { offset: 2 })
        );
        assert_eq!(
            decode_one(&[0x13, 0x01, 0x0D, b'x'], 0),
            Err(DecodeError::TruncatedInput { offset: 4 })
        );
        assert_eq!(
            decode_one(&[0x40, 0x01], 0),
            Err(DecodeError::TruncatedInput { offset: 2 })
        );
    }

    #[test]
    fn decode_respects_start_offset() {
        let bytes = [0xAA, 0xBB, 0x00];
        let (inst, len) = decode_one(&bytes, 2).unwrap();
        assert_eq!(inst, Instruction::StopObjectCode);
        assert_eq!(len, 1);
    }
}
