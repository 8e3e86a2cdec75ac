use super::{
    inst::{
        ActorOp, CursorOp, DrawObjectOp, ExprItem, Instruction, MatrixOp, PrintOp, ResourceOp,
        RoomOp, SaveRestoreVerbsOp, StringOp, SystemOp, VerbOp, WaitOp,
    },
    var::{ByteParam, PARAM_1, PARAM_2, PARAM_3, Param, VarSpec, WordParam, compose_opcode},
};

const LIST_END: u8 = 0xFF;

/// Serializes one instruction to its exact on-disk bytes.
///
/// This is the inverse of the decoder on every decodable input, the
/// `Invalid` variant included: its captured bytes are emitted verbatim.
#[must_use]
pub fn encode(inst: &Instruction) -> Vec<u8> {
    let mut out = Vec::new();
    encode_into(inst, &mut out);
    out
}

fn push_var(out: &mut Vec<u8>, var: VarSpec) {
    out.extend_from_slice(&var.encode().to_le_bytes());
}

fn push_byte_param(out: &mut Vec<u8>, param: &ByteParam) {
    match param {
        Param::Imm(value) => out.push(*value),
        Param::Var(var) => push_var(out, *var),
    }
}

fn push_word_param(out: &mut Vec<u8>, param: &WordParam) {
    match param {
        Param::Imm(value) => out.extend_from_slice(&value.to_le_bytes()),
        Param::Var(var) => push_var(out, *var),
    }
}

fn push_i16(out: &mut Vec<u8>, value: i16) {
    out.extend_from_slice(&value.to_le_bytes());
}

/// Word-argument list: each entry gets its own addressing byte, the whole
/// list ends on the 0xFF sentinel.
fn push_word_list(out: &mut Vec<u8>, args: &[WordParam]) {
    for arg in args {
        out.push(compose_opcode(0x01, &[arg.flag(PARAM_1)]));
        push_word_param(out, arg);
    }
    out.push(LIST_END);
}

fn push_compare(out: &mut Vec<u8>, base: u8, var: VarSpec, value: &WordParam, target: i16) {
    out.push(compose_opcode(base, &[value.flag(PARAM_1)]));
    push_var(out, var);
    push_word_param(out, value);
    push_i16(out, target);
}

fn push_assign(out: &mut Vec<u8>, base: u8, var: VarSpec, value: &WordParam) {
    out.push(compose_opcode(base, &[value.flag(PARAM_1)]));
    push_var(out, var);
    push_word_param(out, value);
}

fn push_get_actor(out: &mut Vec<u8>, base: u8, result: VarSpec, actor: &ByteParam) {
    out.push(compose_opcode(base, &[actor.flag(PARAM_1)]));
    push_var(out, result);
    push_byte_param(out, actor);
}

fn push_get_object(out: &mut Vec<u8>, base: u8, result: VarSpec, object: &WordParam) {
    out.push(compose_opcode(base, &[object.flag(PARAM_1)]));
    push_var(out, result);
    push_word_param(out, object);
}

fn actor_op_sub(op: &ActorOp) -> u8 {
    match op {
        ActorOp::Dummy(a) => compose_opcode(0, &[a.flag(PARAM_1)]),
        ActorOp::Costume(a) => compose_opcode(1, &[a.flag(PARAM_1)]),
        ActorOp::StepDist(a, b) => compose_opcode(2, &[a.flag(PARAM_1), b.flag(PARAM_2)]),
        ActorOp::Sound(a) => compose_opcode(3, &[a.flag(PARAM_1)]),
        ActorOp::WalkAnim(a) => compose_opcode(4, &[a.flag(PARAM_1)]),
        ActorOp::TalkAnim(a, b) => compose_opcode(5, &[a.flag(PARAM_1), b.flag(PARAM_2)]),
        ActorOp::StandAnim(a) => compose_opcode(6, &[a.flag(PARAM_1)]),
        ActorOp::Animations(a, b, c) => {
            compose_opcode(7, &[a.flag(PARAM_1), b.flag(PARAM_2), c.flag(PARAM_3)])
        }
        ActorOp::Init => 8,
        ActorOp::Elevation(a) => compose_opcode(9, &[a.flag(PARAM_1)]),
        ActorOp::AnimDefault => 10,
        ActorOp::Palette(a, b) => compose_opcode(11, &[a.flag(PARAM_1), b.flag(PARAM_2)]),
        ActorOp::TalkColor(a) => compose_opcode(12, &[a.flag(PARAM_1)]),
        ActorOp::Name(_) => 13,
        ActorOp::InitAnim(a) => compose_opcode(14, &[a.flag(PARAM_1)]),
        ActorOp::Width(a) => compose_opcode(16, &[a.flag(PARAM_1)]),
        ActorOp::Scale(a, b) => compose_opcode(17, &[a.flag(PARAM_1), b.flag(PARAM_2)]),
        ActorOp::NeverZClip => 18,
        ActorOp::SetZClip(a) => compose_opcode(19, &[a.flag(PARAM_1)]),
        ActorOp::IgnoreBoxes => 20,
        ActorOp::AnimSpeed(a) => compose_opcode(21, &[a.flag(PARAM_1)]),
        ActorOp::ShadowMode(a) => compose_opcode(22, &[a.flag(PARAM_1)]),
    }
}

fn push_actor_op(out: &mut Vec<u8>, op: &ActorOp) {
    out.push(actor_op_sub(op));
    match op {
        ActorOp::Dummy(a)
        | ActorOp::Costume(a)
        | ActorOp::Sound(a)
        | ActorOp::WalkAnim(a)
        | ActorOp::StandAnim(a)
        | ActorOp::TalkColor(a)
        | ActorOp::InitAnim(a)
        | ActorOp::Width(a)
        | ActorOp::SetZClip(a)
        | ActorOp::AnimSpeed(a)
        | ActorOp::ShadowMode(a) => push_byte_param(out, a),
        ActorOp::StepDist(a, b)
        | ActorOp::TalkAnim(a, b)
        | ActorOp::Palette(a, b)
        | ActorOp::Scale(a, b) => {
            push_byte_param(out, a);
            push_byte_param(out, b);
        }
        ActorOp::Animations(a, b, c) => {
            push_byte_param(out, a);
            push_byte_param(out, b);
            push_byte_param(out, c);
        }
        ActorOp::Elevation(a) => push_word_param(out, a),
        ActorOp::Name(text) => text.encode_into(out),
        ActorOp::Init | ActorOp::AnimDefault | ActorOp::NeverZClip | ActorOp::IgnoreBoxes => {}
    }
}

fn push_verb_op(out: &mut Vec<u8>, op: &VerbOp) {
    match op {
        VerbOp::Image(a) => {
            out.push(compose_opcode(1, &[a.flag(PARAM_1)]));
            push_word_param(out, a);
        }
        VerbOp::Text(text) => {
            out.push(2);
            text.encode_into(out);
        }
        VerbOp::Color(a) => {
            out.push(compose_opcode(3, &[a.flag(PARAM_1)]));
            push_byte_param(out, a);
        }
        VerbOp::HiColor(a) => {
            out.push(compose_opcode(4, &[a.flag(PARAM_1)]));
            push_byte_param(out, a);
        }
        VerbOp::At { x, y } => {
            out.push(compose_opcode(5, &[x.flag(PARAM_1), y.flag(PARAM_2)]));
            push_word_param(out, x);
            push_word_param(out, y);
        }
        VerbOp::On => out.push(6),
        VerbOp::Off => out.push(7),
        VerbOp::Delete => out.push(8),
        VerbOp::New => out.push(9),
        VerbOp::DimColor(a) => {
            out.push(compose_opcode(16, &[a.flag(PARAM_1)]));
            push_byte_param(out, a);
        }
        VerbOp::Dim => out.push(17),
        VerbOp::Key(a) => {
            out.push(compose_opcode(18, &[a.flag(PARAM_1)]));
            push_byte_param(out, a);
        }
        VerbOp::Center => out.push(19),
        VerbOp::SetToString(a) => {
            out.push(compose_opcode(20, &[a.flag(PARAM_1)]));
            push_word_param(out, a);
        }
        VerbOp::SetToObject { object, room } => {
            out.push(compose_opcode(22, &[object.flag(PARAM_1), room.flag(PARAM_2)]));
            push_word_param(out, object);
            push_byte_param(out, room);
        }
        VerbOp::BackColor(a) => {
            out.push(compose_opcode(23, &[a.flag(PARAM_1)]));
            push_byte_param(out, a);
        }
    }
}

fn push_print_ops(out: &mut Vec<u8>, ops: &[PrintOp]) {
    for op in ops {
        match op {
            PrintOp::At { x, y } => {
                out.push(compose_opcode(0, &[x.flag(PARAM_1), y.flag(PARAM_2)]));
                push_word_param(out, x);
                push_word_param(out, y);
            }
            PrintOp::Color(a) => {
                out.push(compose_opcode(1, &[a.flag(PARAM_1)]));
                push_byte_param(out, a);
            }
            PrintOp::Clipped(a) => {
                out.push(compose_opcode(2, &[a.flag(PARAM_1)]));
                push_word_param(out, a);
            }
            PrintOp::RestoreBackground { x, y } => {
                out.push(compose_opcode(3, &[x.flag(PARAM_1), y.flag(PARAM_2)]));
                push_word_param(out, x);
                push_word_param(out, y);
            }
            PrintOp::Center => out.push(4),
            PrintOp::Left => out.push(6),
            PrintOp::Overhead => out.push(7),
            PrintOp::PlayCdTrack { a, b } => {
                out.push(compose_opcode(8, &[a.flag(PARAM_1), b.flag(PARAM_2)]));
                push_word_param(out, a);
                push_word_param(out, b);
            }
            // The message ends the list; no terminator follows it.
            PrintOp::Message(text) => {
                out.push(15);
                text.encode_into(out);
                return;
            }
        }
    }
    out.push(LIST_END);
}

fn push_cursor_op(out: &mut Vec<u8>, op: &CursorOp) {
    match op {
        CursorOp::CursorShow => out.push(1),
        CursorOp::CursorHide => out.push(2),
        CursorOp::UserputOn => out.push(3),
        CursorOp::UserputOff => out.push(4),
        CursorOp::CursorSoftOn => out.push(5),
        CursorOp::CursorSoftOff => out.push(6),
        CursorOp::UserputSoftOn => out.push(7),
        CursorOp::UserputSoftOff => out.push(8),
        CursorOp::SetCursorImg { cursor, image } => {
            out.push(compose_opcode(10, &[cursor.flag(PARAM_1), image.flag(PARAM_2)]));
            push_byte_param(out, cursor);
            push_byte_param(out, image);
        }
        CursorOp::SetCursorHotspot { cursor, x, y } => {
            out.push(compose_opcode(
                11,
                &[cursor.flag(PARAM_1), x.flag(PARAM_2), y.flag(PARAM_3)],
            ));
            push_byte_param(out, cursor);
            push_byte_param(out, x);
            push_byte_param(out, y);
        }
        CursorOp::InitCursor(a) => {
            out.push(compose_opcode(12, &[a.flag(PARAM_1)]));
            push_byte_param(out, a);
        }
        CursorOp::InitCharset(a) => {
            out.push(compose_opcode(13, &[a.flag(PARAM_1)]));
            push_byte_param(out, a);
        }
        CursorOp::LoadCharset { args } => {
            out.push(14);
            push_word_list(out, args);
        }
    }
}

fn push_string_op(out: &mut Vec<u8>, op: &StringOp) {
    match op {
        StringOp::PutCode { string, text } => {
            out.push(compose_opcode(1, &[string.flag(PARAM_1)]));
            push_byte_param(out, string);
            text.encode_into(out);
        }
        StringOp::Copy { dest, source } => {
            out.push(compose_opcode(2, &[dest.flag(PARAM_1), source.flag(PARAM_2)]));
            push_byte_param(out, dest);
            push_byte_param(out, source);
        }
        StringOp::SetChar { string, index, ch } => {
            out.push(compose_opcode(
                3,
                &[string.flag(PARAM_1), index.flag(PARAM_2), ch.flag(PARAM_3)],
            ));
            push_byte_param(out, string);
            push_byte_param(out, index);
            push_byte_param(out, ch);
        }
        StringOp::GetChar { result, string, index } => {
            out.push(compose_opcode(4, &[string.flag(PARAM_1), index.flag(PARAM_2)]));
            push_var(out, *result);
            push_byte_param(out, string);
            push_byte_param(out, index);
        }
        StringOp::Create { string, size } => {
            out.push(compose_opcode(5, &[string.flag(PARAM_1), size.flag(PARAM_2)]));
            push_byte_param(out, string);
            push_byte_param(out, size);
        }
    }
}

fn push_resource_op(out: &mut Vec<u8>, op: &ResourceOp) {
    let (code, id) = match op {
        ResourceOp::LoadScript(a) => (1, Some(a)),
        ResourceOp::LoadSound(a) => (2, Some(a)),
        ResourceOp::LoadCostume(a) => (3, Some(a)),
        ResourceOp::LoadRoom(a) => (4, Some(a)),
        ResourceOp::NukeScript(a) => (5, Some(a)),
        ResourceOp::NukeSound(a) => (6, Some(a)),
        ResourceOp::NukeCostume(a) => (7, Some(a)),
        ResourceOp::NukeRoom(a) => (8, Some(a)),
        ResourceOp::LockScript(a) => (9, Some(a)),
        ResourceOp::LockSound(a) => (10, Some(a)),
        ResourceOp::LockCostume(a) => (11, Some(a)),
        ResourceOp::LockRoom(a) => (12, Some(a)),
        ResourceOp::UnlockScript(a) => (13, Some(a)),
        ResourceOp::UnlockSound(a) => (14, Some(a)),
        ResourceOp::UnlockCostume(a) => (15, Some(a)),
        ResourceOp::UnlockRoom(a) => (16, Some(a)),
        ResourceOp::ClearHeap => (17, None),
        ResourceOp::LoadCharset(a) => (18, Some(a)),
        ResourceOp::NukeCharset(a) => (19, Some(a)),
        ResourceOp::LoadFlObject { object, room } => {
            out.push(compose_opcode(20, &[object.flag(PARAM_1), room.flag(PARAM_2)]));
            push_word_param(out, object);
            push_byte_param(out, room);
            return;
        }
    };
    match id {
        Some(id) => {
            out.push(compose_opcode(code, &[id.flag(PARAM_1)]));
            push_byte_param(out, id);
        }
        None => out.push(code),
    }
}

fn push_room_op(out: &mut Vec<u8>, op: &RoomOp) {
    match op {
        RoomOp::Scroll { min, max } => {
            out.push(compose_opcode(1, &[min.flag(PARAM_1), max.flag(PARAM_2)]));
            push_word_param(out, min);
            push_word_param(out, max);
        }
        RoomOp::Color { color, index } => {
            out.push(compose_opcode(2, &[color.flag(PARAM_1), index.flag(PARAM_2)]));
            push_word_param(out, color);
            push_word_param(out, index);
        }
        RoomOp::SetScreen { a, b } => {
            out.push(compose_opcode(3, &[a.flag(PARAM_1), b.flag(PARAM_2)]));
            push_word_param(out, a);
            push_word_param(out, b);
        }
        RoomOp::SetPalColor { red, green, blue, index } => {
            out.push(compose_opcode(
                4,
                &[red.flag(PARAM_1), green.flag(PARAM_2), blue.flag(PARAM_3)],
            ));
            push_word_param(out, red);
            push_word_param(out, green);
            push_word_param(out, blue);
            out.push(compose_opcode(0, &[index.flag(PARAM_1)]));
            push_byte_param(out, index);
        }
        RoomOp::ShakeOn => out.push(5),
        RoomOp::ShakeOff => out.push(6),
        RoomOp::Intensity { scale, start, end } => {
            out.push(compose_opcode(
                8,
                &[scale.flag(PARAM_1), start.flag(PARAM_2), end.flag(PARAM_3)],
            ));
            push_byte_param(out, scale);
            push_byte_param(out, start);
            push_byte_param(out, end);
        }
        RoomOp::ScreenEffect { effect } => {
            out.push(compose_opcode(10, &[effect.flag(PARAM_1)]));
            push_word_param(out, effect);
        }
        RoomOp::SaveString { slot, name } => {
            out.push(compose_opcode(13, &[slot.flag(PARAM_1)]));
            push_byte_param(out, slot);
            name.encode_into(out);
        }
        RoomOp::LoadString { slot, name } => {
            out.push(compose_opcode(14, &[slot.flag(PARAM_1)]));
            push_byte_param(out, slot);
            name.encode_into(out);
        }
        RoomOp::CycleDelay { index, delay } => {
            out.push(compose_opcode(16, &[index.flag(PARAM_1), delay.flag(PARAM_2)]));
            push_byte_param(out, index);
            push_byte_param(out, delay);
        }
    }
}

fn push_matrix_op(out: &mut Vec<u8>, op: &MatrixOp) {
    match op {
        MatrixOp::SetBoxFlags { box_id, flags } => {
            out.push(compose_opcode(1, &[box_id.flag(PARAM_1), flags.flag(PARAM_2)]));
            push_byte_param(out, box_id);
            push_byte_param(out, flags);
        }
        MatrixOp::SetBoxScale { box_id, scale } => {
            out.push(compose_opcode(2, &[box_id.flag(PARAM_1), scale.flag(PARAM_2)]));
            push_byte_param(out, box_id);
            push_byte_param(out, scale);
        }
        MatrixOp::SetBoxSlot { box_id, slot } => {
            out.push(compose_opcode(3, &[box_id.flag(PARAM_1), slot.flag(PARAM_2)]));
            push_byte_param(out, box_id);
            push_byte_param(out, slot);
        }
        MatrixOp::CreateBoxMatrix => out.push(4),
    }
}

pub fn encode_into(inst: &Instruction, out: &mut Vec<u8>) {
    use Instruction as I;
    match inst {
        I::StopObjectCode => out.push(0x00),
        I::BreakHere => out.push(0x80),
        I::Jump { target } => {
            out.push(0x18);
            push_i16(out, *target);
        }
        I::Cutscene { args } => {
            out.push(0x40);
            push_word_list(out, args);
        }
        I::EndCutscene => out.push(0xC0),
        I::Override { arg } => {
            out.push(0x58);
            out.push(*arg);
        }
        I::FreezeScripts { flag } => {
            out.push(compose_opcode(0x60, &[flag.flag(PARAM_1)]));
            push_byte_param(out, flag);
        }
        I::PseudoRoom { value, rooms } => {
            out.push(0xCC);
            out.push(*value);
            out.extend_from_slice(rooms);
            out.push(0);
        }

        I::IsEqual { var, value, target } => push_compare(out, 0x48, *var, value, *target),
        I::IsNotEqual { var, value, target } => push_compare(out, 0x08, *var, value, *target),
        I::IsGreater { var, value, target } => push_compare(out, 0x78, *var, value, *target),
        I::IsGreaterEqual { var, value, target } => push_compare(out, 0x04, *var, value, *target),
        I::IsLess { var, value, target } => push_compare(out, 0x44, *var, value, *target),
        I::IsLessEqual { var, value, target } => push_compare(out, 0x38, *var, value, *target),
        I::EqualZero { var, target } => {
            out.push(0x28);
            push_var(out, *var);
            push_i16(out, *target);
        }
        I::NotEqualZero { var, target } => {
            out.push(0xA8);
            push_var(out, *var);
            push_i16(out, *target);
        }
        I::ClassOfIs { object, classes, target } => {
            out.push(compose_opcode(0x1D, &[object.flag(PARAM_1)]));
            push_word_param(out, object);
            push_word_list(out, classes);
            push_i16(out, *target);
        }

        I::Move { var, value } => push_assign(out, 0x1A, *var, value),
        I::Add { var, value } => push_assign(out, 0x5A, *var, value),
        I::Subtract { var, value } => push_assign(out, 0x3A, *var, value),
        I::Multiply { var, value } => push_assign(out, 0x1B, *var, value),
        I::Divide { var, value } => push_assign(out, 0x5B, *var, value),
        I::And { var, value } => push_assign(out, 0x17, *var, value),
        I::Or { var, value } => push_assign(out, 0x57, *var, value),
        I::Increment { var } => {
            out.push(0x46);
            push_var(out, *var);
        }
        I::Decrement { var } => {
            out.push(0xC6);
            push_var(out, *var);
        }
        I::SetVarRange { var, wide, values } => {
            out.push(if *wide { 0x26 | PARAM_1 } else { 0x26 });
            push_var(out, *var);
            out.push(values.len() as u8);
            for value in values {
                if *wide {
                    out.extend_from_slice(&value.to_le_bytes());
                } else {
                    out.push(*value as u8);
                }
            }
        }
        I::Expression { var, items } => {
            out.push(0xAC);
            push_var(out, *var);
            for item in items {
                match item {
                    ExprItem::Value(value) => {
                        out.push(compose_opcode(0x01, &[value.flag(PARAM_1)]));
                        push_word_param(out, value);
                    }
                    ExprItem::Add => out.push(2),
                    ExprItem::Subtract => out.push(3),
                    ExprItem::Multiply => out.push(4),
                    ExprItem::Divide => out.push(5),
                    ExprItem::Operation(nested) => {
                        out.push(6);
                        encode_into(nested, out);
                    }
                }
            }
            out.push(LIST_END);
        }

        I::Delay { ticks } => {
            out.push(0x2E);
            out.extend_from_slice(&ticks.to_le_bytes()[..3]);
        }
        I::DelayVariable { var } => {
            out.push(0x2B);
            push_var(out, *var);
        }

        I::PutActor { actor, x, y } => {
            out.push(compose_opcode(
                0x01,
                &[actor.flag(PARAM_1), x.flag(PARAM_2), y.flag(PARAM_3)],
            ));
            push_byte_param(out, actor);
            push_word_param(out, x);
            push_word_param(out, y);
        }
        I::GetActorRoom { result, actor } => push_get_actor(out, 0x03, *result, actor),
        I::GetActorElevation { result, actor } => push_get_actor(out, 0x06, *result, actor),
        I::FaceActor { actor, object } => {
            out.push(compose_opcode(0x09, &[actor.flag(PARAM_1), object.flag(PARAM_2)]));
            push_byte_param(out, actor);
            push_word_param(out, object);
        }
        I::WalkActorToActor { actor, to_actor, distance } => {
            out.push(compose_opcode(
                0x0D,
                &[actor.flag(PARAM_1), to_actor.flag(PARAM_2)],
            ));
            push_byte_param(out, actor);
            push_byte_param(out, to_actor);
            out.push(*distance);
        }
        I::PutActorAtObject { actor, object } => {
            out.push(compose_opcode(0x0E, &[actor.flag(PARAM_1), object.flag(PARAM_2)]));
            push_byte_param(out, actor);
            push_word_param(out, object);
        }
        I::AnimateActor { actor, animation } => {
            out.push(compose_opcode(
                0x11,
                &[actor.flag(PARAM_1), animation.flag(PARAM_2)],
            ));
            push_byte_param(out, actor);
            push_byte_param(out, animation);
        }
        I::ActorOps { actor, ops } => {
            out.push(compose_opcode(0x13, &[actor.flag(PARAM_1)]));
            push_byte_param(out, actor);
            for op in ops {
                push_actor_op(out, op);
            }
            out.push(LIST_END);
        }
        I::ActorFromPos { result, x, y } => {
            out.push(compose_opcode(0x15, &[x.flag(PARAM_1), y.flag(PARAM_2)]));
            push_var(out, *result);
            push_word_param(out, x);
            push_word_param(out, y);
        }
        I::WalkActorTo { actor, x, y } => {
            out.push(compose_opcode(
                0x1E,
                &[actor.flag(PARAM_1), x.flag(PARAM_2), y.flag(PARAM_3)],
            ));
            push_byte_param(out, actor);
            push_word_param(out, x);
            push_word_param(out, y);
        }
        I::IsActorInBox { actor, box_id, target } => {
            out.push(compose_opcode(
                0x1F,
                &[actor.flag(PARAM_1), box_id.flag(PARAM_2)],
            ));
            push_byte_param(out, actor);
            push_byte_param(out, box_id);
            push_i16(out, *target);
        }
        I::GetAnimCounter { result, actor } => push_get_actor(out, 0x22, *result, actor),
        I::GetActorY { result, actor } => push_get_object(out, 0x23, *result, actor),
        I::GetActorX { result, actor } => push_get_object(out, 0x43, *result, actor),
        I::PutActorInRoom { actor, room } => {
            out.push(compose_opcode(0x2D, &[actor.flag(PARAM_1), room.flag(PARAM_2)]));
            push_byte_param(out, actor);
            push_byte_param(out, room);
        }
        I::GetInventoryCount { result, owner } => push_get_actor(out, 0x31, *result, owner),
        I::GetActorScale { result, actor } => push_get_actor(out, 0x3B, *result, actor),
        I::ActorFollowCamera { actor } => {
            out.push(compose_opcode(0x52, &[actor.flag(PARAM_1)]));
            push_byte_param(out, actor);
        }
        I::GetActorMoving { result, actor } => push_get_actor(out, 0x56, *result, actor),
        I::GetActorFacing { result, actor } => push_get_actor(out, 0x63, *result, actor),
        I::GetActorWidth { result, actor } => push_get_actor(out, 0x6C, *result, actor),
        I::GetActorCostume { result, actor } => push_get_actor(out, 0x71, *result, actor),
        I::GetActorWalkBox { result, actor } => push_get_actor(out, 0x7B, *result, actor),

        I::DrawObject { object, op } => {
            out.push(compose_opcode(0x05, &[object.flag(PARAM_1)]));
            push_word_param(out, object);
            match op {
                DrawObjectOp::At { x, y } => {
                    out.push(compose_opcode(1, &[x.flag(PARAM_1), y.flag(PARAM_2)]));
                    push_word_param(out, x);
                    push_word_param(out, y);
                }
                DrawObjectOp::Image { image } => {
                    out.push(compose_opcode(2, &[image.flag(PARAM_1)]));
                    push_word_param(out, image);
                }
                DrawObjectOp::Draw => out.push(0x1F),
            }
        }
        I::SetState { object, state } => {
            out.push(compose_opcode(0x07, &[object.flag(PARAM_1), state.flag(PARAM_2)]));
            push_word_param(out, object);
            push_byte_param(out, state);
        }
        I::GetObjectState { result, object } => push_get_object(out, 0x0F, *result, object),
        I::GetObjectOwner { result, object } => push_get_object(out, 0x10, *result, object),
        I::PickupObject { object, room } => {
            out.push(compose_opcode(0x25, &[object.flag(PARAM_1), room.flag(PARAM_2)]));
            push_word_param(out, object);
            push_byte_param(out, room);
        }
        I::PickupObjectOld { object } => {
            out.push(compose_opcode(0x50, &[object.flag(PARAM_1)]));
            push_word_param(out, object);
        }
        I::SetOwnerOf { object, owner } => {
            out.push(compose_opcode(0x29, &[object.flag(PARAM_1), owner.flag(PARAM_2)]));
            push_word_param(out, object);
            push_byte_param(out, owner);
        }
        I::GetDist { result, object1, object2 } => {
            out.push(compose_opcode(
                0x34,
                &[object1.flag(PARAM_1), object2.flag(PARAM_2)],
            ));
            push_var(out, *result);
            push_word_param(out, object1);
            push_word_param(out, object2);
        }
        I::FindObject { result, x, y } => {
            out.push(compose_opcode(0x35, &[x.flag(PARAM_1), y.flag(PARAM_2)]));
            push_var(out, *result);
            push_byte_param(out, x);
            push_byte_param(out, y);
        }
        I::WalkActorToObject { actor, object } => {
            out.push(compose_opcode(0x36, &[actor.flag(PARAM_1), object.flag(PARAM_2)]));
            push_byte_param(out, actor);
            push_word_param(out, object);
        }
        I::FindInventory { result, owner, index } => {
            out.push(compose_opcode(0x3D, &[owner.flag(PARAM_1), index.flag(PARAM_2)]));
            push_var(out, *result);
            push_byte_param(out, owner);
            push_byte_param(out, index);
        }
        I::SetObjectName { object, name } => {
            out.push(compose_opcode(0x54, &[object.flag(PARAM_1)]));
            push_word_param(out, object);
            name.encode_into(out);
        }
        I::SetClass { object, classes } => {
            out.push(compose_opcode(0x5D, &[object.flag(PARAM_1)]));
            push_word_param(out, object);
            push_word_list(out, classes);
        }
        I::GetClosestObjActor { result, object } => push_get_object(out, 0x66, *result, object),
        I::GetStringWidth { result, string } => push_get_actor(out, 0x67, *result, string),
        I::StopObjectScript { script } => {
            out.push(compose_opcode(0x6E, &[script.flag(PARAM_1)]));
            push_byte_param(out, script);
        }

        I::PanCameraTo { x } => {
            out.push(compose_opcode(0x12, &[x.flag(PARAM_1)]));
            push_word_param(out, x);
        }
        I::SetCameraAt { x } => {
            out.push(compose_opcode(0x32, &[x.flag(PARAM_1)]));
            push_word_param(out, x);
        }
        I::LoadRoomWithEgo { object, room, x, y } => {
            out.push(compose_opcode(0x24, &[object.flag(PARAM_1), room.flag(PARAM_2)]));
            push_word_param(out, object);
            push_byte_param(out, room);
            push_i16(out, *x);
            push_i16(out, *y);
        }
        I::MatrixOps { op } => {
            out.push(0x30);
            push_matrix_op(out, op);
        }
        I::RoomOps { op } => {
            out.push(0x33);
            push_room_op(out, op);
        }
        I::DrawBox { x, y, x2, y2, color } => {
            out.push(compose_opcode(0x3F, &[x.flag(PARAM_1), y.flag(PARAM_2)]));
            push_word_param(out, x);
            push_word_param(out, y);
            out.push(compose_opcode(
                0,
                &[x2.flag(PARAM_1), y2.flag(PARAM_2), color.flag(PARAM_3)],
            ));
            push_word_param(out, x2);
            push_word_param(out, y2);
            push_byte_param(out, color);
        }
        I::OldRoomEffect { effect } => {
            out.push(0x5C);
            out.push(compose_opcode(3, &[effect.flag(PARAM_1)]));
            push_word_param(out, effect);
        }
        I::LoadRoom { room } => {
            out.push(compose_opcode(0x72, &[room.flag(PARAM_1)]));
            push_byte_param(out, room);
        }

        I::StartScript { script, args, recursive, freeze_resistant } => {
            let mut op = compose_opcode(0x0A, &[script.flag(PARAM_1)]);
            if *recursive {
                op |= 0x20;
            }
            if *freeze_resistant {
                op |= 0x40;
            }
            out.push(op);
            push_byte_param(out, script);
            push_word_list(out, args);
        }
        I::StartObject { object, script, args } => {
            out.push(compose_opcode(0x37, &[object.flag(PARAM_1), script.flag(PARAM_2)]));
            push_word_param(out, object);
            push_byte_param(out, script);
            push_word_list(out, args);
        }
        I::ChainScript { script, args } => {
            out.push(compose_opcode(0x42, &[script.flag(PARAM_1)]));
            push_byte_param(out, script);
            push_word_list(out, args);
        }
        I::StopScript { script } => {
            out.push(compose_opcode(0x62, &[script.flag(PARAM_1)]));
            push_byte_param(out, script);
        }
        I::IsScriptRunning { result, script } => push_get_actor(out, 0x68, *result, script),

        I::StartMusic { sound } => {
            out.push(compose_opcode(0x02, &[sound.flag(PARAM_1)]));
            push_byte_param(out, sound);
        }
        I::StartSound { sound } => {
            out.push(compose_opcode(0x1C, &[sound.flag(PARAM_1)]));
            push_byte_param(out, sound);
        }
        I::StopMusic => out.push(0x20),
        I::StopSound { sound } => {
            out.push(compose_opcode(0x3C, &[sound.flag(PARAM_1)]));
            push_byte_param(out, sound);
        }
        I::SoundKludge { args } => {
            out.push(0x4C);
            push_word_list(out, args);
        }
        I::IsSoundRunning { result, sound } => push_get_actor(out, 0x7C, *result, sound),
        I::GetRandomNr { result, max } => push_get_actor(out, 0x16, *result, max),

        I::GetVerbEntrypoint { result, verb, entrypoint } => {
            out.push(compose_opcode(
                0x0B,
                &[verb.flag(PARAM_1), entrypoint.flag(PARAM_2)],
            ));
            push_var(out, *result);
            push_word_param(out, verb);
            push_word_param(out, entrypoint);
        }
        I::DoSentence { verb, objects } => match objects {
            Some((object1, object2)) => {
                out.push(compose_opcode(
                    0x19,
                    &[verb.flag(PARAM_1), object1.flag(PARAM_2), object2.flag(PARAM_3)],
                ));
                push_byte_param(out, verb);
                push_word_param(out, object1);
                push_word_param(out, object2);
            }
            None => {
                out.push(compose_opcode(0x19, &[verb.flag(PARAM_1)]));
                push_byte_param(out, verb);
            }
        },
        I::VerbOps { verb, ops } => {
            out.push(compose_opcode(0x7A, &[verb.flag(PARAM_1)]));
            push_byte_param(out, verb);
            for op in ops {
                push_verb_op(out, op);
            }
            out.push(LIST_END);
        }
        I::SaveRestoreVerbs { op } => {
            out.push(0xAB);
            let (code, start, end, mode) = match op {
                SaveRestoreVerbsOp::Save { start, end, mode } => (1, start, end, mode),
                SaveRestoreVerbsOp::Restore { start, end, mode } => (2, start, end, mode),
                SaveRestoreVerbsOp::Delete { start, end, mode } => (3, start, end, mode),
            };
            out.push(compose_opcode(
                code,
                &[start.flag(PARAM_1), end.flag(PARAM_2), mode.flag(PARAM_3)],
            ));
            push_byte_param(out, start);
            push_byte_param(out, end);
            push_byte_param(out, mode);
        }
        I::CursorCommand { op } => {
            out.push(0x2C);
            push_cursor_op(out, op);
        }
        I::SystemOps { op } => {
            out.push(0x98);
            out.push(match op {
                SystemOp::Restart => 1,
                SystemOp::Pause => 2,
                SystemOp::Quit => 3,
            });
        }
        I::Wait { op } => {
            out.push(0xAE);
            match op {
                WaitOp::ForActor(actor) => {
                    out.push(compose_opcode(1, &[actor.flag(PARAM_1)]));
                    push_byte_param(out, actor);
                }
                WaitOp::ForMessage => out.push(2),
                WaitOp::ForCamera => out.push(3),
                WaitOp::ForSentence => out.push(4),
            }
        }
        I::StringOps { op } => {
            out.push(0x27);
            push_string_op(out, op);
        }
        I::ResourceRoutines { op } => {
            out.push(0x0C);
            push_resource_op(out, op);
        }
        I::Print { actor, ops } => {
            out.push(compose_opcode(0x14, &[actor.flag(PARAM_1)]));
            push_byte_param(out, actor);
            push_print_ops(out, ops);
        }
        I::PrintEgo { ops } => {
            out.push(0xD8);
            push_print_ops(out, ops);
        }
        I::Debug { value } => {
            out.push(compose_opcode(0x6B, &[value.flag(PARAM_1)]));
            push_word_param(out, value);
        }

        I::Invalid(raw) => out.extend_from_slice(raw),
    }
}
