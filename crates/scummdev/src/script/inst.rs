use super::{
    encode,
    text::Text,
    var::{ByteParam, VarSpec, WordParam},
};

/// The drawObject sub-operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawObjectOp {
    At { x: WordParam, y: WordParam },
    Image { image: WordParam },
    Draw,
}

/// One actorOps list entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActorOp {
    Dummy(ByteParam),
    Costume(ByteParam),
    StepDist(ByteParam, ByteParam),
    Sound(ByteParam),
    WalkAnim(ByteParam),
    TalkAnim(ByteParam, ByteParam),
    StandAnim(ByteParam),
    Animations(ByteParam, ByteParam, ByteParam),
    Init,
    Elevation(WordParam),
    AnimDefault,
    Palette(ByteParam, ByteParam),
    TalkColor(ByteParam),
    Name(Text),
    InitAnim(ByteParam),
    Width(ByteParam),
    Scale(ByteParam, ByteParam),
    NeverZClip,
    SetZClip(ByteParam),
    IgnoreBoxes,
    AnimSpeed(ByteParam),
    ShadowMode(ByteParam),
}

/// One verbOps list entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerbOp {
    Image(WordParam),
    Text(Text),
    Color(ByteParam),
    HiColor(ByteParam),
    At { x: WordParam, y: WordParam },
    On,
    Off,
    Delete,
    New,
    DimColor(ByteParam),
    Dim,
    Key(ByteParam),
    Center,
    SetToString(WordParam),
    SetToObject { object: WordParam, room: ByteParam },
    BackColor(ByteParam),
}

/// One print/printEgo layout entry. `Message` carries the line itself and
/// always ends the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrintOp {
    At { x: WordParam, y: WordParam },
    Color(ByteParam),
    Clipped(WordParam),
    RestoreBackground { x: WordParam, y: WordParam },
    Center,
    Left,
    Overhead,
    PlayCdTrack { a: WordParam, b: WordParam },
    Message(Text),
}

/// The cursorCommand sub-operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CursorOp {
    CursorShow,
    CursorHide,
    UserputOn,
    UserputOff,
    CursorSoftOn,
    CursorSoftOff,
    UserputSoftOn,
    UserputSoftOff,
    SetCursorImg { cursor: ByteParam, image: ByteParam },
    SetCursorHotspot { cursor: ByteParam, x: ByteParam, y: ByteParam },
    InitCursor(ByteParam),
    InitCharset(ByteParam),
    LoadCharset { args: Vec<WordParam> },
}

/// The stringOps sub-operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StringOp {
    PutCode { string: ByteParam, text: Text },
    Copy { dest: ByteParam, source: ByteParam },
    SetChar { string: ByteParam, index: ByteParam, ch: ByteParam },
    GetChar { result: VarSpec, string: ByteParam, index: ByteParam },
    Create { string: ByteParam, size: ByteParam },
}

/// The resourceRoutines sub-operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceOp {
    LoadScript(ByteParam),
    LoadSound(ByteParam),
    LoadCostume(ByteParam),
    LoadRoom(ByteParam),
    NukeScript(ByteParam),
    NukeSound(ByteParam),
    NukeCostume(ByteParam),
    NukeRoom(ByteParam),
    LockScript(ByteParam),
    LockSound(ByteParam),
    LockCostume(ByteParam),
    LockRoom(ByteParam),
    UnlockScript(ByteParam),
    UnlockSound(ByteParam),
    UnlockCostume(ByteParam),
    UnlockRoom(ByteParam),
    ClearHeap,
    LoadCharset(ByteParam),
    NukeCharset(ByteParam),
    LoadFlObject { object: WordParam, room: ByteParam },
}

/// The roomOps sub-operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomOp {
    Scroll { min: WordParam, max: WordParam },
    Color { color: WordParam, index: WordParam },
    SetScreen { a: WordParam, b: WordParam },
    SetPalColor { red: WordParam, green: WordParam, blue: WordParam, index: ByteParam },
    ShakeOn,
    ShakeOff,
    Intensity { scale: ByteParam, start: ByteParam, end: ByteParam },
    ScreenEffect { effect: WordParam },
    SaveString { slot: ByteParam, name: Text },
    LoadString { slot: ByteParam, name: Text },
    CycleDelay { index: ByteParam, delay: ByteParam },
}

/// The matrixOps sub-operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatrixOp {
    SetBoxFlags { box_id: ByteParam, flags: ByteParam },
    SetBoxScale { box_id: ByteParam, scale: ByteParam },
    SetBoxSlot { box_id: ByteParam, slot: ByteParam },
    CreateBoxMatrix,
}

/// The wait sub-operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WaitOp {
    ForActor(ByteParam),
    ForMessage,
    ForCamera,
    ForSentence,
}

/// The systemOps sub-operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemOp {
    Restart,
    Pause,
    Quit,
}

/// The saveRestoreVerbs sub-operation; all three carry the same range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveRestoreVerbsOp {
    Save { start: ByteParam, end: ByteParam, mode: ByteParam },
    Restore { start: ByteParam, end: ByteParam, mode: ByteParam },
    Delete { start: ByteParam, end: ByteParam, mode: ByteParam },
}

/// One element of an expression's postfix program. Sub-operation 6 embeds a
/// complete nested instruction whose result lands on the stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExprItem {
    Value(WordParam),
    Add,
    Subtract,
    Multiply,
    Divide,
    Operation(Box<Instruction>),
}

/// A decoded bytecode instruction.
///
/// This is a closed set: opcodes outside it decode to [`Instruction::Invalid`]
/// carrying the exact bytes consumed, so a disassembly-style consumer never
/// loses information and never aborts on unknown code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    // Control flow.
    StopObjectCode,
    BreakHere,
    Jump { target: i16 },
    Cutscene { args: Vec<WordParam> },
    EndCutscene,
    Override { arg: u8 },
    FreezeScripts { flag: ByteParam },
    PseudoRoom { value: u8, rooms: Vec<u8> },

    // Comparisons; `target` is the relative jump taken when the test fails.
    IsEqual { var: VarSpec, value: WordParam, target: i16 },
    IsNotEqual { var: VarSpec, value: WordParam, target: i16 },
    IsGreater { var: VarSpec, value: WordParam, target: i16 },
    IsGreaterEqual { var: VarSpec, value: WordParam, target: i16 },
    IsLess { var: VarSpec, value: WordParam, target: i16 },
    IsLessEqual { var: VarSpec, value: WordParam, target: i16 },
    EqualZero { var: VarSpec, target: i16 },
    NotEqualZero { var: VarSpec, target: i16 },
    ClassOfIs { object: WordParam, classes: Vec<WordParam>, target: i16 },

    // Assignment and arithmetic.
    Move { var: VarSpec, value: WordParam },
    Add { var: VarSpec, value: WordParam },
    Subtract { var: VarSpec, value: WordParam },
    Multiply { var: VarSpec, value: WordParam },
    Divide { var: VarSpec, value: WordParam },
    And { var: VarSpec, value: WordParam },
    Or { var: VarSpec, value: WordParam },
    Increment { var: VarSpec },
    Decrement { var: VarSpec },
    SetVarRange { var: VarSpec, wide: bool, values: Vec<u16> },
    Expression { var: VarSpec, items: Vec<ExprItem> },

    // Timing.
    Delay { ticks: u32 },
    DelayVariable { var: VarSpec },

    // Actors.
    PutActor { actor: ByteParam, x: WordParam, y: WordParam },
    GetActorRoom { result: VarSpec, actor: ByteParam },
    GetActorElevation { result: VarSpec, actor: ByteParam },
    FaceActor { actor: ByteParam, object: WordParam },
    WalkActorToActor { actor: ByteParam, to_actor: ByteParam, distance: u8 },
    PutActorAtObject { actor: ByteParam, object: WordParam },
    AnimateActor { actor: ByteParam, animation: ByteParam },
    ActorOps { actor: ByteParam, ops: Vec<ActorOp> },
    ActorFromPos { result: VarSpec, x: WordParam, y: WordParam },
    WalkActorTo { actor: ByteParam, x: WordParam, y: WordParam },
    IsActorInBox { actor: ByteParam, box_id: ByteParam, target: i16 },
    GetAnimCounter { result: VarSpec, actor: ByteParam },
    GetActorY { result: VarSpec, actor: WordParam },
    GetActorX { result: VarSpec, actor: WordParam },
    PutActorInRoom { actor: ByteParam, room: ByteParam },
    GetInventoryCount { result: VarSpec, owner: ByteParam },
    GetActorScale { result: VarSpec, actor: ByteParam },
    ActorFollowCamera { actor: ByteParam },
    GetActorMoving { result: VarSpec, actor: ByteParam },
    GetActorFacing { result: VarSpec, actor: ByteParam },
    GetActorWidth { result: VarSpec, actor: ByteParam },
    GetActorCostume { result: VarSpec, actor: ByteParam },
    GetActorWalkBox { result: VarSpec, actor: ByteParam },

    // Objects.
    DrawObject { object: WordParam, op: DrawObjectOp },
    SetState { object: WordParam, state: ByteParam },
    GetObjectState { result: VarSpec, object: WordParam },
    GetObjectOwner { result: VarSpec, object: WordParam },
    PickupObject { object: WordParam, room: ByteParam },
    PickupObjectOld { object: WordParam },
    SetOwnerOf { object: WordParam, owner: ByteParam },
    GetDist { result: VarSpec, object1: WordParam, object2: WordParam },
    FindObject { result: VarSpec, x: ByteParam, y: ByteParam },
    WalkActorToObject { actor: ByteParam, object: WordParam },
    FindInventory { result: VarSpec, owner: ByteParam, index: ByteParam },
    SetObjectName { object: WordParam, name: Text },
    SetClass { object: WordParam, classes: Vec<WordParam> },
    GetClosestObjActor { result: VarSpec, object: WordParam },
    GetStringWidth { result: VarSpec, string: ByteParam },
    StopObjectScript { script: ByteParam },

    // Rooms and camera.
    PanCameraTo { x: WordParam },
    SetCameraAt { x: WordParam },
    LoadRoomWithEgo { object: WordParam, room: ByteParam, x: i16, y: i16 },
    MatrixOps { op: MatrixOp },
    RoomOps { op: RoomOp },
    DrawBox { x: WordParam, y: WordParam, x2: WordParam, y2: WordParam, color: ByteParam },
    OldRoomEffect { effect: WordParam },
    LoadRoom { room: ByteParam },

    // Scripts.
    StartScript { script: ByteParam, args: Vec<WordParam>, recursive: bool, freeze_resistant: bool },
    StartObject { object: WordParam, script: ByteParam, args: Vec<WordParam> },
    ChainScript { script: ByteParam, args: Vec<WordParam> },
    StopScript { script: ByteParam },
    IsScriptRunning { result: VarSpec, script: ByteParam },

    // Sound.
    StartMusic { sound: ByteParam },
    StartSound { sound: ByteParam },
    StopMusic,
    StopSound { sound: ByteParam },
    SoundKludge { args: Vec<WordParam> },
    IsSoundRunning { result: VarSpec, sound: ByteParam },
    GetRandomNr { result: VarSpec, max: ByteParam },

    // Verbs and interface.
    GetVerbEntrypoint { result: VarSpec, verb: WordParam, entrypoint: WordParam },
    DoSentence { verb: ByteParam, objects: Option<(WordParam, WordParam)> },
    VerbOps { verb: ByteParam, ops: Vec<VerbOp> },
    SaveRestoreVerbs { op: SaveRestoreVerbsOp },
    CursorCommand { op: CursorOp },
    SystemOps { op: SystemOp },
    Wait { op: WaitOp },
    StringOps { op: StringOp },
    ResourceRoutines { op: ResourceOp },
    Print { actor: ByteParam, ops: Vec<PrintOp> },
    PrintEgo { ops: Vec<PrintOp> },
    Debug { value: WordParam },

    /// An opcode (or compound-family sub-opcode) outside the recognized
    /// table, carrying the raw bytes that were consumed for it.
    Invalid(Vec<u8>),
}

impl Instruction {
    /// The exact number of bytes this instruction occupies on disk,
    /// including every variable-length tail.
    #[must_use]
    pub fn byte_length(&self) -> usize {
        encode::encode(self).len()
    }
}

fn fmt_args(f: &mut std::fmt::Formatter<'_>, args: &[WordParam]) -> std::fmt::Result {
    write!(f, "[")?;
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            write!(f, ",")?;
        }
        write!(f, "{arg}")?;
    }
    write!(f, "]")
}

fn fmt_compare(
    f: &mut std::fmt::Formatter<'_>,
    var: &VarSpec,
    op: &str,
    value: &WordParam,
    target: i16,
) -> std::fmt::Result {
    write!(f, "unless ({var} {op} {value}) goto {target:+}")
}

impl std::fmt::Display for ActorOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActorOp::Dummy(a) => write!(f, "Dummy({a})"),
            ActorOp::Costume(a) => write!(f, "Costume({a})"),
            ActorOp::StepDist(x, y) => write!(f, "StepDist({x},{y})"),
            ActorOp::Sound(a) => write!(f, "Sound({a})"),
            ActorOp::WalkAnim(a) => write!(f, "WalkAnim({a})"),
            ActorOp::TalkAnim(a, b) => write!(f, "TalkAnim({a},{b})"),
            ActorOp::StandAnim(a) => write!(f, "StandAnim({a})"),
            ActorOp::Animations(a, b, c) => write!(f, "Animations({a},{b},{c})"),
            ActorOp::Init => write!(f, "Init"),
            ActorOp::Elevation(a) => write!(f, "Elevation({a})"),
            ActorOp::AnimDefault => write!(f, "AnimDefault"),
            ActorOp::Palette(a, b) => write!(f, "Palette({a},{b})"),
            ActorOp::TalkColor(a) => write!(f, "TalkColor({a})"),
            ActorOp::Name(text) => write!(f, "Name({text})"),
            ActorOp::InitAnim(a) => write!(f, "InitAnim({a})"),
            ActorOp::Width(a) => write!(f, "Width({a})"),
            ActorOp::Scale(a, b) => write!(f, "Scale({a},{b})"),
            ActorOp::NeverZClip => write!(f, "NeverZClip"),
            ActorOp::SetZClip(a) => write!(f, "SetZClip({a})"),
            ActorOp::IgnoreBoxes => write!(f, "IgnoreBoxes"),
            ActorOp::AnimSpeed(a) => write!(f, "AnimSpeed({a})"),
            ActorOp::ShadowMode(a) => write!(f, "ShadowMode({a})"),
        }
    }
}

impl std::fmt::Display for PrintOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PrintOp::At { x, y } => write!(f, "At({x},{y})"),
            PrintOp::Color(a) => write!(f, "Color({a})"),
            PrintOp::Clipped(a) => write!(f, "Clipped({a})"),
            PrintOp::RestoreBackground { x, y } => write!(f, "RestoreBG({x},{y})"),
            PrintOp::Center => write!(f, "Center"),
            PrintOp::Left => write!(f, "Left"),
            PrintOp::Overhead => write!(f, "Overhead"),
            PrintOp::PlayCdTrack { a, b } => write!(f, "PlayCDTrack({a},{b})"),
            PrintOp::Message(text) => write!(f, "Text({text})"),
        }
    }
}

fn fmt_ops<T: std::fmt::Display>(f: &mut std::fmt::Formatter<'_>, ops: &[T]) -> std::fmt::Result {
    for (i, op) in ops.iter().enumerate() {
        if i > 0 {
            write!(f, ",")?;
        }
        write!(f, "{op}")?;
    }
    Ok(())
}

impl std::fmt::Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use Instruction as I;
        match self {
            I::StopObjectCode => write!(f, "stopObjectCode()"),
            I::BreakHere => write!(f, "breakHere()"),
            I::Jump { target } => write!(f, "goto {target:+}"),
            I::Cutscene { args } => {
                write!(f, "cutscene(")?;
                fmt_args(f, args)?;
                write!(f, ")")
            }
            I::EndCutscene => write!(f, "endCutscene()"),
            I::Override { arg } => {
                if *arg == 0 {
                    write!(f, "endOverride()")
                } else {
                    write!(f, "beginOverride()")
                }
            }
            I::FreezeScripts { flag } => write!(f, "freezeScripts({flag})"),
            I::PseudoRoom { value, rooms } => {
                write!(f, "pseudoRoom({value}")?;
                for room in rooms {
                    write!(f, ",{room}")?;
                }
                write!(f, ")")
            }
            I::IsEqual { var, value, target } => fmt_compare(f, var, "==", value, *target),
            I::IsNotEqual { var, value, target } => fmt_compare(f, var, "!=", value, *target),
            I::IsGreater { var, value, target } => fmt_compare(f, var, ">", value, *target),
            I::IsGreaterEqual { var, value, target } => fmt_compare(f, var, ">=", value, *target),
            I::IsLess { var, value, target } => fmt_compare(f, var, "<", value, *target),
            I::IsLessEqual { var, value, target } => fmt_compare(f, var, "<=", value, *target),
            I::EqualZero { var, target } => write!(f, "unless (!{var}) goto {target:+}"),
            I::NotEqualZero { var, target } => write!(f, "unless ({var}) goto {target:+}"),
            I::ClassOfIs { object, classes, target } => {
                write!(f, "unless (classOfIs({object},")?;
                fmt_args(f, classes)?;
                write!(f, ")) goto {target:+}")
            }
            I::Move { var, value } => write!(f, "{var} = {value}"),
            I::Add { var, value } => write!(f, "{var} += {value}"),
            I::Subtract { var, value } => write!(f, "{var} -= {value}"),
            I::Multiply { var, value } => write!(f, "{var} *= {value}"),
            I::Divide { var, value } => write!(f, "{var} /= {value}"),
            I::And { var, value } => write!(f, "{var} &= {value}"),
            I::Or { var, value } => write!(f, "{var} |= {value}"),
            I::Increment { var } => write!(f, "{var}++"),
            I::Decrement { var } => write!(f, "{var}--"),
            I::SetVarRange { var, values, .. } => {
                write!(f, "setVarRange({var},{},[", values.len())?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{value}")?;
                }
                write!(f, "])")
            }
            I::Expression { var, items } => {
                write!(f, "{var} = expression(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    match item {
                        ExprItem::Value(value) => write!(f, "{value}")?,
                        ExprItem::Add => write!(f, "+")?,
                        ExprItem::Subtract => write!(f, "-")?,
                        ExprItem::Multiply => write!(f, "*")?,
                        ExprItem::Divide => write!(f, "/")?,
                        ExprItem::Operation(inst) => write!(f, "<{inst}>")?,
                    }
                }
                write!(f, ")")
            }
            I::Delay { ticks } => write!(f, "delay({ticks})"),
            I::DelayVariable { var } => write!(f, "delayVariable({var})"),
            I::PutActor { actor, x, y } => write!(f, "putActor({actor},{x},{y})"),
            I::GetActorRoom { result, actor } => write!(f, "{result} = getActorRoom({actor})"),
            I::GetActorElevation { result, actor } => {
                write!(f, "{result} = getActorElevation({actor})")
            }
            I::FaceActor { actor, object } => write!(f, "faceActor({actor},{object})"),
            I::WalkActorToActor { actor, to_actor, distance } => {
                write!(f, "walkActorToActor({actor},{to_actor},{distance})")
            }
            I::PutActorAtObject { actor, object } => {
                write!(f, "putActorAtObject({actor},{object})")
            }
            I::AnimateActor { actor, animation } => {
                write!(f, "animateActor({actor},{animation})")
            }
            I::ActorOps { actor, ops } => {
                write!(f, "actorOps({actor},[")?;
                fmt_ops(f, ops)?;
                write!(f, "])")
            }
            I::ActorFromPos { result, x, y } => write!(f, "{result} = actorFromPos({x},{y})"),
            I::WalkActorTo { actor, x, y } => write!(f, "walkActorTo({actor},{x},{y})"),
            I::IsActorInBox { actor, box_id, target } => {
                write!(f, "unless (isActorInBox({actor},{box_id})) goto {target:+}")
            }
            I::GetAnimCounter { result, actor } => {
                write!(f, "{result} = getAnimCounter({actor})")
            }
            I::GetActorY { result, actor } => write!(f, "{result} = getActorY({actor})"),
            I::GetActorX { result, actor } => write!(f, "{result} = getActorX({actor})"),
            I::PutActorInRoom { actor, room } => write!(f, "putActorInRoom({actor},{room})"),
            I::GetInventoryCount { result, owner } => {
                write!(f, "{result} = getInventoryCount({owner})")
            }
            I::GetActorScale { result, actor } => write!(f, "{result} = getActorScale({actor})"),
            I::ActorFollowCamera { actor } => write!(f, "actorFollowCamera({actor})"),
            I::GetActorMoving { result, actor } => write!(f, "{result} = getActorMoving({actor})"),
            I::GetActorFacing { result, actor } => write!(f, "{result} = getActorFacing({actor})"),
            I::GetActorWidth { result, actor } => write!(f, "{result} = getActorWidth({actor})"),
            I::GetActorCostume { result, actor } => {
                write!(f, "{result} = getActorCostume({actor})")
            }
            I::GetActorWalkBox { result, actor } => {
                write!(f, "{result} = getActorWalkBox({actor})")
            }
            I::DrawObject { object, op } => {
                write!(f, "drawObject({object},")?;
                match op {
                    DrawObjectOp::At { x, y } => write!(f, "setXY({x},{y})")?,
                    DrawObjectOp::Image { image } => write!(f, "setImage({image})")?,
                    DrawObjectOp::Draw => write!(f, "draw()")?,
                }
                write!(f, ")")
            }
            I::SetState { object, state } => write!(f, "setState({object},{state})"),
            I::GetObjectState { result, object } => {
                write!(f, "{result} = getObjectState({object})")
            }
            I::GetObjectOwner { result, object } => {
                write!(f, "{result} = getObjectOwner({object})")
            }
            I::PickupObject { object, room } => write!(f, "pickupObject({object},{room})"),
            I::PickupObjectOld { object } => write!(f, "pickupObject({object})"),
            I::SetOwnerOf { object, owner } => write!(f, "setOwnerOf({object},{owner})"),
            I::GetDist { result, object1, object2 } => {
                write!(f, "{result} = getDist({object1},{object2})")
            }
            I::FindObject { result, x, y } => write!(f, "{result} = findObject({x},{y})"),
            I::WalkActorToObject { actor, object } => {
                write!(f, "walkActorToObject({actor},{object})")
            }
            I::FindInventory { result, owner, index } => {
                write!(f, "{result} = findInventory({owner},{index})")
            }
            I::SetObjectName { object, name } => write!(f, "setObjectName({object},{name})"),
            I::SetClass { object, classes } => {
                write!(f, "setClass({object},")?;
                fmt_args(f, classes)?;
                write!(f, ")")
            }
            I::GetClosestObjActor { result, object } => {
                write!(f, "{result} = getClosestObjActor({object})")
            }
            I::GetStringWidth { result, string } => {
                write!(f, "{result} = getStringWidth({string})")
            }
            I::StopObjectScript { script } => write!(f, "stopObjectScript({script})"),
            I::PanCameraTo { x } => write!(f, "panCameraTo({x})"),
            I::SetCameraAt { x } => write!(f, "setCameraAt({x})"),
            I::LoadRoomWithEgo { object, room, x, y } => {
                write!(f, "loadRoomWithEgo({object},{room},{x},{y})")
            }
            I::MatrixOps { op } => {
                write!(f, "matrixOps(")?;
                match op {
                    MatrixOp::SetBoxFlags { box_id, flags } => {
                        write!(f, "setBoxFlags({box_id},{flags})")?;
                    }
                    MatrixOp::SetBoxScale { box_id, scale } => {
                        write!(f, "setBoxScale({box_id},{scale})")?;
                    }
                    MatrixOp::SetBoxSlot { box_id, slot } => {
                        write!(f, "setBoxSlot({box_id},{slot})")?;
                    }
                    MatrixOp::CreateBoxMatrix => write!(f, "createBoxMatrix()")?,
                }
                write!(f, ")")
            }
            I::RoomOps { op } => {
                write!(f, "roomOps(")?;
                match op {
                    RoomOp::Scroll { min, max } => write!(f, "scroll({min},{max})")?,
                    RoomOp::Color { color, index } => write!(f, "color({color},{index})")?,
                    RoomOp::SetScreen { a, b } => write!(f, "setScreen({a},{b})")?,
                    RoomOp::SetPalColor { red, green, blue, index } => {
                        write!(f, "setPalColor({red},{green},{blue},{index})")?;
                    }
                    RoomOp::ShakeOn => write!(f, "shakeOn()")?,
                    RoomOp::ShakeOff => write!(f, "shakeOff()")?,
                    RoomOp::Intensity { scale, start, end } => {
                        write!(f, "intensity({scale},{start},{end})")?;
                    }
                    RoomOp::ScreenEffect { effect } => write!(f, "screenEffect({effect})")?,
                    RoomOp::SaveString { slot, name } => {
                        write!(f, "saveString({slot},{name})")?;
                    }
                    RoomOp::LoadString { slot, name } => {
                        write!(f, "loadString({slot},{name})")?;
                    }
                    RoomOp::CycleDelay { index, delay } => {
                        write!(f, "cycleDelay({index},{delay})")?;
                    }
                }
                write!(f, ")")
            }
            I::DrawBox { x, y, x2, y2, color } => {
                write!(f, "drawBox({x},{y},{x2},{y2},{color})")
            }
            I::OldRoomEffect { effect } => write!(f, "oldRoomEffect({effect})"),
            I::LoadRoom { room } => write!(f, "loadRoom({room})"),
            I::StartScript { script, args, recursive, freeze_resistant } => {
                write!(f, "startScript({script},")?;
                fmt_args(f, args)?;
                if *recursive {
                    write!(f, ",R")?;
                }
                if *freeze_resistant {
                    write!(f, ",F")?;
                }
                write!(f, ")")
            }
            I::StartObject { object, script, args } => {
                write!(f, "startObject({object},{script},")?;
                fmt_args(f, args)?;
                write!(f, ")")
            }
            I::ChainScript { script, args } => {
                write!(f, "chainScript({script},")?;
                fmt_args(f, args)?;
                write!(f, ")")
            }
            I::StopScript { script } => write!(f, "stopScript({script})"),
            I::IsScriptRunning { result, script } => {
                write!(f, "{result} = isScriptRunning({script})")
            }
            I::StartMusic { sound } => write!(f, "startMusic({sound})"),
            I::StartSound { sound } => write!(f, "startSound({sound})"),
            I::StopMusic => write!(f, "stopMusic()"),
            I::StopSound { sound } => write!(f, "stopSound({sound})"),
            I::SoundKludge { args } => {
                write!(f, "soundKludge(")?;
                fmt_args(f, args)?;
                write!(f, ")")
            }
            I::IsSoundRunning { result, sound } => {
                write!(f, "{result} = isSoundRunning({sound})")
            }
            I::GetRandomNr { result, max } => write!(f, "{result} = getRandomNr({max})"),
            I::GetVerbEntrypoint { result, verb, entrypoint } => {
                write!(f, "{result} = getVerbEntrypoint({verb},{entrypoint})")
            }
            I::DoSentence { verb, objects } => match objects {
                Some((object1, object2)) => {
                    write!(f, "doSentence({verb},{object1},{object2})")
                }
                None => write!(f, "doSentence(STOP)"),
            },
            I::VerbOps { verb, ops } => {
                write!(f, "verbOps({verb},[")?;
                for (i, op) in ops.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    match op {
                        VerbOp::Image(a) => write!(f, "Image({a})")?,
                        VerbOp::Text(text) => write!(f, "Text({text})")?,
                        VerbOp::Color(a) => write!(f, "Color({a})")?,
                        VerbOp::HiColor(a) => write!(f, "HiColor({a})")?,
                        VerbOp::At { x, y } => write!(f, "At({x},{y})")?,
                        VerbOp::On => write!(f, "On")?,
                        VerbOp::Off => write!(f, "Off")?,
                        VerbOp::Delete => write!(f, "Delete")?,
                        VerbOp::New => write!(f, "New")?,
                        VerbOp::DimColor(a) => write!(f, "DimColor({a})")?,
                        VerbOp::Dim => write!(f, "Dim")?,
                        VerbOp::Key(a) => write!(f, "Key({a})")?,
                        VerbOp::Center => write!(f, "Center")?,
                        VerbOp::SetToString(a) => write!(f, "SetToString({a})")?,
                        VerbOp::SetToObject { object, room } => {
                            write!(f, "SetToObject({object},{room})")?;
                        }
                        VerbOp::BackColor(a) => write!(f, "BackColor({a})")?,
                    }
                }
                write!(f, "])")
            }
            I::SaveRestoreVerbs { op } => {
                let (name, start, end, mode) = match op {
                    SaveRestoreVerbsOp::Save { start, end, mode } => {
                        ("saveVerbs", start, end, mode)
                    }
                    SaveRestoreVerbsOp::Restore { start, end, mode } => {
                        ("restoreVerbs", start, end, mode)
                    }
                    SaveRestoreVerbsOp::Delete { start, end, mode } => {
                        ("deleteVerbs", start, end, mode)
                    }
                };
                write!(f, "{name}({start},{end},{mode})")
            }
            I::CursorCommand { op } => {
                write!(f, "cursorCommand(")?;
                match op {
                    CursorOp::CursorShow => write!(f, "cursorShow()")?,
                    CursorOp::CursorHide => write!(f, "cursorHide()")?,
                    CursorOp::UserputOn => write!(f, "userputOn()")?,
                    CursorOp::UserputOff => write!(f, "userputOff()")?,
                    CursorOp::CursorSoftOn => write!(f, "cursorSoftOn()")?,
                    CursorOp::CursorSoftOff => write!(f, "cursorSoftOff()")?,
                    CursorOp::UserputSoftOn => write!(f, "userputSoftOn()")?,
                    CursorOp::UserputSoftOff => write!(f, "userputSoftOff()")?,
                    CursorOp::SetCursorImg { cursor, image } => {
                        write!(f, "setCursorImg({cursor},{image})")?;
                    }
                    CursorOp::SetCursorHotspot { cursor, x, y } => {
                        write!(f, "setCursorHotspot({cursor},{x},{y})")?;
                    }
                    CursorOp::InitCursor(a) => write!(f, "initCursor({a})")?,
                    CursorOp::InitCharset(a) => write!(f, "initCharset({a})")?,
                    CursorOp::LoadCharset { args } => {
                        write!(f, "loadCharset(")?;
                        fmt_args(f, args)?;
                        write!(f, ")")?;
                    }
                }
                write!(f, ")")
            }
            I::SystemOps { op } => {
                let name = match op {
                    SystemOp::Restart => "restart",
                    SystemOp::Pause => "pause",
                    SystemOp::Quit => "quit",
                };
                write!(f, "systemOps({name})")
            }
            I::Wait { op } => match op {
                WaitOp::ForActor(actor) => write!(f, "waitForActor({actor})"),
                WaitOp::ForMessage => write!(f, "waitForMessage()"),
                WaitOp::ForCamera => write!(f, "waitForCamera()"),
                WaitOp::ForSentence => write!(f, "waitForSentence()"),
            },
            I::StringOps { op } => {
                write!(f, "stringOps(")?;
                match op {
                    StringOp::PutCode { string, text } => {
                        write!(f, "putCodeInString({string},{text})")?;
                    }
                    StringOp::Copy { dest, source } => {
                        write!(f, "copyString({dest},{source})")?;
                    }
                    StringOp::SetChar { string, index, ch } => {
                        write!(f, "setStringChar({string},{index},{ch})")?;
                    }
                    StringOp::GetChar { result, string, index } => {
                        write!(f, "{result} = getStringChar({string},{index})")?;
                    }
                    StringOp::Create { string, size } => {
                        write!(f, "createString({string},{size})")?;
                    }
                }
                write!(f, ")")
            }
            I::ResourceRoutines { op } => {
                write!(f, "resourceRoutines(")?;
                match op {
                    ResourceOp::LoadScript(a) => write!(f, "loadScript({a})")?,
                    ResourceOp::LoadSound(a) => write!(f, "loadSound({a})")?,
                    ResourceOp::LoadCostume(a) => write!(f, "loadCostume({a})")?,
                    ResourceOp::LoadRoom(a) => write!(f, "loadRoom({a})")?,
                    ResourceOp::NukeScript(a) => write!(f, "nukeScript({a})")?,
                    ResourceOp::NukeSound(a) => write!(f, "nukeSound({a})")?,
                    ResourceOp::NukeCostume(a) => write!(f, "nukeCostume({a})")?,
                    ResourceOp::NukeRoom(a) => write!(f, "nukeRoom({a})")?,
                    ResourceOp::LockScript(a) => write!(f, "lockScript({a})")?,
                    ResourceOp::LockSound(a) => write!(f, "lockSound({a})")?,
                    ResourceOp::LockCostume(a) => write!(f, "lockCostume({a})")?,
                    ResourceOp::LockRoom(a) => write!(f, "lockRoom({a})")?,
                    ResourceOp::UnlockScript(a) => write!(f, "unlockScript({a})")?,
                    ResourceOp::UnlockSound(a) => write!(f, "unlockSound({a})")?,
                    ResourceOp::UnlockCostume(a) => write!(f, "unlockCostume({a})")?,
                    ResourceOp::UnlockRoom(a) => write!(f, "unlockRoom({a})")?,
                    ResourceOp::ClearHeap => write!(f, "clearHeap()")?,
                    ResourceOp::LoadCharset(a) => write!(f, "loadCharset({a})")?,
                    ResourceOp::NukeCharset(a) => write!(f, "nukeCharset({a})")?,
                    ResourceOp::LoadFlObject { object, room } => {
                        write!(f, "loadFlObject({object},{room})")?;
                    }
                }
                write!(f, ")")
            }
            I::Print { actor, ops } => {
                write!(f, "print({actor},[")?;
                fmt_ops(f, ops)?;
                write!(f, "])")
            }
            I::PrintEgo { ops } => {
                write!(f, "printEgo([")?;
                fmt_ops(f, ops)?;
                write!(f, "])")
            }
            I::Debug { value } => write!(f, "debug({value})"),
            I::Invalid(bytes) => {
                write!(f, ".db ")?;
                for (i, byte) in bytes.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{byte:#04X}")?;
                }
                Ok(())
            }
        }
    }
}
