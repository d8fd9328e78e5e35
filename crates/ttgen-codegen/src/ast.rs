//! The statement-tree data model (§3).
//!
//! `Statement` is a sum type (not the source's C-style tagged union plus
//! switch-on-`statementtype`) per the §9 redesign note "Large tagged
//! variant". Every kind from §3's groupings appears as exactly one
//! `StatementKind` variant; the dispatcher in `codegen::dispatch` matches
//! on all of them with no catch-all arm, so adding a kind here is a
//! compile error until the dispatcher handles it too.
//!
//! Values/templates/references are the externally-owned, opaque AST nodes
//! `ttgen_core::ast_node` describes; this crate only ever holds them behind
//! `Box<dyn ...>` and never inspects their internals beyond the trait
//! contract (§3 "Lifetimes").
//!
//! Per §9's "Mutually recursive AST ↔ generator" redesign note, nodes here
//! do **not** store back-pointers to their enclosing block/definition; the
//! generator instead threads a `Ctx` (current scope, current loop labels,
//! enclosing exception tag) down through the recursion. See
//! `codegen::context::Ctx`.

use ttgen_core::ast_node::{ReferenceNode, TemplateNode, ValueNode};
use ttgen_core::SourceLocation;

pub type ValBox = Box<dyn ValueNode>;
pub type TemplBox = Box<dyn TemplateNode>;
pub type RefBox = Box<dyn ReferenceNode>;

/// One statement: its kind, operands, and source location (§3).
pub struct Statement {
    pub kind: StatementKind,
    pub location: Option<SourceLocation>,
}

impl Statement {
    pub fn new(kind: StatementKind, location: Option<SourceLocation>) -> Self {
        Statement { kind, location }
    }
}

/// Exception-handling tag on a `StatementBlock` (§3 invariant: a `catch`
/// block must follow a `try` block; `try` must be followed by `catch`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExceptionTag {
    #[default]
    None,
    Try,
    /// The name bound to the thrown message by the block's magic first
    /// definition is carried separately in `StatementBlock::catch_binding`.
    Catch,
}

/// An ordered sequence of statements: a scope plus an optional
/// exception-handling tag (§3).
#[derive(Default)]
pub struct StatementBlock {
    pub statements: Vec<Statement>,
    pub exception_tag: ExceptionTag,
    /// First-statement magic binding for a `catch` block (§3 invariant).
    pub catch_binding: Option<String>,
    /// Labels declared directly in this block's scope (uniqueness across
    /// the scope chain is a checker invariant, asserted, not re-verified,
    /// by the generator).
    pub labels: Vec<String>,
}

impl StatementBlock {
    pub fn new(statements: Vec<Statement>) -> Self {
        StatementBlock {
            statements,
            exception_tag: ExceptionTag::None,
            catch_binding: None,
            labels: Vec::new(),
        }
    }
}

/// One branch of an alt/interleave (§3).
pub struct AltGuard {
    pub tag: AltGuardTag,
    pub guard_expr: Option<ValBox>,
    pub operation: Option<Statement>,
    pub body: StatementBlock,
    pub location: Option<SourceLocation>,
}

pub enum AltGuardTag {
    OpGuard,
    AltstepRef { name: String, args: Vec<ValBox> },
    Invoke { funcref: ValBox, args: Vec<ValBox> },
    Else,
}

// ---------------------------------------------------------------------
// Redirect objects (§3)
// ---------------------------------------------------------------------

#[derive(Debug, Clone)]
pub enum PathStep {
    Field(String),
    Index(i64),
}

/// One entry of a value redirect: `... -> value (x, y.f := z)` syntax.
pub struct ValueRedirectEntry {
    pub target: RefBox,
    pub sub_path: Vec<PathStep>,
    pub decoded: bool,
    /// Present for universal-string decode targets whose encoding is a
    /// runtime `CHARSTRING` parameter rather than statically known.
    pub string_encoding: Option<ValBox>,
    pub decoded_target_type: Option<String>,
}

#[derive(Default)]
pub struct ValueRedirect {
    pub entries: Vec<ValueRedirectEntry>,
}

/// One entry of a parameter redirect, already normalised to positional
/// form by the checker (§3 invariant).
pub struct ParamRedirectEntry {
    /// `None` for a padded, unused slot.
    pub target: Option<RefBox>,
    pub decoded: bool,
    pub string_encoding: Option<ValBox>,
    pub decoded_target_type: Option<String>,
}

#[derive(Default)]
pub struct ParamRedirect {
    pub entries: Vec<ParamRedirectEntry>,
}

/// The shape of an index redirect synthesised for `any from` on an
/// array of ports/timers/components (§4.3).
pub enum IndexRedirectShape {
    SingleInteger,
    OneDimensional,
    MultiDimensional { dims: Vec<usize> },
}

pub struct IndexRedirect {
    pub target: RefBox,
    pub shape: IndexRedirectShape,
}

// ---------------------------------------------------------------------
// Receiving operations (§4.3 matcher table)
// ---------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiveKind {
    Receive,
    Trigger,
    CheckReceive,
    Getcall,
    CheckGetcall,
    Getreply,
    CheckGetreply,
    Catch,
    CheckCatch,
    Check,
}

impl ReceiveKind {
    /// Only `receive` (non-trigger), `timeout`, and `check*` never repeat;
    /// `trigger`, `done`, `killed` may (§5).
    pub fn can_repeat(self) -> bool {
        matches!(self, ReceiveKind::Trigger)
    }
}

pub struct ReceiveOp {
    pub kind: ReceiveKind,
    /// `None` means an `any port.X` operation.
    pub port: Option<RefBox>,
    pub template: Option<TemplBox>,
    /// For getreply: the return-value match template (defaults to
    /// any-value when absent, §4.3).
    pub return_value_match: Option<TemplBox>,
    pub signature_name: Option<String>,
    pub from: Option<TemplBox>,
    pub sender_redirect: Option<RefBox>,
    pub value_redirect: Option<ValueRedirect>,
    pub param_redirect: Option<ParamRedirect>,
    pub index_redirect: Option<IndexRedirect>,
}

pub enum DoneTarget {
    Component(RefBox),
    AnyComponent,
    AllComponent,
}

pub struct DoneStmt {
    pub target: DoneTarget,
    pub value_match: Option<TemplBox>,
    pub value_redirect: Option<ValueRedirect>,
    pub index_redirect: Option<IndexRedirect>,
}

pub enum KilledTarget {
    Component(RefBox),
    AnyComponent,
    AllComponent,
}

pub struct KilledStmt {
    pub target: KilledTarget,
    pub index_redirect: Option<IndexRedirect>,
}

pub enum TimeoutTarget {
    Timer(RefBox),
    AnyTimer,
}

pub struct TimeoutStmt {
    pub target: TimeoutTarget,
    pub index_redirect: Option<IndexRedirect>,
}

// ---------------------------------------------------------------------
// Sending operations
// ---------------------------------------------------------------------

pub struct SendStmt {
    pub port: Option<RefBox>,
    pub message: ValBox,
    pub to: Option<ValBox>,
}

pub struct CallBody {
    pub timer: Option<ValBox>,
    /// A mini-alt whose every embedded getreply/catch is retargeted to the
    /// originating port and signature (§4.3 "Sending operations").
    pub alt_branches: Vec<AltGuard>,
}

pub struct CallStmt {
    pub port: Option<RefBox>,
    pub signature_name: String,
    pub message: ValBox,
    pub to: Option<ValBox>,
    pub body: Option<CallBody>,
}

pub struct ReplyStmt {
    pub port: Option<RefBox>,
    pub signature_name: String,
    pub message: ValBox,
    pub reply_value: Option<ValBox>,
    pub to: Option<ValBox>,
}

pub struct RaiseStmt {
    pub port: Option<RefBox>,
    pub signature_name: String,
    pub exception: ValBox,
    pub to: Option<ValBox>,
}

// ---------------------------------------------------------------------
// Control-flow statement payloads
// ---------------------------------------------------------------------

pub struct IfClause {
    pub condition: ValBox,
    pub body: StatementBlock,
}

pub struct IfStmt {
    pub clauses: Vec<IfClause>,
    pub else_branch: Option<StatementBlock>,
}

pub struct SelectCaseArm {
    pub values: Vec<ValBox>,
    pub body: StatementBlock,
}

pub struct SelectCaseStmt {
    pub scrutinee: ValBox,
    pub arms: Vec<SelectCaseArm>,
    pub else_branch: Option<StatementBlock>,
}

pub struct SelectUnionArm {
    pub alternative: String,
    pub body: StatementBlock,
}

pub struct SelectUnionStmt {
    pub scrutinee: ValBox,
    pub arms: Vec<SelectUnionArm>,
    pub else_branch: Option<StatementBlock>,
}

pub struct ForStmt {
    pub init: Option<Box<Statement>>,
    pub condition: Option<ValBox>,
    pub step: Option<Box<Statement>>,
    pub body: StatementBlock,
}

pub struct WhileStmt {
    pub condition: ValBox,
    pub body: StatementBlock,
}

pub struct DoWhileStmt {
    pub body: StatementBlock,
    pub condition: ValBox,
}

pub enum StopTarget {
    SelfComp,
    Mtc,
    Other(ValBox),
}

// ---------------------------------------------------------------------
// Structured statements
// ---------------------------------------------------------------------

pub struct AltStmt {
    pub branches: Vec<AltGuard>,
}

pub struct InterleaveStmt {
    pub branches: Vec<AltGuard>,
}

// ---------------------------------------------------------------------
// Lifecycle / configuration payloads
// ---------------------------------------------------------------------

pub enum StartComponentTarget {
    ByName {
        component_type: String,
        name: Option<ValBox>,
    },
    ByDeref(ValBox),
}

pub struct StartComponentStmt {
    pub target: StartComponentTarget,
    pub function_name: String,
    pub args: Vec<ValBox>,
}

pub struct ExecuteStmt {
    pub testcase_name: String,
    pub args: Vec<ValBox>,
    pub timer: Option<ValBox>,
}

pub struct UpdateStmt {
    pub target_name: String,
    /// `None` detaches the currently attached descriptor.
    pub descriptor: Option<ValBox>,
    pub is_parametrised_template: bool,
}

// ---------------------------------------------------------------------
// The statement kind enum (§3's grouped kinds)
// ---------------------------------------------------------------------

pub enum StatementKind {
    // Control
    Block(StatementBlock),
    If(IfStmt),
    SelectCase(SelectCaseStmt),
    SelectUnion(SelectUnionStmt),
    For(ForStmt),
    While(WhileStmt),
    DoWhile(DoWhileStmt),
    Break,
    Continue,
    Label(String),
    Goto(String),
    Return(Option<ValBox>),
    StopExec(StopTarget),
    StopTestcase,
    StartProfiler,
    StopProfiler,

    // Structured
    Alt(AltStmt),
    Interleave(InterleaveStmt),
    Repeat,

    // Assignment / definitions
    Assignment { target: RefBox, value: ValBox },
    LocalDefinition {
        name: String,
        type_name: String,
        init: Option<ValBox>,
    },

    // Dynamic dispatch
    InstanceCall { target: RefBox, args: Vec<ValBox> },
    InvokeOnDeref { funcref: ValBox, args: Vec<ValBox> },
    Activate { altstep_name: String, args: Vec<ValBox> },
    Deactivate(Option<RefBox>),

    // Communication: send-side
    Send(SendStmt),
    Call(CallStmt),
    Reply(ReplyStmt),
    Raise(RaiseStmt),

    // Communication: receive-side
    Receive(ReceiveOp),
    Trigger(ReceiveOp),
    CheckReceive(ReceiveOp),
    Getcall(ReceiveOp),
    CheckGetcall(ReceiveOp),
    Getreply(ReceiveOp),
    CheckGetreply(ReceiveOp),
    Catch(ReceiveOp),
    CheckCatch(ReceiveOp),
    Check(ReceiveOp),
    Done(DoneStmt),
    Killed(KilledStmt),
    Timeout(TimeoutStmt),

    // Configuration
    Connect { a: RefBox, b: RefBox },
    Disconnect { a: RefBox, b: RefBox },
    Map { a: RefBox, b: RefBox },
    Unmap { a: RefBox, b: RefBox },

    // Lifecycle
    StartComponent(StartComponentStmt),
    StopComponent(RefBox),
    Kill(Option<RefBox>),
    StartPort(RefBox),
    StopPort(RefBox),
    Clear(RefBox),
    Halt(Option<RefBox>),
    StartTimer { timer: RefBox, value: Option<ValBox> },
    StopTimer(Option<RefBox>),

    // Misc
    Log(Vec<ValBox>),
    Action(Vec<ValBox>),
    SetVerdict { verdict: ValBox, reason: Option<ValBox> },
    Execute(ExecuteStmt),
    String2Value { source: ValBox, target: RefBox },
    Int2Enum { source: ValBox, target: RefBox },
    ErroneousUpdate(UpdateStmt),
    SetState { state: ValBox, info: Option<TemplBox> },
}
