//! Method bodies: locals, instructions, exception handlers.

use crate::members::{FieldRef, MethodRef};
use crate::opcode::OpCode;
use crate::signatures::{CallingConventionSig, TypeSig};
use crate::types::TypeDefOrRef;

#[derive(Debug, Clone, Default)]
pub struct CilBody {
    pub keep_old_max_stack: bool,
    pub init_locals: bool,
    pub header_size: u8,
    pub max_stack: u16,
    pub local_var_sig_tok: u32,
    pub variables: Vec<Local>,
    pub instructions: Vec<Instruction>,
    pub exception_handlers: Vec<ExceptionHandler>,
}

#[derive(Debug, Clone)]
pub struct Local {
    pub ty: TypeSig,
    pub name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Instruction {
    pub opcode: OpCode,
    pub operand: Operand,
    pub offset: u32,
    pub sequence_point: Option<SequencePoint>,
}

impl Instruction {
    pub fn new(opcode: OpCode) -> Self {
        Instruction {
            opcode,
            operand: Operand::None,
            offset: 0,
            sequence_point: None,
        }
    }

    pub fn with_operand(opcode: OpCode, operand: Operand) -> Self {
        Instruction {
            opcode,
            operand,
            offset: 0,
            sequence_point: None,
        }
    }
}

/// Instruction operands. In-body references (locals, parameters, branch
/// targets) are indices relative to the owning body; the parameter index
/// counts the hidden `this` slot of instance methods.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    None,
    U1(u8),
    I1(i8),
    I4(i32),
    I8(i64),
    R4(f32),
    R8(f64),
    String(String),
    Local(usize),
    Param(u16),
    Instr(usize),
    InstrList(Vec<usize>),
    Type(TypeDefOrRef),
    Method(MethodRef),
    Field(FieldRef),
    Sig(Box<CallingConventionSig>),
}

impl Operand {
    pub fn is_none(&self) -> bool {
        matches!(self, Operand::None)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExceptionHandlerKind {
    Catch,
    Filter,
    Finally,
    Fault,
}

/// Handler boundaries are instruction indices; `None` means the region runs
/// to the end of the body.
#[derive(Debug, Clone)]
pub struct ExceptionHandler {
    pub kind: ExceptionHandlerKind,
    pub try_start: Option<usize>,
    pub try_end: Option<usize>,
    pub filter_start: Option<usize>,
    pub handler_start: Option<usize>,
    pub handler_end: Option<usize>,
    pub catch_type: Option<TypeDefOrRef>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequencePoint {
    pub document: String,
    pub start_line: u32,
    pub start_column: u32,
    pub end_line: u32,
    pub end_column: u32,
}
