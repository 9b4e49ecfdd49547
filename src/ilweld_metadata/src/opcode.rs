//! The standard CIL opcode set.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpCode {
    Nop,
    Break,
    Ldarg0,
    Ldarg1,
    Ldarg2,
    Ldarg3,
    Ldloc0,
    Ldloc1,
    Ldloc2,
    Ldloc3,
    Stloc0,
    Stloc1,
    Stloc2,
    Stloc3,
    LdargS,
    LdargaS,
    StargS,
    LdlocS,
    LdlocaS,
    StlocS,
    Ldnull,
    LdcI4M1,
    LdcI40,
    LdcI41,
    LdcI42,
    LdcI43,
    LdcI44,
    LdcI45,
    LdcI46,
    LdcI47,
    LdcI48,
    LdcI4S,
    LdcI4,
    LdcI8,
    LdcR4,
    LdcR8,
    Dup,
    Pop,
    Jmp,
    Call,
    Calli,
    Ret,
    BrS,
    BrfalseS,
    BrtrueS,
    BeqS,
    BgeS,
    BgtS,
    BleS,
    BltS,
    BneUnS,
    BgeUnS,
    BgtUnS,
    BleUnS,
    BltUnS,
    Br,
    Brfalse,
    Brtrue,
    Beq,
    Bge,
    Bgt,
    Ble,
    Blt,
    BneUn,
    BgeUn,
    BgtUn,
    BleUn,
    BltUn,
    Switch,
    LdindI1,
    LdindU1,
    LdindI2,
    LdindU2,
    LdindI4,
    LdindU4,
    LdindI8,
    LdindI,
    LdindR4,
    LdindR8,
    LdindRef,
    StindRef,
    StindI1,
    StindI2,
    StindI4,
    StindI8,
    StindR4,
    StindR8,
    Add,
    Sub,
    Mul,
    Div,
    DivUn,
    Rem,
    RemUn,
    And,
    Or,
    Xor,
    Shl,
    Shr,
    ShrUn,
    Neg,
    Not,
    ConvI1,
    ConvI2,
    ConvI4,
    ConvI8,
    ConvR4,
    ConvR8,
    ConvU4,
    ConvU8,
    Callvirt,
    Cpobj,
    Ldobj,
    Ldstr,
    Newobj,
    Castclass,
    Isinst,
    ConvRUn,
    Unbox,
    Throw,
    Ldfld,
    Ldflda,
    Stfld,
    Ldsfld,
    Ldsflda,
    Stsfld,
    Stobj,
    ConvOvfI1Un,
    ConvOvfI2Un,
    ConvOvfI4Un,
    ConvOvfI8Un,
    ConvOvfU1Un,
    ConvOvfU2Un,
    ConvOvfU4Un,
    ConvOvfU8Un,
    ConvOvfIUn,
    ConvOvfUUn,
    Box,
    Newarr,
    Ldlen,
    Ldelema,
    LdelemI1,
    LdelemU1,
    LdelemI2,
    LdelemU2,
    LdelemI4,
    LdelemU4,
    LdelemI8,
    LdelemI,
    LdelemR4,
    LdelemR8,
    LdelemRef,
    StelemI,
    StelemI1,
    StelemI2,
    StelemI4,
    StelemI8,
    StelemR4,
    StelemR8,
    StelemRef,
    Ldelem,
    Stelem,
    UnboxAny,
    ConvOvfI1,
    ConvOvfU1,
    ConvOvfI2,
    ConvOvfU2,
    ConvOvfI4,
    ConvOvfU4,
    ConvOvfI8,
    ConvOvfU8,
    Refanyval,
    Ckfinite,
    Mkrefany,
    Ldtoken,
    ConvU2,
    ConvU1,
    ConvI,
    ConvOvfI,
    ConvOvfU,
    AddOvf,
    AddOvfUn,
    MulOvf,
    MulOvfUn,
    SubOvf,
    SubOvfUn,
    Endfinally,
    Leave,
    LeaveS,
    StindI,
    ConvU,
    Arglist,
    Ceq,
    Cgt,
    CgtUn,
    Clt,
    CltUn,
    Ldftn,
    Ldvirtftn,
    Ldarg,
    Ldarga,
    Starg,
    Ldloc,
    Ldloca,
    Stloc,
    Localloc,
    Endfilter,
    Unaligned,
    Volatile,
    Tail,
    Initobj,
    Constrained,
    Cpblk,
    Initblk,
    Rethrow,
    Sizeof,
    Refanytype,
    Readonly,
}

impl OpCode {
    pub fn name(&self) -> &'static str {
        match self {
            OpCode::Nop => "nop",
            OpCode::Break => "break",
            OpCode::Ldarg0 => "ldarg.0",
            OpCode::Ldarg1 => "ldarg.1",
            OpCode::Ldarg2 => "ldarg.2",
            OpCode::Ldarg3 => "ldarg.3",
            OpCode::Ldloc0 => "ldloc.0",
            OpCode::Ldloc1 => "ldloc.1",
            OpCode::Ldloc2 => "ldloc.2",
            OpCode::Ldloc3 => "ldloc.3",
            OpCode::Stloc0 => "stloc.0",
            OpCode::Stloc1 => "stloc.1",
            OpCode::Stloc2 => "stloc.2",
            OpCode::Stloc3 => "stloc.3",
            OpCode::LdargS => "ldarg.s",
            OpCode::LdargaS => "ldarga.s",
            OpCode::StargS => "starg.s",
            OpCode::LdlocS => "ldloc.s",
            OpCode::LdlocaS => "ldloca.s",
            OpCode::StlocS => "stloc.s",
            OpCode::Ldnull => "ldnull",
            OpCode::LdcI4M1 => "ldc.i4.m1",
            OpCode::LdcI40 => "ldc.i4.0",
            OpCode::LdcI41 => "ldc.i4.1",
            OpCode::LdcI42 => "ldc.i4.2",
            OpCode::LdcI43 => "ldc.i4.3",
            OpCode::LdcI44 => "ldc.i4.4",
            OpCode::LdcI45 => "ldc.i4.5",
            OpCode::LdcI46 => "ldc.i4.6",
            OpCode::LdcI47 => "ldc.i4.7",
            OpCode::LdcI48 => "ldc.i4.8",
            OpCode::LdcI4S => "ldc.i4.s",
            OpCode::LdcI4 => "ldc.i4",
            OpCode::LdcI8 => "ldc.i8",
            OpCode::LdcR4 => "ldc.r4",
            OpCode::LdcR8 => "ldc.r8",
            OpCode::Dup => "dup",
            OpCode::Pop => "pop",
            OpCode::Jmp => "jmp",
            OpCode::Call => "call",
            OpCode::Calli => "calli",
            OpCode::Ret => "ret",
            OpCode::BrS => "br.s",
            OpCode::BrfalseS => "brfalse.s",
            OpCode::BrtrueS => "brtrue.s",
            OpCode::BeqS => "beq.s",
            OpCode::BgeS => "bge.s",
            OpCode::BgtS => "bgt.s",
            OpCode::BleS => "ble.s",
            OpCode::BltS => "blt.s",
            OpCode::BneUnS => "bne.un.s",
            OpCode::BgeUnS => "bge.un.s",
            OpCode::BgtUnS => "bgt.un.s",
            OpCode::BleUnS => "ble.un.s",
            OpCode::BltUnS => "blt.un.s",
            OpCode::Br => "br",
            OpCode::Brfalse => "brfalse",
            OpCode::Brtrue => "brtrue",
            OpCode::Beq => "beq",
            OpCode::Bge => "bge",
            OpCode::Bgt => "bgt",
            OpCode::Ble => "ble",
            OpCode::Blt => "blt",
            OpCode::BneUn => "bne.un",
            OpCode::BgeUn => "bge.un",
            OpCode::BgtUn => "bgt.un",
            OpCode::BleUn => "ble.un",
            OpCode::BltUn => "blt.un",
            OpCode::Switch => "switch",
            OpCode::LdindI1 => "ldind.i1",
            OpCode::LdindU1 => "ldind.u1",
            OpCode::LdindI2 => "ldind.i2",
            OpCode::LdindU2 => "ldind.u2",
            OpCode::LdindI4 => "ldind.i4",
            OpCode::LdindU4 => "ldind.u4",
            OpCode::LdindI8 => "ldind.i8",
            OpCode::LdindI => "ldind.i",
            OpCode::LdindR4 => "ldind.r4",
            OpCode::LdindR8 => "ldind.r8",
            OpCode::LdindRef => "ldind.ref",
            OpCode::StindRef => "stind.ref",
            OpCode::StindI1 => "stind.i1",
            OpCode::StindI2 => "stind.i2",
            OpCode::StindI4 => "stind.i4",
            OpCode::StindI8 => "stind.i8",
            OpCode::StindR4 => "stind.r4",
            OpCode::StindR8 => "stind.r8",
            OpCode::Add => "add",
            OpCode::Sub => "sub",
            OpCode::Mul => "mul",
            OpCode::Div => "div",
            OpCode::DivUn => "div.un",
            OpCode::Rem => "rem",
            OpCode::RemUn => "rem.un",
            OpCode::And => "and",
            OpCode::Or => "or",
            OpCode::Xor => "xor",
            OpCode::Shl => "shl",
            OpCode::Shr => "shr",
            OpCode::ShrUn => "shr.un",
            OpCode::Neg => "neg",
            OpCode::Not => "not",
            OpCode::ConvI1 => "conv.i1",
            OpCode::ConvI2 => "conv.i2",
            OpCode::ConvI4 => "conv.i4",
            OpCode::ConvI8 => "conv.i8",
            OpCode::ConvR4 => "conv.r4",
            OpCode::ConvR8 => "conv.r8",
            OpCode::ConvU4 => "conv.u4",
            OpCode::ConvU8 => "conv.u8",
            OpCode::Callvirt => "callvirt",
            OpCode::Cpobj => "cpobj",
            OpCode::Ldobj => "ldobj",
            OpCode::Ldstr => "ldstr",
            OpCode::Newobj => "newobj",
            OpCode::Castclass => "castclass",
            OpCode::Isinst => "isinst",
            OpCode::ConvRUn => "conv.r.un",
            OpCode::Unbox => "unbox",
            OpCode::Throw => "throw",
            OpCode::Ldfld => "ldfld",
            OpCode::Ldflda => "ldflda",
            OpCode::Stfld => "stfld",
            OpCode::Ldsfld => "ldsfld",
            OpCode::Ldsflda => "ldsflda",
            OpCode::Stsfld => "stsfld",
            OpCode::Stobj => "stobj",
            OpCode::ConvOvfI1Un => "conv.ovf.i1.un",
            OpCode::ConvOvfI2Un => "conv.ovf.i2.un",
            OpCode::ConvOvfI4Un => "conv.ovf.i4.un",
            OpCode::ConvOvfI8Un => "conv.ovf.i8.un",
            OpCode::ConvOvfU1Un => "conv.ovf.u1.un",
            OpCode::ConvOvfU2Un => "conv.ovf.u2.un",
            OpCode::ConvOvfU4Un => "conv.ovf.u4.un",
            OpCode::ConvOvfU8Un => "conv.ovf.u8.un",
            OpCode::ConvOvfIUn => "conv.ovf.i.un",
            OpCode::ConvOvfUUn => "conv.ovf.u.un",
            OpCode::Box => "box",
            OpCode::Newarr => "newarr",
            OpCode::Ldlen => "ldlen",
            OpCode::Ldelema => "ldelema",
            OpCode::LdelemI1 => "ldelem.i1",
            OpCode::LdelemU1 => "ldelem.u1",
            OpCode::LdelemI2 => "ldelem.i2",
            OpCode::LdelemU2 => "ldelem.u2",
            OpCode::LdelemI4 => "ldelem.i4",
            OpCode::LdelemU4 => "ldelem.u4",
            OpCode::LdelemI8 => "ldelem.i8",
            OpCode::LdelemI => "ldelem.i",
            OpCode::LdelemR4 => "ldelem.r4",
            OpCode::LdelemR8 => "ldelem.r8",
            OpCode::LdelemRef => "ldelem.ref",
            OpCode::StelemI => "stelem.i",
            OpCode::StelemI1 => "stelem.i1",
            OpCode::StelemI2 => "stelem.i2",
            OpCode::StelemI4 => "stelem.i4",
            OpCode::StelemI8 => "stelem.i8",
            OpCode::StelemR4 => "stelem.r4",
            OpCode::StelemR8 => "stelem.r8",
            OpCode::StelemRef => "stelem.ref",
            OpCode::Ldelem => "ldelem",
            OpCode::Stelem => "stelem",
            OpCode::UnboxAny => "unbox.any",
            OpCode::ConvOvfI1 => "conv.ovf.i1",
            OpCode::ConvOvfU1 => "conv.ovf.u1",
            OpCode::ConvOvfI2 => "conv.ovf.i2",
            OpCode::ConvOvfU2 => "conv.ovf.u2",
            OpCode::ConvOvfI4 => "conv.ovf.i4",
            OpCode::ConvOvfU4 => "conv.ovf.u4",
            OpCode::ConvOvfI8 => "conv.ovf.i8",
            OpCode::ConvOvfU8 => "conv.ovf.u8",
            OpCode::Refanyval => "refanyval",
            OpCode::Ckfinite => "ckfinite",
            OpCode::Mkrefany => "mkrefany",
            OpCode::Ldtoken => "ldtoken",
            OpCode::ConvU2 => "conv.u2",
            OpCode::ConvU1 => "conv.u1",
            OpCode::ConvI => "conv.i",
            OpCode::ConvOvfI => "conv.ovf.i",
            OpCode::ConvOvfU => "conv.ovf.u",
            OpCode::AddOvf => "add.ovf",
            OpCode::AddOvfUn => "add.ovf.un",
            OpCode::MulOvf => "mul.ovf",
            OpCode::MulOvfUn => "mul.ovf.un",
            OpCode::SubOvf => "sub.ovf",
            OpCode::SubOvfUn => "sub.ovf.un",
            OpCode::Endfinally => "endfinally",
            OpCode::Leave => "leave",
            OpCode::LeaveS => "leave.s",
            OpCode::StindI => "stind.i",
            OpCode::ConvU => "conv.u",
            OpCode::Arglist => "arglist",
            OpCode::Ceq => "ceq",
            OpCode::Cgt => "cgt",
            OpCode::CgtUn => "cgt.un",
            OpCode::Clt => "clt",
            OpCode::CltUn => "clt.un",
            OpCode::Ldftn => "ldftn",
            OpCode::Ldvirtftn => "ldvirtftn",
            OpCode::Ldarg => "ldarg",
            OpCode::Ldarga => "ldarga",
            OpCode::Starg => "starg",
            OpCode::Ldloc => "ldloc",
            OpCode::Ldloca => "ldloca",
            OpCode::Stloc => "stloc",
            OpCode::Localloc => "localloc",
            OpCode::Endfilter => "endfilter",
            OpCode::Unaligned => "unaligned.",
            OpCode::Volatile => "volatile.",
            OpCode::Tail => "tail.",
            OpCode::Initobj => "initobj",
            OpCode::Constrained => "constrained.",
            OpCode::Cpblk => "cpblk",
            OpCode::Initblk => "initblk",
            OpCode::Rethrow => "rethrow",
            OpCode::Sizeof => "sizeof",
            OpCode::Refanytype => "refanytype",
            OpCode::Readonly => "readonly.",
        }
    }
}

impl fmt::Display for OpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
