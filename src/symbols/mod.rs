//! The representative catalog of module-stream (symbol) records.
//!
//! Symbols share the record codec with leaves but live in their own numeric
//! tag space with 4-byte kind tags. Order inside a module stream is
//! semantically significant — [`ScopeEnd`] markers delimit the records before
//! them — and is preserved exactly by [`crate::module::ModuleSymbolReader`].

pub mod attr_register;
pub mod attributes;
pub mod callees;
pub mod constant;
pub mod end;
pub mod local;
pub mod register;

use strum::{Display, FromRepr};

pub use attr_register::AttrRegister;
pub use attributes::{LocalVarAttributes, LocalVarFlags};
pub use callees::Callees;
pub use constant::Constant;
pub use end::ScopeEnd;
pub use local::Local;
pub use register::Register;

/// Numeric kind tags of the symbol records this crate registers.
///
/// The values are the published CodeView `S_` constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromRepr, Display)]
#[repr(u32)]
pub enum SymbolKind {
    /// `S_END` — closes the innermost open scope.
    End = 0x0006,
    /// `S_REGISTER` — a variable living in a register.
    Register = 0x1106,
    /// `S_CONSTANT` — a named compile-time constant.
    Constant = 0x1107,
    /// `S_MANREGISTER` — an enregistered variable with liveness attributes.
    AttrRegister = 0x1121,
    /// `S_LOCAL` — a local variable.
    Local = 0x113e,
    /// `S_CALLEES` — functions called by the enclosing procedure.
    Callees = 0x115a,
}

/// One decoded symbol record payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Symbol {
    /// `S_END`
    End(ScopeEnd),
    /// `S_REGISTER`
    Register(Register),
    /// `S_CONSTANT`
    Constant(Constant),
    /// `S_MANREGISTER`
    AttrRegister(AttrRegister),
    /// `S_LOCAL`
    Local(Local),
    /// `S_CALLEES`
    Callees(Callees),
}

impl Symbol {
    /// The wire kind tag of this payload.
    #[must_use]
    pub fn kind(&self) -> SymbolKind {
        match self {
            Symbol::End(_) => SymbolKind::End,
            Symbol::Register(_) => SymbolKind::Register,
            Symbol::Constant(_) => SymbolKind::Constant,
            Symbol::AttrRegister(_) => SymbolKind::AttrRegister,
            Symbol::Local(_) => SymbolKind::Local,
            Symbol::Callees(_) => SymbolKind::Callees,
        }
    }

    /// A one-line human-readable description of this record.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Symbol::End(end) => end.describe(),
            Symbol::Register(register) => register.describe(),
            Symbol::Constant(constant) => constant.describe(),
            Symbol::AttrRegister(register) => register.describe(),
            Symbol::Local(local) => local.describe(),
            Symbol::Callees(callees) => callees.describe(),
        }
    }
}
