//! Identifiers for assemblies, types and members of the symbol graph.

use std::fmt;

/// An identifier for a registered assembly.
///
/// `AssemblyId` is a lightweight handle (just a u32) assigned in registration
/// order by the [`SymbolGraphBuilder`](crate::hir::SymbolGraphBuilder). The
/// assembly's name and module file live in the graph.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct AssemblyId(pub u32);

impl AssemblyId {
    /// Create a new AssemblyId from a raw index.
    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw index.
    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for AssemblyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AssemblyId({})", self.0)
    }
}

impl fmt::Display for AssemblyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "assembly#{}", self.0)
    }
}

/// A globally unique identifier for a type.
///
/// Combines the assembly declaring the type with an assembly-local index,
/// so a type id alone is enough to find the documentation slice to build.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct TypeId {
    /// The assembly declaring this type
    pub assembly: AssemblyId,
    /// The index of the type within its assembly
    pub local: u32,
}

impl TypeId {
    #[inline]
    pub const fn new(assembly: AssemblyId, local: u32) -> Self {
        Self { assembly, local }
    }
}

impl fmt::Debug for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeId({}:{})", self.assembly.0, self.local)
    }
}

/// A globally unique identifier for a declared member.
///
/// The declaring type is part of the identity: a `MemberId` always names the
/// member as declared, never a view of it through a derived type.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct MemberId {
    /// The type declaring this member
    pub declaring: TypeId,
    /// The index of the member within its declaring type
    pub local: u32,
}

impl MemberId {
    #[inline]
    pub const fn new(declaring: TypeId, local: u32) -> Self {
        Self { declaring, local }
    }

    /// The assembly that declares this member.
    #[inline]
    pub const fn assembly(self) -> AssemblyId {
        self.declaring.assembly
    }
}

impl fmt::Debug for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MemberId({}:{}:{})",
            self.declaring.assembly.0, self.declaring.local, self.local
        )
    }
}

/// The kind of a declared member.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum MemberKind {
    Property,
    Field,
    Method,
}

impl MemberKind {
    /// The documentation-id prefix for this kind (`P`, `F`, `M`).
    pub const fn prefix(self) -> char {
        match self {
            MemberKind::Property => 'P',
            MemberKind::Field => 'F',
            MemberKind::Method => 'M',
        }
    }

    pub const fn display(self) -> &'static str {
        match self {
            MemberKind::Property => "property",
            MemberKind::Field => "field",
            MemberKind::Method => "method",
        }
    }
}

/// A handle to any documentable symbol.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Symbol {
    Type(TypeId),
    Member(MemberId),
}

impl Symbol {
    /// The assembly whose documentation file describes this symbol.
    pub const fn assembly(self) -> AssemblyId {
        match self {
            Symbol::Type(ty) => ty.assembly,
            Symbol::Member(member) => member.assembly(),
        }
    }
}

impl From<TypeId> for Symbol {
    fn from(ty: TypeId) -> Self {
        Symbol::Type(ty)
    }
}

impl From<MemberId> for Symbol {
    fn from(member: MemberId) -> Self {
        Symbol::Member(member)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_id_equality() {
        let asm = AssemblyId::new(0);
        let dog = TypeId::new(asm, 1);
        let cat = TypeId::new(asm, 2);

        let a = MemberId::new(dog, 0);
        let b = MemberId::new(dog, 0);
        let c = MemberId::new(dog, 1);
        let d = MemberId::new(cat, 0);

        assert_eq!(a, b);
        assert_ne!(a, c); // different local
        assert_ne!(a, d); // different declaring type
    }

    #[test]
    fn test_symbol_assembly() {
        let asm = AssemblyId::new(3);
        let ty = TypeId::new(asm, 0);
        assert_eq!(Symbol::from(ty).assembly(), asm);
        assert_eq!(Symbol::from(MemberId::new(ty, 4)).assembly(), asm);
    }

    #[test]
    fn test_id_sizes() {
        assert_eq!(std::mem::size_of::<AssemblyId>(), 4);
        assert_eq!(std::mem::size_of::<TypeId>(), 8);
        assert_eq!(std::mem::size_of::<MemberId>(), 12);
    }
}
