//! The symbol graph: an explicit registry of assemblies, types and members.
//!
//! Documentation files only name symbols; the graph says what those names
//! refer to: which types exist in which assembly, how they inherit, and which
//! members they declare with which parameter lists. Hosts build it once (from
//! their own metadata reader) and share it behind an `Arc`.

use std::sync::Arc;

use indexmap::IndexSet;
use rustc_hash::{FxHashMap, FxHashSet};
use smol_str::SmolStr;

use crate::base::{AssemblyId, MemberId, MemberKind, TypeId};
use crate::syntax::cref::normalize_type_name;

// ============================================================================
// SYMBOL DATA
// ============================================================================

/// The kind of a registered type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Class,
    Struct,
    Interface,
    Enum,
    Delegate,
}

/// A registered assembly.
#[derive(Clone, Debug)]
pub struct AssemblyData {
    pub id: AssemblyId,
    /// Assembly name as written in `<assembly><name>`.
    pub name: SmolStr,
    /// Module file name (`Zoo.Model.dll`); the doc file sits next to it.
    pub module: SmolStr,
    types: Vec<TypeData>,
    by_name: FxHashMap<SmolStr, u32>,
}

impl AssemblyData {
    /// All types declared in this assembly, in registration order.
    pub fn types(&self) -> &[TypeData] {
        &self.types
    }
}

/// A registered type.
#[derive(Clone, Debug)]
pub struct TypeData {
    pub id: TypeId,
    /// Full doc-id name, generic arity kept (`Ns.Outer.Inner`, `Ns.Box`1`).
    pub name: SmolStr,
    pub kind: TypeKind,
    pub base: Option<TypeId>,
    /// Directly declared interfaces, in declaration order.
    pub interfaces: Vec<TypeId>,
    members: Vec<MemberData>,
}

impl TypeData {
    /// Members declared on this type itself.
    pub fn members(&self) -> &[MemberData] {
        &self.members
    }

    /// Type name without namespace or enclosing types.
    pub fn short_name(&self) -> &str {
        self.name
            .rfind('.')
            .map_or(self.name.as_str(), |dot| &self.name[dot + 1..])
    }
}

/// A declared property, field or method.
#[derive(Clone, Debug)]
pub struct MemberData {
    pub id: MemberId,
    pub kind: MemberKind,
    pub name: SmolStr,
    /// Parameter type names in doc-id or friendly generic form. Methods only.
    pub parameters: Vec<SmolStr>,
}

impl MemberData {
    /// Name without an explicit-interface qualifier (`Ns#IFoo#Bar` → `Bar`).
    pub fn simple_name(&self) -> &str {
        simple_member_name(&self.name)
    }

    /// Positional parameter-type equality after normalization.
    pub fn matches_parameters<S: AsRef<str>>(&self, parameters: &[S]) -> bool {
        self.parameters.len() == parameters.len()
            && self
                .parameters
                .iter()
                .zip(parameters)
                .all(|(ours, theirs)| normalize_type_name(ours) == normalize_type_name(theirs.as_ref()))
    }

    /// Same kind, same simple name and, for methods, same parameter types.
    pub fn same_signature(&self, other: &MemberData) -> bool {
        self.kind == other.kind
            && self.simple_name() == other.simple_name()
            && (self.kind != MemberKind::Method || self.matches_parameters(&other.parameters))
    }
}

pub fn simple_member_name(name: &str) -> &str {
    name.rfind(['#', '.']).map_or(name, |i| &name[i + 1..])
}

// ============================================================================
// BUILDER
// ============================================================================

/// Builds a [`SymbolGraph`].
///
/// Ids are assigned in registration order, so a graph built from the same
/// metadata always has the same ids.
#[derive(Debug, Default)]
pub struct SymbolGraphBuilder {
    assemblies: Vec<AssemblyData>,
}

impl SymbolGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an assembly by name and module file name.
    pub fn add_assembly(&mut self, name: &str, module: &str) -> AssemblyId {
        if let Some(existing) = self.assemblies.iter().find(|a| a.name == name) {
            return existing.id;
        }
        let id = AssemblyId::new(self.assemblies.len() as u32);
        self.assemblies.push(AssemblyData {
            id,
            name: SmolStr::new(name),
            module: SmolStr::new(module),
            types: Vec::new(),
            by_name: FxHashMap::default(),
        });
        id
    }

    /// Register a type. Registering the same name twice returns the first id.
    ///
    /// # Panics
    ///
    /// Panics if `assembly` was not returned by this builder.
    pub fn add_type(&mut self, assembly: AssemblyId, name: &str, kind: TypeKind) -> TypeId {
        let asm = &mut self.assemblies[assembly.index() as usize];
        if let Some(&local) = asm.by_name.get(name) {
            return TypeId::new(assembly, local);
        }
        let local = asm.types.len() as u32;
        let id = TypeId::new(assembly, local);
        asm.types.push(TypeData {
            id,
            name: SmolStr::new(name),
            kind,
            base: None,
            interfaces: Vec::new(),
            members: Vec::new(),
        });
        asm.by_name.insert(SmolStr::new(name), local);
        id
    }

    /// # Panics
    ///
    /// Panics if `ty` was not returned by this builder. The same holds for
    /// every method below that takes a `TypeId`.
    pub fn set_base(&mut self, ty: TypeId, base: TypeId) -> &mut Self {
        self.type_mut(ty).base = Some(base);
        self
    }

    pub fn add_interface(&mut self, ty: TypeId, interface: TypeId) -> &mut Self {
        let data = self.type_mut(ty);
        if !data.interfaces.contains(&interface) {
            data.interfaces.push(interface);
        }
        self
    }

    pub fn add_property(&mut self, ty: TypeId, name: &str) -> MemberId {
        self.add_member(ty, MemberKind::Property, name, &[])
    }

    pub fn add_field(&mut self, ty: TypeId, name: &str) -> MemberId {
        self.add_member(ty, MemberKind::Field, name, &[])
    }

    /// Register a method (constructors are named `#ctor`).
    pub fn add_method(&mut self, ty: TypeId, name: &str, parameters: &[&str]) -> MemberId {
        self.add_member(ty, MemberKind::Method, name, parameters)
    }

    fn add_member(&mut self, ty: TypeId, kind: MemberKind, name: &str, parameters: &[&str]) -> MemberId {
        let data = self.type_mut(ty);
        let id = MemberId::new(ty, data.members.len() as u32);
        data.members.push(MemberData {
            id,
            kind,
            name: SmolStr::new(name),
            parameters: parameters.iter().map(|p| SmolStr::new(p)).collect(),
        });
        id
    }

    fn type_mut(&mut self, ty: TypeId) -> &mut TypeData {
        &mut self.assemblies[ty.assembly.index() as usize].types[ty.local as usize]
    }

    pub fn build(self) -> Arc<SymbolGraph> {
        let by_name = self
            .assemblies
            .iter()
            .map(|a| (a.name.clone(), a.id))
            .collect();
        Arc::new(SymbolGraph {
            assemblies: self.assemblies,
            by_name,
        })
    }
}

// ============================================================================
// GRAPH
// ============================================================================

/// Immutable registry of every assembly the engine knows about.
#[derive(Debug, Default)]
pub struct SymbolGraph {
    assemblies: Vec<AssemblyData>,
    by_name: FxHashMap<SmolStr, AssemblyId>,
}

impl SymbolGraph {
    pub fn assembly(&self, id: AssemblyId) -> Option<&AssemblyData> {
        self.assemblies.get(id.index() as usize)
    }

    pub fn assembly_by_name(&self, name: &str) -> Option<&AssemblyData> {
        self.by_name.get(name).and_then(|&id| self.assembly(id))
    }

    /// All assemblies, in registration order.
    pub fn assemblies(&self) -> impl Iterator<Item = &AssemblyData> {
        self.assemblies.iter()
    }

    pub fn ty(&self, id: TypeId) -> Option<&TypeData> {
        self.assembly(id.assembly)?.types.get(id.local as usize)
    }

    pub fn member(&self, id: MemberId) -> Option<&MemberData> {
        self.ty(id.declaring)?.members.get(id.local as usize)
    }

    /// Look up a type by full name within one assembly.
    pub fn find_type(&self, assembly: AssemblyId, name: &str) -> Option<TypeId> {
        let asm = self.assembly(assembly)?;
        asm.by_name.get(name).map(|&local| TypeId::new(assembly, local))
    }

    /// Look up a type in `preferred` first, then in every other assembly in
    /// registration order.
    pub fn find_type_anywhere(&self, preferred: AssemblyId, name: &str) -> Option<TypeId> {
        self.find_type(preferred, name).or_else(|| {
            self.assemblies
                .iter()
                .filter(|a| a.id != preferred)
                .find_map(|a| self.find_type(a.id, name))
        })
    }

    /// Members declared on `ty` itself with the given kind and name.
    pub fn declared_members<'a>(
        &'a self,
        ty: TypeId,
        kind: MemberKind,
        name: &'a str,
    ) -> impl Iterator<Item = &'a MemberData> + 'a {
        self.ty(ty)
            .into_iter()
            .flat_map(|t| t.members.iter())
            .filter(move |m| m.kind == kind && m.name == name)
    }

    /// Reflection-style lookup: `ty` first, then its base types.
    ///
    /// The returned id names the member on its true declaring type.
    pub fn find_member(&self, ty: TypeId, kind: MemberKind, name: &str) -> Option<MemberId> {
        std::iter::once(ty)
            .chain(self.base_chain(ty))
            .find_map(|t| self.declared_members(t, kind, name).next().map(|m| m.id))
    }

    /// Reflection-style method lookup with an exact parameter list.
    pub fn find_method<S: AsRef<str>>(&self, ty: TypeId, name: &str, parameters: &[S]) -> Option<MemberId> {
        std::iter::once(ty).chain(self.base_chain(ty)).find_map(|t| {
            self.declared_members(t, MemberKind::Method, name)
                .find(|m| m.matches_parameters(parameters))
                .map(|m| m.id)
        })
    }

    /// Ancestor types, nearest first. Stops on a cycle or a dangling id.
    pub fn base_chain(&self, ty: TypeId) -> BaseChain<'_> {
        BaseChain {
            graph: self,
            current: ty,
            visited: FxHashSet::default(),
        }
    }

    /// True if `ancestor` is `ty` or appears in its base chain.
    pub fn inherits_from(&self, ty: TypeId, ancestor: TypeId) -> bool {
        ty == ancestor || self.base_chain(ty).any(|t| t == ancestor)
    }

    /// Every interface `ty` implements, breadth-first in declaration order:
    /// own interfaces, their ancestors, then the base type's.
    pub fn all_interfaces(&self, ty: TypeId) -> IndexSet<TypeId> {
        let mut seen = IndexSet::new();
        for t in std::iter::once(ty).chain(self.base_chain(ty)) {
            let Some(data) = self.ty(t) else { break };
            let mut queue: Vec<TypeId> = data.interfaces.clone();
            let mut next = 0;
            while next < queue.len() {
                let interface = queue[next];
                next += 1;
                if interface == ty || !seen.insert(interface) {
                    continue;
                }
                if let Some(idata) = self.ty(interface) {
                    queue.extend(idata.interfaces.iter().copied());
                }
            }
        }
        seen
    }

    /// Interfaces implemented by `ty` that are not already implied by its
    /// base type.
    pub fn own_interfaces(&self, ty: TypeId) -> IndexSet<TypeId> {
        let mut all = self.all_interfaces(ty);
        if let Some(base) = self.ty(ty).and_then(|t| t.base) {
            let inherited = self.all_interfaces(base);
            all.retain(|i| !inherited.contains(i));
        }
        all
    }

    /// Every ancestor of `ty` in inheritance search order: the base chain,
    /// nearest first, then the interfaces each of `ty`, its base, its base's
    /// base and so on adds over its own base type.
    ///
    /// An interface is listed once, at the first type that introduces it.
    pub fn inheritance_order(&self, ty: TypeId) -> Vec<TypeId> {
        let bases: Vec<TypeId> = self.base_chain(ty).collect();
        let interfaces: Vec<TypeId> = std::iter::once(ty)
            .chain(bases.iter().copied())
            .flat_map(|t| self.own_interfaces(t))
            .collect();
        bases.into_iter().chain(interfaces).collect()
    }

    pub fn type_count(&self) -> usize {
        self.assemblies.iter().map(|a| a.types.len()).sum()
    }
}

/// Iterator over a type's ancestors.
pub struct BaseChain<'a> {
    graph: &'a SymbolGraph,
    current: TypeId,
    visited: FxHashSet<TypeId>,
}

impl Iterator for BaseChain<'_> {
    type Item = TypeId;

    fn next(&mut self) -> Option<TypeId> {
        self.visited.insert(self.current);
        let base = self.graph.ty(self.current)?.base?;
        if !self.visited.insert(base) {
            return None;
        }
        self.current = base;
        Some(base)
    }
}
