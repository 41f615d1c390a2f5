//! Symbol index: mapping `<member>` entries onto the symbol graph.
//!
//! Building runs in two passes over the `<members>` element: type entries
//! (`T:`) first, then property, field and method entries, each attached to
//! its declaring type's [`TypeDocumentation`]. A member of a type without a
//! `T:` entry gets a placeholder type entry with no node.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use tracing::{debug, trace, warn};

use crate::base::{AssemblyId, MemberId, MemberKind, TypeId};
use crate::error::{DocError, DocResult};
use crate::hir::docs::{AssemblyDocumentation, MemberDocumentation, TypeDocumentation};
use crate::hir::symbols::{AssemblyData, SymbolGraph};
use crate::syntax::cref::{MemberIdentifier, RefPrefix};
use crate::syntax::{DocElement, DocNode};

/// Build the documentation of `assembly` from its parsed `<doc>` root.
pub fn build_assembly(graph: &SymbolGraph, assembly: AssemblyId, root: DocElement) -> DocResult<AssemblyDocumentation> {
    let asm = graph.assembly(assembly).ok_or(DocError::UnknownAssembly(assembly))?;

    if root.name != "doc" {
        return Err(DocError::Xml {
            assembly: asm.name.clone(),
            message: format!("root element is <{}>, expected <doc>", root.name),
        });
    }

    if let Some(declared) = root.child("assembly").and_then(|a| a.child("name")) {
        let declared = declared.inner_text();
        if declared.trim() != asm.name {
            warn!(
                assembly = %asm.name,
                declared = declared.trim(),
                "documentation file names a different assembly"
            );
        }
    }

    let mut type_entries = Vec::new();
    let mut member_entries = Vec::new();
    for node in root.children {
        let DocNode::Element(members) = node else { continue };
        if members.name != "members" {
            continue;
        }
        for node in members.children {
            let DocNode::Element(entry) = node else { continue };
            if entry.name != "member" {
                continue;
            }
            let Some(name) = entry.attr("name").map(SmolStr::new) else {
                trace!(assembly = %asm.name, "skipping <member> without a name");
                continue;
            };
            match RefPrefix::classify(&name) {
                Some(RefPrefix::Type) => type_entries.push((name, entry)),
                Some(_) => member_entries.push((name, entry)),
                None => trace!(assembly = %asm.name, entry = %name, "skipping unsupported entry"),
            }
        }
    }

    let mut builder = IndexBuilder {
        graph,
        asm,
        types: FxHashMap::default(),
    };
    for (name, entry) in type_entries {
        builder.add_type(&name, entry)?;
    }
    for (name, entry) in member_entries {
        builder.add_member(&name, entry)?;
    }

    let docs = builder.finish();
    debug!(
        assembly = %docs.name,
        types = docs.type_count(),
        members = docs.member_count(),
        "indexed assembly documentation"
    );
    Ok(docs)
}

struct IndexBuilder<'a> {
    graph: &'a SymbolGraph,
    asm: &'a AssemblyData,
    types: FxHashMap<TypeId, TypeDocumentation>,
}

impl IndexBuilder<'_> {
    fn add_type(&mut self, name: &str, entry: DocElement) -> DocResult<()> {
        let id = MemberIdentifier::parse(name)?;
        let ty = self.resolve_type(&id)?;
        if self.types.contains_key(&ty) {
            return Err(DocError::DuplicateType(id.type_name));
        }
        self.types.insert(ty, TypeDocumentation::new(ty, Some(entry)));
        Ok(())
    }

    fn add_member(&mut self, name: &str, entry: DocElement) -> DocResult<()> {
        let id = MemberIdentifier::parse(name)?;
        let ty = self.resolve_type(&id)?;
        let member_name = id.member_name.as_deref().unwrap_or_default();

        let (member, kind) = match id.prefix {
            RefPrefix::Property | RefPrefix::Field => {
                let kind = if id.prefix == RefPrefix::Property {
                    MemberKind::Property
                } else {
                    MemberKind::Field
                };
                let member = self
                    .graph
                    .declared_members(ty, kind, member_name)
                    .next()
                    .ok_or_else(|| DocError::UnknownMember {
                        ty: id.type_name.clone(),
                        member: member_name.to_string(),
                    })?;
                (member.id, kind)
            }
            RefPrefix::Method => match self.resolve_overload(ty, &id, name)? {
                Some(member) => (member, MemberKind::Method),
                None => return Ok(()),
            },
            // Type entries never reach this point; they are partitioned out first.
            RefPrefix::Type => return Ok(()),
        };

        let type_doc = self
            .types
            .entry(ty)
            .or_insert_with(|| TypeDocumentation::new(ty, None));
        if !type_doc.insert_member(MemberDocumentation::new(member, kind, Some(entry))) {
            warn!(assembly = %self.asm.name, entry = name, "duplicate member entry ignored");
        }
        Ok(())
    }

    /// Pick the overload whose parameter types match the entry positionally.
    ///
    /// `Ok(None)` when no overload matches; the entry stays undocumented.
    fn resolve_overload(&self, ty: TypeId, id: &MemberIdentifier, name: &str) -> DocResult<Option<MemberId>> {
        let member_name = id.member_name.as_deref().unwrap_or_default();
        let candidates: Vec<_> = self
            .graph
            .declared_members(ty, MemberKind::Method, member_name)
            .collect();
        if candidates.is_empty() {
            trace!(assembly = %self.asm.name, entry = name, "no method with this name");
            return Ok(None);
        }

        let matching: Vec<_> = candidates
            .iter()
            .filter(|m| m.matches_parameters(&id.parameters))
            .collect();
        match matching.as_slice() {
            [] => {
                trace!(assembly = %self.asm.name, entry = name, "no overload matches the parameter list");
                Ok(None)
            }
            [single] => Ok(Some(single.id)),
            many => Err(DocError::AmbiguousOverload {
                reference: name.to_string(),
                candidates: many.len(),
            }),
        }
    }

    fn resolve_type(&self, id: &MemberIdentifier) -> DocResult<TypeId> {
        self.graph
            .find_type(self.asm.id, &id.type_name)
            .ok_or_else(|| DocError::UnknownType {
                assembly: self.asm.name.clone(),
                name: id.type_name.to_string(),
            })
    }

    fn finish(self) -> AssemblyDocumentation {
        let types = self
            .types
            .into_iter()
            .map(|(ty, doc)| (ty, Arc::new(doc)))
            .collect();
        AssemblyDocumentation::new(self.asm.id, self.asm.name.clone(), types)
    }
}
