//! Cross-reference resolution for `cref` attributes.
//!
//! Every element of an entry carrying a `cref` is collected, keyed by its
//! literal token so repeated references resolve once. A token that does not
//! parse or names nothing in the graph is kept with no target; only an
//! ambiguous member match is an error.
//!
//! Resolution only asks whether the target *has* documentation. It never
//! resolves the target's own references, so cyclic `<see>` graphs are fine.

use smol_str::SmolStr;
use tracing::trace;

use crate::base::{AssemblyId, MemberKind, Symbol, TypeId};
use crate::error::{DocError, DocResult};
use crate::hir::docs::{Documentation, DocumentationReference, ReferenceMap};
use crate::hir::store::DocumentationStore;
use crate::hir::symbols::{MemberData, SymbolGraph};
use crate::syntax::cref::{MemberIdentifier, RefPrefix};

pub(crate) fn resolve(store: &DocumentationStore, doc: &Documentation) -> DocResult<ReferenceMap> {
    let mut references = ReferenceMap::default();
    let Some(node) = doc.node() else {
        return Ok(references);
    };
    let home = doc.symbol().assembly();

    for element in node.descendants() {
        let Some(token) = element.attr("cref") else {
            continue;
        };
        if references.contains_key(token) {
            continue;
        }

        let reference = match MemberIdentifier::parse(token) {
            Ok(id) => match resolve_symbol(store.graph(), home, &id, token)? {
                Some(target) => DocumentationReference {
                    origin: Some(element.clone()),
                    target: Some(target),
                    documented: store.get_tolerant(target).is_some(),
                },
                None => {
                    trace!(token, "reference names no registered symbol");
                    DocumentationReference::unresolved(element.clone())
                }
            },
            Err(e) => {
                trace!(token, error = %e, "skipping unparsable reference");
                DocumentationReference::unresolved(element.clone())
            }
        };
        references.insert(SmolStr::new(token), reference);
    }
    Ok(references)
}

/// Resolve a parsed token against the graph, `home` assembly first.
pub(crate) fn resolve_symbol(
    graph: &SymbolGraph,
    home: AssemblyId,
    id: &MemberIdentifier,
    token: &str,
) -> DocResult<Option<Symbol>> {
    let Some(ty) = graph.find_type_anywhere(home, &id.type_name) else {
        return Ok(None);
    };
    let Some(member) = &id.member_name else {
        return Ok(Some(Symbol::Type(ty)));
    };

    let kind = match id.prefix {
        RefPrefix::Property => MemberKind::Property,
        RefPrefix::Field => MemberKind::Field,
        RefPrefix::Method => MemberKind::Method,
        RefPrefix::Type => return Ok(Some(Symbol::Type(ty))),
    };

    // Nearest type in the chain that declares a match wins.
    for owner in std::iter::once(ty).chain(graph.base_chain(ty)) {
        let candidates = matching_members(graph, owner, kind, member, &id.parameters);
        match candidates.as_slice() {
            [] => continue,
            [only] => return Ok(Some(Symbol::Member(only.id))),
            many => {
                return Err(DocError::AmbiguousOverload {
                    reference: token.to_string(),
                    candidates: many.len(),
                });
            }
        }
    }
    Ok(None)
}

fn matching_members<'a>(
    graph: &'a SymbolGraph,
    owner: TypeId,
    kind: MemberKind,
    name: &'a str,
    parameters: &[SmolStr],
) -> Vec<&'a MemberData> {
    let named: Vec<_> = graph.declared_members(owner, kind, name).collect();
    if kind != MemberKind::Method {
        return named;
    }
    let exact: Vec<_> = named
        .iter()
        .copied()
        .filter(|m| m.matches_parameters(parameters))
        .collect();
    // `M:Ns.T.Run` without a list also names a lone overload by name.
    if exact.is_empty() && parameters.is_empty() {
        return named;
    }
    exact
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::MemberId;
    use crate::hir::symbols::{SymbolGraphBuilder, TypeKind};
    use crate::project::MemorySource;

    const ZOO: &str = r#"<doc><members>
        <member name="T:Zoo.Dog">
            <summary>See <see cref="T:Zoo.Animal"/> and <see cref="T:Zoo.Animal"/>.</summary>
            <remarks><para>Also <seealso cref="P:Zoo.Dog.Name"/> <see cref="M:Zoo.Dog.Bark(System.Int32)"/>
            <see cref="T:Zoo.Missing"/> <see cref="N:Zoo"/> <see cref="T:Food.Bone"/></para></remarks>
        </member>
        <member name="T:Zoo.Cat"><summary><see cref="M:Zoo.Cat.Eat"/></summary></member>
        <member name="T:Zoo.Animal"><summary>An animal.</summary></member>
    </members></doc>"#;

    struct Fixture {
        store: DocumentationStore,
        animal: TypeId,
        dog: TypeId,
        cat: TypeId,
        name: MemberId,
        bark_int: MemberId,
        bone: TypeId,
    }

    fn fixture() -> Fixture {
        let mut b = SymbolGraphBuilder::new();
        let zoo = b.add_assembly("Zoo", "Zoo.dll");
        let food = b.add_assembly("Food", "Food.dll");
        let animal = b.add_type(zoo, "Zoo.Animal", TypeKind::Class);
        let dog = b.add_type(zoo, "Zoo.Dog", TypeKind::Class);
        let cat = b.add_type(zoo, "Zoo.Cat", TypeKind::Class);
        let bone = b.add_type(food, "Food.Bone", TypeKind::Class);
        b.set_base(dog, animal);
        let name = b.add_property(animal, "Name");
        b.add_method(dog, "Bark", &[]);
        let bark_int = b.add_method(dog, "Bark", &["System.Int32"]);
        b.add_method(cat, "Eat", &["System.String"]);
        b.add_method(cat, "Eat", &["System.Int32"]);

        // Food has no documentation file at all.
        let store = DocumentationStore::new(b.build(), MemorySource::new().with("Zoo", ZOO));
        Fixture {
            store,
            animal,
            dog,
            cat,
            name,
            bark_int,
            bone,
        }
    }

    fn type_doc(f: &Fixture, ty: TypeId) -> Documentation {
        Documentation::Type(f.store.type_doc(ty).unwrap().unwrap())
    }

    #[test]
    fn test_references_deduplicated_in_order() {
        let f = fixture();
        let doc = type_doc(&f, f.dog);
        let refs = f.store.references(&doc).unwrap();
        let tokens: Vec<_> = refs.keys().map(SmolStr::as_str).collect();
        assert_eq!(
            tokens,
            vec![
                "T:Zoo.Animal",
                "P:Zoo.Dog.Name",
                "M:Zoo.Dog.Bark(System.Int32)",
                "T:Zoo.Missing",
                "N:Zoo",
                "T:Food.Bone",
            ]
        );
    }

    #[test]
    fn test_resolved_targets() {
        let f = fixture();
        let doc = type_doc(&f, f.dog);
        let refs = f.store.references(&doc).unwrap();

        let animal = &refs["T:Zoo.Animal"];
        assert_eq!(animal.target, Some(Symbol::Type(f.animal)));
        assert!(animal.documented);

        // Inherited member normalized to its declaring type, undocumented.
        let name = &refs["P:Zoo.Dog.Name"];
        assert_eq!(name.target, Some(Symbol::Member(f.name)));
        assert!(!name.documented);

        assert_eq!(refs["M:Zoo.Dog.Bark(System.Int32)"].target, Some(Symbol::Member(f.bark_int)));
    }

    #[test]
    fn test_unresolvable_references_kept_without_target() {
        let f = fixture();
        let doc = type_doc(&f, f.dog);
        let refs = f.store.references(&doc).unwrap();
        assert!(refs["T:Zoo.Missing"].target.is_none());
        assert!(refs["N:Zoo"].target.is_none());
        assert!(refs["N:Zoo"].origin.is_some());
    }

    #[test]
    fn test_cross_assembly_with_missing_file_degrades() {
        let f = fixture();
        let doc = type_doc(&f, f.dog);
        let bone = &f.store.references(&doc).unwrap()["T:Food.Bone"];
        assert_eq!(bone.target, Some(Symbol::Type(f.bone)));
        assert!(!bone.documented);
        assert!(f.store.is_loaded(f.bone.assembly));
    }

    #[test]
    fn test_ambiguous_overload_is_error() {
        let f = fixture();
        let doc = type_doc(&f, f.cat);
        let err = f.store.references(&doc).unwrap_err();
        assert!(matches!(err, DocError::AmbiguousOverload { candidates: 2, .. }));
    }

    #[test]
    fn test_parameterless_token_prefers_exact_overload() {
        let f = fixture();
        let graph = f.store.graph();
        let id = MemberIdentifier::parse("M:Zoo.Dog.Bark").unwrap();
        let symbol = resolve_symbol(graph, f.dog.assembly, &id, "M:Zoo.Dog.Bark").unwrap();
        let Some(Symbol::Member(bark)) = symbol else {
            panic!("expected a member, got {symbol:?}");
        };
        assert!(graph.member(bark).unwrap().parameters.is_empty());
    }
}
