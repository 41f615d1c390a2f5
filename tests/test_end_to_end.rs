//! End-to-end tests: symbol graph + XML file → rendered text.
//!
//! Two assemblies are registered. `Zoo.Model` documents animals and points
//! into `Zoo.Food`; `Zoo.Food` is loaded only when a reference needs it.

use std::sync::Arc;

use rstest::rstest;
use xmldoc::{
    AssemblyId, DocError, Documentation, DocumentationStore, FsDocSource, MemberId, MemorySource, RenderOptions,
    Symbol, SymbolGraph, SymbolGraphBuilder, TypeId, TypeKind,
};

const MODEL_XML: &str = r#"<?xml version="1.0"?>
<doc>
    <assembly><name>Zoo.Model</name></assembly>
    <members>
        <member name="T:Zoo.Model.Animal">
            <summary>Any animal kept at the zoo.</summary>
        </member>
        <member name="P:Zoo.Model.Animal.Name">
            <summary>Base summary.</summary>
        </member>
        <member name="P:Zoo.Model.Dog.Name">
            <inheritdoc/>
        </member>
        <member name="P:Zoo.Model.Dog.Age">
            <summary>Dog's Age</summary>
        </member>
        <member name="P:Zoo.Model.Dog.Legs">
            <inheritdoc/>
        </member>
        <member name="M:Zoo.Model.Dog.Eat(Zoo.Food.Bone)">
            <summary>Eats a <see cref="T:Zoo.Food.Bone"/>, never a <see cref="T:Zoo.Food.Sock"/>.</summary>
            <param name="bone">The <see cref="T:Zoo.Food.Bone"/> to eat.</param>
        </member>
        <member name="M:Zoo.Model.Dog.Fetch(System.Collections.Generic.List{System.String})">
            <summary>Fetches everything in <paramref name="items"/>.</summary>
        </member>
        <member name="F:Zoo.Model.Dog.MaxAge">
            <summary>See <see cref="T:Zoo.Model.Missing"/>.</summary>
        </member>
        <member name="T:Zoo.Model.Dog">
            <summary>See <see cref="T:Zoo.Model.Animal"/>.</summary>
        </member>
    </members>
</doc>"#;

const FOOD_XML: &str = r#"<doc>
    <assembly><name>Zoo.Food</name></assembly>
    <members>
        <member name="T:Zoo.Food.Bone"><summary>Something to chew.</summary></member>
    </members>
</doc>"#;

struct Zoo {
    graph: Arc<SymbolGraph>,
    model: AssemblyId,
    food: AssemblyId,
    animal: TypeId,
    dog: TypeId,
    cat: TypeId,
    bone: TypeId,
    animal_name: MemberId,
    ianimal_legs: MemberId,
}

fn zoo() -> Zoo {
    let mut b = SymbolGraphBuilder::new();
    let model = b.add_assembly("Zoo.Model", "Zoo.Model.dll");
    let food = b.add_assembly("Zoo.Food", "Zoo.Food.dll");

    let bone = b.add_type(food, "Zoo.Food.Bone", TypeKind::Class);
    b.add_type(food, "Zoo.Food.Sock", TypeKind::Class);

    let ianimal = b.add_type(model, "Zoo.Model.IAnimal", TypeKind::Interface);
    let animal = b.add_type(model, "Zoo.Model.Animal", TypeKind::Class);
    let dog = b.add_type(model, "Zoo.Model.Dog", TypeKind::Class);
    let cat = b.add_type(model, "Zoo.Model.Cat", TypeKind::Class);
    b.set_base(dog, animal).add_interface(dog, ianimal);
    b.set_base(cat, animal);

    let ianimal_legs = b.add_property(ianimal, "Legs");
    let animal_name = b.add_property(animal, "Name");
    b.add_property(dog, "Name");
    b.add_property(dog, "Age");
    b.add_property(dog, "Legs");
    b.add_field(dog, "MaxAge");
    b.add_method(dog, "Eat", &["Zoo.Food.Bone"]);
    b.add_method(dog, "Fetch", &["System.Collections.Generic.List{System.String}"]);
    b.add_property(cat, "Whiskers");

    Zoo {
        graph: b.build(),
        model,
        food,
        animal,
        dog,
        cat,
        bone,
        animal_name,
        ianimal_legs,
    }
}

fn store(zoo: &Zoo) -> DocumentationStore {
    let source = MemorySource::new()
        .with("Zoo.Model", MODEL_XML)
        .with("Zoo.Food", FOOD_XML);
    DocumentationStore::new(Arc::clone(&zoo.graph), source)
}

fn render(store: &DocumentationStore, symbol: impl Into<Symbol>) -> String {
    store.render_symbol(symbol, RenderOptions::default()).unwrap()
}

#[test]
fn test_property_summary() {
    let zoo = zoo();
    let store = store(&zoo);
    let age = store.property(zoo.dog, "Age").unwrap().unwrap();
    assert_eq!(store.render(&age.into(), RenderOptions::default()).unwrap(), "Dog's Age");
}

#[test]
fn test_inheritdoc_uses_base_member() {
    let zoo = zoo();
    let store = store(&zoo);
    let name = store.property(zoo.dog, "Name").unwrap().unwrap();
    let doc = Documentation::Member(name);

    let inherited = store.inherited(&doc).unwrap().unwrap();
    assert_eq!(inherited.target, Some(Symbol::Member(zoo.animal_name)));
    assert_eq!(store.render(&doc, RenderOptions::default()).unwrap(), "Base summary.");
}

#[test]
fn test_inheritdoc_from_interface_without_docs_renders_empty() {
    let zoo = zoo();
    let store = store(&zoo);
    let legs = store.property(zoo.dog, "Legs").unwrap().unwrap();
    let doc = Documentation::Member(legs);

    // IAnimal.Legs exists but has no entry, so nothing is inherited.
    assert!(store.member_doc(zoo.ianimal_legs).unwrap().is_none());
    assert!(store.inherited(&doc).unwrap().is_none());
    assert_eq!(store.render(&doc, RenderOptions::default()).unwrap(), "");
}

#[rstest]
#[case(true, "See Animal.")]
#[case(false, "See Zoo.Model.Animal.")]
fn test_type_reference(#[case] short: bool, #[case] expected: &str) {
    let zoo = zoo();
    let store = store(&zoo);
    let options = RenderOptions::default().with_short_type_names(short);
    assert_eq!(store.render_symbol(zoo.dog, options).unwrap(), expected);
}

#[test]
fn test_unresolved_reference_leaves_surrounding_text() {
    let zoo = zoo();
    let store = store(&zoo);
    let max_age = store.field(zoo.dog, "MaxAge").unwrap().unwrap();
    assert_eq!(store.render(&max_age.into(), RenderOptions::default()).unwrap(), "See .");
}

#[test]
fn test_cross_assembly_reference_loads_on_demand() {
    let zoo = zoo();
    let store = store(&zoo);
    let eat = store.method(zoo.dog, "Eat", &["Zoo.Food.Bone"]).unwrap().unwrap();
    let doc = Documentation::Member(eat);

    assert!(!store.is_loaded(zoo.food));
    let refs = store.references(&doc).unwrap();
    assert!(store.is_loaded(zoo.food));

    // Two `see` elements name the bone; it is resolved once.
    assert_eq!(refs.len(), 2);
    let bone = &refs["T:Zoo.Food.Bone"];
    assert_eq!(bone.target, Some(Symbol::Type(zoo.bone)));
    assert!(bone.documented);
    // Sock is registered but undocumented.
    assert!(!refs["T:Zoo.Food.Sock"].documented);

    assert_eq!(
        store.render(&doc, RenderOptions::default().with_single_line(true)).unwrap(),
        "Eats a Bone, never a Sock. Parameter bone: The Bone to eat."
    );
}

#[test]
fn test_generic_parameter_overload() {
    let zoo = zoo();
    let store = store(&zoo);
    let fetch = store
        .method(zoo.dog, "Fetch", &["System.Collections.Generic.List{System.String}"])
        .unwrap()
        .unwrap();
    assert_eq!(
        store.render(&fetch.into(), RenderOptions::default()).unwrap(),
        "Fetches everything in items."
    );
}

#[test]
fn test_undocumented_symbols_render_empty() {
    let zoo = zoo();
    let store = store(&zoo);
    assert_eq!(render(&store, zoo.cat), "");
    let whiskers = zoo.graph.ty(zoo.cat).unwrap().members()[0].id;
    assert_eq!(render(&store, whiskers), "");
}

#[test]
fn test_render_is_idempotent() {
    let zoo = zoo();
    let store = store(&zoo);
    let eat = store.method(zoo.dog, "Eat", &["Zoo.Food.Bone"]).unwrap().unwrap();
    let doc = Documentation::Member(eat);
    let first = store.render(&doc, RenderOptions::default()).unwrap();
    let second = store.render(&doc, RenderOptions::default()).unwrap();
    assert_eq!(first, second);
    assert!(std::ptr::eq(
        store.references(&doc).unwrap(),
        store.references(&doc).unwrap()
    ));
}

#[test]
fn test_inherited_member_normalized_to_declaring_type() {
    let zoo = zoo();
    let store = store(&zoo);
    let via_cat = store.member_doc_on(zoo.cat, zoo.animal_name).unwrap().unwrap();
    assert_eq!(via_cat.declaring_type(), zoo.animal);

    let err = store.member_doc_on(zoo.animal, zoo.ianimal_legs).unwrap_err();
    assert!(matches!(err, DocError::OwnershipMismatch { .. }));
}

#[test]
fn test_missing_reference_assembly_degrades() {
    let zoo = zoo();
    // Only the model documentation is available.
    let store = DocumentationStore::new(Arc::clone(&zoo.graph), MemorySource::new().with("Zoo.Model", MODEL_XML));
    let eat = store.method(zoo.dog, "Eat", &["Zoo.Food.Bone"]).unwrap().unwrap();
    let doc = Documentation::Member(eat);

    assert_eq!(
        store.render(&doc, RenderOptions::default().with_single_line(true)).unwrap(),
        "Eats a Bone, never a Sock. Parameter bone: The Bone to eat."
    );
    assert!(!store.references(&doc).unwrap()["T:Zoo.Food.Bone"].documented);
    assert!(store.assembly(zoo.food).unwrap_err().is_not_found());
}

#[test]
fn test_loads_from_files_next_to_modules() {
    let zoo = zoo();
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("Zoo.Model.xml"), MODEL_XML).unwrap();

    let store = DocumentationStore::new(Arc::clone(&zoo.graph), FsDocSource::new(dir.path()));
    assert_eq!(render(&store, zoo.animal), "Any animal kept at the zoo.");
    assert_eq!(store.assembly(zoo.model).unwrap().type_count(), 2);

    let err = store.assembly(zoo.food).unwrap_err();
    assert!(matches!(err, DocError::DocFileNotFound { ref path, .. } if path.ends_with("Zoo.Food.xml")));
}
