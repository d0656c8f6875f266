//! End-to-end resolution: registry, validation, binding, layer synthesis

use super::support::{write_file, G1_MANIFEST};
use extgen::generator::GeneratorRegistry;
use extgen::{
    ComponentCatalog, ComponentUse, ContextDescriptor, ContextId, ContextPlan, GenError,
    GenErrorKind, GenerationRequest, GeneratorDescriptor, GeneratorValidator, LayerSynthesizer,
    ProjectType, ResolutionEngine,
};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

#[test]
fn test_single_component_layer() {
    let temp = TempDir::new().unwrap();
    let manifest = write_file(temp.path(), "g1.generator.yml", G1_MANIFEST);
    let (registry, report) = GeneratorRegistry::load(&[manifest], true).unwrap();
    assert!(report.is_success());

    let components = ComponentCatalog::new().with_component("CompA", Some("G1"));
    let mut engine = ResolutionEngine::new(&registry, &components);
    let ctx = ContextDescriptor::new("ctxA", ProjectType::SingleCore);
    engine.register_context(&ctx).unwrap();
    engine.request(&ctx.id, &ComponentUse::new("CompA")).unwrap();

    let layer = engine.synthesize(&ctx.id).unwrap();
    assert_eq!(layer.len(), 1);
    assert_eq!(layer.generators[0].generator_id, "G1");
    assert_eq!(layer.generators[0].gen_dir, "CompA/gen");
    assert_eq!(layer.generators[0].import_file, "CompA/gen/ctxA.cgen.yml");
}

#[test]
fn test_mismatch_records_no_binding() {
    let registry = GeneratorRegistry::from_descriptors([
        GeneratorDescriptor::new("G1", "${comp}/gen", "gen run ${comp}"),
        GeneratorDescriptor::new("G2", "g2/${comp}", "g2 ${comp}"),
    ])
    .unwrap();
    let components = ComponentCatalog::new().with_component("CompA", Some("G1"));

    let validator = GeneratorValidator::new(&registry, &components);
    let err = validator
        .validate(&GenerationRequest::new("CompA", "G2", ProjectType::SingleCore))
        .unwrap_err();
    assert_eq!(err.kind(), GenErrorKind::Mismatch);

    let mut engine = ResolutionEngine::new(&registry, &components);
    let ctx = ContextDescriptor::new("ctxA", ProjectType::SingleCore);
    engine.register_context(&ctx).unwrap();
    let err = engine
        .request(&ctx.id, &ComponentUse::requesting("CompA", "G2"))
        .unwrap_err();
    assert!(matches!(err, GenError::Mismatch { .. }));
    assert!(engine.table().entries_for(&ctx.id).is_empty());
    assert!(!engine.table().contains_context(&ctx.id));
    assert_eq!(
        engine.synthesize(&ctx.id).unwrap_err().kind(),
        GenErrorKind::NotFound
    );
}

#[test]
fn test_layer_dedups_shared_directory_in_first_seen_order() {
    let registry = GeneratorRegistry::from_descriptors([
        GeneratorDescriptor::new("Shared", "shared/${project}", "s"),
        GeneratorDescriptor::new("PerComp", "${comp}/gen", "p"),
    ])
    .unwrap();
    let components = ComponentCatalog::new()
        .with_component("A", Some("Shared"))
        .with_component("B", Some("PerComp"))
        .with_component("C", Some("Shared"));

    let mut engine = ResolutionEngine::new(&registry, &components);
    let plans = vec![ContextPlan {
        descriptor: ContextDescriptor::new("app.Debug+Board", ProjectType::MultiCore),
        components: vec![
            ComponentUse::new("A"),
            ComponentUse::new("B"),
            ComponentUse::new("C"),
        ],
    }];
    let report = engine.resolve(&plans);
    assert!(report.is_clean());

    let ctx = ContextId::new("app.Debug+Board");
    assert_eq!(engine.table().entries_for(&ctx).len(), 3);

    let layer = LayerSynthesizer::new(engine.table()).synthesize(&ctx).unwrap();
    let pairs: Vec<_> = layer
        .generators
        .iter()
        .map(|e| (e.generator_id.as_str(), e.gen_dir.as_str()))
        .collect();
    assert_eq!(pairs, vec![("Shared", "shared/app"), ("PerComp", "B/gen")]);
    assert_eq!(report.layer(&ctx), Some(&layer));
}

#[test]
fn test_repeated_passes_are_idempotent() {
    let registry =
        GeneratorRegistry::from_descriptors([GeneratorDescriptor::new("G1", "${comp}/gen", "r")])
            .unwrap();
    let components = ComponentCatalog::new().with_component("CompA", Some("G1"));
    let plans = vec![ContextPlan {
        descriptor: ContextDescriptor::new("ctxA", ProjectType::SingleCore),
        components: vec![ComponentUse::new("CompA")],
    }];

    let mut engine = ResolutionEngine::new(&registry, &components);
    let first = engine.resolve(&plans);
    let second = engine.resolve(&plans);
    assert!(first.is_clean() && second.is_clean());
    assert_eq!(first.layers, second.layers);
    assert_eq!(engine.table().entries_for(&ContextId::new("ctxA")).len(), 1);
}

#[test]
fn test_partitioned_resolution_matches_sequential() {
    let registry = GeneratorRegistry::from_descriptors([GeneratorDescriptor::new(
        "G1",
        "out/${context}/${comp}",
        "r",
    )])
    .unwrap();
    let components = ComponentCatalog::new()
        .with_component("A", Some("G1"))
        .with_component("B", Some("G1"));
    let plans: Vec<ContextPlan> = ["c0", "c1", "c2", "c3"]
        .iter()
        .map(|id| ContextPlan {
            descriptor: ContextDescriptor::new(*id, ProjectType::MultiCore),
            components: vec![ComponentUse::new("A"), ComponentUse::new("B")],
        })
        .collect();

    let mut engine = ResolutionEngine::new(&registry, &components);
    let sequential = engine.resolve(&plans);
    let (table, parallel) = extgen::engine::resolve_partitioned(&registry, &components, &plans);

    assert!(parallel.is_clean());
    assert_eq!(sequential.layers, parallel.layers);
    let order: Vec<_> = table.all_contexts().map(ContextId::as_str).collect();
    assert_eq!(order, vec!["c0", "c1", "c2", "c3"]);
}
