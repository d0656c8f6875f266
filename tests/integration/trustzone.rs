//! TrustZone sub-contexts bind the same generator into separate directories

use extgen::generator::GeneratorRegistry;
use extgen::{
    ComponentCatalog, ComponentUse, ContextDescriptor, ContextPlan, GeneratorDescriptor,
    ProjectType, ResolutionEngine,
};

#[test]
fn test_secure_and_non_secure_halves_do_not_conflict() {
    let registry = GeneratorRegistry::from_descriptors([GeneratorDescriptor::new(
        "TZGen",
        "generated/${security}",
        "tzgen --target ${security} -o ${gen-dir}",
    )])
    .unwrap();
    let components = ComponentCatalog::new().with_component("Device:Startup", Some("TZGen"));
    let (secure, non_secure) =
        ContextDescriptor::trustzone_pair("app_s.Debug+MCU", "app_ns.Debug+MCU");

    let plans = vec![
        ContextPlan {
            descriptor: secure.clone(),
            components: vec![ComponentUse::new("Device:Startup")],
        },
        ContextPlan {
            descriptor: non_secure.clone(),
            components: vec![ComponentUse::new("Device:Startup")],
        },
    ];
    let mut engine = ResolutionEngine::new(&registry, &components);
    let report = engine.resolve(&plans);
    assert!(report.is_clean(), "failures: {:?}", report.failures);

    let secure_layer = report.layer(&secure.id).unwrap();
    let non_secure_layer = report.layer(&non_secure.id).unwrap();
    assert_eq!(secure_layer.generators[0].gen_dir, "generated/secure");
    assert_eq!(non_secure_layer.generators[0].gen_dir, "generated/non-secure");
    assert_eq!(
        secure_layer.generators[0].import_file,
        "generated/secure/app_s.cgen.yml"
    );

    let calls = engine.generator_calls().unwrap();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].command, "tzgen --target secure -o generated/secure");
    assert_eq!(
        calls[1].command,
        "tzgen --target non-secure -o generated/non-secure"
    );
}

#[test]
fn test_security_qualifier_on_single_core_is_rejected() {
    let registry =
        GeneratorRegistry::from_descriptors([GeneratorDescriptor::new("G", "d", "r")]).unwrap();
    let components = ComponentCatalog::new().with_component("C", Some("G"));
    let (mut bogus, _) = ContextDescriptor::trustzone_pair("x", "y");
    bogus.project_type = ProjectType::SingleCore;

    let mut engine = ResolutionEngine::new(&registry, &components);
    let report = engine.resolve(&[ContextPlan {
        descriptor: bogus,
        components: vec![ComponentUse::new("C")],
    }]);
    assert_eq!(report.failures.len(), 1);
    assert!(report.failures[0].component.is_none());
    assert!(report.layers.is_empty());
}
