//! Resolution engine
//!
//! For each context: validate every generation request, resolve the output
//! directory from the generator's template, bind it, and finally synthesize
//! the context's generated layer.
//!
//! The engine borrows both the registry and the upstream component metadata
//! for `'a`; it must not outlive the parser that produced that metadata.
//! Contexts never share mutable state, so [`resolve_partitioned`] can resolve
//! them on separate threads and merge the partitions afterwards.

use crate::binding::{BindOutcome, ContextBindingTable};
use crate::component::ComponentMetadata;
use crate::context::{ContextDescriptor, ContextId};
use crate::error::{ConflictKind, GenError, NotFoundKind};
use crate::generator::template::{render, TemplateVars, VAR_GEN_DIR};
use crate::generator::GeneratorRegistry;
use crate::layer::{GeneratedLayer, LayerSynthesizer};
use crate::platform;
use crate::runner::{GeneratorCall, GeneratorRunner, RunOutcome};
use crate::validator::{GenerationRequest, GeneratorValidator, ValidatedRequest};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// A component that needs generation inside a context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentUse {
    pub component: String,
    /// Generator requested on the component's behalf; defaults to its own declaration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generator: Option<String>,
}

impl ComponentUse {
    pub fn new(component: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            generator: None,
        }
    }

    pub fn requesting(component: impl Into<String>, generator: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            generator: Some(generator.into()),
        }
    }
}

/// One context and the components to resolve in it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextPlan {
    #[serde(flatten)]
    pub descriptor: ContextDescriptor,
    #[serde(default)]
    pub components: Vec<ComponentUse>,
}

/// A failure recorded while resolving; the rest of the pass carries on
#[derive(Debug)]
pub struct ResolutionFailure {
    pub context: ContextId,
    pub component: Option<String>,
    pub error: GenError,
}

/// Layers of every context that ended up with bindings, plus all failures
#[derive(Debug, Default)]
pub struct ResolutionReport {
    pub layers: Vec<GeneratedLayer>,
    pub failures: Vec<ResolutionFailure>,
}

impl ResolutionReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn layer(&self, context: &ContextId) -> Option<&GeneratedLayer> {
        self.layers.iter().find(|l| &l.context == context)
    }
}

/// Drives validation, binding and layer synthesis for a resolution pass
pub struct ResolutionEngine<'a, M: ComponentMetadata + ?Sized> {
    validator: GeneratorValidator<'a, M>,
    contexts: IndexMap<ContextId, ContextDescriptor>,
    table: ContextBindingTable,
}

impl<'a, M: ComponentMetadata + ?Sized> ResolutionEngine<'a, M> {
    pub fn new(registry: &'a GeneratorRegistry, components: &'a M) -> Self {
        Self {
            validator: GeneratorValidator::new(registry, components),
            contexts: IndexMap::new(),
            table: ContextBindingTable::new(),
        }
    }

    pub fn validator(&self) -> &GeneratorValidator<'a, M> {
        &self.validator
    }

    pub fn table(&self) -> &ContextBindingTable {
        &self.table
    }

    pub fn into_table(self) -> ContextBindingTable {
        self.table
    }

    /// Register a context. Re-registering an identical descriptor is a no-op;
    /// a different one (e.g. another project type) is a conflict.
    pub fn register_context(&mut self, descriptor: &ContextDescriptor) -> Result<(), GenError> {
        if !descriptor.is_consistent() {
            return Err(GenError::Conflict(ConflictKind::ContextDescriptor {
                context: descriptor.id.to_string(),
                reason: format!(
                    "has a security qualifier but is a {} project",
                    descriptor.project_type
                ),
            }));
        }
        if let Some(existing) = self.contexts.get(&descriptor.id) {
            if existing != descriptor {
                return Err(GenError::Conflict(ConflictKind::ContextDescriptor {
                    context: descriptor.id.to_string(),
                    reason: format!(
                        "is already registered as a {} project with different settings",
                        existing.project_type
                    ),
                }));
            }
            return Ok(());
        }
        self.contexts
            .insert(descriptor.id.clone(), descriptor.clone());
        Ok(())
    }

    pub fn context(&self, id: &ContextId) -> Result<&ContextDescriptor, GenError> {
        self.contexts
            .get(id)
            .ok_or_else(|| GenError::not_found(NotFoundKind::Context, id.as_str()))
    }

    /// Output directory of a validated request inside `context`.
    pub fn resolve_gen_dir(
        &self,
        context: &ContextId,
        request: &ValidatedRequest,
    ) -> Result<String, GenError> {
        let descriptor = self.context(context)?;
        let template = self
            .validator
            .registry()
            .gen_dir_template(request.generator_id())?;
        render(
            template,
            &TemplateVars::for_component(descriptor, request.component_id()),
        )
    }

    /// Validate, resolve and bind one component in a registered context.
    pub fn request(
        &mut self,
        context: &ContextId,
        component: &ComponentUse,
    ) -> Result<BindOutcome, GenError> {
        let project_type = self.context(context)?.project_type;
        let components = self.validator.components();
        let requested = component
            .generator
            .as_deref()
            .or_else(|| components.required_generator(&component.component));
        let generator_id = match requested {
            Some(id) => id,
            None if !components.contains(&component.component) => {
                return Err(GenError::not_found(
                    NotFoundKind::Component,
                    component.component.as_str(),
                ))
            }
            None => {
                return Err(GenError::Mismatch {
                    component: component.component.clone(),
                    requested: None,
                    declared: None,
                })
            }
        };

        let validated = self.validator.validate(&GenerationRequest::new(
            &component.component,
            generator_id,
            project_type,
        ))?;
        let gen_dir = self.resolve_gen_dir(context, &validated)?;
        self.table.bind(context, &validated, gen_dir)
    }

    /// Generated layer of one context.
    pub fn synthesize(&self, context: &ContextId) -> Result<GeneratedLayer, GenError> {
        LayerSynthesizer::new(&self.table).synthesize(context)
    }

    /// Resolve every plan, collecting failures instead of stopping at them.
    pub fn resolve(&mut self, plans: &[ContextPlan]) -> ResolutionReport {
        let mut report = ResolutionReport::default();

        for plan in plans {
            let context = &plan.descriptor.id;
            if let Err(error) = self.register_context(&plan.descriptor) {
                warn!(context = %context, error = %error, "Context skipped");
                report.failures.push(ResolutionFailure {
                    context: context.clone(),
                    component: None,
                    error,
                });
                continue;
            }

            for component in &plan.components {
                if let Err(error) = self.request(context, component) {
                    warn!(
                        context = %context,
                        component = %component.component,
                        error = %error,
                        "Generator request rejected"
                    );
                    report.failures.push(ResolutionFailure {
                        context: context.clone(),
                        component: Some(component.component.clone()),
                        error,
                    });
                }
            }

            if self.table.contains_context(context) {
                match self.synthesize(context) {
                    Ok(layer) => report.layers.push(layer),
                    Err(error) => report.failures.push(ResolutionFailure {
                        context: context.clone(),
                        component: None,
                        error,
                    }),
                }
            } else {
                debug!(context = %context, "No generator bindings, no generated layer");
            }
        }

        info!(
            contexts = plans.len(),
            layers = report.layers.len(),
            failures = report.failures.len(),
            "Resolution pass finished"
        );
        report
    }

    /// One call per distinct (generator, directory) pair, in first-bound order.
    pub fn generator_calls(&self) -> Result<Vec<GeneratorCall>, GenError> {
        let dir_mode = platform::generated_dir_mode();
        let mut calls = Vec::new();

        for (generator_id, dirs) in self.table.usage_by_generator() {
            let run_cmd = self.validator.registry().run_cmd_template(&generator_id)?;
            for (gen_dir, contexts) in dirs {
                let first_context = &contexts[0];
                let descriptor = self.context(first_context)?;
                let component = self
                    .table
                    .entries_for(first_context)
                    .iter()
                    .find(|e| e.generator_id == generator_id && e.gen_dir == gen_dir)
                    .map(|e| e.component_id.as_str())
                    .unwrap_or_default();

                let mut vars = TemplateVars::for_component(descriptor, component);
                vars.set(VAR_GEN_DIR, gen_dir.as_str());
                calls.push(GeneratorCall {
                    generator_id: generator_id.clone(),
                    command: render(run_cmd, &vars)?,
                    gen_dir,
                    contexts,
                    dir_mode,
                });
            }
        }
        Ok(calls)
    }

    /// Hand every call to `runner`; non-zero exit codes are reported, not raised.
    pub fn run_generators(
        &self,
        runner: &mut dyn GeneratorRunner,
    ) -> Result<Vec<RunOutcome>, GenError> {
        let mut outcomes = Vec::new();
        for call in self.generator_calls()? {
            call.preflight();
            let exit_code = runner.run(&call)?;
            if exit_code != 0 {
                warn!(
                    generator = %call.generator_id,
                    gen_dir = %call.gen_dir,
                    exit_code,
                    "Generator failed"
                );
            }
            outcomes.push(RunOutcome { call, exit_code });
        }
        Ok(outcomes)
    }
}

/// Resolve contexts on separate threads against a shared read-only registry,
/// then merge the per-context partitions.
///
/// All plans naming the same context go to one worker and one engine, so a
/// context keeps a single descriptor and project type exactly as in a
/// sequential pass. Layers and failures come back in plan order. A partition
/// the merged table rejects contributes no layers.
pub fn resolve_partitioned<M>(
    registry: &GeneratorRegistry,
    components: &M,
    plans: &[ContextPlan],
) -> (ContextBindingTable, ResolutionReport)
where
    M: ComponentMetadata + Sync + ?Sized,
{
    let mut groups: IndexMap<&ContextId, Vec<usize>> = IndexMap::new();
    for (index, plan) in plans.iter().enumerate() {
        groups.entry(&plan.descriptor.id).or_default().push(index);
    }

    type Partition = (ContextBindingTable, Vec<(usize, ResolutionReport)>);
    let partitions: Vec<Partition> = std::thread::scope(|scope| {
        let handles: Vec<_> = groups
            .values()
            .map(|indices| {
                scope.spawn(move || {
                    let mut engine = ResolutionEngine::new(registry, components);
                    let reports: Vec<(usize, ResolutionReport)> = indices
                        .iter()
                        .map(|&index| (index, engine.resolve(std::slice::from_ref(&plans[index]))))
                        .collect();
                    (engine.into_table(), reports)
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| match handle.join() {
                Ok(partition) => partition,
                Err(panic) => std::panic::resume_unwind(panic),
            })
            .collect()
    });

    let mut table = ContextBindingTable::new();
    let mut per_plan: Vec<(usize, ResolutionReport)> = Vec::with_capacity(plans.len());
    for (partition, mut reports) in partitions {
        if let Err(error) = table.merge(partition) {
            warn!(error = %error, "Context partition rejected at merge");
            for (_, report) in reports.iter_mut() {
                report.layers.clear();
            }
            if let Some((index, report)) = reports.first_mut() {
                report.failures.push(ResolutionFailure {
                    context: plans[*index].descriptor.id.clone(),
                    component: None,
                    error,
                });
            }
        }
        per_plan.extend(reports);
    }

    per_plan.sort_by_key(|(index, _)| *index);
    let mut report = ResolutionReport::default();
    for (_, partial) in per_plan {
        report.layers.extend(partial.layers);
        report.failures.extend(partial.failures);
    }
    (table, report)
}
