//! Generator request validation
//!
//! A component's own declaration is the single source of truth for which
//! generator it needs. Callers acting on its behalf must request exactly that
//! generator, and it must be registered globally.

use crate::component::ComponentMetadata;
use crate::context::ProjectType;
use crate::error::{GenError, NotFoundKind};
use crate::generator::GeneratorRegistry;
use tracing::debug;

/// Transient input to validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationRequest<'a> {
    pub component_id: &'a str,
    pub generator_id: &'a str,
    pub project_type: ProjectType,
}

impl<'a> GenerationRequest<'a> {
    pub fn new(component_id: &'a str, generator_id: &'a str, project_type: ProjectType) -> Self {
        Self {
            component_id,
            generator_id,
            project_type,
        }
    }
}

/// Proof that a request passed validation.
///
/// Only [`GeneratorValidator::validate`] creates these, and binding requires
/// one, so nothing can be bound without a prior successful check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRequest {
    component_id: String,
    generator_id: String,
    project_type: ProjectType,
}

impl ValidatedRequest {
    pub fn component_id(&self) -> &str {
        &self.component_id
    }

    pub fn generator_id(&self) -> &str {
        &self.generator_id
    }

    pub fn project_type(&self) -> ProjectType {
        self.project_type
    }
}

/// Stateless checker over a registry and the upstream component metadata.
///
/// Both are borrowed for `'a`: the validator cannot outlive the parser that
/// supplied the component metadata.
pub struct GeneratorValidator<'a, M: ComponentMetadata + ?Sized> {
    registry: &'a GeneratorRegistry,
    components: &'a M,
}

impl<'a, M: ComponentMetadata + ?Sized> GeneratorValidator<'a, M> {
    pub fn new(registry: &'a GeneratorRegistry, components: &'a M) -> Self {
        Self {
            registry,
            components,
        }
    }

    pub fn registry(&self) -> &'a GeneratorRegistry {
        self.registry
    }

    pub fn components(&self) -> &'a M {
        self.components
    }

    /// Check a request.
    ///
    /// * unknown component: `NotFound(component)`
    /// * requested id differs from the declared one (or none declared): `Mismatch`
    /// * declared generator missing from the registry: `NotFound(generator)`
    pub fn validate(&self, request: &GenerationRequest<'_>) -> Result<ValidatedRequest, GenError> {
        if !self.components.contains(request.component_id) {
            return Err(GenError::not_found(
                NotFoundKind::Component,
                request.component_id,
            ));
        }

        let declared = self.components.required_generator(request.component_id);
        if declared != Some(request.generator_id) {
            return Err(GenError::Mismatch {
                component: request.component_id.to_string(),
                requested: Some(request.generator_id.to_string()),
                declared: declared.map(str::to_string),
            });
        }

        if !self.registry.is_known(request.generator_id) {
            return Err(GenError::not_found(
                NotFoundKind::Generator,
                request.generator_id,
            ));
        }

        debug!(
            component = request.component_id,
            generator = request.generator_id,
            project_type = %request.project_type,
            "Generator request validated"
        );
        Ok(ValidatedRequest {
            component_id: request.component_id.to_string(),
            generator_id: request.generator_id.to_string(),
            project_type: request.project_type,
        })
    }
}
