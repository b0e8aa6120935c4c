//! Agent factory: role descriptor + resolved model = agent handle.

use std::sync::Arc;

use tracing::{info, instrument};

use crate::error::{CrewError, CrewResult};
use crate::model::{ModelHandle, ModelResolver};
use crate::roles::{Role, RoleSelection};

/// A configured persona bound to a resolved model.
#[derive(Debug, Clone)]
pub struct AgentHandle {
    pub role: Role,
    pub title: &'static str,
    pub objective: &'static str,
    pub persona: &'static str,
    pub model: ModelHandle,
    /// Log the agent's final answers at info level.
    pub verbose: bool,
    /// May hand sub-work to the other agents in the crew.
    pub allow_delegation: bool,
}

/// Builds agent handles for roles, resolving each role's preferred model.
#[derive(Debug, Clone)]
pub struct AgentFactory {
    resolver: ModelResolver,
}

impl AgentFactory {
    pub fn new(resolver: ModelResolver) -> Self {
        Self { resolver }
    }

    /// Build the agent for `role`.
    ///
    /// Every agent is verbose; only the architect may delegate.
    #[instrument(skip(self), fields(role = %role))]
    pub async fn build(&self, role: Role) -> CrewResult<AgentHandle> {
        let descriptor = role.descriptor();
        let model = self.resolver.resolve(descriptor.preferred_model).await?;

        info!(
            agent = descriptor.title,
            model = %model.resolved(),
            fallback = model.used_fallback(),
            "agent ready"
        );

        Ok(AgentHandle {
            role,
            title: descriptor.title,
            objective: descriptor.objective,
            persona: descriptor.persona,
            model,
            verbose: true,
            allow_delegation: role.allows_delegation(),
        })
    }

    /// Build one agent per selected role, in selection order.
    ///
    /// Returns [`CrewError::NoValidAgents`] for an empty selection before any
    /// model is constructed.
    pub async fn build_all(&self, selection: &RoleSelection) -> CrewResult<Vec<Arc<AgentHandle>>> {
        if selection.is_empty() {
            return Err(CrewError::NoValidAgents);
        }

        let mut agents = Vec::with_capacity(selection.roles.len());
        for role in &selection.roles {
            agents.push(Arc::new(self.build(*role).await?));
        }
        Ok(agents)
    }
}
