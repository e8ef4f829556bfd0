// Tool invocation engine

use crate::error::{DispatchError, RegistryResult};
use crate::executions::ExecutionStore;
use crate::handlers::HandlerRegistry;
use crate::registry::ToolRegistry;
use crate::types::{Arguments, ExecutionId, ExecutionRecord, ToolDefinition, ToolPatch};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Aggregate view over tools and their executions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolStats {
    pub total_tools: usize,
    pub total_executions: usize,
    pub executions_by_status: BTreeMap<String, usize>,
    pub executions_by_tool: BTreeMap<String, usize>,
    pub available_tools: Vec<String>,
}

/// Routes named invocations to handlers and tracks each one as an
/// [`ExecutionRecord`].
pub struct Dispatcher {
    tools: Arc<ToolRegistry>,
    executions: Arc<ExecutionStore>,
    handlers: HandlerRegistry,
}

impl Dispatcher {
    pub fn new(
        tools: Arc<ToolRegistry>,
        executions: Arc<ExecutionStore>,
        handlers: HandlerRegistry,
    ) -> Self {
        Self {
            tools,
            executions,
            handlers,
        }
    }

    /// Dispatcher over the built-in tools and handlers with an empty
    /// execution history
    pub fn with_builtin_tools() -> Self {
        Self::new(
            Arc::new(ToolRegistry::with_builtin_tools()),
            Arc::new(ExecutionStore::new()),
            HandlerRegistry::builtin(),
        )
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    pub fn executions(&self) -> &ExecutionStore {
        &self.executions
    }

    pub fn list_tools(&self) -> Vec<ToolDefinition> {
        self.tools.list()
    }

    pub fn find_tool(&self, name: &str) -> Option<ToolDefinition> {
        self.tools.find(name)
    }

    pub fn tools_by_capability(&self, tag: &str) -> Vec<ToolDefinition> {
        self.tools.by_capability(tag)
    }

    pub fn tool_exists(&self, name: &str) -> bool {
        self.tools.exists(name)
    }

    pub fn register_tool(&self, def: ToolDefinition) -> RegistryResult<ToolDefinition> {
        self.tools.register(def)
    }

    pub fn update_tool(&self, name: &str, patch: ToolPatch) -> RegistryResult<ToolDefinition> {
        self.tools.update(name, patch)
    }

    pub fn delete_tool(&self, name: &str) -> bool {
        self.tools.remove(name)
    }

    /// Invoke a tool by name.
    ///
    /// Fails only when the tool is not registered, in which case no record
    /// is created. Handler failures are captured in the returned record
    /// with status `error`.
    pub fn execute(
        &self,
        tool_name: &str,
        arguments: Arguments,
    ) -> Result<ExecutionRecord, DispatchError> {
        if !self.tools.exists(tool_name) {
            return Err(DispatchError::ToolNotFound(tool_name.to_string()));
        }

        let mut record = ExecutionRecord::start(self.executions.next_id(), tool_name, arguments);
        tracing::debug!("Started execution {} of {}", record.execution_id, tool_name);

        match self.handlers.invoke(tool_name, &record.arguments) {
            Ok(result) => {
                record.complete(result);
                tracing::info!(
                    "Execution {} of {} succeeded in {}ms",
                    record.execution_id,
                    tool_name,
                    record.duration_ms.unwrap_or_default()
                );
            }
            Err(err) => {
                record.fail(err.to_string());
                tracing::warn!(
                    "Execution {} of {} failed: {}",
                    record.execution_id,
                    tool_name,
                    err
                );
            }
        }

        self.executions.insert(record.clone());
        Ok(record)
    }

    pub fn find_execution(&self, id: &ExecutionId) -> Option<ExecutionRecord> {
        self.executions.get(id)
    }

    pub fn list_executions(&self) -> Vec<ExecutionRecord> {
        self.executions.list()
    }

    pub fn stats(&self) -> ToolStats {
        let executions = self.executions.list();
        let mut executions_by_status = BTreeMap::new();
        let mut executions_by_tool = BTreeMap::new();
        for record in &executions {
            *executions_by_status
                .entry(record.status.to_string())
                .or_insert(0) += 1;
            *executions_by_tool
                .entry(record.tool_name.clone())
                .or_insert(0) += 1;
        }

        let available_tools = self.tools.names();
        ToolStats {
            total_tools: available_tools.len(),
            total_executions: executions.len(),
            executions_by_status,
            executions_by_tool,
            available_tools,
        }
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::with_builtin_tools()
    }
}
