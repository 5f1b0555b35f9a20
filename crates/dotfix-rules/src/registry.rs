//! Command registry: wire identifier to executor
//!
//! Built once and passed to whoever executes commands; it is never mutated
//! after construction.

use std::collections::HashMap;

use dotfix_core::{Edit, SourceFile, TextDocument};
use log::debug;

use crate::commands::{
    change_edge_op::ChangeEdgeOpExecutor, consolidate::ConsolidateExecutor,
    fix_graph::FixGraphExecutor, Command, CommandExecutor,
};
use crate::error::ExecuteError;

/// Every command identifier this crate can produce and execute
pub fn all_command_ids() -> Vec<&'static str> {
    CommandRegistry::new().command_ids()
}

pub struct CommandRegistry {
    executors: HashMap<&'static str, Box<dyn CommandExecutor>>,
    /// Registration order, for stable listings
    order: Vec<&'static str>,
}

impl CommandRegistry {
    /// Create a registry with all built-in commands
    pub fn new() -> Self {
        let executors: Vec<Box<dyn CommandExecutor>> = vec![
            Box::new(ChangeEdgeOpExecutor),
            Box::new(FixGraphExecutor),
            Box::new(ConsolidateExecutor),
        ];

        let order = executors.iter().map(|e| e.id()).collect();
        let executors = executors.into_iter().map(|e| (e.id(), e)).collect();
        Self { executors, order }
    }

    pub fn command_ids(&self) -> Vec<&'static str> {
        self.order.clone()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.executors.contains_key(id)
    }

    /// Run the command registered under `id` with its JSON arguments
    pub fn execute(
        &self,
        id: &str,
        document: &TextDocument,
        file: &SourceFile,
        arguments: serde_json::Value,
    ) -> Result<Vec<Edit>, ExecuteError> {
        let executor = self
            .executors
            .get(id)
            .ok_or_else(|| ExecuteError::UnknownCommand(id.to_string()))?;
        let edits = executor.execute(document, file, arguments)?;
        debug!("{} produced {} edit(s)", id, edits.len());
        Ok(edits)
    }

    /// Run a typed command, going through the same lookup as the wire form
    pub fn execute_command(
        &self,
        command: &Command,
        document: &TextDocument,
        file: &SourceFile,
    ) -> Result<Vec<Edit>, ExecuteError> {
        self.execute(command.id(), document, file, command.arguments())
    }

    /// Run a protocol command as sent back by an editor host
    pub fn execute_lsp(
        &self,
        command: &lsp_types::Command,
        document: &TextDocument,
        file: &SourceFile,
    ) -> Result<Vec<Edit>, ExecuteError> {
        let arguments = command
            .arguments
            .as_ref()
            .and_then(|arguments| arguments.first())
            .cloned()
            .unwrap_or(serde_json::Value::Null);
        self.execute(&command.command, document, file, arguments)
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}
