//! Tool registry for managing available tools

use crate::tools::{ScopedRoot, Tool, ToolExecutor};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Shared state handed to every factory when a tool is built
#[derive(Debug, Clone)]
pub struct ToolContext {
    /// The directory file tools are confined to
    pub root: Arc<ScopedRoot>,
}

impl ToolContext {
    pub fn new(root: ScopedRoot) -> Self {
        Self {
            root: Arc::new(root),
        }
    }
}

/// Registry for managing tool creation and registration
pub struct ToolRegistry {
    factories: BTreeMap<String, Box<dyn ToolFactory>>,
}

/// Factory trait for creating tools
pub trait ToolFactory: Send + Sync {
    /// Create a new instance of the tool
    fn create(&self, ctx: &ToolContext) -> Box<dyn Tool>;

    /// Get the name of the tool this factory creates
    fn tool_name(&self) -> &str;

    /// Get the description of the tool this factory creates
    fn tool_description(&self) -> &str;
}

impl ToolRegistry {
    /// Create a new tool registry
    pub fn new() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }

    /// Register a tool factory
    pub fn register_factory(&mut self, factory: Box<dyn ToolFactory>) {
        self.factories
            .insert(factory.tool_name().to_string(), factory);
    }

    /// Create a tool by name
    pub fn create_tool(&self, name: &str, ctx: &ToolContext) -> Option<Box<dyn Tool>> {
        self.factories.get(name).map(|factory| factory.create(ctx))
    }

    /// List all available tool names, sorted
    pub fn list_tools(&self) -> Vec<&str> {
        self.factories.keys().map(|s| s.as_str()).collect()
    }

    /// Get tool information
    pub fn get_tool_info(&self, name: &str) -> Option<(&str, &str)> {
        self.factories
            .get(name)
            .map(|factory| (factory.tool_name(), factory.tool_description()))
    }

    /// Create a tool executor with the specified tools.
    /// Unknown names are skipped with a warning.
    pub fn create_executor(&self, tool_names: &[String], ctx: &ToolContext) -> ToolExecutor {
        let mut executor = ToolExecutor::new();

        for name in tool_names {
            match self.create_tool(name, ctx) {
                Some(tool) => executor.register_tool(tool),
                None => tracing::warn!("Skipping unknown tool in config: {}", name),
            }
        }

        executor
    }

    /// Create a tool executor with all available tools
    pub fn create_executor_with_all(&self, ctx: &ToolContext) -> ToolExecutor {
        let mut executor = ToolExecutor::new();

        for factory in self.factories.values() {
            executor.register_tool(factory.create(ctx));
        }

        executor
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        use crate::tools::builtin::*;

        let mut registry = Self::new();

        registry.register_factory(Box::new(ReadFileToolFactory));
        registry.register_factory(Box::new(WriteFileToolFactory));
        registry.register_factory(Box::new(ListDirectoryToolFactory));
        registry.register_factory(Box::new(DeleteFileToolFactory));
        registry.register_factory(Box::new(CopyFileToolFactory));
        registry.register_factory(Box::new(MoveFileToolFactory));
        registry.register_factory(Box::new(FileSearchToolFactory));
        registry.register_factory(Box::new(FormatTextToolFactory));

        registry
    }
}

/// Macro to help implement tool factories.
///
/// The `scoped` form passes the context's root into `$tool::new`.
#[macro_export]
macro_rules! impl_tool_factory {
    ($factory:ident, $tool:ident, $name:expr, $description:expr) => {
        pub struct $factory;

        impl $crate::tools::ToolFactory for $factory {
            fn create(&self, _ctx: &$crate::tools::ToolContext) -> Box<dyn $crate::tools::Tool> {
                Box::new($tool::new())
            }

            fn tool_name(&self) -> &str {
                $name
            }

            fn tool_description(&self) -> &str {
                $description
            }
        }
    };
    (scoped $factory:ident, $tool:ident, $name:expr, $description:expr) => {
        pub struct $factory;

        impl $crate::tools::ToolFactory for $factory {
            fn create(&self, ctx: &$crate::tools::ToolContext) -> Box<dyn $crate::tools::Tool> {
                Box::new($tool::new(ctx.root.clone()))
            }

            fn tool_name(&self) -> &str {
                $name
            }

            fn tool_description(&self) -> &str {
                $description
            }
        }
    };
}
