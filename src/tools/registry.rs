//! Operation registry: capability discovery and validated dispatch.
//!
//! The catalog is built once at construction and never mutated. Every call
//! is validated against its operation's schema before the adapter sees it.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::core::tool::ToolDescriptor;
use crate::tools::msf::MetasploitAdapter;
use crate::tools::operations::{
    ExecuteCommandArgs, GetVersionArgs, ListModulesArgs, ModuleInfoArgs, Operation,
    RunNmapScanArgs, RunVulnScanArgs, SearchExploitArgs,
};
use crate::tools::schema::{input_schema_for, parse_arguments, validate_arguments};
use crate::tools::types::{ExecutionResult, ToolCallInput, ToolError};

fn descriptor_for(operation: Operation) -> ToolDescriptor {
    let input_schema = match operation {
        Operation::ExecuteCommand => input_schema_for::<ExecuteCommandArgs>(),
        Operation::SearchExploit => input_schema_for::<SearchExploitArgs>(),
        Operation::ModuleInfo => input_schema_for::<ModuleInfoArgs>(),
        Operation::ListModules => input_schema_for::<ListModulesArgs>(),
        Operation::GetVersion => input_schema_for::<GetVersionArgs>(),
        Operation::RunNmapScan => input_schema_for::<RunNmapScanArgs>(),
        Operation::RunVulnScan => input_schema_for::<RunVulnScanArgs>(),
    };

    ToolDescriptor {
        name: operation.name().to_string(),
        description: operation.description().to_string(),
        input_schema,
    }
}

/// Registry of all available operations.
#[derive(Debug)]
pub struct ToolRegistry {
    adapter: MetasploitAdapter,
    descriptors: Vec<ToolDescriptor>,
    by_name: HashMap<&'static str, (Operation, usize)>,
}

impl ToolRegistry {
    /// Creates a registry with the full operation catalog.
    pub fn new(adapter: MetasploitAdapter) -> Self {
        let mut descriptors = Vec::with_capacity(Operation::all().len());
        let mut by_name = HashMap::new();

        for (index, operation) in Operation::all().iter().copied().enumerate() {
            descriptors.push(descriptor_for(operation));
            by_name.insert(operation.name(), (operation, index));
        }

        Self {
            adapter,
            descriptors,
            by_name,
        }
    }

    /// List all operations in catalog order.
    pub fn list(&self) -> Vec<ToolDescriptor> {
        self.descriptors.clone()
    }

    pub fn descriptor(&self, name: &str) -> Option<&ToolDescriptor> {
        self.by_name
            .get(name)
            .map(|(_, index)| &self.descriptors[*index])
    }

    /// Validate and run one operation.
    ///
    /// Unknown names and malformed arguments are returned as errors and never
    /// reach the adapter. Engine failures come back as an `Ok` result with
    /// `success == false`.
    pub async fn invoke(&self, call: ToolCallInput) -> Result<ExecutionResult, ToolError> {
        let Some(&(operation, index)) = self.by_name.get(call.name.as_str()) else {
            debug!(name = %call.name, "rejecting unknown operation");
            return Err(ToolError::UnknownOperation(call.name));
        };

        let args = validate_arguments(&self.descriptors[index].input_schema, &call.args)?;
        info!(operation = %operation, "dispatching operation");

        let adapter = &self.adapter;
        let result = match operation {
            Operation::ExecuteCommand => {
                let args: ExecuteCommandArgs = parse_arguments(args)?;
                adapter.execute_command(&args.command).await
            }
            Operation::SearchExploit => {
                let args: SearchExploitArgs = parse_arguments(args)?;
                adapter.search_exploit(&args.query).await
            }
            Operation::ModuleInfo => {
                let args: ModuleInfoArgs = parse_arguments(args)?;
                adapter.get_module_info(&args.module_path).await
            }
            Operation::ListModules => {
                let args: ListModulesArgs = parse_arguments(args)?;
                adapter.list_modules(args.module_type.as_str()).await
            }
            Operation::GetVersion => {
                let _: GetVersionArgs = parse_arguments(args)?;
                adapter.get_version().await
            }
            Operation::RunNmapScan => {
                let args: RunNmapScanArgs = parse_arguments(args)?;
                adapter
                    .run_nmap_scan(&args.target, args.options.as_deref().unwrap_or_default())
                    .await
            }
            Operation::RunVulnScan => {
                let args: RunVulnScanArgs = parse_arguments(args)?;
                adapter.run_vuln_scan(&args.target).await
            }
        };

        Ok(result)
    }
}
