//! Build orchestration.
//!
//! This module plans the build folders and toolchain, then drives the
//! delegated CMake build through configure, build, the optional `doc` and
//! `coverage` targets, and install.

pub mod cmake;
pub mod events;
pub mod layout;
pub mod orchestrator;
pub mod plan;
pub mod tool;
pub mod toolchain;

pub use cmake::CMakeTool;
pub use events::BuildEvent;
pub use layout::BuildLayout;
pub use orchestrator::{BuildOrchestrator, BuildReport};
pub use plan::{BuildAction, BuildPlan, BuildStage};
pub use tool::{BuildTool, ToolError};
pub use toolchain::{ToolchainGenerator, ToolchainVariables};
