//! impactbox - incremental build resolution for multi-module builds
//!
//! Given the paths changed in a source tree, this library decides which
//! modules of a multi-module build must be rebuilt and trims the build
//! session accordingly. Modules that only need to be built because others
//! depend on them can be decorated with cheaper build arguments.
//!
//! # Core Concepts
//!
//! - **Build graph**: the host's modules and session, accessed through
//!   [`BuildGraph`]; [`Reactor`] is the in-memory implementation
//! - **Changes**: paths supplied by a [`ChangeSource`], mapped onto their
//!   owning modules, remembering whether only test sources changed
//! - **Impact**: everything downstream of a changed module, refined by how
//!   each consumer uses its dependency (main, test-scoped, test-jar, BOM import)
//! - **Build plan**: the trimmed, reactor-ordered module list plus per-module
//!   properties, committed back to the build graph
//!
//! # Example Usage
//!
//! ```
//! use impactbox::changes::StaticChangeSource;
//! use impactbox::fs::MockFileSystem;
//! use impactbox::graph::{BuildGraph, Reactor};
//! use impactbox::model::{Dependency, Gav, Module};
//! use impactbox::{Resolver, ResolverConfig};
//! use std::sync::Arc;
//!
//! let core = Gav::new("com.acme", "core", "1.0");
//! let app = Gav::new("com.acme", "app", "1.0");
//! let mut graph = Reactor::new(vec![
//!     Module::new(Gav::new("com.acme", "parent", "1.0"), "/repo")
//!         .with_packaging("pom")
//!         .with_submodules(vec!["core".into(), "app".into(), "docs".into()]),
//!     Module::new(core.clone(), "/repo/core"),
//!     Module::new(app.clone(), "/repo/app").with_dependency(Dependency::new(core.clone())),
//!     Module::new(Gav::new("com.acme", "docs", "1.0"), "/repo/docs"),
//! ])
//! .unwrap();
//!
//! let fs = MockFileSystem::new();
//! fs.add_file("/repo/pom.xml");
//! fs.add_file("/repo/core/pom.xml");
//!
//! let changes = StaticChangeSource::new(vec!["/repo/core/src/main/java/Core.java"].into_iter().collect());
//! let resolver = Resolver::new(ResolverConfig::default()).with_file_system(Arc::new(fs));
//! resolver.run(&mut graph, &changes).unwrap();
//!
//! assert_eq!(graph.session_modules(), &[core, app]);
//! ```
//!
//! # Project Structure
//!
//! - [`changes`]: changed paths and their mapping onto modules
//! - [`impact`]: downstream impact calculation
//! - [`plan`]: build plan assembly and write-back
//! - [`graph`]: host build graph boundary and in-memory reactor
//! - [`config`]: resolver configuration

pub mod changes;
pub mod cli;
pub mod config;
pub mod error;
pub mod expr;
pub mod fs;
pub mod graph;
pub mod impact;
pub mod model;
pub mod plan;
pub mod resolver;
pub mod util;

pub use changes::{ChangeSet, ChangeSource, ChangeSourceError, StaticChangeSource};
pub use config::{ConfigError, ResolverConfig};
pub use error::{ResolveError, ResolveResult};
pub use graph::{BuildGraph, MakeBehavior, Reactor};
pub use model::{Gav, Module};
pub use plan::{BuildPlan, PlanOutcome};
pub use resolver::Resolver;
pub use util::{init_default, init_from_env, init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
