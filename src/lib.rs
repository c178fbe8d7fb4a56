//! Stackform - materializes deployable configuration and secret files for
//! an observability stack from a single source-of-truth environment file.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── run           # Execute the full pipeline
//! │   ├── check         # Preflight + validation only, writes nothing
//! │   ├── completions   # Shell completions
//! │   └── output        # Terminal output helpers
//! └── core/             # Pipeline components
//!     ├── manifest      # stackform.toml deployment plan
//!     ├── env           # Environment definition file loading
//!     ├── validate      # Required-setting validation
//!     ├── backup        # Timestamped backup-before-overwrite
//!     ├── secrets       # Secret file materialization
//!     ├── fragments     # Scrape-job fragment generation
//!     ├── reindent      # Multi-line payload reindentation
//!     ├── template      # ${VARIABLE} substitution and rendering
//!     └── pipeline      # Orchestration and failure aggregation
//! ```
//!
//! # Features
//!
//! - Validates required settings against placeholder sentinels
//! - Writes secret files with owner-only permissions
//! - Backs up every pre-existing target before overwriting it
//! - Generates scrape-config fragments from a delimited path list
//! - Reindents decoded credential payloads for YAML block embedding
//! - Renders `${VARIABLE}` templates into final artifacts
//!
//! Stackform is a single-operator tool: it provides no mutual exclusion,
//! so never run two pipelines concurrently against the same target tree.

pub mod cli;
pub mod core;
pub mod error;
