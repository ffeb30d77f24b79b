//! # CLI Module
//!
//! Command-line front end for the generator, available as the `cfn-java-gen`
//! binary.
//!
//! ## Commands
//!
//! ```bash
//! # Create settings, scaffold and a starter schema
//! cfn-java-gen --root my-widget init --type-name Example::Widget::Thing
//!
//! # Regenerate target/generated-sources/rpdk from the schema
//! cfn-java-gen --root my-widget generate
//!
//! # After `mvn package`, bundle the jar with the sources
//! cfn-java-gen --root my-widget package --output widget.zip
//! ```
//!
//! Global options:
//! - `--root <DIR>` - project root (default: current directory)
//! - `-v, --verbose` - debug logging
//!
//! ## Usage from Code
//!
//! ```rust,no_run
//! use cfn_java_codegen::cli::{run_cli, Cli};
//! use clap::Parser;
//!
//! let cli = Cli::parse();
//! run_cli(cli).unwrap();
//! ```

mod commands;


pub use commands::{run_cli, Cli, Commands};
