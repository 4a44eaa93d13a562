//! OpsDeck Core Library
//!
//! This crate provides the engine behind the `opsdeck` console: a catalog of
//! operational scripts, cursor navigation over it, the input forms that
//! collect script arguments, and the launchers that open a script in a new
//! terminal window.
//!
//! # Key Features
//!
//! - **Catalog**: YAML-defined or built-in categories of commands
//! - **Navigation**: A flat index with header-skipping, wrapping cursor moves
//! - **Input Forms**: Per-command prompts with required-field validation
//! - **Dispatch**: Terminal.app on macOS, a bash discovery chain on Windows
//!
//! # Examples
//!
//! Loading the catalog and walking its commands:
//!
//! ```no_run
//! use std::path::Path;
//! use opsdeck_core::file_handling::load_catalog;
//! use opsdeck_core::navigation::Navigation;
//!
//! let loaded = load_catalog(&None, Path::new("/srv/project/scripts"))?;
//! let mut navigation = Navigation::new(&loaded.catalog);
//! navigation.move_cursor(1);
//! if let Some(command) = navigation.selected(&loaded.catalog) {
//!     println!("Selected: {command}");
//! }
//! # Ok::<(), opsdeck_core::error::Error>(())
//! ```

pub mod arguments;
pub mod catalog;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod file_handling;
pub mod form;
pub mod navigation;
