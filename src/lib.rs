//! isa2md - VDA ISA (TISAX) catalogue Excel to Markdown converter
//!
//! This crate converts the VDA ISA questionnaire workbook (XLSX) into a
//! hierarchically-headed Markdown document. Control numbers such as "1",
//! "1.1" and "1.1.2" become nested headings; the free-text requirement
//! fields of each control become labeled blocks below the heading.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::fs::File;
//! use isa2md::{ConverterBuilder, IsaVersion};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Create a converter for the ISA 6 German catalogue
//!     let converter = ConverterBuilder::new()
//!         .with_version(IsaVersion::V6De)
//!         .build()?;
//!
//!     // Open input Excel file
//!     let input = File::open("isa6.xlsx")?;
//!
//!     // Create output Markdown file
//!     let output = File::create("isa6.md")?;
//!
//!     // Convert the catalogue
//!     converter.convert(input, output)?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Optional Sections
//!
//! The main information security controls are always rendered. The
//! prototype protection and data protection sheets are opt-in:
//!
//! ```rust,no_run
//! use std::fs::File;
//! use isa2md::{ConverterBuilder, IsaVersion};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let converter = ConverterBuilder::new()
//!     .with_version(IsaVersion::V5_1De)
//!     .include_prototype(true)
//!     .include_data_protection(true)
//!     .build()?;
//! # Ok(())
//! # }
//! ```
//!
//! # Convert to String
//!
//! ```rust,no_run
//! use std::fs::File;
//! use isa2md::{ConverterBuilder, IsaVersion};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let converter = ConverterBuilder::new()
//!         .with_version(IsaVersion::V6De)
//!         .build()?;
//!     let input = File::open("isa6.xlsx")?;
//!
//!     let markdown = converter.convert_to_string(input)?;
//!     println!("{}", markdown);
//!
//!     Ok(())
//! }
//! ```

mod api;
mod builder;
mod error;
mod loader;
mod normalize;
mod renderer;
mod schema;

// 公開API
pub use api::{IsaVersion, SectionKind};
pub use builder::{Converter, ConverterBuilder};
pub use error::Isa2MdError;
