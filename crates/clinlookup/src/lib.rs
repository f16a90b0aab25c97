//! clinlookup: gene-aware ClinVar variant resolution.
//!
//! Variant names collide across genes ("p.Arg1580Trp" exists in more than
//! one protein), so a plain ClinVar search can return records for the
//! wrong gene. clinlookup searches by gene and variation name, fetches
//! each candidate's summary, and only returns a record whose associated
//! genes include the one that was asked for.
//!
//! # Core Principles
//!
//! - **Gene-checked**: a record is returned only if it lists the requested gene
//! - **Typed outcomes**: misses are [`Failure`] values, never panics
//! - **Stateless**: every resolution issues its own requests; nothing is cached
//!
//! # Example
//!
//! ```no_run
//! use clinlookup::Resolver;
//!
//! let resolver = Resolver::new().unwrap();
//! match resolver.resolve("CHD8", "p.Arg1580Trp") {
//!     Ok(record) => println!("{} {}", record.accession, record.classification),
//!     Err(failure) => println!("{}", failure),
//! }
//! ```

pub mod batch;
pub mod error;
pub mod query;
pub mod record;
pub mod summary;
pub mod transport;

mod resolver;

pub use batch::{BatchDriver, BatchRow, BatchSummary, FixedDelay, NoDelay, OutputFormat, Pacer};
pub use error::{ClinError, Result};
pub use query::{EutilsEndpoints, Query};
pub use record::{Failure, NOT_AVAILABLE, VariantRecord};
pub use resolver::{ExclusionPolicy, Resolution, Resolver, ResolverConfig};
pub use transport::{HttpTransport, MockTransport, Transport};
