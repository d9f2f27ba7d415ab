//! antipattern_search library - anti-pattern detection for process models
//!
//! Compiles anti-pattern templates (small graphs of typed, optionally repeated
//! or absent vertices and edges) into Cypher queries against process models
//! stored as labeled property graphs.
//!
//! ```
//! use antipattern_search::compiler::translate;
//! use antipattern_search::template::{Edge, Template, Vertex, VertexType};
//!
//! let template = Template::builder()
//!     .vertex(Vertex::new("opt1", VertexType::Activity, "NW_OPT"))
//!     .vertex(Vertex::new("opt2", VertexType::Activity, "NW_OPT"))
//!     .edge(Edge::new("opt1", "opt2"))
//!     .build()
//!     .unwrap();
//!
//! let queries = translate(&template);
//! assert_eq!(queries.len(), 1);
//! assert!(queries[0].ends_with("RETURN p0"));
//! ```

pub mod catalogue;
pub mod cli;
pub mod commands;
pub mod compiler;
pub mod config;
pub mod detect;
pub mod output;
pub mod template;
pub mod types;

#[macro_use]
pub mod test_macros;

pub use compiler::{compile, translate, CompiledPattern};
pub use template::{Template, TemplateError};
