//! Template module - EJS-flavoured text template engine
//!
//! Renders `.ange` templates against TOML data. Templates never execute host
//! code; the only way out of the template is `require`, which goes through a
//! [`ModuleLoader`].
//!
//! ## Syntax
//!
//! - Output: `<%= key %>` (HTML-escaped) or `<%- key %>` (raw)
//! - Nested access: `<%= nested.key %>`
//! - Comments: `<%# anything %>` (also used for the `output:` directive)
//! - List iteration: `<% each items |item| %> ... <% /each %>`
//! - Conditionals: `<% if key %> ... <% else %> ... <% /if %>`
//! - Modules: `<% require "./data.toml" as data %>` or `<%= require("./VERSION") %>`
//! - Literal `<%`: `<%%`
//! - Closing a tag with `-%>` drops the newline that follows it

pub mod engine;
pub mod error;
pub mod module;
pub mod renderer;

pub use engine::{render, TemplateContext, TemplateEngine};
pub use error::TemplateError;
pub use module::{FileModuleLoader, ModuleLoader, NoModules};
pub use renderer::TemplateRenderer;
