//! Template handling for LaTeX documents.
//!
//! A template is an ordinary `.tex` file that declares its variables as
//! binding sites: `\newcommand{\companyname}{Default Co}`. Callers supply a
//! flat [`VariableMap`]; [`substitute`] replaces the default payload of every
//! matching site with the [`escape`]d caller value and leaves everything else
//! untouched.
//!
//! ## Key Abstractions
//!
//! - **`escape`**: total function from arbitrary text to LaTeX-safe text
//! - **`VariableMap`**: typed key/value mapping supplied per request
//! - **`substitute`**: pure rewrite of binding-site payloads
//! - **`Template`**: an on-disk template with its logical name

mod escape;
mod substitute;
mod template;
mod variables;

pub use escape::{ESCAPE_RULES, escape};
pub use substitute::{binding_site_name, substitute};
pub use template::{Template, TemplateError};
pub use variables::VariableMap;
