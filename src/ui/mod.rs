//! Terminal output helpers
//!
//! Uses `cliclack` spinners and log lines on an interactive terminal, plain
//! prefixed lines in CI and when output is piped.

mod context;
mod output;
mod progress;

pub use context::UiContext;
pub use output::{key_value, key_value_status, section, step_ok_detail, step_warn_hint};
pub use progress::TaskSpinner;
