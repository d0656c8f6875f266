//! CLI presentation: text and json formatters per command family.

mod generators;
mod layers;
mod shared;

pub use generators::{
    format_generator_list_json, format_generator_list_text, format_generator_show_json,
    format_generator_show_text,
};
pub use layers::{
    format_calls_json, format_calls_text, format_check_ok, format_layers_json,
    format_layers_text, format_layers_yaml,
};
