mod required_text;

pub use required_text::{optional_text, RequiredText};
