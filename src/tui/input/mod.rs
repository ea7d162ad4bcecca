//! Keyboard-editable input fields.

pub mod text_input;

pub use text_input::TextInput;
