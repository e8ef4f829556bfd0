//! Built-in tool handlers and the table that maps tool names to them.

mod calculator;
mod schema;
mod text;
mod validator;

pub use calculator::Operation;
pub use schema::{
    json_schema_enum, json_schema_number, json_schema_object, json_schema_string,
};
pub use text::{Language, Template};
pub use validator::DataType;

use crate::error::HandlerError;
use crate::types::{Arguments, ToolDefinition};
use serde_json::Value;
use std::collections::HashMap;

/// Signature shared by every handler
pub type HandlerFn = fn(&Arguments) -> Result<Value, HandlerError>;

/// Declares a closed set of string-named variants with `as_str`, `ALL`
/// and a `FromStr` that yields `UnknownVariant` on mismatch.
macro_rules! named_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::handlers::UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    _ => Err($crate::handlers::UnknownVariant(s.to_string())),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}
pub(crate) use named_enum;

/// A string that did not name any variant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant(pub String);

named_enum! {
    /// Tools that ship with a handler
    BuiltinTool {
        Calculator => "calculator",
        TextGenerator => "text_generator",
        DataValidator => "data_validator",
    }
}

const BUILTIN_HANDLERS: &[(BuiltinTool, HandlerFn)] = &[
    (BuiltinTool::Calculator, calculator::execute),
    (BuiltinTool::TextGenerator, text::execute),
    (BuiltinTool::DataValidator, validator::execute),
];

/// Maps tool names to handler functions
#[derive(Clone)]
pub struct HandlerRegistry {
    handlers: HashMap<BuiltinTool, HandlerFn>,
}

impl HandlerRegistry {
    /// Registry with every built-in handler
    pub fn builtin() -> Self {
        Self {
            handlers: BUILTIN_HANDLERS.iter().copied().collect(),
        }
    }

    /// Registry with no handlers
    pub fn empty() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    pub fn handler_for(&self, tool_name: &str) -> Option<HandlerFn> {
        let tool = tool_name.parse::<BuiltinTool>().ok()?;
        self.handlers.get(&tool).copied()
    }

    /// Run the handler for `tool_name`
    pub fn invoke(&self, tool_name: &str, arguments: &Arguments) -> Result<Value, HandlerError> {
        let handler = self
            .handler_for(tool_name)
            .ok_or_else(|| HandlerError::NoHandler(tool_name.to_string()))?;
        handler(arguments)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut tools: Vec<_> = self.handlers.keys().map(BuiltinTool::as_str).collect();
        tools.sort_unstable();
        f.debug_struct("HandlerRegistry").field("tools", &tools).finish()
    }
}

/// Definitions for the built-in tools, used to seed a registry
pub fn builtin_definitions() -> Vec<ToolDefinition> {
    vec![
        calculator::definition(),
        text::definition(),
        validator::definition(),
    ]
}

// Argument accessors

pub(crate) fn required_str<'a>(args: &'a Arguments, name: &'static str) -> Result<&'a str, HandlerError> {
    match args.get(name) {
        None | Some(Value::Null) => Err(HandlerError::MissingArgument(name)),
        Some(value) => value.as_str().ok_or(HandlerError::InvalidArgument {
            name,
            expected: "a string",
        }),
    }
}

pub(crate) fn optional_str<'a>(args: &'a Arguments, name: &'static str) -> Result<Option<&'a str>, HandlerError> {
    match args.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(_) => required_str(args, name).map(Some),
    }
}

pub(crate) fn required_number<'a>(args: &'a Arguments, name: &'static str) -> Result<&'a serde_json::Number, HandlerError> {
    match args.get(name) {
        None | Some(Value::Null) => Err(HandlerError::MissingArgument(name)),
        Some(Value::Number(n)) => Ok(n),
        Some(_) => Err(HandlerError::InvalidArgument {
            name,
            expected: "a number",
        }),
    }
}
