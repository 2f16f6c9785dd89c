//! Command metadata: name, aliases, argument descriptions and help.
//!
//! The registry uses the manifest to resolve aliases, fill in argument
//! defaults and reject arguments a command does not declare.

use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// Value type of an argument, as advertised to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArgumentType {
    String,
    Number,
    Boolean,
    List,
    Dictionary,
}

impl std::fmt::Display for ArgumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArgumentType::String => write!(f, "string"),
            ArgumentType::Number => write!(f, "number"),
            ArgumentType::Boolean => write!(f, "bool"),
            ArgumentType::List => write!(f, "list"),
            ArgumentType::Dictionary => write!(f, "dictionary"),
        }
    }
}

/// One named or unnamed argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgumentSpec {
    /// Argument name; empty for unnamed arguments.
    pub name: String,
    pub description: String,
    pub type_list: Vec<ArgumentType>,
    /// Value used when the caller omits the argument.
    pub default_value: Option<String>,
    pub is_required: bool,
    /// Suggested values. Informational only: the command validates its own values.
    pub enum_list: Vec<String>,
}

impl ArgumentSpec {
    /// An optional string argument.
    pub fn named(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            type_list: vec![ArgumentType::String],
            default_value: None,
            is_required: false,
            enum_list: Vec::new(),
        }
    }

    /// An optional unnamed string argument.
    pub fn unnamed(description: impl Into<String>) -> Self {
        Self::named("", description)
    }

    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn required(mut self) -> Self {
        self.is_required = true;
        self
    }

    pub fn with_enum<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enum_list = values.into_iter().map(Into::into).collect();
        self
    }
}

/// Everything the registry needs to know about a command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandManifest {
    pub name: String,
    pub aliases: Vec<String>,
    pub named_args: Vec<ArgumentSpec>,
    pub unnamed_args: Vec<ArgumentSpec>,
    /// Description of what the command returns.
    pub returns: String,
    /// Free-form help; one example invocation per line reads best.
    pub help: String,
}

impl CommandManifest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
            named_args: Vec::new(),
            unnamed_args: Vec::new(),
            returns: String::new(),
            help: String::new(),
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    pub fn named_arg(mut self, arg: ArgumentSpec) -> Self {
        self.named_args.push(arg);
        self
    }

    pub fn unnamed_arg(mut self, arg: ArgumentSpec) -> Self {
        self.unnamed_args.push(arg);
        self
    }

    pub fn returns(mut self, returns: impl Into<String>) -> Self {
        self.returns = returns.into();
        self
    }

    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = help.into();
        self
    }

    /// Look up a named argument.
    pub fn named_arg_spec(&self, name: &str) -> Option<&ArgumentSpec> {
        self.named_args.iter().find(|a| a.name == name)
    }

    /// Plain-text help block.
    pub fn help_text(&self) -> String {
        let mut out = format!("/{}", self.name);
        if !self.aliases.is_empty() {
            let aliases: Vec<String> = self.aliases.iter().map(|a| format!("/{a}")).collect();
            let _ = write!(out, " (aliases: {})", aliases.join(", "));
        }
        out.push('\n');

        for line in self.help.lines().map(str::trim).filter(|l| !l.is_empty()) {
            let _ = writeln!(out, "  {line}");
        }

        if !self.named_args.is_empty() {
            out.push_str("Named arguments:\n");
            for arg in &self.named_args {
                let types: Vec<String> = arg.type_list.iter().map(ToString::to_string).collect();
                let _ = write!(out, "  {}=<{}>", arg.name, types.join("|"));
                if arg.is_required {
                    out.push_str(" (required)");
                }
                if let Some(default) = &arg.default_value {
                    let _ = write!(out, " (default: {default})");
                }
                if !arg.enum_list.is_empty() {
                    let _ = write!(out, " [{}]", arg.enum_list.join(", "));
                }
                let _ = writeln!(out, " {}", arg.description);
            }
        }

        if !self.returns.is_empty() {
            let _ = writeln!(out, "Returns: {}", self.returns);
        }

        out.trim_end().to_string()
    }
}
