//! Every field shape `#[derive(Record)]` understands, in one command.
//!
//! ```text
//! cargo run --example all_options -- a -r 1e-6 --int-list 3 4 -s int-list
//! cargo run --example all_options -- --load-defaults defaults.yaml a -r 1
//! ```

use std::io::Write;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use structparse::{ArgEnum, DeclaredType, ParserHandle, Record, to_arg_name, to_var_name};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ArgEnum)]
enum Action {
    #[structparse(value = "init")]
    Initialize,
    #[structparse(value = "exec")]
    Execute,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ArgEnum)]
enum Animal {
    Cat,
    Dog,
}

/// Where results go.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Record)]
struct Output {
    /// Directory for reports.
    #[structparse(default = "reports")]
    dir: PathBuf,
    /// Replace existing reports.
    #[structparse(default)]
    overwrite: bool,
}

/// Struct docs become the parser description.
///
/// Field docs become argument help.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Record)]
#[structparse(name = "all_options")]
struct AllOptions {
    /// A field without a default is positional.
    pos_arg_1: String,
    /// Forced positional with an optional value.
    #[structparse(positional, default = 5, nargs = "?")]
    pos_arg_2: i64,
    /// Type and default come from the field.
    #[structparse(default = 1)]
    int_arg: i64,
    /// Enum members with string values.
    #[structparse(default = Action::Initialize)]
    str_enum_choice_arg: Action,
    /// Enum members numbered from one.
    #[structparse(default = Animal::Cat)]
    int_enum_choice_arg: Animal,
    /// A fixed set of strings.
    #[structparse(literal("a", "b", "c"), default)]
    literal_arg: Option<String>,
    /// Literal values of mixed types.
    #[structparse(literal(1, 2, "3", "4", true), default)]
    mixed_literal: Value,
    /// Optional values default to nothing.
    #[structparse(default)]
    optional_arg: Option<i64>,
    /// Tries each type in order until one fits.
    #[structparse(
        ty = DeclaredType::union([DeclaredType::int(), DeclaredType::float(), DeclaredType::Boolean]),
        default = Value::Null
    )]
    union_arg: Value,
    #[structparse(default)]
    path_arg: Option<PathBuf>,
    /// Alternate short flag.
    #[structparse(flag = "-f", default = 1)]
    flag_arg: i64,
    /// Must always be given.
    #[structparse(flag = "-r", required, default = 0.0)]
    required_arg: f64,
    #[structparse(metavar = "M", default)]
    metavar_arg: String,
    /// Lists take one or more values.
    #[structparse(default = vec![1])]
    int_list: Vec<i64>,
    /// Tuples take exactly as many values as they have elements.
    #[structparse(default = (1, 2))]
    int_2_list: (i64, i64),
    /// Each element keeps its own type.
    #[structparse(default = (1, 0.001, String::from("a")))]
    multi_type_tuple: (i64, f64, String),
    #[structparse(default)]
    actions: Vec<Action>,
    #[structparse(default)]
    animals: Vec<Animal>,
    /// Untyped lists keep raw strings.
    #[structparse(default)]
    typeless_list: Vec<Value>,
    /// Booleans get `--flag` and `--no-flag`.
    #[structparse(default = true)]
    true_bool_arg: bool,
    #[structparse(default)]
    false_bool_arg: bool,
    /// Hidden from the command line.
    #[structparse(skip, default)]
    no_arg: i64,
    output: Output,
    /// Fields to print; everything when empty.
    #[structparse(flag = "-s", default)]
    show: Vec<String>,
}

impl AllOptions {
    fn report(&self, out: &mut impl Write) -> Result<(), Box<dyn std::error::Error>> {
        let Value::Object(fields) = serde_json::to_value(self)? else {
            return Ok(());
        };
        let wanted: Vec<String> = self.show.iter().map(String::as_str).map(to_var_name).collect();
        for (name, value) in &fields {
            if wanted.is_empty() || wanted.contains(name) {
                writeln!(out, "{}: {value}", to_arg_name(name))?;
            }
        }
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let parser = ParserHandle::<AllOptions>::builder()
        .load_defaults_from_file(true)
        .build()?;
    let options = parser.parse_env_args()?;
    options.report(&mut std::io::stdout().lock())?;
    Ok(())
}
