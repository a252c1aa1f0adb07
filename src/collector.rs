//! Interactive option collection
//!
//! Resolves each schema entry of a module to a literal through the
//! [`Console`]. No answer is retried: a rejected answer ends collection for
//! the module, and the literal `stop` at any prompt cancels the whole build.

use std::fmt;

use thiserror::Error;
use tracing::{debug, warn};

use crate::console::{columns, Console};
use crate::error::ScriptError;
use crate::module::Module;
use crate::schema::{OptionSpec, TypeTag};

/// Reserved answer that cancels the build
pub const STOP: &str = "stop";

/// List choice that asks for free text instead
pub const CUSTOM_CHOICE: &str = "?";

pub const NUMBER_PROMPT: &str = "#: ";
pub const LIST_PROMPT: &str = "option #: ";
pub const CUSTOM_PROMPT: &str = "custom input: ";

/// A blank numeric answer reads as this value, which is then rejected.
const BLANK_NUMBER: &str = "-1";

/// Outcome of one prompt, or of a whole collection
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution<T> {
    Resolved(T),
    Invalid(InvalidInput),
    Cancelled,
}

impl<T> Resolution<T> {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Resolution::Cancelled)
    }
}

/// A rejected interactive answer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("option '{option}': {reason}")]
pub struct InvalidInput {
    pub option: String,
    pub reason: InvalidReason,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidReason {
    NotPositive,
    NotInteger,
    NotFloat,
    BadSelection,
    EmptyCustom,
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            InvalidReason::NotPositive => "input must be positive.",
            InvalidReason::NotInteger => "input must be an integer.",
            InvalidReason::NotFloat => "input must be a float.",
            InvalidReason::BadSelection => "option # invalid.",
            InvalidReason::EmptyCustom => "custom input must not be empty.",
        };
        f.write_str(message)
    }
}

/// Per-prompt result before the option name is attached
enum Answer {
    Value(String),
    Rejected(InvalidReason),
    Stop,
}

/// Collects option values for modules, one prompt per option
pub struct OptionCollector<'a, C: Console + ?Sized> {
    console: &'a mut C,
}

impl<'a, C: Console + ?Sized> OptionCollector<'a, C> {
    pub fn new(console: &'a mut C) -> Self {
        Self { console }
    }

    /// Print the module's header, then resolve every option in schema order.
    pub fn collect(&mut self, module: &Module) -> Result<Resolution<Vec<String>>, ScriptError> {
        for line in &module.header {
            self.console.print(line);
        }

        let mut values = Vec::with_capacity(module.schema.len());
        for spec in &module.schema {
            let description = module.describe(&spec.name).unwrap_or_default();
            self.console.print("");
            self.console.print(&format!("{}: {}", spec.name, description));

            match self.resolve(spec)? {
                Resolution::Resolved(value) => values.push(value),
                Resolution::Invalid(invalid) => {
                    warn!(module = %module.name, %invalid, "option rejected");
                    return Ok(Resolution::Invalid(invalid));
                }
                Resolution::Cancelled => {
                    debug!(module = %module.name, option = %spec.name, "collection cancelled");
                    return Ok(Resolution::Cancelled);
                }
            }
        }
        Ok(Resolution::Resolved(values))
    }

    /// Resolve a single option
    pub fn resolve(&mut self, spec: &OptionSpec) -> Result<Resolution<String>, ScriptError> {
        let answer = match &spec.tag {
            TypeTag::Int => self.read_number(parse_int)?,
            TypeTag::Float => self.read_number(parse_float)?,
            TypeTag::List(choices) => self.select(choices)?,
        };

        Ok(match answer {
            Answer::Value(value) => Resolution::Resolved(value),
            Answer::Rejected(reason) => {
                self.console.print(&format!("ERROR: {}", reason));
                Resolution::Invalid(InvalidInput {
                    option: spec.name.clone(),
                    reason,
                })
            }
            Answer::Stop => Resolution::Cancelled,
        })
    }

    fn read_number(
        &mut self,
        parse: fn(&str) -> Result<String, InvalidReason>,
    ) -> Result<Answer, ScriptError> {
        let Some(raw) = self.console.prompt(NUMBER_PROMPT)? else {
            return Ok(Answer::Stop);
        };
        if raw == STOP {
            return Ok(Answer::Stop);
        }

        let token = match raw.trim() {
            "" => BLANK_NUMBER,
            token => token,
        };
        Ok(match parse(token) {
            Ok(value) => Answer::Value(value),
            Err(reason) => Answer::Rejected(reason),
        })
    }

    fn select(&mut self, choices: &[String]) -> Result<Answer, ScriptError> {
        let mut sorted = choices.to_vec();
        sorted.sort();

        let numbered: Vec<String> = sorted
            .iter()
            .enumerate()
            .map(|(i, choice)| format!("{}: {}", i + 1, choice))
            .collect();
        for row in columns(&numbered) {
            self.console.print(&format!("    {}", row));
        }

        let Some(raw) = self.console.prompt(LIST_PROMPT)? else {
            return Ok(Answer::Stop);
        };
        if raw == STOP {
            return Ok(Answer::Stop);
        }

        let choice = raw
            .trim()
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| sorted.get(i));
        let Some(choice) = choice else {
            return Ok(Answer::Rejected(InvalidReason::BadSelection));
        };
        if choice != CUSTOM_CHOICE {
            return Ok(Answer::Value(choice.clone()));
        }

        let Some(custom) = self.console.prompt(CUSTOM_PROMPT)? else {
            return Ok(Answer::Stop);
        };
        if custom == STOP {
            return Ok(Answer::Stop);
        }
        let custom = custom.trim_start();
        if custom.is_empty() {
            return Ok(Answer::Rejected(InvalidReason::EmptyCustom));
        }
        Ok(Answer::Value(custom.to_string()))
    }
}

/// Non-negative integer of any size, normalised ("+007" -> "7").
fn parse_int(token: &str) -> Result<String, InvalidReason> {
    let (negative, digits) = match token.strip_prefix('-') {
        Some(digits) => (true, digits),
        None => (false, token.strip_prefix('+').unwrap_or(token)),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(InvalidReason::NotInteger);
    }

    let digits = digits.trim_start_matches('0');
    if digits.is_empty() {
        return Ok("0".to_string());
    }
    if negative {
        return Err(InvalidReason::NotPositive);
    }
    Ok(digits.to_string())
}

/// Non-negative float; infinity is allowed, NaN is not.
fn parse_float(token: &str) -> Result<String, InvalidReason> {
    let value: f64 = token.parse().map_err(|_| InvalidReason::NotFloat)?;
    if value.is_nan() || value < 0.0 {
        return Err(InvalidReason::NotPositive);
    }
    // Debug keeps the decimal point: 3 -> "3.0"
    Ok(format!("{:?}", value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::ScriptedConsole;

    fn spec(name: &str, tag: TypeTag) -> OptionSpec {
        OptionSpec {
            name: name.to_string(),
            tag,
        }
    }

    fn list(choices: &[&str]) -> TypeTag {
        TypeTag::List(choices.iter().map(|c| c.to_string()).collect())
    }

    fn resolve(tag: TypeTag, answers: &[&str]) -> Resolution<String> {
        let mut console = ScriptedConsole::new(answers.iter().copied());
        OptionCollector::new(&mut console)
            .resolve(&spec("opt", tag))
            .unwrap()
    }

    fn invalid(reason: InvalidReason) -> Resolution<String> {
        Resolution::Invalid(InvalidInput {
            option: "opt".to_string(),
            reason,
        })
    }

    #[test]
    fn test_int_accepts_non_negative() {
        assert_eq!(resolve(TypeTag::Int, &["4"]), Resolution::Resolved("4".into()));
        assert_eq!(resolve(TypeTag::Int, &[" 0 "]), Resolution::Resolved("0".into()));
    }

    #[test]
    fn test_int_rejects_negative_and_blank() {
        assert_eq!(resolve(TypeTag::Int, &["-1"]), invalid(InvalidReason::NotPositive));
        assert_eq!(resolve(TypeTag::Int, &[""]), invalid(InvalidReason::NotPositive));
    }

    #[test]
    fn test_int_rejects_non_integer() {
        assert_eq!(resolve(TypeTag::Int, &["2.5"]), invalid(InvalidReason::NotInteger));
        assert_eq!(resolve(TypeTag::Int, &["abc"]), invalid(InvalidReason::NotInteger));
    }

    #[test]
    fn test_float_values() {
        assert_eq!(resolve(TypeTag::Float, &["3"]), Resolution::Resolved("3.0".into()));
        assert_eq!(resolve(TypeTag::Float, &["0.25"]), Resolution::Resolved("0.25".into()));
        assert_eq!(resolve(TypeTag::Float, &["-0.5"]), invalid(InvalidReason::NotPositive));
        assert_eq!(resolve(TypeTag::Float, &[""]), invalid(InvalidReason::NotPositive));
        assert_eq!(resolve(TypeTag::Float, &["x"]), invalid(InvalidReason::NotFloat));
        assert_eq!(resolve(TypeTag::Float, &["NaN"]), invalid(InvalidReason::NotPositive));
        assert_eq!(resolve(TypeTag::Float, &["inf"]), Resolution::Resolved("inf".into()));
        assert_eq!(resolve(TypeTag::Float, &["-inf"]), invalid(InvalidReason::NotPositive));
    }

    #[test]
    fn test_int_has_no_size_limit() {
        let big = "123456789012345678901234567890";
        assert_eq!(resolve(TypeTag::Int, &[big]), Resolution::Resolved(big.into()));
        assert_eq!(resolve(TypeTag::Int, &["+007"]), Resolution::Resolved("7".into()));
        assert_eq!(resolve(TypeTag::Int, &["-0"]), Resolution::Resolved("0".into()));
        assert_eq!(
            resolve(TypeTag::Int, &["-99999999999999999999"]),
            invalid(InvalidReason::NotPositive)
        );
        assert_eq!(resolve(TypeTag::Int, &["1e3"]), invalid(InvalidReason::NotInteger));
    }

    #[test]
    fn test_stop_cancels_every_prompt_kind() {
        assert!(resolve(TypeTag::Int, &["stop"]).is_cancelled());
        assert!(resolve(TypeTag::Float, &["stop"]).is_cancelled());
        assert!(resolve(list(&["a", "?"]), &["stop"]).is_cancelled());
        assert!(resolve(list(&["a", "?"]), &["1", "stop"]).is_cancelled());
    }

    #[test]
    fn test_end_of_input_cancels() {
        assert!(resolve(TypeTag::Int, &[]).is_cancelled());
    }

    #[test]
    fn test_list_selection_uses_sorted_order() {
        assert_eq!(
            resolve(list(&["c", "a", "b"]), &["2"]),
            Resolution::Resolved("b".into())
        );
    }

    #[test]
    fn test_list_rejects_zero_blank_and_out_of_range() {
        let tag = list(&["a", "b", "c"]);
        assert_eq!(resolve(tag.clone(), &["0"]), invalid(InvalidReason::BadSelection));
        assert_eq!(resolve(tag.clone(), &[""]), invalid(InvalidReason::BadSelection));
        assert_eq!(resolve(tag.clone(), &["4"]), invalid(InvalidReason::BadSelection));
        assert_eq!(resolve(tag, &["-1"]), invalid(InvalidReason::BadSelection));
    }

    #[test]
    fn test_question_mark_accepts_free_text() {
        // sorted: "?" "a" "b" "c"
        assert_eq!(
            resolve(list(&["a", "b", "c", "?"]), &["1", "  my value here"]),
            Resolution::Resolved("my value here".into())
        );
    }

    #[test]
    fn test_blank_free_text_is_invalid() {
        assert_eq!(
            resolve(list(&["?"]), &["1", "   "]),
            invalid(InvalidReason::EmptyCustom)
        );
    }

    #[test]
    fn test_menu_is_printed_in_columns() {
        let mut console = ScriptedConsole::new(["1"]);
        OptionCollector::new(&mut console)
            .resolve(&spec("opt", list(&["b", "a"])))
            .unwrap();
        assert!(console.transcript()[0].starts_with("    1: a"));
        assert!(console.transcript()[0].contains("2: b"));
    }

    #[test]
    fn test_collect_stops_at_first_invalid_option() {
        let module = Module::parse(
            "m",
            "#!/bin/bash\n# m a b\n# a: first [int]\n# b: second [int]\n",
        )
        .unwrap();
        let mut console = ScriptedConsole::new(["-1", "3"]);
        let outcome = OptionCollector::new(&mut console).collect(&module).unwrap();
        assert!(matches!(outcome, Resolution::Invalid(ref i) if i.option == "a"));
        assert_eq!(console.remaining(), 1);
    }

    #[test]
    fn test_collect_resolves_in_schema_order() {
        let module = Module::parse(
            "m",
            "#!/bin/bash\n# m a b\n# a: first [int]\n# b: second [list: y x]\n",
        )
        .unwrap();
        let mut console = ScriptedConsole::new(["7", "1"]);
        let outcome = OptionCollector::new(&mut console).collect(&module).unwrap();
        assert_eq!(outcome, Resolution::Resolved(vec!["7".into(), "x".into()]));
        assert!(console.transcript().iter().any(|l| l == "a: first [int]"));
    }
}
