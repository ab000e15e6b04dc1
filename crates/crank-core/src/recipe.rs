//! Recipe parameters: declaration syntax, positional binding and `{{NAME}}`
//! substitution into command tokens.
//!
//! Parameters are declared the way a justfile declares them:
//!
//! | Syntax          | Meaning                          |
//! |-----------------|----------------------------------|
//! | `NAME`          | exactly one value, required      |
//! | `NAME=default`  | exactly one value, optional      |
//! | `+NAME`         | one or more values (variadic)    |
//! | `*NAME`         | zero or more values (variadic)   |
//!
//! A command token that is exactly `{{NAME}}` for a variadic parameter
//! expands into one argv entry per value. Anywhere else a placeholder is
//! replaced textually, with variadic values joined by single spaces.
//! `{{{{` produces a literal `{{`.

use crate::error::{CrankError, Result};
use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Param
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Single,
    OneOrMore,
    ZeroOrMore,
}

impl Arity {
    pub fn is_variadic(self) -> bool {
        !matches!(self, Arity::Single)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Param {
    pub name: String,
    pub arity: Arity,
    pub default: Option<String>,
}

static NAME_RE: OnceLock<Regex> = OnceLock::new();

fn name_re() -> &'static Regex {
    NAME_RE.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_-]*$").unwrap())
}

pub fn is_valid_name(name: &str) -> bool {
    name_re().is_match(name)
}

impl FromStr for Param {
    type Err = CrankError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || CrankError::InvalidParam(s.to_string());
        let (arity, rest) = match s.as_bytes().first() {
            Some(b'+') => (Arity::OneOrMore, &s[1..]),
            Some(b'*') => (Arity::ZeroOrMore, &s[1..]),
            _ => (Arity::Single, s),
        };
        let (name, default) = match rest.split_once('=') {
            Some(_) if arity.is_variadic() => return Err(invalid()),
            Some((name, default)) => (name, Some(default.to_string())),
            None => (rest, None),
        };
        if !is_valid_name(name) {
            return Err(invalid());
        }
        Ok(Param {
            name: name.to_string(),
            arity,
            default,
        })
    }
}

impl TryFrom<String> for Param {
    type Error = CrankError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<Param> for String {
    fn from(p: Param) -> String {
        p.to_string()
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.arity {
            Arity::OneOrMore => write!(f, "+{}", self.name),
            Arity::ZeroOrMore => write!(f, "*{}", self.name),
            Arity::Single => match &self.default {
                Some(d) => write!(f, "{}={}", self.name, d),
                None => write!(f, "{}", self.name),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Binding
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub arity: Arity,
    pub values: Vec<String>,
}

/// Parameter name → bound values, in declaration order.
pub type Bindings = IndexMap<String, Binding>;

/// Bind positional `args` to `params` in declaration order.
pub fn bind(recipe: &str, params: &[Param], args: &[String]) -> Result<Bindings> {
    let mut bindings = Bindings::new();
    let mut rest = args;

    for param in params {
        let values = match param.arity {
            Arity::Single => match rest.split_first() {
                Some((first, tail)) => {
                    rest = tail;
                    vec![first.clone()]
                }
                None => {
                    let default = param.default.clone().ok_or_else(|| {
                        CrankError::MissingArgument {
                            recipe: recipe.to_string(),
                            param: param.name.clone(),
                        }
                    })?;
                    vec![default]
                }
            },
            Arity::OneOrMore | Arity::ZeroOrMore => {
                if rest.is_empty() && param.arity == Arity::OneOrMore {
                    return Err(CrankError::MissingArgument {
                        recipe: recipe.to_string(),
                        param: param.name.clone(),
                    });
                }
                let taken = rest.to_vec();
                rest = &[];
                taken
            }
        };
        bindings.insert(
            param.name.clone(),
            Binding {
                arity: param.arity,
                values,
            },
        );
    }

    if !rest.is_empty() {
        return Err(CrankError::TooManyArguments {
            recipe: recipe.to_string(),
            expected: params.len(),
            got: args.len(),
        });
    }
    Ok(bindings)
}

// ---------------------------------------------------------------------------
// Templates
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Placeholder(String),
}

/// Split a command token into literal text and `{{NAME}}` placeholders.
pub fn parse_template(recipe: &str, token: &str) -> Result<Vec<Segment>> {
    let invalid = |reason: String| CrankError::InvalidTemplate {
        recipe: recipe.to_string(),
        reason,
    };

    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut rest = token;

    while let Some(start) = rest.find("{{") {
        literal.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        if let Some(tail) = after.strip_prefix("{{") {
            literal.push_str("{{");
            rest = tail;
            continue;
        }
        let end = after
            .find("}}")
            .ok_or_else(|| invalid(format!("unterminated '{{{{' in '{token}'")))?;
        let name = after[..end].trim();
        if !is_valid_name(name) {
            return Err(invalid(format!("bad placeholder '{{{{{name}}}}}' in '{token}'")));
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(std::mem::take(&mut literal)));
        }
        segments.push(Segment::Placeholder(name.to_string()));
        rest = &after[end + 2..];
    }
    literal.push_str(rest);
    if !literal.is_empty() || segments.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    Ok(segments)
}

/// Names referenced by a command, in first-seen order.
pub fn placeholders(recipe: &str, command: &[String]) -> Result<Vec<String>> {
    let mut names: Vec<String> = Vec::new();
    for token in command {
        for seg in parse_template(recipe, token)? {
            if let Segment::Placeholder(name) = seg {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
    }
    Ok(names)
}

/// Substitute bound values into `command`, producing the final argv.
pub fn expand(recipe: &str, command: &[String], bindings: &Bindings) -> Result<Vec<String>> {
    let lookup = |name: &str| {
        bindings
            .get(name)
            .ok_or_else(|| CrankError::UndefinedParameter {
                recipe: recipe.to_string(),
                name: name.to_string(),
            })
    };

    let mut argv = Vec::with_capacity(command.len());
    for token in command {
        let segments = parse_template(recipe, token)?;

        if let [Segment::Placeholder(name)] = segments.as_slice() {
            let binding = lookup(name.as_str())?;
            if binding.arity.is_variadic() {
                argv.extend(binding.values.iter().cloned());
                continue;
            }
        }

        let mut out = String::new();
        for seg in &segments {
            match seg {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder(name) => {
                    out.push_str(&lookup(name.as_str())?.values.join(" "))
                }
            }
        }
        argv.push(out);
    }
    Ok(argv)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(s: &str) -> Param {
        s.parse().unwrap()
    }

    fn args(xs: &[&str]) -> Vec<String> {
        xs.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn param_syntax() {
        assert_eq!(p("+CMD").arity, Arity::OneOrMore);
        assert_eq!(p("*ARGS").arity, Arity::ZeroOrMore);
        let target = p("TARGET=debug");
        assert_eq!(target.arity, Arity::Single);
        assert_eq!(target.default.as_deref(), Some("debug"));
        assert_eq!(target.to_string(), "TARGET=debug");
        assert_eq!(p("+CMD").to_string(), "+CMD");
    }

    #[test]
    fn param_syntax_rejects_garbage() {
        assert!("".parse::<Param>().is_err());
        assert!("+".parse::<Param>().is_err());
        assert!("+CMD=up".parse::<Param>().is_err());
        assert!("9lives".parse::<Param>().is_err());
        assert!("has space".parse::<Param>().is_err());
    }

    #[test]
    fn param_deserializes_from_yaml_string() {
        let params: Vec<Param> = serde_yaml::from_str("- NAME\n- +CMD\n").unwrap();
        assert_eq!(params[0].name, "NAME");
        assert_eq!(params[1].arity, Arity::OneOrMore);
    }

    #[test]
    fn one_or_more_needs_a_value() {
        let err = bind("migrate", &[p("+CMD")], &[]).unwrap_err();
        assert!(matches!(err, CrankError::MissingArgument { ref param, .. } if param == "CMD"));
    }

    #[test]
    fn zero_or_more_accepts_nothing() {
        let b = bind("test", &[p("*ARGS")], &[]).unwrap();
        assert!(b["ARGS"].values.is_empty());
    }

    #[test]
    fn single_uses_default_when_missing() {
        let b = bind("build", &[p("TARGET=debug")], &[]).unwrap();
        assert_eq!(b["TARGET"].values, vec!["debug"]);
        let b = bind("build", &[p("TARGET=debug")], &args(&["release"])).unwrap();
        assert_eq!(b["TARGET"].values, vec!["release"]);
    }

    #[test]
    fn surplus_arguments_rejected() {
        let err = bind("watch", &[], &args(&["extra"])).unwrap_err();
        assert!(matches!(
            err,
            CrankError::TooManyArguments {
                expected: 0,
                got: 1,
                ..
            }
        ));
    }

    #[test]
    fn variadic_swallows_the_tail() {
        let b = bind("svc", &[p("NAME"), p("+CMD")], &args(&["api", "up", "-d"])).unwrap();
        assert_eq!(b["NAME"].values, vec!["api"]);
        assert_eq!(b["CMD"].values, vec!["up", "-d"]);
    }

    #[test]
    fn whole_token_variadic_expands_per_value() {
        let command = args(&["docker", "compose", "--profile", "dev", "{{CMD}}"]);
        let b = bind("dev", &[p("+CMD")], &args(&["up", "--build", "api"])).unwrap();
        assert_eq!(
            expand("dev", &command, &b).unwrap(),
            args(&["docker", "compose", "--profile", "dev", "up", "--build", "api"])
        );
    }

    #[test]
    fn embedded_placeholders_are_textual() {
        let command = args(&["echo", "target={{ T }}", "all={{REST}}"]);
        let b = bind("x", &[p("T"), p("*REST")], &args(&["a", "b", "c"])).unwrap();
        assert_eq!(
            expand("x", &command, &b).unwrap(),
            args(&["echo", "target=a", "all=b c"])
        );
    }

    #[test]
    fn empty_variadic_token_disappears() {
        let command = args(&["cargo", "test", "{{ARGS}}"]);
        let b = bind("t", &[p("*ARGS")], &[]).unwrap();
        assert_eq!(expand("t", &command, &b).unwrap(), args(&["cargo", "test"]));
    }

    #[test]
    fn escaped_braces_stay_literal() {
        let segs = parse_template("x", "{{{{.Names}}").unwrap();
        assert_eq!(segs, vec![Segment::Literal("{{.Names}}".to_string())]);
    }

    #[test]
    fn unknown_placeholder_is_an_error() {
        let err = expand("x", &args(&["{{NOPE}}"]), &Bindings::new()).unwrap_err();
        assert!(matches!(err, CrankError::UndefinedParameter { ref name, .. } if name == "NOPE"));
    }

    #[test]
    fn unterminated_placeholder_is_an_error() {
        let err = parse_template("x", "{{CMD").unwrap_err();
        assert!(matches!(err, CrankError::InvalidTemplate { .. }));
    }

    #[test]
    fn placeholders_are_deduplicated() {
        let names = placeholders("x", &args(&["{{A}}", "{{B}}-{{A}}"])).unwrap();
        assert_eq!(names, vec!["A", "B"]);
    }
}
