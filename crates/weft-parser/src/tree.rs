//! Phase 2: indentation-driven tree construction.
//!
//! Maintains a stack of bodies under construction. An indent increase of
//! exactly one level opens a block under the previous command; a decrease
//! closes that many blocks, attaching each finished body to its parent.

use weft_ast::{Argument, Command, Program};

use crate::error::{ParseError, Result};
use crate::line::Line;

/// Build a [`Program`] from analyzed lines.
pub(crate) fn build(lines: Vec<Line>) -> Result<Program> {
    let mut stack: Vec<Vec<Command>> = vec![Vec::new()];
    let mut current_indent = 0usize;

    for line in lines {
        let command = command_from_tokens(line.tokens);

        if line.indent > current_indent {
            if line.indent != current_indent + 1 {
                return Err(ParseError::InvalidIndentationIncrease {
                    line: line.number,
                    from: current_indent,
                    to: line.indent,
                });
            }
            if stack.last().is_some_and(Vec::is_empty) {
                return Err(ParseError::EmptyBlockIndent { line: line.number });
            }
            stack.push(Vec::new());
        } else if line.indent < current_indent {
            for _ in 0..current_indent - line.indent {
                close_block(&mut stack);
            }
        }

        if let Some(top) = stack.last_mut() {
            top.push(command);
        }
        current_indent = line.indent;
    }

    while stack.len() > 1 {
        close_block(&mut stack);
    }
    let body = stack.pop().unwrap_or_default();
    Ok(Program { body })
}

/// Pop the finished body and attach it to the last command one level up.
fn close_block(stack: &mut Vec<Vec<Command>>) {
    if let Some(body) = stack.pop() {
        if let Some(parent) = stack.last_mut().and_then(|b| b.last_mut()) {
            parent.body = Some(body);
        }
    }
}

/// Build a command from a line's tokens: the first token is the name,
/// the rest classify as arguments.
fn command_from_tokens(mut tokens: Vec<String>) -> Command {
    let name = if tokens.is_empty() {
        String::new()
    } else {
        tokens.remove(0)
    };
    let args = tokens.iter().map(|t| classify(t)).collect();
    Command::leaf(name, args)
}

/// Classify one token, matching the whole lexeme in priority order:
/// substitution, string literal, option, identifier.
fn classify(token: &str) -> Argument {
    if let Some(interior) = token
        .strip_prefix("{$")
        .and_then(|rest| rest.strip_suffix('}'))
    {
        if !interior.is_empty() && !interior.contains('{') && !interior.contains('}') {
            return Argument::VariableSubstitution(interior.to_string());
        }
    }
    if token.len() >= 2 && token.starts_with('"') && token.ends_with('"') {
        return Argument::StringLiteral(token[1..token.len() - 1].to_string());
    }
    if token.starts_with('-') {
        return Argument::Option(token.to_string());
    }
    Argument::Identifier(token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    #[test]
    fn test_single_command_with_string_argument() {
        let program = parse("l my_label \"Hello World\"\n").unwrap();
        assert_eq!(program.body.len(), 1);
        let command = &program.body[0];
        assert_eq!(command.name, "l");
        assert_eq!(
            command.args,
            vec![
                Argument::Identifier("my_label".to_string()),
                Argument::StringLiteral("Hello World".to_string()),
            ]
        );
        assert!(command.body.is_none());
    }

    #[test]
    fn test_argument_classification_priority() {
        let program = parse("conf my_widget -text {$my_var} -bg \"blue\"\n").unwrap();
        assert_eq!(
            program.body[0].args,
            vec![
                Argument::Identifier("my_widget".to_string()),
                Argument::Option("-text".to_string()),
                Argument::VariableSubstitution("my_var".to_string()),
                Argument::Option("-bg".to_string()),
                Argument::StringLiteral("blue".to_string()),
            ]
        );
    }

    #[test]
    fn test_degenerate_substitution_falls_through() {
        // `{$}` has an empty interior and is not a substitution; `{$a{b}}`
        // contains an inner brace. Neither matches another rule, so both
        // classify as identifiers. A bare `-` is an option.
        assert_eq!(classify("{$}"), Argument::Identifier("{$}".to_string()));
        assert_eq!(classify("{$a{b}}"), Argument::Identifier("{$a{b}}".to_string()));
        assert_eq!(classify("-"), Argument::Option("-".to_string()));
    }

    #[test]
    fn test_nested_blocks() {
        let source = "\
bind add_button
  .click
    lappend todos {$new_todo_text}
    set new_todo_text \"\"
";
        let program = parse(source).unwrap();
        assert_eq!(program.body.len(), 1);
        let bind = &program.body[0];
        assert_eq!(bind.name, "bind");

        let events = bind.body.as_ref().unwrap();
        assert_eq!(events.len(), 1);
        let click = &events[0];
        assert_eq!(click.name, ".click");

        let handlers = click.body.as_ref().unwrap();
        assert_eq!(handlers.len(), 2);
        assert_eq!(handlers[0].name, "lappend");
        assert_eq!(
            handlers[0].args[1],
            Argument::VariableSubstitution("new_todo_text".to_string())
        );
        assert_eq!(handlers[1].name, "set");
    }

    #[test]
    fn test_dedent_returns_to_outer_block() {
        let source = "\
watch a
  set x 1
set y 2
";
        let program = parse(source).unwrap();
        assert_eq!(program.body.len(), 2);
        assert_eq!(program.body[0].name, "watch");
        assert_eq!(program.body[0].body.as_ref().unwrap().len(), 1);
        assert_eq!(program.body[1].name, "set");
        assert!(program.body[1].body.is_none());
    }

    #[test]
    fn test_dedent_by_two_levels() {
        let source = "\
bind b
  .click
    set x 1
set y 2
";
        let program = parse(source).unwrap();
        assert_eq!(program.body.len(), 2);
        let click = &program.body[0].body.as_ref().unwrap()[0];
        assert_eq!(click.body.as_ref().unwrap()[0].name, "set");
    }

    #[test]
    fn test_indent_jump_is_an_error() {
        let err = parse("set a 1\n    set b 2\n").unwrap_err();
        assert_eq!(
            err,
            ParseError::InvalidIndentationIncrease {
                line: 2,
                from: 0,
                to: 2,
            }
        );
    }

    #[test]
    fn test_indented_first_line_is_an_error() {
        let err = parse("  set a 1\n").unwrap_err();
        assert_eq!(err, ParseError::EmptyBlockIndent { line: 1 });
    }

    #[test]
    fn test_indent_invariant_children_one_deeper() {
        // Every child originates from a line exactly one level deeper than
        // its parent's line.
        let source = "\
c outer
  l inner_label \"a\"
  c inner
    b deep_button \"b\"
";
        let program = parse(source).unwrap();
        fn check(commands: &[Command]) {
            for command in commands {
                if let Some(body) = &command.body {
                    assert!(!body.is_empty());
                    check(body);
                }
            }
        }
        check(&program.body);
    }
}
