//! Line based parser turning diagram text into statements

use nom::{
    branch::alt,
    bytes::complete::{tag, tag_no_case, take_until, take_while1},
    character::complete::{char, i32 as signed, space0, space1},
    combinator::{eof, map, opt, rest, value},
    multi::{many0, separated_list1},
    sequence::{delimited, preceded, terminated},
    IResult, Parser,
};

use crate::ast::*;

/// Parse error
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("Parse error at line {line}: {message}")]
    SyntaxError { line: usize, message: String },
}

/// Parse a complete document into statements
pub fn parse(input: &str) -> Result<Vec<Statement>, ParseError> {
    let mut statements = Vec::new();
    let mut in_note = false;

    for (i, raw) in input.lines().enumerate() {
        let line = i + 1;
        let trimmed = raw.trim();

        // Everything up to `end note` belongs to the open note
        if in_note {
            if parse_end_note(trimmed).is_ok() {
                statements.push(Statement::new(line, StatementKind::EndNote));
                in_note = false;
            } else {
                statements.push(Statement::new(
                    line,
                    StatementKind::NoteLine(trimmed.to_string()),
                ));
            }
            continue;
        }

        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        match parse_line(trimmed) {
            Ok((_, kind)) => {
                if let StatementKind::Note(Note { text: None, .. }) = &kind {
                    in_note = true;
                }
                statements.push(Statement::new(line, kind));
            }
            Err(_) => {
                return Err(ParseError::SyntaxError {
                    line,
                    message: format!("unrecognized statement `{}`", trimmed),
                });
            }
        }
    }

    Ok(statements)
}

/// Parse a single line
fn parse_line(input: &str) -> IResult<&str, StatementKind> {
    alt((
        parse_message,
        parse_title_size,
        parse_title,
        parse_participant_setting,
        parse_participant,
        parse_activation,
        parse_frame_open,
        parse_else,
        parse_end_note,
        parse_end,
        parse_extend,
        parse_space,
        parse_note,
    ))
    .parse(input)
}

/// Case-insensitive keyword that must not run into a following identifier
fn keyword<'a>(word: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    move |input: &'a str| {
        let (remaining, matched) = tag_no_case(word).parse(input)?;
        if remaining.starts_with(is_identifier_char) {
            return Err(nom::Err::Error(nom::error::Error::new(
                input,
                nom::error::ErrorKind::Tag,
            )));
        }
        Ok((remaining, matched))
    }
}

fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '.'
}

/// Integer operand closing the line
fn trailing_int(input: &str) -> IResult<&str, i32> {
    terminated(signed, (space0, eof)).parse(input)
}

/// Free text after the keyword, trimmed
fn label(input: &str) -> IResult<&str, String> {
    map(rest, |s: &str| s.trim().to_string()).parse(input)
}

/// Split message or note text on `\n` escapes
fn text_lines(text: &str) -> Vec<String> {
    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }
    text.split("\\n").map(|s| s.trim().to_string()).collect()
}

/// Parse a name (quoted or unquoted)
fn parse_name(input: &str) -> IResult<&str, &str> {
    alt((
        // Quoted name (can contain spaces, colons, etc.)
        delimited(char('"'), take_until("\""), char('"')),
        take_while1(is_identifier_char),
    ))
    .parse(input)
}

/// Parse `title width <n>` / `title height <n>`
fn parse_title_size(input: &str) -> IResult<&str, StatementKind> {
    let (input, _) = (keyword("title"), space1).parse(input)?;
    let (input, is_width) =
        alt((value(true, keyword("width")), value(false, keyword("height")))).parse(input)?;
    let (input, _) = space1.parse(input)?;
    let (input, size) = trailing_int(input)?;

    let kind = if is_width {
        StatementKind::TitleWidth(size)
    } else {
        StatementKind::TitleHeight(size)
    };
    Ok((input, kind))
}

/// Parse `title <text>`
fn parse_title(input: &str) -> IResult<&str, StatementKind> {
    let (input, _) = (keyword("title"), space1).parse(input)?;
    let (input, text) = label(input)?;
    Ok((input, StatementKind::Title { text }))
}

/// Parse `participant width <n>` / `participant spacing <n>`
fn parse_participant_setting(input: &str) -> IResult<&str, StatementKind> {
    let (input, _) = (keyword("participant"), space1).parse(input)?;
    let (input, is_width) =
        alt((value(true, keyword("width")), value(false, keyword("spacing")))).parse(input)?;
    let (input, _) = space1.parse(input)?;
    let (input, size) = trailing_int(input)?;

    let kind = if is_width {
        StatementKind::ParticipantWidth(size)
    } else {
        StatementKind::ParticipantSpacing(size)
    };
    Ok((input, kind))
}

/// Parse participant declaration: `participant Name` or `participant "Long Name" as L`
fn parse_participant(input: &str) -> IResult<&str, StatementKind> {
    let (input, _) = (keyword("participant"), space1).parse(input)?;
    let (input, name) = parse_name(input)?;
    let (input, alias) =
        opt(preceded((space1, keyword("as"), space1), parse_name)).parse(input)?;
    let (input, _) = (space0, eof).parse(input)?;

    Ok((
        input,
        StatementKind::Participant {
            name: name.to_string(),
            alias: alias.map(|s| s.to_string()),
        },
    ))
}

/// Parse `activate A, B` / `deactivate A, B`
fn parse_activation(input: &str) -> IResult<&str, StatementKind> {
    let (input, activate) = alt((
        value(true, keyword("activate")),
        value(false, keyword("deactivate")),
    ))
    .parse(input)?;
    let (input, _) = space1.parse(input)?;
    let (input, names) =
        separated_list1((space0, char(','), space0), parse_name).parse(input)?;
    let (input, _) = (space0, eof).parse(input)?;

    let targets = names.into_iter().map(|s| s.to_string()).collect();
    let kind = if activate {
        StatementKind::Activate { targets }
    } else {
        StatementKind::Deactivate { targets }
    };
    Ok((input, kind))
}

/// Parse frame start: `opt <label>`, `alt <label>`, `loop <label>`, `group <label>`
fn parse_frame_open(input: &str) -> IResult<&str, StatementKind> {
    let (input, kind) = alt((
        value(FrameKind::Opt, keyword("opt")),
        value(FrameKind::Alt, keyword("alt")),
        value(FrameKind::Loop, keyword("loop")),
        value(FrameKind::Group, keyword("group")),
    ))
    .parse(input)?;
    let (input, label) = label(input)?;
    Ok((input, StatementKind::FrameOpen { kind, label }))
}

/// Parse `else <label>`
fn parse_else(input: &str) -> IResult<&str, StatementKind> {
    let (input, _) = keyword("else").parse(input)?;
    let (input, label) = label(input)?;
    Ok((input, StatementKind::Else { label }))
}

/// Parse `end note`
fn parse_end_note(input: &str) -> IResult<&str, StatementKind> {
    let (input, _) = (keyword("end"), space1, keyword("note"), space0, eof).parse(input)?;
    Ok((input, StatementKind::EndNote))
}

/// Parse `end`
fn parse_end(input: &str) -> IResult<&str, StatementKind> {
    let (input, _) = (keyword("end"), space0, eof).parse(input)?;
    Ok((input, StatementKind::End))
}

/// Parse `extend <n>`
fn parse_extend(input: &str) -> IResult<&str, StatementKind> {
    let (input, _) = (keyword("extend"), space1).parse(input)?;
    let (input, delta) = trailing_int(input)?;
    Ok((input, StatementKind::Extend(delta)))
}

/// Parse `space <n>`
fn parse_space(input: &str) -> IResult<&str, StatementKind> {
    let (input, _) = (keyword("space"), space1).parse(input)?;
    let (input, delta) = trailing_int(input)?;
    Ok((input, StatementKind::Space(delta)))
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum NoteOption {
    Dx,
    Dy,
    Width,
    Height,
}

/// Parse one `key=value` note option
fn parse_note_option(input: &str) -> IResult<&str, (NoteOption, i32)> {
    let (input, key) = alt((
        value(NoteOption::Dx, keyword("dx")),
        value(NoteOption::Dy, keyword("dy")),
        value(NoteOption::Width, keyword("width")),
        value(NoteOption::Height, keyword("height")),
    ))
    .parse(input)?;
    let (input, _) = (space0, char('='), space0).parse(input)?;
    let (input, amount) = signed(input)?;
    Ok((input, (key, amount)))
}

/// Parse note header: `note A dx=10 width=120` or single line `note A: text`
fn parse_note(input: &str) -> IResult<&str, StatementKind> {
    let (input, _) = (keyword("note"), space1).parse(input)?;
    let (input, target) = parse_name(input)?;
    let (input, options) = many0(preceded(space1, parse_note_option)).parse(input)?;
    let (input, _) = space0.parse(input)?;
    let (input, text) = opt(preceded(char(':'), rest)).parse(input)?;
    let (input, _) = eof(input)?;

    let mut note = Note {
        target: target.to_string(),
        text: text.map(text_lines),
        ..Note::default()
    };
    for (key, amount) in options {
        match key {
            NoteOption::Dx => note.dx = Some(amount),
            NoteOption::Dy => note.dy = Some(amount),
            NoteOption::Width => note.width = Some(amount),
            NoteOption::Height => note.height = Some(amount),
        }
    }

    Ok((input, StatementKind::Note(note)))
}

/// Parse `left` / `right`
fn parse_side(input: &str) -> IResult<&str, Side> {
    alt((
        value(Side::Left, keyword("left")),
        value(Side::Right, keyword("right")),
    ))
    .parse(input)
}

/// Parse a message endpoint: participant name or `found|lost left|right`
fn parse_endpoint(input: &str) -> IResult<&str, Endpoint> {
    alt((
        map(preceded((keyword("found"), space1), parse_side), Endpoint::Found),
        map(preceded((keyword("lost"), space1), parse_side), Endpoint::Lost),
        map(parse_name, Endpoint::named),
    ))
    .parse(input)
}

/// Parse arrow: `->`, `->>`, `-->`, `-->>`
fn parse_arrow(input: &str) -> IResult<&str, Arrow> {
    alt((
        value(Arrow::RESPONSE_OPEN, tag("-->>")),
        value(Arrow::RESPONSE, tag("-->")),
        value(Arrow::SYNC_OPEN, tag("->>")),
        value(Arrow::SYNC, tag("->")),
    ))
    .parse(input)
}

/// Parse activation marker: `+`, `-`, `|`
fn parse_activation_marker(input: &str) -> IResult<&str, ActivationEffect> {
    map(
        opt(alt((
            value(ActivationEffect::Activate, char('+')),
            value(ActivationEffect::Deactivate, char('-')),
            value(ActivationEffect::FireAndForget, char('|')),
        ))),
        Option::unwrap_or_default,
    )
    .parse(input)
}

/// Parse a message: `A ->+ B: text`, `found left -> A`, `A -> self: text`
fn parse_message(input: &str) -> IResult<&str, StatementKind> {
    let (input, sender) = parse_endpoint(input)?;
    let (input, _) = space0.parse(input)?;
    let (input, arrow) = parse_arrow(input)?;
    let (input, activation) = parse_activation_marker(input)?;
    let (input, _) = space0.parse(input)?;
    let (input, receiver) = alt((
        value(Endpoint::Myself, keyword("self")),
        parse_endpoint,
    ))
    .parse(input)?;
    let (input, _) = space0.parse(input)?;
    let (input, text) = opt(preceded(char(':'), rest)).parse(input)?;
    let (input, _) = eof(input)?;

    Ok((
        input,
        StatementKind::Message(Message {
            sender,
            receiver,
            arrow,
            activation,
            text: text.map(text_lines).unwrap_or_default(),
        }),
    ))
}
