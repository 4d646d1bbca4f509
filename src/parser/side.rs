use crate::element::Symbol;
use crate::equation::{Equation, Side};
use crate::errors::ParseError;
use crate::parser::{Alphabet, PResult};
use nom::error::{ErrorKind, ParseError as NomParseError};
use nom::{character::complete::multispace0, multi::many0, sequence::terminated, Parser};

/// One declared name, after optional whitespace.
fn token<'a>(alphabet: &Alphabet, input: &'a str) -> PResult<'a, Symbol> {
    let (input, _) = multispace0::<&str, Box<ParseError>>(input)?;
    match alphabet.longest_match(input) {
        Some((symbol, len)) => Ok((&input[len..], symbol)),
        None => Err(nom::Err::Error(NomParseError::from_error_kind(input, ErrorKind::Tag))),
    }
}

fn side<'a>(alphabet: &Alphabet, input: &'a str) -> PResult<'a, Side> {
    terminated(many0(|i: &'a str| token(alphabet, i)), multispace0).parse(input)
}

/// Describe what stopped the tokenizer at `rest`, `position` bytes into the equation.
fn unmatched(rest: &str, position: usize) -> Box<ParseError> {
    match rest.chars().next() {
        Some(c) if c.is_ascii_alphabetic() => {
            let word = rest.split(|c: char| !c.is_ascii_alphabetic()).next().unwrap_or(rest);
            Box::new(ParseError::UnknownSymbol { rest: word.to_string(), position })
        }
        Some(c) => Box::new(ParseError::InvalidCharacter { invalid_char: c, position }),
        None => Box::new(ParseError::ParseFailure { s: rest.to_string() }),
    }
}

fn parse_side(text: &str, offset: usize, alphabet: &Alphabet) -> Result<Side, Box<ParseError>> {
    match side(alphabet, text) {
        Ok(("", symbols)) => Ok(symbols),
        Ok((rest, _)) => Err(unmatched(rest, offset + text.len() - rest.len())),
        Err(nom::Err::Failure(e) | nom::Err::Error(e)) => Err(e),
        Err(nom::Err::Incomplete(_)) => Err(Box::new(ParseError::ParseFailure { s: text.to_string() })),
    }
}

/// Parse `left = right` against the declared `alphabet`.
///
/// Whitespace is ignored. Each side is split by greedy longest match: with letters `{A, AB}`,
/// `"ABA"` reads as `AB A`. Either side may be empty.
///
/// # Errors
/// `EmptyInput`, `MissingEquals`, `TooManyEquals`, `UnknownSymbol` or `InvalidCharacter`.
pub fn parse_equation(input: &str, alphabet: &Alphabet) -> Result<Equation, Box<ParseError>> {
    if input.trim().is_empty() {
        return Err(Box::new(ParseError::EmptyInput));
    }

    let Some((left, right)) = input.split_once('=') else {
        return Err(Box::new(ParseError::MissingEquals { input: input.to_string() }));
    };
    if right.contains('=') {
        return Err(Box::new(ParseError::TooManyEquals { input: input.to_string() }));
    }

    let left_side = parse_side(left, 0, alphabet)?;
    let right_side = parse_side(right, left.len() + 1, alphabet)?;
    Ok(Equation::new(left_side, right_side))
}
