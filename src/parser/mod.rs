mod alphabet;
mod side;

use crate::errors::ParseError;
use nom::IResult;

pub use alphabet::Alphabet;
pub(crate) use alphabet::NAME_RE;
pub use side::parse_equation;

/// Parser result type: input, output, with our custom `ParseError`
pub type PResult<'a, O> = IResult<&'a str, O, Box<ParseError>>;
