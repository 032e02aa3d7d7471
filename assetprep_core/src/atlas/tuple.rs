//! Brace tuples: the `{{x,y},{w,h}}` strings texture packers store inside
//! plist `<string>` values.

use crate::atlas::{Point, Scalar};
use crate::error::{PrepError, PrepResult};

/// A parsed brace tuple: either a number or a braced list of tuples.
#[derive(Debug, Clone, PartialEq)]
pub enum Tuple {
    Scalar(Scalar),
    List(Vec<Tuple>),
}

impl Tuple {
    /// `{x,y}` as a point.
    pub fn as_point(&self) -> Option<Point> {
        match self {
            Self::List(items) => match items.as_slice() {
                [Self::Scalar(x), Self::Scalar(y)] => Some([*x, *y]),
                _ => None,
            },
            Self::Scalar(_) => None,
        }
    }

    /// `{{x,y},{w,h}}` as an origin and a size.
    pub fn as_rect(&self) -> Option<[Point; 2]> {
        match self {
            Self::List(items) => match items.as_slice() {
                [origin, size] => Some([origin.as_point()?, size.as_point()?]),
                _ => None,
            },
            Self::Scalar(_) => None,
        }
    }
}

/// Parses a brace tuple. Whitespace is ignored and a trailing comma inside
/// a list is accepted.
pub fn parse_tuple(text: &str) -> PrepResult<Tuple> {
    let mut parser = Parser {
        text,
        bytes: text.as_bytes(),
        pos: 0,
    };
    let value = parser.value()?;
    parser.skip_ws();
    if parser.pos != parser.bytes.len() {
        return Err(parser.error("trailing characters"));
    }
    Ok(value)
}

/// Parses `text` and requires the `{x,y}` shape.
pub fn parse_point(text: &str) -> PrepResult<Point> {
    parse_tuple(text)?
        .as_point()
        .ok_or_else(|| shape_error(text, "{x,y}"))
}

/// Parses `text` and requires the `{{x,y},{w,h}}` shape.
pub fn parse_rect(text: &str) -> PrepResult<[Point; 2]> {
    parse_tuple(text)?
        .as_rect()
        .ok_or_else(|| shape_error(text, "{{x,y},{w,h}}"))
}

fn shape_error(text: &str, shape: &str) -> PrepError {
    PrepError::malformed("brace tuple", format!("expected {shape}, got {text:?}"))
}

struct Parser<'a> {
    text: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(|b| b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn value(&mut self) -> PrepResult<Tuple> {
        self.skip_ws();
        match self.peek() {
            Some(b'{') => {
                self.pos += 1;
                self.list()
            }
            Some(b) if b.is_ascii_digit() || matches!(b, b'-' | b'+' | b'.') => self.number(),
            Some(_) => Err(self.error("expected '{' or a number")),
            None => Err(self.error("unexpected end")),
        }
    }

    // Called just past the opening brace.
    fn list(&mut self) -> PrepResult<Tuple> {
        let mut items = Vec::new();
        loop {
            self.skip_ws();
            if self.peek() == Some(b'}') {
                self.pos += 1;
                return Ok(Tuple::List(items));
            }
            items.push(self.value()?);
            self.skip_ws();
            match self.peek() {
                Some(b',') => self.pos += 1,
                Some(b'}') => {}
                Some(_) => return Err(self.error("expected ',' or '}'")),
                None => return Err(self.error("unclosed '{'")),
            }
        }
    }

    fn number(&mut self) -> PrepResult<Tuple> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|b| b.is_ascii_digit() || matches!(b, b'-' | b'+' | b'.' | b'e' | b'E'))
        {
            self.pos += 1;
        }
        let token = &self.text[start..self.pos];
        let scalar = if token.contains(['.', 'e', 'E']) {
            token.parse::<f64>().ok().map(Scalar::Float)
        } else {
            token.parse::<i64>().ok().map(Scalar::from)
        };
        scalar.map(Tuple::Scalar).ok_or_else(|| {
            PrepError::malformed(
                "brace tuple",
                format!("bad number {token:?} in {:?}", self.text),
            )
        })
    }

    fn error(&self, what: &str) -> PrepError {
        PrepError::malformed(
            "brace tuple",
            format!("{what} at byte {} of {:?}", self.pos, self.text),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{Tuple, parse_point, parse_rect, parse_tuple};
    use crate::atlas::Scalar;
    use crate::error::PrepError;

    #[test]
    fn rect_parses_as_origin_and_size() {
        let rect = parse_rect("{{2,3},{10,20}}").expect("rect");
        assert_eq!(
            rect,
            [
                [Scalar::Int(2), Scalar::Int(3)],
                [Scalar::Int(10), Scalar::Int(20)]
            ]
        );
    }

    #[test]
    fn point_allows_whitespace_and_negatives() {
        let point = parse_point(" { -4 , +1 } ").expect("point");
        assert_eq!(point, [Scalar::Int(-4), Scalar::Int(1)]);
    }

    #[test]
    fn fractional_values_stay_float() {
        let point = parse_point("{0.5,-1.25}").expect("point");
        assert_eq!(point, [Scalar::Float(0.5), Scalar::Float(-1.25)]);
    }

    #[test]
    fn trailing_comma_is_accepted() {
        assert_eq!(
            parse_tuple("{1,2,}").expect("tuple"),
            Tuple::List(vec![Tuple::Scalar(Scalar::Int(1)), Tuple::Scalar(Scalar::Int(2))])
        );
    }

    #[test]
    fn empty_list() {
        assert_eq!(parse_tuple("{}").expect("tuple"), Tuple::List(Vec::new()));
    }

    #[test]
    fn wrong_shape_is_malformed() {
        let err = parse_point("{{1,2},{3,4}}").unwrap_err();
        assert!(matches!(err, PrepError::MalformedDocument { .. }));
        let err = parse_rect("{1,2}").unwrap_err();
        assert!(matches!(err, PrepError::MalformedDocument { .. }));
    }

    #[test]
    fn syntax_errors_are_malformed() {
        for text in ["", "{1,2", "{1 2}", "{1,2}}", "{a,b}", "{1-2,3}"] {
            let err = parse_tuple(text).unwrap_err();
            assert!(
                matches!(err, PrepError::MalformedDocument { .. }),
                "{text:?} gave {err}"
            );
        }
    }
}
