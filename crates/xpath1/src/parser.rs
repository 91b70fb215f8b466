//! A `nom` parser for XPath 1.0 expressions.
//!
//! Binary operators are parsed by precedence level from the table in [`LEVELS`];
//! everything tighter than `*` is a unary minus, a union of path expressions, or
//! a filtered primary expression optionally continued by a relative path.

use crate::ast::{Axis, BinaryOperator, Expression, NodeTest, PathExpr, PathOrigin, Step};
use crate::error::XPathError;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_till, take_while},
    character::complete::{char, digit0, digit1, multispace0, satisfy},
    combinator::{map, map_opt, map_res, opt, recognize, success, value, verify},
    error::{Error, ErrorKind},
    multi::{fold_many0, many0, separated_list0},
    sequence::{delimited, pair, preceded, terminated},
};

type Res<'a, T> = IResult<&'a str, T>;

/// Parses a complete expression; trailing input is an error.
pub fn parse_expression(input: &str) -> Result<Expression, XPathError> {
    let fail = |message: String| XPathError::XPathParse(input.to_string(), message);
    match ws(or_expr).parse(input) {
        Ok(("", expr)) => Ok(expr),
        Ok((rest, _)) => Err(fail(format!("Unexpected input at '{}'", rest))),
        Err(e) => Err(fail(e.to_string())),
    }
}

fn ws<'a, O, P>(inner: P) -> impl Parser<&'a str, Output = O, Error = Error<&'a str>>
where
    P: Parser<&'a str, Output = O, Error = Error<&'a str>>,
{
    delimited(multispace0, inner, multispace0)
}

fn reject<T>(input: &str) -> Res<'_, T> {
    Err(nom::Err::Error(Error::new(input, ErrorKind::Verify)))
}

// --- Operators ---

/// Operator spellings per precedence level, loosest first.
const LEVELS: [&[(&str, BinaryOperator)]; 6] = [
    &[("or", BinaryOperator::Or)],
    &[("and", BinaryOperator::And)],
    &[("!=", BinaryOperator::NotEquals), ("=", BinaryOperator::Equals)],
    &[
        ("<=", BinaryOperator::LessThanOrEqual),
        (">=", BinaryOperator::GreaterThanOrEqual),
        ("<", BinaryOperator::LessThan),
        (">", BinaryOperator::GreaterThan),
    ],
    &[("+", BinaryOperator::Plus), ("-", BinaryOperator::Minus)],
    &[
        ("*", BinaryOperator::Multiply),
        ("div", BinaryOperator::Divide),
        ("mod", BinaryOperator::Modulo),
    ],
];

/// Matches one operator of `table`. Word operators may not run into a name, so
/// `order` is never read as `or` followed by `der`.
fn operator<'a>(table: &[(&'static str, BinaryOperator)], input: &'a str) -> Res<'a, BinaryOperator> {
    for &(spelling, op) in table {
        let Some(rest) = input.strip_prefix(spelling) else {
            continue;
        };
        let is_word = spelling.starts_with(|c: char| c.is_ascii_alphabetic());
        if is_word && rest.starts_with(is_name_char) {
            continue;
        }
        return Ok((rest, op));
    }
    reject(input)
}

fn or_expr(input: &str) -> Res<'_, Expression> {
    binary(0, input)
}

/// Left-associative chain of the operators at `level`, with operands from the
/// next tighter level.
fn binary(level: usize, input: &str) -> Res<'_, Expression> {
    let Some(table) = LEVELS.get(level) else {
        return unary(input);
    };
    let (mut rest, mut left) = binary(level + 1, input)?;
    while let Ok((after_op, op)) = ws(|i| operator(table, i)).parse(rest) {
        let (after_right, right) = binary(level + 1, after_op)?;
        left = Expression::binary(left, op, right);
        rest = after_right;
    }
    Ok((rest, left))
}

fn unary(input: &str) -> Res<'_, Expression> {
    alt((
        map(preceded(ws(char('-')), unary), |expr| {
            Expression::Negate(Box::new(expr))
        }),
        union,
    ))
    .parse(input)
}

fn union(input: &str) -> Res<'_, Expression> {
    let (rest, first) = path_expr(input)?;
    fold_many0(
        preceded(ws(char('|')), path_expr),
        move || first.clone(),
        |left, right| Expression::binary(left, BinaryOperator::Union, right),
    )
    .parse(rest)
}

// --- Paths ---

/// A filter expression, optionally continued by `/` or `//` steps, or a plain
/// location path. Primary expressions are tried first so `position()` is a call
/// rather than a step named `position`.
fn path_expr(input: &str) -> Res<'_, Expression> {
    let Ok((rest, base)) = filter_expr(input) else {
        return map(location_path, Expression::Path).parse(input);
    };
    let (rest, tail) = many0(pair(separator, step)).parse(rest)?;
    if tail.is_empty() {
        return Ok((rest, base));
    }
    let mut path = PathExpr::new(PathOrigin::Expr(Box::new(base)), Vec::new());
    for (sep, next) in tail {
        path.push(sep, next);
    }
    Ok((rest, Expression::Path(path)))
}

fn filter_expr(input: &str) -> Res<'_, Expression> {
    let (rest, base) = primary(input)?;
    let (rest, predicates) = many0(predicate).parse(rest)?;
    if predicates.is_empty() {
        return Ok((rest, base));
    }
    Ok((
        rest,
        Expression::Filter {
            base: Box::new(base),
            predicates,
        },
    ))
}

fn location_path(input: &str) -> Res<'_, PathExpr> {
    if let Ok((rest, mut steps)) = preceded(tag("//"), relative_steps).parse(input) {
        steps.insert(0, Step::descendant_or_self_node());
        return Ok((rest, PathExpr::new(PathOrigin::Root, steps)));
    }
    if let Some(rest) = input.strip_prefix('/') {
        // A lone `/` selects the document node.
        let (rest, steps) = opt(relative_steps).parse(rest)?;
        return Ok((rest, PathExpr::new(PathOrigin::Root, steps.unwrap_or_default())));
    }
    map(relative_steps, |steps| PathExpr::new(PathOrigin::Context, steps)).parse(input)
}

fn relative_steps(input: &str) -> Res<'_, Vec<Step>> {
    let (rest, first) = step(input)?;
    let mut path = PathExpr::new(PathOrigin::Context, vec![first]);
    let (rest, tail) = many0(pair(separator, step)).parse(rest)?;
    for (sep, next) in tail {
        path.push(sep, next);
    }
    Ok((rest, path.steps))
}

fn separator(input: &str) -> Res<'_, &str> {
    ws(alt((tag("//"), tag("/")))).parse(input)
}

fn step(input: &str) -> Res<'_, Step> {
    let (rest, mut step) = alt((
        value(Step::new(Axis::Parent, NodeTest::AnyNode), tag("..")),
        value(Step::new(Axis::SelfAxis, NodeTest::AnyNode), char('.')),
        map(pair(axis_specifier, node_test), |(axis, test)| {
            Step::new(axis, test)
        }),
    ))
    .parse(input)?;
    let (rest, predicates) = many0(predicate).parse(rest)?;
    step.predicates = predicates;
    Ok((rest, step))
}

/// `@`, `name::`, or nothing for the child axis.
fn axis_specifier(input: &str) -> Res<'_, Axis> {
    alt((
        value(Axis::Attribute, ws(char('@'))),
        terminated(
            map_opt(nc_name, |name| {
                Axis::NAMES
                    .iter()
                    .find(|(spelling, _)| *spelling == name)
                    .map(|&(_, axis)| axis)
            }),
            ws(tag("::")),
        ),
        success(Axis::Child),
    ))
    .parse(input)
}

fn node_test(input: &str) -> Res<'_, NodeTest> {
    alt((
        value(NodeTest::AnyName, char('*')),
        kind_test,
        map(terminated(nc_name, tag(":*")), |prefix| {
            NodeTest::AnyLocalName(prefix.to_string())
        }),
        map(q_name, NodeTest::Name),
    ))
    .parse(input)
}

const KIND_TESTS: [&str; 4] = ["text", "comment", "node", "processing-instruction"];

fn kind_test(input: &str) -> Res<'_, NodeTest> {
    let (rest, name) = terminated(nc_name, ws(char('('))).parse(input)?;
    let (rest, test) = match name {
        "text" => (rest, NodeTest::Text),
        "comment" => (rest, NodeTest::Comment),
        "node" => (rest, NodeTest::AnyNode),
        "processing-instruction" => {
            map(opt(ws(string_literal)), NodeTest::ProcessingInstruction).parse(rest)?
        }
        _ => return reject(input),
    };
    let (rest, _) = char(')').parse(rest)?;
    Ok((rest, test))
}

fn predicate(input: &str) -> Res<'_, Expression> {
    delimited(ws(char('[')), or_expr, ws(char(']'))).parse(input)
}

// --- Primary expressions ---

fn primary(input: &str) -> Res<'_, Expression> {
    ws(alt((
        map(preceded(char('$'), q_name), Expression::Variable),
        map(number, Expression::Number),
        map(string_literal, Expression::Literal),
        function_call,
        delimited(char('('), ws(or_expr), char(')')),
    )))
    .parse(input)
}

/// A name directly followed by `(`. Kind tests such as `text()` belong to steps.
fn function_call(input: &str) -> Res<'_, Expression> {
    let (rest, name) =
        verify(q_name, |name: &String| !KIND_TESTS.contains(&name.as_str())).parse(input)?;
    let (rest, args) = delimited(
        ws(char('(')),
        separated_list0(ws(char(',')), or_expr),
        char(')'),
    )
    .parse(rest)?;
    Ok((rest, Expression::Call { name, args }))
}

fn string_literal(input: &str) -> Res<'_, String> {
    map(
        alt((
            delimited(char('"'), take_till(|c: char| c == '"'), char('"')),
            delimited(char('\''), take_till(|c: char| c == '\''), char('\'')),
        )),
        str::to_string,
    )
    .parse(input)
}

/// `Digits ('.' Digits?)?` or `'.' Digits`. No sign, exponent or `inf`.
fn number(input: &str) -> Res<'_, f64> {
    map_res(
        alt((
            recognize(pair(digit1, opt(pair(char('.'), digit0)))),
            recognize(pair(char('.'), digit1)),
        )),
        str::parse::<f64>,
    )
    .parse(input)
}

// --- Names ---

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | '.')
}

fn nc_name(input: &str) -> Res<'_, &str> {
    recognize(pair(
        satisfy(|c| c.is_alphabetic() || c == '_'),
        take_while(is_name_char),
    ))
    .parse(input)
}

fn q_name(input: &str) -> Res<'_, String> {
    map(
        recognize(pair(nc_name, opt(pair(char(':'), nc_name)))),
        str::to_string,
    )
    .parse(input)
}
