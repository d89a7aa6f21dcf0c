use nom::branch::alt;
use nom::bytes::complete::{tag, take_till1};
use nom::character::complete::{char, line_ending, not_line_ending, space0, space1};
use nom::combinator::{eof, map, opt, recognize, value, verify};
use nom::multi::{many0, many1, separated_list1};
use nom::sequence::{delimited, pair, preceded, terminated, tuple};
use nom::IResult;

#[derive(Debug)]
pub struct ParsedGrammar<'a> {
    pub nonterminals: Vec<&'a str>,
    pub terminals: Vec<&'a str>,
    pub start: &'a str,
    pub productions: Vec<ParsedProduction<'a>>,
}

#[derive(Debug)]
pub struct ParsedProduction<'a> {
    pub left: &'a str,
    /// One inner vec per `|`-separated alternative; an alternative of
    /// `["ε"]` (or the empty vec) denotes an empty production.
    pub alternatives: Vec<Vec<&'a str>>,
}

pub(crate) fn full_grammar(input: &str) -> IResult<&str, ParsedGrammar> {
    map(
        delimited(
            many0(space_comment_line),
            tuple((
                terminated(header_line("Nonterminals:"), line_ending),
                preceded(many0(space_comment_line), terminated(header_line("Terminals:"), line_ending)),
                preceded(many0(space_comment_line), terminated(start_line, line_ending)),
                preceded(
                    many0(space_comment_line),
                    separated_list1(many1(space_comment_line), production_line),
                ),
            )),
            many0(space_comment_line),
        ),
        |(nonterminals, terminals, start, productions)| ParsedGrammar {
            nonterminals,
            terminals,
            start,
            productions,
        },
    )(input)
}

fn header_line(label: &'static str) -> impl Fn(&str) -> IResult<&str, Vec<&str>> {
    move |input| {
        delimited(
            pair(tag(label), space1),
            separated_list1(space1, symbol_name),
            space_comment,
        )(input)
    }
}

fn start_line(input: &str) -> IResult<&str, &str> {
    delimited(pair(tag("Start:"), space1), symbol_name, space_comment)(input)
}

fn production_line(input: &str) -> IResult<&str, ParsedProduction> {
    map(
        delimited(
            space0,
            tuple((
                terminated(symbol_name, delimited(space0, tag("->"), space0)),
                separated_list1(delimited(space0, char('|'), space0), alternative),
            )),
            space_comment,
        ),
        |(left, alternatives)| ParsedProduction { left, alternatives },
    )(input)
}

fn alternative(input: &str) -> IResult<&str, Vec<&str>> {
    separated_list1(space1, symbol_name)(input)
}

fn symbol_name(input: &str) -> IResult<&str, &str> {
    verify(
        take_till1(|c: char| c.is_whitespace() || "#{}|".contains(c)),
        |elem: &str| elem != "->",
    )(input)
}

fn space_comment_line(input: &str) -> IResult<&str, ()> {
    value(
        (),
        verify(
            recognize(terminated(space_comment, alt((line_ending, eof)))),
            |consumed: &str| !consumed.is_empty(),
        ),
    )(input)
}

fn space_comment(input: &str) -> IResult<&str, ()> {
    value((), pair(space0, opt(comment)))(input)
}

fn comment(input: &str) -> IResult<&str, ()> {
    value((), pair(tag("#"), not_line_ending))(input)
}
