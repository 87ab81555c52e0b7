//! Parsing of RFC 8288 `Link` headers, which the LMS uses for pagination:
//! ```text
//! <https://lms.example.edu/api/v1/courses?page=2&per_page=100>; rel="next", <...>; rel="last"
//! ```

use nom::IResult;
use nom::branch::alt;
use nom::bytes::complete::{take_till, take_until, take_while1};
use nom::character::complete::{char, space0};
use nom::multi::{many0, separated_list0};
use nom::sequence::{delimited, preceded, separated_pair, tuple};
use url::Url;

#[derive(Debug, PartialEq, Eq)]
struct Link<'a> {
    target: &'a str,
    params: Vec<(&'a str, &'a str)>,
}

impl Link<'_> {
    /// `rel` may hold several space-separated relation types.
    fn has_rel(&self, rel: &str) -> bool {
        self.params
            .iter()
            .filter(|(name, _)| name.eq_ignore_ascii_case("rel"))
            .flat_map(|(_, value)| value.split_ascii_whitespace())
            .any(|value| value.eq_ignore_ascii_case(rel))
    }
}

/// The absolute URL of the `rel="next"` link, if any.
pub(crate) fn next_url(header: &str) -> Option<Url> {
    let (_, links) = links(header).ok()?;
    links
        .into_iter()
        .find(|link| link.has_rel("next"))
        .and_then(|link| Url::parse(link.target).ok())
}

fn links(text: &str) -> IResult<&str, Vec<Link>> {
    preceded(
        space0,
        separated_list0(tuple((space0, char(','), space0)), link),
    )(text)
}

fn link(text: &str) -> IResult<&str, Link> {
    let (text, target) = delimited(char('<'), take_until(">"), char('>'))(text)?;
    let (text, params) = many0(preceded(tuple((space0, char(';'), space0)), param))(text)?;
    Ok((text, Link { target, params }))
}

fn param(text: &str) -> IResult<&str, (&str, &str)> {
    separated_pair(
        token,
        tuple((space0, char('='), space0)),
        alt((quoted, token)),
    )(text)
}

fn quoted(text: &str) -> IResult<&str, &str> {
    delimited(char('"'), take_till(|c: char| c == '"'), char('"'))(text)
}

fn token(text: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_alphanumeric() || "!#$%&'*+-.^_`|~".contains(c))(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CANVAS_HEADER: &str = concat!(
        r#"<https://lms.example.edu/api/v1/courses/7/assignments?bucket=upcoming&page=1&per_page=100>; rel="current","#,
        r#"<https://lms.example.edu/api/v1/courses/7/assignments?bucket=upcoming&page=2&per_page=100>; rel="next","#,
        r#"<https://lms.example.edu/api/v1/courses/7/assignments?bucket=upcoming&page=1&per_page=100>; rel="first","#,
        r#"<https://lms.example.edu/api/v1/courses/7/assignments?bucket=upcoming&page=3&per_page=100>; rel="last""#,
    );

    #[test]
    fn finds_next_among_many() {
        let next = next_url(CANVAS_HEADER).unwrap();
        assert_eq!(next.path(), "/api/v1/courses/7/assignments");
        assert!(next.query_pairs().any(|(k, v)| k == "page" && v == "2"));
    }

    #[test]
    fn no_next_on_last_page() {
        let header = r#"<https://lms.example.edu/api/v1/courses?page=3>; rel="current", <https://lms.example.edu/api/v1/courses?page=1>; rel="first""#;
        assert_eq!(next_url(header), None);
    }

    #[test]
    fn unquoted_and_multi_valued_rel() {
        let header = "<https://lms.example.edu/x?page=2>; rel=next, <https://lms.example.edu/x?page=9>; title=\"end\"; rel=\"last prev\"";
        assert_eq!(next_url(header).unwrap().as_str(), "https://lms.example.edu/x?page=2");

        let (_, parsed) = links(header).unwrap();
        assert_eq!(parsed.len(), 2);
        assert!(parsed[1].has_rel("prev"));
        assert!(parsed[1].has_rel("last"));
    }

    #[test]
    fn garbage_has_no_next() {
        assert_eq!(next_url(""), None);
        assert_eq!(next_url("definitely not a link header"), None);
    }
}
