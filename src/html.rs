//! Start-tag locator for templates.
//!
//! Templates are not parsed into a tree. The locator only finds start tags,
//! their attributes and the byte offsets of both, which is all the binding
//! and selector migrations need to produce edits.

use nom::{
    IResult,
    branch::alt,
    bytes::complete::{tag, take_until, take_while, take_while1},
    character::complete::{char, multispace0, multispace1},
    combinator::opt,
    multi::many0,
    sequence::{delimited, pair, preceded, tuple},
};

/// One attribute of a start tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute<'a> {
    pub name: &'a str,
    /// Offset of the first character of `name`.
    pub offset: usize,
    pub value: Option<&'a str>,
}

/// A start tag, e.g. `<ui-card [title]="t" outlined>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartTag<'a> {
    pub name: &'a str,
    /// Offset of the first character of `name`, just after `<`.
    pub offset: usize,
    pub attributes: Vec<Attribute<'a>>,
}

impl StartTag<'_> {
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.iter().any(|a| a.name == name)
    }

    pub fn has_tag(&self, names: &[String]) -> bool {
        names.iter().any(|n| n.eq_ignore_ascii_case(self.name))
    }
}

/// Every start tag in `html`, in document order. Comments and end tags are
/// skipped, and anything that does not parse as a start tag is ignored.
pub fn start_tags(html: &str) -> Vec<StartTag<'_>> {
    let mut tags = Vec::new();
    let mut pos = 0;

    while let Some(idx) = html[pos..].find('<') {
        let at = pos + idx;
        let rest = &html[at..];

        if rest.starts_with("<!--") {
            pos = match rest.find("-->") {
                Some(end) => at + end + 3,
                None => html.len(),
            };
            continue;
        }

        match parse_start_tag(rest) {
            Ok((remaining, (name, attributes))) => {
                tags.push(StartTag {
                    name,
                    offset: offset_in(html, name),
                    attributes: attributes
                        .into_iter()
                        .map(|(name, value)| Attribute {
                            name,
                            offset: offset_in(html, name),
                            value,
                        })
                        .collect(),
                });
                pos = html.len() - remaining.len();
            }
            Err(_) => pos = at + 1,
        }
    }
    tags
}

fn offset_in(html: &str, slice: &str) -> usize {
    slice.as_ptr() as usize - html.as_ptr() as usize
}

type RawAttribute<'a> = (&'a str, Option<&'a str>);

fn parse_start_tag(input: &str) -> IResult<&str, (&str, Vec<RawAttribute<'_>>)> {
    let (input, _) = char('<')(input)?;
    let (input, name) = parse_tag_name(input)?;
    let (input, attributes) = many0(preceded(multispace1, parse_attribute))(input)?;
    let (input, _) = multispace0(input)?;
    let (input, _) = alt((tag(">"), tag("/>")))(input)?;
    Ok((input, (name, attributes)))
}

fn parse_tag_name(input: &str) -> IResult<&str, &str> {
    let (rest, name) = take_while1(|c: char| c.is_alphanumeric() || matches!(c, '-' | '_' | ':'))(input)?;
    if name.starts_with(|c: char| c.is_ascii_alphabetic()) {
        Ok((rest, name))
    } else {
        Err(nom::Err::Error(nom::error::Error::new(input, nom::error::ErrorKind::Alpha)))
    }
}

/// Attribute names keep binding syntax: `[x]`, `(x)`, `[(x)]`, `*x`, `#x`.
fn parse_attribute_name(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| !c.is_whitespace() && !matches!(c, '=' | '>' | '/' | '"' | '\'' | '<'))(input)
}

/// Values may also be wrapped in escaped quotes (`\"x\"`), which is how they
/// appear in templates written inside ordinary Rust string literals.
fn parse_attribute_value(input: &str) -> IResult<&str, &str> {
    preceded(
        tuple((multispace0, char('='), multispace0)),
        alt((
            delimited(tag("\\\""), take_until("\\\""), tag("\\\"")),
            delimited(tag("\\'"), take_until("\\'"), tag("\\'")),
            delimited(char('"'), take_while(|c: char| c != '"'), char('"')),
            delimited(char('\''), take_while(|c: char| c != '\''), char('\'')),
            take_while1(|c: char| !c.is_whitespace() && !matches!(c, '>' | '"' | '\'')),
        )),
    )(input)
}

fn parse_attribute(input: &str) -> IResult<&str, RawAttribute<'_>> {
    pair(parse_attribute_name, opt(parse_attribute_value))(input)
}

/// Start tags carrying `attribute`.
pub fn find_elements_with_attribute<'a>(html: &'a str, attribute: &str) -> Vec<StartTag<'a>> {
    start_tags(html)
        .into_iter()
        .filter(|t| t.has_attribute(attribute))
        .collect()
}

/// Offsets of `attribute` on elements whose tag is one of `tag_names`.
pub fn find_attribute_on_element_with_tag(html: &str, attribute: &str, tag_names: &[String]) -> Vec<usize> {
    attribute_offsets(html, attribute, |t| t.has_tag(tag_names))
}

/// Offsets of `attribute` on elements that also carry one of `attributes`.
pub fn find_attribute_on_element_with_attrs(html: &str, attribute: &str, attributes: &[String]) -> Vec<usize> {
    attribute_offsets(html, attribute, |t| attributes.iter().any(|a| t.has_attribute(a)))
}

fn attribute_offsets(html: &str, attribute: &str, element_filter: impl Fn(&StartTag<'_>) -> bool) -> Vec<usize> {
    start_tags(html)
        .iter()
        .filter(|t| element_filter(t))
        .flat_map(|t| t.attributes.iter().filter(|a| a.name == attribute).map(|a| a.offset))
        .collect()
}

/// Binding spellings of an input with the offset of the bare name inside each.
fn input_spellings(name: &str) -> [(String, usize); 3] {
    [(name.to_string(), 0), (format!("[{}]", name), 1), (format!("bind-{}", name), 5)]
}

fn output_spellings(name: &str) -> [(String, usize); 2] {
    [(format!("({})", name), 1), (format!("on-{}", name), 3)]
}

/// Offsets of the bare input name in every binding of `input` on elements
/// whose tag is one of `tag_names`.
pub fn find_inputs_on_element_with_tag(html: &str, input: &str, tag_names: &[String]) -> Vec<usize> {
    binding_offsets(&input_spellings(input), |spelling| {
        find_attribute_on_element_with_tag(html, spelling, tag_names)
    })
}

pub fn find_inputs_on_element_with_attr(html: &str, input: &str, attributes: &[String]) -> Vec<usize> {
    binding_offsets(&input_spellings(input), |spelling| {
        find_attribute_on_element_with_attrs(html, spelling, attributes)
    })
}

pub fn find_outputs_on_element_with_tag(html: &str, output: &str, tag_names: &[String]) -> Vec<usize> {
    binding_offsets(&output_spellings(output), |spelling| {
        find_attribute_on_element_with_tag(html, spelling, tag_names)
    })
}

pub fn find_outputs_on_element_with_attr(html: &str, output: &str, attributes: &[String]) -> Vec<usize> {
    binding_offsets(&output_spellings(output), |spelling| {
        find_attribute_on_element_with_attrs(html, spelling, attributes)
    })
}

/// Offsets of the bare input name in every binding of `input`, on any element.
pub fn find_inputs(html: &str, input: &str) -> Vec<usize> {
    binding_offsets(&input_spellings(input), |spelling| attribute_offsets(html, spelling, |_| true))
}

pub fn find_outputs(html: &str, output: &str) -> Vec<usize> {
    binding_offsets(&output_spellings(output), |spelling| attribute_offsets(html, spelling, |_| true))
}

fn binding_offsets(spellings: &[(String, usize)], find: impl Fn(&str) -> Vec<usize>) -> Vec<usize> {
    let mut offsets: Vec<usize> = spellings
        .iter()
        .flat_map(|(spelling, shift)| find(spelling.as_str()).into_iter().map(move |o| o + shift))
        .collect();
    offsets.sort_unstable();
    offsets
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_start_tags() {
        let html = r#"<div class="a" hidden><ui-card [title]='t' (close)=done /></div>"#;
        let tags = start_tags(html);
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0].name, "div");
        assert_eq!(tags[0].offset, 1);
        assert_eq!(tags[0].attributes[0].value, Some("a"));
        assert_eq!(tags[0].attributes[1].name, "hidden");
        assert_eq!(tags[0].attributes[1].value, None);
        assert_eq!(tags[1].name, "ui-card");
        let close = &tags[1].attributes[1];
        assert_eq!(close.name, "(close)");
        assert_eq!(close.value, Some("done"));
        assert_eq!(&html[close.offset..close.offset + 7], "(close)");
    }

    #[test]
    fn test_escaped_quote_values() {
        // Inline templates keep the escapes of the Rust literal they came from.
        let html = r#"<ui-tip [align]=\"x\" title=\'y\' hidden></ui-tip>"#;
        let tags = start_tags(html);
        assert_eq!(tags.len(), 1);
        let attributes: Vec<_> = tags[0].attributes.iter().map(|a| (a.name, a.value)).collect();
        assert_eq!(
            attributes,
            vec![("[align]", Some("x")), ("title", Some("y")), ("hidden", None)]
        );
        assert_eq!(find_inputs(html, "align"), vec![9]);
    }

    #[test]
    fn test_comments_and_text_are_skipped() {
        let html = "<!-- <ui-card a> --> 1 < 2 <p\n  a\n  b=\"x\"\n></p>";
        let tags = start_tags(html);
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].name, "p");
        assert_eq!(tags[0].attributes.len(), 2);
    }

    #[test]
    fn test_find_elements_with_attribute() {
        let html = "<button ui-raised>x</button><a ui-raised></a><span></span>";
        let found = find_elements_with_attribute(html, "ui-raised");
        let tags: Vec<_> = found.iter().map(|t| t.name).collect();
        assert_eq!(tags, vec!["button", "a"]);
    }

    #[test]
    fn test_find_attribute_on_element_with_tag() {
        let html = r#"<ui-tab color="a"></ui-tab><div color="b"></div><UI-TAB color></UI-TAB>"#;
        let offsets = find_attribute_on_element_with_tag(html, "color", &names(&["ui-tab"]));
        assert_eq!(offsets, vec![8, 56]);
        assert_eq!(&html[56..61], "color");
    }

    #[test]
    fn test_find_inputs() {
        let html = r#"<ui-tip align="x" [align]="y" bind-align="z"></ui-tip>"#;
        let offsets = find_inputs_on_element_with_tag(html, "align", &names(&["ui-tip"]));
        assert_eq!(offsets.len(), 3);
        for offset in offsets {
            assert_eq!(&html[offset..offset + 5], "align");
        }
    }

    #[test]
    fn test_find_outputs_on_element_with_attr() {
        let html = r#"<div uiSort (sortChange)="a()" on-sortChange="b()"></div><div (sortChange)="c()"></div>"#;
        let offsets = find_outputs_on_element_with_attr(html, "sortChange", &names(&["uiSort"]));
        assert_eq!(offsets.len(), 2);
        for offset in offsets {
            assert_eq!(&html[offset..offset + 10], "sortChange");
        }
    }
}
