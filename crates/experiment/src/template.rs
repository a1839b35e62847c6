//! Compiled path templates.
//!
//! A template such as `"emis_{emis}/param_{param}"` is parsed once into
//! literal and placeholder parts. Placeholders are resolved to case
//! positions at compile time, so rendering is a single pass with no lookups.
//! `{{` and `}}` produce literal braces.

use crate::error::ExperimentError;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Part {
    Literal(String),
    /// Index into the experiment's cases.
    Slot(usize),
}

/// A template compiled against an ordered list of case keys.
#[derive(Debug, Clone)]
pub struct Template {
    source: String,
    parts: Vec<Part>,
}

impl Template {
    /// Parse `source` and bind every placeholder to its position in `keys`.
    ///
    /// # Errors
    ///
    /// Returns [`ExperimentError::Template`] on unbalanced braces or empty
    /// placeholders, and [`ExperimentError::UnknownPlaceholder`] when a
    /// placeholder names no key in `keys`.
    pub(crate) fn compile(source: &str, keys: &[&str]) -> Result<Self, ExperimentError> {
        let segments = parse(source).map_err(|reason| ExperimentError::Template {
            template: source.to_string(),
            reason,
        })?;

        let parts = segments
            .into_iter()
            .map(|segment| match segment {
                Segment::Literal(text) => Ok(Part::Literal(text)),
                Segment::Placeholder(name) => keys
                    .iter()
                    .position(|k| *k == name)
                    .map(Part::Slot)
                    .ok_or_else(|| ExperimentError::UnknownPlaceholder {
                        template: source.to_string(),
                        name,
                    }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            source: source.to_string(),
            parts,
        })
    }

    /// The template as written.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Case positions referenced by this template, in order of appearance.
    pub fn slots(&self) -> impl Iterator<Item = usize> + '_ {
        self.parts.iter().filter_map(|p| match p {
            Part::Slot(i) => Some(*i),
            Part::Literal(_) => None,
        })
    }

    /// Substitute `values` (one per case, in case order).
    pub(crate) fn render<S: AsRef<str>>(&self, values: &[S]) -> String {
        let mut out = String::with_capacity(self.source.len());
        for part in &self.parts {
            match part {
                Part::Literal(text) => out.push_str(text),
                Part::Slot(i) => out.push_str(values[*i].as_ref()),
            }
        }
        out
    }
}

impl PartialEq for Template {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

fn parse(source: &str) -> Result<Vec<Segment>, String> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = source.char_indices().peekable();

    while let Some((pos, c)) = chars.next() {
        match c {
            '{' if chars.peek().map(|&(_, n)| n) == Some('{') => {
                chars.next();
                literal.push('{');
            }
            '{' => {
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some((_, '}')) => break,
                        Some((_, '{')) => {
                            return Err(format!("nested '{{' in placeholder at offset {pos}"));
                        }
                        Some((_, ch)) => name.push(ch),
                        None => return Err(format!("unclosed '{{' at offset {pos}")),
                    }
                }
                if name.is_empty() {
                    return Err(format!("empty placeholder at offset {pos}"));
                }
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(Segment::Placeholder(name));
            }
            '}' if chars.peek().map(|&(_, n)| n) == Some('}') => {
                chars.next();
                literal.push('}');
            }
            '}' => return Err(format!("unmatched '}}' at offset {pos}")),
            _ => literal.push(c),
        }
    }

    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEYS: &[&str] = &["emis", "param"];

    #[test]
    fn parse_mixed_segments() {
        let segments = parse("emis_{emis}/param_{param}").unwrap();
        assert_eq!(
            segments,
            vec![
                Segment::Literal("emis_".into()),
                Segment::Placeholder("emis".into()),
                Segment::Literal("/param_".into()),
                Segment::Placeholder("param".into()),
            ]
        );
    }

    #[test]
    fn parse_escaped_braces() {
        let segments = parse("a{{b}}c").unwrap();
        assert_eq!(segments, vec![Segment::Literal("a{b}c".into())]);
    }

    #[test]
    fn parse_errors() {
        assert!(parse("{emis").unwrap_err().contains("unclosed"));
        assert!(parse("emis}").unwrap_err().contains("unmatched"));
        assert!(parse("{}").unwrap_err().contains("empty placeholder"));
        assert!(parse("{a{b}}").unwrap_err().contains("nested"));
    }

    #[test]
    fn render_substitutes_by_position() {
        let t = Template::compile("{param}.{emis}.{param}", KEYS).unwrap();
        assert_eq!(t.render(&["low", "x"]), "x.low.x");
        assert_eq!(t.slots().collect::<Vec<_>>(), vec![1, 0, 1]);
    }

    #[test]
    fn render_literal_only() {
        let t = Template::compile("", KEYS).unwrap();
        assert_eq!(t.render(&["low", "x"]), "");
        assert_eq!(t.slots().count(), 0);
    }

    #[test]
    fn unknown_placeholder_is_rejected_at_compile_time() {
        let err = Template::compile("{emis}/{parm}", KEYS).unwrap_err();
        assert!(matches!(
            err,
            ExperimentError::UnknownPlaceholder { name, .. } if name == "parm"
        ));
    }

    #[test]
    fn syntax_error_is_template_error() {
        let err = Template::compile("{emis", KEYS).unwrap_err();
        assert!(matches!(err, ExperimentError::Template { .. }));
    }
}
