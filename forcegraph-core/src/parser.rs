use crate::ast::{
    CircleDecl, DetectorDecl, DetectorKind, ForceDecl, ForceKind, LinkDecl, Scene, SceneItem,
    SimulateDecl,
};
use crate::diagnostics::Span;
use crate::engine::{NodeId, NodeSpec};
use crate::links::LinkMeta;
use glam::DVec2;
use thiserror::Error;

/// Parse error with optional span information
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("{message}")]
    SyntaxError {
        message: String,
        span: Option<Span>,
    },
}

impl ParseError {
    pub fn new(message: impl Into<String>, span: Option<Span>) -> Self {
        Self::SyntaxError {
            message: message.into(),
            span,
        }
    }

    pub fn message(message: impl Into<String>) -> Self {
        Self::SyntaxError {
            message: message.into(),
            span: None,
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            Self::SyntaxError { span, .. } => *span,
        }
    }
}

/// Byte offsets of line starts, for spans
struct ParseContext {
    line_offsets: Vec<usize>,
    len: usize,
}

impl ParseContext {
    fn new(source: &str) -> Self {
        let mut line_offsets = vec![0];
        for (i, ch) in source.char_indices() {
            if ch == '\n' {
                line_offsets.push(i + 1);
            }
        }
        Self {
            line_offsets,
            len: source.len(),
        }
    }

    fn full_line_span(&self, line: usize) -> Span {
        let start = self.line_offsets.get(line).copied().unwrap_or(self.len);
        let end = self.line_offsets.get(line + 1).copied().unwrap_or(self.len);
        Span::new(start, end)
    }
}

/// Parse a `.graph` scene from source text
pub fn parse_scene(source: &str) -> Result<Scene, ParseError> {
    let ctx = ParseContext::new(source);
    let mut simulate = None;
    let mut circle = None;
    let mut seed = None;
    let mut force_links = true;
    let mut items = Vec::new();
    let mut detectors = Vec::new();

    for (i, raw) in source.lines().enumerate() {
        let line = strip_comment(raw).trim();
        if line.is_empty() {
            continue;
        }
        let span = Some(ctx.full_line_span(i));
        let tokens = tokenize(line, span)?;
        let (keyword, args) = tokens
            .split_first()
            .ok_or_else(|| ParseError::new("Empty declaration", span))?;

        match keyword.as_str() {
            "simulate" => {
                if simulate.is_some() {
                    return Err(ParseError::new("Duplicate 'simulate' declaration", span));
                }
                simulate = Some(parse_simulate(args, span)?);
            }
            "circle" => circle = Some(parse_circle(args, span)?),
            "seed" => seed = Some(parse_seed(args, span)?),
            "force_links" => force_links = parse_switch(args, span)?,
            "node" => items.push(SceneItem::Node(parse_node(args, span)?)),
            "anchor" => items.push(SceneItem::Anchor(parse_single_id(args, "anchor", span)?)),
            "link" => items.push(SceneItem::Link(parse_link(args, span)?)),
            "force" => items.push(SceneItem::Force(parse_force(args, span)?)),
            "detect" => detectors.push(parse_detector(args, span)?),
            other => {
                return Err(ParseError::new(format!("Unexpected token: {}", other), span));
            }
        }
    }

    let simulate =
        simulate.ok_or_else(|| ParseError::message("Missing 'simulate' declaration"))?;

    Ok(Scene {
        simulate,
        circle,
        seed,
        force_links,
        items,
        detectors,
    })
}

/// Cut the line at the first `#` that starts a comment.
///
/// A `#` right after `=` is a value such as `color = #ff0000`, and a `#`
/// inside quotes belongs to the name.
fn strip_comment(line: &str) -> &str {
    let mut in_quotes = false;
    let mut prev = None;
    for (idx, ch) in line.char_indices() {
        match ch {
            '"' => in_quotes = !in_quotes,
            '#' if !in_quotes && prev != Some('=') => return &line[..idx],
            _ => {}
        }
        if !ch.is_whitespace() {
            prev = Some(ch);
        }
    }
    line
}

/// Split a line into words, `=` signs, quoted names and parenthesised groups.
///
/// `spring(1, 2)` becomes `spring`, `(1, 2)`. Quoted tokens keep their quotes.
fn tokenize(line: &str, span: Option<Span>) -> Result<Vec<String>, ParseError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut chars = line.chars();

    while let Some(ch) = chars.next() {
        match ch {
            '(' => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
                let mut group = String::from("(");
                loop {
                    match chars.next() {
                        Some(')') => break,
                        Some('(') => {
                            return Err(ParseError::new("Nested '(' is not allowed", span));
                        }
                        Some(c) => group.push(c),
                        None => return Err(ParseError::new("Expected ')'", span)),
                    }
                }
                group.push(')');
                tokens.push(group);
            }
            ')' => return Err(ParseError::new("Unexpected ')'", span)),
            '"' => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
                let mut quoted = String::from("\"");
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some(c) => quoted.push(c),
                        None => return Err(ParseError::new("Unterminated '\"'", span)),
                    }
                }
                quoted.push('"');
                tokens.push(quoted);
            }
            '=' => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
                tokens.push("=".to_string());
            }
            c if c.is_whitespace() => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    Ok(tokens)
}

fn parse_number(token: &str, what: &str, span: Option<Span>) -> Result<f64, ParseError> {
    token
        .parse::<f64>()
        .map_err(|_| ParseError::new(format!("Invalid {}: {}", what, token), span))
}

fn parse_id(token: &str, span: Option<Span>) -> Result<NodeId, ParseError> {
    token
        .parse::<NodeId>()
        .map_err(|_| ParseError::new(format!("Invalid node id: {}", token), span))
}

/// Contents of a `( ... )` group, split on commas
fn group_items<'a>(token: &'a str, span: Option<Span>) -> Result<Vec<&'a str>, ParseError> {
    let inner = token
        .strip_prefix('(')
        .and_then(|t| t.strip_suffix(')'))
        .ok_or_else(|| ParseError::new(format!("Expected '(' ... ')', found: {}", token), span))?;
    Ok(inner.split(',').map(str::trim).collect())
}

fn parse_vec2(token: &str, span: Option<Span>) -> Result<DVec2, ParseError> {
    let coords = group_items(token, span)?;
    if coords.len() != 2 {
        return Err(ParseError::new(
            format!("Expected two coordinates in position: {}", token),
            span,
        ));
    }
    Ok(DVec2::new(
        parse_number(coords[0], "coordinate", span)?,
        parse_number(coords[1], "coordinate", span)?,
    ))
}

fn parse_id_pair(token: &str, span: Option<Span>) -> Result<(NodeId, NodeId), ParseError> {
    let ids = group_items(token, span)?;
    if ids.len() != 2 {
        return Err(ParseError::new(
            format!("Expected two node ids: {}", token),
            span,
        ));
    }
    Ok((parse_id(ids[0], span)?, parse_id(ids[1], span)?))
}

/// `key = value` pairs, in order
fn parse_assignments(tokens: &[String], span: Option<Span>) -> Result<Vec<(&str, &str)>, ParseError> {
    if tokens.len() % 3 != 0 {
        return Err(ParseError::new("Expected 'key = value' assignments", span));
    }
    tokens
        .chunks(3)
        .map(|chunk| {
            if chunk[1] != "=" || chunk[0] == "=" || chunk[2] == "=" {
                return Err(ParseError::new(
                    format!("Expected 'key = value', found: {}", chunk.join(" ")),
                    span,
                ));
            }
            Ok((chunk[0].as_str(), chunk[2].as_str()))
        })
        .collect()
}

/// Parse `simulate dt = x steps = n [friction = f] [mass = m]`
fn parse_simulate(args: &[String], span: Option<Span>) -> Result<SimulateDecl, ParseError> {
    let mut dt = None;
    let mut steps = None;
    let mut friction = None;
    let mut mass = None;

    for (key, value) in parse_assignments(args, span)? {
        match key {
            "dt" => dt = Some(parse_number(value, "dt", span)?),
            "friction" => friction = Some(parse_number(value, "friction", span)?),
            "mass" => mass = Some(parse_number(value, "mass", span)?),
            "steps" => {
                steps = Some(value.parse::<usize>().map_err(|_| {
                    ParseError::new(format!("Invalid steps: {}", value), span)
                })?)
            }
            other => {
                return Err(ParseError::new(
                    format!("Unknown simulate option: {}", other),
                    span,
                ))
            }
        }
    }

    let dt = dt.ok_or_else(|| ParseError::new("Expected 'dt =' in simulate", span))?;
    let steps = steps.ok_or_else(|| ParseError::new("Expected 'steps =' in simulate", span))?;
    if dt <= 0.0 {
        return Err(ParseError::new("dt must be positive", span));
    }
    if let Some(m) = mass {
        if m <= 0.0 {
            return Err(ParseError::new("mass must be positive", span));
        }
    }
    if let Some(f) = friction {
        if f < 0.0 {
            return Err(ParseError::new("friction must not be negative", span));
        }
    }

    Ok(SimulateDecl {
        dt,
        friction,
        mass,
        steps,
    })
}

/// Parse `circle radius = r [center = (x, y)]`
fn parse_circle(args: &[String], span: Option<Span>) -> Result<CircleDecl, ParseError> {
    let mut radius = None;
    let mut center = None;

    for (key, value) in parse_assignments(args, span)? {
        match key {
            "radius" => radius = Some(parse_number(value, "radius", span)?),
            "center" => center = Some(parse_vec2(value, span)?),
            other => {
                return Err(ParseError::new(
                    format!("Unknown circle option: {}", other),
                    span,
                ))
            }
        }
    }

    let radius = radius.ok_or_else(|| ParseError::new("Expected 'radius =' in circle", span))?;
    if radius <= 0.0 {
        return Err(ParseError::new("radius must be positive", span));
    }
    Ok(CircleDecl { radius, center })
}

fn parse_seed(args: &[String], span: Option<Span>) -> Result<u64, ParseError> {
    match args {
        [value] => value
            .parse::<u64>()
            .map_err(|_| ParseError::new(format!("Invalid seed: {}", value), span)),
        _ => Err(ParseError::new("Expected 'seed <integer>'", span)),
    }
}

fn parse_switch(args: &[String], span: Option<Span>) -> Result<bool, ParseError> {
    match args {
        [value] if value == "on" => Ok(true),
        [value] if value == "off" => Ok(false),
        _ => Err(ParseError::new("Expected 'on' or 'off'", span)),
    }
}

fn parse_single_id(args: &[String], what: &str, span: Option<Span>) -> Result<NodeId, ParseError> {
    match args {
        [id] => parse_id(id, span),
        _ => Err(ParseError::new(format!("Expected '{} <id>'", what), span)),
    }
}

/// Quoted name without its quotes, `None` for any other token
fn parse_name(token: &str, span: Option<Span>) -> Result<Option<String>, ParseError> {
    match token.strip_prefix('"').and_then(|t| t.strip_suffix('"')) {
        Some("") => Err(ParseError::new("Node name must not be empty", span)),
        Some(name) => Ok(Some(name.to_string())),
        None => Ok(None),
    }
}

/// Parse `node id ["name"] (at (x, y) | angle a | random) [static] [mass m] [link id]`
fn parse_node(args: &[String], span: Option<Span>) -> Result<NodeSpec, ParseError> {
    let (id, rest) = args
        .split_first()
        .ok_or_else(|| ParseError::new("Expected node id", span))?;
    let id = parse_id(id, span)?;

    let (name, rest) = match rest.split_first() {
        Some((token, tail)) => match parse_name(token, span)? {
            Some(name) => (Some(name), tail),
            None => (None, rest),
        },
        None => (None, rest),
    };

    let (mut spec, mut rest) = match rest {
        [kw, pos, tail @ ..] if kw == "at" => (NodeSpec::at(id, parse_vec2(pos, span)?), tail),
        [kw, angle, tail @ ..] if kw == "angle" => (
            NodeSpec::on_circle(id, parse_number(angle, "angle", span)?),
            tail,
        ),
        [kw, tail @ ..] if kw == "random" => (NodeSpec::random(id), tail),
        _ => {
            return Err(ParseError::new(
                "Expected 'at (x, y)', 'angle a' or 'random' in node declaration",
                span,
            ))
        }
    };

    if let Some(name) = name {
        spec = spec.named(name);
    }

    while let Some((kw, tail)) = rest.split_first() {
        match (kw.as_str(), tail) {
            ("static", _) => {
                spec = spec.fixed();
                rest = tail;
            }
            ("mass", [value, tail @ ..]) => {
                let mass = parse_number(value, "mass", span)?;
                if mass <= 0.0 {
                    return Err(ParseError::new("mass must be positive", span));
                }
                spec = spec.with_mass(mass);
                rest = tail;
            }
            ("link", [other, tail @ ..]) => {
                spec = spec.linked_to(parse_id(other, span)?);
                rest = tail;
            }
            (other, _) => {
                return Err(ParseError::new(
                    format!("Unexpected node option: {}", other),
                    span,
                ))
            }
        }
    }

    Ok(spec)
}

/// Parse `link a b [key = value]...`
fn parse_link(args: &[String], span: Option<Span>) -> Result<LinkDecl, ParseError> {
    let (a, b, options) = match args {
        [a, b, options @ ..] => (parse_id(a, span)?, parse_id(b, span)?, options),
        _ => return Err(ParseError::new("Expected 'link <a> <b>'", span)),
    };
    let meta: LinkMeta = parse_assignments(options, span)?
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Ok(LinkDecl { a, b, meta })
}

/// Parse `force spring(a, b) k = x rest = y` or `force gravity(a, b) G = x`
fn parse_force(args: &[String], span: Option<Span>) -> Result<ForceDecl, ParseError> {
    let (force_type, pair, options) = match args {
        [force_type, pair, options @ ..] => (force_type.as_str(), pair, options),
        _ => return Err(ParseError::new("Expected 'force <kind>(a, b)'", span)),
    };
    let (a, b) = parse_id_pair(pair, span)?;
    let options = parse_assignments(options, span)?;
    let lookup = |name: &str| {
        options
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| *value)
            .ok_or_else(|| ParseError::new(format!("Expected '{} =' in {} force", name, force_type), span))
    };

    let kind = match force_type {
        "spring" => {
            let rest = parse_number(lookup("rest")?, "rest", span)?;
            if rest < 0.0 {
                return Err(ParseError::new("rest must not be negative", span));
            }
            ForceKind::Spring {
                k: parse_number(lookup("k")?, "k", span)?,
                rest,
            }
        }
        "gravity" => ForceKind::Gravity {
            g: parse_number(lookup("G")?, "G", span)?,
        },
        other => {
            return Err(ParseError::new(
                format!("Unknown force type: {}", other),
                span,
            ))
        }
    };

    Ok(ForceDecl { a, b, kind })
}

/// Parse `detect name = distance(a, b)` or `detect name = position(a)`
fn parse_detector(args: &[String], span: Option<Span>) -> Result<DetectorDecl, ParseError> {
    let (name, func, group) = match args {
        [name, eq, func, group] if eq == "=" => (name, func.as_str(), group),
        _ => {
            return Err(ParseError::new(
                "Expected 'detect <name> = <function>(...)'",
                span,
            ))
        }
    };

    let kind = match func {
        "distance" => {
            let (a, b) = parse_id_pair(group, span)?;
            DetectorKind::Distance { a, b }
        }
        "position" => match group_items(group, span)?.as_slice() {
            [id] => DetectorKind::Position(parse_id(id, span)?),
            _ => return Err(ParseError::new("Expected 'position(<id>)'", span)),
        },
        other => {
            return Err(ParseError::new(
                format!("Unknown detector function: {}", other),
                span,
            ))
        }
    };

    Ok(DetectorDecl {
        name: name.clone(),
        kind,
    })
}
