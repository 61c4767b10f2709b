//! Reading and writing the positional representation of a movable element.
//!
//! Elements carry their drag offset as a CSS-style transform string such as
//! `translate(12px, -3px)`. Every call site goes through this module so the
//! string handling lives in one place. [`decode`] always succeeds and falls
//! back to zero for whatever it cannot read. [`try_decode`] is the strict
//! parser underneath it.

use std::fmt;

use thiserror::Error;

use crate::geometry::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CodecError {
    #[error("unsupported transform function `{0}`")]
    UnsupportedFunction(String),
    #[error("transform has no closed argument list")]
    MissingArguments,
    #[error("unexpected input after transform: `{0}`")]
    TrailingInput(String),
    #[error("transform is missing its {0} component")]
    MissingComponent(Axis),
    #[error("transform takes at most {expected} components, found {found}")]
    TooManyComponents { expected: usize, found: usize },
    #[error("invalid {axis} component `{value}`")]
    InvalidComponent { axis: Axis, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TranslateFn {
    Translate,
    Translate3d,
    TranslateX,
    TranslateY,
}

impl TranslateFn {
    fn from_name(name: &str) -> Option<Self> {
        [
            ("translate", TranslateFn::Translate),
            ("translate3d", TranslateFn::Translate3d),
            ("translatex", TranslateFn::TranslateX),
            ("translatey", TranslateFn::TranslateY),
        ]
        .into_iter()
        .find(|(known, _)| name.eq_ignore_ascii_case(known))
        .map(|(_, f)| f)
    }

    /// Axis carried by each argument slot, in order.
    fn axes(self) -> &'static [Axis] {
        match self {
            TranslateFn::Translate => &[Axis::X, Axis::Y],
            TranslateFn::Translate3d => &[Axis::X, Axis::Y, Axis::Z],
            TranslateFn::TranslateX => &[Axis::X],
            TranslateFn::TranslateY => &[Axis::Y],
        }
    }

    /// Slots that must be present. `translate(x)` leaves y at zero.
    fn required(self) -> usize {
        match self {
            TranslateFn::Translate3d => 3,
            _ => 1,
        }
    }
}

/// A transform call split into its function and raw argument text.
struct TransformCall<'a> {
    func: TranslateFn,
    args: Vec<&'a str>,
}

impl<'a> TransformCall<'a> {
    fn split(repr: &'a str) -> Result<Self, CodecError> {
        let open = repr.find('(').ok_or(CodecError::MissingArguments)?;
        let name = repr[..open].trim();
        let func = TranslateFn::from_name(name)
            .ok_or_else(|| CodecError::UnsupportedFunction(name.to_string()))?;
        let rest = &repr[open + 1..];
        let close = rest.find(')').ok_or(CodecError::MissingArguments)?;
        let trailing = rest[close + 1..].trim();
        if !trailing.is_empty() {
            return Err(CodecError::TrailingInput(trailing.to_string()));
        }
        let body = rest[..close].trim();
        let args: Vec<&str> = if body.is_empty() {
            Vec::new()
        } else {
            body.split(',').map(str::trim).collect()
        };
        let axes = func.axes();
        if args.len() > axes.len() {
            return Err(CodecError::TooManyComponents {
                expected: axes.len(),
                found: args.len(),
            });
        }
        if args.len() < func.required() {
            return Err(CodecError::MissingComponent(axes[args.len()]));
        }
        Ok(Self { func, args })
    }

    /// Parsed value for each axis slot that has an argument.
    fn components(&self) -> impl Iterator<Item = (Axis, Result<f64, CodecError>)> + '_ {
        self.func
            .axes()
            .iter()
            .zip(self.args.iter())
            .map(|(&axis, raw)| (axis, parse_component(axis, raw)))
    }
}

fn parse_component(axis: Axis, raw: &str) -> Result<f64, CodecError> {
    let number = raw.strip_suffix("px").unwrap_or(raw).trim_end();
    match number.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(CodecError::InvalidComponent {
            axis,
            value: raw.to_string(),
        }),
    }
}

fn is_identity(repr: &str) -> bool {
    repr.is_empty() || repr.eq_ignore_ascii_case("none")
}

/// Strictly parse a representation, reporting the first problem found.
pub fn try_decode(repr: &str) -> Result<Position, CodecError> {
    let repr = repr.trim();
    if is_identity(repr) {
        return Ok(Position::ORIGIN);
    }
    let call = TransformCall::split(repr)?;
    let mut position = Position::ORIGIN;
    for (axis, value) in call.components() {
        let value = value?;
        match axis {
            Axis::X => position.x = value,
            Axis::Y => position.y = value,
            Axis::Z => {}
        }
    }
    Ok(position)
}

/// Read the offset carried by `repr`.
///
/// Absent or unreadable input yields the origin. When the call itself is
/// well formed but one component is not, only that axis falls back to zero,
/// so `translate(abc, 10px)` reads as `(0, 10)`.
pub fn decode(repr: Option<&str>) -> Position {
    let Some(repr) = repr.map(str::trim) else {
        return Position::ORIGIN;
    };
    if is_identity(repr) {
        return Position::ORIGIN;
    }
    let call = match TransformCall::split(repr) {
        Ok(call) => call,
        Err(err) => {
            tracing::trace!(%err, repr, "unreadable transform, using origin");
            return Position::ORIGIN;
        }
    };
    let mut position = Position::ORIGIN;
    for (axis, value) in call.components() {
        let value = value.unwrap_or_else(|err| {
            tracing::trace!(%err, repr, "unreadable transform component");
            0.0
        });
        match axis {
            Axis::X => position.x = value,
            Axis::Y => position.y = value,
            Axis::Z => {}
        }
    }
    position
}

/// Representation to write back to the element for `position`.
pub fn encode(position: Position) -> String {
    let p = position.finite_or(Position::ORIGIN);
    format!("translate({}px, {}px)", p.x, p.y)
}
