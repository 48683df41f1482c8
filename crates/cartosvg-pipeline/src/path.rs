//! Path data parsing: `d` attribute to [`Multipolygon`].
//!
//! Only the polygonal subset of the SVG path grammar is understood:
//! `M m L l H h V v Z z`.  Inkscape writes path data with commands and
//! `x,y` operands separated by whitespace, and the lexer relies on that
//! instead of re-tokenizing number runs.
//!
//! Parsing is tolerant.  Whole paths are refused up front (see
//! [`check_path`]) when they are empty, unterminated, or contain curves
//! or arcs; inside an accepted path a malformed operand is skipped on its
//! own and the rest of the path still parses.
//!
//! # Pen state
//!
//! [`PenState`] is an explicit value threaded through the fragment loop.
//! Its `mode` is the command waiting for operands.  `M m H h V v` take a
//! single operand and then fall back to *knot* mode, where bare pairs are
//! repeated points in the relative/absolute mode set by the last `M`/`m`.
//! `L l` stay active until the next command.
//!
//! Close-path pushes the current ring and resets the pen to the origin,
//! so the first point after it is absolute from `(0, 0)` even for `m`.
//! Strict SVG would continue from the start of the closed subpath.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::{Multipolygon, Point, Subpolygon, UnsupportedPath};

/// Command letters for curves and arcs.  Any of these anywhere in the
/// data rejects the whole path.
const CURVE_COMMANDS: &str = "CcSsQqTtAa";

#[allow(clippy::expect_used)] // literal pattern, verified by tests
static PAIR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(-?\d+(?:\.\d+)?),(-?\d+(?:\.\d+)?)$").expect("valid operand pair pattern")
});

#[allow(clippy::expect_used)] // literal pattern, verified by tests
static SINGLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?\d+(?:\.\d+)?$").expect("valid single operand pattern"));

/// A path command understood by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `M`
    MoveToAbs,
    /// `m`
    MoveToRel,
    /// `Z` or `z`
    ClosePath,
    /// `L`
    LineToAbs,
    /// `l`
    LineToRel,
    /// `H`
    HorizontalAbs,
    /// `h`
    HorizontalRel,
    /// `V`
    VerticalAbs,
    /// `v`
    VerticalRel,
}

impl Command {
    /// Recognize a fragment that is exactly one command letter.
    #[must_use]
    pub fn from_fragment(fragment: &str) -> Option<Self> {
        Some(match fragment {
            "M" => Self::MoveToAbs,
            "m" => Self::MoveToRel,
            "Z" | "z" => Self::ClosePath,
            "L" => Self::LineToAbs,
            "l" => Self::LineToRel,
            "H" => Self::HorizontalAbs,
            "h" => Self::HorizontalRel,
            "V" => Self::VerticalAbs,
            "v" => Self::VerticalRel,
            _ => return None,
        })
    }

    /// Whether the command consumes exactly one operand fragment before
    /// the pen falls back to knot mode.
    #[must_use]
    pub const fn is_single_operand(self) -> bool {
        matches!(
            self,
            Self::MoveToAbs
                | Self::MoveToRel
                | Self::HorizontalAbs
                | Self::HorizontalRel
                | Self::VerticalAbs
                | Self::VerticalRel
        )
    }
}

/// One whitespace-separated piece of path data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fragment<'a> {
    /// A command letter.
    Command(Command),
    /// Anything else, interpreted by the active command.
    Operand(&'a str),
}

/// Split path data into fragments, preserving order.
pub fn lex(data: &str) -> impl Iterator<Item = Fragment<'_>> {
    data.split_whitespace().map(|fragment| {
        Command::from_fragment(fragment).map_or(Fragment::Operand(fragment), Fragment::Command)
    })
}

/// Pen state for a single path parse.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PenState {
    /// Current pen position.
    pub position: Point,
    /// Whether bare pairs in knot mode are relative to the pen.
    pub relative: bool,
    /// Command waiting for operands; `None` is knot mode.
    pub mode: Option<Command>,
}

impl PenState {
    /// Switch to a new command.  Close-path is handled by the caller,
    /// which owns the rings.
    #[must_use]
    pub const fn command(self, command: Command) -> Self {
        Self {
            mode: Some(command),
            ..self
        }
    }

    /// State after a close-path: pen at the origin, waiting for a command.
    #[must_use]
    pub const fn closed(self) -> Self {
        Self {
            position: Point::ORIGIN,
            relative: self.relative,
            mode: Some(Command::ClosePath),
        }
    }

    /// Interpret one operand fragment, appending any resulting point to
    /// `ring`, and return the next state.
    #[must_use]
    pub fn consume(self, operand: &str, ring: &mut Subpolygon) -> Self {
        let Some(command) = self.mode else {
            return self.knot(operand, ring);
        };

        let next = if command.is_single_operand() {
            Self { mode: None, ..self }
        } else {
            self
        };

        let point = match command {
            Command::ClosePath => {
                tracing::trace!(operand, "ignoring operand after close-path");
                return self;
            }
            Command::MoveToAbs | Command::LineToAbs => {
                parse_pair(operand).map(|(x, y)| Point::new(x, y))
            }
            Command::MoveToRel | Command::LineToRel => {
                parse_pair(operand).map(|(dx, dy)| self.position.offset_by(dx, dy))
            }
            Command::HorizontalAbs => {
                parse_single(operand).map(|x| Point::new(x, self.position.y))
            }
            Command::HorizontalRel => {
                parse_single(operand).map(|dx| self.position.offset_by(dx, 0.0))
            }
            Command::VerticalAbs => parse_single(operand).map(|y| Point::new(self.position.x, y)),
            Command::VerticalRel => {
                parse_single(operand).map(|dy| self.position.offset_by(0.0, dy))
            }
        };

        let next = match command {
            Command::MoveToAbs => Self {
                relative: false,
                ..next
            },
            Command::MoveToRel => Self {
                relative: true,
                ..next
            },
            _ => next,
        };

        match point {
            Some(point) => next.emit(point, ring),
            None => {
                tracing::trace!(operand, ?command, "skipping malformed operand");
                next
            }
        }
    }

    /// A bare pair in knot mode.
    fn knot(self, operand: &str, ring: &mut Subpolygon) -> Self {
        let Some((x, y)) = parse_pair(operand) else {
            tracing::trace!(operand, "skipping malformed coordinate pair");
            return self;
        };
        let point = if ring.is_empty() {
            Point::ORIGIN.offset_by(x, y)
        } else if self.relative {
            self.position.offset_by(x, y)
        } else {
            Point::new(x, y)
        };
        self.emit(point, ring)
    }

    fn emit(self, point: Point, ring: &mut Subpolygon) -> Self {
        ring.push(point);
        Self {
            position: point,
            ..self
        }
    }
}

/// Check whether path data can be parsed at all.
///
/// # Errors
///
/// Returns [`UnsupportedPath::Empty`] for empty or whitespace-only data,
/// [`UnsupportedPath::Unterminated`] when the data does not end with `z`
/// or `Z`, and [`UnsupportedPath::Curve`] with the first curve or arc
/// command letter found.
pub fn check_path(data: &str) -> Result<(), UnsupportedPath> {
    let data = data.trim();
    if data.is_empty() {
        return Err(UnsupportedPath::Empty);
    }
    if !data.ends_with(['z', 'Z']) {
        return Err(UnsupportedPath::Unterminated);
    }
    if let Some(letter) = data.chars().find(|c| CURVE_COMMANDS.contains(*c)) {
        return Err(UnsupportedPath::Curve(letter));
    }
    Ok(())
}

/// Parse path data into closed rings.
///
/// Returns an empty [`Multipolygon`] when [`check_path`] refuses the
/// data.  Points in the returned rings are in SVG user space; no
/// transform or projection has been applied.
///
/// # Examples
///
/// ```
/// use cartosvg_pipeline::path::parse_path;
///
/// let square = parse_path("M 0,0 L 10,0 L 10,10 L 0,10 Z");
/// assert_eq!(square.len(), 1);
/// assert_eq!(square.rings()[0].len(), 4);
///
/// assert!(parse_path("M 0,0 L 10,0 L 10,10").is_empty());
/// ```
#[must_use]
pub fn parse_path(data: &str) -> Multipolygon {
    if let Err(reason) = check_path(data) {
        tracing::debug!(%reason, "rejecting path data");
        return Multipolygon::default();
    }

    let mut rings = Multipolygon::default();
    let mut ring = Subpolygon::default();
    let mut pen = PenState::default();

    for fragment in lex(data.trim()) {
        pen = match fragment {
            Fragment::Command(Command::ClosePath) => {
                rings.push(std::mem::take(&mut ring));
                pen.closed()
            }
            Fragment::Command(command) => pen.command(command),
            Fragment::Operand(operand) => pen.consume(operand, &mut ring),
        };
    }

    rings
}

/// Digit runs too long for `f64` parse to infinity and count as malformed.
fn finite(text: &str) -> Option<f64> {
    text.parse().ok().filter(|v: &f64| v.is_finite())
}

fn parse_pair(operand: &str) -> Option<(f64, f64)> {
    let caps = PAIR.captures(operand)?;
    let x = finite(caps.get(1)?.as_str())?;
    let y = finite(caps.get(2)?.as_str())?;
    Some((x, y))
}

fn parse_single(operand: &str) -> Option<f64> {
    if SINGLE.is_match(operand) {
        finite(operand)
    } else {
        None
    }
}
