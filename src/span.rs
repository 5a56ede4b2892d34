// Copyright (c) 2025 Kodama Project. All rights reserved.
// Released under the GPL-3.0 license as described in the file LICENSE.
// Authors: Kokic (@kokic)

use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MathMode {
    /// `$...$`, sized to the surrounding text.
    Inline,
    /// `$$...$$`, a centered block.
    Display,
}

impl MathMode {
    pub fn from_display(display: bool) -> Self {
        match display {
            true => MathMode::Display,
            false => MathMode::Inline,
        }
    }

    pub fn is_display(self) -> bool {
        matches!(self, MathMode::Display)
    }

    pub fn flag(self) -> char {
        match self {
            MathMode::Display => 'd',
            MathMode::Inline => 'i',
        }
    }

    pub fn from_flag(flag: char) -> Option<Self> {
        match flag {
            'd' => Some(MathMode::Display),
            'i' => Some(MathMode::Inline),
            _ => None,
        }
    }

    pub fn delimiter(self) -> &'static str {
        match self {
            MathMode::Display => "$$",
            MathMode::Inline => "$",
        }
    }

    /// Value of the `data-display` attribute.
    pub fn attr_value(self) -> &'static str {
        match self {
            MathMode::Display => "true",
            MathMode::Inline => "false",
        }
    }
}

impl Display for MathMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MathMode::Display => write!(f, "display"),
            MathMode::Inline => write!(f, "inline"),
        }
    }
}

/// A detected math occurrence, delimiters stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MathSpan {
    pub tex: String,
    pub mode: MathMode,
}

impl MathSpan {
    pub fn new<S: Into<String>>(tex: S, mode: MathMode) -> Self {
        Self {
            tex: tex.into(),
            mode,
        }
    }

    pub fn inline<S: Into<String>>(tex: S) -> Self {
        Self::new(tex, MathMode::Inline)
    }

    pub fn display<S: Into<String>>(tex: S) -> Self {
        Self::new(tex, MathMode::Display)
    }

    /// The literal source text, e.g. `$$a$$`.
    pub fn to_source(&self) -> String {
        let delimiter = self.mode.delimiter();
        format!("{}{}{}", delimiter, self.tex, delimiter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_source() {
        assert_eq!(MathSpan::display("y^2+1").to_source(), "$$y^2+1$$");
        assert_eq!(MathSpan::inline("x^2").to_source(), "$x^2$");
        assert_eq!(MathSpan::inline("").to_source(), "$$");
    }

    #[test]
    fn test_flags() {
        for mode in [MathMode::Inline, MathMode::Display] {
            assert_eq!(MathMode::from_flag(mode.flag()), Some(mode));
        }
        assert_eq!(MathMode::from_flag('x'), None);
        assert_eq!(MathMode::from_display(true), MathMode::Display);
    }
}
