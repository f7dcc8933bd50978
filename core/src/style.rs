use colored::{Color, ColoredString, Colorize};

use crate::testing::JudgeCode;

pub fn is_truecolor_supported() -> bool {
    let Ok(v) = std::env::var("COLORTERM") else {
        return false
    };
    matches!(v.as_str(), "truecolor" | "24bit")
}

pub trait ColorTheme {
    fn color(&self) -> Color;
}

impl ColorTheme for JudgeCode {
    fn color(&self) -> Color {
        use JudgeCode::*;
        if !self::is_truecolor_supported() {
            return match self {
                Passed => Color::Green,
                Failed => Color::Red,
            };
        }

        match self {
            Passed => Color::TrueColor {
                r: 30,
                g: 180,
                b: 40,
            },
            Failed => Color::TrueColor {
                r: 220,
                g: 42,
                b: 42,
            },
        }
    }
}

/// The judge word, coloured; what the verdict line ends with.
pub fn judge_word(judge: JudgeCode) -> ColoredString {
    judge.to_string().color(judge.color()).bold()
}
