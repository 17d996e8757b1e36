//! Interactive quadrant prompt on stdin/stdout

use std::io::{self, BufRead, Write};

use crate::domain::model::{Choice, Quadrant, Role};
use crate::error::QuadResult;
use crate::ports::PromptPort;

/// Prompt adapter reading answers from the terminal
#[derive(Debug, Default)]
pub struct TerminalPromptAdapter;

impl TerminalPromptAdapter {
    pub fn new() -> Self {
        Self
    }
}

/// Interpret one typed answer
pub fn parse_choice(answer: &str) -> Choice {
    let answer = answer.trim().to_lowercase();

    if let Ok(number) = answer.parse::<usize>() {
        return match Quadrant::from_menu(number) {
            Some(q) => Choice::Picked(q),
            None => Choice::Invalid(answer),
        };
    }

    match answer.as_str() {
        "s" | "skip" => Choice::Skip,
        "q" | "quit" => Choice::Quit,
        other => match other.parse::<Quadrant>() {
            Ok(q) => Choice::Picked(q),
            Err(_) => Choice::Invalid(answer),
        },
    }
}

/// Menu text shown before each question
pub fn menu(file_name: &str, role: Role) -> String {
    let mut text = format!("Which quadrant shows the {} in {}?\n", role, file_name);
    for (index, quadrant) in Quadrant::ALL.iter().enumerate() {
        text.push_str(&format!("  {}) {}\n", index + 1, quadrant));
    }
    text.push_str("  s) skip this file   q) quit\n> ");
    text
}

impl PromptPort for TerminalPromptAdapter {
    fn ask_quadrant(&self, file_name: &str, role: Role) -> QuadResult<Choice> {
        let mut stdout = io::stdout().lock();
        stdout.write_all(menu(file_name, role).as_bytes())?;
        stdout.flush()?;

        let mut line = String::new();
        let read = io::stdin().lock().read_line(&mut line)?;
        if read == 0 {
            return Ok(Choice::Quit);
        }

        Ok(parse_choice(&line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_choice() {
        assert_eq!(parse_choice("1\n"), Choice::Picked(Quadrant::TopLeft));
        assert_eq!(parse_choice(" 4 "), Choice::Picked(Quadrant::BottomRight));
        assert_eq!(parse_choice("bottom-left"), Choice::Picked(Quadrant::BottomLeft));
        assert_eq!(parse_choice("S"), Choice::Skip);
        assert_eq!(parse_choice("quit"), Choice::Quit);
        assert_eq!(parse_choice("7"), Choice::Invalid("7".to_string()));
        assert_eq!(parse_choice("left"), Choice::Invalid("left".to_string()));
    }

    #[test]
    fn test_menu_lists_quadrants_in_order() {
        let text = menu("talk.mp4", Role::Slides);
        assert!(text.starts_with("Which quadrant shows the slides in talk.mp4?"));
        let first = text.find("1) top-left").unwrap();
        let last = text.find("4) bottom-right").unwrap();
        assert!(first < last);
    }
}
