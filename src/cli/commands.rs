//! CLI Command Table
//!
//! Tokenizes input lines, checks each command's argument count, and renders
//! session outcomes as the messages printed to the user.

use std::io::{self, Write};

use crate::compositor;
use crate::config::Config;
use crate::error::{Result, StrataError};
use crate::session::{Command, Outcome};

/// Name and token count (including the name) of one command
#[derive(Debug, Clone, Copy)]
pub struct CommandSyntax {
    pub name: &'static str,
    pub tokens: usize,
    pub usage: &'static str,
}

/// Every command the loop accepts besides `quit`
pub const COMMANDS: &[CommandSyntax] = &[
    CommandSyntax { name: "help", tokens: 1, usage: "help" },
    CommandSyntax { name: "load", tokens: 2, usage: "load <PATH>" },
    CommandSyntax {
        name: "crop",
        tokens: 6,
        usage: "crop <BMP_ID> <TOP_X> <TOP_Y> <BOTTOM_X> <BOTTOM_Y>",
    },
    CommandSyntax {
        name: "place",
        tokens: 5,
        usage: "place <BMP_ID> <CANVAS_X> <CANVAS_Y> <BLEND_MODE>",
    },
    CommandSyntax { name: "undo", tokens: 1, usage: "undo" },
    CommandSyntax { name: "print", tokens: 1, usage: "print" },
    CommandSyntax { name: "switch", tokens: 2, usage: "switch <LAYER_ID>" },
    CommandSyntax { name: "tree", tokens: 1, usage: "tree" },
    CommandSyntax { name: "bmps", tokens: 1, usage: "bmps" },
    CommandSyntax { name: "save", tokens: 2, usage: "save <FILE_PATH>" },
];

/// A parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Help,
    Quit,
    Run(Command),
}

/// Parse one input line.
///
/// Returns `Ok(None)` for blank lines. Only the argument *count* is checked
/// here; argument content is validated by the session.
pub fn parse_line(line: &str) -> Result<Option<Request>> {
    let line = line.trim_end();
    if line == "quit" {
        return Ok(Some(Request::Quit));
    }

    let words: Vec<&str> = line.split_whitespace().collect();
    let Some(&name) = words.first() else {
        return Ok(None);
    };

    let syntax = COMMANDS
        .iter()
        .find(|syntax| syntax.name == name)
        .ok_or_else(|| StrataError::CommandUnknown {
            name: name.to_string(),
        })?;
    if words.len() != syntax.tokens {
        return Err(StrataError::WrongArgumentCount {
            command: name.to_string(),
            expected: syntax.tokens - 1,
            found: words.len() - 1,
        });
    }

    let arg = |i: usize| words[i].to_string();
    let command = match name {
        "help" => return Ok(Some(Request::Help)),
        "load" => Command::Load { path: arg(1) },
        "crop" => Command::Crop {
            id: arg(1),
            top_x: arg(2),
            top_y: arg(3),
            bottom_x: arg(4),
            bottom_y: arg(5),
        },
        "place" => Command::Place {
            id: arg(1),
            x: arg(2),
            y: arg(3),
            mode: arg(4),
        },
        "undo" => Command::Undo,
        "print" => Command::Print,
        "switch" => Command::Switch { id: arg(1) },
        "tree" => Command::Tree,
        "bmps" => Command::Bmps,
        _ => Command::Save { path: arg(1) },
    };

    Ok(Some(Request::Run(command)))
}

/// Print the startup banner, echoing the size arguments as typed
pub fn write_welcome<W: Write>(out: &mut W, width: &str, height: &str) -> io::Result<()> {
    write!(
        out,
        "\nWelcome to Strata!\nThe canvas is {} x {} pixels.\n\n",
        width, height
    )
}

/// Print the command list
pub fn write_help<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Available commands:")?;
    for syntax in COMMANDS {
        writeln!(out, " {}", syntax.usage)?;
    }
    writeln!(out, " quit")?;
    writeln!(out)
}

/// Print an error the way the loop reports it
pub fn write_error<W: Write>(out: &mut W, err: &StrataError) -> io::Result<()> {
    writeln!(out, "[ERROR] {}", err)
}

/// Print the message for a successful command
pub fn write_outcome<W: Write>(out: &mut W, outcome: &Outcome, config: &Config) -> io::Result<()> {
    match outcome {
        Outcome::Loaded {
            path,
            id,
            width,
            height,
        } => writeln!(
            out,
            "Loaded {} with ID {} and dimensions {} {}",
            path, id, width, height
        ),
        Outcome::Cropped {
            source,
            id,
            width,
            height,
        } => writeln!(
            out,
            "Cropped ID {} to new ID {} with dimensions {} x {}",
            source, id, width, height
        ),
        Outcome::Switched { layer } => writeln!(out, "Switched to layer {}", layer),
        Outcome::Rendered(image) => {
            write!(out, "{}", compositor::preview(image, &config.pixel_glyph))
        }
        Outcome::Tree(entries) => {
            for entry in entries {
                match entry.bitmap {
                    None => writeln!(out, "Layer {}", entry.layer)?,
                    Some(bitmap) => writeln!(
                        out,
                        "{}Layer {} renders BMP {} at {} {}",
                        "   ".repeat(entry.depth),
                        entry.layer,
                        bitmap,
                        entry.x,
                        entry.y
                    )?,
                }
            }
            Ok(())
        }
        Outcome::Bitmaps(bitmaps) => {
            for bitmap in bitmaps {
                writeln!(
                    out,
                    "BMP {} has dimensions {} x {}",
                    bitmap.id, bitmap.width, bitmap.height
                )?;
            }
            Ok(())
        }
        Outcome::Saved { path } => writeln!(out, "Successfully saved image to {}", path),
    }
}
