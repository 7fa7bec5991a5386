//! Line commands typed at the dashboard prompt.

use shortdash_core::{Msg, ShortenForm, UrlId};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Command {
    Msg(Msg),
    Help,
    Quit,
    Empty,
}

pub(crate) const HELP: &str = "\
commands:
  login <username> <password>            sign in
  logout                                 sign out and forget the session
  refresh                                reload the url list
  select <id>                            show statistics for a url
  clear                                  close the statistics panel
  shorten <url> <name> <email> <contact> shorten a url
  help                                   show this list
  quit                                   leave the dashboard
arguments containing spaces go in double quotes";

pub(crate) fn parse(line: &str) -> Result<Command, String> {
    let words = tokenize(line)?;
    let Some((head, args)) = words.split_first() else {
        return Ok(Command::Empty);
    };

    let command = match head.to_ascii_lowercase().as_str() {
        "login" => {
            expect_at_most(head, args, 2)?;
            // Missing parts go through so the login form reports them.
            Command::Msg(Msg::LoginSubmitted {
                username: arg(args, 0),
                password: arg(args, 1),
            })
        }
        "logout" => {
            expect_at_most(head, args, 0)?;
            Command::Msg(Msg::LogoutClicked)
        }
        "refresh" | "list" => {
            expect_at_most(head, args, 0)?;
            Command::Msg(Msg::RefreshClicked)
        }
        "select" => {
            let [raw] = args else {
                return Err("usage: select <id>".to_string());
            };
            let id: UrlId = raw
                .parse()
                .map_err(|_| format!("not a url id: {raw:?}"))?;
            Command::Msg(Msg::UrlSelected { id })
        }
        "clear" => {
            expect_at_most(head, args, 0)?;
            Command::Msg(Msg::SelectionCleared)
        }
        "shorten" => {
            expect_at_most(head, args, 4)?;
            Command::Msg(Msg::ShortenSubmitted(ShortenForm {
                url: arg(args, 0),
                name: arg(args, 1),
                email: arg(args, 2),
                contact: arg(args, 3),
            }))
        }
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(format!("unknown command {other:?}; type `help`")),
    };
    Ok(command)
}

fn arg(args: &[String], index: usize) -> String {
    args.get(index).cloned().unwrap_or_default()
}

fn expect_at_most(head: &str, args: &[String], max: usize) -> Result<(), String> {
    if args.len() > max {
        return Err(format!("too many arguments for `{head}`"));
    }
    Ok(())
}

/// Splits on whitespace; double quotes group words and `\"` escapes a quote.
fn tokenize(line: &str) -> Result<Vec<String>, String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quoted = false;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' if quoted => match chars.next() {
                Some(next) => current.push(next),
                None => return Err("dangling escape".to_string()),
            },
            '"' => {
                quoted = !quoted;
                in_word = true;
            }
            c if c.is_whitespace() && !quoted => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            c => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if quoted {
        return Err("unterminated quote".to_string());
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}
