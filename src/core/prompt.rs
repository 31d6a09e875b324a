//! Passphrase input.
//!
//! The terminal is only ever held in raw mode for the duration of a single
//! key read; [`PromptSession`] restores cursor and line state on drop.

use std::io::{self, BufRead, IsTerminal};
use std::sync::{Arc, Mutex};

use ::age::secrecy::SecretString;
use console::{Key, Term};
use tracing::debug;
use zeroize::Zeroizing;

use crate::error::{Error, Result};

/// Source of passphrases.
pub trait PassphrasePrompt: Send + Sync {
    /// Ask for a passphrase, showing `prompt`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Cancelled` when the user interrupts input.
    fn read_passphrase(&self, prompt: &str) -> Result<Zeroizing<String>>;
}

/// Reads passphrases from the controlling terminal, or from stdin when it
/// is not a terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompt;

impl PassphrasePrompt for TerminalPrompt {
    fn read_passphrase(&self, prompt: &str) -> Result<Zeroizing<String>> {
        let term = Term::stderr();
        if !io::stdin().is_terminal() || !term.is_term() {
            debug!("stdin is not a terminal, reading passphrase line");
            return read_line();
        }

        let _session = PromptSession::begin(&term, prompt)?;
        collect_keys(|| term.read_key_raw())
    }
}

/// Accumulate typed characters until Enter.
///
/// Keys are read raw, so Ctrl-C arrives as [`Key::CtrlC`] instead of a
/// signal and unwinds through the caller's [`PromptSession`].
fn collect_keys<F>(mut next: F) -> Result<Zeroizing<String>>
where
    F: FnMut() -> io::Result<Key>,
{
    let mut input = Zeroizing::new(String::new());
    loop {
        match next() {
            Ok(Key::Enter) => break,
            Ok(Key::Backspace) => {
                input.pop();
            }
            Ok(Key::CtrlC) | Ok(Key::Char('\u{3}')) => return Err(Error::Cancelled),
            Ok(Key::Char(c)) if !c.is_control() => input.push(c),
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::Interrupted => return Err(Error::Cancelled),
            Err(e) => return Err(e.into()),
        }
    }
    Ok(input)
}

fn read_line() -> Result<Zeroizing<String>> {
    let mut line = Zeroizing::new(String::new());
    let read = io::stdin().lock().read_line(&mut line)?;
    if read == 0 {
        return Err(Error::Cancelled);
    }
    let trimmed = line.trim_end_matches(['\r', '\n']).len();
    line.truncate(trimmed);
    Ok(line)
}

/// An active prompt line. Dropping it ends the line and shows the cursor,
/// whichever way input ended.
pub struct PromptSession<'a> {
    term: &'a Term,
}

impl<'a> PromptSession<'a> {
    pub fn begin(term: &'a Term, prompt: &str) -> Result<Self> {
        term.write_str(prompt)?;
        term.hide_cursor()?;
        Ok(Self { term })
    }
}

impl Drop for PromptSession<'_> {
    fn drop(&mut self) {
        let _ = self.term.show_cursor();
        let _ = self.term.write_line("");
    }
}

/// Bridges a [`PassphrasePrompt`] to age's callback interface for
/// encrypted SSH keys. The first passphrase entered is reused for the rest
/// of the command.
#[derive(Clone)]
pub struct PromptCallbacks {
    prompt: Arc<dyn PassphrasePrompt>,
    cached: Arc<Mutex<Option<Zeroizing<String>>>>,
}

impl PromptCallbacks {
    pub fn new(prompt: Arc<dyn PassphrasePrompt>) -> Self {
        Self {
            prompt,
            cached: Arc::new(Mutex::new(None)),
        }
    }
}

impl ::age::Callbacks for PromptCallbacks {
    fn display_message(&self, message: &str) {
        eprintln!("{}", message);
    }

    fn confirm(&self, _message: &str, _yes_string: &str, _no_string: Option<&str>) -> Option<bool> {
        None
    }

    fn request_public_string(&self, _description: &str) -> Option<String> {
        None
    }

    fn request_passphrase(&self, description: &str) -> Option<SecretString> {
        let mut cached = self.cached.lock().ok()?;
        if cached.is_none() {
            let prompt = format!("{}: ", description.trim_end_matches([':', ' ']));
            match self.prompt.read_passphrase(&prompt) {
                Ok(passphrase) => *cached = Some(passphrase),
                Err(e) => {
                    debug!(error = %e, "passphrase entry aborted");
                    return None;
                }
            }
        }
        cached
            .as_ref()
            .map(|p| SecretString::from(p.as_str().to_string()))
    }
}
