use std::io::{self, stdin, stdout, Write};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;

#[derive(Debug, Clone, PartialEq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

pub trait CredentialProvider {
    fn credentials(&self) -> io::Result<Credentials>;
}

/// Asks on the terminal. The password is always prompted and never echoed.
pub struct PromptCredentials {
    pub username: Option<String>,
}

impl CredentialProvider for PromptCredentials {
    fn credentials(&self) -> io::Result<Credentials> {
        let username = match &self.username {
            Some(username) => username.clone(),
            None => read_line("Username: ")?,
        };
        let password = read_hidden("Password: ")?;

        Ok(Credentials { username, password })
    }
}

/// Fixed credentials, stands in for the prompt in tests.
#[cfg(test)]
pub struct StaticCredentials(pub Credentials);

#[cfg(test)]
impl CredentialProvider for StaticCredentials {
    fn credentials(&self) -> io::Result<Credentials> {
        Ok(self.0.clone())
    }
}

fn read_line(prompt: &str) -> io::Result<String> {
    let mut out = stdout();
    out.write_all(prompt.as_bytes())?;
    out.flush()?;

    let mut line = String::new();
    stdin().read_line(&mut line)?;
    Ok(line.trim_end_matches(&['\r', '\n'][..]).to_owned())
}

fn read_hidden(prompt: &str) -> io::Result<String> {
    let mut out = stdout();
    out.write_all(prompt.as_bytes())?;
    out.flush()?;

    terminal::enable_raw_mode()?;
    let result = collect_keys(event::read);
    terminal::disable_raw_mode()?;
    out.write_all(b"\r\n")?;
    out.flush()?;

    result
}

/// Builds the password from key presses until Enter.
fn collect_keys<F>(mut next_event: F) -> io::Result<String>
where
    F: FnMut() -> io::Result<Event>,
{
    let mut password = String::new();
    loop {
        let key = match next_event()? {
            Event::Key(key) if key.kind != KeyEventKind::Release => key,
            _ => continue,
        };

        match key {
            KeyEvent { code: KeyCode::Enter, .. } => return Ok(password),
            KeyEvent { code: KeyCode::Char('c'), modifiers, .. } if modifiers.contains(KeyModifiers::CONTROL) => {
                return Err(io::Error::new(io::ErrorKind::Interrupted, "password prompt cancelled"));
            }
            KeyEvent { code: KeyCode::Esc, .. } => {
                return Err(io::Error::new(io::ErrorKind::Interrupted, "password prompt cancelled"));
            }
            KeyEvent { code: KeyCode::Backspace, .. } => {
                password.pop();
            }
            KeyEvent { code: KeyCode::Char(c), .. } => password.push(c),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> io::Result<Event> {
        Ok(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)))
    }

    #[test]
    fn typed_keys_become_the_password() {
        let mut keys = vec![
            press(KeyCode::Char('p')),
            press(KeyCode::Char('w')),
            press(KeyCode::Char('x')),
            press(KeyCode::Backspace),
            press(KeyCode::Char('d')),
            press(KeyCode::Enter),
        ]
        .into_iter();

        let password = collect_keys(|| keys.next().unwrap()).unwrap();
        assert_eq!(password, "pwd");
    }

    #[test]
    fn ctrl_c_cancels_the_prompt() {
        let mut keys = vec![
            press(KeyCode::Char('p')),
            Ok(Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL))),
        ]
        .into_iter();

        let err = collect_keys(|| keys.next().unwrap()).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::Interrupted);
    }

    #[test]
    fn static_credentials_are_returned_as_is() {
        let creds = Credentials { username: "bob".into(), password: "hunter2".into() };
        let provider = StaticCredentials(creds.clone());
        assert_eq!(provider.credentials().unwrap(), creds);
    }
}
