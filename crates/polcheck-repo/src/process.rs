use anyhow::{Context, bail};
use polcheck_domain::invocation::Invocation;
use polcheck_domain::model::ScriptKind;
use polcheck_domain::ports::{ProcessOutput, ProcessRunner};
use std::process::Command;
use tracing::debug;

/// Runs invocations as child processes and waits for them; no timeout is applied.
///
/// | kind           | process                                   |
/// |----------------|-------------------------------------------|
/// | `bashScript`   | `<bash> -c <command> bash <args...>`      |
/// | `command`      | `<word0> <word1...> <args...>`, no shell  |
/// | `pythonScript` | `<python> -c <command> <args...>`         |
/// | `as_is`        | `<command> <args...>`                     |
///
/// A `command` template is split into words with shell quoting rules and executed directly. Pipes, redirections, and `$VAR` are not interpreted; use `bashScript` for
/// those.
#[derive(Clone, Debug)]
pub struct SystemRunner {
    bash: String,
    python: String,
}

impl Default for SystemRunner {
    fn default() -> Self {
        Self::new("bash", "python3")
    }
}

impl SystemRunner {
    pub fn new(bash: impl Into<String>, python: impl Into<String>) -> Self {
        Self {
            bash: bash.into(),
            python: python.into(),
        }
    }

    fn command_for(&self, invocation: &Invocation) -> anyhow::Result<Command> {
        let text = invocation.command();
        let args = invocation.args();
        let cmd = match invocation.kind() {
            ScriptKind::BashScript => {
                let mut cmd = Command::new(&self.bash);
                cmd.arg("-c").arg(text).arg("bash").args(args);
                cmd
            }
            ScriptKind::Command => {
                let words = split_words(text)?;
                let Some((program, rest)) = words.split_first() else {
                    bail!("command template is empty");
                };
                let mut cmd = Command::new(program);
                cmd.args(rest).args(args);
                cmd
            }
            ScriptKind::PythonScript => {
                let mut cmd = Command::new(&self.python);
                cmd.arg("-c").arg(text).args(args);
                cmd
            }
            ScriptKind::AsIs => {
                let mut cmd = Command::new(text);
                cmd.args(args);
                cmd
            }
        };
        Ok(cmd)
    }
}

impl ProcessRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> anyhow::Result<ProcessOutput> {
        let mut cmd = self.command_for(invocation)?;
        debug!(program = ?cmd.get_program(), kind = invocation.kind().as_str(), "spawning");

        let output = cmd
            .output()
            .with_context(|| format!("spawn {:?}", cmd.get_program()))?;

        Ok(ProcessOutput {
            // Terminated by a signal: no exit code.
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Split `text` into words the way a POSIX shell quotes them, without expanding anything.
///
/// Single quotes keep everything literally. Inside double quotes a backslash only escapes `"`
/// and `\`. Outside quotes a backslash escapes the next character. Adjacent quoted and bare
/// parts join into one word, so `''` yields an empty word.
fn split_words(text: &str) -> anyhow::Result<Vec<String>> {
    let mut words = Vec::new();
    let mut word = String::new();
    let mut in_word = false;
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        match c {
            c if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut word));
                    in_word = false;
                }
            }
            '\'' => {
                in_word = true;
                loop {
                    match chars.next() {
                        Some('\'') => break,
                        Some(c) => word.push(c),
                        None => bail!("unterminated single quote in command: {text}"),
                    }
                }
            }
            '"' => {
                in_word = true;
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some(c @ ('"' | '\\')) => word.push(c),
                            Some(c) => {
                                word.push('\\');
                                word.push(c);
                            }
                            None => bail!("unterminated double quote in command: {text}"),
                        },
                        Some(c) => word.push(c),
                        None => bail!("unterminated double quote in command: {text}"),
                    }
                }
            }
            '\\' => {
                in_word = true;
                match chars.next() {
                    Some(c) => word.push(c),
                    None => bail!("trailing backslash in command: {text}"),
                }
            }
            c => {
                in_word = true;
                word.push(c);
            }
        }
    }
    if in_word {
        words.push(word);
    }
    Ok(words)
}
