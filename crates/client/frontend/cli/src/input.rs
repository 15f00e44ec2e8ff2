//! Player decisions typed on a line-based input stream.

use std::io::{self, Stdout, Write};

use async_trait::async_trait;
use runtime::{DecisionRequest, PlayerChoice, PlayerInput, RuntimeError};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tokio::sync::Mutex;

/// Reads menu selections line by line and re-prompts until a selection is
/// in range. End of input is reported as a closed channel.
pub struct LinePlayerInput<R, W> {
    lines: Mutex<Lines<R>>,
    out: std::sync::Mutex<W>,
}

impl LinePlayerInput<BufReader<tokio::io::Stdin>, Stdout> {
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), io::stdout())
    }
}

impl<R, W> LinePlayerInput<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: Write + Send,
{
    pub fn new(reader: R, out: W) -> Self {
        Self {
            lines: Mutex::new(reader.lines()),
            out: std::sync::Mutex::new(out),
        }
    }

    pub fn into_output(self) -> Option<W> {
        self.out.into_inner().ok()
    }

    fn say(&self, text: &str) {
        if let Ok(mut out) = self.out.lock() {
            let written = write!(out, "{text}").and_then(|()| out.flush());
            if let Err(err) = written {
                tracing::warn!("failed to write prompt: {}", err);
            }
        }
    }

    async fn next_line(&self) -> runtime::Result<String> {
        let mut lines = self.lines.lock().await;
        match lines.next_line().await {
            Ok(Some(line)) => Ok(line),
            Ok(None) => Err(RuntimeError::PlayerInputClosed),
            Err(err) => Err(RuntimeError::PlayerInput(err.to_string())),
        }
    }

    /// Prompts until the answer is a number in `1..=count`; returns it 0-based.
    async fn pick(&self, prompt: &str, count: usize) -> runtime::Result<usize> {
        loop {
            self.say(&format!("{prompt} [1-{count}]: "));
            let line = self.next_line().await?;
            match parse_selection(&line, count) {
                Some(index) => return Ok(index),
                None => self.say(&format!("Enter a number between 1 and {count}.\n")),
            }
        }
    }
}

/// Parses a 1-based menu selection.
fn parse_selection(line: &str, count: usize) -> Option<usize> {
    let number: usize = line.trim().parse().ok()?;
    (1..=count).contains(&number).then(|| number - 1)
}

#[async_trait]
impl<R, W> PlayerInput for LinePlayerInput<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: Write + Send,
{
    async fn choose_action(&self, request: &DecisionRequest) -> runtime::Result<PlayerChoice> {
        if request.options.iter().all(|option| option.targets.is_empty()) {
            return Err(RuntimeError::PlayerInput(
                "no known ability has a legal target".to_string(),
            ));
        }

        let actor = &request.actor;
        let mut menu = format!(
            "\n{}'s turn ({}/{} HP)\n",
            actor.name,
            actor.current_hp(),
            actor.max_hp()
        );
        for (index, option) in request.options.iter().enumerate() {
            let ability = &option.ability;
            if ability.description.is_empty() {
                menu.push_str(&format!("  {}) {}\n", index + 1, ability.name));
            } else {
                menu.push_str(&format!(
                    "  {}) {} - {}\n",
                    index + 1,
                    ability.name,
                    ability.description
                ));
            }
        }
        self.say(&menu);

        let ability = loop {
            let index = self.pick("Ability", request.options.len()).await?;
            if request.options[index].targets.is_empty() {
                self.say("That ability has no legal target right now.\n");
                continue;
            }
            break index;
        };

        let targets = &request.options[ability].targets;
        if let [only] = targets.as_slice() {
            self.say(&format!("  -> {}\n", only.name));
            return Ok(PlayerChoice::new(ability, 0));
        }

        let mut menu = String::new();
        for (index, target) in targets.iter().enumerate() {
            menu.push_str(&format!(
                "  {}) {} [{}] {}/{} HP\n",
                index + 1,
                target.name,
                target.team_name,
                target.current_hp,
                target.max_hp
            ));
        }
        self.say(&menu);

        let target = self.pick("Target", targets.len()).await?;
        Ok(PlayerChoice::new(ability, target))
    }
}
