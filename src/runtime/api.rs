//! Operator command models.
//!
//! Commands are one line of text: `p <line>`, `r <line>`, `a <ingredient> <delta>`,
//! `s` for a status table and `q` to quit.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::{Controller, IngredientId, KitchenError, WorkerId};

/// A parsed operator command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "command")]
pub enum OperatorCommand {
    /// Pause a preparation line.
    Pause {
        /// Line id.
        worker: WorkerId,
    },
    /// Resume a paused line.
    Resume {
        /// Line id.
        worker: WorkerId,
    },
    /// Add stock to an ingredient.
    Adjust {
        /// Ingredient id.
        ingredient: IngredientId,
        /// Units to add; must be positive.
        delta: i64,
    },
    /// Print the kitchen status.
    Status,
    /// Shut the kitchen down.
    Quit,
}

/// Outcome of an applied command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlResponse {
    /// Whether the command took effect.
    pub ok: bool,
    /// Human-readable result.
    pub message: String,
}

impl ControlResponse {
    fn ok(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
        }
    }

    fn rejected(err: &KitchenError) -> Self {
        Self {
            ok: false,
            message: err.to_string(),
        }
    }
}

impl fmt::Display for ControlResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ok {
            f.write_str(&self.message)
        } else {
            write!(f, "error: {}", self.message)
        }
    }
}

fn arg<T: FromStr>(raw: Option<&str>, line: &str) -> Result<T, KitchenError> {
    raw.and_then(|s| s.parse().ok())
        .ok_or_else(|| KitchenError::InvalidCommand(line.to_string()))
}

impl OperatorCommand {
    /// Parse one input line. Surrounding whitespace is ignored and command
    /// letters are case-insensitive.
    ///
    /// # Errors
    ///
    /// Returns `KitchenError::InvalidCommand` for unknown commands, missing or
    /// unparsable arguments and trailing tokens.
    pub fn parse(line: &str) -> Result<Self, KitchenError> {
        let trimmed = line.trim();
        let mut tokens = trimmed.split_whitespace();
        let invalid = || KitchenError::InvalidCommand(trimmed.to_string());
        let head = tokens.next().ok_or_else(invalid)?.to_ascii_lowercase();

        let cmd = match head.as_str() {
            "p" | "pause" => Self::Pause {
                worker: arg(tokens.next(), trimmed)?,
            },
            "r" | "resume" => Self::Resume {
                worker: arg(tokens.next(), trimmed)?,
            },
            "a" | "add" => Self::Adjust {
                ingredient: arg(tokens.next(), trimmed)?,
                delta: arg(tokens.next(), trimmed)?,
            },
            "s" | "status" => Self::Status,
            "q" | "quit" => Self::Quit,
            _ => return Err(invalid()),
        };
        if tokens.next().is_some() {
            return Err(invalid());
        }
        Ok(cmd)
    }

    /// Apply the command through `controller`.
    pub fn apply(self, controller: &Controller) -> ControlResponse {
        match self {
            Self::Pause { worker } => controller
                .pause(worker)
                .map_or_else(|e| ControlResponse::rejected(&e), |()| {
                    ControlResponse::ok(format!("line {worker} paused"))
                }),
            Self::Resume { worker } => controller
                .resume(worker)
                .map_or_else(|e| ControlResponse::rejected(&e), |()| {
                    ControlResponse::ok(format!("line {worker} resumed"))
                }),
            Self::Adjust { ingredient, delta } => controller
                .adjust_inventory(ingredient, delta)
                .map_or_else(
                    |e| ControlResponse::rejected(&e),
                    |count| ControlResponse::ok(format!("ingredient {ingredient} now {count}")),
                ),
            Self::Status => ControlResponse::ok(controller.system().snapshot().to_string()),
            Self::Quit => {
                controller.request_shutdown();
                ControlResponse::ok("shutting down")
            }
        }
    }
}

impl FromStr for OperatorCommand {
    type Err = KitchenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
