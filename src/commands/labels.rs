//! Label queue driving the dot-padded checklist
//!
//! Labels are declared up front from a multi-line block and consumed front to
//! back as steps run. Steps skipped by a branch are discarded without being
//! printed, so the column width stays the one computed from the full list.

use std::collections::VecDeque;
use std::io::Write;
use thiserror::Error;

use crate::constants::LABEL_PADDING;

/// Label queue contract violations
#[derive(Debug, Error)]
pub enum LabelError {
    /// A label was requested from an empty queue
    #[error("label queue exhausted: cannot {operation}")]
    Exhausted { operation: &'static str },

    #[error("failed to write label: {0}")]
    Io(#[from] std::io::Error),
}

/// Ordered step descriptions
#[derive(Debug, Clone)]
pub struct Labels {
    queue: VecDeque<String>,
    width: usize,
}

impl Labels {
    /// Build a queue from a text block; blank lines are dropped and each
    /// remaining line is trimmed
    pub fn new(text: &str) -> Self {
        let queue: VecDeque<String> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();

        let longest = queue.iter().map(|l| l.chars().count()).max().unwrap_or(0);

        Self {
            queue,
            width: longest + LABEL_PADDING,
        }
    }

    /// Column width every label is padded to
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Front label, if any
    pub fn peek(&self) -> Option<&str> {
        self.queue.front().map(String::as_str)
    }

    /// Pop the front label and write it dot-padded, without a newline
    pub fn next<W: Write>(&mut self, out: &mut W) -> Result<(), LabelError> {
        let label = self
            .queue
            .pop_front()
            .ok_or(LabelError::Exhausted { operation: "print next label" })?;
        write!(out, "{:.<width$}", label, width = self.width)?;
        out.flush()?;
        Ok(())
    }

    /// Discard the next `count` labels without printing them
    pub fn dump(&mut self, count: usize) -> Result<(), LabelError> {
        if count > self.queue.len() {
            return Err(LabelError::Exhausted { operation: "dump labels" });
        }
        self.queue.drain(..count);
        Ok(())
    }

    /// Discard the front label
    pub fn pop_first(&mut self) -> Result<String, LabelError> {
        self.queue
            .pop_front()
            .ok_or(LabelError::Exhausted { operation: "pop first label" })
    }

    /// Discard the back label
    pub fn pop_last(&mut self) -> Result<String, LabelError> {
        self.queue
            .pop_back()
            .ok_or(LabelError::Exhausted { operation: "pop last label" })
    }
}
