// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Bounded debug message log
//!
//! Holds the most recent human-readable events of a [`System`](super::system::System)
//! (exceptions, DMA transfers, image mappings). When full, the oldest message
//! is dropped.

use std::collections::VecDeque;

/// Default number of messages kept
pub const DEFAULT_DEBUG_LOG_CAPACITY: usize = 100;

/// Ring buffer of debug messages
///
/// # Example
///
/// ```
/// use ps2rx::core::debug_log::DebugLog;
///
/// let mut log = DebugLog::with_capacity(2);
/// log.push("one");
/// log.push("two");
/// log.push("three");
///
/// assert_eq!(log.last(), "three");
/// assert_eq!(log.dump(), vec!["two", "three"]);
/// ```
#[derive(Debug, Clone)]
pub struct DebugLog {
    messages: VecDeque<String>,
    capacity: usize,
}

impl DebugLog {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_DEBUG_LOG_CAPACITY)
    }

    /// Create a log keeping at most `capacity` messages (at least one)
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            messages: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a message, evicting the oldest one when full
    pub fn push(&mut self, message: impl Into<String>) {
        if self.messages.len() == self.capacity {
            self.messages.pop_front();
        }
        self.messages.push_back(message.into());
    }

    /// Most recent message, or an empty string
    pub fn last(&self) -> &str {
        self.messages.back().map(String::as_str).unwrap_or("")
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// All messages, oldest first
    pub fn dump(&self) -> Vec<String> {
        self.messages.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for DebugLog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_log() {
        let log = DebugLog::new();

        assert!(log.is_empty());
        assert_eq!(log.last(), "");
        assert!(log.dump().is_empty());
        assert_eq!(log.capacity(), 100);
    }

    #[test]
    fn test_bounded() {
        let mut log = DebugLog::new();
        for i in 0..150 {
            log.push(format!("msg {}", i));
        }

        assert_eq!(log.len(), 100);
        assert_eq!(log.dump()[0], "msg 50");
        assert_eq!(log.last(), "msg 149");
    }

    #[test]
    fn test_clear() {
        let mut log = DebugLog::new();
        log.push("a");
        log.clear();

        assert!(log.is_empty());
        assert_eq!(log.last(), "");
    }

    #[test]
    fn test_zero_capacity_keeps_one() {
        let mut log = DebugLog::with_capacity(0);
        log.push("a");
        log.push("b");

        assert_eq!(log.dump(), vec!["b"]);
    }
}
