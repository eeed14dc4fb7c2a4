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

use super::super::*;
use super::{CLEAR, START};

#[test]
fn test_clear_on_compare_resets_count() {
    let mut timer = Timer::new();
    timer.write_target(10);
    timer.write_mode(START | CLEAR);

    assert!(!timer.advance(9));
    assert_eq!(timer.count(), 9);

    assert!(timer.advance(1));
    assert_eq!(timer.count(), 0);
}

#[test]
fn test_overshoot_still_fires() {
    let mut timer = Timer::new();
    timer.write_target(10);
    timer.write_mode(START | CLEAR);

    assert!(timer.advance(25));
    assert_eq!(timer.count(), 0);
}

#[test]
fn test_without_clear_fires_once_per_crossing() {
    let mut timer = Timer::new();
    timer.write_target(10);
    timer.write_mode(START);

    // First crossing
    assert!(timer.advance(10));
    assert_eq!(timer.count(), 10);

    // Count continues past the target without firing again
    assert!(!timer.advance(5));
    assert!(!timer.advance(100));
    assert_eq!(timer.count(), 115);

    // Second crossing through wraparound
    timer.write_count(u32::MAX - 3);
    assert!(timer.advance(20));
    assert_eq!(timer.count(), 16);
}

#[test]
fn test_zero_target_never_fires() {
    let mut timer = Timer::new();
    timer.write_mode(START | CLEAR);

    assert!(!timer.advance(1000));
    assert_eq!(timer.count(), 1000);
}

#[test]
fn test_count_already_at_target_does_not_fire() {
    let mut timer = Timer::new();
    timer.write_target(10);
    timer.write_count(10);
    timer.write_mode(START);

    assert!(!timer.advance(1));
}

#[test]
fn test_wrap_below_target_fires_when_passing_old_side() {
    let mut timer = Timer::new();
    timer.write_target(u32::MAX);
    timer.write_count(u32::MAX - 1);
    timer.write_mode(START);

    // MAX-1 -> wraps to 1, passing MAX on the way
    assert!(timer.advance(3));
    assert_eq!(timer.count(), 1);
}

#[test]
fn test_zero_cycles_is_noop() {
    let mut timer = Timer::new();
    timer.write_target(5);
    timer.write_mode(START);

    assert!(!timer.advance(0));
    assert_eq!(timer.count(), 0);
}
