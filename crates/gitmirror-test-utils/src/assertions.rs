// Copyright (C) 2026  winnyboy5
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.
//! Custom assertions for mirrored working trees.

use std::fs;
use std::path::Path;

/// Assert that `dir/name` exists with exactly `expected` as content.
pub fn assert_file_content(dir: &Path, name: &str, expected: &str) {
    let path = dir.join(name);
    let actual = fs::read_to_string(&path)
        .unwrap_or_else(|err| panic!("Failed to read {:?}: {}", path, err));
    assert_eq!(actual, expected, "Unexpected content in {:?}", path);
}

/// Assert that `dir/name` does not exist.
pub fn assert_file_missing(dir: &Path, name: &str) {
    assert!(
        !dir.join(name).exists(),
        "{} should not exist in {:?}",
        name,
        dir
    );
}

/// Assert that a gitmirror invocation fails and mentions `expected` on stderr.
#[macro_export]
macro_rules! assert_gitmirror_failure {
    ($expected:expr, $($arg:expr),+ $(,)?) => {
        $crate::gitmirror()
            $(.arg($arg))+
            .assert()
            .failure()
            .stderr(predicates::prelude::predicate::str::contains($expected))
    };
}
