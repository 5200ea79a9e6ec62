/*
Copyright 2025 Connor Nolan

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.
*/

mod emitter;
pub mod parser;

pub use emitter::AsmEmitter;

use std::path::{Path, PathBuf};

/// Derives the `.asm` output path from the translation input: a directory
/// produces `<dir>/<dirname>.asm`, a single file swaps its extension.
pub fn output_path(input: &Path, input_is_dir: bool) -> PathBuf {
    if input_is_dir {
        let name = input.file_name().and_then(|n| n.to_str()).unwrap_or("out");
        input.join(format!("{name}.asm"))
    } else {
        input.with_extension("asm")
    }
}

/// Module name used for static mangling: the stem of the source file.
pub fn module_name(path: &Path) -> &str {
    path.file_stem().and_then(|s| s.to_str()).unwrap_or("Unknown")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path_for_a_file() {
        assert_eq!(
            output_path(Path::new("foo.vm"), false),
            PathBuf::from("foo.asm")
        );
        assert_eq!(
            output_path(Path::new("path/to/Foo.vm"), false),
            PathBuf::from("path/to/Foo.asm")
        );
    }

    #[test]
    fn test_output_path_for_a_directory() {
        assert_eq!(
            output_path(Path::new("path/proj"), true),
            PathBuf::from("path/proj/proj.asm")
        );
    }

    #[test]
    fn test_module_name_is_the_file_stem() {
        assert_eq!(module_name(Path::new("dir/Foo.vm")), "Foo");
        assert_eq!(module_name(Path::new("Bar.vm")), "Bar");
    }
}
