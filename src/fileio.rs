//! Code regarding file input (finding and preprocessing `.jack`, `.vm` and
//! `.asm` sources) and output (writing the generated `.vm`, `.asm` and
//! `.hack` files).
//!
//! ## Input
//! A source path is either a single file or a directory; a directory
//! contributes every file with the wanted extension directly inside it,
//! in file name order. Each file is reduced to its significant lines:
//! comments removed, whitespace trimmed, blank lines dropped.
//!
//! ## Output
//! Generated files are written next to their sources: one `.vm` per Jack
//! class, one `.asm` per translated file or directory (`Dir/Dir.asm`), one
//! `.hack` per assembled file.

use std::path::{Path, PathBuf};

use crate::error::Error;

pub mod input {
    use std::fs;

    use chumsky::prelude::*;

    use super::{Error, Path, PathBuf};

    /// A source file, reduced to its significant lines.
    #[derive(Debug, Clone)]
    pub struct SourceFile {
        pub path: PathBuf,
        /// File name without the extension; namespaces statics and labels.
        pub name: String,
        pub lines: Vec<String>,
    }

    impl SourceFile {
        pub fn read(path: &Path) -> Result<Self, Error> {
            let content = fs::read_to_string(path).map_err(|error| Error::io(path, error))?;

            let name = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default();

            Ok(Self {
                path: path.to_owned(),
                name,
                lines: strip_comments(&content),
            })
        }

        /// The lines as one text, which diagnostic spans index into.
        pub fn text(&self) -> String {
            self.lines.join("\n")
        }
    }

    /// Source files with `extension` at `path`, sorted by name.
    pub fn discover(path: &Path, extension: &str) -> Result<Vec<PathBuf>, Error> {
        let has_extension =
            |path: &Path| path.extension().is_some_and(|found| found == extension);

        let mut sources = if path.is_dir() {
            fs::read_dir(path)
                .map_err(|error| Error::io(path, error))?
                .filter_map(Result::ok)
                .map(|entry| entry.path())
                .filter(|path| path.is_file() && has_extension(path.as_path()))
                .collect()
        } else if has_extension(path) {
            vec![path.to_owned()]
        } else {
            vec![]
        };

        if sources.is_empty() {
            return Err(Error::NoSources {
                path: path.to_owned(),
                extension: extension.to_owned(),
            });
        }

        sources.sort();
        Ok(sources)
    }

    pub fn read_all(path: &Path, extension: &str) -> Result<Vec<SourceFile>, Error> {
        discover(path, extension)?
            .iter()
            .map(|path| SourceFile::read(path))
            .collect()
    }

    /// Remove `//` and `/* */` comments, trim every line and drop the
    /// empty ones. Comment markers inside string literals are kept.
    pub fn strip_comments(content: &str) -> Vec<String> {
        // `any()` takes whatever the comment rules leave, so this cannot fail
        let code = uncommented()
            .parse(content)
            .unwrap_or_else(|_| content.to_owned());

        code.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_owned)
            .collect()
    }

    /// The source with every comment blanked out. A block comment becomes a
    /// space, plus the line breaks it spanned.
    fn uncommented() -> impl Parser<char, String, Error = Simple<char>> {
        // string literals end with their line
        let string = just('"')
            .chain(none_of("\"\n").repeated())
            .chain::<char, _, _>(just('"').or_not())
            .collect::<String>();

        let line_comment = just("//")
            .then(none_of('\n').repeated())
            .to(String::new());

        let block_comment = just("/*")
            .ignore_then(take_until(just("*/").ignored().or(end())))
            .map(|(body, ())| {
                let breaks = body.iter().filter(|c| **c == '\n').count();
                format!(" {}", "\n".repeat(breaks))
            });

        choice((string, line_comment, block_comment, any().map(String::from)))
            .repeated()
            .collect::<String>()
            .then_ignore(end())
    }

}

pub mod output {
    use std::fs;

    use super::{Error, Path, PathBuf};

    /// Write `lines`, each terminated by a newline.
    pub fn write_lines<S: AsRef<str>>(path: &Path, lines: &[S]) -> Result<(), Error> {
        let content: String = lines
            .iter()
            .flat_map(|line| [line.as_ref(), "\n"])
            .collect();

        fs::write(path, content).map_err(|error| Error::io(path, error))
    }

    /// `X.vm` becomes `X.asm`; a directory `D` becomes `D/D.asm`.
    pub fn assembly_path(source: &Path) -> Result<PathBuf, Error> {
        if !source.is_dir() {
            return Ok(source.with_extension("asm"));
        }

        let source = fs::canonicalize(source).map_err(|error| Error::io(source, error))?;
        let name = source
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| String::from("Main"));

        Ok(source.join(name).with_extension("asm"))
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_assembly_path_for_file() {
            assert_eq!(
                assembly_path(Path::new("programs/SimpleAdd.vm")).ok(),
                Some(PathBuf::from("programs/SimpleAdd.asm"))
            );
        }

        #[test]
        fn test_write_lines() {
            let path = std::env::temp_dir().join(format!("hackc-output-{}.hack", std::process::id()));

            write_lines(&path, &["0000000000000010", "1110110000010000"])
                .expect("file should be writable");
            assert_eq!(
                fs::read_to_string(&path).expect("file should be readable"),
                "0000000000000010\n1110110000010000\n"
            );

            fs::remove_file(&path).expect("file should be removable");
        }
    }
}
