use std::fs;
use std::path::Path;

use log::info;
use snafu::prelude::*;

use crate::census::{CensusResult, WritingOutputSnafu};

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
        .to_string()
}

/// Writes the content to the given file, or to the standard output for `None` and `"stdout"`.
pub fn write_output(out: Option<&str>, content: &str) -> CensusResult<()> {
    match out {
        None | Some("stdout") => {
            println!("{}", content);
            Ok(())
        }
        Some(path) => {
            info!("Writing summary to {}", path);
            fs::write(path, content).context(WritingOutputSnafu { path })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names() {
        assert_eq!(
            simplify_file_name("/data/assets/counties.json"),
            "counties.json"
        );
        assert_eq!(simplify_file_name("geo.json"), "geo.json");
        assert_eq!(simplify_file_name(".."), "..");
    }

    #[test]
    fn write_to_file() {
        let dir = std::env::temp_dir().join("relcensus_write_output");
        fs::create_dir_all(&dir).unwrap();
        let p = dir.join("out.json").display().to_string();
        write_output(Some(&p), "{}").unwrap();
        assert_eq!(fs::read_to_string(&p).unwrap(), "{}");

        let missing_dir = dir.join("nope").join("out.json").display().to_string();
        assert!(write_output(Some(&missing_dir), "{}").is_err());
    }
}
