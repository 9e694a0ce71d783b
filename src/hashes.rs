//! Reading the input hash list.
//!
//! Lines are trimmed; blank lines and `#` comments are skipped. Duplicate
//! hashes are dropped, keeping the first occurrence so subset files preserve
//! the order of the input file.
use std::collections::HashSet;
use std::path::Path;

use anyhow::Result;

use crate::io::iter_lines_auto;

/// Returns the usable hash token from one input line, if any.
pub fn parse_hash_line(line: &str) -> Option<&str> {
	let trimmed = line.trim();
	if trimmed.is_empty() || trimmed.starts_with('#') {
		None
	} else {
		Some(trimmed)
	}
}

pub fn parse_hash_list(contents: &str) -> Vec<String> {
	let mut seen = HashSet::new();
	contents
		.lines()
		.filter_map(parse_hash_line)
		.filter(|h| seen.insert(h.to_string()))
		.map(|h| h.to_string())
		.collect()
}

/// Streaming variant of [`parse_hash_list`] over a file path.
pub fn load_hash_file<P: AsRef<Path>>(path: P, mmap_threshold_bytes: u64) -> Result<Vec<String>> {
	let mut seen = HashSet::new();
	let mut hashes = Vec::new();
	for line in iter_lines_auto(&path, mmap_threshold_bytes)? {
		let line = line?;
		if let Some(h) = parse_hash_line(&line) {
			if seen.insert(h.to_string()) {
				hashes.push(h.to_string());
			}
		}
	}
	log::info!("loaded {} hash(es) from {}", hashes.len(), path.as_ref().display());
	Ok(hashes)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn trims_skips_comments_and_dedups() {
		let v = parse_hash_list("\n# header\n aaa \n\nbbb\naaa\n  #indented comment\n");
		assert_eq!(v, vec!["aaa", "bbb"]);
	}

	#[test]
	fn file_loader_matches_string_parser() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("hashes.txt");
		let contents = "# md5\n5f4dcc3b5aa765d61d8327deb882cf99\r\n\nabc:salt\n5f4dcc3b5aa765d61d8327deb882cf99\n";
		std::fs::write(&path, contents).unwrap();
		let from_file = load_hash_file(&path, 1).unwrap();
		assert_eq!(from_file, parse_hash_list(contents));
		assert_eq!(from_file, vec!["5f4dcc3b5aa765d61d8327deb882cf99", "abc:salt"]);
	}
}
