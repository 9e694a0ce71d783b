use std::collections::HashSet;

#[derive(Debug, thiserror::Error)]
pub enum PotError {
	#[error("malformed pot line: {0}")]
	MalformedLine(String),
}

/// Split a `hash:plaintext` line. Salted hashes contain ':' themselves, so the
/// longest entry of `known` that prefixes the line (followed by ':') wins;
/// otherwise only the first ':' splits. Empty plaintexts are allowed.
pub fn parse_pot_line(line: &str, known: &HashSet<&str>) -> Result<(String, String), PotError> {
	for (i, _) in line.rmatch_indices(':') {
		if known.contains(&line[..i]) {
			return Ok((line[..i].to_string(), line[i + 1..].to_string()));
		}
	}
	if let Some((hash, rest)) = line.split_once(':') {
		Ok((hash.trim().to_string(), rest.to_string()))
	} else {
		Err(PotError::MalformedLine(line.to_string()))
	}
}

/// Parse `--show` output into recovered pairs, in output order. Only hashes in
/// `known` are kept when `known` is non-empty; repeated hashes keep the first
/// plaintext.
pub fn parse_pot_contents(contents: &str, known: &[String]) -> Vec<(String, String)> {
	let known_set: HashSet<&str> = known.iter().map(String::as_str).collect();
	let mut seen: HashSet<String> = HashSet::new();
	let mut pairs: Vec<(String, String)> = Vec::new();
	for line in contents.lines() {
		let line = line.trim_end_matches('\r');
		if line.trim().is_empty() { continue; }
		match parse_pot_line(line, &known_set) {
			Ok((h, p)) => {
				if !known_set.is_empty() && !known_set.contains(h.as_str()) {
					log::debug!("ignoring recovered hash outside subset: {}", h);
					continue;
				}
				if seen.insert(h.clone()) {
					pairs.push((h, p));
				}
			}
			Err(e) => log::debug!("{}", e),
		}
	}
	pairs
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_password_with_colons() {
		let (h, p) = parse_pot_line("abcdef:pa:ss:wd", &HashSet::new()).unwrap();
		assert_eq!(h, "abcdef");
		assert_eq!(p, "pa:ss:wd");
	}

	#[test]
	fn salted_hash_uses_longest_known_prefix() {
		let known: HashSet<&str> = ["abc", "abc:salt"].into_iter().collect();
		let (h, p) = parse_pot_line("abc:salt:secret", &known).unwrap();
		assert_eq!(h, "abc:salt");
		assert_eq!(p, "secret");
	}

	#[test]
	fn ignores_malformed_blank_and_foreign_lines() {
		let known = vec!["123".to_string()];
		let pairs = parse_pot_contents("\nno_colon\n123:abc\n999:zzz\n123:dup\n", &known);
		assert_eq!(pairs, vec![("123".to_string(), "abc".to_string())]);
	}

	#[test]
	fn keeps_empty_plaintext() {
		let pairs = parse_pot_contents("d41d8cd98f00b204e9800998ecf8427e:\n", &[]);
		assert_eq!(pairs, vec![("d41d8cd98f00b204e9800998ecf8427e".to_string(), String::new())]);
	}

	#[test]
	fn large_subset_parses_every_line_once() {
		let known: Vec<String> = (0..40_000).map(|i| format!("{i:032x}:salt{i}")).collect();
		let mut show = String::new();
		for (i, h) in known.iter().enumerate() {
			show.push_str(&format!("{h}:pw:{i}\n"));
		}
		show.push_str(&format!("{}:again\n", known[0]));
		let pairs = parse_pot_contents(&show, &known);
		assert_eq!(pairs.len(), known.len());
		assert_eq!(pairs[0], (known[0].clone(), "pw:0".to_string()));
		assert_eq!(pairs[39_999], (known[39_999].clone(), "pw:39999".to_string()));
	}
}
