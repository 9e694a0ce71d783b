use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::tempdir;

const MD5_PASSWORD: &str = "5f4dcc3b5aa765d61d8327deb882cf99";
const SHA1_PASSWORD: &str = "5baa61e4c9b93f3f0682250b6cf8331b7ee68fd8";

/// Stand-in for hashcat: 32-char hashes identify as MD5/MD4, 40-char ones as
/// SHA1. Only the matching mode recovers "password", and every crack call is
/// appended to $FAKE_HC_LOG.
#[cfg(unix)]
const FAKE_HASHCAT: &str = r#"#!/bin/sh
log="${FAKE_HC_LOG:-/dev/null}"
case "$1" in
  --version) echo "v6.2.6-fake"; exit 0 ;;
  --identify)
    echo "The following hash-modes match the structure of your input hash:"
    echo ""
    echo "      # | Name | Category"
    echo "  ======+======+=========="
    awk 'length($0)==32{a=1} length($0)==40{b=1} END{if(a){print "      0 | MD5 | Raw Hash"; print "    900 | MD4 | Raw Hash"} if(b){print "    100 | SHA1 | Raw Hash"} if(!a && !b){exit 255}}' "$2"
    exit $?
    ;;
esac
mode="$2"
pot="$7"
if [ "$8" = "--show" ]; then
  cat "$pot"
  exit 0
fi
subset="$8"
words="$9"
echo "crack $mode $(tr '\n' ' ' < "$subset")" >> "$log"
found=1
while read -r h; do
  case "$mode:$h" in
    0:5f4dcc3b5aa765d61d8327deb882cf99|100:5baa61e4c9b93f3f0682250b6cf8331b7ee68fd8)
      if grep -qx password "$words"; then
        echo "$h:password" >> "$pot"
        found=0
      fi
      ;;
  esac
done < "$subset"
exit $found
"#;

#[cfg(unix)]
fn fake_hashcat() -> &'static Path {
    use std::os::unix::fs::PermissionsExt;
    use std::sync::OnceLock;
    static SCRIPT: OnceLock<PathBuf> = OnceLock::new();
    SCRIPT.get_or_init(|| {
        let dir = std::env::temp_dir().join(format!("autocrack-e2e-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("hashcat");
        fs::write(&path, FAKE_HASHCAT).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    })
}

struct Fixture {
    dir: tempfile::TempDir,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("hashes.txt"),
            format!("# two formats\n{MD5_PASSWORD}\n\n{SHA1_PASSWORD}\n"),
        )
        .unwrap();
        fs::write(dir.path().join("words.txt"), "letmein\npassword\n").unwrap();
        fs::create_dir_all(dir.path().join("scratch")).unwrap();
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn command(&self, hashcat: &Path) -> Command {
        let mut cmd = Command::cargo_bin("autocrack").unwrap();
        cmd.arg(self.path("hashes.txt"))
            .arg(self.path("words.txt"))
            .arg("--ledger")
            .arg(self.path("crack_log.json"))
            .arg("--hashcat")
            .arg(hashcat)
            .arg("--scratch-dir")
            .arg(self.path("scratch"))
            .arg("--color")
            .arg("never")
            .env("FAKE_HC_LOG", self.path("calls.log"));
        cmd
    }

    fn calls(&self) -> Vec<String> {
        fs::read_to_string(self.path("calls.log"))
            .unwrap_or_default()
            .lines()
            .map(|l| l.trim_end().to_string())
            .collect()
    }

    fn scratch_is_empty(&self) -> bool {
        fs::read_dir(self.path("scratch")).unwrap().next().is_none()
    }
}

#[cfg(unix)]
#[test]
fn e2e_cracks_each_hash_under_its_own_mode() {
    let fx = Fixture::new();
    fx.command(fake_hashcat())
        .assert()
        .success()
        .stdout(predicate::str::contains("[FOUND]"))
        .stdout(predicate::str::contains(format!("{MD5_PASSWORD} → 'password'")))
        .stdout(predicate::str::contains(format!("{SHA1_PASSWORD} → 'password'")));

    let mut calls = fx.calls();
    calls.sort();
    assert_eq!(
        calls,
        vec![
            format!("crack 0 {MD5_PASSWORD}"),
            format!("crack 100 {SHA1_PASSWORD}"),
            format!("crack 900 {MD5_PASSWORD}"),
        ]
    );

    let ledger: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(fx.path("crack_log.json")).unwrap()).unwrap();
    let records = ledger.as_array().unwrap();
    assert_eq!(records.len(), 3);
    let cracked = records
        .iter()
        .filter(|r| r["outcome"] == "cracked")
        .count();
    assert_eq!(cracked, 2);
    assert!(fx.scratch_is_empty());
}

#[cfg(unix)]
#[test]
fn e2e_second_run_does_no_new_work() {
    let fx = Fixture::new();
    fx.command(fake_hashcat()).assert().success();
    let ledger_before = fs::read_to_string(fx.path("crack_log.json")).unwrap();
    let calls_before = fx.calls().len();

    fx.command(fake_hashcat())
        .assert()
        .success()
        .stdout(predicate::str::contains("[SKIPPED]"))
        .stdout(predicate::str::contains("No modes cracked any new hashes."));
    assert_eq!(fx.calls().len(), calls_before);
    assert_eq!(
        fs::read_to_string(fx.path("crack_log.json")).unwrap(),
        ledger_before
    );
    assert!(fx.scratch_is_empty());
}

#[cfg(unix)]
#[test]
fn e2e_writes_exports() {
    let fx = Fixture::new();
    let outdir = fx.path("out");
    fx.command(fake_hashcat())
        .arg("-q")
        .arg("-o")
        .arg(&outdir)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
    let files: Vec<_> = fs::read_dir(&outdir).unwrap().collect();
    assert_eq!(files.len(), 2);
}

#[cfg(unix)]
#[test]
fn unreadable_ledger_is_fatal_and_left_alone() {
    let fx = Fixture::new();
    fs::write(fx.path("crack_log.json"), "{ definitely not a ledger").unwrap();
    fx.command(fake_hashcat()).assert().failure().code(4);
    assert_eq!(
        fs::read_to_string(fx.path("crack_log.json")).unwrap(),
        "{ definitely not a ledger"
    );
    assert!(fx.calls().is_empty());
}

#[test]
fn missing_hashcat_fails_without_ledger_writes() {
    let fx = Fixture::new();
    let missing = fx.path("no-such-hashcat");
    fx.command(&missing).assert().failure().code(3);
    assert!(!fx.path("crack_log.json").exists());
    assert!(fx.scratch_is_empty());
}

#[test]
fn missing_wordlist_causes_non_zero_exit() {
    let fx = Fixture::new();
    fs::remove_file(fx.path("words.txt")).unwrap();
    fx.command(Path::new("hashcat")).assert().failure().code(2);
}

#[test]
fn comment_only_hash_file_causes_non_zero_exit() {
    let fx = Fixture::new();
    fs::write(fx.path("hashes.txt"), "# nothing here\n\n").unwrap();
    fx.command(Path::new("hashcat")).assert().failure().code(2);
}
